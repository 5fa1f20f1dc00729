//! Command-line interface.

use clap::Parser;

/// Discord bot that rewrites Instagram and Twitter/X links to embed-friendly
/// proxy domains.
#[derive(Debug, Parser)]
#[command(name = "embedfix", version, about)]
pub struct Cli {
    /// Discord bot token.
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Base URL of the dashboard config service.
    #[arg(long, env = "EMBEDFIX_API_URL", default_value = "http://localhost:3001")]
    pub api_url: String,

    /// Enable debug-level logging.
    #[arg(short, long)]
    pub verbose: bool,
}
