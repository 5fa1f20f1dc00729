use clap::Parser;
use embedfix_bot::{Cli, EmbedfixBot};
use embedfix_database::establish_connection;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    let conn = establish_connection()?;
    let mut bot = EmbedfixBot::new(cli.token, conn, &cli.api_url).await?;
    bot.start().await?;
    Ok(())
}
