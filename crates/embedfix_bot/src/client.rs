//! Bot assembly and lifecycle.

use crate::{EmbedfixHandler, SerenityGateway, StoreAdapter};
use diesel::pg::PgConnection;
use embedfix_core::Platform;
use embedfix_database::EmbedRepository;
use embedfix_error::{EmbedfixResult, GatewayError};
use embedfix_pipeline::{
    HttpProber, MessagingGateway, PlatformSpec, QueueOptions, ReplyNotifier, RewritePipeline,
    TransformStore, TwitterMirrorGate, UrlProber, ValidationQueue, run_worker,
};
use embedfix_settings::{HttpSettingsFetcher, SettingsClient};
use serenity::Client;
use serenity::http::Http;
use std::sync::Arc;
use tracing::{info, instrument};

/// The assembled embedfix Discord bot.
///
/// Owns the serenity client; the per-platform validation workers run as
/// detached tasks spawned during construction.
pub struct EmbedfixBot {
    client: Client,
}

impl EmbedfixBot {
    /// Wire up both platform pipelines and build the serenity client.
    ///
    /// # Errors
    /// Returns an error if the serenity client fails to initialize.
    #[instrument(skip(token, conn))]
    pub async fn new(token: String, conn: PgConnection, api_url: &str) -> EmbedfixResult<Self> {
        info!("Initializing embedfix Discord bot");

        let http = Arc::new(Http::new(&token));
        let gateway: Arc<dyn MessagingGateway> = Arc::new(SerenityGateway::new(http));
        let repository = Arc::new(EmbedRepository::new(conn));
        let store: Arc<dyn TransformStore> = Arc::new(StoreAdapter::new(repository.clone()));
        let prober: Arc<dyn UrlProber> = Arc::new(HttpProber::new());

        let specs = [
            PlatformSpec::instagram(),
            PlatformSpec::twitter(Arc::new(TwitterMirrorGate::new())),
        ];

        let mut pipelines = Vec::with_capacity(specs.len());
        let mut notifier_settings = None;
        for spec in specs {
            let platform = spec.platform;
            let settings = Arc::new(SettingsClient::new(Arc::new(HttpSettingsFetcher::new(
                api_url, platform,
            ))));
            // Reply notifications follow the Twitter feature's settings.
            if platform == Platform::Twitter {
                notifier_settings = Some(settings.clone());
            }

            let pipeline = Arc::new(RewritePipeline::new(
                spec,
                gateway.clone(),
                store.clone(),
                prober.clone(),
                settings,
            ));
            let (queue, receiver) = ValidationQueue::new(QueueOptions::default());
            tokio::spawn(run_worker(pipeline.clone(), receiver));
            pipelines.push((pipeline, queue));
            info!(%platform, "Started validation worker");
        }

        let notifier_settings = notifier_settings.unwrap_or_else(|| {
            Arc::new(SettingsClient::new(Arc::new(HttpSettingsFetcher::new(
                api_url,
                Platform::Twitter,
            ))))
        });
        let notifier = Arc::new(ReplyNotifier::new(
            gateway.clone(),
            store.clone(),
            notifier_settings.clone(),
        ));

        let handler = EmbedfixHandler::new(pipelines, notifier, repository, notifier_settings);
        let client = Client::builder(&token, EmbedfixHandler::intents())
            .event_handler(handler)
            .await
            .map_err(GatewayError::from)?;

        info!("Serenity client built");
        Ok(Self { client })
    }

    /// Run the bot until shutdown.
    ///
    /// # Errors
    /// Returns an error if the gateway connection fails fatally.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> EmbedfixResult<()> {
        info!("Starting embedfix bot");
        self.client.start().await.map_err(GatewayError::from)?;
        Ok(())
    }
}
