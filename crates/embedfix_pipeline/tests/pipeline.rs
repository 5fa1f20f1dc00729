//! End-to-end pipeline tests over mock capabilities.

use async_trait::async_trait;
use embedfix_core::{
    EmbedConfig, EmbedType, GuildEmbedSettings, MessageRef, ValidationStatus,
};
use embedfix_error::{
    DatabaseError, DatabaseErrorKind, GatewayError, GatewayErrorKind, GatewayResult, HttpError,
};
use embedfix_pipeline::{
    AuditEvent, MessagingGateway, PlatformSpec, ProbeOutcome, QueueOptions, ReplyNotifier,
    RestrictionGate, RestrictionVerdict, RewritePipeline, TransformRecord, TransformStore,
    UrlProber, ValidationQueue, ValidationQueueItem, run_worker,
};
use embedfix_settings::{SettingsClient, SettingsFetcher};
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

const GUILD: i64 = 100;
const CHANNEL: i64 = 200;
const MESSAGE: i64 = 300;
const AUTHOR: i64 = 400;

fn feature_id() -> Uuid {
    Uuid::from_u128(0xfeed)
}

fn message(content: &str) -> MessageRef {
    MessageRef {
        message_id: MESSAGE,
        channel_id: CHANNEL,
        channel_name: "general".into(),
        guild_id: GUILD,
        author_id: AUTHOR,
        author_username: "poster".into(),
        author_display_name: "Poster".into(),
        author_avatar_url: None,
        content: content.into(),
    }
}

fn item(original_url: &str, post_id: &str) -> ValidationQueueItem {
    ValidationQueueItem {
        message: message(original_url),
        original_url: original_url.into(),
        post_id: post_id.into(),
    }
}

fn config(prefix: &str, embed_type: EmbedType, priority: i32) -> EmbedConfig {
    EmbedConfig {
        id: priority,
        server_id: GUILD,
        feature_id: feature_id(),
        prefix: prefix.into(),
        embed_type,
        priority,
        active: true,
    }
}

struct FixedFetcher(GuildEmbedSettings);

#[async_trait]
impl SettingsFetcher for FixedFetcher {
    async fn fetch(&self, _guild_id: i64) -> Result<GuildEmbedSettings, HttpError> {
        Ok(self.0.clone())
    }
}

fn settings_client(settings: GuildEmbedSettings) -> Arc<SettingsClient> {
    Arc::new(SettingsClient::new(Arc::new(FixedFetcher(settings))))
}

/// Gateway mock that records every call and fails on demand.
#[derive(Default)]
struct MockGateway {
    replies: Mutex<Vec<String>>,
    reactions: Mutex<Vec<String>>,
    suppressed: Mutex<Vec<i64>>,
    deleted: Mutex<Vec<i64>>,
    reposted: Mutex<Vec<String>>,
    webhook_supported: bool,
    fail_repost: bool,
    reply_error: Option<GatewayErrorKind>,
}

impl MockGateway {
    fn replying() -> Self {
        Self {
            webhook_supported: false,
            ..Self::default()
        }
    }

    fn with_webhooks() -> Self {
        Self {
            webhook_supported: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl MessagingGateway for MockGateway {
    async fn reply(
        &self,
        _channel_id: i64,
        _message_id: i64,
        content: &str,
    ) -> GatewayResult<i64> {
        if let Some(kind) = &self.reply_error {
            return Err(GatewayError::new(kind.clone()));
        }
        self.replies.lock().unwrap().push(content.to_string());
        Ok(901)
    }

    async fn suppress_embeds(&self, _channel_id: i64, message_id: i64) -> GatewayResult<()> {
        self.suppressed.lock().unwrap().push(message_id);
        Ok(())
    }

    async fn delete_message(&self, _channel_id: i64, message_id: i64) -> GatewayResult<()> {
        self.deleted.lock().unwrap().push(message_id);
        Ok(())
    }

    async fn channel_supports_webhooks(&self, _channel_id: i64) -> GatewayResult<bool> {
        Ok(self.webhook_supported)
    }

    async fn repost_via_webhook(
        &self,
        _message: &MessageRef,
        content: &str,
    ) -> GatewayResult<i64> {
        if self.fail_repost {
            return Err(GatewayError::new(GatewayErrorKind::SendFailed(
                "webhook send failed".into(),
            )));
        }
        self.reposted.lock().unwrap().push(content.to_string());
        Ok(902)
    }

    async fn add_reaction(
        &self,
        _channel_id: i64,
        _message_id: i64,
        _guild_id: i64,
        emoji: &str,
    ) -> GatewayResult<()> {
        self.reactions.lock().unwrap().push(emoji.to_string());
        Ok(())
    }

    async fn user_mention(&self, user_id: i64) -> GatewayResult<String> {
        Ok(format!("<@{user_id}>"))
    }
}

/// In-memory store with insert-once transform records.
#[derive(Default)]
struct MockStore {
    configs: Vec<EmbedConfig>,
    records: Mutex<Vec<TransformRecord>>,
    audits: Mutex<Vec<AuditEvent>>,
    webhook_authors: Vec<(i64, i64)>,
    fail_record: bool,
}

impl MockStore {
    fn with_configs(configs: Vec<EmbedConfig>) -> Self {
        Self {
            configs,
            ..Self::default()
        }
    }

    fn actions(&self) -> Vec<&'static str> {
        self.audits.lock().unwrap().iter().map(|a| a.action).collect()
    }
}

#[async_trait]
impl TransformStore for MockStore {
    async fn embed_configs(
        &self,
        _server_id: i64,
        _feature_id: Uuid,
    ) -> Result<Vec<EmbedConfig>, DatabaseError> {
        Ok(self.configs.clone())
    }

    async fn feature_id(&self, _name: &str) -> Result<Option<Uuid>, DatabaseError> {
        Ok(Some(feature_id()))
    }

    async fn record_transform(&self, record: &TransformRecord) -> Result<(), DatabaseError> {
        if self.fail_record {
            return Err(DatabaseError::new(DatabaseErrorKind::Query(
                "insert failed".into(),
            )));
        }
        let mut records = self.records.lock().unwrap();
        if records.iter().all(|r| r.message_id != record.message_id) {
            records.push(record.clone());
        }
        Ok(())
    }

    async fn record_audit(&self, event: &AuditEvent) -> Result<(), DatabaseError> {
        self.audits.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn upsert_user(&self, _user_id: i64, _username: &str) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn upsert_channel(&self, _channel_id: i64, _name: &str) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn original_user_for_webhook(
        &self,
        webhook_message_id: i64,
    ) -> Result<Option<i64>, DatabaseError> {
        Ok(self
            .webhook_authors
            .iter()
            .find(|(id, _)| *id == webhook_message_id)
            .map(|(_, user)| *user))
    }
}

/// Prober scripted with the set of reachable URLs; records probe order.
#[derive(Default)]
struct ScriptedProber {
    reachable: Vec<String>,
    probed: Mutex<Vec<String>>,
}

impl ScriptedProber {
    fn reaching(urls: &[&str]) -> Self {
        Self {
            reachable: urls.iter().map(|u| u.to_string()).collect(),
            probed: Mutex::default(),
        }
    }
}

#[async_trait]
impl UrlProber for ScriptedProber {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        self.probed.lock().unwrap().push(url.to_string());
        if self.reachable.iter().any(|u| u == url) {
            ProbeOutcome::Reachable
        } else {
            ProbeOutcome::Unreachable("HTTP 404".into())
        }
    }
}

struct FixedGate(RestrictionVerdict);

#[async_trait]
impl RestrictionGate for FixedGate {
    async fn check(&self, _original_url: &str) -> RestrictionVerdict {
        self.0
    }
}

fn pipeline(
    spec: PlatformSpec,
    gateway: Arc<MockGateway>,
    store: Arc<MockStore>,
    prober: Arc<ScriptedProber>,
    settings: GuildEmbedSettings,
) -> RewritePipeline {
    RewritePipeline::new(spec, gateway, store, prober, settings_client(settings))
}

#[tokio::test]
async fn first_reachable_candidate_wins() {
    let gateway = Arc::new(MockGateway::replying());
    let store = Arc::new(MockStore::with_configs(vec![config(
        "dd",
        EmbedType::Prefix,
        1,
    )]));
    let prober = Arc::new(ScriptedProber::reaching(&[
        "https://ddinstagram.com/p/ABC123/",
    ]));
    let pipeline = pipeline(
        PlatformSpec::instagram(),
        gateway.clone(),
        store.clone(),
        prober,
        GuildEmbedSettings::default(),
    );

    pipeline
        .process_item(&item("https://instagram.com/p/ABC123/", "ABC123"))
        .await
        .unwrap();

    let records = store.records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, ValidationStatus::Success);
    assert_eq!(
        records[0].embedded_url.as_deref(),
        Some("https://ddinstagram.com/p/ABC123/")
    );
    assert_eq!(records[0].prefix_used.as_deref(), Some("dd"));
    assert!(records[0].error.is_none());
    assert_eq!(store.actions(), vec!["url_embedded"]);
    // Suppress-then-reply in regular mode.
    assert_eq!(*gateway.suppressed.lock().unwrap(), vec![MESSAGE]);
    assert_eq!(
        *gateway.replies.lock().unwrap(),
        vec!["https://ddinstagram.com/p/ABC123/".to_string()]
    );
}

#[tokio::test]
async fn candidates_probed_in_priority_order() {
    let gateway = Arc::new(MockGateway::replying());
    let store = Arc::new(MockStore::with_configs(vec![
        config("dd", EmbedType::Prefix, 1),
        config("kk", EmbedType::Prefix, 2),
        config("zz", EmbedType::Prefix, 3),
    ]));
    let prober = Arc::new(ScriptedProber::reaching(&[
        "https://kkinstagram.com/p/ABC123/",
    ]));
    let pipeline = pipeline(
        PlatformSpec::instagram(),
        gateway,
        store.clone(),
        prober.clone(),
        GuildEmbedSettings::default(),
    );

    pipeline
        .process_item(&item("https://instagram.com/p/ABC123/", "ABC123"))
        .await
        .unwrap();

    // Third candidate is never probed once the second validates.
    assert_eq!(
        *prober.probed.lock().unwrap(),
        vec![
            "https://ddinstagram.com/p/ABC123/".to_string(),
            "https://kkinstagram.com/p/ABC123/".to_string(),
        ]
    );
    let records = store.records.lock().unwrap();
    assert_eq!(records[0].prefix_used.as_deref(), Some("kk"));
}

#[tokio::test]
async fn exhaustion_writes_one_failed_record() {
    let gateway = Arc::new(MockGateway::replying());
    let store = Arc::new(MockStore::with_configs(vec![
        config("dd", EmbedType::Prefix, 1),
        config("kk", EmbedType::Prefix, 2),
    ]));
    let prober = Arc::new(ScriptedProber::default());
    let pipeline = pipeline(
        PlatformSpec::instagram(),
        gateway.clone(),
        store.clone(),
        prober,
        GuildEmbedSettings::default(),
    );

    pipeline
        .process_item(&item("https://instagram.com/p/ABC123/", "ABC123"))
        .await
        .unwrap();

    let records = store.records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, ValidationStatus::Failed);
    assert_eq!(records[0].error.as_deref(), Some("HTTP 404"));
    assert!(records[0].embedded_url.is_none());
    assert_eq!(store.actions(), vec!["validation_failed"]);
    // The warning reply carries the original URL.
    let replies = gateway.replies.lock().unwrap();
    assert_eq!(replies.len(), 1);
    assert!(replies[0].contains("https://instagram.com/p/ABC123/"));
}

#[tokio::test]
async fn no_configs_aborts_without_a_record() {
    let gateway = Arc::new(MockGateway::replying());
    let store = Arc::new(MockStore::default());
    let prober = Arc::new(ScriptedProber::default());
    let pipeline = pipeline(
        PlatformSpec::instagram(),
        gateway.clone(),
        store.clone(),
        prober.clone(),
        GuildEmbedSettings::default(),
    );

    pipeline
        .process_item(&item("https://instagram.com/p/ABC123/", "ABC123"))
        .await
        .unwrap();

    assert!(store.records.lock().unwrap().is_empty());
    assert!(prober.probed.lock().unwrap().is_empty());
    assert!(gateway.replies.lock().unwrap().is_empty());
}

#[tokio::test]
async fn instagram_reply_substitutes_url_in_full_content() {
    let gateway = Arc::new(MockGateway::replying());
    let store = Arc::new(MockStore::with_configs(vec![config(
        "dd",
        EmbedType::Prefix,
        1,
    )]));
    let prober = Arc::new(ScriptedProber::reaching(&[
        "https://ddinstagram.com/p/ABC123/",
    ]));
    let pipeline = pipeline(
        PlatformSpec::instagram(),
        gateway.clone(),
        store,
        prober,
        GuildEmbedSettings::default(),
    );

    let mut job = item("https://instagram.com/p/ABC123/", "ABC123");
    job.message.content = "look at this https://instagram.com/p/ABC123/ wow".into();

    pipeline.process_item(&job).await.unwrap();

    assert_eq!(
        *gateway.replies.lock().unwrap(),
        vec!["look at this https://ddinstagram.com/p/ABC123/ wow".to_string()]
    );
}

#[tokio::test]
async fn already_embedded_reacts_and_never_records() {
    let gateway = Arc::new(MockGateway::replying());
    let store = Arc::new(MockStore::with_configs(vec![config(
        "dd",
        EmbedType::Prefix,
        1,
    )]));
    let prober = Arc::new(ScriptedProber::default());
    let pipeline = pipeline(
        PlatformSpec::instagram(),
        gateway.clone(),
        store.clone(),
        prober.clone(),
        GuildEmbedSettings::default(),
    );
    let (queue, mut receiver) = ValidationQueue::new(QueueOptions::default());

    pipeline
        .inspect(
            &message("https://ddinstagram.com/p/ABC123/"),
            &queue,
        )
        .await
        .unwrap();

    assert_eq!(*gateway.reactions.lock().unwrap(), vec!["🙏".to_string()]);
    assert_eq!(store.actions(), vec!["url_detected", "already_embedded"]);
    assert!(store.records.lock().unwrap().is_empty());
    assert!(prober.probed.lock().unwrap().is_empty());
    assert!(receiver.try_recv().is_err());
}

#[tokio::test]
async fn inspect_enqueues_unembedded_url() {
    let gateway = Arc::new(MockGateway::replying());
    let store = Arc::new(MockStore::with_configs(vec![config(
        "dd",
        EmbedType::Prefix,
        1,
    )]));
    let prober = Arc::new(ScriptedProber::default());
    let pipeline = pipeline(
        PlatformSpec::instagram(),
        gateway,
        store.clone(),
        prober,
        GuildEmbedSettings::default(),
    );
    let (queue, mut receiver) = ValidationQueue::new(QueueOptions::default());

    pipeline
        .inspect(&message("https://instagram.com/p/ABC123/"), &queue)
        .await
        .unwrap();

    let queued = receiver.try_recv().unwrap();
    assert_eq!(queued.original_url, "https://instagram.com/p/ABC123/");
    assert_eq!(queued.post_id, "ABC123");
    assert_eq!(store.actions(), vec!["url_detected"]);
}

#[tokio::test]
async fn restriction_gate_short_circuits_probing() {
    let gateway = Arc::new(MockGateway::replying());
    let store = Arc::new(MockStore::with_configs(vec![config(
        "fxtwitter.com",
        EmbedType::Replacement,
        1,
    )]));
    let prober = Arc::new(ScriptedProber::default());
    let pipeline = pipeline(
        PlatformSpec::twitter(Arc::new(FixedGate(RestrictionVerdict::Restricted))),
        gateway.clone(),
        store.clone(),
        prober.clone(),
        GuildEmbedSettings::default(),
    );

    pipeline
        .process_item(&item("https://twitter.com/user/status/123", "123"))
        .await
        .unwrap();

    assert!(prober.probed.lock().unwrap().is_empty());
    let records = store.records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, ValidationStatus::Failed);
    assert_eq!(records[0].error.as_deref(), Some("Content is age-restricted"));
    assert_eq!(store.actions(), vec!["validation_failed"]);
    assert_eq!(
        *gateway.replies.lock().unwrap(),
        vec![GuildEmbedSettings::default().restricted_warning_message]
    );
}

#[tokio::test]
async fn silenced_restriction_warning_records_but_stays_quiet() {
    let gateway = Arc::new(MockGateway::replying());
    let store = Arc::new(MockStore::with_configs(vec![config(
        "fxtwitter.com",
        EmbedType::Replacement,
        1,
    )]));
    let prober = Arc::new(ScriptedProber::default());
    let pipeline = pipeline(
        PlatformSpec::twitter(Arc::new(FixedGate(RestrictionVerdict::Restricted))),
        gateway.clone(),
        store.clone(),
        prober,
        GuildEmbedSettings {
            silence_restricted_warning: true,
            ..GuildEmbedSettings::default()
        },
    );

    pipeline
        .process_item(&item("https://twitter.com/user/status/123", "123"))
        .await
        .unwrap();

    assert_eq!(store.records.lock().unwrap().len(), 1);
    assert!(gateway.replies.lock().unwrap().is_empty());
}

#[tokio::test]
async fn webhook_mode_reposts_and_deletes_original() {
    let gateway = Arc::new(MockGateway::with_webhooks());
    let store = Arc::new(MockStore::with_configs(vec![config(
        "dd",
        EmbedType::Prefix,
        1,
    )]));
    let prober = Arc::new(ScriptedProber::reaching(&[
        "https://ddinstagram.com/p/ABC123/",
    ]));
    let pipeline = pipeline(
        PlatformSpec::instagram(),
        gateway.clone(),
        store.clone(),
        prober,
        GuildEmbedSettings {
            webhook_repost_enabled: true,
            ..GuildEmbedSettings::default()
        },
    );

    pipeline
        .process_item(&item("https://instagram.com/p/ABC123/", "ABC123"))
        .await
        .unwrap();

    assert_eq!(
        *gateway.reposted.lock().unwrap(),
        vec!["https://ddinstagram.com/p/ABC123/".to_string()]
    );
    assert_eq!(*gateway.deleted.lock().unwrap(), vec![MESSAGE]);
    assert!(gateway.replies.lock().unwrap().is_empty());
    let records = store.records.lock().unwrap();
    assert_eq!(records[0].webhook_message_id, Some(902));
    assert_eq!(store.actions(), vec!["webhook_repost"]);
}

#[tokio::test]
async fn webhook_failure_falls_back_to_reply() {
    let gateway = Arc::new(MockGateway {
        webhook_supported: true,
        fail_repost: true,
        ..MockGateway::default()
    });
    let store = Arc::new(MockStore::with_configs(vec![config(
        "dd",
        EmbedType::Prefix,
        1,
    )]));
    let prober = Arc::new(ScriptedProber::reaching(&[
        "https://ddinstagram.com/p/ABC123/",
    ]));
    let pipeline = pipeline(
        PlatformSpec::instagram(),
        gateway.clone(),
        store.clone(),
        prober,
        GuildEmbedSettings {
            webhook_repost_enabled: true,
            ..GuildEmbedSettings::default()
        },
    );

    pipeline
        .process_item(&item("https://instagram.com/p/ABC123/", "ABC123"))
        .await
        .unwrap();

    assert!(gateway.deleted.lock().unwrap().is_empty());
    assert_eq!(gateway.replies.lock().unwrap().len(), 1);
    let records = store.records.lock().unwrap();
    assert_eq!(records[0].status, ValidationStatus::Success);
    assert!(records[0].webhook_message_id.is_none());
    assert_eq!(store.actions(), vec!["url_embedded"]);
}

#[tokio::test]
async fn persistent_permission_failure_abandons_with_failed_record() {
    let gateway = Arc::new(MockGateway {
        reply_error: Some(GatewayErrorKind::PermissionDenied(
            "missing send messages".into(),
        )),
        ..MockGateway::default()
    });
    let store = Arc::new(MockStore::with_configs(vec![
        config("dd", EmbedType::Prefix, 1),
        config("kk", EmbedType::Prefix, 2),
    ]));
    let prober = Arc::new(ScriptedProber::reaching(&[
        "https://ddinstagram.com/p/ABC123/",
    ]));
    let pipeline = pipeline(
        PlatformSpec::instagram(),
        gateway,
        store.clone(),
        prober.clone(),
        GuildEmbedSettings::default(),
    );

    pipeline
        .process_item(&item("https://instagram.com/p/ABC123/", "ABC123"))
        .await
        .unwrap();

    // Remaining candidates are not tried after an abandoned side effect.
    assert_eq!(prober.probed.lock().unwrap().len(), 1);
    let records = store.records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, ValidationStatus::Failed);
    assert!(
        records[0]
            .error
            .as_deref()
            .unwrap()
            .contains("Missing permissions")
    );
}

#[tokio::test]
async fn record_insert_is_once_per_message_id() {
    let store = MockStore::default();
    let record = TransformRecord {
        message_id: MESSAGE,
        channel_id: CHANNEL,
        server_id: GUILD,
        user_id: AUTHOR,
        original_url: "https://instagram.com/p/ABC123/".into(),
        embedded_url: Some("https://ddinstagram.com/p/ABC123/".into()),
        prefix_used: Some("dd".into()),
        status: ValidationStatus::Success,
        error: None,
        webhook_message_id: None,
    };

    store.record_transform(&record).await.unwrap();
    store.record_transform(&record).await.unwrap();

    assert_eq!(store.records.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn dedup_window_coalesces_repeated_urls_across_message_ids() {
    let (queue, mut receiver) = ValidationQueue::new(QueueOptions {
        dedup_window: Some(Duration::from_secs(60)),
    });

    let first = item("https://instagram.com/p/ABC123/", "ABC123");
    let mut repost = item("https://instagram.com/p/ABC123/", "ABC123");
    repost.message.message_id = MESSAGE + 1;

    assert!(queue.enqueue(first));
    // A repost of the same URL arrives under a fresh message id; the
    // window still coalesces it.
    assert!(!queue.enqueue(repost));

    // A different URL, and the same URL in another guild, both pass.
    let mut other_url = item("https://instagram.com/p/XYZ789/", "XYZ789");
    other_url.message.message_id = MESSAGE + 2;
    assert!(queue.enqueue(other_url));

    let mut other_guild = item("https://instagram.com/p/ABC123/", "ABC123");
    other_guild.message.message_id = MESSAGE + 3;
    other_guild.message.guild_id = GUILD + 1;
    assert!(queue.enqueue(other_guild));

    assert!(receiver.try_recv().is_ok());
    assert!(receiver.try_recv().is_ok());
    assert!(receiver.try_recv().is_ok());
    assert!(receiver.try_recv().is_err());
}

#[tokio::test]
async fn dedup_disabled_queues_every_detection() {
    let (queue, mut receiver) = ValidationQueue::new(QueueOptions::default());

    let first = item("https://instagram.com/p/ABC123/", "ABC123");
    let mut repost = item("https://instagram.com/p/ABC123/", "ABC123");
    repost.message.message_id = MESSAGE + 1;

    assert!(queue.enqueue(first));
    assert!(queue.enqueue(repost));
    assert!(receiver.try_recv().is_ok());
    assert!(receiver.try_recv().is_ok());
}

#[tokio::test(start_paused = true)]
async fn worker_survives_store_failures() {
    let gateway = Arc::new(MockGateway::replying());
    let store = Arc::new(MockStore {
        configs: vec![config("dd", EmbedType::Prefix, 1)],
        fail_record: true,
        ..MockStore::default()
    });
    let prober = Arc::new(ScriptedProber::default());
    let pipeline = Arc::new(pipeline(
        PlatformSpec::instagram(),
        gateway,
        store,
        prober.clone(),
        GuildEmbedSettings::default(),
    ));
    let (queue, receiver) = ValidationQueue::new(QueueOptions::default());

    let worker = tokio::spawn(run_worker(pipeline, receiver));

    assert!(queue.enqueue(item("https://instagram.com/p/AAA111/", "AAA111")));
    assert!(queue.enqueue(item("https://instagram.com/p/BBB222/", "BBB222")));
    drop(queue);
    worker.await.unwrap();

    // Both items ran to completion despite every insert failing.
    assert_eq!(prober.probed.lock().unwrap().len(), 2);
}

mod notifier {
    use super::*;

    const WEBHOOK_MESSAGE: i64 = 902;

    fn tracked_store() -> Arc<MockStore> {
        Arc::new(MockStore {
            webhook_authors: vec![(WEBHOOK_MESSAGE, AUTHOR)],
            ..MockStore::default()
        })
    }

    fn notifier(
        gateway: Arc<MockGateway>,
        store: Arc<MockStore>,
        settings: GuildEmbedSettings,
    ) -> ReplyNotifier {
        ReplyNotifier::new(gateway, store, settings_client(settings))
    }

    fn reply_from(author_id: i64) -> MessageRef {
        MessageRef {
            author_id,
            ..message("nice post")
        }
    }

    #[tokio::test]
    async fn mentions_original_author() {
        let gateway = Arc::new(MockGateway::replying());
        let notifier = notifier(
            gateway.clone(),
            tracked_store(),
            GuildEmbedSettings::default(),
        );

        notifier.handle_reply(&reply_from(555), WEBHOOK_MESSAGE).await;

        assert_eq!(
            *gateway.replies.lock().unwrap(),
            vec![format!("<@{AUTHOR}>")]
        );
    }

    #[tokio::test]
    async fn untracked_reference_is_ignored() {
        let gateway = Arc::new(MockGateway::replying());
        let notifier = notifier(
            gateway.clone(),
            Arc::new(MockStore::default()),
            GuildEmbedSettings::default(),
        );

        notifier.handle_reply(&reply_from(555), WEBHOOK_MESSAGE).await;

        assert!(gateway.replies.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn disabled_notifications_skip_mention() {
        let gateway = Arc::new(MockGateway::replying());
        let notifier = notifier(
            gateway.clone(),
            tracked_store(),
            GuildEmbedSettings {
                webhook_reply_notifications: false,
                ..GuildEmbedSettings::default()
            },
        );

        notifier.handle_reply(&reply_from(555), WEBHOOK_MESSAGE).await;

        assert!(gateway.replies.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn self_reply_skipped_by_default() {
        let gateway = Arc::new(MockGateway::replying());
        let notifier = notifier(
            gateway.clone(),
            tracked_store(),
            GuildEmbedSettings::default(),
        );

        notifier.handle_reply(&reply_from(AUTHOR), WEBHOOK_MESSAGE).await;

        assert!(gateway.replies.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn self_reply_mentions_when_enabled() {
        let gateway = Arc::new(MockGateway::replying());
        let notifier = notifier(
            gateway.clone(),
            tracked_store(),
            GuildEmbedSettings {
                notify_self_replies: true,
                ..GuildEmbedSettings::default()
            },
        );

        notifier.handle_reply(&reply_from(AUTHOR), WEBHOOK_MESSAGE).await;

        assert_eq!(
            *gateway.replies.lock().unwrap(),
            vec![format!("<@{AUTHOR}>")]
        );
    }
}
