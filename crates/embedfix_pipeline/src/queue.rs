//! Validation queue and worker loop.

use crate::RewritePipeline;
use embedfix_cache::TtlCache;
use embedfix_core::MessageRef;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Fixed delay between processed items.
///
/// Serializing probes and platform writes with a pause keeps the bot under
/// platform abuse-detection thresholds. Delivery is deliberately not
/// real-time.
pub const VALIDATION_DELAY: Duration = Duration::from_millis(1500);

/// One queued validation job: the triggering message plus its detected URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationQueueItem {
    /// Snapshot of the triggering message.
    pub message: MessageRef,
    /// Detected original URL.
    pub original_url: String,
    /// Extracted post id.
    pub post_id: String,
}

/// Knobs for queue behavior.
#[derive(Debug, Clone, Default)]
pub struct QueueOptions {
    /// Coalesce enqueues of the same URL in the same guild seen within
    /// this window. Rapid reposts of one link arrive under distinct
    /// message ids, so the window keys on `(guild_id, original_url)`.
    /// `None` (the default) queues every detection independently.
    pub dedup_window: Option<Duration>,
}

/// Producer half of the validation queue.
///
/// Unbounded FIFO, safe for concurrent producers; the single consumer is
/// [`run_worker`]. Cloning shares the same queue.
#[derive(Clone)]
pub struct ValidationQueue {
    sender: mpsc::UnboundedSender<ValidationQueueItem>,
    recent: Option<Arc<std::sync::Mutex<TtlCache<(i64, String), ()>>>>,
}

impl ValidationQueue {
    /// Create a queue, returning the producer handle and the consumer end.
    pub fn new(options: QueueOptions) -> (Self, mpsc::UnboundedReceiver<ValidationQueueItem>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let recent = options
            .dedup_window
            .map(|window| Arc::new(std::sync::Mutex::new(TtlCache::new(window))));
        (Self { sender, recent }, receiver)
    }

    /// Enqueue a validation job.
    ///
    /// Returns `false` when the item was coalesced by the dedup window or
    /// the worker has shut down.
    pub fn enqueue(&self, item: ValidationQueueItem) -> bool {
        if let Some(recent) = &self.recent {
            let key = (item.message.guild_id, item.original_url.clone());
            let mut recent = recent.lock().unwrap_or_else(|e| e.into_inner());
            if recent.get(&key).is_some() {
                debug!(
                    guild_id = item.message.guild_id,
                    url = item.original_url,
                    "Coalesced duplicate enqueue within dedup window"
                );
                return false;
            }
            recent.insert(key, ());
        }
        self.sender.send(item).is_ok()
    }
}

/// Single-consumer worker loop.
///
/// Pops one item, runs it to its terminal outcome, sleeps the fixed delay,
/// and continues. A failure inside one item is logged and must never stop
/// the loop; the worker only returns once every producer handle is dropped.
pub async fn run_worker(
    pipeline: Arc<RewritePipeline>,
    mut receiver: mpsc::UnboundedReceiver<ValidationQueueItem>,
) {
    info!(platform = %pipeline.platform(), "Validation worker started");

    while let Some(item) = receiver.recv().await {
        if let Err(e) = pipeline.process_item(&item).await {
            error!(
                message_id = item.message.message_id,
                error = %e,
                "Error in validation worker"
            );
        }

        tokio::time::sleep(VALIDATION_DELAY).await;
    }

    info!(platform = %pipeline.platform(), "Validation worker stopped");
}
