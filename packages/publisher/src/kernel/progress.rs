//! In-process pub/sub hub for observing publish runs.
//!
//! Provides run-keyed broadcast channels. Observers can watch a run move
//! through its stages; they cannot influence or cancel it.
//!
//! # Usage
//!
//! Observers subscribe before handing the run to the publisher:
//!   let mut rx = hub.subscribe(run.id()).await;
//!
//! The pipeline stages publish on every transition:
//!   hub.publish(&run.advance(Stage::Upload, "Uploading video...")).await;

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::domains::upload::RunProgress;

/// Run-keyed progress hub.
///
/// Thread-safe, cloneable.
#[derive(Clone)]
pub struct ProgressHub {
    channels: Arc<RwLock<HashMap<Uuid, broadcast::Sender<RunProgress>>>>,
    capacity: usize,
}

impl ProgressHub {
    /// Create a new ProgressHub with default capacity (64 updates per run).
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            capacity,
        }
    }

    /// Publish an update for its run. No-op if nobody is watching.
    pub async fn publish(&self, progress: &RunProgress) {
        let channels = self.channels.read().await;
        if let Some(tx) = channels.get(&progress.run_id) {
            // No active receivers is fine
            let _ = tx.send(progress.clone());
        }
    }

    /// Watch a run. Creates the channel if it doesn't exist.
    pub async fn subscribe(&self, run_id: Uuid) -> broadcast::Receiver<RunProgress> {
        let mut channels = self.channels.write().await;
        let tx = channels
            .entry(run_id)
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        tx.subscribe()
    }

    /// Drop the channel of a finished run.
    pub async fn close(&self, run_id: Uuid) {
        self.channels.write().await.remove(&run_id);
    }

    /// Remove channels with zero subscribers (housekeeping).
    pub async fn cleanup(&self) {
        let mut channels = self.channels.write().await;
        channels.retain(|_, tx| tx.receiver_count() > 0);
    }
}

impl Default for ProgressHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::upload::Stage;

    fn progress(run_id: Uuid, stage: Stage) -> RunProgress {
        RunProgress {
            run_id,
            stage,
            status_message: format!("{:?}", stage),
        }
    }

    #[tokio::test]
    async fn test_subscriber_sees_updates_in_order() {
        let hub = ProgressHub::new();
        let run_id = Uuid::new_v4();
        let mut rx = hub.subscribe(run_id).await;

        hub.publish(&progress(run_id, Stage::Upload)).await;
        hub.publish(&progress(run_id, Stage::ModerationCheck)).await;

        assert_eq!(rx.recv().await.unwrap().stage, Stage::Upload);
        assert_eq!(rx.recv().await.unwrap().stage, Stage::ModerationCheck);
    }

    #[tokio::test]
    async fn test_updates_are_scoped_to_their_run() {
        let hub = ProgressHub::new();
        let watched = Uuid::new_v4();
        let other = Uuid::new_v4();
        let mut rx = hub.subscribe(watched).await;

        hub.publish(&progress(other, Stage::Upload)).await;
        hub.publish(&progress(watched, Stage::Transcode)).await;

        let received = rx.recv().await.unwrap();
        assert_eq!(received.run_id, watched);
        assert_eq!(received.stage, Stage::Transcode);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_noop() {
        let hub = ProgressHub::new();
        hub.publish(&progress(Uuid::new_v4(), Stage::Upload)).await;
        assert!(hub.channels.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_cleanup_and_close_remove_channels() {
        let hub = ProgressHub::new();
        let dropped = Uuid::new_v4();
        let kept = Uuid::new_v4();

        let rx = hub.subscribe(dropped).await;
        let _kept_rx = hub.subscribe(kept).await;
        drop(rx);
        hub.cleanup().await;
        assert_eq!(hub.channels.read().await.len(), 1);

        hub.close(kept).await;
        assert!(hub.channels.read().await.is_empty());
    }
}
