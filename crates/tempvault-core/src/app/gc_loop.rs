//! GCLoop - 期限切れ artifact の定期削除
//!
//! # フロー
//! 1. interval ごとに `ArtifactStore::purge_expired()` を呼ぶ
//! 2. エラーや panic はログに残して次のサイクルへ（ループは止めない）
//! 3. `GCHandle::shutdown()` で停止

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{Instant, MissedTickBehavior};

use crate::ports::ArtifactStore;

/// Shortest interval the loop will tick at.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Result of one sweep cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepOutcome {
    /// The sweep finished and removed this many records.
    Swept(usize),
    /// The store reported an error; cleanup is deferred to the next cycle.
    Failed(String),
    /// The sweep panicked; cleanup is deferred to the next cycle.
    Panicked(String),
}

/// GCLoop は期限切れの artifact を定期的に削除
///
/// The first sweep runs one interval after start, then every interval.
/// A failing cycle never ends the loop; `get` expires records lazily in the
/// meantime.
pub struct GCLoop {
    store: Arc<dyn ArtifactStore>,
    interval: Duration,
}

impl GCLoop {
    pub fn new(store: Arc<dyn ArtifactStore>, interval: Duration) -> Self {
        Self {
            store,
            interval: interval.max(MIN_INTERVAL),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start the loop on the current tokio runtime.
    pub fn spawn(self) -> GCHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(shutdown_rx));
        GCHandle { shutdown_tx, task }
    }

    /// Run until `shutdown` flips to `true` or its sender is dropped.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(interval_secs = self.interval.as_secs_f64(), "artifact GC loop started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sweep_once();
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("artifact GC loop stopped");
    }

    /// One sweep cycle. Errors and panics are logged and reported, never
    /// propagated.
    pub fn sweep_once(&self) -> SweepOutcome {
        let store = &self.store;
        match panic::catch_unwind(AssertUnwindSafe(|| store.purge_expired())) {
            Ok(Ok(removed)) => {
                tracing::debug!(removed, remaining = store.count(), "GC sweep finished");
                SweepOutcome::Swept(removed)
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "GC sweep failed, retrying next cycle");
                SweepOutcome::Failed(e.to_string())
            }
            Err(payload) => {
                let msg = if let Some(s) = payload.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = payload.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "unknown panic".to_string()
                };
                tracing::error!(panic = %msg, "GC sweep panicked, retrying next cycle");
                SweepOutcome::Panicked(msg)
            }
        }
    }
}

/// Handle to a running GC loop.
///
/// Dropping the handle also stops the loop.
pub struct GCHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl GCHandle {
    /// Signal the loop to stop and wait for it to exit.
    pub async fn shutdown(self) -> Result<(), JoinError> {
        let _ = self.shutdown_tx.send(true);
        self.task.await
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
