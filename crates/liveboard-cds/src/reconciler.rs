//! Turns periodic full-snapshot loads into an ordered update stream.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use liveboard_model::{ContestParseResult, ContestStatus, ContestUpdate, RunInfo};

use crate::source::{ContestDataSource, UpdateSender};

/// Poll-loop configuration for one source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReloadSettings {
    /// Fixed poll interval, also the retry delay after a failed load
    pub interval_ms: u64,
}

impl ReloadSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OverLatch {
    NotOver,
    JustOver,
    Latched,
}

/// Converts one loaded snapshot into the updates to emit for it.
///
/// Ordering per cycle: one info update, then all runs sorted by
/// `(time, id)` ascending, then all messages. The first snapshot that
/// reports `Over` is rewritten to `FakeRunning`; the real `Over` goes
/// out on the next cycle, after that cycle's runs. The latch is one-way
/// and fires once.
#[derive(Debug)]
pub struct SnapshotReconciler {
    latch: OverLatch,
}

impl Default for SnapshotReconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotReconciler {
    pub fn new() -> Self {
        Self {
            latch: OverLatch::NotOver,
        }
    }

    pub fn updates_for(&mut self, snapshot: ContestParseResult) -> Vec<ContestUpdate> {
        let ContestParseResult {
            mut info,
            mut runs,
            messages,
        } = snapshot;
        sort_runs(&mut runs);

        let delayed_over = info.status == ContestStatus::Over
            && match self.latch {
                OverLatch::NotOver => {
                    self.latch = OverLatch::JustOver;
                    info.status = ContestStatus::FakeRunning;
                    false
                }
                OverLatch::JustOver => {
                    self.latch = OverLatch::Latched;
                    true
                }
                OverLatch::Latched => false,
            };

        let mut updates = Vec::with_capacity(1 + runs.len() + messages.len());
        if !delayed_over {
            updates.push(ContestUpdate::Info(Box::new(info.clone())));
        }
        updates.extend(runs.into_iter().map(ContestUpdate::Run));
        updates.extend(messages.into_iter().map(ContestUpdate::Commentary));
        if delayed_over {
            updates.push(ContestUpdate::Info(Box::new(info)));
        }
        updates
    }
}

fn sort_runs(runs: &mut [RunInfo]) {
    runs.sort_by(|a, b| a.time.cmp(&b.time).then_with(|| a.id.cmp(&b.id)));
}

/// Runs the poll loop for one source until cancelled.
///
/// Transient load failures are logged and retried at the same interval,
/// forever. Structural failures stop the loop with an error.
pub fn spawn(
    source: Arc<dyn ContestDataSource>,
    settings: ReloadSettings,
    tx: UpdateSender,
    token: CancellationToken,
) -> JoinHandle<anyhow::Result<()>> {
    tokio::spawn(async move {
        let interval = settings.interval();
        let mut reconciler = SnapshotReconciler::new();
        info!(interval_ms = settings.interval_ms, "starting source poll loop");
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    info!("source cancelled");
                    return Ok(());
                }
                result = source.load_once() => match result {
                    Ok(snapshot) => {
                        for update in reconciler.updates_for(snapshot) {
                            if tx.send(update).await.is_err() {
                                debug!("update channel closed, stopping source");
                                return Ok(());
                            }
                        }
                    }
                    Err(err) if err.is_transient() => {
                        warn!(error = %err, "snapshot load failed, retrying at next interval");
                    }
                    Err(err) => {
                        error!(error = %err, "structural source failure");
                        return Err(err.into());
                    }
                }
            }
            tokio::select! {
                _ = token.cancelled() => {
                    info!("source cancelled");
                    return Ok(());
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }
    })
}
