//! Fan-out to independent downstream subscribers.
//!
//! One slow subscriber must not stall another, so live updates go out
//! through a bounded broadcast channel that drops its oldest entries
//! under sustained backpressure; dropped updates are only ever live
//! ones, and state is re-derivable. A new subscriber first gets a full
//! snapshot synthesized from the hub's reducer, then the live stream,
//! with no gap in between: snapshots are taken under the same lock that
//! orders publishes.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use liveboard_model::ContestUpdate;

use crate::source::UpdateReceiver;
use crate::state::ContestState;

struct HubInner {
    state: ContestState,
    sender: broadcast::Sender<ContestUpdate>,
}

/// The shared publish side. Cheap to clone.
#[derive(Clone)]
pub struct ContestEventHub {
    inner: Arc<RwLock<HubInner>>,
}

impl ContestEventHub {
    /// `capacity` bounds the per-subscriber live buffer; a subscriber
    /// further behind than that loses the oldest updates.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            inner: Arc::new(RwLock::new(HubInner {
                state: ContestState::new(),
                sender,
            })),
        }
    }

    /// Folds the update into the hub state and broadcasts it.
    pub async fn publish(&self, update: ContestUpdate) {
        let mut inner = self.inner.write().await;
        inner.state.apply(&update);
        // Err just means no subscriber is listening right now.
        let _ = inner.sender.send(update);
    }

    /// Attaches a subscriber: a full snapshot first, then every update
    /// published after the snapshot was taken.
    pub async fn subscribe(&self) -> Subscription {
        let inner = self.inner.read().await;
        Subscription {
            snapshot: inner.state.snapshot().into(),
            live: inner.sender.subscribe(),
        }
    }

    /// Pumps a source stream into the hub until cancelled or the stream
    /// closes.
    pub fn spawn_pump(
        &self,
        mut rx: UpdateReceiver,
        token: CancellationToken,
    ) -> JoinHandle<()> {
        let hub = self.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        info!("hub pump cancelled");
                        return;
                    }
                    received = rx.recv() => {
                        let Some(update) = received else {
                            debug!("source stream closed, stopping hub pump");
                            return;
                        };
                        hub.publish(update).await;
                    }
                }
            }
        })
    }
}

/// One subscriber's view: replayed snapshot, then live updates.
pub struct Subscription {
    snapshot: VecDeque<ContestUpdate>,
    live: broadcast::Receiver<ContestUpdate>,
}

impl Subscription {
    /// Next update, or `None` once the hub is gone and the buffer is
    /// drained. Lag is logged and skipped over, never an error.
    pub async fn next(&mut self) -> Option<ContestUpdate> {
        if let Some(update) = self.snapshot.pop_front() {
            return Some(update);
        }
        loop {
            match self.live.recv().await {
                Ok(update) => return Some(update),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "subscriber lagged, dropped oldest live updates");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liveboard_model::{ProblemId, RunId, RunInfo, RunResult, TeamId, Verdict};
    use std::time::Duration;

    fn run(id: &str) -> ContestUpdate {
        ContestUpdate::Run(RunInfo {
            id: RunId::from(id),
            result: RunResult::Icpc {
                verdict: Verdict::Accepted,
                is_first_to_solve: false,
            },
            problem_id: ProblemId::from("A"),
            team_id: TeamId::from("t1"),
            time: Duration::from_secs(600),
            language_id: None,
            is_hidden: false,
        })
    }

    fn run_id(update: &ContestUpdate) -> &str {
        match update {
            ContestUpdate::Run(run) => run.id.as_str(),
            _ => panic!("expected run update"),
        }
    }

    #[tokio::test]
    async fn late_subscriber_sees_snapshot_then_live() {
        let hub = ContestEventHub::new(16);
        hub.publish(run("1")).await;
        hub.publish(run("2")).await;
        let mut subscription = hub.subscribe().await;
        hub.publish(run("3")).await;

        assert_eq!(run_id(&subscription.next().await.unwrap()), "1");
        assert_eq!(run_id(&subscription.next().await.unwrap()), "2");
        assert_eq!(run_id(&subscription.next().await.unwrap()), "3");
    }

    #[tokio::test]
    async fn snapshot_deduplicates_replaced_runs() {
        let hub = ContestEventHub::new(16);
        hub.publish(run("1")).await;
        hub.publish(run("1")).await;
        let mut subscription = hub.subscribe().await;
        assert_eq!(run_id(&subscription.next().await.unwrap()), "1");
        // Nothing further buffered: next() would now wait on the live
        // channel, so only a timeout proves the snapshot is done.
        let pending =
            tokio::time::timeout(Duration::from_millis(10), subscription.next()).await;
        assert!(pending.is_err());
    }

    #[tokio::test]
    async fn independent_subscribers_get_independent_buffers() {
        let hub = ContestEventHub::new(16);
        let mut first = hub.subscribe().await;
        let mut second = hub.subscribe().await;
        hub.publish(run("1")).await;
        assert_eq!(run_id(&first.next().await.unwrap()), "1");
        assert_eq!(run_id(&second.next().await.unwrap()), "1");
    }
}
