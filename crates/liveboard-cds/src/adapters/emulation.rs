//! Replaying a finished contest as a live feed.
//!
//! Useful for demos and for testing the downstream pipeline against a
//! real contest's data. Run times are divided by the speed multiplier
//! and the gaps between emissions are slept in real time, so a 5 hour
//! contest replayed at speed 10 takes half an hour.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use liveboard_model::{ContestParseResult, ContestStatus, ContestUpdate};

use crate::source::UpdateSender;

/// Virtual start and playback speed of one emulated feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmulationSettings {
    pub start_time: DateTime<Utc>,
    pub speed: f64,
}

/// The update timeline of one emulated contest: `(offset from virtual
/// start, update)`, ready to be slept through. Run and message times
/// are already divided by the speed multiplier.
pub fn timeline(result: ContestParseResult, settings: &EmulationSettings) -> Vec<(Duration, ContestUpdate)> {
    let ContestParseResult {
        info,
        mut runs,
        mut messages,
    } = result;
    runs.sort_by(|a, b| a.time.cmp(&b.time).then_with(|| a.id.cmp(&b.id)));
    messages.sort_by(|a, b| a.time.cmp(&b.time).then_with(|| a.id.cmp(&b.id)));

    let mut base = info;
    base.start_time = settings.start_time;
    base.emulation_speed = settings.speed;
    let scaled_length = base.contest_length.div_f64(settings.speed);

    let mut events = Vec::with_capacity(runs.len() + messages.len() + 2);
    let mut running = base.clone();
    running.status = ContestStatus::Running;
    events.push((Duration::ZERO, ContestUpdate::Info(Box::new(running))));
    for mut run in runs {
        run.time = run.time.div_f64(settings.speed);
        events.push((run.time, ContestUpdate::Run(run)));
    }
    for mut message in messages {
        message.time = message.time.div_f64(settings.speed);
        events.push((message.time, ContestUpdate::Commentary(message)));
    }
    events.sort_by_key(|(at, _)| *at);
    let mut over = base;
    over.status = ContestStatus::Over;
    events.push((scaled_length, ContestUpdate::Info(Box::new(over))));
    events
}

/// Spawns the replay. A `Before` info goes out immediately; the rest of
/// the timeline starts at the virtual start time.
pub fn spawn(
    result: ContestParseResult,
    settings: EmulationSettings,
    tx: UpdateSender,
    token: CancellationToken,
) -> JoinHandle<anyhow::Result<()>> {
    tokio::spawn(async move {
        info!(speed = settings.speed, "starting emulated feed");
        let mut before = result.info.clone();
        before.start_time = settings.start_time;
        before.emulation_speed = settings.speed;
        before.status = ContestStatus::Before;
        if tx
            .send(ContestUpdate::Info(Box::new(before)))
            .await
            .is_err()
        {
            return Ok(());
        }

        let until_start = (settings.start_time - Utc::now())
            .to_std()
            .unwrap_or(Duration::ZERO);
        let mut elapsed = Duration::ZERO;
        let mut wait = until_start;
        for (at, update) in timeline(result, &settings) {
            wait += at.saturating_sub(elapsed);
            elapsed = elapsed.max(at);
            tokio::select! {
                _ = token.cancelled() => {
                    info!("emulated feed cancelled");
                    return Ok(());
                }
                _ = tokio::time::sleep(wait) => {}
            }
            wait = Duration::ZERO;
            if tx.send(update).await.is_err() {
                debug!("update channel closed, stopping emulated feed");
                return Ok(());
            }
        }
        info!("emulated feed finished");
        Ok(())
    })
}
