//! Fan-in of several sub-feeds into one logical contest.
//!
//! Each sub-feed's updates are id-remapped with that feed's rules, then
//! forwarded. Info updates additionally refresh the feed's "last info"
//! slot and trigger a merged info built from all slots. Order is
//! preserved within a feed, unspecified across feeds.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use liveboard_model::{ContestInfo, ContestUpdate};

use crate::error::SourceError;
use crate::remap::{IdRemapper, RemapIds, RewriteSettings};
use crate::source::{UpdateReceiver, UpdateSender};

/// One inner feed of a merged contest.
pub struct SubFeed {
    pub updates: UpdateReceiver,
    pub rewrites: RewriteSettings,
}

/// Builds one contest info out of the per-feed slots: scalar fields from
/// the first non-empty slot, entity lists unioned over all slots with
/// first-feed-wins precedence on id collisions.
pub fn merge_infos(slots: &[Option<ContestInfo>]) -> Option<ContestInfo> {
    let mut merged = slots.iter().flatten().next()?.clone();
    merged.problems.clear();
    merged.teams.clear();
    merged.groups.clear();
    merged.organizations.clear();
    merged.languages.clear();
    for info in slots.iter().flatten() {
        for problem in &info.problems {
            if !merged.problems.iter().any(|p| p.id == problem.id) {
                merged.problems.push(problem.clone());
            }
        }
        for team in &info.teams {
            if !merged.teams.iter().any(|t| t.id == team.id) {
                merged.teams.push(team.clone());
            }
        }
        for group in &info.groups {
            if !merged.groups.iter().any(|g| g.id == group.id) {
                merged.groups.push(group.clone());
            }
        }
        for org in &info.organizations {
            if !merged.organizations.iter().any(|o| o.id == org.id) {
                merged.organizations.push(org.clone());
            }
        }
        for language in &info.languages {
            if !merged.languages.iter().any(|l| l.id == language.id) {
                merged.languages.push(language.clone());
            }
        }
    }
    Some(merged)
}

/// Spawns the merger over `feeds`. Rewrite rules are compiled up front,
/// so a bad pattern fails here instead of inside the running task.
pub fn spawn(
    feeds: Vec<SubFeed>,
    tx: UpdateSender,
    token: CancellationToken,
) -> Result<JoinHandle<anyhow::Result<()>>, SourceError> {
    let remappers: Vec<IdRemapper> = feeds
        .iter()
        .map(|feed| IdRemapper::compile(&feed.rewrites))
        .collect::<Result<_, _>>()?;

    Ok(tokio::spawn(async move {
        let feed_count = feeds.len();
        let (fan_tx, mut fan_rx) = mpsc::channel::<(usize, ContestUpdate)>(128);
        for (index, (feed, remapper)) in feeds.into_iter().zip(remappers).enumerate() {
            let fan_tx = fan_tx.clone();
            let mut updates = feed.updates;
            tokio::spawn(async move {
                while let Some(update) = updates.recv().await {
                    let update = update.remap_ids(&remapper);
                    if fan_tx.send((index, update)).await.is_err() {
                        break;
                    }
                }
                debug!(feed = index, "sub-feed finished");
            });
        }
        drop(fan_tx);

        let mut slots: Vec<Option<ContestInfo>> = vec![None; feed_count];
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    info!("merger cancelled");
                    return Ok(());
                }
                received = fan_rx.recv() => {
                    let Some((index, update)) = received else {
                        debug!("all sub-feeds finished, stopping merger");
                        return Ok(());
                    };
                    let outgoing = match update {
                        ContestUpdate::Info(new_info) => {
                            slots[index] = Some(*new_info);
                            match merge_infos(&slots) {
                                Some(merged) => ContestUpdate::Info(Box::new(merged)),
                                None => continue,
                            }
                        }
                        other => other,
                    };
                    if tx.send(outgoing).await.is_err() {
                        debug!("merged channel closed, stopping merger");
                        return Ok(());
                    }
                }
            }
        }
    }))
}
