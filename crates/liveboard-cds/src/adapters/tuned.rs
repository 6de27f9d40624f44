//! Applies a tuning rule set to a stream.
//!
//! Only info updates are touched; runs and commentary pass through
//! untouched. A rule failure is a configuration error and stops the
//! stream, loudly.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use liveboard_model::ContestUpdate;
use liveboard_tuning::{RuleSet, TuningError};

use crate::source::{UpdateReceiver, UpdateSender};

/// Tunes one update.
pub fn tune_update(rules: &RuleSet, update: ContestUpdate) -> Result<ContestUpdate, TuningError> {
    match update {
        ContestUpdate::Info(contest_info) => Ok(ContestUpdate::Info(Box::new(
            rules.apply(*contest_info)?,
        ))),
        other => Ok(other),
    }
}

/// Pumps a stream through the rule set until cancelled or the input
/// closes.
pub fn spawn(
    rules: RuleSet,
    mut rx: UpdateReceiver,
    tx: UpdateSender,
    token: CancellationToken,
) -> JoinHandle<anyhow::Result<()>> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    info!("tuning adapter cancelled");
                    return Ok(());
                }
                received = rx.recv() => {
                    let Some(update) = received else {
                        debug!("input closed, stopping tuning adapter");
                        return Ok(());
                    };
                    match tune_update(&rules, update) {
                        Ok(update) => {
                            if tx.send(update).await.is_err() {
                                debug!("output closed, stopping tuning adapter");
                                return Ok(());
                            }
                        }
                        Err(err) => {
                            error!(error = %err, "tuning rule failed");
                            return Err(err.into());
                        }
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use liveboard_model::{
        AwardsSettings, ContestInfo, ContestResultType, ContestStatus, PenaltyRoundingMode,
        ScoreMergeMode, TeamId, TeamInfo,
    };
    use liveboard_tuning::{
        MatchField, PlaceholderPolicy, RegexOverrides, RegexRule, TeamOverride, TuningRule,
    };
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn info() -> ContestInfo {
        ContestInfo {
            name: "Test".into(),
            status: ContestStatus::Running,
            result_type: ContestResultType::Icpc,
            start_time: DateTime::from_timestamp_millis(0).unwrap(),
            contest_length: Duration::from_secs(5 * 3600),
            freeze_time: None,
            problems: vec![],
            teams: vec![TeamInfo {
                id: TeamId::from("t1"),
                full_name: "t1".into(),
                display_name: "t1".into(),
                groups: vec![],
                organization_id: None,
                hash_tag: None,
                is_hidden: false,
                is_out_of_contest: false,
                custom_fields: BTreeMap::new(),
                medias: BTreeMap::new(),
            }],
            groups: vec![],
            organizations: vec![],
            languages: vec![],
            penalty_rounding_mode: PenaltyRoundingMode::EachSubmissionDownToMinute,
            penalty_per_wrong_attempt: Duration::from_secs(20 * 60),
            score_merge_mode: ScoreMergeMode::MaxTotal,
            awards: AwardsSettings::default(),
            emulation_speed: 1.0,
        }
    }

    #[test]
    fn info_updates_are_tuned() {
        let rules = RuleSet {
            placeholder_policy: PlaceholderPolicy::Keep,
            rules: vec![TuningRule::OverrideTeams(RegexOverrides {
                match_field: MatchField::Id,
                rules: vec![RegexRule {
                    pattern: ".*".into(),
                    payload: TeamOverride {
                        display_name: Some("Renamed".into()),
                        ..Default::default()
                    },
                }],
            })],
        };
        let tuned = tune_update(&rules, ContestUpdate::Info(Box::new(info()))).unwrap();
        assert_eq!(tuned.as_info().unwrap().teams[0].display_name, "Renamed");
    }

    #[test]
    fn broken_rule_is_fatal() {
        let rules = RuleSet {
            placeholder_policy: PlaceholderPolicy::Keep,
            rules: vec![TuningRule::OverrideTeams(RegexOverrides {
                match_field: MatchField::Id,
                rules: vec![RegexRule {
                    pattern: "(".into(),
                    payload: TeamOverride::default(),
                }],
            })],
        };
        assert!(tune_update(&rules, ContestUpdate::Info(Box::new(info()))).is_err());
    }
}
