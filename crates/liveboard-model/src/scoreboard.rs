//! Computed scoreboard shapes: per-team rows, ranking, awards.
//!
//! These are outputs of the calculator, never inputs to it; everything
//! here is derivable from `(ContestInfo, runs)`.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::contest::MedalColor;
use crate::duration_ms;
use crate::id::{GroupId, TeamId};

/// How pending (not yet judged) runs are scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptimismLevel {
    /// Pending runs are ignored
    Normal,
    /// Pending runs count as if ultimately accepted
    Optimistic,
    /// Pending runs count as failed attempts
    Pessimistic,
}

/// Per-problem cell of an ICPC scoreboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct IcpcProblemResult {
    /// Judged non-accepted attempts before the first accepted run, or
    /// all judged attempts if the problem is unsolved
    pub wrong_attempts: u32,
    pub pending_attempts: u32,
    pub is_solved: bool,
    pub is_first_to_solve: bool,
    /// Time of the latest counted submission; masked under freeze
    #[serde(
        rename = "lastSubmitTimeMs",
        default,
        with = "duration_ms::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_submit_time: Option<Duration>,
}

impl IcpcProblemResult {
    /// True if the team touched the problem at all.
    pub fn has_attempts(&self) -> bool {
        self.is_solved || self.wrong_attempts > 0 || self.pending_attempts > 0
    }
}

/// Per-problem cell of an IOI scoreboard row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct IoiProblemResult {
    /// Merged score, `None` when the team never submitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// First team to have reached this problem's current best score
    pub is_first_best: bool,
    #[serde(
        rename = "lastSubmitTimeMs",
        default,
        with = "duration_ms::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_submit_time: Option<Duration>,
}

/// One cell of a scoreboard row, shaped by the contest's result type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProblemResult {
    Icpc(IcpcProblemResult),
    Ioi(IoiProblemResult),
}

/// Aggregate standing of one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreboardRow {
    pub team_id: TeamId,
    /// Solved count (ICPC) or score sum (IOI)
    pub total_score: f64,
    /// Zero for IOI contests
    #[serde(rename = "penaltyMs", with = "duration_ms")]
    pub penalty: Duration,
    #[serde(
        rename = "lastAcceptedTimeMs",
        default,
        with = "duration_ms::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_accepted_time: Option<Duration>,
    /// One entry per problem, in scoreboard column order
    pub problem_results: Vec<ProblemResult>,
}

/// An award granted by the ranking step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Award {
    /// The rank-1 team(s)
    Winner {
        id: String,
        citation: String,
        teams: BTreeSet<TeamId>,
    },
    Medal {
        id: String,
        citation: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<MedalColor>,
        teams: BTreeSet<TeamId>,
    },
    /// Best-ranked in-contest team of one group
    GroupChampion {
        id: String,
        citation: String,
        group_id: GroupId,
        teams: BTreeSet<TeamId>,
    },
    Custom {
        id: String,
        citation: String,
        teams: BTreeSet<TeamId>,
    },
}

impl Award {
    pub fn id(&self) -> &str {
        match self {
            Award::Winner { id, .. }
            | Award::Medal { id, .. }
            | Award::GroupChampion { id, .. }
            | Award::Custom { id, .. } => id,
        }
    }

    pub fn citation(&self) -> &str {
        match self {
            Award::Winner { citation, .. }
            | Award::Medal { citation, .. }
            | Award::GroupChampion { citation, .. }
            | Award::Custom { citation, .. } => citation,
        }
    }

    pub fn teams(&self) -> &BTreeSet<TeamId> {
        match self {
            Award::Winner { teams, .. }
            | Award::Medal { teams, .. }
            | Award::GroupChampion { teams, .. }
            | Award::Custom { teams, .. } => teams,
        }
    }
}

/// Ranked view over a set of scoreboard rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Ranking {
    /// Team ids sorted best-first; out-of-contest teams excluded
    pub order: Vec<TeamId>,
    /// Standard competition rank per entry of `order` (ties share the
    /// rank, the next distinct result skips the tied slots)
    pub ranks: Vec<u32>,
    pub awards: Vec<Award>,
}

/// Whether a serialized scoreboard carries the full state or only
/// changed rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoreboardUpdateType {
    Snapshot,
    Diff,
}

/// The canonical wire shape handed to transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scoreboard {
    pub update_type: ScoreboardUpdateType,
    /// Rows aligned with `ranking.order`
    pub rows: Vec<ScoreboardRow>,
    pub ranking: Ranking,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn awards_expose_their_team_sets() {
        let award = Award::Medal {
            id: "gold-medal".into(),
            citation: "Gold Medal".into(),
            color: Some(MedalColor::Gold),
            teams: [TeamId::from("t1"), TeamId::from("t2")].into_iter().collect(),
        };
        assert_eq!(award.id(), "gold-medal");
        assert!(award.teams().contains(&TeamId::from("t1")));
    }

    #[test]
    fn untouched_problem_has_no_attempts() {
        assert!(!IcpcProblemResult::default().has_attempts());
        assert!(IcpcProblemResult {
            pending_attempts: 1,
            ..Default::default()
        }
        .has_attempts());
    }
}
