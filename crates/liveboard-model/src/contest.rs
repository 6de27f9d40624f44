//! Contest-level entities: `ContestInfo` and the collections it carries.
//!
//! A `ContestInfo` is always replaced wholesale by an info update. Only
//! the multi-source merger ever unions two infos, and it does so by
//! building a fresh value.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::duration_ms;
use crate::id::{GroupId, LanguageId, OrganizationId, ProblemId, TeamId};

/// Contest lifecycle status.
///
/// `FakeRunning` is synthetic: the full-reload reconciler emits it for
/// exactly one poll cycle when a source first reports `Over`, so that
/// downstream freeze/reveal logic gets one extra interval of "still
/// running". Adapters themselves never produce it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContestStatus {
    /// Contest has not started yet
    Before,
    /// Contest is in progress
    Running,
    /// Contest is over upstream but still presented as running
    FakeRunning,
    /// Contest has ended
    Over,
    /// Results are final
    Finalized,
}

impl ContestStatus {
    /// True for statuses in which new runs are still expected.
    pub fn is_active(&self) -> bool {
        matches!(self, ContestStatus::Running | ContestStatus::FakeRunning)
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self, ContestStatus::Finalized)
    }
}

impl std::fmt::Display for ContestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContestStatus::Before => write!(f, "BEFORE"),
            ContestStatus::Running => write!(f, "RUNNING"),
            ContestStatus::FakeRunning => write!(f, "FAKE_RUNNING"),
            ContestStatus::Over => write!(f, "OVER"),
            ContestStatus::Finalized => write!(f, "FINALIZED"),
        }
    }
}

/// Scoring family of the contest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContestResultType {
    /// Solved count + time penalty
    Icpc,
    /// Partial scores summed per problem
    Ioi,
}

/// How submission times are turned into ICPC penalty minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyRoundingMode {
    /// Floor each accepted submission's time to a whole minute, then sum
    EachSubmissionDownToMinute,
    /// Ceil each accepted submission's time to a whole minute, then sum
    EachSubmissionUpToMinute,
    /// Sum exact times, floor the total once
    SumDownToMinute,
    /// Sum exact times, keep second precision
    SumInSeconds,
    /// Only the last accepted submission's time counts
    Last,
    /// No time-based penalty at all
    Zero,
}

/// How multiple IOI submissions to one problem combine into its score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoreMergeMode {
    /// Best total across submissions
    MaxTotal,
    /// Best score per test group, summed
    MaxPerGroup,
    /// Latest submission wins
    Last,
    /// Latest submission with a non-zero score wins
    LastOk,
    /// Every submission's score is added up
    Sum,
}

/// Kinds of media attached to a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TeamMediaType {
    Photo,
    Record,
    Camera,
    Screen,
    Achievement,
    ReactionVideo,
}

/// Medal color, used by default citation rendering downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MedalColor {
    Gold,
    Silver,
    Bronze,
}

/// What happens when a tie in the standings straddles a medal-tier
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MedalTiebreakMode {
    /// Every team tied with the last qualifying team gets the medal
    All,
    /// Exactly `count` teams qualify, cutting through the tie
    None,
}

impl Default for MedalTiebreakMode {
    fn default() -> Self {
        MedalTiebreakMode::All
    }
}

/// One medal tier. Tiers consume ranks in declared order, cumulatively:
/// the second tier starts where the first one stopped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedalTier {
    /// Stable award id, e.g. "gold-medal"
    pub id: String,
    /// Citation text shown with the award
    pub citation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<MedalColor>,
    /// Number of teams this tier nominally covers
    pub count: usize,
    /// Teams below this total score never medal, regardless of rank
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f64>,
    #[serde(default)]
    pub tiebreak_mode: MedalTiebreakMode,
}

/// An award granted to an explicit team list rather than computed from
/// the standings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualAward {
    pub id: String,
    pub citation: String,
    pub team_ids: Vec<TeamId>,
}

/// Award configuration for one contest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AwardsSettings {
    /// Citation for the rank-1 team(s); no winner award when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub champion_title: Option<String>,
    /// Per-group champion citations, keyed by group id
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub group_champion_titles: BTreeMap<GroupId, String>,
    /// Ranks 1..=N get a per-place custom award when N > 0
    #[serde(default)]
    pub rank_award_max_rank: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub medal_tiers: Vec<MedalTier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub manual: Vec<ManualAward>,
}

/// One contest problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemInfo {
    pub id: ProblemId,
    /// Short label, typically a letter
    pub display_name: String,
    pub full_name: String,
    /// Position on the scoreboard, ascending
    pub ordinal: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Maximum attainable score (IOI contests)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_score: Option<f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_fields: BTreeMap<String, String>,
}

/// One participating team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamInfo {
    pub id: TeamId,
    pub full_name: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<GroupId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<OrganizationId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_tag: Option<String>,
    /// Hidden teams are excluded from public scoreboards entirely
    #[serde(default)]
    pub is_hidden: bool,
    /// Out-of-contest teams are shown but hold no rank and win nothing
    #[serde(default)]
    pub is_out_of_contest: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_fields: BTreeMap<String, String>,
    /// Media URLs by kind (photo, webcam, screen capture, ...)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub medias: BTreeMap<TeamMediaType, String>,
}

/// A team grouping: a site, a division, an age bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInfo {
    pub id: GroupId,
    pub display_name: String,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub is_out_of_contest: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_fields: BTreeMap<String, String>,
}

/// A university, company, or other affiliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationInfo {
    pub id: OrganizationId,
    pub display_name: String,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_fields: BTreeMap<String, String>,
}

/// A submission language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageInfo {
    pub id: LanguageId,
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_fields: BTreeMap<String, String>,
}

/// The full contest description, replaced wholesale on every info
/// update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestInfo {
    pub name: String,
    pub status: ContestStatus,
    pub result_type: ContestResultType,
    pub start_time: DateTime<Utc>,
    #[serde(rename = "contestLengthMs", with = "duration_ms")]
    pub contest_length: Duration,
    /// Offset from contest start after which public rows are masked;
    /// `None` means the contest never freezes
    #[serde(
        rename = "freezeTimeMs",
        default,
        with = "duration_ms::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub freeze_time: Option<Duration>,
    pub problems: Vec<ProblemInfo>,
    pub teams: Vec<TeamInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<GroupInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub organizations: Vec<OrganizationInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<LanguageInfo>,
    pub penalty_rounding_mode: PenaltyRoundingMode,
    /// Added once per wrong attempt on a solved problem
    #[serde(rename = "penaltyPerWrongAttemptMs", with = "duration_ms")]
    pub penalty_per_wrong_attempt: Duration,
    /// How multiple IOI submissions combine (ignored for ICPC)
    pub score_merge_mode: ScoreMergeMode,
    #[serde(default)]
    pub awards: AwardsSettings,
    /// Playback speed when this info comes from an emulated feed
    #[serde(default = "default_emulation_speed")]
    pub emulation_speed: f64,
}

fn default_emulation_speed() -> f64 {
    1.0
}

impl ContestInfo {
    pub fn team(&self, id: &TeamId) -> Option<&TeamInfo> {
        self.teams.iter().find(|t| &t.id == id)
    }

    pub fn problem(&self, id: &ProblemId) -> Option<&ProblemInfo> {
        self.problems.iter().find(|p| &p.id == id)
    }

    pub fn group(&self, id: &GroupId) -> Option<&GroupInfo> {
        self.groups.iter().find(|g| &g.id == id)
    }

    /// Problems in scoreboard column order.
    pub fn problems_sorted(&self) -> Vec<&ProblemInfo> {
        let mut out: Vec<&ProblemInfo> = self.problems.iter().collect();
        out.sort_by_key(|p| p.ordinal);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_as_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&ContestStatus::FakeRunning).unwrap(),
            "\"FAKE_RUNNING\""
        );
        let back: ContestStatus = serde_json::from_str("\"OVER\"").unwrap();
        assert_eq!(back, ContestStatus::Over);
    }

    #[test]
    fn contest_length_serializes_as_milliseconds() {
        let info = ContestInfo {
            name: "Test".into(),
            status: ContestStatus::Running,
            result_type: ContestResultType::Icpc,
            start_time: DateTime::from_timestamp_millis(1_700_000_000_000).unwrap(),
            contest_length: Duration::from_secs(5 * 3600),
            freeze_time: Some(Duration::from_secs(4 * 3600)),
            problems: vec![],
            teams: vec![],
            groups: vec![],
            organizations: vec![],
            languages: vec![],
            penalty_rounding_mode: PenaltyRoundingMode::EachSubmissionDownToMinute,
            penalty_per_wrong_attempt: Duration::from_secs(20 * 60),
            score_merge_mode: ScoreMergeMode::MaxTotal,
            awards: AwardsSettings::default(),
            emulation_speed: 1.0,
        };
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["contestLengthMs"], 18_000_000);
        assert_eq!(value["freezeTimeMs"], 14_400_000);
        assert_eq!(value["penaltyPerWrongAttemptMs"], 1_200_000);
    }
}
