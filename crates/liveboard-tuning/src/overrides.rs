//! Per-entity override payloads.
//!
//! Every field is optional; unset fields leave the entity untouched.
//! Custom-field maps merge key-by-key instead of replacing the whole
//! map, so several rules can each contribute their own keys.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use liveboard_model::{
    AwardsSettings, ContestInfo, GroupId, GroupInfo, ManualAward, MedalTier, OrganizationId,
    OrganizationInfo, PenaltyRoundingMode, ProblemInfo, ScoreMergeMode, TeamInfo, TeamMediaType,
};

/// Field overrides for one team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TeamOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<GroupId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<OrganizationId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_out_of_contest: Option<bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_fields: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub medias: BTreeMap<TeamMediaType, String>,
}

impl TeamOverride {
    pub fn apply_to(&self, team: &mut TeamInfo) {
        if let Some(v) = &self.full_name {
            team.full_name = v.clone();
        }
        if let Some(v) = &self.display_name {
            team.display_name = v.clone();
        }
        if let Some(v) = &self.groups {
            team.groups = v.clone();
        }
        if let Some(v) = &self.organization_id {
            team.organization_id = Some(v.clone());
        }
        if let Some(v) = &self.hash_tag {
            team.hash_tag = Some(v.clone());
        }
        if let Some(v) = self.is_hidden {
            team.is_hidden = v;
        }
        if let Some(v) = self.is_out_of_contest {
            team.is_out_of_contest = v;
        }
        for (k, v) in &self.custom_fields {
            team.custom_fields.insert(k.clone(), v.clone());
        }
        for (k, v) in &self.medias {
            team.medias.insert(*k, v.clone());
        }
    }
}

/// Field overrides for one problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProblemOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordinal: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_score: Option<f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_fields: BTreeMap<String, String>,
}

impl ProblemOverride {
    pub fn apply_to(&self, problem: &mut ProblemInfo) {
        if let Some(v) = &self.display_name {
            problem.display_name = v.clone();
        }
        if let Some(v) = &self.full_name {
            problem.full_name = v.clone();
        }
        if let Some(v) = self.ordinal {
            problem.ordinal = v;
        }
        if let Some(v) = &self.color {
            problem.color = Some(v.clone());
        }
        if let Some(v) = self.max_score {
            problem.max_score = Some(v);
        }
        for (k, v) in &self.custom_fields {
            problem.custom_fields.insert(k.clone(), v.clone());
        }
    }
}

/// Field overrides for one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GroupOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_out_of_contest: Option<bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_fields: BTreeMap<String, String>,
}

impl GroupOverride {
    pub fn apply_to(&self, group: &mut GroupInfo) {
        if let Some(v) = &self.display_name {
            group.display_name = v.clone();
        }
        if let Some(v) = self.is_hidden {
            group.is_hidden = v;
        }
        if let Some(v) = self.is_out_of_contest {
            group.is_out_of_contest = v;
        }
        for (k, v) in &self.custom_fields {
            group.custom_fields.insert(k.clone(), v.clone());
        }
    }
}

/// Field overrides for one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrganizationOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_fields: BTreeMap<String, String>,
}

impl OrganizationOverride {
    pub fn apply_to(&self, org: &mut OrganizationInfo) {
        if let Some(v) = &self.display_name {
            org.display_name = v.clone();
        }
        if let Some(v) = &self.full_name {
            org.full_name = v.clone();
        }
        for (k, v) in &self.custom_fields {
            org.custom_fields.insert(k.clone(), v.clone());
        }
    }
}

/// Contest-level scalar overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ContestSettingsOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Offset from contest start, milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeze_time_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalty_rounding_mode: Option<PenaltyRoundingMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalty_per_wrong_attempt_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_merge_mode: Option<ScoreMergeMode>,
}

impl ContestSettingsOverride {
    pub fn apply_to(&self, info: &mut ContestInfo) {
        if let Some(v) = &self.name {
            info.name = v.clone();
        }
        if let Some(v) = self.freeze_time_ms {
            info.freeze_time = Some(Duration::from_millis(v));
        }
        if let Some(v) = self.penalty_rounding_mode {
            info.penalty_rounding_mode = v;
        }
        if let Some(v) = self.penalty_per_wrong_attempt_ms {
            info.penalty_per_wrong_attempt = Duration::from_millis(v);
        }
        if let Some(v) = self.score_merge_mode {
            info.score_merge_mode = v;
        }
    }
}

/// Award configuration overrides. List fields append to whatever the
/// source already declared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AwardsOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub champion_title: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub group_champion_titles: BTreeMap<GroupId, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank_award_max_rank: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub medal_tiers: Vec<MedalTier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub manual: Vec<ManualAward>,
}

impl AwardsOverride {
    pub fn apply_to(&self, awards: &mut AwardsSettings) {
        if let Some(v) = &self.champion_title {
            awards.champion_title = Some(v.clone());
        }
        for (k, v) in &self.group_champion_titles {
            awards.group_champion_titles.insert(k.clone(), v.clone());
        }
        if let Some(v) = self.rank_award_max_rank {
            awards.rank_award_max_rank = v;
        }
        awards.medal_tiers.extend(self.medal_tiers.iter().cloned());
        awards.manual.extend(self.manual.iter().cloned());
    }
}
