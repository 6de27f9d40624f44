//! Per-feed identifier rewriting.
//!
//! Every payload type names its identifier-kinded fields in a
//! [`RemapIds`] impl with a full struct destructure, so adding a field
//! to a payload breaks compilation here instead of silently leaking an
//! unmapped id through the merger.

use regex::Regex;
use serde::{Deserialize, Serialize};

use liveboard_model::{
    AwardsSettings, CommentaryMessage, ContestInfo, ContestUpdate, GroupId, GroupInfo, LanguageId,
    LanguageInfo, ManualAward, OrganizationId, OrganizationInfo, ProblemId, ProblemInfo, RunId,
    RunInfo, TeamId, TeamInfo,
};

use crate::error::SourceError;

/// One `pattern -> replacement` rewrite, as configured per sub-feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteRule {
    pub pattern: String,
    pub replacement: String,
}

/// Configured rewrites for one sub-feed, one rule list per id kind.
/// An empty list leaves that kind untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RewriteSettings {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub teams: Vec<RewriteRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub problems: Vec<RewriteRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub runs: Vec<RewriteRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<RewriteRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub organizations: Vec<RewriteRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<RewriteRule>,
}

/// Compiled rewrite rules for one id kind. The first rule whose pattern
/// matches wins; a value no rule matches passes through unchanged.
#[derive(Debug, Clone, Default)]
pub struct RegexRewrite {
    rules: Vec<(Regex, String)>,
}

impl RegexRewrite {
    pub fn compile(rules: &[RewriteRule]) -> Result<Self, SourceError> {
        let compiled = rules
            .iter()
            .map(|rule| {
                Regex::new(&rule.pattern)
                    .map(|re| (re, rule.replacement.clone()))
                    .map_err(|err| {
                        SourceError::Configuration(format!(
                            "invalid rewrite pattern {:?}: {err}",
                            rule.pattern
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules: compiled })
    }

    fn rewrite(&self, value: &str) -> String {
        for (re, replacement) in &self.rules {
            if re.is_match(value) {
                return re.replace_all(value, replacement.as_str()).into_owned();
            }
        }
        value.to_string()
    }
}

/// All compiled rewrites of one sub-feed.
#[derive(Debug, Clone, Default)]
pub struct IdRemapper {
    pub teams: RegexRewrite,
    pub problems: RegexRewrite,
    pub runs: RegexRewrite,
    pub groups: RegexRewrite,
    pub organizations: RegexRewrite,
    pub languages: RegexRewrite,
}

impl IdRemapper {
    pub fn compile(settings: &RewriteSettings) -> Result<Self, SourceError> {
        Ok(Self {
            teams: RegexRewrite::compile(&settings.teams)?,
            problems: RegexRewrite::compile(&settings.problems)?,
            runs: RegexRewrite::compile(&settings.runs)?,
            groups: RegexRewrite::compile(&settings.groups)?,
            organizations: RegexRewrite::compile(&settings.organizations)?,
            languages: RegexRewrite::compile(&settings.languages)?,
        })
    }
}

/// Rewrites every identifier-typed value inside a payload.
pub trait RemapIds {
    fn remap_ids(self, remapper: &IdRemapper) -> Self;
}

impl RemapIds for TeamId {
    fn remap_ids(self, remapper: &IdRemapper) -> Self {
        TeamId::new(remapper.teams.rewrite(self.as_str()))
    }
}

impl RemapIds for ProblemId {
    fn remap_ids(self, remapper: &IdRemapper) -> Self {
        ProblemId::new(remapper.problems.rewrite(self.as_str()))
    }
}

impl RemapIds for RunId {
    fn remap_ids(self, remapper: &IdRemapper) -> Self {
        RunId::new(remapper.runs.rewrite(self.as_str()))
    }
}

impl RemapIds for GroupId {
    fn remap_ids(self, remapper: &IdRemapper) -> Self {
        GroupId::new(remapper.groups.rewrite(self.as_str()))
    }
}

impl RemapIds for OrganizationId {
    fn remap_ids(self, remapper: &IdRemapper) -> Self {
        OrganizationId::new(remapper.organizations.rewrite(self.as_str()))
    }
}

impl RemapIds for LanguageId {
    fn remap_ids(self, remapper: &IdRemapper) -> Self {
        LanguageId::new(remapper.languages.rewrite(self.as_str()))
    }
}

impl<T: RemapIds> RemapIds for Option<T> {
    fn remap_ids(self, remapper: &IdRemapper) -> Self {
        self.map(|value| value.remap_ids(remapper))
    }
}

impl<T: RemapIds> RemapIds for Vec<T> {
    fn remap_ids(self, remapper: &IdRemapper) -> Self {
        self.into_iter()
            .map(|value| value.remap_ids(remapper))
            .collect()
    }
}

impl RemapIds for RunInfo {
    fn remap_ids(self, remapper: &IdRemapper) -> Self {
        let RunInfo {
            id,
            result,
            problem_id,
            team_id,
            time,
            language_id,
            is_hidden,
        } = self;
        RunInfo {
            id: id.remap_ids(remapper),
            result,
            problem_id: problem_id.remap_ids(remapper),
            team_id: team_id.remap_ids(remapper),
            time,
            language_id: language_id.remap_ids(remapper),
            is_hidden,
        }
    }
}

impl RemapIds for TeamInfo {
    fn remap_ids(self, remapper: &IdRemapper) -> Self {
        let TeamInfo {
            id,
            full_name,
            display_name,
            groups,
            organization_id,
            hash_tag,
            is_hidden,
            is_out_of_contest,
            custom_fields,
            medias,
        } = self;
        TeamInfo {
            id: id.remap_ids(remapper),
            full_name,
            display_name,
            groups: groups.remap_ids(remapper),
            organization_id: organization_id.remap_ids(remapper),
            hash_tag,
            is_hidden,
            is_out_of_contest,
            custom_fields,
            medias,
        }
    }
}

impl RemapIds for ProblemInfo {
    fn remap_ids(self, remapper: &IdRemapper) -> Self {
        let ProblemInfo {
            id,
            display_name,
            full_name,
            ordinal,
            color,
            max_score,
            custom_fields,
        } = self;
        ProblemInfo {
            id: id.remap_ids(remapper),
            display_name,
            full_name,
            ordinal,
            color,
            max_score,
            custom_fields,
        }
    }
}

impl RemapIds for GroupInfo {
    fn remap_ids(self, remapper: &IdRemapper) -> Self {
        let GroupInfo {
            id,
            display_name,
            is_hidden,
            is_out_of_contest,
            custom_fields,
        } = self;
        GroupInfo {
            id: id.remap_ids(remapper),
            display_name,
            is_hidden,
            is_out_of_contest,
            custom_fields,
        }
    }
}

impl RemapIds for OrganizationInfo {
    fn remap_ids(self, remapper: &IdRemapper) -> Self {
        let OrganizationInfo {
            id,
            display_name,
            full_name,
            custom_fields,
        } = self;
        OrganizationInfo {
            id: id.remap_ids(remapper),
            display_name,
            full_name,
            custom_fields,
        }
    }
}

impl RemapIds for LanguageInfo {
    fn remap_ids(self, remapper: &IdRemapper) -> Self {
        let LanguageInfo {
            id,
            name,
            custom_fields,
        } = self;
        LanguageInfo {
            id: id.remap_ids(remapper),
            name,
            custom_fields,
        }
    }
}

impl RemapIds for ManualAward {
    fn remap_ids(self, remapper: &IdRemapper) -> Self {
        let ManualAward {
            id,
            citation,
            team_ids,
        } = self;
        ManualAward {
            id,
            citation,
            team_ids: team_ids.remap_ids(remapper),
        }
    }
}

impl RemapIds for AwardsSettings {
    fn remap_ids(self, remapper: &IdRemapper) -> Self {
        let AwardsSettings {
            champion_title,
            group_champion_titles,
            rank_award_max_rank,
            medal_tiers,
            manual,
        } = self;
        AwardsSettings {
            champion_title,
            group_champion_titles: group_champion_titles
                .into_iter()
                .map(|(group_id, title)| (group_id.remap_ids(remapper), title))
                .collect(),
            rank_award_max_rank,
            medal_tiers,
            manual: manual.remap_ids(remapper),
        }
    }
}

impl RemapIds for ContestInfo {
    fn remap_ids(self, remapper: &IdRemapper) -> Self {
        let ContestInfo {
            name,
            status,
            result_type,
            start_time,
            contest_length,
            freeze_time,
            problems,
            teams,
            groups,
            organizations,
            languages,
            penalty_rounding_mode,
            penalty_per_wrong_attempt,
            score_merge_mode,
            awards,
            emulation_speed,
        } = self;
        ContestInfo {
            name,
            status,
            result_type,
            start_time,
            contest_length,
            freeze_time,
            problems: problems.remap_ids(remapper),
            teams: teams.remap_ids(remapper),
            groups: groups.remap_ids(remapper),
            organizations: organizations.remap_ids(remapper),
            languages: languages.remap_ids(remapper),
            penalty_rounding_mode,
            penalty_per_wrong_attempt,
            score_merge_mode,
            awards: awards.remap_ids(remapper),
            emulation_speed,
        }
    }
}

impl RemapIds for CommentaryMessage {
    fn remap_ids(self, remapper: &IdRemapper) -> Self {
        let CommentaryMessage {
            id,
            message,
            time,
            team_ids,
            run_ids,
        } = self;
        CommentaryMessage {
            id,
            message,
            time,
            team_ids: team_ids.remap_ids(remapper),
            run_ids: run_ids.remap_ids(remapper),
        }
    }
}

impl RemapIds for ContestUpdate {
    fn remap_ids(self, remapper: &IdRemapper) -> Self {
        match self {
            ContestUpdate::Info(info) => ContestUpdate::Info(Box::new(info.remap_ids(remapper))),
            ContestUpdate::Run(run) => ContestUpdate::Run(run.remap_ids(remapper)),
            ContestUpdate::Commentary(message) => {
                ContestUpdate::Commentary(message.remap_ids(remapper))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remapper(team_rules: &[(&str, &str)]) -> IdRemapper {
        let settings = RewriteSettings {
            teams: team_rules
                .iter()
                .map(|(pattern, replacement)| RewriteRule {
                    pattern: pattern.to_string(),
                    replacement: replacement.to_string(),
                })
                .collect(),
            ..Default::default()
        };
        IdRemapper::compile(&settings).unwrap()
    }

    #[test]
    fn first_matching_rule_wins() {
        let remapper = remapper(&[("^(\\d+)$", "north-$1"), ("^.*$", "other")]);
        assert_eq!(
            TeamId::from("42").remap_ids(&remapper),
            TeamId::from("north-42")
        );
        assert_eq!(
            TeamId::from("x9").remap_ids(&remapper),
            TeamId::from("other")
        );
    }

    #[test]
    fn unmatched_value_passes_through() {
        let remapper = remapper(&[("^a", "b")]);
        assert_eq!(TeamId::from("zzz").remap_ids(&remapper), TeamId::from("zzz"));
    }

    #[test]
    fn unrelated_kinds_are_untouched() {
        let remapper = remapper(&[(".*", "rewritten")]);
        assert_eq!(
            ProblemId::from("A").remap_ids(&remapper),
            ProblemId::from("A")
        );
    }

    #[test]
    fn invalid_pattern_is_a_configuration_error() {
        let settings = RewriteSettings {
            runs: vec![RewriteRule {
                pattern: "(".to_string(),
                replacement: "x".to_string(),
            }],
            ..Default::default()
        };
        assert!(matches!(
            IdRemapper::compile(&settings),
            Err(SourceError::Configuration(_))
        ));
    }
}
