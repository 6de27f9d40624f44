//! The rule list and its application to a `ContestInfo`.
//!
//! Rules apply in declared order: regex-keyed field overrides first,
//! templates after, so a template can reference a field an earlier
//! override set. Run and commentary updates never pass through here.

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use liveboard_model::{
    ContestInfo, GroupInfo, OrganizationId, OrganizationInfo, ProblemInfo, TeamInfo, TeamMediaType,
};

use crate::error::TuningError;
use crate::overrides::{
    AwardsOverride, ContestSettingsOverride, GroupOverride, OrganizationOverride, ProblemOverride,
    TeamOverride,
};
use crate::template::{expand, PlaceholderPolicy};

/// Which source field a rule's regex is matched against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum MatchField {
    /// The entity's raw id (the usual choice)
    #[default]
    Id,
    FullName,
    DisplayName,
    CustomField {
        name: String,
    },
}

trait Matchable {
    fn id_str(&self) -> &str;
    fn full_name(&self) -> Option<&str>;
    fn display_name(&self) -> Option<&str>;
    fn custom_field(&self, name: &str) -> Option<&str>;
}

impl Matchable for TeamInfo {
    fn id_str(&self) -> &str {
        self.id.as_str()
    }
    fn full_name(&self) -> Option<&str> {
        Some(&self.full_name)
    }
    fn display_name(&self) -> Option<&str> {
        Some(&self.display_name)
    }
    fn custom_field(&self, name: &str) -> Option<&str> {
        self.custom_fields.get(name).map(String::as_str)
    }
}

impl Matchable for ProblemInfo {
    fn id_str(&self) -> &str {
        self.id.as_str()
    }
    fn full_name(&self) -> Option<&str> {
        Some(&self.full_name)
    }
    fn display_name(&self) -> Option<&str> {
        Some(&self.display_name)
    }
    fn custom_field(&self, name: &str) -> Option<&str> {
        self.custom_fields.get(name).map(String::as_str)
    }
}

impl Matchable for GroupInfo {
    fn id_str(&self) -> &str {
        self.id.as_str()
    }
    fn full_name(&self) -> Option<&str> {
        None
    }
    fn display_name(&self) -> Option<&str> {
        Some(&self.display_name)
    }
    fn custom_field(&self, name: &str) -> Option<&str> {
        self.custom_fields.get(name).map(String::as_str)
    }
}

impl Matchable for OrganizationInfo {
    fn id_str(&self) -> &str {
        self.id.as_str()
    }
    fn full_name(&self) -> Option<&str> {
        Some(&self.full_name)
    }
    fn display_name(&self) -> Option<&str> {
        Some(&self.display_name)
    }
    fn custom_field(&self, name: &str) -> Option<&str> {
        self.custom_fields.get(name).map(String::as_str)
    }
}

impl MatchField {
    fn value_of<'a>(&self, entity: &'a impl Matchable) -> Option<&'a str> {
        match self {
            MatchField::Id => Some(entity.id_str()),
            MatchField::FullName => entity.full_name(),
            MatchField::DisplayName => entity.display_name(),
            MatchField::CustomField { name } => entity.custom_field(name),
        }
    }
}

/// One `(pattern, override)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegexRule<T> {
    pub pattern: String,
    #[serde(rename = "override")]
    pub payload: T,
}

/// Regex-keyed overrides for one entity collection. The first rule
/// whose pattern matches the selected field wins; later rules are not
/// tried for that entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegexOverrides<T> {
    #[serde(default)]
    pub match_field: MatchField,
    pub rules: Vec<RegexRule<T>>,
}

impl<T> RegexOverrides<T> {
    fn compiled(&self) -> Result<Vec<(Regex, &T)>, TuningError> {
        self.rules
            .iter()
            .map(|rule| {
                let re = Regex::new(&rule.pattern).map_err(|source| TuningError::InvalidRegex {
                    pattern: rule.pattern.clone(),
                    source,
                })?;
                Ok((re, &rule.payload))
            })
            .collect()
    }

    fn apply_all<E, F>(&self, entities: &mut [E], apply: F) -> Result<(), TuningError>
    where
        E: Matchable,
        F: Fn(&T, &mut E),
    {
        let compiled = self.compiled()?;
        for entity in entities {
            let Some(value) = self.match_field.value_of(entity).map(str::to_owned) else {
                continue;
            };
            if let Some((_, payload)) = compiled.iter().find(|(re, _)| re.is_match(&value)) {
                apply(payload, entity);
            }
        }
        Ok(())
    }
}

/// A named capture block: expand `from`, run `pattern` over the result.
/// Captures become `{regexes.<block>.<index|name>}` template variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegexParserBlock {
    pub from: String,
    pub pattern: String,
}

/// Templates applied to every team after field overrides. Name and
/// custom-field templates substitute raw values; media templates are
/// URL contexts and percent-encode plain placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TeamTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_tag: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub medias: BTreeMap<TeamMediaType, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_fields: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub regexes: BTreeMap<String, RegexParserBlock>,
}

impl TeamTemplate {
    fn templates(&self) -> impl Iterator<Item = &str> {
        self.display_name
            .iter()
            .chain(self.full_name.iter())
            .chain(self.hash_tag.iter())
            .map(String::as_str)
            .chain(self.medias.values().map(String::as_str))
            .chain(self.custom_fields.values().map(String::as_str))
            .chain(self.regexes.values().map(|b| b.from.as_str()))
    }

    /// Every `regexes.<block>` reference must name a declared block.
    fn check_regex_refs(&self) -> Result<(), TuningError> {
        for template in self.templates() {
            for name in crate::template::placeholder_names(template) {
                if let Some(rest) = name.strip_prefix("regexes.") {
                    let block = rest.split('.').next().unwrap_or(rest);
                    if !self.regexes.contains_key(block) {
                        return Err(TuningError::UnknownRegexBlock(block.to_string()));
                    }
                }
            }
        }
        Ok(())
    }

    fn apply_to(
        &self,
        team: &mut TeamInfo,
        orgs: &BTreeMap<OrganizationId, OrganizationInfo>,
        policy: PlaceholderPolicy,
    ) -> Result<(), TuningError> {
        let org = team.organization_id.as_ref().and_then(|id| orgs.get(id));

        let base = |team: &TeamInfo, name: &str| -> Option<String> {
            match name {
                "team.id" => Some(team.id.as_str().to_string()),
                "team.fullName" => Some(team.full_name.clone()),
                "team.displayName" => Some(team.display_name.clone()),
                "team.hashTag" => team.hash_tag.clone(),
                "org.id" => org.map(|o| o.id.as_str().to_string()),
                "org.fullName" => org.map(|o| o.full_name.clone()),
                "org.displayName" => org.map(|o| o.display_name.clone()),
                _ => team.custom_fields.get(name).cloned(),
            }
        };

        // Capture blocks see only base variables, not each other.
        let mut captures: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        for (block, parser) in &self.regexes {
            let subject = expand(&parser.from, policy, false, |n| base(team, n))?;
            let re = Regex::new(&parser.pattern).map_err(|source| TuningError::InvalidRegex {
                pattern: parser.pattern.clone(),
                source,
            })?;
            let mut values = BTreeMap::new();
            if let Some(caps) = re.captures(&subject) {
                for (i, group) in caps.iter().enumerate() {
                    if let Some(m) = group {
                        values.insert(i.to_string(), m.as_str().to_string());
                    }
                }
                for name in re.capture_names().flatten() {
                    if let Some(m) = caps.name(name) {
                        values.insert(name.to_string(), m.as_str().to_string());
                    }
                }
            }
            captures.insert(block.clone(), values);
        }

        let lookup = |team: &TeamInfo, name: &str| -> Option<String> {
            if let Some(rest) = name.strip_prefix("regexes.") {
                let (block, key) = rest.split_once('.')?;
                return captures.get(block)?.get(key).cloned();
            }
            base(team, name)
        };

        // Custom fields first, so the name templates below can use them.
        let mut new_fields = Vec::new();
        for (key, template) in &self.custom_fields {
            new_fields.push((key.clone(), expand(template, policy, false, |n| lookup(team, n))?));
        }
        for (key, value) in new_fields {
            team.custom_fields.insert(key, value);
        }

        if let Some(template) = &self.display_name {
            team.display_name = expand(template, policy, false, |n| lookup(team, n))?;
        }
        if let Some(template) = &self.full_name {
            team.full_name = expand(template, policy, false, |n| lookup(team, n))?;
        }
        if let Some(template) = &self.hash_tag {
            team.hash_tag = Some(expand(template, policy, false, |n| lookup(team, n))?);
        }
        let mut new_medias = Vec::new();
        for (kind, template) in &self.medias {
            new_medias.push((*kind, expand(template, policy, true, |n| lookup(team, n))?));
        }
        for (kind, url) in new_medias {
            team.medias.insert(kind, url);
        }
        Ok(())
    }
}

/// One declarative tuning rule, tagged by `type` in the rule file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TuningRule {
    OverrideTeams(RegexOverrides<TeamOverride>),
    OverrideProblems(RegexOverrides<ProblemOverride>),
    OverrideGroups(RegexOverrides<GroupOverride>),
    OverrideOrganizations(RegexOverrides<OrganizationOverride>),
    OverrideContestSettings(ContestSettingsOverride),
    OverrideAwards(AwardsOverride),
    OverrideTeamTemplate(TeamTemplate),
}

/// The full rule list for one contest, applied in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    #[serde(default)]
    pub placeholder_policy: PlaceholderPolicy,
    #[serde(default)]
    pub rules: Vec<TuningRule>,
}

impl RuleSet {
    /// Applies every rule to `info`, in order. Any error aborts the
    /// whole application; a half-tuned info is never returned.
    pub fn apply(&self, mut info: ContestInfo) -> Result<ContestInfo, TuningError> {
        tracing::debug!(
            rules = self.rules.len(),
            contest = %info.name,
            "applying tuning rules"
        );
        for rule in &self.rules {
            match rule {
                TuningRule::OverrideTeams(o) => {
                    o.apply_all(&mut info.teams, TeamOverride::apply_to)?
                }
                TuningRule::OverrideProblems(o) => {
                    o.apply_all(&mut info.problems, ProblemOverride::apply_to)?
                }
                TuningRule::OverrideGroups(o) => {
                    o.apply_all(&mut info.groups, GroupOverride::apply_to)?
                }
                TuningRule::OverrideOrganizations(o) => {
                    o.apply_all(&mut info.organizations, OrganizationOverride::apply_to)?
                }
                TuningRule::OverrideContestSettings(o) => o.apply_to(&mut info),
                TuningRule::OverrideAwards(o) => o.apply_to(&mut info.awards),
                TuningRule::OverrideTeamTemplate(template) => {
                    template.check_regex_refs()?;
                    let orgs: BTreeMap<OrganizationId, OrganizationInfo> = info
                        .organizations
                        .iter()
                        .map(|o| (o.id.clone(), o.clone()))
                        .collect();
                    for team in &mut info.teams {
                        template.apply_to(team, &orgs, self.placeholder_policy)?;
                    }
                }
            }
        }
        Ok(info)
    }
}
