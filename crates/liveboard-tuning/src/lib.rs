//! Declarative tuning rules for contest info.
//!
//! A [`RuleSet`] is a list of rules loaded from configuration and applied
//! to every `ContestInfo` before it reaches consumers: regex-keyed
//! per-entity field overrides, contest-level setting overrides, award
//! configuration, and display/media templates expanded from entity
//! fields. Rule errors are configuration errors and are surfaced as
//! [`TuningError`], never skipped.

pub mod error;
pub mod overrides;
pub mod rules;
pub mod template;

pub use error::TuningError;
pub use overrides::{
    AwardsOverride, ContestSettingsOverride, GroupOverride, OrganizationOverride, ProblemOverride,
    TeamOverride,
};
pub use rules::{
    MatchField, RegexOverrides, RegexParserBlock, RegexRule, RuleSet, TeamTemplate, TuningRule,
};
pub use template::{expand, percent_encode, PlaceholderPolicy};
