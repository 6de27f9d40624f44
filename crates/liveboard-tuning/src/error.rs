//! Errors raised while applying tuning rules.

use thiserror::Error;

/// A tuning rule failed to apply. All of these indicate a broken rule
/// file, so callers treat them as fatal configuration errors.
#[derive(Error, Debug)]
pub enum TuningError {
    /// A rule carries a pattern the regex engine rejects
    #[error("invalid regex {pattern:?}: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A template referenced a name with no value, under
    /// `PlaceholderPolicy::Error`
    #[error("unresolved template placeholder {{{0}}}")]
    UnresolvedPlaceholder(String),

    /// A template referenced a `regexes.<block>` that the rule does not
    /// declare
    #[error("unknown regex block {0:?}")]
    UnknownRegexBlock(String),
}
