//! Structural mapping errors.
//!
//! These indicate a mismatch between an adapter and its contest system
//! (unknown verdict codes, missing required fields). They are fatal for
//! the affected source, in contrast to transient I/O failures which are
//! retried.

use thiserror::Error;

/// Error raised while normalizing external contest data into the
/// canonical model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// Verdict code not present in the canonical vocabulary
    #[error("unknown verdict code: {0:?}")]
    UnknownVerdict(String),

    /// A field the canonical model requires was absent upstream
    #[error("required field missing: {0}")]
    MissingField(&'static str),

    /// An identifier referenced an entity the snapshot does not contain
    #[error("dangling {kind} reference: {id}")]
    DanglingReference {
        /// Entity kind name, e.g. "team" or "problem"
        kind: &'static str,
        /// The offending identifier
        id: String,
    },

    /// A value was present but outside its valid range
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },
}

/// Result type alias using MappingError
pub type MappingResult<T> = Result<T, MappingError>;
