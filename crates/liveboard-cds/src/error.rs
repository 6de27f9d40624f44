//! Source-side errors, split by how the poll loop reacts to them.
//!
//! Transient errors are logged and retried forever at the configured
//! interval; a broadcast has to survive an upstream outage. Structural
//! errors mean the adapter and its contest system disagree, which no
//! retry will fix, so they stop the source loudly.

use thiserror::Error;

use liveboard_model::MappingError;
use liveboard_tuning::TuningError;

/// An error from a contest data source or one of its transforms.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Transient transport failure
    #[error("network error: {0}")]
    Network(String),

    /// Transient decode failure (truncated or garbled payload)
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// Structural mismatch between adapter and contest system
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// Broken tuning rule
    #[error(transparent)]
    Tuning(#[from] TuningError),

    /// Bad source configuration (invalid rewrite pattern, zero interval)
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl SourceError {
    /// Transient errors are retried; everything else is fatal for the
    /// source.
    pub fn is_transient(&self) -> bool {
        matches!(self, SourceError::Network(_) | SourceError::Malformed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_io_class_errors_are_transient() {
        assert!(SourceError::Network("timeout".into()).is_transient());
        assert!(SourceError::Malformed("truncated".into()).is_transient());
        assert!(!SourceError::Mapping(MappingError::UnknownVerdict("??".into())).is_transient());
        assert!(!SourceError::Configuration("bad".into()).is_transient());
    }
}
