//! Kind-tagged opaque identifiers.
//!
//! Contest systems use arbitrary strings (or numbers rendered as strings)
//! for their ids. Each entity kind gets its own newtype so a `TeamId` can
//! never be passed where a `ProblemId` is expected; the merger relies on
//! this to rewrite each kind independently.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

entity_id!(
    /// Identifier of a team within one contest.
    TeamId
);
entity_id!(
    /// Identifier of a problem within one contest.
    ProblemId
);
entity_id!(
    /// Identifier of a single submission. A later `RunInfo` with the same
    /// id replaces the earlier one.
    RunId
);
entity_id!(
    /// Identifier of a team group (site, division, ...).
    GroupId
);
entity_id!(
    /// Identifier of an organization (university, company, ...).
    OrganizationId
);
entity_id!(
    /// Identifier of a submission language.
    LanguageId
);
entity_id!(
    /// Identifier of a commentary message.
    MessageId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_plain_string() {
        let id = TeamId::from("icpc-2024-042");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"icpc-2024-042\"");
        let back: TeamId = serde_json::from_str("\"icpc-2024-042\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn ordering_is_lexicographic() {
        assert!(RunId::from("10") < RunId::from("9"));
        assert!(RunId::from("a") < RunId::from("b"));
    }
}
