//! The update stream vocabulary.
//!
//! Per-source order is total and every transform must preserve it;
//! interleaving across sources is unspecified.

use serde::{Deserialize, Serialize};

use crate::commentary::CommentaryMessage;
use crate::contest::ContestInfo;
use crate::run::RunInfo;

/// One element of a contest update stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContestUpdate {
    /// Replaces the current contest info wholesale
    Info(Box<ContestInfo>),
    /// Creates or replaces the run with this id
    Run(RunInfo),
    /// Creates or replaces the commentary message with this id
    Commentary(CommentaryMessage),
}

impl ContestUpdate {
    pub fn as_info(&self) -> Option<&ContestInfo> {
        match self {
            ContestUpdate::Info(info) => Some(info),
            _ => None,
        }
    }
}

/// Result of one full snapshot load from a contest system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestParseResult {
    pub info: ContestInfo,
    pub runs: Vec<RunInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<CommentaryMessage>,
}

impl ContestParseResult {
    pub fn new(info: ContestInfo, runs: Vec<RunInfo>) -> Self {
        Self {
            info,
            runs,
            messages: Vec::new(),
        }
    }
}
