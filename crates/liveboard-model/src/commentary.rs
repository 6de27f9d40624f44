//! Human-written commentary attached to the contest feed.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::duration_ms;
use crate::id::{MessageId, RunId, TeamId};

/// A commentary message, keyed by id and upserted like a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentaryMessage {
    pub id: MessageId,
    pub message: String,
    /// Offset from contest start when the message was posted
    #[serde(rename = "timeMs", with = "duration_ms")]
    pub time: Duration,
    /// Teams the message talks about, if any
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub team_ids: Vec<TeamId>,
    /// Runs the message talks about, if any
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub run_ids: Vec<RunId>,
}
