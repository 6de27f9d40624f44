//! The contract every contest-system adapter implements.

use async_trait::async_trait;
use tokio::sync::mpsc;

use liveboard_model::{ContestParseResult, ContestUpdate};

use crate::error::SourceError;

/// Sending half of an update stream.
pub type UpdateSender = mpsc::Sender<ContestUpdate>;

/// Receiving half of an update stream.
pub type UpdateReceiver = mpsc::Receiver<ContestUpdate>;

/// One external judging system.
///
/// Adapters normalize whatever their system speaks into the canonical
/// model and hand back full snapshots; the reconciler turns those into
/// an ordered update stream. Snapshot loading must be side-effect free,
/// so a failed load can simply be tried again.
#[async_trait]
pub trait ContestDataSource: Send + Sync {
    /// Loads one full snapshot: info, all runs, all messages.
    async fn load_once(&self) -> Result<ContestParseResult, SourceError>;
}
