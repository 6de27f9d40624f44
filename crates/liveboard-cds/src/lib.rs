//! Contest data ingestion and stream plumbing.
//!
//! The pipeline: an adapter implementing [`ContestDataSource`] feeds the
//! full-reload [`reconciler`], optionally through the [`merger`] when
//! several systems serve one logical contest; the [`adapters`] tune,
//! tag first-to-solve, or emulate; the [`hub`] fans the resulting
//! stream out to independent subscribers, each folding it with its own
//! [`ContestState`].

pub mod adapters;
pub mod error;
pub mod hub;
pub mod merger;
pub mod reconciler;
pub mod remap;
pub mod source;
pub mod state;

pub use error::SourceError;
pub use hub::{ContestEventHub, Subscription};
pub use merger::{merge_infos, SubFeed};
pub use reconciler::{ReloadSettings, SnapshotReconciler};
pub use remap::{IdRemapper, RegexRewrite, RemapIds, RewriteRule, RewriteSettings};
pub use source::{ContestDataSource, UpdateReceiver, UpdateSender};
pub use state::ContestState;
