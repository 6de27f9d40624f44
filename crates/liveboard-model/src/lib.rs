//! Canonical contest data model shared by every pipeline stage.
//!
//! Every external contest system adapter normalizes its data into these
//! types; everything downstream (reconciler, merger, tuning, scoreboard)
//! speaks only this vocabulary.

pub mod commentary;
pub mod contest;
pub mod error;
pub mod id;
pub mod run;
pub mod scoreboard;
pub mod update;

mod duration_ms;

pub use commentary::CommentaryMessage;
pub use contest::{
    AwardsSettings, ContestInfo, ContestResultType, ContestStatus, GroupInfo, LanguageInfo,
    ManualAward, MedalColor, MedalTiebreakMode, MedalTier, OrganizationInfo, PenaltyRoundingMode,
    ProblemInfo, ScoreMergeMode, TeamInfo, TeamMediaType,
};
pub use error::MappingError;
pub use id::{GroupId, LanguageId, MessageId, OrganizationId, ProblemId, RunId, TeamId};
pub use run::{RunInfo, RunResult, Verdict};
pub use scoreboard::{
    Award, IcpcProblemResult, IoiProblemResult, OptimismLevel, ProblemResult, Ranking, Scoreboard,
    ScoreboardRow, ScoreboardUpdateType,
};
pub use update::{ContestParseResult, ContestUpdate};
