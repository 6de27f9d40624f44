//! Submissions and their judged results.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::duration_ms;
use crate::error::MappingError;
use crate::id::{LanguageId, ProblemId, RunId, TeamId};

/// Canonical judging verdict vocabulary.
///
/// Serialized under the conventional two-letter codes. Contest systems
/// that use different spellings go through [`Verdict::parse`], which
/// also accepts the common alternative names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "AC")]
    Accepted,
    #[serde(rename = "RJ")]
    Rejected,
    #[serde(rename = "FL")]
    Fail,
    #[serde(rename = "CE")]
    CompilationError,
    #[serde(rename = "CE+")]
    CompilationErrorWithPenalty,
    #[serde(rename = "PE")]
    PresentationError,
    #[serde(rename = "RE")]
    RuntimeError,
    #[serde(rename = "TL")]
    TimeLimitExceeded,
    #[serde(rename = "ML")]
    MemoryLimitExceeded,
    #[serde(rename = "OL")]
    OutputLimitExceeded,
    #[serde(rename = "IL")]
    IdlenessLimitExceeded,
    #[serde(rename = "SV")]
    SecurityViolation,
    #[serde(rename = "IG")]
    Ignored,
    #[serde(rename = "CH")]
    Challenged,
    #[serde(rename = "WA")]
    WrongAnswer,
}

impl Verdict {
    /// The canonical short code.
    pub fn short_name(&self) -> &'static str {
        match self {
            Verdict::Accepted => "AC",
            Verdict::Rejected => "RJ",
            Verdict::Fail => "FL",
            Verdict::CompilationError => "CE",
            Verdict::CompilationErrorWithPenalty => "CE+",
            Verdict::PresentationError => "PE",
            Verdict::RuntimeError => "RE",
            Verdict::TimeLimitExceeded => "TL",
            Verdict::MemoryLimitExceeded => "ML",
            Verdict::OutputLimitExceeded => "OL",
            Verdict::IdlenessLimitExceeded => "IL",
            Verdict::SecurityViolation => "SV",
            Verdict::Ignored => "IG",
            Verdict::Challenged => "CH",
            Verdict::WrongAnswer => "WA",
        }
    }

    /// Whether this verdict counts toward ICPC time penalty when the
    /// problem is eventually solved.
    pub fn is_adding_penalty(&self) -> bool {
        !matches!(
            self,
            Verdict::Accepted
                | Verdict::CompilationError
                | Verdict::Ignored
                | Verdict::SecurityViolation
        )
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }

    /// Strict verdict parsing. Accepts canonical codes plus the usual
    /// alternative spellings; anything else is a structural mapping
    /// error, not something to skip over.
    pub fn parse(code: &str) -> Result<Verdict, MappingError> {
        let verdict = match code {
            "AC" | "OK" => Verdict::Accepted,
            "RJ" => Verdict::Rejected,
            "FL" => Verdict::Fail,
            "CE" | "CTL" => Verdict::CompilationError,
            "CE+" => Verdict::CompilationErrorWithPenalty,
            "PE" => Verdict::PresentationError,
            "RE" | "RT" | "RTE" => Verdict::RuntimeError,
            "TL" | "TLE" => Verdict::TimeLimitExceeded,
            "ML" | "MLE" => Verdict::MemoryLimitExceeded,
            "OL" | "OLE" => Verdict::OutputLimitExceeded,
            "IL" | "ILE" | "WTL" => Verdict::IdlenessLimitExceeded,
            "SV" => Verdict::SecurityViolation,
            "IG" => Verdict::Ignored,
            "CH" => Verdict::Challenged,
            "WA" => Verdict::WrongAnswer,
            other => return Err(MappingError::UnknownVerdict(other.to_string())),
        };
        Ok(verdict)
    }

    /// Lenient lookup for systems that ship flags alongside free-form
    /// verdict names: a recognized name wins, otherwise the flags pick a
    /// generic accepted/rejected verdict.
    pub fn lookup(code: &str, is_adding_penalty: bool, is_accepted: bool) -> Verdict {
        match Verdict::parse(code) {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(code, "unknown verdict name, falling back to flags");
                if is_accepted {
                    Verdict::Accepted
                } else if is_adding_penalty {
                    Verdict::Rejected
                } else {
                    Verdict::Ignored
                }
            }
        }
    }
}

/// Judged (or not-yet-judged) outcome of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunResult {
    /// ICPC-style verdict
    Icpc {
        verdict: Verdict,
        #[serde(default)]
        is_first_to_solve: bool,
    },
    /// IOI-style partial score, one entry per test group
    Ioi {
        score: Vec<f64>,
        /// First run of any team to reach this problem's current best
        #[serde(default)]
        is_first_best: bool,
    },
    /// Still in the judging queue
    InProgress {
        /// Fraction of tests finished, in [0, 1]
        tested_part: f64,
    },
}

impl RunResult {
    pub fn is_judged(&self) -> bool {
        !matches!(self, RunResult::InProgress { .. })
    }

    /// Total score for IOI results, zero otherwise.
    pub fn score_sum(&self) -> f64 {
        match self {
            RunResult::Ioi { score, .. } => score.iter().sum(),
            _ => 0.0,
        }
    }
}

/// One submission. A later value with the same id replaces the earlier
/// one everywhere downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunInfo {
    pub id: RunId,
    pub result: RunResult,
    pub problem_id: ProblemId,
    pub team_id: TeamId,
    /// Offset from contest start
    #[serde(rename = "timeMs", with = "duration_ms")]
    pub time: Duration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_id: Option<LanguageId>,
    #[serde(default)]
    pub is_hidden: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_alternative_names() {
        assert_eq!(Verdict::parse("OK").unwrap(), Verdict::Accepted);
        assert_eq!(Verdict::parse("TLE").unwrap(), Verdict::TimeLimitExceeded);
        assert_eq!(Verdict::parse("RTE").unwrap(), Verdict::RuntimeError);
        assert_eq!(Verdict::parse("WTL").unwrap(), Verdict::IdlenessLimitExceeded);
        assert_eq!(Verdict::parse("CTL").unwrap(), Verdict::CompilationError);
    }

    #[test]
    fn parse_rejects_unknown_codes() {
        assert_eq!(
            Verdict::parse("??").unwrap_err(),
            MappingError::UnknownVerdict("??".to_string())
        );
    }

    #[test]
    fn lookup_falls_back_to_flags() {
        assert_eq!(Verdict::lookup("WEIRD", false, true), Verdict::Accepted);
        assert_eq!(Verdict::lookup("WEIRD", true, false), Verdict::Rejected);
        assert_eq!(Verdict::lookup("WEIRD", false, false), Verdict::Ignored);
        assert_eq!(Verdict::lookup("WA", false, true), Verdict::WrongAnswer);
    }

    #[test]
    fn compilation_error_adds_no_penalty_but_its_variant_does() {
        assert!(!Verdict::CompilationError.is_adding_penalty());
        assert!(Verdict::CompilationErrorWithPenalty.is_adding_penalty());
        assert!(!Verdict::Accepted.is_adding_penalty());
        assert!(Verdict::WrongAnswer.is_adding_penalty());
    }

    #[test]
    fn run_serializes_time_as_milliseconds() {
        let run = RunInfo {
            id: RunId::from("1"),
            result: RunResult::Icpc {
                verdict: Verdict::Accepted,
                is_first_to_solve: false,
            },
            problem_id: ProblemId::from("A"),
            team_id: TeamId::from("t1"),
            time: Duration::from_secs(600),
            language_id: None,
            is_hidden: false,
        };
        let value = serde_json::to_value(&run).unwrap();
        assert_eq!(value["timeMs"], 600_000);
        assert_eq!(value["result"]["type"], "ICPC");
        assert_eq!(value["result"]["verdict"], "AC");
    }
}
