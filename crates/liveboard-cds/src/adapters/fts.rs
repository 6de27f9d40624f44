//! First-to-solve tagging.
//!
//! The first accepted run for each problem, in stream arrival order, is
//! tagged `is_first_to_solve`. The decision is keyed by run id, so
//! re-delivery of the same run keeps its tag instead of minting a
//! second one. A rejudge that turns the remembered run into a rejection
//! frees the slot for the next accept.

use std::collections::HashMap;

use liveboard_model::{ContestUpdate, ProblemId, RunId, RunResult};

use crate::source::{UpdateReceiver, UpdateSender};

/// Tracks the first accepted run per problem.
#[derive(Debug, Default)]
pub struct FirstToSolve {
    first: HashMap<ProblemId, RunId>,
}

impl FirstToSolve {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags or clears the flag on one update, updating internal state.
    pub fn process(&mut self, update: ContestUpdate) -> ContestUpdate {
        let mut run = match update {
            ContestUpdate::Run(run) => run,
            other => return other,
        };
        if let RunResult::Icpc {
            verdict,
            is_first_to_solve,
        } = &mut run.result
        {
            *is_first_to_solve = if verdict.is_accepted() && !run.is_hidden {
                match self.first.get(&run.problem_id) {
                    Some(first_id) => *first_id == run.id,
                    None => {
                        self.first.insert(run.problem_id.clone(), run.id.clone());
                        true
                    }
                }
            } else {
                if self.first.get(&run.problem_id) == Some(&run.id) {
                    self.first.remove(&run.problem_id);
                }
                false
            };
        }
        ContestUpdate::Run(run)
    }
}

/// Pumps a stream through the tagger until the input closes.
pub async fn run(mut rx: UpdateReceiver, tx: UpdateSender) {
    let mut state = FirstToSolve::new();
    while let Some(update) = rx.recv().await {
        if tx.send(state.process(update)).await.is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liveboard_model::{RunInfo, TeamId, Verdict};
    use std::time::Duration;

    fn accepted(id: &str, problem: &str) -> ContestUpdate {
        ContestUpdate::Run(RunInfo {
            id: RunId::from(id),
            result: RunResult::Icpc {
                verdict: Verdict::Accepted,
                is_first_to_solve: false,
            },
            problem_id: ProblemId::from(problem),
            team_id: TeamId::from("t1"),
            time: Duration::from_secs(600),
            language_id: None,
            is_hidden: false,
        })
    }

    fn flag(update: &ContestUpdate) -> bool {
        match update {
            ContestUpdate::Run(run) => match run.result {
                RunResult::Icpc {
                    is_first_to_solve, ..
                } => is_first_to_solve,
                _ => false,
            },
            _ => false,
        }
    }

    #[test]
    fn first_accept_per_problem_is_tagged() {
        let mut fts = FirstToSolve::new();
        assert!(flag(&fts.process(accepted("1", "A"))));
        assert!(!flag(&fts.process(accepted("2", "A"))));
        assert!(flag(&fts.process(accepted("3", "B"))));
    }

    #[test]
    fn redelivery_keeps_the_tag() {
        let mut fts = FirstToSolve::new();
        assert!(flag(&fts.process(accepted("1", "A"))));
        assert!(!flag(&fts.process(accepted("2", "A"))));
        assert!(flag(&fts.process(accepted("1", "A"))));
    }

    fn rejected(id: &str, problem: &str) -> ContestUpdate {
        let mut update = accepted(id, problem);
        if let ContestUpdate::Run(run) = &mut update {
            run.result = RunResult::Icpc {
                verdict: Verdict::WrongAnswer,
                is_first_to_solve: false,
            };
        }
        update
    }

    #[test]
    fn rejudged_rejection_frees_the_tag() {
        let mut fts = FirstToSolve::new();
        assert!(flag(&fts.process(accepted("1", "A"))));
        assert!(!flag(&fts.process(rejected("1", "A"))));
        assert!(flag(&fts.process(accepted("2", "A"))));
    }

    #[test]
    fn upstream_tags_are_overwritten() {
        let mut fts = FirstToSolve::new();
        fts.process(accepted("1", "A"));
        let mut tagged_upstream = accepted("2", "A");
        if let ContestUpdate::Run(run) = &mut tagged_upstream {
            run.result = RunResult::Icpc {
                verdict: Verdict::Accepted,
                is_first_to_solve: true,
            };
        }
        assert!(!flag(&fts.process(tagged_upstream)));
    }
}
