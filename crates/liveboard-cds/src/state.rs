//! Folding an update stream into the current contest snapshot.

use std::collections::BTreeMap;

use liveboard_model::{CommentaryMessage, ContestInfo, ContestUpdate, MessageId, RunId, RunInfo};

/// The current snapshot of one contest, built by folding updates in
/// stream order. Each consumer owns its own instance; nothing here is
/// shared or locked.
#[derive(Debug, Clone, Default)]
pub struct ContestState {
    info: Option<ContestInfo>,
    runs: BTreeMap<RunId, RunInfo>,
    messages: BTreeMap<MessageId, CommentaryMessage>,
}

impl ContestState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one update: info replaces wholesale, runs and messages
    /// upsert by id.
    pub fn apply(&mut self, update: &ContestUpdate) {
        match update {
            ContestUpdate::Info(info) => self.info = Some((**info).clone()),
            ContestUpdate::Run(run) => {
                self.runs.insert(run.id.clone(), run.clone());
            }
            ContestUpdate::Commentary(message) => {
                self.messages.insert(message.id.clone(), message.clone());
            }
        }
    }

    pub fn info(&self) -> Option<&ContestInfo> {
        self.info.as_ref()
    }

    pub fn run(&self, id: &RunId) -> Option<&RunInfo> {
        self.runs.get(id)
    }

    /// All runs, sorted by `(time, id)` ascending.
    pub fn runs(&self) -> Vec<RunInfo> {
        let mut runs: Vec<RunInfo> = self.runs.values().cloned().collect();
        runs.sort_by(|a, b| a.time.cmp(&b.time).then_with(|| a.id.cmp(&b.id)));
        runs
    }

    pub fn messages(&self) -> Vec<CommentaryMessage> {
        self.messages.values().cloned().collect()
    }

    /// Synthesizes a full snapshot as an update sequence: info first,
    /// then runs in `(time, id)` order, then messages. Replaying it into
    /// an empty state reproduces this one; late subscribers bootstrap
    /// from it.
    pub fn snapshot(&self) -> Vec<ContestUpdate> {
        let mut updates = Vec::with_capacity(1 + self.runs.len() + self.messages.len());
        if let Some(info) = &self.info {
            updates.push(ContestUpdate::Info(Box::new(info.clone())));
        }
        updates.extend(self.runs().into_iter().map(ContestUpdate::Run));
        updates.extend(self.messages().into_iter().map(ContestUpdate::Commentary));
        updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liveboard_model::{ProblemId, RunResult, TeamId, Verdict};
    use std::time::Duration;

    fn run(id: &str, minutes: u64, verdict: Verdict) -> ContestUpdate {
        ContestUpdate::Run(RunInfo {
            id: RunId::from(id),
            result: RunResult::Icpc {
                verdict,
                is_first_to_solve: false,
            },
            problem_id: ProblemId::from("A"),
            team_id: TeamId::from("t1"),
            time: Duration::from_secs(minutes * 60),
            language_id: None,
            is_hidden: false,
        })
    }

    #[test]
    fn reapplying_the_same_run_changes_nothing() {
        let mut once = ContestState::new();
        once.apply(&run("1", 10, Verdict::Accepted));
        let mut twice = ContestState::new();
        twice.apply(&run("1", 10, Verdict::Accepted));
        twice.apply(&run("1", 10, Verdict::Accepted));
        assert_eq!(once.runs(), twice.runs());
    }

    #[test]
    fn same_id_replaces_instead_of_appending() {
        let mut state = ContestState::new();
        state.apply(&run("1", 10, Verdict::WrongAnswer));
        state.apply(&run("1", 10, Verdict::Accepted));
        let runs = state.runs();
        assert_eq!(runs.len(), 1);
        assert!(matches!(
            runs[0].result,
            RunResult::Icpc {
                verdict: Verdict::Accepted,
                ..
            }
        ));
    }

    #[test]
    fn snapshot_replays_to_the_same_state() {
        let mut state = ContestState::new();
        state.apply(&run("2", 20, Verdict::Accepted));
        state.apply(&run("1", 10, Verdict::WrongAnswer));
        let mut replayed = ContestState::new();
        for update in state.snapshot() {
            replayed.apply(&update);
        }
        assert_eq!(state.runs(), replayed.runs());
        assert_eq!(state.info().cloned(), replayed.info().cloned());
    }
}
