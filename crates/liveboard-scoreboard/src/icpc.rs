//! ICPC row scoring.
//!
//! The optimism level decides how a not-yet-judged run is classified:
//! ignored, scored as an eventual accept, or scored as a failed attempt.
//! Only a team's last pending run can be the optimistic accept; earlier
//! pending runs are counted as penalty attempts in that mode, matching
//! the best possible outcome for the team.

use std::time::Duration;

use liveboard_model::{
    ContestInfo, IcpcProblemResult, OptimismLevel, ProblemResult, RunInfo, RunResult,
    ScoreboardRow, TeamId,
};

use crate::penalty::PenaltyCalculator;

struct RunClass {
    accepted: bool,
    pending: bool,
    adds_penalty: bool,
}

fn classify(run: &RunInfo, index: usize, count: usize, level: OptimismLevel) -> RunClass {
    let judged = run.result.is_judged();
    let (verdict_accepted, verdict_penalty) = match &run.result {
        RunResult::Icpc { verdict, .. } => (verdict.is_accepted(), verdict.is_adding_penalty()),
        _ => (false, false),
    };
    match level {
        OptimismLevel::Normal => RunClass {
            accepted: verdict_accepted,
            pending: !judged,
            adds_penalty: judged && verdict_penalty,
        },
        OptimismLevel::Pessimistic => RunClass {
            accepted: verdict_accepted,
            pending: false,
            adds_penalty: !judged || verdict_penalty,
        },
        OptimismLevel::Optimistic => RunClass {
            accepted: verdict_accepted || (!judged && index == count - 1),
            pending: false,
            adds_penalty: verdict_penalty || (!judged && index != count - 1),
        },
    }
}

fn problem_result(runs: &[&RunInfo], level: OptimismLevel) -> IcpcProblemResult {
    let count = runs.len();
    let classes: Vec<RunClass> = runs
        .iter()
        .enumerate()
        .map(|(i, run)| classify(run, i, count, level))
        .collect();
    let ok_index = classes.iter().position(|c| c.accepted);
    let considered = &classes[..ok_index.unwrap_or(count)];
    let wrong_attempts = considered.iter().filter(|c| c.adds_penalty).count() as u32;
    let pending_attempts = considered.iter().filter(|c| c.pending).count() as u32;
    let last_submit_time = match ok_index {
        Some(i) => Some(runs[i].time),
        None => runs.last().map(|run| run.time),
    };
    let is_first_to_solve = ok_index.is_some_and(|i| {
        matches!(
            runs[i].result,
            RunResult::Icpc {
                is_first_to_solve: true,
                ..
            }
        )
    });
    IcpcProblemResult {
        wrong_attempts,
        pending_attempts,
        is_solved: ok_index.is_some(),
        is_first_to_solve,
        last_submit_time,
    }
}

/// Scores one team's row from its runs, which must be sorted by
/// `(time, id)` ascending.
pub fn score_row(info: &ContestInfo, team_id: &TeamId, runs: &[&RunInfo], level: OptimismLevel) -> ScoreboardRow {
    let mut penalty =
        PenaltyCalculator::new(info.penalty_rounding_mode, info.penalty_per_wrong_attempt);
    let mut results = Vec::with_capacity(info.problems.len());
    let mut solved = 0u32;
    let mut last_accepted_time: Option<Duration> = None;
    for problem in info.problems_sorted() {
        let problem_runs: Vec<&RunInfo> = runs
            .iter()
            .copied()
            .filter(|run| run.problem_id == problem.id && !run.is_hidden)
            .collect();
        let result = problem_result(&problem_runs, level);
        if result.is_solved {
            solved += 1;
            if let Some(time) = result.last_submit_time {
                penalty.add_solved(time, result.wrong_attempts);
                last_accepted_time = Some(last_accepted_time.map_or(time, |t| t.max(time)));
            }
        }
        results.push(ProblemResult::Icpc(result));
    }
    ScoreboardRow {
        team_id: team_id.clone(),
        total_score: f64::from(solved),
        penalty: penalty.total(),
        last_accepted_time,
        problem_results: results,
    }
}
