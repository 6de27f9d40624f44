//! IOI row scoring.
//!
//! Pending runs carry no score, so the optimism level does not change an
//! IOI row; only judged submissions participate in the merge.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use liveboard_model::{
    ContestInfo, IoiProblemResult, ProblemId, ProblemResult, RunId, RunInfo, RunResult,
    ScoreMergeMode, ScoreboardRow, TeamId,
};

fn merged_score(scores: &[(Duration, &Vec<f64>)], mode: ScoreMergeMode) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let sum = |v: &Vec<f64>| v.iter().sum::<f64>();
    match mode {
        ScoreMergeMode::MaxTotal => scores.iter().map(|(_, v)| sum(v)).reduce(f64::max),
        ScoreMergeMode::MaxPerGroup => {
            let groups = scores.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
            let mut best = vec![0.0f64; groups];
            for (_, v) in scores {
                for (i, score) in v.iter().enumerate() {
                    best[i] = best[i].max(*score);
                }
            }
            Some(best.iter().sum())
        }
        ScoreMergeMode::Last => scores.last().map(|(_, v)| sum(v)),
        ScoreMergeMode::LastOk => scores
            .iter()
            .rev()
            .map(|(_, v)| sum(v))
            .find(|total| *total > 0.0),
        ScoreMergeMode::Sum => Some(scores.iter().map(|(_, v)| sum(v)).sum()),
    }
}

/// Finds, per problem, the run that first reached the problem's current
/// best total over all teams. `runs` must be sorted by `(time, id)`
/// ascending; a later run that only equals the best does not take over.
pub fn first_best_runs(runs: &[&RunInfo]) -> BTreeSet<RunId> {
    let mut best: BTreeMap<&ProblemId, (f64, &RunId)> = BTreeMap::new();
    for run in runs.iter().filter(|run| !run.is_hidden) {
        if let RunResult::Ioi { score, .. } = &run.result {
            let total: f64 = score.iter().sum();
            let beats = best
                .get(&run.problem_id)
                .map_or(total > 0.0, |(current, _)| total > *current);
            if beats {
                best.insert(&run.problem_id, (total, &run.id));
            }
        }
    }
    best.into_values().map(|(_, id)| id.clone()).collect()
}

/// Scores one team's row from its runs, sorted by `(time, id)` ascending.
/// `first_best` holds the contest-wide first-best run ids from
/// [`first_best_runs`].
pub fn score_row(
    info: &ContestInfo,
    team_id: &TeamId,
    runs: &[&RunInfo],
    first_best: &BTreeSet<RunId>,
) -> ScoreboardRow {
    let mut results = Vec::with_capacity(info.problems.len());
    let mut total = 0.0;
    for problem in info.problems_sorted() {
        let mut scores: Vec<(Duration, &Vec<f64>)> = Vec::new();
        let mut is_first_best = false;
        let mut last_submit_time = None;
        for run in runs
            .iter()
            .filter(|run| run.problem_id == problem.id && !run.is_hidden)
        {
            if let RunResult::Ioi {
                score,
                is_first_best: run_flag,
            } = &run.result
            {
                scores.push((run.time, score));
                is_first_best |= *run_flag || first_best.contains(&run.id);
                last_submit_time = Some(run.time);
            }
        }
        let score = merged_score(&scores, info.score_merge_mode);
        total += score.unwrap_or(0.0);
        results.push(ProblemResult::Ioi(IoiProblemResult {
            score,
            is_first_best,
            last_submit_time,
        }));
    }
    ScoreboardRow {
        team_id: team_id.clone(),
        total_score: total,
        penalty: Duration::ZERO,
        last_accepted_time: None,
        problem_results: results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(raw: &[(u64, Vec<f64>)]) -> Vec<(Duration, Vec<f64>)> {
        raw.iter()
            .map(|(t, v)| (Duration::from_secs(*t), v.clone()))
            .collect()
    }

    fn merged(raw: &[(u64, Vec<f64>)], mode: ScoreMergeMode) -> Option<f64> {
        let owned = entries(raw);
        let refs: Vec<(Duration, &Vec<f64>)> = owned.iter().map(|(t, v)| (*t, v)).collect();
        merged_score(&refs, mode)
    }

    #[test]
    fn max_total_picks_best_single_submission() {
        let runs = [(10, vec![30.0, 20.0]), (20, vec![40.0, 0.0])];
        assert_eq!(merged(&runs, ScoreMergeMode::MaxTotal), Some(50.0));
    }

    #[test]
    fn max_per_group_merges_elementwise() {
        let runs = [(10, vec![30.0, 20.0]), (20, vec![40.0, 0.0])];
        assert_eq!(merged(&runs, ScoreMergeMode::MaxPerGroup), Some(60.0));
    }

    #[test]
    fn last_ok_skips_trailing_zero() {
        let runs = [(10, vec![50.0]), (20, vec![0.0])];
        assert_eq!(merged(&runs, ScoreMergeMode::Last), Some(0.0));
        assert_eq!(merged(&runs, ScoreMergeMode::LastOk), Some(50.0));
    }

    #[test]
    fn no_submissions_means_no_score() {
        assert_eq!(merged(&[], ScoreMergeMode::MaxTotal), None);
    }

    fn ioi_run(id: &str, team: &str, seconds: u64, score: Vec<f64>) -> RunInfo {
        RunInfo {
            id: RunId::from(id),
            result: RunResult::Ioi {
                score,
                is_first_best: false,
            },
            problem_id: ProblemId::from("A"),
            team_id: TeamId::from(team),
            time: Duration::from_secs(seconds),
            language_id: None,
            is_hidden: false,
        }
    }

    #[test]
    fn first_run_to_exceed_the_best_takes_the_tag() {
        let runs = vec![
            ioi_run("1", "t1", 100, vec![50.0]),
            ioi_run("2", "t2", 200, vec![100.0]),
            ioi_run("3", "t1", 300, vec![100.0]),
        ];
        let refs: Vec<&RunInfo> = runs.iter().collect();
        let best = first_best_runs(&refs);
        assert_eq!(best.len(), 1);
        assert!(best.contains(&RunId::from("2")));
    }

    #[test]
    fn zero_score_is_never_first_best() {
        let runs = vec![ioi_run("1", "t1", 100, vec![0.0])];
        let refs: Vec<&RunInfo> = runs.iter().collect();
        assert!(first_best_runs(&refs).is_empty());
    }
}
