//! Pure scoreboard computation.
//!
//! `calculate` is a function of `(ContestInfo, runs)` only; it holds no
//! state and can be re-run from scratch on every update. One scoreboard
//! exists per optimism level, differing in how pending runs are scored.

pub mod freeze;
pub mod icpc;
pub mod ioi;
pub mod penalty;
pub mod ranking;

use std::collections::{BTreeMap, BTreeSet};

use liveboard_model::{
    ContestInfo, ContestResultType, OptimismLevel, RunId, RunInfo, Scoreboard, ScoreboardRow,
    ScoreboardUpdateType, TeamId,
};

pub use freeze::apply_freeze;
pub use penalty::PenaltyCalculator;
pub use ranking::rank;

/// Scores one team's runs, which must be sorted by `(time, id)`.
/// `first_best` is the contest-wide first-best run set from
/// [`ioi::first_best_runs`]; it is ignored for ICPC contests.
pub fn score_row(
    info: &ContestInfo,
    team_id: &TeamId,
    runs: &[&RunInfo],
    level: OptimismLevel,
    first_best: &BTreeSet<RunId>,
) -> ScoreboardRow {
    match info.result_type {
        ContestResultType::Icpc => icpc::score_row(info, team_id, runs, level),
        ContestResultType::Ioi => ioi::score_row(info, team_id, runs, first_best),
    }
}

/// Computes the full scoreboard snapshot: one row per visible team,
/// ranked, with awards. Out-of-contest teams keep their row but rank 0.
/// `runs` may arrive in any order.
pub fn calculate(info: &ContestInfo, runs: &[RunInfo], level: OptimismLevel) -> Scoreboard {
    let mut sorted: Vec<&RunInfo> = runs.iter().collect();
    sorted.sort_by(|a, b| a.time.cmp(&b.time).then_with(|| a.id.cmp(&b.id)));

    let first_best = match info.result_type {
        ContestResultType::Ioi => ioi::first_best_runs(&sorted),
        ContestResultType::Icpc => BTreeSet::new(),
    };

    let mut by_team: BTreeMap<&TeamId, Vec<&RunInfo>> = BTreeMap::new();
    for run in sorted {
        by_team.entry(&run.team_id).or_default().push(run);
    }

    let empty: Vec<&RunInfo> = Vec::new();
    let rows: Vec<ScoreboardRow> = info
        .teams
        .iter()
        .filter(|team| !team.is_hidden)
        .map(|team| {
            let team_runs = by_team.get(&team.id).unwrap_or(&empty);
            score_row(info, &team.id, team_runs, level, &first_best)
        })
        .collect();

    let ranking = rank(info, &rows);
    tracing::debug!(teams = rows.len(), runs = runs.len(), "scoreboard recalculated");
    let mut by_id: BTreeMap<TeamId, ScoreboardRow> = rows
        .into_iter()
        .map(|row| (row.team_id.clone(), row))
        .collect();
    let rows_in_order = ranking
        .order
        .iter()
        .filter_map(|id| by_id.remove(id))
        .collect();
    Scoreboard {
        update_type: ScoreboardUpdateType::Snapshot,
        rows: rows_in_order,
        ranking,
    }
}

/// Like [`calculate`], with freeze masking applied to every row.
pub fn calculate_public(info: &ContestInfo, runs: &[RunInfo], level: OptimismLevel) -> Scoreboard {
    let mut board = calculate(info, runs, level);
    board.rows = board
        .rows
        .into_iter()
        .map(|row| apply_freeze(info, row))
        .collect();
    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use liveboard_model::{
        AwardsSettings, ContestStatus, PenaltyRoundingMode, ProblemId, ProblemInfo, RunId,
        RunResult, ScoreMergeMode, TeamInfo, Verdict,
    };
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn team(id: &str) -> TeamInfo {
        TeamInfo {
            id: TeamId::from(id),
            full_name: id.to_string(),
            display_name: id.to_string(),
            groups: vec![],
            organization_id: None,
            hash_tag: None,
            is_hidden: false,
            is_out_of_contest: false,
            custom_fields: BTreeMap::new(),
            medias: BTreeMap::new(),
        }
    }

    fn contest(teams: Vec<TeamInfo>) -> ContestInfo {
        ContestInfo {
            name: "Test".into(),
            status: ContestStatus::Over,
            result_type: ContestResultType::Icpc,
            start_time: DateTime::from_timestamp_millis(0).unwrap(),
            contest_length: Duration::from_secs(5 * 3600),
            freeze_time: None,
            problems: vec![ProblemInfo {
                id: ProblemId::from("A"),
                display_name: "A".into(),
                full_name: "Problem A".into(),
                ordinal: 0,
                color: None,
                max_score: None,
                custom_fields: BTreeMap::new(),
            }],
            teams,
            groups: vec![],
            organizations: vec![],
            languages: vec![],
            penalty_rounding_mode: PenaltyRoundingMode::EachSubmissionDownToMinute,
            penalty_per_wrong_attempt: Duration::from_secs(20 * 60),
            score_merge_mode: ScoreMergeMode::MaxTotal,
            awards: AwardsSettings::default(),
            emulation_speed: 1.0,
        }
    }

    fn accepted(id: &str, team_id: &str, minutes: u64) -> RunInfo {
        RunInfo {
            id: RunId::from(id),
            result: RunResult::Icpc {
                verdict: Verdict::Accepted,
                is_first_to_solve: false,
            },
            problem_id: ProblemId::from("A"),
            team_id: TeamId::from(team_id),
            time: Duration::from_secs(minutes * 60),
            language_id: None,
            is_hidden: false,
        }
    }

    #[test]
    fn four_team_single_problem_standings() {
        let info = contest(vec![team("T1"), team("T2"), team("T3"), team("T4")]);
        let runs = vec![
            accepted("1", "T4", 10),
            accepted("2", "T1", 30),
            accepted("3", "T3", 30),
            accepted("4", "T2", 40),
        ];
        let board = calculate(&info, &runs, OptimismLevel::Normal);
        assert_eq!(
            board.ranking.order,
            vec![
                TeamId::from("T4"),
                TeamId::from("T1"),
                TeamId::from("T3"),
                TeamId::from("T2"),
            ]
        );
        assert_eq!(board.ranking.ranks, vec![1, 2, 2, 4]);
    }

    #[test]
    fn hidden_teams_vanish_and_out_of_contest_teams_hold_rank_zero() {
        let mut hidden = team("H");
        hidden.is_hidden = true;
        let mut ooc = team("O");
        ooc.is_out_of_contest = true;
        let info = contest(vec![team("T1"), hidden, ooc]);
        let runs = vec![accepted("1", "H", 5), accepted("2", "O", 6), accepted("3", "T1", 7)];
        let board = calculate(&info, &runs, OptimismLevel::Normal);
        assert_eq!(
            board.ranking.order,
            vec![TeamId::from("O"), TeamId::from("T1")]
        );
        assert_eq!(board.ranking.ranks, vec![0, 1]);
        assert_eq!(board.rows[0].team_id, TeamId::from("O"));
    }

    #[test]
    fn ioi_standings_tag_the_first_best_run() {
        let mut info = contest(vec![team("T1"), team("T2")]);
        info.result_type = ContestResultType::Ioi;
        let ioi_run = |id: &str, team: &str, minutes: u64, points: f64| RunInfo {
            id: RunId::from(id),
            result: RunResult::Ioi {
                score: vec![points],
                is_first_best: false,
            },
            problem_id: ProblemId::from("A"),
            team_id: TeamId::from(team),
            time: Duration::from_secs(minutes * 60),
            language_id: None,
            is_hidden: false,
        };
        let runs = vec![
            ioi_run("1", "T1", 10, 50.0),
            ioi_run("2", "T2", 20, 100.0),
            ioi_run("3", "T1", 30, 100.0),
        ];
        let board = calculate(&info, &runs, OptimismLevel::Normal);
        let cell = |team: &str| {
            board
                .rows
                .iter()
                .find(|row| row.team_id == TeamId::from(team))
                .and_then(|row| row.problem_results.first())
                .cloned()
        };
        match cell("T2") {
            Some(liveboard_model::ProblemResult::Ioi(result)) => assert!(result.is_first_best),
            other => panic!("unexpected T2 cell: {other:?}"),
        }
        match cell("T1") {
            Some(liveboard_model::ProblemResult::Ioi(result)) => assert!(!result.is_first_best),
            other => panic!("unexpected T1 cell: {other:?}"),
        }
    }

    #[test]
    fn rows_align_with_order() {
        let info = contest(vec![team("T1"), team("T2")]);
        let runs = vec![accepted("1", "T2", 10)];
        let board = calculate(&info, &runs, OptimismLevel::Normal);
        assert_eq!(board.rows.len(), 2);
        assert_eq!(board.rows[0].team_id, board.ranking.order[0]);
        assert_eq!(board.rows[0].team_id, TeamId::from("T2"));
        assert_eq!(board.update_type, ScoreboardUpdateType::Snapshot);
    }
}
