//! Freeze masking for public scoreboards.
//!
//! Once a problem's last known submission is at or after the freeze
//! point and the contest is not finalized, the public row keeps attempt
//! counts but loses the submit time and the first-to-solve flag for that
//! problem.

use liveboard_model::{ContestInfo, ProblemResult, ScoreboardRow};

fn is_frozen(info: &ContestInfo, result: &ProblemResult) -> bool {
    let Some(freeze_time) = info.freeze_time else {
        return false;
    };
    if info.status.is_finalized() {
        return false;
    }
    let last_submit = match result {
        ProblemResult::Icpc(r) => r.last_submit_time,
        ProblemResult::Ioi(r) => r.last_submit_time,
    };
    last_submit.is_some_and(|time| time >= freeze_time)
}

/// Masks the frozen cells of one row. Rows for privileged consumers
/// skip this step entirely.
pub fn apply_freeze(info: &ContestInfo, mut row: ScoreboardRow) -> ScoreboardRow {
    for result in &mut row.problem_results {
        if !is_frozen(info, result) {
            continue;
        }
        match result {
            ProblemResult::Icpc(r) => {
                r.last_submit_time = None;
                r.is_first_to_solve = false;
            }
            ProblemResult::Ioi(r) => {
                r.last_submit_time = None;
                r.is_first_best = false;
            }
        }
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use liveboard_model::{
        AwardsSettings, ContestResultType, ContestStatus, IcpcProblemResult, PenaltyRoundingMode,
        ScoreMergeMode, TeamId,
    };
    use std::time::Duration;

    fn contest(status: ContestStatus) -> ContestInfo {
        ContestInfo {
            name: "Test".into(),
            status,
            result_type: ContestResultType::Icpc,
            start_time: DateTime::from_timestamp_millis(0).unwrap(),
            contest_length: Duration::from_secs(5 * 3600),
            freeze_time: Some(Duration::from_secs(4 * 3600)),
            problems: vec![],
            teams: vec![],
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

    fn row_with_submit(hours: u64) -> ScoreboardRow {
        ScoreboardRow {
            team_id: TeamId::from("t1"),
            total_score: 1.0,
            penalty: Duration::ZERO,
            last_accepted_time: None,
            problem_results: vec![ProblemResult::Icpc(IcpcProblemResult {
                wrong_attempts: 2,
                pending_attempts: 1,
                is_solved: true,
                is_first_to_solve: true,
                last_submit_time: Some(Duration::from_secs(hours * 3600)),
            })],
        }
    }

    fn icpc_cell(row: &ScoreboardRow) -> &IcpcProblemResult {
        match &row.problem_results[0] {
            ProblemResult::Icpc(r) => r,
            ProblemResult::Ioi(_) => panic!("expected ICPC cell"),
        }
    }

    #[test]
    fn post_freeze_submit_is_masked_but_counts_stay() {
        let masked = apply_freeze(&contest(ContestStatus::Over), row_with_submit(4));
        let cell = icpc_cell(&masked);
        assert_eq!(cell.last_submit_time, None);
        assert!(!cell.is_first_to_solve);
        assert_eq!(cell.wrong_attempts, 2);
        assert_eq!(cell.pending_attempts, 1);
        assert!(cell.is_solved);
    }

    #[test]
    fn pre_freeze_submit_is_untouched() {
        let masked = apply_freeze(&contest(ContestStatus::Running), row_with_submit(3));
        let cell = icpc_cell(&masked);
        assert_eq!(cell.last_submit_time, Some(Duration::from_secs(3 * 3600)));
        assert!(cell.is_first_to_solve);
    }

    #[test]
    fn finalized_contest_reveals_everything() {
        let masked = apply_freeze(&contest(ContestStatus::Finalized), row_with_submit(4));
        assert!(icpc_cell(&masked).last_submit_time.is_some());
    }
}
