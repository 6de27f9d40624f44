//! ICPC time-penalty computation.

use std::time::Duration;

use liveboard_model::PenaltyRoundingMode;

const MINUTE: Duration = Duration::from_secs(60);

fn down_to_minute(time: Duration) -> Duration {
    Duration::from_secs(time.as_secs() / 60 * 60)
}

fn up_to_minute(time: Duration) -> Duration {
    let floored = down_to_minute(time);
    if floored == time {
        floored
    } else {
        floored + MINUTE
    }
}

/// Accumulates one `(accepted time, wrong attempts before it)` entry per
/// solved problem and produces the team's total penalty.
#[derive(Debug, Clone)]
pub struct PenaltyCalculator {
    mode: PenaltyRoundingMode,
    per_wrong_attempt: Duration,
    solved: Vec<(Duration, u32)>,
}

impl PenaltyCalculator {
    pub fn new(mode: PenaltyRoundingMode, per_wrong_attempt: Duration) -> Self {
        Self {
            mode,
            per_wrong_attempt,
            solved: Vec::new(),
        }
    }

    pub fn add_solved(&mut self, accepted_time: Duration, wrong_attempts: u32) {
        self.solved.push((accepted_time, wrong_attempts));
    }

    pub fn total(&self) -> Duration {
        let wrong_total = self
            .solved
            .iter()
            .map(|(_, wrongs)| self.per_wrong_attempt * *wrongs)
            .sum::<Duration>();
        match self.mode {
            PenaltyRoundingMode::EachSubmissionDownToMinute => {
                self.solved
                    .iter()
                    .map(|(time, _)| down_to_minute(*time))
                    .sum::<Duration>()
                    + wrong_total
            }
            PenaltyRoundingMode::EachSubmissionUpToMinute => {
                self.solved
                    .iter()
                    .map(|(time, _)| up_to_minute(*time))
                    .sum::<Duration>()
                    + wrong_total
            }
            PenaltyRoundingMode::SumDownToMinute => {
                down_to_minute(self.solved.iter().map(|(time, _)| *time).sum()) + wrong_total
            }
            PenaltyRoundingMode::SumInSeconds => {
                let sum: Duration = self.solved.iter().map(|(time, _)| *time).sum();
                Duration::from_secs(sum.as_secs()) + wrong_total
            }
            PenaltyRoundingMode::Last => {
                self.solved
                    .iter()
                    .map(|(time, _)| down_to_minute(*time))
                    .max()
                    .unwrap_or(Duration::ZERO)
                    + wrong_total
            }
            PenaltyRoundingMode::Zero => Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PER_WRONG: Duration = Duration::from_secs(20 * 60);

    fn total(mode: PenaltyRoundingMode, solved: &[(u64, u32)]) -> u64 {
        let mut calc = PenaltyCalculator::new(mode, PER_WRONG);
        for (secs, wrongs) in solved {
            calc.add_solved(Duration::from_secs(*secs), *wrongs);
        }
        calc.total().as_secs()
    }

    #[test]
    fn each_submission_floors_before_summing() {
        // 10:30 and 20:45 floor to 10:00 + 20:00, plus one wrong attempt
        let secs = total(
            PenaltyRoundingMode::EachSubmissionDownToMinute,
            &[(630, 0), (1245, 1)],
        );
        assert_eq!(secs, 600 + 1200 + 1200);
    }

    #[test]
    fn sum_mode_floors_once() {
        // 10:30 + 20:45 = 31:15, floored to 31:00
        let secs = total(PenaltyRoundingMode::SumDownToMinute, &[(630, 0), (1245, 0)]);
        assert_eq!(secs, 31 * 60);
    }

    #[test]
    fn up_to_minute_rounds_exact_times_down() {
        let secs = total(
            PenaltyRoundingMode::EachSubmissionUpToMinute,
            &[(600, 0), (601, 0)],
        );
        assert_eq!(secs, 600 + 660);
    }

    #[test]
    fn last_mode_keeps_only_latest_solve() {
        let secs = total(PenaltyRoundingMode::Last, &[(630, 1), (1245, 0)]);
        assert_eq!(secs, 1200 + 1200);
    }

    #[test]
    fn zero_mode_ignores_everything() {
        assert_eq!(total(PenaltyRoundingMode::Zero, &[(630, 5)]), 0);
    }
}
