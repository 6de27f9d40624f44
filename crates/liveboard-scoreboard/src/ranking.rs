//! Standings order, standard competition ranks, and awards.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use liveboard_model::{Award, ContestInfo, MedalTiebreakMode, Ranking, ScoreboardRow, TeamId};

fn better(a: &ScoreboardRow, b: &ScoreboardRow) -> Ordering {
    b.total_score
        .total_cmp(&a.total_score)
        .then(a.penalty.cmp(&b.penalty))
}

fn same_result(a: &ScoreboardRow, b: &ScoreboardRow) -> bool {
    better(a, b) == Ordering::Equal
}

/// Sorts rows best-first and assigns standard competition ranks: ties
/// share the rank, the next distinct result skips the tied slots.
/// Order among exact ties follows the input order. Out-of-contest teams
/// keep their sorted position but get rank 0 and consume no rank.
pub fn rank(info: &ContestInfo, rows: &[ScoreboardRow]) -> Ranking {
    let mut sorted: Vec<&ScoreboardRow> = rows.iter().collect();
    sorted.sort_by(|a, b| better(a, b));

    let out_of_contest = |id: &TeamId| {
        info.team(id)
            .is_some_and(|team| team.is_out_of_contest)
    };

    let mut ranks = Vec::with_capacity(sorted.len());
    let mut place = 0u32;
    let mut current = 0u32;
    let mut prev_ranked: Option<&ScoreboardRow> = None;
    for &row in &sorted {
        if out_of_contest(&row.team_id) {
            ranks.push(0);
            continue;
        }
        place += 1;
        if !prev_ranked.is_some_and(|prev| same_result(row, prev)) {
            current = place;
        }
        ranks.push(current);
        prev_ranked = Some(row);
    }

    let awards = build_awards(info, &sorted, &ranks);
    Ranking {
        order: sorted.iter().map(|row| row.team_id.clone()).collect(),
        ranks,
        awards,
    }
}

fn teams_at_rank(sorted: &[&ScoreboardRow], ranks: &[u32], rank: u32) -> BTreeSet<TeamId> {
    sorted
        .iter()
        .zip(ranks)
        .filter(|(_, r)| **r == rank)
        .map(|(row, _)| row.team_id.clone())
        .collect()
}

fn build_awards(info: &ContestInfo, sorted: &[&ScoreboardRow], ranks: &[u32]) -> Vec<Award> {
    let settings = &info.awards;
    let mut awards = Vec::new();

    if let Some(title) = &settings.champion_title {
        let teams = teams_at_rank(sorted, ranks, 1);
        if !teams.is_empty() {
            awards.push(Award::Winner {
                id: "winner".to_string(),
                citation: title.clone(),
                teams,
            });
        }
    }

    // Medal tiers consume the sorted list cumulatively, skipping
    // rank-0 (out-of-contest) rows.
    let mut next = 0usize;
    for tier in &settings.medal_tiers {
        let mut teams = BTreeSet::new();
        let floor = tier.min_score.unwrap_or(f64::MIN);
        let mut last_medaled: Option<&ScoreboardRow> = None;
        while next < sorted.len() && teams.len() < tier.count {
            if ranks[next] == 0 {
                next += 1;
                continue;
            }
            if sorted[next].total_score < floor {
                break;
            }
            teams.insert(sorted[next].team_id.clone());
            last_medaled = Some(sorted[next]);
            next += 1;
        }
        if tier.tiebreak_mode == MedalTiebreakMode::All {
            if let Some(last) = last_medaled {
                while next < sorted.len() {
                    if ranks[next] == 0 {
                        next += 1;
                        continue;
                    }
                    if !same_result(sorted[next], last) || sorted[next].total_score < floor {
                        break;
                    }
                    teams.insert(sorted[next].team_id.clone());
                    next += 1;
                }
            }
        }
        if !teams.is_empty() {
            awards.push(Award::Medal {
                id: tier.id.clone(),
                citation: tier.citation.clone(),
                color: tier.color,
                teams,
            });
        }
    }

    for (group_id, title) in &settings.group_champion_titles {
        let best_rank = sorted
            .iter()
            .zip(ranks)
            .filter(|(row, r)| {
                **r > 0
                    && info
                        .team(&row.team_id)
                        .is_some_and(|team| team.groups.contains(group_id))
            })
            .map(|(_, r)| *r)
            .min();
        if let Some(best) = best_rank {
            let teams: BTreeSet<TeamId> = sorted
                .iter()
                .zip(ranks)
                .filter(|(row, r)| {
                    **r == best
                        && info
                            .team(&row.team_id)
                            .is_some_and(|team| team.groups.contains(group_id))
                })
                .map(|(row, _)| row.team_id.clone())
                .collect();
            awards.push(Award::GroupChampion {
                id: format!("group-winner-{group_id}"),
                citation: title.clone(),
                group_id: group_id.clone(),
                teams,
            });
        }
    }

    for place in 1..=settings.rank_award_max_rank {
        let teams = teams_at_rank(sorted, ranks, place);
        if !teams.is_empty() {
            awards.push(Award::Custom {
                id: format!("rank-{place}"),
                citation: format!("Rank {place}"),
                teams,
            });
        }
    }

    for manual in &settings.manual {
        awards.push(Award::Custom {
            id: manual.id.clone(),
            citation: manual.citation.clone(),
            teams: manual.team_ids.iter().cloned().collect(),
        });
    }

    awards
}
