//! Points, totals and leaderboard placement.
//!
//! Everything here is pure: no session state, no clock.

use serde::{Deserialize, Serialize};

use crate::model::{LeaderboardEntry, Multiplier, Question, QuestionResult, BASE_POINTS};

/// Points for one answer.
///
/// A wrong answer (or a timeout) is worth nothing regardless of the
/// multiplier; a correct one is worth `BASE_POINTS * multiplier`.
pub fn score(is_correct: bool, multiplier: Multiplier) -> f64 {
    if !is_correct {
        return 0.0;
    }
    BASE_POINTS * multiplier.factor()
}

/// Sum of `points_earned` over all results. Zero for an empty slice.
pub fn total_score(results: &[QuestionResult]) -> f64 {
    results.iter().map(|r| r.points_earned).sum()
}

/// The best achievable total for a question list.
pub fn max_score(questions: &[Question]) -> f64 {
    questions.iter().map(|q| score(true, q.multiplier)).sum()
}

/// Number of correctly answered questions.
pub fn correct_count(results: &[QuestionResult]) -> usize {
    results.iter().filter(|r| r.is_correct).count()
}

/// 1-based rank of `user_score` against a leaderboard.
///
/// Every entry scoring at least as much as the user ranks above them, so
/// a tie places the user below the tied entry.
pub fn rank(user_score: f64, leaderboard_scores: &[f64]) -> usize {
    leaderboard_scores
        .iter()
        .filter(|&&s| s >= user_score)
        .count()
        + 1
}

/// One row of the final leaderboard with the player inserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub rank: usize,
    pub name: String,
    pub score: f64,
    /// Whether this row is the player.
    pub is_player: bool,
}

/// Merge the player into the leaderboard.
///
/// The player takes [`rank`]; entries whose rank is at or below it move
/// down one place. Rows are returned in rank order.
pub fn standings(player: &str, user_score: f64, leaderboard: &[LeaderboardEntry]) -> Vec<Standing> {
    let scores: Vec<f64> = leaderboard.iter().map(|e| e.score).collect();
    let player_rank = rank(user_score, &scores);

    let mut rows: Vec<Standing> = leaderboard
        .iter()
        .map(|entry| {
            let entry_rank = entry.rank as usize;
            Standing {
                rank: if entry_rank >= player_rank {
                    entry_rank + 1
                } else {
                    entry_rank
                },
                name: entry.name.clone(),
                score: entry.score,
                is_player: false,
            }
        })
        .collect();

    rows.push(Standing {
        rank: player_rank,
        name: player.to_string(),
        score: user_score,
        is_player: true,
    });
    rows.sort_by_key(|r| r.rank);
    rows
}
