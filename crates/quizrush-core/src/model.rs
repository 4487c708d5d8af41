//! Core data model types for quizrush.
//!
//! These are the immutable inputs a session is built from (questions,
//! leaderboard, timer budget) and the per-question results it produces.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Points awarded for a correct answer before the multiplier is applied.
pub const BASE_POINTS: f64 = 2.0;

/// Default per-question time budget in seconds.
pub const DEFAULT_TIMER_DURATION_SECS: u32 = 20;

/// Scoring factor applied to [`BASE_POINTS`] for a correct answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum Multiplier {
    Half,
    Single,
    Double,
    Triple,
}

impl Multiplier {
    /// All multipliers, smallest first.
    pub const ALL: [Multiplier; 4] = [
        Multiplier::Half,
        Multiplier::Single,
        Multiplier::Double,
        Multiplier::Triple,
    ];

    /// The numeric factor (0.5, 1, 2 or 3).
    pub fn factor(self) -> f64 {
        match self {
            Multiplier::Half => 0.5,
            Multiplier::Single => 1.0,
            Multiplier::Double => 2.0,
            Multiplier::Triple => 3.0,
        }
    }

    /// Short badge label, e.g. `½×` or `3×`.
    pub fn label(self) -> &'static str {
        match self {
            Multiplier::Half => "½×",
            Multiplier::Single => "1×",
            Multiplier::Double => "2×",
            Multiplier::Triple => "3×",
        }
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<f64> for Multiplier {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Multiplier::ALL
            .into_iter()
            .find(|m| m.factor() == value)
            .ok_or_else(|| format!("unsupported multiplier: {value} (expected 0.5, 1, 2 or 3)"))
    }
}

impl From<Multiplier> for f64 {
    fn from(m: Multiplier) -> f64 {
        m.factor()
    }
}

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique, stable identifier.
    pub id: u32,
    /// The question text shown to the player.
    pub prompt: String,
    /// Answer options in display order.
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    pub correct_option: usize,
    /// Scoring factor for a correct answer.
    pub multiplier: Multiplier,
}

impl Question {
    /// Whether `option` is the correct answer.
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_option
    }

    /// Text of the correct option, if the index is in range.
    pub fn correct_text(&self) -> Option<&str> {
        self.options.get(self.correct_option).map(String::as_str)
    }
}

/// A static leaderboard row. Read-only for the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub name: String,
    pub score: f64,
}

/// An immutable quiz snapshot: questions, timer budget and leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    /// Human-readable name.
    pub name: String,
    /// Optional description shown on the rules screen.
    #[serde(default)]
    pub description: String,
    /// Seconds allowed per question.
    #[serde(default = "default_timer_duration")]
    pub timer_duration_secs: u32,
    /// Questions in presentation order.
    pub questions: Vec<Question>,
    /// Leaderboard the final score is ranked against.
    #[serde(default)]
    pub leaderboard: Vec<LeaderboardEntry>,
}

fn default_timer_duration() -> u32 {
    DEFAULT_TIMER_DURATION_SECS
}

impl Quiz {
    /// Scores of every leaderboard entry, in leaderboard order.
    pub fn leaderboard_scores(&self) -> Vec<f64> {
        self.leaderboard.iter().map(|e| e.score).collect()
    }
}

/// Outcome of one question. Appended once and never modified.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    /// The [`Question::id`] this result belongs to.
    pub question_id: u32,
    pub is_correct: bool,
    /// Copied from the question at answer time.
    pub multiplier: Multiplier,
    pub points_earned: f64,
    /// The chosen option, or `None` if the timer expired.
    pub selected_option: Option<usize>,
}

impl QuestionResult {
    /// Whether this result was recorded by a timeout.
    pub fn timed_out(&self) -> bool {
        self.selected_option.is_none()
    }
}

/// Current phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    NotStarted,
    AwaitingAnswer,
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::NotStarted => write!(f, "not-started"),
            Phase::AwaitingAnswer => write!(f, "awaiting-answer"),
            Phase::Finished => write!(f, "finished"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplier_factor_and_label() {
        assert_eq!(Multiplier::Half.factor(), 0.5);
        assert_eq!(Multiplier::Triple.factor(), 3.0);
        assert_eq!(Multiplier::Half.label(), "½×");
        assert_eq!(Multiplier::Double.to_string(), "2×");
    }

    #[test]
    fn multiplier_from_number() {
        assert_eq!(Multiplier::try_from(0.5).unwrap(), Multiplier::Half);
        assert_eq!(Multiplier::try_from(1.0).unwrap(), Multiplier::Single);
        assert!(Multiplier::try_from(1.5).is_err());
        assert!(Multiplier::try_from(0.0).is_err());
    }

    #[test]
    fn multiplier_serializes_as_number() {
        let json = serde_json::to_string(&Multiplier::Half).unwrap();
        assert_eq!(json, "0.5");
        let parsed: Multiplier = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, Multiplier::Triple);
        assert!(serde_json::from_str::<Multiplier>("4").is_err());
    }

    #[test]
    fn phase_display() {
        assert_eq!(Phase::NotStarted.to_string(), "not-started");
        assert_eq!(Phase::AwaitingAnswer.to_string(), "awaiting-answer");
        assert_eq!(Phase::Finished.to_string(), "finished");
    }

    #[test]
    fn timeout_result_has_no_selection() {
        let result = QuestionResult {
            question_id: 1,
            is_correct: false,
            multiplier: Multiplier::Single,
            points_earned: 0.0,
            selected_option: None,
        };
        assert!(result.timed_out());
    }
}
