//! Error types for quiz data and session transitions.
//!
//! `QuizError` describes malformed quiz data and is detected before a
//! session starts. `SessionError` is a contract violation by the caller
//! (a transition attempted from the wrong phase, or an answer outside the
//! option range); the presentation layer is expected to prevent it.

use thiserror::Error;

use crate::model::Phase;

/// Problems found in a quiz before a session may start.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuizError {
    /// The quiz has no questions.
    #[error("quiz has no questions")]
    NoQuestions,

    /// The per-question timer is zero seconds.
    #[error("timer duration must be at least 1 second")]
    ZeroDuration,

    /// Two questions share an id.
    #[error("question {id}: duplicate question id")]
    DuplicateQuestionId { id: u32 },

    /// The prompt is empty or whitespace.
    #[error("question {id}: prompt is empty")]
    EmptyPrompt { id: u32 },

    /// Fewer than two options.
    #[error("question {id}: needs at least 2 options, found {found}")]
    TooFewOptions { id: u32, found: usize },

    /// The correct option index is not a valid option.
    #[error("question {id}: correct option {index} is out of range (0..{options})")]
    CorrectOptionOutOfRange { id: u32, index: usize, options: usize },

    /// Two leaderboard entries claim the same rank.
    #[error("leaderboard: duplicate rank {rank}")]
    DuplicateRank { rank: u32 },

    /// Leaderboard ranks start at 1.
    #[error("leaderboard: {name} has rank 0, ranks start at 1")]
    ZeroRank { name: String },

    /// A lower-ranked entry outscores the one above it.
    #[error("leaderboard: rank {rank} scores {score}, more than rank {above_rank} ({above_score})")]
    RankOutOfOrder {
        rank: u32,
        score: f64,
        above_rank: u32,
        above_score: f64,
    },
}

impl QuizError {
    /// The question this error refers to, if any.
    pub fn question_id(&self) -> Option<u32> {
        match self {
            QuizError::DuplicateQuestionId { id }
            | QuizError::EmptyPrompt { id }
            | QuizError::TooFewOptions { id, .. }
            | QuizError::CorrectOptionOutOfRange { id, .. } => Some(*id),
            _ => None,
        }
    }
}

/// A session transition the caller should never have attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The operation is not valid in the current phase.
    #[error("{operation} is not allowed while {phase}")]
    WrongPhase {
        operation: &'static str,
        phase: Phase,
    },

    /// The selected option does not exist on the current question.
    #[error("question {question_id}: option {option} is out of range (0..{options})")]
    OptionOutOfRange {
        question_id: u32,
        option: usize,
        options: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_errors_name_the_question() {
        let err = QuizError::CorrectOptionOutOfRange {
            id: 7,
            index: 4,
            options: 4,
        };
        assert_eq!(err.question_id(), Some(7));
        assert!(err.to_string().starts_with("question 7:"));
        assert_eq!(QuizError::NoQuestions.question_id(), None);
    }

    #[test]
    fn wrong_phase_message() {
        let err = SessionError::WrongPhase {
            operation: "submit_answer",
            phase: Phase::Finished,
        };
        assert_eq!(
            err.to_string(),
            "submit_answer is not allowed while finished"
        );
    }
}
