pub mod init;
pub mod leaderboard;
pub mod play;
pub mod validate;

use std::path::Path;

use anyhow::Result;

use quizrush_core::config::QuizrushConfig;
use quizrush_core::model::Quiz;
use quizrush_core::parser;
use quizrush_core::sample::sample_quiz;

/// Pick the quiz to use: explicit path, then the configured one, then the
/// built-in sample.
fn resolve_quiz(path: Option<&Path>, config: &QuizrushConfig) -> Result<Quiz> {
    match path.or(config.quiz_path.as_deref()) {
        Some(path) => parser::parse_quiz(path),
        None => Ok(sample_quiz()),
    }
}
