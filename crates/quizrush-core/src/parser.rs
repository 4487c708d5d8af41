//! TOML quiz parser.
//!
//! Loads quizzes from TOML files and directories, and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::QuizError;
use crate::model::{LeaderboardEntry, Multiplier, Question, Quiz, DEFAULT_TIMER_DURATION_SECS};

/// Intermediate TOML structure for parsing quiz files.
#[derive(Debug, Deserialize)]
struct TomlQuizFile {
    quiz: TomlQuizHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
    #[serde(default)]
    leaderboard: Vec<TomlLeaderboardEntry>,
}

#[derive(Debug, Deserialize)]
struct TomlQuizHeader {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_timer_duration")]
    timer_duration_secs: u32,
}

fn default_timer_duration() -> u32 {
    DEFAULT_TIMER_DURATION_SECS
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: u32,
    prompt: String,
    #[serde(default)]
    options: Vec<String>,
    correct_option: usize,
    #[serde(default = "default_multiplier")]
    multiplier: Multiplier,
}

fn default_multiplier() -> Multiplier {
    Multiplier::Single
}

#[derive(Debug, Deserialize)]
struct TomlLeaderboardEntry {
    #[serde(default)]
    rank: Option<u32>,
    name: String,
    score: f64,
}

/// Parse a single TOML file into a `Quiz`.
pub fn parse_quiz(path: &Path) -> Result<Quiz> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz file: {}", path.display()))?;

    parse_quiz_str(&content, path)
}

/// Parse a TOML string into a `Quiz` (useful for testing).
///
/// Leaderboard entries without an explicit `rank` are ranked by their
/// position in the file.
pub fn parse_quiz_str(content: &str, source_path: &Path) -> Result<Quiz> {
    let parsed: TomlQuizFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| Question {
            id: q.id,
            prompt: q.prompt,
            options: q.options,
            correct_option: q.correct_option,
            multiplier: q.multiplier,
        })
        .collect();

    let leaderboard = parsed
        .leaderboard
        .into_iter()
        .enumerate()
        .map(|(i, e)| LeaderboardEntry {
            rank: e.rank.unwrap_or(i as u32 + 1),
            name: e.name,
            score: e.score,
        })
        .collect();

    Ok(Quiz {
        name: parsed.quiz.name,
        description: parsed.quiz.description,
        timer_duration_secs: parsed.quiz.timer_duration_secs,
        questions,
        leaderboard,
    })
}

/// Recursively load all `.toml` quiz files from a directory.
pub fn load_quiz_directory(dir: &Path) -> Result<Vec<Quiz>> {
    let mut quizzes = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            quizzes.extend(load_quiz_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_quiz(&path) {
                Ok(quiz) => quizzes.push(quiz),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(quizzes)
}

/// Check a quiz for everything that would make a session misbehave.
///
/// Returns every problem found, in question order. An empty result means
/// the quiz is playable.
pub fn validate_quiz(quiz: &Quiz) -> Vec<QuizError> {
    let mut errors = Vec::new();

    if quiz.questions.is_empty() {
        errors.push(QuizError::NoQuestions);
    }
    if quiz.timer_duration_secs == 0 {
        errors.push(QuizError::ZeroDuration);
    }

    let mut seen_ids = HashSet::new();
    for q in &quiz.questions {
        if !seen_ids.insert(q.id) {
            errors.push(QuizError::DuplicateQuestionId { id: q.id });
        }
        if q.prompt.trim().is_empty() {
            errors.push(QuizError::EmptyPrompt { id: q.id });
        }
        if q.options.len() < 2 {
            errors.push(QuizError::TooFewOptions {
                id: q.id,
                found: q.options.len(),
            });
        }
        if q.correct_option >= q.options.len() {
            errors.push(QuizError::CorrectOptionOutOfRange {
                id: q.id,
                index: q.correct_option,
                options: q.options.len(),
            });
        }
    }

    let mut seen_ranks = HashSet::new();
    for entry in &quiz.leaderboard {
        if entry.rank == 0 {
            errors.push(QuizError::ZeroRank {
                name: entry.name.clone(),
            });
        }
        if !seen_ranks.insert(entry.rank) {
            errors.push(QuizError::DuplicateRank { rank: entry.rank });
        }
    }

    let mut by_rank: Vec<_> = quiz.leaderboard.iter().collect();
    by_rank.sort_by_key(|e| e.rank);
    for pair in by_rank.windows(2) {
        let (above, below) = (pair[0], pair[1]);
        if above.rank < below.rank && below.score > above.score {
            errors.push(QuizError::RankOutOfOrder {
                rank: below.rank,
                score: below.score,
                above_rank: above.rank,
                above_score: above.score,
            });
        }
    }

    errors
}
