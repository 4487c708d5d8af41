//! The `quizrush leaderboard` command.

use std::path::PathBuf;

use anyhow::Result;

use quizrush_core::config::load_config_from;
use quizrush_core::parser::validate_quiz;
use quizrush_core::scoring::{rank, standings, Standing};

use crate::console::standings_table;

pub fn execute(
    quiz_path: Option<PathBuf>,
    score: Option<f64>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let quiz = super::resolve_quiz(quiz_path.as_deref(), &config)?;
    if let Some(err) = validate_quiz(&quiz).into_iter().next() {
        anyhow::bail!("{} cannot be ranked against: {err}", quiz.name);
    }

    if quiz.leaderboard.is_empty() {
        println!("{} has no leaderboard.", quiz.name);
        return Ok(());
    }

    println!("Leaderboard: {}", quiz.name);
    let rows = match score {
        Some(score) => {
            anyhow::ensure!(score >= 0.0, "score cannot be negative");
            standings(&config.player_name, score, &quiz.leaderboard)
        }
        None => quiz
            .leaderboard
            .iter()
            .map(|e| Standing {
                rank: e.rank as usize,
                name: e.name.clone(),
                score: e.score,
                is_player: false,
            })
            .collect(),
    };
    println!("{}", standings_table(&rows));

    if let Some(score) = score {
        println!(
            "A score of {score} would place #{}",
            rank(score, &quiz.leaderboard_scores())
        );
    }

    Ok(())
}
