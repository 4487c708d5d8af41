//! Final score report for a finished session, with JSON export.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Phase, QuestionResult};
use crate::scoring::{correct_count, max_score, rank, standings, total_score, Standing};
use crate::session::SessionMachine;
use crate::timer::TimerScheduler;

/// Everything the score screen shows once a session is finished.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// The session this report was built from.
    pub id: Uuid,
    /// When the report was created.
    pub finished_at: DateTime<Utc>,
    pub quiz_name: String,
    pub player: String,
    /// Per-question results in question order.
    pub results: Vec<QuestionResult>,
    pub total_score: f64,
    /// Total for a perfect run.
    pub max_score: f64,
    pub correct_count: usize,
    pub question_count: usize,
    /// The player's 1-based rank against the leaderboard.
    pub rank: usize,
    /// Leaderboard with the player inserted.
    pub standings: Vec<Standing>,
}

impl SessionReport {
    /// Build the report for a finished session.
    ///
    /// Returns `None` while the session is not finished.
    pub fn from_machine<S: TimerScheduler>(
        machine: &SessionMachine<S>,
        player: &str,
    ) -> Option<Self> {
        if machine.phase() != Phase::Finished {
            return None;
        }

        let quiz = machine.quiz();
        let results = machine.results().to_vec();
        let total = total_score(&results);

        Some(Self {
            id: machine.session().id(),
            finished_at: Utc::now(),
            quiz_name: quiz.name.clone(),
            player: player.to_string(),
            total_score: total,
            max_score: max_score(&quiz.questions),
            correct_count: correct_count(&results),
            question_count: quiz.questions.len(),
            rank: rank(total, &quiz.leaderboard_scores()),
            standings: standings(player, total, &quiz.leaderboard),
            results,
        })
    }

    /// Share of questions answered correctly, in `0.0..=1.0`.
    pub fn accuracy(&self) -> f64 {
        if self.question_count == 0 {
            return 0.0;
        }
        self.correct_count as f64 / self.question_count as f64
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }
}
