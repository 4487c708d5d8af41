//! quizrush configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::Quiz;

/// Top-level quizrush configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizrushConfig {
    /// Name shown for the player on the leaderboard.
    #[serde(default = "default_player_name")]
    pub player_name: String,
    /// Overrides the quiz's own per-question time budget.
    #[serde(default)]
    pub timer_duration_secs: Option<u32>,
    /// Quiz to play when none is given on the command line.
    #[serde(default)]
    pub quiz_path: Option<PathBuf>,
    /// Directory session reports are exported to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_player_name() -> String {
    "You".to_string()
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./quizrush-results")
}

impl Default for QuizrushConfig {
    fn default() -> Self {
        Self {
            player_name: default_player_name(),
            timer_duration_secs: None,
            quiz_path: None,
            output_dir: default_output_dir(),
        }
    }
}

impl QuizrushConfig {
    /// Apply the configured overrides to a freshly loaded quiz.
    pub fn apply(&self, quiz: &mut Quiz) {
        if let Some(secs) = self.timer_duration_secs {
            quiz.timer_duration_secs = secs;
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizrush.toml` in the current directory
/// 2. `~/.config/quizrush/config.toml`
///
/// Environment variable override: `QUIZRUSH_PLAYER`.
pub fn load_config() -> Result<QuizrushConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizrushConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizrush.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizrushConfig::default(),
    };

    if let Ok(player) = std::env::var("QUIZRUSH_PLAYER") {
        if !player.trim().is_empty() {
            config.player_name = player;
        }
    }

    Ok(config)
}

/// Parse a config document, resolving `${VAR}` references in paths and names.
pub fn parse_config_str(content: &str) -> Result<QuizrushConfig> {
    let mut config: QuizrushConfig = toml::from_str(content)?;
    config.player_name = resolve_env_vars(&config.player_name);
    if config.player_name.trim().is_empty() {
        config.player_name = default_player_name();
    }
    config.quiz_path = config
        .quiz_path
        .map(|p| PathBuf::from(resolve_env_vars(&p.to_string_lossy())));
    config.output_dir = PathBuf::from(resolve_env_vars(&config.output_dir.to_string_lossy()));
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizrush"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_quiz;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_QUIZRUSH_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_QUIZRUSH_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_QUIZRUSH_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no_close_${"), "no_close_${");
        std::env::remove_var("_QUIZRUSH_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = QuizrushConfig::default();
        assert_eq!(config.player_name, "You");
        assert_eq!(config.timer_duration_secs, None);
        assert_eq!(config.output_dir, PathBuf::from("./quizrush-results"));
    }

    #[test]
    fn parse_full_config() {
        std::env::set_var("_QUIZRUSH_TEST_DIR", "/tmp/quizzes");
        let config = parse_config_str(
            r#"
player_name = "Robin"
timer_duration_secs = 10
quiz_path = "${_QUIZRUSH_TEST_DIR}/geo.toml"
output_dir = "reports"
"#,
        )
        .unwrap();
        std::env::remove_var("_QUIZRUSH_TEST_DIR");

        assert_eq!(config.player_name, "Robin");
        assert_eq!(config.timer_duration_secs, Some(10));
        assert_eq!(config.quiz_path, Some(PathBuf::from("/tmp/quizzes/geo.toml")));
        assert_eq!(config.output_dir, PathBuf::from("reports"));
    }

    #[test]
    fn unset_player_variable_falls_back() {
        let config = parse_config_str("player_name = \"${_QUIZRUSH_UNSET_VAR}\"").unwrap();
        assert_eq!(config.player_name, "You");
    }

    #[test]
    fn empty_config_uses_defaults() {
        assert_eq!(parse_config_str("").unwrap(), QuizrushConfig::default());
    }

    #[test]
    fn override_timer_duration() {
        let mut quiz = sample_quiz();
        let config = QuizrushConfig {
            timer_duration_secs: Some(5),
            ..QuizrushConfig::default()
        };
        config.apply(&mut quiz);
        assert_eq!(quiz.timer_duration_secs, 5);

        QuizrushConfig::default().apply(&mut quiz);
        assert_eq!(quiz.timer_duration_secs, 5);
    }

    #[test]
    fn missing_explicit_config_fails() {
        let err = load_config_from(Some(Path::new("/nonexistent/quizrush.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn load_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizrush.toml");
        std::fs::write(&path, "timer_duration_secs = 7\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.timer_duration_secs, Some(7));
    }
}
