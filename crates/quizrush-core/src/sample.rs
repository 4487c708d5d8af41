//! The built-in general-knowledge quiz.

use crate::model::{LeaderboardEntry, Multiplier, Question, Quiz, DEFAULT_TIMER_DURATION_SECS};

/// The built-in quiz in its TOML form, as written by `quizrush init`.
pub const SAMPLE_QUIZ_TOML: &str = r#"[quiz]
name = "General Knowledge"
description = "Five quick questions. Harder ones are worth more."
timer_duration_secs = 20

[[questions]]
id = 1
prompt = "What is the capital of France?"
options = ["London", "Berlin", "Paris", "Madrid"]
correct_option = 2
multiplier = 1

[[questions]]
id = 2
prompt = "Which planet is known as the Red Planet?"
options = ["Venus", "Mars", "Jupiter", "Saturn"]
correct_option = 1
multiplier = 2

[[questions]]
id = 3
prompt = "What is the largest ocean on Earth?"
options = ["Atlantic Ocean", "Indian Ocean", "Arctic Ocean", "Pacific Ocean"]
correct_option = 3
multiplier = 0.5

[[questions]]
id = 4
prompt = "Who painted the Mona Lisa?"
options = ["Vincent van Gogh", "Leonardo da Vinci", "Pablo Picasso", "Michelangelo"]
correct_option = 1
multiplier = 3

[[questions]]
id = 5
prompt = "What is the smallest prime number?"
options = ["0", "1", "2", "3"]
correct_option = 2
multiplier = 2

[[leaderboard]]
name = "Sarah Chen"
score = 18

[[leaderboard]]
name = "Alex Kumar"
score = 16

[[leaderboard]]
name = "Jordan Blake"
score = 14

[[leaderboard]]
name = "Taylor Swift"
score = 12

[[leaderboard]]
name = "Morgan Lee"
score = 10
"#;

fn question(
    id: u32,
    prompt: &str,
    options: [&str; 4],
    correct_option: usize,
    multiplier: Multiplier,
) -> Question {
    Question {
        id,
        prompt: prompt.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_option,
        multiplier,
    }
}

/// The built-in quiz: five questions, a 20 second timer and a five-entry
/// leaderboard.
pub fn sample_quiz() -> Quiz {
    let questions = vec![
        question(
            1,
            "What is the capital of France?",
            ["London", "Berlin", "Paris", "Madrid"],
            2,
            Multiplier::Single,
        ),
        question(
            2,
            "Which planet is known as the Red Planet?",
            ["Venus", "Mars", "Jupiter", "Saturn"],
            1,
            Multiplier::Double,
        ),
        question(
            3,
            "What is the largest ocean on Earth?",
            ["Atlantic Ocean", "Indian Ocean", "Arctic Ocean", "Pacific Ocean"],
            3,
            Multiplier::Half,
        ),
        question(
            4,
            "Who painted the Mona Lisa?",
            ["Vincent van Gogh", "Leonardo da Vinci", "Pablo Picasso", "Michelangelo"],
            1,
            Multiplier::Triple,
        ),
        question(
            5,
            "What is the smallest prime number?",
            ["0", "1", "2", "3"],
            2,
            Multiplier::Double,
        ),
    ];

    let leaderboard = [
        ("Sarah Chen", 18.0),
        ("Alex Kumar", 16.0),
        ("Jordan Blake", 14.0),
        ("Taylor Swift", 12.0),
        ("Morgan Lee", 10.0),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (name, score))| LeaderboardEntry {
        rank: i as u32 + 1,
        name: name.to_string(),
        score,
    })
    .collect();

    Quiz {
        name: "General Knowledge".to_string(),
        description: "Five quick questions. Harder ones are worth more.".to_string(),
        timer_duration_secs: DEFAULT_TIMER_DURATION_SECS,
        questions,
        leaderboard,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_quiz_str, validate_quiz};
    use std::path::Path;

    #[test]
    fn toml_matches_builtin() {
        let parsed = parse_quiz_str(SAMPLE_QUIZ_TOML, Path::new("sample.toml")).unwrap();
        assert_eq!(parsed, sample_quiz());
    }

    #[test]
    fn builtin_is_valid() {
        assert!(validate_quiz(&sample_quiz()).is_empty());
    }
}
