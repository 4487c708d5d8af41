//! Terminal front end: reads answers from stdin and prints the screens.

use anyhow::Result;
use async_trait::async_trait;
use comfy_table::{Cell, Table};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use quizrush_core::model::{Multiplier, Question, QuestionResult, Quiz, BASE_POINTS};
use quizrush_core::report::SessionReport;
use quizrush_core::scoring::Standing;
use quizrush_core::traits::{AnswerSource, SessionObserver};

/// Remaining seconds at or below which every tick is shown.
const LOW_TIME_SECS: u32 = 5;

/// Answers typed on stdin, one per line.
pub struct StdinAnswers {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinAnswers {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Read one raw line, `None` at end of input.
    pub async fn read_line(&mut self) -> Result<Option<String>> {
        Ok(self.lines.next_line().await?)
    }
}

impl Default for StdinAnswers {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnswerSource for StdinAnswers {
    async fn next_answer(&mut self, _index: usize, question: &Question) -> Option<usize> {
        loop {
            let line = match self.lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => return None,
                Err(e) => {
                    tracing::warn!("failed to read answer: {e}");
                    return None;
                }
            };
            match parse_choice(&line, question.options.len()) {
                Some(option) => return Some(option),
                None => println!("  Enter a number from 1 to {}", question.options.len()),
            }
        }
    }
}

/// Turn `"2"` or `"b"` into option index 1. Rejects anything outside
/// `1..=options`.
fn parse_choice(line: &str, options: usize) -> Option<usize> {
    let line = line.trim();
    let number = match line.parse::<usize>() {
        Ok(n) => n,
        Err(_) => {
            let mut chars = line.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphabetic() => {
                    (c.to_ascii_lowercase() as u8 - b'a') as usize + 1
                }
                _ => return None,
            }
        }
    };
    (1..=options).contains(&number).then(|| number - 1)
}

fn letter(index: usize) -> char {
    (b'A' + (index % 26) as u8) as char
}

/// Prints every screen of the quiz to stdout.
pub struct ConsoleObserver;

impl ConsoleObserver {
    /// The screen shown before the first question.
    pub fn print_rules(&self, quiz: &Quiz) {
        println!("=== {} ===", quiz.name);
        if !quiz.description.is_empty() {
            println!("{}", quiz.description);
        }
        println!();
        println!("  Questions:  {}", quiz.questions.len());
        println!("  Time limit: {}s per question", quiz.timer_duration_secs);
        let badges: Vec<&str> = Multiplier::ALL.iter().map(|m| m.label()).collect();
        println!(
            "  Multipliers: {} (a correct answer earns {} points times the multiplier)",
            badges.join(" "),
            BASE_POINTS
        );
        println!("  Answer with the option number and press Enter.");
    }
}

impl SessionObserver for ConsoleObserver {
    fn on_question(&self, index: usize, total: usize, question: &Question, duration_secs: u32) {
        println!();
        println!(
            "Question {} of {}  [{}]",
            index + 1,
            total,
            question.multiplier.label()
        );
        println!("  {}", question.prompt);
        for (i, option) in question.options.iter().enumerate() {
            println!("    {}) {}  ({})", i + 1, option, letter(i));
        }
        println!("  You have {duration_secs}s.");
    }

    fn on_tick(&self, remaining: u32) {
        if remaining <= LOW_TIME_SECS || remaining % 5 == 0 {
            println!("  {remaining}s left");
        }
    }

    fn on_result(&self, question: &Question, result: &QuestionResult) {
        let answer = question.correct_text().unwrap_or("?");
        match (result.selected_option, result.is_correct) {
            (None, _) => println!("  Time's up! The answer was {answer}."),
            (Some(_), true) => println!(
                "  Correct! +{} points ({})",
                result.points_earned, result.multiplier
            ),
            (Some(_), false) => println!("  Wrong. The answer was {answer}."),
        }
    }

    fn on_invalid_answer(&self, question: &Question, option: usize) {
        println!(
            "  Option {} does not exist; pick 1 to {}.",
            option + 1,
            question.options.len()
        );
    }

    fn on_finish(&self, report: &SessionReport) {
        println!();
        println!("=== Final score ===");
        println!(
            "Your score: {} / {} ({} of {} correct)",
            report.total_score, report.max_score, report.correct_count, report.question_count
        );

        let mut breakdown = Table::new();
        breakdown.set_header(vec!["#", "Multiplier", "Answer", "Points"]);
        for (i, r) in report.results.iter().enumerate() {
            let answer = match (r.selected_option, r.is_correct) {
                (None, _) => "timeout".to_string(),
                (Some(o), true) => format!("{} correct", o + 1),
                (Some(o), false) => format!("{} wrong", o + 1),
            };
            breakdown.add_row(vec![
                Cell::new(i + 1),
                Cell::new(r.multiplier.label()),
                Cell::new(answer),
                Cell::new(r.points_earned),
            ]);
        }
        println!("{breakdown}");

        if report.standings.len() > 1 {
            println!("{}", standings_table(&report.standings));
        }
        println!("You placed #{}", report.rank);
    }
}

/// Leaderboard table; the player's row is marked.
pub fn standings_table(rows: &[Standing]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Rank", "Name", "Score"]);
    for row in rows {
        let name = if row.is_player {
            format!("> {}", row.name)
        } else {
            row.name.clone()
        };
        table.add_row(vec![Cell::new(row.rank), Cell::new(name), Cell::new(row.score)]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numbers_and_letters() {
        assert_eq!(parse_choice("1", 4), Some(0));
        assert_eq!(parse_choice(" 4 \n", 4), Some(3));
        assert_eq!(parse_choice("b", 4), Some(1));
        assert_eq!(parse_choice("D", 4), Some(3));
    }

    #[test]
    fn rejects_out_of_range_and_garbage() {
        assert_eq!(parse_choice("0", 4), None);
        assert_eq!(parse_choice("5", 4), None);
        assert_eq!(parse_choice("e", 4), None);
        assert_eq!(parse_choice("paris", 4), None);
        assert_eq!(parse_choice("", 4), None);
    }

    #[test]
    fn option_letters() {
        assert_eq!(letter(0), 'A');
        assert_eq!(letter(3), 'D');
    }
}
