//! The `quizrush validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(quiz_path: PathBuf) -> Result<()> {
    let quizzes = if quiz_path.is_dir() {
        quizrush_core::parser::load_quiz_directory(&quiz_path)?
    } else {
        vec![quizrush_core::parser::parse_quiz(&quiz_path)?]
    };

    let mut total_errors = 0;

    for quiz in &quizzes {
        println!(
            "Quiz: {} ({} questions, {}s per question)",
            quiz.name,
            quiz.questions.len(),
            quiz.timer_duration_secs
        );

        let errors = quizrush_core::parser::validate_quiz(quiz);
        for e in &errors {
            let prefix = e
                .question_id()
                .map(|id| format!("  [question {id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} ERROR: {e}");
        }
        total_errors += errors.len();
    }

    if total_errors > 0 {
        anyhow::bail!("{total_errors} problem(s) found");
    }
    println!("All quizzes valid.");

    Ok(())
}
