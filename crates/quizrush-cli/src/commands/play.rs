//! The `quizrush play` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizrush_core::config::load_config_from;
use quizrush_core::driver;
use quizrush_core::report::SessionReport;
use quizrush_core::session::SessionMachine;
use quizrush_core::timer::TokioScheduler;

use crate::console::{ConsoleObserver, StdinAnswers};

pub async fn execute(
    quiz_path: Option<PathBuf>,
    name: Option<String>,
    duration: Option<u32>,
    output: Option<PathBuf>,
    save: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    if let Some(secs) = duration {
        anyhow::ensure!(secs >= 1, "duration must be at least 1 second");
    }

    let config = load_config_from(config_path.as_deref())?;
    let mut quiz = super::resolve_quiz(quiz_path.as_deref(), &config)?;
    config.apply(&mut quiz);
    if let Some(secs) = duration {
        quiz.timer_duration_secs = secs;
    }
    let player = name.unwrap_or_else(|| config.player_name.clone());

    let (scheduler, mut events) = TokioScheduler::channel();
    let mut machine = SessionMachine::new(quiz, scheduler)
        .with_context(|| format!("quiz cannot be played: {}", display_source(&quiz_path)))?;

    let observer = ConsoleObserver;
    let mut answers = StdinAnswers::new();
    observer.print_rules(machine.quiz());

    loop {
        let report =
            driver::play(&mut machine, &mut events, &mut answers, &observer, &player).await?;
        export(&report, output.as_ref(), save.then_some(&config.output_dir))?;

        println!("\nPlay again? [y/N]");
        match answers.read_line().await? {
            Some(line) if line.trim().eq_ignore_ascii_case("y") => continue,
            _ => break,
        }
    }

    Ok(())
}

fn display_source(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "configured quiz".to_string())
}

fn export(report: &SessionReport, output: Option<&PathBuf>, dir: Option<&PathBuf>) -> Result<()> {
    if let Some(path) = output {
        report.save_json(path)?;
        eprintln!("Report saved to: {}", path.display());
    }
    if let Some(dir) = dir {
        let timestamp = report.finished_at.format("%Y-%m-%dT%H%M%S");
        let path = dir.join(format!("report-{timestamp}.json"));
        report.save_json(&path)?;
        eprintln!("Report saved to: {}", path.display());
    }
    Ok(())
}
