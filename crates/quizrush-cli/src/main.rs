//! quizrush CLI: timed trivia in the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod console;

#[derive(Parser)]
#[command(name = "quizrush", version, about = "Timed trivia quiz with score multipliers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a quiz
    Play {
        /// Path to a .toml quiz (default: config, then the built-in quiz)
        #[arg(long)]
        quiz: Option<PathBuf>,

        /// Player name shown on the leaderboard
        #[arg(long)]
        name: Option<String>,

        /// Seconds per question (overrides quiz and config)
        #[arg(long)]
        duration: Option<u32>,

        /// Write the final report as JSON to this file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write the final report into the configured output directory
        #[arg(long)]
        save: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate quiz TOML files
    Validate {
        /// Path to quiz file or directory
        #[arg(long)]
        quiz: PathBuf,
    },

    /// Show a quiz leaderboard
    Leaderboard {
        /// Path to a .toml quiz (default: config, then the built-in quiz)
        #[arg(long)]
        quiz: Option<PathBuf>,

        /// Show where this score would place
        #[arg(long)]
        score: Option<f64>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and sample quiz
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizrush=warn".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            quiz,
            name,
            duration,
            output,
            save,
            config,
        } => commands::play::execute(quiz, name, duration, output, save, config).await,
        Commands::Validate { quiz } => commands::validate::execute(quiz),
        Commands::Leaderboard {
            quiz,
            score,
            config,
        } => commands::leaderboard::execute(quiz, score, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
