//! The `quizrush init` command.

use anyhow::Result;

use quizrush_core::sample::SAMPLE_QUIZ_TOML;

pub fn execute() -> Result<()> {
    // Create quizrush.toml
    if std::path::Path::new("quizrush.toml").exists() {
        println!("quizrush.toml already exists, skipping.");
    } else {
        std::fs::write("quizrush.toml", SAMPLE_CONFIG)?;
        println!("Created quizrush.toml");
    }

    // Create sample quiz
    std::fs::create_dir_all("quizzes")?;
    let sample_path = std::path::Path::new("quizzes/sample.toml");
    if sample_path.exists() {
        println!("quizzes/sample.toml already exists, skipping.");
    } else {
        std::fs::write(sample_path, SAMPLE_QUIZ_TOML)?;
        println!("Created quizzes/sample.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit quizzes/sample.toml or add your own quizzes");
    println!("  2. Run: quizrush validate --quiz quizzes");
    println!("  3. Run: quizrush play --quiz quizzes/sample.toml");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizrush configuration

player_name = "${USER}"
quiz_path = "quizzes/sample.toml"
output_dir = "./quizrush-results"
# timer_duration_secs = 20
"#;
