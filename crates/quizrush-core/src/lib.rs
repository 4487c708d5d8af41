//! quizrush-core: Quiz session state machine, question timer, and scoring.
//!
//! This crate defines the quiz data model, the per-question countdown, the
//! session state machine that sequences questions and records results, and
//! the driver loop that connects them to a front end.

pub mod config;
pub mod driver;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod sample;
pub mod scoring;
pub mod scripted;
pub mod session;
pub mod timer;
pub mod traits;

pub use error::{QuizError, SessionError};
pub use model::{LeaderboardEntry, Multiplier, Phase, Question, QuestionResult, Quiz};
pub use session::{Advance, SessionMachine, Step};
pub use timer::{TimerEvent, TimerHandle, TimerScheduler, TimerToken, TokioScheduler};
