//! Trait definitions for the presentation layer.
//!
//! A front end supplies answers through [`AnswerSource`] and is told about
//! everything it should render through [`SessionObserver`].

use async_trait::async_trait;

use crate::model::{Question, QuestionResult};
use crate::report::SessionReport;

// ---------------------------------------------------------------------------
// Answer input
// ---------------------------------------------------------------------------

/// Where the player's answers come from.
#[async_trait]
pub trait AnswerSource: Send {
    /// Wait for the player's choice on question `index`.
    ///
    /// Returns the 0-based option index, or `None` once the input is closed
    /// for good. The returned future is dropped whenever a timer event
    /// arrives first and the method is called again for the same question,
    /// so implementations must not lose input when cancelled.
    async fn next_answer(&mut self, index: usize, question: &Question) -> Option<usize>;
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Receives session progress for display.
pub trait SessionObserver: Send + Sync {
    /// Question `index` of `total` is open with `duration_secs` on the clock.
    fn on_question(&self, index: usize, total: usize, question: &Question, duration_secs: u32);
    /// The open question's timer ticked.
    fn on_tick(&self, remaining: u32);
    /// A result was recorded for `question`.
    fn on_result(&self, question: &Question, result: &QuestionResult);
    /// The player picked an option that does not exist; the question stays open.
    fn on_invalid_answer(&self, question: &Question, option: usize);
    /// The session finished.
    fn on_finish(&self, report: &SessionReport);
}

/// No-op observer.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {
    fn on_question(&self, _: usize, _: usize, _: &Question, _: u32) {}
    fn on_tick(&self, _: u32) {}
    fn on_result(&self, _: &Question, _: &QuestionResult) {}
    fn on_invalid_answer(&self, _: &Question, _: usize) {}
    fn on_finish(&self, _: &SessionReport) {}
}
