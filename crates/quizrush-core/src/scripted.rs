//! Scripted answer source for testing.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::model::Question;
use crate::traits::AnswerSource;

/// Plays back a fixed list of answers on the tokio clock.
///
/// Each question gets a queue of attempts `(delay, option)`. A delay is
/// measured from when the question (or the previous attempt) was first
/// polled, so the script behaves the same however often the driver drops
/// and re-polls it. A question with no attempts never answers and lets the
/// timer expire; questions past the end of the script see closed input.
#[derive(Debug, Default)]
pub struct ScriptedAnswers {
    script: Vec<VecDeque<(Duration, usize)>>,
    armed: Option<(usize, Instant)>,
}

impl ScriptedAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the next question with `option` after `after`.
    pub fn answer(mut self, after: Duration, option: usize) -> Self {
        self.script.push(VecDeque::from([(after, option)]));
        self
    }

    /// Add another attempt to the most recent question, for when the
    /// previous attempt is rejected.
    pub fn retry(mut self, after: Duration, option: usize) -> Self {
        match self.script.last_mut() {
            Some(attempts) => attempts.push_back((after, option)),
            None => self.script.push(VecDeque::from([(after, option)])),
        }
        self
    }

    /// Leave the next question unanswered.
    pub fn timeout(mut self) -> Self {
        self.script.push(VecDeque::new());
        self
    }
}

#[async_trait]
impl AnswerSource for ScriptedAnswers {
    async fn next_answer(&mut self, index: usize, _question: &Question) -> Option<usize> {
        let (delay, option) = match self.script.get(index) {
            None => return None,
            Some(attempts) => match attempts.front() {
                Some(&attempt) => attempt,
                None => return std::future::pending().await,
            },
        };

        let deadline = match self.armed {
            Some((armed_index, deadline)) if armed_index == index => deadline,
            _ => {
                let deadline = Instant::now() + delay;
                self.armed = Some((index, deadline));
                deadline
            }
        };
        tokio::time::sleep_until(deadline).await;

        self.armed = None;
        self.script[index].pop_front();
        Some(option)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_quiz;

    #[tokio::test(start_paused = true)]
    async fn plays_back_in_order() {
        let quiz = sample_quiz();
        let q = &quiz.questions[0];
        let mut answers = ScriptedAnswers::new()
            .answer(Duration::from_secs(2), 3)
            .retry(Duration::from_secs(1), 1);

        let start = Instant::now();
        assert_eq!(answers.next_answer(0, q).await, Some(3));
        assert_eq!(start.elapsed(), Duration::from_secs(2));
        assert_eq!(answers.next_answer(0, q).await, Some(1));
        assert_eq!(start.elapsed(), Duration::from_secs(3));
        assert_eq!(answers.next_answer(1, q).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn keeps_deadline_when_dropped() {
        let quiz = sample_quiz();
        let q = &quiz.questions[0];
        let mut answers = ScriptedAnswers::new().answer(Duration::from_secs(5), 0);

        let start = Instant::now();
        let early = tokio::time::timeout(Duration::from_secs(3), answers.next_answer(0, q)).await;
        assert!(early.is_err());
        assert_eq!(answers.next_answer(0, q).await, Some(0));
        assert_eq!(start.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_never_answers() {
        let quiz = sample_quiz();
        let q = &quiz.questions[0];
        let mut answers = ScriptedAnswers::new().timeout();
        let result = tokio::time::timeout(Duration::from_secs(60), answers.next_answer(0, q)).await;
        assert!(result.is_err());
    }
}
