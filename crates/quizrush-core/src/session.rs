//! Quiz session state machine.
//!
//! `NotStarted -> AwaitingAnswer -> … -> AwaitingAnswer -> Finished`, with
//! one `AwaitingAnswer` stretch per question. Each stretch arms a fresh
//! question timer under a new [`TimerToken`]; an answer or an expiry for
//! the current token records exactly one [`QuestionResult`] and moves on.
//!
//! Restarting replaces the whole [`Session`] value instead of resetting it,
//! and tokens keep increasing across restarts, so an expiry that belongs to
//! a discarded session can never be mistaken for a current one.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{QuizError, SessionError};
use crate::model::{Phase, Question, QuestionResult, Quiz};
use crate::parser::validate_quiz;
use crate::scoring::{score, total_score};
use crate::timer::{TimerHandle, TimerScheduler, TimerToken};

/// Mutable runtime state of one play-through.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    current_index: Option<usize>,
    phase: Phase,
    results: Vec<QuestionResult>,
    timer: Option<TimerHandle>,
}

impl Session {
    fn not_started() -> Self {
        Self {
            id: Uuid::new_v4(),
            current_index: None,
            phase: Phase::NotStarted,
            results: Vec::new(),
            timer: None,
        }
    }

    fn begin() -> Self {
        Self {
            current_index: Some(0),
            phase: Phase::AwaitingAnswer,
            ..Self::not_started()
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Index of the current question; `None` before the first start.
    ///
    /// Always equal to `results().len()` once started, which makes it one
    /// past the last question when finished.
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn results(&self) -> &[QuestionResult] {
        &self.results
    }

    fn cancel_timer(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
        }
    }
}

/// What the machine did after recording a result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advance {
    /// The next question is open and its timer armed under `token`.
    Question { index: usize, token: TimerToken },
    /// Every question has a result.
    Finished,
}

/// One recorded result and the transition that followed it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub result: QuestionResult,
    pub next: Advance,
}

/// Drives a [`Session`] through a quiz.
pub struct SessionMachine<S: TimerScheduler> {
    quiz: Arc<Quiz>,
    scheduler: S,
    session: Session,
    generation: u64,
}

impl<S: TimerScheduler> SessionMachine<S> {
    /// Build a machine for `quiz`, refusing malformed quiz data.
    ///
    /// The first problem [`validate_quiz`] reports is returned.
    pub fn new(quiz: Quiz, scheduler: S) -> Result<Self, QuizError> {
        if let Some(err) = validate_quiz(&quiz).into_iter().next() {
            return Err(err);
        }
        Ok(Self {
            quiz: Arc::new(quiz),
            scheduler,
            session: Session::not_started(),
            generation: 0,
        })
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    pub fn current_index(&self) -> Option<usize> {
        self.session.current_index
    }

    /// The open question, while awaiting an answer.
    pub fn current_question(&self) -> Option<&Question> {
        match (self.session.phase, self.session.current_index) {
            (Phase::AwaitingAnswer, Some(i)) => self.quiz.questions.get(i),
            _ => None,
        }
    }

    pub fn results(&self) -> &[QuestionResult] {
        &self.session.results
    }

    pub fn total_score(&self) -> f64 {
        total_score(&self.session.results)
    }

    /// Token of the timer guarding the open question.
    pub fn active_token(&self) -> Option<TimerToken> {
        self.session.timer.as_ref().map(TimerHandle::token)
    }

    /// Whether `token` belongs to the open question's timer.
    pub fn is_current(&self, token: TimerToken) -> bool {
        self.active_token() == Some(token)
    }

    /// Begin a new session at question 0.
    ///
    /// Valid before the first session and after a finished one. Any
    /// previous session is discarded together with its timer.
    pub fn start(&mut self) -> Result<TimerToken, SessionError> {
        match self.session.phase {
            Phase::NotStarted | Phase::Finished => {}
            phase => {
                return Err(SessionError::WrongPhase {
                    operation: "start",
                    phase,
                })
            }
        }

        self.session.cancel_timer();
        self.session = Session::begin();
        let token = self.arm_timer();
        tracing::info!(
            session = %self.session.id,
            quiz = %self.quiz.name,
            questions = self.quiz.questions.len(),
            "session started"
        );
        Ok(token)
    }

    /// Record the player's answer to the open question.
    ///
    /// The question timer is cancelled before the result is recorded.
    pub fn submit_answer(&mut self, option: usize) -> Result<Step, SessionError> {
        let index = self.open_index("submit_answer")?;
        let quiz = Arc::clone(&self.quiz);
        let question = &quiz.questions[index];

        if option >= question.options.len() {
            return Err(SessionError::OptionOutOfRange {
                question_id: question.id,
                option,
                options: question.options.len(),
            });
        }

        self.session.cancel_timer();
        let is_correct = question.is_correct(option);
        let result = QuestionResult {
            question_id: question.id,
            is_correct,
            multiplier: question.multiplier,
            points_earned: score(is_correct, question.multiplier),
            selected_option: Some(option),
        };
        tracing::debug!(
            question = question.id,
            option,
            is_correct,
            points = result.points_earned,
            "answer recorded"
        );
        Ok(self.record(result))
    }

    /// Record a timeout for the open question.
    ///
    /// Only an expiry carrying the open question's token counts. Any other
    /// token comes from a timer that lost its race or belongs to a
    /// discarded session; it is dropped and `Ok(None)` returned.
    pub fn on_timer_expired(&mut self, token: TimerToken) -> Result<Option<Step>, SessionError> {
        let index = self.open_index("on_timer_expired")?;
        if !self.is_current(token) {
            tracing::debug!(%token, "discarding stale timer expiry");
            return Ok(None);
        }

        self.session.cancel_timer();
        let question = &self.quiz.questions[index];
        let result = QuestionResult {
            question_id: question.id,
            is_correct: false,
            multiplier: question.multiplier,
            points_earned: 0.0,
            selected_option: None,
        };
        tracing::debug!(question = question.id, %token, "question timed out");
        Ok(Some(self.record(result)))
    }

    fn open_index(&self, operation: &'static str) -> Result<usize, SessionError> {
        match (self.session.phase, self.session.current_index) {
            (Phase::AwaitingAnswer, Some(index)) => Ok(index),
            (phase, _) => Err(SessionError::WrongPhase { operation, phase }),
        }
    }

    fn arm_timer(&mut self) -> TimerToken {
        self.generation += 1;
        let token = TimerToken::new(self.generation);
        let handle = self
            .scheduler
            .schedule(token, self.quiz.timer_duration_secs);
        self.session.timer = Some(handle);
        token
    }

    fn record(&mut self, result: QuestionResult) -> Step {
        self.session.results.push(result);
        let next_index = self.session.results.len();
        self.session.current_index = Some(next_index);

        let next = if next_index < self.quiz.questions.len() {
            let token = self.arm_timer();
            Advance::Question {
                index: next_index,
                token,
            }
        } else {
            self.session.phase = Phase::Finished;
            tracing::info!(
                session = %self.session.id,
                total = self.total_score(),
                "session finished"
            );
            Advance::Finished
        };

        Step { result, next }
    }
}
