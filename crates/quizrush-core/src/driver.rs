//! Runs a session against a front end.
//!
//! One loop owns the machine and waits on two inputs: the player's answer
//! and the timer channel. Whichever arrives first is applied; when both are
//! ready at once the answer is taken. Everything that reaches the machine
//! goes through its token checks, so late ticks and expiries from timers
//! that lost the race are dropped.

use anyhow::{Context, Result};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::error::SessionError;
use crate::report::SessionReport;
use crate::session::{Advance, SessionMachine, Step};
use crate::timer::{TimerEvent, TimerScheduler};
use crate::traits::{AnswerSource, SessionObserver};

/// Play one full session and return its report.
///
/// Starts (or restarts) `machine`, so it must be either fresh or finished.
/// `events` must be the receiving end of the scheduler the machine was
/// built with. Fails if the answer source closes before the last question.
pub async fn play<S, A, O>(
    machine: &mut SessionMachine<S>,
    events: &mut UnboundedReceiver<TimerEvent>,
    answers: &mut A,
    observer: &O,
    player: &str,
) -> Result<SessionReport>
where
    S: TimerScheduler,
    A: AnswerSource + ?Sized,
    O: SessionObserver + ?Sized,
{
    machine.start()?;
    let total = machine.quiz().questions.len();
    let duration_secs = machine.quiz().timer_duration_secs;
    let mut announced = None;

    while let (Some(index), Some(question)) =
        (machine.current_index(), machine.current_question().cloned())
    {
        if announced != Some(index) {
            observer.on_question(index, total, &question, duration_secs);
            announced = Some(index);
        }

        let step = tokio::select! {
            biased;

            answer = answers.next_answer(index, &question) => {
                let option = answer
                    .with_context(|| format!("answer input closed at question {}", index + 1))?;
                match machine.submit_answer(option) {
                    Ok(step) => Some(step),
                    Err(SessionError::OptionOutOfRange { .. }) => {
                        observer.on_invalid_answer(&question, option);
                        None
                    }
                    Err(e) => return Err(e.into()),
                }
            }

            Some(event) = events.recv() => match event {
                TimerEvent::Tick { token, remaining } => {
                    if machine.is_current(token) {
                        observer.on_tick(remaining);
                    }
                    None
                }
                TimerEvent::Expired { token } => machine.on_timer_expired(token)?,
                TimerEvent::Cancelled { .. } => None,
            },
        };

        match step {
            Some(Step { result, next }) => {
                observer.on_result(&question, &result);
                if next == Advance::Finished {
                    break;
                }
            }
            None => continue,
        }
    }

    let report = SessionReport::from_machine(machine, player)
        .context("session ended before every question had a result")?;
    observer.on_finish(&report);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::model::{Question, QuestionResult};
    use crate::sample::sample_quiz;
    use crate::scripted::ScriptedAnswers;
    use crate::timer::TokioScheduler;
    use crate::traits::NoopObserver;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn push(&self, event: String) {
            self.events.lock().unwrap().push(event);
        }

        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }

        fn ticks(&self) -> usize {
            self.events().iter().filter(|e| e.starts_with("tick")).count()
        }
    }

    impl SessionObserver for Recorder {
        fn on_question(&self, index: usize, total: usize, _: &Question, duration_secs: u32) {
            self.push(format!("question {}/{total} {duration_secs}s", index + 1));
        }
        fn on_tick(&self, remaining: u32) {
            self.push(format!("tick {remaining}"));
        }
        fn on_result(&self, question: &Question, result: &QuestionResult) {
            self.push(format!(
                "result q{} {:?} {}",
                question.id, result.selected_option, result.points_earned
            ));
        }
        fn on_invalid_answer(&self, question: &Question, option: usize) {
            self.push(format!("invalid q{} {option}", question.id));
        }
        fn on_finish(&self, report: &SessionReport) {
            self.push(format!("finish {}", report.total_score));
        }
    }

    fn machine() -> (SessionMachine<TokioScheduler>, UnboundedReceiver<TimerEvent>) {
        let (scheduler, rx) = TokioScheduler::channel();
        (SessionMachine::new(sample_quiz(), scheduler).unwrap(), rx)
    }

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[tokio::test(start_paused = true)]
    async fn plays_scripted_session() {
        let (mut m, mut rx) = machine();
        let mut answers = ScriptedAnswers::new()
            .answer(secs(3), 2)
            .answer(secs(1), 1)
            .answer(secs(5), 0)
            .answer(secs(2), 1)
            .timeout();
        let recorder = Recorder::default();

        let report = play(&mut m, &mut rx, &mut answers, &recorder, "You")
            .await
            .unwrap();

        assert_eq!(report.total_score, 12.0);
        assert_eq!(report.correct_count, 3);
        assert_eq!(report.rank, 5);
        let events = recorder.events();
        assert_eq!(events.first().unwrap(), "question 1/5 20s");
        assert!(events.contains(&"result q3 Some(0) 0".to_string()));
        assert!(events.contains(&"result q5 None 0".to_string()));
        assert_eq!(events.last().unwrap(), "finish 12");
        // 2 + 0 + 4 + 1 ticks while answering, then 19 before the timeout.
        assert_eq!(recorder.ticks(), 26);
    }

    #[tokio::test(start_paused = true)]
    async fn all_timeouts_score_zero() {
        let (mut m, mut rx) = machine();
        let mut answers = ScriptedAnswers::new()
            .timeout()
            .timeout()
            .timeout()
            .timeout()
            .timeout();
        let recorder = Recorder::default();

        let started = tokio::time::Instant::now();
        let report = play(&mut m, &mut rx, &mut answers, &recorder, "You")
            .await
            .unwrap();

        assert_eq!(report.total_score, 0.0);
        assert!(report.results.iter().all(|r| r.timed_out()));
        assert_eq!(recorder.ticks(), 5 * 19);
        assert_eq!(started.elapsed(), secs(100));
    }

    #[tokio::test(start_paused = true)]
    async fn answer_at_expiry_instant_wins() {
        let (mut m, mut rx) = machine();
        let mut answers = ScriptedAnswers::new()
            .answer(secs(20), 2)
            .answer(secs(20), 1)
            .answer(secs(20), 3)
            .answer(secs(20), 1)
            .answer(secs(20), 2);

        let report = play(&mut m, &mut rx, &mut answers, &NoopObserver, "You")
            .await
            .unwrap();

        assert_eq!(report.results.len(), 5);
        assert!(report.results.iter().all(|r| r.is_correct));
        assert_eq!(report.total_score, 17.0);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_option_keeps_question_open() {
        let (mut m, mut rx) = machine();
        let mut answers = ScriptedAnswers::new()
            .answer(secs(1), 7)
            .retry(secs(1), 2)
            .answer(secs(1), 1)
            .answer(secs(1), 3)
            .answer(secs(1), 1)
            .answer(secs(1), 2);
        let recorder = Recorder::default();

        let report = play(&mut m, &mut rx, &mut answers, &recorder, "You")
            .await
            .unwrap();

        assert_eq!(report.results.len(), 5);
        assert_eq!(report.results[0].selected_option, Some(2));
        let events = recorder.events();
        assert!(events.contains(&"invalid q1 7".to_string()));
        assert_eq!(
            events.iter().filter(|e| e.starts_with("question 1/")).count(),
            1
        );
    }

    #[tokio::test(start_paused = true)]
    async fn closed_input_aborts() {
        let (mut m, mut rx) = machine();
        let mut answers = ScriptedAnswers::new().answer(secs(1), 2);

        let err = play(&mut m, &mut rx, &mut answers, &NoopObserver, "You")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("question 2"));
    }

    #[tokio::test(start_paused = true)]
    async fn replay_ignores_previous_session() {
        let (mut m, mut rx) = machine();
        let mut first = ScriptedAnswers::new()
            .answer(secs(1), 0)
            .answer(secs(1), 0)
            .answer(secs(1), 0)
            .answer(secs(1), 0)
            .answer(secs(1), 0);
        let report = play(&mut m, &mut rx, &mut first, &NoopObserver, "You")
            .await
            .unwrap();
        assert_eq!(report.total_score, 0.0);

        let mut second = ScriptedAnswers::new()
            .answer(secs(1), 2)
            .answer(secs(1), 1)
            .answer(secs(1), 3)
            .answer(secs(1), 1)
            .answer(secs(1), 2);
        let replay = play(&mut m, &mut rx, &mut second, &NoopObserver, "You")
            .await
            .unwrap();
        assert_ne!(replay.id, report.id);
        assert_eq!(replay.results.len(), 5);
        assert_eq!(replay.total_score, 17.0);
    }
}
