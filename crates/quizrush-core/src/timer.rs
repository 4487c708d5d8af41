//! Per-question countdown timer.
//!
//! A timer emits one [`TimerEvent::Tick`] per period with the remaining
//! seconds, then exactly one terminal event: [`TimerEvent::Expired`] when
//! the budget runs out, or [`TimerEvent::Cancelled`] when the handle is
//! cancelled first. The running/terminal state sits behind a single lock
//! and every event is sent while holding it, so once `cancel` wins nothing
//! else is emitted for that timer.
//!
//! Every timer carries a [`TimerToken`]. Consumers compare tokens against
//! the currently armed one to discard events from timers that belong to a
//! question (or a session) that has already moved on.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

/// Generation number identifying one armed question timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

impl TimerToken {
    pub fn new(generation: u64) -> Self {
        Self(generation)
    }

    pub fn generation(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Events emitted by a running timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// One period elapsed; `remaining` seconds are left.
    Tick { token: TimerToken, remaining: u32 },
    /// The budget ran out before the timer was cancelled.
    Expired { token: TimerToken },
    /// The timer was cancelled before it expired.
    Cancelled { token: TimerToken },
}

impl TimerEvent {
    pub fn token(&self) -> TimerToken {
        match self {
            TimerEvent::Tick { token, .. }
            | TimerEvent::Expired { token }
            | TimerEvent::Cancelled { token } => *token,
        }
    }

    /// Whether this is the last event the timer will emit.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TimerEvent::Tick { .. })
    }
}

/// Lifecycle of a single timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Running,
    Expired,
    Cancelled,
}

struct Shared {
    token: TimerToken,
    state: Mutex<TimerState>,
    events: UnboundedSender<TimerEvent>,
}

impl Shared {
    fn new(token: TimerToken, events: UnboundedSender<TimerEvent>) -> Arc<Self> {
        Arc::new(Self {
            token,
            state: Mutex::new(TimerState::Running),
            events,
        })
    }

    fn lock(&self) -> MutexGuard<'_, TimerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state(&self) -> TimerState {
        *self.lock()
    }

    /// Emit a tick if the timer is still running.
    fn tick(&self, remaining: u32) -> bool {
        let state = self.lock();
        if *state != TimerState::Running {
            return false;
        }
        // A closed receiver only means nobody is listening any more.
        let _ = self.events.send(TimerEvent::Tick {
            token: self.token,
            remaining,
        });
        true
    }

    fn expire(&self) -> bool {
        self.terminate(TimerState::Expired, TimerEvent::Expired { token: self.token })
    }

    fn cancel(&self) -> bool {
        self.terminate(
            TimerState::Cancelled,
            TimerEvent::Cancelled { token: self.token },
        )
    }

    fn terminate(&self, next: TimerState, event: TimerEvent) -> bool {
        let mut state = self.lock();
        if *state != TimerState::Running {
            return false;
        }
        *state = next;
        let _ = self.events.send(event);
        true
    }
}

/// Handle to an armed timer. Dropping it cancels the timer.
pub struct TimerHandle {
    shared: Arc<Shared>,
    task: Option<JoinHandle<()>>,
}

impl TimerHandle {
    fn new(shared: Arc<Shared>, task: Option<JoinHandle<()>>) -> Self {
        Self { shared, task }
    }

    pub fn token(&self) -> TimerToken {
        self.shared.token
    }

    pub fn state(&self) -> TimerState {
        self.shared.state()
    }

    pub fn is_running(&self) -> bool {
        self.state() == TimerState::Running
    }

    /// Stop the timer.
    ///
    /// Returns `true` if this call moved the timer from running to
    /// cancelled (and emitted [`TimerEvent::Cancelled`]). Returns `false`
    /// if the timer had already expired or been cancelled. Safe to call
    /// any number of times.
    pub fn cancel(&mut self) -> bool {
        let won = self.shared.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
        won
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("token", &self.shared.token)
            .field("state", &self.state())
            .finish()
    }
}

/// Arms question timers on behalf of a session.
pub trait TimerScheduler {
    /// Start a countdown of `duration_secs` identified by `token`.
    ///
    /// A zero duration expires immediately without ticking.
    fn schedule(&mut self, token: TimerToken, duration_secs: u32) -> TimerHandle;
}

/// Timer scheduler backed by tokio tasks.
///
/// `schedule` spawns a task and must be called from within a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    events: UnboundedSender<TimerEvent>,
    tick: Duration,
}

impl TokioScheduler {
    /// A scheduler ticking once per second.
    pub fn new(events: UnboundedSender<TimerEvent>) -> Self {
        Self::with_tick(events, Duration::from_secs(1))
    }

    /// A scheduler with a custom tick period.
    pub fn with_tick(events: UnboundedSender<TimerEvent>, tick: Duration) -> Self {
        Self { events, tick }
    }

    /// A one-second scheduler together with the receiving end of its events.
    pub fn channel() -> (Self, UnboundedReceiver<TimerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl TimerScheduler for TokioScheduler {
    fn schedule(&mut self, token: TimerToken, duration_secs: u32) -> TimerHandle {
        let shared = Shared::new(token, self.events.clone());
        if duration_secs == 0 {
            shared.expire();
            return TimerHandle::new(shared, None);
        }

        let period = self.tick;
        let first_tick = Instant::now() + period;
        let task_shared = Arc::clone(&shared);
        let task = tokio::spawn(async move {
            let mut interval = interval_at(first_tick, period);
            for remaining in (1..duration_secs).rev() {
                interval.tick().await;
                if !task_shared.tick(remaining) {
                    return;
                }
            }
            interval.tick().await;
            if task_shared.expire() {
                tracing::debug!(%token, "question timer expired");
            }
        });

        TimerHandle::new(shared, Some(task))
    }
}

/// Scheduler whose timers only move when told to. Used to drive sessions
/// deterministically in tests.
///
/// Clones share the same set of armed timers. Terminated timers are kept,
/// so a test can still ask for the state of a timer from an earlier
/// question; the list grows with every `schedule` for the scheduler's
/// lifetime.
#[derive(Clone)]
pub struct ManualScheduler {
    events: UnboundedSender<TimerEvent>,
    armed: Arc<Mutex<Vec<Arc<Shared>>>>,
}

impl ManualScheduler {
    pub fn new(events: UnboundedSender<TimerEvent>) -> Self {
        Self {
            events,
            armed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn channel() -> (Self, UnboundedReceiver<TimerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    fn find(&self, token: TimerToken) -> Option<Arc<Shared>> {
        self.armed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|s| s.token == token)
            .cloned()
    }

    /// Tokens of every timer armed so far, oldest first.
    pub fn armed(&self) -> Vec<TimerToken> {
        self.armed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|s| s.token)
            .collect()
    }

    /// State of the timer armed with `token`.
    pub fn state(&self, token: TimerToken) -> Option<TimerState> {
        self.find(token).map(|s| s.state())
    }

    /// Emit a tick for `token`. Returns `false` if it is no longer running.
    pub fn tick(&self, token: TimerToken, remaining: u32) -> bool {
        self.find(token).is_some_and(|s| s.tick(remaining))
    }

    /// Expire `token`. Returns `false` if it was already cancelled or expired.
    pub fn expire(&self, token: TimerToken) -> bool {
        self.find(token).is_some_and(|s| s.expire())
    }
}

impl TimerScheduler for ManualScheduler {
    fn schedule(&mut self, token: TimerToken, duration_secs: u32) -> TimerHandle {
        let shared = Shared::new(token, self.events.clone());
        if duration_secs == 0 {
            shared.expire();
        }
        self.armed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::clone(&shared));
        TimerHandle::new(shared, None)
    }
}
