//! Second-resolution countdown timer.
//!
//! Every countdown runs as a tokio task that sleeps one second per tick and
//! publishes [`TimerEvent`]s on an unbounded channel. The receiver is owned by the
//! host event loop, which forwards events to whoever drives the timer (the
//! orchestrator). No global state: one `CountdownTimer` per owner.
//!
//! # Runs
//!
//! Each `start()` / `resume()` opens a new *run* with a fresh id. Events carry the
//! id of the run that produced them. `stop()` and `pause()` abort the task and
//! clear the active run, so any event already sitting in the channel no longer
//! matches [`CountdownTimer::current_run`] and is dropped by the consumer. This is
//! what guarantees that no completion is observed after `stop()`.
//!
//! # Double start
//!
//! `start()` while a countdown is running is refused with
//! [`TimerError::AlreadyRunning`]; the running countdown is left untouched. Owners
//! that want replace semantics call `stop()` first.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::TimerError;

const TICK: Duration = Duration::from_secs(1);

/// Run id meaning "no countdown is active".
const NO_RUN: u64 = 0;

/// Everything a countdown publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// One second elapsed; `remaining` counts down through `duration-1, …, 1, 0`.
    Tick { run: u64, remaining: u32 },
    /// The countdown reached zero. Sent once per run, after the final tick.
    Completed { run: u64 },
}

impl TimerEvent {
    /// Id of the run that produced this event.
    pub fn run(&self) -> u64 {
        match *self {
            TimerEvent::Tick { run, .. } | TimerEvent::Completed { run } => run,
        }
    }
}

/// State shared between the owner and the countdown task.
#[derive(Debug)]
struct Shared {
    run: u64,
    remaining: u32,
    running: bool,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A restartable countdown with start / pause / resume / stop.
pub struct CountdownTimer {
    tx: mpsc::UnboundedSender<TimerEvent>,
    shared: Arc<Mutex<Shared>>,
    task: Option<JoinHandle<()>>,
    last_run: u64,
    paused: bool,
}

impl CountdownTimer {
    /// Creates a timer publishing on `tx`.
    pub fn new(tx: mpsc::UnboundedSender<TimerEvent>) -> Self {
        Self {
            tx,
            shared: Arc::new(Mutex::new(Shared {
                run: NO_RUN,
                remaining: 0,
                running: false,
            })),
            task: None,
            last_run: NO_RUN,
            paused: false,
        }
    }

    /// Creates a timer together with the receiving end of its event channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TimerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Starts counting down from `seconds` and returns the new run id.
    ///
    /// `start(0)` completes immediately: no tick, one `Completed`. Must be called
    /// from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// `TimerError::AlreadyRunning` if a countdown is in flight.
    pub fn start(&mut self, seconds: u32) -> Result<u64, TimerError> {
        {
            let shared = lock(&self.shared);
            if shared.running {
                warn!(remaining = shared.remaining, "countdown already running, start ignored");
                return Err(TimerError::AlreadyRunning { remaining: shared.remaining });
            }
        }
        Ok(self.spawn(seconds))
    }

    /// Continues a paused countdown from its preserved remaining time.
    ///
    /// # Errors
    ///
    /// `TimerError::AlreadyRunning` if a countdown is in flight,
    /// `TimerError::NothingToResume` if nothing was paused.
    pub fn resume(&mut self) -> Result<u64, TimerError> {
        let remaining = {
            let shared = lock(&self.shared);
            if shared.running {
                return Err(TimerError::AlreadyRunning { remaining: shared.remaining });
            }
            shared.remaining
        };
        if !self.paused {
            return Err(TimerError::NothingToResume);
        }
        Ok(self.spawn(remaining))
    }

    /// Halts ticking but keeps the remaining time for [`CountdownTimer::resume`].
    ///
    /// No-op when nothing is running.
    pub fn pause(&mut self) {
        let mut shared = lock(&self.shared);
        if !shared.running {
            return;
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
        shared.running = false;
        shared.run = NO_RUN;
        self.paused = true;
        debug!(remaining = shared.remaining, "countdown paused");
    }

    /// Cancels any countdown and resets the remaining time to zero.
    ///
    /// Idempotent. No final tick is published.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        let mut shared = lock(&self.shared);
        if shared.running {
            debug!(run = shared.run, remaining = shared.remaining, "countdown stopped");
        }
        shared.running = false;
        shared.run = NO_RUN;
        shared.remaining = 0;
        self.paused = false;
    }

    pub fn is_running(&self) -> bool {
        lock(&self.shared).running
    }

    /// True after `pause()` until the next `start()`, `resume()`, or `stop()`.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whole seconds left in the current (or paused) countdown.
    pub fn remaining(&self) -> u32 {
        lock(&self.shared).remaining
    }

    /// Id of the run whose events are still current; `0` once stopped or paused.
    ///
    /// A naturally completed run stays current until the next start, so its
    /// `Completed` event is accepted.
    pub fn current_run(&self) -> u64 {
        lock(&self.shared).run
    }

    /// Aborts any previous task and launches a countdown for `seconds`.
    fn spawn(&mut self, seconds: u32) -> u64 {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.last_run += 1;
        let run = self.last_run;
        {
            let mut shared = lock(&self.shared);
            shared.run = run;
            shared.remaining = seconds;
            shared.running = true;
        }
        self.paused = false;
        debug!(run, seconds, "countdown started");

        let shared = Arc::clone(&self.shared);
        let tx = self.tx.clone();
        self.task = Some(tokio::spawn(countdown(run, seconds, shared, tx)));
        run
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Body of one run. Exits early as soon as the shared run id moves on, so a task
/// that outlives its `abort()` never mutates the state of a newer run.
async fn countdown(
    run: u64,
    mut remaining: u32,
    shared: Arc<Mutex<Shared>>,
    tx: mpsc::UnboundedSender<TimerEvent>,
) {
    while remaining > 0 {
        tokio::time::sleep(TICK).await;
        remaining -= 1;
        {
            let mut state = lock(&shared);
            if state.run != run {
                return;
            }
            state.remaining = remaining;
        }
        let _ = tx.send(TimerEvent::Tick { run, remaining });
    }

    {
        let mut state = lock(&shared);
        if state.run != run {
            return;
        }
        state.running = false;
    }
    let _ = tx.send(TimerEvent::Completed { run });
}
