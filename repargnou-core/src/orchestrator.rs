//! Workout progression engine.
//!
//! The [`Orchestrator`] sequences phase → exercises → sets → repetitions → rests.
//! It owns the [`WorkoutState`], a [`CountdownTimer`] for every timed transition, the
//! voice [`Announcer`], and the [`SessionRecorder`] it reports progress to.
//!
//! All transitions are synchronous `&mut self` methods, so a single owner
//! serialises them. Timer completions come back through the host: the host
//! receives [`TimerEvent`]s from the timer's channel and passes each one to
//! [`Orchestrator::handle_timer_event`].
//!
//! Transitions whose preconditions are unmet (no phase, no current exercise) are
//! silent no-ops.
//!
//! Every countdown the orchestrator starts replaces the previous one: it stops the
//! timer before starting it, so the timer's double-start refusal never triggers
//! from here.

use tracing::{debug, info, warn};

use crate::announcer::Announcer;
use crate::recorder::SessionRecorder;
use crate::timer::{CountdownTimer, TimerEvent};
use crate::types::{Exercise, ExercisePhase, RestType, Timing};

/// Mutable progress through the active phase.
///
/// Invariants: `is_resting` and `waiting_for_user` are never both true;
/// `is_finished` implies `!is_active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkoutState {
    pub is_active: bool,
    pub current_phase_number: u32,
    /// 0-based index into the active phase's exercises.
    pub current_exercise_index: usize,
    /// 1-based.
    pub current_set: u32,
    /// 1-based.
    pub current_rep: u32,
    pub is_resting: bool,
    pub rest_type: RestType,
    /// True only while a manual-rep exercise awaits confirmation.
    pub waiting_for_user: bool,
    pub is_finished: bool,
}

impl WorkoutState {
    /// The shape held while no workout runs.
    pub fn idle() -> Self {
        Self {
            is_active: false,
            current_phase_number: 0,
            current_exercise_index: 0,
            current_set: 1,
            current_rep: 1,
            is_resting: false,
            rest_type: RestType::BetweenExercises,
            waiting_for_user: false,
            is_finished: false,
        }
    }

    fn started(phase_number: u32) -> Self {
        Self {
            is_active: true,
            current_phase_number: phase_number,
            is_resting: true,
            ..Self::idle()
        }
    }
}

impl Default for WorkoutState {
    fn default() -> Self {
        Self::idle()
    }
}

/// Where the machine stands, derived from [`WorkoutState`] and the current
/// exercise's [`Timing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkoutStatus {
    Idle,
    RestingBetweenExercises,
    RestingBetweenSets,
    RestingPerRep,
    /// Waiting for the user to confirm a repetition.
    RunningManualRep,
    RunningTimedRep,
    RunningStaticHold,
    Finished,
}

pub struct Orchestrator {
    announcer: Box<dyn Announcer>,
    recorder: SessionRecorder,
    timer: CountdownTimer,
    selected_phase: Option<ExercisePhase>,
    current_phase: Option<ExercisePhase>,
    state: WorkoutState,
    timer_seconds: u32,
    paused: bool,
    /// A completion of the current run that arrived while paused.
    pending_completion: bool,
    voice_enabled: bool,
}

impl Orchestrator {
    pub fn new(
        announcer: Box<dyn Announcer>,
        recorder: SessionRecorder,
        timer: CountdownTimer,
    ) -> Self {
        Self {
            announcer,
            recorder,
            timer,
            selected_phase: None,
            current_phase: None,
            state: WorkoutState::idle(),
            timer_seconds: 0,
            paused: false,
            pending_completion: false,
            voice_enabled: true,
        }
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    pub fn state(&self) -> &WorkoutState {
        &self.state
    }

    pub fn selected_phase(&self) -> Option<&ExercisePhase> {
        self.selected_phase.as_ref()
    }

    /// The phase being performed, set by `start_workout` until reset.
    pub fn current_phase(&self) -> Option<&ExercisePhase> {
        self.current_phase.as_ref()
    }

    pub fn current_exercise(&self) -> Option<&Exercise> {
        self.current_phase
            .as_ref()?
            .exercises
            .get(self.state.current_exercise_index)
    }

    /// Seconds left on the countdown as last published by the timer.
    pub fn timer_seconds(&self) -> u32 {
        self.timer_seconds
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn voice_enabled(&self) -> bool {
        self.voice_enabled
    }

    pub fn recorder(&self) -> &SessionRecorder {
        &self.recorder
    }

    pub fn status(&self) -> WorkoutStatus {
        if self.state.is_finished {
            return WorkoutStatus::Finished;
        }
        if !self.state.is_active {
            return WorkoutStatus::Idle;
        }
        if self.state.is_resting {
            return match self.state.rest_type {
                RestType::BetweenExercises => WorkoutStatus::RestingBetweenExercises,
                RestType::BetweenSets => WorkoutStatus::RestingBetweenSets,
                RestType::PerRep => WorkoutStatus::RestingPerRep,
            };
        }
        if self.state.waiting_for_user {
            return WorkoutStatus::RunningManualRep;
        }
        match self.current_exercise().map(Exercise::timing) {
            Some(Timing::TimedReps { .. }) => WorkoutStatus::RunningTimedRep,
            Some(Timing::StaticHold { .. }) => WorkoutStatus::RunningStaticHold,
            Some(Timing::ManualReps { .. }) | None => WorkoutStatus::RunningManualRep,
        }
    }

    // -----------------------------------------------------------------------
    // User controls
    // -----------------------------------------------------------------------

    /// Remembers the phase the next `start_workout` will run.
    pub fn select_phase(&mut self, phase: &ExercisePhase) {
        self.selected_phase = Some(phase.clone());
    }

    /// Starts the selected phase with a "get ready" rest before the first exercise.
    ///
    /// No-op if no phase was selected. Starting over an active workout cancels its
    /// session first.
    pub fn start_workout(&mut self) {
        let Some(phase) = self.selected_phase.clone() else {
            debug!("start requested without a selected phase");
            return;
        };
        if self.state.is_active {
            warn!("restarting an active workout, current session discarded");
            self.recorder.cancel_session();
        }

        info!(phase = phase.phase, name = %phase.name, "workout started");
        self.state = WorkoutState::started(phase.phase);
        self.recorder.open_session(&phase);
        self.current_phase = Some(phase);
        self.start_rest_period(RestType::BetweenExercises);
    }

    /// Routes one timer event: ticks refresh the displayed seconds, the completion
    /// of the current run advances the workout. Events from a stopped or replaced
    /// run are dropped. A completion delivered while paused is held until
    /// `resume_workout`.
    pub fn handle_timer_event(&mut self, event: TimerEvent) {
        if event.run() != self.timer.current_run() {
            debug!(run = event.run(), "dropping stale timer event");
            return;
        }
        match event {
            TimerEvent::Tick { remaining, .. } => self.timer_seconds = remaining,
            TimerEvent::Completed { .. } => {
                self.timer_seconds = 0;
                if self.paused {
                    debug!("countdown completed while paused, deferred");
                    self.pending_completion = true;
                    return;
                }
                self.on_timer_complete();
            }
        }
    }

    /// The user confirms one repetition of a manual-rep exercise.
    ///
    /// Effective only while `waiting_for_user`.
    pub fn confirm_rep(&mut self) {
        if !self.state.is_active || !self.state.waiting_for_user {
            return;
        }
        self.state.waiting_for_user = false;
        self.complete_rep();
    }

    /// Ends the current set right away, bypassing any manual wait or running hold.
    pub fn complete_set_immediately(&mut self) {
        if self.state.is_active && !self.state.is_finished {
            self.complete_set();
        }
    }

    /// Halts the countdown, keeping its remaining seconds. Workout state is left
    /// untouched.
    pub fn pause_workout(&mut self) {
        if !self.state.is_active || self.paused {
            return;
        }
        self.timer.pause();
        self.paused = true;
        self.say("Workout paused");
    }

    /// Continues a paused workout from the exact remaining seconds. A manual-rep
    /// wait has no countdown and simply keeps waiting.
    pub fn resume_workout(&mut self) {
        if !self.state.is_active || !self.paused {
            return;
        }
        self.paused = false;
        self.say("Workout resumed");
        if std::mem::take(&mut self.pending_completion) {
            self.on_timer_complete();
        } else if self.timer.is_paused() {
            if let Err(err) = self.timer.resume() {
                warn!(%err, "countdown not resumed");
            }
        }
    }

    /// Abandons the workout: the session is discarded and the machine is idle.
    pub fn stop_workout(&mut self) {
        let was_running = self.state.is_active || self.state.is_finished;
        self.recorder.cancel_session();
        self.reset_workout();
        if was_running {
            self.say("Workout stopped");
        }
    }

    /// Returns the machine to `Idle` and forgets the selected and active phase.
    pub fn reset_workout(&mut self) {
        self.timer.stop();
        self.state = WorkoutState::idle();
        self.selected_phase = None;
        self.current_phase = None;
        self.timer_seconds = 0;
        self.paused = false;
        self.pending_completion = false;
    }

    /// Mutes or unmutes the voice cues. Muting cuts off the current utterance.
    pub fn toggle_voice(&mut self) -> bool {
        self.voice_enabled = !self.voice_enabled;
        if !self.voice_enabled {
            self.announcer.silence();
        }
        self.voice_enabled
    }

    pub fn test_voice(&mut self) {
        self.say("Voice test. Everything works!");
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Enters a rest period of `rest_type` and starts its countdown.
    fn start_rest_period(&mut self, rest_type: RestType) {
        let Some(phase) = self.current_phase.as_ref() else {
            return;
        };
        let Some(exercise) = phase.exercises.get(self.state.current_exercise_index) else {
            return;
        };

        let (seconds, cue) = match rest_type {
            RestType::BetweenExercises => (
                phase.rest_between_exercises(),
                format!("Next exercise: {}. Get ready.", exercise.name),
            ),
            RestType::BetweenSets => (exercise.rest_between_sets(), "End of set. Rest.".to_owned()),
            RestType::PerRep => (
                exercise.per_rep_rest(),
                "Rest between repetitions.".to_owned(),
            ),
        };

        self.state.is_resting = true;
        self.state.rest_type = rest_type;
        self.state.waiting_for_user = false;
        debug!(?rest_type, seconds, "rest period");
        self.say(&cue);
        self.run_countdown(seconds);
    }

    /// Handles the completion of the current countdown.
    fn on_timer_complete(&mut self) {
        if !self.state.is_active {
            return;
        }
        let Some(timing) = self.current_exercise().map(Exercise::timing) else {
            return;
        };

        if self.state.is_resting {
            self.state.is_resting = false;
            match self.state.rest_type {
                RestType::BetweenExercises => self.say("Go!"),
                RestType::BetweenSets => self.say("Next set!"),
                RestType::PerRep => {}
            }
            self.start_exercise();
            return;
        }

        match timing {
            Timing::TimedReps { reps, .. } => {
                if self.state.current_rep < reps {
                    self.say("Next repetition");
                }
                self.complete_rep();
            }
            Timing::StaticHold { .. } => self.complete_set(),
            Timing::ManualReps { .. } => {
                // A manual exercise starts no countdown of its own.
                debug_assert!(
                    !self.state.waiting_for_user,
                    "countdown completed while waiting for a manual confirmation"
                );
                warn!("countdown completed during a manual exercise, ignored");
            }
        }
    }

    /// Runs the current exercise according to its timing shape.
    fn start_exercise(&mut self) {
        let Some(exercise) = self.current_exercise() else {
            return;
        };
        debug!(
            exercise = %exercise.id,
            set = self.state.current_set,
            rep = self.state.current_rep,
            "exercise running"
        );

        match exercise.timing() {
            Timing::ManualReps { reps } => {
                self.state.waiting_for_user = true;
                self.timer_seconds = 0;
                self.say(&format!("{reps} repetitions to perform"));
            }
            Timing::TimedReps { hold_seconds, .. } => self.run_countdown(hold_seconds),
            Timing::StaticHold { hold_seconds } => self.run_countdown(hold_seconds),
        }
    }

    /// Finishes one repetition; the last one finishes the set.
    fn complete_rep(&mut self) {
        let Some(timing) = self.current_exercise().map(Exercise::timing) else {
            return;
        };

        match timing {
            Timing::TimedReps { reps, hold_seconds, rest_seconds } if self.state.current_rep < reps => {
                self.state.current_rep += 1;
                if rest_seconds.is_some() {
                    self.start_rest_period(RestType::PerRep);
                } else {
                    self.run_countdown(hold_seconds);
                }
            }
            Timing::ManualReps { reps } if self.state.current_rep < reps => {
                self.state.current_rep += 1;
                self.state.waiting_for_user = true;
            }
            _ => self.complete_set(),
        }
    }

    /// Reports the set to the recorder, then rests before the next set or moves on
    /// to the next exercise.
    fn complete_set(&mut self) {
        let Some(exercise) = self.current_exercise() else {
            return;
        };
        let id = exercise.id.clone();
        let sets = exercise.sets;

        self.state.waiting_for_user = false;
        self.recorder
            .update_progress(&id, self.state.current_set, self.state.current_rep);
        debug!(exercise = %id, set = self.state.current_set, "set complete");

        if self.state.current_set < sets {
            self.state.current_set += 1;
            self.state.current_rep = 1;
            self.start_rest_period(RestType::BetweenSets);
        } else {
            self.complete_exercise();
        }
    }

    /// Advances to the next exercise, or completes the workout after the last one.
    fn complete_exercise(&mut self) {
        let Some(count) = self.current_phase.as_ref().map(|p| p.exercises.len()) else {
            return;
        };

        if self.state.current_exercise_index + 1 < count {
            self.state.current_exercise_index += 1;
            self.state.current_set = 1;
            self.state.current_rep = 1;
            self.start_rest_period(RestType::BetweenExercises);
        } else {
            self.complete_workout();
        }
    }

    /// Marks the workout finished and closes the session into history.
    fn complete_workout(&mut self) {
        self.state.is_active = false;
        self.state.is_finished = true;
        self.state.is_resting = false;
        self.state.waiting_for_user = false;
        self.timer.stop();
        self.timer_seconds = 0;
        self.paused = false;
        self.pending_completion = false;
        info!(phase = self.state.current_phase_number, "workout complete");
        self.say("Workout complete! Well done!");
        self.recorder.close_session();
    }

    /// Replaces whatever countdown is running with a fresh one of `seconds`.
    fn run_countdown(&mut self, seconds: u32) {
        self.timer.stop();
        self.paused = false;
        self.pending_completion = false;
        self.timer_seconds = seconds;
        if let Err(err) = self.timer.start(seconds) {
            warn!(%err, "countdown not started");
        }
    }

    fn say(&self, text: &str) {
        if self.voice_enabled {
            self.announcer.speak(text);
        }
    }
}
