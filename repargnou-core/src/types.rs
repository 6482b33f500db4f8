//! Domain types shared by the catalog, the orchestrator, and the recorder.
//!
//! Catalog types (`Exercise`, `ExercisePhase`) are immutable once loaded. Session
//! types (`WorkoutSession`, `ExerciseProgress`) are owned by the recorder and carry
//! snapshots of the exercises they track, so a stored session stays readable even
//! after the catalog changes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rest before an exercise when the phase does not specify one.
pub const DEFAULT_REST_BETWEEN_EXERCISES_SECONDS: u32 = 120;
/// Rest between two sets when the exercise does not specify one.
pub const DEFAULT_REST_BETWEEN_SETS_SECONDS: u32 = 60;
/// Rest between two repetitions when the exercise does not specify one.
pub const DEFAULT_PER_REP_REST_SECONDS: u32 = 30;

/// One exercise of a phase, with its numeric parameters.
///
/// Which optional fields are present decides how the exercise is run; see
/// [`Exercise::timing`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub phase: u32,
    pub sets: u32,
    #[serde(default)]
    pub reps: Option<u32>,
    /// Static hold duration per set.
    #[serde(default)]
    pub hold_seconds: Option<u32>,
    /// Timed hold for every repetition.
    #[serde(default)]
    pub per_rep_hold_seconds: Option<u32>,
    #[serde(default)]
    pub rest_between_sets_seconds: Option<u32>,
    #[serde(default)]
    pub per_rep_rest_seconds: Option<u32>,
}

/// How an exercise is paced at runtime.
///
/// Exactly one shape applies to every exercise. Precedence when several fields are
/// present: a per-repetition hold wins, then a repetition count, then a static hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timing {
    /// Every repetition is a countdown of `hold_seconds`, optionally followed by a
    /// rest of `rest_seconds` before the next repetition.
    TimedReps {
        reps: u32,
        hold_seconds: u32,
        rest_seconds: Option<u32>,
    },
    /// The user performs the repetitions at their own pace and confirms them.
    ManualReps { reps: u32 },
    /// One sustained position per set.
    StaticHold { hold_seconds: u32 },
}

impl Exercise {
    /// Resolves the pacing shape of this exercise.
    ///
    /// An exercise carrying none of `reps`, `per_rep_hold_seconds`, or
    /// `hold_seconds` is rejected by catalog validation; if one is built by hand it
    /// is treated as a single manual repetition. A repetition count of zero counts
    /// as one.
    pub fn timing(&self) -> Timing {
        let reps = self.reps.map(|reps| reps.max(1));
        match (self.per_rep_hold_seconds, reps, self.hold_seconds) {
            (Some(hold_seconds), reps, _) => Timing::TimedReps {
                reps: reps.unwrap_or(1),
                hold_seconds,
                rest_seconds: self.per_rep_rest_seconds.filter(|s| *s > 0),
            },
            (None, Some(reps), _) => Timing::ManualReps { reps },
            (None, None, Some(hold_seconds)) => Timing::StaticHold { hold_seconds },
            (None, None, None) => Timing::ManualReps { reps: 1 },
        }
    }

    /// Rest between two sets of this exercise.
    pub fn rest_between_sets(&self) -> u32 {
        self.rest_between_sets_seconds
            .unwrap_or(DEFAULT_REST_BETWEEN_SETS_SECONDS)
    }

    /// Rest between two repetitions of this exercise.
    pub fn per_rep_rest(&self) -> u32 {
        self.per_rep_rest_seconds.unwrap_or(DEFAULT_PER_REP_REST_SECONDS)
    }
}

/// A themed block of the program: an ordered list of exercises plus the rest
/// applied before each of them (including the first, as a "get ready" interval).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExercisePhase {
    pub phase: u32,
    pub name: String,
    #[serde(default)]
    pub rest_between_exercises_seconds: Option<u32>,
    pub exercises: Vec<Exercise>,
}

impl ExercisePhase {
    /// Rest before every exercise of this phase.
    pub fn rest_between_exercises(&self) -> u32 {
        self.rest_between_exercises_seconds
            .unwrap_or(DEFAULT_REST_BETWEEN_EXERCISES_SECONDS)
    }
}

/// The three kinds of rest period.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestType {
    BetweenSets,
    #[default]
    BetweenExercises,
    PerRep,
}

/// Per-exercise progress inside a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseProgress {
    pub exercise: Exercise,
    pub completed_sets: u32,
    pub completed_reps: u32,
    pub started_at: DateTime<Utc>,
    /// Stamped once `completed_sets` reaches the exercise's required set count.
    pub ended_at: Option<DateTime<Utc>>,
}

/// One attempt at a phase, from start to completion or cancellation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub id: String, // UUID v4 text
    pub phase: ExercisePhase,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub exercises: Vec<ExerciseProgress>,
}

impl WorkoutSession {
    /// Wall-clock duration of a closed session; `None` while it is still open.
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.ended_at.map(|end| end - self.started_at)
    }

    pub fn is_completed(&self) -> bool {
        self.ended_at.is_some()
    }
}

/// Aggregates derived from the workout history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutStats {
    /// Number of sessions with an end timestamp.
    pub total_workouts: usize,
    /// Exercises tracked across all completed sessions.
    pub total_exercises: usize,
    /// Mean duration of completed sessions, in minutes. Zero with no history.
    pub average_duration_minutes: f64,
    /// Completed sessions keyed by phase number.
    pub workouts_by_phase: BTreeMap<u32, usize>,
}
