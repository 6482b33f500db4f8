//! Exercise catalog loading and phase time estimates.
//!
//! A catalog is a TOML document with one `[[phases]]` table per phase and nested
//! `[[phases.exercises]]` tables. The built-in program is embedded at compile time;
//! a user catalog can replace it through the `catalog` config key.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::CatalogError;
use crate::types::ExercisePhase;

const BUILTIN_CATALOG: &str = include_str!("../catalog/default.toml");

/// Ordered, read-only list of phases supplied at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Catalog {
    pub phases: Vec<ExercisePhase>,
}

impl Catalog {
    /// Returns the program shipped with the binary.
    ///
    /// # Errors
    ///
    /// Only fails if the embedded document is broken, which the unit tests rule out.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    /// Parses and validates a catalog from TOML text.
    ///
    /// # Errors
    ///
    /// `CatalogError::Parse` on malformed TOML or missing required fields;
    /// `CatalogError::Invalid` when the document parses but breaks a catalog rule
    /// (see [`Catalog::validate`]).
    pub fn from_toml_str(raw: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = toml::from_str(raw)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Reads a catalog file from disk.
    ///
    /// # Errors
    ///
    /// `CatalogError::Read` if the file cannot be read, otherwise as
    /// [`Catalog::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Looks up a phase by its number.
    pub fn phase(&self, number: u32) -> Option<&ExercisePhase> {
        self.phases.iter().find(|p| p.phase == number)
    }

    /// Checks the rules the workout engine relies on.
    ///
    /// - the catalog and every phase are non-empty
    /// - every exercise requires at least one set
    /// - every exercise has a pacing field (`reps`, `per_rep_hold_seconds`, or
    ///   `hold_seconds`)
    /// - exercise ids are unique within a phase (progress is tracked by id)
    fn validate(&self) -> Result<(), CatalogError> {
        if self.phases.is_empty() {
            return Err(CatalogError::Invalid("catalog has no phases".into()));
        }
        for phase in &self.phases {
            if phase.exercises.is_empty() {
                return Err(CatalogError::Invalid(format!(
                    "phase {} has no exercises",
                    phase.phase
                )));
            }
            let mut seen = HashSet::new();
            for exercise in &phase.exercises {
                if exercise.sets == 0 {
                    return Err(CatalogError::Invalid(format!(
                        "exercise '{}' requires at least one set",
                        exercise.id
                    )));
                }
                if exercise.reps.is_none()
                    && exercise.per_rep_hold_seconds.is_none()
                    && exercise.hold_seconds.is_none()
                {
                    return Err(CatalogError::Invalid(format!(
                        "exercise '{}' has neither reps nor a hold duration",
                        exercise.id
                    )));
                }
                if !seen.insert(exercise.id.as_str()) {
                    return Err(CatalogError::Invalid(format!(
                        "exercise id '{}' appears twice in phase {}",
                        exercise.id, phase.phase
                    )));
                }
            }
        }
        Ok(())
    }
}

impl ExercisePhase {
    /// Estimated duration of the phase in whole minutes, rounded up.
    ///
    /// Per exercise: repetition time (`per_rep_hold × reps` plus `per_rep_rest`
    /// between repetitions) times the set count, or `hold × sets` for exercises
    /// without reps; plus the rest between sets; plus the phase's inter-exercise
    /// rest after every exercise except the last. Manual repetitions count as zero
    /// seconds and the initial "get ready" interval is not included.
    pub fn estimated_minutes(&self) -> u32 {
        let last = self.exercises.len().saturating_sub(1);
        let total_seconds: u64 = self
            .exercises
            .iter()
            .enumerate()
            .map(|(index, exercise)| {
                let sets = u64::from(exercise.sets);
                let mut seconds = match exercise.reps {
                    Some(reps) => {
                        let reps = u64::from(reps);
                        let hold = u64::from(exercise.per_rep_hold_seconds.unwrap_or(0));
                        let rest = u64::from(exercise.per_rep_rest_seconds.unwrap_or(0));
                        (hold * reps + rest * reps.saturating_sub(1)) * sets
                    }
                    None => u64::from(exercise.hold_seconds.unwrap_or(0)) * sets,
                };
                seconds += u64::from(exercise.rest_between_sets_seconds.unwrap_or(0))
                    * sets.saturating_sub(1);
                if index < last {
                    seconds += u64::from(self.rest_between_exercises_seconds.unwrap_or(0));
                }
                seconds
            })
            .sum();

        u32::try_from(total_seconds.div_ceil(60)).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Exercise, Timing};

    fn exercise(id: &str) -> Exercise {
        Exercise {
            id: id.into(),
            name: id.into(),
            description: None,
            phase: 1,
            sets: 3,
            reps: None,
            hold_seconds: None,
            per_rep_hold_seconds: None,
            rest_between_sets_seconds: None,
            per_rep_rest_seconds: None,
        }
    }

    #[test]
    fn builtin_catalog_parses_and_validates() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.phases.len(), 3);
        let numbers: Vec<u32> = catalog.phases.iter().map(|p| p.phase).collect();
        assert_eq!(numbers, vec![1, 2, 3]);

        let phase1 = catalog.phase(1).unwrap();
        assert_eq!(phase1.rest_between_exercises(), 60);
        assert_eq!(
            phase1.exercises[0].timing(),
            Timing::TimedReps { reps: 10, hold_seconds: 10, rest_seconds: None }
        );
        assert_eq!(phase1.exercises[2].timing(), Timing::ManualReps { reps: 15 });

        let balance = catalog
            .phase(2)
            .and_then(|p| p.exercises.iter().find(|e| e.id == "single-leg-balance"))
            .unwrap();
        assert_eq!(balance.timing(), Timing::StaticHold { hold_seconds: 30 });
    }

    #[test]
    fn phase_time_for_timed_reps_and_static_hold() {
        let a = Exercise {
            reps: Some(10),
            per_rep_hold_seconds: Some(10),
            rest_between_sets_seconds: Some(60),
            ..exercise("a")
        };
        let b = Exercise {
            hold_seconds: Some(30),
            rest_between_sets_seconds: Some(60),
            ..exercise("b")
        };
        let phase = ExercisePhase {
            phase: 1,
            name: "Test".into(),
            rest_between_exercises_seconds: Some(60),
            exercises: vec![a, b],
        };
        // A: 10×10×3 + 60×2 = 420, B: 30×3 + 60×2 = 210, one inter-exercise rest: 60.
        // 690 s = 11.5 min, rounded up.
        assert_eq!(phase.estimated_minutes(), 12);
    }

    #[test]
    fn phase_time_counts_per_rep_rest_between_reps_only() {
        let a = Exercise {
            sets: 1,
            reps: Some(4),
            per_rep_hold_seconds: Some(10),
            per_rep_rest_seconds: Some(5),
            ..exercise("a")
        };
        let phase = ExercisePhase {
            phase: 1,
            name: "Test".into(),
            rest_between_exercises_seconds: Some(600),
            exercises: vec![a],
        };
        // 4×10 + 3×5 = 55 s, no inter-exercise rest after the only exercise.
        assert_eq!(phase.estimated_minutes(), 1);
    }

    #[test]
    fn rejects_exercise_without_pacing() {
        let raw = r#"
            [[phases]]
            phase = 1
            name = "Broken"

            [[phases.exercises]]
            id = "nothing"
            name = "Nothing"
            phase = 1
            sets = 2
        "#;
        let err = Catalog::from_toml_str(raw).unwrap_err();
        assert!(matches!(err, CatalogError::Invalid(_)), "got {err:?}");
    }

    #[test]
    fn rejects_zero_sets_and_duplicate_ids() {
        let zero_sets = r#"
            [[phases]]
            phase = 1
            name = "Broken"

            [[phases.exercises]]
            id = "a"
            name = "A"
            phase = 1
            sets = 0
            reps = 3
        "#;
        assert!(matches!(
            Catalog::from_toml_str(zero_sets),
            Err(CatalogError::Invalid(_))
        ));

        let duplicate = r#"
            [[phases]]
            phase = 1
            name = "Broken"

            [[phases.exercises]]
            id = "a"
            name = "A"
            phase = 1
            sets = 1
            reps = 3

            [[phases.exercises]]
            id = "a"
            name = "A again"
            phase = 1
            sets = 1
            hold_seconds = 10
        "#;
        assert!(matches!(
            Catalog::from_toml_str(duplicate),
            Err(CatalogError::Invalid(_))
        ));
    }

    #[test]
    fn missing_required_field_is_a_parse_error() {
        let raw = r#"
            [[phases]]
            phase = 1
            name = "No exercises key"
        "#;
        assert!(matches!(
            Catalog::from_toml_str(raw),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = Catalog::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }
}
