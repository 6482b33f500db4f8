//! Central UI state for repargnou.
//!
//! Holds what only the terminal front end cares about: the current mode, the phase
//! list and its selection, help scroll, and a one-line notice. Workout state itself
//! lives in the core `Orchestrator`; nothing here duplicates it.

use ratatui::widgets::ListState;
use repargnou_core::ExercisePhase;

/// Mode controlling which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Full-screen help overlay is shown above all panels.
    HelpOverlay,
    /// Quit-confirmation dialog shown while a workout is active.
    ConfirmQuit,
}

pub struct AppState {
    pub mode: Mode,
    /// Phases of the loaded catalog, in display order.
    pub phases: Vec<ExercisePhase>,
    /// Cursor in the phase list. Moving it does not select the phase for the
    /// orchestrator; `Enter` or `s` does.
    pub phase_list_state: ListState,
    /// Vertical scroll offset of the help overlay.
    pub help_scroll: u16,
    /// Short feedback shown in the status bar until the next key press.
    pub notice: Option<String>,
}

impl AppState {
    /// Builds the state for `phases`, with the cursor on the first phase.
    pub fn new(phases: Vec<ExercisePhase>) -> Self {
        let mut phase_list_state = ListState::default();
        if !phases.is_empty() {
            phase_list_state.select(Some(0));
        }
        Self {
            mode: Mode::default(),
            phases,
            phase_list_state,
            help_scroll: 0,
            notice: None,
        }
    }

    /// The phase under the cursor.
    pub fn highlighted_phase(&self) -> Option<&ExercisePhase> {
        self.phase_list_state
            .selected()
            .and_then(|i| self.phases.get(i))
    }

    /// Moves the cursor down one phase, stopping at the last.
    pub fn next_phase(&mut self) {
        let Some(last) = self.phases.len().checked_sub(1) else {
            return;
        };
        let next = self
            .phase_list_state
            .selected()
            .map_or(0, |i| (i + 1).min(last));
        self.phase_list_state.select(Some(next));
    }

    /// Moves the cursor up one phase, stopping at the first.
    pub fn prev_phase(&mut self) {
        if self.phases.is_empty() {
            return;
        }
        let prev = self
            .phase_list_state
            .selected()
            .map_or(0, |i| i.saturating_sub(1));
        self.phase_list_state.select(Some(prev));
    }

    pub fn set_notice(&mut self, text: impl Into<String>) {
        self.notice = Some(text.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phases(n: u32) -> Vec<ExercisePhase> {
        (1..=n)
            .map(|phase| ExercisePhase {
                phase,
                name: format!("Phase {phase}"),
                rest_between_exercises_seconds: None,
                exercises: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn cursor_starts_on_first_phase() {
        let state = AppState::new(phases(3));
        assert_eq!(state.highlighted_phase().map(|p| p.phase), Some(1));
        assert_eq!(state.mode, Mode::Normal);
    }

    #[test]
    fn cursor_is_clamped_at_both_ends() {
        let mut state = AppState::new(phases(2));
        state.prev_phase();
        assert_eq!(state.phase_list_state.selected(), Some(0));
        state.next_phase();
        state.next_phase();
        state.next_phase();
        assert_eq!(state.phase_list_state.selected(), Some(1));
        assert_eq!(state.highlighted_phase().map(|p| p.phase), Some(2));
    }

    #[test]
    fn empty_catalog_has_no_cursor() {
        let mut state = AppState::new(Vec::new());
        state.next_phase();
        state.prev_phase();
        assert!(state.highlighted_phase().is_none());
        assert_eq!(state.phase_list_state.selected(), None);
    }
}
