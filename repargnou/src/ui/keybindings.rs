//! Keybinding dispatcher for repargnou.
//!
//! Translates crossterm `KeyEvent`s into `AppState` and `Orchestrator` calls and
//! returns a `KeyAction` telling the event loop whether to continue or quit. The
//! dispatcher branches first on `state.mode` so each mode has an isolated handler.

use crossterm::event::{KeyCode, KeyEvent};
use repargnou_core::Orchestrator;

use crate::app::{AppState, Mode};

/// Control-flow signal returned from the key dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    Quit,
}

/// Dispatches a key event to the handler matching the current mode.
///
/// Clears the previous notice first, so feedback lasts until the next key.
///
/// # Arguments
///
/// * `key`   — the raw crossterm key event
/// * `state` — UI state
/// * `orch`  — the workout engine receiving workout commands
pub fn handle_key(key: KeyEvent, state: &mut AppState, orch: &mut Orchestrator) -> KeyAction {
    state.notice = None;
    match state.mode {
        Mode::HelpOverlay => handle_help(key, state),
        Mode::ConfirmQuit => handle_confirm_quit(key, state),
        Mode::Normal => handle_normal(key, state, orch),
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

fn handle_normal(key: KeyEvent, state: &mut AppState, orch: &mut Orchestrator) -> KeyAction {
    match key.code {
        // Phase list
        KeyCode::Char('j') | KeyCode::Down => state.next_phase(),
        KeyCode::Char('k') | KeyCode::Up => state.prev_phase(),
        KeyCode::Enter => select_highlighted(state, orch),

        // Workout controls
        KeyCode::Char('s') => {
            if orch.selected_phase().is_none() {
                select_highlighted(state, orch);
            }
            if orch.selected_phase().is_some() {
                orch.start_workout();
            }
        }
        KeyCode::Char('p') => {
            if orch.is_paused() {
                orch.resume_workout();
            } else {
                orch.pause_workout();
            }
        }
        KeyCode::Char('x') => orch.stop_workout(),
        KeyCode::Char(' ') => orch.confirm_rep(),
        KeyCode::Char('c') => orch.complete_set_immediately(),
        KeyCode::Char('r') => orch.reset_workout(),

        // Voice
        KeyCode::Char('v') => {
            let on = orch.toggle_voice();
            state.set_notice(if on { "Voice on" } else { "Voice off" });
        }
        KeyCode::Char('t') => orch.test_voice(),

        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
        }

        KeyCode::Char('q') | KeyCode::Esc => {
            if orch.state().is_active {
                state.mode = Mode::ConfirmQuit;
            } else {
                return KeyAction::Quit;
            }
        }

        _ => {}
    }
    KeyAction::Continue
}

/// Hands the phase under the cursor to the orchestrator.
fn select_highlighted(state: &mut AppState, orch: &mut Orchestrator) {
    if let Some(phase) = state.highlighted_phase() {
        orch.select_phase(phase);
        let notice = format!("Selected phase {}: {}", phase.phase, phase.name);
        state.set_notice(notice);
    }
}

// ---------------------------------------------------------------------------
// HelpOverlay mode
// ---------------------------------------------------------------------------

fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.help_scroll = state.help_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
        }
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => {
            state.mode = Mode::Normal;
        }
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// ConfirmQuit mode
// ---------------------------------------------------------------------------

/// `y` quits, `n` / `Esc` returns to Normal mode, other keys are ignored.
fn handle_confirm_quit(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => KeyAction::Quit,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            state.mode = Mode::Normal;
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use repargnou_core::{
        Catalog, CountdownTimer, MemoryAnnouncer, SessionRecorder, WorkoutStatus,
    };

    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn setup() -> (AppState, Orchestrator, MemoryAnnouncer) {
        let catalog = Catalog::builtin().unwrap();
        let (timer, _rx) = CountdownTimer::channel();
        let announcer = MemoryAnnouncer::new();
        let orch = Orchestrator::new(
            Box::new(announcer.clone()),
            SessionRecorder::in_memory(),
            timer,
        );
        (AppState::new(catalog.phases), orch, announcer)
    }

    #[tokio::test]
    async fn start_selects_the_highlighted_phase() {
        let (mut state, mut orch, _announcer) = setup();
        handle_key(press(KeyCode::Char('j')), &mut state, &mut orch);
        handle_key(press(KeyCode::Char('s')), &mut state, &mut orch);

        assert_eq!(orch.selected_phase().map(|p| p.phase), Some(2));
        assert_eq!(orch.status(), WorkoutStatus::RestingBetweenExercises);
        assert_eq!(orch.state().current_phase_number, 2);
    }

    #[tokio::test]
    async fn pause_key_toggles() {
        let (mut state, mut orch, announcer) = setup();
        handle_key(press(KeyCode::Char('s')), &mut state, &mut orch);
        handle_key(press(KeyCode::Char('p')), &mut state, &mut orch);
        assert!(orch.is_paused());
        assert_eq!(announcer.last().as_deref(), Some("Workout paused"));
        handle_key(press(KeyCode::Char('p')), &mut state, &mut orch);
        assert!(!orch.is_paused());
        assert_eq!(announcer.last().as_deref(), Some("Workout resumed"));
    }

    #[tokio::test]
    async fn quit_asks_for_confirmation_during_a_workout() {
        let (mut state, mut orch, _announcer) = setup();
        handle_key(press(KeyCode::Char('s')), &mut state, &mut orch);

        let action = handle_key(press(KeyCode::Char('q')), &mut state, &mut orch);
        assert_eq!(action, KeyAction::Continue);
        assert_eq!(state.mode, Mode::ConfirmQuit);

        let action = handle_key(press(KeyCode::Char('n')), &mut state, &mut orch);
        assert_eq!(action, KeyAction::Continue);
        assert_eq!(state.mode, Mode::Normal);

        handle_key(press(KeyCode::Char('q')), &mut state, &mut orch);
        let action = handle_key(press(KeyCode::Char('y')), &mut state, &mut orch);
        assert_eq!(action, KeyAction::Quit);
    }

    #[tokio::test]
    async fn quit_is_immediate_when_idle() {
        let (mut state, mut orch, _announcer) = setup();
        let action = handle_key(press(KeyCode::Char('q')), &mut state, &mut orch);
        assert_eq!(action, KeyAction::Quit);
    }

    #[tokio::test]
    async fn stop_key_returns_to_idle() {
        let (mut state, mut orch, _announcer) = setup();
        handle_key(press(KeyCode::Char('s')), &mut state, &mut orch);
        handle_key(press(KeyCode::Char('x')), &mut state, &mut orch);
        assert_eq!(orch.status(), WorkoutStatus::Idle);
        assert!(orch.selected_phase().is_none());
    }

    #[tokio::test]
    async fn voice_toggle_sets_a_notice() {
        let (mut state, mut orch, _announcer) = setup();
        handle_key(press(KeyCode::Char('v')), &mut state, &mut orch);
        assert_eq!(state.notice.as_deref(), Some("Voice off"));
        assert!(!orch.voice_enabled());
        handle_key(press(KeyCode::Char('j')), &mut state, &mut orch);
        assert!(state.notice.is_none());
    }

    #[tokio::test]
    async fn help_overlay_scrolls_and_closes() {
        let (mut state, mut orch, _announcer) = setup();
        handle_key(press(KeyCode::Char('?')), &mut state, &mut orch);
        assert_eq!(state.mode, Mode::HelpOverlay);
        handle_key(press(KeyCode::Char('j')), &mut state, &mut orch);
        handle_key(press(KeyCode::Char('j')), &mut state, &mut orch);
        assert_eq!(state.help_scroll, 2);
        // Scrolling the help must not move the phase cursor.
        assert_eq!(state.phase_list_state.selected(), Some(0));
        handle_key(press(KeyCode::Esc), &mut state, &mut orch);
        assert_eq!(state.mode, Mode::Normal);
    }
}
