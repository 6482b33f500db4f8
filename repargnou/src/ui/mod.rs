//! UI rendering module for repargnou.
//!
//! `render()` is the single entry point called by the event loop's
//! `terminal.draw()` closure. Layout arithmetic lives in `layout.rs`; each panel
//! has its own module.

mod layout;
pub mod help;
pub mod keybindings;
pub mod phase_list;
pub mod stats;
pub mod workout_view;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Clear, Paragraph},
};
use repargnou_core::Orchestrator;

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use layout::{compute_layout, render_status_bar};

/// Renders one complete frame: phase list, workout panel, history, status bar, and
/// any modal on top.
///
/// Called exactly once per `AppEvent::Render` inside `terminal.draw()`.
///
/// # Arguments
///
/// * `frame` — current render frame provided by `terminal.draw()`
/// * `state` — UI state (the phase list cursor is stateful, hence `&mut`)
/// * `orch` — workout engine, read-only here
/// * `theme` — active color theme
pub fn render(frame: &mut Frame, state: &mut AppState, orch: &Orchestrator, theme: &Theme) {
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        frame.area(),
    );

    let [phases, workout, history, status_bar] = compute_layout(frame);

    if phases.width > 0 {
        phase_list::render_phase_list(frame, phases, state, orch, theme);
    }
    workout_view::render_workout(frame, workout, orch, theme);
    if history.width > 0 {
        stats::render_stats(frame, history, orch, theme);
    }
    render_status_bar(frame, status_bar, state, orch, theme);

    match state.mode {
        Mode::HelpOverlay => help::render_help_overlay(frame, theme, state.help_scroll),
        Mode::ConfirmQuit => render_confirm_quit(frame, theme),
        Mode::Normal => {}
    }
}

/// Small centred dialog asking to confirm quitting an active workout.
fn render_confirm_quit(frame: &mut Frame, theme: &Theme) {
    let area = frame.area();
    let width = 44.min(area.width);
    let height = 5.min(area.height);
    let dialog = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    frame.render_widget(Clear, dialog);
    frame.render_widget(
        Paragraph::new(vec![
            Line::from("A workout is in progress."),
            Line::from("Quit and discard it? (y / n)")
                .style(Style::default().add_modifier(Modifier::BOLD)),
        ])
        .block(
            Block::bordered()
                .title(" Quit ")
                .border_style(Style::default().fg(theme.border_active)),
        ),
        dialog,
    );
}
