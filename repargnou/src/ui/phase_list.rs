//! Phase list panel.
//!
//! One row per catalog phase with its estimated duration. The phase handed to the
//! orchestrator is marked with `●`; the cursor is the list highlight.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
};
use repargnou_core::{ExercisePhase, Orchestrator};

use crate::app::AppState;
use crate::theme::Theme;
use crate::ui::layout::panel_block;

/// Renders the phase list with `render_stateful_widget` so the cursor highlight
/// follows `state.phase_list_state`.
pub fn render_phase_list(
    frame: &mut Frame,
    area: Rect,
    state: &mut AppState,
    orch: &Orchestrator,
    theme: &Theme,
) {
    let selected = orch.selected_phase().map(|p| p.phase);
    let block = panel_block("Phases", !orch.state().is_active, theme);

    let items: Vec<ListItem> = if state.phases.is_empty() {
        vec![ListItem::new(Line::styled("No phases", Style::default().fg(theme.muted)))]
    } else {
        state
            .phases
            .iter()
            .map(|phase| phase_item(phase, selected == Some(phase.phase), theme))
            .collect()
    };

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .fg(theme.selection)
            .add_modifier(Modifier::BOLD),
    );

    frame.render_stateful_widget(list, area, &mut state.phase_list_state);
}

/// Two-line item: `● Phase 1 · Gentle activation` then the exercise count and
/// estimate.
fn phase_item(phase: &ExercisePhase, is_selected: bool, theme: &Theme) -> ListItem<'static> {
    let marker = if is_selected { "● " } else { "  " };
    let title = Line::from(vec![
        Span::raw(marker),
        Span::raw(format!("Phase {} · {}", phase.phase, phase.name)),
    ]);
    let detail = Line::styled(
        format!(
            "    {} exercises · ~{} min",
            phase.exercises.len(),
            phase.estimated_minutes()
        ),
        Style::default().fg(theme.muted),
    );
    ListItem::new(vec![title, detail])
}
