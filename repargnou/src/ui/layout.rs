//! Responsive 3-panel layout for repargnou.
//!
//! Pure layout arithmetic, recomputed inside every `terminal.draw()`.
//!
//! # Panel geometry
//!
//! At `>= 110` columns the phase list, workout, and history panels sit side by
//! side (30 / 45 / 25). Narrower terminals collapse both side panels and the
//! workout panel fills the width.
//!
//! `Spacing::Overlap(1)` combined with `Block::merge_borders(MergeStrategy::Fuzzy)`
//! makes adjacent panel borders share a single column.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect, Spacing},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};
use repargnou_core::Orchestrator;

use crate::app::AppState;
use crate::theme::Theme;

/// Width below which the side panels collapse.
const WIDE_LAYOUT_MIN_WIDTH: u16 = 110;

/// Returns `[phases, workout, history, status_bar]` panel `Rect`s for the current frame.
pub fn compute_layout(frame: &Frame) -> [Rect; 4] {
    let [main_area, status_bar] =
        frame.area().layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]));

    let horizontal = if frame.area().width >= WIDE_LAYOUT_MIN_WIDTH {
        Layout::horizontal([
            Constraint::Percentage(30),
            Constraint::Percentage(45),
            Constraint::Percentage(25),
        ])
        .spacing(Spacing::Overlap(1))
    } else {
        Layout::horizontal([
            Constraint::Length(0),
            Constraint::Fill(1),
            Constraint::Length(0),
        ])
        .spacing(Spacing::Overlap(1))
    };

    let [phases, workout, history] = main_area.layout(&horizontal);
    [phases, workout, history, status_bar]
}

/// Returns the inner `Rect` of a panel after removing the 1-cell border.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Builds a bordered `Block` for a panel.
///
/// The panel that reflects the running workout uses `BorderType::Thick` and the
/// active border color; the others are plain. `MergeStrategy::Fuzzy` handles
/// junctions between thick and plain borders.
///
/// # Arguments
///
/// * `title` — panel title shown in the top border
/// * `is_active` — `true` to draw the highlighted border
/// * `theme` — active color theme
pub fn panel_block<'a>(title: &'a str, is_active: bool, theme: &'a Theme) -> Block<'a> {
    let border_style = if is_active {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_active { BorderType::Thick } else { BorderType::Plain };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
        .merge_borders(MergeStrategy::Fuzzy)
}

/// Renders the 1-row status bar: a state badge, the voice flag, the current notice,
/// and a help hint.
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    orch: &Orchestrator,
    theme: &Theme,
) {
    let workout = orch.state();
    let (badge, badge_fg) = if orch.is_paused() {
        (" PAUSED ", theme.status_paused)
    } else if workout.is_active {
        (" ACTIVE ", theme.status_active)
    } else if workout.is_finished {
        (" DONE ", theme.finished)
    } else {
        (" IDLE ", theme.status_idle)
    };

    let voice = if orch.voice_enabled() { " voice on " } else { " voice off " };
    let mut spans = vec![
        Span::styled(badge, Style::default().fg(badge_fg).add_modifier(Modifier::BOLD)),
        Span::raw(voice),
    ];
    if let Some(notice) = &state.notice {
        spans.push(Span::raw(format!("│ {notice} ")));
    }
    spans.push(Span::styled("│ ? help", Style::default().fg(theme.muted)));

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}
