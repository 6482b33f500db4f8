//! Help overlay renderer for repargnou.
//!
//! Draws a centred modal over the panels, using `Clear` to erase the background
//! inside the same `terminal.draw()` closure.

use ratatui::{
    Frame,
    layout::Constraint,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Renders the help overlay as a centred modal.
///
/// Skipped on terminals narrower than 40 columns to avoid a degenerate `Rect`.
///
/// # Arguments
///
/// * `frame` — current render frame provided by `terminal.draw()`
/// * `theme` — active color theme (supplies `border_active` for the modal border)
/// * `help_scroll` — vertical scroll offset; j/k in HelpOverlay mode mutate it
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 40 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(70), Constraint::Percentage(80));

    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help  (j/k scroll, ? or Esc to dismiss) ")
        .border_style(ratatui::style::Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

fn build_help_text() -> Text<'static> {
    Text::from(vec![
        Line::from("Phases"),
        Line::from("  j / k         Move the cursor down / up"),
        Line::from("  Enter         Select the phase under the cursor"),
        Line::from(""),
        Line::from("Workout"),
        Line::from("  s             Start the selected phase"),
        Line::from("  p             Pause / resume"),
        Line::from("  space         Confirm a repetition (manual exercises)"),
        Line::from("  c             Complete the current set now"),
        Line::from("  x             Stop and discard the workout"),
        Line::from("  r             Reset to idle"),
        Line::from(""),
        Line::from("Voice"),
        Line::from("  v             Voice cues on / off"),
        Line::from("  t             Speak a test cue"),
        Line::from(""),
        Line::from("General"),
        Line::from("  ?             Open / close this help overlay"),
        Line::from("  q / Esc       Quit (confirms during a workout)"),
    ])
}
