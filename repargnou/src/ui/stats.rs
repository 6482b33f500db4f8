//! History panel: aggregate stats and the most recent sessions.

use chrono::Local;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Paragraph, Wrap},
};
use repargnou_core::{Orchestrator, WorkoutSession, WorkoutStats};

use crate::theme::Theme;
use crate::ui::layout::panel_block;

/// Number of past sessions listed under the stats.
const RECENT_SESSIONS: usize = 8;

pub fn render_stats(frame: &mut Frame, area: Rect, orch: &Orchestrator, theme: &Theme) {
    let recorder = orch.recorder();
    let stats = recorder.compute_stats();
    let muted = Style::default().fg(theme.muted);

    let mut lines = stats_lines(&stats);
    lines.push(Line::from(""));
    lines.push(Line::from("Recent").style(Style::default().add_modifier(Modifier::BOLD)));

    let history = recorder.history();
    if history.is_empty() {
        lines.push(Line::styled("No workouts yet", muted));
    }
    lines.extend(
        history
            .iter()
            .rev()
            .take(RECENT_SESSIONS)
            .map(|session| Line::styled(session_line(session), muted)),
    );

    frame.render_widget(
        Paragraph::new(lines)
            .block(panel_block("History", false, theme))
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn stats_lines(stats: &WorkoutStats) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(format!("Workouts    {}", stats.total_workouts)),
        Line::from(format!("Exercises   {}", stats.total_exercises)),
        Line::from(format!("Average     {:.0} min", stats.average_duration_minutes)),
    ];
    for (phase, count) in &stats.workouts_by_phase {
        lines.push(Line::from(format!("  phase {phase}   {count}")));
    }
    lines
}

/// `2026-10-19 18:05  P2  34 min` or `... P2  unfinished`.
fn session_line(session: &WorkoutSession) -> String {
    let when = session
        .started_at
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M");
    match session.duration() {
        Some(d) => format!("{when}  P{}  {} min", session.phase.phase, d.num_minutes()),
        None => format!("{when}  P{}  unfinished", session.phase.phase),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn stats_list_every_phase() {
        let stats = WorkoutStats {
            total_workouts: 3,
            total_exercises: 14,
            average_duration_minutes: 27.6,
            workouts_by_phase: BTreeMap::from([(1, 2), (3, 1)]),
        };
        let text: Vec<String> = stats_lines(&stats).iter().map(|l| l.to_string()).collect();
        assert_eq!(
            text,
            vec![
                "Workouts    3",
                "Exercises   14",
                "Average     28 min",
                "  phase 1   2",
                "  phase 3   1",
            ]
        );
    }
}
