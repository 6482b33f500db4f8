//! Workout panel: the current exercise, its counters, and the countdown.
//!
//! The text helpers (`timer_label`, `status_message`, `progress_percentage`,
//! `countdown_total`) are pure functions of the orchestrator so they can be tested
//! without a terminal.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Gauge, Paragraph, Wrap},
};
use repargnou_core::{Orchestrator, RestType, Timing, WorkoutStatus};

use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

/// What the countdown currently measures.
pub fn timer_label(orch: &Orchestrator) -> String {
    let state = orch.state();
    if state.is_resting {
        return match state.rest_type {
            RestType::BetweenExercises => "Get ready for the next exercise",
            RestType::BetweenSets => "Rest between sets",
            RestType::PerRep => "Rest between repetitions",
        }
        .to_owned();
    }
    match orch.current_exercise().map(|e| e.timing()) {
        Some(Timing::TimedReps { .. }) => format!("Repetition {}", state.current_rep),
        Some(Timing::StaticHold { .. }) => "Hold the position".to_owned(),
        _ => "Exercise in progress".to_owned(),
    }
}

/// One-line summary of what the user should be doing.
pub fn status_message(orch: &Orchestrator) -> String {
    let state = orch.state();
    if state.is_resting {
        format!("Rest - {}", timer_label(orch))
    } else if state.waiting_for_user {
        "Waiting for you: press space after each repetition".to_owned()
    } else {
        "Exercise in progress".to_owned()
    }
}

/// Share of the phase reached, counting the current exercise as reached.
pub fn progress_percentage(orch: &Orchestrator) -> u16 {
    let Some(phase) = orch.current_phase() else {
        return 0;
    };
    if phase.exercises.is_empty() {
        return 0;
    }
    let reached = orch.state().current_exercise_index + 1;
    ((reached * 100) / phase.exercises.len()).min(100) as u16
}

/// Full length of the countdown in progress, for the gauge ratio.
pub fn countdown_total(orch: &Orchestrator) -> Option<u32> {
    let exercise = orch.current_exercise();
    match orch.status() {
        WorkoutStatus::RestingBetweenExercises => {
            orch.current_phase().map(|p| p.rest_between_exercises())
        }
        WorkoutStatus::RestingBetweenSets => exercise.map(|e| e.rest_between_sets()),
        WorkoutStatus::RestingPerRep => exercise.map(|e| e.per_rep_rest()),
        WorkoutStatus::RunningTimedRep | WorkoutStatus::RunningStaticHold => {
            match exercise?.timing() {
                Timing::TimedReps { hold_seconds, .. } | Timing::StaticHold { hold_seconds } => {
                    Some(hold_seconds)
                }
                Timing::ManualReps { .. } => None,
            }
        }
        WorkoutStatus::Idle | WorkoutStatus::RunningManualRep | WorkoutStatus::Finished => None,
    }
}

/// `m:ss`
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Renders the workout panel for the current orchestrator state.
pub fn render_workout(frame: &mut Frame, area: Rect, orch: &Orchestrator, theme: &Theme) {
    let block = panel_block("Workout", orch.state().is_active, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    match orch.status() {
        WorkoutStatus::Idle => render_idle(frame, inner, orch, theme),
        WorkoutStatus::Finished => render_finished(frame, inner, orch, theme),
        _ => render_active(frame, inner, orch, theme),
    }
}

fn render_idle(frame: &mut Frame, area: Rect, orch: &Orchestrator, theme: &Theme) {
    let muted = Style::default().fg(theme.muted);
    let lines = match orch.selected_phase() {
        Some(phase) => vec![
            Line::from(format!("Phase {} · {}", phase.phase, phase.name))
                .style(Style::default().add_modifier(Modifier::BOLD)),
            Line::from(""),
            Line::styled(
                format!(
                    "{} exercises, about {} minutes",
                    phase.exercises.len(),
                    phase.estimated_minutes()
                ),
                muted,
            ),
            Line::from(""),
            Line::from("Press s to start."),
        ],
        None => vec![
            Line::styled("No phase selected.", muted),
            Line::from(""),
            Line::from("Pick a phase with j / k and Enter, then press s."),
        ],
    };
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

fn render_finished(frame: &mut Frame, area: Rect, orch: &Orchestrator, theme: &Theme) {
    let mut lines = vec![
        Line::styled(
            "Workout complete! Well done!",
            Style::default().fg(theme.finished).add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
    ];
    if let Some(session) = orch.recorder().history().last() {
        let minutes = session.duration().map_or(0, |d| d.num_minutes());
        lines.push(Line::from(format!(
            "{} exercises in {} min",
            session.exercises.len(),
            minutes
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::styled("Press r to reset.", Style::default().fg(theme.muted)));
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_active(frame: &mut Frame, area: Rect, orch: &Orchestrator, theme: &Theme) {
    let [details, countdown, message, progress] = area.layout(&Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Length(2),
        Constraint::Length(1),
    ]));

    render_exercise_details(frame, details, orch, theme);
    render_countdown(frame, countdown, orch, theme);

    let message_style = if orch.state().waiting_for_user {
        Style::default().fg(theme.waiting).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let mut message_lines = vec![Line::styled(status_message(orch), message_style)];
    if orch.is_paused() {
        message_lines.push(Line::styled(
            "Paused - press p to resume",
            Style::default().fg(theme.status_paused),
        ));
    }
    frame.render_widget(Paragraph::new(message_lines), message);

    let percent = progress_percentage(orch);
    frame.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(theme.gauge))
            .percent(percent)
            .label(format!("Phase progress {percent}%")),
        progress,
    );
}

fn render_exercise_details(frame: &mut Frame, area: Rect, orch: &Orchestrator, theme: &Theme) {
    let Some(exercise) = orch.current_exercise() else {
        return;
    };
    let state = orch.state();
    let count = orch.current_phase().map_or(0, |p| p.exercises.len());

    let mut lines = vec![
        Line::styled(
            format!(
                "Exercise {}/{}",
                state.current_exercise_index + 1,
                count
            ),
            Style::default().fg(theme.muted),
        ),
        Line::from(exercise.name.clone()).style(Style::default().add_modifier(Modifier::BOLD)),
    ];
    if let Some(description) = &exercise.description {
        lines.push(Line::styled(description.clone(), Style::default().fg(theme.muted)));
    }
    lines.push(Line::from(""));

    let mut counters = vec![Span::raw(format!("Set {}/{}", state.current_set, exercise.sets))];
    match exercise.timing() {
        Timing::TimedReps { reps, hold_seconds, .. } => {
            counters.push(Span::raw(format!(
                "   Rep {}/{}   ({hold_seconds}s hold)",
                state.current_rep, reps
            )));
        }
        Timing::ManualReps { reps } => {
            counters.push(Span::raw(format!("   Rep {}/{}", state.current_rep, reps)));
        }
        Timing::StaticHold { hold_seconds } => {
            counters.push(Span::raw(format!("   Hold {hold_seconds}s")));
        }
    }
    lines.push(Line::from(counters));

    frame.render_widget(Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true }), area);
}

fn render_countdown(frame: &mut Frame, area: Rect, orch: &Orchestrator, theme: &Theme) {
    let label = timer_label(orch);
    if orch.state().waiting_for_user {
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(label),
                Line::styled("[space] rep done   [c] set done", Style::default().fg(theme.muted)),
            ]),
            area,
        );
        return;
    }

    let remaining = orch.timer_seconds();
    let ratio = match countdown_total(orch) {
        Some(total) if total > 0 => f64::from(remaining.min(total)) / f64::from(total),
        _ => 0.0,
    };
    let color = if orch.state().is_resting {
        theme.timer_resting
    } else {
        theme.timer_running
    };

    let [title, gauge] =
        area.layout(&Layout::vertical([Constraint::Length(1), Constraint::Length(2)]));
    frame.render_widget(Paragraph::new(Line::from(label)), title);
    frame.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(color))
            .ratio(ratio)
            .label(format_clock(remaining)),
        gauge,
    );
}

#[cfg(test)]
mod tests {
    use repargnou_core::{
        CountdownTimer, Exercise, ExercisePhase, MemoryAnnouncer, SessionRecorder,
    };

    use super::*;

    fn exercise(id: &str) -> Exercise {
        Exercise {
            id: id.into(),
            name: id.into(),
            description: None,
            phase: 1,
            sets: 2,
            reps: None,
            hold_seconds: None,
            per_rep_hold_seconds: None,
            rest_between_sets_seconds: Some(15),
            per_rep_rest_seconds: None,
        }
    }

    fn started(exercises: Vec<Exercise>) -> Orchestrator {
        let (timer, _rx) = CountdownTimer::channel();
        let mut orch = Orchestrator::new(
            Box::new(MemoryAnnouncer::new()),
            SessionRecorder::in_memory(),
            timer,
        );
        orch.select_phase(&ExercisePhase {
            phase: 1,
            name: "Test".into(),
            rest_between_exercises_seconds: Some(45),
            exercises,
        });
        orch.start_workout();
        orch
    }

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(9), "0:09");
        assert_eq!(format_clock(75), "1:15");
        assert_eq!(format_clock(600), "10:00");
    }

    #[tokio::test]
    async fn labels_while_getting_ready() {
        let orch = started(vec![Exercise { reps: Some(10), ..exercise("a") }]);
        assert_eq!(timer_label(&orch), "Get ready for the next exercise");
        assert_eq!(status_message(&orch), "Rest - Get ready for the next exercise");
        assert_eq!(countdown_total(&orch), Some(45));
    }

    #[tokio::test]
    async fn manual_reps_wait_and_report_progress() {
        let mut orch = started(vec![
            Exercise { reps: Some(10), ..exercise("a") },
            Exercise { hold_seconds: Some(30), ..exercise("b") },
            Exercise { reps: Some(5), per_rep_hold_seconds: Some(4), ..exercise("c") },
            Exercise { reps: Some(5), ..exercise("d") },
        ]);
        assert_eq!(progress_percentage(&orch), 25);

        // Skip both sets of the first exercise.
        orch.complete_set_immediately();
        assert_eq!(timer_label(&orch), "Rest between sets");
        assert_eq!(countdown_total(&orch), Some(15));
        orch.complete_set_immediately();
        assert_eq!(progress_percentage(&orch), 50);
    }

    #[tokio::test]
    async fn idle_orchestrator_has_no_progress() {
        let (timer, _rx) = CountdownTimer::channel();
        let orch = Orchestrator::new(
            Box::new(MemoryAnnouncer::new()),
            SessionRecorder::in_memory(),
            timer,
        );
        assert_eq!(progress_percentage(&orch), 0);
        assert_eq!(countdown_total(&orch), None);
        assert_eq!(status_message(&orch), "Exercise in progress");
    }
}
