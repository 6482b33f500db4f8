//! Color theme system for repargnou.
//!
//! A `Theme` holds named `ratatui::style::Color` fields covering every UI surface.
//! Two built-in themes are provided:
//!
//! - `dark` uses ANSI 16 colors so it works on any terminal.
//! - `catppuccin_mocha` uses the Catppuccin Mocha palette in RGB; requires truecolor.

use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    /// Border color for the focused panel and modal overlays.
    pub border_active: Color,
    pub border_inactive: Color,

    // Workout panel
    /// Countdown while an exercise is running.
    pub timer_running: Color,
    /// Countdown while resting.
    pub timer_resting: Color,
    /// Prompt shown while a manual repetition awaits confirmation.
    pub waiting: Color,
    /// "Workout complete" banner.
    pub finished: Color,
    /// Filled part of the countdown and progress gauges.
    pub gauge: Color,

    // Secondary text (descriptions, estimates, empty-state hints)
    pub muted: Color,
    /// Highlight for the selected phase in the phase list.
    pub selection: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    /// Badge color while no workout runs.
    pub status_idle: Color,
    /// Badge color during an active workout.
    pub status_active: Color,
    /// Badge color while paused.
    pub status_paused: Color,

    pub background: Color,
}

impl Theme {
    /// Returns the built-in dark theme using ANSI 16 colors.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            timer_running: Color::Green,
            timer_resting: Color::Yellow,
            waiting: Color::Magenta,
            finished: Color::Green,
            gauge: Color::Cyan,

            muted: Color::DarkGray,
            selection: Color::Cyan,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_idle: Color::Cyan,
            status_active: Color::Green,
            status_paused: Color::Yellow,

            background: Color::Reset,
        }
    }

    /// Returns the Catppuccin Mocha theme using RGB truecolor values.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161); // #a6e3a1
        let yellow = Color::Rgb(249, 226, 175); // #f9e2af
        let mauve = Color::Rgb(203, 166, 247); // #cba6f7
        let teal = Color::Rgb(148, 226, 213); // #94e2d5
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface1 = Color::Rgb(69, 71, 90); // #45475a
        let base = Color::Rgb(30, 30, 46); // #1e1e2e
        let text = Color::Rgb(205, 214, 244); // #cdd6f4
        let peach = Color::Rgb(250, 179, 135); // #fab387

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            timer_running: green,
            timer_resting: peach,
            waiting: mauve,
            finished: green,
            gauge: teal,

            muted: overlay1,
            selection: lavender,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_idle: lavender,
            status_active: green,
            status_paused: yellow,

            background: base,
        }
    }

    /// Resolves a theme name to the corresponding built-in theme.
    ///
    /// Unknown names fall back to `dark()` with a logged warning, so a typo in config
    /// never prevents startup.
    ///
    /// # Arguments
    ///
    /// * `name` — theme name from config, e.g. `"dark"` or `"catppuccin-mocha"`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                tracing::warn!(theme = other, "unknown theme, falling back to 'dark'");
                Self::dark()
            }
        }
    }
}
