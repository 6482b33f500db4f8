//! User configuration for repargnou.
//!
//! Read once at startup from `$XDG_CONFIG_HOME/repargnou/config.toml`. Every key is
//! optional; a missing file gives the defaults and a broken one gives the defaults
//! plus a logged warning. Config errors never prevent startup.
//!
//! ```toml
//! theme = "dark"
//! catalog = "/home/me/knee-program.toml"
//! history_db = "/home/me/.local/share/repargnou/history.db"
//!
//! [voice]
//! enabled = true
//! command = "espeak-ng"
//! args = ["-v", "en"]
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

/// Theme used when the config names none.
pub const DEFAULT_THEME: &str = "catppuccin-mocha";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Built-in theme name, see [`crate::theme::Theme::from_name`].
    pub theme: String,
    /// Exercise catalog replacing the built-in program.
    pub catalog: Option<PathBuf>,
    /// SQLite history file. Defaults to `history.db` in the data directory.
    pub history_db: Option<PathBuf>,
    pub voice: VoiceConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_owned(),
            catalog: None,
            history_db: None,
            voice: VoiceConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Start with voice cues on.
    pub enabled: bool,
    /// Text-to-speech program, invoked once per cue with the cue as last argument.
    pub command: String,
    /// Arguments placed before the cue text.
    pub args: Vec<String>,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: "espeak-ng".to_owned(),
            args: Vec::new(),
        }
    }
}

impl Config {
    /// Loads the config file at `path`.
    ///
    /// Returns the defaults if the file does not exist or cannot be parsed; the
    /// parse error is logged.
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(_) => return Self::default(),
        };
        match toml::from_str(&raw) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.display(), %err, "config parse error, using defaults");
                Self::default()
            }
        }
    }

    /// Where the history database lives for this config.
    pub fn history_db_path(&self, data_dir: &Path) -> PathBuf {
        self.history_db
            .clone()
            .unwrap_or_else(|| data_dir.join("history.db"))
    }
}

/// Resolves an XDG base directory: `$var` if set, else `~/<fallback>`.
fn xdg_dir(var: &str, fallback: &str) -> PathBuf {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var_os("HOME").map(|h| PathBuf::from(h).join(fallback))
        })
        .unwrap_or_else(|| PathBuf::from(fallback))
}

/// Returns the path to the repargnou config file.
///
/// Prefers `$XDG_CONFIG_HOME/repargnou/config.toml`; falls back to
/// `~/.config/repargnou/config.toml` when the env var is absent.
pub fn config_path() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config")
        .join("repargnou")
        .join("config.toml")
}

/// Returns the data directory holding the history database and the log file.
///
/// `$XDG_DATA_HOME/repargnou`, falling back to `~/.local/share/repargnou`.
pub fn data_dir() -> PathBuf {
    xdg_dir("XDG_DATA_HOME", ".local/share").join("repargnou")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config::load(&dir.path().join("config.toml"));
        assert_eq!(config, Config::default());
        assert_eq!(config.theme, DEFAULT_THEME);
        assert!(config.voice.enabled);
        assert_eq!(config.voice.command, "espeak-ng");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "theme = \"dark\"\n[voice]\nenabled = false\nargs = [\"-v\", \"en\"]\n",
        )
        .unwrap();

        let config = Config::load(&path);
        assert_eq!(config.theme, "dark");
        assert!(config.catalog.is_none());
        assert!(!config.voice.enabled);
        assert_eq!(config.voice.command, "espeak-ng");
        assert_eq!(config.voice.args, vec!["-v".to_owned(), "en".to_owned()]);
    }

    #[test]
    fn unparsable_file_gives_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "theme = [unterminated").unwrap();
        assert_eq!(Config::load(&path), Config::default());
    }

    #[test]
    fn history_db_defaults_into_data_dir() {
        let data = PathBuf::from("/data/repargnou");
        assert_eq!(
            Config::default().history_db_path(&data),
            data.join("history.db")
        );
        let custom = Config {
            history_db: Some(PathBuf::from("/tmp/h.db")),
            ..Config::default()
        };
        assert_eq!(custom.history_db_path(&data), PathBuf::from("/tmp/h.db"));
    }
}
