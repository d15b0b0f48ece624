//! # Output Configuration
//!
//! This module provides utilities for controlling CLI output appearance,
//! including color and emoji support based on terminal capabilities and
//! user preferences, and the status lines printed after a run.
//!
//! ## Respecting User Preferences
//!
//! The module respects the following environment variables and flags:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ## Usage
//!
//! ```rust,ignore
//! use amalgamate::output::{OutputConfig, status_line};
//!
//! let config = OutputConfig::from_env_and_flag("auto");
//! if let Some(line) = status_line(&config, &outcome) {
//!     println!("{line}");
//! }
//! ```

use std::env;

use crate::phases::emit::EmitOutcome;
use crate::phases::orchestrator::{PlannedUnit, RunOutcome};

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// # Arguments
    /// * `color_flag` - The value of the --color CLI flag: "always", "never", or "auto"
    ///
    /// In auto mode, colors are disabled if:
    /// - `NO_COLOR` environment variable is set (any value, including empty)
    /// - `CLICOLOR=0` is set
    /// - `TERM=dumb` is set
    /// - stdout is not a TTY (unless `CLICOLOR_FORCE=1`)
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // The presence of NO_COLOR (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns the emoji when colors are enabled, the plain text otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// The status line for a finished run, or `None` when the document went to
/// standard output (where a status line would corrupt it).
pub fn status_line(config: &OutputConfig, outcome: &RunOutcome) -> Option<String> {
    let (icon, text) = match outcome {
        RunOutcome::Emitted(EmitOutcome::Streamed) => return None,
        RunOutcome::Emitted(EmitOutcome::Updated(path)) => {
            ("✅", format!("Updated {}", path.display()))
        }
        RunOutcome::Emitted(EmitOutcome::Unchanged(path)) => {
            ("💤", format!("{} is unchanged", path.display()))
        }
        RunOutcome::UpToDate(path) => ("⏱️", format!("{} is up to date", path.display())),
    };
    if config.use_color {
        Some(format!("{} {}", icon, console::style(text).green()))
    } else {
        Some(text)
    }
}

/// One `depth<TAB>key<TAB>path` line for a planned unit.
pub fn plan_line(unit: &PlannedUnit) -> String {
    format!("{}\t{}\t{}", unit.depth, unit.key, unit.path.display())
}
