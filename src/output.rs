//! # Output Configuration
//!
//! Controls how the CLI decorates its progress and summary lines, based on
//! terminal capabilities and user preferences.
//!
//! ## Respecting User Preferences
//!
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wlancaf_merge::output::{OutputConfig, emoji};
//!
//! let config = OutputConfig::from_env_and_flag("auto");
//! println!("{} Merging prima...", emoji(&config, "🔀", "[MERGE]"));
//! ```

use std::env;
use std::ffi::OsString;

use crate::orchestrator::{Outcome, SubRepoReport};

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `color_flag` is the value of `--color`: `always` and `never` win over
    /// the environment, anything else falls back to detection. In auto mode
    /// colors are off when `NO_COLOR` is set, `CLICOLOR=0`, `TERM=dumb`, or
    /// stdout is not a TTY (unless `CLICOLOR_FORCE=1`).
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        env_color_preference(|key| env::var_os(key))
            .unwrap_or_else(|| console::Term::stdout().features().colors_supported())
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

/// The color choice forced by the environment, or `None` to ask the
/// terminal. `NO_COLOR` counts even when empty.
fn env_color_preference(var: impl Fn(&str) -> Option<OsString>) -> Option<bool> {
    let equals = |key: &str, value: &str| var(key).is_some_and(|v| v == value);

    if var("NO_COLOR").is_some() || equals("CLICOLOR", "0") {
        Some(false)
    } else if var("CLICOLOR_FORCE").is_some_and(|v| !v.is_empty() && v != "0") {
        Some(true)
    } else if equals("TERM", "dumb") {
        Some(false)
    } else {
        None
    }
}

/// Returns the emoji when colors are enabled, the plain alternative
/// otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// One summary line for a sub-repository, e.g. `✅ prima: imported,
/// registered in Kconfig and Makefile`.
pub fn report_line(config: &OutputConfig, report: &SubRepoReport) -> String {
    let (marker, detail) = match report.outcome {
        Outcome::Imported { registration } => {
            let detail = match registration {
                Some(r) if r.kconfig_changed && r.makefile_changed => {
                    "imported, registered in Kconfig and Makefile"
                }
                Some(r) if r.kconfig_changed => "imported, registered in Kconfig",
                Some(r) if r.makefile_changed => "imported, registered in Makefile",
                Some(_) => "imported, already registered",
                None => "imported",
            };
            (emoji(config, "✅", "[OK]"), detail)
        }
        Outcome::Updated => (emoji(config, "✅", "[OK]"), "updated"),
        Outcome::UpToDate => (emoji(config, "⏭️ ", "[SKIP]"), "already up to date"),
    };
    format!("{} {}: {}", marker, report.name, detail)
}
