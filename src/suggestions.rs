//! # Remediation Hints
//!
//! Helper functions that produce the one-line hints attached to errors.
//! Errors should tell the operator what went wrong AND how to get out of it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crate::suggestions;
//!
//! return Err(Error::Precondition {
//!     message,
//!     hint: Some(suggestions::use_other_mode(config.mode)),
//! });
//! ```

use crate::config::Mode;

/// Hint for a run whose staging state fits the other mode.
pub fn use_other_mode(requested: Mode) -> String {
    match requested {
        Mode::Initial => format!(
            "The driver already looks imported; you might want to use --mode {}",
            requested.other()
        ),
        Mode::Update => format!(
            "The driver does not look imported yet; you might want to use --mode {}",
            requested.other()
        ),
    }
}

/// Hint for a merge that stopped on conflicts.
pub fn resolve_conflict() -> String {
    "Merge needs manual intervention: resolve the conflict(s), then `git add` and `git commit`"
        .to_string()
}

/// Hint for a working directory without a root `Makefile`.
pub fn not_kernel_root() -> String {
    "Run this inside the root of your kernel source, or pass --root <DIR>".to_string()
}

/// Hint for a kernel tree without a staging directory.
pub fn missing_staging() -> String {
    "Are you sure this is a kernel source tree? drivers/staging must exist".to_string()
}
