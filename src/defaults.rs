//! Default values for wlancaf-merge.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

/// Staging directory, relative to the kernel root, holding imported drivers.
pub const STAGING_DIR: &str = "drivers/staging";

/// Build file at the kernel root whose presence marks a kernel tree.
pub const ROOT_MAKEFILE: &str = "Makefile";

/// Optional per-tree settings file, looked up in the kernel root.
pub const SETTINGS_FILE: &str = ".wlancaf-merge.yaml";

/// Upstream location the WLAN repositories are fetched from.
///
/// Can be overridden by the `--remote-base` CLI flag, the
/// `WLANCAF_REMOTE_BASE` environment variable or `remote_base` in the
/// settings file.
pub const REMOTE_BASE: &str =
    "https://source.codeaurora.org/quic/la/platform/vendor/qcom-opensource/wlan";

/// Number of upstream commits listed when no previous import is known.
pub const HISTORY_LIMIT: usize = 45;
