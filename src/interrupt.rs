//! # Interrupt Cleanup
//!
//! An interrupted run must not leave commit message files behind. Drop
//! handlers do not run when the process is killed by SIGINT or SIGTERM, so
//! every live message file is also recorded in a [`PendingFiles`] registry.
//! [`install`] hooks a handler that removes whatever is still registered and
//! exits with [`EXIT_CODE_INTERRUPTED`].
//!
//! The tree itself is left as git left it; an interrupted merge can be
//! inspected or aborted with `git merge --abort`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use log::{debug, warn};

/// Exit code for a run stopped by SIGINT or SIGTERM (128 + SIGINT).
pub const EXIT_CODE_INTERRUPTED: i32 = 130;

/// Scratch files that must be removed if the run is interrupted.
///
/// Clones share the same registry.
#[derive(Debug, Clone, Default)]
pub struct PendingFiles {
    paths: Arc<Mutex<Vec<PathBuf>>>,
}

impl PendingFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&self, path: &Path) {
        if let Ok(mut paths) = self.paths.lock() {
            paths.push(path.to_path_buf());
        }
    }

    pub fn release(&self, path: &Path) {
        if let Ok(mut paths) = self.paths.lock() {
            paths.retain(|p| p != path);
        }
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.paths
            .lock()
            .map(|paths| paths.clone())
            .unwrap_or_default()
    }

    /// Removes every tracked file and empties the registry.
    ///
    /// Returns how many files were removed. Files already gone are skipped.
    pub fn purge(&self) -> usize {
        let paths = match self.paths.lock() {
            Ok(mut paths) => std::mem::take(&mut *paths),
            Err(_) => return 0,
        };

        let mut removed = 0;
        for path in paths {
            match fs::remove_file(&path) {
                Ok(()) => {
                    debug!("Removed {}", path.display());
                    removed += 1;
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!("Could not remove {}: {}", path.display(), e),
            }
        }
        removed
    }
}

/// Installs the process-wide SIGINT/SIGTERM handler for `pending`.
///
/// Can be called once per process.
pub fn install(pending: PendingFiles) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        let removed = pending.purge();
        eprintln!(
            "\nInterrupted, removed {} pending commit message file(s)",
            removed
        );
        std::process::exit(EXIT_CODE_INTERRUPTED);
    })
}
