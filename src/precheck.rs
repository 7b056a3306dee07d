//! # Precondition Checks
//!
//! Gatekeeping that runs before any git command mutates the tree.
//!
//! [`validate_tree`] makes sure the working directory is a kernel source
//! root. [`check`] then looks at every staging destination of the selected
//! family and decides whether the requested mode fits what is on disk:
//!
//! | Mode    | Every destination must be |
//! |---------|---------------------------|
//! | Initial | absent or empty           |
//! | Update  | present and non-empty     |
//!
//! Offending directories are reported one by one, then a single final gate
//! over all of them decides the outcome. A partially imported `qcacld`
//! (say, `fw-api` populated but `qcacld-3.0` missing) therefore fits
//! neither mode and needs manual cleanup.

use std::fmt;
use std::fs;
use std::path::Path;

use log::warn;

use crate::catalog::Family;
use crate::config::{Mode, RunConfig};
use crate::defaults::{ROOT_MAKEFILE, STAGING_DIR};
use crate::error::{Error, Result};
use crate::suggestions;

/// What is on disk at a staging destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirState {
    Absent,
    Empty,
    Populated,
}

impl fmt::Display for DirState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DirState::Absent => "does not exist",
            DirState::Empty => "exists but is empty",
            DirState::Populated => "exists and is not empty",
        })
    }
}

impl DirState {
    /// Whether this state is acceptable for `mode`.
    pub fn fits(self, mode: Mode) -> bool {
        match mode {
            Mode::Initial => self != DirState::Populated,
            Mode::Update => self == DirState::Populated,
        }
    }
}

/// Classifies `path`. A non-directory at the path counts as populated.
pub fn inspect(path: &Path) -> Result<DirState> {
    if !path.exists() {
        return Ok(DirState::Absent);
    }
    if !path.is_dir() {
        return Ok(DirState::Populated);
    }
    let mut entries = fs::read_dir(path)?;
    Ok(if entries.next().is_some() {
        DirState::Populated
    } else {
        DirState::Empty
    })
}

/// Fails unless `root` looks like a kernel source tree.
pub fn validate_tree(root: &Path) -> Result<()> {
    if !root.join(ROOT_MAKEFILE).is_file() {
        return Err(Error::Environment {
            message: format!("no {} found in {}", ROOT_MAKEFILE, root.display()),
            hint: Some(suggestions::not_kernel_root()),
        });
    }
    if !root.join(STAGING_DIR).is_dir() {
        return Err(Error::Environment {
            message: format!("staging directory {} not found in {}", STAGING_DIR, root.display()),
            hint: Some(suggestions::missing_staging()),
        });
    }
    Ok(())
}

/// Fails unless the staging destinations fit the requested mode.
pub fn check(config: &RunConfig) -> Result<()> {
    check_family(&config.root, config.family, config.mode)
}

/// Same as [`check`], for callers without a full [`RunConfig`].
pub fn check_family(root: &Path, family: Family, mode: Mode) -> Result<()> {
    let mut offenders = Vec::new();

    for repo in family.subrepos() {
        let state = inspect(&root.join(repo.destination()))?;
        if !state.fits(mode) {
            warn!("{} {}", repo.name, state);
            offenders.push(format!("{} {}", repo.name, state));
        }
    }

    if offenders.is_empty() {
        return Ok(());
    }

    Err(Error::Precondition {
        message: format!(
            "{} {} cannot run because {}",
            family,
            mode,
            offenders.join(", ")
        ),
        hint: Some(suggestions::use_other_mode(mode)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tag;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn config(root: &Path, family: Family, mode: Mode) -> RunConfig {
        RunConfig::new(family, mode, Tag::new("LA.UM.1-01").unwrap(), root).unwrap()
    }

    fn staging(root: &Path, name: &str) -> PathBuf {
        root.join(STAGING_DIR).join(name)
    }

    fn make_empty(root: &Path, name: &str) {
        fs::create_dir_all(staging(root, name)).unwrap();
    }

    fn make_populated(root: &Path, name: &str) {
        make_empty(root, name);
        fs::write(staging(root, name).join("Kbuild"), "obj-y += x.o\n").unwrap();
    }

    #[test]
    fn test_inspect_states() {
        let temp = TempDir::new().unwrap();
        assert_eq!(inspect(&temp.path().join("missing")).unwrap(), DirState::Absent);

        make_empty(temp.path(), "prima");
        assert_eq!(inspect(&staging(temp.path(), "prima")).unwrap(), DirState::Empty);

        make_populated(temp.path(), "prima");
        assert_eq!(
            inspect(&staging(temp.path(), "prima")).unwrap(),
            DirState::Populated
        );
    }

    #[test]
    fn test_validate_tree() {
        let temp = TempDir::new().unwrap();
        let err = validate_tree(temp.path()).unwrap_err();
        assert!(matches!(err, Error::Environment { .. }));
        assert!(err.to_string().contains("Makefile"));

        fs::write(temp.path().join("Makefile"), "VERSION = 4\n").unwrap();
        let err = validate_tree(temp.path()).unwrap_err();
        assert!(err.to_string().contains("drivers/staging"));

        fs::create_dir_all(temp.path().join(STAGING_DIR)).unwrap();
        validate_tree(temp.path()).unwrap();
    }

    #[test]
    fn test_qcacld_initial_accepts_absent_and_empty() {
        let temp = TempDir::new().unwrap();
        make_empty(temp.path(), "fw-api");
        check(&config(temp.path(), Family::Qcacld, Mode::Initial)).unwrap();
    }

    #[test]
    fn test_qcacld_initial_rejects_any_populated() {
        let temp = TempDir::new().unwrap();
        make_populated(temp.path(), "qca-wifi-host-cmn");

        let err = check(&config(temp.path(), Family::Qcacld, Mode::Initial)).unwrap_err();
        let display = err.to_string();
        assert!(matches!(err, Error::Precondition { .. }));
        assert!(display.contains("qca-wifi-host-cmn exists and is not empty"));
        assert!(display.contains("--mode update"));
    }

    #[test]
    fn test_qcacld_update_accepts_all_populated() {
        let temp = TempDir::new().unwrap();
        for name in ["fw-api", "qca-wifi-host-cmn", "qcacld-3.0"] {
            make_populated(temp.path(), name);
        }
        check(&config(temp.path(), Family::Qcacld, Mode::Update)).unwrap();
    }

    #[test]
    fn test_qcacld_update_rejects_partial_import() {
        let temp = TempDir::new().unwrap();
        make_populated(temp.path(), "fw-api");
        make_populated(temp.path(), "qca-wifi-host-cmn");
        make_empty(temp.path(), "qcacld-3.0");

        let err = check(&config(temp.path(), Family::Qcacld, Mode::Update)).unwrap_err();
        let display = err.to_string();
        assert!(display.contains("qcacld-3.0 exists but is empty"));
        assert!(!display.contains("fw-api"));
        assert!(display.contains("--mode initial"));
    }

    #[test]
    fn test_qcacld_update_rejects_nothing_imported() {
        let temp = TempDir::new().unwrap();
        let err = check(&config(temp.path(), Family::Qcacld, Mode::Update)).unwrap_err();
        assert!(err.to_string().contains("fw-api does not exist"));
    }

    #[test]
    fn test_prima_initial() {
        let temp = TempDir::new().unwrap();
        check(&config(temp.path(), Family::Prima, Mode::Initial)).unwrap();

        make_empty(temp.path(), "prima");
        check(&config(temp.path(), Family::Prima, Mode::Initial)).unwrap();

        make_populated(temp.path(), "prima");
        let err = check(&config(temp.path(), Family::Prima, Mode::Initial)).unwrap_err();
        assert!(err.to_string().contains("prima exists and is not empty"));
    }

    #[test]
    fn test_prima_update() {
        let temp = TempDir::new().unwrap();
        let err = check(&config(temp.path(), Family::Prima, Mode::Update)).unwrap_err();
        assert!(err.to_string().contains("prima does not exist"));

        make_empty(temp.path(), "prima");
        let err = check(&config(temp.path(), Family::Prima, Mode::Update)).unwrap_err();
        assert!(err.to_string().contains("prima exists but is empty"));

        make_populated(temp.path(), "prima");
        check(&config(temp.path(), Family::Prima, Mode::Update)).unwrap();
    }
}
