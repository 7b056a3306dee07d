//! # Build-Config Registration
//!
//! After the initial import of a build-bearing sub-repository, the driver
//! has to be wired into the staging build: a `source` line in
//! `drivers/staging/Kconfig` and an object line in
//! `drivers/staging/Makefile`.
//!
//! Both edits are idempotent and independent. Each file is checked for its
//! own marker (the `source` line for Kconfig, the config symbol for the
//! Makefile) and left untouched when the marker is already present, so
//! re-running an interrupted import never duplicates entries.
//!
//! The markers and insertion point are the public constants below and the
//! family's [`BuildUnit`]. Bump [`MARKERS_VERSION`] when any of them
//! changes meaning.

use std::fs;
use std::path::Path;

use log::info;

use crate::catalog::BuildUnit;
use crate::defaults::STAGING_DIR;
use crate::error::{Error, Result};
use crate::git::Git;

/// Revision of the marker and insertion-point contract.
pub const MARKERS_VERSION: u32 = 1;

/// Line closing the staging section in `drivers/staging/Kconfig`. New
/// `source` lines go right before it.
pub const KCONFIG_SECTION_END: &str = "endif # STAGING";

/// Kconfig file name inside the staging directory.
pub const KCONFIG: &str = "Kconfig";

/// Makefile name inside the staging directory.
pub const MAKEFILE: &str = "Makefile";

/// Which build files a registration changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Registration {
    pub kconfig_changed: bool,
    pub makefile_changed: bool,
}

impl Registration {
    pub fn changed(&self) -> bool {
        self.kconfig_changed || self.makefile_changed
    }
}

/// Returns the patched Kconfig text, or `None` if already registered.
///
/// The `source` line and a blank line are inserted before the last line
/// reading `endif # STAGING`.
pub fn patch_kconfig(content: &str, unit: &BuildUnit) -> Result<Option<String>> {
    if content.contains(unit.kconfig_source) {
        return Ok(None);
    }

    let mut offset = 0;
    let mut insert_at = None;
    for line in content.split_inclusive('\n') {
        if line.trim_end() == KCONFIG_SECTION_END {
            insert_at = Some(offset);
        }
        offset += line.len();
    }

    let pos = insert_at.ok_or_else(|| Error::BuildConfig {
        path: Path::new(STAGING_DIR).join(KCONFIG),
        message: format!("missing '{}' line", KCONFIG_SECTION_END),
    })?;
    Ok(Some(format!(
        "{}{}\n\n{}",
        &content[..pos],
        unit.kconfig_source,
        &content[pos..]
    )))
}

/// Returns the patched Makefile text, or `None` if already registered.
pub fn patch_makefile(content: &str, unit: &BuildUnit) -> Option<String> {
    if content.contains(unit.config_symbol) {
        return None;
    }

    let mut patched = content.to_string();
    if !patched.is_empty() && !patched.ends_with('\n') {
        patched.push('\n');
    }
    patched.push_str(unit.makefile_line);
    patched.push('\n');
    Some(patched)
}

/// Patches and stages both staging build files under `root`.
///
/// Both files are read and patched in memory first, so a missing file or
/// marker fails the registration before either one is written.
pub fn register(git: &Git, root: &Path, unit: &BuildUnit) -> Result<Registration> {
    let staging = root.join(STAGING_DIR);
    let kconfig_path = staging.join(KCONFIG);
    let makefile_path = staging.join(MAKEFILE);

    let kconfig = patch_kconfig(&fs::read_to_string(&kconfig_path)?, unit)?;
    let makefile = patch_makefile(&fs::read_to_string(&makefile_path)?, unit);

    let registration = Registration {
        kconfig_changed: kconfig.is_some(),
        makefile_changed: makefile.is_some(),
    };
    if let Some(patched) = kconfig {
        info!("Adding {} to {}/{}", unit.kconfig_source, STAGING_DIR, KCONFIG);
        fs::write(&kconfig_path, patched)?;
        git.add(&format!("{}/{}", STAGING_DIR, KCONFIG))?;
    }
    if let Some(patched) = makefile {
        info!("Adding {} to {}/{}", unit.config_symbol, STAGING_DIR, MAKEFILE);
        fs::write(&makefile_path, patched)?;
        git.add(&format!("{}/{}", STAGING_DIR, MAKEFILE))?;
    }

    Ok(registration)
}
