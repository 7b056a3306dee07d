//! # Git Version Probe
//!
//! Determines which optional git features a run may use, based on the
//! version the host git reports.
//!
//! Only one capability matters today: git 2.9 stopped merging unrelated
//! histories by default, so from that release on the initial `-s ours`
//! merge needs `--allow-unrelated-histories`. Older releases reject the
//! flag, so it is passed only when the version is known to support it.
//!
//! A version string that cannot be parsed is a hard error rather than a
//! silent fallback, since guessing wrong makes the first merge fail.

use regex::Regex;
use semver::Version;

use crate::error::{Error, Result};
use crate::git::Git;

/// First git release that requires `--allow-unrelated-histories`.
pub const MIN_UNRELATED_HISTORIES: Version = Version::new(2, 9, 0);

/// Optional features of the host git.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCapabilities {
    pub version: Version,
    /// Pass `--allow-unrelated-histories` to the initial merge.
    pub allow_unrelated_histories: bool,
}

impl GitCapabilities {
    pub fn from_version(version: Version) -> Self {
        let allow_unrelated_histories = version >= MIN_UNRELATED_HISTORIES;
        Self {
            version,
            allow_unrelated_histories,
        }
    }
}

/// Extracts the version from `git --version` output.
///
/// Accepts the vendor suffixes seen in the wild, e.g.
/// `git version 2.39.2 (Apple Git-143)` or `git version 2.45.1.windows.1`.
/// A missing patch component counts as zero.
pub fn parse_git_version(output: &str) -> Result<Version> {
    let re = Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?")?;
    let invalid = || Error::GitVersion {
        output: output.trim().to_string(),
    };

    let caps = re.captures(output).ok_or_else(invalid)?;
    let component = |i: usize| -> Result<u64> {
        match caps.get(i) {
            Some(m) => m.as_str().parse().map_err(|_| invalid()),
            None => Ok(0),
        }
    };

    Ok(Version::new(component(1)?, component(2)?, component(3)?))
}

/// Asks the host git for its version and derives its capabilities.
pub fn probe(git: &Git) -> Result<GitCapabilities> {
    let output = git.version()?;
    let version = parse_git_version(&output)?;
    log::debug!("detected git {}", version);
    Ok(GitCapabilities::from_version(version))
}
