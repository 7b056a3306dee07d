//! # Run Configuration
//!
//! This module defines the explicit configuration value that every component
//! receives, instead of reading process-wide state.
//!
//! ## Key Components
//!
//! - **`RunConfig`**: the family, mode and tag for this run plus the kernel
//!   root and commit options.
//! - **`Mode`**: initial import or incremental update.
//! - **`Tag`**: a validated upstream tag, with access to its revision token.
//! - **`Settings`**: the optional `.wlancaf-merge.yaml` file in the kernel
//!   root. Values given on the command line take precedence over it.
//!
//! ## Settings file
//!
//! ```yaml
//! remote_base: https://git.codelinaro.org/clo/la/platform/vendor/qcom-opensource/wlan
//! gpg_sign: false
//! signoff: true
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use url::Url;

use crate::catalog::Family;
use crate::defaults;
use crate::error::{Error, Result};
use crate::interrupt::PendingFiles;

/// Whether the run imports a driver for the first time or updates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Initial,
    Update,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Initial => "initial",
            Mode::Update => "update",
        }
    }

    /// The mode an operator most likely meant when this one does not fit.
    pub fn other(self) -> Mode {
        match self {
            Mode::Initial => Mode::Update,
            Mode::Update => Mode::Initial,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "initial" => Ok(Mode::Initial),
            "update" => Ok(Mode::Update),
            _ => Err(format!("Unknown mode '{}'. Use: initial or update", s)),
        }
    }
}

/// An upstream tag, checked to be safe to hand to git as a ref.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag(String);

impl Tag {
    pub fn new(tag: impl Into<String>) -> Result<Self> {
        let tag = tag.into();
        let problem = if tag.is_empty() {
            Some("tag must not be empty")
        } else if tag.starts_with('-') {
            Some("tag must not start with '-'")
        } else if tag.chars().any(char::is_whitespace) {
            Some("tag must not contain whitespace")
        } else if tag.contains("..") {
            Some("tag must not contain '..'")
        } else {
            None
        };

        match problem {
            Some(message) => Err(Error::InvalidTag {
                tag,
                message: message.to_string(),
            }),
            None => Ok(Self(tag)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part of the tag before its first hyphen.
    ///
    /// Used as a fuzzy key when looking for an earlier import of the same
    /// upstream line in the kernel history.
    pub fn revision(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Contents of the optional `.wlancaf-merge.yaml` settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Base URL the sub-repositories are fetched from.
    #[serde(default)]
    pub remote_base: Option<String>,
    /// Sign merge commits with GPG.
    #[serde(default)]
    pub gpg_sign: Option<bool>,
    /// Add a `Signed-off-by` trailer to merge commits.
    #[serde(default)]
    pub signoff: Option<bool>,
}

impl Settings {
    /// Parse settings from YAML text.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| Error::ConfigParse {
            message: e.to_string(),
            hint: Some(format!(
                "Supported keys in {} are remote_base, gpg_sign and signoff",
                defaults::SETTINGS_FILE
            )),
        })
    }

    /// Load the settings file from `root`, or defaults if there is none.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(defaults::SETTINGS_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        Self::parse(&content)
    }
}

/// Everything a merge run needs to know, passed explicitly to each step.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub family: Family,
    pub mode: Mode,
    pub tag: Tag,
    /// Root of the kernel source tree.
    pub root: PathBuf,
    /// Base URL the sub-repositories are fetched from.
    pub remote_base: Url,
    /// Pass `--gpg-sign` to `git commit`.
    pub gpg_sign: bool,
    /// Pass `--signoff` to `git commit`.
    pub signoff: bool,
    /// Directory for commit message scratch files; the system temp dir if
    /// unset.
    pub scratch_dir: Option<PathBuf>,
    /// Scratch files to remove if the run is interrupted.
    pub pending: PendingFiles,
}

impl RunConfig {
    /// Creates a configuration with the built-in defaults.
    pub fn new(family: Family, mode: Mode, tag: Tag, root: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            family,
            mode,
            tag,
            root: root.into(),
            remote_base: Url::parse(defaults::REMOTE_BASE)?,
            gpg_sign: true,
            signoff: true,
            scratch_dir: None,
            pending: PendingFiles::new(),
        })
    }

    /// Applies values from a settings file over the current ones.
    pub fn apply_settings(mut self, settings: &Settings) -> Result<Self> {
        if let Some(base) = &settings.remote_base {
            self.remote_base = parse_remote_base(base)?;
        }
        if let Some(sign) = settings.gpg_sign {
            self.gpg_sign = sign;
        }
        if let Some(signoff) = settings.signoff {
            self.signoff = signoff;
        }
        Ok(self)
    }
}

/// Parse and validate a remote base URL.
pub fn parse_remote_base(value: &str) -> Result<Url> {
    let url = Url::parse(value)?;
    if url.cannot_be_a_base() {
        return Err(Error::ConfigParse {
            message: format!("remote base '{}' cannot be used as a base URL", value),
            hint: Some("Use a hierarchical URL such as https://host/path or file:///path".to_string()),
        });
    }
    Ok(url)
}
