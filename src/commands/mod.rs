//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `wlancaf-merge` command-line tool. Each subcommand is defined in its own
//! file.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic by calling into the `wlancaf_merge` library.
//!
//! The arguments selecting what to operate on (family, mode, kernel root) are
//! shared between `merge` and `check` through [`TargetArgs`].

pub mod check;
pub mod completions;
pub mod merge;

use anyhow::Result;
use clap::{Args, ValueEnum};
use std::path::PathBuf;

use wlancaf_merge::catalog::Family;
use wlancaf_merge::config::{Mode, RunConfig, Tag};

/// Driver family selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FamilyArg {
    /// qcacld-3.0 with fw-api and qca-wifi-host-cmn
    Qcacld,
    /// Legacy prima (pronto) driver
    Prima,
}

impl From<FamilyArg> for Family {
    fn from(family: FamilyArg) -> Self {
        match family {
            FamilyArg::Qcacld => Family::Qcacld,
            FamilyArg::Prima => Family::Prima,
        }
    }
}

/// Merge mode selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Merge a newer tag into an existing import
    Update,
    /// First import into empty staging directories
    Initial,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Update => Mode::Update,
            ModeArg::Initial => Mode::Initial,
        }
    }
}

/// What to operate on
#[derive(Args, Debug)]
pub struct TargetArgs {
    /// WLAN driver family to merge
    #[arg(short = 'W', long = "wlan", value_enum, value_name = "FAMILY")]
    pub family: FamilyArg,

    /// Whether this is a first import or an update
    #[arg(short = 'I', long, visible_alias = "init", value_enum, value_name = "MODE")]
    pub mode: ModeArg,

    /// Root of the kernel source tree
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,
}

impl TargetArgs {
    /// Builds a run configuration with the built-in defaults.
    pub fn run_config(&self, tag: Tag) -> Result<RunConfig> {
        Ok(RunConfig::new(
            self.family.into(),
            self.mode.into(),
            tag,
            &self.root,
        )?)
    }
}
