//! # Repository Catalog
//!
//! Static knowledge about the two CAF WLAN driver families: which upstream
//! sub-repositories make up each family, where each one lands in the kernel
//! tree, and how the family is wired into the staging build files.
//!
//! Catalog order matters. For `qcacld` the firmware API and common host
//! layers come before `qcacld-3.0`, which builds on top of them and is the
//! only entry that gets registered in `Kconfig`/`Makefile`.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use url::Url;

use crate::defaults::STAGING_DIR;
use crate::error::{Error, Result};

/// Driver family selected for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// qcacld-3.0 with its `fw-api` and `qca-wifi-host-cmn` companions.
    Qcacld,
    /// The single-repository prima (pronto) driver.
    Prima,
}

/// One upstream repository imported into the staging area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubRepo {
    /// Repository name, which is also the staging subdirectory name.
    pub name: &'static str,
    /// Whether importing this repository introduces a new build unit.
    pub build_bearing: bool,
}

/// Lines that wire a family's driver into the staging build files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildUnit {
    /// `source` line added to `drivers/staging/Kconfig`.
    pub kconfig_source: &'static str,
    /// Config symbol whose presence in the Makefile means "already wired".
    pub config_symbol: &'static str,
    /// Object line appended to `drivers/staging/Makefile`.
    pub makefile_line: &'static str,
}

const QCACLD_REPOS: &[SubRepo] = &[
    SubRepo {
        name: "fw-api",
        build_bearing: false,
    },
    SubRepo {
        name: "qca-wifi-host-cmn",
        build_bearing: false,
    },
    SubRepo {
        name: "qcacld-3.0",
        build_bearing: true,
    },
];

const PRIMA_REPOS: &[SubRepo] = &[SubRepo {
    name: "prima",
    build_bearing: true,
}];

const QCACLD_UNIT: BuildUnit = BuildUnit {
    kconfig_source: "source \"drivers/staging/qcacld-3.0/Kconfig\"",
    config_symbol: "CONFIG_QCA_CLD_WLAN",
    makefile_line: "obj-$(CONFIG_QCA_CLD_WLAN)\t+= qcacld-3.0/",
};

const PRIMA_UNIT: BuildUnit = BuildUnit {
    kconfig_source: "source \"drivers/staging/prima/Kconfig\"",
    config_symbol: "CONFIG_PRONTO_WLAN",
    makefile_line: "obj-$(CONFIG_PRONTO_WLAN)\t+= prima/",
};

impl Family {
    /// Sub-repositories in merge order.
    pub fn subrepos(self) -> &'static [SubRepo] {
        match self {
            Family::Qcacld => QCACLD_REPOS,
            Family::Prima => PRIMA_REPOS,
        }
    }

    /// Build-file registration data for this family.
    pub fn build_unit(self) -> BuildUnit {
        match self {
            Family::Qcacld => QCACLD_UNIT,
            Family::Prima => PRIMA_UNIT,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Family::Qcacld => "qcacld",
            Family::Prima => "prima",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Family {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "qcacld" => Ok(Family::Qcacld),
            "prima" => Ok(Family::Prima),
            _ => Err(format!("Unknown wlan family '{}'. Use: qcacld or prima", s)),
        }
    }
}

impl SubRepo {
    /// Path of the import destination, relative to the kernel root.
    pub fn destination(&self) -> PathBuf {
        PathBuf::from(STAGING_DIR).join(self.name)
    }

    /// The destination as git expects it in `--prefix` and `subtree=`.
    pub fn prefix(&self) -> String {
        format!("{}/{}", STAGING_DIR, self.name)
    }

    /// Upstream URL of this repository under `remote_base`.
    pub fn url(&self, remote_base: &Url) -> Result<Url> {
        let mut base = remote_base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(self.name).map_err(Error::from)
    }
}
