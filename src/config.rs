// src/config.rs

//! Build host configuration and the per-build context
//!
//! The configuration describes the machine and distribution a package is
//! built for. It is loaded once and passed down explicitly; nothing in the
//! crate reads it from global state.
//!
//! ```toml
//! [general]
//! distribution = "Solus"
//! distribution_release = "1"
//! architecture = "x86_64"
//!
//! [build]
//! build_host = "solus-build-server"
//! hash_algorithm = "sha256"
//! parallel = true
//! ```

use crate::error::{Error, Result};
use crate::hash::HashAlgorithm;
use crate::package::SourceSpec;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Package format version written to metadata.xml
pub const DEFAULT_PACKAGE_FORMAT: &str = "1.2";

/// Root structure of the build configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub build: BuildSettings,
}

/// Target distribution settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_distribution")]
    pub distribution: String,

    #[serde(default = "default_distribution_release")]
    pub distribution_release: String,

    #[serde(default = "default_architecture")]
    pub architecture: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            distribution: default_distribution(),
            distribution_release: default_distribution_release(),
            architecture: default_architecture(),
        }
    }
}

/// Build machine settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSettings {
    #[serde(default = "default_build_host")]
    pub build_host: String,

    /// `sha256` or `xxh128`
    #[serde(default = "default_hash_algorithm")]
    pub hash_algorithm: String,

    /// Hash files on multiple threads
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    #[serde(default = "default_package_format")]
    pub package_format: String,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            build_host: default_build_host(),
            hash_algorithm: default_hash_algorithm(),
            parallel: default_parallel(),
            package_format: default_package_format(),
        }
    }
}

fn default_distribution() -> String {
    "Solus".to_string()
}

fn default_distribution_release() -> String {
    "1".to_string()
}

fn default_architecture() -> String {
    "x86_64".to_string()
}

fn default_build_host() -> String {
    "localhost".to_string()
}

fn default_hash_algorithm() -> String {
    "sha256".to_string()
}

fn default_parallel() -> bool {
    true
}

fn default_package_format() -> String {
    DEFAULT_PACKAGE_FORMAT.to_string()
}

impl BuildConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: BuildConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("general.distribution", &self.general.distribution),
            ("general.distribution_release", &self.general.distribution_release),
            ("general.architecture", &self.general.architecture),
            ("build.build_host", &self.build.build_host),
            ("build.package_format", &self.build.package_format),
        ] {
            if value.trim().is_empty() {
                return Err(Error::MissingField(field.to_string()));
            }
        }
        self.hash_algorithm()?;
        Ok(())
    }

    pub fn hash_algorithm(&self) -> Result<HashAlgorithm> {
        Ok(self.build.hash_algorithm.parse()?)
    }
}

/// Everything one build invocation needs, fixed for its duration
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub source: SourceSpec,
    pub config: BuildConfig,
    pub install_root: PathBuf,
}

impl BuildContext {
    pub fn new(source: SourceSpec, config: BuildConfig, install_root: &Path) -> Self {
        Self {
            source,
            config,
            install_root: install_root.to_path_buf(),
        }
    }

    pub fn install_root(&self) -> &Path {
        &self.install_root
    }
}
