// src/error.rs

//! Error types shared by the manifest and metadata pipeline

use crate::hash::HashError;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Permission denied: {}", .path.display())]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    Invalid(String),

    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Failed to write XML document: {0}")]
    Xml(String),

    #[error("Hash error: {0}")]
    Hash(#[from] HashError),
}

impl Error {
    /// Classify an I/O failure on `path`
    ///
    /// Access denial gets its own variant; everything else (including files
    /// vanishing between enumeration and stat) is reported as `Io`.
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::PermissionDenied {
            Self::PermissionDenied {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// True for failures caused by the filesystem rather than bad input
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::PermissionDenied { .. })
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;
