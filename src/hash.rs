// src/hash.rs

//! Content hashing for manifest records
//!
//! Every regular file in a package gets a content digest in `files.xml`.
//! Two algorithms are available:
//!
//! | Algorithm | Use |
//! |-----------|-----|
//! | SHA-256 | Default; stable across tools, suitable for verification |
//! | XXH128 | Fast, non-cryptographic; local reproducibility checks |
//!
//! Symlinks are hashed over their normalized link text, never over the file they point
//! at, so a dangling link still hashes. Directories have no content hash.

use crate::error::{Error, Result};
use crate::manifest::encoding::normalize_path;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use xxhash_rust::xxh3::Xxh3;

/// Hash algorithm selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashAlgorithm {
    /// SHA-256, 64 hex characters
    #[default]
    Sha256,
    /// XXH3 128-bit, 32 hex characters
    Xxh128,
}

impl HashAlgorithm {
    /// Length of the hex digest
    #[inline]
    pub const fn hex_len(&self) -> usize {
        match self {
            Self::Sha256 => 64,
            Self::Xxh128 => 32,
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Xxh128 => "xxh128",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = HashError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(Self::Sha256),
            "xxh128" | "xxhash" | "xxh3" => Ok(Self::Xxh128),
            _ => Err(HashError::UnknownAlgorithm(s.to_string())),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HashError {
    #[error("unknown hash algorithm: {0}")]
    UnknownAlgorithm(String),
}

/// A digest together with the algorithm that produced it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hash {
    pub algorithm: HashAlgorithm,
    /// Lowercase hex digest
    pub value: String,
}

impl Hash {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Incremental hasher over either algorithm
pub struct Hasher {
    algorithm: HashAlgorithm,
    state: HasherState,
}

enum HasherState {
    Sha256(Sha256),
    Xxh128(Box<Xxh3>),
}

impl Hasher {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        let state = match algorithm {
            HashAlgorithm::Sha256 => HasherState::Sha256(Sha256::new()),
            HashAlgorithm::Xxh128 => HasherState::Xxh128(Box::new(Xxh3::new())),
        };
        Self { algorithm, state }
    }

    pub fn update(&mut self, data: &[u8]) {
        match &mut self.state {
            HasherState::Sha256(hasher) => hasher.update(data),
            HasherState::Xxh128(hasher) => hasher.update(data),
        }
    }

    pub fn finalize(self) -> Hash {
        let value = match self.state {
            HasherState::Sha256(hasher) => format!("{:x}", hasher.finalize()),
            HasherState::Xxh128(hasher) => format!("{:032x}", hasher.digest128()),
        };
        Hash {
            algorithm: self.algorithm,
            value,
        }
    }
}

/// Hash a byte slice
pub fn hash_bytes(algorithm: HashAlgorithm, data: &[u8]) -> Hash {
    let mut hasher = Hasher::new(algorithm);
    hasher.update(data);
    hasher.finalize()
}

/// Hash everything readable from `reader`
pub fn hash_reader<R: Read>(algorithm: HashAlgorithm, reader: &mut R) -> io::Result<Hash> {
    let mut hasher = Hasher::new(algorithm);
    let mut buffer = [0u8; 8192];

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hasher.finalize())
}

/// Compute the content hash for a path inside an install tree
///
/// Returns the path that was hashed alongside the digest. Symlinks hash the
/// normalized link text, regular files their contents, directories yield
/// `None`.
pub fn hash_path(algorithm: HashAlgorithm, path: &Path) -> Result<(PathBuf, Option<Hash>)> {
    let metadata = fs::symlink_metadata(path).map_err(|e| Error::from_io(path, e))?;
    let file_type = metadata.file_type();

    let hash = if file_type.is_symlink() {
        let target = fs::read_link(path).map_err(|e| Error::from_io(path, e))?;
        Some(hash_bytes(algorithm, &normalize_path(target.as_os_str().as_bytes())))
    } else if file_type.is_dir() {
        None
    } else {
        let mut file = fs::File::open(path).map_err(|e| Error::from_io(path, e))?;
        Some(hash_reader(algorithm, &mut file).map_err(|e| Error::from_io(path, e))?)
    };

    Ok((path.to_path_buf(), hash))
}
