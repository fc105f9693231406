// src/manifest/builder.rs

//! Manifest construction from an install tree
//!
//! Given the install root and the set of paths a package owns, stat and hash
//! each path and produce the records that end up in `files.xml`.

use super::encoding::{format_mode, normalize_path, path_to_text, strip_root};
use super::record::{FileRecord, PackageManifest};
use crate::classify::FileClassifier;
use crate::error::{Error, Result};
use crate::hash::{self, HashAlgorithm};
use rayon::prelude::*;
use std::ffi::OsStr;
use std::fs;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Builds a [`PackageManifest`] for files below an install root
#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    install_root: PathBuf,
    algorithm: HashAlgorithm,
    parallel: bool,
}

impl ManifestBuilder {
    /// Create a builder hashing with SHA-256, sequentially
    pub fn new(install_root: &Path) -> Self {
        Self {
            install_root: install_root.to_path_buf(),
            algorithm: HashAlgorithm::default(),
            parallel: false,
        }
    }

    pub fn with_hash_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Stat and hash files on the rayon pool
    ///
    /// Record order and warning order are unchanged.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn install_root(&self) -> &Path {
        &self.install_root
    }

    /// Build the manifest for `paths`
    ///
    /// Paths are relative to the install root; a leading `/` is stripped.
    /// Paths naming the root itself (`""`, `"/"`) are skipped with a warning.
    /// Duplicates collapse, and processing follows byte-wise path order.
    /// The first I/O failure aborts the whole build.
    pub fn build<I, P>(&self, paths: I) -> Result<PackageManifest>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut relative: Vec<Vec<u8>> = Vec::new();
        for path in paths {
            let raw = path.as_ref().as_os_str().as_bytes();
            let stripped = strip_root(raw);
            if stripped.is_empty() {
                warn!("Ignoring path {:?}: names the install root itself", path.as_ref());
                continue;
            }
            relative.push(stripped.to_vec());
        }
        relative.sort();
        relative.dedup();

        info!(
            "Building manifest for {} files under {}",
            relative.len(),
            self.install_root.display()
        );

        let records = if self.parallel {
            relative
                .par_iter()
                .map(|p| self.build_record(p))
                .collect::<Result<Vec<_>>>()?
        } else {
            relative
                .iter()
                .map(|p| self.build_record(p))
                .collect::<Result<Vec<_>>>()?
        };

        for (raw, record) in relative.iter().zip(&records) {
            if record.is_suid() {
                let full_path = self.install_root.join(OsStr::from_bytes(raw));
                warn!("{} has suid bit set", full_path.display());
            }
        }

        Ok(PackageManifest::from_ordered(records))
    }

    fn build_record(&self, relative: &[u8]) -> Result<FileRecord> {
        let full_path = self.install_root.join(OsStr::from_bytes(relative));
        let metadata = fs::symlink_metadata(&full_path).map_err(|e| Error::from_io(&full_path, e))?;
        let (_, hash) = hash::hash_path(self.algorithm, &full_path)?;

        let is_symlink = metadata.file_type().is_symlink();
        let (size, link_target) = if is_symlink {
            let target = fs::read_link(&full_path).map_err(|e| Error::from_io(&full_path, e))?;
            let normalized = normalize_path(target.as_os_str().as_bytes());
            (normalized.len() as u64, Some(path_to_text(&normalized)))
        } else {
            (metadata.len(), None)
        };

        let path = path_to_text(relative);
        let file_type = FileClassifier::classify(&format!("/{}", path));

        debug!("Recorded /{} ({}, {} bytes)", path, file_type, size);

        Ok(FileRecord {
            path,
            file_type,
            size,
            hash,
            uid: metadata.uid().to_string(),
            gid: metadata.gid().to_string(),
            mode: format_mode(metadata.mode()),
            is_symlink,
            link_target,
        })
    }
}

/// Build a manifest with default settings
pub fn build_manifest<I, P>(install_root: &Path, paths: I) -> Result<PackageManifest>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    ManifestBuilder::new(install_root).build(paths)
}
