// src/manifest/record.rs

//! Manifest data types

use crate::classify::FileType;
use crate::hash::Hash;

/// Set-user-ID bit within `st_mode`
pub const S_ISUID: u32 = 0o4000;

/// Metadata for one installed file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Install path without the leading `/` (e.g. `usr/bin/nano`)
    pub path: String,
    pub file_type: FileType,
    /// File size; for symlinks, the byte length of the normalized target
    pub size: u64,
    /// `None` for directories
    pub hash: Option<Hash>,
    pub uid: String,
    pub gid: String,
    /// Octal permission string such as `"0755"`
    pub mode: String,
    pub is_symlink: bool,
    pub link_target: Option<String>,
}

impl FileRecord {
    /// Path with the leading `/` restored
    pub fn install_path(&self) -> String {
        format!("/{}", self.path)
    }

    /// Whether the recorded mode carries the set-user-ID bit
    pub fn is_suid(&self) -> bool {
        u32::from_str_radix(&self.mode, 8).is_ok_and(|mode| mode & S_ISUID != 0)
    }
}

/// Ordered file records for one package
///
/// Records are kept in byte-wise path order. The installed size is derived
/// from the records on every call and never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageManifest {
    records: Vec<FileRecord>,
}

impl PackageManifest {
    /// Build a manifest from records, sorting them by path
    pub fn new(mut records: Vec<FileRecord>) -> Self {
        records.sort_by(|a, b| a.path.as_bytes().cmp(b.path.as_bytes()));
        Self { records }
    }

    /// Wrap records that the builder already ordered by raw path bytes
    pub(crate) fn from_ordered(records: Vec<FileRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of all record sizes
    pub fn installed_size(&self) -> u64 {
        self.records.iter().map(|r| r.size).sum()
    }

    pub fn get(&self, path: &str) -> Option<&FileRecord> {
        let path = path.trim_start_matches('/');
        self.records.iter().find(|r| r.path == path)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a PackageManifest {
    type Item = &'a FileRecord;
    type IntoIter = std::slice::Iter<'a, FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
