// src/package/files.rs

//! Install tree enumeration and file ownership
//!
//! Walks the install root and decides which binary package claims each
//! path. A pattern claims a path when it names the path or one of its
//! parent directories, either literally or as a glob.

use super::spec::PackageTarget;
use crate::error::{Error, Result};
use glob::Pattern;
use std::collections::BTreeMap;
use std::fs;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Collect every file, symlink and empty directory under `install_root`
///
/// Returned paths are relative to the root, sorted by their raw bytes.
/// Non-empty directories are implied by their contents and not listed.
pub fn collect_install_files(install_root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(install_root).min_depth(1) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(install_root).to_path_buf();
            Error::from_io(&path, e.into())
        })?;

        let file_type = entry.file_type();
        let keep = if file_type.is_dir() {
            fs::read_dir(entry.path())
                .map_err(|e| Error::from_io(entry.path(), e))?
                .next()
                .is_none()
        } else {
            true
        };

        if keep {
            let relative = entry
                .path()
                .strip_prefix(install_root)
                .map_err(|_| Error::Invalid(format!("{} escapes install root", entry.path().display())))?;
            files.push(relative.to_path_buf());
        }
    }

    files.sort_by(|a, b| a.as_os_str().as_bytes().cmp(b.as_os_str().as_bytes()));
    debug!("Found {} entries under {}", files.len(), install_root.display());
    Ok(files)
}

/// Compiled form of a package's path patterns
#[derive(Debug, Clone)]
pub struct FileMatcher {
    patterns: Vec<(String, Option<Pattern>)>,
}

impl FileMatcher {
    pub fn new(patterns: &[String]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|raw| -> Result<(String, Option<Pattern>)> {
                let literal = normalize_pattern(raw);
                let glob = if raw.contains(['*', '?', '[']) {
                    Some(Pattern::new(&literal)?)
                } else {
                    None
                };
                Ok((literal, glob))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Longest pattern claiming `path`, if any
    ///
    /// `path` is absolute. The returned length ranks competing packages.
    pub fn best_match(&self, path: &str) -> Option<usize> {
        self.patterns
            .iter()
            .filter(|(literal, glob)| {
                Path::new(path).ancestors().any(|ancestor| {
                    let ancestor = ancestor.to_string_lossy();
                    match glob {
                        Some(pattern) => pattern.matches(&ancestor),
                        None => ancestor == literal.as_str(),
                    }
                })
            })
            .map(|(literal, _)| literal.len())
            .max()
    }

    pub fn matches(&self, path: &str) -> bool {
        self.best_match(path).is_some()
    }
}

fn normalize_pattern(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

impl PackageTarget {
    pub fn matcher(&self) -> Result<FileMatcher> {
        FileMatcher::new(&self.patterns)
    }

    /// Files from `files` claimed by this package alone
    pub fn emit_files(&self, files: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let matcher = self.matcher()?;
        Ok(files
            .iter()
            .filter(|f| matcher.matches(&absolute(f)))
            .cloned()
            .collect())
    }
}

/// Split install files between packages
///
/// Each file goes to the package with the longest matching pattern; ties
/// go to the package declared first. Every target appears in the result,
/// possibly with no files.
pub fn assign_files(targets: &[PackageTarget], files: &[PathBuf]) -> Result<BTreeMap<String, Vec<PathBuf>>> {
    let matchers = targets
        .iter()
        .map(|t| t.matcher())
        .collect::<Result<Vec<_>>>()?;

    let mut assigned: BTreeMap<String, Vec<PathBuf>> = targets
        .iter()
        .map(|t| (t.name.clone(), Vec::new()))
        .collect();

    for file in files {
        let path = absolute(file);
        let mut owner: Option<(usize, usize)> = None;

        for (idx, matcher) in matchers.iter().enumerate() {
            if let Some(score) = matcher.best_match(&path) {
                if owner.is_none_or(|(_, best)| score > best) {
                    owner = Some((idx, score));
                }
            }
        }

        match owner {
            Some((idx, _)) => {
                if let Some(list) = assigned.get_mut(&targets[idx].name) {
                    list.push(file.clone());
                }
            }
            None => warn!("{} is not claimed by any package", path),
        }
    }

    Ok(assigned)
}

fn absolute(path: &Path) -> String {
    let text = path.to_string_lossy();
    if text.starts_with('/') {
        text.into_owned()
    } else {
        format!("/{}", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    fn target(name: &str, patterns: &[&str]) -> PackageTarget {
        PackageTarget::new(name, patterns.iter().map(|p| p.to_string()).collect())
    }

    fn paths(list: &[&str]) -> Vec<PathBuf> {
        list.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_collect_install_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("usr/bin")).unwrap();
        fs::create_dir_all(root.join("var/lib/nano")).unwrap();
        fs::write(root.join("usr/bin/nano"), b"bin").unwrap();
        symlink("nano", root.join("usr/bin/rnano")).unwrap();

        let files = collect_install_files(root).unwrap();
        assert_eq!(files, paths(&["usr/bin/nano", "usr/bin/rnano", "var/lib/nano"]));
    }

    #[test]
    fn test_collect_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let err = collect_install_files(&temp_dir.path().join("missing")).unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_matcher_directory_prefix() {
        let matcher = target("nano", &["/usr/share/doc/"]).matcher().unwrap();
        assert!(matcher.matches("/usr/share/doc/nano/README"));
        assert!(matcher.matches("/usr/share/doc"));
        // Component-wise, unlike the classifier
        assert!(!matcher.matches("/usr/share/docs/README"));
    }

    #[test]
    fn test_matcher_glob() {
        let matcher = target("libfoo", &["/usr/lib64/lib*.so.*"]).matcher().unwrap();
        assert!(matcher.matches("/usr/lib64/libfoo.so.1"));
        assert!(!matcher.matches("/usr/lib64/libfoo.so"));
    }

    #[test]
    fn test_matcher_root_claims_all() {
        let matcher = target("nano", &["/"]).matcher().unwrap();
        assert!(matcher.matches("/etc/nanorc"));
    }

    #[test]
    fn test_invalid_glob() {
        assert!(matches!(
            target("bad", &["/usr/[lib"]).matcher(),
            Err(Error::Pattern(_))
        ));
    }

    #[test]
    fn test_emit_files() {
        let files = paths(&["usr/bin/nano", "usr/include/nano.h", "usr/share/man/man1/nano.1"]);
        let devel = target("nano-devel", &["/usr/include"]);
        assert_eq!(devel.emit_files(&files).unwrap(), paths(&["usr/include/nano.h"]));
    }

    #[test]
    fn test_assign_files_most_specific_wins() {
        let targets = vec![
            target("nano", &["/"]),
            target("nano-devel", &["/usr/include", "/usr/lib64/pkgconfig"]),
            target("nano-docs", &["/usr/share/doc"]),
        ];
        let files = paths(&[
            "usr/bin/nano",
            "usr/include/nano.h",
            "usr/lib64/pkgconfig/nano.pc",
            "usr/share/doc/nano/README",
        ]);

        let assigned = assign_files(&targets, &files).unwrap();
        assert_eq!(assigned["nano"], paths(&["usr/bin/nano"]));
        assert_eq!(
            assigned["nano-devel"],
            paths(&["usr/include/nano.h", "usr/lib64/pkgconfig/nano.pc"])
        );
        assert_eq!(assigned["nano-docs"], paths(&["usr/share/doc/nano/README"]));
    }

    #[test]
    fn test_assign_files_tie_goes_to_first() {
        let targets = vec![target("a", &["/usr/bin"]), target("b", &["/usr/bin"])];
        let assigned = assign_files(&targets, &paths(&["usr/bin/x"])).unwrap();
        assert_eq!(assigned["a"].len(), 1);
        assert!(assigned["b"].is_empty());
    }

    #[test]
    fn test_assign_files_unclaimed_dropped() {
        let targets = vec![target("a", &["/usr/bin"])];
        let assigned = assign_files(&targets, &paths(&["opt/x"])).unwrap();
        assert!(assigned["a"].is_empty());
    }
}
