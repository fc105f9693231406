// src/descriptor.rs

//! Package-level metadata (metadata.xml)
//!
//! A [`PackageDescriptor`] is assembled once per binary package from the
//! build context, the package target and its finished manifest. It is a
//! plain value; serialization happens in [`crate::writer`].

use crate::classify::{classify_install_path, FileType};
use crate::config::BuildContext;
use crate::error::{Error, Result};
use crate::manifest::PackageManifest;
use crate::package::{PackageTarget, Packager};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Upstream source identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
    pub name: String,
    pub homepage: Option<String>,
    pub packager: Packager,
}

/// A history entry with the author resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub release: u32,
    pub version: String,
    pub date: NaiveDate,
    pub comment: String,
    pub name: String,
    pub email: String,
}

/// A file pattern owned by the package and its type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePattern {
    pub pattern: String,
    pub file_type: FileType,
}

/// Everything metadata.xml says about one binary package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDescriptor {
    pub name: String,
    pub source: SourceInfo,
    pub version: String,
    pub release: u32,
    pub licenses: BTreeSet<String>,
    pub summary: String,
    pub description: String,
    pub part_of: Option<String>,
    /// Newest first
    pub history: Vec<Update>,
    pub file_patterns: Vec<FilePattern>,
    pub installed_size: u64,
    pub build_host: String,
    pub distribution: String,
    pub distribution_release: String,
    pub architecture: String,
    pub package_format: String,
}

/// Assemble the descriptor for `package`
///
/// Reads only values already present in the context and manifest. Missing
/// packager, history, summary or description is an error rather than a
/// placeholder.
pub fn build_package_descriptor(
    context: &BuildContext,
    package: &PackageTarget,
    manifest: &PackageManifest,
) -> Result<PackageDescriptor> {
    let source = &context.source;
    source.validate()?;

    let packager = source
        .packager
        .clone()
        .ok_or_else(|| Error::MissingField("packager".to_string()))?;

    let history = source
        .history
        .iter()
        .map(|entry| -> Result<Update> {
            Ok(Update {
                release: entry.release,
                version: entry.version.clone(),
                date: entry.parsed_date()?,
                comment: entry.comment.clone(),
                name: entry.name.clone().unwrap_or_else(|| packager.name.clone()),
                email: entry.email.clone().unwrap_or_else(|| packager.email.clone()),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let summary = package.summary.clone().unwrap_or_else(|| source.summary.clone());
    if summary.trim().is_empty() {
        return Err(Error::MissingField(format!("{}.summary", package.name)));
    }
    let description = package
        .description
        .clone()
        .unwrap_or_else(|| source.description.clone());
    if description.trim().is_empty() {
        return Err(Error::MissingField(format!("{}.description", package.name)));
    }

    let file_patterns = package
        .patterns
        .iter()
        .map(|pattern| FilePattern {
            pattern: pattern.clone(),
            file_type: classify_install_path(pattern),
        })
        .collect();

    let general = &context.config.general;
    let build = &context.config.build;

    Ok(PackageDescriptor {
        name: package.name.clone(),
        source: SourceInfo {
            name: source.name.clone(),
            homepage: source.homepage.clone(),
            packager,
        },
        version: source.version.clone(),
        release: source.release,
        licenses: source
            .licenses
            .iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect(),
        summary,
        description,
        part_of: package.component.clone().or_else(|| source.component.clone()),
        history,
        file_patterns,
        installed_size: manifest.installed_size(),
        build_host: build.build_host.clone(),
        distribution: general.distribution.clone(),
        distribution_release: general.distribution_release.clone(),
        architecture: general.architecture.clone(),
        package_format: build.package_format.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildConfig;
    use crate::manifest::FileRecord;
    use crate::package::{HistoryEntry, SourceSpec};
    use std::path::Path;

    fn source() -> SourceSpec {
        SourceSpec {
            name: "nano".to_string(),
            version: "2.5.3".to_string(),
            release: 42,
            homepage: Some("https://www.nano-editor.org".to_string()),
            licenses: vec!["GPL-3.0-or-later".to_string(), "GPL-3.0-or-later".to_string()],
            summary: "Small, friendly text editor".to_string(),
            description: "GNU nano is an easy-to-use text editor.".to_string(),
            component: Some("system.editor".to_string()),
            packager: Some(Packager {
                name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
            }),
            history: vec![HistoryEntry {
                release: 42,
                version: "2.5.3".to_string(),
                date: "2016-03-02".to_string(),
                comment: "Update to 2.5.3".to_string(),
                name: None,
                email: None,
            }],
            packages: Vec::new(),
        }
    }

    fn manifest(sizes: &[u64]) -> PackageManifest {
        PackageManifest::new(
            sizes
                .iter()
                .enumerate()
                .map(|(i, size)| FileRecord {
                    path: format!("usr/share/nano/file{}", i),
                    file_type: FileType::Data,
                    size: *size,
                    hash: None,
                    uid: "0".to_string(),
                    gid: "0".to_string(),
                    mode: "0644".to_string(),
                    is_symlink: false,
                    link_target: None,
                })
                .collect(),
        )
    }

    fn context(source: SourceSpec) -> BuildContext {
        BuildContext::new(source, BuildConfig::default(), Path::new("/tmp/install"))
    }

    #[test]
    fn test_descriptor_fields() {
        let ctx = context(source());
        let target = PackageTarget::new(
            "nano",
            vec!["/usr/bin".to_string(), "/usr/lib/pkgconfig".to_string(), "/usr/share/man".to_string()],
        );

        let desc = build_package_descriptor(&ctx, &target, &manifest(&[10, 0, 250])).unwrap();

        assert_eq!(desc.name, "nano");
        assert_eq!(desc.source.name, "nano");
        assert_eq!(desc.source.packager.name, "Jane Doe");
        assert_eq!(desc.version, "2.5.3");
        assert_eq!(desc.release, 42);
        assert_eq!(desc.licenses.len(), 1);
        assert_eq!(desc.part_of.as_deref(), Some("system.editor"));
        assert_eq!(desc.installed_size, 260);
        assert_eq!(desc.build_host, "localhost");
        assert_eq!(desc.distribution, "Solus");
        assert_eq!(desc.architecture, "x86_64");
        assert_eq!(desc.package_format, "1.2");

        let types: Vec<_> = desc.file_patterns.iter().map(|p| p.file_type).collect();
        assert_eq!(types, [FileType::Executable, FileType::Data, FileType::Man]);
    }

    #[test]
    fn test_history_author_defaults_to_packager() {
        let ctx = context(source());
        let target = PackageTarget::new("nano", vec!["/".to_string()]);
        let desc = build_package_descriptor(&ctx, &target, &manifest(&[])).unwrap();

        assert_eq!(desc.history.len(), 1);
        assert_eq!(desc.history[0].name, "Jane Doe");
        assert_eq!(desc.history[0].email, "jane@example.com");
        assert_eq!(desc.history[0].date, NaiveDate::from_ymd_opt(2016, 3, 2).unwrap());
    }

    #[test]
    fn test_target_overrides() {
        let ctx = context(source());
        let mut target = PackageTarget::new("nano-devel", vec!["/usr/include".to_string()]);
        target.summary = Some("Development files for nano".to_string());
        target.component = Some("programming.devel".to_string());

        let desc = build_package_descriptor(&ctx, &target, &manifest(&[5])).unwrap();
        assert_eq!(desc.summary, "Development files for nano");
        assert_eq!(desc.description, "GNU nano is an easy-to-use text editor.");
        assert_eq!(desc.part_of.as_deref(), Some("programming.devel"));
        assert_eq!(desc.file_patterns[0].file_type, FileType::Header);
    }

    #[test]
    fn test_missing_packager() {
        let mut src = source();
        src.packager = None;
        let target = PackageTarget::new("nano", vec!["/".to_string()]);
        let err = build_package_descriptor(&context(src), &target, &manifest(&[])).unwrap_err();
        assert!(matches!(err, Error::MissingField(ref f) if f == "packager"));
    }

    #[test]
    fn test_empty_summary_override() {
        let mut target = PackageTarget::new("nano", vec!["/".to_string()]);
        target.summary = Some(String::new());
        let err = build_package_descriptor(&context(source()), &target, &manifest(&[])).unwrap_err();
        assert!(matches!(err, Error::MissingField(ref f) if f == "nano.summary"));
    }

    #[test]
    fn test_missing_history() {
        let mut src = source();
        src.history.clear();
        let target = PackageTarget::new("nano", vec!["/".to_string()]);
        let err = build_package_descriptor(&context(src), &target, &manifest(&[])).unwrap_err();
        assert!(matches!(err, Error::MissingField(ref f) if f == "history"));
    }

    #[test]
    fn test_stale_history_rejected() {
        let mut src = source();
        src.release = 43;
        let target = PackageTarget::new("nano", vec!["/".to_string()]);
        let err = build_package_descriptor(&context(src), &target, &manifest(&[])).unwrap_err();
        assert!(matches!(err, Error::Invalid(_)));
    }
}
