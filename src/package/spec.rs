// src/package/spec.rs

//! Source package specification (package.toml)
//!
//! Describes what is being packaged: identity, licensing, packager, change
//! history, and the binary packages split out of the install tree.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Format of history dates
pub const HISTORY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Root structure of package.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSpec {
    pub name: String,
    pub version: String,
    pub release: u32,

    #[serde(default)]
    pub homepage: Option<String>,

    #[serde(default, rename = "license")]
    pub licenses: Vec<String>,

    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    pub description: String,

    /// Component the packages belong to (`partOf`)
    #[serde(default)]
    pub component: Option<String>,

    #[serde(default)]
    pub packager: Option<Packager>,

    /// Newest entry first
    #[serde(default)]
    pub history: Vec<HistoryEntry>,

    #[serde(default, rename = "package")]
    pub packages: Vec<PackageTarget>,
}

/// Person responsible for the package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packager {
    pub name: String,
    pub email: String,
}

/// One changelog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub release: u32,
    pub version: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub comment: String,

    /// Defaults to the packager
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,
}

impl HistoryEntry {
    pub fn parsed_date(&self) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, HISTORY_DATE_FORMAT).map_err(|e| {
            Error::Invalid(format!(
                "history date '{}' for release {}: {}",
                self.date, self.release, e
            ))
        })
    }
}

/// A binary package produced from the source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageTarget {
    pub name: String,

    /// Overrides the source summary
    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub component: Option<String>,

    /// Paths or glob patterns claimed by this package, in declaration order
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl PackageTarget {
    pub fn new(name: impl Into<String>, patterns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            summary: None,
            description: None,
            component: None,
            patterns,
        }
    }
}

impl SourceSpec {
    /// Load and validate a spec from disk
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse and validate a spec from TOML
    pub fn parse(content: &str) -> Result<Self> {
        let spec: SourceSpec = toml::from_str(content)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Check that every field the metadata documents need is present
    pub fn validate(&self) -> Result<()> {
        require("name", &self.name)?;
        require("version", &self.version)?;
        if self.release == 0 {
            return Err(Error::Invalid("release must be at least 1".to_string()));
        }
        if self.licenses.iter().all(|l| l.trim().is_empty()) {
            return Err(Error::MissingField("license".to_string()));
        }
        require("summary", &self.summary)?;
        require("description", &self.description)?;

        let packager = self
            .packager
            .as_ref()
            .ok_or_else(|| Error::MissingField("packager".to_string()))?;
        require("packager.name", &packager.name)?;
        require("packager.email", &packager.email)?;

        let newest = self
            .history
            .first()
            .ok_or_else(|| Error::MissingField("history".to_string()))?;
        // Consumers read the package release from the newest update
        if newest.release != self.release || newest.version != self.version {
            return Err(Error::Invalid(format!(
                "newest history entry is {}-{}, expected {}-{}",
                newest.version, newest.release, self.version, self.release
            )));
        }
        for entry in &self.history {
            entry.parsed_date()?;
            require("history.comment", &entry.comment)?;
        }

        for package in &self.packages {
            require("package.name", &package.name)?;
        }

        Ok(())
    }

    /// Binary packages to emit
    ///
    /// Without explicit `[[package]]` tables a single package named after
    /// the source claims the whole install tree.
    pub fn targets(&self) -> Vec<PackageTarget> {
        if self.packages.is_empty() {
            vec![PackageTarget::new(self.name.clone(), vec!["/".to_string()])]
        } else {
            self.packages.clone()
        }
    }

    pub fn target(&self, name: &str) -> Option<PackageTarget> {
        self.targets().into_iter().find(|t| t.name == name)
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::MissingField(field.to_string()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: &str = r#"
name = "nano"
version = "2.5.3"
release = 42
homepage = "https://www.nano-editor.org"
license = ["GPL-3.0-or-later"]
summary = "Small, friendly text editor"
description = "GNU nano is an easy-to-use text editor."
component = "system.editor"

[packager]
name = "Jane Doe"
email = "jane@example.com"

[[history]]
release = 42
version = "2.5.3"
date = "2016-03-02"
comment = "Update to 2.5.3"
"#;

    #[test]
    fn test_parse_minimal() {
        let spec = SourceSpec::parse(SPEC).unwrap();
        assert_eq!(spec.name, "nano");
        assert_eq!(spec.release, 42);
        assert_eq!(spec.licenses, vec!["GPL-3.0-or-later"]);
        assert_eq!(spec.packager.as_ref().unwrap().email, "jane@example.com");
        assert_eq!(
            spec.history[0].parsed_date().unwrap(),
            NaiveDate::from_ymd_opt(2016, 3, 2).unwrap()
        );
    }

    #[test]
    fn test_default_target_claims_everything() {
        let spec = SourceSpec::parse(SPEC).unwrap();
        let targets = spec.targets();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].name, "nano");
        assert_eq!(targets[0].patterns, vec!["/"]);
        assert!(spec.target("nano").is_some());
        assert!(spec.target("nano-devel").is_none());
    }

    #[test]
    fn test_declared_targets() {
        let content = format!(
            "{}\n[[package]]\nname = \"nano\"\npatterns = [\"/usr/bin\"]\n\n[[package]]\nname = \"nano-docs\"\nsummary = \"Documentation for nano\"\npatterns = [\"/usr/share/doc\"]\n",
            SPEC
        );
        let spec = SourceSpec::parse(&content).unwrap();
        let docs = spec.target("nano-docs").unwrap();
        assert_eq!(docs.summary.as_deref(), Some("Documentation for nano"));
        assert_eq!(docs.patterns, vec!["/usr/share/doc"]);
    }

    #[test]
    fn test_missing_packager_rejected() {
        let content = SPEC.replace("[packager]\nname = \"Jane Doe\"\nemail = \"jane@example.com\"\n", "");
        let err = SourceSpec::parse(&content).unwrap_err();
        assert!(matches!(err, Error::MissingField(ref f) if f == "packager"));
    }

    #[test]
    fn test_empty_summary_rejected() {
        let content = SPEC.replace("Small, friendly text editor", " ");
        let err = SourceSpec::parse(&content).unwrap_err();
        assert!(matches!(err, Error::MissingField(ref f) if f == "summary"));
    }

    #[test]
    fn test_bad_history_date_rejected() {
        let content = SPEC.replace("2016-03-02", "MAKE ME A DATE");
        let err = SourceSpec::parse(&content).unwrap_err();
        assert!(matches!(err, Error::Invalid(_)));
    }

    #[test]
    fn test_history_head_mismatch_rejected() {
        let content = SPEC.replace("[[history]]\nrelease = 42", "[[history]]\nrelease = 41");
        let err = SourceSpec::parse(&content).unwrap_err();
        assert!(matches!(err, Error::Invalid(ref msg) if msg.contains("2.5.3-41")));

        let content = SPEC.replace("version = \"2.5.3\"\ndate", "version = \"2.5.2\"\ndate");
        assert!(matches!(SourceSpec::parse(&content), Err(Error::Invalid(_))));
    }

    #[test]
    fn test_older_history_entries_allowed() {
        let content = format!(
            "{}\n[[history]]\nrelease = 41\nversion = \"2.5.2\"\ndate = \"2016-02-18\"\ncomment = \"Update to 2.5.2\"\n",
            SPEC
        );
        let spec = SourceSpec::parse(&content).unwrap();
        assert_eq!(spec.history.len(), 2);
        assert_eq!(spec.history[1].release, 41);
    }

    #[test]
    fn test_zero_release_rejected() {
        let content = SPEC.replace("release = 42\nhomepage", "release = 0\nhomepage");
        assert!(matches!(SourceSpec::parse(&content), Err(Error::Invalid(_))));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            SourceSpec::parse("name = "),
            Err(Error::ConfigParse(_))
        ));
    }
}
