// src/classify/classifier.rs

//! Path-to-file-type classification
//!
//! Classification walks a fixed, ordered prefix table and stops at the first
//! hit. Order is significant: the pkg-config directories must be listed
//! before `/usr/lib` or `.pc` files would be tagged as libraries.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Semantic file type recorded for each installed file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum FileType {
    /// Anything not matched by a more specific rule
    #[default]
    Data,
    Library,
    /// GNU info pages
    Info,
    Man,
    Doc,
    /// Translations under /usr/share/locale
    LocaleData,
    Header,
    Executable,
    Config,
}

impl FileType {
    /// Name used in files.xml and metadata.xml
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Library => "library",
            Self::Info => "info",
            Self::Man => "man",
            Self::Doc => "doc",
            Self::LocaleData => "localedata",
            Self::Header => "header",
            Self::Executable => "executable",
            Self::Config => "config",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|t| t.as_str() == s)
    }

    pub fn all() -> &'static [FileType] {
        &[
            Self::Data,
            Self::Library,
            Self::Info,
            Self::Man,
            Self::Doc,
            Self::LocaleData,
            Self::Header,
            Self::Executable,
            Self::Config,
        ]
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| crate::Error::Invalid(format!("unknown file type '{}'", s)))
    }
}

/// A single `(prefix, type)` entry of the classification table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationRule {
    pub prefix: &'static str,
    pub file_type: FileType,
}

impl ClassificationRule {
    const fn new(prefix: &'static str, file_type: FileType) -> Self {
        Self { prefix, file_type }
    }

    /// Plain string-prefix test; `/usr/lib` also matches `/usr/libexec`
    #[inline]
    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(self.prefix)
    }
}

/// Rule table, evaluated top to bottom
const RULES: &[ClassificationRule] = &[
    ClassificationRule::new("/usr/lib/pkgconfig", FileType::Data),
    ClassificationRule::new("/usr/lib64/pkgconfig", FileType::Data),
    ClassificationRule::new("/usr/lib32/pkgconfig", FileType::Data),
    ClassificationRule::new("/usr/lib", FileType::Library),
    ClassificationRule::new("/usr/share/info", FileType::Info),
    ClassificationRule::new("/usr/share/man", FileType::Man),
    ClassificationRule::new("/usr/share/doc", FileType::Doc),
    ClassificationRule::new("/usr/share/gtk-doc", FileType::Doc),
    ClassificationRule::new("/usr/share/locale", FileType::LocaleData),
    ClassificationRule::new("/usr/include", FileType::Header),
    ClassificationRule::new("/usr/bin", FileType::Executable),
    ClassificationRule::new("/bin", FileType::Executable),
    ClassificationRule::new("/usr/sbin", FileType::Executable),
    ClassificationRule::new("/sbin", FileType::Executable),
    ClassificationRule::new("/etc", FileType::Config),
];

/// Classifies absolute install paths into file types
pub struct FileClassifier;

impl FileClassifier {
    /// Classify an absolute path (leading `/`)
    ///
    /// Falls back to [`FileType::Data`] when no rule matches.
    pub fn classify(path: &str) -> FileType {
        RULES
            .iter()
            .find(|rule| rule.matches(path))
            .map(|rule| rule.file_type)
            .unwrap_or_default()
    }

    /// The ordered rule table
    pub fn rules() -> &'static [ClassificationRule] {
        RULES
    }

    /// Classify multiple paths and group them by type
    pub fn classify_all<S: AsRef<str>>(paths: &[S]) -> BTreeMap<FileType, Vec<String>> {
        let mut result: BTreeMap<FileType, Vec<String>> = BTreeMap::new();

        for path in paths {
            let path = path.as_ref();
            result
                .entry(Self::classify(path))
                .or_default()
                .push(path.to_string());
        }

        result
    }
}
