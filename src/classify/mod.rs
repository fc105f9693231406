// src/classify/mod.rs

//! File type classification for package contents
//!
//! Every file in a binary package carries a type tag in `files.xml`, and
//! every file pattern in `metadata.xml` carries one too. Tags come from a
//! fixed prefix table shared with the eopkg tooling:
//!
//! | Prefix | Type |
//! |--------|------|
//! | `/usr/lib{,64,32}/pkgconfig` | `data` |
//! | `/usr/lib` | `library` |
//! | `/usr/share/info` | `info` |
//! | `/usr/share/man` | `man` |
//! | `/usr/share/doc`, `/usr/share/gtk-doc` | `doc` |
//! | `/usr/share/locale` | `localedata` |
//! | `/usr/include` | `header` |
//! | `/usr/bin`, `/bin`, `/usr/sbin`, `/sbin` | `executable` |
//! | `/etc` | `config` |
//!
//! Anything else is `data`.
//!
//! # Usage
//!
//! ```
//! use pkgmeta::classify::{FileClassifier, FileType};
//!
//! assert_eq!(FileClassifier::classify("/usr/lib/pkgconfig/foo.pc"), FileType::Data);
//! assert_eq!(FileClassifier::classify("/usr/bin/foo"), FileType::Executable);
//! ```

mod classifier;

pub use classifier::{ClassificationRule, FileClassifier, FileType};

/// Classify a path that may lack its leading `/`
///
/// Install-root-relative paths (`usr/bin/foo`) are classified as if they
/// were absolute.
pub fn classify_install_path(path: &str) -> FileType {
    if path.starts_with('/') {
        FileClassifier::classify(path)
    } else {
        FileClassifier::classify(&format!("/{}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_install_path_relative() {
        assert_eq!(classify_install_path("usr/bin/foo"), FileType::Executable);
        assert_eq!(classify_install_path("/usr/bin/foo"), FileType::Executable);
        assert_eq!(classify_install_path("etc"), FileType::Config);
        assert_eq!(classify_install_path("opt/x"), FileType::Data);
    }
}
