// src/package/mod.rs

//! Source specs and binary package targets
//!
//! A source spec (`package.toml`) names the software, its licenses, its
//! packager and its change history, and splits the install tree into one or
//! more binary packages by path pattern.
//!
//! ```toml
//! name = "nano"
//! version = "2.5.3"
//! release = 42
//! license = ["GPL-3.0-or-later"]
//! summary = "Small, friendly text editor"
//! description = "GNU nano is an easy-to-use text editor."
//!
//! [packager]
//! name = "Jane Doe"
//! email = "jane@example.com"
//!
//! [[history]]
//! release = 42
//! version = "2.5.3"
//! date = "2016-03-02"
//! comment = "Update to 2.5.3"
//!
//! [[package]]
//! name = "nano-docs"
//! patterns = ["/usr/share/doc"]
//! ```

mod files;
mod spec;

pub use files::{assign_files, collect_install_files, FileMatcher};
pub use spec::{HistoryEntry, PackageTarget, Packager, SourceSpec, HISTORY_DATE_FORMAT};
