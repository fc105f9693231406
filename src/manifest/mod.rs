// src/manifest/mod.rs

//! Installed-file manifests
//!
//! A manifest is the ordered list of files one package places on disk,
//! with size, content hash, ownership, mode and file type per entry. It is
//! what `files.xml` serializes.
//!
//! # Ordering
//!
//! Records are processed and stored in byte-wise order of their paths, so
//! two builds over an unchanged install tree produce identical manifests.
//! This holds with parallel hashing enabled as well.
//!
//! # Usage
//!
//! ```ignore
//! use pkgmeta::manifest::ManifestBuilder;
//!
//! let manifest = ManifestBuilder::new(Path::new("/build/install"))
//!     .with_parallel(true)
//!     .build(["usr/bin/nano", "usr/share/man/man1/nano.1"])?;
//! println!("{} bytes installed", manifest.installed_size());
//! ```

mod builder;
pub mod encoding;
mod record;

pub use builder::{build_manifest, ManifestBuilder};
pub use record::{FileRecord, PackageManifest, S_ISUID};
