// src/lib.rs

//! Package metadata generation
//!
//! Builds the `files.xml` and `metadata.xml` documents that accompany an
//! eopkg-style binary package.
//!
//! # Architecture
//!
//! - Classification: fixed ordered prefix table, first match wins
//! - Manifests: per-file size, hash, owner and mode, in byte-wise path order
//! - Descriptors: immutable package metadata built from an explicit context
//! - Writers: pluggable document serialization, XML by default

pub mod classify;
pub mod config;
pub mod descriptor;
pub mod emit;
mod error;
pub mod hash;
pub mod manifest;
pub mod package;
pub mod writer;

pub use classify::{FileClassifier, FileType};
pub use config::{BuildConfig, BuildContext};
pub use descriptor::{build_package_descriptor, PackageDescriptor};
pub use emit::{emit_all, emit_package, EmittedPackage};
pub use error::{Error, Result};
pub use hash::{Hash, HashAlgorithm, Hasher};
pub use manifest::{build_manifest, FileRecord, ManifestBuilder, PackageManifest};
pub use package::{PackageTarget, SourceSpec};
pub use writer::{write_package_documents, DocumentWriter, XmlDocumentWriter};
