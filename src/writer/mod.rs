// src/writer/mod.rs

//! Serialization of manifests and descriptors to package documents
//!
//! [`DocumentWriter`] is the seam between metadata assembly and the on-disk
//! format. [`XmlDocumentWriter`] produces the eopkg `files.xml` and
//! `metadata.xml` documents.

mod xml;

pub use xml::XmlDocumentWriter;

use crate::descriptor::PackageDescriptor;
use crate::error::{Error, Result};
use crate::manifest::PackageManifest;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

pub const FILES_DOCUMENT: &str = "files.xml";
pub const METADATA_DOCUMENT: &str = "metadata.xml";

/// Renders package documents to bytes
pub trait DocumentWriter {
    /// Contents of files.xml
    fn files_document(&self, manifest: &PackageManifest) -> Result<Vec<u8>>;

    /// Contents of metadata.xml
    fn metadata_document(&self, descriptor: &PackageDescriptor) -> Result<Vec<u8>>;
}

/// Paths of the documents written for one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenDocuments {
    pub files: PathBuf,
    pub metadata: PathBuf,
}

/// Write files.xml and metadata.xml into `output_dir`
///
/// Each document is written to a temporary file in the same directory and
/// renamed into place, so readers never see a partial document.
pub fn write_package_documents(
    writer: &dyn DocumentWriter,
    output_dir: &Path,
    manifest: &PackageManifest,
    descriptor: &PackageDescriptor,
) -> Result<WrittenDocuments> {
    fs::create_dir_all(output_dir).map_err(|e| Error::from_io(output_dir, e))?;

    info!("Emitting {} for {}", FILES_DOCUMENT, descriptor.name);
    let files = output_dir.join(FILES_DOCUMENT);
    write_atomic(&files, &writer.files_document(manifest)?)?;

    info!("Emitting {} for {}", METADATA_DOCUMENT, descriptor.name);
    let metadata = output_dir.join(METADATA_DOCUMENT);
    write_atomic(&metadata, &writer.metadata_document(descriptor)?)?;

    Ok(WrittenDocuments { files, metadata })
}

/// Remove documents left in `output_dir` by an earlier run
///
/// Only files.xml and metadata.xml are deleted. The directory itself is
/// removed when nothing else remains in it. Returns whether anything was
/// removed.
pub fn remove_package_documents(output_dir: &Path) -> Result<bool> {
    let mut removed = false;

    for document in [FILES_DOCUMENT, METADATA_DOCUMENT] {
        let path = output_dir.join(document);
        match fs::remove_file(&path) {
            Ok(()) => {
                info!("Removed stale {}", path.display());
                removed = true;
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::from_io(&path, e)),
        }
    }

    if removed {
        let is_empty = fs::read_dir(output_dir)
            .map_err(|e| Error::from_io(output_dir, e))?
            .next()
            .is_none();
        if is_empty {
            fs::remove_dir(output_dir).map_err(|e| Error::from_io(output_dir, e))?;
        }
    }

    Ok(removed)
}

fn write_atomic(target: &Path, contents: &[u8]) -> Result<()> {
    let dir = target.parent().unwrap_or(Path::new("."));
    let mut temp = NamedTempFile::new_in(dir).map_err(|e| Error::from_io(dir, e))?;
    temp.write_all(contents).map_err(|e| Error::from_io(temp.path(), e))?;
    temp.persist(target).map_err(|e| Error::from_io(target, e.error))?;
    Ok(())
}
