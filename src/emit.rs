// src/emit.rs

//! End-to-end document emission for a build
//!
//! Ties the pieces together: enumerate the install tree, split it between
//! binary packages, build each manifest and descriptor, and write the
//! documents. Processing stops at the first failure.

use crate::config::BuildContext;
use crate::descriptor::{build_package_descriptor, PackageDescriptor};
use crate::error::Result;
use crate::manifest::{ManifestBuilder, PackageManifest};
use crate::package::{assign_files, collect_install_files, PackageTarget};
use crate::writer::{remove_package_documents, write_package_documents, DocumentWriter, WrittenDocuments};
use std::path::{Path, PathBuf};
use tracing::info;

/// Result of emitting one binary package
#[derive(Debug, Clone)]
pub struct EmittedPackage {
    pub manifest: PackageManifest,
    pub descriptor: PackageDescriptor,
    pub documents: WrittenDocuments,
}

/// Manifest builder configured from the context
pub fn manifest_builder(context: &BuildContext) -> Result<ManifestBuilder> {
    Ok(ManifestBuilder::new(context.install_root())
        .with_hash_algorithm(context.config.hash_algorithm()?)
        .with_parallel(context.config.build.parallel))
}

/// Emit documents for one package whose files are already known
pub fn emit_package(
    context: &BuildContext,
    package: &PackageTarget,
    files: &[PathBuf],
    writer: &dyn DocumentWriter,
    output_dir: &Path,
) -> Result<EmittedPackage> {
    let manifest = manifest_builder(context)?.build(files)?;
    let descriptor = build_package_descriptor(context, package, &manifest)?;
    let documents = write_package_documents(writer, output_dir, &manifest, &descriptor)?;

    info!(
        "{}: {} files, {} bytes installed",
        descriptor.name,
        manifest.len(),
        descriptor.installed_size
    );

    Ok(EmittedPackage {
        manifest,
        descriptor,
        documents,
    })
}

/// Emit documents for every package in the source spec
///
/// Each package's documents land in `output_root/<package name>/`. A package
/// that ends up with no files is skipped, and documents a previous run left
/// in its directory are removed.
pub fn emit_all(
    context: &BuildContext,
    writer: &dyn DocumentWriter,
    output_root: &Path,
) -> Result<Vec<EmittedPackage>> {
    let files = collect_install_files(context.install_root())?;
    let targets = context.source.targets();
    let mut assigned = assign_files(&targets, &files)?;

    let mut emitted = Vec::with_capacity(targets.len());
    for target in &targets {
        let owned = assigned.remove(&target.name).unwrap_or_default();
        let output_dir = output_root.join(&target.name);
        if owned.is_empty() {
            info!("Skipping {}: no files", target.name);
            remove_package_documents(&output_dir)?;
            continue;
        }
        emitted.push(emit_package(context, target, &owned, writer, &output_dir)?);
    }

    Ok(emitted)
}
