// src/main.rs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pkgmeta::config::{BuildConfig, BuildContext};
use pkgmeta::package::SourceSpec;
use pkgmeta::{emit_all, FileClassifier, XmlDocumentWriter};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "pkgmeta")]
#[command(author, version, about = "Generate files.xml and metadata.xml for binary packages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Emit package documents for every package in a source spec
    Emit {
        /// Source spec (package.toml)
        #[arg(short, long, default_value = "package.toml")]
        spec: PathBuf,
        /// Install root the build populated
        #[arg(short, long)]
        install_root: PathBuf,
        /// Build configuration (defaults apply when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output directory; one subdirectory per package
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
    /// Print the file type of each path
    Classify {
        /// Absolute install paths
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Emit {
            spec,
            install_root,
            config,
            output,
        }) => {
            let source = SourceSpec::from_file(&spec)
                .with_context(|| format!("Failed to load source spec {}", spec.display()))?;
            let config = match config {
                Some(path) => BuildConfig::from_file(&path)
                    .with_context(|| format!("Failed to load build config {}", path.display()))?,
                None => BuildConfig::default(),
            };

            info!("Emitting metadata for {}-{}-{}", source.name, source.version, source.release);

            let context = BuildContext::new(source, config, &install_root);
            let emitted = emit_all(&context, &XmlDocumentWriter::new(), &output)
                .context("Failed to emit package documents")?;

            for package in &emitted {
                println!(
                    "{}: {} files, {} bytes -> {}",
                    package.descriptor.name,
                    package.manifest.len(),
                    package.descriptor.installed_size,
                    package.documents.metadata.display()
                );
            }
            Ok(())
        }
        Some(Commands::Classify { paths }) => {
            for path in &paths {
                println!("{}\t{}", FileClassifier::classify(path), path);
            }
            Ok(())
        }
        None => {
            // No command provided, show help
            println!("pkgmeta v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'pkgmeta --help' for usage information");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_emit() {
        let cli = Cli::try_parse_from([
            "pkgmeta",
            "emit",
            "--install-root",
            "/build/install",
            "--output",
            "/build/out",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Emit {
                spec,
                install_root,
                config,
                output,
            }) => {
                assert_eq!(spec, PathBuf::from("package.toml"));
                assert_eq!(install_root, PathBuf::from("/build/install"));
                assert!(config.is_none());
                assert_eq!(output, PathBuf::from("/build/out"));
            }
            _ => panic!("expected emit command"),
        }
    }

    #[test]
    fn test_classify_requires_paths() {
        assert!(Cli::try_parse_from(["pkgmeta", "classify"]).is_err());
    }
}
