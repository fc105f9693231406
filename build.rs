// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn build_cli() -> Command {
    Command::new("pkgmeta")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generate files.xml and metadata.xml for binary packages")
        .subcommand(
            Command::new("emit")
                .about("Emit package documents for every package in a source spec")
                .arg(
                    Arg::new("spec")
                        .short('s')
                        .long("spec")
                        .default_value("package.toml")
                        .help("Source spec (package.toml)"),
                )
                .arg(
                    Arg::new("install_root")
                        .short('i')
                        .long("install-root")
                        .required(true)
                        .help("Install root the build populated"),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help("Build configuration (defaults apply when omitted)"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .default_value(".")
                        .help("Output directory; one subdirectory per package"),
                ),
        )
        .subcommand(
            Command::new("classify")
                .about("Print the file type of each path")
                .arg(Arg::new("paths").required(true).num_args(1..).help("Absolute install paths")),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    if let Err(e) = fs::write(man_dir.join("pkgmeta.1"), buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
