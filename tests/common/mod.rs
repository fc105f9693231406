// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::{symlink, PermissionsExt};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

pub const SOURCE_SPEC: &str = r#"
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

[[package]]
name = "nano"
patterns = ["/"]

[[package]]
name = "nano-docs"
summary = "Documentation for nano"
component = "system.editor.docs"
patterns = ["/usr/share/doc", "/usr/share/man"]
"#;

pub fn write_file(root: &Path, rel: &str, content: &[u8], mode: u32) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
}

/// Install tree resembling a built nano package.
///
/// Returns (TempDir, relative paths) - keep the TempDir alive to prevent cleanup.
pub fn setup_install_tree() -> (TempDir, Vec<String>) {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();

    write_file(root, "usr/bin/nano", &[0x7f, b'E', b'L', b'F', 0, 1, 2, 3, 4, 5], 0o755);
    symlink("nano", root.join("usr/bin/rnano")).unwrap();
    write_file(root, "etc/nanorc", b"set autoindent\n", 0o644);
    write_file(root, "usr/share/man/man1/nano.1", b".TH NANO 1\n", 0o644);
    write_file(root, "usr/share/doc/nano/README", b"GNU nano\n", 0o644);
    write_file(root, "usr/share/locale/de/LC_MESSAGES/nano.mo", b"\xde\x12\x04\x95", 0o644);
    write_file(root, "usr/lib64/pkgconfig/nano.pc", b"Name: nano\n", 0o644);

    let paths = [
        "usr/bin/nano",
        "usr/bin/rnano",
        "etc/nanorc",
        "usr/share/man/man1/nano.1",
        "usr/share/doc/nano/README",
        "usr/share/locale/de/LC_MESSAGES/nano.mo",
        "usr/lib64/pkgconfig/nano.pc",
    ]
    .iter()
    .map(|p| p.to_string())
    .collect();

    (temp_dir, paths)
}

/// Tracing layer that records the message of every WARN event.
#[derive(Clone, Default)]
pub struct WarningCollector {
    messages: Arc<Mutex<Vec<String>>>,
}

impl WarningCollector {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl<S: Subscriber> Layer<S> for WarningCollector {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            let mut visitor = MessageVisitor(String::new());
            event.record(&mut visitor);
            self.messages.lock().unwrap().push(visitor.0);
        }
    }
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{:?}", value);
        }
    }
}
