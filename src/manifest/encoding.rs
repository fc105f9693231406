// src/manifest/encoding.rs

//! Text encoding of paths and modes for manifest records
//!
//! Filesystem paths are bytes. Sorting and lookups operate on those bytes;
//! conversion to text happens once, when a record is created.

/// Convert raw path bytes to UTF-8 text
///
/// Valid UTF-8 is kept as is. Anything else is assumed to come from a legacy
/// single-byte encoding and is decoded as ISO-8859-1, which maps every byte
/// to exactly one code point and therefore never fails.
pub fn path_to_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

/// Drop leading `/` separators so the path can be joined onto a root
pub fn strip_root(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != b'/').unwrap_or(bytes.len());
    &bytes[start..]
}

/// Lexically normalize a path
///
/// Collapses repeated separators, `.` components and `name/..` pairs
/// without touching the filesystem. `..` is kept when it would climb above
/// a relative path's start and dropped at the root. An empty result becomes
/// `.`. Like POSIX, exactly two leading slashes are preserved.
pub fn normalize_path(path: &[u8]) -> Vec<u8> {
    if path.is_empty() {
        return b".".to_vec();
    }

    let leading = if path.starts_with(b"//") && !path.starts_with(b"///") {
        2
    } else if path.starts_with(b"/") {
        1
    } else {
        0
    };

    let mut parts: Vec<&[u8]> = Vec::new();
    for part in path.split(|&b| b == b'/') {
        match part {
            b"" | b"." => {}
            b".." => {
                if parts.last().is_some_and(|last| *last != b"..") {
                    parts.pop();
                } else if leading == 0 {
                    parts.push(part);
                }
            }
            _ => parts.push(part),
        }
    }

    let mut normalized = vec![b'/'; leading];
    normalized.extend_from_slice(&parts.join(&b'/'));

    if normalized.is_empty() {
        b".".to_vec()
    } else {
        normalized
    }
}

/// Render permission bits as a leading-zero octal string
///
/// Only the `S_IMODE` bits (permissions plus setuid/setgid/sticky) are kept:
/// `0o100755` becomes `"0755"`, `0o104755` becomes `"04755"`, zero is `"0"`.
pub fn format_mode(mode: u32) -> String {
    let bits = mode & 0o7777;
    if bits == 0 {
        "0".to_string()
    } else {
        format!("0{:o}", bits)
    }
}
