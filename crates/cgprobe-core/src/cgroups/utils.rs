//! Utility functions for reading kernel tables

use std::ffi::OsString;
use std::fs;
use std::io;
use std::os::unix::ffi::OsStringExt;
use std::path::{Path, PathBuf};

use super::error::{CgroupError, Result};

/// Safe read file to string
///
/// Maps the two common failure kinds onto dedicated variants so callers can
/// tell a missing source from an unreadable one.
pub fn read_cgroup_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| map_read_error(path, e))
}

/// Read file as raw bytes
///
/// For tables that may carry non-UTF-8 paths, such as the mount table.
pub fn read_cgroup_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| map_read_error(path, e))
}

fn map_read_error(path: &Path, e: io::Error) -> CgroupError {
    match e.kind() {
        io::ErrorKind::NotFound => CgroupError::NotFound(format!("{:?}", path)),
        io::ErrorKind::PermissionDenied => CgroupError::PermissionDenied(format!("{:?}", path)),
        _ => CgroupError::Io(e),
    }
}

/// Decode the octal escapes the kernel writes into mountinfo path fields
///
/// Space, tab, newline and backslash appear as `\040`, `\011`, `\012` and
/// `\134`. Anything that is not a valid three-digit octal escape is kept
/// verbatim. Other bytes pass through untouched, so paths that are not
/// UTF-8 survive as-is.
pub fn unescape_mount_field(field: &[u8]) -> PathBuf {
    let mut out = Vec::with_capacity(field.len());
    let mut i = 0;

    while i < field.len() {
        if field[i] == b'\\' && i + 3 < field.len() && is_octal_escape(&field[i + 1..i + 4]) {
            let value = (field[i + 1] - b'0') * 64 + (field[i + 2] - b'0') * 8 + (field[i + 3] - b'0');
            out.push(value);
            i += 4;
        } else {
            out.push(field[i]);
            i += 1;
        }
    }

    PathBuf::from(OsString::from_vec(out))
}

fn is_octal_escape(digits: &[u8]) -> bool {
    digits.len() == 3
        && (b'0'..=b'3').contains(&digits[0])
        && digits[1..].iter().all(|d| (b'0'..=b'7').contains(d))
}
