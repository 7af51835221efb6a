//! Reader for the mount table (`/proc/self/mountinfo`)
//!
//! Only cgroup and cgroup2 mounts are kept. Everything else on the host
//! (tmpfs, proc, overlay, ...) is dropped while parsing.

use std::path::Path;

use tracing::debug;

use super::error::{CgroupError, Result};
use super::types::{FilesystemType, MountEntry};
use super::utils::{read_cgroup_bytes, unescape_mount_field};

/// Default location of the mount table
pub const PROC_SELF_MOUNTINFO: &str = "/proc/self/mountinfo";

/// Fields before the optional-fields group:
/// mount id, parent id, major:minor, root, mount point, mount options
const LEADING_FIELDS: usize = 6;

/// Cgroup mounts in host mount order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountTable {
    entries: Vec<MountEntry>,
}

impl MountTable {
    /// Read and parse a mountinfo file
    ///
    /// The file is read as bytes: unrelated mounts may carry paths that are
    /// not UTF-8.
    pub fn read(path: &Path) -> Result<Self> {
        let content = read_cgroup_bytes(path)?;
        let table = Self::parse(&content);

        debug!(
            path = %path.display(),
            cgroup_mounts = table.len(),
            unified = table.entries.iter().filter(|m| m.is_unified()).count(),
            "Read mount table"
        );
        Ok(table)
    }

    /// Parse mountinfo content
    ///
    /// Format:
    /// ```text
    /// 35 30 0:31 / /sys/fs/cgroup/memory rw,nosuid shared:7 - cgroup none rw,seclabel,memory
    /// ```
    ///
    /// Rows that cannot be split into the expected fields are skipped.
    pub fn parse(content: impl AsRef<[u8]>) -> Self {
        let entries = content
            .as_ref()
            .split(|b| *b == b'\n')
            .enumerate()
            .filter(|(_, line)| !line.iter().all(|b| b.is_ascii_whitespace()))
            .filter_map(|(idx, line)| match Self::parse_line(line) {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(line = idx + 1, error = %e, "Skipping malformed mountinfo row");
                    None
                }
            })
            .collect();

        Self { entries }
    }

    /// Parse single row, `Ok(None)` for non-cgroup filesystems
    ///
    /// Only the filesystem type is inspected before a row is known to be a
    /// cgroup mount; path fields are decoded without assuming UTF-8.
    fn parse_line(line: &[u8]) -> Result<Option<MountEntry>> {
        let fields: Vec<&[u8]> = line
            .split(|b| b.is_ascii_whitespace())
            .filter(|f| !f.is_empty())
            .collect();
        if fields.len() < LEADING_FIELDS + 4 {
            return Err(CgroupError::ParseError(format!(
                "expected at least {} mountinfo fields, got {}",
                LEADING_FIELDS + 4,
                fields.len()
            )));
        }

        let separator = fields[LEADING_FIELDS..]
            .iter()
            .position(|f| *f == b"-")
            .map(|pos| pos + LEADING_FIELDS)
            .ok_or_else(|| CgroupError::ParseError("missing '-' separator in mountinfo row".to_string()))?;

        let tail = &fields[separator + 1..];
        if tail.len() < 3 {
            return Err(CgroupError::ParseError(format!(
                "expected 3 mountinfo fields after separator, got {}",
                tail.len()
            )));
        }

        let filesystem_type = match std::str::from_utf8(tail[0])
            .ok()
            .and_then(FilesystemType::from_fs_type)
        {
            Some(fs) => fs,
            None => return Ok(None),
        };

        let super_options = std::str::from_utf8(tail[2])
            .map_err(|e| CgroupError::ParseError(format!("super options are not UTF-8: {}", e)))?
            .split(',')
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Some(MountEntry::new(
            unescape_mount_field(fields[4]),
            unescape_mount_field(fields[3]),
            filesystem_type,
            super_options,
        )))
    }

    pub fn entries(&self) -> &[MountEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MountEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_unified_mount(&self) -> bool {
        self.entries.iter().any(|m| m.is_unified())
    }
}

impl From<Vec<MountEntry>> for MountTable {
    fn from(entries: Vec<MountEntry>) -> Self {
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const HYBRID_SNIPPET: &str = "\
30 23 0:26 / /sys/fs/cgroup ro,nosuid,nodev,noexec shared:4 - tmpfs tmpfs ro,seclabel,mode=755
31 30 0:27 / /sys/fs/cgroup/unified rw,nosuid,nodev,noexec,relatime shared:5 - cgroup2 none rw,seclabel,nsdelegate
32 30 0:28 / /sys/fs/cgroup/systemd rw,nosuid,nodev,noexec,relatime shared:6 - cgroup none rw,seclabel,xattr,name=systemd
40 30 0:36 / /sys/fs/cgroup/cpu,cpuacct rw,nosuid,nodev,noexec,relatime shared:12 - cgroup none rw,seclabel,cpu,cpuacct
";

    #[test]
    fn test_parse_keeps_only_cgroup_mounts() {
        let table = MountTable::parse(HYBRID_SNIPPET);
        assert_eq!(table.len(), 3);
        assert!(table.has_unified_mount());

        let unified = &table.entries()[0];
        assert_eq!(unified.filesystem_type, FilesystemType::Cgroup2);
        assert_eq!(unified.mount_point, PathBuf::from("/sys/fs/cgroup/unified"));
        assert_eq!(unified.root, PathBuf::from("/"));
    }

    #[test]
    fn test_parse_preserves_mount_order() {
        let table = MountTable::parse(HYBRID_SNIPPET);
        let points: Vec<_> = table.iter().map(|m| m.mount_point.clone()).collect();
        assert_eq!(
            points,
            vec![
                PathBuf::from("/sys/fs/cgroup/unified"),
                PathBuf::from("/sys/fs/cgroup/systemd"),
                PathBuf::from("/sys/fs/cgroup/cpu,cpuacct"),
            ]
        );
    }

    #[test]
    fn test_super_options_include_flags() {
        let table = MountTable::parse(HYBRID_SNIPPET);
        let cpu = &table.entries()[2];
        assert_eq!(cpu.super_options, vec!["rw", "seclabel", "cpu", "cpuacct"]);
        assert!(table.entries()[1].is_systemd_bookkeeping());
    }

    #[test]
    fn test_no_optional_fields() {
        let line = "35 26 0:26 / /sys/fs/cgroup/systemd rw,nosuid,nodev,noexec,relatime - cgroup systemd rw,name=systemd\n\
                    26 18 0:19 / /sys/fs/cgroup rw,relatime - tmpfs none rw,size=4k,mode=755\n";
        let table = MountTable::parse(line);
        assert_eq!(table.len(), 1);
        assert!(table.entries()[0].is_systemd_bookkeeping());
    }

    #[test]
    fn test_multiple_optional_fields() {
        let line = "121 32 0:37 /docker/abc /cpuset rw,relatime shared:69 master:3 - cgroup none rw,cpuset\n";
        let table = MountTable::parse(line);
        assert_eq!(table.len(), 1);
        assert_eq!(table.entries()[0].root, PathBuf::from("/docker/abc"));
        assert!(table.entries()[0].has_option("cpuset"));
    }

    #[test]
    fn test_empty_content() {
        let table = MountTable::parse("");
        assert!(table.is_empty());
        assert!(!table.has_unified_mount());
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let content = "garbage\n\
                       1 2 3 4 5 6 7 8 9 10\n\
                       28 21 0:25 / /sys/fs/cgroup rw,nosuid,nodev,noexec,relatime shared:4 - cgroup2 none rw,seclabel,nsdelegate\n";
        let table = MountTable::parse(content);
        assert_eq!(table.len(), 1);
        assert!(table.entries()[0].is_unified());
    }

    #[test]
    fn test_escaped_mount_point() {
        let line = "50 30 0:40 / /mnt/cg\\040root rw,relatime - cgroup none rw,memory\n";
        let table = MountTable::parse(line);
        assert_eq!(table.entries()[0].mount_point, PathBuf::from("/mnt/cg root"));
    }

    #[test]
    fn test_malformed_row_reports_parse_error() {
        let err = MountTable::parse_line(b"1 2 3 4 5 6 7 8 9 10").unwrap_err();
        assert!(matches!(err, CgroupError::ParseError(ref msg) if msg.contains("separator")));

        let err = MountTable::parse_line(b"garbage").unwrap_err();
        assert!(matches!(err, CgroupError::ParseError(_)));
    }

    #[test]
    fn test_non_utf8_unrelated_mount_is_ignored() {
        let content: &[u8] = b"90 21 8:17 / /media/caf\xe9 rw,relatime shared:40 - vfat /dev/sdb1 rw\n\
28 21 0:25 / /sys/fs/cgroup rw,nosuid,nodev,noexec,relatime shared:4 - cgroup2 cgroup2 rw,nsdelegate\n";
        let table = MountTable::parse(content);
        assert_eq!(table.len(), 1);
        assert_eq!(table.entries()[0].mount_point, PathBuf::from("/sys/fs/cgroup"));
    }

    #[test]
    fn test_non_utf8_cgroup_mount_point_kept() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let content: &[u8] = b"50 30 0:40 / /mnt/caf\xe9 rw,relatime - cgroup none rw,memory\n";
        let table = MountTable::parse(content);
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.entries()[0].mount_point.as_os_str(),
            OsStr::from_bytes(b"/mnt/caf\xe9")
        );
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = MountTable::read(&dir.path().join("mountinfo")).unwrap_err();
        assert!(err.is_not_found());
    }
}
