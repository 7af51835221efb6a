//! Data types for cgroup topology detection

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Super option marking the systemd bookkeeping hierarchy
pub const SYSTEMD_NAME_OPTION: &str = "name=systemd";

/// One row of the controller hierarchy table (`/proc/cgroups`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerEntry {
    /// Controller name (e.g. "cpu", "memory")
    pub name: String,

    /// Legacy hierarchy id, 0 when not attached to any v1 hierarchy
    pub hierarchy_id: u32,

    /// Number of cgroups in the hierarchy
    pub num_cgroups: u64,

    pub enabled: bool,
}

impl ControllerEntry {
    pub fn new(name: impl Into<String>, hierarchy_id: u32, num_cgroups: u64, enabled: bool) -> Self {
        Self {
            name: name.into(),
            hierarchy_id,
            num_cgroups,
            enabled,
        }
    }

    /// Attached to an active legacy hierarchy?
    pub fn is_attached(&self) -> bool {
        self.hierarchy_id != 0
    }
}

/// Filesystem type of a cgroup mount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilesystemType {
    /// Legacy per-controller hierarchy ("cgroup")
    Cgroup,
    /// Unified hierarchy ("cgroup2")
    Cgroup2,
}

impl FilesystemType {
    /// Map a mountinfo fs type field, `None` for unrelated filesystems
    pub fn from_fs_type(fs_type: &str) -> Option<Self> {
        match fs_type {
            "cgroup" => Some(Self::Cgroup),
            "cgroup2" => Some(Self::Cgroup2),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cgroup => "cgroup",
            Self::Cgroup2 => "cgroup2",
        }
    }
}

impl fmt::Display for FilesystemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One cgroup row of the mount table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountEntry {
    pub mount_point: PathBuf,

    /// Root of the mount within the filesystem (4th mountinfo field)
    pub root: PathBuf,

    pub filesystem_type: FilesystemType,

    /// Comma separated super options, split into tokens
    pub super_options: Vec<String>,
}

impl MountEntry {
    pub fn new(
        mount_point: impl Into<PathBuf>,
        root: impl Into<PathBuf>,
        filesystem_type: FilesystemType,
        super_options: Vec<String>,
    ) -> Self {
        Self {
            mount_point: mount_point.into(),
            root: root.into(),
            filesystem_type,
            super_options,
        }
    }

    pub fn is_unified(&self) -> bool {
        self.filesystem_type == FilesystemType::Cgroup2
    }

    pub fn is_legacy(&self) -> bool {
        self.filesystem_type == FilesystemType::Cgroup
    }

    /// Legacy mount of the systemd process-grouping hierarchy
    pub fn is_systemd_bookkeeping(&self) -> bool {
        self.is_legacy() && self.super_options.iter().any(|o| o == SYSTEMD_NAME_OPTION)
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.super_options.iter().any(|o| o == option)
    }
}

/// Cgroup semantics the host is using
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CgroupVersion {
    /// Legacy or hybrid hierarchy, one mount per controller group
    V1,
    /// Unified hierarchy
    V2,
}

impl fmt::Display for CgroupVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CgroupVersion::V1 => f.write_str("v1"),
            CgroupVersion::V2 => f.write_str("v2"),
        }
    }
}

/// Where a legacy controller is mounted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerMount {
    pub mount_point: PathBuf,
    pub root: PathBuf,
}

/// Verdict of a successful detection
///
/// Built once per detection call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CgroupTypeResult {
    version: CgroupVersion,

    /// Controller name -> legacy mount (v1 only)
    mounts: BTreeMap<String, ControllerMount>,

    /// First unified mount point (v2 only)
    unified_mount: Option<PathBuf>,

    /// Hierarchy table rows the verdict was derived from
    controllers: BTreeMap<String, ControllerEntry>,
}

impl CgroupTypeResult {
    pub fn v1(
        mounts: BTreeMap<String, ControllerMount>,
        controllers: BTreeMap<String, ControllerEntry>,
    ) -> Self {
        Self {
            version: CgroupVersion::V1,
            mounts,
            unified_mount: None,
            controllers,
        }
    }

    pub fn v2(unified_mount: PathBuf, controllers: BTreeMap<String, ControllerEntry>) -> Self {
        Self {
            version: CgroupVersion::V2,
            mounts: BTreeMap::new(),
            unified_mount: Some(unified_mount),
            controllers,
        }
    }

    pub fn version(&self) -> CgroupVersion {
        self.version
    }

    pub fn is_version2(&self) -> bool {
        self.version == CgroupVersion::V2
    }

    /// Controller name -> mount point; empty for v2
    pub fn controller_paths(&self) -> BTreeMap<&str, &Path> {
        self.mounts
            .iter()
            .map(|(name, mount)| (name.as_str(), mount.mount_point.as_path()))
            .collect()
    }

    pub fn controller_path(&self, controller: &str) -> Option<&Path> {
        self.mounts.get(controller).map(|m| m.mount_point.as_path())
    }

    pub fn controller_mount(&self, controller: &str) -> Option<&ControllerMount> {
        self.mounts.get(controller)
    }

    pub fn controller_mounts(&self) -> &BTreeMap<String, ControllerMount> {
        &self.mounts
    }

    pub fn unified_mount(&self) -> Option<&Path> {
        self.unified_mount.as_deref()
    }

    pub fn controllers(&self) -> &BTreeMap<String, ControllerEntry> {
        &self.controllers
    }
}
