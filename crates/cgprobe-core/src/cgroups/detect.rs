//! Cgroup topology detection
//!
//! Reconciles the hierarchy table with the mount table and decides whether
//! the host runs cgroup v1 (legacy or hybrid), cgroup v2, or has no usable
//! controllers at all.
//!
//! Precedence:
//! 1. Any controller with a non-zero hierarchy id selects v1, even when a
//!    unified mount exists. Controller paths come from the legacy mounts;
//!    the first mount of a controller in table order wins. No mapped
//!    controller at all means no relevant cgroup subsystem.
//! 2. All hierarchy ids zero selects v2 if a unified mount exists, and
//!    nothing otherwise.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, info};

use super::error::Result;
use super::hierarchy::{HierarchyTable, PROC_CGROUPS};
use super::mountinfo::{MountTable, PROC_SELF_MOUNTINFO};
use super::types::{CgroupTypeResult, ControllerMount};

/// Detect the cgroup topology from a mount table and a hierarchy table
///
/// Returns `Ok(None)` when the host has no relevant cgroup controllers in
/// effect. Missing or unreadable sources and malformed hierarchy rows are
/// errors. Both files are read on every call.
///
/// # Example
/// ```no_run
/// use cgprobe_core::cgroups::determine_type;
///
/// match determine_type("/proc/self/mountinfo", "/proc/cgroups").unwrap() {
///     Some(result) if result.is_version2() => println!("cgroup v2"),
///     Some(result) => println!("cgroup v1: {:?}", result.controller_paths()),
///     None => println!("no active cgroup controllers"),
/// }
/// ```
pub fn determine_type(
    mountinfo: impl AsRef<Path>,
    cgroups: impl AsRef<Path>,
) -> Result<Option<CgroupTypeResult>> {
    let mounts = MountTable::read(mountinfo.as_ref())?;
    let controllers = HierarchyTable::read(cgroups.as_ref())?;

    Ok(classify(&controllers, &mounts))
}

/// [`determine_type`] against the running host's procfs
pub fn determine_host_type() -> Result<Option<CgroupTypeResult>> {
    determine_type(PROC_SELF_MOUNTINFO, PROC_CGROUPS)
}

/// Classify already parsed tables
pub fn classify(controllers: &HierarchyTable, mounts: &MountTable) -> Option<CgroupTypeResult> {
    let result = if controllers.any_attached() {
        classify_legacy(controllers, mounts)
    } else {
        classify_unified(controllers, mounts)
    };

    match &result {
        Some(r) => info!(
            version = %r.version(),
            controllers = r.controller_mounts().len(),
            "Detected cgroup topology"
        ),
        None => info!("No active cgroup controllers detected"),
    }
    result
}

fn classify_legacy(controllers: &HierarchyTable, mounts: &MountTable) -> Option<CgroupTypeResult> {
    let mut paths: BTreeMap<String, ControllerMount> = BTreeMap::new();

    for mount in mounts.iter().filter(|m| m.is_legacy()) {
        if mount.is_systemd_bookkeeping() {
            debug!(mount_point = %mount.mount_point.display(), "Ignoring systemd bookkeeping mount");
            continue;
        }

        for option in mount.super_options.iter().filter(|o| controllers.contains(o)) {
            if let Some(existing) = paths.get(option) {
                debug!(
                    controller = %option,
                    kept = %existing.mount_point.display(),
                    ignored = %mount.mount_point.display(),
                    "Ignoring duplicate controller mount"
                );
                continue;
            }

            paths.insert(
                option.clone(),
                ControllerMount {
                    mount_point: mount.mount_point.clone(),
                    root: mount.root.clone(),
                },
            );
        }
    }

    if paths.is_empty() {
        debug!("Hierarchy ids are non-zero but no controller is mounted");
        return None;
    }

    Some(CgroupTypeResult::v1(paths, controllers.clone().into_inner()))
}

fn classify_unified(controllers: &HierarchyTable, mounts: &MountTable) -> Option<CgroupTypeResult> {
    let unified = mounts.iter().find(|m| m.is_unified())?;

    Some(CgroupTypeResult::v2(
        unified.mount_point.clone(),
        controllers.clone().into_inner(),
    ))
}
