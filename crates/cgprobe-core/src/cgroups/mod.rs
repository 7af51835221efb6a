//! Cgroup topology detection module
//!
//! Reads the controller hierarchy table and the mount table and decides
//! which cgroup version the host uses and where each v1 controller lives.
//!
//! # Outcomes
//! - `Ok(Some(result))` with `result.is_version2()` selecting v1 or v2 semantics
//! - `Ok(None)` when no relevant controller is active on the host
//! - `Err(_)` when either table cannot be read, or the hierarchy table is malformed

pub mod detect;
pub mod error;
pub mod hierarchy;
pub mod mountinfo;
pub mod types;
mod utils;

pub use detect::{classify, determine_host_type, determine_type};
pub use error::{CgroupError, Result};
pub use hierarchy::{HierarchyTable, PROC_CGROUPS};
pub use mountinfo::{MountTable, PROC_SELF_MOUNTINFO};
pub use types::{
    CgroupTypeResult, CgroupVersion, ControllerEntry, ControllerMount, FilesystemType, MountEntry,
    SYSTEMD_NAME_OPTION,
};
