//! cgprobe Core Library
//!
//! Detects the cgroup topology of a Linux host: cgroup v1 (legacy or
//! hybrid), cgroup v2, or no active controllers. The result tells a runtime
//! where each controller is mounted and which semantics to use when it later
//! reads resource limits.

pub mod cgroups;
pub mod config;
pub mod error;

pub use cgroups::{
    determine_host_type, determine_type, CgroupError, CgroupTypeResult, CgroupVersion,
};
pub use config::ProbeConfig;
pub use error::{Error, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
