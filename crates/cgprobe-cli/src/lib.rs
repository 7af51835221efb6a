//! cgprobe CLI
//!
//! Runs one cgroup topology detection and reports the verdict.

pub mod logging;
pub mod report;

pub use report::Report;
