//! Error types for cgroup topology detection

use std::io;
use thiserror::Error;

/// Failures while reading the mount table or the hierarchy table.
///
/// Every variant means the topology could not be determined. A host without
/// any relevant controllers is not an error; detection reports it as `None`.
#[derive(Debug, Error)]
pub enum CgroupError {
    #[error("Cgroup source not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Failed to parse cgroup table: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl CgroupError {
    /// True when the source file does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            CgroupError::NotFound(_) => true,
            CgroupError::Io(e) => e.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, CgroupError>;
