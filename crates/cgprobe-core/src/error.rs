use thiserror::Error;

use crate::cgroups::CgroupError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Cgroup detection error: {0}")]
    Cgroup(#[from] CgroupError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cgroup_error_conversion() {
        let err: Error = CgroupError::ParseError("bad hierarchy id".to_string()).into();
        let msg = format!("{}", err);
        assert!(msg.contains("Cgroup detection error"));
        assert!(msg.contains("bad hierarchy id"));
    }

    #[test]
    fn test_config_error_display() {
        let err = Error::Config("mountinfo path is empty".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("Config error"));
        assert!(msg.contains("mountinfo path is empty"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        let msg = format!("{}", err);
        assert!(msg.contains("IO error"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn test_error_debug() {
        let err = Error::Config("test".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("Config"));
    }
}
