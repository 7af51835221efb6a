use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cgroups::{self, CgroupTypeResult, PROC_CGROUPS, PROC_SELF_MOUNTINFO};
use crate::error::{Error, Result};

/// Main configuration for cgprobe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Kernel tables to read
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LogConfig,

    /// Report settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Locations of the two kernel tables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Mount table (default: /proc/self/mountinfo)
    pub mountinfo: PathBuf,

    /// Controller hierarchy table (default: /proc/cgroups)
    pub cgroups: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive used when RUST_LOG is unset (default: warn)
    pub level: String,

    /// Directory for rolling log files, stderr only when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    /// Log file name prefix (default: cgprobe.log)
    pub log_file: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            mountinfo: PathBuf::from(PROC_SELF_MOUNTINFO),
            cgroups: PathBuf::from(PROC_CGROUPS),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            log_dir: None,
            log_file: "cgprobe.log".to_string(),
        }
    }
}

impl ProbeConfig {
    /// Load configuration from TOML file
    ///
    /// # Example
    /// ```no_run
    /// use cgprobe_core::ProbeConfig;
    ///
    /// let config = ProbeConfig::load_from_file("/etc/cgprobe/config.toml").unwrap();
    /// println!("mountinfo: {:?}", config.sources.mountinfo);
    /// ```
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config {:?}: {}", path, e)))
    }

    /// Save configuration to TOML file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.sources.mountinfo.as_os_str().is_empty() {
            return Err(Error::Config("mountinfo path must not be empty".to_string()));
        }

        if self.sources.cgroups.as_os_str().is_empty() {
            return Err(Error::Config("cgroups path must not be empty".to_string()));
        }

        if self.logging.level.trim().is_empty() {
            return Err(Error::Config("log level must not be empty".to_string()));
        }

        if self.logging.log_file.trim().is_empty() {
            return Err(Error::Config("log file name must not be empty".to_string()));
        }

        Ok(())
    }

    /// Run detection against the configured sources
    pub fn detect(&self) -> Result<Option<CgroupTypeResult>> {
        Ok(cgroups::determine_type(
            &self.sources.mountinfo,
            &self.sources.cgroups,
        )?)
    }
}
