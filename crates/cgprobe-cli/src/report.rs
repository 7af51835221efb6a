//! Rendering of detection verdicts

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;

use cgprobe_core::{CgroupTypeResult, CgroupVersion};
use colored::*;
use serde::Serialize;

/// Verdict status as reported to users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    V1,
    V2,
    Absent,
}

/// Serializable summary of one detection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub status: Status,
    pub controller_paths: BTreeMap<String, PathBuf>,
    pub unified_mount: Option<PathBuf>,
}

impl Report {
    pub fn from_result(result: Option<&CgroupTypeResult>) -> Self {
        match result {
            Some(r) => Self {
                status: match r.version() {
                    CgroupVersion::V1 => Status::V1,
                    CgroupVersion::V2 => Status::V2,
                },
                controller_paths: r
                    .controller_paths()
                    .into_iter()
                    .map(|(name, path)| (name.to_string(), path.to_path_buf()))
                    .collect(),
                unified_mount: r.unified_mount().map(|p| p.to_path_buf()),
            },
            None => Self {
                status: Status::Absent,
                controller_paths: BTreeMap::new(),
                unified_mount: None,
            },
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Human readable form
    pub fn to_text(&self) -> String {
        let mut out = String::new();

        match self.status {
            Status::V1 => {
                let _ = writeln!(out, "{}", "cgroup v1 (legacy/hybrid hierarchy)".green().bold());
                let width = self.controller_paths.keys().map(|k| k.len()).max().unwrap_or(0);
                for (name, path) in &self.controller_paths {
                    let _ = writeln!(out, "  {:<width$} -> {}", name.cyan(), path.display(), width = width);
                }
            }
            Status::V2 => {
                let _ = writeln!(out, "{}", "cgroup v2 (unified hierarchy)".green().bold());
                if let Some(mount) = &self.unified_mount {
                    let _ = writeln!(out, "  mount: {}", mount.display());
                }
            }
            Status::Absent => {
                let _ = writeln!(out, "{}", "No active cgroup controllers".yellow());
            }
        }

        out
    }
}
