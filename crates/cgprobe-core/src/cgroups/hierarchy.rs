//! Reader for the controller hierarchy table (`/proc/cgroups`)

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use super::error::{CgroupError, Result};
use super::types::ControllerEntry;
use super::utils::read_cgroup_file;

/// Default location of the hierarchy table
pub const PROC_CGROUPS: &str = "/proc/cgroups";

/// Parsed hierarchy table, keyed by controller name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyTable {
    controllers: BTreeMap<String, ControllerEntry>,
}

impl HierarchyTable {
    /// Read and parse a hierarchy table file
    ///
    /// Format:
    /// ```text
    /// #subsys_name    hierarchy       num_cgroups     enabled
    /// cpuset  3       1       1
    /// cpu     4       153     1
    /// memory  0       1       1
    /// ```
    pub fn read(path: &Path) -> Result<Self> {
        let content = read_cgroup_file(path)?;
        let table = Self::parse(&content)
            .map_err(|e| CgroupError::ParseError(format!("{:?}: {}", path, parse_reason(e))))?;

        debug!(
            path = %path.display(),
            controllers = table.len(),
            attached = table.controllers.values().filter(|c| c.is_attached()).count(),
            "Read cgroup hierarchy table"
        );
        Ok(table)
    }

    /// Parse table content
    ///
    /// Any malformed row fails the whole table.
    pub fn parse(content: &str) -> Result<Self> {
        let mut controllers = BTreeMap::new();

        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let entry = Self::parse_line(line)
                .map_err(|e| CgroupError::ParseError(format!("line {}: {}", idx + 1, parse_reason(e))))?;

            if controllers.contains_key(&entry.name) {
                return Err(CgroupError::ParseError(format!(
                    "line {}: duplicate controller '{}'",
                    idx + 1,
                    entry.name
                )));
            }
            controllers.insert(entry.name.clone(), entry);
        }

        Ok(Self { controllers })
    }

    /// Parse single row: "name hierarchy num_cgroups enabled"
    fn parse_line(line: &str) -> Result<ControllerEntry> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() != 4 {
            return Err(CgroupError::ParseError(format!(
                "expected 4 fields, got {}: {}",
                parts.len(),
                line
            )));
        }

        let hierarchy_id = parts[1].parse::<u32>().map_err(|e| {
            CgroupError::ParseError(format!("invalid hierarchy id '{}': {}", parts[1], e))
        })?;
        let num_cgroups = parts[2].parse::<u64>().map_err(|e| {
            CgroupError::ParseError(format!("invalid num_cgroups '{}': {}", parts[2], e))
        })?;
        let enabled = match parts[3] {
            "1" => true,
            "0" => false,
            other => {
                return Err(CgroupError::ParseError(format!(
                    "invalid enabled flag '{}'",
                    other
                )))
            }
        };

        Ok(ControllerEntry::new(parts[0], hierarchy_id, num_cgroups, enabled))
    }

    pub fn get(&self, name: &str) -> Option<&ControllerEntry> {
        self.controllers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.controllers.contains_key(name)
    }

    /// Any controller attached to a legacy hierarchy?
    pub fn any_attached(&self) -> bool {
        self.controllers.values().any(|c| c.is_attached())
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ControllerEntry> {
        self.controllers.values()
    }

    pub fn into_inner(self) -> BTreeMap<String, ControllerEntry> {
        self.controllers
    }
}

impl FromIterator<ControllerEntry> for HierarchyTable {
    fn from_iter<I: IntoIterator<Item = ControllerEntry>>(iter: I) -> Self {
        Self {
            controllers: iter.into_iter().map(|c| (c.name.clone(), c)).collect(),
        }
    }
}

fn parse_reason(err: CgroupError) -> String {
    match err {
        CgroupError::ParseError(reason) => reason,
        other => other.to_string(),
    }
}
