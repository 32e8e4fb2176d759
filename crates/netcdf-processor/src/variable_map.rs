//! Rename table from archive variable names to GRIB-style codes.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{NetCdfError, NetCdfResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableRename {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Deserialize)]
struct VariableMapFile {
    variables: Vec<VariableRename>,
}

/// Ordered, immutable rename table.
///
/// Order matters: selected variables are written in table order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableMap {
    entries: Vec<VariableRename>,
}

impl VariableMap {
    /// The GRIB2-compatible table used for WW3 products.
    pub fn grib() -> Self {
        Self {
            entries: [
                ("ucur", "UGRD"), // ocean current, zonal
                ("vcur", "VGRD"), // ocean current, meridional
                ("hs", "swh"),    // significant wave height
                ("dp", "pwd"),    // peak wave direction
            ]
            .into_iter()
            .map(|(from, to)| VariableRename {
                from: from.to_string(),
                to: to.to_string(),
            })
            .collect(),
        }
    }

    /// Build a table, rejecting empty names and duplicate sources or targets.
    pub fn from_pairs<I, A, B>(pairs: I) -> NetCdfResult<Self>
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(from, to)| VariableRename {
                from: from.into(),
                to: to.into(),
            })
            .collect();
        Self::from_entries(entries)
    }

    fn from_entries(entries: Vec<VariableRename>) -> NetCdfResult<Self> {
        if entries.is_empty() {
            return Err(NetCdfError::InvalidVariableMap("table is empty".to_string()));
        }

        let mut sources = HashSet::new();
        let mut targets = HashSet::new();
        for entry in &entries {
            if entry.from.is_empty() || entry.to.is_empty() {
                return Err(NetCdfError::InvalidVariableMap(
                    "variable names must not be empty".to_string(),
                ));
            }
            if !sources.insert(entry.from.as_str()) {
                return Err(NetCdfError::InvalidVariableMap(format!(
                    "duplicate source variable '{}'",
                    entry.from
                )));
            }
            if !targets.insert(entry.to.as_str()) {
                return Err(NetCdfError::InvalidVariableMap(format!(
                    "duplicate target variable '{}'",
                    entry.to
                )));
            }
        }

        Ok(Self { entries })
    }

    /// Parse a YAML table:
    ///
    /// ```yaml
    /// variables:
    ///   - { from: hs, to: swh }
    ///   - { from: dp, to: pwd }
    /// ```
    pub fn from_yaml_str(content: &str) -> NetCdfResult<Self> {
        let file: VariableMapFile = serde_yaml::from_str(content)
            .map_err(|e| NetCdfError::InvalidVariableMap(e.to_string()))?;
        Self::from_entries(file.variables)
    }

    pub fn load(path: &Path) -> NetCdfResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let map = Self::from_yaml_str(&content)?;
        debug!(path = %path.display(), entries = map.len(), "Loaded variable map");
        Ok(map)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn target_of(&self, from: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.from == from)
            .map(|e| e.to.as_str())
    }

    /// Entries whose source is among `available`, in table order.
    pub fn select<S: AsRef<str>>(&self, available: &[S]) -> Vec<&VariableRename> {
        self.entries
            .iter()
            .filter(|e| available.iter().any(|a| a.as_ref() == e.from))
            .collect()
    }
}

impl Default for VariableMap {
    fn default() -> Self {
        Self::grib()
    }
}
