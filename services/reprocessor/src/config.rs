//! Reprocessing configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use netcdf_processor::{OutputFormat, VariableMap};
use tracing::info;

pub const DEFAULT_OUTPUT: &str = "for_grib.nc";
pub const DEFAULT_PROCESSED_DIR: &str = "processed_nc";

#[derive(Debug, Clone)]
pub struct ReprocessConfig {
    /// Per-file subsets land here under their original filename
    pub processed_dir: PathBuf,
    /// Combined, time-concatenated output
    pub output: PathBuf,
    pub format: OutputFormat,
    pub variable_map: VariableMap,
}

impl ReprocessConfig {
    /// GRIB rename table and netCDF-4 classic output.
    pub fn new(processed_dir: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            processed_dir: processed_dir.into(),
            output: output.into(),
            format: OutputFormat::default(),
            variable_map: VariableMap::grib(),
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Replace the rename table with one loaded from YAML.
    pub fn with_variable_map_file(mut self, path: &Path) -> Result<Self> {
        let map = VariableMap::load(path)
            .with_context(|| format!("Failed to load variable map: {}", path.display()))?;
        info!(path = %path.display(), entries = map.len(), "Loaded variable map");
        self.variable_map = map;
        Ok(self)
    }

    /// Where the subset of `input` is written.
    pub fn processed_path(&self, input: &Path) -> Option<PathBuf> {
        input.file_name().map(|name| self.processed_dir.join(name))
    }
}

impl Default for ReprocessConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PROCESSED_DIR, DEFAULT_OUTPUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReprocessConfig::default();
        assert_eq!(config.output, PathBuf::from("for_grib.nc"));
        assert_eq!(config.processed_dir, PathBuf::from("processed_nc"));
        assert_eq!(config.format, OutputFormat::Netcdf4Classic);
        assert_eq!(config.variable_map, VariableMap::grib());
    }

    #[test]
    fn test_processed_path_keeps_filename() {
        let config = ReprocessConfig::default();
        assert_eq!(
            config.processed_path(Path::new("ww3_data/MARC_WW3-FINIS-200M_20250601T00Z.nc")),
            Some(PathBuf::from("processed_nc/MARC_WW3-FINIS-200M_20250601T00Z.nc"))
        );
        assert_eq!(config.processed_path(Path::new("/")), None);
    }

    #[test]
    fn test_variable_map_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.yaml");
        std::fs::write(&path, "variables:\n  - from: hs\n    to: HTSGW\n").unwrap();

        let config = ReprocessConfig::default().with_variable_map_file(&path).unwrap();
        assert_eq!(config.variable_map.len(), 1);
        assert_eq!(config.variable_map.target_of("hs"), Some("HTSGW"));

        assert!(ReprocessConfig::default()
            .with_variable_map_file(&dir.path().join("missing.yaml"))
            .is_err());
    }
}
