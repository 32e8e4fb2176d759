//! Input discovery for `--input_dir`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;
use ww3_common::TargetFile;

/// List the `*.nc` files directly inside `dir`, ordered by forecast valid
/// time. Names that do not follow the archive pattern come last, by name.
pub fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();

    for entry in walkdir::WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry
            .with_context(|| format!("Failed to list input directory: {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        if path.extension().and_then(|e| e.to_str()) != Some("nc") {
            continue;
        }
        found.push(path);
    }

    found.sort_by_cached_key(|path| {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let valid_time = TargetFile::parse(&name).and_then(|t| t.valid_time());
        (valid_time.is_none(), valid_time, name)
    });

    debug!(dir = %dir.display(), files = found.len(), "Discovered input files");
    Ok(found)
}
