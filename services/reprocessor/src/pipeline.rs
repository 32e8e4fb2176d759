//! Per-file subsetting followed by time concatenation of the results.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use netcdf_processor::{concat_datasets, write_subset, Dataset, SubsetOutcome, TIME_DIM};
use serde::Serialize;
use tracing::{debug, info, warn};
use ww3_common::{FileOutcome, RunSummary, SkipReason};

use crate::config::ReprocessConfig;

/// What happened to the combined output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CombineOutcome {
    Written {
        path: PathBuf,
        datasets: usize,
        time_steps: usize,
        variables: Vec<String>,
    },
    NothingToCombine,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReprocessSummary {
    pub files: RunSummary,
    pub combined: CombineOutcome,
}

impl ReprocessSummary {
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write summary: {}", path.display()))?;
        Ok(())
    }
}

/// Subset and rename one input file into the processed directory.
///
/// Open and write errors are logged and reported as `Failed`; a file with
/// none of the mapped variables is skipped. An input that already lives in
/// the processed directory is refused rather than overwritten.
pub fn process_file(input: &Path, config: &ReprocessConfig) -> FileOutcome {
    let Some(output) = config.processed_path(input) else {
        return FileOutcome::failed(format!("not a file path: {}", input.display()));
    };

    if same_file(input, &output) {
        warn!(file = %input.display(), "Processed output would overwrite its input");
        return FileOutcome::failed(format!(
            "output {} would overwrite its input",
            output.display()
        ));
    }

    let dataset = match Dataset::open(input) {
        Ok(ds) => ds,
        Err(e) => {
            warn!(file = %input.display(), error = %e, "Error opening file");
            return FileOutcome::failed(e);
        }
    };

    let result = write_subset(&dataset, &config.variable_map, &output, config.format);
    dataset.close();

    match result {
        Ok(SubsetOutcome::Written { variables }) => {
            info!(
                file = %input.display(),
                output = %output.display(),
                variables = ?variables,
                "Processed file"
            );
            FileOutcome::Completed { path: output }
        }
        Ok(SubsetOutcome::NoMatchingVariables) => {
            info!(file = %input.display(), "No variables to process, skipping file");
            FileOutcome::Skipped {
                path: None,
                reason: SkipReason::NoMatchingVariables,
            }
        }
        Err(e) => {
            warn!(file = %input.display(), error = %e, "Error processing file");
            FileOutcome::failed(e)
        }
    }
}

/// Process every input in order, then concatenate the processed files along
/// `time` into `config.output`.
///
/// Per-file problems are recorded in the summary. Failing to create the
/// processed directory, to reopen a processed file or to concatenate ends
/// the run with an error.
pub fn run(inputs: &[PathBuf], config: &ReprocessConfig) -> Result<ReprocessSummary> {
    std::fs::create_dir_all(&config.processed_dir).with_context(|| {
        format!(
            "Failed to create processed directory: {}",
            config.processed_dir.display()
        )
    })?;

    info!(
        inputs = inputs.len(),
        processed_dir = %config.processed_dir.display(),
        format = %config.format,
        "Starting WW3 reprocessing"
    );

    let mut files = RunSummary::new();
    for (index, input) in inputs.iter().enumerate() {
        let outcome = process_file(input, config);
        debug!(
            progress = format!("{}/{}", index + 1, inputs.len()),
            file = %input.display(),
            "Processed input"
        );
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| input.display().to_string());
        files.push(name, outcome);
    }

    let combined = combine(&files.usable_paths(), config)?;
    Ok(ReprocessSummary { files, combined })
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn combine(processed: &[PathBuf], config: &ReprocessConfig) -> Result<CombineOutcome> {
    if processed.is_empty() {
        info!("No files to process, nothing to combine");
        return Ok(CombineOutcome::NothingToCombine);
    }

    // All handles stay open until the combined file is written.
    let datasets = processed
        .iter()
        .map(|path| {
            Dataset::open(path)
                .with_context(|| format!("Failed to reopen processed file: {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let summary = concat_datasets(&datasets, TIME_DIM, &config.output, config.format)
        .with_context(|| format!("Failed to concatenate into {}", config.output.display()))?;

    for ds in datasets {
        ds.close();
    }

    info!(
        output = %config.output.display(),
        datasets = summary.datasets,
        time_steps = summary.steps,
        "Wrote combined file"
    );

    Ok(CombineOutcome::Written {
        path: config.output.clone(),
        datasets: summary.datasets,
        time_steps: summary.steps,
        variables: summary.variables,
    })
}
