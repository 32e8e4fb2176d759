//! WW3 reprocessing pipeline.
//!
//! Each downloaded archive file is reduced to the variables named in a
//! [`netcdf_processor::VariableMap`] (renamed to their GRIB-style names) and
//! written to a processed directory. The processed files are then
//! concatenated along `time` into a single output.

pub mod config;
pub mod discover;
pub mod pipeline;

pub use config::{ReprocessConfig, DEFAULT_OUTPUT, DEFAULT_PROCESSED_DIR};
pub use discover::discover_inputs;
pub use pipeline::{process_file, run, CombineOutcome, ReprocessSummary};
