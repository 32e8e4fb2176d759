//! NetCDF reprocessing for MARC WW3 wave forecasts.
//!
//! Reads archive files with the native `netcdf` library, writes subsets of
//! their variables under GRIB-style names and concatenates per-hour files
//! along the time dimension.
//!
//! # Example
//!
//! ```no_run
//! use netcdf_processor::{
//!     concat_datasets, write_subset, Dataset, OutputFormat, VariableMap, TIME_DIM,
//! };
//! use std::path::Path;
//!
//! # fn main() -> Result<(), netcdf_processor::NetCdfError> {
//! let map = VariableMap::grib();
//! let ds = Dataset::open("MARC_WW3-FINIS-200M_20250601T00Z.nc")?;
//! write_subset(&ds, &map, Path::new("processed/a.nc"), OutputFormat::default())?;
//! ds.close();
//!
//! let parts = vec![Dataset::open("processed/a.nc")?];
//! concat_datasets(&parts, TIME_DIM, Path::new("for_grib.nc"), OutputFormat::default())?;
//! # Ok(()) }
//! ```

mod copy;
pub mod concat;
pub mod dataset;
pub mod error;
pub mod format;
pub mod native;
pub mod subset;
pub mod variable_map;

pub use concat::{concat_datasets, ConcatSummary, TIME_DIM};
pub use dataset::Dataset;
pub use error::{NetCdfError, NetCdfResult};
pub use format::OutputFormat;
pub use native::silence_hdf5_errors;
pub use subset::{write_subset, SubsetOutcome};
pub use variable_map::{VariableMap, VariableRename};
