//! Error types for NetCDF processing operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for NetCDF processor operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for NetCDF processing.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error reported by libnetcdf
    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),

    /// Missing required variable, dimension or attribute
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Variable type the copier does not handle (strings, compound, vlen...)
    #[error("Unsupported data type for variable '{0}'")]
    UnsupportedType(String),

    /// Datasets that cannot be concatenated
    #[error("Incompatible dataset {}: {message}", path.display())]
    Incompatible { path: PathBuf, message: String },

    /// Invalid variable rename table
    #[error("Invalid variable map: {0}")]
    InvalidVariableMap(String),

    /// Nothing was passed to an operation that needs input
    #[error("No datasets to concatenate")]
    NoDatasets,
}
