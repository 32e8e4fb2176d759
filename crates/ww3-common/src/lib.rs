//! Common types shared by the WW3 downloader and reprocessor services.
//!
//! - [`filename`]: the `MARC_WW3-{zone}_{YYYYMMDD}T{HH}Z.nc` naming scheme
//! - [`archive`]: remote endpoint layout (HTTPS and FTP)
//! - [`outcome`]: per-file outcomes and the run summary both stages report

pub mod archive;
pub mod error;
pub mod filename;
pub mod outcome;

pub use archive::ArchiveLayout;
pub use error::{CommonError, CommonResult};
pub use filename::{default_start_date, forecast_filenames, parse_start_date, TargetFile};
pub use outcome::{FileOutcome, FileReport, RunSummary, SkipReason};
