//! Tests against real MARC WW3 archive files.
//!
//! These are skipped unless the file is found under `TEST_DATA_DIR` or a
//! `testdata/` directory.

use netcdf_processor::{
    concat_datasets, write_subset, Dataset, OutputFormat, SubsetOutcome, VariableMap, TIME_DIM,
};
use test_utils::require_test_file;

const ARCHIVE_FILE: &str = "MARC_WW3-FINIS-200M_20250601T00Z.nc";

#[test]
fn test_real_file_subset_and_concat() {
    let path = require_test_file!(ARCHIVE_FILE);
    let dir = tempfile::tempdir().unwrap();

    let ds = Dataset::open(&path).unwrap();
    assert!(ds.dimension_len(TIME_DIM).is_some());
    let available = ds.data_variable_names();

    let processed = dir.path().join(ARCHIVE_FILE);
    let outcome =
        write_subset(&ds, &VariableMap::grib(), &processed, OutputFormat::default()).unwrap();
    ds.close();

    let expected: Vec<String> = VariableMap::grib()
        .select(&available)
        .iter()
        .map(|e| e.to.clone())
        .collect();
    match outcome {
        SubsetOutcome::Written { variables } => assert_eq!(variables, expected),
        SubsetOutcome::NoMatchingVariables => assert!(expected.is_empty()),
    }

    if processed.exists() {
        let parts = vec![Dataset::open(&processed).unwrap()];
        let combined = dir.path().join("for_grib.nc");
        let summary =
            concat_datasets(&parts, TIME_DIM, &combined, OutputFormat::default()).unwrap();
        assert_eq!(summary.datasets, 1);
        assert_eq!(Some(summary.steps), parts[0].dimension_len(TIME_DIM));
    }
}
