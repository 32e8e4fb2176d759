//! Concatenation of datasets along one dimension (normally `time`).
//!
//! The first dataset defines the schema. Variables carrying the
//! concatenation dimension are stacked in input order; the others are
//! copied once from the first dataset. In the output the concatenation
//! dimension is unlimited. The output only appears once fully written.

use std::path::Path;

use tracing::{debug, info};

use crate::copy::{
    copy_global_attributes, define_dimensions, define_like, write_all, write_slab,
    write_via_partial, DimensionSpec,
};
use crate::dataset::Dataset;
use crate::error::{NetCdfError, NetCdfResult};
use crate::format::OutputFormat;

/// Name of the forecast time dimension.
pub const TIME_DIM: &str = "time";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcatSummary {
    pub datasets: usize,
    /// Length of the concatenated dimension in the output
    pub steps: usize,
    pub variables: Vec<String>,
}

/// Concatenate `datasets` along `dim` and write the result to `output`.
///
/// Fails when a dataset lacks `dim` or a variable of the first dataset, or
/// when any other dimension or a variable's dimension list differs.
pub fn concat_datasets(
    datasets: &[Dataset],
    dim: &str,
    output: &Path,
    format: OutputFormat,
) -> NetCdfResult<ConcatSummary> {
    let first = datasets.first().ok_or(NetCdfError::NoDatasets)?;
    let first_file = first.file();

    if first.dimension_len(dim).is_none() {
        return Err(NetCdfError::Incompatible {
            path: first.path().to_path_buf(),
            message: format!("no '{}' dimension", dim),
        });
    }

    let dims: Vec<DimensionSpec> = first_file
        .dimensions()
        .map(|d| {
            let mut spec = DimensionSpec::of(&d);
            if spec.name == dim {
                spec.unlimited = true;
            }
            spec
        })
        .collect();

    let variables = first.variable_names();
    let mut layout: Vec<(String, Vec<String>)> = Vec::with_capacity(variables.len());
    for name in &variables {
        let var_dims = first.variable_dimensions(name).unwrap_or_default();
        layout.push((name.clone(), var_dims));
    }

    let mut steps = 0;
    for ds in datasets {
        steps += check_compatible(ds, dim, &dims, &layout)?;
    }

    write_via_partial(output, |partial| {
        write_concatenated(datasets, dim, &dims, &layout, partial, format)
    })?;

    info!(
        output = %output.display(),
        datasets = datasets.len(),
        steps = steps,
        "Wrote concatenated dataset"
    );

    Ok(ConcatSummary {
        datasets: datasets.len(),
        steps,
        variables,
    })
}

fn write_concatenated(
    datasets: &[Dataset],
    dim: &str,
    dims: &[DimensionSpec],
    layout: &[(String, Vec<String>)],
    output: &Path,
    format: OutputFormat,
) -> NetCdfResult<()> {
    let first = datasets.first().ok_or(NetCdfError::NoDatasets)?;

    let mut out = netcdf::create_with(output, format.options())?;
    define_dimensions(&mut out, dims)?;
    copy_global_attributes(first.file(), &mut out)?;
    for (name, _) in layout {
        let var = first.variable(name)?;
        define_like(&mut out, &var, name)?;
    }

    let mut offset = 0;
    for (index, ds) in datasets.iter().enumerate() {
        for (name, var_dims) in layout {
            let src = ds.variable(name)?;
            match var_dims.iter().position(|d| d == dim) {
                Some(axis) => {
                    let mut start = vec![0; var_dims.len()];
                    start[axis] = offset;
                    write_slab(&mut out, name, &src, &start)?;
                }
                None if index == 0 => {
                    write_all(&mut out, name, &src)?;
                }
                None => {}
            }
        }

        let len = ds.dimension_len(dim).unwrap_or(0);
        debug!(path = %ds.path().display(), offset = offset, steps = len, "Appended dataset");
        offset += len;
    }

    Ok(())
}

/// Returns the dataset's length along `dim`.
fn check_compatible(
    ds: &Dataset,
    dim: &str,
    dims: &[DimensionSpec],
    layout: &[(String, Vec<String>)],
) -> NetCdfResult<usize> {
    let incompatible = |message: String| NetCdfError::Incompatible {
        path: ds.path().to_path_buf(),
        message,
    };

    let steps = ds
        .dimension_len(dim)
        .ok_or_else(|| incompatible(format!("no '{}' dimension", dim)))?;

    for spec in dims.iter().filter(|d| d.name != dim) {
        match ds.dimension_len(&spec.name) {
            Some(len) if len == spec.len => {}
            Some(len) => {
                return Err(incompatible(format!(
                    "dimension '{}' has length {}, expected {}",
                    spec.name, len, spec.len
                )))
            }
            None => return Err(incompatible(format!("missing dimension '{}'", spec.name))),
        }
    }

    for (name, var_dims) in layout {
        match ds.variable_dimensions(name) {
            Some(found) if &found == var_dims => {}
            Some(found) => {
                return Err(incompatible(format!(
                    "variable '{}' has dimensions {:?}, expected {:?}",
                    name, found, var_dims
                )))
            }
            None => return Err(incompatible(format!("missing variable '{}'", name))),
        }
    }

    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{write_marc_fixture, MarcFixture};

    fn fixture_at(dir: &Path, name: &str, fixture: &MarcFixture) -> Dataset {
        let path = dir.join(name);
        write_marc_fixture(&path, fixture).unwrap();
        Dataset::open(&path).unwrap()
    }

    #[test]
    fn test_concat_stacks_in_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = MarcFixture::with_variables(&["swh"]).with_times(&[3600.0]);
        let b = MarcFixture::with_variables(&["swh"]).with_times(&[7200.0, 10800.0]);
        let datasets = vec![
            fixture_at(dir.path(), "a.nc", &a),
            fixture_at(dir.path(), "b.nc", &b),
        ];

        let output = dir.path().join("combined.nc");
        let summary =
            concat_datasets(&datasets, TIME_DIM, &output, OutputFormat::default()).unwrap();
        assert_eq!(summary.datasets, 2);
        assert_eq!(summary.steps, 3);

        let out = netcdf::open(&output).unwrap();
        let time = out.dimension("time").unwrap();
        assert_eq!(time.len(), 3);
        assert!(time.is_unlimited());

        let times: Vec<f64> = out.variable("time").unwrap().get_values(..).unwrap();
        assert_eq!(times, vec![3600.0, 7200.0, 10800.0]);

        let swh: Vec<f32> = out.variable("swh").unwrap().get_values(..).unwrap();
        let mut expected = a.values_for("swh", 0);
        expected.extend(b.values_for("swh", 0));
        expected.extend(b.values_for("swh", 1));
        assert_eq!(swh, expected);

        let lat: Vec<f32> = out.variable("latitude").unwrap().get_values(..).unwrap();
        assert_eq!(lat, a.latitudes);
    }

    #[test]
    fn test_single_dataset_copies_content() {
        let dir = tempfile::tempdir().unwrap();
        let a = MarcFixture::with_variables(&["swh", "pwd"]);
        let datasets = vec![fixture_at(dir.path(), "a.nc", &a)];

        let output = dir.path().join("combined.nc");
        concat_datasets(&datasets, TIME_DIM, &output, OutputFormat::default()).unwrap();

        let src = netcdf::open(dir.path().join("a.nc")).unwrap();
        let out = netcdf::open(&output).unwrap();
        let s: Vec<f64> = src.variable("time").unwrap().get_values(..).unwrap();
        let o: Vec<f64> = out.variable("time").unwrap().get_values(..).unwrap();
        assert_eq!(s, o);
        for name in ["latitude", "longitude", "swh", "pwd"] {
            let s: Vec<f32> = src.variable(name).unwrap().get_values(..).unwrap();
            let o: Vec<f32> = out.variable(name).unwrap().get_values(..).unwrap();
            assert_eq!(s, o, "{} differs", name);
        }
    }

    #[test]
    fn test_grid_mismatch_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let a = MarcFixture::with_variables(&["swh"]);
        let b = MarcFixture::with_variables(&["swh"]).with_grid(5, 4);
        let datasets = vec![
            fixture_at(dir.path(), "a.nc", &a),
            fixture_at(dir.path(), "b.nc", &b),
        ];

        let output = dir.path().join("c.nc");
        let err =
            concat_datasets(&datasets, TIME_DIM, &output, OutputFormat::default()).unwrap_err();
        assert!(matches!(err, NetCdfError::Incompatible { .. }), "{}", err);
    }

    #[test]
    fn test_missing_variable_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let a = MarcFixture::with_variables(&["swh", "pwd"]);
        let b = MarcFixture::with_variables(&["swh"]);
        let datasets = vec![
            fixture_at(dir.path(), "a.nc", &a),
            fixture_at(dir.path(), "b.nc", &b),
        ];

        let output = dir.path().join("c.nc");
        let err =
            concat_datasets(&datasets, TIME_DIM, &output, OutputFormat::default()).unwrap_err();
        assert!(err.to_string().contains("missing variable 'pwd'"), "{}", err);
    }

    #[test]
    fn test_no_datasets() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("c.nc");
        let err = concat_datasets(&[], TIME_DIM, &output, OutputFormat::default()).unwrap_err();
        assert!(matches!(err, NetCdfError::NoDatasets));
        assert!(!output.exists());
    }

    #[test]
    fn test_failed_write_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = MarcFixture::with_variables(&["swh"]);
        let mut datasets = Vec::new();
        for name in ["a.nc", "b.nc"] {
            let path = dir.path().join(name);
            write_marc_fixture(&path, &fixture).unwrap();
            let mut file = netcdf::append(&path).unwrap();
            file.add_string_variable("station", &["latitude"]).unwrap();
            drop(file);
            datasets.push(Dataset::open(&path).unwrap());
        }

        let output = dir.path().join("combined.nc");
        let err =
            concat_datasets(&datasets, TIME_DIM, &output, OutputFormat::default()).unwrap_err();

        assert!(matches!(err, NetCdfError::UnsupportedType(_)), "{}", err);
        assert!(!output.exists());
        assert!(!dir.path().join("combined.nc.part").exists());
    }
}
