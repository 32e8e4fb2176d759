//! Type-dispatched copying of variables between NetCDF files.

use std::path::{Path, PathBuf};

use netcdf::types::{FloatType, IntType, NcVariableType};
use tracing::warn;

use crate::error::{NetCdfError, NetCdfResult};

const PARTIAL_SUFFIX: &str = ".part";

/// Run `$body` with `$t` bound to the Rust type matching the variable's
/// numeric NetCDF type.
macro_rules! with_numeric_type {
    ($var:expr, $t:ident => $body:expr) => {{
        let var: &netcdf::Variable = $var;
        match var.vartype() {
            NcVariableType::Int(IntType::I8) => {
                type $t = i8;
                $body
            }
            NcVariableType::Int(IntType::U8) => {
                type $t = u8;
                $body
            }
            NcVariableType::Int(IntType::I16) => {
                type $t = i16;
                $body
            }
            NcVariableType::Int(IntType::U16) => {
                type $t = u16;
                $body
            }
            NcVariableType::Int(IntType::I32) => {
                type $t = i32;
                $body
            }
            NcVariableType::Int(IntType::U32) => {
                type $t = u32;
                $body
            }
            NcVariableType::Int(IntType::I64) => {
                type $t = i64;
                $body
            }
            NcVariableType::Int(IntType::U64) => {
                type $t = u64;
                $body
            }
            NcVariableType::Float(FloatType::F32) => {
                type $t = f32;
                $body
            }
            NcVariableType::Float(FloatType::F64) => {
                type $t = f64;
                $body
            }
            _ => Err(NetCdfError::UnsupportedType(var.name())),
        }
    }};
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DimensionSpec {
    pub name: String,
    pub len: usize,
    pub unlimited: bool,
}

impl DimensionSpec {
    pub fn of(dim: &netcdf::Dimension) -> Self {
        Self {
            name: dim.name(),
            len: dim.len(),
            unlimited: dim.is_unlimited(),
        }
    }
}

/// Run `write` against `{output}.part` and rename the result onto `output`.
///
/// On failure the partial file is removed and whatever already sat at
/// `output` is left as it was.
pub(crate) fn write_via_partial<F>(output: &Path, write: F) -> NetCdfResult<()>
where
    F: FnOnce(&Path) -> NetCdfResult<()>,
{
    let partial = partial_path(output);
    let result = write(&partial).and_then(|()| Ok(std::fs::rename(&partial, output)?));

    if result.is_err() && partial.exists() {
        if let Err(rm) = std::fs::remove_file(&partial) {
            warn!(path = %partial.display(), error = %rm, "Failed to remove partial output");
        }
    }
    result
}

pub(crate) fn partial_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_owned();
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}

pub(crate) fn define_dimensions(
    out: &mut netcdf::FileMut,
    dims: &[DimensionSpec],
) -> NetCdfResult<()> {
    for dim in dims {
        if dim.unlimited {
            out.add_unlimited_dimension(&dim.name)?;
        } else {
            out.add_dimension(&dim.name, dim.len)?;
        }
    }
    Ok(())
}

/// Declare `name` in `out` with the type, dimensions and attributes of `src`.
///
/// The dimensions must already exist in `out`.
pub(crate) fn define_like(
    out: &mut netcdf::FileMut,
    src: &netcdf::Variable,
    name: &str,
) -> NetCdfResult<()> {
    let dims: Vec<String> = src.dimensions().iter().map(|d| d.name()).collect();
    let dim_refs: Vec<&str> = dims.iter().map(String::as_str).collect();

    with_numeric_type!(src, T => {
        let mut var = out.add_variable::<T>(name, &dim_refs)?;
        for attr in src.attributes() {
            var.put_attribute(attr.name(), attr.value()?)?;
        }
        Ok(())
    })
}

/// Write every value of `src` into `out`'s variable `name`, starting at
/// `start` (one index per dimension). Returns the number of values written.
pub(crate) fn write_slab(
    out: &mut netcdf::FileMut,
    name: &str,
    src: &netcdf::Variable,
    start: &[usize],
) -> NetCdfResult<usize> {
    let count: Vec<usize> = src.dimensions().iter().map(|d| d.len()).collect();
    if count.iter().any(|&c| c == 0) {
        return Ok(0);
    }

    with_numeric_type!(src, T => {
        let values: Vec<T> = src.get_values::<T, _>(..)?;
        let mut target = out
            .variable_mut(name)
            .ok_or_else(|| NetCdfError::MissingData(format!("output variable '{}'", name)))?;
        if count.is_empty() {
            target.put_values(&values, ..)?;
        } else {
            target.put_values(&values, (start, count.as_slice()))?;
        }
        Ok(values.len())
    })
}

/// Write all of `src` at the origin of `out`'s variable `name`.
pub(crate) fn write_all(
    out: &mut netcdf::FileMut,
    name: &str,
    src: &netcdf::Variable,
) -> NetCdfResult<usize> {
    let origin = vec![0; src.dimensions().len()];
    write_slab(out, name, src, &origin)
}

pub(crate) fn copy_global_attributes(
    src: &netcdf::File,
    out: &mut netcdf::FileMut,
) -> NetCdfResult<()> {
    for attr in src.attributes() {
        out.add_attribute(attr.name(), attr.value()?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_path() {
        assert_eq!(
            partial_path(Path::new("processed_nc/a.nc")),
            PathBuf::from("processed_nc/a.nc.part")
        );
    }

    #[test]
    fn test_failed_write_keeps_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.nc");
        std::fs::write(&output, b"previous").unwrap();

        let err = write_via_partial(&output, |partial| {
            std::fs::write(partial, b"half")?;
            Err(NetCdfError::MissingData("variable".to_string()))
        })
        .unwrap_err();

        assert!(matches!(err, NetCdfError::MissingData(_)));
        assert_eq!(std::fs::read(&output).unwrap(), b"previous");
        assert!(!partial_path(&output).exists());
    }

    #[test]
    fn test_successful_write_replaces_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.nc");
        std::fs::write(&output, b"previous").unwrap();

        write_via_partial(&output, |partial| Ok(std::fs::write(partial, b"fresh")?)).unwrap();

        assert_eq!(std::fs::read(&output).unwrap(), b"fresh");
        assert!(!partial_path(&output).exists());
    }
}
