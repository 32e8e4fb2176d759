//! Read-only handle over an opened NetCDF file.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{NetCdfError, NetCdfResult};
use crate::native::{coordinates_attr, silence_hdf5_errors};

/// An opened NetCDF dataset.
///
/// Variables split into coordinates (named after a dimension, or listed in
/// some variable's `coordinates` attribute) and data variables (the rest).
/// The handle is owned by whichever step opened it and released with
/// [`Dataset::close`].
pub struct Dataset {
    path: PathBuf,
    file: netcdf::File,
}

impl Dataset {
    pub fn open(path: impl AsRef<Path>) -> NetCdfResult<Self> {
        silence_hdf5_errors();

        let path = path.as_ref().to_path_buf();
        let file = netcdf::open(&path)?;
        debug!(path = %path.display(), "Opened dataset");

        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn file(&self) -> &netcdf::File {
        &self.file
    }

    pub(crate) fn variable(&self, name: &str) -> NetCdfResult<netcdf::Variable<'_>> {
        self.file.variable(name).ok_or_else(|| {
            NetCdfError::MissingData(format!("variable '{}' in {}", name, self.path.display()))
        })
    }

    /// All variable names, in file order.
    pub fn variable_names(&self) -> Vec<String> {
        self.file.variables().map(|v| v.name()).collect()
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.file.variable(name).is_some()
    }

    pub fn dimension_len(&self, name: &str) -> Option<usize> {
        self.file.dimension(name).map(|d| d.len())
    }

    /// Dimension names of a variable, outermost first.
    pub fn variable_dimensions(&self, name: &str) -> Option<Vec<String>> {
        self.file
            .variable(name)
            .map(|v| v.dimensions().iter().map(|d| d.name()).collect())
    }

    pub fn coordinate_names(&self) -> BTreeSet<String> {
        let dims: BTreeSet<String> = self.file.dimensions().map(|d| d.name()).collect();
        let mut coords = BTreeSet::new();

        for var in self.file.variables() {
            let name = var.name();
            if dims.contains(&name) {
                coords.insert(name);
            }
            for listed in coordinates_attr(&var) {
                if self.has_variable(&listed) {
                    coords.insert(listed);
                }
            }
        }

        coords
    }

    /// Non-coordinate variables, in file order.
    pub fn data_variable_names(&self) -> Vec<String> {
        let coords = self.coordinate_names();
        self.variable_names()
            .into_iter()
            .filter(|name| !coords.contains(name))
            .collect()
    }

    /// Coordinate variables a variable depends on: one per dimension that has
    /// a same-named variable, then those listed in its `coordinates` attribute.
    pub fn coordinates_of(&self, name: &str) -> NetCdfResult<Vec<String>> {
        let var = self.variable(name)?;
        let mut coords = Vec::new();

        for dim in var.dimensions() {
            let dim_name = dim.name();
            if dim_name != name && self.has_variable(&dim_name) && !coords.contains(&dim_name) {
                coords.push(dim_name);
            }
        }
        for listed in coordinates_attr(&var) {
            if listed != name && self.has_variable(&listed) && !coords.contains(&listed) {
                coords.push(listed);
            }
        }

        Ok(coords)
    }

    /// Release the underlying file handle.
    pub fn close(self) {
        debug!(path = %self.path.display(), "Closed dataset");
    }
}

impl std::fmt::Debug for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dataset").field("path", &self.path).finish()
    }
}
