//! Select and rename a subset of variables into a new file.

use std::path::Path;

use tracing::debug;

use crate::copy::{
    copy_global_attributes, define_dimensions, define_like, write_all, write_via_partial,
    DimensionSpec,
};
use crate::dataset::Dataset;
use crate::error::NetCdfResult;
use crate::format::OutputFormat;
use crate::variable_map::VariableMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubsetOutcome {
    /// Output written; renamed data variables in table order.
    Written { variables: Vec<String> },
    /// Input holds none of the mapped variables; nothing written.
    NoMatchingVariables,
}

/// Copy the mapped data variables of `dataset` (renamed) together with the
/// coordinate variables they reference and the global attributes.
///
/// The file is written next to `output` and renamed into place, so a failed
/// write leaves any existing `output` untouched.
pub fn write_subset(
    dataset: &Dataset,
    map: &VariableMap,
    output: &Path,
    format: OutputFormat,
) -> NetCdfResult<SubsetOutcome> {
    let available = dataset.data_variable_names();
    let selected = map.select(&available);
    if selected.is_empty() {
        return Ok(SubsetOutcome::NoMatchingVariables);
    }

    // (source name, output name)
    let mut plan: Vec<(String, String)> = Vec::new();
    for entry in &selected {
        for coord in dataset.coordinates_of(&entry.from)? {
            if !plan.iter().any(|(src, _)| *src == coord) {
                plan.push((coord.clone(), coord));
            }
        }
    }
    for entry in &selected {
        plan.push((entry.from.clone(), entry.to.clone()));
    }

    debug!(
        input = %dataset.path().display(),
        output = %output.display(),
        variables = ?plan,
        "Writing variable subset"
    );

    write_via_partial(output, |partial| write_plan(dataset, &plan, partial, format))?;

    Ok(SubsetOutcome::Written {
        variables: selected.iter().map(|e| e.to.clone()).collect(),
    })
}

fn write_plan(
    dataset: &Dataset,
    plan: &[(String, String)],
    output: &Path,
    format: OutputFormat,
) -> NetCdfResult<()> {
    let file = dataset.file();

    // Only dimensions used by a copied variable, in file order.
    let mut used = Vec::new();
    for (src, _) in plan {
        for dim in dataset.variable_dimensions(src).unwrap_or_default() {
            if !used.contains(&dim) {
                used.push(dim);
            }
        }
    }
    let dims: Vec<DimensionSpec> = file
        .dimensions()
        .filter(|d| used.contains(&d.name()))
        .map(|d| DimensionSpec::of(&d))
        .collect();

    let mut out = netcdf::create_with(output, format.options())?;
    define_dimensions(&mut out, &dims)?;
    copy_global_attributes(file, &mut out)?;

    for (src, dst) in plan {
        let var = dataset.variable(src)?;
        define_like(&mut out, &var, dst)?;
    }
    for (src, dst) in plan {
        let var = dataset.variable(src)?;
        write_all(&mut out, dst, &var)?;
    }

    Ok(())
}
