//! Synthetic MARC WW3 files for tests.
//!
//! Archive files hold one forecast hour on a regular lat/lon grid:
//! `time` (unlimited), `latitude`, `longitude` coordinate variables plus
//! `f32` data variables shaped `(time, latitude, longitude)`.

use std::path::Path;

/// Zone used in fixture filenames.
pub const ZONE: &str = "FINIS-200M";

/// Fill value written on every data variable.
pub const FILL_VALUE_F32: f32 = -9999.0;

/// Contents of a synthetic archive file.
#[derive(Debug, Clone)]
pub struct MarcFixture {
    pub title: String,
    /// Seconds since 1990-01-01
    pub times: Vec<f64>,
    pub latitudes: Vec<f32>,
    pub longitudes: Vec<f32>,
    pub variables: Vec<String>,
}

impl MarcFixture {
    /// One time step on a 3x4 grid holding the given data variables.
    pub fn with_variables(names: &[&str]) -> Self {
        Self {
            title: "MARC WW3 test fixture".to_string(),
            times: vec![1_117_584_000.0],
            latitudes: vec![48.0, 48.5, 49.0],
            longitudes: vec![-5.0, -4.5, -4.0, -3.5],
            variables: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    pub fn with_times(mut self, times: &[f64]) -> Self {
        self.times = times.to_vec();
        self
    }

    pub fn with_grid(mut self, n_lat: usize, n_lon: usize) -> Self {
        self.latitudes = (0..n_lat).map(|i| 48.0 + i as f32 * 0.5).collect();
        self.longitudes = (0..n_lon).map(|i| -5.0 + i as f32 * 0.5).collect();
        self
    }

    pub fn grid_size(&self) -> usize {
        self.latitudes.len() * self.longitudes.len()
    }

    /// Deterministic field for `name` at time step `time_index`.
    pub fn values_for(&self, name: &str, time_index: usize) -> Vec<f32> {
        let base = name.bytes().map(f32::from).sum::<f32>() / 100.0;
        let hour = (self.times[time_index] / 3600.0) % 24.0;
        (0..self.grid_size())
            .map(|i| base + hour as f32 * 10.0 + i as f32 * 0.25)
            .collect()
    }

    fn units_for(name: &str) -> &'static str {
        match name {
            "hs" | "swh" => "m",
            "dp" | "pwd" => "degree",
            "ucur" | "vcur" | "UGRD" | "VGRD" => "m s-1",
            "tp" => "s",
            _ => "1",
        }
    }
}

/// Write `fixture` to `path` as a netCDF-4 file.
pub fn write_marc_fixture(path: &Path, fixture: &MarcFixture) -> Result<(), netcdf::Error> {
    let n_time = fixture.times.len();
    let n_lat = fixture.latitudes.len();
    let n_lon = fixture.longitudes.len();

    let mut file = netcdf::create(path)?;
    file.add_unlimited_dimension("time")?;
    file.add_dimension("latitude", n_lat)?;
    file.add_dimension("longitude", n_lon)?;

    file.add_attribute("title", fixture.title.as_str())?;
    file.add_attribute("Conventions", "CF-1.6")?;

    {
        let mut time_var = file.add_variable::<f64>("time", &["time"])?;
        time_var.put_attribute("standard_name", "time")?;
        time_var.put_attribute("units", "seconds since 1990-01-01T00:00:00Z")?;
        time_var.put_values(&fixture.times, (&[0usize][..], &[n_time][..]))?;
    }
    {
        let mut lat_var = file.add_variable::<f32>("latitude", &["latitude"])?;
        lat_var.put_attribute("standard_name", "latitude")?;
        lat_var.put_attribute("units", "degrees_north")?;
        lat_var.put_values(&fixture.latitudes, ..)?;
    }
    {
        let mut lon_var = file.add_variable::<f32>("longitude", &["longitude"])?;
        lon_var.put_attribute("standard_name", "longitude")?;
        lon_var.put_attribute("units", "degrees_east")?;
        lon_var.put_values(&fixture.longitudes, ..)?;
    }

    for name in &fixture.variables {
        let mut values = Vec::with_capacity(n_time * fixture.grid_size());
        for t in 0..n_time {
            values.extend(fixture.values_for(name, t));
        }

        let mut var = file.add_variable::<f32>(name, &["time", "latitude", "longitude"])?;
        var.put_attribute("long_name", name.as_str())?;
        var.put_attribute("units", MarcFixture::units_for(name))?;
        var.put_attribute("_FillValue", FILL_VALUE_F32)?;
        var.put_values(&values, (&[0usize, 0, 0][..], &[n_time, n_lat, n_lon][..]))?;
    }

    Ok(())
}

/// Archive filename for `hour` on 2025-06-01 in [`ZONE`].
pub fn fixture_filename(hour: u32) -> String {
    format!("MARC_WW3-{}_20250601T{:02}Z.nc", ZONE, hour)
}

/// Fixture valid at `hour` on 2025-06-01.
pub fn hourly_fixture(names: &[&str], hour: u32) -> MarcFixture {
    // 2025-06-01T00:00:00Z in seconds since 1990-01-01
    const DAY_START: f64 = 1_117_584_000.0;
    MarcFixture::with_variables(names).with_times(&[DAY_START + hour as f64 * 3600.0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_differ_per_hour() {
        let a = hourly_fixture(&["hs"], 0);
        let b = hourly_fixture(&["hs"], 1);
        assert_ne!(a.values_for("hs", 0), b.values_for("hs", 0));
        assert_eq!(a.values_for("hs", 0).len(), 12);
    }

    #[test]
    fn test_fixture_filename() {
        assert_eq!(fixture_filename(5), "MARC_WW3-FINIS-200M_20250601T05Z.nc");
    }

    #[test]
    fn test_write_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(fixture_filename(0));
        write_marc_fixture(&path, &MarcFixture::with_variables(&["hs", "dp"])).unwrap();

        let file = netcdf::open(&path).unwrap();
        assert_eq!(file.dimension("time").unwrap().len(), 1);
        assert!(file.variable("hs").is_some());
        assert!(file.variable("dp").is_some());
    }
}
