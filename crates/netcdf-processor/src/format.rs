//! On-disk NetCDF sub-format for written files.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// HDF5 storage restricted to the classic data model (NETCDF4_CLASSIC)
    #[default]
    Netcdf4Classic,
    /// Full netCDF-4 data model
    Netcdf4,
}

impl OutputFormat {
    pub fn options(&self) -> netcdf::Options {
        match self {
            Self::Netcdf4Classic => netcdf::Options::NETCDF4 | netcdf::Options::CLASSIC,
            Self::Netcdf4 => netcdf::Options::NETCDF4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Netcdf4Classic => "netcdf4-classic",
            Self::Netcdf4 => "netcdf4",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "netcdf4-classic" => Ok(Self::Netcdf4Classic),
            "netcdf4" => Ok(Self::Netcdf4),
            other => Err(format!(
                "unknown format '{}' (expected netcdf4-classic or netcdf4)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!(
            "NETCDF4_CLASSIC".parse::<OutputFormat>().unwrap(),
            OutputFormat::Netcdf4Classic
        );
        assert_eq!("netcdf4".parse::<OutputFormat>().unwrap(), OutputFormat::Netcdf4);
        assert!("grib2".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::default().to_string(), "netcdf4-classic");
    }
}
