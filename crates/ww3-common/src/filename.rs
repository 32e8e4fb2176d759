//! MARC WW3 forecast file naming.
//!
//! Every archive file holds one forecast hour and is named
//! `MARC_WW3-{zone}_{YYYYMMDD}T{HH}Z.nc`, e.g.
//! `MARC_WW3-FINIS-200M_20250601T00Z.nc`.

use std::fmt;

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CommonError, CommonResult};

const PREFIX: &str = "MARC_WW3-";
const SUFFIX: &str = "Z.nc";

/// Hours published per forecast day.
pub const HOURS_PER_DAY: u32 = 24;

/// One expected archive file: a (zone, day, hour) triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetFile {
    pub zone: String,
    pub date: NaiveDate,
    pub hour: u32,
}

impl TargetFile {
    pub fn new(zone: impl Into<String>, date: NaiveDate, hour: u32) -> Self {
        Self {
            zone: zone.into(),
            date,
            hour,
        }
    }

    /// Archive filename for this triple.
    pub fn filename(&self) -> String {
        format!(
            "{}{}_{}T{:02}{}",
            PREFIX,
            self.zone,
            self.date.format("%Y%m%d"),
            self.hour,
            SUFFIX
        )
    }

    /// Forecast valid time (UTC).
    pub fn valid_time(&self) -> Option<DateTime<Utc>> {
        let naive = self.date.and_hms_opt(self.hour, 0, 0)?;
        Some(Utc.from_utc_datetime(&naive))
    }

    /// Recover the triple from an archive filename.
    ///
    /// Returns `None` when the name does not follow the MARC WW3 pattern.
    pub fn parse(name: &str) -> Option<Self> {
        let stem = name.strip_prefix(PREFIX)?.strip_suffix(SUFFIX)?;
        let (zone, stamp) = stem.rsplit_once('_')?;
        if zone.is_empty() {
            return None;
        }

        let (date_str, hour_str) = stamp.split_once('T')?;
        if date_str.len() != 8 || hour_str.len() != 2 {
            return None;
        }

        let date = NaiveDate::parse_from_str(date_str, "%Y%m%d").ok()?;
        let hour: u32 = hour_str.parse().ok()?;
        if hour >= HOURS_PER_DAY {
            return None;
        }

        Some(Self::new(zone, date, hour))
    }
}

impl fmt::Display for TargetFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.filename())
    }
}

/// Enumerate every hourly file in `[start, start + days_fwd]`, day-major.
///
/// Always yields `(days_fwd + 1) * 24` entries.
pub fn forecast_filenames(
    zone: &str,
    start: NaiveDate,
    days_fwd: u32,
) -> CommonResult<Vec<TargetFile>> {
    validate_zone(zone)?;

    let mut files = Vec::with_capacity((days_fwd as usize + 1) * HOURS_PER_DAY as usize);
    for delta in 0..=days_fwd {
        let day = start
            .checked_add_days(Days::new(delta as u64))
            .ok_or_else(|| CommonError::InvalidDate {
                value: format!("{} + {} days", start, delta),
            })?;
        for hour in 0..HOURS_PER_DAY {
            files.push(TargetFile::new(zone, day, hour));
        }
    }

    Ok(files)
}

/// Default start date: tomorrow, UTC.
pub fn default_start_date(now: DateTime<Utc>) -> NaiveDate {
    let today = now.date_naive();
    today.succ_opt().unwrap_or(today)
}

/// Parse a `YYYY-MM-DD` start date.
pub fn parse_start_date(value: &str) -> CommonResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| CommonError::InvalidDate {
        value: value.to_string(),
    })
}

// Zones end up in local filenames and remote paths.
fn validate_zone(zone: &str) -> CommonResult<()> {
    if zone.is_empty() {
        return Err(CommonError::InvalidZone("zone must not be empty".to_string()));
    }
    if zone.contains(['/', '\\']) || zone.chars().any(char::is_whitespace) {
        return Err(CommonError::InvalidZone(zone.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_single_day_finis() {
        let files = forecast_filenames("FINIS-200M", date(2025, 6, 1), 0).unwrap();
        assert_eq!(files.len(), 24);
        assert_eq!(files[0].filename(), "MARC_WW3-FINIS-200M_20250601T00Z.nc");
        assert_eq!(files[9].filename(), "MARC_WW3-FINIS-200M_20250601T09Z.nc");
        assert_eq!(files[23].filename(), "MARC_WW3-FINIS-200M_20250601T23Z.nc");
    }

    #[test]
    fn test_count_and_uniqueness() {
        for days_fwd in [0u32, 1, 3, 10] {
            let files =
                forecast_filenames("MANCHE-NORD-500M", date(2025, 2, 27), days_fwd).unwrap();
            assert_eq!(files.len(), (days_fwd as usize + 1) * 24);

            let names: HashSet<String> = files.iter().map(TargetFile::filename).collect();
            assert_eq!(names.len(), files.len(), "filenames must be unique");
        }
    }

    #[test]
    fn test_range_crosses_month_and_year() {
        let files = forecast_filenames("FINIS-200M", date(2024, 12, 31), 1).unwrap();
        assert_eq!(files[0].filename(), "MARC_WW3-FINIS-200M_20241231T00Z.nc");
        assert_eq!(files[24].filename(), "MARC_WW3-FINIS-200M_20250101T00Z.nc");
        assert_eq!(files.last().unwrap().date, date(2025, 1, 1));
    }

    #[test]
    fn test_rejects_bad_zone() {
        assert!(forecast_filenames("", date(2025, 6, 1), 0).is_err());
        assert!(forecast_filenames("../etc", date(2025, 6, 1), 0).is_err());
        assert!(forecast_filenames("FINIS 200M", date(2025, 6, 1), 0).is_err());
    }

    #[test]
    fn test_parse_roundtrip_of_known_name() {
        let parsed = TargetFile::parse("MARC_WW3-FINIS-200M_20250601T07Z.nc").unwrap();
        assert_eq!(parsed.zone, "FINIS-200M");
        assert_eq!(parsed.date, date(2025, 6, 1));
        assert_eq!(parsed.hour, 7);
        assert_eq!(
            parsed.valid_time().unwrap().to_rfc3339(),
            "2025-06-01T07:00:00+00:00"
        );
    }

    #[test]
    fn test_parse_rejects_foreign_names() {
        assert!(TargetFile::parse("gfs.t00z.pgrb2.0p25.f003").is_none());
        assert!(TargetFile::parse("MARC_WW3-FINIS-200M_20250601T24Z.nc").is_none());
        assert!(TargetFile::parse("MARC_WW3-FINIS-200M_2025061T07Z.nc").is_none());
        assert!(TargetFile::parse("MARC_WW3-_20250601T07Z.nc").is_none());
    }

    #[test]
    fn test_default_start_is_tomorrow() {
        let now = Utc.with_ymd_and_hms(2025, 6, 30, 23, 59, 0).unwrap();
        assert_eq!(default_start_date(now), date(2025, 7, 1));
    }

    #[test]
    fn test_parse_start_date() {
        assert_eq!(parse_start_date("2025-06-01").unwrap(), date(2025, 6, 1));
        assert!(parse_start_date("01/06/2025").is_err());
    }
}
