//! Observation model shared by the fetcher and the renderer

use chrono::{DateTime, NaiveDate, Utc};

use crate::utils::JobsError;

/// A single (period, value) point from a statistics series
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// `YYYY-MM` label
    pub period: String,
    pub value: f64,
}

impl Observation {
    pub fn new(period: impl Into<String>, value: f64) -> Self {
        Self {
            period: period.into(),
            value,
        }
    }

    /// Build an observation from the raw BLS row fields.
    ///
    /// Returns `Ok(None)` for rows that are not a calendar month (`M13` annual
    /// averages, quarterly or annual periods); those are not plotted.
    pub fn from_bls_row(year: &str, period: &str, value: &str) -> Result<Option<Self>, JobsError> {
        let month = match period.strip_prefix('M').and_then(|m| m.parse::<u32>().ok()) {
            Some(m) if (1..=12).contains(&m) => m,
            _ => return Ok(None),
        };

        let year: i32 = year
            .trim()
            .parse()
            .map_err(|_| JobsError::Parse(format!("Invalid year '{}' for period {}", year, period)))?;

        let value: f64 = value.trim().parse().map_err(|_| {
            JobsError::Parse(format!("Non-numeric value '{}' for {}-{:02}", value, year, month))
        })?;

        if !value.is_finite() {
            return Err(JobsError::Parse(format!("Non-finite value for {}-{:02}", year, month)));
        }

        Ok(Some(Self::new(format!("{}-{:02}", year, month), value)))
    }

    /// First instant of the observation's month, used as the x coordinate
    pub fn timestamp(&self) -> Result<DateTime<Utc>, JobsError> {
        let date = NaiveDate::parse_from_str(&format!("{}-01", self.period), "%Y-%m-%d")
            .map_err(|_| JobsError::Parse(format!("Invalid period label '{}'. Expected YYYY-MM", self.period)))?;
        let naive_dt = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| JobsError::Parse(format!("Invalid period label '{}'", self.period)))?;

        Ok(DateTime::<Utc>::from_naive_utc_and_offset(naive_dt, Utc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_monthly_row_becomes_observation() {
        let obs = Observation::from_bls_row("2024", "M03", "3.8").unwrap().unwrap();
        assert_eq!(obs, Observation::new("2024-03", 3.8));
    }

    #[test]
    fn test_non_monthly_rows_are_skipped() {
        assert!(Observation::from_bls_row("2024", "M13", "4.0").unwrap().is_none());
        assert!(Observation::from_bls_row("2024", "Q01", "4.0").unwrap().is_none());
        assert!(Observation::from_bls_row("2024", "A01", "4.0").unwrap().is_none());
        assert!(Observation::from_bls_row("2024", "M00", "4.0").unwrap().is_none());
    }

    #[test]
    fn test_bad_values_are_parse_errors() {
        let err = Observation::from_bls_row("2024", "M01", "-").unwrap_err();
        assert!(matches!(err, JobsError::Parse(_)));

        let err = Observation::from_bls_row("20x4", "M01", "3.7").unwrap_err();
        assert!(matches!(err, JobsError::Parse(_)));

        let err = Observation::from_bls_row("2024", "M01", "NaN").unwrap_err();
        assert!(matches!(err, JobsError::Parse(_)));
    }

    #[test]
    fn test_timestamp_is_first_of_month() {
        let ts = Observation::new("2024-01", 3.7).timestamp().unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2024, 1, 1));

        assert!(Observation::new("January", 3.7).timestamp().is_err());
    }
}
