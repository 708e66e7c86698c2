use std::path::PathBuf;

use chrono::{Datelike, Utc};

use crate::api::bls::BlsClient;
use crate::models::series::UNEMPLOYMENT_RATE;
use crate::models::ChartStyle;
use crate::utils::{parse_hex_color, JobsError};

/// BLS v2 serves at most this many years per request
pub const MAX_YEAR_SPAN: i32 = 20;

/// Default look-back when no start year is configured
pub const DEFAULT_YEARS_BACK: i32 = 10;

/// Settings for one run, read from the environment (and `.env`)
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub series_id: String,
    pub start_year: i32,
    pub end_year: i32,
    pub base_url: String,
    pub output_path: PathBuf,
    pub style: ChartStyle,
}

impl Config {
    pub fn from_env() -> Result<Self, JobsError> {
        Self::from_lookup(|key| std::env::var(key).ok(), Utc::now().year())
    }

    /// Build from any key lookup; `current_year` anchors the default range
    pub fn from_lookup<F>(lookup: F, current_year: i32) -> Result<Self, JobsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = get("BLS_API_KEY")
            .ok_or_else(|| JobsError::Config("BLS_API_KEY not set".to_string()))?;

        let end_year = match get("BLS_END_YEAR") {
            Some(v) => parse_year("BLS_END_YEAR", &v)?,
            None => current_year,
        };
        let start_year = match get("BLS_START_YEAR") {
            Some(v) => parse_year("BLS_START_YEAR", &v)?,
            None => end_year - DEFAULT_YEARS_BACK,
        };

        if end_year < start_year {
            return Err(JobsError::Config(format!(
                "BLS_END_YEAR ({}) is before BLS_START_YEAR ({})",
                end_year, start_year
            )));
        }
        if end_year - start_year + 1 > MAX_YEAR_SPAN {
            return Err(JobsError::Config(format!(
                "Year range {}-{} spans more than {} years",
                start_year, end_year, MAX_YEAR_SPAN
            )));
        }

        let mut style = ChartStyle::default();
        if let Some(title) = get("CHART_TITLE") {
            style.title = title;
        }
        style.subtitle = get("CHART_SUBTITLE");
        if let Some(color) = get("CHART_LINE_COLOR") {
            style.line_color = parse_hex_color(&color)?;
        }

        Ok(Self {
            api_key,
            series_id: get("BLS_SERIES_ID").unwrap_or_else(|| UNEMPLOYMENT_RATE.to_string()),
            start_year,
            end_year,
            base_url: get("BLS_API_URL").unwrap_or_else(|| BlsClient::DEFAULT_BASE_URL.to_string()),
            output_path: PathBuf::from(get("CHART_OUTPUT").unwrap_or_else(|| "unemployment.png".to_string())),
            style,
        })
    }
}

fn parse_year(key: &str, value: &str) -> Result<i32, JobsError> {
    match value.parse::<i32>() {
        Ok(year) if (1900..=9999).contains(&year) => Ok(year),
        _ => Err(JobsError::Config(format!("{} must be a four-digit year, got '{}'", key, value))),
    }
}
