//! Known BLS series

/// Seasonally adjusted U-3 unemployment rate (Current Population Survey)
pub const UNEMPLOYMENT_RATE: &str = "LNS14000000";

/// Plain-English legend name for a series, falling back to the id
pub fn series_label(series_id: &str) -> &str {
    match series_id {
        UNEMPLOYMENT_RATE => "U-3 Unemployment Rate (%)",
        other => other,
    }
}
