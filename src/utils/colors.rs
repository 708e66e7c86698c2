use plotters::style::RGBColor;

use super::JobsError;

/// Parse a `#rrggbb` (or `rrggbb`) hex string into a plotters color
pub fn parse_hex_color(value: &str) -> Result<RGBColor, JobsError> {
    let hex = value.trim().trim_start_matches('#');

    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(JobsError::Config(format!(
            "Invalid color '{}'. Expected a hex value like #ff7f0e",
            value
        )));
    }

    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map_err(|e| JobsError::Config(format!("Invalid color '{}': {}", value, e)))
    };

    Ok(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}
