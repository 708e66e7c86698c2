//! Chart generation models

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use plotters::style::RGBColor;

use crate::utils::JobsError;

/// Image format, picked from the output file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Svg,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self, JobsError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("png") => Ok(OutputFormat::Png),
            Some("svg") => Ok(OutputFormat::Svg),
            _ => Err(JobsError::Config(format!(
                "Unsupported chart output '{}'. Use a .png or .svg file",
                path.display()
            ))),
        }
    }
}

/// Presentation settings for the rendered chart
#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub subtitle: Option<String>,
    pub y_label: String,
    pub line_color: RGBColor,
    pub grid_color: RGBColor,
    pub recession_color: RGBColor,
    pub text_color: RGBColor,
    pub subtitle_color: RGBColor,
    pub recession_shading: bool,
    pub show_current_value: bool,
    /// Fraction of the date span added on each side of the x axis
    pub x_padding: f64,
    /// The y axis never tops out below this
    pub y_ceiling_floor: f64,
    pub source_note: Vec<String>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 700,
            title: "U.S. Unemployment Rate".to_string(),
            subtitle: None,
            y_label: "Unemployment Rate (%)".to_string(),
            line_color: RGBColor(0xff, 0x7f, 0x0e),
            grid_color: RGBColor(0xe5, 0xe7, 0xeb),
            recession_color: RGBColor(0xdb, 0xea, 0xfe),
            text_color: RGBColor(0x37, 0x41, 0x51),
            subtitle_color: RGBColor(0x6b, 0x72, 0x80),
            recession_shading: true,
            show_current_value: true,
            x_padding: 0.02,
            y_ceiling_floor: 15.0,
            source_note: vec![
                "Source: Bureau of Labor Statistics,".to_string(),
                "Current Population Survey".to_string(),
            ],
        }
    }
}

/// A point as it was placed on the chart
#[derive(Debug, Clone, PartialEq)]
pub struct PlottedPoint {
    pub period: String,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// What the renderer wrote
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub path: PathBuf,
    pub format: OutputFormat,
    /// Points in plot order (ascending by period)
    pub points: Vec<PlottedPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("out.png")).unwrap(), OutputFormat::Png);
        assert_eq!(OutputFormat::from_path(Path::new("charts/out.SVG")).unwrap(), OutputFormat::Svg);
        assert!(OutputFormat::from_path(Path::new("out.jpg")).is_err());
        assert!(OutputFormat::from_path(Path::new("out")).is_err());
    }
}
