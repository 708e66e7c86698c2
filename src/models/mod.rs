//! Data models shared by the fetcher and the renderer

pub mod chart;
pub mod observation;
pub mod series;

pub use chart::{ChartStyle, OutputFormat, PlottedPoint, RenderedChart};
pub use observation::Observation;
pub use series::series_label;
