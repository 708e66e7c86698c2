use std::fs;
use std::path::Path;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use tracing::{debug, info};

use crate::models::{series_label, ChartStyle, Observation, OutputFormat, PlottedPoint, RenderedChart};
use crate::utils::JobsError;

/// NBER recession dates as ((year, month), (year, month)), first of month
pub const NBER_RECESSIONS: &[((i32, u32), (i32, u32))] = &[
    ((2001, 3), (2001, 11)),
    ((2007, 12), (2009, 6)),
    ((2020, 2), (2020, 4)),
];

/// Minimum x padding on each side, so a single point still has a range
const MIN_X_PADDING_DAYS: i64 = 15;

/// Spans at least this long get year-only tick labels; shorter spans
/// would get several ticks inside one year
const YEAR_TICKS_MIN_DAYS: i64 = 1461;

/// Dash length and gap of the current-value line, in pixels
const DASH_SIZE: i32 = 8;
const DASH_SPACING: i32 = 6;

/// Everything about a chart that can be worked out without drawing it
#[derive(Debug, Clone)]
pub struct ChartLayout {
    /// Ascending by period
    pub points: Vec<PlottedPoint>,
    pub x_min: DateTime<Utc>,
    pub x_max: DateTime<Utc>,
    pub padding: Duration,
    pub y_max: f64,
    /// Recession spans clipped to the x range
    pub recessions: Vec<(DateTime<Utc>, DateTime<Utc>)>,
    pub tick_format: &'static str,
}

impl ChartLayout {
    /// The most recent point
    pub fn current(&self) -> &PlottedPoint {
        &self.points[self.points.len() - 1]
    }
}

/// Work out the chart geometry. Sorts a copy; `observations` is left as is.
pub fn build_layout(observations: &[Observation], style: &ChartStyle) -> Result<ChartLayout, JobsError> {
    if observations.is_empty() {
        return Err(JobsError::EmptyData("No observations to plot".to_string()));
    }

    let mut points = observations
        .iter()
        .map(|obs| {
            Ok(PlottedPoint {
                period: obs.period.clone(),
                timestamp: obs.timestamp()?,
                value: obs.value,
            })
        })
        .collect::<Result<Vec<_>, JobsError>>()?;

    // Stable, so repeated periods keep their relative order
    points.sort_by_key(|p| p.timestamp);

    let first = points[0].timestamp;
    let last = points[points.len() - 1].timestamp;
    let span = last - first;

    let padding = Duration::seconds((span.num_seconds() as f64 * style.x_padding) as i64)
        .max(Duration::days(MIN_X_PADDING_DAYS));
    let x_min = first - padding;
    let x_max = last + padding;

    let max_value = points.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max);
    let y_max = (max_value * 1.1).max(style.y_ceiling_floor);

    let recessions = if style.recession_shading {
        visible_recessions(x_min, x_max)?
    } else {
        Vec::new()
    };

    let tick_format = if span.num_days() >= YEAR_TICKS_MIN_DAYS { "%Y" } else { "%Y-%m" };

    Ok(ChartLayout {
        points,
        x_min,
        x_max,
        padding,
        y_max,
        recessions,
        tick_format,
    })
}

fn month_start(year: i32, month: u32) -> Result<DateTime<Utc>, JobsError> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
        .ok_or_else(|| JobsError::Render(format!("Invalid month {}-{:02}", year, month)))
}

/// Recessions overlapping [x_min, x_max], clipped to it
fn visible_recessions(
    x_min: DateTime<Utc>,
    x_max: DateTime<Utc>,
) -> Result<Vec<(DateTime<Utc>, DateTime<Utc>)>, JobsError> {
    let mut spans = Vec::new();
    for &((sy, sm), (ey, em)) in NBER_RECESSIONS {
        let start = month_start(sy, sm)?;
        let end = month_start(ey, em)?;
        if end < x_min || start > x_max {
            continue;
        }
        spans.push((start.max(x_min), end.min(x_max)));
    }
    Ok(spans)
}

fn render_error(context: &str, e: impl std::fmt::Display) -> JobsError {
    JobsError::Render(format!("{}: {}", context, e))
}

/// Render observations as a line chart into `path` (.png or .svg).
///
/// Fails with `EmptyData` before touching the filesystem when there is
/// nothing to plot. A file left half-written by a drawing failure is removed.
pub fn render_chart(
    observations: &[Observation],
    series_id: &str,
    style: &ChartStyle,
    path: &Path,
) -> Result<RenderedChart, JobsError> {
    let layout = build_layout(observations, style)?;
    let format = OutputFormat::from_path(path)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| render_error(&format!("Failed to create {}", parent.display()), e))?;
    }

    debug!(
        "Rendering {} points to {} ({:?}, {}x{})",
        layout.points.len(),
        path.display(),
        format,
        style.width,
        style.height
    );

    let size = (style.width, style.height);
    let label = series_label(series_id);
    let result = match format {
        OutputFormat::Png => draw_chart(BitMapBackend::new(path, size).into_drawing_area(), &layout, style, label),
        OutputFormat::Svg => draw_chart(SVGBackend::new(path, size).into_drawing_area(), &layout, style, label),
    };

    if let Err(e) = result {
        let _ = fs::remove_file(path);
        return Err(e);
    }

    info!("Chart written to {}", path.display());

    Ok(RenderedChart {
        path: path.to_path_buf(),
        format,
        points: layout.points,
    })
}

fn draw_chart<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    layout: &ChartLayout,
    style: &ChartStyle,
    series_name: &str,
) -> Result<(), JobsError> {
    root.fill(&WHITE)
        .map_err(|e| render_error("Failed to fill canvas", e))?;

    let mut area = root
        .titled(
            &style.title,
            ("sans-serif", 32).into_font().style(FontStyle::Bold).color(&style.text_color),
        )
        .map_err(|e| render_error("Failed to draw title", e))?;

    if let Some(subtitle) = &style.subtitle {
        area = area
            .titled(subtitle, ("sans-serif", 20).into_font().color(&style.subtitle_color))
            .map_err(|e| render_error("Failed to draw subtitle", e))?;
    }

    let mut chart = ChartBuilder::on(&area)
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(layout.x_min..layout.x_max, 0f64..layout.y_max)
        .map_err(|e| render_error("Failed to build chart", e))?;

    let tick_format = layout.tick_format;
    chart
        .configure_mesh()
        .x_labels(8)
        .x_label_formatter(&|ts: &DateTime<Utc>| ts.format(tick_format).to_string())
        .y_label_formatter(&|v: &f64| format!("{:.0}", v))
        .y_desc(&style.y_label)
        .axis_desc_style(("sans-serif", 16).into_font().color(&style.text_color))
        .label_style(("sans-serif", 13).into_font().color(&style.text_color))
        .bold_line_style(style.grid_color.mix(0.7))
        .light_line_style(style.grid_color.mix(0.3))
        .axis_style(style.grid_color)
        .draw()
        .map_err(|e| render_error("Failed to draw mesh", e))?;

    if !layout.recessions.is_empty() {
        let y_max = layout.y_max;
        let fill = style.recession_color.mix(0.5).filled();
        chart
            .draw_series(
                layout
                    .recessions
                    .iter()
                    .map(|&(start, end)| Rectangle::new([(start, 0.0), (end, y_max)], fill)),
            )
            .map_err(|e| render_error("Failed to shade recessions", e))?;
    }

    let line_color = style.line_color;
    let current = layout.current();

    if style.show_current_value {
        chart
            .draw_series(DashedLineSeries::new(
                vec![(layout.x_min, current.value), (layout.x_max, current.value)],
                DASH_SIZE,
                DASH_SPACING,
                line_color.mix(0.5).stroke_width(2),
            ))
            .map_err(|e| render_error("Failed to draw current value line", e))?;
    }

    chart
        .draw_series(LineSeries::new(
            layout.points.iter().map(|p| (p.timestamp, p.value)),
            line_color.stroke_width(3),
        ))
        .map_err(|e| render_error("Failed to draw series", e))?
        .label(series_name)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_color.stroke_width(3)));

    chart
        .draw_series(
            layout
                .points
                .iter()
                .map(|p| Circle::new((p.timestamp, p.value), 3, line_color.filled())),
        )
        .map_err(|e| render_error("Failed to draw points", e))?;

    if style.show_current_value {
        let font = ("sans-serif", 15).into_font().style(FontStyle::Bold).color(&line_color);
        chart
            .draw_series(std::iter::once(
                EmptyElement::at((current.timestamp, current.value))
                    + Text::new(format!("{:.1}% ({})", current.value, current.period), (8, -22), font),
            ))
            .map_err(|e| render_error("Failed to label current value", e))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(style.grid_color)
        .label_font(("sans-serif", 14).into_font().color(&style.text_color))
        .draw()
        .map_err(|e| render_error("Failed to draw legend", e))?;

    // Source note, bottom-left inside the plot
    let (_, height) = area.dim_in_pixel();
    let note_font = ("sans-serif", 13).into_font().color(&style.subtitle_color);
    for (i, line) in style.source_note.iter().rev().enumerate() {
        let y = height as i32 - 70 - 16 * i as i32;
        area.draw(&Text::new(line.as_str(), (85, y), note_font.clone()))
            .map_err(|e| render_error("Failed to draw source note", e))?;
    }

    root.present()
        .map_err(|e| render_error("Failed to render chart", e))?;

    Ok(())
}
