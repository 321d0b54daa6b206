//! Figure conventions of the NCL reference plots
//!
//! Axis limits with explicit major ticks and inward minor ticks, latitude and
//! longitude tick labels, main/left/right titles, and the layers the recipes
//! draw: scatter, lines, filled contours, contour lines with labels and
//! colorbars. Everything renders to PNG through `plotters`.

use crate::colormaps::Colormap;
use crate::contouring::{level_bin, ContourLabel, ContourLine, Extend};
use crate::errors::{render_err, GalleryError, Result};
use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use rayon::prelude::*;
use std::fs;
use std::ops::Range;
use std::path::PathBuf;

/// Linear chart axis whose tick marks sit exactly at the given values
#[derive(Clone)]
pub struct TickedRange {
    inner: RangedCoordf64,
    ticks: Vec<f64>,
}

impl TickedRange {
    pub fn new(range: Range<f64>, ticks: Vec<f64>) -> Self {
        Self {
            inner: range.into(),
            ticks,
        }
    }
}

impl Ranged for TickedRange {
    type FormatOption = DefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.inner.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, _hint: Hint) -> Vec<f64> {
        self.ticks.clone()
    }

    fn range(&self) -> Range<f64> {
        self.inner.range()
    }
}

/// Chart type shared by all recipe panels
pub type Chart<'a, 'b> = ChartContext<'a, BitMapBackend<'b>, Cartesian2d<TickedRange, TickedRange>>;

pub type Area<'b> = DrawingArea<BitMapBackend<'b>, Shift>;

const FONT: &str = "sans-serif";

/// Converts a point size to pixels at `dpi`.
pub fn font_px(points: f64, dpi: u32) -> u32 {
    ((points * dpi as f64 / 72.0).round() as u32).max(1)
}

/// Values from `start` towards `stop` (exclusive) in steps of `step`.
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if step == 0.0 || !step.is_finite() || (stop - start) / step <= 0.0 {
        return Vec::new();
    }
    let count = ((stop - start) / step - 1e-9).ceil().max(0.0) as usize;
    (0..count).map(|i| start + step * i as f64).collect()
}

/// Latitude tick label: `60S`, `0`, `30N`.
pub fn lat_label(value: f64, zero_direction: bool) -> String {
    let magnitude = trim_number(value.abs());
    if value.abs() < 1e-9 {
        if zero_direction { "0N".to_string() } else { "0".to_string() }
    } else if value > 0.0 {
        format!("{}N", magnitude)
    } else {
        format!("{}S", magnitude)
    }
}

/// Longitude tick label: `120W`, `0`, `60E`, `180`.
pub fn lon_label(value: f64, zero_direction: bool) -> String {
    let wrapped = crate::projection::wrap_degrees(value);
    let magnitude = trim_number(wrapped.abs());
    if wrapped.abs() < 1e-9 {
        if zero_direction { "0E".to_string() } else { "0".to_string() }
    } else if (wrapped.abs() - 180.0).abs() < 1e-9 {
        "180".to_string()
    } else if wrapped > 0.0 {
        format!("{}E", magnitude)
    } else {
        format!("{}W", magnitude)
    }
}

fn trim_number(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{}", value.round() as i64)
    } else {
        format!("{}", value)
    }
}

/// Minor tick positions dividing each major interval into `per_major`
/// parts, continued past the outer majors up to the axis limits.
pub fn minor_ticks(major: &[f64], per_major: usize, min: f64, max: f64) -> Vec<f64> {
    if major.len() < 2 || per_major < 2 {
        return Vec::new();
    }
    let step = (major[1] - major[0]) / per_major as f64;
    if step == 0.0 {
        return Vec::new();
    }
    let (lo, hi) = (min.min(max), min.max(max));
    let first = major[0];
    let start = ((lo - first) / step).ceil() as i64;
    let end = ((hi - first) / step).floor() as i64;
    (start..=end)
        .filter(|k| k.rem_euclid(per_major as i64) != 0)
        .map(|k| first + step * k as f64)
        .collect()
}

/// Mapping between data values and chart coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transform {
    #[default]
    Linear,
    /// `-log10(v)`: logarithmic axis with values decreasing upwards
    /// (pressure coordinates)
    NegLog10,
}

impl Transform {
    pub fn to_plot(self, value: f64) -> f64 {
        match self {
            Transform::Linear => value,
            Transform::NegLog10 => -value.log10(),
        }
    }

    pub fn from_plot(self, value: f64) -> f64 {
        match self {
            Transform::Linear => value,
            Transform::NegLog10 => 10f64.powf(-value),
        }
    }
}

/// How major tick values are labelled
#[derive(Debug, Clone, PartialEq)]
pub enum TickLabels {
    /// Fixed number of decimals
    Plain { decimals: usize },
    Latitude { zero_direction: bool },
    Longitude { zero_direction: bool },
    /// One label per major tick
    Custom(Vec<String>),
}

/// One axis: limits in data space, ticks and labels
#[derive(Debug, Clone, PartialEq)]
pub struct AxisSpec {
    pub min: f64,
    pub max: f64,
    pub transform: Transform,
    pub major: Vec<f64>,
    pub minor: Vec<f64>,
    pub labels: TickLabels,
}

impl AxisSpec {
    pub fn new(min: f64, max: f64, major: Vec<f64>) -> Self {
        Self {
            min,
            max,
            transform: Transform::Linear,
            major,
            minor: Vec::new(),
            labels: TickLabels::Plain { decimals: 0 },
        }
    }

    pub fn with_minor_per_major(mut self, per_major: usize) -> Self {
        self.minor = minor_ticks(&self.major, per_major, self.min, self.max);
        self
    }

    pub fn with_labels(mut self, labels: TickLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Chart-space range, ascending.
    pub fn plot_range(&self) -> (f64, f64) {
        let a = self.transform.to_plot(self.min);
        let b = self.transform.to_plot(self.max);
        (a.min(b), a.max(b))
    }

    pub fn to_plot(&self, value: f64) -> f64 {
        self.transform.to_plot(value)
    }

    pub fn from_plot(&self, value: f64) -> f64 {
        self.transform.from_plot(value)
    }

    fn in_limits(&self, value: f64) -> bool {
        let (lo, hi) = (self.min.min(self.max), self.min.max(self.max));
        let tolerance = (hi - lo).abs() * 1e-9;
        value >= lo - tolerance && value <= hi + tolerance
    }

    /// Label of the major tick closest to chart coordinate `plot_value`.
    pub fn label_for(&self, plot_value: f64) -> String {
        let index = self
            .major
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                let da = (self.to_plot(**a) - plot_value).abs();
                let db = (self.to_plot(**b) - plot_value).abs();
                da.total_cmp(&db)
            })
            .map(|(i, _)| i);
        let Some(index) = index else {
            return String::new();
        };
        let value = self.major[index];
        match &self.labels {
            TickLabels::Plain { decimals } => format!("{:.*}", *decimals, value),
            TickLabels::Latitude { zero_direction } => lat_label(value, *zero_direction),
            TickLabels::Longitude { zero_direction } => lon_label(value, *zero_direction),
            TickLabels::Custom(labels) => labels.get(index).cloned().unwrap_or_default(),
        }
    }

    fn key_points(&self) -> Vec<f64> {
        self.major
            .iter()
            .filter(|v| self.in_limits(**v))
            .map(|v| self.to_plot(*v))
            .collect()
    }
}

/// Titles and axis labels with their sizes in points
#[derive(Debug, Clone, PartialEq)]
pub struct Titles {
    pub main: Option<String>,
    pub left: Option<String>,
    pub right: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub main_size: f64,
    pub side_size: f64,
    pub label_size: f64,
    pub tick_size: f64,
}

impl Default for Titles {
    fn default() -> Self {
        Self {
            main: None,
            left: None,
            right: None,
            x_label: None,
            y_label: None,
            main_size: 18.0,
            side_size: 12.0,
            label_size: 16.0,
            tick_size: 12.0,
        }
    }
}

impl Titles {
    pub fn main(title: impl Into<String>) -> Self {
        Self {
            main: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn with_axis_labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_label = Some(x.into());
        self.y_label = Some(y.into());
        self
    }

    pub fn with_left(mut self, left: impl Into<String>, size: f64) -> Self {
        self.left = Some(left.into());
        self.side_size = size;
        self
    }

    pub fn with_main_size(mut self, size: f64) -> Self {
        self.main_size = size;
        self
    }

    pub fn with_tick_size(mut self, size: f64) -> Self {
        self.tick_size = size;
        self
    }
}

/// A PNG figure of a given size in inches at a resolution
#[derive(Debug, Clone)]
pub struct Figure {
    pub path: PathBuf,
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: u32,
}

impl Figure {
    pub fn new(path: impl Into<PathBuf>, width_in: f64, height_in: f64, dpi: u32) -> Self {
        Self {
            path: path.into(),
            width_in,
            height_in,
            dpi,
        }
    }

    pub fn pixels(&self) -> (u32, u32) {
        (
            (self.width_in * self.dpi as f64).round() as u32,
            (self.height_in * self.dpi as f64).round() as u32,
        )
    }

    pub fn font(&self, points: f64) -> u32 {
        font_px(points, self.dpi)
    }

    /// Creates the drawing surface, filled white.
    pub fn root(&self) -> Result<Area<'_>> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let root = BitMapBackend::new(&self.path, self.pixels()).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;
        Ok(root)
    }
}

/// Writes the finished surface to disk.
pub fn present(root: &Area<'_>, figure: &Figure) -> Result<PathBuf> {
    root.present().map_err(render_err)?;
    log::info!("saved figure {}", figure.path.display());
    Ok(figure.path.clone())
}

/// Builds a chart in `area` with the axis conventions and titles applied.
pub fn build_chart<'a, 'b>(
    area: &'a Area<'b>,
    x: &AxisSpec,
    y: &AxisSpec,
    titles: &Titles,
    dpi: u32,
) -> Result<Chart<'a, 'b>> {
    let tick_px = font_px(titles.tick_size, dpi);
    let label_px = font_px(titles.label_size, dpi);
    let main_px = font_px(titles.main_size, dpi);
    let side_px = font_px(titles.side_size, dpi);

    let (x_lo, x_hi) = x.plot_range();
    let (y_lo, y_hi) = y.plot_range();

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(font_px(12.0, dpi))
        .x_label_area_size(tick_px * 2 + if titles.x_label.is_some() { label_px * 2 } else { 0 })
        .y_label_area_size(tick_px * 4 + if titles.y_label.is_some() { label_px * 2 } else { 0 });
    if titles.left.is_some() || titles.right.is_some() {
        builder.set_label_area_size(LabelAreaPosition::Top, side_px * 2);
    }
    if let Some(main) = &titles.main {
        builder.caption(main, (FONT, main_px as f64).into_font().style(FontStyle::Bold));
    }

    let mut chart = builder
        .build_cartesian_2d(
            TickedRange::new(x_lo..x_hi, x.key_points()),
            TickedRange::new(y_lo..y_hi, y.key_points()),
        )
        .map_err(render_err)?;

    let x_fmt = |v: &f64| x.label_for(*v);
    let y_fmt = |v: &f64| y.label_for(*v);

    let mut mesh = chart.configure_mesh();
    mesh.disable_mesh()
        .x_labels(x.major.len().max(1))
        .y_labels(y.major.len().max(1))
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .label_style((FONT, tick_px))
        .axis_desc_style((FONT, label_px));
    if let Some(label) = &titles.x_label {
        mesh.x_desc(label);
    }
    if let Some(label) = &titles.y_label {
        mesh.y_desc(label);
    }
    mesh.draw().map_err(render_err)?;

    draw_side_titles(area, &chart, titles, side_px)?;
    Ok(chart)
}

fn draw_side_titles(area: &Area<'_>, chart: &Chart<'_, '_>, titles: &Titles, side_px: u32) -> Result<()> {
    let (x_range, y_range) = chart.plotting_area().get_pixel_range();
    let (base_x, base_y) = area.get_base_pixel();
    let baseline = y_range.start - base_y - (side_px as i32 / 3);

    if let Some(left) = &titles.left {
        let style = TextStyle::from((FONT, side_px as f64).into_font()).pos(Pos::new(HPos::Left, VPos::Bottom));
        area.draw_text(left, &style, (x_range.start - base_x, baseline))
            .map_err(render_err)?;
    }
    if let Some(right) = &titles.right {
        let style = TextStyle::from((FONT, side_px as f64).into_font()).pos(Pos::new(HPos::Right, VPos::Bottom));
        area.draw_text(right, &style, (x_range.end - base_x, baseline))
            .map_err(render_err)?;
    }
    Ok(())
}

/// Draws the full frame with inward major and minor tick marks on all sides.
pub fn draw_frame(chart: &mut Chart<'_, '_>, x: &AxisSpec, y: &AxisSpec) -> Result<()> {
    let (x_lo, x_hi) = x.plot_range();
    let (y_lo, y_hi) = y.plot_range();
    let major_x = (y_hi - y_lo) * 0.015;
    let major_y = (x_hi - x_lo) * 0.015;

    chart
        .draw_series(std::iter::once(Rectangle::new(
            [(x_lo, y_lo), (x_hi, y_hi)],
            BLACK.stroke_width(1),
        )))
        .map_err(render_err)?;

    let mut marks: Vec<Vec<(f64, f64)>> = Vec::new();
    for (values, length) in [(&x.major, major_x), (&x.minor, major_x * 0.5)] {
        for v in values.iter().filter(|v| x.in_limits(**v)) {
            let p = x.to_plot(*v);
            marks.push(vec![(p, y_lo), (p, y_lo + length)]);
            marks.push(vec![(p, y_hi), (p, y_hi - length)]);
        }
    }
    for (values, length) in [(&y.major, major_y), (&y.minor, major_y * 0.5)] {
        for v in values.iter().filter(|v| y.in_limits(**v)) {
            let p = y.to_plot(*v);
            marks.push(vec![(x_lo, p), (x_lo + length, p)]);
            marks.push(vec![(x_hi, p), (x_hi - length, p)]);
        }
    }

    chart
        .draw_series(marks.into_iter().map(|points| PathElement::new(points, BLACK)))
        .map_err(render_err)?;
    Ok(())
}

/// Filled markers at each `(x, y)`.
pub fn draw_scatter(
    chart: &mut Chart<'_, '_>,
    x_axis: &AxisSpec,
    y_axis: &AxisSpec,
    xs: &[f64],
    ys: &[f64],
    radius: u32,
    color: RGBColor,
) -> Result<()> {
    chart
        .draw_series(xs.iter().zip(ys).map(|(&x, &y)| {
            Circle::new((x_axis.to_plot(x), y_axis.to_plot(y)), radius, color.filled())
        }))
        .map_err(render_err)?;
    Ok(())
}

/// Polyline through `(x, y)`.
pub fn draw_line(
    chart: &mut Chart<'_, '_>,
    x_axis: &AxisSpec,
    y_axis: &AxisSpec,
    xs: &[f64],
    ys: &[f64],
    color: RGBColor,
    width: u32,
) -> Result<()> {
    let points: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .map(|(&x, &y)| (x_axis.to_plot(x), y_axis.to_plot(y)))
        .collect();
    chart
        .draw_series(LineSeries::new(points, color.stroke_width(width)))
        .map_err(render_err)?;
    Ok(())
}

/// Colour bands of a filled contour plot
#[derive(Debug, Clone)]
pub struct FillStyle {
    pub levels: Vec<f64>,
    pub colors: Vec<RGBColor>,
    pub extend: Extend,
}

impl FillStyle {
    /// One colour per band, sampled evenly from `colormap`.
    pub fn from_colormap(levels: Vec<f64>, colormap: &Colormap, extend: Extend) -> Result<Self> {
        let bands = extend.band_count(levels.len());
        if bands == 0 {
            return Err(GalleryError::Generic(
                "filled contours need at least two levels".to_string(),
            ));
        }
        Ok(Self {
            colors: colormap.discrete(bands),
            levels,
            extend,
        })
    }

    pub fn color_for(&self, value: f64) -> Option<RGBColor> {
        level_bin(value, &self.levels, self.extend).and_then(|bin| self.colors.get(bin).copied())
    }
}

/// Filled contours by rasterising `sample` over a `columns × rows` grid of
/// cells covering the chart. `sample` receives data-space coordinates.
#[allow(clippy::too_many_arguments)]
pub fn draw_filled<F>(
    chart: &mut Chart<'_, '_>,
    x_axis: &AxisSpec,
    y_axis: &AxisSpec,
    fill: &FillStyle,
    columns: usize,
    rows: usize,
    sample: F,
) -> Result<()>
where
    F: Fn(f64, f64) -> f64 + Sync,
{
    let (x_lo, x_hi) = x_axis.plot_range();
    let (y_lo, y_hi) = y_axis.plot_range();
    let dx = (x_hi - x_lo) / columns as f64;
    let dy = (y_hi - y_lo) / rows as f64;

    let cells: Vec<((f64, f64), (f64, f64), RGBColor)> = (0..rows)
        .into_par_iter()
        .flat_map_iter(|row| {
            let sample = &sample;
            (0..columns).filter_map(move |col| {
                let px = x_lo + (col as f64 + 0.5) * dx;
                let py = y_lo + (row as f64 + 0.5) * dy;
                let value = sample(x_axis.from_plot(px), y_axis.from_plot(py));
                fill.color_for(value).map(|color| {
                    let x0 = x_lo + col as f64 * dx;
                    let y0 = y_lo + row as f64 * dy;
                    ((x0, y0), (x0 + dx, y0 + dy), color)
                })
            })
        })
        .collect();

    log::debug!("rasterised {} filled cells", cells.len());
    chart
        .draw_series(
            cells
                .into_iter()
                .map(|(a, b, color)| Rectangle::new([a, b], color.filled())),
        )
        .map_err(render_err)?;
    Ok(())
}

/// Draws isolines given in data coordinates.
pub fn draw_contour_lines(
    chart: &mut Chart<'_, '_>,
    x_axis: &AxisSpec,
    y_axis: &AxisSpec,
    lines: &[ContourLine],
    color: RGBColor,
    width: u32,
) -> Result<()> {
    chart
        .draw_series(lines.iter().map(|line| {
            let points: Vec<(f64, f64)> = line
                .points
                .iter()
                .map(|&(x, y)| (x_axis.to_plot(x), y_axis.to_plot(y)))
                .collect();
            PathElement::new(points, color.stroke_width(width))
        }))
        .map_err(render_err)?;
    Ok(())
}

/// Draws contour labels on white boxes.
pub fn draw_contour_labels(
    chart: &mut Chart<'_, '_>,
    x_axis: &AxisSpec,
    y_axis: &AxisSpec,
    labels: &[ContourLabel],
    font_size: u32,
) -> Result<()> {
    let style = TextStyle::from((FONT, font_size as f64).into_font()).pos(Pos::new(HPos::Center, VPos::Center));
    chart
        .draw_series(labels.iter().map(|label| {
            let half_w = (label.text.chars().count() as f64 * font_size as f64 * 0.3).ceil() as i32 + 1;
            let half_h = (font_size as f64 * 0.55).ceil() as i32;
            EmptyElement::at((x_axis.to_plot(label.x), y_axis.to_plot(label.y)))
                + Rectangle::new([(-half_w, -half_h), (half_w, half_h)], WHITE.filled())
                + Text::new(label.text.clone(), (0, 0), style.clone())
        }))
        .map_err(render_err)?;
    Ok(())
}

/// Vertical colorbar layout
#[derive(Debug, Clone)]
pub struct ColorbarSpec {
    pub label: Option<String>,
    /// Label every n-th level boundary
    pub label_every: usize,
    pub decimals: usize,
    pub label_size: f64,
    pub tick_size: f64,
    pub draw_edges: bool,
}

impl Default for ColorbarSpec {
    fn default() -> Self {
        Self {
            label: None,
            label_every: 1,
            decimals: 0,
            label_size: 16.0,
            tick_size: 10.0,
            draw_edges: false,
        }
    }
}

/// Draws a vertical colorbar for `fill` into `area`, one equal-height box
/// per band.
pub fn draw_colorbar(area: &Area<'_>, fill: &FillStyle, spec: &ColorbarSpec, dpi: u32) -> Result<()> {
    let bands = fill.colors.len();
    if bands == 0 {
        return Ok(());
    }
    let offset = match fill.extend {
        Extend::Neither => 0.0,
        Extend::Both => 1.0,
    };
    let every = spec.label_every.max(1);
    let boundaries: Vec<(f64, f64)> = fill
        .levels
        .iter()
        .enumerate()
        .filter(|(i, _)| i % every == 0)
        .map(|(i, &level)| (i as f64 + offset, level))
        .collect();

    let tick_px = font_px(spec.tick_size, dpi);
    let label_px = font_px(spec.label_size, dpi);
    let (_, height) = area.dim_in_pixel();

    let mut chart = ChartBuilder::on(area)
        .margin_top((height / 8) as i32)
        .margin_bottom((height / 8) as i32)
        .margin_right(font_px(6.0, dpi) as i32)
        .set_label_area_size(LabelAreaPosition::Right, tick_px * 5 + label_px * 2)
        .build_cartesian_2d(
            TickedRange::new(0f64..1f64, Vec::new()),
            TickedRange::new(0f64..bands as f64, boundaries.iter().map(|b| b.0).collect()),
        )
        .map_err(render_err)?;

    let y_fmt = |v: &f64| {
        boundaries
            .iter()
            .min_by(|a, b| (a.0 - v).abs().total_cmp(&(b.0 - v).abs()))
            .map(|(_, level)| format!("{:.*}", spec.decimals, level))
            .unwrap_or_default()
    };

    let mut mesh = chart.configure_mesh();
    mesh.disable_mesh()
        .disable_x_axis()
        .y_labels(boundaries.len().max(1))
        .y_label_formatter(&y_fmt)
        .label_style((FONT, tick_px))
        .axis_desc_style((FONT, label_px));
    if let Some(label) = &spec.label {
        mesh.y_desc(label);
    }
    mesh.draw().map_err(render_err)?;

    chart
        .draw_series(fill.colors.iter().enumerate().map(|(i, color)| {
            Rectangle::new([(0.0, i as f64), (1.0, i as f64 + 1.0)], color.filled())
        }))
        .map_err(render_err)?;
    if spec.draw_edges {
        chart
            .draw_series((0..bands).map(|i| {
                Rectangle::new([(0.0, i as f64), (1.0, i as f64 + 1.0)], BLACK.stroke_width(1))
            }))
            .map_err(render_err)?;
    } else {
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(0.0, 0.0), (1.0, bands as f64)],
                BLACK.stroke_width(1),
            )))
            .map_err(render_err)?;
    }
    Ok(())
}
