//! regress_1: least-squares regression line through the Brownlee data,
//! without and with a 95 % confidence band.

use crate::config::GalleryConfig;
use crate::errors::Result;
use crate::regression::{fit_linear, linspace, BandMethod, ConfidenceBand, LinearFit, SamplePair};
use crate::viz::{self, arange, AxisSpec, Figure, Titles};
use plotters::style::{RGBColor, BLACK};
use std::path::PathBuf;

pub const BROWNLEE_X: [f64; 18] = [
    1190.0, 1455.0, 1550.0, 1730.0, 1745.0, 1770.0, 1900.0, 1920.0, 1960.0, 2295.0, 2335.0, 2490.0,
    2720.0, 2710.0, 2530.0, 2900.0, 2760.0, 3010.0,
];
pub const BROWNLEE_Y: [f64; 18] = [
    1115.0, 1425.0, 1515.0, 1795.0, 1715.0, 1710.0, 1830.0, 1920.0, 1970.0, 2300.0, 2280.0, 2520.0,
    2630.0, 2740.0, 2390.0, 2800.0, 2630.0, 2970.0,
];

/// Significance level of the band
pub const ALPHA: f64 = 0.05;
const GRID_POINTS: usize = 50;
const CORNFLOWER_BLUE: RGBColor = RGBColor(100, 149, 237);

/// Fit, evaluation grid and band shared by both figures
pub struct RegressionSummary {
    pub samples: SamplePair,
    pub fit: LinearFit,
    pub grid: Vec<f64>,
    pub band: ConfidenceBand,
}

/// Fits the Brownlee data and evaluates the band the way the reference
/// figure does.
pub fn brownlee_regression() -> Result<RegressionSummary> {
    let samples = SamplePair::new(BROWNLEE_X.to_vec(), BROWNLEE_Y.to_vec())?;
    let fit = fit_linear(&samples)?;
    let (x_min, x_max) = samples.x_range().unwrap_or((0.0, 1.0));
    let grid = linspace(x_min.trunc(), x_max.trunc(), GRID_POINTS);
    let band = fit.confidence_band(&samples, &grid, ALPHA, BandMethod::Reference)?;
    Ok(RegressionSummary {
        samples,
        fit,
        grid,
        band,
    })
}

pub fn run(config: &GalleryConfig) -> Result<Vec<PathBuf>> {
    let summary = brownlee_regression()?;
    let fit = &summary.fit;

    println!("⚡ Least-squares fit of {} samples", fit.n);
    println!("   y = {:.4} x + {:.4}", fit.slope, fit.intercept);
    println!("   residual std: {:.4}", fit.residual_std()?);
    println!(
        "   t({:.2}, {}) = {:.4}, band half-width = {:.4}",
        1.0 - ALPHA,
        fit.degrees_of_freedom()?,
        summary.band.t_value,
        summary.band.half_width.first().copied().unwrap_or(0.0)
    );
    log::debug!(
        "relative chi-square: {:.6}",
        fit.relative_chi_square(&summary.samples)?
    );

    let plain = draw(
        config,
        "regress_1a.png",
        &summary,
        None,
        AxisSpec::new(900.0, 3000.0, arange(900.0, 3001.0, 300.0)).with_minor_per_major(3),
    )?;
    let with_band = draw(
        config,
        "regress_1a_ci.png",
        &summary,
        Some(&summary.band),
        AxisSpec::new(800.0, 3600.0, arange(800.0, 3601.0, 400.0)).with_minor_per_major(4),
    )?;
    Ok(vec![plain, with_band])
}

fn draw(
    config: &GalleryConfig,
    file_name: &str,
    summary: &RegressionSummary,
    band: Option<&ConfidenceBand>,
    y_axis: AxisSpec,
) -> Result<PathBuf> {
    let figure = Figure::new(config.output_path(file_name), 6.0, 6.0, config.dpi);
    let root = figure.root()?;

    let x_axis = AxisSpec::new(1190.0, 3010.0, arange(1200.0, 3010.0, 400.0)).with_minor_per_major(4);
    let titles = Titles::main("Brownlee Data").with_axis_labels("X", "Y");

    let mut chart = viz::build_chart(&root, &x_axis, &y_axis, &titles, figure.dpi)?;

    let y_regress = summary.fit.predict_all(&summary.grid);
    viz::draw_line(&mut chart, &x_axis, &y_axis, &summary.grid, &y_regress, BLACK, 1)?;
    if let Some(band) = band {
        viz::draw_line(&mut chart, &x_axis, &y_axis, &band.x, &band.lower(), CORNFLOWER_BLUE, 1)?;
        viz::draw_line(&mut chart, &x_axis, &y_axis, &band.x, &band.upper(), CORNFLOWER_BLUE, 1)?;
    }
    viz::draw_scatter(
        &mut chart,
        &x_axis,
        &y_axis,
        &summary.samples.x,
        &summary.samples.y,
        figure.font(2.2),
        BLACK,
    )?;
    viz::draw_frame(&mut chart, &x_axis, &y_axis)?;

    viz::present(&root, &figure)
}
