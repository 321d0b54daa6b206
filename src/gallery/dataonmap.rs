//! dataonmap_10: WRF 2 m water vapour on its native Lambert conformal grid
//! with latitude/longitude labels and a colorbar.

use crate::colormaps::Colormap;
use crate::config::GalleryConfig;
use crate::contouring::{nice_levels, Extend};
use crate::datafiles::WRFOUT;
use crate::errors::{GalleryError, Result};
use crate::interpolation::GridInterpolator;
use crate::netcdf_io::{global_attribute_f64, read_field, FieldSelection};
use crate::projection::LambertConformal;
use crate::viz::{self, arange, lat_label, lon_label, AxisSpec, ColorbarSpec, FillStyle, Figure, TickLabels, Titles};
use netcdf::File;
use std::path::PathBuf;

const RASTER: usize = 500;
const EDGE_SAMPLES: usize = 400;

/// Builds the projection from WRF global attributes for a grid of
/// `nx × ny` mass points.
pub fn wrf_projection(file: &File, nx: usize, ny: usize) -> Result<LambertConformal> {
    let map_proj = global_attribute_f64(file, "MAP_PROJ").unwrap_or(1.0);
    if map_proj != 1.0 {
        return Err(GalleryError::Generic(format!(
            "Only Lambert conformal WRF grids (MAP_PROJ=1) are supported, found {}",
            map_proj
        )));
    }
    LambertConformal::new(
        global_attribute_f64(file, "TRUELAT1")?,
        global_attribute_f64(file, "TRUELAT2")?,
        global_attribute_f64(file, "STAND_LON")?,
        global_attribute_f64(file, "CEN_LAT")?,
        global_attribute_f64(file, "CEN_LON")?,
        global_attribute_f64(file, "DX")?,
        global_attribute_f64(file, "DY")?,
        nx,
        ny,
    )
}

/// Positions along one projected edge where a geographic line crosses it.
///
/// `along` runs from `start` to `end`; `value_at` gives the latitude or
/// longitude at each position. Returns `(position, target)` pairs.
pub fn edge_crossings<F>(start: f64, end: f64, targets: &[f64], value_at: F) -> Vec<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    let positions: Vec<f64> = (0..=EDGE_SAMPLES)
        .map(|k| start + (end - start) * k as f64 / EDGE_SAMPLES as f64)
        .collect();
    let values: Vec<f64> = positions.iter().map(|&p| value_at(p)).collect();

    let mut crossings = Vec::new();
    for &target in targets {
        for k in 0..EDGE_SAMPLES {
            let (a, b) = (values[k] - target, values[k + 1] - target);
            if a == 0.0 || a.signum() != b.signum() {
                let frac = if a == b { 0.0 } else { a / (a - b) };
                crossings.push((positions[k] + frac * (positions[k + 1] - positions[k]), target));
                break;
            }
        }
    }
    crossings
}

pub fn run(config: &GalleryConfig) -> Result<Vec<PathBuf>> {
    let file = config.data_files().open(WRFOUT)?;
    let field = read_field(&file, "Q2", &FieldSelection::new(vec![0]))?;
    let (ny, nx) = field.shape();
    let proj = wrf_projection(&file, nx, ny)?;

    let (vmin, vmax) = field
        .value_range()
        .ok_or_else(|| GalleryError::Generic("Q2 has no valid values".to_string()))?;
    let levels = nice_levels(vmin, vmax, 16)?;
    println!(
        "⚡ Q2 range {:.5} .. {:.5} kg/kg, {} levels on a {}x{} grid (cone {:.4})",
        vmin,
        vmax,
        levels.len(),
        ny,
        nx,
        proj.cone()
    );

    let (x_min, x_max, y_min, y_max) = proj.extent();
    let lon_ticks = edge_crossings(x_min, x_max, &arange(-105.0, -80.0, 5.0), |x| proj.inverse(x, y_min).1);
    let lat_ticks = edge_crossings(y_min, y_max, &arange(18.0, 35.0, 2.0), |y| proj.inverse(x_min, y).0);

    let x_axis = AxisSpec::new(x_min, x_max, lon_ticks.iter().map(|t| t.0).collect()).with_labels(
        TickLabels::Custom(lon_ticks.iter().map(|t| lon_label(t.1, false)).collect()),
    );
    let y_axis = AxisSpec::new(y_min, y_max, lat_ticks.iter().map(|t| t.0).collect()).with_labels(
        TickLabels::Custom(lat_ticks.iter().map(|t| lat_label(t.1, false)).collect()),
    );

    let figure = Figure::new(config.output_path("dataonmap_10.png"), 10.0, 10.0, config.dpi);
    let root = figure.root()?;
    let (width, _) = figure.pixels();
    let (map_area, bar_area) = root.split_horizontally((width as f64 * 0.84) as u32);

    let titles = Titles::main("WRF data on native grid")
        .with_main_size(16.0)
        .with_left("QV at 2 M", 14.0)
        .with_tick_size(15.0);
    let mut chart = viz::build_chart(&map_area, &x_axis, &y_axis, &titles, figure.dpi)?;

    let fill = FillStyle::from_colormap(levels, &Colormap::magma(), Extend::Neither)?;
    let interpolator = GridInterpolator::for_field(&field, false)?;
    viz::draw_filled(&mut chart, &x_axis, &y_axis, &fill, RASTER, RASTER, |x, y| {
        let i = x / proj.dx + (nx as f64 - 1.0) / 2.0;
        let j = y / proj.dy + (ny as f64 - 1.0) / 2.0;
        interpolator.sample(i, j)
    })?;
    viz::draw_frame(&mut chart, &x_axis, &y_axis)?;

    let colorbar = ColorbarSpec {
        decimals: 4,
        draw_edges: true,
        ..ColorbarSpec::default()
    };
    viz::draw_colorbar(&bar_area, &fill, &colorbar, figure.dpi)?;

    Ok(vec![viz::present(&root, &figure)?])
}
