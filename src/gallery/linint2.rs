//! linint2: bilinear regridding of sea surface temperature to a coarse
//! grid, drawn above the original with a shared colorbar.

use crate::colormaps::Colormap;
use crate::config::GalleryConfig;
use crate::contouring::{nice_levels, Extend};
use crate::datafiles::SST;
use crate::errors::{GalleryError, Result};
use crate::field::{Coordinate, GriddedField};
use crate::interpolation::{regrid_field, GridInterpolator};
use crate::netcdf_io::{read_field, FieldSelection, FieldWriter};
use crate::regression::linspace;
use crate::viz::{self, AxisSpec, ColorbarSpec, FillStyle, Figure, TickLabels, Titles};
use std::path::{Path, PathBuf};

/// Resolution of the saved figure, fixed by the reference script
pub const LININT2_DPI: u32 = 300;
pub const OUTPUT_LATS: usize = 24;
pub const OUTPUT_LONS: usize = 72;
const RASTER_COLUMNS: usize = 720;
const RASTER_ROWS: usize = 240;

/// Regrids `sst` onto `OUTPUT_LATS × OUTPUT_LONS` points spanning its own
/// coordinate range.
pub fn coarse_regrid(sst: &GriddedField) -> Result<GriddedField> {
    let (lat_min, lat_max) = sst
        .y
        .bounds()
        .ok_or_else(|| GalleryError::Generic("empty latitude coordinate".to_string()))?;
    let (lon_min, lon_max) = sst
        .x
        .bounds()
        .ok_or_else(|| GalleryError::Generic("empty longitude coordinate".to_string()))?;

    let mut new_lat = Coordinate::new(sst.y.name.clone(), linspace(lat_min, lat_max, OUTPUT_LATS));
    new_lat.units = sst.y.units.clone();
    let mut new_lon = Coordinate::new(sst.x.name.clone(), linspace(lon_min, lon_max, OUTPUT_LONS));
    new_lon.units = sst.x.units.clone();

    regrid_field(sst, false, new_lon, new_lat)
}

pub fn run(config: &GalleryConfig, write_netcdf: Option<&Path>) -> Result<Vec<PathBuf>> {
    let file = config.data_files().open(SST)?;
    let sst = read_field(
        &file,
        "TEMP",
        &FieldSelection::new(vec![0, 0]).with_coordinates("LAT", "LON"),
    )?;
    let regridded = coarse_regrid(&sst)?;
    println!(
        "⚡ Regridded {:?} -> {:?} ({} missing of {})",
        sst.shape(),
        regridded.shape(),
        regridded.missing_count(),
        regridded.data.len()
    );

    if let Some(path) = write_netcdf {
        FieldWriter::new(path).write_field(&regridded, Some((&file, "TEMP")))?;
        println!("✅ Saved regridded field to {}", path.display());
    }

    let levels = nice_levels(-30.0, 30.0, 16)?;
    let fill = FillStyle::from_colormap(levels, &Colormap::jet(), Extend::Neither)?;

    let x_axis = AxisSpec::new(-180.0, 180.0, linspace(-180.0, 180.0, 13))
        .with_minor_per_major(3)
        .with_labels(TickLabels::Longitude { zero_direction: true });
    let y_axis = AxisSpec::new(-60.0, 60.0, linspace(-60.0, 60.0, 5))
        .with_minor_per_major(3)
        .with_labels(TickLabels::Latitude { zero_direction: true });

    let figure = Figure::new(config.output_path("linint2.png"), 10.0, 8.0, LININT2_DPI);
    let root = figure.root()?;
    let (width, _) = figure.pixels();
    let (panels_area, bar_area) = root.split_horizontally((width as f64 * 0.86) as u32);
    let panels = panels_area.split_evenly((2, 1));

    for (panel, (field, title)) in panels.iter().zip([
        (&sst, "Sea Surface Temperature - Original Grid"),
        (&regridded, "linint2 - regrid to coarse grid"),
    ]) {
        let titles = Titles::main(title).with_main_size(14.0).with_tick_size(10.0);
        let mut chart = viz::build_chart(panel, &x_axis, &y_axis, &titles, figure.dpi)?;
        let interpolator = GridInterpolator::for_field(field, false)?;
        viz::draw_filled(
            &mut chart,
            &x_axis,
            &y_axis,
            &fill,
            RASTER_COLUMNS,
            RASTER_ROWS,
            |lon, lat| interpolator.sample(lon, lat),
        )?;
        viz::draw_frame(&mut chart, &x_axis, &y_axis)?;
    }

    let colorbar = ColorbarSpec {
        label: Some("Temperature (°C)".to_string()),
        ..ColorbarSpec::default()
    };
    viz::draw_colorbar(&bar_area, &fill, &colorbar, figure.dpi)?;

    Ok(vec![viz::present(&root, &figure)?])
}
