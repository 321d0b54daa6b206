//! h_lat_6: pressure/latitude cross-section of zonal wind with filled and
//! labelled line contours on a logarithmic pressure axis.

use crate::colormaps::Colormap;
use crate::config::GalleryConfig;
use crate::contouring::{contour_labels, contour_lines, linear_levels, Extend};
use crate::datafiles::MXCLIM;
use crate::errors::Result;
use crate::interpolation::GridInterpolator;
use crate::netcdf_io::{read_field, FieldSelection};
use crate::viz::{self, AxisSpec, FillStyle, Figure, TickLabels, Titles, Transform};
use plotters::style::BLACK;
use std::path::PathBuf;

const RASTER: usize = 480;

pub fn run(config: &GalleryConfig) -> Result<Vec<PathBuf>> {
    let file = config.data_files().open(MXCLIM)?;
    let field = read_field(&file, "U", &FieldSelection::new(vec![0]))?;

    let levels = linear_levels(-55.0, 55.0, 23);
    let lines = contour_lines(&field, &levels)?;
    let labels = contour_labels(&lines, 8);
    println!(
        "⚡ Contoured '{}' at {} levels: {} line segments",
        field.name,
        levels.len(),
        lines.len()
    );

    let (lat_min, lat_max) = field.x.bounds().unwrap_or((-90.0, 90.0));
    let (lev_min, lev_max) = field.y.bounds().unwrap_or((10.0, 1000.0));

    let x_axis = AxisSpec::new(lat_min, lat_max, linear_levels(-60.0, 60.0, 5))
        .with_labels(TickLabels::Custom(
            ["60S", "30S", "0", "30N", "60N"].iter().map(|s| s.to_string()).collect(),
        ));
    let y_axis = AxisSpec::new(lev_max, lev_min, field.y.values.clone())
        .with_transform(Transform::NegLog10)
        .with_labels(TickLabels::Plain { decimals: 0 });

    let figure = Figure::new(config.output_path("h_lat_6.png"), 8.0, 8.0, config.dpi);
    let root = figure.root()?;
    let titles = Titles::default();
    let mut chart = viz::build_chart(&root, &x_axis, &y_axis, &titles, figure.dpi)?;

    let fill = FillStyle::from_colormap(levels.clone(), &Colormap::bl_wh_re(), Extend::Both)?;
    let interpolator = GridInterpolator::for_field(&field, false)?;
    viz::draw_filled(&mut chart, &x_axis, &y_axis, &fill, RASTER, RASTER, |lat, lev| {
        interpolator.sample(lat, lev)
    })?;

    viz::draw_contour_lines(&mut chart, &x_axis, &y_axis, &lines, BLACK, 1)?;
    viz::draw_contour_labels(&mut chart, &x_axis, &y_axis, &labels, figure.font(10.0))?;
    viz::draw_frame(&mut chart, &x_axis, &y_axis)?;

    Ok(vec![viz::present(&root, &figure)?])
}
