//! Contour levels, isolines and filled-band classification
//!
//! Isolines are traced with marching squares in grid-index space and then
//! mapped onto the field's coordinates. This keeps non-uniform axes such as
//! pressure levels exact.

use crate::errors::{GalleryError, Result};
use crate::field::GriddedField;
use crate::interpolation::index_to_coordinate;
use contour::ContourBuilder;

/// How values outside the first and last level are filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extend {
    /// Values outside the levels are left unfilled
    #[default]
    Neither,
    /// Values below the first or above the last level get their own band
    Both,
}

impl Extend {
    /// Number of colour bands for `level_count` boundaries.
    pub fn band_count(self, level_count: usize) -> usize {
        match self {
            Extend::Neither => level_count.saturating_sub(1),
            Extend::Both => level_count + 1,
        }
    }
}

/// One isoline in coordinate space
#[derive(Debug, Clone, PartialEq)]
pub struct ContourLine {
    pub level: f64,
    pub points: Vec<(f64, f64)>,
}

/// Text placed on an isoline
#[derive(Debug, Clone, PartialEq)]
pub struct ContourLabel {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

/// `count` evenly spaced levels from `min` to `max` inclusive.
pub fn linear_levels(min: f64, max: f64, count: usize) -> Vec<f64> {
    crate::regression::linspace(min, max, count)
}

/// Levels on a 1, 2, 2.5, 5 × 10^k step covering `[min, max]` with at most
/// `max_bands` bands.
pub fn nice_levels(min: f64, max: f64, max_bands: usize) -> Result<Vec<f64>> {
    if !(min.is_finite() && max.is_finite()) || max_bands == 0 {
        return Err(GalleryError::Generic(format!(
            "Cannot choose levels for range [{}, {}] with {} bands",
            min, max, max_bands
        )));
    }
    if max <= min {
        return Ok(vec![min]);
    }

    let raw_step = (max - min) / max_bands as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    for multiple in [1.0, 2.0, 2.5, 5.0, 10.0, 20.0] {
        let step = multiple * magnitude;
        let start = (min / step).floor() * step;
        let end = (max / step).ceil() * step;
        let bands = ((end - start) / step).round() as usize;
        if bands <= max_bands {
            return Ok((0..=bands).map(|i| start + step * i as f64).collect());
        }
    }

    Ok(linear_levels(min, max, max_bands + 1))
}

/// Band index of `value` among `levels`.
///
/// With [`Extend::Both`], band 0 is below the first level and band
/// `levels.len()` is above the last. With [`Extend::Neither`], band `i` spans
/// `levels[i]..levels[i + 1]`, the last level belongs to the top band, and
/// values outside get no band.
pub fn level_bin(value: f64, levels: &[f64], extend: Extend) -> Option<usize> {
    if !value.is_finite() || levels.is_empty() {
        return None;
    }
    let above = levels.partition_point(|&level| level <= value);
    match extend {
        Extend::Both => Some(above),
        Extend::Neither => {
            let last = levels.len() - 1;
            if value < levels[0] || value > levels[last] || last == 0 {
                None
            } else {
                Some((above - 1).min(last - 1))
            }
        }
    }
}

/// Traces isolines of `field` at each level.
///
/// Segments that touch missing values or leave the grid are dropped, so a
/// level can produce several disjoint lines.
pub fn contour_lines(field: &GriddedField, levels: &[f64]) -> Result<Vec<ContourLine>> {
    let (ny, nx) = field.shape();
    if nx < 2 || ny < 2 {
        return Err(GalleryError::InvalidSelection {
            message: format!("contouring needs a 2x2 grid at least, got {}x{}", ny, nx),
        });
    }

    // Values sit at origin + (i + 0.5) * step, so -0.5 puts them on integer indices
    let builder = ContourBuilder::new(nx, ny, true)
        .x_origin(-0.5)
        .y_origin(-0.5)
        .x_step(1.0)
        .y_step(1.0);

    let values: Vec<f64> = field.data.iter().cloned().collect();
    let traced = builder
        .lines(&values, levels)
        .map_err(|e| GalleryError::Generic(format!("contour tracing failed: {:?}", e)))?;

    let max_x = (nx - 1) as f64;
    let max_y = (ny - 1) as f64;
    let inside = |x: f64, y: f64| {
        const EPS: f64 = 1e-9;
        x.is_finite() && y.is_finite() && x >= -EPS && y >= -EPS && x <= max_x + EPS && y <= max_y + EPS
    };

    let mut lines = Vec::new();
    for line in traced {
        let level = line.threshold();
        for line_string in &line.geometry().0 {
            let mut current: Vec<(f64, f64)> = Vec::new();
            for coord in &line_string.0 {
                if inside(coord.x, coord.y) {
                    current.push((
                        index_to_coordinate(&field.x.values, coord.x),
                        index_to_coordinate(&field.y.values, coord.y),
                    ));
                } else if current.len() > 1 {
                    lines.push(ContourLine {
                        level,
                        points: std::mem::take(&mut current),
                    });
                } else {
                    current.clear();
                }
            }
            if current.len() > 1 {
                lines.push(ContourLine {
                    level,
                    points: current,
                });
            }
        }
    }

    log::debug!(
        "traced {} isoline segments for {} levels of '{}'",
        lines.len(),
        levels.len(),
        field.name
    );
    Ok(lines)
}

/// Integer label text, truncating like `%d`.
pub fn format_level(level: f64) -> String {
    format!("{}", level.trunc() as i64)
}

/// One label at the middle vertex of every isoline with at least
/// `min_points` vertices.
pub fn contour_labels(lines: &[ContourLine], min_points: usize) -> Vec<ContourLabel> {
    lines
        .iter()
        .filter(|line| line.points.len() >= min_points.max(1))
        .map(|line| {
            let (x, y) = line.points[line.points.len() / 2];
            ContourLabel {
                x,
                y,
                text: format_level(line.level),
            }
        })
        .collect()
}
