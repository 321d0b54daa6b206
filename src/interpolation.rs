//! Bilinear interpolation between rectilinear grids
//!
//! `linint2` regrids a field from one rectilinear grid onto another using the
//! four source points surrounding each output point. Source coordinates may
//! run in either direction. Output points outside the source grid, or next to
//! a missing source value, are missing (`NaN`).

use crate::errors::{GalleryError, Result};
use crate::field::{Coordinate, GriddedField, Monotonic};
use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;

/// Period used when the x axis is treated as cyclic (degrees of longitude)
pub const CYCLIC_PERIOD: f64 = 360.0;

/// Pair of neighbouring indices and the weight of the upper one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub lo: usize,
    pub hi: usize,
    pub weight: f64,
}

/// Locates `target` between two neighbouring coordinate values.
///
/// With `cyclic`, targets beyond either end wrap by [`CYCLIC_PERIOD`] and the
/// gap between the last and first value is bridged.
pub fn bracket(values: &[f64], direction: Monotonic, target: f64, cyclic: bool) -> Option<Bracket> {
    if !target.is_finite() || values.len() < 2 {
        return None;
    }
    let sign = match direction {
        Monotonic::Increasing => 1.0,
        Monotonic::Decreasing => -1.0,
    };
    let n = values.len();
    let u = |i: usize| sign * values[i];
    let t = sign * target;
    let (first, last) = (u(0), u(n - 1));

    if t >= first && t <= last {
        let (mut lo, mut hi) = (0, n - 1);
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            if u(mid) <= t {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        let weight = (t - u(lo)) / (u(hi) - u(lo));
        return Some(Bracket { lo, hi, weight });
    }

    if !cyclic || last - first >= CYCLIC_PERIOD {
        return None;
    }

    let wrapped = first + (t - first).rem_euclid(CYCLIC_PERIOD);
    if wrapped <= last {
        bracket(values, direction, sign * wrapped, false)
    } else {
        let weight = (wrapped - last) / (first + CYCLIC_PERIOD - last);
        Some(Bracket {
            lo: n - 1,
            hi: 0,
            weight,
        })
    }
}

/// Bilinear sampler over one source grid
pub struct GridInterpolator<'a> {
    x: &'a [f64],
    y: &'a [f64],
    data: ArrayView2<'a, f64>,
    x_dir: Monotonic,
    y_dir: Monotonic,
    cyclic: bool,
}

impl<'a> GridInterpolator<'a> {
    /// Validates the grid: `data` is `(y.len(), x.len())` and both
    /// coordinates are strictly monotonic.
    pub fn new(x: &'a Coordinate, y: &'a Coordinate, data: ArrayView2<'a, f64>, cyclic: bool) -> Result<Self> {
        let x_dir = x.monotonic()?;
        let y_dir = y.monotonic()?;
        if data.dim() != (y.len(), x.len()) {
            return Err(GalleryError::ShapeMismatch {
                expected: format!("({}, {})", y.len(), x.len()),
                found: format!("{:?}", data.dim()),
            });
        }
        Ok(Self {
            x: &x.values,
            y: &y.values,
            data,
            x_dir,
            y_dir,
            cyclic,
        })
    }

    pub fn for_field(field: &'a GriddedField, cyclic: bool) -> Result<Self> {
        Self::new(&field.x, &field.y, field.data.view(), cyclic)
    }

    /// Value at `(x, y)`, `NaN` when outside the grid or next to a missing
    /// source value that carries weight.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let (Some(bx), Some(by)) = (
            bracket(self.x, self.x_dir, x, self.cyclic),
            bracket(self.y, self.y_dir, y, false),
        ) else {
            return f64::NAN;
        };
        self.combine(&bx, &by)
    }

    fn combine(&self, bx: &Bracket, by: &Bracket) -> f64 {
        let corners = [
            (by.lo, bx.lo, (1.0 - by.weight) * (1.0 - bx.weight)),
            (by.lo, bx.hi, (1.0 - by.weight) * bx.weight),
            (by.hi, bx.lo, by.weight * (1.0 - bx.weight)),
            (by.hi, bx.hi, by.weight * bx.weight),
        ];
        let mut value = 0.0;
        for (row, col, weight) in corners {
            if weight == 0.0 {
                continue;
            }
            let v = self.data[[row, col]];
            if !v.is_finite() {
                return f64::NAN;
            }
            value += weight * v;
        }
        value
    }
}

/// Interpolates `fi` (shape `(yi.len(), xi.len())`) onto the grid `(yo, xo)`.
///
/// `cyclic` treats `xi` as periodic longitude.
pub fn linint2<'a>(
    xi: &'a Coordinate,
    yi: &'a Coordinate,
    fi: ArrayView2<'a, f64>,
    cyclic: bool,
    xo: &[f64],
    yo: &[f64],
) -> Result<Array2<f64>> {
    let interpolator = GridInterpolator::new(xi, yi, fi, cyclic)?;

    let x_brackets: Vec<Option<Bracket>> = xo
        .iter()
        .map(|&x| bracket(interpolator.x, interpolator.x_dir, x, cyclic))
        .collect();

    let rows: Vec<Vec<f64>> = yo
        .par_iter()
        .map(|&y| {
            let by = bracket(interpolator.y, interpolator.y_dir, y, false);
            x_brackets
                .iter()
                .map(|bx| match (bx, &by) {
                    (Some(bx), Some(by)) => interpolator.combine(bx, by),
                    _ => f64::NAN,
                })
                .collect()
        })
        .collect();

    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Ok(Array2::from_shape_vec((yo.len(), xo.len()), flat)?)
}

/// Regrids a whole field, keeping its metadata.
pub fn regrid_field(field: &GriddedField, cyclic: bool, xo: Coordinate, yo: Coordinate) -> Result<GriddedField> {
    let data = linint2(&field.x, &field.y, field.data.view(), cyclic, &xo.values, &yo.values)?;
    let mut out = GriddedField::new(field.name.clone(), yo, xo, data)?;
    out.long_name = field.long_name.clone();
    out.units = field.units.clone();
    Ok(out)
}

/// Interpolates at scattered `(xo[k], yo[k])` points.
pub fn linint2_points<'a>(
    xi: &'a Coordinate,
    yi: &'a Coordinate,
    fi: ArrayView2<'a, f64>,
    cyclic: bool,
    xo: &[f64],
    yo: &[f64],
) -> Result<Vec<f64>> {
    if xo.len() != yo.len() {
        return Err(GalleryError::ShapeMismatch {
            expected: format!("{} y points", xo.len()),
            found: format!("{} y points", yo.len()),
        });
    }
    let interpolator = GridInterpolator::new(xi, yi, fi, cyclic)?;
    Ok(xo
        .par_iter()
        .zip(yo.par_iter())
        .map(|(&x, &y)| interpolator.sample(x, y))
        .collect())
}

/// 1-D linear interpolation of `fi` (on `xi`) at `xo`.
pub fn linint1(xi: &Coordinate, fi: &[f64], xo: &[f64]) -> Result<Vec<f64>> {
    let direction = xi.monotonic()?;
    if fi.len() != xi.len() {
        return Err(GalleryError::ShapeMismatch {
            expected: format!("{} values", xi.len()),
            found: format!("{} values", fi.len()),
        });
    }
    Ok(xo
        .iter()
        .map(|&x| match bracket(&xi.values, direction, x, false) {
            Some(b) if b.weight == 0.0 => fi[b.lo],
            Some(b) if b.weight == 1.0 => fi[b.hi],
            Some(b) => (1.0 - b.weight) * fi[b.lo] + b.weight * fi[b.hi],
            None => f64::NAN,
        })
        .collect())
}

/// Maps a fractional grid index onto coordinate values, extrapolating
/// linearly past either end.
pub fn index_to_coordinate(values: &[f64], index: f64) -> f64 {
    match values.len() {
        0 => f64::NAN,
        1 => values[0],
        n => {
            let lo = (index.floor().max(0.0) as usize).min(n - 2);
            let frac = index - lo as f64;
            values[lo] + frac * (values[lo + 1] - values[lo])
        }
    }
}
