//! In-memory gridded fields and their coordinate axes

use crate::errors::{GalleryError, Result};
use ndarray::Array2;

/// Direction of a strictly monotonic coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Monotonic {
    Increasing,
    Decreasing,
}

/// A named 1-D coordinate vector
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinate {
    pub name: String,
    pub units: Option<String>,
    pub values: Vec<f64>,
}

impl Coordinate {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            units: None,
            values,
        }
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    /// Index coordinate `0, 1, ..., len - 1`.
    pub fn index(name: impl Into<String>, len: usize) -> Self {
        Self::new(name, (0..len).map(|i| i as f64).collect())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Smallest and largest value, ignoring order.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        let first = *self.values.first()?;
        let last = *self.values.last()?;
        Some((first.min(last), first.max(last)))
    }

    /// Checks that the values are finite and strictly monotonic, with at
    /// least two points.
    pub fn monotonic(&self) -> Result<Monotonic> {
        if self.values.len() < 2 {
            return Err(self.invalid("needs at least two points"));
        }
        if self.values.iter().any(|v| !v.is_finite()) {
            return Err(self.invalid("contains non-finite values"));
        }
        let increasing = self.values.windows(2).all(|w| w[1] > w[0]);
        let decreasing = self.values.windows(2).all(|w| w[1] < w[0]);
        match (increasing, decreasing) {
            (true, _) => Ok(Monotonic::Increasing),
            (_, true) => Ok(Monotonic::Decreasing),
            _ => Err(self.invalid("values are not strictly monotonic")),
        }
    }

    fn invalid(&self, message: &str) -> GalleryError {
        GalleryError::InvalidCoordinate {
            name: self.name.clone(),
            message: message.to_string(),
        }
    }
}

/// A 2-D field with its `y` (row) and `x` (column) coordinates.
///
/// Missing values are stored as `NaN`.
#[derive(Debug, Clone)]
pub struct GriddedField {
    pub name: String,
    pub long_name: Option<String>,
    pub units: Option<String>,
    pub y: Coordinate,
    pub x: Coordinate,
    pub data: Array2<f64>,
}

impl GriddedField {
    pub fn new(name: impl Into<String>, y: Coordinate, x: Coordinate, data: Array2<f64>) -> Result<Self> {
        let expected = (y.len(), x.len());
        if data.dim() != expected {
            return Err(GalleryError::ShapeMismatch {
                expected: format!("{:?} ({} × {})", expected, y.name, x.name),
                found: format!("{:?}", data.dim()),
            });
        }
        Ok(Self {
            name: name.into(),
            long_name: None,
            units: None,
            y,
            x,
            data,
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Minimum and maximum over the non-missing values.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let (min, max) = self
            .data
            .iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        (min <= max).then_some((min, max))
    }

    pub fn missing_count(&self) -> usize {
        self.data.iter().filter(|v| !v.is_finite()).count()
    }

    /// Label used in titles, `long_name` when present.
    pub fn display_name(&self) -> &str {
        self.long_name.as_deref().unwrap_or(&self.name)
    }
}
