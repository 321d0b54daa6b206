//! NetCDF I/O: reading 2-D slabs into gridded fields and writing results
//!
//! Fields are read as `f64` with CF packing (`scale_factor`, `add_offset`)
//! applied and `_FillValue`/`missing_value` masked to `NaN`.

use crate::errors::{GalleryError, Result};
use crate::field::{Coordinate, GriddedField};
use chrono::Utc;
use ndarray::{Array1, Array2};
use netcdf::{create, AttributeValue, File, Variable};
use std::ops::Range;
use std::{fs, path::Path};

/// Which 2-D slab of a variable to read and where its coordinates live
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSelection {
    /// Fixed indices for every dimension except the trailing two
    pub leading: Vec<usize>,
    /// Coordinate variable for the row (y) axis, if not named like the dimension
    pub y_coordinate: Option<String>,
    /// Coordinate variable for the column (x) axis, if not named like the dimension
    pub x_coordinate: Option<String>,
}

impl FieldSelection {
    pub fn new(leading: Vec<usize>) -> Self {
        Self {
            leading,
            ..Self::default()
        }
    }

    pub fn with_coordinates(mut self, y: impl Into<String>, x: impl Into<String>) -> Self {
        self.y_coordinate = Some(y.into());
        self.x_coordinate = Some(x.into());
        self
    }
}

/// Numeric attribute value as `f64` (first element for arrays).
pub fn attribute_as_f64(value: &AttributeValue) -> Option<f64> {
    match value {
        AttributeValue::Double(v) => Some(*v),
        AttributeValue::Float(v) => Some(*v as f64),
        AttributeValue::Int(v) => Some(*v as f64),
        AttributeValue::Short(v) => Some(*v as f64),
        AttributeValue::Longlong(v) => Some(*v as f64),
        AttributeValue::Doubles(v) => v.first().copied(),
        AttributeValue::Floats(v) => v.first().map(|&x| x as f64),
        AttributeValue::Ints(v) => v.first().map(|&x| x as f64),
        AttributeValue::Shorts(v) => v.first().map(|&x| x as f64),
        _ => None,
    }
}

/// Numeric attribute of a variable.
pub fn variable_attribute_f64(var: &Variable, name: &str) -> Option<f64> {
    let value = var.attribute(name)?.value().ok()?;
    attribute_as_f64(&value)
}

/// String attribute of a variable.
pub fn variable_attribute_str(var: &Variable, name: &str) -> Option<String> {
    match var.attribute(name)?.value().ok()? {
        AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

/// Numeric global attribute, e.g. WRF's `TRUELAT1`.
pub fn global_attribute_f64(file: &File, name: &str) -> Result<f64> {
    let attr = file
        .attribute(name)
        .ok_or_else(|| GalleryError::Generic(format!("Global attribute '{}' not found", name)))?;
    attribute_as_f64(&attr.value()?)
        .ok_or_else(|| GalleryError::Generic(format!("Global attribute '{}' is not numeric", name)))
}

/// Reads a 1-D coordinate variable.
pub fn read_coordinate(file: &File, name: &str) -> Result<Coordinate> {
    let var = file
        .variable(name)
        .ok_or_else(|| GalleryError::VariableNotFound {
            var: name.to_string(),
        })?;
    if var.dimensions().len() != 1 {
        return Err(GalleryError::InvalidCoordinate {
            name: name.to_string(),
            message: format!("expected 1 dimension, found {}", var.dimensions().len()),
        });
    }
    let values = unpack(&var, var.get_values::<f64, _>(..)?);
    let mut coordinate = Coordinate::new(name, values);
    coordinate.units = variable_attribute_str(&var, "units");
    Ok(coordinate)
}

/// Reads the 2-D slab described by `selection` from variable `var_name`.
pub fn read_field(file: &File, var_name: &str, selection: &FieldSelection) -> Result<GriddedField> {
    let var = file
        .variable(var_name)
        .ok_or_else(|| GalleryError::VariableNotFound {
            var: var_name.to_string(),
        })?;

    let dim_names: Vec<String> = var.dimensions().iter().map(|d| d.name().to_string()).collect();
    let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
    let rank = shape.len();

    if rank < 2 {
        return Err(GalleryError::InvalidSelection {
            message: format!("variable '{}' has {} dimensions, need at least 2", var_name, rank),
        });
    }
    if selection.leading.len() != rank - 2 {
        return Err(GalleryError::InvalidSelection {
            message: format!(
                "variable '{}' [{}] needs {} leading indices, got {}",
                var_name,
                dim_names.join(", "),
                rank - 2,
                selection.leading.len()
            ),
        });
    }

    let mut ranges: Vec<Range<usize>> = Vec::with_capacity(rank);
    for (i, &index) in selection.leading.iter().enumerate() {
        if index >= shape[i] {
            return Err(GalleryError::InvalidSelection {
                message: format!(
                    "index {} out of range for dimension '{}' (size {})",
                    index, dim_names[i], shape[i]
                ),
            });
        }
        ranges.push(index..index + 1);
    }
    let (ny, nx) = (shape[rank - 2], shape[rank - 1]);
    ranges.push(0..ny);
    ranges.push(0..nx);

    let raw: Vec<f64> = match ranges.len() {
        2 => var.get_values::<f64, _>((ranges[0].clone(), ranges[1].clone()))?,
        3 => var.get_values::<f64, _>((ranges[0].clone(), ranges[1].clone(), ranges[2].clone()))?,
        4 => var.get_values::<f64, _>((
            ranges[0].clone(),
            ranges[1].clone(),
            ranges[2].clone(),
            ranges[3].clone(),
        ))?,
        _ => {
            return Err(GalleryError::InvalidSelection {
                message: "Unsupported number of dimensions for field selection (max 4)".to_string(),
            })
        }
    };

    let data = Array2::from_shape_vec((ny, nx), unpack(&var, raw))?;

    let y = axis_coordinate(file, selection.y_coordinate.as_deref(), &dim_names[rank - 2], ny)?;
    let x = axis_coordinate(file, selection.x_coordinate.as_deref(), &dim_names[rank - 1], nx)?;

    let mut field = GriddedField::new(var_name, y, x, data)?;
    field.long_name = variable_attribute_str(&var, "long_name")
        .or_else(|| variable_attribute_str(&var, "description"));
    field.units = variable_attribute_str(&var, "units");

    log::info!(
        "loaded '{}' slab {:?} with shape ({}, {}), {} missing",
        var_name,
        selection.leading,
        ny,
        nx,
        field.missing_count()
    );
    Ok(field)
}

/// Coordinate for one field axis: an explicit variable, the variable named
/// like the dimension, or plain indices.
fn axis_coordinate(file: &File, explicit: Option<&str>, dim_name: &str, len: usize) -> Result<Coordinate> {
    if let Some(name) = explicit {
        let on_axis = file
            .variable(name)
            .map(|var| var.dimensions().iter().any(|d| d.name() == dim_name))
            .unwrap_or(true);
        if !on_axis {
            return Err(GalleryError::DimensionNotFound {
                var: name.to_string(),
                dim: dim_name.to_string(),
            });
        }
        let coordinate = read_coordinate(file, name)?;
        if coordinate.len() != len {
            return Err(GalleryError::ShapeMismatch {
                expected: format!("{} values for '{}'", len, dim_name),
                found: format!("{} values in '{}'", coordinate.len(), name),
            });
        }
        return Ok(coordinate);
    }
    match file.variable(dim_name) {
        Some(var) if var.dimensions().len() == 1 && var.dimensions()[0].len() == len => {
            read_coordinate(file, dim_name)
        }
        _ => Ok(Coordinate::index(dim_name, len)),
    }
}

/// Applies CF packing and masks missing values.
pub(crate) fn unpack(var: &Variable, raw: Vec<f64>) -> Vec<f64> {
    let fill = variable_attribute_f64(var, "_FillValue");
    let missing = variable_attribute_f64(var, "missing_value");
    let scale = variable_attribute_f64(var, "scale_factor").unwrap_or(1.0);
    let offset = variable_attribute_f64(var, "add_offset").unwrap_or(0.0);

    let is_missing = |v: f64| {
        !v.is_finite()
            || fill.is_some_and(|f| v == f || (f.abs() > 1e30 && (v - f).abs() <= f.abs() * 1e-6))
            || missing.is_some_and(|m| v == m)
    };

    raw.into_iter()
        .map(|v| if is_missing(v) { f64::NAN } else { v * scale + offset })
        .collect()
}

/// Writes gridded fields to a new NetCDF file
pub struct FieldWriter<'a> {
    output_path: &'a Path,
}

impl<'a> FieldWriter<'a> {
    pub fn new(output_path: &'a Path) -> Self {
        Self { output_path }
    }

    /// Writes `field` with its coordinates. Attributes of `source` (variable
    /// `source_var` in an open file) are copied except `_FillValue`.
    pub fn write_field(&self, field: &GriddedField, source: Option<(&File, &str)>) -> Result<()> {
        if self.output_path.exists() {
            fs::remove_file(self.output_path)?;
        }
        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = create(self.output_path)?;
        let (ny, nx) = field.shape();
        file.add_dimension(&field.y.name, ny)?;
        file.add_dimension(&field.x.name, nx)?;

        for coordinate in [&field.y, &field.x] {
            let mut var = file.add_variable::<f64>(&coordinate.name, &[coordinate.name.as_str()])?;
            if let Some(units) = &coordinate.units {
                var.put_attribute("units", units.as_str())?;
            }
            let values = Array1::from(coordinate.values.clone());
            var.put(values.view(), ..)?;
        }

        let mut var = file.add_variable::<f64>(&field.name, &[field.y.name.as_str(), field.x.name.as_str()])?;
        var.put_attribute("_FillValue", f64::NAN)?;

        match source.and_then(|(src, name)| src.variable(name)) {
            Some(orig_var) => {
                for attr in orig_var.attributes().filter(|a| a.name() != "_FillValue") {
                    match attr.value()? {
                        AttributeValue::Str(val) => {
                            var.put_attribute(attr.name(), val)?;
                        }
                        AttributeValue::Strs(vals) => {
                            var.put_attribute(attr.name(), vals)?;
                        }
                        AttributeValue::Float(val) => {
                            var.put_attribute(attr.name(), val)?;
                        }
                        AttributeValue::Floats(vals) => {
                            var.put_attribute(attr.name(), vals)?;
                        }
                        AttributeValue::Double(val) => {
                            var.put_attribute(attr.name(), val)?;
                        }
                        AttributeValue::Doubles(vals) => {
                            var.put_attribute(attr.name(), vals)?;
                        }
                        AttributeValue::Int(val) => {
                            var.put_attribute(attr.name(), val)?;
                        }
                        AttributeValue::Ints(vals) => {
                            var.put_attribute(attr.name(), vals)?;
                        }
                        AttributeValue::Short(val) => {
                            var.put_attribute(attr.name(), val)?;
                        }
                        AttributeValue::Shorts(vals) => {
                            var.put_attribute(attr.name(), vals)?;
                        }
                        _ => {
                            log::warn!("skipped unsupported attribute type for '{}'", attr.name());
                        }
                    }
                }
            }
            None => {
                if let Some(units) = &field.units {
                    var.put_attribute("units", units.as_str())?;
                }
                if let Some(long_name) = &field.long_name {
                    var.put_attribute("long_name", long_name.as_str())?;
                }
            }
        }

        var.put(field.data.view(), ..)?;

        file.add_attribute(
            "history",
            format!("Created by ncl-gallery on {}", Utc::now().to_rfc3339()),
        )?;

        log::info!("wrote '{}' to {}", field.name, self.output_path.display());
        Ok(())
    }
}
