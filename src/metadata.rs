//! Dataset inspection for the `inspect` subcommand
//!
//! Lists what a bundled NetCDF file contains so recipe variable names
//! (`U`, `TEMP`, `Q2`, ...) can be checked against real data.

use crate::errors::{GalleryError, Result};
use crate::netcdf_io::unpack;
use netcdf::{AttributeValue, File, Variable};

/// Quick statistics over the valid (non-missing) values of a variable
#[derive(Debug, Clone, PartialEq)]
pub struct VariableSummary {
    pub name: String,
    pub total: usize,
    pub valid: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl VariableSummary {
    pub fn missing(&self) -> usize {
        self.total - self.valid
    }
}

fn format_attribute(value: &AttributeValue) -> String {
    match value {
        AttributeValue::Str(s) => format!("\"{}\"", s),
        AttributeValue::Strs(ss) => format!("{:?}", ss),
        AttributeValue::Float(f) => f.to_string(),
        AttributeValue::Floats(fs) => format!("{:?}", fs),
        AttributeValue::Double(d) => d.to_string(),
        AttributeValue::Doubles(ds) => format!("{:?}", ds),
        AttributeValue::Int(i) => i.to_string(),
        AttributeValue::Ints(is) => format!("{:?}", is),
        AttributeValue::Short(s) => s.to_string(),
        AttributeValue::Shorts(ss) => format!("{:?}", ss),
        AttributeValue::Uchar(u) => u.to_string(),
        AttributeValue::Uchars(us) => format!("{:?}", us),
        AttributeValue::Ushort(u) => u.to_string(),
        AttributeValue::Ushorts(us) => format!("{:?}", us),
        AttributeValue::Uint(u) => u.to_string(),
        AttributeValue::Uints(us) => format!("{:?}", us),
        other => format!("{:?}", other),
    }
}

fn find_variable<'f>(file: &'f File, var_name: &str) -> Result<Variable<'f>> {
    file.variable(var_name)
        .ok_or_else(|| GalleryError::VariableNotFound {
            var: var_name.to_string(),
        })
}

fn shape_string(var: &Variable) -> String {
    var.dimensions()
        .iter()
        .map(|d| d.len().to_string())
        .collect::<Vec<_>>()
        .join(" × ")
}

/// Prints global attributes and variables of a NetCDF file.
pub fn print_metadata(file: &File) -> Result<()> {
    println!("\n===== Global Attributes =====");
    for attr in file.attributes() {
        println!("- {}: {}", attr.name(), format_attribute(&attr.value()?));
    }

    println!("\n===== Variables =====");
    for var in file.variables() {
        let dims: Vec<String> = var
            .dimensions()
            .iter()
            .map(|d| format!("{}[{}]", d.name(), d.len()))
            .collect();
        println!("- {} ({})", var.name(), dims.join(", "));
    }

    Ok(())
}

/// Lists dimensions and variables, sorted by name, with units and
/// long names where present.
pub fn list_variables_and_dimensions(file: &File) -> Result<()> {
    println!("\n Dimensions");
    println!("==============");

    let mut dimensions: Vec<_> = file.dimensions().collect();
    dimensions.sort_by_key(|d| d.name());
    if dimensions.is_empty() {
        println!("   (No dimensions found)");
    }
    for dim in dimensions {
        let unlimited = if dim.is_unlimited() { " (unlimited)" } else { "" };
        println!("    {} = {}{}", dim.name(), dim.len(), unlimited);
    }

    println!("\n Variables");
    println!("=============");

    let mut variables: Vec<_> = file.variables().collect();
    variables.sort_by_key(|v| v.name());
    if variables.is_empty() {
        println!("   (No variables found)");
    }
    for var in variables {
        let data_type = format!("{:?}", var.vartype()).to_lowercase();
        let dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
        if dims.is_empty() {
            println!("    {} ({}): scalar", var.name(), data_type);
        } else {
            println!(
                "    {} ({}): [{}] = ({})",
                var.name(),
                data_type,
                dims.join(", "),
                shape_string(&var)
            );
        }

        let key_attrs: Vec<String> = ["units", "long_name", "description", "_FillValue"]
            .iter()
            .filter_map(|key| {
                let value = var.attribute(key)?.value().ok()?;
                Some(format!("{}: {}", key, format_attribute(&value)))
            })
            .collect();
        if !key_attrs.is_empty() {
            println!("      └─ {}", key_attrs.join(", "));
        }
    }

    println!("\n💡 Tip: Use --describe <variable> for all attributes of one variable");
    Ok(())
}

/// Describes one variable: type, dimensions and every attribute.
pub fn describe_variable(file: &File, var_name: &str) -> Result<()> {
    let var = find_variable(file, var_name)?;

    println!("\n Variable Description: {}", var_name);
    println!("={}", "=".repeat(var_name.len() + 25));
    println!(" Data type: {}", format!("{:?}", var.vartype()).to_lowercase());

    let dims = var.dimensions();
    if dims.is_empty() {
        println!(" Dimensions: (scalar)");
    } else {
        let names: Vec<String> = dims.iter().map(|d| d.name()).collect();
        println!(" Dimensions: [{}]", names.join(", "));
        println!(" Shape: ({})", shape_string(&var));
    }

    let attributes: Vec<_> = var.attributes().collect();
    if attributes.is_empty() {
        println!("\n  Attributes: (none)");
    } else {
        println!("\n  Attributes:");
        for attr in attributes {
            match attr.value() {
                Ok(value) => println!("   • {}: {}", attr.name(), format_attribute(&value)),
                Err(e) => println!("   • {}: (error reading value: {})", attr.name(), e),
            }
        }
    }

    let total_elements: usize = dims.iter().map(|d| d.len()).product();
    println!("\n Total elements: {}", total_elements);
    Ok(())
}

/// Computes min/max/mean/std over the valid values of a variable, after
/// unpacking and masking missing values, and prints them.
pub fn compute_variable_summary(file: &File, var_name: &str) -> Result<VariableSummary> {
    let var = find_variable(file, var_name)?;
    let raw: Vec<f64> = var.get_values::<f64, _>(..)?;
    let total = raw.len();
    let valid: Vec<f64> = unpack(&var, raw).into_iter().filter(|v| !v.is_nan()).collect();

    if valid.is_empty() {
        log::warn!("'{}' has no valid values ({} missing)", var_name, total);
        return Err(GalleryError::Generic(format!(
            "Variable '{}' has no valid values",
            var_name
        )));
    }

    let n = valid.len() as f64;
    let min = valid.iter().copied().fold(f64::INFINITY, f64::min);
    let max = valid.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = valid.iter().sum::<f64>() / n;
    let std_dev = (valid.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / n).sqrt();

    let summary = VariableSummary {
        name: var_name.to_string(),
        total,
        valid: valid.len(),
        min,
        max,
        mean,
        std_dev,
    };

    println!("\n Summary for Variable: {}", var_name);
    println!("================================");
    println!("   Valid: {} of {}", summary.valid, summary.total);
    println!("   Min: {}", summary.min);
    println!("   Max: {}", summary.max);
    println!("   Mean: {:.4}", summary.mean);
    println!("   Std Dev: {:.4}", summary.std_dev);
    if summary.missing() > 0 {
        println!("⚠ {} missing values skipped", summary.missing());
    }

    Ok(summary)
}
