//! Centralized error handling for the gallery
//!
//! Every recipe stage (data access, numerics, rendering) reports failures
//! through [`GalleryError`] so the CLI can print one message and stop.

use std::fmt;
use std::path::PathBuf;

/// Main error type for gallery operations
#[derive(Debug)]
pub enum GalleryError {
    /// NetCDF file operation errors
    NetCDFError(netcdf::Error),

    /// I/O operation errors
    IoError(std::io::Error),

    /// Array shape or dimension error
    ArrayError(ndarray::ShapeError),

    /// Variable not found in NetCDF file
    VariableNotFound { var: String },

    /// Dimension not found in variable
    DimensionNotFound { var: String, dim: String },

    /// Bundled dataset could not be located
    DataFileNotFound { name: String, tried: Vec<PathBuf> },

    /// Two inputs that must agree in length or shape do not
    ShapeMismatch { expected: String, found: String },

    /// Too few samples for a least-squares fit
    InsufficientSamples { required: usize, found: usize },

    /// Confidence statistics need at least one residual degree of freedom
    InsufficientDegreesOfFreedom { samples: usize, parameters: usize },

    /// Fit or band is undefined for the given data (e.g. constant x)
    DegenerateFit(String),

    /// Coordinate vector unusable for interpolation or mapping
    InvalidCoordinate { name: String, message: String },

    /// Index selection does not match the variable
    InvalidSelection { message: String },

    /// Figure drawing or encoding failed
    RenderError(String),

    /// Thread pool configuration error
    ThreadPoolError(String),

    /// Generic error
    Generic(String),
}

impl fmt::Display for GalleryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GalleryError::NetCDFError(e) => write!(f, "NetCDF error: {}", e),
            GalleryError::IoError(e) => write!(f, "I/O error: {}", e),
            GalleryError::ArrayError(e) => write!(f, "Array error: {}", e),
            GalleryError::VariableNotFound { var } => {
                write!(f, "Variable '{}' not found in file", var)
            }
            GalleryError::DimensionNotFound { var, dim } => {
                write!(f, "Dimension '{}' not found in variable '{}'", dim, var)
            }
            GalleryError::DataFileNotFound { name, tried } => {
                let tried: Vec<String> = tried.iter().map(|p| p.display().to_string()).collect();
                write!(
                    f,
                    "Data file '{}' not found (tried: {})",
                    name,
                    tried.join(", ")
                )
            }
            GalleryError::ShapeMismatch { expected, found } => {
                write!(f, "Shape mismatch: expected {}, found {}", expected, found)
            }
            GalleryError::InsufficientSamples { required, found } => write!(
                f,
                "Insufficient samples: need at least {}, got {}",
                required, found
            ),
            GalleryError::InsufficientDegreesOfFreedom {
                samples,
                parameters,
            } => write!(
                f,
                "No residual degrees of freedom: {} samples for {} parameters",
                samples, parameters
            ),
            GalleryError::DegenerateFit(msg) => write!(f, "Degenerate fit: {}", msg),
            GalleryError::InvalidCoordinate { name, message } => {
                write!(f, "Invalid coordinate '{}': {}", name, message)
            }
            GalleryError::InvalidSelection { message } => {
                write!(f, "Invalid selection: {}", message)
            }
            GalleryError::RenderError(msg) => write!(f, "Render error: {}", msg),
            GalleryError::ThreadPoolError(msg) => write!(f, "Thread pool error: {}", msg),
            GalleryError::Generic(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for GalleryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GalleryError::NetCDFError(e) => Some(e),
            GalleryError::IoError(e) => Some(e),
            GalleryError::ArrayError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<netcdf::Error> for GalleryError {
    fn from(error: netcdf::Error) -> Self {
        GalleryError::NetCDFError(error)
    }
}

impl From<std::io::Error> for GalleryError {
    fn from(error: std::io::Error) -> Self {
        GalleryError::IoError(error)
    }
}

impl From<ndarray::ShapeError> for GalleryError {
    fn from(error: ndarray::ShapeError) -> Self {
        GalleryError::ArrayError(error)
    }
}

impl From<String> for GalleryError {
    fn from(error: String) -> Self {
        GalleryError::Generic(error)
    }
}

impl From<&str> for GalleryError {
    fn from(error: &str) -> Self {
        GalleryError::Generic(error.to_string())
    }
}

/// Converts any plotters drawing error into a render error.
pub(crate) fn render_err<E: std::error::Error>(error: E) -> GalleryError {
    GalleryError::RenderError(error.to_string())
}

/// Result type alias for gallery operations
pub type Result<T> = std::result::Result<T, GalleryError>;
