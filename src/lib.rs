//! ncl-gallery: NCL reference plots rebuilt on NetCDF, ndarray and plotters
//!
//! Four gallery figures are reproduced from their reference datasets:
//!
//! - `regress_1a`: least-squares line through the Brownlee data, with and
//!   without a Student-t confidence band
//! - `h_lat_6`: pressure/latitude cross-section of zonal wind with filled
//!   and labelled contours on a log-pressure axis
//! - `dataonmap_10`: WRF 2 m water vapour on its Lambert conformal grid
//! - `linint2`: bilinear regridding of sea surface temperature
//!
//! ## Module Organization
//!
//! - [`regression`]: linear fit, residual statistics and confidence bands
//! - [`interpolation`]: bilinear (`linint2`) and linear (`linint1`) regridding
//! - [`contouring`]: contour levels, band binning, isolines and labels
//! - [`colormaps`]: named colormaps and discrete palettes
//! - [`projection`]: Lambert conformal conic projection for WRF grids
//! - [`viz`]: figure, axis, fill and colorbar drawing
//! - [`netcdf_io`]: reading 2-D fields and writing results
//! - [`datafiles`]: resolution of bundled datasets
//! - [`gallery`]: the recipes
//! - [`errors`]: centralized error handling
//!
//! ## Usage
//! ```rust,no_run
//! use ncl_gallery::prelude::*;
//!
//! let config = GalleryConfig::new("data", "out");
//! let written = Recipe::Linint2.run(&config, &RunOptions::default()).unwrap();
//! println!("{:?}", written);
//! ```

pub mod colormaps;
pub mod config;
pub mod contouring;
pub mod datafiles;
pub mod errors;
pub mod field;
pub mod gallery;
pub mod interpolation;
pub mod metadata;
pub mod netcdf_io;
pub mod parallel;
pub mod projection;
pub mod regression;
pub mod samples;
pub mod viz;

pub use errors::{GalleryError, Result};

pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::colormaps::Colormap;
    pub use crate::config::GalleryConfig;
    pub use crate::contouring::{contour_lines, level_bin, nice_levels, Extend};
    pub use crate::datafiles::DataFiles;
    pub use crate::errors::{GalleryError, Result};
    pub use crate::field::{Coordinate, GriddedField};
    pub use crate::gallery::{Recipe, RunOptions};
    pub use crate::interpolation::{linint1, linint2, regrid_field, GridInterpolator};
    pub use crate::netcdf_io::{read_field, FieldSelection, FieldWriter};
    pub use crate::parallel::ParallelConfig;
    pub use crate::projection::LambertConformal;
    pub use crate::regression::{fit_linear, BandMethod, ConfidenceBand, LinearFit, SamplePair};
}
