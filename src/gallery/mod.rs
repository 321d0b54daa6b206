//! Gallery recipes
//!
//! Each recipe loads its data, runs the numerical core and writes one or
//! more PNG figures into the configured output directory.

pub mod dataonmap;
pub mod h_lat;
pub mod linint2;
pub mod regress;

use crate::config::GalleryConfig;
use crate::errors::{GalleryError, Result};
use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

/// One reproducible figure script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recipe {
    Regress1a,
    HLat6,
    DataOnMap10,
    Linint2,
}

/// Options that only some recipes honour
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Also save the regridded linint2 field as NetCDF
    pub write_netcdf: Option<PathBuf>,
}

impl Recipe {
    pub fn all() -> [Recipe; 4] {
        [Recipe::Regress1a, Recipe::HLat6, Recipe::DataOnMap10, Recipe::Linint2]
    }

    pub fn name(self) -> &'static str {
        match self {
            Recipe::Regress1a => "regress_1a",
            Recipe::HLat6 => "h_lat_6",
            Recipe::DataOnMap10 => "dataonmap_10",
            Recipe::Linint2 => "linint2",
        }
    }

    /// Looks a recipe up by its script name. Dashes and case are ignored.
    pub fn from_name(name: &str) -> Result<Recipe> {
        let wanted = name.trim().to_ascii_lowercase().replace('-', "_");
        Recipe::all()
            .into_iter()
            .find(|recipe| recipe.name() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Recipe::all().iter().map(|r| r.name()).collect();
                GalleryError::Generic(format!(
                    "Unknown recipe '{}'. Available: {}, all",
                    name,
                    known.join(", ")
                ))
            })
    }

    /// Runs the recipe and returns the files it wrote.
    pub fn run(self, config: &GalleryConfig, options: &RunOptions) -> Result<Vec<PathBuf>> {
        log::info!("Running recipe {}", self.name());
        let start = Instant::now();
        let written = match self {
            Recipe::Regress1a => regress::run(config)?,
            Recipe::HLat6 => h_lat::run(config)?,
            Recipe::DataOnMap10 => dataonmap::run(config)?,
            Recipe::Linint2 => linint2::run(config, options.write_netcdf.as_deref())?,
        };
        for path in &written {
            println!("✅ Wrote {}", path.display());
        }
        log::info!("{} finished in {:.2?}", self.name(), start.elapsed());
        Ok(written)
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runs every recipe in gallery order, stopping at the first failure.
pub fn run_all(config: &GalleryConfig, options: &RunOptions) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for recipe in Recipe::all() {
        written.extend(recipe.run(config, options)?);
    }
    Ok(written)
}
