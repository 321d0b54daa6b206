//! Resolution of bundled reference datasets by name

use crate::errors::{GalleryError, Result};
use std::path::{Path, PathBuf};

/// Directory searched when no data directory is configured
pub const DEFAULT_DATA_DIR: &str = "data";

/// Bundled dataset names used by the recipes
pub const MXCLIM: &str = "netcdf_files/mxclim.nc";
pub const SST: &str = "netcdf_files/sst.nc";
pub const WRFOUT: &str = "netcdf_files/wrfout_d01_2003-07-15_00:00:00";

/// Locates reference data files below a root directory
#[derive(Debug, Clone)]
pub struct DataFiles {
    root: PathBuf,
}

impl DataFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Candidate locations for `name`, in search order: `<root>/<name>`
    /// then `<root>/<file name>`.
    pub fn candidates(&self, name: &str) -> Vec<PathBuf> {
        let mut candidates = vec![self.root.join(name)];
        if let Some(file_name) = Path::new(name).file_name() {
            let flat = self.root.join(file_name);
            if !candidates.contains(&flat) {
                candidates.push(flat);
            }
        }
        candidates
    }

    /// Path of an existing file for `name`.
    pub fn get(&self, name: &str) -> Result<PathBuf> {
        let tried = self.candidates(name);
        match tried.iter().find(|path| path.is_file()) {
            Some(path) => {
                log::debug!("resolved data file '{}' to {}", name, path.display());
                Ok(path.clone())
            }
            None => Err(GalleryError::DataFileNotFound {
                name: name.to_string(),
                tried,
            }),
        }
    }

    /// Opens `name` as a NetCDF dataset.
    pub fn open(&self, name: &str) -> Result<netcdf::File> {
        let path = self.get(name)?;
        let file = netcdf::open(&path)?;
        println!("✅ Opened dataset: {}", path.display());
        Ok(file)
    }

    /// Path where `name` is written by the sample generator.
    pub fn target_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl Default for DataFiles {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}
