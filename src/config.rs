//! Run configuration shared by all recipes

use crate::datafiles::{DataFiles, DEFAULT_DATA_DIR};
use crate::parallel::ParallelConfig;
use std::path::{Path, PathBuf};

/// Matplotlib's default figure resolution
pub const DEFAULT_DPI: u32 = 100;

#[derive(Debug, Clone)]
pub struct GalleryConfig {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub dpi: u32,
    pub parallel: ParallelConfig,
}

impl GalleryConfig {
    pub fn new(data_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            output_dir: output_dir.into(),
            dpi: DEFAULT_DPI,
            parallel: ParallelConfig::default(),
        }
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn with_parallel(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn data_files(&self) -> DataFiles {
        DataFiles::new(&self.data_dir)
    }

    /// Location of an output file inside the output directory.
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR, ".")
    }
}
