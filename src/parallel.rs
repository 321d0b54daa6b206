//! Parallel processing configuration
//!
//! Sets up Rayon's global thread pool used by regridding and filled-contour
//! rasterisation.

use crate::errors::{GalleryError, Result};
use rayon::ThreadPoolBuilder;

/// Configuration for parallel processing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParallelConfig {
    pub num_threads: Option<usize>,
}

impl ParallelConfig {
    pub fn new(num_threads: Option<usize>) -> Self {
        Self { num_threads }
    }

    /// Use all available CPU cores
    pub fn all_cores() -> Self {
        Self {
            num_threads: Some(num_cpus::get()),
        }
    }

    pub fn with_threads(num_threads: usize) -> Self {
        Self {
            num_threads: Some(num_threads),
        }
    }

    /// Set up the global Rayon thread pool. Without an explicit thread count
    /// Rayon's default pool is left in place.
    pub fn setup_global_pool(&self) -> Result<()> {
        match self.num_threads {
            Some(0) => Err(GalleryError::ThreadPoolError(
                "thread count must be at least 1".to_string(),
            )),
            Some(num_threads) => {
                ThreadPoolBuilder::new()
                    .num_threads(num_threads)
                    .build_global()
                    .map_err(|e| {
                        GalleryError::ThreadPoolError(format!(
                            "Failed to initialize thread pool with {} threads: {}",
                            num_threads, e
                        ))
                    })?;
                log::info!("configured parallel processing with {} threads", num_threads);
                Ok(())
            }
            None => {
                log::debug!(
                    "using default thread pool ({} threads)",
                    rayon::current_num_threads()
                );
                Ok(())
            }
        }
    }

    /// Number of threads in the current pool
    pub fn current_threads(&self) -> usize {
        rayon::current_num_threads()
    }
}
