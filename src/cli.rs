//! Defines command-line interface options using `clap` for the ncl-gallery application.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Reproduces NCL gallery figures from NetCDF reference data
#[derive(Parser, Debug)]
#[command(
    version,
    name = "ncl-gallery",
    about = "Renders NCL gallery plots (regression, cross-sections, WRF maps, regridding) to PNG"
)]
pub struct Args {
    /// Directory holding the reference datasets
    #[arg(long, global = true, default_value = "data")]
    pub data_dir: PathBuf,

    /// Directory receiving the rendered figures
    #[arg(long, global = true, default_value = ".")]
    pub output_dir: PathBuf,

    /// Figure resolution in dots per inch (linint2 always renders at 300)
    #[arg(long, global = true, default_value_t = 100)]
    pub dpi: u32,

    /// Number of threads to use for parallel processing. Defaults to number of CPU cores.
    #[arg(short = 't', long, global = true)]
    pub threads: Option<usize>,

    /// Enable verbose output.
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render one recipe (regress_1a, h_lat_6, dataonmap_10, linint2) or `all`
    Run {
        recipe: String,

        /// Also save the linint2 regridded field to this NetCDF path
        #[arg(long)]
        write_netcdf: Option<PathBuf>,
    },

    /// Inspect a dataset by bundled name or path
    Inspect {
        dataset: String,

        /// List all variables and dimensions
        #[arg(long)]
        list_vars: bool,

        /// Describe a specific variable (data type, shape, and attributes)
        #[arg(long)]
        describe: Option<String>,

        /// Compute quick statistics (min/mean/max/std) for a variable
        #[arg(long)]
        summary: Option<String>,
    },

    /// Write synthetic stand-ins for the reference datasets into the data directory
    GenerateSamples,
}
