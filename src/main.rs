//! Entry point for the ncl-gallery application.
//! Handles CLI parsing, logging and thread setup, and dispatches recipes and dataset inspection.

use clap::Parser;
use ncl_gallery::config::GalleryConfig;
use ncl_gallery::gallery::{run_all, Recipe, RunOptions};
use ncl_gallery::metadata::{
    compute_variable_summary, describe_variable, list_variables_and_dimensions, print_metadata,
};
use ncl_gallery::parallel::ParallelConfig;
use ncl_gallery::samples;
use std::path::Path;

mod cli;

use cli::{Args, Command};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    println!(
        r#"
------------------------------------------------------------------
              _  _  ___ _        ___      _ _
             | \| |/ __| |      / __|__ _| | |___ _ _ _  _
             | .` | (__| |__   | (_ / _` | | / -_) '_| || |
             |_|\_|\___|____|   \___\__,_|_|_\___|_|  \_, |
                                                     |__/
                 NCL gallery figures, rendered in Rust
------------------------------------------------------------------
"#
    );

    let parallel = ParallelConfig::new(args.threads);
    parallel.setup_global_pool()?;
    let config = GalleryConfig::new(&args.data_dir, &args.output_dir)
        .with_dpi(args.dpi)
        .with_parallel(parallel);
    log::debug!("configuration: {:?}", config);

    match args.command {
        Command::Run {
            recipe,
            write_netcdf,
        } => {
            let options = RunOptions { write_netcdf };
            let written = if recipe.eq_ignore_ascii_case("all") {
                run_all(&config, &options)?
            } else {
                Recipe::from_name(&recipe)?.run(&config, &options)?
            };
            println!("🚀 Done: {} figure(s) in {}", written.len(), config.output_dir().display());
        }
        Command::Inspect {
            dataset,
            list_vars,
            describe,
            summary,
        } => {
            let file = if Path::new(&dataset).is_file() {
                let file = netcdf::open(&dataset)?;
                println!("✅ Opened dataset: {}", dataset);
                file
            } else {
                config.data_files().open(&dataset)?
            };

            if list_vars {
                list_variables_and_dimensions(&file)?;
            }
            if let Some(var) = describe.as_deref() {
                describe_variable(&file, var)?;
            }
            if let Some(var) = summary.as_deref() {
                compute_variable_summary(&file, var)?;
            }
            if !list_vars && describe.is_none() && summary.is_none() {
                print_metadata(&file)?;
            }
        }
        Command::GenerateSamples => {
            let written = samples::write_all(&config.data_files())?;
            println!("🚀 Done: {} dataset(s) under {}", written.len(), config.data_dir.display());
        }
    }

    Ok(())
}
