//! Command-line interface for `geosheet`.
//!
//! This binary is a thin front end over [`geosheet_core`]: it parses
//! arguments, configures logging and hands off to the operations in
//! [`geosheet_core::operations`].
//!
//! # Architecture
//!
//! The CLI is built using [`clap`] for argument parsing and [`tracing`] for structured logging.
//! Library logs emitted through the `log` crate are bridged into `tracing`.
//!
//! # Available Commands
//!
//! - `convert` - Add sheet rows as points to a `GeoJSON` file, driven by a YAML config
//! - `remove-points` - Strip every point feature from a `GeoJSON` file
//! - `export` - Write the features of a `GeoJSON` file to CSV or an Excel workbook
//! - `show` - Print the features of a `GeoJSON` file as a table

mod display;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{Level, info, warn};
use tracing_log::LogTracer;
use tracing_subscriber::FmtSubscriber;

use geosheet_core::config::Config;
use geosheet_core::operations;

#[derive(Parser)]
#[command(
    name = "geosheet",
    version,
    about = "Spreadsheet coordinates to GeoJSON points",
    long_about = "geosheet reads coordinate rows from a CSV file or Excel workbook and adds\n\
                  them as point features to a GeoJSON FeatureCollection. It can also strip\n\
                  points from a collection and export features back to CSV or Excel."
)]
/// Command-line arguments and options for the `geosheet` CLI.
struct Cli {
    /// Enable verbose (INFO level) logging output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug (DEBUG level) logging output with detailed diagnostics.
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the `geosheet` CLI.
#[derive(Subcommand)]
enum Commands {
    /// Adds the coordinate rows of a sheet as points to a `GeoJSON` file.
    ///
    /// Sheet, columns, input and output files and the marker color all come
    /// from the YAML configuration file.
    Convert {
        /// Path to the YAML configuration file.
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,
    },

    /// Removes every point feature from a `GeoJSON` file, in place.
    ///
    /// Lines, polygons and other features are kept.
    #[command(alias = "removepoints")]
    RemovePoints {
        /// Path to the `GeoJSON` file.
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,
    },

    /// Writes every feature of a `GeoJSON` file to a CSV file or Excel workbook.
    ///
    /// The output format follows the extension: `.xlsx` writes a workbook,
    /// anything else CSV.
    Export {
        /// Path to the input `GeoJSON` file.
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Path for the output file (`.csv` or `.xlsx`).
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Prints the features of a `GeoJSON` file as a table.
    Show {
        /// Path to the `GeoJSON` file.
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

/// Entry point for the `geosheet` command-line interface.
///
/// # Errors
///
/// Returns an error if the logging system cannot be initialized. Command
/// failures are reported on stderr and exit with status 1.
fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity flags
    let log_level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    // Bridge logs from the `log` crate to the `tracing` ecosystem.
    LogTracer::init()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let outcome = match cli.command {
        Commands::Convert { config } => handle_convert(&config),
        Commands::RemovePoints { file } => handle_remove_points(&file),
        Commands::Export { input, output } => handle_export(&input, &output),
        Commands::Show { input } => handle_show(&input),
    };

    if let Err(err) = outcome {
        eprintln!("Error: {}", err.user_message());
        if let Some(suggestion) = err.recovery_suggestion() {
            eprintln!("Hint: {suggestion}");
        }
        process::exit(1);
    }

    Ok(())
}

fn handle_convert(config_path: &Path) -> geosheet_core::Result<()> {
    info!("Loading configuration from {}", config_path.display());
    let config = Config::load(config_path)?;

    let summary = operations::convert(&config)?;
    if summary.skipped > 0 {
        warn!("{} row(s) skipped due to unreadable coordinates", summary.skipped);
    }
    if summary.rejected > 0 {
        warn!("{} row(s) rejected for lacking a description", summary.rejected);
    }

    println!(
        "Added {} point(s) to {}",
        summary.added,
        config.geojson.output.display()
    );
    Ok(())
}

fn handle_remove_points(file: &Path) -> geosheet_core::Result<()> {
    info!("Removing points from {}", file.display());
    let removed = operations::remove_points(file)?;
    println!("Removed {removed} point(s) from {}", file.display());
    Ok(())
}

fn handle_export(input: &Path, output: &Path) -> geosheet_core::Result<()> {
    info!("Exporting {} to {}", input.display(), output.display());
    let count = operations::export(input, output)?;
    println!("Exported {count} record(s) to {}", output.display());
    Ok(())
}

fn handle_show(input: &Path) -> geosheet_core::Result<()> {
    let records = operations::inspect(input)?;
    display::display_records(&input.display().to_string(), &records);
    Ok(())
}
