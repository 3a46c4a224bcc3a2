//! End-to-end operations behind the CLI commands.
//!
//! Each function loads its inputs, runs the core transformation and writes
//! the result, logging progress through the `log` facade.

use std::path::Path;

use log::{info, warn};

use crate::config::Config;
use crate::error::{GeoSheetError, Result};
use crate::extract::extract;
use crate::io::{load_collection, load_sheet, save_collection, save_records};
use crate::mutate::{add_point, remove_all_points};
use crate::reader::read;
use crate::record::CoordinateRecord;

/// Outcome of a [`convert`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertSummary {
    /// Points appended to the collection.
    pub added: usize,
    /// Rows skipped because their coordinates did not parse.
    pub skipped: usize,
    /// Records rejected because they had no description.
    pub rejected: usize,
}

/// Adds every coordinate row of the configured sheet to a feature collection.
///
/// Reads `sheet.file`, extracts records from the configured columns, appends
/// one point per record to the collection in `geojson.input` and saves the
/// result to `geojson.output`. Rows whose coordinates do not parse are
/// skipped with a warning, as are records without a description.
///
/// # Errors
///
/// Fails if a document cannot be loaded or saved, the columns are
/// misconfigured, the sheet yields no coordinates, or a record cannot be
/// emitted as a point. Nothing is written in that case.
pub fn convert(config: &Config) -> Result<ConvertSummary> {
    info!("Starting conversion:");
    info!("Sheet: {}", config.sheet.file.display());
    info!("Input: {}", config.geojson.input.display());
    info!("Output: {}", config.geojson.output.display());

    let layout = config.resolve_columns()?;
    let sheet = load_sheet(
        &config.sheet.file,
        config.sheet.name.as_deref(),
        config.sheet.delimiter,
    )?;
    let extraction = extract(&sheet, &layout, config.sheet.start_row)?;

    let mut summary = ConvertSummary {
        skipped: extraction.diagnostics.len(),
        ..ConvertSummary::default()
    };

    let mut collection = load_collection(&config.geojson.input)?;
    for (record, &row) in extraction.records.iter().zip(&extraction.rows) {
        if !record.has_description() {
            warn!(
                "Rejected sheet '{}', row {row}: {record} has an empty description",
                sheet.name
            );
            summary.rejected += 1;
            continue;
        }
        add_point(&mut collection, record, &config.appearance.marker_color).map_err(
            |source| GeoSheetError::Emit {
                sheet: sheet.name.clone(),
                row,
                cell: sheet
                    .cell(row, layout.coordinates())
                    .unwrap_or_default()
                    .to_string(),
                source,
            },
        )?;
        summary.added += 1;
    }

    save_collection(&collection, &config.geojson.output)?;
    info!(
        "Conversion complete: {} added, {} skipped, {} rejected",
        summary.added, summary.skipped, summary.rejected
    );
    Ok(summary)
}

/// Removes every point feature from the collection at `path`, in place.
///
/// Returns the number of features removed.
///
/// # Errors
///
/// Fails if the collection cannot be loaded or saved.
pub fn remove_points(path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    let mut collection = load_collection(path)?;
    let removed = remove_all_points(&mut collection);
    save_collection(&collection, path)?;
    info!("Removed {removed} point(s) from {}", path.display());
    Ok(removed)
}

/// Reads all features of the collection at `path` as records.
///
/// # Errors
///
/// Fails if the collection cannot be loaded.
pub fn inspect(path: impl AsRef<Path>) -> Result<Vec<CoordinateRecord>> {
    let collection = load_collection(path)?;
    Ok(read(&collection))
}

/// Writes every feature of the collection at `input` to a CSV file, or to an
/// Excel workbook when `output` ends in `.xlsx`.
///
/// Returns the number of records written.
///
/// # Errors
///
/// Fails if the collection cannot be loaded, has no features, or the CSV
/// output cannot be written.
pub fn export(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<usize> {
    let records = inspect(&input)?;
    save_records(&records, &output)?;
    info!(
        "Exported {} record(s) from {} to {}",
        records.len(),
        input.as_ref().display(),
        output.as_ref().display()
    );
    Ok(records.len())
}
