//! Extraction of coordinate records from sheet rows.
//!
//! The extractor walks a [`Sheet`] once, from the configured start row to the
//! end, and turns every row with a parseable coordinate cell into a point
//! [`CoordinateRecord`]. Rows without coordinates are skipped quietly; rows
//! whose coordinates do not parse are skipped and reported as
//! [`RowDiagnostic`]s so the caller can decide how strict to be.

use std::fmt;

use log::{debug, warn};

use crate::columns::column_name;
use crate::coordinates::parse_coordinates;
use crate::error::{CoordinateError, SourceError};
use crate::record::CoordinateRecord;

/// Rows of one sheet, as string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    /// Sheet name, used in diagnostics and error messages.
    pub name: String,
    /// Rows in document order; row 1 is `rows[0]`.
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Creates a sheet from its name and rows.
    #[must_use]
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Returns the trimmed, non-empty text of a cell.
    ///
    /// `row` and `column` are both 1-based.
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        let cells = self.rows.get(row.checked_sub(1)?)?;
        let text = cells.get(column.checked_sub(1)?)?.trim();
        (!text.is_empty()).then_some(text)
    }
}

/// Resolved 1-based positions of the columns the extractor reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    name: Option<usize>,
    description: usize,
    coordinates: usize,
}

impl ColumnLayout {
    /// Builds a layout, checking that the required columns are present.
    ///
    /// A position of `0` is treated the same as a missing one.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::MissingColumn`] when the description or
    /// coordinates column is missing.
    pub fn new(
        name: Option<usize>,
        description: Option<usize>,
        coordinates: Option<usize>,
    ) -> Result<Self, SourceError> {
        let required = |position: Option<usize>, column: &str| {
            position
                .filter(|&p| p > 0)
                .ok_or_else(|| SourceError::MissingColumn {
                    column: column.to_string(),
                })
        };

        Ok(Self {
            name: name.filter(|&p| p > 0),
            description: required(description, "description")?,
            coordinates: required(coordinates, "coordinates")?,
        })
    }

    #[must_use]
    pub fn name(&self) -> Option<usize> {
        self.name
    }

    #[must_use]
    pub fn description(&self) -> usize {
        self.description
    }

    #[must_use]
    pub fn coordinates(&self) -> usize {
        self.coordinates
    }
}

/// A row that was skipped because its coordinate cell did not parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDiagnostic {
    /// Sheet the row belongs to.
    pub sheet: String,
    /// 1-based row number.
    pub row: usize,
    /// 1-based column of the coordinate cell.
    pub column: usize,
    /// The cell text as found.
    pub cell: String,
    /// Why the cell was rejected.
    pub error: CoordinateError,
}

impl fmt::Display for RowDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let column = column_name(self.column).unwrap_or_else(|| self.column.to_string());
        write!(
            f,
            "sheet '{}', row {} (cell {column}{}): {}",
            self.sheet, self.row, self.row, self.error
        )
    }
}

/// Records extracted from a sheet, plus the rows that had to be skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    /// Records in row order.
    pub records: Vec<CoordinateRecord>,
    /// 1-based source row of each record, parallel to `records`.
    pub rows: Vec<usize>,
    /// One entry per row with an unparseable coordinate cell.
    pub diagnostics: Vec<RowDiagnostic>,
}

/// Extracts point records from `sheet`, starting at the 1-based `start_row`.
///
/// The label comes from the name column when one is configured and the cell
/// is not empty. Descriptions may be empty here; whether such records are
/// acceptable is the caller's decision.
///
/// # Errors
///
/// - [`SourceError::InvalidStartRow`] when `start_row` is 0.
/// - [`SourceError::EmptySheet`] when the sheet has no rows.
/// - [`SourceError::NoCoordinates`] when no row produced a record.
pub fn extract(
    sheet: &Sheet,
    layout: &ColumnLayout,
    start_row: usize,
) -> Result<Extraction, SourceError> {
    if start_row == 0 {
        return Err(SourceError::InvalidStartRow { row: start_row });
    }
    if sheet.rows.is_empty() {
        return Err(SourceError::EmptySheet {
            sheet: sheet.name.clone(),
        });
    }

    let mut extraction = Extraction::default();

    for row in start_row..=sheet.rows.len() {
        let Some(cell) = sheet.cell(row, layout.coordinates) else {
            debug!("Row {row} of '{}' has no coordinates, skipping", sheet.name);
            continue;
        };

        let values = match parse_coordinates(cell) {
            Ok(values) => values,
            Err(error) => {
                let diagnostic = RowDiagnostic {
                    sheet: sheet.name.clone(),
                    row,
                    column: layout.coordinates,
                    cell: cell.to_string(),
                    error,
                };
                warn!("Skipped {diagnostic}");
                extraction.diagnostics.push(diagnostic);
                continue;
            },
        };

        let mut record = CoordinateRecord::point(values);
        if let Some(label) = layout.name.and_then(|column| sheet.cell(row, column)) {
            record.label = label.to_string();
        }
        if let Some(description) = sheet.cell(row, layout.description) {
            record.description = description.to_string();
        }
        extraction.records.push(record);
        extraction.rows.push(row);
    }

    if extraction.records.is_empty() {
        return Err(SourceError::NoCoordinates {
            sheet: sheet.name.clone(),
        });
    }

    debug!(
        "Extracted {} record(s) from '{}', {} row(s) skipped",
        extraction.records.len(),
        sheet.name,
        extraction.diagnostics.len()
    );
    Ok(extraction)
}
