//! Display utilities for formatting CLI output.
//!
//! Records read from a feature collection are shown as a table built with
//! [`tabled`].

use tabled::{Table, Tabled};

use geosheet_core::{CoordinateRecord, Coordinates};

/// Table row representation for one record.
#[derive(Tabled)]
pub struct RecordRow {
    /// Position of the feature in the collection (1-based).
    #[tabled(rename = "#")]
    pub index: usize,
    /// Geometry kind.
    #[tabled(rename = "Type")]
    pub kind: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Description")]
    pub description: String,
    /// Position values, or a vertex count for lines and polygons.
    #[tabled(rename = "Coordinates")]
    pub coordinates: String,
    #[tabled(rename = "Color")]
    pub color: String,
}

impl RecordRow {
    #[must_use]
    pub fn new(index: usize, record: &CoordinateRecord) -> Self {
        Self {
            index,
            kind: record.geometry_kind.to_string(),
            name: record.label.clone(),
            description: record.description.clone(),
            coordinates: summarize(&record.coordinates),
            color: record.marker_color.clone().unwrap_or_default(),
        }
    }
}

fn summarize(coordinates: &Coordinates) -> String {
    match coordinates {
        Coordinates::Position(values) => values
            .iter()
            .map(f64::to_string)
            .collect::<Vec<_>>()
            .join(", "),
        Coordinates::Path(positions) => format!("{} vertices", positions.len()),
        Coordinates::Rings(rings) => {
            let vertices: usize = rings.iter().map(Vec::len).sum();
            format!("{} ring(s), {vertices} vertices", rings.len())
        },
        Coordinates::Absent => "N/A".to_string(),
    }
}

/// Renders records as a table.
#[must_use]
pub fn records_table(records: &[CoordinateRecord]) -> String {
    let rows: Vec<RecordRow> = records
        .iter()
        .enumerate()
        .map(|(i, record)| RecordRow::new(i + 1, record))
        .collect();
    Table::new(rows).to_string()
}

/// Prints records read from `dataset` to standard output.
pub fn display_records(dataset: &str, records: &[CoordinateRecord]) {
    println!("\nDataset: {dataset}");
    println!("Features: {}", records.len());

    if !records.is_empty() {
        println!("{}", records_table(records));
    }
}
