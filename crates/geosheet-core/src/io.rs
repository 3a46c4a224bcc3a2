//! Loading and saving the documents the pipelines work on.
//!
//! Sheets come from CSV files (read with the `csv` crate) or from Excel
//! workbooks (read with `calamine`), picked by file extension. Feature
//! collections are parsed with the `geojson` crate and written back as
//! pretty-printed JSON. Exported records go to CSV or, for `.xlsx` targets,
//! to a workbook written with `rust_xlsxwriter`.

use std::fs::File;
use std::io::{Cursor, Write};
use std::path::Path;

use calamine::{Data, Range, Reader, Xlsx};
use csv::{ReaderBuilder, Writer};
use geojson::{FeatureCollection, GeoJson, JsonValue};
use log::{debug, info};
use rust_xlsxwriter::Workbook;

use crate::error::{FormatError, GeoSheetError, IoError, IoErrorExt, Result, SourceError};
use crate::extract::Sheet;
use crate::record::{CoordinateRecord, Coordinates};

/// Header row of exported record files.
pub const EXPORT_HEADER: [&str; 4] = ["Type", "Name", "Description", "Coordinates"];

/// Name of the worksheet written by [`save_records_xlsx`].
pub const EXPORT_SHEET: &str = "geojson";

/// Tabular file formats, told apart by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    /// Delimited text
    Csv,
    /// Excel workbook (`.xlsx`, `.xlsm`)
    Workbook,
}

impl SheetFormat {
    /// Picks the format for `path`. Anything that is not a workbook is CSV.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("xlsx" | "xlsm") => Self::Workbook,
            _ => Self::Csv,
        }
    }
}

/// Reads one sheet of a CSV file or Excel workbook.
///
/// For workbooks, `name` selects the worksheet and defaults to the first one.
/// For CSV files it only names the sheet in diagnostics and defaults to the
/// file stem. Row and column numbers match the source: a workbook whose data
/// starts below row 1 or right of column A keeps those offsets.
///
/// # Errors
///
/// - I/O errors if the file is missing or unreadable.
/// - [`FormatError::Parse`] if a workbook cannot be opened.
/// - [`SourceError::SheetNotFound`] if the workbook has no sheet `name`.
pub fn load_sheet(path: impl AsRef<Path>, name: Option<&str>, delimiter: u8) -> Result<Sheet> {
    let path = path.as_ref();
    match SheetFormat::from_path(path) {
        SheetFormat::Csv => load_csv_sheet(path, name, delimiter),
        SheetFormat::Workbook => load_workbook_sheet(path, name),
    }
}

fn load_csv_sheet(path: &Path, name: Option<&str>, delimiter: u8) -> Result<Sheet> {
    let name = name.map_or_else(
        || {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string())
        },
        str::to_string,
    );

    let file = File::open(path).map_err(|err| IoError::reading(err, "CSV", path))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(file);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.with_read_context("CSV", path)?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    info!("Read {} row(s) from {}", rows.len(), path.display());
    Ok(Sheet::new(name, rows))
}

fn load_workbook_sheet(path: &Path, name: Option<&str>) -> Result<Sheet> {
    let bytes = std::fs::read(path).map_err(|err| IoError::reading(err, "Excel", path))?;
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).map_err(|err| workbook_error(path, &err))?;

    let available = workbook.sheet_names();
    let sheet = match name {
        Some(name) => name.to_string(),
        None => available.first().cloned().unwrap_or_default(),
    };
    if !available.contains(&sheet) {
        return Err(SourceError::SheetNotFound { sheet, available }.into());
    }

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|err| workbook_error(path, &err))?;
    let rows = range_rows(&range);

    info!(
        "Read {} row(s) from sheet '{sheet}' of {}",
        rows.len(),
        path.display()
    );
    Ok(Sheet::new(sheet, rows))
}

/// Lays the used range out from cell A1 so 1-based positions match the
/// workbook.
fn range_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    let Some((first_row, first_column)) = range.start() else {
        return Vec::new();
    };

    let mut rows = vec![Vec::new(); first_row as usize];
    for cells in range.rows() {
        let mut row = vec![String::new(); first_column as usize];
        row.extend(cells.iter().map(ToString::to_string));
        rows.push(row);
    }
    rows
}

fn workbook_error(path: &Path, err: &dyn std::fmt::Display) -> GeoSheetError {
    FormatError::Parse {
        format: "Excel".to_string(),
        path: path.to_path_buf(),
        message: err.to_string(),
    }
    .into()
}

/// Reads a `GeoJSON` feature collection.
///
/// # Errors
///
/// - I/O errors if the file is missing or unreadable.
/// - [`FormatError::Parse`] if it is not valid `GeoJSON`.
/// - [`FormatError::NotAFeatureCollection`] if it holds a single feature or
///   geometry.
pub fn load_collection(path: impl AsRef<Path>) -> Result<FeatureCollection> {
    let path = path.as_ref();
    let contents =
        std::fs::read_to_string(path).map_err(|err| IoError::reading(err, "GeoJSON", path))?;
    let geojson = contents
        .parse::<GeoJson>()
        .map_err(|err| FormatError::Parse {
            format: "GeoJSON".to_string(),
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;

    match geojson {
        GeoJson::FeatureCollection(collection) => {
            info!(
                "Read {} feature(s) from {}",
                collection.features.len(),
                path.display()
            );
            Ok(collection)
        },
        GeoJson::Feature(_) => Err(not_a_collection(path, "Feature")),
        GeoJson::Geometry(_) => Err(not_a_collection(path, "Geometry")),
    }
}

fn not_a_collection(path: &Path, found: &str) -> GeoSheetError {
    FormatError::NotAFeatureCollection {
        path: path.to_path_buf(),
        found: found.to_string(),
    }
    .into()
}

/// Writes a feature collection as pretty-printed `GeoJSON`, replacing any
/// existing file.
///
/// # Errors
///
/// Returns an I/O error if serialization or the write fails.
pub fn save_collection(collection: &FeatureCollection, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut json = serde_json::to_string_pretty(collection).with_write_context("GeoJSON", path)?;
    json.push('\n');
    std::fs::write(path, json).with_write_context("GeoJSON", path)?;

    info!(
        "Wrote {} feature(s) to {}",
        collection.features.len(),
        path.display()
    );
    Ok(())
}

/// Writes records as CSV with an [`EXPORT_HEADER`] row.
///
/// Coordinates are written as JSON arrays in the order they are stored;
/// records without coordinates get an empty cell.
///
/// # Errors
///
/// Returns the underlying CSV error if a write fails.
pub fn write_records_csv<W: Write>(
    records: &[CoordinateRecord],
    writer: W,
) -> std::result::Result<(), csv::Error> {
    let mut writer = Writer::from_writer(writer);
    writer.write_record(EXPORT_HEADER)?;
    for record in records {
        writer.write_record(record_cells(record))?;
    }
    writer.flush()?;
    Ok(())
}

/// Saves records to a CSV file, see [`write_records_csv`].
///
/// # Errors
///
/// - [`FormatError::NothingToWrite`] for an empty record list.
/// - I/O errors if the file cannot be created or written.
pub fn save_records_csv(records: &[CoordinateRecord], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if records.is_empty() {
        return Err(FormatError::NothingToWrite.into());
    }

    let file = File::create(path).with_write_context("CSV", path)?;
    write_records_csv(records, file).with_write_context("CSV", path)?;
    debug!("Wrote {} record(s) to {}", records.len(), path.display());
    Ok(())
}

/// Writes records to a workbook with a single [`EXPORT_SHEET`] worksheet,
/// laid out like [`write_records_csv`].
///
/// # Errors
///
/// - [`FormatError::NothingToWrite`] for an empty record list.
/// - I/O errors if the workbook cannot be built or saved.
pub fn save_records_xlsx(records: &[CoordinateRecord], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if records.is_empty() {
        return Err(FormatError::NothingToWrite.into());
    }

    let write_error = |err: rust_xlsxwriter::XlsxError| IoError::Write {
        format: "Excel".to_string(),
        path: path.to_path_buf(),
        source: err.to_string().into(),
    };

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(EXPORT_SHEET).map_err(write_error)?;
    for (column, title) in (0u16..).zip(EXPORT_HEADER) {
        worksheet.write_string(0, column, title).map_err(write_error)?;
    }
    for (row, record) in (1u32..).zip(records) {
        for (column, cell) in (0u16..).zip(record_cells(record)) {
            if !cell.is_empty() {
                worksheet.write_string(row, column, cell).map_err(write_error)?;
            }
        }
    }
    workbook.save(path).map_err(write_error)?;

    debug!("Wrote {} record(s) to {}", records.len(), path.display());
    Ok(())
}

/// Saves records as a workbook or CSV file, depending on the extension of
/// `path`.
///
/// # Errors
///
/// See [`save_records_csv`] and [`save_records_xlsx`].
pub fn save_records(records: &[CoordinateRecord], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match SheetFormat::from_path(path) {
        SheetFormat::Csv => save_records_csv(records, path),
        SheetFormat::Workbook => save_records_xlsx(records, path),
    }
}

fn record_cells(record: &CoordinateRecord) -> [String; 4] {
    [
        record.geometry_kind.as_str().to_string(),
        record.label.clone(),
        record.description.clone(),
        coordinates_cell(&record.coordinates),
    ]
}

fn coordinates_cell(coordinates: &Coordinates) -> String {
    let value = match coordinates {
        Coordinates::Position(values) => JsonValue::from(values.clone()),
        Coordinates::Path(positions) => JsonValue::from(positions.clone()),
        Coordinates::Rings(rings) => JsonValue::from(rings.clone()),
        Coordinates::Absent => return String::new(),
    };
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::GeometryKind;
    use tempfile::TempDir;

    fn write_workbook(path: &Path) {
        let mut workbook = Workbook::new();
        workbook.add_worksheet().set_name("Notes").unwrap();

        let points = workbook.add_worksheet();
        points.set_name("Points").unwrap();
        points.write_string(0, 1, "Name").unwrap();
        points.write_string(0, 2, "Description").unwrap();
        points.write_string(0, 3, "Coordinates").unwrap();
        points.write_string(1, 1, "Kremlin").unwrap();
        points.write_string(1, 2, "Red Square").unwrap();
        points.write_string(1, 3, "55.75, 37.62").unwrap();
        points.write_number(2, 2, 42).unwrap();
        points.write_string(2, 3, "59.94;30.31").unwrap();

        workbook.save(path).unwrap();
    }

    const COLLECTION: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type":"Feature","geometry":{"type":"Point","coordinates":[37.62,55.75]},"properties":{"iconCaption":"Kremlin"}},
    {"type":"Feature","geometry":{"type":"LineString","coordinates":[[0,0],[1,1]]},"properties":{}}
  ]
}"#;

    #[test]
    fn test_load_sheet_keeps_ragged_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("points.csv");
        std::fs::write(
            &path,
            "Name,Description,Coordinates\nKremlin,Red Square,\"55.75, 37.62\"\nShort\n",
        )
        .unwrap();

        let sheet = load_sheet(&path, None, b',').unwrap();
        assert_eq!(sheet.name, "points");
        assert_eq!(sheet.rows.len(), 3);
        assert_eq!(sheet.rows[1][2], "55.75, 37.62");
        assert_eq!(sheet.rows[2], vec!["Short".to_string()]);
    }

    #[test]
    fn test_load_sheet_with_semicolons() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("points.csv");
        std::fs::write(&path, "a;b;55.75 37.62\n").unwrap();

        let sheet = load_sheet(&path, Some("s"), b';').unwrap();
        assert_eq!(sheet.cell(1, 3), Some("55.75 37.62"));
    }

    #[test]
    fn test_load_sheet_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_sheet(dir.path().join("missing.csv"), None, b',').unwrap_err();
        assert!(matches!(err, GeoSheetError::Io(IoError::FileNotFound { .. })));
    }

    #[test]
    fn test_load_sheet_unreadable_path_is_not_reported_missing() {
        let dir = TempDir::new().unwrap();
        let err = load_sheet(dir.path(), None, b',').unwrap_err();
        assert!(matches!(err, GeoSheetError::Io(IoError::Read { .. })));
    }

    #[test]
    fn test_sheet_format_from_extension() {
        assert_eq!(SheetFormat::from_path(Path::new("a.XLSX")), SheetFormat::Workbook);
        assert_eq!(SheetFormat::from_path(Path::new("a.xlsm")), SheetFormat::Workbook);
        assert_eq!(SheetFormat::from_path(Path::new("a.csv")), SheetFormat::Csv);
        assert_eq!(SheetFormat::from_path(Path::new("points")), SheetFormat::Csv);
    }

    #[test]
    fn test_load_workbook_sheet_by_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("points.xlsx");
        write_workbook(&path);

        let sheet = load_sheet(&path, Some("Points"), b',').unwrap();
        assert_eq!(sheet.name, "Points");
        assert_eq!(sheet.rows.len(), 3);
        assert_eq!(sheet.cell(1, 1), None);
        assert_eq!(sheet.cell(1, 4), Some("Coordinates"));
        assert_eq!(sheet.cell(2, 2), Some("Kremlin"));
        assert_eq!(sheet.cell(2, 4), Some("55.75, 37.62"));
        assert_eq!(sheet.cell(3, 2), None);
        assert_eq!(sheet.cell(3, 3), Some("42"));
    }

    #[test]
    fn test_load_workbook_defaults_to_first_sheet() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("points.xlsx");
        write_workbook(&path);

        let sheet = load_sheet(&path, None, b',').unwrap();
        assert_eq!(sheet.name, "Notes");
        assert!(sheet.rows.is_empty());
    }

    #[test]
    fn test_load_workbook_missing_sheet() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("points.xlsx");
        write_workbook(&path);

        match load_sheet(&path, Some("Stores"), b',').unwrap_err() {
            GeoSheetError::Source(SourceError::SheetNotFound { sheet, available }) => {
                assert_eq!(sheet, "Stores");
                assert_eq!(available, vec!["Notes".to_string(), "Points".to_string()]);
            },
            other => panic!("Expected SheetNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_load_workbook_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_sheet(dir.path().join("missing.xlsx"), None, b',').unwrap_err();
        assert!(matches!(err, GeoSheetError::Io(IoError::FileNotFound { .. })));
    }

    #[test]
    fn test_load_workbook_rejects_non_workbook() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fake.xlsx");
        std::fs::write(&path, "Name,Description\n").unwrap();

        assert!(matches!(
            load_sheet(&path, None, b',').unwrap_err(),
            GeoSheetError::Format(FormatError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_collection_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_collection(dir.path().join("missing.geojson")).unwrap_err();
        assert!(matches!(err, GeoSheetError::Io(IoError::FileNotFound { .. })));
    }

    #[test]
    fn test_load_collection() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("map.geojson");
        std::fs::write(&path, COLLECTION).unwrap();

        let collection = load_collection(&path).unwrap();
        assert_eq!(collection.features.len(), 2);
    }

    #[test]
    fn test_load_collection_rejects_single_feature() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("feature.geojson");
        std::fs::write(
            &path,
            r#"{"type":"Feature","geometry":{"type":"Point","coordinates":[0,0]},"properties":{}}"#,
        )
        .unwrap();

        match load_collection(&path).unwrap_err() {
            GeoSheetError::Format(FormatError::NotAFeatureCollection { found, .. }) => {
                assert_eq!(found, "Feature");
            },
            other => panic!("Expected NotAFeatureCollection, got {other:?}"),
        }
    }

    #[test]
    fn test_load_collection_rejects_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.geojson");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            load_collection(&path).unwrap_err(),
            GeoSheetError::Format(FormatError::Parse { .. })
        ));
    }

    #[test]
    fn test_save_and_reload_collection() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.geojson");
        let output = dir.path().join("out.geojson");
        std::fs::write(&input, COLLECTION).unwrap();

        let collection = load_collection(&input).unwrap();
        save_collection(&collection, &output).unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.contains("\"FeatureCollection\""));
        assert!(written.ends_with('\n'));
        assert_eq!(load_collection(&output).unwrap(), collection);
    }

    #[test]
    fn test_write_records_csv() {
        let records = vec![
            CoordinateRecord::point(vec![37.62, 55.75])
                .with_label("Kremlin")
                .with_description("Red, Square"),
            CoordinateRecord {
                geometry_kind: GeometryKind::LineString,
                label: String::new(),
                description: String::new(),
                coordinates: Coordinates::Path(vec![vec![0.0, 0.0], vec![1.5, 1.0]]),
                marker_color: None,
            },
            CoordinateRecord {
                geometry_kind: GeometryKind::Unknown,
                label: "Cluster".to_string(),
                description: String::new(),
                coordinates: Coordinates::Absent,
                marker_color: None,
            },
        ];

        let mut buffer = Vec::new();
        write_records_csv(&records, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "Type,Name,Description,Coordinates");
        assert_eq!(lines[1], "Point,Kremlin,\"Red, Square\",\"[37.62,55.75]\"");
        assert_eq!(lines[2], "LineString,,,\"[[0.0,0.0],[1.5,1.0]]\"");
        assert_eq!(lines[3], "Unknown,Cluster,,");
    }

    #[test]
    fn test_save_records_xlsx_reads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("features.xlsx");
        let records = vec![
            CoordinateRecord::point(vec![37.62, 55.75]).with_label("Kremlin"),
            CoordinateRecord {
                geometry_kind: GeometryKind::Unknown,
                label: String::new(),
                description: "Cluster".to_string(),
                coordinates: Coordinates::Absent,
                marker_color: None,
            },
        ];

        save_records(&records, &path).unwrap();

        let sheet = load_sheet(&path, Some(EXPORT_SHEET), b',').unwrap();
        assert_eq!(sheet.rows.len(), 3);
        assert_eq!(sheet.cell(1, 1), Some("Type"));
        assert_eq!(sheet.cell(1, 4), Some("Coordinates"));
        assert_eq!(sheet.cell(2, 1), Some("Point"));
        assert_eq!(sheet.cell(2, 2), Some("Kremlin"));
        assert_eq!(sheet.cell(2, 3), None);
        assert_eq!(sheet.cell(2, 4), Some("[37.62,55.75]"));
        assert_eq!(sheet.cell(3, 1), Some("Unknown"));
        assert_eq!(sheet.cell(3, 3), Some("Cluster"));
        assert_eq!(sheet.cell(3, 4), None);
    }

    #[test]
    fn test_save_records_xlsx_rejects_empty_list() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.xlsx");
        assert!(matches!(
            save_records(&[], &path).unwrap_err(),
            GeoSheetError::Format(FormatError::NothingToWrite)
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_save_records_csv_rejects_empty_list() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        assert!(matches!(
            save_records_csv(&[], &path).unwrap_err(),
            GeoSheetError::Format(FormatError::NothingToWrite)
        ));
        assert!(!path.exists());
    }
}
