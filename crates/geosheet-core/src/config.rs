//! YAML configuration for the `convert` pipeline.
//!
//! The file is deserialized into a loose shape where every key is optional,
//! then validated into a [`Config`] with defaults filled in:
//!
//! ```yaml
//! sheet:
//!   file: points.xlsx
//!   name: Points
//!   columns:
//!     name: A
//!     description: B
//!     coordinates: C
//!   start_row: 2
//! geojson:
//!   input: base.geojson
//!   output: result.geojson
//! appearance:
//!   marker_color: "#FF0000"
//! ```

use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::columns::column_index;
use crate::error::{ConfigError, IoError, Result};
use crate::extract::ColumnLayout;

/// First data row when none is configured; row 1 holds the headers.
pub const DEFAULT_START_ROW: usize = 2;
/// Marker color when none is configured.
pub const DEFAULT_MARKER_COLOR: &str = "#FF0000";
/// CSV field delimiter when none is configured.
pub const DEFAULT_DELIMITER: u8 = b',';

/// Validated configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub sheet: SheetConfig,
    pub geojson: GeoJsonConfig,
    pub appearance: AppearanceConfig,
}

/// Where the coordinate rows come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetConfig {
    /// CSV file or Excel workbook holding the rows.
    pub file: PathBuf,
    /// Worksheet to read from a workbook. For CSV files it only names the
    /// sheet in diagnostics.
    pub name: Option<String>,
    /// CSV field delimiter; ignored for workbooks.
    pub delimiter: u8,
    /// Column letters.
    pub columns: ColumnConfig,
    /// 1-based first data row.
    pub start_row: usize,
}

/// Column letters, as written in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnConfig {
    pub name: Option<String>,
    pub description: String,
    pub coordinates: String,
}

/// Input and output feature collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoJsonConfig {
    pub input: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppearanceConfig {
    pub marker_color: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    sheet: RawSheet,
    geojson: RawGeoJson,
    appearance: RawAppearance,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawSheet {
    file: Option<PathBuf>,
    name: Option<String>,
    delimiter: Option<String>,
    columns: RawColumns,
    start_row: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawColumns {
    name: Option<String>,
    description: Option<String>,
    coordinates: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawGeoJson {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawAppearance {
    marker_color: Option<String>,
}

impl Config {
    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, and a
    /// [`ConfigError`] if it does not parse or fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|err| IoError::reading(err, "YAML", path))?;
        let config = Self::from_yaml(&contents, path)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parses and validates configuration text.
    ///
    /// `origin` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the text does not parse or fails
    /// validation.
    pub fn from_yaml(yaml: &str, origin: impl AsRef<Path>) -> Result<Self> {
        let raw: RawConfig = serde_yaml::from_str(yaml).map_err(|source| ConfigError::Parse {
            path: origin.as_ref().to_path_buf(),
            source,
        })?;
        Ok(raw.validate()?)
    }

    /// Resolves the configured column letters into a [`ColumnLayout`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] for letters that do not name a
    /// spreadsheet column.
    pub fn resolve_columns(&self) -> Result<ColumnLayout> {
        let columns = &self.sheet.columns;
        let name = columns
            .name
            .as_deref()
            .map(|letters| resolve("sheet.columns.name", letters))
            .transpose()?;
        let description = resolve("sheet.columns.description", &columns.description)?;
        let coordinates = resolve("sheet.columns.coordinates", &columns.coordinates)?;
        Ok(ColumnLayout::new(name, Some(description), Some(coordinates))?)
    }
}

fn resolve(option: &str, letters: &str) -> std::result::Result<usize, ConfigError> {
    column_index(letters).ok_or_else(|| ConfigError::InvalidOption {
        option: option.to_string(),
        message: format!("'{letters}' is not a column name (expected letters A to XFD)"),
    })
}

fn required<T>(value: Option<T>, option: &str) -> std::result::Result<T, ConfigError> {
    value.ok_or_else(|| ConfigError::MissingRequired {
        option: option.to_string(),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn non_empty_path(value: Option<PathBuf>) -> Option<PathBuf> {
    value.filter(|p| !p.as_os_str().is_empty())
}

impl RawConfig {
    fn validate(self) -> std::result::Result<Config, ConfigError> {
        let file = required(non_empty_path(self.sheet.file), "sheet.file")?;
        let description = required(
            non_empty(self.sheet.columns.description),
            "sheet.columns.description",
        )?;
        let coordinates = required(
            non_empty(self.sheet.columns.coordinates),
            "sheet.columns.coordinates",
        )?;
        let input = required(non_empty_path(self.geojson.input), "geojson.input")?;
        let output = required(non_empty_path(self.geojson.output), "geojson.output")?;

        let delimiter = match self.sheet.delimiter.as_deref() {
            None | Some("") => DEFAULT_DELIMITER,
            Some(text) => match text.as_bytes() {
                &[byte] if byte.is_ascii() => byte,
                _ => {
                    return Err(ConfigError::InvalidOption {
                        option: "sheet.delimiter".to_string(),
                        message: format!("'{text}' must be a single ASCII character"),
                    });
                },
            },
        };

        let start_row = match self.sheet.start_row {
            None | Some(0) => DEFAULT_START_ROW,
            Some(row) => row,
        };

        let marker_color = non_empty(self.appearance.marker_color)
            .unwrap_or_else(|| DEFAULT_MARKER_COLOR.to_string());

        Ok(Config {
            sheet: SheetConfig {
                file,
                name: non_empty(self.sheet.name),
                delimiter,
                columns: ColumnConfig {
                    name: non_empty(self.sheet.columns.name),
                    description,
                    coordinates,
                },
                start_row,
            },
            geojson: GeoJsonConfig { input, output },
            appearance: AppearanceConfig { marker_color },
        })
    }
}
