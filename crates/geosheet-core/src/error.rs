//! Custom error types for `geosheet` operations.
//!
//! Each stage of the pipeline has its own error enum so that callers can tell
//! a bad coordinate cell apart from a misconfigured sheet or an unusable
//! record. [`GeoSheetError`] ties them together for the end-to-end operations.

use std::path::PathBuf;
use thiserror::Error;

use crate::record::GeometryKind;

/// Main error type for `geosheet` operations.
///
/// Uses `#[error(transparent)]` to delegate display formatting to the
/// underlying error variants.
#[derive(Debug, Error)]
pub enum GeoSheetError {
    /// A coordinate cell could not be parsed
    #[error(transparent)]
    Coordinate(#[from] CoordinateError),

    /// Structural problem with the tabular source
    #[error(transparent)]
    Source(#[from] SourceError),

    /// A record cannot be turned into the requested geometry
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// A sheet row could not be added as a point
    #[error("Cannot add sheet '{sheet}', row {row} (coordinates '{cell}') as a point: {source}")]
    Emit {
        /// Sheet name
        sheet: String,
        /// 1-based row number
        row: usize,
        /// Text of the coordinates cell
        cell: String,
        /// Why the record was refused
        source: GeometryError,
    },

    /// I/O errors (file read/write, path issues)
    #[error(transparent)]
    Io(#[from] IoError),

    /// Document parsing and serialization errors
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A coordinate token failed numeric parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateError {
    /// A token was not a finite base-10 number
    #[error("Malformed coordinate '{text}': '{token}' is not a number")]
    Malformed {
        /// The offending token
        token: String,
        /// The full cell text the token came from
        text: String,
    },
}

/// Structural problems with the tabular source.
///
/// These are fatal to an extraction call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// A required column position was not configured
    #[error("Missing required column: {column}")]
    MissingColumn {
        /// Which column role is missing (e.g. "description")
        column: String,
    },

    /// The first data row is not a valid 1-based row number
    #[error("Invalid start row {row}: rows are numbered from 1")]
    InvalidStartRow {
        /// The rejected row number
        row: usize,
    },

    /// The workbook has no sheet with the configured name
    #[error("Sheet '{sheet}' not found (available: {})", available.join(", "))]
    SheetNotFound {
        /// Requested sheet name
        sheet: String,
        /// Sheets the workbook does have
        available: Vec<String>,
    },

    /// The sheet has no rows at all
    #[error("Sheet '{sheet}' is empty")]
    EmptySheet {
        /// Sheet name
        sheet: String,
    },

    /// No row produced a record
    #[error("No coordinates found in the configured columns of sheet '{sheet}'")]
    NoCoordinates {
        /// Sheet name
        sheet: String,
    },
}

/// A record's coordinates are unsuitable for the requested geometry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// A point needs exactly two coordinate values
    #[error("Invalid point arity: expected 2 coordinate values, found {count}")]
    InvalidPointArity {
        /// Number of values actually present
        count: usize,
    },

    /// The record does not describe a point at all
    #[error("Cannot emit a {kind} record as a point")]
    NotAPoint {
        /// Geometry kind of the record
        kind: GeometryKind,
    },
}

/// I/O related errors.
#[derive(Debug, Error)]
pub enum IoError {
    /// Failed to read from a file
    #[error("Failed to read {format} file '{path}': {source}")]
    Read {
        /// The format being read (e.g., "CSV", "`GeoJSON`")
        format: String,
        /// The file path
        path: PathBuf,
        /// The underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to write to a file
    #[error("Failed to write {format} file '{path}': {source}")]
    Write {
        /// The format being written
        format: String,
        /// The file path
        path: PathBuf,
        /// The underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// File was not found
    #[error("File not found: '{path}'")]
    FileNotFound {
        /// The missing file path
        path: PathBuf,
    },
}

/// Document parsing and serialization errors.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Failed to parse a document
    #[error("Failed to parse {format} '{path}': {message}")]
    Parse {
        /// The format being parsed
        format: String,
        /// The document path
        path: PathBuf,
        /// Description of the parse error
        message: String,
    },

    /// Valid `GeoJSON`, but not a `FeatureCollection`
    #[error("'{path}' is a GeoJSON {found}, expected a FeatureCollection")]
    NotAFeatureCollection {
        /// The document path
        path: PathBuf,
        /// What the document actually holds
        found: String,
    },

    /// An export was requested with no records
    #[error("No records to write")]
    NothingToWrite,
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid option value
    #[error("Invalid {option} option: {message}")]
    InvalidOption {
        /// The option name
        option: String,
        /// Why it's invalid
        message: String,
    },

    /// Required option is missing
    #[error("Missing required option: {option}")]
    MissingRequired {
        /// The missing option name
        option: String,
    },

    /// The configuration file is not valid YAML for this schema
    #[error("Failed to parse configuration '{path}': {source}")]
    Parse {
        /// The configuration file path
        path: PathBuf,
        /// The underlying YAML error
        #[source]
        source: serde_yaml::Error,
    },
}

/// Type alias for Results using `GeoSheetError`.
pub type Result<T> = std::result::Result<T, GeoSheetError>;

impl GeoSheetError {
    /// Get a user-friendly error message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Coordinate(e) => format!("Coordinate error: {e}"),
            Self::Source(e) => format!("Source error: {e}"),
            Self::Geometry(e) => format!("Geometry error: {e}"),
            Self::Emit { .. } => format!("Geometry error: {self}"),
            Self::Io(e) => e.user_message(),
            Self::Format(e) => e.to_string(),
            Self::Config(e) => format!("Configuration error: {e}"),
        }
    }

    /// Get recovery suggestions if available.
    #[must_use]
    pub fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::Source(e) => e.recovery_suggestion(),
            Self::Io(e) => e.recovery_suggestion(),
            Self::Emit { .. } => Some(
                "A point needs exactly two values in the coordinates cell: latitude and longitude."
                    .to_string(),
            ),
            Self::Format(FormatError::Parse { .. } | FormatError::NotAFeatureCollection { .. }) => {
                Some("Check that the file is a valid GeoJSON FeatureCollection.".to_string())
            },
            Self::Config(ConfigError::MissingRequired { .. } | ConfigError::Parse { .. }) => {
                Some("Compare your configuration with config.example.yaml.".to_string())
            },
            _ => None,
        }
    }

    /// Check if this error is potentially recoverable.
    ///
    /// Recoverable errors go away once the user fixes the configuration.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::Source(SourceError::MissingColumn { .. })
        )
    }
}

impl SourceError {
    fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::MissingColumn { .. } => Some(
                "Set sheet.columns.description and sheet.columns.coordinates in the configuration."
                    .to_string(),
            ),
            Self::NoCoordinates { .. } => Some(
                "Check that the coordinates column letter and start_row point at your data."
                    .to_string(),
            ),
            Self::SheetNotFound { .. } => {
                Some("Set sheet.name to one of the sheets in the workbook.".to_string())
            },
            Self::InvalidStartRow { .. } | Self::EmptySheet { .. } => None,
        }
    }
}

impl IoError {
    /// Wraps a failed open or read, reporting a missing file as
    /// [`IoError::FileNotFound`].
    #[must_use]
    pub fn reading(source: std::io::Error, format: &str, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound { path }
        } else {
            Self::Read {
                format: format.to_string(),
                path,
                source: Box::new(source),
            }
        }
    }

    fn user_message(&self) -> String {
        match self {
            Self::Read { format, path, .. } => {
                format!("Failed to read {} file: {}", format, path.display())
            },
            Self::Write { format, path, .. } => {
                format!("Failed to write {} file: {}", format, path.display())
            },
            Self::FileNotFound { path } => {
                format!("File not found: {}", path.display())
            },
        }
    }

    fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::FileNotFound { .. } => {
                Some("Check that the file path is correct and the file exists.".to_string())
            },
            _ => None,
        }
    }
}

/// Extension trait for adding I/O context to errors.
pub trait IoErrorExt<T> {
    /// Add read context to an error.
    ///
    /// # Errors
    ///
    /// Returns an [`IoError::Read`] if the underlying operation fails.
    fn with_read_context(self, format: &str, path: impl Into<PathBuf>) -> Result<T>;

    /// Add write context to an error.
    ///
    /// # Errors
    ///
    /// Returns an [`IoError::Write`] if the underlying operation fails.
    fn with_write_context(self, format: &str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T, E> IoErrorExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_read_context(self, format: &str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| {
            GeoSheetError::Io(IoError::Read {
                format: format.to_string(),
                path: path.into(),
                source: Box::new(e),
            })
        })
    }

    fn with_write_context(self, format: &str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| {
            GeoSheetError::Io(IoError::Write {
                format: format.to_string(),
                path: path.into(),
                source: Box::new(e),
            })
        })
    }
}
