//! `geosheet-core` converts spreadsheet coordinate rows into `GeoJSON` point
//! features and reads features back out as records.
//!
//! This crate includes:
//! - **Coordinate parsing**: free-form cells such as `"55.75, 37.62"` into numbers ([`coordinates`]).
//! - **Records**: the [`record::CoordinateRecord`] shared by both directions.
//! - **Extraction**: sheet rows into records, with per-row diagnostics ([`extract`]).
//! - **Mutation**: appending points to, and stripping points from, a feature collection ([`mutate`]).
//! - **Reading**: feature collections back into records ([`reader`]).
//!
//! Configuration, file I/O and the end-to-end [`operations`] used by the CLI
//! live alongside the core modules.

pub mod columns;
pub mod config;
pub mod coordinates;
pub mod error;
pub mod extract;
pub mod io;
pub mod mutate;
pub mod operations;
pub mod reader;
pub mod record;

pub use error::{GeoSheetError, Result};
pub use extract::{ColumnLayout, Extraction, RowDiagnostic, Sheet};
pub use record::{CoordinateRecord, Coordinates, GeometryKind};
