//! The normalized coordinate record shared by both conversion directions.
//!
//! A [`CoordinateRecord`] is produced either from a sheet row (always a point,
//! in latitude/longitude order) or from a `GeoJSON` feature (any kind, in the
//! document's own axis order). Records are plain values: they never point back
//! at the row or feature they came from.

use std::fmt;

/// Shape category of a record's coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    /// A single position.
    Point,
    /// A sequence of positions.
    LineString,
    /// A sequence of linear rings.
    Polygon,
    /// Anything else, including a missing geometry.
    Unknown,
}

impl GeometryKind {
    /// Returns the `GeoJSON` type name, or `"Unknown"`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw coordinate structure of a record.
///
/// Nested structure is carried as-is; nothing here interprets rings or checks
/// that a polygon is closed.
#[derive(Debug, Clone, PartialEq)]
pub enum Coordinates {
    /// Values of a single position, in source axis order.
    Position(Vec<f64>),
    /// Positions of a line.
    Path(Vec<Vec<f64>>),
    /// Rings of a polygon.
    Rings(Vec<Vec<Vec<f64>>>),
    /// No usable coordinates.
    Absent,
}

impl Coordinates {
    /// Returns the position values if this is a single position.
    #[must_use]
    pub fn as_position(&self) -> Option<&[f64]> {
        match self {
            Coordinates::Position(values) => Some(values),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Coordinates::Absent)
    }
}

/// One location, independent of which direction it is travelling in.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateRecord {
    /// How `coordinates` is shaped.
    pub geometry_kind: GeometryKind,
    /// Short display name; empty when absent.
    pub label: String,
    /// Human-readable annotation; empty when absent.
    pub description: String,
    /// Coordinates in source axis order.
    pub coordinates: Coordinates,
    /// Display color read back from a feature, if any.
    pub marker_color: Option<String>,
}

impl CoordinateRecord {
    /// Creates a point record from parsed values in (latitude, longitude) order.
    #[must_use]
    pub fn point(values: Vec<f64>) -> Self {
        Self {
            geometry_kind: GeometryKind::Point,
            label: String::new(),
            description: String::new(),
            coordinates: Coordinates::Position(values),
            marker_color: None,
        }
    }

    /// Sets the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn has_label(&self) -> bool {
        !self.label.is_empty()
    }

    #[must_use]
    pub fn has_description(&self) -> bool {
        !self.description.is_empty()
    }
}

impl fmt::Display for CoordinateRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.has_label() {
            self.label.as_str()
        } else {
            "<unnamed>"
        };
        write!(f, "{} {name}", self.geometry_kind)?;
        if let Some(values) = self.coordinates.as_position() {
            let joined = values
                .iter()
                .map(f64::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, " ({joined})")?;
        }
        Ok(())
    }
}
