//! In-place edits of a `GeoJSON` feature collection.
//!
//! Sheets store positions as (latitude, longitude) while `GeoJSON` wants
//! (longitude, latitude). [`add_point`] is the one place where the two values
//! are swapped.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use log::debug;

use crate::error::GeometryError;
use crate::record::{CoordinateRecord, GeometryKind};

/// Property holding the feature's display name.
pub const ICON_CAPTION: &str = "iconCaption";
/// Property holding the feature's description.
pub const DESCRIPTION: &str = "description";
/// Property holding the marker color.
pub const MARKER_COLOR: &str = "marker-color";

/// Appends a point feature built from `record` to the end of `collection`.
///
/// The record's (latitude, longitude) pair is written as a `[longitude,
/// latitude]` point. `iconCaption`, `description` and `marker-color` are set
/// only for non-empty values; empty ones are left out entirely. Existing
/// features are never merged or deduplicated.
///
/// # Errors
///
/// - [`GeometryError::NotAPoint`] when the record is not a point.
/// - [`GeometryError::InvalidPointArity`] when it does not hold exactly two
///   values. The collection is left untouched.
pub fn add_point(
    collection: &mut FeatureCollection,
    record: &CoordinateRecord,
    color: &str,
) -> Result<(), GeometryError> {
    if record.geometry_kind != GeometryKind::Point {
        return Err(GeometryError::NotAPoint {
            kind: record.geometry_kind,
        });
    }
    let values = record
        .coordinates
        .as_position()
        .ok_or(GeometryError::InvalidPointArity { count: 0 })?;
    let &[latitude, longitude] = values else {
        return Err(GeometryError::InvalidPointArity {
            count: values.len(),
        });
    };

    let mut properties = JsonObject::new();
    for (key, value) in [
        (ICON_CAPTION, record.label.as_str()),
        (DESCRIPTION, record.description.as_str()),
        (MARKER_COLOR, color),
    ] {
        if !value.is_empty() {
            properties.insert(key.to_string(), JsonValue::from(value));
        }
    }

    collection.features.push(Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![longitude, latitude]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    });
    debug!("Added point {record}");
    Ok(())
}

/// Removes every point feature from `collection`, returning how many went.
///
/// Features without a geometry, and features of any other type, are kept in
/// their original order.
pub fn remove_all_points(collection: &mut FeatureCollection) -> usize {
    let before = collection.features.len();
    collection.features.retain(|feature| !is_point(feature));
    let removed = before - collection.features.len();
    debug!(
        "Removed {removed} point feature(s), {} kept",
        collection.features.len()
    );
    removed
}

fn is_point(feature: &Feature) -> bool {
    matches!(
        feature.geometry.as_ref().map(|geometry| &geometry.value),
        Some(Value::Point(_))
    )
}
