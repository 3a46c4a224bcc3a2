//! Reading coordinate records back out of a `GeoJSON` feature collection.

use geojson::{Feature, FeatureCollection, JsonValue, Value};

use crate::mutate::{DESCRIPTION, ICON_CAPTION, MARKER_COLOR};
use crate::record::{CoordinateRecord, Coordinates, GeometryKind};

/// Turns every feature of `collection` into a [`CoordinateRecord`].
///
/// One record per feature, in feature order. Coordinates are copied as they
/// appear in the document, without swapping axes. Geometry types other than
/// `Point`, `LineString` and `Polygon`, and features without a geometry,
/// become [`GeometryKind::Unknown`] records with absent coordinates.
#[must_use]
pub fn read(collection: &FeatureCollection) -> Vec<CoordinateRecord> {
    collection.features.iter().map(feature_to_record).collect()
}

fn feature_to_record(feature: &Feature) -> CoordinateRecord {
    let (geometry_kind, coordinates) = match feature.geometry.as_ref().map(|g| &g.value) {
        Some(Value::Point(position)) => {
            (GeometryKind::Point, Coordinates::Position(position.clone()))
        },
        Some(Value::LineString(line)) => {
            (GeometryKind::LineString, Coordinates::Path(line.clone()))
        },
        Some(Value::Polygon(rings)) => (GeometryKind::Polygon, Coordinates::Rings(rings.clone())),
        _ => (GeometryKind::Unknown, Coordinates::Absent),
    };

    CoordinateRecord {
        geometry_kind,
        label: string_property(feature, ICON_CAPTION).unwrap_or_default(),
        description: string_property(feature, DESCRIPTION).unwrap_or_default(),
        coordinates,
        marker_color: string_property(feature, MARKER_COLOR),
    }
}

/// Returns a property's value if it is a string; anything else reads as absent.
fn string_property(feature: &Feature, key: &str) -> Option<String> {
    feature
        .property(key)
        .and_then(JsonValue::as_str)
        .map(str::to_string)
}
