//! GeoJSON import for Point features.

use crate::error::{ClusterError, Result};
use crate::marker::Marker;
use geojson::{Feature, GeoJson, JsonObject, Value};
use markercluster_types::point::LatLng;

/// Parse a GeoJSON document into markers carrying each feature's properties.
///
/// Accepts a FeatureCollection, a single Feature or a bare Point geometry.
/// Features with other geometry types are skipped. Positions follow GeoJSON
/// axis order (`[lng, lat]`).
///
/// ```rust
/// use markercluster::markers_from_geojson;
///
/// let json = r#"{
///   "type": "FeatureCollection",
///   "features": [
///     {"type": "Feature", "geometry": {"type": "Point", "coordinates": [2.35, 48.85]},
///      "properties": {"name": "Paris"}}
///   ]
/// }"#;
/// let markers = markers_from_geojson(json)?;
/// assert_eq!(markers[0].position().lat(), 48.85);
/// assert_eq!(markers[0].data()["name"], "Paris");
/// # Ok::<(), markercluster::ClusterError>(())
/// ```
pub fn markers_from_geojson(input: &str) -> Result<Vec<Marker<JsonObject>>> {
    let geojson: GeoJson = input
        .parse()
        .map_err(|e| ClusterError::InvalidGeoJson(format!("Failed to parse GeoJSON: {}", e)))?;

    match geojson {
        GeoJson::FeatureCollection(collection) => {
            let total = collection.features.len();
            let mut markers = Vec::with_capacity(total);
            for feature in collection.features {
                if let Some(marker) = feature_to_marker(feature)? {
                    markers.push(marker);
                }
            }
            if markers.len() < total {
                log::debug!(
                    "Skipped {} non-point features while importing GeoJSON",
                    total - markers.len()
                );
            }
            Ok(markers)
        }
        GeoJson::Feature(feature) => Ok(feature_to_marker(feature)?.into_iter().collect()),
        GeoJson::Geometry(geometry) => match geometry.value {
            Value::Point(coords) => Ok(vec![Marker::new(
                position_from_coords(&coords)?,
                JsonObject::new(),
            )]),
            _ => Err(ClusterError::InvalidGeoJson(
                "GeoJSON geometry is not a Point".to_string(),
            )),
        },
    }
}

fn feature_to_marker(feature: Feature) -> Result<Option<Marker<JsonObject>>> {
    let Some(geometry) = feature.geometry else {
        return Ok(None);
    };
    let Value::Point(coords) = geometry.value else {
        return Ok(None);
    };
    let position = position_from_coords(&coords)?;
    Ok(Some(Marker::new(
        position,
        feature.properties.unwrap_or_default(),
    )))
}

fn position_from_coords(coords: &[f64]) -> Result<LatLng> {
    if coords.len() < 2 {
        return Err(ClusterError::InvalidGeoJson(
            "Point must have at least 2 coordinates".to_string(),
        ));
    }
    let position = LatLng::new(coords[1], coords[0]);
    if !position.is_finite() {
        return Err(ClusterError::InvalidGeoJson(
            "Point coordinates must be finite".to_string(),
        ));
    }
    Ok(position)
}
