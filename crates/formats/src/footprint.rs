use foundation::math::GeoPoint;
use serde_json::Value;
use tracing::trace;

use crate::winding::make_clockwise;

/// Order of the two numbers in each input position.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum CoordOrder {
    /// `[lat, lon]`
    #[default]
    LatLon,
    /// `[lon, lat]`, the GeoJSON convention.
    LonLat,
}

/// A building at full detail: integer height in meters and a closed,
/// clockwise footprint ring in geographic coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBuilding {
    pub height: u32,
    pub footprint: Vec<GeoPoint>,
}

#[derive(Debug)]
pub enum FootprintError {
    Json(serde_json::Error),
}

impl std::fmt::Display for FootprintError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FootprintError::Json(e) => write!(f, "feature input is not valid JSON: {e}"),
        }
    }
}

impl std::error::Error for FootprintError {}

/// Smallest number of distinct vertices that still encloses an area.
pub const MIN_RING_VERTICES: usize = 3;

/// True when `ring` has at least [`MIN_RING_VERTICES`] distinct vertices.
pub fn has_min_distinct_vertices<T: PartialEq>(ring: &[T]) -> bool {
    let mut distinct: Vec<&T> = Vec::with_capacity(MIN_RING_VERTICES);
    for vertex in ring {
        if !distinct.contains(&vertex) {
            distinct.push(vertex);
            if distinct.len() == MIN_RING_VERTICES {
                return true;
            }
        }
    }
    false
}

pub fn buildings_from_geojson_str(
    payload: &str,
    order: CoordOrder,
) -> Result<Vec<RawBuilding>, FootprintError> {
    let value: Value = serde_json::from_str(payload).map_err(FootprintError::Json)?;
    Ok(normalize_features(&value, order))
}

/// Flattens a feature, a feature collection or an array of either into
/// building records.
///
/// Only `Polygon` features with a positive `height` property qualify; holes
/// are dropped and everything else is skipped silently.
pub fn normalize_features(value: &Value, order: CoordOrder) -> Vec<RawBuilding> {
    let mut out = Vec::new();
    collect(value, order, &mut out);
    out
}

fn collect(value: &Value, order: CoordOrder, out: &mut Vec<RawBuilding>) {
    if let Some(items) = value.as_array() {
        for item in items {
            collect(item, order, out);
        }
        return;
    }

    let Some(obj) = value.as_object() else {
        return;
    };

    if let Some(features) = obj.get("features").and_then(|v| v.as_array()) {
        for feature in features {
            collect(feature, order, out);
        }
        return;
    }

    if obj.get("type").and_then(|v| v.as_str()) != Some("Feature") {
        return;
    }

    match building_from_feature(obj, order) {
        Some(building) => out.push(building),
        None => trace!("skipping feature without polygon footprint or height"),
    }
}

fn building_from_feature(
    feature: &serde_json::Map<String, Value>,
    order: CoordOrder,
) -> Option<RawBuilding> {
    let height = feature
        .get("properties")
        .and_then(|p| p.get("height"))
        .and_then(parse_height)?;

    let geometry = feature.get("geometry")?.as_object()?;
    if geometry.get("type").and_then(|v| v.as_str()) != Some("Polygon") {
        return None;
    }
    let outer = geometry.get("coordinates")?.as_array()?.first()?.as_array()?;

    let mut ring = Vec::with_capacity(outer.len() + 1);
    for position in outer {
        ring.push(parse_position(position, order)?);
    }
    close_ring(&mut ring);
    if !has_min_distinct_vertices(&ring) {
        return None;
    }

    Some(RawBuilding {
        height,
        footprint: make_clockwise(ring),
    })
}

fn parse_height(value: &Value) -> Option<u32> {
    let h = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if h.is_finite() && h > 0.0 {
        Some(h.min(u32::MAX as f64) as u32)
    } else {
        None
    }
}

fn parse_position(value: &Value, order: CoordOrder) -> Option<GeoPoint> {
    let arr = value.as_array()?;
    let a = arr.first()?.as_f64()?;
    let b = arr.get(1)?.as_f64()?;
    Some(match order {
        CoordOrder::LatLon => GeoPoint::new(a, b),
        CoordOrder::LonLat => GeoPoint::new(b, a),
    })
}

fn close_ring(ring: &mut Vec<GeoPoint>) {
    if let (Some(&first), Some(&last)) = (ring.first(), ring.last()) {
        if first != last {
            ring.push(first);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CoordOrder, RawBuilding, buildings_from_geojson_str, normalize_features};
    use foundation::math::GeoPoint;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn feature(height: serde_json::Value, ring: serde_json::Value) -> serde_json::Value {
        json!({
            "type": "Feature",
            "properties": { "height": height },
            "geometry": { "type": "Polygon", "coordinates": [ring] }
        })
    }

    // Clockwise in a north-up view when read as [lon, lat].
    fn cw_lon_lat() -> serde_json::Value {
        json!([
            [13.4010, 52.5205],
            [13.4019, 52.5201],
            [13.4015, 52.5196],
            [13.4004, 52.5195],
            [13.4001, 52.5199],
            [13.4010, 52.5205]
        ])
    }

    #[test]
    fn accepts_single_feature() {
        let out = normalize_features(&feature(json!(20), cw_lon_lat()), CoordOrder::LonLat);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].height, 20);
        assert_eq!(out[0].footprint[0], GeoPoint::new(52.5205, 13.4010));
        assert_eq!(out[0].footprint.len(), 6);
    }

    #[test]
    fn flattens_collections_and_arrays() {
        let fc = json!({
            "type": "FeatureCollection",
            "features": [feature(json!(10), cw_lon_lat()), feature(json!(12), cw_lon_lat())]
        });
        let input = json!([fc, feature(json!(30), cw_lon_lat())]);
        let heights: Vec<u32> = normalize_features(&input, CoordOrder::LonLat)
            .iter()
            .map(|b| b.height)
            .collect();
        assert_eq!(heights, vec![10, 12, 30]);
    }

    #[test]
    fn lat_lon_order_reads_pairs_as_given() {
        let ring = json!([[52.5205, 13.4010], [52.5201, 13.4019], [52.5195, 13.4004]]);
        let out = normalize_features(&feature(json!(5), ring), CoordOrder::LatLon);
        assert_eq!(out[0].footprint[0], GeoPoint::new(52.5205, 13.4010));
    }

    #[test]
    fn skips_non_qualifying_features() {
        let point = json!({
            "type": "Feature",
            "properties": { "height": 10 },
            "geometry": { "type": "Point", "coordinates": [13.4, 52.5] }
        });
        let input = json!([
            point,
            feature(json!(0), cw_lon_lat()),
            feature(json!(-4), cw_lon_lat()),
            feature(json!(null), cw_lon_lat()),
            feature(json!(8), json!([[13.4, 52.5], [13.5, 52.5]])),
            feature(json!(8), json!([[13.4, 52.5], [13.4, 52.5], [13.4, 52.5], [13.4, 52.5]])),
            feature(json!(8), json!([[13.4, 52.5], [13.5, 52.5], [13.4, 52.5], [13.5, 52.5]])),
        ]);
        assert!(normalize_features(&input, CoordOrder::LonLat).is_empty());
    }

    #[test]
    fn coerces_numeric_strings_and_truncates() {
        let out = normalize_features(
            &json!([feature(json!("12.7"), cw_lon_lat()), feature(json!(9.9), cw_lon_lat())]),
            CoordOrder::LonLat,
        );
        let heights: Vec<u32> = out.iter().map(|b| b.height).collect();
        assert_eq!(heights, vec![12, 9]);
    }

    #[test]
    fn closes_open_rings_and_fixes_winding() {
        // Counter-clockwise and open.
        let ring = json!([
            [13.4010, 52.5205],
            [13.4001, 52.5199],
            [13.4004, 52.5195],
            [13.4015, 52.5196],
            [13.4019, 52.5201]
        ]);
        let out = normalize_features(&feature(json!(15), ring), CoordOrder::LonLat);
        let expected = normalize_features(&feature(json!(15), cw_lon_lat()), CoordOrder::LonLat);
        assert_eq!(out, expected);
    }

    #[test]
    fn ignores_holes() {
        let input = json!({
            "type": "Feature",
            "properties": { "height": 7 },
            "geometry": {
                "type": "Polygon",
                "coordinates": [cw_lon_lat(), [[13.4008, 52.5200], [13.4009, 52.5200], [13.4009, 52.5199], [13.4008, 52.5200]]]
            }
        });
        let out = normalize_features(&input, CoordOrder::LonLat);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].footprint.len(), 6);
    }

    #[test]
    fn parse_error_is_reported() {
        assert!(buildings_from_geojson_str("{not json", CoordOrder::LonLat).is_err());
        let ok = buildings_from_geojson_str(r#"{"features": []}"#, CoordOrder::LonLat).unwrap();
        assert_eq!(ok, Vec::<RawBuilding>::new());
    }
}
