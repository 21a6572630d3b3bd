//! Neighbourhood Boundary Module
//! Parses the 140-neighbourhood GeoJSON into keyed polygon regions.

use crate::data::schema::{normalize_numeric_label, AREA_NAME, AREA_SHORT_CODE};
use geojson::{GeoJson, PolygonType};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoundaryError {
    #[error("Invalid GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),
    #[error("Expected a FeatureCollection")]
    NotFeatureCollection,
    #[error("Feature {index} has no usable '{property}' property")]
    MissingProperty {
        index: usize,
        property: &'static str,
    },
    #[error("Area {code} has unsupported geometry ({kind})")]
    UnsupportedGeometry { code: String, kind: String },
    #[error("Area code {0} appears more than once")]
    DuplicateAreaCode(String),
}

/// Closed ring of `[lon, lat]` positions.
pub type Ring = Vec<[f64; 2]>;

/// A named polygon region at the 140-neighbourhood resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighbourhoodBoundary {
    /// Normalised area code, comparable with normalised `HOOD_140` values.
    pub area_code: String,
    pub area_name: String,
    /// Exterior rings, one per polygon part.
    pub rings: Vec<Ring>,
}

impl NeighbourhoodBoundary {
    /// Bounding box as `(min, max)` corners, `None` without positions.
    pub fn bounds(&self) -> Option<([f64; 2], [f64; 2])> {
        let mut points = self.rings.iter().flatten();
        let first = *points.next()?;
        Some(points.fold((first, first), |(lo, hi), p| {
            (
                [lo[0].min(p[0]), lo[1].min(p[1])],
                [hi[0].max(p[0]), hi[1].max(p[1])],
            )
        }))
    }
}

/// Parse a GeoJSON document. Area codes must be unique.
pub fn parse_boundaries(text: &str) -> Result<Vec<NeighbourhoodBoundary>, BoundaryError> {
    let collection = match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => collection,
        _ => return Err(BoundaryError::NotFeatureCollection),
    };

    let mut seen = HashSet::new();
    let mut boundaries = Vec::with_capacity(collection.features.len());

    for (index, feature) in collection.features.iter().enumerate() {
        let area_code = feature
            .property(AREA_SHORT_CODE)
            .and_then(property_text)
            .map(|code| normalize_numeric_label(&code))
            .filter(|code| !code.is_empty())
            .ok_or(BoundaryError::MissingProperty {
                index,
                property: AREA_SHORT_CODE,
            })?;
        let area_name = feature
            .property(AREA_NAME)
            .and_then(property_text)
            .map(|name| name.trim().to_string())
            .ok_or(BoundaryError::MissingProperty {
                index,
                property: AREA_NAME,
            })?;

        let rings = match feature.geometry.as_ref().map(|g| &g.value) {
            Some(geojson::Value::Polygon(polygon)) => vec![exterior_ring(polygon)],
            Some(geojson::Value::MultiPolygon(parts)) => parts.iter().map(exterior_ring).collect(),
            Some(other) => {
                return Err(BoundaryError::UnsupportedGeometry {
                    code: area_code,
                    kind: geometry_kind(other).to_string(),
                })
            }
            None => {
                return Err(BoundaryError::UnsupportedGeometry {
                    code: area_code,
                    kind: "null".to_string(),
                })
            }
        };

        if !seen.insert(area_code.clone()) {
            return Err(BoundaryError::DuplicateAreaCode(area_code));
        }

        boundaries.push(NeighbourhoodBoundary {
            area_code,
            area_name,
            rings,
        });
    }

    Ok(boundaries)
}

fn property_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn geometry_kind(value: &geojson::Value) -> &'static str {
    match value {
        geojson::Value::Point(_) => "Point",
        geojson::Value::MultiPoint(_) => "MultiPoint",
        geojson::Value::LineString(_) => "LineString",
        geojson::Value::MultiLineString(_) => "MultiLineString",
        geojson::Value::GeometryCollection(_) => "GeometryCollection",
        _ => "Polygon",
    }
}

fn exterior_ring(polygon: &PolygonType) -> Ring {
    polygon
        .first()
        .map(|ring| {
            ring.iter()
                .filter(|pos| pos.len() >= 2)
                .map(|pos| [pos[0], pos[1]])
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(code: &str, name: &str, geometry: &str) -> String {
        format!(
            r#"{{ "type": "Feature", "properties": {{ "AREA_SHORT_CODE": {code}, "AREA_NAME": "{name}" }}, "geometry": {geometry} }}"#
        )
    }

    fn collection(features: &[String]) -> String {
        format!(
            r#"{{ "type": "FeatureCollection", "features": [{}] }}"#,
            features.join(",")
        )
    }

    const SQUARE: &str =
        r#"{ "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]] }"#;

    #[test]
    fn parses_polygons_and_multipolygons() {
        let multi = r#"{ "type": "MultiPolygon", "coordinates": [
            [[[0,0],[1,0],[1,1],[0,0]]],
            [[[2,2],[3,2],[3,3],[2,2]]]
        ] }"#;
        let text = collection(&[
            feature("\"097\"", "Yonge-St.Clair", SQUARE),
            feature("1", "West Humber-Clairville", multi),
        ]);

        let boundaries = parse_boundaries(&text).unwrap();
        assert_eq!(boundaries.len(), 2);
        assert_eq!(boundaries[0].area_code, "97");
        assert_eq!(boundaries[0].area_name, "Yonge-St.Clair");
        assert_eq!(boundaries[0].rings.len(), 1);
        assert_eq!(boundaries[1].area_code, "1");
        assert_eq!(boundaries[1].rings.len(), 2);
        assert_eq!(boundaries[1].bounds(), Some(([0.0, 0.0], [3.0, 3.0])));
    }

    #[test]
    fn rejects_duplicate_area_codes() {
        let text = collection(&[
            feature("\"97\"", "A", SQUARE),
            feature("97", "B", SQUARE),
        ]);
        assert!(matches!(
            parse_boundaries(&text),
            Err(BoundaryError::DuplicateAreaCode(code)) if code == "97"
        ));
    }

    #[test]
    fn rejects_missing_code() {
        let text = collection(&[format!(
            r#"{{ "type": "Feature", "properties": {{ "AREA_NAME": "A" }}, "geometry": {SQUARE} }}"#
        )]);
        assert!(matches!(
            parse_boundaries(&text),
            Err(BoundaryError::MissingProperty { index: 0, property: AREA_SHORT_CODE })
        ));
    }

    #[test]
    fn rejects_point_geometry() {
        let point = r#"{ "type": "Point", "coordinates": [0, 0] }"#;
        let text = collection(&[feature("1", "A", point)]);
        assert!(matches!(
            parse_boundaries(&text),
            Err(BoundaryError::UnsupportedGeometry { .. })
        ));
    }

    #[test]
    fn rejects_non_collection() {
        assert!(matches!(
            parse_boundaries(SQUARE),
            Err(BoundaryError::NotFeatureCollection)
        ));
        assert!(matches!(
            parse_boundaries("not json"),
            Err(BoundaryError::GeoJson(_))
        ));
    }
}
