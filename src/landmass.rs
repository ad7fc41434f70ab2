//! World boundary outlines decoded from a TopoJSON topology.

use crate::globe::projection::GeoPoint;
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

/// Object inside the world-atlas topology that holds the boundaries.
pub const LANDMASS_OBJECT: &str = "countries";

#[derive(Error, Debug)]
pub enum TopologyError {
    #[error("invalid topology JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a Topology document, found {0:?}")]
    NotTopology(String),
    #[error("topology has no object named {0:?}")]
    MissingObject(String),
    #[error("arc index {index} out of range ({count} arcs)")]
    ArcOutOfRange { index: i64, count: usize },
}

/// Boundary outlines as geographic polylines. Polygon rings are closed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Landmass {
    pub rings: Vec<Vec<GeoPoint>>,
}

impl Landmass {
    /// Decodes the default boundaries object from a world-atlas document.
    pub fn from_topojson(bytes: &[u8]) -> Result<Self, TopologyError> {
        Self::from_topology_object(bytes, LANDMASS_OBJECT)
    }

    pub fn from_topology_object(bytes: &[u8], object: &str) -> Result<Self, TopologyError> {
        let topology: Topology = serde_json::from_slice(bytes)?;
        if topology.kind != "Topology" {
            return Err(TopologyError::NotTopology(topology.kind));
        }

        let geometry = topology
            .objects
            .get(object)
            .ok_or_else(|| TopologyError::MissingObject(object.to_string()))?;

        let arcs = topology.decode_arcs();
        let mut landmass = Landmass::default();
        landmass.collect_geometry(geometry, &arcs)?;
        log::debug!("Decoded {} boundary rings from {object:?}", landmass.rings.len());
        Ok(landmass)
    }

    fn collect_geometry(&mut self, geometry: &TopoGeometry, arcs: &[Vec<GeoPoint>]) -> Result<(), TopologyError> {
        match geometry.kind.as_deref() {
            Some("GeometryCollection") => {
                for child in &geometry.geometries {
                    self.collect_geometry(child, arcs)?;
                }
            }
            Some("Polygon") | Some("MultiLineString") => {
                let lines: Vec<Vec<i64>> = serde_json::from_value(geometry.arcs.clone())?;
                for line in &lines {
                    self.push_line(line, arcs)?;
                }
            }
            Some("MultiPolygon") => {
                let polygons: Vec<Vec<Vec<i64>>> = serde_json::from_value(geometry.arcs.clone())?;
                for line in polygons.iter().flatten() {
                    self.push_line(line, arcs)?;
                }
            }
            Some("LineString") => {
                let line: Vec<i64> = serde_json::from_value(geometry.arcs.clone())?;
                self.push_line(&line, arcs)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn push_line(&mut self, refs: &[i64], arcs: &[Vec<GeoPoint>]) -> Result<(), TopologyError> {
        let line = stitch(refs, arcs)?;
        if line.len() >= 2 {
            self.rings.push(line);
        }
        Ok(())
    }
}

/// Joins arc references into one line. A negative reference `!i` is arc `i` walked backwards;
/// consecutive arcs share an endpoint, which is kept once.
fn stitch(refs: &[i64], arcs: &[Vec<GeoPoint>]) -> Result<Vec<GeoPoint>, TopologyError> {
    let mut line: Vec<GeoPoint> = Vec::new();
    for &index in refs {
        let (position, reversed) = if index < 0 { (!index, true) } else { (index, false) };
        let arc = usize::try_from(position)
            .ok()
            .and_then(|position| arcs.get(position))
            .ok_or(TopologyError::ArcOutOfRange {
                index,
                count: arcs.len(),
            })?;

        let skip = usize::from(!line.is_empty());
        if reversed {
            line.extend(arc.iter().rev().skip(skip));
        } else {
            line.extend(arc.iter().skip(skip));
        }
    }
    Ok(line)
}

#[derive(Debug, Deserialize)]
struct Topology {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    transform: Option<Transform>,
    #[serde(default)]
    arcs: Vec<Vec<Vec<f64>>>,
    #[serde(default)]
    objects: HashMap<String, TopoGeometry>,
}

impl Topology {
    /// Absolute arc coordinates. Quantised topologies store deltas from the previous position.
    fn decode_arcs(&self) -> Vec<Vec<GeoPoint>> {
        self.arcs
            .iter()
            .map(|arc| {
                let mut x = 0.0;
                let mut y = 0.0;
                arc.iter()
                    .filter(|position| position.len() >= 2)
                    .map(|position| match &self.transform {
                        Some(transform) => {
                            x += position[0];
                            y += position[1];
                            GeoPoint::new(
                                y * transform.scale[1] + transform.translate[1],
                                x * transform.scale[0] + transform.translate[0],
                            )
                        }
                        None => GeoPoint::new(position[1], position[0]),
                    })
                    .collect()
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct Transform {
    scale: [f64; 2],
    translate: [f64; 2],
}

#[derive(Debug, Deserialize)]
struct TopoGeometry {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    arcs: serde_json::Value,
    #[serde(default)]
    geometries: Vec<TopoGeometry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topology(countries: &str) -> String {
        format!(
            r#"{{
                "type": "Topology",
                "transform": {{ "scale": [0.5, 0.5], "translate": [0, 0] }},
                "arcs": [
                    [[0, 0], [10, 0], [0, 10]],
                    [[10, 10], [-10, 0], [0, -10]]
                ],
                "objects": {{ "countries": {countries} }}
            }}"#
        )
    }

    fn points(coords: &[(f64, f64)]) -> Vec<GeoPoint> {
        coords.iter().map(|&(lat, lon)| GeoPoint::new(lat, lon)).collect()
    }

    #[test]
    fn decodes_quantised_polygon() {
        let doc = topology(r#"{ "type": "Polygon", "arcs": [[0, 1]] }"#);
        let landmass = Landmass::from_topojson(doc.as_bytes()).unwrap();
        assert_eq!(
            landmass.rings,
            vec![points(&[(0.0, 0.0), (0.0, 5.0), (5.0, 5.0), (5.0, 0.0), (0.0, 0.0)])]
        );
    }

    #[test]
    fn negative_arc_index_reverses() {
        let doc = topology(r#"{ "type": "Polygon", "arcs": [[-2, -1]] }"#);
        let landmass = Landmass::from_topojson(doc.as_bytes()).unwrap();
        assert_eq!(
            landmass.rings,
            vec![points(&[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0), (0.0, 5.0), (0.0, 0.0)])]
        );
    }

    #[test]
    fn walks_collections_and_skips_empty_geometries() {
        let doc = topology(
            r#"{ "type": "GeometryCollection", "geometries": [
                { "type": "MultiPolygon", "arcs": [[[0, 1]], [[-2, -1]]] },
                { "type": null },
                { "type": "Point", "coordinates": [1, 2] },
                { "type": "LineString", "arcs": [0] }
            ] }"#,
        );
        let landmass = Landmass::from_topojson(doc.as_bytes()).unwrap();
        assert_eq!(landmass.rings.len(), 3);
        assert_eq!(landmass.rings[2].len(), 3);
    }

    #[test]
    fn arcs_without_transform_are_absolute() {
        let doc = r#"{
            "type": "Topology",
            "arcs": [[[2.24, 48.84], [-0.21, 51.43]]],
            "objects": { "countries": { "type": "LineString", "arcs": [0] } }
        }"#;
        let landmass = Landmass::from_topojson(doc.as_bytes()).unwrap();
        assert_eq!(landmass.rings, vec![points(&[(48.84, 2.24), (51.43, -0.21)])]);
    }

    #[test]
    fn rejects_out_of_range_arc() {
        let doc = topology(r#"{ "type": "Polygon", "arcs": [[0, 7]] }"#);
        let err = Landmass::from_topojson(doc.as_bytes()).unwrap_err();
        assert!(matches!(err, TopologyError::ArcOutOfRange { index: 7, count: 2 }));
    }

    #[test]
    fn rejects_missing_object() {
        let doc = topology(r#"{ "type": "Polygon", "arcs": [[0, 1]] }"#);
        let err = Landmass::from_topology_object(doc.as_bytes(), "land").unwrap_err();
        assert!(matches!(err, TopologyError::MissingObject(name) if name == "land"));
    }

    #[test]
    fn rejects_other_documents() {
        let err = Landmass::from_topojson(br#"{ "type": "FeatureCollection" }"#).unwrap_err();
        assert!(matches!(err, TopologyError::NotTopology(kind) if kind == "FeatureCollection"));
        assert!(matches!(
            Landmass::from_topojson(b"not json").unwrap_err(),
            TopologyError::Json(_)
        ));
    }
}
