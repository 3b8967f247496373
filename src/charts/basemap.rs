//! US State Base Map
//! Simplified state outlines keyed by FIPS code (the FARS `STATE` value),
//! bundled as GeoJSON and clipped to the area being plotted.

use super::map::MapBounds;
use crate::error::{FarsError, Result};
use geojson::{GeoJson, Value};

const US_STATES_GEOJSON: &str = include_str!("../../assets/us_states.geojson");

/// One state's outline rings as `(longitude, latitude)` vertices.
#[derive(Debug, Clone)]
pub struct StateOutline {
    pub state: i64,
    pub name: String,
    pub rings: Vec<Vec<(f64, f64)>>,
}

impl StateOutline {
    /// Extent of all rings.
    pub fn bounds(&self) -> Option<MapBounds> {
        let vertices: Vec<(f64, f64)> = self.rings.iter().flatten().copied().collect();
        MapBounds::from_points(&vertices, 0.0)
    }
}

#[derive(Debug, Clone)]
pub struct BaseMap {
    outlines: Vec<StateOutline>,
}

impl BaseMap {
    /// The bundled US state outlines.
    pub fn us_states() -> Result<Self> {
        Self::from_geojson(US_STATES_GEOJSON)
    }

    /// Parse a FeatureCollection whose features carry a numeric `STATE`
    /// property and Polygon or MultiPolygon geometry. Other features are skipped.
    pub fn from_geojson(source: &str) -> Result<Self> {
        let geojson = source.parse::<GeoJson>().map_err(map_err)?;
        let GeoJson::FeatureCollection(collection) = geojson else {
            return Err(FarsError::Render(
                "base map must be a GeoJSON FeatureCollection".to_string(),
            ));
        };

        let mut outlines = Vec::new();
        for feature in collection.features {
            let Some(state) = feature.property("STATE").and_then(|v| v.as_i64()) else {
                continue;
            };
            let name = feature
                .property("NAME")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            let Some(geometry) = feature.geometry else {
                continue;
            };

            let rings = match geometry.value {
                Value::Polygon(polygon) => polygon.iter().map(|r| to_ring(r)).collect(),
                Value::MultiPolygon(polygons) => polygons
                    .iter()
                    .flatten()
                    .map(|r| to_ring(r))
                    .collect(),
                _ => continue,
            };
            outlines.push(StateOutline { state, name, rings });
        }

        Ok(Self { outlines })
    }

    pub fn outlines(&self) -> &[StateOutline] {
        &self.outlines
    }

    pub fn state(&self, state: i64) -> Option<&StateOutline> {
        self.outlines.iter().find(|o| o.state == state)
    }

    /// Every ring clipped to `bounds`, tagged with its state. Rings entirely outside are dropped.
    pub fn clipped_rings(&self, bounds: &MapBounds) -> Vec<(i64, Vec<(f64, f64)>)> {
        self.outlines
            .iter()
            .flat_map(|outline| {
                outline
                    .rings
                    .iter()
                    .map(move |ring| (outline.state, clip_ring(ring, bounds)))
            })
            .filter(|(_, ring)| ring.len() >= 3)
            .collect()
    }
}

fn to_ring(positions: &[Vec<f64>]) -> Vec<(f64, f64)> {
    positions
        .iter()
        .filter_map(|p| Some((*p.first()?, *p.get(1)?)))
        .collect()
}

fn map_err(e: impl std::fmt::Display) -> FarsError {
    FarsError::Render(format!("invalid base map: {}", e))
}

#[derive(Clone, Copy)]
enum Edge {
    Left(f64),
    Right(f64),
    Bottom(f64),
    Top(f64),
}

impl Edge {
    fn inside(self, (x, y): (f64, f64)) -> bool {
        match self {
            Edge::Left(v) => x >= v,
            Edge::Right(v) => x <= v,
            Edge::Bottom(v) => y >= v,
            Edge::Top(v) => y <= v,
        }
    }

    fn intersect(self, (x1, y1): (f64, f64), (x2, y2): (f64, f64)) -> (f64, f64) {
        match self {
            Edge::Left(v) | Edge::Right(v) => {
                let t = (v - x1) / (x2 - x1);
                (v, y1 + t * (y2 - y1))
            }
            Edge::Bottom(v) | Edge::Top(v) => {
                let t = (v - y1) / (y2 - y1);
                (x1 + t * (x2 - x1), v)
            }
        }
    }
}

/// Sutherland-Hodgman clip of a closed ring against an axis-aligned box.
fn clip_ring(ring: &[(f64, f64)], bounds: &MapBounds) -> Vec<(f64, f64)> {
    let edges = [
        Edge::Left(bounds.lon_min),
        Edge::Right(bounds.lon_max),
        Edge::Bottom(bounds.lat_min),
        Edge::Top(bounds.lat_max),
    ];

    let mut output = ring.to_vec();
    for edge in edges {
        let input = std::mem::take(&mut output);
        let Some(&last) = input.last() else {
            break;
        };
        let mut prev = last;
        for &current in &input {
            match (edge.inside(current), edge.inside(prev)) {
                (true, true) => output.push(current),
                (true, false) => {
                    output.push(edge.intersect(prev, current));
                    output.push(current);
                }
                (false, true) => output.push(edge.intersect(prev, current)),
                (false, false) => {}
            }
            prev = current;
        }
    }
    output
}
