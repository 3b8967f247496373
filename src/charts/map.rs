//! State Map Renderer
//! Draws accident locations on a longitude/latitude frame with plotters.
//!
//! Layout:
//! 1. Caption: "FARS accidents: state {id}, {year}"
//! 2. Coordinate mesh scoped to the bounding box of the points
//! 3. State outlines clipped to that box, the mapped state shaded
//! 4. One filled marker per accident

use super::basemap::BaseMap;
use crate::config::MapConfig;
use crate::error::{FarsError, Result};
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const POINT_COLOR: RGBColor = RGBColor(231, 76, 60);
const GRID_COLOR: RGBColor = RGBColor(200, 200, 200);
const BORDER_COLOR: RGBColor = RGBColor(96, 125, 139);
const STATE_FILL: RGBColor = RGBColor(189, 215, 238);

/// Smallest padding applied to a collapsed axis, so plotters never gets an empty range.
pub const MIN_PADDING_DEG: f64 = 0.01;

/// Longitude/latitude extent of a set of points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl MapBounds {
    /// Bounding box of `points`, widened by `padding` on any axis that has zero extent.
    ///
    /// A `padding` below `MIN_PADDING_DEG` (including zero or negative) is raised to it.
    pub fn from_points(points: &[(f64, f64)], padding: f64) -> Option<Self> {
        let padding = padding.max(MIN_PADDING_DEG);
        let (first, rest) = points.split_first()?;
        let mut bounds = MapBounds {
            lon_min: first.0,
            lon_max: first.0,
            lat_min: first.1,
            lat_max: first.1,
        };
        for &(lon, lat) in rest {
            bounds.lon_min = bounds.lon_min.min(lon);
            bounds.lon_max = bounds.lon_max.max(lon);
            bounds.lat_min = bounds.lat_min.min(lat);
            bounds.lat_max = bounds.lat_max.max(lat);
        }

        if bounds.lon_max - bounds.lon_min <= f64::EPSILON {
            bounds.lon_min -= padding;
            bounds.lon_max += padding;
        }
        if bounds.lat_max - bounds.lat_min <= f64::EPSILON {
            bounds.lat_min -= padding;
            bounds.lat_max += padding;
        }
        Some(bounds)
    }
}

/// Everything a surface needs to draw one state's accidents.
#[derive(Debug, Clone)]
pub struct StateMap<'a> {
    pub state: i64,
    pub year: i32,
    pub bounds: MapBounds,
    pub points: &'a [(f64, f64)],
}

/// Target that state maps are drawn onto.
pub trait MapSurface {
    fn draw(&mut self, map: &StateMap<'_>) -> Result<()>;
}

/// Renders maps to PNG files named `state_<id>_<year>.png`.
pub struct PngMapSurface {
    output_dir: PathBuf,
    config: MapConfig,
    open_rendered: bool,
    base_map: Option<BaseMap>,
    rendered: Vec<PathBuf>,
}

impl PngMapSurface {
    pub fn new(output_dir: impl Into<PathBuf>, config: MapConfig) -> Self {
        Self {
            output_dir: output_dir.into(),
            config,
            open_rendered: false,
            base_map: None,
            rendered: Vec::new(),
        }
    }

    /// Open each rendered image with the system viewer.
    pub fn with_open_rendered(mut self, open_rendered: bool) -> Self {
        self.open_rendered = open_rendered;
        self
    }

    /// Draw these state outlines behind the points.
    pub fn with_base_map(mut self, base_map: BaseMap) -> Self {
        self.base_map = Some(base_map);
        self
    }

    pub fn output_path(&self, state: i64, year: i32) -> PathBuf {
        self.output_dir.join(format!("state_{}_{}.png", state, year))
    }

    /// Files written so far, in render order.
    pub fn rendered(&self) -> &[PathBuf] {
        &self.rendered
    }

    fn render_png(&self, path: &Path, map: &StateMap<'_>) -> Result<()> {
        let radius = i32::try_from(self.config.point_radius).map_err(render_err)?;

        let root = BitMapBackend::new(path, (self.config.width, self.config.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let bounds = map.bounds;
        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("FARS accidents: state {}, {}", map.state, map.year),
                ("sans-serif", 24),
            )
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(bounds.lon_min..bounds.lon_max, bounds.lat_min..bounds.lat_max)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_desc("Longitude")
            .y_desc("Latitude")
            .light_line_style(GRID_COLOR.mix(0.4).stroke_width(1))
            .draw()
            .map_err(render_err)?;

        if let Some(base_map) = &self.base_map {
            let rings = base_map.clipped_rings(&bounds);
            chart
                .draw_series(
                    rings
                        .iter()
                        .filter(|(state, _)| *state == map.state)
                        .map(|(_, ring)| Polygon::new(ring.clone(), STATE_FILL.mix(0.5).filled())),
                )
                .map_err(render_err)?;
            chart
                .draw_series(rings.iter().map(|(_, ring)| {
                    let mut closed = ring.clone();
                    closed.push(ring[0]);
                    PathElement::new(closed, BORDER_COLOR.stroke_width(1))
                }))
                .map_err(render_err)?;
        }

        chart
            .draw_series(
                map.points
                    .iter()
                    .map(|&(lon, lat)| Circle::new((lon, lat), radius, POINT_COLOR.filled())),
            )
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
        Ok(())
    }
}

impl MapSurface for PngMapSurface {
    fn draw(&mut self, map: &StateMap<'_>) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_path(map.state, map.year);
        self.render_png(&path, map)?;
        info!(path = %path.display(), points = map.points.len(), "rendered state map");

        if self.open_rendered {
            if let Err(e) = open::that(&path) {
                warn!("could not open {}: {}", path.display(), e);
            }
        }
        self.rendered.push(path);
        Ok(())
    }
}

fn render_err(e: impl std::fmt::Display) -> FarsError {
    FarsError::Render(e.to_string())
}
