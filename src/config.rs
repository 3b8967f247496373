//! Configuration Module
//! Data/output locations, sentinel thresholds and map sizing, loadable from JSON.

use crate::error::{FarsError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Values above these thresholds mean "missing" in the FARS coordinate columns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentinelConfig {
    pub longitude: f64,
    pub latitude: f64,
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self {
            longitude: 900.0,
            latitude: 90.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub width: u32,
    pub height: u32,
    pub point_radius: u32,
    /// Degrees added around the point cloud when it collapses to a line or a point.
    pub padding_deg: f64,
    /// Draw the bundled US state outlines behind the points.
    pub draw_boundaries: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            point_radius: 2,
            padding_deg: 0.5,
            draw_boundaries: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarsConfig {
    /// Directory holding the `accident_<year>.csv.bz2` files.
    pub data_dir: PathBuf,
    /// Directory receiving rendered map images.
    pub output_dir: PathBuf,
    /// Read years on the rayon pool.
    pub parallel: bool,
    /// Open each rendered map with the system image viewer.
    pub open_rendered: bool,
    pub sentinels: SentinelConfig,
    pub map: MapConfig,
}

impl Default for FarsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            parallel: false,
            open_rendered: false,
            sentinels: SentinelConfig::default(),
            map: MapConfig::default(),
        }
    }
}

impl FarsConfig {
    /// Load a JSON config file. Missing fields fall back to their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| FarsError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).map_err(|e| FarsError::Config(e.to_string()))
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
