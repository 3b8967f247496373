//! Charts module - State map rendering

mod basemap;
mod map;

pub use basemap::{BaseMap, StateOutline};
pub use map::{MapBounds, MapSurface, PngMapSurface, StateMap, MIN_PADDING_DEG};
