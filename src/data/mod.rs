//! Data module - FARS file loading and processing

mod loader;
mod processor;

pub use loader::{
    build_filename, f64_values, has_column, i64_values, load_accidents,
    mask_coordinate_sentinels, parse_state_id, parse_year, read_table, unique_states,
    LATITUDE_COL, LONGITUDE_COL, MONTH_COL, STATE_COL, YEAR_COL,
};
pub use processor::{DataProcessor, YearTable};
