//! Stats module - yearly accident summaries

mod summary;

pub use summary::{AccidentSummary, SummaryCalculator};
