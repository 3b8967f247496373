//! Error types shared by the loader, summarizer and map renderer.

use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FarsError {
    #[error("file '{}' does not exist", .path.display())]
    FileNotFound { path: PathBuf },
    #[error("invalid STATE: {state}")]
    InvalidState { state: i64 },
    #[error("invalid year: {0:?}")]
    InvalidYear(String),
    #[error("invalid state id: {0:?}")]
    InvalidStateId(String),
    #[error("missing column: {0}")]
    MissingColumn(String),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to render map: {0}")]
    Render(String),
    #[error("Failed to load config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FarsError>;
