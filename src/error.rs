//! Error taxonomy for the reconciliation pipelines.
//!
//! Only integration failures are errors. Data-quality problems (blank
//! fields, unparseable dates, rows the resolver cannot reconcile) are
//! absorbed with sentinels and reported in aggregate instead.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal pipeline failure.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("required input file not found: {}", path.display())]
    MissingRequiredFile { path: PathBuf },
    #[error("required column '{column}' missing from {file}")]
    MissingRequiredColumn { file: String, column: String },
    #[error(
        "2022 join produced 0 rows ({results_rows} result rows, {venue_rows} venue rows); merge keys never matched"
    )]
    EmptyMergeResult {
        results_rows: usize,
        venue_rows: usize,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
