//! Error types for the lead dashboard pipeline
//!
//! Parsing, merging and classification are total and have no error path.
//! Only the input gate, file reads and tier configuration can fail.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to the invoking boundary
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Not exactly two input files were supplied
    #[error("You must provide exactly {expected} CSV files. You selected {received}.")]
    InputCount { expected: usize, received: usize },

    /// An input file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tier definitions are invalid
    #[error("Invalid tier configuration: {0}")]
    Config(String),
}

/// Convenience Result type using DashboardError
pub type Result<T> = std::result::Result<T, DashboardError>;
