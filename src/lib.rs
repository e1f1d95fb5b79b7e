//! Lead Dashboard Library
//!
//! Merges two lead CSV exports, classifies each lead into a priority tier
//! by its disposition tags, and assembles a grouped dashboard snapshot.

pub mod dashboard;
pub mod error;
pub mod merge;
pub mod normalize;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod rules;
pub mod sorter;
pub mod storage;
pub mod triage;
pub mod types;

pub use error::{DashboardError, Result};
pub use types::*;
