//! Error types for report generation.
//!
//! Report errors are all-or-nothing: any error aborts the current report
//! and nothing partial is returned.

use thiserror::Error;

/// Failure raised by a record store while answering an aggregation query.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The backing file could not be read or written.
    #[error("data source I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not a valid dataset.
    #[error("data source parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Records reference each other inconsistently.
    #[error("data source integrity error: {0}")]
    Integrity(String),
}

/// Errors surfaced by the report engine.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The requested bucket granularity is not daily, weekly or monthly.
    #[error("Invalid period: {0}. Must be 'daily', 'weekly', or 'monthly'")]
    InvalidGranularity(String),

    /// The record store failed during aggregation.
    #[error(transparent)]
    DataSource(#[from] SourceError),
}

impl ReportError {
    /// True when the caller asked for something invalid, as opposed to the
    /// store failing underneath a valid request.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, ReportError::InvalidGranularity(_))
    }
}
