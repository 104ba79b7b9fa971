use chrono::{DateTime, Utc};
use thiserror::Error;

/// Failures of the report pipeline, split so callers can react differently:
/// the first three are caller-correctable, the last two are collaborator I/O
/// failures passed through unmodified.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Query range with `start` after `end`.
    #[error("invalid date range: {start} is after {end}")]
    InvalidDateRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Zero or negative interval size.
    #[error("interval size must be positive")]
    InvalidIntervalSize,

    /// No renderer registered under the requested flavor.
    #[error("no renderer registered for flavor '{0}'")]
    UnknownFlavor(String),

    /// Call store failure while fetching the query range.
    #[error("call store error: {0}")]
    Store(anyhow::Error),

    /// Exporter failure while persisting the rendered report.
    #[error("report export error: {0}")]
    Export(anyhow::Error),
}
