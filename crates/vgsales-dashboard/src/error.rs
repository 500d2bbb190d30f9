//! Application-wide error types using thiserror.

use vgsales_common::SalesError;

/// Error raised while building or exporting the dashboard.
#[derive(thiserror::Error, Debug)]
pub enum DashboardError {
    /// Loading, aggregation, localization or rendering failed.
    #[error(transparent)]
    Sales(#[from] SalesError),

    /// Output directory or file could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Manifest could not be serialized.
    #[error("Manifest error: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// Result type for the dashboard application.
pub type DashboardResult<T> = Result<T, DashboardError>;
