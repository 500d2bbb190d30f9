//! Error types and utilities for the vgsales dashboard.

use thiserror::Error;

/// Boxed error used as the `source` of struct-like variants.
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, SalesError>;

/// Main error type for dashboard operations
#[derive(Error, Debug)]
pub enum SalesError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        /// Human readable description.
        message: String,
        /// Underlying cause, if any.
        #[source]
        source: Option<BoxedSource>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Dataset loading and parsing errors
    #[error("Data error: {message}")]
    Data {
        /// Human readable description.
        message: String,
        /// 1-based line number in the input file, when known.
        line: Option<u64>,
        /// Underlying cause, if any.
        #[source]
        source: Option<BoxedSource>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Chart building and rendering errors
    #[error("Chart error: {message}")]
    Chart {
        /// Human readable description.
        message: String,
        /// Underlying cause, if any.
        #[source]
        source: Option<BoxedSource>,
    },

    /// Internationalization and localization errors
    #[error("Localization error: {message}")]
    Localization {
        /// Human readable description.
        message: String,
        /// Locale code involved, if known.
        locale: Option<String>,
    },

    /// Validation errors for control input or configuration values
    #[error("Validation error: {message}")]
    Validation {
        /// Human readable description.
        message: String,
        /// Name of the offending field, if known.
        field: Option<String>,
    },
}

impl SalesError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new data error pointing at a line of the input file
    pub fn data_at_line(msg: impl Into<String>, line: u64) -> Self {
        Self::Data {
            message: msg.into(),
            line: Some(line),
            source: None,
        }
    }

    /// Create a new data error with source
    pub fn data_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Data {
            message: msg.into(),
            line: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create a new chart error with source
    pub fn chart_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Chart {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new localization error with locale
    pub fn localization_with_locale(msg: impl Into<String>, locale: impl Into<String>) -> Self {
        Self::Localization {
            message: msg.into(),
            locale: Some(locale.into()),
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }
}

// Error conversion implementations for external types

/// Convert from csv::Error to SalesError, keeping the line number when the
/// reader reports one.
impl From<csv::Error> for SalesError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(csv::Position::line);
        Self::Data {
            message: "CSV parsing error".to_string(),
            line,
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to SalesError
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for SalesError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::chart_with_source("Chart rendering failed", err)
    }
}
