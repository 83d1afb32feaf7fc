//! Error types for crashviz.
//!
//! Row-level problems (malformed rows, records lacking a required field) are
//! recovered where they occur and only show up as counters in the load and
//! prepare reports. Everything here is fatal to the run.

use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for crashviz operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The input dataset does not exist.
    #[error("input file '{}' not found", path.display())]
    SourceNotFound {
        /// Path that was requested.
        path: PathBuf,
    },

    /// An expected column is absent after header normalization.
    #[error("expected column '{name}' is missing from the dataset")]
    MissingColumn {
        /// Normalized column name.
        name: String,
    },

    /// The CSV header could not be read.
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    /// Drawing or encoding a chart failed.
    #[error("failed to render {}: {message}", path.display())]
    Render {
        /// Output path of the chart.
        path: PathBuf,
        /// Backend error description.
        message: String,
    },

    /// A chart step outside the battery was requested.
    #[error("no chart step {index}; steps run from 1 to 10")]
    UnknownStep {
        /// Requested 1-based step.
        index: usize,
    },

    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for crashviz operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a render error for the chart at `path`.
    #[must_use]
    pub fn render(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Render {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Check if this error means the input dataset was absent.
    #[must_use]
    pub fn is_source_not_found(&self) -> bool {
        matches!(self, Self::SourceNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_not_found_display() {
        let err = Error::SourceNotFound {
            path: PathBuf::from("crashes.csv"),
        };
        assert_eq!(err.to_string(), "input file 'crashes.csv' not found");
        assert!(err.is_source_not_found());
    }

    #[test]
    fn test_render_error_display() {
        let err = Error::render("viz_1.png", "font not found");
        let msg = err.to_string();
        assert!(msg.contains("viz_1.png"));
        assert!(msg.contains("font not found"));
        assert!(!err.is_source_not_found());
    }

    #[test]
    fn test_missing_column_display() {
        let err = Error::MissingColumn {
            name: "Aboard".to_string(),
        };
        assert!(err.to_string().contains("'Aboard'"));
    }

    #[test]
    fn test_unknown_step_display() {
        let err = Error::UnknownStep { index: 11 };
        assert_eq!(err.to_string(), "no chart step 11; steps run from 1 to 10");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }
}
