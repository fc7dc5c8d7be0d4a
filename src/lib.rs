//! Census Tally Library
//!
//! Reconciles population statistics supplied as wide area-by-age-by-gender
//! tables with the normalized record representation (one count per area,
//! age bracket, gender and reporting period).
//!
//! This library provides tools for:
//! - Parsing wide-format CSV uploads into raw row maps
//! - Validating rows against the area catalog and per-bracket arithmetic
//! - Expanding validated rows into sparse normalized records
//! - Persisting records one at a time through a pluggable record store
//! - Grouped aggregation over filtered records for analytics views
//! - Rebuilding wide tables with derived totals for re-export and templates

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod aggregator;
        pub mod area_catalog;
        pub mod consistency_validator;
        pub mod denormalizer;
        pub mod import_pipeline;
        pub mod normalizer;
        pub mod record_store;
        pub mod wide_format_parser;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{
    AgeBracket, AreaCode, BatchId, BracketSet, Gender, Month, NewRecord, NormalizedRecord, Period,
    RecordId, ValidationIssue,
};
pub use app::services::area_catalog::AreaCatalog;
pub use config::EngineConfig;

/// Result type alias for census tally operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for census tally operations
///
/// Validation problems found in uploaded rows are not errors: they are
/// collected as [`ValidationIssue`]s. These variants cover the fatal tiers
/// (unreadable files, bad configuration) and store failures surfaced outside
/// the per-record write loop.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing error
    #[error("CSV parsing error in '{source_name}': {message}")]
    CsvParsing {
        source_name: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Structurally malformed wide-format upload
    #[error("Wide-format error in '{source_name}': {message}")]
    WideFormat {
        source_name: String,
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Data validation error
    #[error("Data validation error: {message}")]
    DataValidation { message: String },

    /// Record store failure
    #[error("Record store error: {0}")]
    Store(#[from] app::services::record_store::StoreError),

    /// JSON serialization error
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(
        source_name: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            source_name: source_name.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a wide-format structure error
    pub fn wide_format(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WideFormat {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            message: message.into(),
            source,
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }

    /// Whether this error belongs to the fatal parse tier
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::CsvParsing { .. } | Self::WideFormat { .. })
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            source_name: "unknown".to_string(),
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: "JSON processing failed".to_string(),
            source: error,
        }
    }
}
