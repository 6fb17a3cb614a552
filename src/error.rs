//! Error types for the perfio ingestion and analytics pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`CsvError`] - delimited-text parsing errors
//! - [`QueryError`] - invalid analytical query parameters
//! - [`StoreError`] - record store errors
//! - [`IngestError`] - top-level ingestion orchestration errors
//! - [`ServerError`] - HTTP server errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! Data-quality problems (unparsable numbers, bad dates) are deliberately
//! NOT errors anywhere in this hierarchy: the normalizer coerces them to
//! absent values. Only contract violations surface here.

use thiserror::Error;

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Errors during delimited-text parsing.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Byte stream could not be decoded even after the fallback encoding.
    #[error("Failed to decode byte stream: {0}")]
    EncodingError(String),

    /// Invalid CSV format.
    #[error("Invalid CSV format: {0}")]
    ParseError(String),

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,

    /// No headers found.
    #[error("No headers found in CSV")]
    NoHeaders,
}

// =============================================================================
// Query Errors
// =============================================================================

/// Invalid analytical query parameters.
///
/// Raised before any aggregation begins; distinct from an empty result,
/// which is a successful response with empty collections.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Unknown metric column name.
    #[error("Unknown metric column: {0}")]
    UnknownMetric(String),

    /// Unknown group-by column name.
    #[error("Unknown group-by column: {0}")]
    UnknownGroupBy(String),
}

// =============================================================================
// Store Errors
// =============================================================================

/// Errors from the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite error.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Schema migration failed.
    #[error("Schema migration failed: {0}")]
    Migration(String),
}

// =============================================================================
// Ingestion Errors (top-level)
// =============================================================================

/// Top-level ingestion orchestration errors.
///
/// This is the main error type returned by [`crate::ingest::ingest_bytes`].
#[derive(Debug, Error)]
pub enum IngestError {
    /// CSV parsing error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Store error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Ingestion error.
    #[error("Ingestion error: {0}")]
    Ingest(#[from] IngestError),

    /// Query error.
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// Store error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for query validation.
pub type QueryResult<T> = Result<T, QueryError>;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // CsvError -> IngestError
        let csv_err = CsvError::EmptyFile;
        let ingest_err: IngestError = csv_err.into();
        assert!(ingest_err.to_string().contains("empty"));

        // IngestError -> ServerError
        let server_err: ServerError = ingest_err.into();
        assert!(server_err.to_string().contains("empty"));
    }

    #[test]
    fn test_query_error_format() {
        let err = QueryError::UnknownMetric("salary".into());
        assert!(err.to_string().contains("salary"));

        let err = QueryError::UnknownGroupBy("nonexistent".into());
        assert!(err.to_string().contains("nonexistent"));
    }
}
