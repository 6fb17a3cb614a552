//! # Perfio - Employee performance ingestion and analytics
//!
//! Perfio ingests delimited employee-performance files, persists typed
//! records in SQLite, and answers two analytical queries: grouped
//! distributions (box-plot data) and a pairwise Pearson correlation
//! matrix over the numeric attributes.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│ Normalizer  │────▶│    Store    │
//! │  (any enc)  │     │ (auto-enc)  │     │ (coercion)  │     │  (SQLite)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └──────┬──────┘
//!                                                                    │
//!                                         ┌─────────────┐     ┌──────▼──────┐
//!                                         │  JSON out   │◀────│ Aggregator  │
//!                                         │ (HTTP/CLI)  │     │ (stats)     │
//!                                         └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use perfio::{ingest_bytes, correlate, EmployeeStore};
//!
//! let mut store = EmployeeStore::in_memory()?;
//! ingest_bytes(csv_bytes, &mut store)?;
//! let matrix = correlate(&store.all()?);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models (EmployeeRecord, column enums)
//! - [`parser`] - Delimited-text parsing with auto-detection
//! - [`normalize`] - Per-field coercion into typed records
//! - [`stats`] - Grouping and correlation engine
//! - [`store`] - SQLite record store
//! - [`ingest`] - Upload pipeline
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Normalization
pub mod normalize;

// Aggregation
pub mod stats;

// Persistence
pub mod store;

// Ingestion pipeline
pub mod ingest;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{CsvError, IngestError, QueryError, ServerError, StoreError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    DatasetMeta,
    EmployeeRecord,
    GroupColumn,
    NumericColumn,
    GROUP_COLUMNS,
    NUMERIC_COLUMNS,
};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    decode_content,
    detect_delimiter,
    detect_encoding,
    format_delimiter,
    parse_bytes_auto,
    parse_file_auto,
    ParseResult,
};

// =============================================================================
// Re-exports - Normalization
// =============================================================================

pub use normalize::{normalize, safe_date, safe_float, safe_int, safe_str, RawCell, RawRow};

// =============================================================================
// Re-exports - Aggregation
// =============================================================================

pub use stats::{correlate, group_metric, CorrelationResult, GroupQuery, GroupedDistribution};

// =============================================================================
// Re-exports - Store
// =============================================================================

pub use store::EmployeeStore;

// =============================================================================
// Re-exports - Ingestion
// =============================================================================

pub use ingest::{ingest_bytes, ingest_file, IngestReport};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, EmployeeList, UploadResponse};

// Server
pub mod server {
    pub use crate::api::server::start_server;
}
