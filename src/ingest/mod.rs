//! Ingestion pipeline: uploaded bytes to persisted records.
//!
//! Combines the parser, the normalizer, and the store's bulk insert:
//!
//! ```text
//! ┌───────────┐     ┌──────────┐     ┌────────────┐     ┌─────────┐
//! │ CSV bytes │────▶│  Parser  │────▶│ Normalizer │────▶│  Store  │
//! │ (any enc) │     │ (auto)   │     │ (per row)  │     │ (bulk)  │
//! └───────────┘     └──────────┘     └────────────┘     └─────────┘
//! ```
//!
//! Row-level problems never fail an upload: a bad cell is an absent
//! field, and a row that is nothing but bad cells still inserts as an
//! all-absent record. Only an unreadable or headerless file errors.

use serde::Serialize;
use std::path::Path;

use crate::error::IngestResult;
use crate::normalize::normalize;
use crate::parser::{format_delimiter, parse_bytes_auto, parse_file_auto, ParseResult};
use crate::store::EmployeeStore;

/// Summary of one completed upload.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    /// Rows inserted by this upload.
    pub inserted: usize,
    /// Total records in the store after the insert.
    pub total_records: i64,
    /// Detected text encoding of the upload.
    pub encoding: String,
    /// Detected delimiter.
    pub delimiter: String,
    /// Trimmed column headers of the upload.
    pub columns: Vec<String>,
}

/// Ingest an uploaded byte stream into the store.
pub fn ingest_bytes(bytes: &[u8], store: &mut EmployeeStore) -> IngestResult<IngestReport> {
    let parsed = parse_bytes_auto(bytes)?;
    ingest_parsed(parsed, store)
}

/// Ingest a file from disk (CLI path).
pub fn ingest_file(path: impl AsRef<Path>, store: &mut EmployeeStore) -> IngestResult<IngestReport> {
    let parsed = parse_file_auto(path)?;
    ingest_parsed(parsed, store)
}

fn ingest_parsed(parsed: ParseResult, store: &mut EmployeeStore) -> IngestResult<IngestReport> {
    let records: Vec<_> = parsed.rows.iter().map(normalize).collect();
    store.insert_many(&records)?;

    Ok(IngestReport {
        inserted: records.len(),
        total_records: store.count()?,
        encoding: parsed.encoding,
        delimiter: format_delimiter(parsed.delimiter),
        columns: parsed.headers,
    })
}
