//! REST API types consumed by the presentation layer.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::ingest::IngestReport;
use crate::models::EmployeeRecord;

/// Response sent after a CSV upload has been ingested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Status: "ok" on success.
    pub status: String,

    /// Total records in the store after this upload.
    pub total_records: i64,

    /// Rows inserted by this upload.
    pub inserted: usize,

    /// Detected text encoding of the uploaded file.
    pub encoding: String,

    /// Detected delimiter.
    pub delimiter: String,

    /// Column headers of the uploaded file.
    pub columns: Vec<String>,
}

impl From<IngestReport> for UploadResponse {
    fn from(report: IngestReport) -> Self {
        UploadResponse {
            status: "ok".to_string(),
            total_records: report.total_records,
            inserted: report.inserted,
            encoding: report.encoding,
            delimiter: report.delimiter,
            columns: report.columns,
        }
    }
}

/// Listing response, capped by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeList {
    pub employees: Vec<EmployeeRecord>,
}

/// Query parameters for the box-plot endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct BoxplotParams {
    #[serde(default = "default_metric")]
    pub metric: String,
    #[serde(default = "default_group_by")]
    pub group_by: String,
}

fn default_metric() -> String {
    "performance_score".to_string()
}

fn default_group_by() -> String {
    "department".to_string()
}

/// Create an error response body.
pub fn error_response(error: &str) -> Value {
    json!({ "error": error })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_response_from_report() {
        let report = IngestReport {
            inserted: 3,
            total_records: 10,
            encoding: "utf-8".into(),
            delimiter: ",".into(),
            columns: vec!["name".into()],
        };

        let response = UploadResponse::from(report);
        assert_eq!(response.status, "ok");
        assert_eq!(response.total_records, 10);
        assert_eq!(response.inserted, 3);
    }

    #[test]
    fn test_boxplot_params_defaults() {
        let params: BoxplotParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.metric, "performance_score");
        assert_eq!(params.group_by, "department");
    }

    #[test]
    fn test_error_response_shape() {
        let body = error_response("file missing");
        assert_eq!(body["error"], "file missing");
    }
}
