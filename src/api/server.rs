//! HTTP server for the perfio API.
//!
//! # API Endpoints
//!
//! | Method | Path               | Description                               |
//! |--------|--------------------|-------------------------------------------|
//! | GET    | `/health`          | Health check                              |
//! | GET    | `/api/meta`        | Legal metric and group-by column names    |
//! | GET    | `/api/employees`   | List persisted records (capped at 500)    |
//! | POST   | `/api/upload`      | Upload a CSV for ingestion                |
//! | GET    | `/api/boxplot`     | Grouped distribution for one metric       |
//! | GET    | `/api/correlation` | Pearson matrix over the numeric columns   |
//!
//! Handlers return [`ServerResult`]; a [`ServerError`] renders as a JSON
//! `{error}` body with 400 for client-input problems (bad upload, unknown
//! query parameters) and 500 for everything else.
//!
//! The store handle is explicit shared state threaded through the router,
//! one instance for the life of the process. Each upload is one bulk
//! insert; each analytical query is one bulk read.

use axum::{
    extract::{Multipart, Query, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tower_http::{cors::CorsLayer, services::ServeDir};

use super::types::{error_response, BoxplotParams, EmployeeList, UploadResponse};
use crate::error::{IngestError, ServerError, ServerResult};
use crate::ingest::ingest_bytes;
use crate::models::DatasetMeta;
use crate::stats::{correlate, group_metric, CorrelationResult, GroupQuery, GroupedDistribution};
use crate::store::EmployeeStore;

/// Listing endpoints never return more than this many rows.
const LIST_CAP: i64 = 500;

type SharedStore = Arc<Mutex<EmployeeStore>>;

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::Query(_) | ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            // A file that cannot be parsed is client input, not a fault.
            ServerError::Ingest(IngestError::Csv(_)) => StatusCode::BAD_REQUEST,
            ServerError::Ingest(IngestError::Store(_))
            | ServerError::Store(_)
            | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(error_response(&self.to_string()))).into_response()
    }
}

/// Start the HTTP server over an already-opened store.
pub async fn start_server(
    store: EmployeeStore,
    port: u16,
    static_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let state: SharedStore = Arc::new(Mutex::new(store));

    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let mut app = Router::new()
        .route("/health", get(health))
        .route("/api/meta", get(meta))
        .route("/api/employees", get(list_employees))
        .route("/api/upload", post(upload_csv))
        .route("/api/boxplot", get(boxplot))
        .route("/api/correlation", get(correlation))
        .with_state(state)
        .layer(cors);

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("perfio server running on http://localhost:{}", port);
    println!("   POST /api/upload      - Upload CSV file");
    println!("   GET  /api/boxplot     - Grouped distributions");
    println!("   GET  /api/correlation - Correlation matrix");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "perfio",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Fixed column sets for client-side parameter validation.
async fn meta() -> Json<DatasetMeta> {
    Json(DatasetMeta::current())
}

/// List persisted records in insertion order, capped.
async fn list_employees(State(store): State<SharedStore>) -> ServerResult<Json<EmployeeList>> {
    let store = store.lock().map_err(poisoned)?;
    let employees = store.list(LIST_CAP)?;
    Ok(Json(EmployeeList { employees }))
}

/// Upload CSV endpoint: multipart field `file`.
async fn upload_csv(
    State(store): State<SharedStore>,
    mut multipart: Multipart,
) -> ServerResult<Json<UploadResponse>> {
    let mut file_data: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Multipart error: {}", e)))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?;
            file_data = Some(bytes.to_vec());
        }
    }

    let bytes = file_data.ok_or_else(|| ServerError::BadRequest("No file provided".into()))?;

    let mut store = store.lock().map_err(poisoned)?;
    let report = ingest_bytes(&bytes, &mut store)?;

    Ok(Json(UploadResponse::from(report)))
}

/// Grouped distribution for one metric/group-by pair.
///
/// Unknown column names are a client error; a valid query over no data
/// is a success with empty collections.
async fn boxplot(
    State(store): State<SharedStore>,
    Query(params): Query<BoxplotParams>,
) -> ServerResult<Json<GroupedDistribution>> {
    let query = GroupQuery::parse(&params.metric, &params.group_by)?;

    let store = store.lock().map_err(poisoned)?;
    let records = store.all()?;
    drop(store);

    Ok(Json(group_metric(&records, query)))
}

/// Pearson correlation matrix over the four numeric columns.
async fn correlation(State(store): State<SharedStore>) -> ServerResult<Json<CorrelationResult>> {
    let store = store.lock().map_err(poisoned)?;
    let records = store.all()?;
    drop(store);

    Ok(Json(correlate(&records)))
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> ServerError {
    ServerError::Internal("store lock poisoned".into())
}
