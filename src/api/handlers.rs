//! API request handlers
//!
//! Spreadsheet endpoints take the raw file as the request body and options as
//! query parameters. Failures answer with a JSON `ApiResponse`.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{de, Deserialize, Deserializer, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::config::PivotConfig;
use crate::core::{DataIssue, PivotStats};
use crate::error::{SizePivotError, SizePivotResult};
use crate::excel::{ExcelImporter, XlsxCodec};
use crate::pipeline::Pipeline;
use crate::types::CellValue;

use super::server::AppState;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Response header carrying the number of non-fatal data issues
pub const ISSUE_COUNT_HEADER: &str = "x-sizepivot-issues";

/// Rows returned by preview when `rows` is not given
pub const DEFAULT_PREVIEW_ROWS: usize = 20;

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Handler failure, rendered as a JSON error body
#[derive(Debug)]
pub enum ApiError {
    Pivot(SizePivotError),
    /// Malformed query string
    BadQuery(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Pivot(SizePivotError::Schema { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Pivot(SizePivotError::Config(_)) => StatusCode::BAD_REQUEST,
            ApiError::Pivot(e) if e.is_input_error() => StatusCode::BAD_REQUEST,
            ApiError::BadQuery(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SizePivotError> for ApiError {
    fn from(e: SizePivotError) -> Self {
        ApiError::Pivot(e)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadQuery(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Pivot(e) => e.to_string(),
            ApiError::BadQuery(message) | ApiError::Internal(message) => message,
        };
        warn!(status = status.as_u16(), "request failed: {}", message);
        (status, Json(ApiResponse::<()>::err(message))).into_response()
    }
}

/// Query flag: bare (`?keep_zeros`) or empty means true
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(de::Error::custom(format!(
            "expected a boolean flag, got '{}'",
            other
        ))),
    }
}

/// Per-request overrides of the server configuration
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PivotQuery {
    /// Comma-separated key columns
    pub keys: Option<String>,
    pub size_column: Option<String>,
    pub qty_column: Option<String>,
    pub sheet: Option<String>,
    #[serde(deserialize_with = "flag")]
    pub color_code: bool,
    #[serde(deserialize_with = "flag")]
    pub keep_zeros: bool,
    #[serde(deserialize_with = "flag")]
    pub keep_empty_sizes: bool,
    #[serde(deserialize_with = "flag")]
    pub sort_groups: bool,
    #[serde(deserialize_with = "flag")]
    pub check_consistency: bool,
    /// Preview only
    pub rows: Option<usize>,
}

impl PivotQuery {
    pub fn apply(&self, base: &PivotConfig) -> SizePivotResult<PivotConfig> {
        let mut config = base.clone();
        if let Some(ref keys) = self.keys {
            config.key_columns = keys
                .split(',')
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect();
        }
        if let Some(ref size) = self.size_column {
            config.size_column = size.clone();
        }
        if let Some(ref qty) = self.qty_column {
            config.qty_column = qty.clone();
        }
        config.include_color_code |= self.color_code;
        config.zero_as_empty &= !self.keep_zeros;
        config.drop_empty_sizes &= !self.keep_empty_sizes;
        config.sort_groups |= self.sort_groups;
        config.check_consistency |= self.check_consistency;
        config.validate()?;
        Ok(config)
    }

    fn pipeline(&self, base: &PivotConfig) -> SizePivotResult<Pipeline> {
        let config = self.apply(base)?;
        let mut codec = XlsxCodec::new(&config);
        if let Some(ref sheet) = self.sheet {
            codec = codec.with_importer(ExcelImporter::with_sheet(sheet.clone()));
        }
        Ok(Pipeline::with_codec(config, codec))
    }
}

/// Run CPU-bound spreadsheet work off the async executor
async fn run_blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> SizePivotResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(format!("worker failed: {}", e)))?
        .map_err(ApiError::from)
}

fn xlsx_response(bytes: Vec<u8>, filename: &'static str, issues: usize) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", filename);
    let headers = [
        (header::CONTENT_TYPE, HeaderValue::from_static(XLSX_CONTENT_TYPE)),
        (
            header::CONTENT_DISPOSITION,
            HeaderValue::from_str(&disposition)
                .unwrap_or_else(|_| HeaderValue::from_static("attachment")),
        ),
        (
            HeaderName::from_static(ISSUE_COUNT_HEADER),
            HeaderValue::from(issues),
        ),
    ];
    (StatusCode::OK, headers, bytes).into_response()
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

impl EndpointInfo {
    fn new(path: &str, method: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_string(),
            description: description.to_string(),
        }
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = RootResponse {
        name: "sizepivot API server".to_string(),
        version: state.version.clone(),
        description: "Pivot order spreadsheets into one quantity column per size".to_string(),
        endpoints: vec![
            EndpointInfo::new("/health", "GET", "Health check endpoint"),
            EndpointInfo::new("/version", "GET", "Get server version"),
            EndpointInfo::new(
                "/api/v1/pivot",
                "POST",
                "Pivot an uploaded spreadsheet, returns .xlsx",
            ),
            EndpointInfo::new(
                "/api/v1/clean",
                "POST",
                "Clean size labels and style numbers, returns .xlsx",
            ),
            EndpointInfo::new(
                "/api/v1/preview",
                "POST",
                "Pivot an uploaded spreadsheet, returns the first rows as JSON",
            ),
        ],
    };
    Json(ApiResponse::ok(response))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_message: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        uptime_message: "Server is running".to_string(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: vec![
            "pivot".to_string(),
            "clean".to_string(),
            "preview".to_string(),
        ],
    }))
}

/// POST /api/v1/pivot - Pivot a spreadsheet
pub async fn pivot(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PivotQuery>, QueryRejection>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let pipeline = query.pipeline(&state.config)?;
    let output = run_blocking(move || pipeline.run(&body)).await?;
    Ok(xlsx_response(output.bytes, "pivot.xlsx", output.issues.len()))
}

/// POST /api/v1/clean - Normalize without pivoting
pub async fn clean(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PivotQuery>, QueryRejection>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let pipeline = query.pipeline(&state.config)?;
    let output = run_blocking(move || pipeline.clean(&body)).await?;
    Ok(xlsx_response(output.bytes, "clean.xlsx", 0))
}

/// Preview response
#[derive(Serialize, Default)]
pub struct PreviewResponse {
    pub columns: Vec<String>,
    pub size_columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    /// Rows in the full pivoted table
    pub total_rows: usize,
    pub issues: Vec<DataIssue>,
    pub stats: PivotStats,
}

/// POST /api/v1/preview - Pivot and return the first rows as JSON
pub async fn preview(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PivotQuery>, QueryRejection>,
    body: Bytes,
) -> Result<Json<ApiResponse<PreviewResponse>>, ApiError> {
    let Query(query) = query?;
    let limit = query.rows.unwrap_or(DEFAULT_PREVIEW_ROWS);
    let pipeline = query.pipeline(&state.config)?;
    let output = run_blocking(move || {
        let input = pipeline.decode(&body)?;
        pipeline.transform(&input)
    })
    .await?;

    let table = &output.table;
    let shown = limit.min(table.row_count());
    Ok(Json(ApiResponse::ok(PreviewResponse {
        columns: table.column_names().iter().map(|s| s.to_string()).collect(),
        size_columns: output.size_columns.clone(),
        rows: (0..shown).map(|i| table.row(i)).collect(),
        total_rows: table.row_count(),
        issues: output.issues.clone(),
        stats: output.stats.clone(),
    })))
}
