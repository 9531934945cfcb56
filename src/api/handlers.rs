//! API request handlers
//!
//! Handlers for all REST API endpoints.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{ErrorKind, SiftError, SiftResult};
use crate::excel::{extract_headers, project_workbook};
use crate::types::FieldSelection;

use super::server::AppState;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Used when the upload carries no usable file name
const FALLBACK_FILE_NAME: &str = "data.xlsx";

/// RFC 5987 `attr-char`: everything else in `filename*` is percent-encoded
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

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

/// Error body of the filter endpoint: `{"error": "...", "kind": "..."}`
#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub error: String,
    pub kind: ErrorKind,
}

impl IntoResponse for SiftError {
    fn into_response(self) -> Response {
        let status = match &self {
            SiftError::UploadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        warn!(kind = ?self.kind(), status = status.as_u16(), "request failed: {}", self);

        let body = ErrorBody {
            error: self.to_string(),
            kind: self.kind(),
        };
        (status, Json(body)).into_response()
    }
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
    fn new(method: &str, path: &str, description: &str) -> Self {
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
        name: "Sheetsift".to_string(),
        version: state.version.clone(),
        description: "Keep only the spreadsheet columns you pick".to_string(),
        endpoints: vec![
            EndpointInfo::new("GET", "/health", "Health check endpoint"),
            EndpointInfo::new("GET", "/version", "Get server version"),
            EndpointInfo::new(
                "POST",
                "/api/filter-excel",
                "Upload `file` + JSON `fields`, download the filtered workbook",
            ),
            EndpointInfo::new("POST", "/api/v1/filter", "Alias of /api/filter-excel"),
            EndpointInfo::new(
                "POST",
                "/api/headers",
                "Upload `file`, get the header names of its first sheet",
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
        features: vec!["filter".to_string(), "headers".to_string()],
    }))
}

/// Parts of the multipart upload we care about
#[derive(Default, Debug)]
pub struct Upload {
    pub file_name: Option<String>,
    pub file: Option<Bytes>,
    pub fields: Option<String>,
}

impl Upload {
    /// Uploaded bytes, rejecting a missing or zero-length file part
    fn take_file(&mut self) -> SiftResult<Bytes> {
        match self.file.take() {
            Some(bytes) if !bytes.is_empty() => Ok(bytes),
            _ => Err(SiftError::InputMissing("No file uploaded".to_string())),
        }
    }
}

/// Body-limit failures keep their own kind; anything else is a bad upload
fn multipart_error(context: &str, e: MultipartError) -> SiftError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        SiftError::UploadTooLarge(e.body_text())
    } else {
        SiftError::InputMissing(format!("{}: {}", context, e.body_text()))
    }
}

/// Collect the `file` and `fields` parts; unknown parts are skipped
pub async fn read_upload(mut multipart: Multipart) -> SiftResult<Upload> {
    let mut upload = Upload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Malformed upload", e))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                upload.file_name = field.file_name().map(str::to_string);
                upload.file = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| multipart_error("Could not read file part", e))?,
                );
            }
            Some("fields") => {
                upload.fields = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| multipart_error("Could not read fields part", e))?,
                );
            }
            _ => {}
        }
    }

    Ok(upload)
}

/// Decode the `fields` form value (JSON array of header names)
pub fn parse_fields(raw: Option<&str>) -> SiftResult<FieldSelection> {
    let raw = raw.ok_or_else(|| SiftError::InputMissing("No fields supplied".to_string()))?;

    let selection = FieldSelection::from_json(raw).map_err(|e| {
        SiftError::InputMissing(format!("Fields must be a JSON array of strings: {}", e))
    })?;

    if selection.is_blank() {
        return Err(SiftError::InputMissing("No fields selected".to_string()));
    }
    Ok(selection)
}

/// Base name of the uploaded file, without any client-side directory
fn upload_base_name(original: Option<&str>) -> &str {
    original
        .map(|name| name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(name))
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(FALLBACK_FILE_NAME)
}

/// `filtered_<name>`, with the name reduced to safe header characters
pub fn download_name(original: Option<&str>) -> String {
    let safe: String = upload_base_name(original)
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() || c == ' ') && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();

    format!("filtered_{}", safe)
}

/// `Content-Disposition` value: ASCII `filename` plus UTF-8 `filename*` (RFC 5987)
pub fn content_disposition(original: Option<&str>) -> String {
    let full = format!("filtered_{}", upload_base_name(original));
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        download_name(original),
        utf8_percent_encode(&full, ATTR_CHAR)
    )
}

/// POST /api/filter-excel - Keep only the selected columns
pub async fn filter_excel(multipart: Multipart) -> Result<Response, SiftError> {
    let mut upload = read_upload(multipart).await?;
    let bytes = upload.take_file()?;
    let selection = parse_fields(upload.fields.as_deref())?;
    let file_name = download_name(upload.file_name.as_deref());
    let disposition = content_disposition(upload.file_name.as_deref());

    info!(
        file = %file_name,
        size = bytes.len(),
        fields = selection.len(),
        "filter request received"
    );

    let output = tokio::task::spawn_blocking(move || {
        let projection = project_workbook(&bytes, &selection)?;
        info!(
            columns = projection.column_count(),
            rows = projection.row_count(),
            "projected first sheet"
        );
        projection.to_bytes()
    })
    .await
    .map_err(|e| SiftError::Export(format!("Filter task failed: {}", e)))??;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        output,
    )
        .into_response())
}

/// Header list response
#[derive(Serialize, Default, Debug)]
pub struct HeadersResponse {
    pub file_name: String,
    pub headers: Vec<String>,
}

/// POST /api/headers - Header names of the first sheet
pub async fn headers(multipart: Multipart) -> Response {
    let result = async move {
        let mut upload = read_upload(multipart).await?;
        let bytes = upload.take_file()?;
        let headers = tokio::task::spawn_blocking(move || extract_headers(&bytes))
            .await
            .map_err(|e| SiftError::Parse(format!("Header task failed: {}", e)))??;
        Ok::<_, SiftError>(HeadersResponse {
            file_name: upload.file_name.unwrap_or_default(),
            headers,
        })
    }
    .await;

    match result {
        Ok(data) => {
            info!(headers = data.headers.len(), "headers extracted");
            Json(ApiResponse::ok(data)).into_response()
        }
        Err(e @ SiftError::UploadTooLarge(_)) => {
            warn!("header upload rejected: {}", e);
            (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(ApiResponse::<HeadersResponse>::err(e.to_string())),
            )
                .into_response()
        }
        Err(e) => {
            warn!(kind = ?e.kind(), "header extraction failed: {}", e);
            (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<HeadersResponse>::err(
                    "Could not read the file. Is it a valid xlsx file?",
                )),
            )
                .into_response()
        }
    }
}
