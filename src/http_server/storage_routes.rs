//! Storage HTTP Routes
//!
//! Upload, list, download, image fetch and rename endpoints.

use std::collections::HashMap;
use std::path::Path as FsPath;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::file_storage::file::DEFAULT_CONTENT_TYPE;
use crate::file_storage::{
    FileService, RetrievedFile, StorageError, StorageResult, StorageRoot, StoredFile, UploadItem,
    UploadedFile,
};
use crate::observability::{log_event, log_failure, Event, Logger};

// ==================
// Shared State
// ==================

/// Storage state shared across handlers
pub struct StorageState {
    pub file_service: FileService<StorageRoot>,
}

impl StorageState {
    pub fn new(storage_root: &FsPath, max_upload_bytes: u64) -> Self {
        let root = StorageRoot::new(storage_root.to_path_buf());
        Self {
            file_service: FileService::with_max_upload_bytes(root, max_upload_bytes),
        }
    }
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub files: Vec<UploadedFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameRequest {
    #[serde(default)]
    pub old_name: Option<String>,
    #[serde(default)]
    pub new_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameResponse {
    pub message: String,
    pub old_name: String,
    pub new_name: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: u16,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

// ==================
// Storage Routes
// ==================

/// Create storage routes
pub fn storage_routes(state: Arc<StorageState>) -> Router {
    Router::new()
        .route("/upload", post(upload_handler))
        .route("/files", get(list_files_handler))
        .route("/files/rename", put(rename_file_handler))
        .route("/files/image/:filename", get(image_file_handler))
        .route("/files/:filename", get(download_file_handler))
        .with_state(state)
}

// ==================
// Helper Functions
// ==================

fn error_response(err: StorageError) -> ApiError {
    let code = err.status_code();
    let message = err.to_string();
    log_failure(code, &[("message", message.as_str())]);

    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(ErrorResponse { message, code }),
    )
}

fn multipart_error(err: MultipartError) -> ApiError {
    let status = err.status();
    let message = err.body_text();
    log_failure(status.as_u16(), &[("message", message.as_str())]);

    (
        status,
        Json(ErrorResponse {
            message,
            code: status.as_u16(),
        }),
    )
}

/// Run a core operation off the async workers
async fn run_blocking<T, F>(state: Arc<StorageState>, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&FileService<StorageRoot>) -> StorageResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || op(&state.file_service))
        .await
        .map_err(|e| error_response(StorageError::Io(format!("storage task failed: {}", e))))?
        .map_err(error_response)
}

/// Index of a `customNames[<n>]` field
fn indexed_custom_name(field_name: &str) -> Option<usize> {
    field_name
        .strip_prefix("customNames[")?
        .strip_suffix(']')?
        .parse()
        .ok()
}

/// Parse a rename body; an empty body reads as `{}`
fn parse_rename_request(body: &[u8]) -> StorageResult<RenameRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RenameRequest::default());
    }

    serde_json::from_slice(body)
        .map_err(|e| StorageError::Validation(format!("Invalid rename request: {}", e)))
}

fn file_headers(file: &RetrievedFile) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&file.content_type)
            .unwrap_or(HeaderValue::from_static(DEFAULT_CONTENT_TYPE)),
    );
    headers
}

fn attachment_disposition(name: &str) -> HeaderValue {
    let value = format!("attachment; filename=\"{}\"", name.replace('"', "\\\""));
    HeaderValue::from_bytes(value.as_bytes()).unwrap_or(HeaderValue::from_static("attachment"))
}

// ==================
// File Handlers
// ==================

async fn upload_handler(
    State(state): State<Arc<StorageState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut items: Vec<UploadItem> = Vec::new();
    let mut positional_names: Vec<String> = Vec::new();
    let mut indexed_names: HashMap<usize, String> = HashMap::new();

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or_default().to_string();

        if field_name == "files" {
            let original_name = field.file_name().unwrap_or("unnamed").to_string();
            let content_type = field
                .content_type()
                .unwrap_or(DEFAULT_CONTENT_TYPE)
                .to_string();

            // Reject oversize parts before buffering all of them
            let mut data = Vec::new();
            while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
                state
                    .file_service
                    .check_size((data.len() + chunk.len()) as u64)
                    .map_err(error_response)?;
                data.extend_from_slice(&chunk);
            }

            items.push(UploadItem::new(original_name, data).with_content_type(content_type));
        } else if field_name == "customNames" {
            positional_names.push(field.text().await.map_err(multipart_error)?);
        } else if let Some(index) = indexed_custom_name(&field_name) {
            indexed_names.insert(index, field.text().await.map_err(multipart_error)?);
        }
    }

    for (index, item) in items.iter_mut().enumerate() {
        item.suggested_name = indexed_names
            .remove(&index)
            .or_else(|| positional_names.get(index).cloned())
            .filter(|name| !name.is_empty());
    }

    let files = run_blocking(state, move |service| service.store(&items)).await?;

    let count = files.len().to_string();
    let names = files
        .iter()
        .map(|f| f.stored_name.as_str())
        .collect::<Vec<_>>()
        .join(",");
    log_event(Event::FilesStored, &[("count", count.as_str()), ("names", names.as_str())]);

    Ok(Json(UploadResponse {
        message: "Files uploaded successfully".to_string(),
        files,
    }))
}

async fn list_files_handler(
    State(state): State<Arc<StorageState>>,
) -> Result<Json<Vec<StoredFile>>, ApiError> {
    let files = run_blocking(state, |service| service.list()).await?;
    Ok(Json(files))
}

async fn image_file_handler(
    State(state): State<Arc<StorageState>>,
    Path(filename): Path<String>,
) -> Result<(StatusCode, HeaderMap, Vec<u8>), ApiError> {
    Logger::debug("IMAGE_REQUESTED", &[("name", filename.as_str())]);
    let file = run_blocking(state, move |service| service.retrieve_image(&filename)).await?;

    Ok((StatusCode::OK, file_headers(&file), file.data))
}

async fn download_file_handler(
    State(state): State<Arc<StorageState>>,
    Path(filename): Path<String>,
) -> Result<(StatusCode, HeaderMap, Vec<u8>), ApiError> {
    Logger::debug("DOWNLOAD_REQUESTED", &[("name", filename.as_str())]);
    let file = run_blocking(state, move |service| service.retrieve(&filename)).await?;

    let mut headers = file_headers(&file);
    headers.insert(header::CONTENT_DISPOSITION, attachment_disposition(&file.name));

    Ok((StatusCode::OK, headers, file.data))
}

async fn rename_file_handler(
    State(state): State<Arc<StorageState>>,
    body: Bytes,
) -> Result<Json<RenameResponse>, ApiError> {
    let request = parse_rename_request(&body).map_err(error_response)?;
    let old_name = request.old_name.unwrap_or_default();
    let new_name = request.new_name.unwrap_or_default();

    let outcome = run_blocking(state, move |service| service.rename(&old_name, &new_name)).await?;
    log_event(
        Event::FileRenamed,
        &[("new_name", outcome.new_name.as_str()), ("old_name", outcome.old_name.as_str())],
    );

    Ok(Json(RenameResponse {
        message: "File renamed successfully".to_string(),
        old_name: outcome.old_name,
        new_name: outcome.new_name,
    }))
}
