//! File handlers for Web API.

use axum::{
    body::Body,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, Path, State,
    },
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;

use crate::file::{
    content_type_for, is_range_video, list_tree, parse_range, FileStorage, KindStats,
};
use crate::web::dto::{ApiResponse, ListResponse, UploadResponse};
use crate::web::error::ApiError;
use crate::web::handlers::{run_blocking, AppState};
use crate::FilebayError;

/// Multipart part that carries the upload.
pub const UPLOAD_FIELD: &str = "file";

/// Cache policy for video responses.
pub const VIDEO_CACHE_CONTROL: &str = "public, max-age=31536000";

fn multipart_error(e: MultipartError, max_bytes: u64) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::payload_too_large(too_large_message(max_bytes));
    }
    tracing::warn!("Failed to read multipart data: {}", e);
    ApiError::bad_request("Invalid multipart data")
}

fn too_large_message(max_bytes: u64) -> String {
    format!("File too large (max {}MB)", max_bytes / 1024 / 1024)
}

/// POST /api/files/upload - Upload a file.
///
/// Request body: multipart/form-data with a "file" part. The file is stored
/// under a directory named after the primary component of its content type.
#[utoipa::path(
    post,
    path = "/files/upload",
    tag = "files",
    request_body(
        content = String,
        content_type = "multipart/form-data",
        description = "Part named \"file\" carrying the upload"
    ),
    responses(
        (status = 200, description = "File uploaded", body = UploadResponse),
        (status = 400, description = "No file uploaded or invalid file name"),
        (status = 413, description = "File too large"),
        (status = 500, description = "Failed to save file")
    )
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let max_bytes = state.max_upload_bytes;
    let mut multipart = multipart.map_err(|e| {
        tracing::warn!("Rejected upload request: {}", e);
        ApiError::bad_request("No file uploaded")
    })?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        let content = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, max_bytes))?;

        upload = Some((filename, content_type, content));
        break;
    }

    let (filename, content_type, content) =
        upload.ok_or_else(|| ApiError::bad_request("No file uploaded"))?;

    if content.len() as u64 > max_bytes {
        return Err(ApiError::payload_too_large(too_large_message(max_bytes)));
    }

    let storage = state.storage.clone();
    let stored = run_blocking("Failed to save file", move || {
        storage.save(&content, &filename, content_type.as_deref())
    })
    .await?
    .map_err(|e| match e {
        FilebayError::Validation(msg) => ApiError::bad_request(msg),
        e => {
            tracing::error!("Failed to save file: {}", e);
            ApiError::internal("Failed to save file")
        }
    })?;

    tracing::info!(
        path = %stored.relative_path,
        size = stored.size,
        "File uploaded"
    );

    Ok(Json(UploadResponse::from(stored)))
}

/// GET /api/files/list - List the storage tree.
#[utoipa::path(
    get,
    path = "/files/list",
    tag = "files",
    responses(
        (status = 200, description = "Recursive listing of the storage root"),
        (status = 500, description = "Failed to list files")
    )
)]
pub async fn list_files(State(state): State<Arc<AppState>>) -> Result<Json<ListResponse>, ApiError> {
    let root = state.storage.base_path().to_path_buf();
    let storage_dir = root.display().to_string();

    let files = run_blocking("Failed to list files", move || list_tree(&root)).await?;

    Ok(Json(ListResponse {
        success: true,
        storage_dir,
        files,
    }))
}

/// GET /api/files/stats - File counts per gallery kind.
#[utoipa::path(
    get,
    path = "/files/stats",
    tag = "files",
    responses(
        (status = 200, description = "Counts per kind and totals", body = KindStats)
    )
)]
pub async fn file_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<KindStats>>, ApiError> {
    let root = state.storage.base_path().to_path_buf();

    let stats = run_blocking("Failed to collect statistics", move || {
        KindStats::collect(&list_tree(&root))
    })
    .await?;

    Ok(Json(ApiResponse::new(stats)))
}

/// GET /api/files/serve/{path} - Serve a stored file.
///
/// Video files honor a single `Range` request with 206 Partial Content.
#[utoipa::path(
    get,
    path = "/files/serve/{path}",
    tag = "files",
    params(
        ("path" = String, Path, description = "Path below the storage root, e.g. video/clip.mp4")
    ),
    responses(
        (status = 200, description = "Whole file"),
        (status = 206, description = "Requested byte range of a video"),
        (status = 400, description = "No path provided or invalid path"),
        (status = 404, description = "File not found"),
        (status = 416, description = "Requested range not satisfiable")
    )
)]
pub async fn serve_file(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let segments: Vec<String> = path.split('/').map(str::to_string).collect();

    let storage = state.storage.clone();
    let located = run_blocking("Failed to read file", move || storage.locate(&segments)).await??;

    let content_type = content_type_for(&located.filename);
    let is_video = is_range_video(&located.filename);
    let size = located.size;

    if is_video {
        if let Some(value) = headers.get(header::RANGE) {
            let range = value
                .to_str()
                .map_err(|_| ApiError::range_not_satisfiable(size))
                .and_then(|v| {
                    parse_range(v, size).map_err(|e| {
                        tracing::debug!("Rejected range for {}: {}", located.filename, e);
                        ApiError::range_not_satisfiable(size)
                    })
                })?;

            let file_path = located.path.clone();
            let chunk = run_blocking("Failed to read file", move || {
                FileStorage::read_range(&file_path, range)
            })
            .await?
            .map_err(read_error)?;

            return Response::builder()
                .status(StatusCode::PARTIAL_CONTENT)
                .header(header::CONTENT_RANGE, range.content_range(size))
                .header(header::ACCEPT_RANGES, "bytes")
                .header(header::CONTENT_LENGTH, chunk.len())
                .header(header::CONTENT_TYPE, content_type)
                .header(header::CACHE_CONTROL, VIDEO_CACHE_CONTROL)
                .body(Body::from(chunk))
                .map_err(build_error);
        }
    }

    let file_path = located.path.clone();
    let content = run_blocking("Failed to read file", move || FileStorage::read_all(&file_path))
        .await?
        .map_err(read_error)?;

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, content.len());
    if is_video {
        builder = builder
            .header(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"))
            .header(header::CACHE_CONTROL, VIDEO_CACHE_CONTROL);
    }

    builder.body(Body::from(content)).map_err(build_error)
}

/// GET /api/files/serve - Serve without a path.
pub async fn serve_missing_path() -> ApiError {
    ApiError::bad_request("No path provided")
}

fn read_error(e: FilebayError) -> ApiError {
    tracing::error!("Failed to read file: {}", e);
    ApiError::internal("Failed to read file")
}

fn build_error(e: axum::http::Error) -> ApiError {
    tracing::error!("Failed to build response: {}", e);
    ApiError::internal("Failed to build response")
}
