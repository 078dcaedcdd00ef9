use crate::http::error::ApiError;
use crate::http::models::UploadResponse;
use crate::PenguinEngine;
use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use std::fmt::Display;
use std::sync::Arc;

/// Multipart field carrying the CSV file.
pub const UPLOAD_FIELD: &str = "file";

/// Default request body limit for uploads: 50MB
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 50 * 1024 * 1024;

/// Handler for POST /upload - Replace the working dataset
///
/// Every failure, including a malformed multipart body, is reported as a 400.
#[tracing::instrument(
    name = "handler_upload",
    skip(engine, multipart),
    fields(
        penguin.size_bytes = tracing::field::Empty,
        penguin.row_count = tracing::field::Empty,
    )
)]
pub async fn upload_handler(
    State(engine): State<Arc<PenguinEngine>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let content = read_file_field(multipart).await.map_err(upload_error)?;
    tracing::Span::current().record("penguin.size_bytes", content.len());

    let dataset = engine.upload(&content).await.map_err(upload_error)?;
    tracing::Span::current().record("penguin.row_count", dataset.num_rows());

    Ok(Json(UploadResponse::success()))
}

async fn read_file_field(
    multipart: Result<Multipart, MultipartRejection>,
) -> anyhow::Result<Bytes> {
    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(UPLOAD_FIELD) {
            return Ok(field.bytes().await?);
        }
    }

    anyhow::bail!("missing multipart field '{}'", UPLOAD_FIELD)
}

fn upload_error(e: impl Display) -> ApiError {
    ApiError::bad_request(format!("An error occurred: {}", e))
}
