use crate::http::error::ApiError;
use crate::table::Record;
use crate::PenguinEngine;
use axum::{extract::State, Json};
use std::sync::Arc;

/// Handler for GET /data - Every row of the working dataset
#[tracing::instrument(
    name = "handler_data",
    skip(engine),
    fields(penguin.row_count = tracing::field::Empty)
)]
pub async fn data_handler(
    State(engine): State<Arc<PenguinEngine>>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let records = engine.records().await?;

    tracing::Span::current().record("penguin.row_count", records.len());

    Ok(Json(records))
}
