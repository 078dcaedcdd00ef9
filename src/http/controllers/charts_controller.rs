use crate::charts::Figure;
use crate::http::error::ApiError;
use crate::http::models::{HistogramParams, ScatterPlotParams};
use crate::PenguinEngine;
use axum::{
    extract::{Path, Query as QueryParams, State},
    response::Html,
    Json,
};
use std::sync::Arc;

/// Handler for GET /scatter-plot
///
/// The body is a JSON string holding the serialized figure.
#[tracing::instrument(
    name = "handler_scatter_plot",
    skip(engine),
    fields(penguin.point_count = tracing::field::Empty)
)]
pub async fn scatter_plot_handler(
    State(engine): State<Arc<PenguinEngine>>,
    QueryParams(params): QueryParams<ScatterPlotParams>,
) -> Result<Json<String>, ApiError> {
    let figure = engine
        .scatter(&params.x, &params.y, &params.color, params.flipper_length_min)
        .await?;

    encode_figure(&figure)
}

/// Handler for GET /histogram
///
/// The body is a JSON string holding the serialized figure.
#[tracing::instrument(
    name = "handler_histogram",
    skip(engine),
    fields(penguin.point_count = tracing::field::Empty)
)]
pub async fn histogram_handler(
    State(engine): State<Arc<PenguinEngine>>,
    QueryParams(params): QueryParams<HistogramParams>,
) -> Result<Json<String>, ApiError> {
    let figure = engine
        .histogram(&params.column, &params.color, params.flipper_length_min)
        .await?;

    encode_figure(&figure)
}

/// Handler for GET /render/{plot} - HTML fragment of a fixed chart
///
/// `plot` selects the histogram; any other segment, or none, the scatter.
#[tracing::instrument(name = "handler_render", skip(engine, plot))]
pub async fn render_handler(
    State(engine): State<Arc<PenguinEngine>>,
    plot: Option<Path<String>>,
) -> Result<Html<String>, ApiError> {
    let mode = plot.map(|Path(p)| p).unwrap_or_default();
    let html = engine.render(&mode).await?;
    Ok(Html(html))
}

fn encode_figure(figure: &Figure) -> Result<Json<String>, ApiError> {
    tracing::Span::current().record("penguin.point_count", figure.point_count());

    let json = figure
        .to_json()
        .map_err(|e| ApiError::internal_error(format!("Failed to serialize figure: {}", e)))?;
    Ok(Json(json))
}
