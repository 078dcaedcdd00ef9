use crate::http::controllers::{
    data_handler, health_handler, histogram_handler, render_handler, scatter_plot_handler,
    upload_handler, DEFAULT_MAX_UPLOAD_SIZE,
};
use crate::PenguinEngine;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub struct AppServer {
    pub router: Router,
    pub engine: Arc<PenguinEngine>,
}

pub const PATH_UPLOAD: &str = "/upload";
pub const PATH_DATA: &str = "/data";
pub const PATH_SCATTER_PLOT: &str = "/scatter-plot";
pub const PATH_HISTOGRAM: &str = "/histogram";
pub const PATH_RENDER: &str = "/render/:plot";
pub const PATH_RENDER_EMPTY: &str = "/render/";
pub const PATH_HEALTH: &str = "/health";

impl AppServer {
    pub fn new(engine: PenguinEngine) -> Self {
        Self::with_upload_limit(engine, DEFAULT_MAX_UPLOAD_SIZE)
    }

    /// Build the router with a custom request body limit (in bytes).
    pub fn with_upload_limit(engine: PenguinEngine, max_upload_bytes: usize) -> Self {
        let engine = Arc::new(engine);
        AppServer {
            router: Router::new()
                .route(PATH_UPLOAD, post(upload_handler))
                .route(PATH_DATA, get(data_handler))
                .route(PATH_SCATTER_PLOT, get(scatter_plot_handler))
                .route(PATH_HISTOGRAM, get(histogram_handler))
                .route(PATH_RENDER, get(render_handler))
                .route(PATH_RENDER_EMPTY, get(render_handler))
                .route(PATH_HEALTH, get(health_handler))
                .layer(DefaultBodyLimit::max(max_upload_bytes))
                .layer(CorsLayer::very_permissive())
                .layer(TraceLayer::new_for_http())
                .with_state(engine.clone()),
            engine,
        }
    }
}
