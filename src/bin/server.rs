use anyhow::Result;
use clap::Parser;
use penguin_charts::config::AppConfig;
use penguin_charts::http::app_server::AppServer;
use penguin_charts::telemetry;
use penguin_charts::PenguinEngine;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "penguin-server", about = "Penguin chart HTTP server")]
struct Cli {
    /// Path to config file (defaults and PENGUIN_* env vars apply without one)
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let now = Instant::now();
    telemetry::init_telemetry().map_err(|e| anyhow::anyhow!(e))?;

    let cli = Cli::parse();

    tracing::info!("Starting penguin chart server");

    // Load configuration
    let config = AppConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match &cli.config {
        Some(path) => tracing::info!("Configuration '{}' loaded successfully", path),
        None => tracing::info!("Using default configuration"),
    }

    // Seeds the working dataset if needed
    let engine = PenguinEngine::from_config(&config).await?;

    let app = AppServer::with_upload_limit(engine, config.server.max_upload_bytes);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server started in {}ms", now.elapsed().as_millis());
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app.router)
        .with_graceful_shutdown(shutdown())
        .await?;

    tracing::info!("Server shutdown complete");
    telemetry::shutdown_telemetry();

    Ok(())
}

async fn shutdown() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping server...");
}
