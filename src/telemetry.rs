//! Tracing initialization.
//!
//! Provides `init_telemetry()` for tracing setup and `shutdown_telemetry()` for cleanup.
//! When `OTEL_EXPORTER_OTLP_ENDPOINT` is set, spans are exported via OTLP.
//! Otherwise, only console logging is enabled.

use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::SdkTracerProvider;
use std::sync::OnceLock;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const SERVICE_NAME: &str = "penguin-charts";

/// Filter applied when `RUST_LOG` is unset or empty.
const DEFAULT_LOG_FILTER: &str = "info";

static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// Initialize tracing with optional OTLP export.
///
/// # Environment Variables
/// - `RUST_LOG`: filter directives, replacing the `info` default entirely
/// - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP endpoint URL (enables export when non-empty)
pub fn init_telemetry() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    opentelemetry::global::set_text_map_propagator(TraceContextPropagator::new());

    let directives = log_filter(std::env::var("RUST_LOG").ok());
    let env_filter = EnvFilter::try_new(&directives).unwrap_or_else(|e| {
        eprintln!("Ignoring invalid RUST_LOG '{}': {}", directives, e);
        EnvFilter::new(DEFAULT_LOG_FILTER)
    });

    let fmt_layer = tracing_subscriber::fmt::layer();

    if let Some(endpoint) = otlp_endpoint(std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok()) {
        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(&endpoint)
            .build()?;

        let tracer_provider = SdkTracerProvider::builder()
            .with_batch_exporter(exporter)
            .build();

        // Store provider for shutdown
        let _ = TRACER_PROVIDER.set(tracer_provider.clone());

        let tracer = tracer_provider.tracer(SERVICE_NAME);
        let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();

        tracing::info!(endpoint = %endpoint, "OpenTelemetry OTLP export enabled");
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init();
    }

    Ok(())
}

/// Directives from `RUST_LOG`, falling back to the default when unset or blank.
fn log_filter(rust_log: Option<String>) -> String {
    rust_log
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

fn otlp_endpoint(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Flush pending spans. Call once during graceful shutdown.
pub fn shutdown_telemetry() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            eprintln!("Error shutting down tracer provider: {:?}", e);
        }
    }
}
