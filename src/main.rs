//! No-Show Prediction API - Main Entry Point
//!
//! Loads the model artifacts once and serves predictions over HTTP.

use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use noshow_api::{
    api::{self, AppState},
    config::{AppConfig, LoggingConfig},
    feature_extractor::FeatureExtractor,
    metrics::{MetricsReporter, ServiceMetrics},
    models::loader::ArtifactLoader,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    init_logging(&config.logging)?;

    info!("Starting No-Show Prediction API");
    info!(
        host = %config.server.host,
        port = config.server.port,
        origins = ?config.cors.allowed_origins,
        "Configuration loaded successfully"
    );

    let feature_extractor = FeatureExtractor::new();
    info!(
        features = ?feature_extractor.feature_names(),
        "Expecting {} input features",
        feature_extractor.feature_count()
    );

    // Load artifacts; missing ones leave the service in degraded mode
    let loader = ArtifactLoader::with_threads(config.artifacts.onnx_threads);
    let artifacts = Arc::new(loader.load_all(&config.artifacts));

    // Initialize metrics
    let metrics = Arc::new(ServiceMetrics::new());
    if config.metrics.report_interval_secs > 0 {
        let reporter = MetricsReporter::new(metrics.clone(), config.metrics.report_interval_secs);
        tokio::spawn(reporter.start());
    }

    let state = web::Data::new(AppState::new(artifacts, metrics.clone()));
    let origins = config.cors.allowed_origins.clone();

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(api::build_cors(&origins))
            .app_data(state.clone())
            .configure(api::configure)
    });
    if let Some(workers) = config.server.workers {
        server = server.workers(workers);
    }

    let (host, port) = config.bind_addr();
    info!("Listening on http://{}:{}", host, port);

    server
        .bind((host.as_str(), port))
        .with_context(|| format!("Failed to bind {}:{}", host, port))?
        .run()
        .await
        .context("HTTP server error")?;

    // Print final summary
    info!("Service shutting down...");
    metrics.print_summary();

    Ok(())
}

/// Set up the tracing subscriber. `RUST_LOG` wins over the configured level.
fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(format!(
            "noshow_api={level},actix_web={level}",
            level = logging.level
        ))
        .context("Invalid log level")?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }

    Ok(())
}
