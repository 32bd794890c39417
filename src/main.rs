// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use star_classifier::{
    api::{start_server, AppState},
    classifier::ModelManager,
    config::ServiceConfig,
    version,
    vision::build_detector,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServiceConfig::load();

    // Initialize tracing subscriber for logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🚀 Starting {}", version::get_version_string());
    info!("📦 BUILD VERSION: {}", version::VERSION);

    // Load the classifier once; a missing artifact leaves the service degraded
    let model_manager = ModelManager::load(&config.classifier_config());
    if !model_manager.is_loaded() {
        info!("⚠️  Serving without a model: /predict will answer 'Model not loaded'");
    }

    let detector = build_detector(config.detector);
    info!("⭐ Star detector: {}", detector.name());

    let state =
        AppState::new(model_manager, detector).with_max_upload_bytes(config.max_upload_bytes);

    start_server(config.socket_addr(), state).await?;

    info!("👋 Star Classifier shut down");
    Ok(())
}
