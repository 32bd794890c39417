// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::api::http_server::AppState;

/// Constant body of GET /
pub const WELCOME_MESSAGE: &str =
    "Bienvenido al servidor de clasificación de estrellas. Usa el endpoint /predict para enviar imágenes.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HomeResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// "ok" with a model, "degraded" without
    pub status: String,
    pub model_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    pub detector: String,
    pub version: String,
}

/// GET / - Static welcome message
pub async fn home_handler() -> Json<HomeResponse> {
    Json(HomeResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}

/// GET /health - Model availability and build info
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let model = state.model_manager.model_info();
    Json(HealthResponse {
        status: if model.loaded { "ok" } else { "degraded" }.to_string(),
        model_loaded: model.loaded,
        model_name: model.name,
        detector: state.detector.name().to_string(),
        version: crate::version::VERSION_NUMBER.to_string(),
    })
}
