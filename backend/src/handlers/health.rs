//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub catalogs: CatalogHealth,
}

/// Feature counts per loaded catalog
#[derive(Serialize)]
pub struct CatalogHealth {
    pub faults: usize,
    pub fires: usize,
    pub volcanoes: usize,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let catalogs = CatalogHealth {
        faults: state.catalogs.faults.len(),
        fires: state.catalogs.fires.len(),
        volcanoes: state.catalogs.volcanoes.len(),
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.clone(),
        catalogs,
    })
}
