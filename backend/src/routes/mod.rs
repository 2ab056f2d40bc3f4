//! Route definitions for the GeoRisk API

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/risk", risk_routes())
}

/// Risk certificate routes
fn risk_routes() -> Router<AppState> {
    Router::new().route("/analyze", post(handlers::analyze_risk))
}
