//! HTTP handlers for risk certificate endpoints

use axum::{extract::State, Json};
use serde::Deserialize;
use shared::{Certificate, EngineSettings};
use validator::Validate;

use crate::error::AppResult;
use crate::AppState;

/// Input for a risk analysis
#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzeRiskInput {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub lon: f64,

    /// Display name printed on the certificate
    #[validate(length(max = 200))]
    pub name: Option<String>,

    /// Settings applied to this request only
    #[serde(default)]
    pub settings: Option<EngineSettings>,
}

/// Analyze a location and issue its risk certificate
pub async fn analyze_risk(
    State(state): State<AppState>,
    Json(input): Json<AnalyzeRiskInput>,
) -> AppResult<Json<Certificate>> {
    input.validate()?;

    tracing::info!(lat = input.lat, lon = input.lon, "Risk analysis requested");

    let certificate = state
        .engine
        .generate_certificate_with(input.lat, input.lon, input.name, input.settings)
        .await?;
    Ok(Json(certificate))
}
