//! WebAssembly module for GeoRisk
//!
//! Provides client-side computation for:
//! - Verdicts and composite scores
//! - Aggregating hazard results into indicators
//! - Offline certificate previews
//! - Coordinate validation and distances

use chrono::{TimeZone, Utc};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::aggregation::*;
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Identifier used for certificates assembled in the browser
pub const PREVIEW_CERTIFICATE_ID: &str = "GR-PREVIEW";

fn parse_policy(policy: &str) -> Result<FailurePolicy, String> {
    serde_json::from_value(serde_json::Value::String(policy.to_string()))
        .map_err(|_| format!("Unknown failure policy: {}", policy))
}

fn js_error(message: String) -> JsValue {
    web_sys::console::warn_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

/// Verdict label for a composite score
#[wasm_bindgen]
pub fn verdict_for_score(score: u8) -> String {
    Verdict::from_score(score).label().to_string()
}

/// Verdict color ("green", "orange" or "red") for a composite score
#[wasm_bindgen]
pub fn verdict_color_for_score(score: u8) -> String {
    match Verdict::from_score(score).color() {
        VerdictColor::Green => "green",
        VerdictColor::Orange => "orange",
        VerdictColor::Red => "red",
    }
    .to_string()
}

/// Aggregate a hazard assessment (JSON) into indicators, score and verdict
#[wasm_bindgen]
pub fn aggregate_assessment(assessment_json: &str, policy: &str) -> Result<String, JsValue> {
    aggregate_json(assessment_json, policy).map_err(js_error)
}

/// Assemble a certificate preview from a hazard assessment (JSON)
#[wasm_bindgen]
pub fn preview_certificate(
    assessment_json: &str,
    policy: &str,
    name: &str,
    latitude: f64,
    longitude: f64,
) -> Result<String, JsValue> {
    let issued_at_ms = js_sys::Date::now() as i64;
    preview_json(assessment_json, policy, name, latitude, longitude, issued_at_ms).map_err(js_error)
}

/// Check that a coordinate pair is within range
#[wasm_bindgen]
pub fn is_valid_location(latitude: f64, longitude: f64) -> bool {
    validate_coordinates(latitude, longitude).is_ok()
}

/// Great-circle distance in meters between two points
#[wasm_bindgen]
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let a = GeoPoint {
        latitude: lat1,
        longitude: lon1,
    };
    let b = GeoPoint {
        latitude: lat2,
        longitude: lon2,
    };
    a.distance_to(&b)
}

fn aggregate_json(assessment_json: &str, policy: &str) -> Result<String, String> {
    let assessment: HazardAssessment = serde_json::from_str(assessment_json)
        .map_err(|e| format!("Invalid assessment JSON: {}", e))?;
    let report = aggregate(&assessment, parse_policy(policy)?);
    serde_json::to_string(&report).map_err(|e| e.to_string())
}

fn preview_json(
    assessment_json: &str,
    policy: &str,
    name: &str,
    latitude: f64,
    longitude: f64,
    issued_at_ms: i64,
) -> Result<String, String> {
    validate_coordinates(latitude, longitude)?;

    let assessment: HazardAssessment = serde_json::from_str(assessment_json)
        .map_err(|e| format!("Invalid assessment JSON: {}", e))?;
    let report = aggregate(&assessment, parse_policy(policy)?);

    let issued_at = Utc
        .timestamp_millis_opt(issued_at_ms)
        .single()
        .ok_or_else(|| "Invalid timestamp".to_string())?;
    let name = match name.trim() {
        "" => DEFAULT_SUBJECT_NAME.to_string(),
        trimmed => trimmed.to_string(),
    };

    let certificate = Certificate::assemble(
        PREVIEW_CERTIFICATE_ID.to_string(),
        issued_at,
        CertificateSubject {
            name,
            latitude,
            longitude,
        },
        report,
    );
    serde_json::to_string(&certificate).map_err(|e| e.to_string())
}
