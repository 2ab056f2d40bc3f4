//! Browser tests for the exported functions that need a JS runtime
//!
//! Run with `wasm-pack test --headless --firefox wasm`.

#![cfg(target_arch = "wasm32")]

use georisk_wasm::*;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn calm_assessment() -> String {
    let assessment = HazardAssessment {
        landslide: HazardResult::assessed(
            HazardKind::Landslide,
            0.0,
            TechnicalDetails::new(),
            Vec::new(),
        ),
        flood: HazardResult::assessed(HazardKind::Flood, 0.0, TechnicalDetails::new(), Vec::new()),
        fire: HazardResult::assessed(HazardKind::Fire, 0.0, TechnicalDetails::new(), Vec::new()),
        climate: ClimateSignals::default(),
    };
    serde_json::to_string(&assessment).unwrap()
}

#[wasm_bindgen_test]
fn test_preview_uses_browser_clock() {
    let before = js_sys::Date::now() as i64;
    let json = preview_certificate(&calm_assessment(), "lenient", "Vineyard", -33.45, -70.66)
        .unwrap();

    let certificate: Certificate = serde_json::from_str(&json).unwrap();
    assert_eq!(certificate.metadata.id, PREVIEW_CERTIFICATE_ID);
    assert_eq!(certificate.subject.name, "Vineyard");
    assert!(certificate.metadata.issued_at.timestamp_millis() >= before - 1);
}

#[wasm_bindgen_test]
fn test_preview_error_surfaces_as_js_value() {
    let err = preview_certificate(&calm_assessment(), "lenient", "", 95.0, 0.0).unwrap_err();
    assert!(err.as_string().is_some());

    let err = aggregate_assessment("{not json", "lenient").unwrap_err();
    assert!(err
        .as_string()
        .unwrap_or_default()
        .starts_with("Invalid assessment JSON"));
}
