//! Fire and climate-stress rules

use serde::{Deserialize, Serialize};

use super::config::ThresholdConfig;
use super::hazard::{missing_fields, HazardKind, HazardResult};
use crate::types::{display_or_na, TechnicalDetails};

/// Measurements feeding the fire analyzer
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FireInputs {
    /// Early-year median NDVI, -1..1
    pub ndvi: Option<f64>,
    /// Mean land-surface temperature, °C
    pub surface_temperature_c: Option<f64>,
    /// Large historical fires within the history radius
    pub large_fires_nearby: Option<u64>,
    /// Active volcanoes within the volcano radius
    pub volcanoes_nearby: Option<u64>,
}

/// Count of stress signals: dry vegetation and hot surface, 0..=2
pub fn fire_risk_index(inputs: &FireInputs, t: &ThresholdConfig) -> u8 {
    let mut index = 0;
    if inputs.ndvi.is_some_and(|ndvi| ndvi < t.ndvi_dry) {
        index += 1;
    }
    if inputs
        .surface_temperature_c
        .is_some_and(|temp| temp > t.surface_temperature_hot)
    {
        index += 1;
    }
    index
}

/// Volcanic exposure level from the count of nearby active volcanoes
pub fn volcanic_exposure(count: u64) -> u8 {
    match count {
        0 => 0,
        1..=4 => 1,
        _ => 2,
    }
}

fn volcanic_exposure_label(count: u64) -> String {
    let level = match volcanic_exposure(count) {
        0 => "None",
        1 => "Moderate",
        _ => "High",
    };
    format!("{} ({} nearby)", level, count)
}

/// Vegetation label shown next to NDVI
pub fn vegetation_label(ndvi: f64, t: &ThresholdConfig) -> &'static str {
    if ndvi < t.ndvi_dry {
        "Low"
    } else {
        "Medium/High"
    }
}

/// Score fire exposure and build its technical details.
///
/// Historical fires and volcanoes are shown as context. A nearby large
/// historical fire raises the index only when `fold_history` is set.
pub fn assess_fire(inputs: &FireInputs, t: &ThresholdConfig, fold_history: bool) -> HazardResult {
    let mut index = fire_risk_index(inputs, t);
    if fold_history && inputs.large_fires_nearby.is_some_and(|n| n > 0) {
        index += 1;
    }

    let mut details = TechnicalDetails::new()
        .with("NDVI", display_or_na(inputs.ndvi, |v| format!("{:.2}", v)))
        .with(
            "Soil Temperature",
            display_or_na(inputs.surface_temperature_c, |v| format!("{:.1}°C", v)),
        )
        .with(
            "Vegetation",
            display_or_na(inputs.ndvi, |v| vegetation_label(v, t).to_string()),
        );

    if let Some(fires) = inputs.large_fires_nearby {
        details.insert("Historical Fires", fires.to_string());
    }
    if let Some(volcanoes) = inputs.volcanoes_nearby {
        details.insert("Volcanic Exposure", volcanic_exposure_label(volcanoes));
    }

    let missing = missing_fields(&[
        ("ndvi", inputs.ndvi),
        ("surface_temperature", inputs.surface_temperature_c),
    ]);

    HazardResult::assessed(HazardKind::Fire, f64::from(index), details, missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(ndvi: f64, temp: f64) -> FireInputs {
        FireInputs {
            ndvi: Some(ndvi),
            surface_temperature_c: Some(temp),
            ..Default::default()
        }
    }

    #[test]
    fn test_fire_risk_index() {
        let t = ThresholdConfig::default();
        assert_eq!(fire_risk_index(&inputs(0.6, 22.0), &t), 0);
        assert_eq!(fire_risk_index(&inputs(0.2, 22.0), &t), 1);
        assert_eq!(fire_risk_index(&inputs(0.6, 34.0), &t), 1);
        assert_eq!(fire_risk_index(&inputs(0.2, 34.0), &t), 2);
        // Boundaries are strict
        assert_eq!(fire_risk_index(&inputs(0.3, 30.0), &t), 0);
    }

    #[test]
    fn test_fire_details() {
        let result = assess_fire(&inputs(0.123, 31.26), &ThresholdConfig::default(), false);
        assert_eq!(result.score, 2.0);
        assert_eq!(result.details.get("NDVI"), Some("0.12"));
        assert_eq!(result.details.get("Soil Temperature"), Some("31.3°C"));
        assert_eq!(result.details.get("Vegetation"), Some("Low"));
        assert_eq!(result.details.get("Historical Fires"), None);
    }

    #[test]
    fn test_history_is_context_unless_folded() {
        let fire = FireInputs {
            large_fires_nearby: Some(2),
            volcanoes_nearby: Some(6),
            ..inputs(0.6, 22.0)
        };
        let t = ThresholdConfig::default();

        let context_only = assess_fire(&fire, &t, false);
        assert_eq!(context_only.score, 0.0);
        assert_eq!(context_only.details.get("Historical Fires"), Some("2"));
        assert_eq!(context_only.details.get("Volcanic Exposure"), Some("High (6 nearby)"));

        let folded = assess_fire(&fire, &t, true);
        assert_eq!(folded.score, 1.0);
    }

    #[test]
    fn test_volcanic_exposure_levels() {
        assert_eq!(volcanic_exposure(0), 0);
        assert_eq!(volcanic_exposure(1), 1);
        assert_eq!(volcanic_exposure(4), 1);
        assert_eq!(volcanic_exposure(5), 2);
    }

    #[test]
    fn test_absent_ndvi() {
        let fire = FireInputs {
            ndvi: None,
            ..inputs(0.0, 35.0)
        };
        let result = assess_fire(&fire, &ThresholdConfig::default(), false);
        assert_eq!(result.score, 1.0);
        assert_eq!(result.details.get("Vegetation"), Some("N/A"));
        assert_eq!(result.missing, vec!["ndvi".to_string()]);
    }
}
