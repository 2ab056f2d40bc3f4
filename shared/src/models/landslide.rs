//! Landslide susceptibility rules

use serde::{Deserialize, Serialize};

use super::config::{LandslideModel, ThresholdConfig, WeightConfig};
use super::hazard::{missing_fields, HazardKind, HazardResult};
use crate::types::{display_or_na, TechnicalDetails};

/// Upper bound of the landslide scale
pub const LANDSLIDE_MAX_SCORE: f64 = 10.0;

/// Points added when slope exceeds the critical threshold
pub const SLOPE_CRITICAL_POINTS: f64 = 5.0;
/// Points added when slope exceeds the high threshold
pub const SLOPE_HIGH_POINTS: f64 = 3.0;
/// Points added when max precipitation exceeds the high threshold
pub const RAINFALL_POINTS: f64 = 3.0;

/// Measurements feeding the landslide analyzer
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LandslideInputs {
    pub slope_deg: Option<f64>,
    pub elevation_m: Option<f64>,
    pub max_precipitation_mm: Option<f64>,
    /// Distance to the nearest fault; `None` when no fault is known
    pub fault_distance_m: Option<f64>,
}

/// Additive model: +5 above critical slope (else +3 above high slope),
/// +3 above high rainfall, clamped to [0, 10].
///
/// Absent measurements never trigger.
pub fn additive_landslide_score(inputs: &LandslideInputs, t: &ThresholdConfig) -> f64 {
    let mut score = 0.0;

    match inputs.slope_deg {
        Some(slope) if slope > t.slope_critical => score += SLOPE_CRITICAL_POINTS,
        Some(slope) if slope > t.slope_high => score += SLOPE_HIGH_POINTS,
        _ => {}
    }

    if inputs.max_precipitation_mm.is_some_and(|p| p > t.rainfall_high) {
        score += RAINFALL_POINTS;
    }

    score.clamp(0.0, LANDSLIDE_MAX_SCORE)
}

/// Weighted model: slope, fault and rainfall factors in [0, 1] combined by
/// weight, scaled by 10 and rounded to one decimal.
pub fn weighted_landslide_score(
    inputs: &LandslideInputs,
    t: &ThresholdConfig,
    w: &WeightConfig,
) -> f64 {
    let slope = inputs.slope_deg.unwrap_or(0.0);
    let slope_factor = if slope >= t.slope_critical {
        1.0
    } else if slope >= t.slope_high {
        0.75
    } else if slope >= t.slope_moderate {
        0.5
    } else {
        0.25
    };

    let fault = inputs.fault_distance_m.unwrap_or(f64::INFINITY);
    let fault_factor = if fault < t.fault_distance_critical {
        1.0
    } else if fault < t.fault_distance_moderate {
        0.6
    } else {
        0.3
    };

    let rain = inputs.max_precipitation_mm.unwrap_or(0.0);
    let rain_factor = if rain > t.rainfall_high {
        1.0
    } else if rain > t.rainfall_moderate {
        0.6
    } else {
        0.2
    };

    let weighted = slope_factor * w.slope + fault_factor * w.fault + rain_factor * w.rainfall;
    ((weighted * LANDSLIDE_MAX_SCORE * 10.0).round() / 10.0).clamp(0.0, LANDSLIDE_MAX_SCORE)
}

/// Susceptibility label for a landslide score
pub fn susceptibility_label(score: f64) -> &'static str {
    if score >= 7.5 {
        "Very High"
    } else if score >= 5.0 {
        "High"
    } else if score >= 2.5 {
        "Moderate"
    } else {
        "Low"
    }
}

/// Score landslide exposure and build its technical details
pub fn assess_landslide(
    inputs: &LandslideInputs,
    thresholds: &ThresholdConfig,
    weights: &WeightConfig,
    model: LandslideModel,
) -> HazardResult {
    let score = match model {
        LandslideModel::Additive => additive_landslide_score(inputs, thresholds),
        LandslideModel::Weighted => weighted_landslide_score(inputs, thresholds, weights),
    };

    let mut details = TechnicalDetails::new()
        .with("Slope", display_or_na(inputs.slope_deg, |v| format!("{:.1}°", v)))
        .with("Elevation", display_or_na(inputs.elevation_m, |v| format!("{:.0} m", v)))
        .with(
            "Max Rainfall",
            display_or_na(inputs.max_precipitation_mm, |v| format!("{:.0} mm", v)),
        )
        .with(
            "Fault Distance",
            display_or_na(
                inputs.fault_distance_m.filter(|d| d.is_finite()),
                |v| format!("{:.0} m", v),
            ),
        );

    if model == LandslideModel::Weighted {
        details.insert("Susceptibility", susceptibility_label(score));
    }

    let missing = missing_fields(&[
        ("slope", inputs.slope_deg),
        ("elevation", inputs.elevation_m),
        ("max_precipitation", inputs.max_precipitation_mm),
    ]);

    HazardResult::assessed(HazardKind::Landslide, score, details, missing)
}
