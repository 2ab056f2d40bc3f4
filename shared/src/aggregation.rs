//! Penalty aggregation
//!
//! Turns the hazard results into the three certificate indicators, sums their
//! penalties into a composite score and derives the verdict. Everything here
//! is a pure function of its inputs.

use serde::{Deserialize, Serialize};

use crate::models::{
    ClimateSignals, FailurePolicy, FloodCategory, HazardResult, Indicator, IndicatorColor,
    IndicatorId, Verdict,
};
use crate::types::{display_or_na, TechnicalDetails, NOT_AVAILABLE};

/// Landslide score at or above which soil is high risk
pub const SOIL_HIGH_SCORE: f64 = 5.0;
/// Landslide score at or above which soil is moderate risk
pub const SOIL_MODERATE_SCORE: f64 = 2.5;

pub const SOIL_HIGH_PENALTY: u32 = 40;
pub const SOIL_MODERATE_PENALTY: u32 = 15;
pub const WATER_FLOODPLAIN_PENALTY: u32 = 50;
pub const WATER_CAUTION_PENALTY: u32 = 20;
pub const FIRE_ALERT_PENALTY: u32 = 20;

/// Temperature trend level that raises an environmental alert on its own
pub const FIRE_ALERT_TREND: i8 = 2;

/// Perfect composite score before penalties
pub const MAX_COMPOSITE_SCORE: u32 = 100;

pub const UNAVAILABLE_STATUS: &str = "Data Unavailable";

/// Results of the four hazard analyses for one point
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HazardAssessment {
    pub landslide: HazardResult,
    pub flood: HazardResult,
    pub fire: HazardResult,
    #[serde(default)]
    pub climate: ClimateSignals,
}

/// Indicators, composite score and verdict
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregateReport {
    pub indicators: Vec<Indicator>,
    pub composite_score: u8,
    pub verdict: Verdict,
}

/// Aggregate the hazard results into indicators and a verdict
pub fn aggregate(assessment: &HazardAssessment, policy: FailurePolicy) -> AggregateReport {
    let indicators = vec![
        soil_indicator(&assessment.landslide, policy),
        water_indicator(&assessment.flood, policy),
        fire_indicator(&assessment.fire, &assessment.climate, policy),
    ];

    let composite_score = composite_score(&indicators);

    AggregateReport {
        indicators,
        composite_score,
        verdict: Verdict::from_score(composite_score),
    }
}

/// 100 minus the sum of penalties, clamped to [0, 100]
pub fn composite_score(indicators: &[Indicator]) -> u8 {
    let penalties: u32 = indicators.iter().map(|i| i.penalty_points).sum();
    MAX_COMPOSITE_SCORE.saturating_sub(penalties).min(MAX_COMPOSITE_SCORE) as u8
}

/// Soil stability indicator from the landslide score
pub fn soil_indicator(landslide: &HazardResult, policy: FailurePolicy) -> Indicator {
    if !landslide.is_available() {
        return unavailable_indicator(
            IndicatorId::Soil,
            landslide,
            policy,
            (IndicatorColor::Red, SOIL_HIGH_PENALTY),
        );
    }

    let score = landslide.score;
    let (status, color, message, penalty) = if score >= SOIL_HIGH_SCORE {
        (
            "High Risk",
            IndicatorColor::Red,
            "Critical slope instability.",
            SOIL_HIGH_PENALTY,
        )
    } else if score >= SOIL_MODERATE_SCORE {
        (
            "Moderate Risk",
            IndicatorColor::Yellow,
            "Requires a site-specific soil mechanics study.",
            SOIL_MODERATE_PENALTY,
        )
    } else {
        (
            "Stable",
            IndicatorColor::Green,
            "No evident mass-movement risk.",
            0,
        )
    };

    Indicator {
        id: IndicatorId::Soil,
        title: IndicatorId::Soil.title().to_string(),
        status: status.to_string(),
        color,
        message: message.to_string(),
        technical_score: format!("{:.1}", score),
        technical_details: landslide.details.clone(),
        penalty_points: penalty,
    }
}

/// Flood indicator from the flood category.
///
/// An indeterminate category is reported as unavailable, never as safe.
pub fn water_indicator(flood: &HazardResult, policy: FailurePolicy) -> Indicator {
    let category = FloodCategory::from_score(flood.score);
    if !flood.is_available() || category == FloodCategory::Indeterminate {
        return unavailable_indicator(
            IndicatorId::Water,
            flood,
            policy,
            (IndicatorColor::Red, WATER_FLOODPLAIN_PENALTY),
        );
    }

    let (status, color, message, penalty) = match category {
        FloodCategory::High => (
            "Floodplain",
            IndicatorColor::Red,
            "Permanent water bodies detected.",
            WATER_FLOODPLAIN_PENALTY,
        ),
        FloodCategory::Moderate => (
            "Caution",
            IndicatorColor::Yellow,
            "Water saturation possible during extreme events.",
            WATER_CAUTION_PENALTY,
        ),
        _ => (
            "Safe",
            IndicatorColor::Green,
            "Outside main watercourses.",
            0,
        ),
    };

    Indicator {
        id: IndicatorId::Water,
        title: IndicatorId::Water.title().to_string(),
        status: status.to_string(),
        color,
        message: message.to_string(),
        technical_score: category.code().to_string(),
        technical_details: flood.details.clone(),
        penalty_points: penalty,
    }
}

/// Fire and climate indicator from the fire risk index and the trend of
/// yearly maximum temperature.
///
/// A strong warming trend raises the alert even when fire measurements failed.
pub fn fire_indicator(
    fire: &HazardResult,
    climate: &ClimateSignals,
    policy: FailurePolicy,
) -> Indicator {
    let trend = climate.trend_max_value();
    let mut details = fire.details.clone();
    details.extend(climate_details(climate));

    if !fire.is_available() && trend < FIRE_ALERT_TREND {
        let mut indicator = unavailable_indicator(
            IndicatorId::Fire,
            fire,
            policy,
            (IndicatorColor::Yellow, FIRE_ALERT_PENALTY),
        );
        indicator.technical_details = details;
        return indicator;
    }

    let index = fire.score.max(0.0) as u32;
    let (status, color, message, penalty) = if index > 0 || trend >= FIRE_ALERT_TREND {
        (
            "Environmental Alert",
            IndicatorColor::Yellow,
            "Warming trend or dry vegetation detected.",
            FIRE_ALERT_PENALTY,
        )
    } else {
        (
            "Low Risk",
            IndicatorColor::Green,
            "Healthy vegetation moisture (NDVI).",
            0,
        )
    };

    Indicator {
        id: IndicatorId::Fire,
        title: IndicatorId::Fire.title().to_string(),
        status: status.to_string(),
        color,
        message: message.to_string(),
        technical_score: format!("Index: {} | Trend: {}", index, trend),
        technical_details: details,
        penalty_points: penalty,
    }
}

fn climate_details(climate: &ClimateSignals) -> TechnicalDetails {
    let trend = |level: Option<crate::models::TrendLevel>| {
        level
            .map(|l| match l.value() {
                v if v > 0 => format!("+{}", v),
                v => v.to_string(),
            })
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };

    TechnicalDetails::new()
        .with(
            "Frequent Day Temperature",
            display_or_na(climate.frequent_day_temp, |v| format!("{:.1}°C", v)),
        )
        .with(
            "Frequent Night Temperature",
            display_or_na(climate.frequent_night_temp, |v| format!("{:.1}°C", v)),
        )
        .with("Max Temperature Trend", trend(climate.trend_max))
        .with("Mean Temperature Trend", trend(climate.trend_mean))
        .with("Min Temperature Trend", trend(climate.trend_min))
}

fn unavailable_indicator(
    id: IndicatorId,
    result: &HazardResult,
    policy: FailurePolicy,
    worst: (IndicatorColor, u32),
) -> Indicator {
    let (color, penalty, message) = match policy {
        FailurePolicy::Lenient => (
            IndicatorColor::Yellow,
            0,
            "Measurements could not be retrieved; this hazard was not scored.",
        ),
        FailurePolicy::FailSafeHigh => (
            worst.0,
            worst.1,
            "Measurements could not be retrieved; scored at the highest risk level.",
        ),
    };

    Indicator {
        id,
        title: id.title().to_string(),
        status: UNAVAILABLE_STATUS.to_string(),
        color,
        message: message.to_string(),
        technical_score: NOT_AVAILABLE.to_string(),
        technical_details: result.details.clone(),
        penalty_points: penalty,
    }
}
