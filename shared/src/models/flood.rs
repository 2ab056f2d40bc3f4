//! Flood exposure rules

use serde::{Deserialize, Serialize};

use super::config::ThresholdConfig;
use super::hazard::{missing_fields, HazardKind, HazardResult};
use crate::types::{display_or_na, TechnicalDetails};

/// Measurements feeding the flood analyzer
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FloodInputs {
    pub max_precipitation_mm: Option<f64>,
    /// ESA WorldCover class code
    pub land_cover_class: Option<f64>,
    /// Percentage of observations with surface water, 0-100
    pub water_occurrence_pct: Option<f64>,
}

/// Flood category exposed to the aggregator
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum FloodCategory {
    /// Measurements failed
    Indeterminate,
    Low,
    Moderate,
    High,
}

impl FloodCategory {
    pub fn code(&self) -> i8 {
        match self {
            FloodCategory::Indeterminate => -1,
            FloodCategory::Low => 0,
            FloodCategory::Moderate => 1,
            FloodCategory::High => 2,
        }
    }

    /// Map a flood score back to its category. Negative scores are indeterminate.
    pub fn from_score(score: f64) -> Self {
        if score >= 2.0 {
            FloodCategory::High
        } else if score >= 1.0 {
            FloodCategory::Moderate
        } else if score >= 0.0 {
            FloodCategory::Low
        } else {
            FloodCategory::Indeterminate
        }
    }

    /// Category for a weighted signal count
    pub fn from_signal_count(count: u8) -> Self {
        match count {
            3..=u8::MAX => FloodCategory::High,
            1..=2 => FloodCategory::Moderate,
            0 => FloodCategory::Low,
        }
    }
}

impl std::fmt::Display for FloodCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FloodCategory::Indeterminate => write!(f, "Indeterminate"),
            FloodCategory::Low => write!(f, "Low"),
            FloodCategory::Moderate => write!(f, "Moderate"),
            FloodCategory::High => write!(f, "High"),
        }
    }
}

/// Weighted flood signal count: precipitation 1, land cover 1, water occurrence 2
pub fn flood_signal_count(inputs: &FloodInputs, t: &ThresholdConfig) -> u8 {
    let mut count = 0;

    if inputs.max_precipitation_mm.is_some_and(|p| p > t.flood_precipitation) {
        count += 1;
    }
    if inputs
        .land_cover_class
        .is_some_and(|class| is_flood_land_cover(class, t))
    {
        count += 1;
    }
    if inputs.water_occurrence_pct.is_some_and(|o| o > t.water_occurrence) {
        count += 2;
    }

    count
}

fn is_flood_land_cover(class: f64, t: &ThresholdConfig) -> bool {
    let code = class.round();
    t.flood_land_cover_classes
        .iter()
        .any(|c| f64::from(*c) == code)
}

/// ESA WorldCover class name
pub fn land_cover_name(class: u16) -> &'static str {
    match class {
        10 => "Tree cover",
        20 => "Shrubland",
        30 => "Grassland",
        40 => "Cropland",
        50 => "Built-up",
        60 => "Bare / sparse vegetation",
        70 => "Snow and ice",
        80 => "Permanent water bodies",
        90 => "Herbaceous wetland",
        95 => "Mangroves",
        100 => "Moss and lichen",
        _ => "Unknown",
    }
}

/// Classify flood exposure and build its technical details
pub fn assess_flood(inputs: &FloodInputs, thresholds: &ThresholdConfig) -> HazardResult {
    let category = FloodCategory::from_signal_count(flood_signal_count(inputs, thresholds));

    let details = TechnicalDetails::new()
        .with(
            "Max Rainfall",
            display_or_na(inputs.max_precipitation_mm, |v| format!("{:.0} mm", v)),
        )
        .with(
            "Land Cover",
            display_or_na(inputs.land_cover_class, |v| {
                let code = v.round() as u16;
                format!("{} ({})", code, land_cover_name(code))
            }),
        )
        .with(
            "Water Occurrence",
            display_or_na(inputs.water_occurrence_pct, |v| format!("{:.0}%", v)),
        );

    let missing = missing_fields(&[
        ("max_precipitation", inputs.max_precipitation_mm),
        ("land_cover", inputs.land_cover_class),
        ("water_occurrence", inputs.water_occurrence_pct),
    ]);

    HazardResult::assessed(HazardKind::Flood, f64::from(category.code()), details, missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn inputs(precip: f64, land_cover: f64, occurrence: f64) -> FloodInputs {
        FloodInputs {
            max_precipitation_mm: Some(precip),
            land_cover_class: Some(land_cover),
            water_occurrence_pct: Some(occurrence),
        }
    }

    #[test]
    fn test_signal_weights() {
        let t = ThresholdConfig::default();
        assert_eq!(flood_signal_count(&inputs(10.0, 10.0, 0.0), &t), 0);
        assert_eq!(flood_signal_count(&inputs(31.0, 10.0, 0.0), &t), 1);
        assert_eq!(flood_signal_count(&inputs(10.0, 50.0, 0.0), &t), 1);
        assert_eq!(flood_signal_count(&inputs(10.0, 60.0, 0.0), &t), 1);
        assert_eq!(flood_signal_count(&inputs(10.0, 10.0, 11.0), &t), 2);
        assert_eq!(flood_signal_count(&inputs(31.0, 50.0, 11.0), &t), 4);
    }

    #[test]
    fn test_category_mapping() {
        assert_eq!(FloodCategory::from_signal_count(0), FloodCategory::Low);
        assert_eq!(FloodCategory::from_signal_count(1), FloodCategory::Moderate);
        assert_eq!(FloodCategory::from_signal_count(2), FloodCategory::Moderate);
        assert_eq!(FloodCategory::from_signal_count(3), FloodCategory::High);
        assert_eq!(FloodCategory::from_signal_count(4), FloodCategory::High);
    }

    #[test]
    fn test_category_round_trips_through_score() {
        for category in [
            FloodCategory::Indeterminate,
            FloodCategory::Low,
            FloodCategory::Moderate,
            FloodCategory::High,
        ] {
            assert_eq!(FloodCategory::from_score(f64::from(category.code())), category);
        }
    }

    #[test]
    fn test_assess_flood_details() {
        let result = assess_flood(&inputs(45.0, 80.0, 64.0), &ThresholdConfig::default());
        assert_eq!(result.score, 2.0);
        assert_eq!(result.details.get("Land Cover"), Some("80 (Permanent water bodies)"));
        assert_eq!(result.details.get("Water Occurrence"), Some("64%"));
        assert!(result.missing.is_empty());
    }

    #[test]
    fn test_absent_water_occurrence_is_recorded() {
        let flood = FloodInputs {
            water_occurrence_pct: None,
            ..inputs(45.0, 10.0, 0.0)
        };
        let result = assess_flood(&flood, &ThresholdConfig::default());
        assert_eq!(result.score, 1.0);
        assert_eq!(result.missing, vec!["water_occurrence".to_string()]);
    }

    proptest! {
        #[test]
        fn prop_category_in_domain(
            precip in proptest::option::of(0.0f64..500.0),
            land_cover in proptest::option::of(prop_oneof![Just(10.0), Just(50.0), Just(60.0), Just(80.0)]),
            occurrence in proptest::option::of(0.0f64..100.0),
        ) {
            let flood = FloodInputs {
                max_precipitation_mm: precip,
                land_cover_class: land_cover,
                water_occurrence_pct: occurrence,
            };
            let t = ThresholdConfig::default();
            let result = assess_flood(&flood, &t);
            prop_assert!([0.0, 1.0, 2.0].contains(&result.score));

            // High requires at least 3 weighted signals
            if result.score == 2.0 {
                prop_assert!(flood_signal_count(&flood, &t) >= 3);
            }
        }
    }
}
