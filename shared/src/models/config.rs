//! Scoring configuration: thresholds, weights and the analysis window
//!
//! All values have process-wide defaults and can be overridden per call.
//! They are read-only once built and safe to share across concurrent analyses.

use serde::{Deserialize, Serialize};

/// Named cutoffs used by the hazard analyzers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Slope in degrees above which terrain is critically unstable
    pub slope_critical: f64,
    pub slope_high: f64,
    pub slope_moderate: f64,
    /// Distance to the nearest geologic fault, meters
    pub fault_distance_critical: f64,
    pub fault_distance_moderate: f64,
    /// Max precipitation in mm that can trigger a landslide
    pub rainfall_high: f64,
    pub rainfall_moderate: f64,
    /// Max precipitation in mm counted as a flood signal
    pub flood_precipitation: f64,
    /// Land-cover class codes counted as a flood signal
    pub flood_land_cover_classes: Vec<u16>,
    /// Surface-water occurrence percentage counted as a flood signal
    pub water_occurrence: f64,
    /// NDVI below this is sparse or dry vegetation
    pub ndvi_dry: f64,
    /// Land-surface temperature in °C above this is heat stress
    pub surface_temperature_hot: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            slope_critical: 30.0,
            slope_high: 20.0,
            slope_moderate: 10.0,
            fault_distance_critical: 5_000.0,
            fault_distance_moderate: 10_000.0,
            rainfall_high: 150.0,
            rainfall_moderate: 100.0,
            flood_precipitation: 30.0,
            flood_land_cover_classes: vec![50, 60],
            water_occurrence: 10.0,
            ndvi_dry: 0.3,
            surface_temperature_hot: 30.0,
        }
    }
}

/// Factor weights for the weighted landslide model.
///
/// Intended to keep the weighted factor sum within [0, 1] before the ×10
/// scaling, but the sum is not enforced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WeightConfig {
    pub slope: f64,
    pub fault: f64,
    pub rainfall: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            slope: 0.40,
            fault: 0.30,
            rainfall: 0.30,
        }
    }
}

/// Request-scoped analysis window and query geometry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Year all single-year measurements are taken from
    pub year: i32,
    /// First year of the climate trend series
    pub trend_start_year: i32,
    /// Buffer radius for climate statistics, meters
    pub climate_buffer_m: f64,
    /// Reduction scale for 30 m rasters
    pub raster_scale_m: f64,
    /// Reduction scale for land-surface temperature
    pub temperature_scale_m: f64,
    pub fire_history_radius_m: f64,
    /// Minimum burned area for a historical fire to count
    pub fire_history_min_area: f64,
    pub volcano_radius_m: f64,
    pub volcano_min_category: u8,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            year: 2022,
            trend_start_year: 2010,
            climate_buffer_m: 1_000.0,
            raster_scale_m: 30.0,
            temperature_scale_m: 1_000.0,
            fire_history_radius_m: 50_000.0,
            fire_history_min_area: 200.0,
            volcano_radius_m: 100_000.0,
            volcano_min_category: 3,
        }
    }
}

impl AnalysisConfig {
    /// Years covered by the climate trend, inclusive
    pub fn trend_years(&self) -> std::ops::RangeInclusive<i32> {
        self.trend_start_year..=self.year
    }
}

/// Landslide scoring model
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LandslideModel {
    /// Slope and rainfall triggers add fixed points
    #[default]
    Additive,
    /// Slope, fault proximity and rainfall factors combined by weight
    Weighted,
}

/// How the aggregator treats a hazard whose measurements failed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Report the hazard as unavailable without a penalty
    #[default]
    Lenient,
    /// Report the hazard as unavailable with its highest penalty
    FailSafeHigh,
}

/// Scoring behavior switches
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ScoringConfig {
    pub landslide_model: LandslideModel,
    pub failure_policy: FailurePolicy,
    /// Count a nearby large historical fire towards the fire risk index
    pub fold_fire_history: bool,
}

/// Everything the analyzers and aggregator need for one request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct EngineSettings {
    pub thresholds: ThresholdConfig,
    pub weights: WeightConfig,
    pub analysis: AnalysisConfig,
    pub scoring: ScoringConfig,
}

impl EngineSettings {
    /// Check every section, see [`crate::validation`]
    pub fn validate(&self) -> Result<(), &'static str> {
        crate::validation::validate_thresholds(&self.thresholds)?;
        crate::validation::validate_weights(&self.weights)?;
        crate::validation::validate_analysis(&self.analysis)
    }
}
