//! Validation utilities for the GeoRisk engine
//!
//! Coordinate checks guard the single inbound operation. Configuration checks
//! run once at startup and for per-call overrides; a failure there is an
//! internal fault, never a degraded hazard.

use crate::models::{AnalysisConfig, ThresholdConfig, WeightConfig};

// ============================================================================
// Coordinate Validations
// ============================================================================

/// Validate latitude is finite and within [-90, 90]
pub fn validate_latitude(latitude: f64) -> Result<(), &'static str> {
    if !latitude.is_finite() {
        return Err("Latitude must be a finite number");
    }
    if !(-90.0..=90.0).contains(&latitude) {
        return Err("Latitude must be between -90 and 90");
    }
    Ok(())
}

/// Validate longitude is finite and within [-180, 180]
pub fn validate_longitude(longitude: f64) -> Result<(), &'static str> {
    if !longitude.is_finite() {
        return Err("Longitude must be a finite number");
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), &'static str> {
    validate_latitude(latitude)?;
    validate_longitude(longitude)
}

// ============================================================================
// Configuration Validations
// ============================================================================

/// Validate that thresholds are finite and ordered (critical above high above moderate)
pub fn validate_thresholds(t: &ThresholdConfig) -> Result<(), &'static str> {
    let values = [
        t.slope_critical,
        t.slope_high,
        t.slope_moderate,
        t.fault_distance_critical,
        t.fault_distance_moderate,
        t.rainfall_high,
        t.rainfall_moderate,
        t.flood_precipitation,
        t.water_occurrence,
        t.ndvi_dry,
        t.surface_temperature_hot,
    ];
    if values.iter().any(|v| !v.is_finite()) {
        return Err("Thresholds must be finite numbers");
    }
    if !(t.slope_critical >= t.slope_high && t.slope_high >= t.slope_moderate) {
        return Err("Slope thresholds must satisfy critical >= high >= moderate");
    }
    if t.fault_distance_critical > t.fault_distance_moderate {
        return Err("Critical fault distance must not exceed moderate fault distance");
    }
    if t.rainfall_high < t.rainfall_moderate {
        return Err("High rainfall threshold must not be below moderate threshold");
    }
    if !(-1.0..=1.0).contains(&t.ndvi_dry) {
        return Err("NDVI threshold must be between -1 and 1");
    }
    Ok(())
}

/// Validate weights are finite and non-negative.
///
/// Weights are not required to sum to 1.
pub fn validate_weights(w: &WeightConfig) -> Result<(), &'static str> {
    let weights = [w.slope, w.fault, w.rainfall];
    if weights.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err("Weights must be finite and non-negative");
    }
    Ok(())
}

/// Longest climate trend window, in years after the start year
pub const MAX_TREND_SPAN_YEARS: i64 = 50;

/// Validate the request-scoped analysis window and radii
pub fn validate_analysis(a: &AnalysisConfig) -> Result<(), &'static str> {
    if a.trend_start_year > a.year {
        return Err("Trend start year must not be after the analysis year");
    }
    // One yearly query is issued per year in the window
    if i64::from(a.year) - i64::from(a.trend_start_year) > MAX_TREND_SPAN_YEARS {
        return Err("Trend window must not exceed 50 years");
    }
    let radii = [
        a.climate_buffer_m,
        a.raster_scale_m,
        a.temperature_scale_m,
        a.fire_history_radius_m,
        a.volcano_radius_m,
    ];
    if radii.iter().any(|r| !r.is_finite() || *r <= 0.0) {
        return Err("Radii and scales must be positive");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_coordinates_bounds() {
        assert!(validate_coordinates(-90.0, -180.0).is_ok());
        assert!(validate_coordinates(90.0, 180.0).is_ok());
        assert!(validate_coordinates(-33.4489, -70.6693).is_ok());
        assert!(validate_coordinates(-90.0001, 0.0).is_err());
        assert!(validate_coordinates(0.0, 180.0001).is_err());
        assert!(validate_coordinates(f64::INFINITY, 0.0).is_err());
        assert!(validate_coordinates(0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_thresholds(&ThresholdConfig::default()).is_ok());
        assert!(validate_weights(&WeightConfig::default()).is_ok());
        assert!(validate_analysis(&AnalysisConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_thresholds_ordering() {
        let t = ThresholdConfig {
            slope_high: 40.0,
            ..Default::default()
        };
        assert!(validate_thresholds(&t).is_err());

        let t = ThresholdConfig {
            fault_distance_critical: 20_000.0,
            ..Default::default()
        };
        assert!(validate_thresholds(&t).is_err());

        let t = ThresholdConfig {
            rainfall_high: f64::NAN,
            ..Default::default()
        };
        assert!(validate_thresholds(&t).is_err());
    }

    #[test]
    fn test_validate_weights_rejects_negative() {
        let w = WeightConfig {
            fault: -0.1,
            ..Default::default()
        };
        assert!(validate_weights(&w).is_err());
    }

    #[test]
    fn test_validate_analysis_window() {
        let a = AnalysisConfig {
            trend_start_year: 2030,
            ..Default::default()
        };
        assert!(validate_analysis(&a).is_err());

        let a = AnalysisConfig {
            climate_buffer_m: 0.0,
            ..Default::default()
        };
        assert!(validate_analysis(&a).is_err());
    }

    #[test]
    fn test_validate_analysis_trend_span() {
        let a = AnalysisConfig {
            trend_start_year: 2022 - 50,
            ..Default::default()
        };
        assert!(validate_analysis(&a).is_ok());

        let a = AnalysisConfig {
            trend_start_year: 2022 - 51,
            ..Default::default()
        };
        assert!(validate_analysis(&a).is_err());

        let a = AnalysisConfig {
            trend_start_year: -20_000,
            ..Default::default()
        };
        assert!(validate_analysis(&a).is_err());

        let a = AnalysisConfig {
            year: i32::MAX,
            trend_start_year: i32::MIN,
            ..Default::default()
        };
        assert!(validate_analysis(&a).is_err());
    }
}
