//! Hazard result shared by all analyzers

use serde::{Deserialize, Serialize};

use crate::types::TechnicalDetails;

/// Hazards scored into a [`HazardResult`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HazardKind {
    Landslide,
    Flood,
    Fire,
}

impl HazardKind {
    /// Score reported when the hazard could not be measured
    pub fn degraded_score(&self) -> f64 {
        match self {
            HazardKind::Landslide | HazardKind::Fire => 0.0,
            // Indeterminate flood category
            HazardKind::Flood => -1.0,
        }
    }
}

impl std::fmt::Display for HazardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HazardKind::Landslide => write!(f, "landslide"),
            HazardKind::Flood => write!(f, "flood"),
            HazardKind::Fire => write!(f, "fire"),
        }
    }
}

/// Outcome of one analyzer invocation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HazardResult {
    pub hazard: HazardKind,
    /// Landslide: 0-10 scale. Flood: category -1..=2. Fire: risk index.
    pub score: f64,
    pub details: TechnicalDetails,
    /// Measurements that were absent at this location and year
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
    /// Set when measurements could not be fetched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HazardResult {
    pub fn assessed(
        hazard: HazardKind,
        score: f64,
        details: TechnicalDetails,
        missing: Vec<String>,
    ) -> Self {
        Self {
            hazard,
            score,
            details,
            missing,
            error: None,
        }
    }

    /// Degraded result for a hazard whose measurements failed
    pub fn unavailable(hazard: HazardKind, error: impl Into<String>) -> Self {
        Self {
            hazard,
            score: hazard.degraded_score(),
            details: TechnicalDetails::new().with("Error", "No data"),
            missing: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_available(&self) -> bool {
        self.error.is_none()
    }
}

/// Collect the names of absent measurements
pub(crate) fn missing_fields(fields: &[(&str, Option<f64>)]) -> Vec<String> {
    fields
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_result_shape() {
        let result = HazardResult::unavailable(HazardKind::Landslide, "timeout");
        assert_eq!(result.score, 0.0);
        assert!(!result.is_available());
        assert_eq!(result.details.get("Error"), Some("No data"));

        let flood = HazardResult::unavailable(HazardKind::Flood, "timeout");
        assert_eq!(flood.score, -1.0);
    }

    #[test]
    fn test_missing_fields() {
        let missing = missing_fields(&[("slope", Some(12.0)), ("elevation", None)]);
        assert_eq!(missing, vec!["elevation".to_string()]);
    }
}
