//! Certificate indicators

use serde::{Deserialize, Serialize};

use crate::types::TechnicalDetails;

/// Indicator identifiers, in presentation order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorId {
    Soil,
    Water,
    Fire,
}

impl IndicatorId {
    /// Fixed presentation order
    pub const ORDER: [IndicatorId; 3] = [IndicatorId::Soil, IndicatorId::Water, IndicatorId::Fire];

    pub fn title(&self) -> &'static str {
        match self {
            IndicatorId::Soil => "Soil Stability",
            IndicatorId::Water => "Flood Risk",
            IndicatorId::Fire => "Fire & Climate",
        }
    }
}

/// Traffic-light color of an indicator
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorColor {
    Green,
    Yellow,
    Red,
}

/// One hazard as presented on the certificate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Indicator {
    pub id: IndicatorId,
    pub title: String,
    pub status: String,
    pub color: IndicatorColor,
    pub message: String,
    /// Raw score as shown to technical readers
    pub technical_score: String,
    pub technical_details: TechnicalDetails,
    pub penalty_points: u32,
}
