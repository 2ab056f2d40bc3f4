//! Risk certificate and verdict

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::indicator::Indicator;
use crate::aggregation::AggregateReport;

/// Engine version stamped on every certificate
pub const ENGINE_VERSION: &str = concat!("georisk-engine/", env!("CARGO_PKG_VERSION"));

/// Subject name used when the caller does not provide one
pub const DEFAULT_SUBJECT_NAME: &str = "Requested Location";

pub const DISCLAIMER: &str = "Report generated by GeoRisk from NASA/ESA satellite data. \
     It does not replace on-site engineering studies.";

pub const DATA_SOURCES: [&str; 6] = [
    "USGS SRTM",
    "Sentinel-2",
    "MODIS",
    "CHIRPS",
    "ESA WorldCover",
    "JRC Global Surface Water",
];

/// Composite score at or above which a site is suitable for investment
pub const SUITABLE_MIN_SCORE: u8 = 80;
/// Composite score at or above which a site is suitable with mitigation
pub const MITIGATION_MIN_SCORE: u8 = 50;

/// Investment-suitability verdict
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    SuitableForInvestment,
    SuitableWithMitigation,
    NotRecommended,
}

/// Verdict colors; orange is only used by the verdict, not by indicators
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VerdictColor {
    Green,
    Orange,
    Red,
}

impl Verdict {
    pub fn from_score(score: u8) -> Self {
        if score >= SUITABLE_MIN_SCORE {
            Verdict::SuitableForInvestment
        } else if score >= MITIGATION_MIN_SCORE {
            Verdict::SuitableWithMitigation
        } else {
            Verdict::NotRecommended
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::SuitableForInvestment => "Suitable for Investment",
            Verdict::SuitableWithMitigation => "Suitable with Mitigation",
            Verdict::NotRecommended => "Not Recommended / Critical Risk",
        }
    }

    pub fn color(&self) -> VerdictColor {
        match self {
            Verdict::SuitableForInvestment => VerdictColor::Green,
            Verdict::SuitableWithMitigation => VerdictColor::Orange,
            Verdict::NotRecommended => VerdictColor::Red,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CertificateMetadata {
    pub id: String,
    pub issued_at: DateTime<Utc>,
    pub engine_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CertificateSubject {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CertificateSummary {
    pub composite_score: u8,
    pub verdict_label: String,
    pub verdict_color: VerdictColor,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LegalNotice {
    pub disclaimer: String,
    pub sources: Vec<String>,
}

impl Default for LegalNotice {
    fn default() -> Self {
        Self {
            disclaimer: DISCLAIMER.to_string(),
            sources: DATA_SOURCES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Multi-hazard risk certificate for one point
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Certificate {
    pub metadata: CertificateMetadata,
    pub subject: CertificateSubject,
    pub summary: CertificateSummary,
    pub indicators: Vec<Indicator>,
    pub legal: LegalNotice,
}

impl Certificate {
    /// Wrap an aggregate report with identity, timestamp and legal boilerplate
    pub fn assemble(
        id: String,
        issued_at: DateTime<Utc>,
        subject: CertificateSubject,
        report: AggregateReport,
    ) -> Self {
        Self {
            metadata: CertificateMetadata {
                id,
                issued_at,
                engine_version: ENGINE_VERSION.to_string(),
            },
            subject,
            summary: CertificateSummary {
                composite_score: report.composite_score,
                verdict_label: report.verdict.label().to_string(),
                verdict_color: report.verdict.color(),
            },
            indicators: report.indicators,
            legal: LegalNotice::default(),
        }
    }
}

/// Certificate identifier: "GR-" followed by 8 uppercase hex characters
pub fn generate_certificate_id() -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!("GR-{}", token[..8].to_uppercase())
}
