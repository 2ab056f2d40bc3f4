//! Risk certificate engine
//!
//! Orchestrates one request: validate the point, run the four analyzers
//! concurrently behind a per-request [`GuardedProvider`], aggregate the
//! indicators and assemble the certificate.

use std::sync::Arc;

use chrono::Utc;
use shared::{
    aggregate, generate_certificate_id, Certificate, CertificateSubject, EngineSettings, GeoPoint,
    HazardAssessment, DEFAULT_SUBJECT_NAME,
};

use super::climate::ClimateService;
use super::fire::FireService;
use super::flood::FloodService;
use super::landslide::LandslideService;
use super::measurements::{GuardedProvider, ProviderLimits};
use crate::error::{AppError, AppResult};
use crate::external::MeasurementProvider;

/// Multi-hazard risk engine
#[derive(Clone)]
pub struct RiskEngine {
    provider: Arc<dyn MeasurementProvider>,
    settings: Arc<EngineSettings>,
    limits: ProviderLimits,
}

impl RiskEngine {
    /// Create an engine with process-wide default settings
    pub fn new(
        provider: Arc<dyn MeasurementProvider>,
        settings: EngineSettings,
        limits: ProviderLimits,
    ) -> AppResult<Self> {
        settings
            .validate()
            .map_err(|e| AppError::Configuration(e.to_string()))?;

        Ok(Self {
            provider,
            settings: Arc::new(settings),
            limits,
        })
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Produce a certificate for a location with the default settings
    pub async fn generate_certificate(
        &self,
        latitude: f64,
        longitude: f64,
        name: Option<String>,
    ) -> AppResult<Certificate> {
        self.generate_certificate_with(latitude, longitude, name, None)
            .await
    }

    /// Produce a certificate, optionally overriding the engine settings for
    /// this call only
    pub async fn generate_certificate_with(
        &self,
        latitude: f64,
        longitude: f64,
        name: Option<String>,
        overrides: Option<EngineSettings>,
    ) -> AppResult<Certificate> {
        let point =
            GeoPoint::new(latitude, longitude).map_err(|e| AppError::validation("coordinates", e))?;

        let settings = match overrides {
            Some(settings) => {
                settings
                    .validate()
                    .map_err(|e| AppError::Configuration(e.to_string()))?;
                Arc::new(settings)
            }
            None => Arc::clone(&self.settings),
        };

        let assessment = self.assess(&point, Arc::clone(&settings)).await;
        let report = aggregate(&assessment, settings.scoring.failure_policy);

        let subject = CertificateSubject {
            name: subject_name(name),
            latitude,
            longitude,
        };
        let certificate =
            Certificate::assemble(generate_certificate_id(), Utc::now(), subject, report);

        tracing::info!(
            certificate_id = %certificate.metadata.id,
            composite_score = certificate.summary.composite_score,
            verdict = %certificate.summary.verdict_label,
            "Risk certificate issued"
        );

        Ok(certificate)
    }

    /// Run every analyzer for a point. Never fails: each analyzer degrades
    /// on its own.
    pub async fn assess(&self, point: &GeoPoint, settings: Arc<EngineSettings>) -> HazardAssessment {
        let provider = GuardedProvider::new(Arc::clone(&self.provider), self.limits);

        let landslide = LandslideService::new(provider.clone(), Arc::clone(&settings));
        let flood = FloodService::new(provider.clone(), Arc::clone(&settings));
        let fire = FireService::new(provider.clone(), Arc::clone(&settings));
        let climate = ClimateService::new(provider, settings);

        let (landslide, flood, fire, climate) = tokio::join!(
            landslide.analyze(point),
            flood.analyze(point),
            fire.analyze(point),
            climate.analyze(point),
        );

        HazardAssessment {
            landslide,
            flood,
            fire,
            climate,
        }
    }
}

fn subject_name(name: Option<String>) -> String {
    name.map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| DEFAULT_SUBJECT_NAME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_name_defaults() {
        assert_eq!(subject_name(None), DEFAULT_SUBJECT_NAME);
        assert_eq!(subject_name(Some("   ".into())), DEFAULT_SUBJECT_NAME);
        assert_eq!(subject_name(Some(" Lot 12 ".into())), "Lot 12");
    }
}
