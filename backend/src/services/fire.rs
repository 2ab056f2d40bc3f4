//! Fire hazard analyzer

use std::sync::Arc;

use shared::{assess_fire, EngineSettings, FireInputs, GeoPoint, HazardKind, HazardResult};

use super::measurements::GuardedProvider;
use crate::external::{Band, FeatureCatalog, FeatureFilter, MeasurementQuery, ProviderError};

/// Fire analyzer
#[derive(Clone)]
pub struct FireService {
    provider: GuardedProvider,
    settings: Arc<EngineSettings>,
}

impl FireService {
    pub fn new(provider: GuardedProvider, settings: Arc<EngineSettings>) -> Self {
        Self { provider, settings }
    }

    /// Compute the fire risk index at a point. Historical fire and volcano
    /// counts are best effort and never fail the analysis.
    pub async fn analyze(&self, point: &GeoPoint) -> HazardResult {
        let (inputs, large_fires, volcanoes) = tokio::join!(
            self.fetch_inputs(point),
            self.count_large_fires(point),
            self.count_volcanoes(point),
        );

        match inputs {
            Ok(inputs) => {
                let inputs = FireInputs {
                    large_fires_nearby: context_count(large_fires, "historical fires"),
                    volcanoes_nearby: context_count(volcanoes, "volcanoes"),
                    ..inputs
                };
                assess_fire(
                    &inputs,
                    &self.settings.thresholds,
                    self.settings.scoring.fold_fire_history,
                )
            }
            Err(e) => {
                tracing::warn!(error = %e, "Fire analysis degraded");
                HazardResult::unavailable(HazardKind::Fire, e.to_string())
            }
        }
    }

    async fn fetch_inputs(&self, point: &GeoPoint) -> Result<FireInputs, ProviderError> {
        let analysis = &self.settings.analysis;
        // Each band is reduced at its native resolution
        let vegetation =
            MeasurementQuery::at_point(*point, analysis.year, analysis.raster_scale_m, &[Band::Ndvi]);
        let temperature = MeasurementQuery::at_point(
            *point,
            analysis.year,
            analysis.temperature_scale_m,
            &[Band::SurfaceTemperatureDay],
        );

        let (vegetation, temperature) = tokio::try_join!(
            self.provider.reduce(&vegetation),
            self.provider.reduce(&temperature),
        )?;

        Ok(FireInputs {
            ndvi: vegetation.get(Band::Ndvi),
            surface_temperature_c: temperature.get(Band::SurfaceTemperatureDay),
            ..Default::default()
        })
    }

    async fn count_large_fires(&self, point: &GeoPoint) -> Result<u64, ProviderError> {
        let analysis = &self.settings.analysis;
        self.provider
            .count_features_within(
                point,
                analysis.fire_history_radius_m,
                FeatureCatalog::HistoricalFires,
                FeatureFilter::BurnedAreaAbove(analysis.fire_history_min_area),
            )
            .await
    }

    async fn count_volcanoes(&self, point: &GeoPoint) -> Result<u64, ProviderError> {
        let analysis = &self.settings.analysis;
        self.provider
            .count_features_within(
                point,
                analysis.volcano_radius_m,
                FeatureCatalog::Volcanoes,
                FeatureFilter::MinCategory(analysis.volcano_min_category),
            )
            .await
    }
}

fn context_count(count: Result<u64, ProviderError>, what: &str) -> Option<u64> {
    count
        .map_err(|e| tracing::warn!(error = %e, "Count of nearby {} unavailable", what))
        .ok()
}
