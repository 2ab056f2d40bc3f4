//! Landslide hazard analyzer

use std::sync::Arc;

use shared::{
    assess_landslide, EngineSettings, GeoPoint, HazardKind, HazardResult, LandslideInputs,
    LandslideModel,
};

use super::measurements::GuardedProvider;
use crate::external::{Band, FeatureCatalog, MeasurementQuery, ProviderError};

const LANDSLIDE_BANDS: [Band; 3] = [Band::Slope, Band::Elevation, Band::MaxPrecipitation];

/// Landslide analyzer
#[derive(Clone)]
pub struct LandslideService {
    provider: GuardedProvider,
    settings: Arc<EngineSettings>,
}

impl LandslideService {
    pub fn new(provider: GuardedProvider, settings: Arc<EngineSettings>) -> Self {
        Self { provider, settings }
    }

    /// Score landslide exposure at a point. Provider failures yield a degraded result.
    pub async fn analyze(&self, point: &GeoPoint) -> HazardResult {
        match self.fetch_inputs(point).await {
            Ok(inputs) => {
                let result = assess_landslide(
                    &inputs,
                    &self.settings.thresholds,
                    &self.settings.weights,
                    self.settings.scoring.landslide_model,
                );
                tracing::debug!(score = result.score, missing = ?result.missing, "Landslide assessed");
                result
            }
            Err(e) => {
                tracing::warn!(error = %e, "Landslide analysis degraded");
                HazardResult::unavailable(HazardKind::Landslide, e.to_string())
            }
        }
    }

    async fn fetch_inputs(&self, point: &GeoPoint) -> Result<LandslideInputs, ProviderError> {
        let analysis = &self.settings.analysis;
        let query = MeasurementQuery::at_point(
            *point,
            analysis.year,
            analysis.raster_scale_m,
            &LANDSLIDE_BANDS,
        );

        let (measurements, fault_distance) = tokio::join!(
            self.provider.reduce(&query),
            self.provider
                .nearest_feature_distance(point, FeatureCatalog::Faults),
        );
        let measurements = measurements?;

        // Fault proximity only informs the score under the weighted model
        let fault_distance_m = match (fault_distance, self.settings.scoring.landslide_model) {
            (Ok(d), _) => Some(d),
            (Err(e), LandslideModel::Weighted) => return Err(e),
            (Err(e), LandslideModel::Additive) => {
                tracing::warn!(error = %e, "Fault distance unavailable");
                None
            }
        };

        Ok(LandslideInputs {
            slope_deg: measurements.get(Band::Slope),
            elevation_m: measurements.get(Band::Elevation),
            max_precipitation_mm: measurements.get(Band::MaxPrecipitation),
            fault_distance_m,
        })
    }
}
