//! Flood hazard analyzer

use std::sync::Arc;

use shared::{assess_flood, EngineSettings, FloodInputs, GeoPoint, HazardKind, HazardResult};

use super::measurements::GuardedProvider;
use crate::external::{Band, MeasurementQuery, ProviderError};

const FLOOD_BANDS: [Band; 3] = [Band::MaxPrecipitation, Band::LandCover, Band::WaterOccurrence];

/// Flood analyzer
#[derive(Clone)]
pub struct FloodService {
    provider: GuardedProvider,
    settings: Arc<EngineSettings>,
}

impl FloodService {
    pub fn new(provider: GuardedProvider, settings: Arc<EngineSettings>) -> Self {
        Self { provider, settings }
    }

    /// Classify flood exposure at a point. Provider failures yield the
    /// indeterminate category.
    pub async fn analyze(&self, point: &GeoPoint) -> HazardResult {
        match self.fetch_inputs(point).await {
            Ok(inputs) => assess_flood(&inputs, &self.settings.thresholds),
            Err(e) => {
                tracing::warn!(error = %e, "Flood analysis degraded");
                HazardResult::unavailable(HazardKind::Flood, e.to_string())
            }
        }
    }

    async fn fetch_inputs(&self, point: &GeoPoint) -> Result<FloodInputs, ProviderError> {
        let analysis = &self.settings.analysis;
        let query = MeasurementQuery::at_point(
            *point,
            analysis.year,
            analysis.raster_scale_m,
            &FLOOD_BANDS,
        );
        let measurements = self.provider.reduce(&query).await?;

        Ok(FloodInputs {
            max_precipitation_mm: measurements.get(Band::MaxPrecipitation),
            land_cover_class: measurements.get(Band::LandCover),
            water_occurrence_pct: measurements.get(Band::WaterOccurrence),
        })
    }
}
