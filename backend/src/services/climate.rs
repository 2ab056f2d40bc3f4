//! Climate signal analyzer
//!
//! Combines the daytime and nighttime temperature histograms of the analysis
//! year with one yearly aggregate per trend year. The yearly queries are
//! independent and fan out concurrently.

use std::sync::Arc;

use shared::{climate_signals, ClimateSignals, EngineSettings, GeoPoint, YearlyStats};
use tokio::task::JoinSet;

use super::measurements::GuardedProvider;
use crate::external::{Band, ProviderError};

/// Climate analyzer
#[derive(Clone)]
pub struct ClimateService {
    provider: GuardedProvider,
    settings: Arc<EngineSettings>,
}

impl ClimateService {
    pub fn new(provider: GuardedProvider, settings: Arc<EngineSettings>) -> Self {
        Self { provider, settings }
    }

    /// Climate signals at a point, empty when any query fails
    pub async fn analyze(&self, point: &GeoPoint) -> ClimateSignals {
        match self.compute(point).await {
            Ok(signals) => signals,
            Err(e) => {
                tracing::warn!(error = %e, "Climate analysis degraded");
                ClimateSignals::default()
            }
        }
    }

    async fn compute(&self, point: &GeoPoint) -> Result<ClimateSignals, ProviderError> {
        let analysis = &self.settings.analysis;
        let radius = analysis.climate_buffer_m;

        let (day, night, yearly) = tokio::try_join!(
            self.provider.band_samples(
                point,
                radius,
                Band::SurfaceTemperatureDay,
                analysis.year
            ),
            self.provider.band_samples(
                point,
                radius,
                Band::SurfaceTemperatureNight,
                analysis.year
            ),
            self.yearly_series(point),
        )?;

        Ok(climate_signals(&day, &night, &yearly))
    }

    async fn yearly_series(&self, point: &GeoPoint) -> Result<Vec<YearlyStats>, ProviderError> {
        let analysis = &self.settings.analysis;
        let radius = analysis.climate_buffer_m;
        let mut tasks = JoinSet::new();

        for year in analysis.trend_years() {
            let provider = self.provider.clone();
            let point = *point;
            tasks.spawn(async move {
                provider
                    .yearly_aggregate(&point, radius, Band::SurfaceTemperatureDay, year)
                    .await
                    .map(|stats| YearlyStats { year, ..stats })
            });
        }

        let mut series = Vec::with_capacity(tasks.len());
        // Dropping the set on early return aborts the remaining queries
        while let Some(joined) = tasks.join_next().await {
            let stats = joined
                .map_err(|e| ProviderError::Unavailable(format!("yearly query task failed: {}", e)))??;
            series.push(stats);
        }

        Ok(series)
    }
}
