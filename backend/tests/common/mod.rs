//! Shared test fixtures: an in-memory measurement provider

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use georisk_backend::external::{
    Band, FeatureCatalog, FeatureFilter, MeasurementProvider, MeasurementQuery, Measurements,
    ProviderError,
};
use georisk_backend::services::{ProviderLimits, RiskEngine};
use shared::{EngineSettings, GeoPoint, YearlyStats};

/// Canned provider with failure injection and call accounting
pub struct FakeProvider {
    pub values: Measurements,
    pub fault_distance_m: f64,
    pub large_fires: u64,
    pub volcanoes: u64,
    /// Yearly maximum temperature is `base + slope * (year - 2010)`
    pub yearly_max_base: f64,
    pub yearly_max_slope: f64,
    pub samples: Vec<Option<f64>>,
    pub failing_bands: HashSet<Band>,
    pub fail_features: bool,
    pub fail_yearly: bool,
    pub delay: Duration,
    pub calls: AtomicUsize,
    pub yearly_calls: AtomicUsize,
    /// Bands and scale of every reduction received
    pub reductions: Mutex<Vec<(Vec<Band>, f64)>>,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl FakeProvider {
    /// Gentle terrain, dry land, green vegetation, stable climate
    pub fn calm() -> Self {
        Self {
            values: Measurements::new()
                .with(Band::Slope, Some(5.0))
                .with(Band::Elevation, Some(520.0))
                .with(Band::MaxPrecipitation, Some(10.0))
                .with(Band::LandCover, Some(10.0))
                .with(Band::WaterOccurrence, Some(0.0))
                .with(Band::Ndvi, Some(0.7))
                .with(Band::SurfaceTemperatureDay, Some(22.0))
                .with(Band::SurfaceTemperatureNight, Some(9.0)),
            fault_distance_m: 25_000.0,
            large_fires: 0,
            volcanoes: 0,
            yearly_max_base: 31.0,
            yearly_max_slope: 0.0,
            samples: (0..200).map(|i| Some(20.0 + f64::from(i % 10))).collect(),
            failing_bands: HashSet::new(),
            fail_features: false,
            fail_yearly: false,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            yearly_calls: AtomicUsize::new(0),
            reductions: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Steep slope under heavy rain, permanent water, dry vegetation
    pub fn hazardous() -> Self {
        let calm = Self::calm();
        Self {
            values: calm
                .values
                .clone()
                .with(Band::Slope, Some(35.0))
                .with(Band::MaxPrecipitation, Some(200.0))
                .with(Band::WaterOccurrence, Some(50.0))
                .with(Band::Ndvi, Some(0.2))
                .with(Band::SurfaceTemperatureDay, Some(25.0)),
            fault_distance_m: 1_000.0,
            ..calm
        }
    }

    pub fn failing(mut self, band: Band) -> Self {
        self.failing_bands.insert(band);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Scale of the reductions that requested `band`
    pub fn scales_for(&self, band: Band) -> Vec<f64> {
        self.reductions
            .lock()
            .unwrap()
            .iter()
            .filter(|(bands, _)| bands.contains(&band))
            .map(|(_, scale)| *scale)
            .collect()
    }

    async fn enter(&self) -> InFlight<'_> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let guard = InFlight(&self.in_flight);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        guard
    }
}

fn injected() -> ProviderError {
    ProviderError::Unavailable("injected failure".to_string())
}

#[async_trait]
impl MeasurementProvider for FakeProvider {
    async fn reduce(&self, query: &MeasurementQuery) -> Result<Measurements, ProviderError> {
        let _guard = self.enter().await;
        self.reductions
            .lock()
            .unwrap()
            .push((query.bands.clone(), query.scale_m));
        if query.bands.iter().any(|b| self.failing_bands.contains(b)) {
            return Err(injected());
        }
        Ok(query
            .bands
            .iter()
            .map(|b| (*b, self.values.get(*b)))
            .collect())
    }

    async fn nearest_feature_distance(
        &self,
        _point: &GeoPoint,
        _catalog: FeatureCatalog,
    ) -> Result<f64, ProviderError> {
        let _guard = self.enter().await;
        if self.fail_features {
            return Err(injected());
        }
        Ok(self.fault_distance_m)
    }

    async fn count_features_within(
        &self,
        _point: &GeoPoint,
        _radius_m: f64,
        catalog: FeatureCatalog,
        _filter: FeatureFilter,
    ) -> Result<u64, ProviderError> {
        let _guard = self.enter().await;
        if self.fail_features {
            return Err(injected());
        }
        Ok(match catalog {
            FeatureCatalog::HistoricalFires => self.large_fires,
            FeatureCatalog::Volcanoes => self.volcanoes,
            FeatureCatalog::Faults => 0,
        })
    }

    async fn yearly_aggregate(
        &self,
        _point: &GeoPoint,
        _radius_m: f64,
        _band: Band,
        year: i32,
    ) -> Result<YearlyStats, ProviderError> {
        let _guard = self.enter().await;
        self.yearly_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_yearly {
            return Err(injected());
        }
        let max = self.yearly_max_base + self.yearly_max_slope * f64::from(year - 2010);
        Ok(YearlyStats {
            year,
            min: Some(max - 20.0),
            max: Some(max),
            mean: Some(max - 10.0),
        })
    }

    async fn band_samples(
        &self,
        _point: &GeoPoint,
        _radius_m: f64,
        band: Band,
        _year: i32,
    ) -> Result<Vec<Option<f64>>, ProviderError> {
        let _guard = self.enter().await;
        if self.failing_bands.contains(&band) {
            return Err(injected());
        }
        Ok(self.samples.clone())
    }
}

pub fn limits() -> ProviderLimits {
    ProviderLimits {
        max_concurrency: 8,
        timeout: Duration::from_secs(5),
    }
}

pub fn engine_with(provider: Arc<FakeProvider>, limits: ProviderLimits) -> RiskEngine {
    RiskEngine::new(provider, EngineSettings::default(), limits).unwrap()
}

pub fn engine(provider: FakeProvider) -> RiskEngine {
    engine_with(Arc::new(provider), limits())
}
