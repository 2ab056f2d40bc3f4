//! Per-request guard around a measurement provider
//!
//! Every provider call made while analyzing one location goes through the
//! same [`GuardedProvider`], which caps calls in flight and bounds each call
//! with a timeout.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use shared::{GeoPoint, YearlyStats};
use tokio::sync::Semaphore;

use crate::external::{
    Band, FeatureCatalog, FeatureFilter, MeasurementProvider, MeasurementQuery, Measurements,
    ProviderError,
};

/// Concurrency and latency bounds for provider calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderLimits {
    pub max_concurrency: usize,
    pub timeout: Duration,
}

impl Default for ProviderLimits {
    fn default() -> Self {
        Self {
            max_concurrency: 8,
            timeout: Duration::from_secs(20),
        }
    }
}

/// Provider wrapper enforcing [`ProviderLimits`]
#[derive(Clone)]
pub struct GuardedProvider {
    inner: Arc<dyn MeasurementProvider>,
    permits: Arc<Semaphore>,
    timeout: Duration,
}

impl GuardedProvider {
    pub fn new(inner: Arc<dyn MeasurementProvider>, limits: ProviderLimits) -> Self {
        Self {
            inner,
            permits: Arc::new(Semaphore::new(limits.max_concurrency.max(1))),
            timeout: limits.timeout,
        }
    }

    async fn guarded<T, F>(&self, call: F) -> Result<T, ProviderError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| ProviderError::Unavailable("provider permits closed".to_string()))?;

        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout))?
    }

    pub async fn reduce(&self, query: &MeasurementQuery) -> Result<Measurements, ProviderError> {
        self.guarded(self.inner.reduce(query)).await
    }

    pub async fn nearest_feature_distance(
        &self,
        point: &GeoPoint,
        catalog: FeatureCatalog,
    ) -> Result<f64, ProviderError> {
        self.guarded(self.inner.nearest_feature_distance(point, catalog))
            .await
    }

    pub async fn count_features_within(
        &self,
        point: &GeoPoint,
        radius_m: f64,
        catalog: FeatureCatalog,
        filter: FeatureFilter,
    ) -> Result<u64, ProviderError> {
        self.guarded(
            self.inner
                .count_features_within(point, radius_m, catalog, filter),
        )
        .await
    }

    pub async fn yearly_aggregate(
        &self,
        point: &GeoPoint,
        radius_m: f64,
        band: Band,
        year: i32,
    ) -> Result<YearlyStats, ProviderError> {
        self.guarded(self.inner.yearly_aggregate(point, radius_m, band, year))
            .await
    }

    pub async fn band_samples(
        &self,
        point: &GeoPoint,
        radius_m: f64,
        band: Band,
        year: i32,
    ) -> Result<Vec<Option<f64>>, ProviderError> {
        self.guarded(self.inner.band_samples(point, radius_m, band, year))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct SlowProvider;

    #[async_trait]
    impl MeasurementProvider for SlowProvider {
        async fn reduce(&self, _query: &MeasurementQuery) -> Result<Measurements, ProviderError> {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok(Measurements::new())
        }

        async fn nearest_feature_distance(
            &self,
            _point: &GeoPoint,
            _catalog: FeatureCatalog,
        ) -> Result<f64, ProviderError> {
            Ok(1_000.0)
        }

        async fn count_features_within(
            &self,
            _point: &GeoPoint,
            _radius_m: f64,
            _catalog: FeatureCatalog,
            _filter: FeatureFilter,
        ) -> Result<u64, ProviderError> {
            Ok(0)
        }

        async fn yearly_aggregate(
            &self,
            _point: &GeoPoint,
            _radius_m: f64,
            _band: Band,
            year: i32,
        ) -> Result<YearlyStats, ProviderError> {
            Ok(YearlyStats {
                year,
                ..Default::default()
            })
        }

        async fn band_samples(
            &self,
            _point: &GeoPoint,
            _radius_m: f64,
            _band: Band,
            _year: i32,
        ) -> Result<Vec<Option<f64>>, ProviderError> {
            Ok(Vec::new())
        }
    }

    fn guarded(timeout: Duration) -> GuardedProvider {
        GuardedProvider::new(
            Arc::new(SlowProvider),
            ProviderLimits {
                max_concurrency: 2,
                timeout,
            },
        )
    }

    #[tokio::test]
    async fn test_slow_call_times_out() {
        let provider = guarded(Duration::from_millis(20));
        let point = GeoPoint::new(0.0, 0.0).unwrap();
        let query = MeasurementQuery::at_point(point, 2022, 30.0, &[Band::Slope]);

        let err = provider.reduce(&query).await.unwrap_err();
        assert_eq!(err, ProviderError::Timeout(Duration::from_millis(20)));
    }

    #[tokio::test]
    async fn test_fast_call_passes_through() {
        let provider = guarded(Duration::from_millis(200));
        let point = GeoPoint::new(0.0, 0.0).unwrap();

        let distance = provider
            .nearest_feature_distance(&point, FeatureCatalog::Faults)
            .await
            .unwrap();
        assert_eq!(distance, 1_000.0);
    }
}
