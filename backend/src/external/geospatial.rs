//! HTTP client for the geospatial measurement service
//!
//! Raster reductions are delegated to a remote service exposing
//! `/reduce`, `/yearly-aggregate` and `/samples`. Feature lookups are
//! answered from the locally loaded catalogs.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared::{GeoPoint, YearlyStats};

use super::catalog::CatalogSet;
use super::provider::{
    Band, FeatureCatalog, FeatureFilter, MeasurementProvider, MeasurementQuery, Measurements,
    ProviderError,
};

/// Geospatial measurement client
#[derive(Clone)]
pub struct GeospatialClient {
    client: Client,
    api_key: String,
    base_url: String,
    catalogs: Arc<CatalogSet>,
}

#[derive(Debug, Serialize)]
struct ReduceRequest<'a> {
    latitude: f64,
    longitude: f64,
    buffer_radius_m: f64,
    scale_m: f64,
    year: i32,
    bands: &'a [Band],
}

#[derive(Debug, Deserialize)]
struct ReduceResponse {
    values: Measurements,
}

#[derive(Debug, Serialize)]
struct BandRequest {
    latitude: f64,
    longitude: f64,
    buffer_radius_m: f64,
    band: Band,
    year: i32,
}

#[derive(Debug, Deserialize)]
struct YearlyAggregateResponse {
    min: Option<f64>,
    max: Option<f64>,
    mean: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SamplesResponse {
    samples: Vec<Option<f64>>,
}

impl GeospatialClient {
    /// Create a new GeospatialClient
    pub fn new(
        base_url: String,
        api_key: String,
        timeout: Duration,
        catalogs: Arc<CatalogSet>,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            catalogs,
        })
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ProviderError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);

        let mut request = self.client.post(&url).json(body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Transport(format!("request to {} timed out", path))
            } else {
                ProviderError::Transport(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api { status, body });
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

#[async_trait]
impl MeasurementProvider for GeospatialClient {
    async fn reduce(&self, query: &MeasurementQuery) -> Result<Measurements, ProviderError> {
        let request = ReduceRequest {
            latitude: query.point.latitude,
            longitude: query.point.longitude,
            buffer_radius_m: query.buffer_radius_m,
            scale_m: query.scale_m,
            year: query.year,
            bands: &query.bands,
        };

        let response: ReduceResponse = self.post_json("reduce", &request).await?;
        Ok(response.values)
    }

    async fn nearest_feature_distance(
        &self,
        point: &GeoPoint,
        catalog: FeatureCatalog,
    ) -> Result<f64, ProviderError> {
        Ok(self.catalogs.get(catalog).nearest_distance(point))
    }

    async fn count_features_within(
        &self,
        point: &GeoPoint,
        radius_m: f64,
        catalog: FeatureCatalog,
        filter: FeatureFilter,
    ) -> Result<u64, ProviderError> {
        Ok(self.catalogs.get(catalog).count_within(point, radius_m, filter))
    }

    async fn yearly_aggregate(
        &self,
        point: &GeoPoint,
        radius_m: f64,
        band: Band,
        year: i32,
    ) -> Result<YearlyStats, ProviderError> {
        let request = BandRequest {
            latitude: point.latitude,
            longitude: point.longitude,
            buffer_radius_m: radius_m,
            band,
            year,
        };

        let response: YearlyAggregateResponse =
            self.post_json("yearly-aggregate", &request).await?;

        Ok(YearlyStats {
            year,
            min: response.min,
            max: response.max,
            mean: response.mean,
        })
    }

    async fn band_samples(
        &self,
        point: &GeoPoint,
        radius_m: f64,
        band: Band,
        year: i32,
    ) -> Result<Vec<Option<f64>>, ProviderError> {
        let request = BandRequest {
            latitude: point.latitude,
            longitude: point.longitude,
            buffer_radius_m: radius_m,
            band,
            year,
        };

        let response: SamplesResponse = self.post_json("samples", &request).await?;
        Ok(response.samples)
    }
}
