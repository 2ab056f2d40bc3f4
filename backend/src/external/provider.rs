//! Measurement provider contract
//!
//! Analyzers never talk to a concrete backend. They depend on
//! [`MeasurementProvider`], which the HTTP client implements for production
//! and the test suites implement with canned values.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::{GeoPoint, YearlyStats};
use thiserror::Error;

/// Raster bands the engine reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    /// Terrain slope in degrees (USGS SRTM)
    Slope,
    /// Elevation in meters (USGS SRTM)
    Elevation,
    /// Maximum daily precipitation over the analysis year, mm (CHIRPS)
    MaxPrecipitation,
    /// ESA WorldCover class code
    LandCover,
    /// Surface-water occurrence percentage (JRC)
    WaterOccurrence,
    /// Median NDVI over the dry-season window Dec of the prior year to Feb (Sentinel-2)
    Ndvi,
    /// Daytime land-surface temperature, °C (MODIS)
    SurfaceTemperatureDay,
    /// Nighttime land-surface temperature, °C (MODIS)
    SurfaceTemperatureNight,
}

impl Band {
    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Slope => "slope",
            Band::Elevation => "elevation",
            Band::MaxPrecipitation => "max_precipitation",
            Band::LandCover => "land_cover",
            Band::WaterOccurrence => "water_occurrence",
            Band::Ndvi => "ndvi",
            Band::SurfaceTemperatureDay => "surface_temperature_day",
            Band::SurfaceTemperatureNight => "surface_temperature_night",
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point or buffered-point reduction request
#[derive(Debug, Clone, Serialize)]
pub struct MeasurementQuery {
    pub point: GeoPoint,
    /// Zero for a point sample
    pub buffer_radius_m: f64,
    pub scale_m: f64,
    pub year: i32,
    pub bands: Vec<Band>,
}

impl MeasurementQuery {
    pub fn at_point(point: GeoPoint, year: i32, scale_m: f64, bands: &[Band]) -> Self {
        Self {
            point,
            buffer_radius_m: 0.0,
            scale_m,
            year,
            bands: bands.to_vec(),
        }
    }
}

/// Band values returned by a reduction. A band that is absent or null has no
/// data at the point.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Measurements(HashMap<Band, Option<f64>>);

impl Measurements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, band: Band, value: Option<f64>) -> Self {
        self.0.insert(band, value);
        self
    }

    pub fn get(&self, band: Band) -> Option<f64> {
        self.0.get(&band).copied().flatten().filter(|v| v.is_finite())
    }
}

impl FromIterator<(Band, Option<f64>)> for Measurements {
    fn from_iter<I: IntoIterator<Item = (Band, Option<f64>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Vector feature collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureCatalog {
    Faults,
    HistoricalFires,
    Volcanoes,
}

impl std::fmt::Display for FeatureCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FeatureCatalog::Faults => "faults",
            FeatureCatalog::HistoricalFires => "historical_fires",
            FeatureCatalog::Volcanoes => "volcanoes",
        };
        f.write_str(name)
    }
}

/// Attribute filter applied when counting features
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FeatureFilter {
    #[default]
    All,
    /// Burned surface strictly greater than the given hectares
    BurnedAreaAbove(f64),
    /// Hazard category at or above the given rank
    MinCategory(u8),
}

/// Provider failures. Analyzers turn these into degraded hazard results.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("provider call timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("provider returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to decode provider response: {0}")]
    Decode(String),

    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// Source of remote-sensing measurements and feature lookups
#[async_trait]
pub trait MeasurementProvider: Send + Sync {
    /// Reduce the requested bands at a point or over a buffer
    async fn reduce(&self, query: &MeasurementQuery) -> Result<Measurements, ProviderError>;

    /// Distance in meters to the nearest feature, infinite when the catalog is empty
    async fn nearest_feature_distance(
        &self,
        point: &GeoPoint,
        catalog: FeatureCatalog,
    ) -> Result<f64, ProviderError>;

    /// Number of features within `radius_m` passing `filter`
    async fn count_features_within(
        &self,
        point: &GeoPoint,
        radius_m: f64,
        catalog: FeatureCatalog,
        filter: FeatureFilter,
    ) -> Result<u64, ProviderError>;

    /// Min, max and mean of a band over a buffer for one calendar year
    async fn yearly_aggregate(
        &self,
        point: &GeoPoint,
        radius_m: f64,
        band: Band,
        year: i32,
    ) -> Result<YearlyStats, ProviderError>;

    /// Raw pixel samples of a band over a buffer for one calendar year
    async fn band_samples(
        &self,
        point: &GeoPoint,
        radius_m: f64,
        band: Band,
        year: i32,
    ) -> Result<Vec<Option<f64>>, ProviderError>;
}
