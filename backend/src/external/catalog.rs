//! Static feature catalogs loaded from CSV
//!
//! Three catalogs back the vector lookups: geological faults, historical
//! fire perimeters and volcanoes. They are read once at startup and queried
//! in memory with haversine distances.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use shared::GeoPoint;
use thiserror::Error;

use super::provider::{FeatureCatalog, FeatureFilter};
use crate::config::CatalogConfig;

/// Catalog loading errors
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to open catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("malformed catalog: {0}")]
    Csv(#[from] csv::Error),

    #[error("catalog {catalog} is missing column '{column}'")]
    MissingColumn {
        catalog: FeatureCatalog,
        column: &'static str,
    },
}

/// A point feature with the attributes the filters need
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub location: GeoPoint,
    /// Burned surface in hectares (fire perimeters)
    pub burned_area: Option<f64>,
    /// Hazard rank (volcanoes)
    pub category: Option<u8>,
}

impl Feature {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            location: GeoPoint {
                latitude,
                longitude,
            },
            burned_area: None,
            category: None,
        }
    }

    fn passes(&self, filter: FeatureFilter) -> bool {
        match filter {
            FeatureFilter::All => true,
            FeatureFilter::BurnedAreaAbove(min) => self.burned_area.is_some_and(|a| a > min),
            FeatureFilter::MinCategory(min) => self.category.is_some_and(|c| c >= min),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum CoordinateFormat {
    Decimal,
    /// Degrees, minutes, seconds and hemisphere, e.g. `33°26'16.0" S`
    Dms,
}

struct CatalogSchema {
    latitude: &'static str,
    longitude: &'static str,
    format: CoordinateFormat,
    burned_area: Option<&'static str>,
    category: Option<&'static str>,
}

fn schema_for(catalog: FeatureCatalog) -> CatalogSchema {
    match catalog {
        FeatureCatalog::Faults => CatalogSchema {
            latitude: "Latitud",
            longitude: "Longitud",
            format: CoordinateFormat::Decimal,
            burned_area: None,
            category: None,
        },
        FeatureCatalog::HistoricalFires => CatalogSchema {
            latitude: "LATITUD",
            longitude: "LONGITUD",
            format: CoordinateFormat::Dms,
            burned_area: Some("SUPERFICIE"),
            category: None,
        },
        FeatureCatalog::Volcanoes => CatalogSchema {
            latitude: "Latitud",
            longitude: "Longitud",
            format: CoordinateFormat::Decimal,
            burned_area: None,
            category: Some("Categoría"),
        },
    }
}

/// In-memory collection of features from one catalog
#[derive(Debug, Clone, Default)]
pub struct FeatureSet {
    features: Vec<Feature>,
}

impl FeatureSet {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    /// Parse a catalog CSV. Rows whose coordinates cannot be read are skipped.
    pub fn from_reader<R: Read>(reader: R, catalog: FeatureCatalog) -> Result<Self, CatalogError> {
        let schema = schema_for(catalog);
        let mut csv = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = csv.headers()?.clone();
        let column = |name: &'static str| {
            column_index(&headers, name).ok_or(CatalogError::MissingColumn {
                catalog,
                column: name,
            })
        };

        let lat_idx = column(schema.latitude)?;
        let lon_idx = column(schema.longitude)?;
        let area_idx = schema.burned_area.map(column).transpose()?;
        let category_idx = schema.category.map(column).transpose()?;

        let mut features = Vec::new();
        let mut skipped = 0usize;

        for record in csv.records() {
            let record = record?;
            let coords = (
                parse_coordinate(record.get(lat_idx), schema.format),
                parse_coordinate(record.get(lon_idx), schema.format),
            );
            let (Some(latitude), Some(longitude)) = coords else {
                skipped += 1;
                continue;
            };

            features.push(Feature {
                location: GeoPoint {
                    latitude,
                    longitude,
                },
                burned_area: area_idx.and_then(|i| parse_number(record.get(i))),
                category: category_idx
                    .and_then(|i| parse_number(record.get(i)))
                    .filter(|c| (0.0..=f64::from(u8::MAX)).contains(c))
                    .map(|c| c.round() as u8),
            });
        }

        if skipped > 0 {
            tracing::debug!(%catalog, skipped, "Skipped catalog rows without usable coordinates");
        }

        Ok(Self { features })
    }

    /// Load a catalog file. A missing file yields an empty catalog.
    pub fn from_path(path: &Path, catalog: FeatureCatalog) -> Result<Self, CatalogError> {
        match File::open(path) {
            Ok(file) => Self::from_reader(file, catalog),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(%catalog, path = %path.display(), "Catalog file not found, using empty catalog");
                Ok(Self::default())
            }
            Err(source) => Err(CatalogError::Io {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Distance in meters to the closest feature, infinite when empty
    pub fn nearest_distance(&self, point: &GeoPoint) -> f64 {
        self.features
            .iter()
            .map(|f| point.distance_to(&f.location))
            .fold(f64::INFINITY, f64::min)
    }

    /// Features within `radius_m` (inclusive) that pass `filter`
    pub fn count_within(&self, point: &GeoPoint, radius_m: f64, filter: FeatureFilter) -> u64 {
        self.features
            .iter()
            .filter(|f| f.passes(filter))
            .filter(|f| point.distance_to(&f.location) <= radius_m)
            .count() as u64
    }
}

/// The three catalogs the engine consults
#[derive(Debug, Clone, Default)]
pub struct CatalogSet {
    pub faults: FeatureSet,
    pub fires: FeatureSet,
    pub volcanoes: FeatureSet,
}

impl CatalogSet {
    pub fn load(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let dir = &config.data_dir;
        let set = Self {
            faults: FeatureSet::from_path(&dir.join(&config.faults_file), FeatureCatalog::Faults)?,
            fires: FeatureSet::from_path(
                &dir.join(&config.fires_file),
                FeatureCatalog::HistoricalFires,
            )?,
            volcanoes: FeatureSet::from_path(
                &dir.join(&config.volcanoes_file),
                FeatureCatalog::Volcanoes,
            )?,
        };

        tracing::info!(
            faults = set.faults.len(),
            fires = set.fires.len(),
            volcanoes = set.volcanoes.len(),
            "Feature catalogs loaded"
        );

        Ok(set)
    }

    pub fn get(&self, catalog: FeatureCatalog) -> &FeatureSet {
        match catalog {
            FeatureCatalog::Faults => &self.faults,
            FeatureCatalog::HistoricalFires => &self.fires,
            FeatureCatalog::Volcanoes => &self.volcanoes,
        }
    }
}

fn column_index(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
}

fn parse_number(raw: Option<&str>) -> Option<f64> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    raw.replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_coordinate(raw: Option<&str>, format: CoordinateFormat) -> Option<f64> {
    match format {
        CoordinateFormat::Decimal => parse_number(raw),
        CoordinateFormat::Dms => raw.and_then(parse_dms),
    }
}

/// Convert a `DD°MM'SS.s" H` coordinate to signed decimal degrees.
///
/// The hemisphere letter is one of N, S, E, W or O (oeste). South and west
/// are negative. Returns `None` for anything that does not match.
pub fn parse_dms(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let (degrees, rest) = raw.split_once('°')?;
    let (minutes, rest) = rest.split_once('\'')?;
    let (seconds, rest) = rest.split_once('"')?;

    // Text after the hemisphere letter is ignored
    let hemisphere = rest.strip_prefix(' ')?.chars().next()?;
    let sign = match hemisphere {
        'N' | 'E' => 1.0,
        'S' | 'O' | 'W' => -1.0,
        _ => return None,
    };

    let is_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    let is_decimal = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit() || c == '.');
    if !is_digits(degrees) || !is_digits(minutes) || !is_decimal(seconds) {
        return None;
    }

    let degrees: f64 = degrees.parse().ok()?;
    let minutes: f64 = minutes.parse().ok()?;
    let seconds: f64 = seconds.parse().ok()?;

    Some(sign * (degrees + minutes / 60.0 + seconds / 3600.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIRES_CSV: &str = "\
 LATITUD , LONGITUD ,SUPERFICIE
\"33°26'16.0\"\" S\",\"70°39'01.0\"\" O\",350.5
\"33°30'00\"\" S\",\"70°40'00\"\" W\",120
bad,\"70°40'00\"\" W\",900
";

    #[test]
    fn test_fire_catalog_parses_dms_and_trims_headers() {
        let set = FeatureSet::from_reader(FIRES_CSV.as_bytes(), FeatureCatalog::HistoricalFires)
            .unwrap();
        assert_eq!(set.len(), 2);

        let santiago = GeoPoint::new(-33.4378, -70.6503).unwrap();
        assert_eq!(
            set.count_within(&santiago, 50_000.0, FeatureFilter::BurnedAreaAbove(200.0)),
            1
        );
        assert_eq!(set.count_within(&santiago, 50_000.0, FeatureFilter::All), 2);
    }

    #[test]
    fn test_missing_column_is_reported() {
        let csv = "lat,lon\n-33.0,-70.0\n";
        let err = FeatureSet::from_reader(csv.as_bytes(), FeatureCatalog::Faults).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::MissingColumn {
                column: "Latitud",
                ..
            }
        ));
    }

    #[test]
    fn test_volcano_category_filter() {
        let csv = "Nombre,Latitud,Longitud,Categoría\nA,-39.42,-71.93,1\nB,-39.50,-71.90,3\nC,-39.60,-71.80,\n";
        let set = FeatureSet::from_reader(csv.as_bytes(), FeatureCatalog::Volcanoes).unwrap();
        let point = GeoPoint::new(-39.45, -71.95).unwrap();

        assert_eq!(set.len(), 3);
        assert_eq!(set.count_within(&point, 100_000.0, FeatureFilter::MinCategory(3)), 1);
    }

    #[test]
    fn test_empty_set_has_infinite_nearest_distance() {
        let set = FeatureSet::default();
        let point = GeoPoint::new(0.0, 0.0).unwrap();
        assert!(set.nearest_distance(&point).is_infinite());
    }

    #[test]
    fn test_missing_file_yields_empty_catalog() {
        let set = FeatureSet::from_path(
            Path::new("definitely/not/here.csv"),
            FeatureCatalog::Volcanoes,
        )
        .unwrap();
        assert!(set.is_empty());
    }
}
