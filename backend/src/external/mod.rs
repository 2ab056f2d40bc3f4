//! External collaborators: the geospatial measurement backend and the
//! static feature catalogs

pub mod catalog;
pub mod geospatial;
pub mod provider;

pub use catalog::{CatalogError, CatalogSet, Feature, FeatureSet};
pub use geospatial::GeospatialClient;
pub use provider::{
    Band, FeatureCatalog, FeatureFilter, MeasurementProvider, MeasurementQuery, Measurements,
    ProviderError,
};
