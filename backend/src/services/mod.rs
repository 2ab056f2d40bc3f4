//! Hazard analyzers and the certificate engine

pub mod climate;
pub mod engine;
pub mod fire;
pub mod flood;
pub mod landslide;
pub mod measurements;

pub use climate::ClimateService;
pub use engine::RiskEngine;
pub use fire::FireService;
pub use flood::FloodService;
pub use landslide::LandslideService;
pub use measurements::{GuardedProvider, ProviderLimits};
