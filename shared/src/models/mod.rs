//! Domain models for the GeoRisk engine

mod certificate;
mod climate;
mod config;
mod fire;
mod flood;
mod hazard;
mod indicator;
mod landslide;

pub use certificate::*;
pub use climate::*;
pub use config::*;
pub use fire::*;
pub use flood::*;
pub use hazard::*;
pub use indicator::*;
pub use landslide::*;
