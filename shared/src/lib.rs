//! Shared types and scoring rules for the GeoRisk certificate engine
//!
//! This crate holds everything that is pure computation: value types,
//! per-hazard rule functions, the penalty aggregator and the certificate
//! assembler. It is used by the backend server and by the WASM module.

pub mod aggregation;
pub mod models;
pub mod types;
pub mod validation;

pub use aggregation::*;
pub use models::*;
pub use types::*;
pub use validation::*;
