//! HTTP handlers

pub mod health;
pub mod risk;

pub use health::health_check;
pub use risk::analyze_risk;
