//! fmv-engine: Quality-weighted fair market value for vehicle appraisals
//!
//! This library provides the core components for:
//! - Loss vehicle and comparable listing records with input validation
//! - Quality scoring of each comparable against the loss vehicle
//! - Mileage, equipment and condition price adjustments
//! - Quality-weighted market value with a confidence level
//! - A step-by-step audit trail for report rendering
//! - Pluggable equipment value and distance lookups

pub mod adjustment;
pub mod cli;
pub mod config;
pub mod distance;
pub mod engine;
pub mod equipment;
pub mod market;
pub mod money;
pub mod quality;
pub mod telemetry;
pub mod vehicle;

pub use engine::{AppraisalRequest, ValuationEngine, ValuationError};
pub use market::MarketAnalysis;
