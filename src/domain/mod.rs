//! Core domain types and logic.

pub mod config_validation;
pub mod error;
pub mod indicator;
pub mod policy;
pub mod price_series;
pub mod profile;
pub mod simulation;
pub mod snapshot;
pub mod threshold;
pub mod window;
