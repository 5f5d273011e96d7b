//! Port traits the domain talks to.

pub mod chart_port;
pub mod config_port;
pub mod data_port;
