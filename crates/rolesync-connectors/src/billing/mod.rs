//! Billing platform connectors.

pub mod cloudhealth;

pub use cloudhealth::{CloudHealthConfig, CloudHealthConnector, DEFAULT_BASE_URL};
