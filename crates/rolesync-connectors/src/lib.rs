//! # rolesync-connectors
//!
//! Billing platform connectors for rolesync.
//!
//! Provides the bearer-authenticated HTTP plumbing and the CloudHealth
//! implementation of [`rolesync_core::AccountService`].

pub mod billing;
pub mod http;
pub mod secure_string;

pub use billing::{CloudHealthConfig, CloudHealthConnector, DEFAULT_BASE_URL};
pub use http::{AuthConfig, HttpClient, HttpConfig};
pub use secure_string::SecureString;
