//! # rolesync-core
//!
//! Domain model and synchronization engine for rolesync.
//!
//! This crate provides the cloud account data model, selection predicates,
//! role ARN rendering, and the two-phase list/update engine that drives a
//! synchronization run. Remote access goes through the [`sync::AccountService`]
//! trait so the engine can be exercised against a mock in tests.

pub mod account;
pub mod arn;
pub mod mode;
pub mod report;
pub mod sync;

pub use account::{AccountRef, CloudAccount};
pub use arn::{ArnTemplateError, RoleArnTemplate, DEFAULT_ROLE_TEMPLATE};
pub use mode::{SyncMode, DEREGISTER_ROLE_NAME};
pub use report::{AccountOutcome, AccountResult, SyncReport};
pub use sync::{
    AccountService, AccountUpdate, AssumeRoleAuthentication, MockAccountService, ServiceError,
    ServiceHealth, ServiceResult, UpdateOptions,
};
