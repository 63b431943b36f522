//! Two-phase synchronization engine: list, then update.
//!
//! The engine talks to the billing platform through the [`AccountService`]
//! trait. A run is stateless: the lister walks the paginated account list and
//! applies the active mode's predicate, then the updater pushes an
//! assume-role authentication block to each selected account.
//!
//! Failure handling is asymmetric. A listing error aborts the whole fetch
//! (no partial pages survive), while an update error only skips the one
//! account and the loop carries on.

pub mod error;
pub mod mock;

pub use error::{ServiceError, ServiceResult};
pub use mock::MockAccountService;

use crate::account::{dedup_refs, AccountRef};
use crate::arn::RoleArnTemplate;
use crate::mode::SyncMode;
use crate::report::{AccountOutcome, SyncReport};
use crate::CloudAccount;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, error, info};

/// Authentication protocol pushed to every account.
const ASSUME_ROLE_PROTOCOL: &str = "assume_role";

/// Health of the remote account service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ServiceHealth {
    Healthy,
    Degraded(String),
    Unhealthy(String),
}

/// Assume-role authentication block sent in update payloads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssumeRoleAuthentication {
    pub protocol: String,
    pub assume_role_arn: String,
    pub assume_role_external_id: String,
}

impl AssumeRoleAuthentication {
    pub fn new(assume_role_arn: String, external_id: String) -> Self {
        Self {
            protocol: ASSUME_ROLE_PROTOCOL.to_string(),
            assume_role_arn,
            assume_role_external_id: external_id,
        }
    }
}

/// Update request body for a single account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountUpdate {
    pub name: String,
    pub authentication: AssumeRoleAuthentication,
}

/// Remote account listing and update operations.
///
/// Implementations must be `Send + Sync` so the service can be shared behind
/// `Arc<dyn AccountService>`. See [`MockAccountService`] for a scripted
/// implementation used in tests.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Identifier used in logs.
    fn name(&self) -> &str;

    /// Probes the remote API.
    async fn health_check(&self) -> ServiceResult<ServiceHealth>;

    /// Fetches one page of the account list. Pages start at 1; an empty
    /// page signals the end of pagination.
    async fn fetch_accounts_page(&self, page: u32) -> ServiceResult<Vec<CloudAccount>>;

    /// Pushes an updated authentication block to one account and returns the
    /// platform's JSON response body.
    async fn update_authentication(
        &self,
        account: &AccountRef,
        update: &AccountUpdate,
    ) -> ServiceResult<serde_json::Value>;
}

/// Options for the update phase, built once at startup from configuration.
#[derive(Debug, Clone)]
pub struct UpdateOptions {
    /// Owner ids of designated payer accounts.
    pub payer_accounts: HashSet<String>,
    /// Shared assume-role external id.
    pub external_id: String,
    /// ARN template with `{owner_id}` and `{role_name}` placeholders.
    pub template: RoleArnTemplate,
    /// Role name used in sync modes. De-register mode overrides it.
    pub role_name: String,
}

/// Lists all accounts selected by `mode`, deduplicated and ordered.
///
/// Walks pages 1, 2, ... until the service returns an empty page. Any error
/// aborts the fetch; no partial result is returned.
pub async fn list_accounts(
    service: &dyn AccountService,
    mode: SyncMode,
) -> ServiceResult<Vec<AccountRef>> {
    let mut selected = Vec::new();
    let mut page = 1u32;

    loop {
        let records = service.fetch_accounts_page(page).await.map_err(|e| {
            error!(
                service = service.name(),
                page,
                kind = e.kind(),
                "account listing aborted: {}",
                e
            );
            e
        })?;

        if records.is_empty() {
            break;
        }

        debug!(service = service.name(), page, count = records.len(), "fetched page");
        selected.extend(records.iter().filter(|a| mode.selects(a)).map(|a| a.to_ref()));
        page += 1;
    }

    let refs = dedup_refs(selected);
    info!(
        service = service.name(),
        mode = %mode,
        pages = page - 1,
        selected = refs.len(),
        "account listing complete"
    );
    Ok(refs)
}

/// Pushes a role assignment to each account and reports the outcome.
///
/// Payer accounts are skipped unless the mode de-registers. Update failures
/// are recorded and the loop continues; accounts are fully independent.
pub async fn apply_role_assignments(
    service: &dyn AccountService,
    mode: SyncMode,
    options: &UpdateOptions,
    accounts: &[AccountRef],
) -> SyncReport {
    let mut report = SyncReport::new(mode, accounts.len());
    let role_name = mode.role_name(&options.role_name);

    for account in accounts {
        if !mode.includes_payers() && options.payer_accounts.contains(&account.owner_id) {
            info!(owner_id = %account.owner_id, "skipping payer account");
            report.record(account.clone(), AccountOutcome::SkippedPayer);
            continue;
        }

        let arn = options.template.render(&account.owner_id, role_name);
        let update = AccountUpdate {
            name: account.name.clone(),
            authentication: AssumeRoleAuthentication::new(arn, options.external_id.clone()),
        };

        match service.update_authentication(account, &update).await {
            Ok(body) => {
                info!(owner_id = %account.owner_id, role = role_name, "account configured");
                debug!(owner_id = %account.owner_id, response = %body, "update response");
                report.record(account.clone(), AccountOutcome::Updated);
            }
            Err(e) => {
                error!(
                    owner_id = %account.owner_id,
                    kind = e.kind(),
                    "failed to assign role: {}",
                    e
                );
                report.record(
                    account.clone(),
                    AccountOutcome::Failed {
                        reason: e.to_string(),
                    },
                );
            }
        }
    }

    info!(
        mode = %mode,
        updated = report.updated(),
        skipped = report.skipped(),
        failed = report.failed(),
        "update phase complete"
    );
    report
}
