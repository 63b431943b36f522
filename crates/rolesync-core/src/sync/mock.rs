//! Scripted in-memory account service for tests.

use super::error::{ServiceError, ServiceResult};
use super::{AccountService, AccountUpdate, ServiceHealth};
use crate::account::{AccountRef, CloudAccount};
use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::Mutex;

/// An update the mock received, in call order.
#[derive(Debug, Clone)]
pub struct RecordedUpdate {
    pub account: AccountRef,
    pub update: AccountUpdate,
}

/// In-memory [`AccountService`] returning scripted pages and recording
/// updates. Failures can be injected per page and per account.
#[derive(Default)]
pub struct MockAccountService {
    pages: Vec<Vec<CloudAccount>>,
    fail_on_page: Option<u32>,
    failing_accounts: HashSet<String>,
    updates: Mutex<Vec<RecordedUpdate>>,
    fetched: Mutex<u32>,
}

impl MockAccountService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the account pages served by [`AccountService::fetch_accounts_page`].
    /// Pages past the end of the script are empty.
    pub fn with_pages(mut self, pages: Vec<Vec<CloudAccount>>) -> Self {
        self.pages = pages;
        self
    }

    /// Makes fetching the given page (1-based) fail with a connection error.
    pub fn with_page_failure(mut self, page: u32) -> Self {
        self.fail_on_page = Some(page);
        self
    }

    /// Makes updates for the account with this internal id fail.
    pub fn with_update_failure(mut self, internal_id: &str) -> Self {
        self.failing_accounts.insert(internal_id.to_string());
        self
    }

    /// Updates received so far, in call order.
    pub async fn recorded_updates(&self) -> Vec<RecordedUpdate> {
        self.updates.lock().await.clone()
    }

    /// Number of page fetches issued, including the terminating empty one.
    pub async fn pages_fetched(&self) -> u32 {
        *self.fetched.lock().await
    }
}

#[async_trait]
impl AccountService for MockAccountService {
    fn name(&self) -> &str {
        "mock"
    }

    async fn health_check(&self) -> ServiceResult<ServiceHealth> {
        Ok(ServiceHealth::Healthy)
    }

    async fn fetch_accounts_page(&self, page: u32) -> ServiceResult<Vec<CloudAccount>> {
        *self.fetched.lock().await += 1;

        if self.fail_on_page == Some(page) {
            return Err(ServiceError::ConnectionFailed(format!(
                "scripted failure on page {}",
                page
            )));
        }

        Ok(self
            .pages
            .get((page.saturating_sub(1)) as usize)
            .cloned()
            .unwrap_or_default())
    }

    async fn update_authentication(
        &self,
        account: &AccountRef,
        update: &AccountUpdate,
    ) -> ServiceResult<serde_json::Value> {
        if self.failing_accounts.contains(&account.internal_id) {
            return Err(ServiceError::RequestFailed(format!(
                "scripted failure for account {}",
                account.internal_id
            )));
        }

        self.updates.lock().await.push(RecordedUpdate {
            account: account.clone(),
            update: update.clone(),
        });

        Ok(serde_json::json!({ "id": account.internal_id, "name": update.name }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(internal_id: &str) -> CloudAccount {
        CloudAccount {
            owner_id: "111122223333".to_string(),
            internal_id: internal_id.to_string(),
            name: "test".to_string(),
            is_consolidated: false,
            status_level: "green".to_string(),
        }
    }

    #[tokio::test]
    async fn test_pages_past_script_are_empty() {
        let mock = MockAccountService::new().with_pages(vec![vec![account("1")]]);
        assert_eq!(mock.fetch_accounts_page(1).await.unwrap().len(), 1);
        assert!(mock.fetch_accounts_page(2).await.unwrap().is_empty());
        assert!(mock.fetch_accounts_page(99).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_scripted_page_failure() {
        let mock = MockAccountService::new()
            .with_pages(vec![vec![account("1")]])
            .with_page_failure(1);
        assert!(mock.fetch_accounts_page(1).await.is_err());
    }

    #[tokio::test]
    async fn test_updates_recorded() {
        let mock = MockAccountService::new();
        let acct = account("7");
        let update = AccountUpdate {
            name: "test".to_string(),
            authentication: super::super::AssumeRoleAuthentication::new(
                "arn:aws:iam::111122223333:role/Test".to_string(),
                "ext".to_string(),
            ),
        };

        mock.update_authentication(&acct.to_ref(), &update)
            .await
            .unwrap();

        let recorded = mock.recorded_updates().await;
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].account.internal_id, "7");
    }
}
