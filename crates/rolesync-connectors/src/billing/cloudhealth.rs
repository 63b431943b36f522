//! CloudHealth billing platform connector.
//!
//! Implements [`AccountService`] over the CloudHealth AWS accounts API:
//! paginated listing via `GET /v1/aws_accounts` and per-account
//! authentication updates via `PUT /v1/aws_accounts/<id>`.

use crate::http::{HttpClient, HttpConfig};
use crate::secure_string::SecureString;
use async_trait::async_trait;
use rolesync_core::{
    AccountRef, AccountService, AccountUpdate, CloudAccount, ServiceError, ServiceHealth,
    ServiceResult,
};
use serde::Deserialize;
use tracing::info;

/// Production CloudHealth API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://chapi.cloudhealthtech.com";

/// CloudHealth connector configuration.
#[derive(Debug, Clone)]
pub struct CloudHealthConfig {
    /// API base URL.
    pub base_url: String,
    /// Bearer token for the `Authorization` header.
    pub api_token: SecureString,
    /// Tenant selector appended to every request as `client_api_id`.
    pub client_api_id: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl CloudHealthConfig {
    pub fn new(api_token: SecureString, client_api_id: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token,
            client_api_id: client_api_id.into(),
            timeout_secs: 30,
        }
    }
}

/// CloudHealth implementation of [`AccountService`].
pub struct CloudHealthConnector {
    client: HttpClient,
    client_api_id: String,
}

impl CloudHealthConnector {
    pub fn new(config: CloudHealthConfig) -> ServiceResult<Self> {
        if config.client_api_id.is_empty() {
            return Err(ServiceError::ConfigError(
                "client_api_id must not be empty".to_string(),
            ));
        }

        let client = HttpClient::new(HttpConfig {
            base_url: config.base_url.clone(),
            auth: crate::http::AuthConfig::BearerToken {
                token: config.api_token.clone(),
            },
            timeout_secs: config.timeout_secs,
        })?;

        info!(base_url = %config.base_url, "CloudHealth connector initialized");

        Ok(Self {
            client,
            client_api_id: config.client_api_id,
        })
    }

    fn list_path(&self, page: u32) -> String {
        format!(
            "/v1/aws_accounts?client_api_id={}&page={}",
            self.client_api_id, page
        )
    }

    fn update_path(&self, internal_id: &str) -> String {
        format!(
            "/v1/aws_accounts/{}?client_api_id={}",
            internal_id, self.client_api_id
        )
    }
}

#[async_trait]
impl AccountService for CloudHealthConnector {
    fn name(&self) -> &str {
        "cloudhealth"
    }

    async fn health_check(&self) -> ServiceResult<ServiceHealth> {
        match self
            .client
            .get_json::<AwsAccountsPage>(&self.list_path(1))
            .await
        {
            Ok(_) => Ok(ServiceHealth::Healthy),
            Err(e @ ServiceError::AuthenticationFailed(_))
            | Err(e @ ServiceError::AuthorizationDenied(_))
            | Err(e @ ServiceError::ConnectionFailed(_))
            | Err(e @ ServiceError::Timeout(_)) => Ok(ServiceHealth::Unhealthy(e.to_string())),
            Err(e) => Ok(ServiceHealth::Degraded(e.to_string())),
        }
    }

    async fn fetch_accounts_page(&self, page: u32) -> ServiceResult<Vec<CloudAccount>> {
        let page_body: AwsAccountsPage = self.client.get_json(&self.list_path(page)).await?;
        Ok(page_body
            .aws_accounts
            .into_iter()
            .map(AwsAccountRecord::into_account)
            .collect())
    }

    async fn update_authentication(
        &self,
        account: &AccountRef,
        update: &AccountUpdate,
    ) -> ServiceResult<serde_json::Value> {
        self.client
            .put_json(&self.update_path(&account.internal_id), update)
            .await
    }
}

// Wire format. Records occasionally omit billing/status blocks; absent
// fields default rather than failing the whole page.

#[derive(Debug, Deserialize)]
struct AwsAccountsPage {
    #[serde(default)]
    aws_accounts: Vec<AwsAccountRecord>,
}

#[derive(Debug, Deserialize)]
struct AwsAccountRecord {
    #[serde(default)]
    owner_id: String,
    id: serde_json::Value,
    #[serde(default)]
    name: String,
    #[serde(default)]
    billing: BillingInfo,
    #[serde(default)]
    status: StatusInfo,
}

#[derive(Debug, Default, Deserialize)]
struct BillingInfo {
    #[serde(default)]
    is_consolidated: bool,
}

#[derive(Debug, Default, Deserialize)]
struct StatusInfo {
    #[serde(default)]
    level: String,
}

impl AwsAccountRecord {
    fn into_account(self) -> CloudAccount {
        // Record ids arrive as JSON numbers; updates address them as path
        // segments, so normalize to a string here.
        let internal_id = match self.id {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };

        CloudAccount {
            owner_id: self.owner_id,
            internal_id,
            name: self.name,
            is_consolidated: self.billing.is_consolidated,
            status_level: self.status.level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connector() -> CloudHealthConnector {
        CloudHealthConnector::new(CloudHealthConfig::new(
            SecureString::from("test-token"),
            "3935",
        ))
        .unwrap()
    }

    #[test]
    fn test_paths_carry_client_api_id() {
        let connector = connector();
        assert_eq!(
            connector.list_path(2),
            "/v1/aws_accounts?client_api_id=3935&page=2"
        );
        assert_eq!(
            connector.update_path("42"),
            "/v1/aws_accounts/42?client_api_id=3935"
        );
    }

    #[test]
    fn test_empty_client_api_id_rejected() {
        let result = CloudHealthConnector::new(CloudHealthConfig::new(
            SecureString::from("test-token"),
            "",
        ));
        assert!(matches!(result, Err(ServiceError::ConfigError(_))));
    }

    #[test]
    fn test_page_parsing() {
        let page: AwsAccountsPage = serde_json::from_str(
            r#"{
                "aws_accounts": [
                    {
                        "owner_id": "111122223333",
                        "id": 42,
                        "name": "prod",
                        "billing": {"is_consolidated": false},
                        "status": {"level": "green"}
                    },
                    {
                        "owner_id": "999988887777",
                        "id": "43",
                        "name": "master",
                        "billing": {"is_consolidated": true}
                    }
                ]
            }"#,
        )
        .unwrap();

        let accounts: Vec<CloudAccount> = page
            .aws_accounts
            .into_iter()
            .map(AwsAccountRecord::into_account)
            .collect();

        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].internal_id, "42");
        assert_eq!(accounts[0].status_level, "green");
        assert!(!accounts[0].is_consolidated);

        // Numeric and string ids both normalize; missing status defaults.
        assert_eq!(accounts[1].internal_id, "43");
        assert!(accounts[1].is_consolidated);
        assert_eq!(accounts[1].status_level, "");
    }

    #[test]
    fn test_missing_accounts_array_is_empty_page() {
        let page: AwsAccountsPage = serde_json::from_str("{}").unwrap();
        assert!(page.aws_accounts.is_empty());
    }
}
