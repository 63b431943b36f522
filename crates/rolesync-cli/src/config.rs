//! Configuration loading for the rolesync CLI.
//!
//! Configuration comes from an optional YAML file plus `ROLESYNC_*`
//! environment variables; an environment variable always overrides the file
//! value. Required fields are enforced by the validator at startup.

use anyhow::{Context, Result};
use rolesync_connectors::DEFAULT_BASE_URL;
use rolesync_core::DEFAULT_ROLE_TEMPLATE;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Role name assigned in sync modes unless overridden.
pub const DEFAULT_ROLE_NAME: &str = "CLDZE-CloudHealth_Role";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Bearer token for the billing platform API.
    #[serde(default)]
    pub api_token: String,

    /// Tenant selector sent as `client_api_id` on every request.
    #[serde(default)]
    pub client_api_id: String,

    /// Assume-role external id attached to every role assignment.
    #[serde(default)]
    pub external_id: String,

    /// Owner ids of payer accounts excluded from sync-mode updates.
    #[serde(default)]
    pub payer_accounts: Vec<String>,

    /// ARN template with `{owner_id}` and `{role_name}` placeholders.
    #[serde(default = "default_role_template")]
    pub role_template: String,

    /// Role name assigned in sync modes.
    #[serde(default = "default_role_name")]
    pub role_name: String,

    /// Billing platform API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_role_template() -> String {
    DEFAULT_ROLE_TEMPLATE.to_string()
}

fn default_role_name() -> String {
    DEFAULT_ROLE_NAME.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            client_api_id: String::new(),
            external_id: String::new(),
            payer_accounts: Vec::new(),
            role_template: default_role_template(),
            role_name: default_role_name(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from an optional file, then applies environment
    /// overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                serde_yaml::from_str(&contents)
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))?
            }
            None => Self::default(),
        };

        config.apply_env();
        Ok(config)
    }

    /// Overrides fields from `ROLESYNC_*` environment variables.
    fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("ROLESYNC_API_TOKEN") {
            self.api_token = v;
        }
        if let Ok(v) = std::env::var("ROLESYNC_CLIENT_API_ID") {
            self.client_api_id = v;
        }
        if let Ok(v) = std::env::var("ROLESYNC_EXTERNAL_ID") {
            self.external_id = v;
        }
        if let Ok(v) = std::env::var("ROLESYNC_PAYER_ACCOUNTS") {
            self.payer_accounts = parse_payer_list(&v);
        }
        if let Ok(v) = std::env::var("ROLESYNC_ROLE_TEMPLATE") {
            self.role_template = v;
        }
        if let Ok(v) = std::env::var("ROLESYNC_ROLE_NAME") {
            self.role_name = v;
        }
        if let Ok(v) = std::env::var("ROLESYNC_BASE_URL") {
            self.base_url = v;
        }
    }

    /// Creates a copy with secrets redacted.
    pub fn redact_secrets(&self) -> Self {
        let mut config = self.clone();
        if !config.api_token.is_empty() {
            config.api_token = "***REDACTED***".to_string();
        }
        if !config.external_id.is_empty() {
            config.external_id = "***REDACTED***".to_string();
        }
        config
    }
}

/// Parses a comma-separated owner id list, trimming whitespace and dropping
/// empty entries.
pub fn parse_payer_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.role_template, DEFAULT_ROLE_TEMPLATE);
        assert_eq!(config.role_name, DEFAULT_ROLE_NAME);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
        assert!(config.payer_accounts.is_empty());
    }

    #[test]
    fn test_parse_payer_list() {
        assert_eq!(
            parse_payer_list("155261140164,569250234225"),
            vec!["155261140164", "569250234225"]
        );
        assert_eq!(
            parse_payer_list(" 155261140164 , ,569250234225, "),
            vec!["155261140164", "569250234225"]
        );
        assert!(parse_payer_list("").is_empty());
        assert!(parse_payer_list(" , ").is_empty());
    }

    #[test]
    fn test_redact_secrets() {
        let config = AppConfig {
            api_token: "secret-token".to_string(),
            external_id: "secret-external".to_string(),
            client_api_id: "3935".to_string(),
            ..AppConfig::default()
        };

        let redacted = config.redact_secrets();
        assert_eq!(redacted.api_token, "***REDACTED***");
        assert_eq!(redacted.external_id, "***REDACTED***");
        assert_eq!(redacted.client_api_id, "3935");
    }

    #[test]
    fn test_redact_leaves_empty_fields_empty() {
        let redacted = AppConfig::default().redact_secrets();
        assert!(redacted.api_token.is_empty());
        assert!(redacted.external_id.is_empty());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
api_token: tok
client_api_id: "3935"
external_id: ext
payer_accounts:
  - "155261140164"
role_name: Custom_Role
"#;

        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.api_token, "tok");
        assert_eq!(config.client_api_id, "3935");
        assert_eq!(config.payer_accounts, vec!["155261140164"]);
        assert_eq!(config.role_name, "Custom_Role");
        // Unspecified fields keep their defaults.
        assert_eq!(config.role_template, DEFAULT_ROLE_TEMPLATE);
    }
}
