//! Startup configuration validation.

use crate::config::AppConfig;
use colored::Colorize;
use rolesync_core::RoleArnTemplate;

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Critical errors that prevent startup.
    pub errors: Vec<String>,
    /// Warnings that should be addressed but don't prevent startup.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Prints the validation result to the console.
    pub fn print(&self) {
        if !self.warnings.is_empty() {
            println!();
            println!("{}", "Configuration Warnings:".yellow().bold());
            for warning in &self.warnings {
                println!("  {} {}", "⚠".yellow(), warning);
            }
        }

        if !self.errors.is_empty() {
            println!();
            println!("{}", "Configuration Errors:".red().bold());
            for error in &self.errors {
                println!("  {} {}", "✗".red(), error);
            }
        }

        if self.errors.is_empty() && self.warnings.is_empty() {
            println!("  {} Configuration OK", "✓".green());
        }
    }
}

/// Validates application configuration before a run.
pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &AppConfig) -> ValidationResult {
        let mut result = ValidationResult::new();

        Self::validate_credentials(config, &mut result);
        Self::validate_role_settings(config, &mut result);
        Self::validate_endpoint(config, &mut result);
        Self::validate_payer_accounts(config, &mut result);

        result
    }

    fn validate_credentials(config: &AppConfig, result: &mut ValidationResult) {
        if config.api_token.is_empty() {
            result.add_error(
                "API token is not set. Set ROLESYNC_API_TOKEN or add api_token to the config file.",
            );
        }
        if config.client_api_id.is_empty() {
            result.add_error(
                "Client API id is not set. Set ROLESYNC_CLIENT_API_ID or add client_api_id to the config file.",
            );
        }
        if config.external_id.is_empty() {
            result.add_error(
                "External id is not set. Set ROLESYNC_EXTERNAL_ID or add external_id to the config file.",
            );
        }
    }

    fn validate_role_settings(config: &AppConfig, result: &mut ValidationResult) {
        if let Err(e) = RoleArnTemplate::new(config.role_template.clone()) {
            result.add_error(format!("Invalid role template: {}", e));
        }
        if config.role_name.is_empty() {
            result.add_error("Role name must not be empty.");
        }
    }

    fn validate_endpoint(config: &AppConfig, result: &mut ValidationResult) {
        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            result.add_error(format!(
                "Base URL '{}' must start with http:// or https://",
                config.base_url
            ));
        }
        if config.timeout_secs == 0 {
            result.add_error("Request timeout must be greater than zero.");
        }
    }

    fn validate_payer_accounts(config: &AppConfig, result: &mut ValidationResult) {
        if config.payer_accounts.is_empty() {
            result.add_warning(
                "No payer accounts configured (ROLESYNC_PAYER_ACCOUNTS); sync runs will update every selected account.",
            );
        }

        for owner_id in &config.payer_accounts {
            if !owner_id.chars().all(|c| c.is_ascii_digit()) {
                result.add_warning(format!(
                    "Payer account '{}' is not a numeric owner id; it will never match.",
                    owner_id
                ));
            }
        }
    }
}
