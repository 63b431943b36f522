//! Selection modes and their account predicates.

use crate::account::CloudAccount;
use serde::{Deserialize, Serialize};

/// Status levels considered unhealthy by the [`SyncMode::Unhealthy`] predicate.
/// Matching is case-insensitive; any other level is silently excluded.
const UNHEALTHY_STATUS_LEVELS: &[&str] = &["unknown", "red"];

/// Role name pushed to accounts when de-registering.
pub const DEREGISTER_ROLE_NAME: &str = "CLDZE-Deregister_Role";

/// Which accounts a run selects and how it treats payer accounts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Every non-consolidated account.
    All,
    /// Non-consolidated accounts whose status level is unknown or red.
    Unhealthy,
    /// Every account, payers included, assigned the de-register role.
    Deregister,
}

impl SyncMode {
    /// Returns whether `account` is selected under this mode.
    pub fn selects(&self, account: &CloudAccount) -> bool {
        match self {
            SyncMode::Deregister => true,
            SyncMode::All => !account.is_consolidated,
            SyncMode::Unhealthy => {
                !account.is_consolidated
                    && UNHEALTHY_STATUS_LEVELS
                        .contains(&account.status_level.to_lowercase().as_str())
            }
        }
    }

    /// Whether payer accounts are updated rather than skipped.
    pub fn includes_payers(&self) -> bool {
        matches!(self, SyncMode::Deregister)
    }

    /// Picks the role name for this mode: the configured default for sync
    /// modes, the fixed de-register role otherwise.
    pub fn role_name<'a>(&self, configured: &'a str) -> &'a str {
        match self {
            SyncMode::Deregister => DEREGISTER_ROLE_NAME,
            _ => configured,
        }
    }
}

impl std::fmt::Display for SyncMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SyncMode::All => "all",
            SyncMode::Unhealthy => "unhealthy",
            SyncMode::Deregister => "deregister",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(is_consolidated: bool, status_level: &str) -> CloudAccount {
        CloudAccount {
            owner_id: "111122223333".to_string(),
            internal_id: "1".to_string(),
            name: "test".to_string(),
            is_consolidated,
            status_level: status_level.to_string(),
        }
    }

    #[test]
    fn test_consolidated_excluded_in_sync_modes() {
        let acct = account(true, "red");
        assert!(!SyncMode::All.selects(&acct));
        assert!(!SyncMode::Unhealthy.selects(&acct));
    }

    #[test]
    fn test_deregister_selects_everything() {
        assert!(SyncMode::Deregister.selects(&account(true, "green")));
        assert!(SyncMode::Deregister.selects(&account(false, "red")));
        assert!(SyncMode::Deregister.selects(&account(false, "")));
    }

    #[test]
    fn test_red_account_selected_by_both_sync_modes() {
        // Status matching is case-insensitive.
        for level in ["red", "RED", "Red"] {
            let acct = account(false, level);
            assert!(SyncMode::All.selects(&acct), "level {}", level);
            assert!(SyncMode::Unhealthy.selects(&acct), "level {}", level);
        }
    }

    #[test]
    fn test_unknown_status_selected_by_unhealthy() {
        assert!(SyncMode::Unhealthy.selects(&account(false, "Unknown")));
    }

    #[test]
    fn test_green_account_excluded_only_by_unhealthy() {
        let acct = account(false, "green");
        assert!(SyncMode::All.selects(&acct));
        assert!(!SyncMode::Unhealthy.selects(&acct));
    }

    #[test]
    fn test_unmatched_status_excluded_not_error() {
        assert!(!SyncMode::Unhealthy.selects(&account(false, "yellow")));
        assert!(!SyncMode::Unhealthy.selects(&account(false, "")));
    }

    #[test]
    fn test_payer_handling() {
        assert!(!SyncMode::All.includes_payers());
        assert!(!SyncMode::Unhealthy.includes_payers());
        assert!(SyncMode::Deregister.includes_payers());
    }

    #[test]
    fn test_role_name_selection() {
        assert_eq!(SyncMode::All.role_name("Custom_Role"), "Custom_Role");
        assert_eq!(SyncMode::Unhealthy.role_name("Custom_Role"), "Custom_Role");
        assert_eq!(
            SyncMode::Deregister.role_name("Custom_Role"),
            DEREGISTER_ROLE_NAME
        );
    }
}
