//! Cloud account data model.
//!
//! Accounts are sourced fresh from the billing platform on every run and are
//! never persisted locally.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A cloud account as reported by the billing platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CloudAccount {
    /// Cloud-provider account identifier (the AWS account number).
    pub owner_id: String,
    /// The billing platform's internal record id.
    pub internal_id: String,
    /// Display name.
    pub name: String,
    /// Whether this account aggregates billing for sub-accounts.
    #[serde(default)]
    pub is_consolidated: bool,
    /// Platform health status level (e.g. "green", "red", "unknown").
    #[serde(default)]
    pub status_level: String,
}

impl CloudAccount {
    /// Returns the identity triple used for deduplication and updates.
    pub fn to_ref(&self) -> AccountRef {
        AccountRef {
            owner_id: self.owner_id.clone(),
            internal_id: self.internal_id.clone(),
            name: self.name.clone(),
        }
    }
}

/// The `(owner_id, internal_id, name)` identity of an account.
///
/// Two records with the same triple refer to the same account; a run
/// processes each triple at most once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountRef {
    pub owner_id: String,
    pub internal_id: String,
    pub name: String,
}

impl std::fmt::Display for AccountRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.owner_id, self.name)
    }
}

/// Deduplicates account references, returning them in ascending triple order.
pub fn dedup_refs(refs: impl IntoIterator<Item = AccountRef>) -> Vec<AccountRef> {
    refs.into_iter().collect::<BTreeSet<_>>().into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(owner_id: &str, internal_id: &str, name: &str) -> CloudAccount {
        CloudAccount {
            owner_id: owner_id.to_string(),
            internal_id: internal_id.to_string(),
            name: name.to_string(),
            is_consolidated: false,
            status_level: "green".to_string(),
        }
    }

    #[test]
    fn test_to_ref() {
        let acct = account("111122223333", "42", "prod");
        let r = acct.to_ref();
        assert_eq!(r.owner_id, "111122223333");
        assert_eq!(r.internal_id, "42");
        assert_eq!(r.name, "prod");
    }

    #[test]
    fn test_dedup_removes_repeated_triples() {
        let a = account("111122223333", "1", "prod").to_ref();
        let b = account("444455556666", "2", "staging").to_ref();
        let refs = dedup_refs(vec![a.clone(), b.clone(), a.clone(), b.clone(), a.clone()]);
        assert_eq!(refs.len(), 2);
    }

    #[test]
    fn test_dedup_keeps_distinct_names_for_same_owner() {
        // Same owner id registered twice under different record ids/names
        // counts as two distinct triples.
        let a = account("111122223333", "1", "prod").to_ref();
        let b = account("111122223333", "2", "prod-legacy").to_ref();
        assert_eq!(dedup_refs(vec![a, b]).len(), 2);
    }

    #[test]
    fn test_dedup_order_is_deterministic() {
        let refs = vec![
            account("999", "9", "z").to_ref(),
            account("111", "1", "a").to_ref(),
            account("555", "5", "m").to_ref(),
        ];
        let deduped = dedup_refs(refs);
        assert_eq!(deduped[0].owner_id, "111");
        assert_eq!(deduped[1].owner_id, "555");
        assert_eq!(deduped[2].owner_id, "999");
    }

    #[test]
    fn test_missing_wire_fields_default() {
        let acct: CloudAccount = serde_json::from_str(
            r#"{"owner_id":"111122223333","internal_id":"7","name":"dev"}"#,
        )
        .unwrap();
        assert!(!acct.is_consolidated);
        assert_eq!(acct.status_level, "");
    }
}
