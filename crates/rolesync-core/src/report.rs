//! Per-run synchronization report.

use crate::account::AccountRef;
use crate::mode::SyncMode;
use serde::{Deserialize, Serialize};

/// What happened to a single account during the update phase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AccountOutcome {
    /// The authentication block was updated.
    Updated,
    /// The account is a designated payer and the mode leaves payers alone.
    SkippedPayer,
    /// The update request failed; the run continued with the next account.
    Failed { reason: String },
}

/// Outcome for one account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountResult {
    pub account: AccountRef,
    #[serde(flatten)]
    pub outcome: AccountOutcome,
}

/// Summary of a synchronization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    /// The selection mode the run was invoked with.
    pub mode: SyncMode,
    /// How many account references the lister selected.
    pub listed: usize,
    /// Per-account results, in processing order.
    pub results: Vec<AccountResult>,
}

impl SyncReport {
    pub fn new(mode: SyncMode, listed: usize) -> Self {
        Self {
            mode,
            listed,
            results: Vec::new(),
        }
    }

    pub fn record(&mut self, account: AccountRef, outcome: AccountOutcome) {
        self.results.push(AccountResult { account, outcome });
    }

    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, AccountOutcome::Updated))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, AccountOutcome::SkippedPayer))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, AccountOutcome::Failed { .. }))
    }

    fn count(&self, predicate: impl Fn(&AccountOutcome) -> bool) -> usize {
        self.results.iter().filter(|r| predicate(&r.outcome)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account_ref(owner_id: &str) -> AccountRef {
        AccountRef {
            owner_id: owner_id.to_string(),
            internal_id: "1".to_string(),
            name: "test".to_string(),
        }
    }

    #[test]
    fn test_counts() {
        let mut report = SyncReport::new(SyncMode::All, 3);
        report.record(account_ref("1"), AccountOutcome::Updated);
        report.record(account_ref("2"), AccountOutcome::SkippedPayer);
        report.record(
            account_ref("3"),
            AccountOutcome::Failed {
                reason: "timeout".to_string(),
            },
        );

        assert_eq!(report.updated(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.listed, 3);
    }

    #[test]
    fn test_report_serializes_outcome_tags() {
        let mut report = SyncReport::new(SyncMode::Deregister, 1);
        report.record(account_ref("1"), AccountOutcome::Updated);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["mode"], "deregister");
        assert_eq!(json["results"][0]["outcome"], "updated");
    }
}
