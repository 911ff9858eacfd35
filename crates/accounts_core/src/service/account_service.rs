//! Account use-case service.
//!
//! # Responsibility
//! - Provide validated create/update entry points for form-driven callers.
//! - Translate label strings to and from the stored label list.
//!
//! # Invariants
//! - Invalid input never reaches the repository; state stays unchanged.
//! - Unknown ids keep repository no-op semantics.

use crate::model::account::{
    Account, AccountDraft, AccountId, AccountPatch, AccountType, NewAccount,
};
use crate::model::labels::{format_labels, parse_labels};
use crate::model::validation::validate_account;
use crate::repo::account_repo::{AccountRepository, RepoError, RepoResult};
use crate::store::KeyValueStore;
use log::info;

/// Use-case wrapper around an `AccountRepository`.
pub struct AccountService<S: KeyValueStore> {
    repo: AccountRepository<S>,
}

impl<S: KeyValueStore> AccountService<S> {
    pub fn new(repo: AccountRepository<S>) -> Self {
        Self { repo }
    }

    /// Validates `account` and creates it.
    ///
    /// Returns `RepoError::Validation` with every failing field when invalid.
    pub fn create_account(&mut self, account: NewAccount) -> RepoResult<Account> {
        let report = validate_account(&AccountDraft::from(&account));
        if !report.is_valid() {
            info!(
                "event=account_add module=service status=rejected fields={}",
                report.errors.len()
            );
            return Err(RepoError::Validation(report));
        }
        self.repo.add_account(account)
    }

    /// Creates an account from form-style inputs, parsing `labels_text`.
    pub fn create_with_labels(
        &mut self,
        kind: AccountType,
        login: impl Into<String>,
        password: Option<String>,
        labels_text: &str,
    ) -> RepoResult<Account> {
        self.create_account(NewAccount {
            labels: parse_labels(labels_text),
            kind,
            login: login.into(),
            password,
        })
    }

    /// Validates the merged record, then applies `patch`.
    ///
    /// Returns `Ok(false)` when `id` is unknown.
    pub fn update_account(&mut self, id: AccountId, patch: &AccountPatch) -> RepoResult<bool> {
        let Some(current) = self.repo.get(id) else {
            return Ok(false);
        };

        let mut merged = current.clone();
        merged.apply(patch);
        let report = validate_account(&AccountDraft::from(&merged));
        if !report.is_valid() {
            info!(
                "event=account_update module=service status=rejected account_id={id} fields={}",
                report.errors.len()
            );
            return Err(RepoError::Validation(report));
        }

        self.repo.update_account(id, patch)
    }

    /// Replaces the labels of `id` with those parsed from `labels_text`.
    pub fn relabel(&mut self, id: AccountId, labels_text: &str) -> RepoResult<bool> {
        self.repo
            .update_account(id, &AccountPatch::labels(parse_labels(labels_text)))
    }

    /// Returns the formatted label string of `id`, if it exists.
    pub fn labels_text(&self, id: AccountId) -> Option<String> {
        self.repo.get(id).map(|account| format_labels(&account.labels))
    }

    pub fn remove_account(&mut self, id: AccountId) -> RepoResult<bool> {
        self.repo.remove_account(id)
    }

    pub fn accounts(&self) -> &[Account] {
        self.repo.accounts()
    }

    pub fn repository(&self) -> &AccountRepository<S> {
        &self.repo
    }

    pub fn into_repository(self) -> AccountRepository<S> {
        self.repo
    }
}
