//! Account repository with write-through snapshot persistence.
//!
//! # Responsibility
//! - Own the in-memory account list and the id counter.
//! - Persist the whole state as one JSON blob after every mutation.
//! - Notify subscribers once a change has been persisted.
//!
//! # Invariants
//! - Ids are issued from `next_id` and never reused, even after removal.
//! - Every stored id is `< next_id`.
//! - Memory is mutated first, then the full snapshot is written.
//! - Unknown ids on update/remove leave accounts and counter unchanged.

use crate::model::account::{Account, AccountId, AccountPatch, NewAccount};
use crate::model::validation::ValidationReport;
use crate::store::{KeyValueStore, StoreError};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store key used by the original front-end for the snapshot blob.
pub const DEFAULT_STORAGE_KEY: &str = "accountManagementData";

const FIRST_ACCOUNT_ID: AccountId = 1;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository failure.
#[derive(Debug)]
pub enum RepoError {
    Store(StoreError),
    /// Persisted blob is not a structurally valid snapshot.
    InvalidSnapshot(String),
    Serialize(String),
    /// `next_id` cannot advance past the largest representable id.
    IdsExhausted,
    /// Rejected by a validating caller such as `AccountService`.
    Validation(ValidationReport),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::InvalidSnapshot(message) => write!(f, "invalid persisted snapshot: {message}"),
            Self::Serialize(message) => write!(f, "failed to serialize snapshot: {message}"),
            Self::IdsExhausted => write!(f, "account id space exhausted"),
            Self::Validation(report) => write!(f, "{report}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Validation(report) => Some(report),
            Self::InvalidSnapshot(_) | Self::Serialize(_) | Self::IdsExhausted => None,
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<ValidationReport> for RepoError {
    fn from(value: ValidationReport) -> Self {
        Self::Validation(value)
    }
}

/// Change delivered to subscribers after persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountEvent {
    Loaded,
    Added(AccountId),
    Updated(AccountId),
    Removed(AccountId),
}

/// Handle returned by `subscribe`.
pub type SubscriptionId = u64;

type Observer = Box<dyn FnMut(&AccountEvent, &[Account])>;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotRef<'a> {
    accounts: &'a [Account],
    next_id: AccountId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    accounts: Vec<Account>,
    next_id: AccountId,
}

/// In-memory account list persisted to a key-value store.
pub struct AccountRepository<S: KeyValueStore> {
    store: S,
    storage_key: String,
    accounts: Vec<Account>,
    next_id: AccountId,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: SubscriptionId,
}

impl<S: KeyValueStore> AccountRepository<S> {
    /// Builds a repository over `store` using `DEFAULT_STORAGE_KEY` and
    /// loads any existing snapshot.
    pub fn open(store: S) -> RepoResult<Self> {
        Self::open_with_key(store, DEFAULT_STORAGE_KEY)
    }

    /// Builds a repository that keeps its snapshot under `storage_key`.
    pub fn open_with_key(store: S, storage_key: impl Into<String>) -> RepoResult<Self> {
        let mut repo = Self {
            store,
            storage_key: storage_key.into(),
            accounts: Vec::new(),
            next_id: FIRST_ACCOUNT_ID,
            observers: Vec::new(),
            next_subscription: 1,
        };
        repo.load_from_storage()?;
        Ok(repo)
    }

    /// Replaces in-memory state with the persisted snapshot, if any.
    ///
    /// A missing snapshot keeps current state. A blob that does not parse as
    /// a snapshot is reported and leaves state untouched.
    pub fn load_from_storage(&mut self) -> RepoResult<()> {
        let Some(blob) = self.store.get(&self.storage_key)? else {
            debug!(
                "event=snapshot_load module=repo status=empty key={}",
                self.storage_key
            );
            return Ok(());
        };

        let snapshot: Snapshot = serde_json::from_str(&blob).map_err(|err| {
            warn!(
                "event=snapshot_load module=repo status=error key={} error_code=invalid_snapshot",
                self.storage_key
            );
            RepoError::InvalidSnapshot(err.to_string())
        })?;

        let mut next_id = snapshot.next_id;
        let max_id = snapshot.accounts.iter().map(|account| account.id).max();
        if let Some(max_id) = max_id.filter(|max_id| *max_id >= next_id) {
            let repaired = max_id.checked_add(1).ok_or_else(|| {
                warn!(
                    "event=snapshot_load module=repo status=error key={} error_code=id_space_exhausted",
                    self.storage_key
                );
                RepoError::InvalidSnapshot(format!(
                    "account id {max_id} leaves no room for nextId"
                ))
            })?;
            warn!(
                "event=snapshot_load module=repo status=repaired stored_next_id={next_id} next_id={repaired}"
            );
            next_id = repaired;
        }

        self.accounts = snapshot.accounts;
        self.next_id = next_id;

        info!(
            "event=snapshot_load module=repo status=ok accounts={} next_id={}",
            self.accounts.len(),
            self.next_id
        );
        self.notify(AccountEvent::Loaded);
        Ok(())
    }

    /// Writes `{accounts, nextId}` under the storage key, overwriting it.
    pub fn save_to_storage(&mut self) -> RepoResult<()> {
        let blob = serde_json::to_string(&SnapshotRef {
            accounts: &self.accounts,
            next_id: self.next_id,
        })
        .map_err(|err| RepoError::Serialize(err.to_string()))?;

        self.store.set(&self.storage_key, &blob)?;
        debug!(
            "event=snapshot_save module=repo status=ok accounts={} bytes={}",
            self.accounts.len(),
            blob.len()
        );
        Ok(())
    }

    /// Appends a record with the next id and persists.
    ///
    /// No validation or duplicate-login check happens here. Fails with
    /// `RepoError::IdsExhausted`, leaving state unchanged, once the counter
    /// is at `AccountId::MAX`.
    pub fn add_account(&mut self, data: NewAccount) -> RepoResult<Account> {
        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(RepoError::IdsExhausted)?;

        let account = data.into_account(id);
        self.accounts.push(account.clone());
        self.save_to_storage()?;

        info!(
            "event=account_add module=repo status=ok account_id={id} total={}",
            self.accounts.len()
        );
        self.notify(AccountEvent::Added(id));
        Ok(account)
    }

    /// Merges `patch` over the record with `id` and persists.
    ///
    /// Returns `Ok(false)` without persisting when `id` is unknown.
    pub fn update_account(&mut self, id: AccountId, patch: &AccountPatch) -> RepoResult<bool> {
        let Some(account) = self.accounts.iter_mut().find(|account| account.id == id) else {
            debug!("event=account_update module=repo status=skipped account_id={id} reason=not_found");
            return Ok(false);
        };

        account.apply(patch);
        self.save_to_storage()?;

        info!("event=account_update module=repo status=ok account_id={id}");
        self.notify(AccountEvent::Updated(id));
        Ok(true)
    }

    /// Drops every record with `id` and persists.
    ///
    /// Returns whether anything was removed.
    pub fn remove_account(&mut self, id: AccountId) -> RepoResult<bool> {
        let before = self.accounts.len();
        self.accounts.retain(|account| account.id != id);
        let removed = self.accounts.len() != before;

        self.save_to_storage()?;

        if removed {
            info!(
                "event=account_remove module=repo status=ok account_id={id} total={}",
                self.accounts.len()
            );
            self.notify(AccountEvent::Removed(id));
        } else {
            debug!("event=account_remove module=repo status=skipped account_id={id} reason=not_found");
        }
        Ok(removed)
    }

    /// Registers `observer`, called after each persisted change and load.
    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&AccountEvent, &[Account]) + 'static,
    ) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns whether the subscription existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(subscription, _)| *subscription != id);
        self.observers.len() != before
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn get(&self, id: AccountId) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == id)
    }

    /// Id the next `add_account` call will assign.
    pub fn next_id(&self) -> AccountId {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn notify(&mut self, event: AccountEvent) {
        for (_, observer) in &mut self.observers {
            observer(&event, &self.accounts);
        }
    }
}
