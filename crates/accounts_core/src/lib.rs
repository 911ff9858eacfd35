//! Core account storage logic.
//! This crate owns the account list, its validation rules and its
//! write-through persistence to a key-value store.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use model::account::{
    Account, AccountDraft, AccountId, AccountPatch, AccountType, Label, NewAccount,
};
pub use model::labels::{format_labels, parse_labels};
pub use model::validation::{
    validate_account, AccountField, FieldError, ValidationReport, MAX_FIELD_CHARS,
};
pub use repo::account_repo::{
    AccountEvent, AccountRepository, RepoError, RepoResult, SubscriptionId, DEFAULT_STORAGE_KEY,
};
pub use service::account_service::AccountService;
pub use store::{KeyValueStore, MemoryStore, SqliteStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
