//! Account domain model.
//!
//! # Responsibility
//! - Define the canonical credential record and its partial shapes.
//! - Fix the snapshot wire naming (`type`, `LDAP`/`Local`).
//!
//! # Invariants
//! - `id` is assigned by the repository, never by callers.
//! - `labels` keep caller order; duplicates are allowed.
//! - `password` is only meaningful for `AccountType::Local`.

use serde::{Deserialize, Serialize};

/// Repository-assigned numeric identifier.
pub type AccountId = u64;

/// Authentication backend of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    /// Directory-backed login; no local password is stored.
    #[serde(rename = "LDAP")]
    Ldap,
    /// Locally stored credentials; password required.
    #[serde(rename = "Local", alias = "Локальная")]
    Local,
}

impl AccountType {
    /// Wire name used in snapshots and CLI input.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ldap => "LDAP",
            Self::Local => "Local",
        }
    }

    /// Parses a wire name, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("ldap") {
            Some(Self::Ldap)
        } else if trimmed.eq_ignore_ascii_case("local") || trimmed == "Локальная" {
            Some(Self::Local)
        } else {
            None
        }
    }
}

/// Free-text tag attached to an account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Stored credential record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub labels: Vec<Label>,
    /// Serialized as `type` to match the snapshot schema.
    #[serde(rename = "type")]
    pub kind: AccountType,
    pub login: String,
    pub password: Option<String>,
}

impl Account {
    /// Applies every field present in `patch`, keeping the rest.
    pub fn apply(&mut self, patch: &AccountPatch) {
        if let Some(labels) = &patch.labels {
            self.labels = labels.clone();
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(login) = &patch.login {
            self.login = login.clone();
        }
        if let Some(password) = &patch.password {
            self.password = password.clone();
        }
    }
}

/// Account data supplied on creation; the repository assigns `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    pub labels: Vec<Label>,
    #[serde(rename = "type")]
    pub kind: AccountType,
    pub login: String,
    pub password: Option<String>,
}

impl NewAccount {
    /// Creates an unlabeled directory account.
    pub fn ldap(login: impl Into<String>) -> Self {
        Self {
            labels: Vec::new(),
            kind: AccountType::Ldap,
            login: login.into(),
            password: None,
        }
    }

    /// Creates an unlabeled local account.
    pub fn local(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            labels: Vec::new(),
            kind: AccountType::Local,
            login: login.into(),
            password: Some(password.into()),
        }
    }

    pub fn with_labels(mut self, labels: Vec<Label>) -> Self {
        self.labels = labels;
        self
    }

    pub(crate) fn into_account(self, id: AccountId) -> Account {
        Account {
            id,
            labels: self.labels,
            kind: self.kind,
            login: self.login,
            password: self.password,
        }
    }
}

/// Shallow partial update. `None` leaves a field untouched.
///
/// `password: Some(None)` clears the stored password.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountPatch {
    pub labels: Option<Vec<Label>>,
    pub kind: Option<AccountType>,
    pub login: Option<String>,
    pub password: Option<Option<String>>,
}

impl AccountPatch {
    pub fn login(login: impl Into<String>) -> Self {
        Self {
            login: Some(login.into()),
            ..Self::default()
        }
    }

    pub fn labels(labels: Vec<Label>) -> Self {
        Self {
            labels: Some(labels),
            ..Self::default()
        }
    }
}

/// Partially filled candidate checked by `validate_account`.
///
/// Mirrors what an edit form holds before it is complete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountDraft {
    pub kind: Option<AccountType>,
    pub login: Option<String>,
    pub password: Option<String>,
}

impl From<&NewAccount> for AccountDraft {
    fn from(value: &NewAccount) -> Self {
        Self {
            kind: Some(value.kind),
            login: Some(value.login.clone()),
            password: value.password.clone(),
        }
    }
}

impl From<&Account> for AccountDraft {
    fn from(value: &Account) -> Self {
        Self {
            kind: Some(value.kind),
            login: Some(value.login.clone()),
            password: value.password.clone(),
        }
    }
}
