//! Field validation for account candidates.
//!
//! # Responsibility
//! - Check login/password presence and length for edit forms.
//! - Report every failing field at once, keyed by field.
//!
//! # Invariants
//! - Validation is pure and never fails; it always returns a report.
//! - Password rules apply only to `AccountType::Local`.
//! - Repository writes never call this implicitly.

use super::account::{AccountDraft, AccountType};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum length, in characters, of `login` and `password`.
pub const MAX_FIELD_CHARS: usize = 100;

/// Account field that can carry a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AccountField {
    Login,
    Password,
}

impl AccountField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Password => "password",
        }
    }
}

impl Display for AccountField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reason a single field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    LoginRequired,
    LoginTooLong { chars: usize },
    PasswordRequired,
    PasswordTooLong { chars: usize },
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoginRequired => write!(f, "login is required"),
            Self::LoginTooLong { .. } => {
                write!(f, "login must not exceed {MAX_FIELD_CHARS} characters")
            }
            Self::PasswordRequired => write!(f, "password is required for local accounts"),
            Self::PasswordTooLong { .. } => {
                write!(f, "password must not exceed {MAX_FIELD_CHARS} characters")
            }
        }
    }
}

/// Outcome of `validate_account`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: BTreeMap<AccountField, FieldError>,
}

impl ValidationReport {
    /// True iff no field failed.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: AccountField) -> Option<FieldError> {
        self.errors.get(&field).copied()
    }

    /// Field name to message pairs, as displayed next to form inputs.
    pub fn messages(&self) -> BTreeMap<&'static str, String> {
        self.errors
            .iter()
            .map(|(field, error)| (field.as_str(), error.to_string()))
            .collect()
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            return write!(f, "account is valid");
        }
        let joined = self
            .errors
            .iter()
            .map(|(field, error)| format!("{field}: {error}"))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "invalid account: {joined}")
    }
}

impl Error for ValidationReport {}

/// Validates login and, for local accounts, password.
pub fn validate_account(candidate: &AccountDraft) -> ValidationReport {
    let mut errors = BTreeMap::new();

    if let Some(error) = check_field(
        candidate.login.as_deref(),
        FieldError::LoginRequired,
        |chars| FieldError::LoginTooLong { chars },
    ) {
        errors.insert(AccountField::Login, error);
    }

    if candidate.kind == Some(AccountType::Local) {
        if let Some(error) = check_field(
            candidate.password.as_deref(),
            FieldError::PasswordRequired,
            |chars| FieldError::PasswordTooLong { chars },
        ) {
            errors.insert(AccountField::Password, error);
        }
    }

    ValidationReport { errors }
}

fn check_field(
    value: Option<&str>,
    missing: FieldError,
    too_long: impl FnOnce(usize) -> FieldError,
) -> Option<FieldError> {
    let value = match value {
        Some(value) if !value.trim().is_empty() => value,
        _ => return Some(missing),
    };
    let chars = value.chars().count();
    if chars > MAX_FIELD_CHARS {
        return Some(too_long(chars));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{validate_account, AccountField, FieldError, MAX_FIELD_CHARS};
    use crate::model::account::{AccountDraft, AccountType};

    fn draft(kind: AccountType, login: Option<&str>, password: Option<&str>) -> AccountDraft {
        AccountDraft {
            kind: Some(kind),
            login: login.map(str::to_string),
            password: password.map(str::to_string),
        }
    }

    #[test]
    fn local_with_empty_login_reports_login_only() {
        let report = validate_account(&draft(AccountType::Local, Some(""), Some("p")));
        assert!(!report.is_valid());
        assert_eq!(report.error(AccountField::Login), Some(FieldError::LoginRequired));
        assert_eq!(report.error(AccountField::Password), None);
    }

    #[test]
    fn ldap_without_password_is_valid() {
        let report = validate_account(&draft(AccountType::Ldap, Some("bob"), None));
        assert!(report.is_valid());
        assert!(report.errors.is_empty());
    }

    #[test]
    fn local_requires_non_blank_password() {
        let report = validate_account(&draft(AccountType::Local, Some("bob"), Some("   ")));
        assert_eq!(
            report.error(AccountField::Password),
            Some(FieldError::PasswordRequired)
        );
        let report = validate_account(&draft(AccountType::Local, Some("bob"), None));
        assert_eq!(
            report.error(AccountField::Password),
            Some(FieldError::PasswordRequired)
        );
    }

    #[test]
    fn blank_or_missing_login_is_required() {
        let report = validate_account(&draft(AccountType::Ldap, Some(" \t"), None));
        assert_eq!(report.error(AccountField::Login), Some(FieldError::LoginRequired));
        let report = validate_account(&AccountDraft::default());
        assert_eq!(report.error(AccountField::Login), Some(FieldError::LoginRequired));
        assert_eq!(report.error(AccountField::Password), None);
    }

    #[test]
    fn length_limit_counts_characters() {
        let at_limit = "ж".repeat(MAX_FIELD_CHARS);
        let report = validate_account(&draft(AccountType::Local, Some(&at_limit), Some(&at_limit)));
        assert!(report.is_valid());

        let over = "x".repeat(MAX_FIELD_CHARS + 1);
        let report = validate_account(&draft(AccountType::Local, Some(&over), Some(&over)));
        assert_eq!(
            report.error(AccountField::Login),
            Some(FieldError::LoginTooLong { chars: 101 })
        );
        assert_eq!(
            report.error(AccountField::Password),
            Some(FieldError::PasswordTooLong { chars: 101 })
        );
    }

    #[test]
    fn length_limit_counts_astral_characters_once() {
        // Each emoji is two UTF-16 code units but one `char`.
        let emoji = "\u{1F600}".repeat(MAX_FIELD_CHARS);
        assert_eq!(emoji.encode_utf16().count(), 2 * MAX_FIELD_CHARS);
        let report = validate_account(&draft(AccountType::Local, Some(&emoji), Some(&emoji)));
        assert!(report.is_valid());

        let over = "\u{1F600}".repeat(MAX_FIELD_CHARS + 1);
        let report = validate_account(&draft(AccountType::Ldap, Some(&over), None));
        assert_eq!(
            report.error(AccountField::Login),
            Some(FieldError::LoginTooLong { chars: 101 })
        );
    }

    #[test]
    fn ldap_ignores_overlong_password() {
        let over = "x".repeat(MAX_FIELD_CHARS + 1);
        let report = validate_account(&draft(AccountType::Ldap, Some("bob"), Some(&over)));
        assert!(report.is_valid());
    }

    #[test]
    fn messages_are_keyed_by_field_name() {
        let report = validate_account(&draft(AccountType::Local, None, None));
        let messages = report.messages();
        assert_eq!(messages["login"], "login is required");
        assert_eq!(messages["password"], "password is required for local accounts");
        assert!(report.to_string().starts_with("invalid account: login:"));
    }
}
