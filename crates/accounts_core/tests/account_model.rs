use accounts_core::{
    format_labels, parse_labels, validate_account, Account, AccountDraft, AccountType, Label,
    NewAccount,
};

#[test]
fn account_serialization_uses_snapshot_field_names() {
    let account = Account {
        id: 3,
        labels: vec![Label::new("ops")],
        kind: AccountType::Ldap,
        login: "bob".to_string(),
        password: None,
    };

    let json = serde_json::to_value(&account).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "id": 3,
            "labels": [{"text": "ops"}],
            "type": "LDAP",
            "login": "bob",
            "password": null
        })
    );

    let decoded: Account = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, account);
}

#[test]
fn missing_password_field_decodes_as_none() {
    let value = serde_json::json!({
        "id": 1,
        "labels": [],
        "type": "Local",
        "login": "root"
    });
    let decoded: Account = serde_json::from_value(value).unwrap();
    assert_eq!(decoded.password, None);
    assert_eq!(decoded.kind, AccountType::Local);
}

#[test]
fn unknown_account_type_is_rejected() {
    let value = serde_json::json!({
        "id": 1,
        "labels": [],
        "type": "Kerberos",
        "login": "root",
        "password": null
    });
    assert!(serde_json::from_value::<Account>(value).is_err());
}

#[test]
fn account_type_parse_accepts_wire_and_legacy_names() {
    assert_eq!(AccountType::parse("ldap"), Some(AccountType::Ldap));
    assert_eq!(AccountType::parse(" Local "), Some(AccountType::Local));
    assert_eq!(AccountType::parse("Локальная"), Some(AccountType::Local));
    assert_eq!(AccountType::parse("other"), None);
    assert_eq!(AccountType::Local.as_str(), "Local");
}

#[test]
fn draft_from_new_account_feeds_validation() {
    let new = NewAccount::local("root", "pw").with_labels(parse_labels("a;b"));
    let report = validate_account(&AccountDraft::from(&new));
    assert!(report.is_valid());
    assert_eq!(format_labels(&new.labels), "a; b");
}
