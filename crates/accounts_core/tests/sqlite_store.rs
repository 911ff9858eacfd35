use accounts_core::db::{open_db, open_db_in_memory};
use accounts_core::{
    AccountPatch, AccountRepository, KeyValueStore, Label, NewAccount, RepoError, SqliteStore,
    DEFAULT_STORAGE_KEY,
};

#[test]
fn get_and_set_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let mut store = SqliteStore::new(&conn);

    assert_eq!(store.get("missing").unwrap(), None);
    store.set("k", "v1").unwrap();
    store.set("k", "v2").unwrap();
    store.set("a", "x").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
    assert_eq!(store.keys().unwrap(), vec!["a".to_string(), "k".to_string()]);
}

#[test]
fn blank_key_write_surfaces_store_error() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = AccountRepository::open_with_key(SqliteStore::new(&conn), " ").unwrap();

    let err = repo.add_account(NewAccount::ldap("a")).unwrap_err();
    assert!(matches!(err, RepoError::Store(_)));
    // Memory is mutated before the write fails.
    assert_eq!(repo.len(), 1);
}

#[test]
fn state_survives_reopening_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("accounts.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        let mut repo = AccountRepository::open(SqliteStore::new(&conn)).unwrap();
        let a = repo
            .add_account(NewAccount::local("root", "pw").with_labels(vec![Label::new("admin")]))
            .unwrap();
        repo.add_account(NewAccount::ldap("bob")).unwrap();
        repo.add_account(NewAccount::ldap("carol")).unwrap();
        repo.update_account(a.id, &AccountPatch::login("root2")).unwrap();
        repo.remove_account(3).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let repo = AccountRepository::open(SqliteStore::new(&conn)).unwrap();
    let logins: Vec<_> = repo.accounts().iter().map(|a| a.login.as_str()).collect();
    assert_eq!(logins, ["root2", "bob"]);
    assert_eq!(repo.get(1).unwrap().labels, vec![Label::new("admin")]);
    assert_eq!(repo.next_id(), 4);
}

#[test]
fn save_then_load_reproduces_state() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = AccountRepository::open(SqliteStore::new(&conn)).unwrap();
    repo.add_account(NewAccount::ldap("a").with_labels(vec![Label::new("x"), Label::new("x")]))
        .unwrap();
    repo.add_account(NewAccount::local("b", "pw")).unwrap();
    repo.remove_account(1).unwrap();
    repo.save_to_storage().unwrap();

    let reloaded = AccountRepository::open(SqliteStore::new(&conn)).unwrap();
    assert_eq!(reloaded.accounts(), repo.accounts());
    assert_eq!(reloaded.next_id(), repo.next_id());
}

#[test]
fn last_writer_wins_and_reload_picks_it_up() {
    let conn = open_db_in_memory().unwrap();
    let mut first = AccountRepository::open(SqliteStore::new(&conn)).unwrap();
    let mut second = AccountRepository::open(SqliteStore::new(&conn)).unwrap();

    first.add_account(NewAccount::ldap("from-first")).unwrap();
    second.add_account(NewAccount::ldap("from-second")).unwrap();
    second.add_account(NewAccount::ldap("another")).unwrap();

    first.load_from_storage().unwrap();
    let logins: Vec<_> = first.accounts().iter().map(|a| a.login.as_str()).collect();
    assert_eq!(logins, ["from-second", "another"]);
    assert_eq!(first.next_id(), 3);

    let raw = SqliteStore::new(&conn).get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
    assert!(raw.contains("\"nextId\":3"));
}

#[test]
fn rejected_reload_keeps_current_state() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = AccountRepository::open(SqliteStore::new(&conn)).unwrap();
    repo.add_account(NewAccount::ldap("a")).unwrap();

    let overflowing = format!(
        r#"{{"accounts":[{{"id":{},"labels":[],"type":"LDAP","login":"z","password":null}}],"nextId":3}}"#,
        u64::MAX
    );
    SqliteStore::new(&conn)
        .set(DEFAULT_STORAGE_KEY, &overflowing)
        .unwrap();

    let err = repo.load_from_storage().unwrap_err();
    assert!(matches!(err, RepoError::InvalidSnapshot(_)));
    assert_eq!(repo.len(), 1);
    assert_eq!(repo.accounts()[0].login, "a");
    assert_eq!(repo.next_id(), 2);
}
