//! Command-line access to a SQLite-backed account store.
//!
//! # Responsibility
//! - Inspect and edit accounts without a UI.
//! - Validate before creating, mirroring the edit form.

use accounts_core::db::open_db;
use accounts_core::{
    core_version, format_labels, init_from_config, validate_account, Account, AccountDraft,
    AccountId, AccountRepository, AccountService, AccountType, CoreConfig, RepoError, SqliteStore,
};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    author,
    version = core_version(),
    about = "Inspect and edit a SQLite-backed account store"
)]
struct Args {
    /// Path to the SQLite database file (created when missing).
    db_path: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every account in insertion order.
    List,
    /// Validate and create an account.
    Add {
        /// LDAP or Local.
        #[arg(value_parser = parse_account_type)]
        kind: AccountType,
        login: String,
        /// Required for Local accounts.
        password: Option<String>,
        /// Labels separated by `;`, e.g. "ops; dev".
        #[arg(long)]
        labels: Option<String>,
    },
    /// Remove an account by id.
    Remove { id: AccountId },
    /// Replace the labels of an account.
    Labels {
        id: AccountId,
        /// Labels separated by `;`; empty clears them.
        text: String,
    },
    /// Validate fields without touching the store.
    Check {
        #[arg(value_parser = parse_account_type)]
        kind: AccountType,
        login: Option<String>,
        password: Option<String>,
    },
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), String> {
    let config = CoreConfig::from_env().map_err(|err| err.to_string())?;
    init_from_config(&config)?;
    info!("event=cli_command module=cli status=start command={:?}", args.command);

    match args.command {
        Command::Check {
            kind,
            login,
            password,
        } => check(kind, login, password),
        command => {
            let conn = open_db(&args.db_path)
                .map_err(|err| format!("cannot open `{}`: {err}", args.db_path.display()))?;
            let repo =
                AccountRepository::open_with_key(SqliteStore::new(&conn), &config.storage_key)
                    .map_err(|err| err.to_string())?;
            execute(&mut AccountService::new(repo), command)
        }
    }
}

fn execute(service: &mut AccountService<SqliteStore<'_>>, command: Command) -> Result<(), String> {
    match command {
        Command::List => {
            for account in service.accounts() {
                println!("{}", describe(account));
            }
        }
        Command::Add {
            kind,
            login,
            password,
            labels,
        } => {
            let created = service
                .create_with_labels(kind, login, password, labels.as_deref().unwrap_or_default())
                .map_err(render_error)?;
            println!("{}", describe(&created));
        }
        Command::Remove { id } => {
            if service.remove_account(id).map_err(render_error)? {
                println!("removed {id}");
            } else {
                println!("no account with id {id}");
            }
        }
        Command::Labels { id, text } => {
            if service.relabel(id, &text).map_err(render_error)? {
                let formatted = service.labels_text(id).unwrap_or_default();
                println!("{id}: {formatted}");
            } else {
                println!("no account with id {id}");
            }
        }
        Command::Check {
            kind,
            login,
            password,
        } => return check(kind, login, password),
    }
    Ok(())
}

fn parse_account_type(value: &str) -> Result<AccountType, String> {
    AccountType::parse(value)
        .ok_or_else(|| format!("unknown account type `{value}`; expected LDAP or Local"))
}

fn check(kind: AccountType, login: Option<String>, password: Option<String>) -> Result<(), String> {
    let report = validate_account(&AccountDraft {
        kind: Some(kind),
        login,
        password,
    });
    if report.is_valid() {
        println!("valid");
        return Ok(());
    }
    for (field, message) in report.messages() {
        println!("{field}: {message}");
    }
    Err("invalid account".to_string())
}

fn describe(account: &Account) -> String {
    format!(
        "{}\t{}\t{}\t[{}]",
        account.id,
        account.kind.as_str(),
        account.login,
        format_labels(&account.labels)
    )
}

fn render_error(err: RepoError) -> String {
    match err {
        RepoError::Validation(report) => report
            .messages()
            .into_iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    }
}
