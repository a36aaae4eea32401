//! ContactDesk command-line entry point.
//!
//! # Responsibility
//! - Wire config, logging, storage and the request adapter together.
//! - Print the response envelope of each command as JSON on stdout.

mod config;

use clap::{Parser, Subcommand};
use config::AppConfig;
use contactdesk_api::{ApiReply, ContactApi};
use contactdesk_core::db::open_db;
use contactdesk_core::{init_logging, ContactService, ContactValidator, SqliteContactRepository};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "contactdesk", version, about = "Manage contact-form submissions")]
struct Cli {
    /// SQLite database file; overrides CONTACTDESK_DB_PATH.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print core linkage info.
    Ping,
    #[command(flatten)]
    Contact(ContactCommand),
}

#[derive(Debug, Subcommand)]
enum ContactCommand {
    /// Create a contact from a JSON payload.
    Create { payload: String },
    /// List active contacts.
    List,
    /// Show one contact.
    Get { id: String },
    /// Replace a contact's fields from a JSON payload.
    Update { id: String, payload: String },
    /// Soft-delete a contact.
    Delete { id: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(err) => {
            eprintln!("contactdesk: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the executed command succeeded.
fn run(cli: Cli) -> Result<bool, String> {
    let command = match cli.command {
        Command::Ping => {
            println!("contactdesk_core ping={}", contactdesk_core::ping());
            println!("contactdesk_core version={}", contactdesk_core::core_version());
            return Ok(true);
        }
        Command::Contact(command) => command,
    };

    let mut config = AppConfig::from_env()?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(config.log_level, log_dir)?;
    }

    let conn = open_db(&config.db_path).map_err(|err| {
        format!(
            "failed to open database `{}`: {err}",
            config.db_path.display()
        )
    })?;
    let repo = SqliteContactRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let validator = ContactValidator::new(config.validation_policy());
    let api = ContactApi::new(ContactService::with_validator(repo, validator));

    let reply = dispatch(&api, command);
    info!(
        "event=cli_command module=cli status={} code={}",
        reply.status, reply.body.code
    );
    let body = reply.body_json().map_err(|err| err.to_string())?;
    println!("{body}");
    Ok(reply.is_success())
}

fn dispatch(api: &ContactApi<SqliteContactRepository<'_>>, command: ContactCommand) -> ApiReply {
    match command {
        ContactCommand::Create { payload } => api.create_contact(&payload),
        ContactCommand::List => api.list_contacts(),
        ContactCommand::Get { id } => api.get_contact(&id),
        ContactCommand::Update { id, payload } => api.update_contact(&id, &payload),
        ContactCommand::Delete { id } => api.delete_contact(&id),
    }
}
