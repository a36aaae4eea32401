//! Runtime configuration for the ContactDesk CLI.
//!
//! # Responsibility
//! - Resolve settings from the environment, with optional `.env` support.
//! - Reject malformed values before any database or log file is opened.

use contactdesk_core::{default_log_level, parse_log_level, ValidationPolicy};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "CONTACTDESK_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "CONTACTDESK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "CONTACTDESK_LOG_DIR";
pub const ENV_REQUIRE_PHONE: &str = "CONTACTDESK_REQUIRE_PHONE";

const DEFAULT_DB_FILE_NAME: &str = "contactdesk.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    /// Canonical level name, already checked.
    pub log_level: &'static str,
    /// File logging stays off when unset.
    pub log_dir: Option<String>,
    pub require_phone: bool,
}

impl AppConfig {
    /// Loads `.env` (when present) and then reads process environment.
    pub fn from_env() -> Result<Self, String> {
        // A missing .env file is normal; values then come from the real environment.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let db_path = non_blank(lookup(ENV_DB_PATH))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE_NAME));
        let log_level = match non_blank(lookup(ENV_LOG_LEVEL)) {
            Some(raw) => parse_log_level(&raw).map_err(|err| format!("{ENV_LOG_LEVEL}: {err}"))?,
            None => default_log_level(),
        };
        let log_dir = non_blank(lookup(ENV_LOG_DIR));
        let require_phone = match non_blank(lookup(ENV_REQUIRE_PHONE)) {
            Some(raw) => parse_bool(ENV_REQUIRE_PHONE, &raw)?,
            None => false,
        };

        Ok(Self {
            db_path,
            log_level,
            log_dir,
            require_phone,
        })
    }

    pub fn validation_policy(&self) -> ValidationPolicy {
        ValidationPolicy {
            require_phone: self.require_phone,
            ..ValidationPolicy::default()
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("{key} must be a boolean, got `{other}`")),
    }
}
