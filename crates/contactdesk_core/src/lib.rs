//! Core domain logic for ContactDesk.
//! This crate owns contact validation, the soft-delete lifecycle and storage.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validation;

pub use logging::{default_log_level, init_logging, logging_status, parse_log_level};
pub use model::contact::{Contact, ContactId, ContactRequest, UNASSIGNED_CONTACT_ID};
pub use repo::contact_repo::{ContactRepository, RepoError, RepoResult, SqliteContactRepository};
pub use repo::memory_repo::InMemoryContactRepository;
pub use service::contact_service::{ContactService, ServiceError, ServiceResult};
pub use validation::{
    ContactValidator, FieldError, ValidationError, ValidationPolicy, ValidationRule,
};

/// Minimal health-check API for adapter smoke checks.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
