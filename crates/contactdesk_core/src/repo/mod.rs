//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the contact data access contract consumed by the service layer.
//! - Isolate SQLite query details from business orchestration.
//!
//! # Invariants
//! - Read paths never return tombstoned contacts.
//! - Repository APIs return semantic errors (`NotFound`) in addition to
//!   storage transport errors.

pub mod contact_repo;
pub mod memory_repo;
