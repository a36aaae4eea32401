//! Domain model for contact-form submissions.
//!
//! # Responsibility
//! - Define the storage-shaped `Contact` record and the raw `ContactRequest`.
//! - Keep request input distinct from the validated domain representation.
//!
//! # Invariants
//! - Every persisted contact is identified by a storage-assigned `ContactId`.
//! - Deletion is represented by a `deleted_at` tombstone, not row removal.

pub mod contact;
