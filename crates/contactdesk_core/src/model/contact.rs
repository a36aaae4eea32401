//! Contact domain model.
//!
//! # Responsibility
//! - Define the canonical contact record persisted by repositories.
//! - Define the request DTO consumed by the service layer.
//! - Provide lifecycle helpers for soft-delete semantics.
//!
//! # Invariants
//! - `id` is assigned once by storage and never changes afterwards.
//! - `deleted_at` is the source of truth for tombstone state.

use serde::{Deserialize, Serialize};

/// Storage-assigned contact identifier.
pub type ContactId = i64;

/// Identifier value carried by a contact that storage has not seen yet.
pub const UNASSIGNED_CONTACT_ID: ContactId = 0;

/// Raw contact-form input, before validation.
///
/// Every field defaults to an empty string when a payload omits it, so a
/// missing key is reported by validation exactly like a blank one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
}

impl ContactRequest {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            message: message.into(),
        }
    }
}

/// Canonical contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// `UNASSIGNED_CONTACT_ID` until the repository persists the record.
    pub id: ContactId,
    pub full_name: String,
    pub email: String,
    /// Empty string means no phone was given.
    pub phone: String,
    pub message: String,
    /// Unix epoch milliseconds, set by storage.
    pub created_at: i64,
    /// Unix epoch milliseconds, refreshed by storage on every write.
    pub updated_at: i64,
    /// Soft delete tombstone. `None` means the contact is active.
    pub deleted_at: Option<i64>,
}

impl Contact {
    /// Builds an unsaved contact from request fields, copied verbatim.
    ///
    /// # Invariants
    /// - `id` is `UNASSIGNED_CONTACT_ID` and timestamps are zero.
    /// - `deleted_at` starts as `None`.
    pub fn from_request(request: &ContactRequest) -> Self {
        Self {
            id: UNASSIGNED_CONTACT_ID,
            full_name: request.name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            message: request.message.clone(),
            created_at: 0,
            updated_at: 0,
            deleted_at: None,
        }
    }

    /// Overwrites the mutable fields from a request.
    ///
    /// Identity, timestamps and the tombstone are left untouched.
    pub fn apply_request(&mut self, request: &ContactRequest) {
        self.full_name.clone_from(&request.name);
        self.email.clone_from(&request.email);
        self.phone.clone_from(&request.phone);
        self.message.clone_from(&request.message);
    }

    /// Returns whether storage has assigned an identifier yet.
    pub fn is_persisted(&self) -> bool {
        self.id != UNASSIGNED_CONTACT_ID
    }

    /// Marks this contact as softly deleted at `at_ms`.
    pub fn soft_delete(&mut self, at_ms: i64) {
        self.deleted_at = Some(at_ms);
        self.updated_at = at_ms;
    }

    /// Returns whether this contact should be visible to read paths.
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}
