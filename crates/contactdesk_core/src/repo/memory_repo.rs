//! In-memory contact repository.
//!
//! # Responsibility
//! - Provide a storage-free `ContactRepository` for embedding and tests.
//! - Mirror the SQLite backend contract, including soft-delete filtering.
//!
//! # Invariants
//! - Ids are assigned from a monotonic counter and never reused.
//! - Rows are kept in insertion order and are never removed.

use crate::model::contact::{Contact, ContactId};
use crate::repo::contact_repo::{
    now_epoch_ms, ContactRepository, RepoError, RepoResult, Visibility,
};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MemoryState {
    last_id: ContactId,
    rows: Vec<Contact>,
}

impl MemoryState {
    fn visible(&self, visibility: Visibility) -> impl Iterator<Item = &Contact> {
        self.rows
            .iter()
            .filter(move |row| visibility == Visibility::IncludeDeleted || row.is_active())
    }

    fn active_row_mut(&mut self, id: ContactId) -> RepoResult<&mut Contact> {
        self.rows
            .iter_mut()
            .find(|row| row.id == id && row.is_active())
            .ok_or(RepoError::NotFound(id))
    }
}

/// Mutex-guarded contact store living in process memory.
#[derive(Debug, Default)]
pub struct InMemoryContactRepository {
    state: Mutex<MemoryState>,
}

impl InMemoryContactRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a contact regardless of tombstone state.
    pub fn find_any_by_id(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        let state = self.lock()?;
        let found = state
            .visible(Visibility::IncludeDeleted)
            .find(|row| row.id == id)
            .cloned();
        Ok(found)
    }

    /// Number of stored rows, tombstoned ones included.
    pub fn stored_len(&self) -> RepoResult<usize> {
        Ok(self.lock()?.rows.len())
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, MemoryState>> {
        self.state.lock().map_err(|_| {
            RepoError::Unavailable("in-memory contact store lock poisoned".to_string())
        })
    }
}

impl ContactRepository for InMemoryContactRepository {
    fn create(&self, contact: &mut Contact) -> RepoResult<()> {
        if contact.is_persisted() {
            return Err(RepoError::AlreadyPersisted(contact.id));
        }

        let mut state = self.lock()?;
        let now = now_epoch_ms();
        state.last_id += 1;
        contact.id = state.last_id;
        contact.created_at = now;
        contact.updated_at = now;
        contact.deleted_at = None;
        state.rows.push(contact.clone());
        Ok(())
    }

    fn find_all(&self) -> RepoResult<Vec<Contact>> {
        let state = self.lock()?;
        let contacts = state.visible(Visibility::ActiveOnly).cloned().collect();
        Ok(contacts)
    }

    fn find_by_id(&self, id: ContactId) -> RepoResult<Contact> {
        let state = self.lock()?;
        let found = state
            .visible(Visibility::ActiveOnly)
            .find(|row| row.id == id)
            .cloned();
        found.ok_or(RepoError::NotFound(id))
    }

    fn update(&self, contact: &mut Contact) -> RepoResult<()> {
        let mut state = self.lock()?;
        let row = state.active_row_mut(contact.id)?;
        let now = now_epoch_ms();
        row.full_name.clone_from(&contact.full_name);
        row.email.clone_from(&contact.email);
        row.phone.clone_from(&contact.phone);
        row.message.clone_from(&contact.message);
        row.updated_at = now;
        contact.updated_at = now;
        Ok(())
    }

    fn delete(&self, contact: &mut Contact) -> RepoResult<()> {
        let mut state = self.lock()?;
        let row = state.active_row_mut(contact.id)?;
        let now = now_epoch_ms();
        row.soft_delete(now);
        contact.soft_delete(now);
        Ok(())
    }
}
