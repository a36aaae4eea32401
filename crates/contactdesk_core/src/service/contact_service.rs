//! Contact use-case service.
//!
//! # Responsibility
//! - Validate contact requests and map them into domain records.
//! - Enforce the soft-delete lifecycle on top of a `ContactRepository`.
//!
//! # Invariants
//! - Validation runs before any repository call; a rejected request never
//!   reads or writes storage.
//! - Each mutating use-case issues exactly one repository write.
//! - The first error ends the use-case; nothing is retried or swallowed.

use crate::model::contact::{Contact, ContactId, ContactRequest};
use crate::repo::contact_repo::{ContactRepository, RepoError};
use crate::validation::{ContactValidator, ValidationError};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for contact use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Request input failed field rules.
    Validation(ValidationError),
    /// No active contact carries this id.
    NotFound(ContactId),
    /// Storage failure, carried unmodified.
    Persistence(RepoError),
}

impl ServiceError {
    /// Stable short name used in log events and response mapping.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::Persistence(_) => "persistence",
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "contact not found: {id}"),
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Persistence(other),
        }
    }
}

/// Contact service facade over repository implementations.
pub struct ContactService<R: ContactRepository> {
    repo: R,
    validator: ContactValidator,
}

impl<R: ContactRepository> ContactService<R> {
    /// Creates a service with the default validation policy.
    pub fn new(repo: R) -> Self {
        Self::with_validator(repo, ContactValidator::default())
    }

    /// Creates a service using a caller-constructed validator.
    pub fn with_validator(repo: R, validator: ContactValidator) -> Self {
        Self { repo, validator }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn validator(&self) -> &ContactValidator {
        &self.validator
    }

    /// Validates and persists a new contact.
    ///
    /// # Contract
    /// - Returned contact carries the storage-assigned id.
    /// - `deleted_at` is `None`.
    pub fn create_contact(&self, request: &ContactRequest) -> ServiceResult<Contact> {
        let result = self.try_create(request);
        match &result {
            Ok(contact) => info!(
                "event=contact_create module=service status=ok contact_id={}",
                contact.id
            ),
            Err(err) => log_failure("contact_create", None, err),
        }
        result
    }

    /// Lists all active contacts in insertion order.
    ///
    /// An empty store yields an empty vec, not an error.
    pub fn get_all_contacts(&self) -> ServiceResult<Vec<Contact>> {
        match self.repo.find_all() {
            Ok(contacts) => {
                debug!(
                    "event=contact_list module=service status=ok count={}",
                    contacts.len()
                );
                Ok(contacts)
            }
            Err(err) => {
                let err = ServiceError::from(err);
                log_failure("contact_list", None, &err);
                Err(err)
            }
        }
    }

    /// Loads one active contact.
    pub fn get_contact_by_id(&self, id: ContactId) -> ServiceResult<Contact> {
        match self.repo.find_by_id(id) {
            Ok(contact) => {
                debug!("event=contact_get module=service status=ok contact_id={id}");
                Ok(contact)
            }
            Err(err) => {
                let err = ServiceError::from(err);
                log_failure("contact_get", Some(id), &err);
                Err(err)
            }
        }
    }

    /// Replaces name, email, phone and message of an active contact.
    ///
    /// Identity, `created_at` and the tombstone are never changed.
    pub fn update_contact(
        &self,
        id: ContactId,
        request: &ContactRequest,
    ) -> ServiceResult<Contact> {
        let result = self.try_update(id, request);
        match &result {
            Ok(_) => info!("event=contact_update module=service status=ok contact_id={id}"),
            Err(err) => log_failure("contact_update", Some(id), err),
        }
        result
    }

    /// Soft-deletes an active contact; the row stays in storage.
    pub fn delete_contact(&self, id: ContactId) -> ServiceResult<()> {
        let result = self.try_delete(id);
        match &result {
            Ok(()) => info!("event=contact_delete module=service status=ok contact_id={id}"),
            Err(err) => log_failure("contact_delete", Some(id), err),
        }
        result
    }

    fn try_create(&self, request: &ContactRequest) -> ServiceResult<Contact> {
        self.validator.validate(request)?;

        let mut contact = Contact::from_request(request);
        self.repo.create(&mut contact)?;
        Ok(contact)
    }

    fn try_update(&self, id: ContactId, request: &ContactRequest) -> ServiceResult<Contact> {
        self.validator.validate(request)?;

        let mut contact = self.repo.find_by_id(id)?;
        contact.apply_request(request);
        self.repo.update(&mut contact)?;
        Ok(contact)
    }

    fn try_delete(&self, id: ContactId) -> ServiceResult<()> {
        let mut contact = self.repo.find_by_id(id)?;
        self.repo.delete(&mut contact)?;
        Ok(())
    }
}

fn log_failure(event: &str, id: Option<ContactId>, err: &ServiceError) {
    let contact_id = id.map_or_else(|| "-".to_string(), |id| id.to_string());
    match err {
        ServiceError::Persistence(cause) => warn!(
            "event={event} module=service status=error contact_id={contact_id} error_code={} error={cause}",
            err.kind()
        ),
        // Field values can hold personal data; only field names are logged.
        ServiceError::Validation(cause) => info!(
            "event={event} module=service status=rejected contact_id={contact_id} error_code={} fields={}",
            err.kind(),
            cause
                .errors
                .iter()
                .map(|field| field.field)
                .collect::<Vec<_>>()
                .join(",")
        ),
        ServiceError::NotFound(_) => debug!(
            "event={event} module=service status=rejected contact_id={contact_id} error_code={}",
            err.kind()
        ),
    }
}
