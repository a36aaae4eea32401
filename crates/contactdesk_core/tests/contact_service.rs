use contactdesk_core::db::open_db_in_memory;
use contactdesk_core::{
    Contact, ContactId, ContactRepository, ContactRequest, ContactService, ContactValidator,
    InMemoryContactRepository, RepoError, RepoResult, ServiceError, SqliteContactRepository,
    ValidationPolicy, ValidationRule,
};
use std::cell::Cell;
use std::collections::HashSet;
use std::error::Error;

/// Repository double that counts calls and can simulate a storage outage.
#[derive(Default)]
struct RecordingRepository {
    inner: InMemoryContactRepository,
    reads: Cell<usize>,
    writes: Cell<usize>,
    unavailable: Cell<bool>,
}

impl RecordingRepository {
    fn bump(counter: &Cell<usize>) {
        counter.set(counter.get() + 1);
    }

    fn check_available(&self) -> RepoResult<()> {
        if self.unavailable.get() {
            return Err(RepoError::Unavailable("backend offline".to_string()));
        }
        Ok(())
    }
}

impl ContactRepository for RecordingRepository {
    fn create(&self, contact: &mut Contact) -> RepoResult<()> {
        Self::bump(&self.writes);
        self.check_available()?;
        self.inner.create(contact)
    }

    fn find_all(&self) -> RepoResult<Vec<Contact>> {
        Self::bump(&self.reads);
        self.check_available()?;
        self.inner.find_all()
    }

    fn find_by_id(&self, id: ContactId) -> RepoResult<Contact> {
        Self::bump(&self.reads);
        self.check_available()?;
        self.inner.find_by_id(id)
    }

    fn update(&self, contact: &mut Contact) -> RepoResult<()> {
        Self::bump(&self.writes);
        self.check_available()?;
        self.inner.update(contact)
    }

    fn delete(&self, contact: &mut Contact) -> RepoResult<()> {
        Self::bump(&self.writes);
        self.check_available()?;
        self.inner.delete(contact)
    }
}

fn jane() -> ContactRequest {
    ContactRequest::new("Jane Doe", "jane@example.com", "", "Hi")
}

fn recording_service() -> ContactService<RecordingRepository> {
    ContactService::new(RecordingRepository::default())
}

#[test]
fn create_then_get_returns_request_values() {
    let service = recording_service();

    let created = service.create_contact(&jane()).unwrap();
    assert!(created.id > 0);
    assert_eq!(created.full_name, "Jane Doe");
    assert_eq!(created.email, "jane@example.com");
    assert_eq!(created.phone, "");
    assert_eq!(created.message, "Hi");
    assert!(created.deleted_at.is_none());

    let fetched = service.get_contact_by_id(created.id).unwrap();
    assert_eq!(fetched, created);
}

#[test]
fn created_ids_are_unique() {
    let service = recording_service();
    let ids: HashSet<_> = (0..5)
        .map(|index| {
            let request = ContactRequest::new(
                format!("Person {index}"),
                format!("p{index}@example.com"),
                "",
                "",
            );
            service.create_contact(&request).unwrap().id
        })
        .collect();
    assert_eq!(ids.len(), 5);
}

#[test]
fn invalid_create_returns_validation_without_touching_storage() {
    let service = recording_service();

    for request in [
        ContactRequest::new("", "jane@example.com", "", ""),
        ContactRequest::new("Jane", "jane-at-example.com", "", ""),
        ContactRequest::new("Jane", "", "", ""),
    ] {
        let err = service.create_contact(&request).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)), "{err}");
    }

    let repo = service.repository();
    assert_eq!(repo.writes.get(), 0);
    assert_eq!(repo.reads.get(), 0);
    assert_eq!(repo.inner.stored_len().unwrap(), 0);
}

#[test]
fn invalid_update_returns_validation_without_reading_storage() {
    let service = recording_service();
    let created = service.create_contact(&jane()).unwrap();
    let writes_before = service.repository().writes.get();

    let err = service
        .update_contact(created.id, &ContactRequest::new("Jane", "broken@", "", ""))
        .unwrap_err();
    match err {
        ServiceError::Validation(validation) => {
            assert_eq!(validation.errors.len(), 1);
            assert_eq!(validation.errors[0].field, "email");
            assert_eq!(validation.errors[0].rule, ValidationRule::Email);
        }
        other => panic!("unexpected error: {other}"),
    }

    let repo = service.repository();
    assert_eq!(repo.reads.get(), 0);
    assert_eq!(repo.writes.get(), writes_before);
    assert_eq!(service.get_contact_by_id(created.id).unwrap().email, "jane@example.com");
}

#[test]
fn update_overwrites_fields_and_keeps_identity() {
    let service = recording_service();
    let created = service.create_contact(&jane()).unwrap();

    let request = ContactRequest::new("Jane Smith", "jsmith@example.com", "+1 555 010 0199", "");
    let updated = service.update_contact(created.id, &request).unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.full_name, "Jane Smith");
    assert_eq!(updated.email, "jsmith@example.com");
    assert_eq!(updated.phone, "+1 555 010 0199");
    assert_eq!(updated.message, "");
    assert!(updated.deleted_at.is_none());
    assert_eq!(service.get_contact_by_id(created.id).unwrap(), updated);
}

#[test]
fn update_on_missing_or_deleted_id_is_not_found_and_creates_nothing() {
    let service = recording_service();

    let err = service.update_contact(404, &jane()).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(404)));

    let created = service.create_contact(&jane()).unwrap();
    service.delete_contact(created.id).unwrap();
    let err = service.update_contact(created.id, &jane()).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(id) if id == created.id));

    assert_eq!(service.repository().inner.stored_len().unwrap(), 1);
    assert!(service.get_all_contacts().unwrap().is_empty());
}

#[test]
fn delete_hides_contact_but_keeps_record() {
    let service = recording_service();
    let kept = service.create_contact(&jane()).unwrap();
    let removed = service
        .create_contact(&ContactRequest::new("John", "john@example.com", "", ""))
        .unwrap();

    service.delete_contact(removed.id).unwrap();

    assert!(matches!(
        service.get_contact_by_id(removed.id),
        Err(ServiceError::NotFound(id)) if id == removed.id
    ));
    let listed: Vec<_> = service
        .get_all_contacts()
        .unwrap()
        .into_iter()
        .map(|contact| contact.id)
        .collect();
    assert_eq!(listed, vec![kept.id]);

    let stored = service
        .repository()
        .inner
        .find_any_by_id(removed.id)
        .unwrap()
        .expect("soft-deleted record stays in storage");
    assert!(stored.deleted_at.is_some());
    assert_eq!(stored.full_name, "John");
}

#[test]
fn second_delete_is_not_found() {
    let service = recording_service();
    let created = service.create_contact(&jane()).unwrap();

    service.delete_contact(created.id).unwrap();
    let err = service.delete_contact(created.id).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(id) if id == created.id));
}

#[test]
fn each_mutation_issues_exactly_one_write() {
    let service = recording_service();
    let repo = service.repository();

    let created = service.create_contact(&jane()).unwrap();
    assert_eq!(repo.writes.get(), 1);

    service.update_contact(created.id, &jane()).unwrap();
    assert_eq!(repo.writes.get(), 2);

    service.delete_contact(created.id).unwrap();
    assert_eq!(repo.writes.get(), 3);

    assert!(service.delete_contact(created.id).is_err());
    assert_eq!(repo.writes.get(), 3);
}

#[test]
fn get_all_on_empty_store_is_empty_success() {
    let service = recording_service();
    assert!(service.get_all_contacts().unwrap().is_empty());
}

#[test]
fn storage_outage_surfaces_as_persistence_error() {
    let service = recording_service();
    let created = service.create_contact(&jane()).unwrap();
    service.repository().unavailable.set(true);

    let err = service.create_contact(&jane()).unwrap_err();
    assert!(matches!(err, ServiceError::Persistence(RepoError::Unavailable(_))));
    let cause = err.source().expect("persistence error keeps its cause");
    assert_eq!(cause.to_string(), "contact storage unavailable: backend offline");

    assert!(matches!(
        service.get_all_contacts(),
        Err(ServiceError::Persistence(_))
    ));
    assert!(matches!(
        service.get_contact_by_id(created.id),
        Err(ServiceError::Persistence(_))
    ));
    assert!(matches!(
        service.delete_contact(created.id),
        Err(ServiceError::Persistence(_))
    ));
}

#[test]
fn injected_validator_policy_is_applied() {
    let validator = ContactValidator::new(ValidationPolicy {
        require_phone: true,
        ..ValidationPolicy::default()
    });
    let service = ContactService::with_validator(InMemoryContactRepository::new(), validator);

    let err = service.create_contact(&jane()).unwrap_err();
    match err {
        ServiceError::Validation(validation) => assert!(validation.has_field("phone")),
        other => panic!("unexpected error: {other}"),
    }

    let request = ContactRequest::new("Jane Doe", "jane@example.com", "555-010-0199", "Hi");
    assert!(service.create_contact(&request).is_ok());
}

#[test]
fn sqlite_backed_service_follows_soft_delete_lifecycle() {
    let conn = open_db_in_memory().unwrap();
    let service = ContactService::new(SqliteContactRepository::try_new(&conn).unwrap());

    let created = service.create_contact(&jane()).unwrap();
    assert_eq!(service.get_contact_by_id(created.id).unwrap(), created);

    service.delete_contact(created.id).unwrap();
    assert!(matches!(
        service.get_contact_by_id(created.id),
        Err(ServiceError::NotFound(_))
    ));
    assert!(service.get_all_contacts().unwrap().is_empty());

    let deleted_at: Option<i64> = conn
        .query_row(
            "SELECT deleted_at FROM contacts WHERE id = ?1;",
            [created.id],
            |row| row.get(0),
        )
        .unwrap();
    assert!(deleted_at.is_some());
}
