//! Contact repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over canonical `contacts` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every read path filters tombstoned rows through `select_contacts`;
//!   no call site re-checks `deleted_at` on its own.
//! - `delete` is logical: it sets `deleted_at` and never removes a row.
//! - Writes only ever target active rows.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::contact::{Contact, ContactId};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

const CONTACT_SELECT_SQL: &str = "SELECT
    id,
    full_name,
    email,
    phone,
    message,
    created_at,
    updated_at,
    deleted_at
FROM contacts";

const CONTACTS_TABLE: &str = "contacts";
const REQUIRED_CONTACT_COLUMNS: &[&str] = &[
    "id",
    "full_name",
    "email",
    "phone",
    "message",
    "created_at",
    "updated_at",
    "deleted_at",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for contact persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// No active contact carries this id.
    NotFound(ContactId),
    /// `create` was handed a contact that already has an id.
    AlreadyPersisted(ContactId),
    InvalidData(String),
    /// Backend cannot serve requests (e.g. poisoned in-memory store).
    Unavailable(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "contact not found: {id}"),
            Self::AlreadyPersisted(id) => write!(f, "contact {id} is already persisted"),
            Self::InvalidData(message) => write!(f, "invalid persisted contact data: {message}"),
            Self::Unavailable(message) => write!(f, "contact storage unavailable: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it through db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Which rows a query may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Visibility {
    ActiveOnly,
    IncludeDeleted,
}

/// Repository interface for contact CRUD operations.
///
/// Every read method returns active contacts only.
pub trait ContactRepository {
    /// Persists a new contact and assigns its `id` and timestamps in place.
    fn create(&self, contact: &mut Contact) -> RepoResult<()>;
    /// Lists all active contacts in insertion order.
    fn find_all(&self) -> RepoResult<Vec<Contact>>;
    /// Loads one active contact, or `RepoError::NotFound`.
    fn find_by_id(&self, id: ContactId) -> RepoResult<Contact>;
    /// Overwrites mutable fields of an active contact and refreshes `updated_at`.
    fn update(&self, contact: &mut Contact) -> RepoResult<()>;
    /// Tombstones an active contact and records `deleted_at` in place.
    fn delete(&self, contact: &mut Contact) -> RepoResult<()>;
}

/// SQLite-backed contact repository.
pub struct SqliteContactRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContactRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` on schema drift.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    /// Loads a contact regardless of tombstone state.
    ///
    /// Audit path only; service code goes through `ContactRepository`.
    pub fn find_any_by_id(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        Ok(self
            .select_contacts(Some(id), Visibility::IncludeDeleted)?
            .into_iter()
            .next())
    }

    fn select_contacts(
        &self,
        id: Option<ContactId>,
        visibility: Visibility,
    ) -> RepoResult<Vec<Contact>> {
        let mut sql = format!("{CONTACT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if visibility == Visibility::ActiveOnly {
            sql.push_str(" AND deleted_at IS NULL");
        }

        if let Some(id) = id {
            sql.push_str(" AND id = ?");
            bind_values.push(Value::Integer(id));
        }

        sql.push_str(" ORDER BY id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut contacts = Vec::new();

        while let Some(row) = rows.next()? {
            contacts.push(parse_contact_row(row)?);
        }

        Ok(contacts)
    }
}

impl ContactRepository for SqliteContactRepository<'_> {
    fn create(&self, contact: &mut Contact) -> RepoResult<()> {
        if contact.is_persisted() {
            return Err(RepoError::AlreadyPersisted(contact.id));
        }

        let now = now_epoch_ms();
        self.conn.execute(
            "INSERT INTO contacts (
                full_name,
                email,
                phone,
                message,
                created_at,
                updated_at,
                deleted_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?5, NULL);",
            params![
                contact.full_name.as_str(),
                contact.email.as_str(),
                contact.phone.as_str(),
                contact.message.as_str(),
                now,
            ],
        )?;

        contact.id = self.conn.last_insert_rowid();
        contact.created_at = now;
        contact.updated_at = now;
        contact.deleted_at = None;
        Ok(())
    }

    fn find_all(&self) -> RepoResult<Vec<Contact>> {
        self.select_contacts(None, Visibility::ActiveOnly)
    }

    fn find_by_id(&self, id: ContactId) -> RepoResult<Contact> {
        self.select_contacts(Some(id), Visibility::ActiveOnly)?
            .into_iter()
            .next()
            .ok_or(RepoError::NotFound(id))
    }

    fn update(&self, contact: &mut Contact) -> RepoResult<()> {
        let now = now_epoch_ms();
        let changed = self.conn.execute(
            "UPDATE contacts
             SET
                full_name = ?2,
                email = ?3,
                phone = ?4,
                message = ?5,
                updated_at = ?6
             WHERE id = ?1
               AND deleted_at IS NULL;",
            params![
                contact.id,
                contact.full_name.as_str(),
                contact.email.as_str(),
                contact.phone.as_str(),
                contact.message.as_str(),
                now,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(contact.id));
        }

        contact.updated_at = now;
        Ok(())
    }

    fn delete(&self, contact: &mut Contact) -> RepoResult<()> {
        let now = now_epoch_ms();
        let changed = self.conn.execute(
            "UPDATE contacts
             SET
                deleted_at = ?2,
                updated_at = ?2
             WHERE id = ?1
               AND deleted_at IS NULL;",
            params![contact.id, now],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(contact.id));
        }

        contact.soft_delete(now);
        Ok(())
    }
}

/// Current wall-clock time in Unix epoch milliseconds.
pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [CONTACTS_TABLE],
        |row| row.get(0),
    )?;
    if !table_exists {
        return Err(RepoError::MissingRequiredTable(CONTACTS_TABLE));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([CONTACTS_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    for &column in REQUIRED_CONTACT_COLUMNS {
        if !columns.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: CONTACTS_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn parse_contact_row(row: &Row<'_>) -> RepoResult<Contact> {
    let id: ContactId = row.get("id")?;
    if id <= 0 {
        return Err(RepoError::InvalidData(format!(
            "invalid id value `{id}` in contacts.id"
        )));
    }

    Ok(Contact {
        id,
        full_name: row.get("full_name")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        message: row.get("message")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        deleted_at: row.get("deleted_at")?,
    })
}
