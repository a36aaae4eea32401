//! Transport-agnostic request adapter for contact use-cases.
//!
//! # Responsibility
//! - Bind raw payloads and path parameters to typed service calls.
//! - Map service outcomes to a status code plus the stable
//!   `{code, message, data}` envelope.
//!
//! # Invariants
//! - Adapter functions never panic; every outcome becomes an `ApiReply`.
//! - The three service error kinds map to distinct status codes.

use contactdesk_core::{
    Contact, ContactId, ContactRepository, ContactRequest, ContactService, ServiceError,
};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const STATUS_OK: u16 = 200;
pub const STATUS_CREATED: u16 = 201;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_UNPROCESSABLE: u16 = 422;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// Response envelope shared by every operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub code: String,
    pub message: String,
    /// Serialized as `null` when absent.
    pub data: Option<Value>,
}

impl ApiResponse {
    fn new(code: &str, message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            data,
        }
    }
}

/// Status code plus envelope, ready for any transport to write out.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    pub status: u16,
    pub body: ApiResponse,
}

impl ApiReply {
    fn new(status: u16, body: ApiResponse) -> Self {
        Self { status, body }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            STATUS_BAD_REQUEST,
            ApiResponse::new("BAD_REQUEST", message, None),
        )
    }

    fn internal_error(message: impl Into<String>) -> Self {
        Self::new(
            STATUS_INTERNAL_ERROR,
            ApiResponse::new("INTERNAL_SERVER_ERROR", message, None),
        )
    }

    /// Renders the envelope as a JSON document.
    pub fn body_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Wire projection of a contact; the tombstone is never exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactResponse {
    pub id: ContactId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<&Contact> for ContactResponse {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id,
            name: contact.full_name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            message: contact.message.clone(),
            created_at: contact.created_at,
            updated_at: contact.updated_at,
        }
    }
}

/// Adapter over a `ContactService`.
pub struct ContactApi<R: ContactRepository> {
    service: ContactService<R>,
}

impl<R: ContactRepository> ContactApi<R> {
    pub fn new(service: ContactService<R>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &ContactService<R> {
        &self.service
    }

    /// Creates a contact from a JSON `ContactRequest` payload.
    pub fn create_contact(&self, body: &str) -> ApiReply {
        let reply = match decode_request(body) {
            Ok(request) => match self.service.create_contact(&request) {
                Ok(contact) => contact_reply(
                    STATUS_CREATED,
                    "CREATED",
                    "Contact created successfully",
                    &contact,
                ),
                Err(err) => error_reply(&err),
            },
            Err(reply) => reply,
        };
        log_reply("create", &reply);
        reply
    }

    /// Lists active contacts; `data` is `[]` when there are none.
    pub fn list_contacts(&self) -> ApiReply {
        let reply = match self.service.get_all_contacts() {
            Ok(contacts) => {
                let items = contacts
                    .iter()
                    .map(ContactResponse::from)
                    .collect::<Vec<_>>();
                match encode_data(&items) {
                    Ok(data) => success_reply(
                        STATUS_OK,
                        "SUCCESS",
                        "Contacts retrieved successfully",
                        Some(data),
                    ),
                    Err(reply) => reply,
                }
            }
            Err(err) => error_reply(&err),
        };
        log_reply("list", &reply);
        reply
    }

    pub fn get_contact(&self, id_param: &str) -> ApiReply {
        let reply = match parse_id(id_param) {
            Ok(id) => match self.service.get_contact_by_id(id) {
                Ok(contact) => contact_reply(
                    STATUS_OK,
                    "SUCCESS",
                    "Contact retrieved successfully",
                    &contact,
                ),
                Err(err) => error_reply(&err),
            },
            Err(reply) => reply,
        };
        log_reply("get", &reply);
        reply
    }

    pub fn update_contact(&self, id_param: &str, body: &str) -> ApiReply {
        let reply = match parse_id(id_param).and_then(|id| Ok((id, decode_request(body)?))) {
            Ok((id, request)) => match self.service.update_contact(id, &request) {
                Ok(contact) => contact_reply(
                    STATUS_OK,
                    "SUCCESS",
                    "Contact updated successfully",
                    &contact,
                ),
                Err(err) => error_reply(&err),
            },
            Err(reply) => reply,
        };
        log_reply("update", &reply);
        reply
    }

    pub fn delete_contact(&self, id_param: &str) -> ApiReply {
        let reply = match parse_id(id_param) {
            Ok(id) => match self.service.delete_contact(id) {
                Ok(()) => success_reply(
                    STATUS_OK,
                    "SUCCESS",
                    "Contact deleted successfully",
                    None,
                ),
                Err(err) => error_reply(&err),
            },
            Err(reply) => reply,
        };
        log_reply("delete", &reply);
        reply
    }
}

fn decode_request(body: &str) -> Result<ContactRequest, ApiReply> {
    serde_json::from_str(body).map_err(|err| ApiReply::bad_request(err.to_string()))
}

fn parse_id(id_param: &str) -> Result<ContactId, ApiReply> {
    match id_param.trim().parse::<ContactId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiReply::bad_request("Invalid ID")),
    }
}

fn success_reply(status: u16, code: &str, message: &str, data: Option<Value>) -> ApiReply {
    ApiReply::new(status, ApiResponse::new(code, message, data))
}

fn contact_reply(status: u16, code: &str, message: &str, contact: &Contact) -> ApiReply {
    match encode_data(ContactResponse::from(contact)) {
        Ok(data) => success_reply(status, code, message, Some(data)),
        Err(reply) => reply,
    }
}

/// Encodes envelope data; a failure becomes a 500 reply, never `data: null`.
fn encode_data(data: impl Serialize) -> Result<Value, ApiReply> {
    serde_json::to_value(data)
        .map_err(|err| ApiReply::internal_error(format!("failed to encode response data: {err}")))
}

fn error_reply(err: &ServiceError) -> ApiReply {
    match err {
        ServiceError::Validation(validation) => match encode_data(&validation.errors) {
            Ok(details) => ApiReply::new(
                STATUS_UNPROCESSABLE,
                ApiResponse::new("VALIDATION_ERROR", validation.to_string(), Some(details)),
            ),
            Err(reply) => reply,
        },
        ServiceError::NotFound(_) => ApiReply::new(
            STATUS_NOT_FOUND,
            ApiResponse::new("NOT_FOUND", "Contact not found", None),
        ),
        ServiceError::Persistence(cause) => ApiReply::internal_error(cause.to_string()),
    }
}

fn log_reply(operation: &str, reply: &ApiReply) {
    debug!(
        "event=api_reply module=api op={operation} status={} code={}",
        reply.status, reply.body.code
    );
}
