//! Contact request validation.
//!
//! # Responsibility
//! - Check `ContactRequest` input against field rules before any storage access.
//! - Report every failing field in one pass with stable rule identifiers.
//!
//! # Invariants
//! - Validation is pure: no I/O, no shared mutable state.
//! - A validator is an explicit value owned by its caller; there is no
//!   process-wide instance.

use crate::model::contact::ContactRequest;
use regex::Regex;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

const EMAIL_PATTERN: &str =
    r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$";
const PHONE_PATTERN: &str = r"^\+?[0-9 ().-]+$";
const MIN_PHONE_CHARS: usize = 7;
const MAX_PHONE_CHARS: usize = 20;
const MIN_PHONE_DIGITS: usize = 7;

/// Field rule that rejected an input value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "rule", content = "limit")]
pub enum ValidationRule {
    /// Value is missing or blank.
    Required,
    /// Value is not a well-formed email address.
    Email,
    /// Value is not a well-formed phone number.
    Phone,
    /// Value exceeds the configured character limit.
    MaxLength(usize),
}

/// One failing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    #[serde(flatten)]
    pub rule: ValidationRule,
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.rule {
            ValidationRule::Required => write!(f, "{} is required", self.field),
            ValidationRule::Email => write!(f, "{} must be a valid email address", self.field),
            ValidationRule::Phone => write!(f, "{} must be a valid phone number", self.field),
            ValidationRule::MaxLength(limit) => {
                write!(f, "{} must be at most {limit} characters", self.field)
            }
        }
    }
}

/// Field-level validation failure for a contact request.
///
/// Never empty: a validator only builds one when at least one field fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Returns whether `field` failed with any rule.
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|error| error.field == field)
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed: ")?;
        for (index, error) in self.errors.iter().enumerate() {
            if index > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl Error for ValidationError {}

/// Tunable limits applied by `ContactValidator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// When set, an empty phone is rejected as `Required`.
    pub require_phone: bool,
    pub max_name_chars: usize,
    pub max_email_chars: usize,
    pub max_message_chars: usize,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            require_phone: false,
            max_name_chars: 100,
            max_email_chars: 254,
            max_message_chars: 5000,
        }
    }
}

/// Validation engine for contact requests.
#[derive(Debug, Clone)]
pub struct ContactValidator {
    policy: ValidationPolicy,
    email_re: Regex,
    phone_re: Regex,
}

impl Default for ContactValidator {
    fn default() -> Self {
        Self::new(ValidationPolicy::default())
    }
}

impl ContactValidator {
    /// Builds a validator for the given policy.
    pub fn new(policy: ValidationPolicy) -> Self {
        Self {
            policy,
            email_re: Regex::new(EMAIL_PATTERN).expect("valid email regex"),
            phone_re: Regex::new(PHONE_PATTERN).expect("valid phone regex"),
        }
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Validates all request fields.
    ///
    /// # Errors
    /// - Returns `ValidationError` listing failures in field order
    ///   `name`, `email`, `phone`, `message`.
    pub fn validate(&self, request: &ContactRequest) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        if request.name.trim().is_empty() {
            errors.push(field_error("name", ValidationRule::Required));
        } else if exceeds(&request.name, self.policy.max_name_chars) {
            errors.push(field_error(
                "name",
                ValidationRule::MaxLength(self.policy.max_name_chars),
            ));
        }

        if request.email.trim().is_empty() {
            errors.push(field_error("email", ValidationRule::Required));
        } else if exceeds(&request.email, self.policy.max_email_chars) {
            errors.push(field_error(
                "email",
                ValidationRule::MaxLength(self.policy.max_email_chars),
            ));
        } else if !self.email_re.is_match(&request.email) {
            errors.push(field_error("email", ValidationRule::Email));
        }

        if request.phone.is_empty() {
            if self.policy.require_phone {
                errors.push(field_error("phone", ValidationRule::Required));
            }
        } else if !self.is_valid_phone(&request.phone) {
            errors.push(field_error("phone", ValidationRule::Phone));
        }

        if exceeds(&request.message, self.policy.max_message_chars) {
            errors.push(field_error(
                "message",
                ValidationRule::MaxLength(self.policy.max_message_chars),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { errors })
        }
    }

    /// Length bounds include a leading `+`.
    fn is_valid_phone(&self, phone: &str) -> bool {
        let chars = phone.chars().count();
        (MIN_PHONE_CHARS..=MAX_PHONE_CHARS).contains(&chars)
            && self.phone_re.is_match(phone)
            && phone.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS
    }
}

fn field_error(field: &'static str, rule: ValidationRule) -> FieldError {
    FieldError { field, rule }
}

fn exceeds(value: &str, max_chars: usize) -> bool {
    value.chars().count() > max_chars
}
