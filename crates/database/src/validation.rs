//! Input validation for stored account and settings fields.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Invalid email format.
    InvalidEmail(String),
    /// Invalid phone number format.
    InvalidPhone(String),
    /// Invalid account handle.
    InvalidUsername(String),
    /// Invalid `HH:MM` clock time.
    InvalidClockTime(String),
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Empty value where one is required.
    Empty(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidEmail(msg) => write!(f, "Invalid email: {}", msg),
            ValidationError::InvalidPhone(msg) => write!(f, "Invalid phone number: {}", msg),
            ValidationError::InvalidUsername(msg) => write!(f, "Invalid username: {}", msg),
            ValidationError::InvalidClockTime(value) => {
                write!(f, "Invalid time '{}': expected HH:MM", value)
            }
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum allowed length for email addresses.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum allowed length for account handles.
pub const MAX_USERNAME_LENGTH: usize = 50;

/// Reject empty or whitespace-only values.
pub fn validate_required(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty(field.to_string()));
    }
    Ok(())
}

/// Validate an account handle (a leading `@` is allowed).
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let username = username.trim().trim_start_matches('@');

    if username.is_empty() {
        return Err(ValidationError::Empty("username".to_string()));
    }

    if username.len() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: MAX_USERNAME_LENGTH,
            actual: username.len(),
        });
    }

    if username.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidUsername(
            "must not contain whitespace".to_string(),
        ));
    }

    Ok(())
}

/// Validate the identity-challenge answer: an email address or a phone number.
pub fn validate_contact(contact: &str) -> Result<(), ValidationError> {
    let contact = contact.trim();
    if contact.contains('@') {
        validate_email(contact)
    } else {
        validate_phone(contact)
    }
}

/// Validate an email address (basic format check).
///
/// This is a basic validation that checks:
/// - Contains exactly one @
/// - Has at least one character before @
/// - Has at least one dot after @, not at either end
/// - Is not too long
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Empty("email".to_string()));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LENGTH,
            actual: email.len(),
        });
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ValidationError::InvalidEmail(
            "must contain exactly one @ symbol".to_string(),
        ));
    }

    let (local, domain) = (parts[0], parts[1]);

    if local.is_empty() {
        return Err(ValidationError::InvalidEmail(
            "missing local part (before @)".to_string(),
        ));
    }

    if domain.is_empty() {
        return Err(ValidationError::InvalidEmail(
            "missing domain (after @)".to_string(),
        ));
    }

    if !domain.contains('.') {
        return Err(ValidationError::InvalidEmail(
            "domain must contain at least one dot".to_string(),
        ));
    }

    if domain.starts_with('.') || domain.ends_with('.') || domain.contains("..") {
        return Err(ValidationError::InvalidEmail(
            "domain has misplaced dots".to_string(),
        ));
    }

    Ok(())
}

/// Validate a phone number: optional leading `+`, then digits, spaces or dashes.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Empty("phone".to_string()));
    }

    let body = phone.strip_prefix('+').unwrap_or(phone);
    if !body
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '-')
    {
        return Err(ValidationError::InvalidPhone(
            "only digits, spaces and dashes are allowed".to_string(),
        ));
    }

    let digits = body.chars().filter(char::is_ascii_digit).count();
    if digits < 5 {
        return Err(ValidationError::InvalidPhone("too few digits".to_string()));
    }

    Ok(())
}

/// Validate a 24-hour `HH:MM` clock time.
pub fn validate_clock_time(value: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidClockTime(value.to_string());

    let (hours, minutes) = value.trim().split_once(':').ok_or_else(invalid)?;
    if hours.len() != 2 || minutes.len() != 2 {
        return Err(invalid());
    }

    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    Ok(())
}
