//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (e.g., positive identifiers,
//! normalized/validated email, bounded names) so that once a value reaches
//! the domain layer it can be treated as trusted.
use std::fmt::{Display, Formatter};
use std::ops::Deref;

use chrono::NaiveDate;
use phonenumber::{Mode, parse};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidateEmail;

pub const NAME_MIN_LENGTH: usize = 2;
pub const NAME_MAX_LENGTH: usize = 50;
pub const USERNAME_MIN_LENGTH: usize = 3;
pub const USERNAME_MAX_LENGTH: usize = 50;
pub const EMAIL_MAX_LENGTH: usize = 150;
pub const NOTE_MAX_LENGTH: usize = 255;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided string is shorter than allowed.
    #[error("value must be at least {0} characters long")]
    TooShort(usize),
    /// Provided string is longer than allowed.
    #[error("value must be at most {0} characters long")]
    TooLong(usize),
    /// Phone number did not meet expected format.
    #[error("invalid phone number")]
    InvalidPhone,
    /// Date lies after the reference day.
    #[error("date cannot be in the future")]
    FutureDate,
}

/// Normalizes and validates an email string.
fn normalize_email<S: Into<String>>(email: S) -> Result<String, TypeConstraintError> {
    let normalized = email.into().trim().to_lowercase();
    if normalized.chars().count() > EMAIL_MAX_LENGTH {
        return Err(TypeConstraintError::TooLong(EMAIL_MAX_LENGTH));
    }
    if normalized.validate_email() {
        Ok(normalized)
    } else {
        Err(TypeConstraintError::InvalidEmail)
    }
}

/// Trims the value and checks its length in characters.
fn bounded_string<S: Into<String>>(
    value: S,
    min: usize,
    max: usize,
) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    let len = trimmed.chars().count();
    if len == 0 {
        return Err(TypeConstraintError::EmptyString);
    }
    if len < min {
        return Err(TypeConstraintError::TooShort(min));
    }
    if len > max {
        return Err(TypeConstraintError::TooLong(max));
    }
    Ok(trimmed)
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(UserId, "Unique identifier for a registered user.");
id_newtype!(ContactId, "Unique identifier for a contact.");
id_newtype!(RefreshTokenId, "Unique identifier for a stored refresh token.");

/// Shared accessors and conversions for string-backed value objects.
macro_rules! string_newtype_impls {
    ($name:ident) => {
        impl $name {
            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

macro_rules! email_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            /// Validates and normalizes an email string.
            pub fn new<S: Into<String>>(email: S) -> Result<Self, TypeConstraintError> {
                Ok(Self(normalize_email(email)?))
            }
        }

        string_newtype_impls!($name);
    };
}

email_newtype!(UserEmail, "Lower-cased and validated account email.");
email_newtype!(ContactEmail, "Lower-cased and validated contact email.");

macro_rules! bounded_string_newtype {
    ($name:ident, $min:expr, $max:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed value within the allowed length.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                Ok(Self(bounded_string(value, $min, $max)?))
            }
        }

        string_newtype_impls!($name);
    };
}

bounded_string_newtype!(
    PersonName,
    NAME_MIN_LENGTH,
    NAME_MAX_LENGTH,
    "First or last name of a contact."
);

bounded_string_newtype!(
    Username,
    USERNAME_MIN_LENGTH,
    USERNAME_MAX_LENGTH,
    "Login name of a registered user."
);

/// Free-form note attached to a contact, stripped of unsafe HTML.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ContactNote(String);

impl ContactNote {
    /// Constructs a trimmed, non-empty value of at most [`NOTE_MAX_LENGTH`]
    /// characters.
    ///
    /// The length is checked on the text as submitted. Plain text is kept
    /// verbatim; input carrying markup is replaced by its sanitized form.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let raw = bounded_string(value.into(), 1, NOTE_MAX_LENGTH)?;
        let sanitized = ammonia::clean(&raw);
        if sanitized == escape_text(&raw) {
            return Ok(Self(raw));
        }
        if sanitized.trim().is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(sanitized.trim().to_string()))
    }

    /// Wraps a note loaded from storage, where it was validated on write.
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }
}

/// Escapes text the way the HTML serializer behind `ammonia` does.
fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\u{a0}' => escaped.push_str("&nbsp;"),
            other => escaped.push(other),
        }
    }
    escaped
}

string_newtype_impls!(ContactNote);

/// Normalizes a phone number string to E.164 format.
pub fn normalize_phone_to_e164(value: &str) -> Result<String, TypeConstraintError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TypeConstraintError::EmptyString);
    }
    let parsed = parse(None, trimmed).map_err(|_| TypeConstraintError::InvalidPhone)?;
    Ok(parsed.format().mode(Mode::E164).to_string())
}

/// Normalized phone number wrapper (expected E.164).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Constructs a phone number ensuring it is valid and normalizes to E.164 format.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let normalized = normalize_phone_to_e164(&value.into())?;
        Ok(Self(normalized))
    }
}

string_newtype_impls!(PhoneNumber);

/// Date of birth that is not later than the day it was validated against.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Birthday(NaiveDate);

impl Birthday {
    /// Accepts `date` when it does not lie after `today`.
    pub fn new(date: NaiveDate, today: NaiveDate) -> Result<Self, TypeConstraintError> {
        if date > today {
            return Err(TypeConstraintError::FutureDate);
        }
        Ok(Self(date))
    }

    /// Wraps a date loaded from storage, where it was validated on write.
    pub const fn from_stored(date: NaiveDate) -> Self {
        Self(date)
    }

    pub const fn get(self) -> NaiveDate {
        self.0
    }
}

impl Display for Birthday {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
