//! # Payment Error Types
//!
//! Typed error handling for the boxpaper payment core.
//! Every failure here is a client-input or context problem; none are retryable.

use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

/// What a single field failed to satisfy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    /// Required field is absent
    Missing,
    /// Field is present but has the wrong JSON type
    WrongType { expected: Cow<'static, str> },
    /// Number must be strictly greater than the bound
    GreaterThan { bound: i64 },
    /// Text must have at least this many characters
    MinLength { min: usize },
    /// Sequence must have at least this many entries
    MinItems { min: usize },
    /// Value is not one of the allowed enumeration values
    InvalidEnum {
        value: String,
        allowed: Vec<&'static str>,
    },
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Missing => write!(f, "field required"),
            Constraint::WrongType { expected } => write!(f, "expected {}", expected),
            Constraint::GreaterThan { bound } => write!(f, "must be greater than {}", bound),
            Constraint::MinLength { min } => {
                write!(f, "must have at least {} character(s)", min)
            }
            Constraint::MinItems { min } => write!(f, "must have at least {} item(s)", min),
            Constraint::InvalidEnum { value, allowed } => write!(
                f,
                "invalid enumeration value '{}' (expected one of: {})",
                value,
                allowed.join(", ")
            ),
        }
    }
}

/// A constraint failure on one field path (e.g. `items[0].price`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub constraint: Constraint,
}

impl Violation {
    pub fn new(field: impl Into<String>, constraint: Constraint) -> Self {
        Self {
            field: field.into(),
            constraint,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.constraint)
    }
}

/// Every violation found in one validation pass, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, violation: Violation) {
        self.0.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    /// Check whether any violation was reported for `field`
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|v| v.field == field)
    }

    /// Find the first violation reported for `field`
    pub fn for_field(&self, field: &str) -> Option<&Violation> {
        self.0.iter().find(|v| v.field == field)
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

impl FromIterator<Violation> for Violations {
    fn from_iter<I: IntoIterator<Item = Violation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Body is not a parseable JSON object
    #[error("Malformed request body: {0}")]
    MalformedInput(String),

    /// One or more fields failed their constraints
    #[error("{0}")]
    SchemaViolation(Violations),

    /// Invocation context cannot yield an order identifier
    #[error("Invalid request context: {0}")]
    InvalidContext(String),

    /// Bad provider table or environment
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Response body could not be rendered
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PaymentError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::MalformedInput(_) => 400,
            PaymentError::SchemaViolation(_) => 400,
            PaymentError::InvalidContext(_) => 500,
            PaymentError::Configuration(_) => 500,
            PaymentError::Serialization(_) => 500,
        }
    }

    /// Returns true if the caller sent something wrong
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Violations carried by a schema failure, if any
    pub fn violations(&self) -> Option<&Violations> {
        match self {
            PaymentError::SchemaViolation(v) => Some(v),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for PaymentError {
    fn from(err: serde_json::Error) -> Self {
        PaymentError::Serialization(err.to_string())
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;
