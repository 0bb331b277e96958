//! Error types for the forms2-rs crates.
//!
//! This module provides the [`Forms2Error`] enum shared by all crates in the
//! workspace, covering configuration errors (malformed access policies,
//! models without a primary key), validation errors, and attribute lookup
//! failures in mapped-object conversion.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// Represents a validation error for a single field value.
///
/// Validation errors carry a message, a short machine-readable code, and
/// optional parameters. The message is rendered eagerly — parameters are
/// interpolated when the error is constructed, so `Display` never contains
/// unexpanded placeholders.
///
/// # Examples
///
/// ```
/// use forms2_core::error::ValidationError;
///
/// let err = ValidationError::new("This field is required.", "required");
/// assert_eq!(err.to_string(), "This field is required.");
///
/// let err = ValidationError::new("Value 42 is not a valid choice.", "invalid_choice")
///     .with_param("value", "42");
/// assert_eq!(err.params.get("value").unwrap(), "42");
/// ```
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The fully rendered error message.
    pub message: String,
    /// A short code identifying the type of failure (e.g. "required", "invalid_choice").
    pub code: String,
    /// Additional parameters providing context for the error.
    pub params: HashMap<String, String>,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            params: HashMap::new(),
        }
    }

    /// Adds a parameter to this validation error.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// The primary error type for the forms2-rs workspace.
///
/// Configuration errors are raised at construction time (policy builders,
/// field generation) so that a misconfigured form type fails before any
/// request touches it. Validation errors are raised while cleaning data.
#[derive(Error, Debug)]
pub enum Forms2Error {
    /// A policy, field set, or model definition is malformed.
    ///
    /// Raised at construction time: overlapping access selectors, selectors
    /// naming undeclared fields, models without a primary key column.
    #[error("Improperly configured: {0}")]
    ImproperlyConfigured(String),

    /// A field value failed validation.
    #[error("Validation error: {0}")]
    Validation(ValidationError),

    /// A mapped attribute named in a conversion path does not exist,
    /// or an intermediate path segment is not a mapped object.
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    /// A lookup by primary key found no matching object.
    #[error("Object does not exist: {0}")]
    DoesNotExist(String),

    /// A form was saved before being successfully validated.
    #[error("Form is not valid: {0}")]
    InvalidForm(String),
}

impl From<ValidationError> for Forms2Error {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

/// A convenience type alias for `Result<T, Forms2Error>`.
pub type Forms2Result<T> = Result<T, Forms2Error>;
