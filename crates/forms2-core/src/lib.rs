//! # forms2-core
//!
//! Foundation types for the forms2-rs workspace: error types, the [`Value`]
//! enum, form field definitions, the ordered [`FieldMap`] field set, and the
//! [`Form`] trait with its [`BaseForm`] implementation.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result alias
//! - [`value`] - Field/attribute value representation
//! - [`fields`] - Field definitions and type-level cleaning
//! - [`field_map`] - Insertion-ordered field sets
//! - [`form`] - The form trait and base implementation
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod field_map;
pub mod fields;
pub mod form;
pub mod logging;
pub mod value;

// Re-export the most commonly used types at the crate root.
pub use error::{Forms2Error, Forms2Result, ValidationError};
pub use field_map::FieldMap;
pub use fields::{FieldDef, FieldType};
pub use form::{BaseForm, Form};
pub use value::Value;
