//! # forms2-model
//!
//! Adapters between forms and objects managed by an external
//! object-relational mapper:
//!
//! - [`mapped`] - The [`Mapped`]/[`MappedModel`] traits and column metadata
//! - [`convert`] - `model_to_dict` / `dict_to_model` with dotted-path keys
//! - [`choice`] - Choice fields whose options are mapped objects
//! - [`model_form`] - Forms generated from column metadata with save wiring
//!
//! Query execution, transactions, and SQL stay with the mapper; this crate
//! only translates between instances and form data.

pub mod choice;
pub mod convert;
pub mod mapped;
pub mod model_form;

pub use choice::{ModelChoiceField, ModelMultipleChoiceField};
pub use convert::{dict_to_model, model_to_dict, PATH_SEPARATOR};
pub use mapped::{ColumnDef, ColumnType, Mapped, MappedModel};
pub use model_form::{form_fields_for_model, ModelForm};
