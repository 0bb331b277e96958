//! Form trait and `BaseForm` implementation.
//!
//! The [`Form`] trait is the core abstraction for form types. It supports
//! async validation (so cross-field `clean` hooks can hit external state),
//! data binding from raw string pairs, and access to errors and cleaned data.
//!
//! [`BaseForm`] is a concrete, general-purpose implementation constructed
//! from a [`FieldMap`]. Extensions that filter or annotate fields run
//! *before* construction: they transform the `FieldMap` and hand the result
//! to [`BaseForm::new`], so a form never exposes fields its caller is not
//! allowed to see.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::field_map::FieldMap;
use crate::fields::clean_field_value;
use crate::value::Value;

/// The core form trait. All form types implement this.
///
/// `is_valid()` and `clean()` are async because cross-field validation
/// commonly requires external lookups (uniqueness checks, permission data).
/// All implementations must be `Send + Sync` to work safely across async
/// task boundaries.
#[async_trait]
pub trait Form: Send + Sync {
    /// Returns the form's field set.
    fn fields(&self) -> &FieldMap;

    /// Binds raw form data to this form.
    fn bind(&mut self, data: &HashMap<String, String>);

    /// Returns `true` if this form has been bound to data.
    fn is_bound(&self) -> bool;

    /// Validates the form asynchronously. Returns `true` if valid.
    ///
    /// After calling this, `errors()` and `cleaned_data()` are populated.
    async fn is_valid(&mut self) -> bool;

    /// Returns per-field validation errors.
    ///
    /// Keys are field names, values are lists of error messages.
    fn errors(&self) -> &HashMap<String, Vec<String>>;

    /// Returns the cleaned (validated and coerced) data.
    ///
    /// Only populated after a successful call to `is_valid()`.
    fn cleaned_data(&self) -> &HashMap<String, Value>;

    /// Cross-field validation hook. Override to add form-level validation.
    ///
    /// The default implementation does nothing.
    async fn clean(&self) -> Result<(), HashMap<String, Vec<String>>> {
        Ok(())
    }
}

/// A general-purpose form implementation.
///
/// `BaseForm` holds an ordered field set and manages binding, validation,
/// and cleaned data.
pub struct BaseForm {
    field_map: FieldMap,
    bound: bool,
    raw_data: HashMap<String, Option<String>>,
    errors: HashMap<String, Vec<String>>,
    cleaned_data: HashMap<String, Value>,
}

impl BaseForm {
    /// Creates a new `BaseForm` with the given field set.
    pub fn new(fields: FieldMap) -> Self {
        Self {
            field_map: fields,
            bound: false,
            raw_data: HashMap::new(),
            errors: HashMap::new(),
            cleaned_data: HashMap::new(),
        }
    }

    /// Returns the non-field (form-level) errors.
    pub fn non_field_errors(&self) -> &[String] {
        self.errors.get("__all__").map_or(&[], Vec::as_slice)
    }
}

#[async_trait]
impl Form for BaseForm {
    fn fields(&self) -> &FieldMap {
        &self.field_map
    }

    fn bind(&mut self, data: &HashMap<String, String>) {
        self.bound = true;
        self.raw_data.clear();
        self.errors.clear();
        self.cleaned_data.clear();

        for field in &self.field_map {
            self.raw_data
                .insert(field.name.clone(), data.get(&field.name).cloned());
        }
    }

    fn is_bound(&self) -> bool {
        self.bound
    }

    async fn is_valid(&mut self) -> bool {
        if !self.bound {
            return false;
        }

        self.errors.clear();
        self.cleaned_data.clear();

        // Field-level validation; errors accumulate across fields.
        for field in &self.field_map {
            if field.disabled {
                // Disabled fields use their initial value and skip validation.
                if let Some(initial) = &field.initial {
                    self.cleaned_data.insert(field.name.clone(), initial.clone());
                }
                continue;
            }

            let raw = self.raw_data.get(&field.name).and_then(|v| v.as_deref());
            match clean_field_value(field, raw) {
                Ok(value) => {
                    self.cleaned_data.insert(field.name.clone(), value);
                }
                Err(field_errors) => {
                    self.errors.insert(field.name.clone(), field_errors);
                }
            }
        }

        // Form-level cross-field validation (async).
        if let Err(form_errors) = self.clean().await {
            for (key, msgs) in form_errors {
                self.errors.entry(key).or_default().extend(msgs);
            }
        }

        if !self.errors.is_empty() {
            tracing::debug!(fields = self.errors.len(), "form validation failed");
        }

        self.errors.is_empty()
    }

    fn errors(&self) -> &HashMap<String, Vec<String>> {
        &self.errors
    }

    fn cleaned_data(&self) -> &HashMap<String, Value> {
        &self.cleaned_data
    }
}
