//! Form field definitions and type-level cleaning.
//!
//! Each [`FieldDef`] describes a single form field: its type, requiredness,
//! presentation metadata, and widget attributes. The [`FieldType`] enum
//! carries the type-specific parsing parameters consumed by
//! [`clean_field_value`].
//!
//! Widget attributes are a plain string map handed through to whatever
//! rendering layer consumes the field; extensions use them to annotate
//! fields (e.g. a `readonly` marker) without this crate knowing about HTML.

use std::collections::HashMap;

use crate::value::Value;

/// Defines the type of a form field, including type-specific parameters.
///
/// Each variant carries the parameters needed for parsing and validating
/// raw string input. [`clean_field_value`] dispatches on this enum to
/// perform coercion and built-in validation.
#[derive(Debug, Clone)]
pub enum FieldType {
    /// A character (string) field.
    Char {
        /// Maximum length (characters).
        max_length: Option<usize>,
    },
    /// An integer field.
    Integer {
        /// Minimum allowed value.
        min_value: Option<i64>,
        /// Maximum allowed value.
        max_value: Option<i64>,
    },
    /// A floating-point field.
    Float,
    /// A boolean field (true/false).
    Boolean,
    /// A date field (YYYY-MM-DD).
    Date,
    /// A date-time field (YYYY-MM-DDTHH:MM:SS).
    DateTime,
    /// An email address field.
    Email,
    /// A single-choice field.
    Choice {
        /// Available choices as `(value, display_label)` pairs.
        choices: Vec<(String, String)>,
    },
    /// A multiple-choice field.
    MultipleChoice {
        /// Available choices as `(value, display_label)` pairs.
        choices: Vec<(String, String)>,
    },
}

/// Complete definition of a form field.
///
/// A `FieldDef` captures everything needed to parse, validate, and present
/// a single form field. Field sets are ordered collections of these (see
/// [`FieldMap`](crate::field_map::FieldMap)).
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// The field name.
    pub name: String,
    /// The field type, controlling parsing and coercion.
    pub field_type: FieldType,
    /// Whether this field is required.
    pub required: bool,
    /// Default/initial value.
    pub initial: Option<Value>,
    /// Human-readable label.
    pub label: String,
    /// Help text displayed alongside the field.
    pub help_text: String,
    /// Attributes handed to the rendering layer's widget.
    pub widget_attrs: HashMap<String, String>,
    /// Whether the field is disabled (rendered but not editable; cleaning
    /// uses the initial value and ignores submitted data).
    pub disabled: bool,
}

impl FieldDef {
    /// Creates a new `FieldDef` with sensible defaults.
    ///
    /// The field is required by default and carries no widget attributes.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        let label = name.replace('_', " ");
        Self {
            name,
            field_type,
            required: true,
            initial: None,
            label,
            help_text: String::new(),
            widget_attrs: HashMap::new(),
            disabled: false,
        }
    }

    /// Sets whether this field is required.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the initial value.
    pub fn initial(mut self, value: Value) -> Self {
        self.initial = Some(value);
        self
    }

    /// Sets the label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the help text.
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = text.into();
        self
    }

    /// Sets a widget attribute.
    pub fn widget_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.widget_attrs.insert(key.into(), value.into());
        self
    }

    /// Sets whether this field is disabled.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Cleans (validates and coerces) a raw form input string into a typed `Value`.
///
/// Performs the type-level validation pipeline:
/// 1. Required check
/// 2. Type coercion (string -> i64, date, etc.)
/// 3. Type-specific constraint validation (min/max, choices, email shape)
///
/// Returns the cleaned `Value` or a list of error messages.
pub fn clean_field_value(field: &FieldDef, raw: Option<&str>) -> Result<Value, Vec<String>> {
    let raw_str = raw.unwrap_or("");
    let is_empty = raw.is_none() || raw_str.is_empty();

    if field.required && is_empty {
        return Err(vec!["This field is required.".to_string()]);
    }

    if is_empty {
        return Ok(field.initial.clone().unwrap_or(Value::Null));
    }

    let mut errors = Vec::new();

    let value = match &field.field_type {
        FieldType::Char { max_length } => {
            if let Some(max) = max_length {
                if raw_str.chars().count() > *max {
                    errors.push(format!(
                        "Ensure this value has at most {max} characters (it has {}).",
                        raw_str.chars().count()
                    ));
                }
            }
            Value::String(raw_str.to_string())
        }

        FieldType::Integer {
            min_value,
            max_value,
        } => match raw_str.parse::<i64>() {
            Ok(n) => {
                if let Some(min) = min_value {
                    if n < *min {
                        errors.push(format!(
                            "Ensure this value is greater than or equal to {min}."
                        ));
                    }
                }
                if let Some(max) = max_value {
                    if n > *max {
                        errors.push(format!("Ensure this value is less than or equal to {max}."));
                    }
                }
                Value::Int(n)
            }
            Err(_) => {
                errors.push("Enter a whole number.".to_string());
                Value::Null
            }
        },

        FieldType::Float => match raw_str.parse::<f64>() {
            Ok(n) => Value::Float(n),
            Err(_) => {
                errors.push("Enter a number.".to_string());
                Value::Null
            }
        },

        FieldType::Boolean => {
            let val = matches!(raw_str.to_lowercase().as_str(), "true" | "1" | "yes" | "on");
            Value::Bool(val)
        }

        FieldType::Date => match chrono::NaiveDate::parse_from_str(raw_str, "%Y-%m-%d") {
            Ok(d) => Value::Date(d),
            Err(_) => {
                errors.push("Enter a valid date (YYYY-MM-DD).".to_string());
                Value::Null
            }
        },

        FieldType::DateTime => {
            let result = chrono::NaiveDateTime::parse_from_str(raw_str, "%Y-%m-%dT%H:%M:%S")
                .or_else(|_| chrono::NaiveDateTime::parse_from_str(raw_str, "%Y-%m-%d %H:%M:%S"));
            match result {
                Ok(dt) => Value::DateTime(dt),
                Err(_) => {
                    errors.push("Enter a valid date/time.".to_string());
                    Value::Null
                }
            }
        }

        FieldType::Email => {
            let email_re = regex::Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$")
                .expect("valid regex");
            if !email_re.is_match(raw_str) {
                errors.push("Enter a valid email address.".to_string());
            }
            Value::String(raw_str.to_string())
        }

        FieldType::Choice { choices } => {
            if !choices.iter().any(|(v, _)| v == raw_str) {
                errors.push(format!(
                    "Select a valid choice. {raw_str} is not one of the available choices."
                ));
            }
            Value::String(raw_str.to_string())
        }

        FieldType::MultipleChoice { choices } => {
            let mut selected = Vec::new();
            for s in raw_str.split(',') {
                let s = s.trim();
                if choices.iter().any(|(v, _)| v == s) {
                    selected.push(Value::String(s.to_string()));
                } else {
                    errors.push(format!(
                        "Select a valid choice. {s} is not one of the available choices."
                    ));
                }
            }
            Value::List(selected)
        }
    };

    if errors.is_empty() {
        Ok(value)
    } else {
        Err(errors)
    }
}
