//! Choice fields backed by mapped objects.
//!
//! [`ModelChoiceField`] presents a set of already-loaded mapped objects as
//! form choices: values are primary keys, labels come from the instance.
//! Executing the query that loads the objects is the caller's business;
//! these fields only translate between instances and submitted values.

use std::fmt;

use forms2_core::{Forms2Error, Forms2Result, ValidationError, Value};

use crate::mapped::{ColumnDef, MappedModel};

/// A single-selection choice field over mapped objects.
///
/// The label defaults to the instance's `Debug` representation and can be
/// overridden with [`with_label`](Self::with_label).
pub struct ModelChoiceField<M: MappedModel> {
    objects: Vec<M>,
    label_fn: Option<Box<dyn Fn(&M) -> String + Send + Sync>>,
}

impl<M: MappedModel + fmt::Debug> ModelChoiceField<M> {
    /// Creates a choice field over the given objects.
    ///
    /// # Errors
    ///
    /// Returns [`Forms2Error::ImproperlyConfigured`] if the model declares
    /// no primary key column — selections could not be mapped back to
    /// objects.
    pub fn new(objects: Vec<M>) -> Forms2Result<Self> {
        if M::pk_column().is_none() {
            return Err(Forms2Error::ImproperlyConfigured(
                "model choice fields require a model with a primary key column".to_string(),
            ));
        }
        Ok(Self {
            objects,
            label_fn: None,
        })
    }

    /// Overrides how labels are derived from instances.
    #[must_use]
    pub fn with_label<F>(mut self, label_fn: F) -> Self
    where
        F: Fn(&M) -> String + Send + Sync + 'static,
    {
        self.label_fn = Some(Box::new(label_fn));
        self
    }

    /// Returns the model's primary key column.
    pub fn primary_key(&self) -> &'static ColumnDef {
        M::pk_column().expect("checked at construction")
    }

    /// Returns the display label for an instance.
    pub fn label_from_instance(&self, obj: &M) -> String {
        self.label_fn
            .as_ref()
            .map_or_else(|| format!("{obj:?}"), |f| f(obj))
    }

    /// Returns the submit value for an instance: its primary key.
    pub fn prepare_value(&self, obj: &M) -> Value {
        obj.pk().unwrap_or(Value::Null)
    }

    /// Returns `(value, label)` pairs for rendering.
    pub fn choices(&self) -> Vec<(String, String)> {
        self.objects
            .iter()
            .map(|o| (self.prepare_value(o).to_string(), self.label_from_instance(o)))
            .collect()
    }

    /// Converts a submitted value back into an instance.
    ///
    /// `None` and null values convert to `None` (no selection). Anything
    /// else must equal the primary key of one of the field's objects.
    ///
    /// # Errors
    ///
    /// Returns a validation error (code `invalid_choice`) with the rejected
    /// value interpolated into the message.
    pub fn to_python(&self, raw: Option<&Value>) -> Forms2Result<Option<&M>> {
        let Some(raw) = raw else {
            return Ok(None);
        };
        if raw.is_null() {
            return Ok(None);
        }
        self.objects
            .iter()
            .find(|o| o.pk().as_ref() == Some(raw))
            .map(Some)
            .ok_or_else(|| {
                ValidationError::new(
                    format!(
                        "Select a valid choice. {raw} is not one of the available choices."
                    ),
                    "invalid_choice",
                )
                .with_param("value", raw.to_string())
                .into()
            })
    }
}

impl<M: MappedModel + fmt::Debug> fmt::Debug for ModelChoiceField<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelChoiceField")
            .field("objects", &self.objects)
            .finish_non_exhaustive()
    }
}

/// A multiple-selection choice field over mapped objects.
pub struct ModelMultipleChoiceField<M: MappedModel> {
    field: ModelChoiceField<M>,
}

impl<M: MappedModel + fmt::Debug> ModelMultipleChoiceField<M> {
    /// Creates a multiple-choice field over the given objects.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ModelChoiceField::new`].
    pub fn new(objects: Vec<M>) -> Forms2Result<Self> {
        Ok(Self {
            field: ModelChoiceField::new(objects)?,
        })
    }

    /// Overrides how labels are derived from instances.
    #[must_use]
    pub fn with_label<F>(mut self, label_fn: F) -> Self
    where
        F: Fn(&M) -> String + Send + Sync + 'static,
    {
        self.field = self.field.with_label(label_fn);
        self
    }

    /// Returns the submit value for an instance: its primary key.
    pub fn prepare_value(&self, obj: &M) -> Value {
        self.field.prepare_value(obj)
    }

    /// Returns the submit values for a list of instances.
    pub fn prepare_values(&self, objs: &[M]) -> Vec<Value> {
        objs.iter().map(|o| self.field.prepare_value(o)).collect()
    }

    /// Validates a submitted list of values into instances.
    ///
    /// # Errors
    ///
    /// Returns a `required` validation error for a missing or empty list,
    /// and an `invalid_choice` error for any value that is null or matches
    /// no object.
    pub fn clean(&self, raw: Option<&[Value]>) -> Forms2Result<Vec<&M>> {
        let Some(raw) = raw else {
            return Err(ValidationError::new("This field is required.", "required").into());
        };
        if raw.is_empty() {
            return Err(ValidationError::new("This field is required.", "required").into());
        }

        let mut selected = Vec::with_capacity(raw.len());
        for value in raw {
            match self.field.to_python(Some(value))? {
                Some(obj) => selected.push(obj),
                None => {
                    return Err(ValidationError::new(
                        "Select a valid choice. null is not one of the available choices.",
                        "invalid_choice",
                    )
                    .into())
                }
            }
        }
        Ok(selected)
    }
}

impl<M: MappedModel + fmt::Debug> fmt::Debug for ModelMultipleChoiceField<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelMultipleChoiceField")
            .field("field", &self.field)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapped::{ColumnType, Mapped};
    use async_trait::async_trait;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Tag {
        id: Option<i64>,
        name: String,
    }

    impl Tag {
        fn new(id: i64, name: &str) -> Self {
            Self {
                id: Some(id),
                name: name.to_string(),
            }
        }
    }

    impl Mapped for Tag {
        fn attribute(&self, name: &str) -> Option<Value> {
            match name {
                "id" => Some(self.id.into()),
                "name" => Some(Value::String(self.name.clone())),
                _ => None,
            }
        }

        fn set_attribute(&mut self, name: &str, value: Value) -> Forms2Result<()> {
            match name {
                "id" => {
                    self.id = match value {
                        Value::Int(n) => Some(n),
                        _ => None,
                    };
                    Ok(())
                }
                "name" => {
                    self.name = value.as_str().unwrap_or_default().to_string();
                    Ok(())
                }
                _ => Err(Forms2Error::UnknownAttribute(name.to_string())),
            }
        }
    }

    #[async_trait]
    impl MappedModel for Tag {
        fn columns() -> &'static [ColumnDef] {
            const COLUMNS: &[ColumnDef] = &[
                ColumnDef::new("id", ColumnType::Integer).primary_key(),
                ColumnDef::new("name", ColumnType::Text),
            ];
            COLUMNS
        }

        fn pk(&self) -> Option<Value> {
            self.id.map(Value::Int)
        }

        async fn save(&mut self) -> Forms2Result<()> {
            Ok(())
        }
    }

    fn tags() -> Vec<Tag> {
        vec![Tag::new(1, "rust"), Tag::new(2, "forms")]
    }

    #[test]
    fn test_default_label_is_debug_repr() {
        let field = ModelChoiceField::new(tags()).unwrap();
        let tag = Tag::new(1, "rust");
        assert_eq!(field.label_from_instance(&tag), format!("{tag:?}"));
    }

    #[test]
    fn test_label_override() {
        let field = ModelChoiceField::new(tags())
            .unwrap()
            .with_label(|t: &Tag| t.name.clone());
        assert_eq!(field.label_from_instance(&Tag::new(1, "rust")), "rust");
    }

    #[test]
    fn test_primary_key_column() {
        let field = ModelChoiceField::new(tags()).unwrap();
        assert_eq!(field.primary_key().name, "id");
    }

    #[test]
    fn test_prepare_value_is_pk() {
        let field = ModelChoiceField::new(tags()).unwrap();
        assert_eq!(field.prepare_value(&Tag::new(1, "rust")), Value::Int(1));
        assert_eq!(field.prepare_value(&Tag::default()), Value::Null);
    }

    #[test]
    fn test_to_python_none_is_none() {
        let field = ModelChoiceField::new(tags()).unwrap();
        assert!(field.to_python(None).unwrap().is_none());
        assert!(field.to_python(Some(&Value::Null)).unwrap().is_none());
    }

    #[test]
    fn test_to_python_finds_object_by_pk() {
        let field = ModelChoiceField::new(tags()).unwrap();
        let found = field.to_python(Some(&Value::Int(1))).unwrap().unwrap();
        assert_eq!(found.name, "rust");
    }

    #[test]
    fn test_to_python_invalid_pk_message_is_rendered() {
        let field = ModelChoiceField::new(tags()).unwrap();
        let err = field.to_python(Some(&Value::Int(-1))).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("-1"));
        assert!(!msg.contains("%("));
    }

    #[test]
    fn test_choices_pairs() {
        let field = ModelChoiceField::new(tags())
            .unwrap()
            .with_label(|t: &Tag| t.name.clone());
        assert_eq!(
            field.choices(),
            vec![
                ("1".to_string(), "rust".to_string()),
                ("2".to_string(), "forms".to_string()),
            ]
        );
    }

    #[test]
    fn test_multiple_clean_requires_values() {
        let field = ModelMultipleChoiceField::new(tags()).unwrap();
        assert!(field.clean(None).is_err());
        assert!(field.clean(Some(&[])).is_err());
    }

    #[test]
    fn test_multiple_clean_rejects_unknown_pk() {
        let field = ModelMultipleChoiceField::new(Vec::<Tag>::new()).unwrap();
        assert!(field.clean(Some(&[Value::Int(1)])).is_err());
    }

    #[test]
    fn test_multiple_clean_resolves_known_pks() {
        let field = ModelMultipleChoiceField::new(tags()).unwrap();
        let cleaned = field.clean(Some(&[Value::Int(1)])).unwrap();
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].name, "rust");
    }

    #[test]
    fn test_multiple_prepare_values() {
        let field = ModelMultipleChoiceField::new(tags()).unwrap();
        assert_eq!(field.prepare_value(&Tag::new(2, "forms")), Value::Int(2));
        assert_eq!(
            field.prepare_values(&tags()),
            vec![Value::Int(1), Value::Int(2)]
        );
    }
}
