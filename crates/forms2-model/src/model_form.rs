//! Model-backed forms.
//!
//! [`form_fields_for_model`] generates a form field set from a model's
//! column metadata; [`ModelForm`] wraps a [`BaseForm`] over those fields and
//! wires `save`: cleaned data is written back onto the instance through
//! [`dict_to_model`](crate::convert::dict_to_model) and the model's own
//! `save` is invoked. Editing an existing instance seeds the fields'
//! initial values from its current attributes; without an instance, saving
//! creates one via `Default` (the creation flow).

use std::collections::HashMap;

use forms2_core::{BaseForm, FieldDef, FieldMap, FieldType, Form, Forms2Error, Forms2Result, Value};

use crate::convert::{dict_to_model, model_to_dict};
use crate::mapped::{ColumnType, MappedModel};

/// Generates form field definitions from a model's columns.
///
/// Primary key columns are skipped; a field is required when its column is
/// not nullable.
pub fn form_fields_for_model<M: MappedModel>() -> FieldMap {
    let mut fields = FieldMap::new();
    for col in M::columns() {
        if col.primary_key {
            continue;
        }
        let field_type = match col.column_type {
            ColumnType::Integer => FieldType::Integer {
                min_value: None,
                max_value: None,
            },
            ColumnType::Float => FieldType::Float,
            ColumnType::Text => FieldType::Char { max_length: None },
            ColumnType::Boolean => FieldType::Boolean,
            ColumnType::Date => FieldType::Date,
            ColumnType::DateTime => FieldType::DateTime,
        };
        fields.insert(FieldDef::new(col.name, field_type).required(!col.nullable));
    }
    fields
}

/// A form bound to a mapped model.
///
/// Validation is delegated to the inner [`BaseForm`]; [`save`](Self::save)
/// is only available after a successful `is_valid` call.
pub struct ModelForm<M: MappedModel + Default> {
    form: BaseForm,
    instance: Option<M>,
    validated: bool,
}

impl<M: MappedModel + Default> ModelForm<M> {
    /// Creates a form for the creation flow: fields generated from the
    /// model's columns, no current instance.
    pub fn new() -> Self {
        Self::from_fields(form_fields_for_model::<M>(), None)
    }

    /// Creates a form editing an existing instance.
    ///
    /// Each generated field's initial value is seeded from the instance's
    /// current attribute value.
    ///
    /// # Errors
    ///
    /// Returns [`Forms2Error::UnknownAttribute`] if the instance does not
    /// expose an attribute for one of its declared columns.
    pub fn with_instance(instance: M) -> Forms2Result<Self> {
        let mut fields = form_fields_for_model::<M>();
        let names: Vec<String> = fields.names().map(String::from).collect();
        let snapshot = model_to_dict(&instance, &names)?;
        for field in fields.iter_mut() {
            if let Some(value) = snapshot.get(&field.name) {
                if !value.is_null() {
                    field.initial = Some(value.clone());
                }
            }
        }
        Ok(Self::from_fields(fields, Some(instance)))
    }

    /// Creates a form over an explicit field set.
    ///
    /// This is the composition point for extensions: callers may filter or
    /// annotate the generated fields (e.g. through an access policy) before
    /// handing them in.
    pub fn from_fields(fields: FieldMap, instance: Option<M>) -> Self {
        Self {
            form: BaseForm::new(fields),
            instance,
            validated: false,
        }
    }

    /// Returns the form's field set.
    pub fn fields(&self) -> &FieldMap {
        self.form.fields()
    }

    /// Returns the instance being edited, if any.
    pub fn instance(&self) -> Option<&M> {
        self.instance.as_ref()
    }

    /// Binds raw form data.
    pub fn bind(&mut self, data: &HashMap<String, String>) {
        self.validated = false;
        self.form.bind(data);
    }

    /// Validates the form. Returns `true` if valid.
    pub async fn is_valid(&mut self) -> bool {
        let valid = self.form.is_valid().await;
        self.validated = true;
        valid
    }

    /// Returns per-field validation errors.
    pub fn errors(&self) -> &HashMap<String, Vec<String>> {
        self.form.errors()
    }

    /// Returns the cleaned data.
    pub fn cleaned_data(&self) -> &HashMap<String, Value> {
        self.form.cleaned_data()
    }

    /// Writes cleaned data onto the instance and persists it.
    ///
    /// Without a current instance a fresh one is created via `Default`.
    /// Consumes the form and returns the saved instance.
    ///
    /// # Errors
    ///
    /// Returns [`Forms2Error::InvalidForm`] if called before a successful
    /// `is_valid`; propagates any error from the model's `save`.
    pub async fn save(mut self) -> Forms2Result<M> {
        if !self.validated || !self.form.errors().is_empty() {
            return Err(Forms2Error::InvalidForm(
                "the form data did not validate".to_string(),
            ));
        }

        let mut instance = self.instance.take().unwrap_or_default();
        dict_to_model(&mut instance, self.form.cleaned_data())?;
        instance.save().await?;
        tracing::debug!(fields = self.form.cleaned_data().len(), "saved model form");
        Ok(instance)
    }
}

impl<M: MappedModel + Default> Default for ModelForm<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapped::{ColumnDef, Mapped};
    use async_trait::async_trait;

    #[derive(Debug, Default)]
    struct Account {
        id: Option<i64>,
        name: String,
        balance: f64,
        active: bool,
        save_calls: u32,
    }

    impl Mapped for Account {
        fn attribute(&self, name: &str) -> Option<Value> {
            match name {
                "id" => Some(self.id.into()),
                "name" => Some(Value::String(self.name.clone())),
                "balance" => Some(Value::Float(self.balance)),
                "active" => Some(Value::Bool(self.active)),
                _ => None,
            }
        }

        fn set_attribute(&mut self, name: &str, value: Value) -> Forms2Result<()> {
            match (name, value) {
                ("id", Value::Int(n)) => self.id = Some(n),
                ("id", Value::Null) => self.id = None,
                ("name", Value::String(s)) => self.name = s,
                ("name", Value::Null) => self.name.clear(),
                ("balance", Value::Float(f)) => self.balance = f,
                ("balance", Value::Int(n)) => self.balance = n as f64,
                ("balance", Value::Null) => self.balance = 0.0,
                ("active", Value::Bool(b)) => self.active = b,
                ("active", Value::Null) => self.active = false,
                (other, _) => return Err(Forms2Error::UnknownAttribute(other.to_string())),
            }
            Ok(())
        }
    }

    #[async_trait]
    impl MappedModel for Account {
        fn columns() -> &'static [ColumnDef] {
            const COLUMNS: &[ColumnDef] = &[
                ColumnDef::new("id", ColumnType::Integer).primary_key(),
                ColumnDef::new("name", ColumnType::Text),
                ColumnDef::new("balance", ColumnType::Float).nullable(),
                ColumnDef::new("active", ColumnType::Boolean).nullable(),
            ];
            COLUMNS
        }

        fn pk(&self) -> Option<Value> {
            self.id.map(Value::Int)
        }

        async fn save(&mut self) -> Forms2Result<()> {
            self.save_calls += 1;
            Ok(())
        }
    }

    fn data(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_generated_fields_skip_primary_key() {
        let fields = form_fields_for_model::<Account>();
        assert_eq!(
            fields.names().collect::<Vec<_>>(),
            vec!["name", "balance", "active"]
        );
    }

    #[test]
    fn test_generated_requiredness_from_nullability() {
        let fields = form_fields_for_model::<Account>();
        assert!(fields.get("name").unwrap().required);
        assert!(!fields.get("balance").unwrap().required);
        assert!(!fields.get("active").unwrap().required);
    }

    #[test]
    fn test_with_instance_seeds_initial_values() {
        let account = Account {
            id: Some(7),
            name: "savings".into(),
            balance: 12.5,
            active: true,
            save_calls: 0,
        };
        let form = ModelForm::with_instance(account).unwrap();
        assert_eq!(
            form.fields().get("name").unwrap().initial,
            Some(Value::String("savings".into()))
        );
        assert_eq!(
            form.fields().get("balance").unwrap().initial,
            Some(Value::Float(12.5))
        );
    }

    #[tokio::test]
    async fn test_save_with_instance_calls_save_once() {
        let account = Account {
            id: Some(1),
            name: "old".into(),
            ..Account::default()
        };
        let mut form = ModelForm::with_instance(account).unwrap();
        form.bind(&data(&[("name", "new"), ("balance", "3.5"), ("active", "true")]));
        assert!(form.is_valid().await);

        let saved = form.save().await.unwrap();
        assert_eq!(saved.save_calls, 1);
        assert_eq!(saved.name, "new");
        assert_eq!(saved.balance, 3.5);
        assert!(saved.active);
        // The primary key is not a form field and survives untouched.
        assert_eq!(saved.id, Some(1));
    }

    #[tokio::test]
    async fn test_save_without_instance_creates_one() {
        let mut form = ModelForm::<Account>::new();
        form.bind(&data(&[("name", "fresh")]));
        assert!(form.is_valid().await);

        let saved = form.save().await.unwrap();
        assert_eq!(saved.save_calls, 1);
        assert_eq!(saved.name, "fresh");
        assert_eq!(saved.id, None);
    }

    #[tokio::test]
    async fn test_save_before_validation_is_an_error() {
        let mut form = ModelForm::<Account>::new();
        form.bind(&data(&[("name", "x")]));
        let err = form.save().await.unwrap_err();
        assert!(matches!(err, Forms2Error::InvalidForm(_)));
    }

    #[tokio::test]
    async fn test_save_invalid_form_is_an_error() {
        let mut form = ModelForm::<Account>::new();
        form.bind(&data(&[("balance", "1.0")]));
        assert!(!form.is_valid().await);
        let err = form.save().await.unwrap_err();
        assert!(matches!(err, Forms2Error::InvalidForm(_)));
    }

    #[tokio::test]
    async fn test_rebind_resets_validation_state() {
        let mut form = ModelForm::<Account>::new();
        form.bind(&data(&[("name", "ok")]));
        assert!(form.is_valid().await);
        form.bind(&data(&[("name", "changed")]));
        // Rebinding invalidates the previous validation.
        let err = form.save().await.unwrap_err();
        assert!(matches!(err, Forms2Error::InvalidForm(_)));
    }
}
