//! Integration tests for access-controlled forms.
//!
//! Exercises the full path a host form takes: declare a policy, collect a
//! field set, bind the policy, and construct a form from the result.

use std::collections::HashMap;

use forms2_access::{bind, AccessLevel, AccessPolicy, READONLY_ATTR};
use forms2_core::{BaseForm, FieldDef, FieldMap, FieldType, Form};

/// Permission flags carried by the test user.
#[derive(Debug, Clone)]
struct User {
    edit_bank_account: bool,
    edit_contract_id: bool,
    do_stuff: bool,
}

/// The mapped record behind the form; unused by most decisions.
struct BankRecord;

fn access_bank_details(user: &User, _instance: Option<&BankRecord>) -> AccessLevel {
    if user.edit_bank_account {
        if user.edit_contract_id {
            AccessLevel::Enabled
        } else {
            AccessLevel::Readonly
        }
    } else {
        AccessLevel::Excluded
    }
}

fn access_contract_id(user: &User, _instance: Option<&BankRecord>) -> AccessLevel {
    if user.edit_contract_id && user.do_stuff {
        AccessLevel::Enabled
    } else {
        AccessLevel::Readonly
    }
}

fn access_default(user: &User, _instance: Option<&BankRecord>) -> AccessLevel {
    if user.do_stuff {
        AccessLevel::Enabled
    } else {
        AccessLevel::Readonly
    }
}

fn bank_policy() -> AccessPolicy<User, BankRecord> {
    AccessPolicy::builder()
        .fields(
            ["bank_account", "bank_name", "bank_balance"],
            access_bank_details,
        )
        .field("contract_id", access_contract_id)
        .catch_all(access_default)
        .build()
        .expect("valid policy")
}

fn bank_fields() -> FieldMap {
    vec![
        FieldDef::new("bank_account", FieldType::Char { max_length: Some(34) }),
        FieldDef::new("bank_name", FieldType::Char { max_length: Some(100) }),
        FieldDef::new("bank_balance", FieldType::Float),
        FieldDef::new(
            "contract_id",
            FieldType::Integer {
                min_value: None,
                max_value: None,
            },
        ),
        FieldDef::new("some_other_field", FieldType::Char { max_length: None }),
    ]
    .into()
}

/// A user without any permissions.
fn anon_user() -> User {
    User {
        edit_bank_account: false,
        edit_contract_id: false,
        do_stuff: false,
    }
}

/// A user with all permissions.
fn admin_user() -> User {
    User {
        edit_bank_account: true,
        edit_contract_id: true,
        do_stuff: true,
    }
}

#[test]
fn test_anon_user_sees_filtered_readonly_form() {
    let policy = bank_policy();
    let fields = bind(&policy, bank_fields(), &anon_user(), None).unwrap();

    // Bank fields are excluded outright; the rest survive in order.
    assert_eq!(
        fields.names().collect::<Vec<_>>(),
        vec!["contract_id", "some_other_field"]
    );

    // Both remaining fields are readonly: contract_id by its own rule,
    // some_other_field via the catch-all.
    assert!(fields
        .get("contract_id")
        .unwrap()
        .widget_attrs
        .contains_key(READONLY_ATTR));
    assert!(fields
        .get("some_other_field")
        .unwrap()
        .widget_attrs
        .contains_key(READONLY_ATTR));
}

#[test]
fn test_admin_user_sees_full_form() {
    let policy = bank_policy();
    let fields = bind(&policy, bank_fields(), &admin_user(), None).unwrap();

    assert_eq!(
        fields.names().collect::<Vec<_>>(),
        vec![
            "bank_account",
            "bank_name",
            "bank_balance",
            "contract_id",
            "some_other_field"
        ]
    );
    for field in &fields {
        assert!(
            !field.widget_attrs.contains_key(READONLY_ATTR),
            "field '{}' should be editable",
            field.name
        );
    }
}

#[test]
fn test_partial_rights_mark_bank_fields_readonly() {
    let user = User {
        edit_bank_account: true,
        edit_contract_id: false,
        do_stuff: false,
    };
    let policy = bank_policy();
    let fields = bind(&policy, bank_fields(), &user, None).unwrap();

    assert_eq!(fields.len(), 5);
    for name in ["bank_account", "bank_name", "bank_balance"] {
        assert!(fields.get(name).unwrap().widget_attrs.contains_key(READONLY_ATTR));
    }
}

#[tokio::test]
async fn test_form_constructed_from_resolved_fields() {
    let policy = bank_policy();
    let fields = bind(&policy, bank_fields(), &anon_user(), None).unwrap();
    let mut form = BaseForm::new(fields);

    assert!(!form.fields().contains("bank_account"));

    let mut data = HashMap::new();
    data.insert("contract_id".to_string(), "42".to_string());
    data.insert("some_other_field".to_string(), "hello".to_string());
    form.bind(&data);
    assert!(form.is_valid().await);
    assert_eq!(form.cleaned_data().len(), 2);
}

#[test]
fn test_instance_sensitive_policy() {
    struct Account {
        frozen: bool,
    }

    let policy: AccessPolicy<User, Account> = AccessPolicy::builder()
        .field("bank_balance", |_, instance: Option<&Account>| {
            if instance.is_some_and(|a| a.frozen) {
                AccessLevel::Readonly
            } else {
                AccessLevel::Enabled
            }
        })
        .build()
        .unwrap();

    let fields: FieldMap = vec![FieldDef::new("bank_balance", FieldType::Float)].into();

    let frozen = Account { frozen: true };
    let resolved = bind(&policy, fields.clone(), &admin_user(), Some(&frozen)).unwrap();
    assert!(resolved
        .get("bank_balance")
        .unwrap()
        .widget_attrs
        .contains_key(READONLY_ATTR));

    // Creation flow: no instance yet, field stays editable.
    let resolved = bind(&policy, fields, &admin_user(), None).unwrap();
    assert!(!resolved
        .get("bank_balance")
        .unwrap()
        .widget_attrs
        .contains_key(READONLY_ATTR));
}
