//! Applies an access policy to a form's field set.
//!
//! Resolution runs once per form instantiation, after field collection and
//! before the fields are exposed: [`bind`] validates the policy against the
//! declared names and hands back the filtered/annotated field set for the
//! form constructor. [`resolve`] is the pure core — a function of
//! `(policy, fields, user, instance)` with no hidden state.

use forms2_core::{FieldMap, Forms2Result};

use crate::policy::{AccessLevel, AccessPolicy};

/// Widget attribute key marking a field read-only.
///
/// The rendering layer is expected to pass widget attributes through to the
/// generated element, so `readonly="readonly"` lands on the input.
pub const READONLY_ATTR: &str = "readonly";

/// Resolves every field in `fields` against `policy` and returns the
/// resulting field set.
///
/// For each field, in declaration order:
/// - `Enabled`: kept unchanged.
/// - `Readonly`: kept, with [`READONLY_ATTR`] set in its widget attributes.
/// - `Excluded`: dropped.
///
/// The inputs are untouched; calling this twice with identical inputs
/// yields identical outputs. Panics raised by decision functions propagate
/// to the caller unchanged.
pub fn resolve<U, M>(
    policy: &AccessPolicy<U, M>,
    fields: &FieldMap,
    user: &U,
    instance: Option<&M>,
) -> FieldMap {
    let mut resolved = FieldMap::new();
    let mut readonly = 0_usize;
    let mut excluded = 0_usize;

    for field in fields {
        match policy.resolve_field(&field.name, user, instance) {
            AccessLevel::Enabled => {
                resolved.insert(field.clone());
            }
            AccessLevel::Readonly => {
                let mut field = field.clone();
                field
                    .widget_attrs
                    .insert(READONLY_ATTR.to_string(), READONLY_ATTR.to_string());
                resolved.insert(field);
                readonly += 1;
            }
            AccessLevel::Excluded => {
                excluded += 1;
            }
        }
    }

    tracing::debug!(
        total = fields.len(),
        readonly,
        excluded,
        "resolved field access"
    );

    resolved
}

/// Validates `policy` against the declared field set, then resolves it.
///
/// This is the entry point a form constructor calls: the returned field set
/// replaces the declared one. A policy whose specific selectors name
/// undeclared fields is a configuration error and halts form construction
/// before any decision function runs.
///
/// # Errors
///
/// Returns [`Forms2Error::ImproperlyConfigured`](forms2_core::Forms2Error::ImproperlyConfigured)
/// if a selector refers to a field not present in `fields`.
pub fn bind<U, M>(
    policy: &AccessPolicy<U, M>,
    fields: FieldMap,
    user: &U,
    instance: Option<&M>,
) -> Forms2Result<FieldMap> {
    policy.validate_names(&fields)?;
    Ok(resolve(policy, &fields, user, instance))
}
