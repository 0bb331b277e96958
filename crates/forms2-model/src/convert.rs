//! Conversion between mapped objects and flat value dictionaries.
//!
//! [`model_to_dict`] snapshots named attributes into a `name -> Value` map;
//! [`dict_to_model`] writes such a map back onto an object. Keys may be
//! dotted paths (`"address.city"`): each segment before the last names a
//! nested mapped child, the last names a scalar attribute. Traversal is an
//! explicit recursion over the split path; a missing attribute or a
//! non-mapped intermediate segment is an error, never a silent skip.

use std::collections::HashMap;

use forms2_core::{Forms2Error, Forms2Result, Value};

use crate::mapped::Mapped;

/// Separator for nested attribute paths.
pub const PATH_SEPARATOR: char = '.';

/// Copies the attributes named by `keys` from `instance` into a flat map.
///
/// Keys containing [`PATH_SEPARATOR`] are resolved through nested mapped
/// children. The returned map uses the original (possibly dotted) keys.
///
/// # Errors
///
/// Returns [`Forms2Error::UnknownAttribute`] if any path segment does not
/// resolve.
pub fn model_to_dict<I>(instance: &dyn Mapped, keys: I) -> Forms2Result<HashMap<String, Value>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut out = HashMap::new();
    for key in keys {
        let key = key.as_ref();
        out.insert(key.to_string(), read_path(instance, key)?);
    }
    Ok(out)
}

/// Writes every `(key, value)` pair from `values` onto `instance`.
///
/// Keys follow the same dotted-path rules as [`model_to_dict`].
///
/// # Errors
///
/// Returns [`Forms2Error::UnknownAttribute`] if any path segment does not
/// resolve. Attributes written before the failing key keep their new
/// values; callers treating the write as transactional should validate
/// keys up front.
pub fn dict_to_model(
    instance: &mut dyn Mapped,
    values: &HashMap<String, Value>,
) -> Forms2Result<()> {
    for (key, value) in values {
        write_path(instance, key, value.clone())?;
    }
    Ok(())
}

fn read_path(obj: &dyn Mapped, path: &str) -> Forms2Result<Value> {
    match path.split_once(PATH_SEPARATOR) {
        Some((head, rest)) => {
            let child = obj
                .child(head)
                .ok_or_else(|| Forms2Error::UnknownAttribute(head.to_string()))?;
            read_path(child, rest)
        }
        None => obj
            .attribute(path)
            .ok_or_else(|| Forms2Error::UnknownAttribute(path.to_string())),
    }
}

fn write_path(obj: &mut dyn Mapped, path: &str, value: Value) -> Forms2Result<()> {
    match path.split_once(PATH_SEPARATOR) {
        Some((head, rest)) => {
            let child = obj
                .child_mut(head)
                .ok_or_else(|| Forms2Error::UnknownAttribute(head.to_string()))?;
            write_path(child, rest, value)
        }
        None => obj.set_attribute(path, value),
    }
}
