//! # forms2-access
//!
//! Field-level access control for forms. A form type declares an
//! [`AccessPolicy`] mapping field names to decision functions; at form
//! construction the policy resolves every declared field to one of three
//! [`AccessLevel`]s — enabled, readonly, or excluded — and the resulting
//! field set is what the form exposes.
//!
//! Wiring is explicit composition rather than inheritance: the host form
//! collects its fields, calls [`bind`], and constructs itself from the
//! returned map.
//!
//! ```
//! use forms2_access::{bind, AccessLevel, AccessPolicy};
//! use forms2_core::{BaseForm, FieldDef, FieldMap, FieldType};
//!
//! struct User { is_staff: bool }
//! struct Ticket;
//!
//! let policy: AccessPolicy<User, Ticket> = AccessPolicy::builder()
//!     .field("internal_notes", |user: &User, _| {
//!         if user.is_staff { AccessLevel::Enabled } else { AccessLevel::Excluded }
//!     })
//!     .build()?;
//!
//! let fields: FieldMap = vec![
//!     FieldDef::new("title", FieldType::Char { max_length: Some(100) }),
//!     FieldDef::new("internal_notes", FieldType::Char { max_length: None }),
//! ]
//! .into();
//!
//! let user = User { is_staff: false };
//! let form = BaseForm::new(bind(&policy, fields, &user, None)?);
//! # use forms2_core::Form;
//! assert!(!form.fields().contains("internal_notes"));
//! # Ok::<(), forms2_core::Forms2Error>(())
//! ```

pub mod policy;
pub mod resolver;

pub use policy::{AccessLevel, AccessPolicy, AccessPolicyBuilder, AccessRule, DecisionFn, Selector};
pub use resolver::{bind, resolve, READONLY_ATTR};
