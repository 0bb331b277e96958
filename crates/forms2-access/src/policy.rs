//! Declarative access policies for form fields.
//!
//! An [`AccessPolicy`] maps field names to decision functions. Each rule
//! pairs a [`Selector`] (a single field name, a set of names, or the
//! catch-all) with a caller-supplied function from `(user, instance)` to an
//! [`AccessLevel`]. Policies are declared once per form type and are
//! read-only afterwards.
//!
//! Construction goes through [`AccessPolicyBuilder`], which rejects
//! malformed policies: a field name covered by two specific selectors, or
//! more than one catch-all rule, is a configuration error raised at build
//! time rather than an ambiguity silently resolved at runtime.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use forms2_core::{FieldMap, Forms2Error, Forms2Result};

/// The access level resolved for a single form field.
///
/// Every field resolves to exactly one level. There is no ordering between
/// levels; they are three distinct outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// The field is kept unchanged.
    Enabled,
    /// The field is kept but marked non-editable for the rendering layer.
    Readonly,
    /// The field is removed from the field set entirely.
    Excluded,
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Enabled => "enabled",
            Self::Readonly => "readonly",
            Self::Excluded => "excluded",
        };
        write!(f, "{name}")
    }
}

/// A caller-supplied decision function.
///
/// Receives the current user and the current instance (`None` in the
/// creation flow) and returns the access level for the matched field(s).
/// Decision functions may read external state but must not depend on
/// resolver internals; the resolver never catches what they panic with.
pub type DecisionFn<U, M> = Arc<dyn Fn(&U, Option<&M>) -> AccessLevel + Send + Sync>;

/// Selects which field names a rule applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// A single field name, matched by equality.
    Field(String),
    /// A set of field names, matched by membership.
    Fields(Vec<String>),
    /// Matches any field not covered by a specific rule.
    CatchAll,
}

impl Selector {
    /// Returns `true` if this selector covers the given field name.
    ///
    /// The catch-all matches nothing here; it is applied only after all
    /// specific selectors have been tried.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Field(n) => n == name,
            Self::Fields(names) => names.iter().any(|n| n == name),
            Self::CatchAll => false,
        }
    }

    /// Returns the field names this selector covers explicitly.
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::Field(n) => vec![n.as_str()],
            Self::Fields(names) => names.iter().map(String::as_str).collect(),
            Self::CatchAll => Vec::new(),
        }
    }
}

/// A single policy entry: a selector paired with its decision function.
pub struct AccessRule<U, M> {
    /// The fields this rule applies to.
    pub selector: Selector,
    decide: DecisionFn<U, M>,
}

impl<U, M> AccessRule<U, M> {
    /// Invokes this rule's decision function.
    pub fn decide(&self, user: &U, instance: Option<&M>) -> AccessLevel {
        (self.decide)(user, instance)
    }
}

impl<U, M> Clone for AccessRule<U, M> {
    fn clone(&self) -> Self {
        Self {
            selector: self.selector.clone(),
            decide: Arc::clone(&self.decide),
        }
    }
}

impl<U, M> fmt::Debug for AccessRule<U, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessRule")
            .field("selector", &self.selector)
            .finish_non_exhaustive()
    }
}

/// A validated, read-only collection of access rules for one form type.
///
/// Generic over the user type `U` and the instance type `M`, both opaque to
/// the policy itself. Obtain one through [`AccessPolicy::builder`].
pub struct AccessPolicy<U, M> {
    rules: Vec<AccessRule<U, M>>,
    catch_all: Option<DecisionFn<U, M>>,
}

impl<U, M> AccessPolicy<U, M> {
    /// Returns a builder for declaring a policy.
    pub fn builder() -> AccessPolicyBuilder<U, M> {
        AccessPolicyBuilder {
            rules: Vec::new(),
            catch_alls: Vec::new(),
        }
    }

    /// Returns the specific (non-catch-all) rules in declaration order.
    pub fn rules(&self) -> &[AccessRule<U, M>] {
        &self.rules
    }

    /// Returns `true` if a catch-all rule is declared.
    pub fn has_catch_all(&self) -> bool {
        self.catch_all.is_some()
    }

    /// Returns the specific rule covering the given field name, if any.
    ///
    /// At most one rule can cover a name; the builder rejects overlaps.
    pub fn specific_rule(&self, name: &str) -> Option<&AccessRule<U, M>> {
        self.rules.iter().find(|r| r.selector.matches(name))
    }

    /// Resolves the access level for a single field name.
    ///
    /// A specific rule wins over the catch-all; with neither, the field is
    /// `Enabled`. This is a pure dispatch: the policy holds no mutable
    /// state, and identical inputs resolve identically.
    pub fn resolve_field(&self, name: &str, user: &U, instance: Option<&M>) -> AccessLevel {
        if let Some(rule) = self.specific_rule(name) {
            return rule.decide(user, instance);
        }
        if let Some(decide) = &self.catch_all {
            return decide(user, instance);
        }
        AccessLevel::Enabled
    }

    /// Checks that every name covered by a specific selector is declared in
    /// the given field set.
    ///
    /// A selector naming an undeclared field is a configuration error; it
    /// is detected here, before any decision function runs, so a
    /// misdeclared form type fails at construction.
    pub fn validate_names(&self, fields: &FieldMap) -> Forms2Result<()> {
        for rule in &self.rules {
            for name in rule.selector.names() {
                if !fields.contains(name) {
                    return Err(Forms2Error::ImproperlyConfigured(format!(
                        "access rule refers to undeclared field '{name}'"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl<U, M> Clone for AccessPolicy<U, M> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
            catch_all: self.catch_all.as_ref().map(Arc::clone),
        }
    }
}

impl<U, M> fmt::Debug for AccessPolicy<U, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessPolicy")
            .field("rules", &self.rules)
            .field("has_catch_all", &self.catch_all.is_some())
            .finish()
    }
}

/// Builder for [`AccessPolicy`].
///
/// Rules are recorded in declaration order; [`build`](Self::build) validates
/// the whole declaration at once so every configuration error is reported
/// before the policy can be used.
pub struct AccessPolicyBuilder<U, M> {
    rules: Vec<AccessRule<U, M>>,
    catch_alls: Vec<DecisionFn<U, M>>,
}

impl<U, M> AccessPolicyBuilder<U, M> {
    /// Declares a rule for a single field.
    #[must_use]
    pub fn field<F>(mut self, name: impl Into<String>, decide: F) -> Self
    where
        F: Fn(&U, Option<&M>) -> AccessLevel + Send + Sync + 'static,
    {
        self.rules.push(AccessRule {
            selector: Selector::Field(name.into()),
            decide: Arc::new(decide),
        });
        self
    }

    /// Declares a rule for a set of fields.
    #[must_use]
    pub fn fields<I, S, F>(mut self, names: I, decide: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&U, Option<&M>) -> AccessLevel + Send + Sync + 'static,
    {
        self.rules.push(AccessRule {
            selector: Selector::Fields(names.into_iter().map(Into::into).collect()),
            decide: Arc::new(decide),
        });
        self
    }

    /// Declares the catch-all rule, applied to any field no specific rule
    /// covers.
    #[must_use]
    pub fn catch_all<F>(mut self, decide: F) -> Self
    where
        F: Fn(&U, Option<&M>) -> AccessLevel + Send + Sync + 'static,
    {
        self.catch_alls.push(Arc::new(decide));
        self
    }

    /// Validates the declaration and returns the policy.
    ///
    /// # Errors
    ///
    /// Returns [`Forms2Error::ImproperlyConfigured`] if a field name is
    /// covered by more than one specific selector (including twice within
    /// one selector), or if more than one catch-all rule was declared.
    pub fn build(self) -> Forms2Result<AccessPolicy<U, M>> {
        let mut seen: Vec<&str> = Vec::new();
        for rule in &self.rules {
            for name in rule.selector.names() {
                if seen.contains(&name) {
                    return Err(Forms2Error::ImproperlyConfigured(format!(
                        "field '{name}' is covered by more than one access rule"
                    )));
                }
                seen.push(name);
            }
        }

        if self.catch_alls.len() > 1 {
            return Err(Forms2Error::ImproperlyConfigured(
                "more than one catch-all access rule declared".to_string(),
            ));
        }

        Ok(AccessPolicy {
            rules: self.rules,
            catch_all: self.catch_alls.into_iter().next(),
        })
    }
}
