//! # forms2-rs
//!
//! Extensions for form handling in Rust: field-level access control driven
//! by declarative policies, and adapters that let forms read from and write
//! to objects managed by an external object-relational mapper.
//!
//! This is the meta-crate that re-exports the sub-crates for convenient
//! access. Depend on `forms2-rs` for everything, or on individual crates
//! for finer-grained control.

/// Foundation types: errors, values, field definitions, and the form trait.
pub use forms2_core as core;

/// Field-level access control: policies, levels, and the resolver.
#[cfg(feature = "access")]
pub use forms2_access as access;

/// Mapped-model adapters: conversion, choice fields, and model forms.
#[cfg(feature = "model")]
pub use forms2_model as model;
