//! Mapped-object traits and column metadata.
//!
//! [`Mapped`] is the contract between forms and objects managed by an
//! external object-relational mapper: typed attribute access by name, plus
//! navigation to nested mapped children for relationship traversal.
//! [`MappedModel`] extends it with column metadata, primary-key access, and
//! the `save` entry point forms call after writing cleaned data back.
//!
//! Persistence itself stays with the mapper; nothing here generates SQL.

use async_trait::async_trait;

use forms2_core::{Forms2Result, Value};

/// The type of a mapped column, used to derive form field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// An integer column.
    Integer,
    /// A floating-point column.
    Float,
    /// A text column.
    Text,
    /// A boolean column.
    Boolean,
    /// A date column.
    Date,
    /// A date-time column.
    DateTime,
}

/// Metadata for a single mapped column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    /// The column (and attribute) name.
    pub name: &'static str,
    /// The column type.
    pub column_type: ColumnType,
    /// Whether this column is the primary key.
    pub primary_key: bool,
    /// Whether this column accepts NULL.
    pub nullable: bool,
}

impl ColumnDef {
    /// Creates a new column definition: not a primary key, not nullable.
    pub const fn new(name: &'static str, column_type: ColumnType) -> Self {
        Self {
            name,
            column_type,
            primary_key: false,
            nullable: false,
        }
    }

    /// Marks this column as the primary key.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Marks this column as nullable.
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// An object whose attributes can be read and written by name.
///
/// Implemented by (or on behalf of) objects handed out by the mapper.
/// Scalar attributes are exchanged as [`Value`]s; nested mapped objects
/// (relationships) are reachable through [`child`](Self::child) /
/// [`child_mut`](Self::child_mut) and are traversed by the dotted-path
/// conversion functions.
pub trait Mapped {
    /// Returns the value of a scalar attribute, or `None` if no such
    /// attribute exists.
    fn attribute(&self, name: &str) -> Option<Value>;

    /// Sets a scalar attribute.
    ///
    /// # Errors
    ///
    /// Returns [`Forms2Error::UnknownAttribute`](forms2_core::Forms2Error::UnknownAttribute)
    /// if no such attribute exists.
    fn set_attribute(&mut self, name: &str, value: Value) -> Forms2Result<()>;

    /// Returns the nested mapped object behind a relationship attribute.
    fn child(&self, name: &str) -> Option<&dyn Mapped> {
        let _ = name;
        None
    }

    /// Returns the nested mapped object behind a relationship attribute,
    /// mutably.
    fn child_mut(&mut self, name: &str) -> Option<&mut dyn Mapped> {
        let _ = name;
        None
    }
}

/// A mapped object backed by a table: column metadata, a primary key, and
/// a `save` operation executed by the external mapper.
#[async_trait]
pub trait MappedModel: Mapped + Send + Sync {
    /// Returns the column definitions for this model.
    fn columns() -> &'static [ColumnDef]
    where
        Self: Sized;

    /// Returns the primary key column, if one is declared.
    fn pk_column() -> Option<&'static ColumnDef>
    where
        Self: Sized,
    {
        Self::columns().iter().find(|c| c.primary_key)
    }

    /// Returns the primary key value, or `None` if the object is unsaved.
    fn pk(&self) -> Option<Value>;

    /// Persists this object through the external mapper.
    async fn save(&mut self) -> Forms2Result<()>;
}
