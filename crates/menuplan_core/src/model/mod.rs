//! Catalog domain model.
//!
//! # Responsibility
//! - Define the plain records persisted by the catalog stores.
//! - Name each record kind so lookups can report what was missing.
//!
//! # Invariants
//! - Every record exposes one identifier through [`Record::record_id`].
//! - A record identifier never changes after the record is stored.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod customer;
pub mod menu;
pub mod product;
pub mod recipe;

/// Kind of catalog record, used in lookup and conflict errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Customer,
    Menu,
    Product,
    Recipe,
}

impl EntityKind {
    /// Capitalized display name, e.g. `Recipe`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::Menu => "Menu",
            Self::Product => "Product",
            Self::Recipe => "Recipe",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted catalog item with a store-assigned identifier.
pub trait Record {
    /// Identifier type used by the backing store.
    type Id;

    /// Kind reported by not-found and already-exists errors.
    const KIND: EntityKind;

    /// Returns the immutable identifier of this record.
    fn record_id(&self) -> &Self::Id;

    /// Checks field invariants before writes and after reads.
    fn validate(&self) -> Result<(), ModelValidationError>;
}

/// Field-level validation failure for catalog records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// Identifier is empty or contains whitespace.
    InvalidId { kind: EntityKind, value: String },
    /// A required text field is empty after trimming.
    EmptyField {
        kind: EntityKind,
        field: &'static str,
    },
    /// Product handle is not a lowercase slug.
    InvalidHandle(String),
    /// Menu week is not an ISO week label (`YYYY-Www`).
    InvalidWeek(String),
    /// Customer email is not of the form `local@domain`.
    InvalidEmail(String),
    /// The same reference appears twice in one collection field.
    DuplicateReference {
        kind: EntityKind,
        field: &'static str,
        value: String,
    },
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidId { kind, value } => write!(f, "invalid {kind} id `{value}`"),
            Self::EmptyField { kind, field } => write!(f, "{kind} {field} cannot be empty"),
            Self::InvalidHandle(value) => write!(f, "invalid product handle `{value}`"),
            Self::InvalidWeek(value) => write!(f, "invalid menu week `{value}`"),
            Self::InvalidEmail(value) => write!(f, "invalid customer email `{value}`"),
            Self::DuplicateReference { kind, field, value } => {
                write!(f, "{kind} {field} contains `{value}` more than once")
            }
        }
    }
}

impl Error for ModelValidationError {}

pub(crate) fn require_text(
    kind: EntityKind,
    field: &'static str,
    value: &str,
) -> Result<(), ModelValidationError> {
    if value.trim().is_empty() {
        return Err(ModelValidationError::EmptyField { kind, field });
    }
    Ok(())
}

pub(crate) fn require_unique<T: PartialEq + ToString>(
    kind: EntityKind,
    field: &'static str,
    values: &[T],
) -> Result<(), ModelValidationError> {
    for (index, value) in values.iter().enumerate() {
        if values[..index].contains(value) {
            return Err(ModelValidationError::DuplicateReference {
                kind,
                field,
                value: value.to_string(),
            });
        }
    }
    Ok(())
}
