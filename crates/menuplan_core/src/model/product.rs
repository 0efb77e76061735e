//! Product record.

use super::{require_text, EntityKind, ModelValidationError, Record};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static HANDLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*$").expect("valid handle regex"));

/// Relational identifier assigned to products.
pub type ProductId = i64;

/// A sellable box that menus and recipes belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// URL-friendly lowercase slug, e.g. `classic-box`.
    pub handle: String,
    pub name: String,
}

impl Product {
    pub fn new(id: ProductId, handle: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            handle: handle.into(),
            name: name.into(),
        }
    }
}

impl Record for Product {
    type Id = ProductId;
    const KIND: EntityKind = EntityKind::Product;

    fn record_id(&self) -> &ProductId {
        &self.id
    }

    fn validate(&self) -> Result<(), ModelValidationError> {
        if !HANDLE_RE.is_match(&self.handle) {
            return Err(ModelValidationError::InvalidHandle(self.handle.clone()));
        }
        require_text(EntityKind::Product, "name", &self.name)
    }
}
