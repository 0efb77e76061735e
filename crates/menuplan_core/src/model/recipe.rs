//! Recipe and step records.
//!
//! # Invariants
//! - `RecipeId` is opaque to core; any non-empty, whitespace-free string is
//!   accepted so ids issued by document stores round-trip unchanged.
//! - Steps keep insertion order; that order is the cooking order.

use super::product::ProductId;
use super::{require_text, EntityKind, ModelValidationError, Record};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Length of generated ids, matching 12-byte document-store object ids.
const GENERATED_ID_LEN: usize = 24;

/// Document-style recipe identifier, e.g. `55f13bd332668a28390041a7`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(String);

impl RecipeId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh lowercase hex id.
    pub fn generate() -> Self {
        let mut value = Uuid::new_v4().simple().to_string();
        value.truncate(GENERATED_ID_LEN);
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecipeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RecipeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for RecipeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One cooking instruction of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub instructions: String,
}

impl Step {
    pub fn new(instructions: impl Into<String>) -> Self {
        Self {
            instructions: instructions.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    /// Product the recipe is shipped with, if any.
    pub product: Option<ProductId>,
    pub steps: Vec<Step>,
}

impl Recipe {
    /// Creates a recipe with a generated id and no steps.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(RecipeId::generate(), name)
    }

    /// Creates a recipe with a caller-provided id, e.g. for imports.
    pub fn with_id(id: impl Into<RecipeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            product: None,
            steps: Vec::new(),
        }
    }

    pub fn add_step(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// Removes the first step equal to `step`. Returns whether one was removed.
    pub fn remove_step(&mut self, step: &Step) -> bool {
        match self.steps.iter().position(|current| current == step) {
            Some(index) => {
                self.steps.remove(index);
                true
            }
            None => false,
        }
    }
}

impl Record for Recipe {
    type Id = RecipeId;
    const KIND: EntityKind = EntityKind::Recipe;

    fn record_id(&self) -> &RecipeId {
        &self.id
    }

    fn validate(&self) -> Result<(), ModelValidationError> {
        let id = self.id.as_str();
        if id.is_empty() || id.chars().any(char::is_whitespace) {
            return Err(ModelValidationError::InvalidId {
                kind: EntityKind::Recipe,
                value: id.to_string(),
            });
        }
        require_text(EntityKind::Recipe, "name", &self.name)?;
        for step in &self.steps {
            require_text(EntityKind::Recipe, "step instructions", &step.instructions)?;
        }
        Ok(())
    }
}
