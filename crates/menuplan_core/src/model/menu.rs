//! Weekly menu record.

use super::product::ProductId;
use super::recipe::RecipeId;
use super::{require_unique, EntityKind, ModelValidationError, Record};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static WEEK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-W(0[1-9]|[1-4]\d|5[0-3])$").expect("valid week regex"));

pub type MenuId = i64;

/// Recipes offered for one product during one ISO week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    pub id: MenuId,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// ISO week label, e.g. `2015-W37`.
    pub week: String,
    pub product: Option<ProductId>,
    /// Referenced recipes in display order.
    pub recipes: Vec<RecipeId>,
}

impl Menu {
    pub fn new(id: MenuId, week: impl Into<String>, created_at: i64) -> Self {
        Self {
            id,
            created_at,
            week: week.into(),
            product: None,
            recipes: Vec::new(),
        }
    }

    /// Appends a recipe unless it is already on the menu.
    pub fn add_recipe(&mut self, recipe: RecipeId) -> bool {
        if self.recipes.contains(&recipe) {
            return false;
        }
        self.recipes.push(recipe);
        true
    }

    pub fn remove_recipe(&mut self, recipe: &RecipeId) -> bool {
        let before = self.recipes.len();
        self.recipes.retain(|current| current != recipe);
        self.recipes.len() != before
    }
}

impl Record for Menu {
    type Id = MenuId;
    const KIND: EntityKind = EntityKind::Menu;

    fn record_id(&self) -> &MenuId {
        &self.id
    }

    fn validate(&self) -> Result<(), ModelValidationError> {
        if !WEEK_RE.is_match(&self.week) {
            return Err(ModelValidationError::InvalidWeek(self.week.clone()));
        }
        require_unique(EntityKind::Menu, "recipes", &self.recipes)
    }
}

#[cfg(test)]
mod tests {
    use super::Menu;
    use crate::model::recipe::RecipeId;
    use crate::model::{ModelValidationError, Record};

    #[test]
    fn add_recipe_ignores_duplicates() {
        let mut menu = Menu::new(1, "2015-W37", 0);
        assert!(menu.add_recipe(RecipeId::from("a")));
        assert!(!menu.add_recipe(RecipeId::from("a")));
        assert_eq!(menu.recipes.len(), 1);
        assert!(menu.remove_recipe(&RecipeId::from("a")));
        assert!(menu.recipes.is_empty());
    }

    #[test]
    fn validate_checks_week_label() {
        Menu::new(1, "2015-W53", 0).validate().unwrap();
        for week in ["2015-37", "2015-W00", "2015-W54", "W37"] {
            assert_eq!(
                Menu::new(1, week, 0).validate().unwrap_err(),
                ModelValidationError::InvalidWeek(week.to_string())
            );
        }
    }
}
