//! Customer record.

use super::product::ProductId;
use super::{require_text, require_unique, EntityKind, ModelValidationError, Record};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Customers are keyed by their email address.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerEmail(String);

impl CustomerEmail {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CustomerEmail {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Display for CustomerEmail {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub email: CustomerEmail,
    pub name: String,
    pub subscribed_products: Vec<ProductId>,
}

impl Customer {
    pub fn new(email: impl Into<CustomerEmail>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            subscribed_products: Vec::new(),
        }
    }

    /// Subscribes to a product. Returns `false` when already subscribed.
    pub fn add_subscribed_product(&mut self, product: ProductId) -> bool {
        if self.subscribed_products.contains(&product) {
            return false;
        }
        self.subscribed_products.push(product);
        true
    }

    pub fn remove_subscribed_product(&mut self, product: ProductId) -> bool {
        let before = self.subscribed_products.len();
        self.subscribed_products.retain(|current| *current != product);
        self.subscribed_products.len() != before
    }
}

impl Record for Customer {
    type Id = CustomerEmail;
    const KIND: EntityKind = EntityKind::Customer;

    fn record_id(&self) -> &CustomerEmail {
        &self.email
    }

    fn validate(&self) -> Result<(), ModelValidationError> {
        if !EMAIL_RE.is_match(self.email.as_str()) {
            return Err(ModelValidationError::InvalidEmail(
                self.email.as_str().to_string(),
            ));
        }
        require_text(EntityKind::Customer, "name", &self.name)?;
        require_unique(
            EntityKind::Customer,
            "subscribed_products",
            &self.subscribed_products,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Customer;
    use crate::model::{ModelValidationError, Record};

    #[test]
    fn subscriptions_are_a_set() {
        let mut customer = Customer::new("ada@example.com", "Ada");
        assert!(customer.add_subscribed_product(7));
        assert!(!customer.add_subscribed_product(7));
        assert!(customer.remove_subscribed_product(7));
        assert!(!customer.remove_subscribed_product(7));
    }

    #[test]
    fn validate_rejects_malformed_email() {
        let err = Customer::new("not-an-email", "Ada").validate().unwrap_err();
        assert_eq!(
            err,
            ModelValidationError::InvalidEmail("not-an-email".to_string())
        );
    }
}
