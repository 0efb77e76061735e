//! Core catalog logic for menuplan.
//! Products, recipes, menus and customers, their stores, and the by-id lookup.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{CatalogConfig, ConfigError, LogLevel};
pub use logging::{init_logging, logging_status};
pub use model::customer::{Customer, CustomerEmail};
pub use model::menu::{Menu, MenuId};
pub use model::product::{Product, ProductId};
pub use model::recipe::{Recipe, RecipeId, Step};
pub use model::{EntityKind, ModelValidationError, Record};
pub use repo::memory_store::MemoryStore;
pub use repo::record_store::{RecordStore, RepoError, RepoResult};
pub use repo::sqlite_store::SqliteStore;
pub use service::lookup_service::{LookupService, RecipesRepository};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
