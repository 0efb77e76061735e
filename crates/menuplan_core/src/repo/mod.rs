//! Backing-store contracts and persistence implementations.
//!
//! # Responsibility
//! - Define the read-by-id/insert capability every store offers.
//! - Isolate SQLite query details from the lookup service.
//!
//! # Invariants
//! - Store writes enforce `Record::validate()` before persistence.
//! - Stores report absence as `Ok(None)`; they never synthesize `NotFound`.

pub mod memory_store;
pub mod record_store;
pub mod sqlite_store;
