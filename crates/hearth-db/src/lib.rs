//! Hearth DB - World persistence using native_db
//!
//! Provides persistent storage for:
//! - Items with their versioned records and locations
//! - Actors and their backpacks
//!
//! Addon components are never stored; they are rebuilt from the catalog
//! when a world is loaded.

mod error;
mod models;
mod queries;
mod store;

pub use error::{Error, Result};
pub use store::Store;
