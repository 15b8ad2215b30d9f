//! Hearth Script - RON loader for furnishing catalogs and configuration
//!
//! Loads content from RON files:
//! - Addon family definitions (footprints, variants, graphic tables)
//! - The built-in families shipped with the crate
//! - Runtime configuration ([`HearthConfig`](hearth_core::HearthConfig))

mod error;
mod loader;

pub use error::{Error, Result};
pub use loader::{builtin_catalog, load_catalog, load_config, load_config_str, Loader};
