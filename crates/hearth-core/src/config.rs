//! Runtime configuration

use crate::menu::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for the furnishing layer
///
/// Every field has a default, so a config file only needs to name what it
/// changes:
///
/// ```
/// use hearth_core::HearthConfig;
///
/// let config = HearthConfig::default();
/// assert_eq!(config.menu_page_size, 10);
/// assert_eq!(config.redeed_range, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HearthConfig {
    /// Choices per choice-menu page
    #[serde(default = "default_page_size")]
    pub menu_page_size: usize,
    /// Maximum tile distance from which an addon can be redeeded
    #[serde(default = "default_redeed_range")]
    pub redeed_range: i32,
    /// Extra catalog files overriding the built-in families
    #[serde(default)]
    pub catalog_dir: Option<PathBuf>,
    /// World database location; in-memory when unset
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_redeed_range() -> i32 {
    3
}

impl HearthConfig {
    /// Set the menu page size (clamped to at least 1)
    pub fn with_page_size(mut self, n: usize) -> Self {
        self.menu_page_size = n.max(1);
        self
    }

    /// Set the redeed range
    pub fn with_redeed_range(mut self, range: i32) -> Self {
        self.redeed_range = range;
        self
    }
}

impl Default for HearthConfig {
    fn default() -> Self {
        Self {
            menu_page_size: default_page_size(),
            redeed_range: default_redeed_range(),
            catalog_dir: None,
            db_path: None,
        }
    }
}
