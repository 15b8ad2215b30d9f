//! RON catalog and config loader

use crate::error::{Error, Result};
use hearth_core::{Catalog, FamilyDef, FamilyId, HearthConfig};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Families shipped with the crate
const BUILTIN_FAMILIES: [(&str, &str); 8] = [
    ("altar.ron", include_str!("../data/altar.ron")),
    ("fireplace.ron", include_str!("../data/fireplace.ron")),
    ("flag.ron", include_str!("../data/flag.ron")),
    ("ladder.ron", include_str!("../data/ladder.ron")),
    ("statue.ron", include_str!("../data/statue.ron")),
    ("display_case.ron", include_str!("../data/display_case.ron")),
    ("wall_shield.ron", include_str!("../data/wall_shield.ron")),
    ("tapestry.ron", include_str!("../data/tapestry.ron")),
];

#[derive(Deserialize)]
struct FamilyFile {
    families: Vec<FamilyDef>,
}

/// Loader for RON catalog files
#[derive(Debug, Default)]
pub struct Loader {
    families: IndexMap<FamilyId, FamilyDef>,
}

impl Loader {
    /// Create a new loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Load families from a RON string
    ///
    /// Accepts either `(families: [...])` or a single family definition.
    pub fn load_families_str(&mut self, content: &str) -> Result<()> {
        let defs = match ron::from_str::<FamilyFile>(content) {
            Ok(file) => file.families,
            Err(err) => match ron::from_str::<FamilyDef>(content) {
                Ok(def) => vec![def],
                Err(_) => return Err(err.into()),
            },
        };

        for def in defs {
            if self.families.contains_key(&def.id) {
                return Err(Error::DuplicateDefinition(def.id.to_string()));
            }
            self.families.insert(def.id.clone(), def);
        }
        Ok(())
    }

    /// Load a single RON file
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        self.load_families_str(&content)?;
        debug!(path = %path.display(), "loaded catalog file");
        Ok(())
    }

    /// Load all RON files from a directory, recursing into subdirectories
    pub fn load_directory(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if !path.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Not a directory: {:?}", path),
            )));
        }

        let mut entries = fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        entries.sort();

        for file_path in entries {
            if file_path.extension().map(|e| e == "ron").unwrap_or(false) {
                self.load_file(&file_path)?;
            } else if file_path.is_dir() {
                self.load_directory(&file_path)?;
            }
        }

        Ok(())
    }

    /// Definitions loaded so far, in load order
    pub fn defs(&self) -> impl Iterator<Item = &FamilyDef> {
        self.families.values()
    }

    /// Validate every family and build the catalog
    pub fn finish(self) -> Result<Catalog> {
        Ok(Catalog::from_defs(self.families.into_values())?)
    }
}

/// The built-in families
pub fn builtin_catalog() -> Result<Catalog> {
    let mut loader = Loader::new();
    for (name, content) in BUILTIN_FAMILIES {
        loader
            .load_families_str(content)
            .map_err(|e| Error::InvalidSchema(format!("built-in {}: {}", name, e)))?;
    }
    loader.finish()
}

/// Built-in families overlaid with those in `config.catalog_dir`
///
/// A directory family replaces the built-in family with the same id.
pub fn load_catalog(config: &HearthConfig) -> Result<Catalog> {
    let mut catalog = builtin_catalog()?;

    if let Some(dir) = &config.catalog_dir {
        let mut loader = Loader::new();
        loader.load_directory(dir)?;
        let mut overlaid = 0;
        for def in loader.families.into_values() {
            catalog.upsert(def)?;
            overlaid += 1;
        }
        info!(dir = %dir.display(), overlaid, "catalog directory loaded");
    }

    info!(families = catalog.len(), "catalog ready");
    Ok(catalog)
}

/// Parse a config from a RON string
pub fn load_config_str(content: &str) -> Result<HearthConfig> {
    let config: HearthConfig = ron::from_str(content)?;
    if config.menu_page_size == 0 {
        return Err(Error::InvalidSchema(
            "menu_page_size must be at least 1".to_string(),
        ));
    }
    if config.redeed_range < 0 {
        return Err(Error::InvalidSchema(
            "redeed_range must not be negative".to_string(),
        ));
    }
    Ok(config)
}

/// Read a config file
pub fn load_config(path: impl AsRef<Path>) -> Result<HearthConfig> {
    let path = path.as_ref();
    let config = load_config_str(&fs::read_to_string(path)?)?;
    info!(path = %path.display(), "config loaded");
    Ok(config)
}
