//! Item models for database storage.

use crate::error::Result;
use hearth_core::{Catalog, Item, ItemId, ItemKind, Parent};
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Stored item in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 1, version = 1)]
#[native_db]
pub struct StoredItem {
    /// Primary key - item serial.
    #[primary_key]
    pub id: u32,
    /// Item kind tag.
    #[secondary_key]
    pub kind: String,
    /// Serialized location.
    pub parent: Vec<u8>,
    /// Versioned record of the item's own fields.
    pub record: Vec<u8>,
}

impl StoredItem {
    /// Create from a world item.
    pub fn from_item(item: &Item) -> Result<Self> {
        Ok(Self {
            id: item.id.raw(),
            kind: item.kind.tag().to_string(),
            parent: bincode::serialize(&item.parent)?,
            record: item.kind.to_record(),
        })
    }

    /// Convert to a world item, rebuilding addon components from `catalog`.
    pub fn to_item(&self, catalog: &Catalog) -> Result<Item> {
        let parent: Parent = bincode::deserialize(&self.parent)?;
        let kind = ItemKind::from_record(&self.kind, &self.record, &parent, catalog)?;
        Ok(Item {
            id: ItemId::new(self.id),
            parent,
            kind,
        })
    }
}
