//! Common query patterns for the database.

use crate::error::{Error, Result};
use crate::models::*;
use crate::store::Store;
use hearth_core::{Catalog, Item};
use tracing::warn;

impl Store {
    fn stored_by_kind(&self, kind: &str) -> Result<Vec<StoredItem>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().secondary::<StoredItem>(StoredItemKey::kind)?;
        let iter = scan.start_with(kind)?;
        let items: std::result::Result<Vec<StoredItem>, _> = iter.collect();
        let items = items.map_err(|e| Error::Database(e.to_string()))?;
        // prefix scan; keep exact tag matches only
        Ok(items.into_iter().filter(|s| s.kind == kind).collect())
    }

    /// Get all items with a specific kind tag.
    pub fn items_by_kind(&self, kind: &str, catalog: &Catalog) -> Result<Vec<Item>> {
        let mut items = Vec::new();
        for stored in self.stored_by_kind(kind)? {
            match stored.to_item(catalog) {
                Ok(item) => items.push(item),
                Err(err) => warn!(id = stored.id, error = %err, "skipping unreadable item"),
            }
        }
        Ok(items)
    }

    /// Count items with a specific kind tag.
    pub fn count_items_by_kind(&self, kind: &str) -> Result<usize> {
        Ok(self.stored_by_kind(kind)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::{AddonKind, HearthConfig, ItemKind, Point3, World};

    #[test]
    fn test_items_by_kind() {
        let catalog = hearth_script::builtin_catalog().unwrap();
        let mut world = World::new(catalog.clone(), HearthConfig::default());
        let actor = world.add_actor(Point3::ZERO);
        world.give_choice_deed(actor, "statue");
        world.give_choice_deed(actor, "flag");
        let kind = AddonKind::from_choice("fireplace", 1).unwrap();
        world.spawn_addon(kind, Point3::new(5, 5, 0));

        let store = Store::in_memory().unwrap();
        store.save_world(&world).unwrap();

        assert_eq!(store.count_items_by_kind("choice_deed").unwrap(), 2);
        assert_eq!(store.count_items_by_kind("container").unwrap(), 1);
        assert_eq!(store.count_items_by_kind("deed").unwrap(), 0);

        let addons = store.items_by_kind("addon", &catalog).unwrap();
        assert_eq!(addons.len(), 1);
        match &addons[0].kind {
            ItemKind::Addon(addon) => {
                assert_eq!(*addon.kind(), kind);
                assert_eq!(addon.components().len(), 2);
            }
            other => panic!("expected addon, got {:?}", other),
        }
    }
}
