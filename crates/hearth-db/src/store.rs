//! Database store wrapper.

use crate::error::{Error, Result};
use crate::models::*;
use hearth_core::{Catalog, HearthConfig, World};
use native_db::*;
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{info, warn};

// Static models for the database
static MODELS: LazyLock<Models> = LazyLock::new(|| {
    let mut models = Models::new();
    models.define::<StoredItem>().unwrap();
    models.define::<StoredActor>().unwrap();
    models
});

/// Database store for persistent world state.
pub struct Store {
    pub(crate) db: Database<'static>,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Builder::new()
            .create(&MODELS, path.as_ref())
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self { db })
    }

    /// Create an in-memory database.
    pub fn in_memory() -> Result<Self> {
        let db = Builder::new()
            .create_in_memory(&MODELS)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self { db })
    }

    /// Open `config.db_path`, or an in-memory database when it is unset.
    pub fn from_config(config: &HearthConfig) -> Result<Self> {
        match &config.db_path {
            Some(path) => Self::open(path),
            None => Self::in_memory(),
        }
    }

    pub(crate) fn all_items(&self) -> Result<Vec<StoredItem>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredItem>()?;
        let iter = scan.all()?;
        let items: std::result::Result<Vec<StoredItem>, _> = iter.collect();
        items.map_err(|e| Error::Database(e.to_string()))
    }

    fn all_actors(&self) -> Result<Vec<StoredActor>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredActor>()?;
        let iter = scan.all()?;
        let actors: std::result::Result<Vec<StoredActor>, _> = iter.collect();
        actors.map_err(|e| Error::Database(e.to_string()))
    }

    /// Save a complete world, replacing whatever was stored before.
    pub fn save_world(&self, world: &World) -> Result<()> {
        let live_items: HashSet<u32> = world.items().map(|i| i.id.raw()).collect();
        let live_actors: HashSet<u32> = world.actors().map(|a| a.id.raw()).collect();
        let stale_items: Vec<StoredItem> = self
            .all_items()?
            .into_iter()
            .filter(|s| !live_items.contains(&s.id))
            .collect();
        let stale_actors: Vec<StoredActor> = self
            .all_actors()?
            .into_iter()
            .filter(|s| !live_actors.contains(&s.id))
            .collect();

        let rw = self.db.rw_transaction()?;

        for stale in stale_items {
            rw.remove(stale)?;
        }
        for stale in stale_actors {
            rw.remove(stale)?;
        }

        for item in world.items() {
            rw.upsert(StoredItem::from_item(item)?)?;
        }
        for actor in world.actors() {
            rw.upsert(StoredActor::from_actor(actor))?;
        }

        rw.commit()?;
        info!(items = world.len(), actors = live_actors.len(), "world saved");
        Ok(())
    }

    /// Load a complete world on top of `catalog`.
    ///
    /// Rows that cannot be decoded or restored are skipped.
    pub fn load_world(&self, catalog: Catalog, config: HearthConfig) -> Result<World> {
        let mut world = World::new(catalog, config);
        let mut skipped = 0usize;

        for stored in self.all_actors()? {
            if let Err(err) = world.insert_actor(stored.to_actor()) {
                warn!(id = stored.id, error = %err, "skipping unusable actor");
                skipped += 1;
            }
        }

        for stored in self.all_items()? {
            let restored = stored
                .to_item(world.catalog())
                .and_then(|item| Ok(world.insert_item(item)?));
            if let Err(err) = restored {
                warn!(id = stored.id, kind = %stored.kind, error = %err, "skipping unreadable item");
                skipped += 1;
            }
        }

        info!(items = world.len(), skipped, "world loaded");
        Ok(world)
    }

    /// Clear all data.
    pub fn clear(&self) -> Result<()> {
        let items = self.all_items()?;
        let actors = self.all_actors()?;

        let rw = self.db.rw_transaction()?;
        for item in items {
            rw.remove(item)?;
        }
        for actor in actors {
            rw.remove(actor)?;
        }
        rw.commit()?;
        Ok(())
    }
}

impl From<native_db::db_type::Error> for Error {
    fn from(err: native_db::db_type::Error) -> Self {
        Error::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::addon::AltarState;
    use hearth_core::{AddonKind, Deed, DeedState, ItemKind, MenuReply, Msg, Point3};

    fn sample_world() -> World {
        let catalog = hearth_script::builtin_catalog().unwrap();
        let mut world = World::new(catalog, HearthConfig::default());
        let actor = world.add_actor(Point3::new(1000, 1000, 0));
        world.give_choice_deed(actor, "tapestry").unwrap();
        world.give_deed(actor, Deed::new(AddonKind::Altar(AltarState::default())));
        world.spawn_addon(
            AddonKind::Altar(AltarState {
                variant: 3,
                flipped: true,
            }),
            Point3::new(1001, 1000, 0),
        );
        world
    }

    #[test]
    fn test_save_and_load_world() {
        let store = Store::in_memory().unwrap();
        let world = sample_world();
        store.save_world(&world).unwrap();

        let catalog = hearth_script::builtin_catalog().unwrap();
        let loaded = store.load_world(catalog, HearthConfig::default()).unwrap();

        assert_eq!(loaded.len(), world.len());
        for item in world.items() {
            assert_eq!(loaded.item(item.id), Some(item));
        }
        let actors: Vec<_> = loaded.actors().copied().collect();
        assert_eq!(actors, world.actors().copied().collect::<Vec<_>>());
    }

    #[test]
    fn test_loaded_world_continues_serials() {
        let store = Store::in_memory().unwrap();
        let world = sample_world();
        store.save_world(&world).unwrap();

        let catalog = hearth_script::builtin_catalog().unwrap();
        let mut loaded = store.load_world(catalog, HearthConfig::default()).unwrap();
        let actor = loaded.add_actor(Point3::ZERO);
        assert!(world.actor(actor).is_none());
        let backpack = loaded.actor(actor).unwrap().backpack;
        assert!(world.item(backpack).is_none());
    }

    #[test]
    fn test_open_choice_deed_loads_idle() {
        let store = Store::in_memory().unwrap();
        let mut world = sample_world();
        let actor = world.actors().next().unwrap().id;
        let deed = world
            .items()
            .find(|i| matches!(i.kind, ItemKind::ChoiceDeed(_)))
            .unwrap()
            .id;
        world.update(Msg::double_click(actor, deed));
        world.update(Msg::menu_response(actor, deed, MenuReply::Button(2)));
        store.save_world(&world).unwrap();

        let catalog = hearth_script::builtin_catalog().unwrap();
        let loaded = store.load_world(catalog, HearthConfig::default()).unwrap();
        match &loaded.item(deed).unwrap().kind {
            ItemKind::ChoiceDeed(d) => assert_eq!(d.state(), DeedState::Idle),
            other => panic!("expected choice deed, got {:?}", other),
        }
    }

    #[test]
    fn test_resave_drops_removed_items() {
        let store = Store::in_memory().unwrap();
        let mut world = sample_world();
        store.save_world(&world).unwrap();

        let addon = world
            .items()
            .find(|i| matches!(i.kind, ItemKind::Addon(_)))
            .unwrap()
            .id;
        world.remove_item(addon);
        store.save_world(&world).unwrap();

        assert_eq!(store.all_items().unwrap().len(), world.len());
    }

    #[test]
    fn test_unreadable_item_is_skipped() {
        let store = Store::in_memory().unwrap();
        store.save_world(&sample_world()).unwrap();

        let rw = store.db.rw_transaction().unwrap();
        rw.upsert(StoredItem {
            id: 0x7000_0000,
            kind: "gazebo".to_string(),
            parent: bincode::serialize(&hearth_core::Parent::Ground(Point3::ZERO)).unwrap(),
            record: vec![0],
        })
        .unwrap();
        rw.commit().unwrap();

        let catalog = hearth_script::builtin_catalog().unwrap();
        let loaded = store.load_world(catalog, HearthConfig::default()).unwrap();
        assert_eq!(loaded.len(), sample_world().len());
    }

    #[test]
    fn test_addon_anchor_survives_reload() {
        let store = Store::in_memory().unwrap();
        let mut world = sample_world();
        let actor = world.actors().next().unwrap().id;
        let backpack = world.actor(actor).unwrap().backpack;
        let at = Point3::new(51, 50, 0);
        let addon = world.spawn_addon(AddonKind::Altar(AltarState::default()), at);

        assert!(!world.move_item(addon, hearth_core::Parent::Container(backpack)));
        store.save_world(&world).unwrap();

        let catalog = hearth_script::builtin_catalog().unwrap();
        let loaded = store.load_world(catalog, HearthConfig::default()).unwrap();
        match &loaded.item(addon).unwrap().kind {
            ItemKind::Addon(a) => assert_eq!(a.anchor(), at),
            other => panic!("expected addon, got {:?}", other),
        }
        assert_eq!(loaded.item(addon), world.item(addon));
    }

    #[test]
    fn test_largest_serial_rows_are_skipped() {
        let store = Store::in_memory().unwrap();
        store.save_world(&sample_world()).unwrap();

        let rw = store.db.rw_transaction().unwrap();
        rw.upsert(StoredItem {
            id: u32::MAX,
            kind: "container".to_string(),
            parent: bincode::serialize(&hearth_core::Parent::Ground(Point3::ZERO)).unwrap(),
            record: vec![0],
        })
        .unwrap();
        rw.upsert(StoredActor {
            id: u32::MAX,
            x: 0,
            y: 0,
            z: 0,
            backpack: 1,
        })
        .unwrap();
        rw.commit().unwrap();

        let catalog = hearth_script::builtin_catalog().unwrap();
        let loaded = store.load_world(catalog, HearthConfig::default()).unwrap();
        assert_eq!(loaded.len(), sample_world().len());
        assert_eq!(loaded.actors().count(), 1);
    }

    #[test]
    fn test_clear() {
        let store = Store::in_memory().unwrap();
        store.save_world(&sample_world()).unwrap();
        store.clear().unwrap();

        let catalog = hearth_script::builtin_catalog().unwrap();
        let loaded = store.load_world(catalog, HearthConfig::default()).unwrap();
        assert!(loaded.is_empty());
        assert_eq!(loaded.actors().count(), 0);
    }
}
