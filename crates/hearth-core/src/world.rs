//! In-memory world hosting furnishings and the actors that use them
//!
//! The world processes one [`Msg`] at a time and answers with a [`Cmd`]
//! for the transport layer. Messages about items or actors that no longer
//! exist are dropped without error.

use crate::addon::{Addon, AddonKind, Furnishing};
use crate::catalog::Catalog;
use crate::deed::{ChoiceDeed, Deed, DeedStep, NOT_IN_BACKPACK};
use crate::error::{Error, Result};
use crate::menu::{ChoiceMenu, MenuReply};
use crate::persist::{GenericReader, GenericWriter, Versioned};
use crate::{ActorId, Cmd, FamilyId, HearthConfig, ItemId, Msg, Point3};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Shown when an addon that cannot be redeeded is used
pub const CANNOT_REDEED: &str = "That cannot be redeeded.";

/// Shown when an addon is used from too far away
pub const TOO_FAR: &str = "That is too far away.";

/// Shown when a redeeded deed has nowhere to go
pub const NO_BACKPACK: &str = "You have no backpack to hold the deed.";

/// First serial handed out to items
const FIRST_ITEM_SERIAL: u32 = 0x4000_0001;

/// Where an item is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Parent {
    /// Lying on (or standing in) the world at a tile
    Ground(Point3),
    /// Inside a container item
    Container(ItemId),
    /// Worn by an actor (backpacks)
    Worn(ActorId),
}

impl Parent {
    /// The tile for ground items
    pub fn location(&self) -> Option<Point3> {
        match self {
            Parent::Ground(p) => Some(*p),
            _ => None,
        }
    }
}

/// What an item is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    Container,
    Addon(Addon),
    Deed(Deed),
    ChoiceDeed(ChoiceDeed),
}

impl ItemKind {
    /// Persisted kind tag
    pub fn tag(&self) -> &'static str {
        match self {
            ItemKind::Container => "container",
            ItemKind::Addon(_) => "addon",
            ItemKind::Deed(_) => "deed",
            ItemKind::ChoiceDeed(_) => "choice_deed",
        }
    }

    /// Versioned record of this item's own fields
    pub fn to_record(&self) -> Vec<u8> {
        match self {
            ItemKind::Container => {
                let mut writer = GenericWriter::new();
                writer.write_encoded_int(0);
                writer.into_bytes()
            }
            ItemKind::Addon(addon) => addon.to_record(),
            ItemKind::Deed(deed) => deed.to_record(),
            ItemKind::ChoiceDeed(deed) => deed.to_record(),
        }
    }

    /// Rebuild an item kind from its tag and record
    pub fn from_record(tag: &str, bytes: &[u8], parent: &Parent, catalog: &Catalog) -> Result<Self> {
        match tag {
            "container" => {
                GenericReader::new(bytes).read_encoded_int()?;
                Ok(ItemKind::Container)
            }
            "addon" => {
                let anchor = parent.location().unwrap_or_default();
                Ok(ItemKind::Addon(Addon::from_record(bytes, anchor, catalog)?))
            }
            "deed" => Ok(ItemKind::Deed(Deed::from_record(bytes)?)),
            "choice_deed" => Ok(ItemKind::ChoiceDeed(ChoiceDeed::from_record(bytes)?)),
            other => Err(Error::UnknownItemTag(other.to_string())),
        }
    }
}

/// An item in the world
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    pub parent: Parent,
    pub kind: ItemKind,
}

/// A character that can use furnishings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub location: Point3,
    /// The actor's personal container
    pub backpack: ItemId,
}

/// Items, actors and the catalog they are built from
#[derive(Debug, Clone)]
pub struct World {
    catalog: Catalog,
    config: HearthConfig,
    items: IndexMap<ItemId, Item>,
    actors: IndexMap<ActorId, Actor>,
    /// Plain deeds whose owner is currently targeting a location
    targeting: IndexMap<ItemId, ActorId>,
    next_item: u32,
    next_actor: u32,
}

impl World {
    /// Create an empty world
    pub fn new(catalog: Catalog, config: HearthConfig) -> Self {
        Self {
            catalog,
            config,
            items: IndexMap::new(),
            actors: IndexMap::new(),
            targeting: IndexMap::new(),
            next_item: FIRST_ITEM_SERIAL,
            next_actor: 1,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &HearthConfig {
        &self.config
    }

    // === Actors ===

    /// Add an actor at `location`, together with an empty backpack
    pub fn add_actor(&mut self, location: Point3) -> ActorId {
        let id = ActorId::new(self.next_actor);
        self.next_actor = self.next_actor.saturating_add(1);
        let backpack = self.create_item(Parent::Worn(id), ItemKind::Container);
        self.actors.insert(
            id,
            Actor {
                id,
                location,
                backpack,
            },
        );
        id
    }

    /// Insert a previously saved actor
    ///
    /// A row carrying the largest id is rejected, since no id can follow it.
    pub fn insert_actor(&mut self, actor: Actor) -> Result<()> {
        let next = actor
            .id
            .raw()
            .checked_add(1)
            .ok_or(Error::SerialOutOfRange(actor.id.raw()))?;
        self.next_actor = self.next_actor.max(next);
        self.actors.insert(actor.id, actor);
        Ok(())
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    pub fn move_actor(&mut self, id: ActorId, location: Point3) -> bool {
        match self.actors.get_mut(&id) {
            Some(actor) => {
                actor.location = location;
                true
            }
            None => false,
        }
    }

    // === Items ===

    fn create_item(&mut self, parent: Parent, kind: ItemKind) -> ItemId {
        let id = ItemId::new(self.next_item);
        self.next_item = self.next_item.saturating_add(1);
        self.items.insert(id, Item { id, parent, kind });
        id
    }

    /// Insert a previously saved item
    ///
    /// A row carrying the largest serial is rejected, since no serial can
    /// follow it.
    pub fn insert_item(&mut self, item: Item) -> Result<()> {
        let next = item
            .id
            .raw()
            .checked_add(1)
            .ok_or(Error::SerialOutOfRange(item.id.raw()))?;
        self.next_item = self.next_item.max(next);
        self.items.insert(item.id, item);
        Ok(())
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Items directly inside a container
    pub fn contents(&self, container: ItemId) -> impl Iterator<Item = &Item> {
        self.items
            .values()
            .filter(move |item| item.parent == Parent::Container(container))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The actor's backpack, if both still exist
    pub fn backpack_of(&self, actor: ActorId) -> Option<ItemId> {
        let backpack = self.actors.get(&actor)?.backpack;
        match self.items.get(&backpack).map(|item| &item.kind) {
            Some(ItemKind::Container) => Some(backpack),
            _ => None,
        }
    }

    /// Put a choice deed for `family` into an actor's backpack
    pub fn give_choice_deed(&mut self, actor: ActorId, family: impl Into<FamilyId>) -> Option<ItemId> {
        let backpack = self.backpack_of(actor)?;
        Some(self.create_item(
            Parent::Container(backpack),
            ItemKind::ChoiceDeed(ChoiceDeed::new(family)),
        ))
    }

    /// Put a deed into an actor's backpack
    pub fn give_deed(&mut self, actor: ActorId, deed: Deed) -> Option<ItemId> {
        let backpack = self.backpack_of(actor)?;
        Some(self.create_item(Parent::Container(backpack), ItemKind::Deed(deed)))
    }

    /// Staff spawn of an addon directly into the world
    pub fn spawn_addon(&mut self, kind: AddonKind, at: Point3) -> ItemId {
        let addon = Addon::construct(kind, at, &self.catalog);
        let id = self.create_item(Parent::Ground(at), ItemKind::Addon(addon));
        info!(item = %id, family = kind.family(), %at, "addon spawned");
        id
    }

    /// Staff property edit of an addon's family payload
    pub fn edit_addon(&mut self, id: ItemId, kind: AddonKind) -> bool {
        match self.items.get_mut(&id).map(|item| &mut item.kind) {
            Some(ItemKind::Addon(addon)) => {
                addon.set_kind(kind, &self.catalog);
                true
            }
            _ => false,
        }
    }

    /// Move an item
    ///
    /// Addons only ever stand on the ground; moving one anywhere else is
    /// refused.
    pub fn move_item(&mut self, id: ItemId, parent: Parent) -> bool {
        let Some(item) = self.items.get_mut(&id) else {
            return false;
        };
        match (&mut item.kind, parent) {
            (ItemKind::Addon(addon), Parent::Ground(at)) => addon.move_to(at),
            (ItemKind::Addon(_), _) => {
                debug!(item = %id, "addons cannot leave the ground");
                return false;
            }
            _ => {}
        }
        item.parent = parent;
        true
    }

    /// Delete an item and everything inside it
    pub fn remove_item(&mut self, id: ItemId) -> Option<Item> {
        let removed = self.items.shift_remove(&id)?;
        self.targeting.shift_remove(&id);

        let children: Vec<ItemId> = self.contents(id).map(|item| item.id).collect();
        for child in children {
            self.remove_item(child);
        }
        Some(removed)
    }

    /// Whether `item` is somewhere inside the actor's backpack
    pub fn is_in_personal_container(&self, actor: ActorId, item: ItemId) -> bool {
        let Some(backpack) = self.actors.get(&actor).map(|a| a.backpack) else {
            return false;
        };

        let mut current = self.items.get(&item).map(|i| i.parent);
        // bounded by the item count so a corrupt parent cycle cannot spin
        for _ in 0..=self.items.len() {
            match current {
                Some(Parent::Container(container)) if container == backpack => return true,
                Some(Parent::Container(container)) => {
                    current = self.items.get(&container).map(|i| i.parent);
                }
                _ => return false,
            }
        }
        false
    }

    // === Interaction ===

    /// Handle one interaction message
    pub fn update(&mut self, msg: Msg) -> Cmd {
        let (actor, item) = (msg.actor(), msg.item());
        if !self.actors.contains_key(&actor) || !self.items.contains_key(&item) {
            debug!(%actor, %item, "ignoring message for missing actor or item");
            return Cmd::None;
        }

        match msg {
            Msg::DoubleClick { .. } => self.on_double_click(actor, item),
            Msg::MenuResponse { reply, .. } => self.on_menu_response(actor, item, reply),
            Msg::PlacementResponse { target, .. } => self.on_placement(actor, item, target),
        }
    }

    fn choice_menu(&self, family: &FamilyId) -> ChoiceMenu {
        match self.catalog.family(family.as_str()) {
            Some(f) => ChoiceDeed::menu(f, self.config.menu_page_size),
            None => ChoiceMenu::new(family.as_str(), Vec::new(), self.config.menu_page_size),
        }
    }

    fn choice_deed_mut(&mut self, id: ItemId) -> Option<&mut ChoiceDeed> {
        match self.items.get_mut(&id).map(|item| &mut item.kind) {
            Some(ItemKind::ChoiceDeed(deed)) => Some(deed),
            _ => None,
        }
    }

    fn on_double_click(&mut self, actor: ActorId, item: ItemId) -> Cmd {
        let in_pack = self.is_in_personal_container(actor, item);

        let family = match self.items.get(&item).map(|i| &i.kind) {
            Some(ItemKind::ChoiceDeed(deed)) => deed.family().clone(),
            Some(ItemKind::Deed(_)) => {
                if !in_pack {
                    return Cmd::message(actor, NOT_IN_BACKPACK);
                }
                self.targeting.insert(item, actor);
                return Cmd::BeginPlacement { actor, item };
            }
            Some(ItemKind::Addon(_)) => return self.redeed(actor, item),
            _ => return Cmd::None,
        };

        let menu = self.choice_menu(&family);
        let step = match self.choice_deed_mut(item) {
            Some(deed) => deed.open(actor, in_pack, &menu),
            None => DeedStep::Ignored,
        };
        self.apply_step(actor, item, step)
    }

    fn on_menu_response(&mut self, actor: ActorId, item: ItemId, reply: MenuReply) -> Cmd {
        let family = match self.items.get(&item).map(|i| &i.kind) {
            Some(ItemKind::ChoiceDeed(deed)) => deed.family().clone(),
            _ => return Cmd::None,
        };

        let menu = self.choice_menu(&family);
        let step = match self.choice_deed_mut(item) {
            Some(deed) => deed.respond(actor, reply, &menu),
            None => DeedStep::Ignored,
        };
        self.apply_step(actor, item, step)
    }

    fn on_placement(&mut self, actor: ActorId, item: ItemId, target: Option<Point3>) -> Cmd {
        let in_pack = self.is_in_personal_container(actor, item);

        match self.items.get(&item).map(|i| &i.kind) {
            Some(ItemKind::ChoiceDeed(_)) => {
                let Some(deed) = self.choice_deed_mut(item) else {
                    return Cmd::None;
                };
                if target.is_some() && !in_pack {
                    // the deed left the backpack while targeting
                    let step = deed.place(actor, None);
                    return match step {
                        DeedStep::Ignored => Cmd::None,
                        _ => Cmd::message(actor, NOT_IN_BACKPACK),
                    };
                }
                let step = deed.place(actor, target);
                self.apply_step(actor, item, step)
            }
            Some(ItemKind::Deed(deed)) => {
                let deed = *deed;
                if self.targeting.get(&item) != Some(&actor) {
                    debug!(%actor, %item, "ignoring placement for deed not being targeted");
                    return Cmd::None;
                }
                self.targeting.shift_remove(&item);

                let Some(at) = target else {
                    return Cmd::None;
                };
                if !in_pack {
                    return Cmd::message(actor, NOT_IN_BACKPACK);
                }
                self.place_addon(actor, item, *deed.kind(), at)
            }
            _ => Cmd::None,
        }
    }

    fn apply_step(&mut self, actor: ActorId, item: ItemId, step: DeedStep) -> Cmd {
        match step {
            DeedStep::Ignored => {
                debug!(%actor, %item, "stale choice deed interaction ignored");
                Cmd::None
            }
            DeedStep::Message(text) => Cmd::message(actor, text),
            DeedStep::ShowMenu(page) => Cmd::ShowMenu { actor, item, page },
            DeedStep::BeginPlacement => Cmd::BeginPlacement { actor, item },
            DeedStep::Cancelled => Cmd::None,
            DeedStep::Place { kind, at } => self.place_addon(actor, item, kind, at),
        }
    }

    /// Spawn the addon a deed stands for and consume the deed
    fn place_addon(&mut self, actor: ActorId, deed: ItemId, kind: AddonKind, at: Point3) -> Cmd {
        self.remove_item(deed);
        let addon = Addon::construct(kind, at, &self.catalog);
        let components = addon.components().len();
        let id = self.create_item(Parent::Ground(at), ItemKind::Addon(addon));
        info!(%actor, deed = %deed, addon = %id, %at, components, "addon placed from deed");

        Cmd::batch(vec![
            Cmd::ItemRemoved { item: deed },
            Cmd::ItemCreated { item: id },
        ])
    }

    /// Turn an addon back into a deed in the actor's backpack
    fn redeed(&mut self, actor: ActorId, item: ItemId) -> Cmd {
        let Some(user) = self.actors.get(&actor).copied() else {
            return Cmd::None;
        };
        let backpack = self.backpack_of(actor);
        let Some(ItemKind::Addon(addon)) = self.items.get(&item).map(|i| &i.kind) else {
            return Cmd::None;
        };

        if !addon.redeedable() {
            return Cmd::message(actor, CANNOT_REDEED);
        }
        if addon.anchor().tile_distance(&user.location) > self.config.redeed_range {
            return Cmd::message(actor, TOO_FAR);
        }
        let Some(backpack) = backpack else {
            return Cmd::message(actor, NO_BACKPACK);
        };

        let deed = addon.to_deed();
        self.remove_item(item);
        let deed_id = self.create_item(Parent::Container(backpack), ItemKind::Deed(deed));
        info!(%actor, addon = %item, deed = %deed_id, "addon redeeded");

        Cmd::batch(vec![
            Cmd::ItemRemoved { item },
            Cmd::ItemCreated { item: deed_id },
        ])
    }
}
