//! Hearth Core - placeable furnishings for a tile-based game world
//!
//! This crate provides the core types and runtime for hearth:
//! - A component catalog mapping (family, variant, orientation) to visuals
//! - Addons assembled from catalog components around an anchor tile
//! - Deeds and choice deeds that turn into addons when placed
//! - A paginated choice menu contract for the transport layer
//! - A versioned binary record format with in-place migration
//! - An Elm-style [`World`] that turns [`Msg`] into [`Cmd`]
//!
//! ## Flow
//!
//! A choice deed in an actor's backpack is double-clicked, the actor picks
//! a variant from the menu, targets a tile, and the deed is replaced by the
//! addon. Redeedable addons can be turned back into a [`Deed`] that rebuilds
//! exactly the same addon.

pub mod addon;
pub mod catalog;
mod cmd;
mod config;
pub mod deed;
mod error;
mod geometry;
mod identity;
pub mod menu;
mod msg;
pub mod persist;
pub mod world;

pub use addon::{Addon, AddonKind, Facing, Furnishing, PlacedComponent};
pub use catalog::{Catalog, CatalogEntry, Family, FamilyDef, VariantDef};
pub use cmd::Cmd;
pub use config::HearthConfig;
pub use deed::{ChoiceDeed, Deed, DeedState, DeedStep};
pub use error::{Error, Result};
pub use geometry::Point3;
pub use identity::{ActorId, FamilyId, ItemId};
pub use menu::{ChoiceMenu, MenuEntry, MenuPage, MenuReply};
pub use msg::Msg;
pub use persist::{GenericReader, GenericWriter, Versioned};
pub use world::{Actor, Item, ItemKind, Parent, World};
