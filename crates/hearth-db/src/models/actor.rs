//! Actor models for database storage.

use hearth_core::{Actor, ActorId, ItemId, Point3};
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Stored actor in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 2, version = 1)]
#[native_db]
pub struct StoredActor {
    /// Primary key - actor ID.
    #[primary_key]
    pub id: u32,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    /// Serial of the actor's backpack.
    pub backpack: u32,
}

impl StoredActor {
    /// Create from a world actor.
    pub fn from_actor(actor: &Actor) -> Self {
        Self {
            id: actor.id.raw(),
            x: actor.location.x,
            y: actor.location.y,
            z: actor.location.z,
            backpack: actor.backpack.raw(),
        }
    }

    /// Convert to a world actor.
    pub fn to_actor(&self) -> Actor {
        Actor {
            id: ActorId::new(self.id),
            location: Point3::new(self.x, self.y, self.z),
            backpack: ItemId::new(self.backpack),
        }
    }
}
