//! Interaction messages delivered to the world

use crate::menu::MenuReply;
use crate::{ActorId, ItemId, Point3};
use serde::{Deserialize, Serialize};

/// A single user interaction, handled sequentially by [`crate::World::update`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Msg {
    /// The actor used an item
    DoubleClick { actor: ActorId, item: ItemId },
    /// The actor answered a menu previously opened for `item`
    MenuResponse {
        actor: ActorId,
        item: ItemId,
        reply: MenuReply,
    },
    /// The actor finished targeting for `item`; `None` when cancelled
    PlacementResponse {
        actor: ActorId,
        item: ItemId,
        target: Option<Point3>,
    },
}

impl Msg {
    pub fn double_click(actor: ActorId, item: ItemId) -> Self {
        Msg::DoubleClick { actor, item }
    }

    pub fn menu_response(actor: ActorId, item: ItemId, reply: MenuReply) -> Self {
        Msg::MenuResponse { actor, item, reply }
    }

    pub fn placement(actor: ActorId, item: ItemId, target: Option<Point3>) -> Self {
        Msg::PlacementResponse {
            actor,
            item,
            target,
        }
    }

    /// The actor that sent this message
    pub fn actor(&self) -> ActorId {
        match self {
            Msg::DoubleClick { actor, .. }
            | Msg::MenuResponse { actor, .. }
            | Msg::PlacementResponse { actor, .. } => *actor,
        }
    }

    /// The item this message is about
    pub fn item(&self) -> ItemId {
        match self {
            Msg::DoubleClick { item, .. }
            | Msg::MenuResponse { item, .. }
            | Msg::PlacementResponse { item, .. } => *item,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msg_accessors() {
        let msg = Msg::menu_response(ActorId::new(3), ItemId::new(9), MenuReply::NextPage);
        assert_eq!(msg.actor(), ActorId::new(3));
        assert_eq!(msg.item(), ItemId::new(9));
    }
}
