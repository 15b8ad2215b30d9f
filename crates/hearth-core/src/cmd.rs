//! Commands (side effects) produced by the world for the transport layer

use crate::menu::MenuPage;
use crate::{ActorId, ItemId};
use serde::{Deserialize, Serialize};

/// A command to be carried out by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cmd {
    /// No operation
    None,

    /// Batch multiple commands
    Batch(Vec<Cmd>),

    /// Render a choice menu page to an actor
    ShowMenu {
        actor: ActorId,
        item: ItemId,
        page: MenuPage,
    },

    /// Start location targeting for a deed
    BeginPlacement { actor: ActorId, item: ItemId },

    /// Send a system message to an actor
    SendMessage { actor: ActorId, text: String },

    /// An item entered the world or a container
    ItemCreated { item: ItemId },

    /// An item was deleted
    ItemRemoved { item: ItemId },
}

impl Cmd {
    /// Create an empty command
    pub fn none() -> Self {
        Cmd::None
    }

    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        // Flatten nested batches and filter out None
        let mut flattened: Vec<Cmd> = cmds
            .into_iter()
            .flat_map(|cmd| match cmd {
                Cmd::None => vec![],
                Cmd::Batch(inner) => inner,
                other => vec![other],
            })
            .collect();

        match flattened.len() {
            0 => Cmd::None,
            1 => flattened.remove(0),
            _ => Cmd::Batch(flattened),
        }
    }

    /// Create a message command
    pub fn message(actor: ActorId, text: impl Into<String>) -> Self {
        Cmd::SendMessage {
            actor,
            text: text.into(),
        }
    }

    /// Check if this is a None command
    pub fn is_none(&self) -> bool {
        matches!(self, Cmd::None)
    }

    /// Iterate the leaf commands of this command
    pub fn iter(&self) -> Box<dyn Iterator<Item = &Cmd> + '_> {
        match self {
            Cmd::None => Box::new(std::iter::empty()),
            Cmd::Batch(cmds) => Box::new(cmds.iter().flat_map(|c| c.iter())),
            other => Box::new(std::iter::once(other)),
        }
    }
}
