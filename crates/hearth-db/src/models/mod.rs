//! Database models for persistent storage.

mod actor;
mod item;

pub use actor::*;
pub use item::*;
