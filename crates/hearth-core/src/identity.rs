//! Identity types for items, actors and catalog families

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique serial of an item in the world (addons, deeds, containers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u32);

impl ItemId {
    /// Create a new item ID
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw serial
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item:{:#010x}", self.0)
    }
}

/// Unique identifier for an actor (a player character or staff member)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u32);

impl ActorId {
    /// Create a new actor ID
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor:{}", self.0)
    }
}

/// Identifier of a catalog family ("altar", "fireplace", ...)
///
/// Uses a string-based ID for easy reference from RON catalogs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamilyId(pub String);

impl FamilyId {
    /// Create a new family ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FamilyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FamilyId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for FamilyId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id() {
        let id = ItemId::new(0x4000_0001);
        assert_eq!(id.raw(), 0x4000_0001);
        assert_eq!(format!("{}", id), "item:0x40000001");
    }

    #[test]
    fn test_family_id() {
        let id = FamilyId::new("altar");
        assert_eq!(id.as_str(), "altar");
        assert_eq!(format!("{}", id), "altar");
        assert_eq!(FamilyId::from("altar"), id);
    }
}
