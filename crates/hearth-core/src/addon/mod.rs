//! Placeable addons
//!
//! An addon is a fixed arrangement of catalog components around an anchor
//! tile. Behaviour that differs per family lives in [`AddonKind`], a tagged
//! union of small state payloads that all implement [`Furnishing`].

mod kinds;

pub use kinds::{
    family, AltarRecord, AltarState, DisplayCaseRecord, DisplayCaseState, Facing, FireplaceState,
    FlagRecord, FlagState, Furnishing, LadderState, StatueRecord, StatueState, TapestryRecord,
    TapestryState, WallShieldRecord, WallShieldState,
};

use crate::catalog::Catalog;
use crate::deed::Deed;
use crate::error::{Error, Result};
use crate::persist::{GenericReader, GenericWriter, Versioned};
use crate::Point3;
use tracing::debug;

/// The family-specific payload of an addon or deed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddonKind {
    Altar(AltarState),
    Fireplace(FireplaceState),
    Flag(FlagState),
    Ladder(LadderState),
    Statue(StatueState),
    DisplayCase(DisplayCaseState),
    WallShield(WallShieldState),
    Tapestry(TapestryState),
}

impl Default for AddonKind {
    fn default() -> Self {
        AddonKind::Altar(AltarState::default())
    }
}

impl AddonKind {
    /// Persisted tag of this kind
    pub fn tag(&self) -> u8 {
        match self {
            AddonKind::Altar(_) => 0,
            AddonKind::Fireplace(_) => 1,
            AddonKind::Flag(_) => 2,
            AddonKind::Ladder(_) => 3,
            AddonKind::Statue(_) => 4,
            AddonKind::DisplayCase(_) => 5,
            AddonKind::WallShield(_) => 6,
            AddonKind::Tapestry(_) => 7,
        }
    }

    /// The kind a choice deed of `family` spawns for menu entry `index`
    ///
    /// New instances take each family's defaults, so the legacy redeedable
    /// flags start out cleared.
    pub fn from_choice(family: &str, index: usize) -> Option<Self> {
        if family == family::FLAG {
            let design = i32::try_from(index).ok()?;
            return Some(AddonKind::Flag(FlagState { design, hue: 0 }));
        }

        let v = u8::try_from(index).ok()?;
        let kind = match family {
            family::ALTAR => AddonKind::Altar(AltarState {
                variant: v,
                flipped: false,
            }),
            family::FIREPLACE => AddonKind::Fireplace(FireplaceState {
                material: v,
                facing: Facing::East,
            }),
            family::LADDER => AddonKind::Ladder(LadderState {
                style: v,
                facing: Facing::East,
            }),
            family::STATUE => AddonKind::Statue(StatueState {
                pose: v,
                ..StatueState::default()
            }),
            family::DISPLAY_CASE => AddonKind::DisplayCase(DisplayCaseState { style: v, hue: 0 }),
            family::WALL_SHIELD => AddonKind::WallShield(WallShieldState {
                design: v,
                facing: Facing::East,
            }),
            family::TAPESTRY => AddonKind::Tapestry(TapestryState {
                design: v,
                ..TapestryState::default()
            }),
            _ => return None,
        };
        Some(kind)
    }

    fn furnishing(&self) -> &dyn Furnishing {
        match self {
            AddonKind::Altar(s) => s,
            AddonKind::Fireplace(s) => s,
            AddonKind::Flag(s) => s,
            AddonKind::Ladder(s) => s,
            AddonKind::Statue(s) => s,
            AddonKind::DisplayCase(s) => s,
            AddonKind::WallShield(s) => s,
            AddonKind::Tapestry(s) => s,
        }
    }

    /// Write the tag followed by the kind's own versioned record
    pub fn serialize(&self, writer: &mut GenericWriter) {
        writer.write_byte(self.tag());
        match self {
            AddonKind::Altar(s) => s.serialize(writer),
            AddonKind::Fireplace(s) => s.serialize(writer),
            AddonKind::Flag(s) => s.serialize(writer),
            AddonKind::Ladder(s) => s.serialize(writer),
            AddonKind::Statue(s) => s.serialize(writer),
            AddonKind::DisplayCase(s) => s.serialize(writer),
            AddonKind::WallShield(s) => s.serialize(writer),
            AddonKind::Tapestry(s) => s.serialize(writer),
        }
    }

    pub fn deserialize(reader: &mut GenericReader<'_>) -> Result<Self> {
        let kind = match reader.read_byte()? {
            0 => AddonKind::Altar(AltarState::deserialize(reader)?),
            1 => AddonKind::Fireplace(FireplaceState::deserialize(reader)?),
            2 => AddonKind::Flag(FlagState::deserialize(reader)?),
            3 => AddonKind::Ladder(LadderState::deserialize(reader)?),
            4 => AddonKind::Statue(StatueState::deserialize(reader)?),
            5 => AddonKind::DisplayCase(DisplayCaseState::deserialize(reader)?),
            6 => AddonKind::WallShield(WallShieldState::deserialize(reader)?),
            7 => AddonKind::Tapestry(TapestryState::deserialize(reader)?),
            tag => return Err(Error::UnknownKind(tag)),
        };
        Ok(kind)
    }
}

impl Furnishing for AddonKind {
    fn family(&self) -> &'static str {
        self.furnishing().family()
    }

    fn variant(&self) -> i32 {
        self.furnishing().variant()
    }

    fn orientation(&self) -> u8 {
        self.furnishing().orientation()
    }

    fn hue(&self) -> u16 {
        self.furnishing().hue()
    }

    fn redeedable(&self) -> bool {
        self.furnishing().redeedable()
    }
}

/// A component placed relative to its addon's anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedComponent {
    pub visual_id: u16,
    pub offset: Point3,
    pub hue: u16,
}

/// A multi-part furnishing standing in the world
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Addon {
    kind: AddonKind,
    anchor: Point3,
    components: Vec<PlacedComponent>,
}

impl Addon {
    /// Build an addon from the catalog
    ///
    /// A discriminator the catalog does not cover places no components.
    pub fn construct(kind: AddonKind, anchor: Point3, catalog: &Catalog) -> Self {
        let components = Self::build_components(&kind, catalog);
        Self {
            kind,
            anchor,
            components,
        }
    }

    fn build_components(kind: &AddonKind, catalog: &Catalog) -> Vec<PlacedComponent> {
        let entries = catalog.lookup(kind.family(), kind.variant(), kind.orientation());
        if entries.is_empty() {
            debug!(
                family = kind.family(),
                variant = kind.variant(),
                orientation = kind.orientation(),
                "no catalog components for addon"
            );
        }
        let hue = kind.hue();
        entries
            .iter()
            .map(|entry| PlacedComponent {
                visual_id: entry.visual_id,
                offset: entry.offset,
                hue,
            })
            .collect()
    }

    pub fn kind(&self) -> &AddonKind {
        &self.kind
    }

    pub fn anchor(&self) -> Point3 {
        self.anchor
    }

    pub fn components(&self) -> &[PlacedComponent] {
        &self.components
    }

    /// Absolute tile of every component
    pub fn component_locations(&self) -> impl Iterator<Item = Point3> + '_ {
        self.components.iter().map(move |c| self.anchor + c.offset)
    }

    pub fn redeedable(&self) -> bool {
        self.kind.redeedable()
    }

    /// A deed that rebuilds this addon
    pub fn to_deed(&self) -> Deed {
        Deed::new(self.kind)
    }

    /// Replace the family payload (staff property edit) and rebuild
    pub fn set_kind(&mut self, kind: AddonKind, catalog: &Catalog) {
        self.components = Self::build_components(&kind, catalog);
        self.kind = kind;
    }

    /// Move the whole addon; offsets are unchanged
    pub fn move_to(&mut self, anchor: Point3) {
        self.anchor = anchor;
    }

    /// Persisted form of the addon (version 0: the kind)
    pub fn to_record(&self) -> Vec<u8> {
        AddonRecord(self.kind).to_record()
    }

    /// Restore an addon at `anchor`, rebuilding its components
    pub fn from_record(bytes: &[u8], anchor: Point3, catalog: &Catalog) -> Result<Self> {
        let AddonRecord(kind) = AddonRecord::from_record(bytes)?;
        Ok(Self::construct(kind, anchor, catalog))
    }
}

#[derive(Default)]
struct AddonRecord(AddonKind);

impl Versioned for AddonRecord {
    type Raw = Option<AddonKind>;
    const VERSION: i32 = 0;

    fn write_fields(&self, writer: &mut GenericWriter) {
        self.0.serialize(writer);
    }

    fn read_raw(version: i32, reader: &mut GenericReader<'_>) -> Result<Option<AddonKind>> {
        match version {
            0 => AddonKind::deserialize(reader).map(Some),
            _ => Ok(None),
        }
    }

    fn migrate(_version: i32, raw: Option<AddonKind>) -> Self {
        AddonRecord(raw.unwrap_or_default())
    }
}
