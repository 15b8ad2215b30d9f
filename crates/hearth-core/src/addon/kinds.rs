//! Per-family addon state and its persisted record layout
//!
//! Each family keeps its own version history. Fields a stored version did
//! not write are defaulted in `migrate`, per family: the legacy redeedable
//! flag of statues and tapestries reads as `true` from records that predate
//! it, while freshly created instances start out `false`.

use crate::error::Result;
use crate::persist::{GenericReader, GenericWriter, Versioned};
use serde::{Deserialize, Serialize};

/// Family identifiers as they appear in catalog files
pub mod family {
    pub const ALTAR: &str = "altar";
    pub const FIREPLACE: &str = "fireplace";
    pub const FLAG: &str = "flag";
    pub const LADDER: &str = "ladder";
    pub const STATUE: &str = "statue";
    pub const DISPLAY_CASE: &str = "display_case";
    pub const WALL_SHIELD: &str = "wall_shield";
    pub const TAPESTRY: &str = "tapestry";
}

/// Capabilities shared by every placeable furnishing
pub trait Furnishing {
    /// Catalog family this furnishing is drawn from
    fn family(&self) -> &'static str;

    /// Variant index within the family
    fn variant(&self) -> i32;

    /// Orientation index (0 unless the family can be turned or flipped)
    fn orientation(&self) -> u8 {
        0
    }

    fn hue(&self) -> u16 {
        0
    }

    /// Whether the placed addon can be turned back into a deed
    fn redeedable(&self) -> bool {
        true
    }
}

/// Which wall or direction a furnishing faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    East,
    South,
}

impl Facing {
    pub fn as_byte(self) -> u8 {
        match self {
            Facing::East => 0,
            Facing::South => 1,
        }
    }

    /// Unknown bytes fall back to east
    pub fn from_byte(b: u8) -> Self {
        match b {
            1 => Facing::South,
            _ => Facing::East,
        }
    }
}

fn hue_from_int(v: i32) -> u16 {
    u16::try_from(v).unwrap_or(0)
}

// === Altar ===

/// A two-by-two altar; the flip bit mirrors its artwork
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AltarState {
    pub variant: u8,
    pub flipped: bool,
}

/// Altar fields as read from any record version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AltarRecord {
    pub variant: u8,
    pub flipped: bool,
}

impl Versioned for AltarState {
    type Raw = AltarRecord;
    const VERSION: i32 = 1;

    fn write_fields(&self, writer: &mut GenericWriter) {
        writer.write_byte(self.variant);
        writer.write_bool(self.flipped);
    }

    fn read_raw(version: i32, reader: &mut GenericReader<'_>) -> Result<AltarRecord> {
        let mut raw = AltarRecord::default();
        match version {
            1 => {
                raw.variant = reader.read_byte()?;
                raw.flipped = reader.read_bool()?;
            }
            0 => raw.variant = reader.read_byte()?,
            _ => {}
        }
        Ok(raw)
    }

    fn migrate(version: i32, raw: AltarRecord) -> Self {
        match version {
            1 => Self {
                variant: raw.variant,
                flipped: raw.flipped,
            },
            // altars could not be flipped before version 1
            0 => Self {
                variant: raw.variant,
                flipped: false,
            },
            _ => Self::default(),
        }
    }
}

impl Furnishing for AltarState {
    fn family(&self) -> &'static str {
        family::ALTAR
    }

    fn variant(&self) -> i32 {
        i32::from(self.variant)
    }

    fn orientation(&self) -> u8 {
        u8::from(self.flipped)
    }
}

// === Fireplace ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FireplaceState {
    /// Stone, sandstone, gray brick, ...
    pub material: u8,
    pub facing: Facing,
}

impl Versioned for FireplaceState {
    type Raw = Self;
    const VERSION: i32 = 0;

    fn write_fields(&self, writer: &mut GenericWriter) {
        writer.write_byte(self.material);
        writer.write_byte(self.facing.as_byte());
    }

    fn read_raw(version: i32, reader: &mut GenericReader<'_>) -> Result<Self> {
        if version != 0 {
            return Ok(Self::default());
        }
        Ok(Self {
            material: reader.read_byte()?,
            facing: Facing::from_byte(reader.read_byte()?),
        })
    }

    fn migrate(version: i32, raw: Self) -> Self {
        match version {
            0 => raw,
            _ => Self::default(),
        }
    }
}

impl Furnishing for FireplaceState {
    fn family(&self) -> &'static str {
        family::FIREPLACE
    }

    fn variant(&self) -> i32 {
        i32::from(self.material)
    }

    fn orientation(&self) -> u8 {
        self.facing.as_byte()
    }
}

// === Flag ===

/// A standing banner; the design index predates the byte-sized enums and is
/// stored as an encoded int
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlagState {
    pub design: i32,
    pub hue: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlagRecord {
    pub design: i32,
    pub hue: i32,
}

impl Versioned for FlagState {
    type Raw = FlagRecord;
    const VERSION: i32 = 1;

    fn write_fields(&self, writer: &mut GenericWriter) {
        writer.write_encoded_int(self.design);
        writer.write_int(i32::from(self.hue));
    }

    fn read_raw(version: i32, reader: &mut GenericReader<'_>) -> Result<FlagRecord> {
        let mut raw = FlagRecord::default();
        match version {
            1 => {
                raw.design = reader.read_encoded_int()?;
                raw.hue = reader.read_int()?;
            }
            0 => raw.design = reader.read_encoded_int()?,
            _ => {}
        }
        Ok(raw)
    }

    fn migrate(version: i32, raw: FlagRecord) -> Self {
        match version {
            1 => Self {
                design: raw.design,
                hue: hue_from_int(raw.hue),
            },
            0 => Self {
                design: raw.design,
                hue: 0,
            },
            _ => Self::default(),
        }
    }
}

impl Furnishing for FlagState {
    fn family(&self) -> &'static str {
        family::FLAG
    }

    fn variant(&self) -> i32 {
        self.design
    }

    fn hue(&self) -> u16 {
        self.hue
    }
}

// === Ladder ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LadderState {
    pub style: u8,
    pub facing: Facing,
}

impl Versioned for LadderState {
    type Raw = Self;
    const VERSION: i32 = 0;

    fn write_fields(&self, writer: &mut GenericWriter) {
        writer.write_byte(self.style);
        writer.write_byte(self.facing.as_byte());
    }

    fn read_raw(version: i32, reader: &mut GenericReader<'_>) -> Result<Self> {
        match version {
            0 => Ok(Self {
                style: reader.read_byte()?,
                facing: Facing::from_byte(reader.read_byte()?),
            }),
            _ => Ok(Self::default()),
        }
    }

    fn migrate(version: i32, raw: Self) -> Self {
        if version == 0 {
            raw
        } else {
            Self::default()
        }
    }
}

impl Furnishing for LadderState {
    fn family(&self) -> &'static str {
        family::LADDER
    }

    fn variant(&self) -> i32 {
        i32::from(self.style)
    }

    fn orientation(&self) -> u8 {
        self.facing.as_byte()
    }
}

// === Statue ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatueState {
    pub pose: u8,
    pub redeedable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatueRecord {
    pub pose: u8,
    pub redeedable: bool,
}

impl Versioned for StatueState {
    type Raw = StatueRecord;
    const VERSION: i32 = 1;

    fn write_fields(&self, writer: &mut GenericWriter) {
        writer.write_byte(self.pose);
        writer.write_bool(self.redeedable);
    }

    fn read_raw(version: i32, reader: &mut GenericReader<'_>) -> Result<StatueRecord> {
        let mut raw = StatueRecord::default();
        match version {
            1 => {
                raw.pose = reader.read_byte()?;
                raw.redeedable = reader.read_bool()?;
            }
            0 => raw.pose = reader.read_byte()?,
            _ => {}
        }
        Ok(raw)
    }

    fn migrate(version: i32, raw: StatueRecord) -> Self {
        match version {
            1 => Self {
                pose: raw.pose,
                redeedable: raw.redeedable,
            },
            // statues saved before the flag existed were always redeedable
            0 => Self {
                pose: raw.pose,
                redeedable: true,
            },
            _ => Self::default(),
        }
    }
}

impl Furnishing for StatueState {
    fn family(&self) -> &'static str {
        family::STATUE
    }

    fn variant(&self) -> i32 {
        i32::from(self.pose)
    }

    fn redeedable(&self) -> bool {
        self.redeedable
    }
}

// === Display case ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayCaseState {
    pub style: u8,
    pub hue: u16,
}

impl Versioned for DisplayCaseState {
    type Raw = DisplayCaseRecord;
    const VERSION: i32 = 0;

    fn write_fields(&self, writer: &mut GenericWriter) {
        writer.write_byte(self.style);
        writer.write_int(i32::from(self.hue));
    }

    fn read_raw(version: i32, reader: &mut GenericReader<'_>) -> Result<DisplayCaseRecord> {
        if version != 0 {
            return Ok(DisplayCaseRecord::default());
        }
        Ok(DisplayCaseRecord {
            style: reader.read_byte()?,
            hue: reader.read_int()?,
        })
    }

    fn migrate(version: i32, raw: DisplayCaseRecord) -> Self {
        match version {
            0 => Self {
                style: raw.style,
                hue: hue_from_int(raw.hue),
            },
            _ => Self::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayCaseRecord {
    pub style: u8,
    pub hue: i32,
}

impl Furnishing for DisplayCaseState {
    fn family(&self) -> &'static str {
        family::DISPLAY_CASE
    }

    fn variant(&self) -> i32 {
        i32::from(self.style)
    }

    fn hue(&self) -> u16 {
        self.hue
    }
}

// === Wall shield ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WallShieldState {
    pub design: u8,
    pub facing: Facing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WallShieldRecord {
    pub design: u8,
    pub facing: u8,
}

impl Versioned for WallShieldState {
    type Raw = WallShieldRecord;
    const VERSION: i32 = 1;

    fn write_fields(&self, writer: &mut GenericWriter) {
        writer.write_byte(self.design);
        writer.write_byte(self.facing.as_byte());
    }

    fn read_raw(version: i32, reader: &mut GenericReader<'_>) -> Result<WallShieldRecord> {
        let mut raw = WallShieldRecord::default();
        match version {
            1 => {
                raw.design = reader.read_byte()?;
                raw.facing = reader.read_byte()?;
            }
            0 => raw.design = reader.read_byte()?,
            _ => {}
        }
        Ok(raw)
    }

    fn migrate(version: i32, raw: WallShieldRecord) -> Self {
        match version {
            1 => Self {
                design: raw.design,
                facing: Facing::from_byte(raw.facing),
            },
            0 => Self {
                design: raw.design,
                facing: Facing::East,
            },
            _ => Self::default(),
        }
    }
}

impl Furnishing for WallShieldState {
    fn family(&self) -> &'static str {
        family::WALL_SHIELD
    }

    fn variant(&self) -> i32 {
        i32::from(self.design)
    }

    fn orientation(&self) -> u8 {
        self.facing.as_byte()
    }
}

// === Tapestry ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TapestryState {
    pub design: u8,
    pub hue: u16,
    pub redeedable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TapestryRecord {
    pub design: u8,
    pub hue: i32,
    pub redeedable: bool,
}

impl Versioned for TapestryState {
    type Raw = TapestryRecord;
    const VERSION: i32 = 2;

    fn write_fields(&self, writer: &mut GenericWriter) {
        writer.write_byte(self.design);
        writer.write_int(i32::from(self.hue));
        writer.write_bool(self.redeedable);
    }

    fn read_raw(version: i32, reader: &mut GenericReader<'_>) -> Result<TapestryRecord> {
        let mut raw = TapestryRecord::default();
        if !(0..=Self::VERSION).contains(&version) {
            return Ok(raw);
        }
        raw.design = reader.read_byte()?;
        if version >= 1 {
            raw.hue = reader.read_int()?;
        }
        if version >= 2 {
            raw.redeedable = reader.read_bool()?;
        }
        Ok(raw)
    }

    fn migrate(version: i32, raw: TapestryRecord) -> Self {
        match version {
            2 => Self {
                design: raw.design,
                hue: hue_from_int(raw.hue),
                redeedable: raw.redeedable,
            },
            1 => Self {
                design: raw.design,
                hue: hue_from_int(raw.hue),
                redeedable: true,
            },
            0 => Self {
                design: raw.design,
                hue: 0,
                redeedable: true,
            },
            _ => Self::default(),
        }
    }
}

impl Furnishing for TapestryState {
    fn family(&self) -> &'static str {
        family::TAPESTRY
    }

    fn variant(&self) -> i32 {
        i32::from(self.design)
    }

    fn hue(&self) -> u16 {
        self.hue
    }

    fn redeedable(&self) -> bool {
        self.redeedable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(version: i32, fields: impl FnOnce(&mut GenericWriter)) -> Vec<u8> {
        let mut w = GenericWriter::new();
        w.write_encoded_int(version);
        fields(&mut w);
        w.into_bytes()
    }

    #[test]
    fn test_altar_v0_defaults_unflipped() {
        let bytes = record(0, |w| w.write_byte(5));
        let altar = AltarState::from_record(&bytes).unwrap();
        assert_eq!(altar, AltarState { variant: 5, flipped: false });
        assert_eq!(altar.orientation(), 0);
    }

    #[test]
    fn test_altar_round_trip() {
        for variant in 0..8 {
            for flipped in [false, true] {
                let altar = AltarState { variant, flipped };
                assert_eq!(AltarState::from_record(&altar.to_record()).unwrap(), altar);
            }
        }
    }

    #[test]
    fn test_statue_migrate_per_version() {
        let raw = StatueRecord { pose: 2, redeedable: false };
        assert!(StatueState::migrate(0, raw).redeedable);
        assert!(!StatueState::migrate(1, raw).redeedable);
        assert!(!StatueState::default().redeedable);
    }

    #[test]
    fn test_statue_legacy_record_is_redeedable() {
        let bytes = record(0, |w| w.write_byte(3));
        let statue = StatueState::from_record(&bytes).unwrap();
        assert_eq!(statue.pose, 3);
        assert!(statue.redeedable());
    }

    #[test]
    fn test_tapestry_each_version() {
        let v0 = record(0, |w| w.write_byte(4));
        let v1 = record(1, |w| {
            w.write_byte(4);
            w.write_int(0x0482);
        });
        let v2 = record(2, |w| {
            w.write_byte(4);
            w.write_int(0x0482);
            w.write_bool(false);
        });

        assert_eq!(
            TapestryState::from_record(&v0).unwrap(),
            TapestryState { design: 4, hue: 0, redeedable: true }
        );
        assert_eq!(
            TapestryState::from_record(&v1).unwrap(),
            TapestryState { design: 4, hue: 0x0482, redeedable: true }
        );
        assert_eq!(
            TapestryState::from_record(&v2).unwrap(),
            TapestryState { design: 4, hue: 0x0482, redeedable: false }
        );
    }

    #[test]
    fn test_flag_v0_has_no_hue() {
        let bytes = record(0, |w| w.write_encoded_int(300));
        assert_eq!(
            FlagState::from_record(&bytes).unwrap(),
            FlagState { design: 300, hue: 0 }
        );
    }

    #[test]
    fn test_wall_shield_v0_faces_east() {
        let bytes = record(0, |w| w.write_byte(1));
        let shield = WallShieldState::from_record(&bytes).unwrap();
        assert_eq!(shield.facing, Facing::East);

        let south = WallShieldState { design: 1, facing: Facing::South };
        assert_eq!(WallShieldState::from_record(&south.to_record()).unwrap(), south);
    }

    #[test]
    fn test_unknown_version_yields_default() {
        let bytes = record(9, |w| w.write_byte(0xEE));
        assert_eq!(AltarState::from_record(&bytes).unwrap(), AltarState::default());
        assert_eq!(LadderState::from_record(&bytes).unwrap(), LadderState::default());
        assert_eq!(TapestryState::from_record(&bytes).unwrap(), TapestryState::default());
    }

    #[test]
    fn test_negative_hue_clamps_to_zero() {
        let bytes = record(0, |w| {
            w.write_byte(1);
            w.write_int(-5);
        });
        assert_eq!(DisplayCaseState::from_record(&bytes).unwrap().hue, 0);
    }

    #[test]
    fn test_truncated_record_is_an_error() {
        let bytes = record(1, |w| w.write_byte(2));
        assert!(StatueState::from_record(&bytes).is_err());
    }
}
