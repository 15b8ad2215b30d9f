//! Component catalog
//!
//! Static tables mapping a family discriminator (variant index plus
//! orientation) to the visual components an addon is built from. Catalogs
//! are loaded once and never mutated afterwards.

use crate::error::{Error, Result};
use crate::{FamilyId, Point3};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One visual component of an addon, relative to the addon's anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CatalogEntry {
    /// Graphic (art tile) identifier
    pub visual_id: u16,
    /// Offset from the anchor tile
    pub offset: Point3,
}

impl CatalogEntry {
    pub const fn new(visual_id: u16, offset: Point3) -> Self {
        Self { visual_id, offset }
    }
}

/// A selectable variant of a family as written in catalog files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantDef {
    /// Label shown in choice menus
    pub label: String,
    /// Flat graphic table; each orientation consumes the next
    /// `footprint.len()` IDs in declaration order
    pub graphics: Vec<u16>,
}

impl VariantDef {
    pub fn new(label: impl Into<String>, graphics: Vec<u16>) -> Self {
        Self {
            label: label.into(),
            graphics,
        }
    }
}

/// Definition of an addon family as written in catalog files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyDef {
    /// Unique identifier for this family
    pub id: FamilyId,
    /// Display name (used as the choice menu title)
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Relative positions per orientation
    pub footprints: Vec<Vec<Point3>>,
    /// Variants in menu order
    pub variants: Vec<VariantDef>,
}

impl FamilyDef {
    /// Create a new family definition with a single orientation
    pub fn new(id: impl Into<FamilyId>, name: impl Into<String>, footprint: Vec<Point3>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            footprints: vec![footprint],
            variants: Vec::new(),
        }
    }

    /// Add another orientation footprint
    pub fn with_footprint(mut self, footprint: Vec<Point3>) -> Self {
        self.footprints.push(footprint);
        self
    }

    /// Add a variant
    pub fn with_variant(mut self, label: impl Into<String>, graphics: Vec<u16>) -> Self {
        self.variants.push(VariantDef::new(label, graphics));
        self
    }
}

/// A validated family with precomputed component tables
#[derive(Debug, Clone)]
pub struct Family {
    id: FamilyId,
    name: String,
    description: String,
    labels: Vec<String>,
    /// `tables[variant][orientation]`
    tables: Vec<Vec<Vec<CatalogEntry>>>,
}

impl Family {
    /// Validate a definition and build its lookup tables
    pub fn build(def: FamilyDef) -> Result<Self> {
        if def.footprints.is_empty() || def.footprints.iter().any(|f| f.is_empty()) {
            return Err(Error::InvalidCatalog(format!(
                "family '{}' has an empty footprint",
                def.id
            )));
        }

        let cells: usize = def.footprints.iter().map(Vec::len).sum();
        let mut labels = Vec::with_capacity(def.variants.len());
        let mut tables = Vec::with_capacity(def.variants.len());

        for variant in def.variants {
            if variant.graphics.len() != cells {
                return Err(Error::InvalidCatalog(format!(
                    "family '{}' variant '{}' has {} graphics, footprints need {}",
                    def.id,
                    variant.label,
                    variant.graphics.len(),
                    cells
                )));
            }

            let mut graphics = variant.graphics.iter().copied();
            let orientations: Vec<Vec<CatalogEntry>> = def
                .footprints
                .iter()
                .map(|footprint| {
                    footprint
                        .iter()
                        .zip(graphics.by_ref())
                        .map(|(offset, visual_id)| CatalogEntry::new(visual_id, *offset))
                        .collect::<Vec<_>>()
                })
                .collect();

            labels.push(variant.label);
            tables.push(orientations);
        }

        Ok(Self {
            id: def.id,
            name: def.name,
            description: def.description,
            labels,
            tables,
        })
    }

    pub fn id(&self) -> &FamilyId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Variant labels in declaration order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Label of a single variant
    pub fn label(&self, variant: i32) -> Option<&str> {
        usize::try_from(variant)
            .ok()
            .and_then(|v| self.labels.get(v))
            .map(String::as_str)
    }

    /// Number of variants
    pub fn variant_count(&self) -> usize {
        self.tables.len()
    }

    /// Number of orientations every variant provides
    pub fn orientation_count(&self) -> usize {
        self.tables.first().map(Vec::len).unwrap_or(0)
    }

    /// Components for a discriminator; empty when it is out of range
    pub fn lookup(&self, variant: i32, orientation: u8) -> &[CatalogEntry] {
        usize::try_from(variant)
            .ok()
            .and_then(|v| self.tables.get(v))
            .and_then(|orientations| orientations.get(usize::from(orientation)))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// All loaded families, in load order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    families: IndexMap<FamilyId, Family>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate definitions and build a catalog
    pub fn from_defs(defs: impl IntoIterator<Item = FamilyDef>) -> Result<Self> {
        let mut catalog = Self::new();
        for def in defs {
            catalog.insert(def)?;
        }
        Ok(catalog)
    }

    /// Add one family; its id must not already be present
    pub fn insert(&mut self, def: FamilyDef) -> Result<()> {
        if self.families.contains_key(&def.id) {
            return Err(Error::DuplicateFamily(def.id.to_string()));
        }
        let family = Family::build(def)?;
        self.families.insert(family.id.clone(), family);
        Ok(())
    }

    /// Add or replace a family, keeping its original position on replace
    pub fn upsert(&mut self, def: FamilyDef) -> Result<()> {
        let family = Family::build(def)?;
        self.families.insert(family.id.clone(), family);
        Ok(())
    }

    /// Get a family by ID
    pub fn family(&self, id: &str) -> Option<&Family> {
        self.families.get(&FamilyId::new(id))
    }

    /// Components for a family discriminator; empty for unknown families
    /// and out-of-range variants or orientations
    pub fn lookup(&self, family: &str, variant: i32, orientation: u8) -> &[CatalogEntry] {
        self.family(family)
            .map(|f| f.lookup(variant, orientation))
            .unwrap_or(&[])
    }

    /// Iterate families in load order
    pub fn families(&self) -> impl Iterator<Item = &Family> {
        self.families.values()
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    const SQUARE: [Point3; 4] = [
        Point3::new(0, 0, 0),
        Point3::new(0, 1, 0),
        Point3::new(1, 1, 0),
        Point3::new(1, 0, 0),
    ];

    /// A small catalog shared by tests across the crate
    pub(crate) fn sample_catalog() -> Catalog {
        let mut altar = FamilyDef::new("altar", "Altar", SQUARE.to_vec()).with_footprint(SQUARE.to_vec());
        for v in 0..8u16 {
            let base = 0x2000 + v * 0x10;
            altar = altar.with_variant(format!("Altar {}", v), (base..base + 8).collect());
        }

        let fireplace = FamilyDef::new(
            "fireplace",
            "Fireplace",
            vec![Point3::new(0, 0, 0), Point3::new(0, 1, 0)],
        )
        .with_footprint(vec![Point3::new(0, 0, 0), Point3::new(-1, 0, 0)])
        .with_variant("Stone Fireplace", vec![0x0959, 0x0953, 0x0967, 0x0961])
        .with_variant("Sandstone Fireplace", vec![0x0489, 0x0475, 0x0482, 0x047B]);

        let mut statue = FamilyDef::new("statue", "Statue", vec![Point3::ZERO]);
        for (i, id) in [0x139A, 0x139B, 0x139C, 0x139D].into_iter().enumerate() {
            statue = statue.with_variant(format!("Statue {}", i), vec![id]);
        }

        let mut tapestry = FamilyDef::new(
            "tapestry",
            "Tapestry",
            vec![Point3::new(0, 0, 0), Point3::new(1, 0, 0)],
        );
        for i in 0..23u16 {
            let base = 0x4000 + i * 2;
            tapestry = tapestry.with_variant(format!("Tapestry {}", i), vec![base, base + 1]);
        }

        Catalog::from_defs([altar, fireplace, statue, tapestry]).unwrap()
    }

    #[test]
    fn test_lookup_in_range_matches_table() {
        let catalog = sample_catalog();
        let entries = catalog.lookup("altar", 3, 1);
        assert_eq!(entries.len(), 4);
        let ids: Vec<u16> = entries.iter().map(|e| e.visual_id).collect();
        assert_eq!(ids, vec![0x2034, 0x2035, 0x2036, 0x2037]);
        let offsets: Vec<Point3> = entries.iter().map(|e| e.offset).collect();
        assert_eq!(offsets, SQUARE.to_vec());
    }

    #[test]
    fn test_lookup_is_deterministic() {
        let catalog = sample_catalog();
        for variant in 0..8 {
            for orientation in 0..2 {
                let first = catalog.lookup("altar", variant, orientation).to_vec();
                assert!(!first.is_empty());
                assert_eq!(first, catalog.lookup("altar", variant, orientation));
            }
        }
    }

    #[test]
    fn test_lookup_out_of_range_is_empty() {
        let catalog = sample_catalog();
        assert!(catalog.lookup("altar", 8, 0).is_empty());
        assert!(catalog.lookup("altar", -1, 0).is_empty());
        assert!(catalog.lookup("altar", 0, 2).is_empty());
        assert!(catalog.lookup("statue", 0, 1).is_empty());
        assert!(catalog.lookup("gazebo", 0, 0).is_empty());
    }

    #[test]
    fn test_fireplace_orientations() {
        let catalog = sample_catalog();
        let south = catalog.lookup("fireplace", 0, 1);
        assert_eq!(south[0], CatalogEntry::new(0x0967, Point3::new(0, 0, 0)));
        assert_eq!(south[1], CatalogEntry::new(0x0961, Point3::new(-1, 0, 0)));
    }

    #[test]
    fn test_table_length_mismatch_rejected() {
        let def = FamilyDef::new("broken", "Broken", vec![Point3::ZERO, Point3::new(1, 0, 0)])
            .with_variant("Short", vec![0x1]);
        assert!(matches!(Catalog::from_defs([def]), Err(Error::InvalidCatalog(_))));
    }

    #[test]
    fn test_duplicate_family_rejected() {
        let a = FamilyDef::new("statue", "Statue", vec![Point3::ZERO]);
        let b = FamilyDef::new("statue", "Statue Again", vec![Point3::ZERO]);
        assert!(matches!(Catalog::from_defs([a, b]), Err(Error::DuplicateFamily(_))));
    }

    #[test]
    fn test_labels_in_declaration_order() {
        let catalog = sample_catalog();
        let family = catalog.family("fireplace").unwrap();
        assert_eq!(
            family.labels().to_vec(),
            vec!["Stone Fireplace", "Sandstone Fireplace"]
        );
        assert_eq!(family.label(1), Some("Sandstone Fireplace"));
        assert_eq!(family.label(-1), None);
        assert_eq!(family.orientation_count(), 2);
    }
}
