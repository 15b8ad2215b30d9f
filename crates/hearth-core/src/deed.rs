//! Deeds and choice deeds
//!
//! A [`Deed`] carries a complete [`AddonKind`] and redeems into exactly that
//! addon. A [`ChoiceDeed`] only knows its family: the owner picks a variant
//! from a paginated menu, targets a location, and the deed is consumed when
//! the addon is placed.

use crate::addon::{Addon, AddonKind, Furnishing};
use crate::catalog::{Catalog, Family};
use crate::error::Result;
use crate::menu::{ChoiceMenu, MenuPage, MenuReply, CANCEL_BUTTON};
use crate::persist::{GenericReader, GenericWriter, Versioned};
use crate::{ActorId, FamilyId, Point3};

/// Shown when a deed is used from outside the owner's backpack
pub const NOT_IN_BACKPACK: &str = "That must be in your backpack for you to use it.";

/// Shown when a choice deed's family has no placeable counterpart
pub const CANNOT_PLACE: &str = "That cannot be placed here.";

/// A token that rebuilds a specific addon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Deed {
    kind: AddonKind,
}

impl Deed {
    pub fn new(kind: AddonKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> &AddonKind {
        &self.kind
    }

    /// Build the addon this deed stands for
    pub fn redeem(&self, anchor: Point3, catalog: &Catalog) -> Addon {
        Addon::construct(self.kind, anchor, catalog)
    }

    /// Display name, e.g. "Stone Fireplace deed"
    pub fn name(&self, catalog: &Catalog) -> String {
        let label = catalog
            .family(self.kind.family())
            .map(|f| f.label(self.kind.variant()).unwrap_or(f.name()));
        match label {
            Some(label) => format!("{} deed", label),
            None => format!("{} deed", self.kind.family()),
        }
    }
}

impl Versioned for Deed {
    type Raw = Option<AddonKind>;
    const VERSION: i32 = 0;

    fn write_fields(&self, writer: &mut GenericWriter) {
        self.kind.serialize(writer);
    }

    fn read_raw(version: i32, reader: &mut GenericReader<'_>) -> Result<Option<AddonKind>> {
        if version == 0 {
            AddonKind::deserialize(reader).map(Some)
        } else {
            Ok(None)
        }
    }

    fn migrate(_version: i32, raw: Option<AddonKind>) -> Self {
        raw.map(Deed::new).unwrap_or_default()
    }
}

/// Where a choice deed is in its selection protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeedState {
    #[default]
    Idle,
    /// The menu is open for `actor`, showing `page`
    AwaitingChoice { actor: ActorId, page: usize },
    /// `actor` picked choice `index` and is targeting a location
    AwaitingPlacement { actor: ActorId, index: usize },
    /// The addon was placed; the deed is spent
    Consumed,
}

/// What the host should do after a choice deed handled an interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeedStep {
    /// Stale or irrelevant input; nothing changed
    Ignored,
    /// Tell the actor something; nothing changed
    Message(&'static str),
    ShowMenu(MenuPage),
    BeginPlacement,
    /// The selection was abandoned and the deed is idle again
    Cancelled,
    /// Spawn this addon at `at` and delete the deed
    Place { kind: AddonKind, at: Point3 },
}

/// A deed that lets its owner choose which variant of a family to place
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceDeed {
    family: FamilyId,
    state: DeedState,
}

impl ChoiceDeed {
    pub fn new(family: impl Into<FamilyId>) -> Self {
        Self {
            family: family.into(),
            state: DeedState::Idle,
        }
    }

    pub fn family(&self) -> &FamilyId {
        &self.family
    }

    pub fn state(&self) -> DeedState {
        self.state
    }

    /// The chosen index while a placement is pending
    pub fn pending_index(&self) -> Option<usize> {
        match self.state {
            DeedState::AwaitingPlacement { index, .. } => Some(index),
            _ => None,
        }
    }

    pub fn is_consumed(&self) -> bool {
        self.state == DeedState::Consumed
    }

    /// The menu listing this deed's family variants
    pub fn menu(family: &Family, page_size: usize) -> ChoiceMenu {
        ChoiceMenu::new(family.name(), family.labels().to_vec(), page_size)
    }

    /// Double-click by `actor`
    pub fn open(&mut self, actor: ActorId, in_personal_container: bool, menu: &ChoiceMenu) -> DeedStep {
        if self.is_consumed() {
            return DeedStep::Ignored;
        }
        if !in_personal_container {
            return DeedStep::Message(NOT_IN_BACKPACK);
        }

        match menu.page(0) {
            Some(page) => {
                self.state = DeedState::AwaitingChoice { actor, page: 0 };
                DeedStep::ShowMenu(page)
            }
            None => {
                self.state = DeedState::Idle;
                DeedStep::Message(CANNOT_PLACE)
            }
        }
    }

    /// A reply to the menu shown by [`ChoiceDeed::open`]
    pub fn respond(&mut self, actor: ActorId, reply: MenuReply, menu: &ChoiceMenu) -> DeedStep {
        let page = match self.state {
            DeedState::AwaitingChoice { actor: owner, page } if owner == actor => page,
            _ => return DeedStep::Ignored,
        };

        match reply {
            MenuReply::Button(CANCEL_BUTTON) => {
                self.state = DeedState::Idle;
                DeedStep::Cancelled
            }
            MenuReply::Button(button) => match menu.choice_for_button(button) {
                Some(index) => {
                    self.state = DeedState::AwaitingPlacement { actor, index };
                    DeedStep::BeginPlacement
                }
                None => {
                    self.state = DeedState::Idle;
                    DeedStep::Cancelled
                }
            },
            MenuReply::NextPage => {
                let next = (page + 1).min(menu.page_count().saturating_sub(1));
                self.show_page(actor, next, menu)
            }
            MenuReply::PreviousPage => self.show_page(actor, page.saturating_sub(1), menu),
        }
    }

    fn show_page(&mut self, actor: ActorId, page: usize, menu: &ChoiceMenu) -> DeedStep {
        match menu.page(page) {
            Some(rendered) => {
                self.state = DeedState::AwaitingChoice { actor, page };
                DeedStep::ShowMenu(rendered)
            }
            None => {
                self.state = DeedState::Idle;
                DeedStep::Cancelled
            }
        }
    }

    /// The targeting result; `None` means the actor cancelled
    pub fn place(&mut self, actor: ActorId, target: Option<Point3>) -> DeedStep {
        let index = match self.state {
            DeedState::AwaitingPlacement { actor: owner, index } if owner == actor => index,
            _ => return DeedStep::Ignored,
        };

        let Some(at) = target else {
            self.state = DeedState::Idle;
            return DeedStep::Cancelled;
        };

        match AddonKind::from_choice(self.family.as_str(), index) {
            Some(kind) => {
                self.state = DeedState::Consumed;
                DeedStep::Place { kind, at }
            }
            None => {
                self.state = DeedState::Idle;
                DeedStep::Message(CANNOT_PLACE)
            }
        }
    }
}

impl Default for ChoiceDeed {
    fn default() -> Self {
        Self::new(FamilyId::new(""))
    }
}

/// Only the family is persisted; a loaded choice deed is always idle
impl Versioned for ChoiceDeed {
    type Raw = Option<String>;
    const VERSION: i32 = 0;

    fn write_fields(&self, writer: &mut GenericWriter) {
        writer.write_string(Some(self.family.as_str()));
    }

    fn read_raw(version: i32, reader: &mut GenericReader<'_>) -> Result<Option<String>> {
        match version {
            0 => reader.read_string(),
            _ => Ok(None),
        }
    }

    fn migrate(_version: i32, raw: Option<String>) -> Self {
        raw.map(ChoiceDeed::new).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addon::{StatueState, TapestryState};
    use crate::catalog::tests::sample_catalog;
    use crate::menu::DEFAULT_PAGE_SIZE;

    const OWNER: ActorId = ActorId(1);
    const STRANGER: ActorId = ActorId(2);

    fn tapestry_menu() -> ChoiceMenu {
        let catalog = sample_catalog();
        ChoiceDeed::menu(catalog.family("tapestry").unwrap(), DEFAULT_PAGE_SIZE)
    }

    fn opened(menu: &ChoiceMenu) -> ChoiceDeed {
        let mut deed = ChoiceDeed::new("tapestry");
        let step = deed.open(OWNER, true, menu);
        assert!(matches!(step, DeedStep::ShowMenu(ref page) if page.index == 0));
        deed
    }

    #[test]
    fn test_open_outside_backpack() {
        let menu = tapestry_menu();
        let mut deed = ChoiceDeed::new("tapestry");
        assert_eq!(deed.open(OWNER, false, &menu), DeedStep::Message(NOT_IN_BACKPACK));
        assert_eq!(deed.state(), DeedState::Idle);
    }

    #[test]
    fn test_cancel_button_returns_to_idle() {
        let menu = tapestry_menu();
        let mut deed = opened(&menu);
        assert_eq!(deed.respond(OWNER, MenuReply::cancel(), &menu), DeedStep::Cancelled);
        assert_eq!(deed.state(), DeedState::Idle);
        assert_eq!(deed.pending_index(), None);
    }

    #[test]
    fn test_every_button_maps_to_previous_index() {
        let menu = tapestry_menu();
        for button in 1..=menu.len() {
            let mut deed = opened(&menu);
            assert_eq!(
                deed.respond(OWNER, MenuReply::Button(button), &menu),
                DeedStep::BeginPlacement
            );
            assert_eq!(deed.pending_index(), Some(button - 1));
            assert!(matches!(deed.state(), DeedState::AwaitingPlacement { .. }));
        }
    }

    #[test]
    fn test_out_of_range_button_cancels() {
        let menu = tapestry_menu();
        let mut deed = opened(&menu);
        let step = deed.respond(OWNER, MenuReply::Button(menu.len() + 1), &menu);
        assert_eq!(step, DeedStep::Cancelled);
        assert_eq!(deed.state(), DeedState::Idle);
    }

    #[test]
    fn test_page_navigation() {
        let menu = tapestry_menu();
        let mut deed = opened(&menu);

        let step = deed.respond(OWNER, MenuReply::NextPage, &menu);
        assert!(matches!(step, DeedStep::ShowMenu(ref page) if page.index == 1));
        let step = deed.respond(OWNER, MenuReply::NextPage, &menu);
        assert!(matches!(step, DeedStep::ShowMenu(ref page) if page.index == 2));
        // already on the last page
        let step = deed.respond(OWNER, MenuReply::NextPage, &menu);
        assert!(matches!(step, DeedStep::ShowMenu(ref page) if page.index == 2));

        let step = deed.respond(OWNER, MenuReply::PreviousPage, &menu);
        assert!(matches!(step, DeedStep::ShowMenu(ref page) if page.index == 1));
        assert_eq!(deed.state(), DeedState::AwaitingChoice { actor: OWNER, page: 1 });

        // buttons keep their global numbering on later pages
        assert_eq!(deed.respond(OWNER, MenuReply::Button(12), &menu), DeedStep::BeginPlacement);
        assert_eq!(deed.pending_index(), Some(11));
    }

    #[test]
    fn test_reply_without_open_menu_is_ignored() {
        let menu = tapestry_menu();
        let mut deed = ChoiceDeed::new("tapestry");
        assert_eq!(deed.respond(OWNER, MenuReply::Button(1), &menu), DeedStep::Ignored);

        let mut deed = opened(&menu);
        assert_eq!(deed.respond(STRANGER, MenuReply::Button(1), &menu), DeedStep::Ignored);
        assert_eq!(deed.state(), DeedState::AwaitingChoice { actor: OWNER, page: 0 });
    }

    #[test]
    fn test_cancelled_placement_discards_choice() {
        let menu = tapestry_menu();
        let mut deed = opened(&menu);
        deed.respond(OWNER, MenuReply::Button(3), &menu);
        assert_eq!(deed.place(OWNER, None), DeedStep::Cancelled);
        assert_eq!(deed.state(), DeedState::Idle);
        assert_eq!(deed.pending_index(), None);
    }

    #[test]
    fn test_confirmed_placement_consumes_deed() {
        let menu = tapestry_menu();
        let mut deed = opened(&menu);
        deed.respond(OWNER, MenuReply::Button(3), &menu);

        let at = Point3::new(1000, 1000, 0);
        let step = deed.place(OWNER, Some(at));
        assert_eq!(
            step,
            DeedStep::Place {
                kind: AddonKind::Tapestry(TapestryState {
                    design: 2,
                    hue: 0,
                    redeedable: false,
                }),
                at,
            }
        );
        assert!(deed.is_consumed());
        assert_eq!(deed.open(OWNER, true, &menu), DeedStep::Ignored);
        assert_eq!(deed.place(OWNER, Some(at)), DeedStep::Ignored);
    }

    #[test]
    fn test_unknown_family_cannot_place() {
        let menu = ChoiceMenu::new("Gazebo", vec!["Gazebo".to_string()], DEFAULT_PAGE_SIZE);
        let mut deed = ChoiceDeed::new("gazebo");
        deed.open(OWNER, true, &menu);
        deed.respond(OWNER, MenuReply::Button(1), &menu);
        assert_eq!(deed.place(OWNER, Some(Point3::ZERO)), DeedStep::Message(CANNOT_PLACE));
        assert_eq!(deed.state(), DeedState::Idle);
    }

    #[test]
    fn test_deed_name_and_record() {
        let catalog = sample_catalog();
        let deed = Deed::new(AddonKind::Statue(StatueState {
            pose: 1,
            redeedable: true,
        }));
        assert_eq!(deed.name(&catalog), "Statue 1 deed");

        let unlisted = Deed::new(AddonKind::Statue(StatueState {
            pose: 9,
            redeedable: true,
        }));
        assert_eq!(unlisted.name(&catalog), "Statue deed");
        let unknown = Deed::new(AddonKind::Flag(crate::addon::FlagState::default()));
        assert_eq!(unknown.name(&catalog), "flag deed");
        assert_eq!(Deed::from_record(&deed.to_record()).unwrap(), deed);
    }

    #[test]
    fn test_choice_deed_record_restores_idle() {
        let menu = tapestry_menu();
        let deed = opened(&menu);
        let restored = ChoiceDeed::from_record(&deed.to_record()).unwrap();
        assert_eq!(restored.family().as_str(), "tapestry");
        assert_eq!(restored.state(), DeedState::Idle);
    }
}
