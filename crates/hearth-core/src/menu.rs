//! Paginated choice menu contract
//!
//! The transport layer renders a [`MenuPage`] and answers with a
//! [`MenuReply`]. Button 0 is always cancel; the choice at position `i`
//! (zero-based, in declaration order) is button `i + 1`.

use serde::{Deserialize, Serialize};

/// Default number of choices per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Button index reserved for cancel
pub const CANCEL_BUTTON: usize = 0;

/// One selectable line on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub button: usize,
    pub label: String,
}

/// A single rendered page of a choice menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuPage {
    pub title: String,
    /// Zero-based page number
    pub index: usize,
    pub page_count: usize,
    pub entries: Vec<MenuEntry>,
    pub has_previous: bool,
    pub has_next: bool,
}

/// What the user did with a shown page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuReply {
    /// A button press; 0 is cancel
    Button(usize),
    NextPage,
    PreviousPage,
}

impl MenuReply {
    pub fn cancel() -> Self {
        MenuReply::Button(CANCEL_BUTTON)
    }
}

/// An ordered list of choices split into fixed-size pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceMenu {
    title: String,
    choices: Vec<String>,
    page_size: usize,
}

impl ChoiceMenu {
    /// Create a menu; a page size of zero is treated as one
    pub fn new(title: impl Into<String>, choices: Vec<String>, page_size: usize) -> Self {
        Self {
            title: title.into(),
            choices,
            page_size: page_size.max(1),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        self.choices.len().div_ceil(self.page_size)
    }

    /// Render page `k`, or `None` past the last page
    pub fn page(&self, k: usize) -> Option<MenuPage> {
        let page_count = self.page_count();
        if k >= page_count {
            return None;
        }

        let start = k * self.page_size;
        let end = (start + self.page_size).min(self.choices.len());
        let entries = self.choices[start..end]
            .iter()
            .enumerate()
            .map(|(i, label)| MenuEntry {
                button: start + i + 1,
                label: label.clone(),
            })
            .collect();

        Some(MenuPage {
            title: self.title.clone(),
            index: k,
            page_count,
            entries,
            has_previous: k > 0,
            has_next: k + 1 < page_count,
        })
    }

    /// Choice index selected by a button press, if the button is a choice
    pub fn choice_for_button(&self, button: usize) -> Option<usize> {
        if button == CANCEL_BUTTON || button > self.choices.len() {
            None
        } else {
            Some(button - 1)
        }
    }
}
