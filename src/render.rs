/// What the popup shows for the saved items, independent of Yew

use crate::domain::site_label;
use crate::tab_data::{SavedItem, TabContext};

/// Shown instead of the list when nothing is saved
pub const EMPTY_PLACEHOLDER: &str = "No hay elementos guardados";

#[derive(Debug, Clone, PartialEq)]
pub struct LinkView {
    pub href: String,
    pub text: String,
    pub site: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemView {
    pub id: String,
    pub link: Option<LinkView>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListView {
    Placeholder(&'static str),
    Items(Vec<ItemView>),
}

impl ItemView {
    pub fn from_item(item: &SavedItem) -> ItemView {
        let link = if item.url.is_empty() {
            None
        } else {
            let text = if item.title.is_empty() {
                item.url.clone()
            } else {
                item.title.clone()
            };
            Some(LinkView {
                href: item.url.clone(),
                text,
                site: site_label(&item.url),
            })
        };

        let note = if item.note.is_empty() {
            None
        } else {
            Some(item.note.clone())
        };

        ItemView {
            id: item.id.clone(),
            link,
            note,
        }
    }
}

pub fn list_view(items: &[SavedItem]) -> ListView {
    if items.is_empty() {
        ListView::Placeholder(EMPTY_PLACEHOLDER)
    } else {
        ListView::Items(items.iter().map(ItemView::from_item).collect())
    }
}

/// Saving needs a page or some note text
pub fn can_save(url: &str, note: &str) -> bool {
    !url.is_empty() || !note.trim().is_empty()
}

/// Whether the save control is enabled
pub fn save_enabled(loaded: bool, url: &str, note: &str) -> bool {
    loaded && can_save(url, note)
}

/// What a click on the save control should append
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub url: String,
    pub title: String,
    pub note: String,
}

/// Turn the pending note into a save, clearing it.
/// Leaves the note untouched and returns `None` when saving isn't allowed yet.
pub fn take_save(loaded: bool, tab: &TabContext, note: &mut String) -> Option<SaveRequest> {
    if !save_enabled(loaded, &tab.url, note) {
        return None;
    }

    Some(SaveRequest {
        url: tab.url.clone(),
        title: tab.title.clone(),
        note: std::mem::take(note),
    })
}
