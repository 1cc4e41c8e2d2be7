//! Runtime dialog model: dialogs, pages, and player responses.
//!
//! A [`Dialog`] is a directed graph of [`Page`]s (cycles allowed) rooted at
//! its entry page. At runtime these values are immutable once loaded;
//! the mutators exist for the authoring path only.

use std::collections::{BTreeMap, HashSet};

use thiserror::Error;

use crate::Id;

/// Where choosing a response leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Continue the conversation at the given page.
    Page(Id),
    /// End the conversation.
    End,
}

impl Target {
    /// Decode from the raw wire value; [`Id::END`] maps to [`Target::End`].
    pub fn from_raw(raw: u16) -> Self {
        if raw == Id::END.get() {
            Target::End
        } else {
            Target::Page(Id::from(raw))
        }
    }

    /// The raw wire value.
    pub fn to_raw(self) -> u16 {
        match self {
            Target::Page(id) => id.get(),
            Target::End => Id::END.get(),
        }
    }
}

/// A selectable player response on a page.
///
/// `extensions` carries fields this crate does not interpret; they are
/// preserved verbatim through load and save so newer tools can attach
/// metadata without breaking older readers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Response {
    pub target: Target,
    pub text: String,
    pub extensions: Vec<String>,
}

impl Response {
    pub fn new(target: Target, text: impl Into<String>) -> Self {
        Self {
            target,
            text: text.into(),
            extensions: Vec::new(),
        }
    }
}

/// One screen of NPC text plus the player's choices, in presentation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub id: Id,
    pub text: String,
    pub responses: Vec<Response>,
}

impl Page {
    pub fn new(id: Id, text: impl Into<String>, responses: Vec<Response>) -> Self {
        Self {
            id,
            text: text.into(),
            responses,
        }
    }
}

/// Errors from dialog construction or authoring edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialogError {
    #[error("entry page {0} does not exist in the dialog")]
    MissingEntry(Id),
    #[error("duplicate page id {0}")]
    DuplicatePage(Id),
    #[error("page {0} is the dialog entry and cannot be removed")]
    RemoveEntry(Id),
}

/// A complete branching conversation.
///
/// Invariant: `entry` always names an existing page; the constructor and
/// every mutator maintain it, so [`Dialog::entry_page`] cannot miss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    id: Id,
    title: String,
    pages: BTreeMap<Id, Page>,
    entry: Id,
}

impl Dialog {
    /// Build a dialog from its pages.
    ///
    /// # Errors
    /// [`DialogError::DuplicatePage`] when two pages share an id;
    /// [`DialogError::MissingEntry`] when `entry` names no page.
    pub fn new(id: Id, title: impl Into<String>, pages: Vec<Page>, entry: Id) -> Result<Self, DialogError> {
        let mut map = BTreeMap::new();
        for page in pages {
            let page_id = page.id;
            if map.insert(page_id, page).is_some() {
                return Err(DialogError::DuplicatePage(page_id));
            }
        }
        if !map.contains_key(&entry) {
            return Err(DialogError::MissingEntry(entry));
        }
        Ok(Self {
            id,
            title: title.into(),
            pages: map,
            entry,
        })
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Id of the page the conversation starts on.
    pub fn entry(&self) -> Id {
        self.entry
    }

    /// Look up a page. Absence is a normal end-of-conversation case for
    /// runtime callers, not an error.
    pub fn page(&self, id: Id) -> Option<&Page> {
        self.pages.get(&id)
    }

    pub fn contains_page(&self, id: Id) -> bool {
        self.pages.contains_key(&id)
    }

    /// The page the conversation starts on.
    pub fn entry_page(&self) -> &Page {
        // entry presence is a class invariant
        &self.pages[&self.entry]
    }

    /// All pages in ascending id order.
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.values()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Distinct responses across all pages, in first-seen order.
    pub fn all_responses(&self) -> Vec<&Response> {
        let mut seen = HashSet::new();
        let mut distinct = Vec::new();
        for page in self.pages.values() {
            for response in &page.responses {
                if seen.insert(response) {
                    distinct.push(response);
                }
            }
        }
        distinct
    }

    /// Every response anywhere in the dialog that leads to `page`.
    ///
    /// Used for "who points here" queries before an authoring edit removes
    /// or renumbers a page.
    pub fn responses_targeting(&self, page: &Page) -> Vec<&Response> {
        let wanted = Target::Page(page.id);
        self.pages
            .values()
            .flat_map(|p| &p.responses)
            .filter(|response| response.target == wanted)
            .collect()
    }

    /// Insert or replace a page (authoring only).
    pub fn add_page(&mut self, page: Page) -> Option<Page> {
        self.pages.insert(page.id, page)
    }

    /// Remove a page (authoring only).
    ///
    /// # Errors
    /// [`DialogError::RemoveEntry`] when `id` is the entry page; removing it
    /// would break the dialog invariant.
    pub fn remove_page(&mut self, id: Id) -> Result<Option<Page>, DialogError> {
        if id == self.entry {
            return Err(DialogError::RemoveEntry(id));
        }
        Ok(self.pages.remove(&id))
    }

    /// Re-root the dialog at an existing page (authoring only).
    ///
    /// # Errors
    /// [`DialogError::MissingEntry`] when `id` names no page.
    pub fn set_entry(&mut self, id: Id) -> Result<(), DialogError> {
        if !self.pages.contains_key(&id) {
            return Err(DialogError::MissingEntry(id));
        }
        self.entry = id;
        Ok(())
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_page_dialog() -> Dialog {
        let hello = Page::new(
            Id::from(1),
            "Hello",
            vec![Response::new(Target::Page(Id::from(2)), "Go on")],
        );
        let bye = Page::new(Id::from(2), "Bye", vec![Response::new(Target::End, "Leave")]);
        Dialog::new(Id::from(5), "Greeting", vec![hello, bye], Id::from(1)).unwrap()
    }

    #[test]
    fn entry_page_always_resolves() {
        let dialog = two_page_dialog();
        assert_eq!(dialog.entry_page().text, "Hello");
        assert_eq!(dialog.page(dialog.entry()).unwrap().id, Id::from(1));
    }

    #[test]
    fn constructor_rejects_missing_entry() {
        let page = Page::new(Id::from(1), "Hi", Vec::new());
        let result = Dialog::new(Id::from(0), "Broken", vec![page], Id::from(9));
        assert_eq!(result.unwrap_err(), DialogError::MissingEntry(Id::from(9)));
    }

    #[test]
    fn constructor_rejects_duplicate_pages() {
        let a = Page::new(Id::from(1), "A", Vec::new());
        let b = Page::new(Id::from(1), "B", Vec::new());
        let result = Dialog::new(Id::from(0), "Broken", vec![a, b], Id::from(1));
        assert_eq!(result.unwrap_err(), DialogError::DuplicatePage(Id::from(1)));
    }

    #[test]
    fn missing_page_lookup_is_none() {
        let dialog = two_page_dialog();
        assert!(dialog.page(Id::from(42)).is_none());
        assert!(!dialog.contains_page(Id::from(42)));
    }

    #[test]
    fn target_raw_round_trip_and_sentinel() {
        assert_eq!(Target::from_raw(7), Target::Page(Id::from(7)));
        assert_eq!(Target::from_raw(Id::END.get()), Target::End);
        assert_eq!(Target::End.to_raw(), 65535);
        assert_eq!(Target::Page(Id::from(7)).to_raw(), 7);
    }

    #[test]
    fn all_responses_deduplicates() {
        let repeat = Response::new(Target::End, "Never mind");
        let pages = vec![
            Page::new(Id::from(1), "A", vec![repeat.clone(), Response::new(Target::Page(Id::from(2)), "More")]),
            Page::new(Id::from(2), "B", vec![repeat.clone()]),
        ];
        let dialog = Dialog::new(Id::from(0), "D", pages, Id::from(1)).unwrap();
        let distinct = dialog.all_responses();
        assert_eq!(distinct.len(), 2);
        assert_eq!(distinct.iter().filter(|r| ***r == repeat).count(), 1);
    }

    #[test]
    fn responses_targeting_finds_reverse_references() {
        let dialog = two_page_dialog();
        let bye = dialog.page(Id::from(2)).unwrap();
        let inbound = dialog.responses_targeting(bye);
        assert_eq!(inbound.len(), 1);
        assert_eq!(inbound[0].text, "Go on");

        let hello = dialog.page(Id::from(1)).unwrap();
        assert!(dialog.responses_targeting(hello).is_empty());
    }

    #[test]
    fn entry_page_cannot_be_removed() {
        let mut dialog = two_page_dialog();
        assert_eq!(
            dialog.remove_page(Id::from(1)).unwrap_err(),
            DialogError::RemoveEntry(Id::from(1))
        );
        assert!(dialog.remove_page(Id::from(2)).unwrap().is_some());
        assert!(dialog.page(Id::from(2)).is_none());
    }

    #[test]
    fn set_entry_validates_existence() {
        let mut dialog = two_page_dialog();
        assert!(dialog.set_entry(Id::from(2)).is_ok());
        assert_eq!(dialog.entry_page().text, "Bye");
        assert_eq!(
            dialog.set_entry(Id::from(99)).unwrap_err(),
            DialogError::MissingEntry(Id::from(99))
        );
    }
}
