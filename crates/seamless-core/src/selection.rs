//! Current selection: a primary element plus the full selected set.

use crate::elements::{Element, ElementId};
use crate::store::ElementStore;

/// Selected elements in the order they were selected.
///
/// `primary` is the element the property panel edits; it is always a member
/// of `selected` when set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    primary: Option<ElementId>,
    selected: Vec<ElementId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primary(&self) -> Option<ElementId> {
        self.primary
    }

    pub fn selected(&self) -> &[ElementId] {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.selected.contains(&id)
    }

    /// Handle a click on an element.
    ///
    /// A plain click selects only `id`. With the multi-select modifier the
    /// element is toggled: adding makes it primary, removing hands primary to
    /// the most recently selected remaining element.
    pub fn click(&mut self, id: ElementId, multi: bool) {
        if !multi {
            self.select_only(id);
            return;
        }
        if let Some(pos) = self.selected.iter().position(|s| *s == id) {
            self.selected.remove(pos);
            self.primary = self.selected.last().copied();
        } else {
            self.selected.push(id);
            self.primary = Some(id);
        }
    }

    pub fn select_only(&mut self, id: ElementId) {
        self.selected.clear();
        self.selected.push(id);
        self.primary = Some(id);
    }

    /// Select every element of the store, topmost becoming primary.
    pub fn select_all(&mut self, store: &ElementStore) {
        self.selected = store.ids();
        self.primary = self.selected.last().copied();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.primary = None;
    }

    /// Drop ids that no longer exist in the store. Returns whether anything
    /// was dropped.
    pub fn retain_existing(&mut self, store: &ElementStore) -> bool {
        let before = self.selected.len();
        self.selected.retain(|id| store.contains(*id));
        if self.primary.is_some_and(|p| !self.selected.contains(&p)) {
            self.primary = self.selected.last().copied();
        }
        before != self.selected.len()
    }

    /// The selected elements, in selection order.
    pub fn selected_elements<'a>(&self, store: &'a ElementStore) -> Vec<&'a Element> {
        self.selected.iter().filter_map(|id| store.get(*id)).collect()
    }

    pub fn primary_element<'a>(&self, store: &'a ElementStore) -> Option<&'a Element> {
        self.primary.and_then(|id| store.get(id))
    }
}
