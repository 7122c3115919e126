//! Ordered element collection. Index order is z-order, back to front.

use crate::elements::{Element, ElementId};
use crate::patch::ElementPatch;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

/// The scene: every element in paint order.
///
/// Operations that reference an unknown id leave the store untouched and
/// return `false`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ElementStore {
    elements: Vec<Element>,
}

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from an element list, dropping any repeated id.
    pub fn from_elements(elements: Vec<Element>) -> Self {
        let mut seen = HashSet::new();
        let elements = elements
            .into_iter()
            .filter(|e| {
                let fresh = seen.insert(e.id());
                if !fresh {
                    log::warn!("Dropping element with duplicate id {}", e.id());
                }
                fresh
            })
            .collect();
        Self { elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    pub fn as_slice(&self) -> &[Element] {
        &self.elements
    }

    pub fn ids(&self) -> Vec<ElementId> {
        self.elements.iter().map(Element::id).collect()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id() == id)
    }

    /// Append on top of the z-order. An element whose id is already present
    /// is rejected.
    pub fn add(&mut self, element: Element) -> bool {
        if self.contains(element.id()) {
            log::warn!("Element {} already exists; not adding", element.id());
            return false;
        }
        self.elements.push(element);
        true
    }

    /// Apply a partial update in place.
    pub fn update(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        match self.get_mut(id) {
            Some(element) => patch.apply(element),
            None => {
                log::debug!("update: no element {id}");
                false
            }
        }
    }

    /// Replace an element wholesale, keeping its slot. The replacement must
    /// carry the same id.
    pub fn replace(&mut self, element: Element) -> bool {
        let id = element.id();
        match self.get_mut(id) {
            Some(slot) if *slot != element => {
                *slot = element;
                true
            }
            Some(_) => false,
            None => {
                log::debug!("replace: no element {id}");
                false
            }
        }
    }

    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let index = self.index_of(id)?;
        Some(self.elements.remove(index))
    }

    /// Remove every listed element. Returns how many were removed.
    pub fn remove_many(&mut self, ids: &[ElementId]) -> usize {
        let before = self.elements.len();
        self.elements.retain(|e| !ids.contains(&e.id()));
        before - self.elements.len()
    }

    /// Reorder to the given id sequence. Accepted only when it is a
    /// permutation of the current ids.
    pub fn reorder(&mut self, order: &[ElementId]) -> bool {
        let unique: HashSet<_> = order.iter().copied().collect();
        if order.len() != self.elements.len()
            || unique.len() != order.len()
            || !order.iter().all(|id| self.contains(*id))
        {
            log::warn!("Rejecting reorder that is not a permutation of the current elements");
            return false;
        }
        if self.ids() == order {
            return false;
        }
        let mut remaining = std::mem::take(&mut self.elements);
        for id in order {
            if let Some(index) = remaining.iter().position(|e| e.id() == *id) {
                self.elements.push(remaining.swap_remove(index));
            }
        }
        true
    }

    /// Move an element one layer toward the front.
    /// Returns false if it is already on top or unknown.
    pub fn bring_forward(&mut self, id: ElementId) -> bool {
        if let Some(pos) = self.index_of(id) {
            if pos + 1 < self.elements.len() {
                self.elements.swap(pos, pos + 1);
                return true;
            }
        }
        false
    }

    /// Move an element one layer toward the back.
    /// Returns false if it is already at the bottom or unknown.
    pub fn send_backward(&mut self, id: ElementId) -> bool {
        if let Some(pos) = self.index_of(id) {
            if pos > 0 {
                self.elements.swap(pos, pos - 1);
                return true;
            }
        }
        false
    }

    pub fn bring_to_front(&mut self, id: ElementId) -> bool {
        let last = self.elements.len().saturating_sub(1);
        match self.index_of(id) {
            Some(pos) if pos != last => self.move_layer(pos, last),
            _ => false,
        }
    }

    pub fn send_to_back(&mut self, id: ElementId) -> bool {
        match self.index_of(id) {
            Some(pos) if pos != 0 => self.move_layer(pos, 0),
            _ => false,
        }
    }

    /// Move the element at index `from` to index `to`, shifting the others.
    pub fn move_layer(&mut self, from: usize, to: usize) -> bool {
        let len = self.elements.len();
        if from >= len || to >= len || from == to {
            return false;
        }
        let element = self.elements.remove(from);
        self.elements.insert(to, element);
        true
    }

    /// Translate several elements, each by its own delta.
    pub fn translate_many(&mut self, moves: &[(ElementId, Vec2)]) -> bool {
        let mut changed = false;
        for (id, delta) in moves {
            if delta.x == 0.0 && delta.y == 0.0 {
                continue;
            }
            if let Some(element) = self.get_mut(*id) {
                element.translate(*delta);
                changed = true;
            }
        }
        changed
    }

    /// Elements under a point, topmost first.
    pub fn elements_at_point(&self, point: Point, tolerance: f64) -> Vec<ElementId> {
        self.elements
            .iter()
            .rev()
            .filter(|e| e.hit_test(point, tolerance))
            .map(Element::id)
            .collect()
    }

    /// Elements whose bounds intersect a rectangle, in z-order.
    pub fn elements_in_rect(&self, rect: Rect) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|e| rect.intersect(e.bounds()).area() > 0.0)
            .map(Element::id)
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<Vec<Element>> for ElementStore {
    fn from(elements: Vec<Element>) -> Self {
        Self::from_elements(elements)
    }
}

impl<'de> Deserialize<'de> for ElementStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Element>::deserialize(deserializer).map(Self::from_elements)
    }
}

impl FromIterator<Element> for ElementStore {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        Self::from_elements(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Circle, Rectangle};

    fn rect(x: f64) -> Element {
        Element::Rectangle(Rectangle::new(Point::new(x, 0.0), 10.0, 10.0))
    }

    fn store_of(n: usize) -> (ElementStore, Vec<ElementId>) {
        let mut store = ElementStore::new();
        for i in 0..n {
            store.add(rect(i as f64 * 20.0));
        }
        let ids = store.ids();
        (store, ids)
    }

    #[test]
    fn test_add_appends_on_top() {
        let (mut store, ids) = store_of(2);
        let circle = Element::Circle(Circle::new(Point::ZERO, 5.0));
        let cid = circle.id();
        assert!(store.add(circle.clone()));
        assert_eq!(store.ids(), vec![ids[0], ids[1], cid]);
        assert!(!store.add(circle));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_bring_forward_and_send_backward() {
        let (mut store, ids) = store_of(3);
        assert!(store.bring_forward(ids[0]));
        assert_eq!(store.ids(), vec![ids[1], ids[0], ids[2]]);
        assert!(!store.bring_forward(ids[2]));
        assert!(!store.send_backward(ids[1]));
        assert!(store.send_backward(ids[0]));
        assert_eq!(store.ids(), ids);
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let (mut store, _) = store_of(2);
        let before = store.clone();
        let ghost = uuid::Uuid::new_v4();
        assert!(!store.bring_forward(ghost));
        assert!(!store.update(ghost, &ElementPatch::default()));
        assert!(store.remove(ghost).is_none());
        assert_eq!(store, before);
    }

    #[test]
    fn test_reorder_requires_permutation() {
        let (mut store, ids) = store_of(3);
        assert!(!store.reorder(&[ids[0], ids[1]]));
        assert!(!store.reorder(&[ids[0], ids[0], ids[1]]));
        assert!(store.reorder(&[ids[2], ids[0], ids[1]]));
        assert_eq!(store.ids(), vec![ids[2], ids[0], ids[1]]);
    }

    #[test]
    fn test_front_back_and_move_layer() {
        let (mut store, ids) = store_of(4);
        assert!(store.bring_to_front(ids[0]));
        assert_eq!(store.ids(), vec![ids[1], ids[2], ids[3], ids[0]]);
        assert!(store.send_to_back(ids[0]));
        assert_eq!(store.ids(), ids);
        assert!(store.move_layer(3, 1));
        assert_eq!(store.ids(), vec![ids[0], ids[3], ids[1], ids[2]]);
        assert!(!store.move_layer(0, 9));
    }

    #[test]
    fn test_elements_at_point_topmost_first() {
        let mut store = ElementStore::new();
        let a = rect(0.0);
        let b = rect(5.0);
        let (aid, bid) = (a.id(), b.id());
        store.add(a);
        store.add(b);
        assert_eq!(store.elements_at_point(Point::new(7.0, 5.0), 0.0), vec![bid, aid]);
    }

    #[test]
    fn test_json_roundtrip_drops_duplicates() {
        let (store, _) = store_of(2);
        let json = store.to_json().unwrap();
        assert_eq!(ElementStore::from_json(&json).unwrap(), store);

        let dup: Vec<Element> = vec![store.as_slice()[0].clone(), store.as_slice()[0].clone()];
        let json = serde_json::to_string(&dup).unwrap();
        assert_eq!(ElementStore::from_json(&json).unwrap().len(), 1);
        let direct: ElementStore = serde_json::from_str(&json).unwrap();
        assert_eq!(direct.len(), 1);
    }

    #[test]
    fn test_elements_in_rect() {
        let (store, ids) = store_of(3);
        let hits = store.elements_in_rect(Rect::new(15.0, 0.0, 45.0, 5.0));
        assert_eq!(hits, vec![ids[1], ids[2]]);
        assert!(store.elements_in_rect(Rect::new(100.0, 100.0, 110.0, 110.0)).is_empty());
    }
}
