//! Generated shopping list with per-item expandable detail.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::GroceryItem;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GroceryList {
    items: Vec<GroceryItem>,
}

impl GroceryList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[GroceryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Wholesale replace; every incoming item starts collapsed
    pub fn replace(&mut self, items: Vec<GroceryItem>) {
        self.items = items
            .into_iter()
            .map(|mut item| {
                item.is_expanded = false;
                item
            })
            .collect();
        debug!("Grocery list replaced: {} items", self.items.len());
    }

    /// Flip the expansion flag of the item at `index`. Returns the new flag,
    /// or None when the index is out of range.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let item = self.items.get_mut(index)?;
        item.is_expanded = !item.is_expanded;
        Some(item.is_expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str) -> GroceryItem {
        GroceryItem {
            name: name.to_string(),
            amount: "1".to_string(),
            nutrition: "Fiber".to_string(),
            substitute: "Anything green".to_string(),
            why: "Keeps you going".to_string(),
            is_expanded: false,
        }
    }

    #[test]
    fn test_toggle_only_affects_index() {
        let mut list = GroceryList::new();
        list.replace(vec![item("Oats"), item("Lentils"), item("Kale")]);

        assert_eq!(list.toggle(1), Some(true));
        let flags: Vec<bool> = list.items().iter().map(|i| i.is_expanded).collect();
        assert_eq!(flags, vec![false, true, false]);
    }

    #[test]
    fn test_double_toggle_restores() {
        let mut list = GroceryList::new();
        list.replace(vec![item("Oats"), item("Lentils")]);
        let before = list.clone();

        list.toggle(0);
        list.toggle(0);
        assert_eq!(list, before);
    }

    #[test]
    fn test_toggle_out_of_range() {
        let mut list = GroceryList::new();
        assert_eq!(list.toggle(0), None);
    }

    #[test]
    fn test_replace_resets_expansion() {
        let mut list = GroceryList::new();
        let mut expanded = item("Tofu");
        expanded.is_expanded = true;
        list.replace(vec![expanded, item("Rice")]);
        assert!(list.items().iter().all(|i| !i.is_expanded));
    }
}
