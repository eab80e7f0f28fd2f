//! Inventory store: manual adds, scan results, keyword icon inference.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::InventoryItem;

/// Icon for names that match no keyword
pub const DEFAULT_ICON: &str = "🥗";

/// Keyword table, checked in order; first hit wins
const ICON_KEYWORDS: &[(&[&str], &str)] = &[
    (&["chicken"], "🍗"),
    (&["beef"], "🥩"),
    (&["egg"], "🥚"),
    (&["milk", "yogurt"], "🥛"),
    (&["avocado"], "🥑"),
    (&["spinach", "kale"], "🥬"),
    (&["rice", "bread"], "🍚"),
    (&["apple", "banana"], "🍎"),
];

/// Infer an icon from a food name (case-insensitive substring match)
pub fn food_icon(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    ICON_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_ICON)
}

/// Food the user owns
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Inventory {
    items: Vec<InventoryItem>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Names in insertion order, as sent to the recipe backend
    pub fn names(&self) -> Vec<String> {
        self.items.iter().map(|i| i.name.clone()).collect()
    }

    /// Append a manually typed item. Blank names are ignored and no
    /// duplicate merging happens.
    pub fn add(&mut self, name: &str) -> Option<&InventoryItem> {
        if name.trim().is_empty() {
            return None;
        }

        let item = InventoryItem {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            quantity: 1.0,
            unit: "pc".to_string(),
            days_left: 7,
            icon: food_icon(name).to_string(),
        };
        debug!("Inventory add: {} ({})", item.name, item.icon);
        self.items.push(item);
        self.items.last()
    }

    pub fn extend(&mut self, items: Vec<InventoryItem>) {
        debug!("Inventory extend: {} items", items.len());
        self.items.extend(items);
    }

    /// Wholesale replace
    pub fn replace(&mut self, items: Vec<InventoryItem>) {
        self.items = items;
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_icon_inference_case_insensitive() {
        assert_eq!(food_icon("CHICKEN breast"), "🍗");
        assert_eq!(food_icon("greek yogurt"), "🥛");
        assert_eq!(food_icon("kiwi"), "🥗");
        assert_eq!(food_icon("Ground Beef"), "🥩");
        assert_eq!(food_icon("baby kale"), "🥬");
        assert_eq!(food_icon("Brown Rice"), "🍚");
        assert_eq!(food_icon("Banana"), "🍎");
    }

    #[test]
    fn test_icon_first_keyword_wins() {
        // "eggplant" contains "egg"
        assert_eq!(food_icon("Eggplant"), "🥚");
        assert_eq!(food_icon("chicken and rice"), "🍗");
    }

    #[test]
    fn test_add_defaults() {
        let mut inv = Inventory::new();
        let item = inv.add("Milk").unwrap().clone();
        assert_eq!(item.quantity, 1.0);
        assert_eq!(item.unit, "pc");
        assert_eq!(item.days_left, 7);
        assert_eq!(item.icon, "🥛");
        assert!(!item.id.is_empty());
    }

    #[test]
    fn test_add_blank_is_noop() {
        let mut inv = Inventory::new();
        assert!(inv.add("").is_none());
        assert!(inv.add("   \t").is_none());
        assert!(inv.is_empty());
    }

    #[test]
    fn test_add_no_duplicate_merging_and_unique_ids() {
        let mut inv = Inventory::new();
        for name in ["Milk", "Milk", "Eggs", "kiwi"] {
            let before = inv.len();
            inv.add(name);
            assert_eq!(inv.len(), before + 1);
        }
        assert_eq!(inv.names(), vec!["Milk", "Milk", "Eggs", "kiwi"]);

        let ids: HashSet<_> = inv.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_replace_and_clear() {
        let mut inv = Inventory::new();
        inv.add("Spinach");
        let other = Inventory {
            items: vec![InventoryItem {
                id: "x".into(),
                name: "Tofu".into(),
                quantity: 2.0,
                unit: "block".into(),
                days_left: 3,
                icon: DEFAULT_ICON.into(),
            }],
        };
        inv.replace(other.items().to_vec());
        assert_eq!(inv.names(), vec!["Tofu"]);
        inv.clear();
        assert!(inv.is_empty());
    }
}
