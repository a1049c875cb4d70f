//! Deduplicating merge of inventory items

use std::collections::HashMap;

use actasti_domain::{InventoryItem, InventoryKey};

/// Ordered set of inventory items keyed by [`InventoryItem::key`]
///
/// When a key is seen again the newer value replaces the older one but keeps
/// the position where the key first appeared.
#[derive(Debug, Clone, Default)]
pub struct MergedInventory {
    items: Vec<InventoryItem>,
    index: HashMap<InventoryKey, usize>,
}

impl MergedInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: impl IntoIterator<Item = InventoryItem>) -> Self {
        let mut merged = Self::new();
        merged.merge(items);
        merged
    }

    /// Merge `items` in, returning how many previously unseen keys they added.
    pub fn merge(&mut self, items: impl IntoIterator<Item = InventoryItem>) -> usize {
        let mut added = 0;
        for item in items {
            let key = item.key();
            match self.index.get(&key) {
                Some(&position) => self.items[position] = item,
                None => {
                    self.index.insert(key, self.items.len());
                    self.items.push(item);
                    added += 1;
                }
            }
        }
        added
    }

    pub fn contains(&self, key: &InventoryKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<InventoryItem> {
        self.items
    }
}

/// Deduplicate a list by inventory key, last value wins.
pub fn merge_unique(items: impl IntoIterator<Item = InventoryItem>) -> Vec<InventoryItem> {
    MergedInventory::from_items(items).into_items()
}
