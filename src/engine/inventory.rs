use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::error::InsufficientFunds;
use crate::model::{Category, Item, ItemId};

/// A single user's holdings: coin balance and owned item instances.
///
/// Item ids are assigned from a per-inventory monotonic counter starting at
/// 1; the counter never goes backwards, so ids are never reused even after
/// items are removed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    balance: u64,
    items: BTreeMap<ItemId, Item>,
    next_item_id: ItemId,
}

impl Inventory {
    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    /// Items in ascending id order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn composite_count(&self) -> usize {
        self.items
            .values()
            .filter(|i| i.category == Category::Pc)
            .count()
    }

    pub(crate) fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(&id)
    }

    /// Reserve the next item id in this inventory's namespace.
    pub(crate) fn next_id(&mut self) -> ItemId {
        self.next_item_id += 1;
        self.next_item_id
    }

    /// Insert an item under its own id. The id must come from `next_id`.
    pub(crate) fn insert(&mut self, item: Item) {
        debug_assert!(item.id <= self.next_item_id, "item id was not reserved");
        self.items.insert(item.id, item);
    }

    pub(crate) fn remove_item(&mut self, id: ItemId) -> Option<Item> {
        self.items.remove(&id)
    }

    pub(crate) fn credit(&mut self, amount: u64) -> u64 {
        self.balance += amount;
        self.balance
    }

    pub(crate) fn debit(&mut self, amount: u64) -> Result<u64, InsufficientFunds> {
        if self.balance < amount {
            return Err(InsufficientFunds {
                available: self.balance,
                required: amount,
            });
        }
        self.balance -= amount;
        Ok(self.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rarity;

    fn item(id: ItemId, category: Category) -> Item {
        Item {
            id,
            template: "test".to_string(),
            category,
            purchase_price: 100,
            rarity: Rarity::Common,
            acquired_at: 0,
            link: None,
            parts: Vec::new(),
            specs: None,
        }
    }

    #[test]
    fn empty_inventory_defaults() {
        let inventory = Inventory::default();
        assert_eq!(inventory.balance(), 0);
        assert_eq!(inventory.item_count(), 0);
        assert_eq!(inventory.composite_count(), 0);
    }

    #[test]
    fn ids_are_monotonic_and_never_reused() {
        let mut inventory = Inventory::default();
        let first = inventory.next_id();
        inventory.insert(item(first, Category::Phone));
        assert_eq!(first, 1);

        inventory.remove_item(first);
        let second = inventory.next_id();
        assert_eq!(second, 2);
    }

    #[test]
    fn credit_and_debit_track_balance() {
        let mut inventory = Inventory::default();
        assert_eq!(inventory.credit(100), 100);
        assert_eq!(inventory.debit(30).unwrap(), 70);
        assert_eq!(inventory.balance(), 70);
    }

    #[test]
    fn debit_past_zero_fails_without_mutation() {
        let mut inventory = Inventory::default();
        inventory.credit(50);
        let err = inventory.debit(51).unwrap_err();
        assert_eq!(err.available, 50);
        assert_eq!(err.required, 51);
        assert_eq!(inventory.balance(), 50);
    }

    #[test]
    fn composite_count_only_counts_pcs() {
        let mut inventory = Inventory::default();
        let a = inventory.next_id();
        inventory.insert(item(a, Category::Phone));
        let b = inventory.next_id();
        inventory.insert(item(b, Category::Pc));
        assert_eq!(inventory.item_count(), 2);
        assert_eq!(inventory.composite_count(), 1);
    }
}
