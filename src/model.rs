//! Core domain types for the gadget card engine.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::specs::PcSpecs;

/// User identifier.
pub type UserId = u64;

/// Item instance identifier, unique within one user's inventory.
pub type ItemId = u64;

/// Trade offer identifier, unique engine-wide.
pub type OfferId = u64;

/// Rarity tier, ordered from most to least frequent in draws.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Rarity {
    #[default]
    Trash,
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
}

impl Rarity {
    /// All tiers in ascending order.
    pub const ALL: [Rarity; 7] = [
        Rarity::Trash,
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
        Rarity::Mythic,
    ];

    pub fn from_name(name: &str) -> Option<Rarity> {
        match name {
            "Trash" => Some(Rarity::Trash),
            "Common" => Some(Rarity::Common),
            "Uncommon" => Some(Rarity::Uncommon),
            "Rare" => Some(Rarity::Rare),
            "Epic" => Some(Rarity::Epic),
            "Legendary" => Some(Rarity::Legendary),
            "Mythic" => Some(Rarity::Mythic),
            _ => None,
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rarity::Trash => "Trash",
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
            Rarity::Mythic => "Mythic",
        };
        f.write_str(name)
    }
}

/// Item category. `Pc` is reserved for composites built by the engine;
/// catalog templates never carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Phone,
    Tablet,
    Laptop,
    GraphicsCard,
    Processor,
    Motherboard,
    Pc,
}

impl Category {
    pub fn from_name(name: &str) -> Option<Category> {
        match name {
            "Phone" => Some(Category::Phone),
            "Tablet" => Some(Category::Tablet),
            "Laptop" => Some(Category::Laptop),
            "Graphics Card" => Some(Category::GraphicsCard),
            "Processor" => Some(Category::Processor),
            "Motherboard" => Some(Category::Motherboard),
            "PC" => Some(Category::Pc),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Phone => "Phone",
            Category::Tablet => "Tablet",
            Category::Laptop => "Laptop",
            Category::GraphicsCard => "Graphics Card",
            Category::Processor => "Processor",
            Category::Motherboard => "Motherboard",
            Category::Pc => "PC",
        };
        f.write_str(name)
    }
}

/// An owned item instance.
///
/// Exactly one of the following holds at any time: the item is a composite
/// (`category == Pc`, `parts` non-empty, `specs` present), the item is linked
/// as a part inside a composite (`link` set), or the item is free-standing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// Catalog template name, or the generated name for composites.
    pub template: String,
    pub category: Category,
    /// Price at the moment of acquisition; may differ from the template's
    /// current base price.
    pub purchase_price: u64,
    pub rarity: Rarity,
    /// Unix seconds.
    pub acquired_at: u64,
    /// Id of the composite this item is linked into, if any.
    pub link: Option<ItemId>,
    /// Part ids, in gpu/cpu/motherboard order. Non-empty iff `category == Pc`.
    pub parts: Vec<ItemId>,
    /// Generated specs. Present iff `category == Pc`.
    pub specs: Option<PcSpecs>,
}

impl Item {
    pub fn is_composite(&self) -> bool {
        self.category == Category::Pc
    }

    pub fn is_linked(&self) -> bool {
        self.link.is_some()
    }

    pub fn is_free_standing(&self) -> bool {
        !self.is_composite() && !self.is_linked()
    }
}

/// Trade offer lifecycle state. Pending offers move to exactly one of the
/// terminal states and are immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TradeStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

/// A proposed atomic exchange of items and coins between two users.
///
/// The offer references items by id; ownership is re-validated against live
/// inventory state when the offer is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeOffer {
    pub id: OfferId,
    pub from: UserId,
    pub to: UserId,
    /// Item ids offered by `from`.
    pub offered: Vec<ItemId>,
    /// Item ids requested from `to`.
    pub requested: Vec<ItemId>,
    /// Coins moving from `from` to `to` on acceptance.
    pub coins: u64,
    pub status: TradeStatus,
    /// Unix seconds.
    pub created_at: u64,
}

impl TradeOffer {
    pub fn involves(&self, user: UserId) -> bool {
        self.from == user || self.to == user
    }
}

/// A command representing the possible inputs of the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Draw a random card from the catalog.
    Draw { user: UserId },
    /// Add a named catalog template to a user's inventory at base price.
    Grant { user: UserId, template: String },
    /// Liquidate an item (simple or composite) for coins.
    Sell { user: UserId, item: ItemId },
    /// Assemble a composite PC from three parts.
    Build {
        user: UserId,
        gpu: ItemId,
        cpu: ItemId,
        mb: ItemId,
    },
    /// Remove one part from a composite.
    Eject {
        user: UserId,
        composite: ItemId,
        part: ItemId,
    },
    /// Propose a trade to another user.
    Propose {
        from: UserId,
        to: UserId,
        offered: Vec<ItemId>,
        requested: Vec<ItemId>,
        coins: u64,
    },
    /// Accept a pending trade offer.
    Accept { offer: OfferId, user: UserId },
    /// Reject a pending trade offer.
    Reject { offer: OfferId, user: UserId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rarity_tiers_are_ordered() {
        assert!(Rarity::Trash < Rarity::Common);
        assert!(Rarity::Common < Rarity::Uncommon);
        assert!(Rarity::Uncommon < Rarity::Rare);
        assert!(Rarity::Rare < Rarity::Epic);
        assert!(Rarity::Epic < Rarity::Legendary);
        assert!(Rarity::Legendary < Rarity::Mythic);
    }

    #[test]
    fn rarity_name_round_trip() {
        for rarity in Rarity::ALL {
            assert_eq!(Rarity::from_name(&rarity.to_string()), Some(rarity));
        }
        assert_eq!(Rarity::from_name("Shiny"), None);
    }

    #[test]
    fn category_name_round_trip() {
        for category in [
            Category::Phone,
            Category::Tablet,
            Category::Laptop,
            Category::GraphicsCard,
            Category::Processor,
            Category::Motherboard,
            Category::Pc,
        ] {
            assert_eq!(Category::from_name(&category.to_string()), Some(category));
        }
        assert_eq!(Category::from_name("Toaster"), None);
    }

    #[test]
    fn trade_status_default_is_pending() {
        assert_eq!(TradeStatus::default(), TradeStatus::Pending);
    }

    #[test]
    fn item_state_predicates_are_exclusive() {
        let mut item = Item {
            id: 1,
            template: "GTX 750 Ti".to_string(),
            category: Category::GraphicsCard,
            purchase_price: 50,
            rarity: Rarity::Trash,
            acquired_at: 0,
            link: None,
            parts: Vec::new(),
            specs: None,
        };
        assert!(item.is_free_standing());
        assert!(!item.is_linked());
        assert!(!item.is_composite());

        item.link = Some(9);
        assert!(item.is_linked());
        assert!(!item.is_free_standing());
    }
}
