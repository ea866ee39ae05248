pub mod catalog;
pub mod csv;
pub mod engine;
pub mod model;
pub mod specs;
pub mod store;
pub mod valuation;

pub use catalog::{Catalog, ItemTemplate};
pub use engine::{Engine, Inventory};
pub use model::{
    Category, Command, Item, ItemId, OfferId, Rarity, TradeOffer, TradeStatus, UserId,
};
pub use store::{JsonStore, Snapshot, Store};
