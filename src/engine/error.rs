//! Error types for inventory and trade operations.

use thiserror::Error;

use crate::model::{Category, ItemId, OfferId, UserId};

/// Top-level error returned by [`Engine::apply`](super::Engine::apply).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("grant failed: {0}")]
    Grant(#[from] GrantError),

    #[error("sell failed: {0}")]
    Sell(#[from] SellError),

    #[error("build failed: {0}")]
    Build(#[from] BuildError),

    #[error("eject failed: {0}")]
    Eject(#[from] EjectError),

    #[error("{0}")]
    Trade(#[from] TradeError),
}

/// Error during a named-template grant.
#[derive(Debug, Error)]
pub enum GrantError {
    #[error("no catalog template named '{0}'")]
    UnknownTemplate(String),
}

/// Error during item liquidation.
#[derive(Debug, Error)]
pub enum SellError {
    #[error("item {0} not found")]
    NotFound(ItemId),

    #[error("item {0} is linked into composite {1} and cannot be sold")]
    LinkedPart(ItemId, ItemId),

    #[error("composite {id} has {parts} part(s), only complete assemblies can be sold")]
    IncompleteComposite { id: ItemId, parts: usize },
}

/// Error during composite assembly.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("part {0} not found")]
    PartNotFound(ItemId),

    #[error("item {item} is a {found}, the slot requires a {expected}")]
    WrongSlot {
        item: ItemId,
        expected: Category,
        found: Category,
    },

    #[error("item {item} is already linked into composite {composite}")]
    AlreadyLinked { item: ItemId, composite: ItemId },
}

/// Error during part ejection.
#[derive(Debug, Error)]
pub enum EjectError {
    #[error("composite {0} not found")]
    CompositeNotFound(ItemId),

    #[error("item {0} is not a composite")]
    NotAComposite(ItemId),

    #[error("item {part} is not a part of composite {composite}")]
    PartNotPresent { composite: ItemId, part: ItemId },
}

/// Error during trade proposal, acceptance, or rejection.
#[derive(Debug, Error)]
pub enum TradeError {
    #[error("trade offer {0} not found")]
    OfferNotFound(OfferId),

    #[error("user {user} is not the recipient of offer {offer}")]
    Forbidden { offer: OfferId, user: UserId },

    #[error("offer {0} was already processed")]
    AlreadyProcessed(OfferId),

    #[error("user {user} does not own item {item}")]
    ItemNotFound { user: UserId, item: ItemId },

    #[error("item {item} of user {user} is not a free-standing simple item")]
    ItemUnavailable { user: UserId, item: ItemId },

    #[error("user {user} has insufficient funds: available {available}, required {required}")]
    InsufficientFunds {
        user: UserId,
        available: u64,
        required: u64,
    },
}

/// A balance debit that would go negative.
#[derive(Debug, Error)]
#[error("insufficient funds: available {available}, required {required}")]
pub struct InsufficientFunds {
    pub available: u64,
    pub required: u64,
}
