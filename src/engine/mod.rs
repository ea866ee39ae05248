//! Inventory and trade engine.
//!
//! The engine owns every user inventory and every trade offer, and applies
//! commands on top of that state: drawing and granting cards, assembling and
//! disassembling composite PCs, liquidating items for coins, and exchanging
//! items and coins between two users with all-or-nothing semantics. Every
//! operation validates all of its preconditions before the first write, so a
//! failed command never leaves partial state behind.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio_stream::{Stream, StreamExt};
use tracing::info;

use crate::catalog::Catalog;
use crate::model::{
    Category, Command, Item, ItemId, OfferId, Rarity, TradeOffer, TradeStatus, UserId,
};
use crate::store::Snapshot;
use crate::{specs, valuation};

mod inventory;
pub use inventory::Inventory;

mod error;
pub use error::{
    BuildError, EjectError, EngineError, GrantError, InsufficientFunds, SellError, TradeError,
};

/// Result of a successful liquidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sale {
    pub price: u64,
    /// Owner's balance after the credit.
    pub balance: u64,
}

/// Result of a successful part ejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ejection {
    /// True when the last part was ejected and the composite was deleted.
    pub disassembled: bool,
    /// The surviving composite id, if any.
    pub composite: Option<ItemId>,
}

/// Pending-offer view for one user.
#[derive(Debug, Default)]
pub struct TradeBook<'a> {
    /// Pending offers addressed to the user.
    pub incoming: Vec<&'a TradeOffer>,
    /// All offers proposed by the user.
    pub outgoing: Vec<&'a TradeOffer>,
}

fn system_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// The inventory and trade engine.
pub struct Engine {
    catalog: Catalog,
    inventories: BTreeMap<UserId, Inventory>,
    trades: BTreeMap<OfferId, TradeOffer>,
    next_offer_id: OfferId,
    rng: StdRng,
    now: fn() -> u64,
}

/// Public API
impl Engine {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            inventories: BTreeMap::new(),
            trades: BTreeMap::new(),
            next_offer_id: 0,
            rng: StdRng::from_entropy(),
            now: system_now,
        }
    }

    /// An engine with a deterministic draw sequence.
    pub fn seeded(catalog: Catalog, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            ..Self::new(catalog)
        }
    }

    /// Replace the clock. Timestamps only feed `acquired_at`/`created_at`.
    pub fn with_now(mut self, now: fn() -> u64) -> Self {
        self.now = now;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Run the engine over a command stream. Failed commands are logged and
    /// skipped; the stream keeps flowing.
    pub async fn run(&mut self, mut stream: impl Stream<Item = Command> + Unpin) {
        while let Some(cmd) = stream.next().await {
            let _ = self.apply(cmd);
        }
    }

    /// Apply a single command on top of the current engine state.
    pub fn apply(&mut self, cmd: Command) -> Result<(), EngineError> {
        match cmd {
            Command::Draw { user } => {
                let item = self.draw(user);
                info!(
                    user,
                    item = item.id,
                    template = %item.template,
                    rarity = %item.rarity,
                    "draw applied"
                );
                Ok(())
            }
            Command::Grant { user, template } => match self.grant(user, &template) {
                Ok(item) => {
                    info!(user, item = item.id, template = %item.template, "grant applied");
                    Ok(())
                }
                Err(e) => {
                    info!(user, template = %template, reason = %e, "grant skipped");
                    Err(e.into())
                }
            },
            Command::Sell { user, item } => match self.sell_item(user, item) {
                Ok(sale) => {
                    info!(
                        user,
                        item,
                        price = sale.price,
                        balance = sale.balance,
                        "sell applied"
                    );
                    Ok(())
                }
                Err(e) => {
                    info!(user, item, reason = %e, "sell skipped");
                    Err(e.into())
                }
            },
            Command::Build { user, gpu, cpu, mb } => match self.build_composite(user, gpu, cpu, mb)
            {
                Ok(composite) => {
                    info!(
                        user,
                        composite = composite.id,
                        price = composite.purchase_price,
                        rarity = %composite.rarity,
                        "build applied"
                    );
                    Ok(())
                }
                Err(e) => {
                    info!(user, gpu, cpu, mb, reason = %e, "build skipped");
                    Err(e.into())
                }
            },
            Command::Eject {
                user,
                composite,
                part,
            } => match self.eject_part(user, composite, part) {
                Ok(ejection) => {
                    info!(
                        user,
                        composite,
                        part,
                        disassembled = ejection.disassembled,
                        "eject applied"
                    );
                    Ok(())
                }
                Err(e) => {
                    info!(user, composite, part, reason = %e, "eject skipped");
                    Err(e.into())
                }
            },
            Command::Propose {
                from,
                to,
                offered,
                requested,
                coins,
            } => match self.propose_trade(from, to, offered, requested, coins) {
                Ok(offer) => {
                    info!(
                        offer = offer.id,
                        from,
                        to,
                        offered = offer.offered.len(),
                        requested = offer.requested.len(),
                        coins,
                        "propose applied"
                    );
                    Ok(())
                }
                Err(e) => {
                    info!(from, to, reason = %e, "propose skipped");
                    Err(e.into())
                }
            },
            Command::Accept { offer, user } => match self.accept_trade(offer, user) {
                Ok(_) => {
                    info!(offer, user, "accept applied");
                    Ok(())
                }
                Err(e) => {
                    info!(offer, user, reason = %e, "accept skipped");
                    Err(e.into())
                }
            },
            Command::Reject { offer, user } => match self.reject_trade(offer, user) {
                Ok(_) => {
                    info!(offer, user, "reject applied");
                    Ok(())
                }
                Err(e) => {
                    info!(offer, user, reason = %e, "reject skipped");
                    Err(e.into())
                }
            },
        }
    }

    // Inventory reads

    pub fn inventory(&self, user: UserId) -> Option<&Inventory> {
        self.inventories.get(&user)
    }

    /// All inventories in ascending user id order.
    pub fn inventories(&self) -> impl Iterator<Item = (UserId, &Inventory)> {
        self.inventories.iter().map(|(user, inv)| (*user, inv))
    }

    /// Balance, defaulting to 0 for users never seen.
    pub fn balance(&self, user: UserId) -> u64 {
        self.inventories.get(&user).map_or(0, Inventory::balance)
    }

    pub fn item(&self, user: UserId, id: ItemId) -> Option<&Item> {
        self.inventories.get(&user).and_then(|inv| inv.get(id))
    }

    // Inventory mutations

    /// Credit coins to a user, lazily creating the inventory.
    pub fn credit(&mut self, user: UserId, amount: u64) -> u64 {
        self.inventory_entry(user).credit(amount)
    }

    /// Draw a random card from the catalog into the user's inventory.
    pub fn draw(&mut self, user: UserId) -> Item {
        let template = self.catalog.draw(&mut self.rng);
        let (name, category, price, rarity) = (
            template.name.clone(),
            template.category,
            template.base_price,
            template.rarity,
        );
        self.add_simple_item(user, name, category, price, rarity)
    }

    /// Add a named catalog template to a user's inventory at its base price.
    pub fn grant(&mut self, user: UserId, template: &str) -> Result<Item, GrantError> {
        let template = self
            .catalog
            .get(template)
            .ok_or_else(|| GrantError::UnknownTemplate(template.to_string()))?;
        let (name, category, price, rarity) = (
            template.name.clone(),
            template.category,
            template.base_price,
            template.rarity,
        );
        Ok(self.add_simple_item(user, name, category, price, rarity))
    }

    /// Assemble a composite PC from a graphics card, a processor, and a
    /// motherboard owned by `user`.
    ///
    /// All preconditions are checked before any write: the three parts
    /// exist, each occupies its matching slot, and none is already linked.
    pub fn build_composite(
        &mut self,
        user: UserId,
        gpu: ItemId,
        cpu: ItemId,
        mb: ItemId,
    ) -> Result<Item, BuildError> {
        let now = (self.now)();
        let inv = self.inventory_entry(user);

        let slots = [
            (gpu, Category::GraphicsCard),
            (cpu, Category::Processor),
            (mb, Category::Motherboard),
        ];
        let mut rarities = [Rarity::Trash; 3];
        let mut parts_total = 0u64;
        let mut gpu_name = String::new();
        for (slot, (id, expected)) in slots.into_iter().enumerate() {
            let part = inv.get(id).ok_or(BuildError::PartNotFound(id))?;
            if part.category != expected {
                return Err(BuildError::WrongSlot {
                    item: id,
                    expected,
                    found: part.category,
                });
            }
            if let Some(composite) = part.link {
                return Err(BuildError::AlreadyLinked {
                    item: id,
                    composite,
                });
            }
            rarities[slot] = part.rarity;
            parts_total += part.purchase_price;
            if slot == 0 {
                gpu_name = part.template.clone();
            }
        }

        let (pc_specs, rarity, spec_price) = specs::generate(rarities[0], rarities[1], rarities[2]);
        let component_total = parts_total + spec_price;
        let price = valuation::assembly_price(component_total);

        let id = inv.next_id();
        let composite = Item {
            id,
            template: format!("Custom Gaming PC ({gpu_name})"),
            category: Category::Pc,
            purchase_price: price,
            rarity,
            acquired_at: now,
            link: None,
            parts: vec![gpu, cpu, mb],
            specs: Some(pc_specs),
        };
        inv.insert(composite.clone());
        for part in [gpu, cpu, mb] {
            if let Some(item) = inv.get_mut(part) {
                item.link = Some(id);
            }
        }

        Ok(composite)
    }

    /// Remove one part from a composite. The ejected part becomes
    /// free-standing; ejecting the last part deletes the composite.
    pub fn eject_part(
        &mut self,
        user: UserId,
        composite: ItemId,
        part: ItemId,
    ) -> Result<Ejection, EjectError> {
        let inv = self.inventory_entry(user);

        let pc = inv
            .get(composite)
            .ok_or(EjectError::CompositeNotFound(composite))?;
        if !pc.is_composite() {
            return Err(EjectError::NotAComposite(composite));
        }
        if !pc.parts.contains(&part) {
            return Err(EjectError::PartNotPresent { composite, part });
        }

        let remaining = match inv.get_mut(composite) {
            Some(pc) => {
                pc.parts.retain(|p| *p != part);
                pc.parts.len()
            }
            None => 0,
        };
        if let Some(item) = inv.get_mut(part) {
            item.link = None;
        }

        if remaining == 0 {
            inv.remove_item(composite);
            Ok(Ejection {
                disassembled: true,
                composite: None,
            })
        } else {
            Ok(Ejection {
                disassembled: false,
                composite: Some(composite),
            })
        }
    }

    /// Liquidate an item for coins.
    ///
    /// Simple items sell at the flat liquidation discount. Composites must
    /// hold exactly three parts; the parts are removed along with the
    /// composite and the owner is credited in the same operation.
    pub fn sell_item(&mut self, user: UserId, item: ItemId) -> Result<Sale, SellError> {
        let inv = self.inventory_entry(user);

        let it = inv.get(item).ok_or(SellError::NotFound(item))?;
        if let Some(composite) = it.link {
            return Err(SellError::LinkedPart(item, composite));
        }

        let price = if it.is_composite() {
            if it.parts.len() != 3 {
                return Err(SellError::IncompleteComposite {
                    id: item,
                    parts: it.parts.len(),
                });
            }
            // Part prices are read fresh from current state.
            let parts_total: u64 = it
                .parts
                .iter()
                .filter_map(|p| inv.get(*p))
                .map(|p| p.purchase_price)
                .sum();
            valuation::composite_sale_price(it.purchase_price, parts_total)
        } else {
            valuation::simple_sale_price(it.purchase_price)
        };

        if let Some(sold) = inv.remove_item(item) {
            for part in sold.parts {
                inv.remove_item(part);
            }
        }
        let balance = inv.credit(price);

        Ok(Sale { price, balance })
    }

    // Trade protocol

    /// Propose an exchange of items and coins to another user.
    ///
    /// Offered items must be free-standing simple items owned by `from`,
    /// and `from` must currently hold at least `coins`. The balance is
    /// checked but not reserved; everything is re-validated at acceptance.
    pub fn propose_trade(
        &mut self,
        from: UserId,
        to: UserId,
        offered: Vec<ItemId>,
        requested: Vec<ItemId>,
        coins: u64,
    ) -> Result<TradeOffer, TradeError> {
        self.ensure_tradable(from, &offered)?;
        let available = self.balance(from);
        if available < coins {
            return Err(TradeError::InsufficientFunds {
                user: from,
                available,
                required: coins,
            });
        }

        self.next_offer_id += 1;
        let offer = TradeOffer {
            id: self.next_offer_id,
            from,
            to,
            offered,
            requested,
            coins,
            status: TradeStatus::Pending,
            created_at: (self.now)(),
        };
        self.trades.insert(offer.id, offer.clone());
        Ok(offer)
    }

    /// Accept a pending offer as its recipient.
    ///
    /// Both sides are re-validated against live state; on any failure the
    /// offer stays pending and nothing moves. On success the exchange is
    /// applied as a whole: coins, then offered items, then requested items.
    /// Transferred items are re-instantiated under the recipient with fresh
    /// ids; item identity does not survive an ownership transfer.
    pub fn accept_trade(&mut self, offer: OfferId, user: UserId) -> Result<TradeOffer, TradeError> {
        let found = self
            .trades
            .get(&offer)
            .ok_or(TradeError::OfferNotFound(offer))?;
        if found.to != user {
            return Err(TradeError::Forbidden { offer, user });
        }
        if found.status != TradeStatus::Pending {
            return Err(TradeError::AlreadyProcessed(offer));
        }
        let pending = found.clone();

        self.ensure_tradable(pending.from, &pending.offered)?;
        self.ensure_tradable(pending.to, &pending.requested)?;
        let available = self.balance(pending.from);
        if available < pending.coins {
            return Err(TradeError::InsufficientFunds {
                user: pending.from,
                available,
                required: pending.coins,
            });
        }

        // Validation is complete; nothing below can fail.
        let now = (self.now)();
        if pending.coins > 0 {
            self.inventory_entry(pending.from)
                .debit(pending.coins)
                .map_err(|e| TradeError::InsufficientFunds {
                    user: pending.from,
                    available: e.available,
                    required: e.required,
                })?;
            self.inventory_entry(pending.to).credit(pending.coins);
        }
        for &id in &pending.offered {
            self.move_item(pending.from, pending.to, id, now);
        }
        for &id in &pending.requested {
            self.move_item(pending.to, pending.from, id, now);
        }

        match self.trades.get_mut(&offer) {
            Some(stored) => {
                stored.status = TradeStatus::Accepted;
                Ok(stored.clone())
            }
            None => Err(TradeError::OfferNotFound(offer)),
        }
    }

    /// Reject a pending offer as its recipient. No items or coins move.
    pub fn reject_trade(&mut self, offer: OfferId, user: UserId) -> Result<TradeOffer, TradeError> {
        let found = self
            .trades
            .get_mut(&offer)
            .ok_or(TradeError::OfferNotFound(offer))?;
        if found.to != user {
            return Err(TradeError::Forbidden { offer, user });
        }
        if found.status != TradeStatus::Pending {
            return Err(TradeError::AlreadyProcessed(offer));
        }
        found.status = TradeStatus::Rejected;
        Ok(found.clone())
    }

    pub fn offer(&self, id: OfferId) -> Option<&TradeOffer> {
        self.trades.get(&id)
    }

    /// Pending offers addressed to the user, and everything the user has
    /// proposed.
    pub fn trades_for(&self, user: UserId) -> TradeBook<'_> {
        let mut book = TradeBook::default();
        for offer in self.trades.values() {
            if offer.to == user && offer.status == TradeStatus::Pending {
                book.incoming.push(offer);
            } else if offer.from == user {
                book.outgoing.push(offer);
            }
        }
        book
    }

    /// Processed (accepted or rejected) offers involving the user.
    pub fn trade_history(&self, user: UserId) -> Vec<&TradeOffer> {
        self.trades
            .values()
            .filter(|o| o.involves(user) && o.status != TradeStatus::Pending)
            .collect()
    }

    // Persistence

    /// Capture the full mutable state for persistence.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            inventories: self.inventories.clone(),
            trades: self.trades.clone(),
            next_offer_id: self.next_offer_id,
        }
    }

    /// Rebuild an engine from a snapshot. Id counters resume where they
    /// left off, so restored engines never reuse ids.
    pub fn restore(catalog: Catalog, snapshot: Snapshot) -> Self {
        Self {
            inventories: snapshot.inventories,
            trades: snapshot.trades,
            next_offer_id: snapshot.next_offer_id,
            ..Self::new(catalog)
        }
    }
}

/// Private API
impl Engine {
    fn inventory_entry(&mut self, user: UserId) -> &mut Inventory {
        self.inventories.entry(user).or_default()
    }

    fn add_simple_item(
        &mut self,
        user: UserId,
        template: String,
        category: Category,
        price: u64,
        rarity: Rarity,
    ) -> Item {
        let now = (self.now)();
        let inv = self.inventory_entry(user);
        let id = inv.next_id();
        let item = Item {
            id,
            template,
            category,
            purchase_price: price,
            rarity,
            acquired_at: now,
            link: None,
            parts: Vec::new(),
            specs: None,
        };
        inv.insert(item.clone());
        item
    }

    /// Every id must name a free-standing simple item owned by `user`.
    /// Linked parts and composites cannot change hands.
    fn ensure_tradable(&self, user: UserId, ids: &[ItemId]) -> Result<(), TradeError> {
        let inv = self.inventories.get(&user);
        for &id in ids {
            let item = inv
                .and_then(|i| i.get(id))
                .ok_or(TradeError::ItemNotFound { user, item: id })?;
            if !item.is_free_standing() {
                return Err(TradeError::ItemUnavailable { user, item: id });
            }
        }
        Ok(())
    }

    /// Re-instantiate an item under a new owner with a fresh id.
    fn move_item(&mut self, from: UserId, to: UserId, id: ItemId, now: u64) {
        let Some(item) = self.inventory_entry(from).remove_item(id) else {
            return;
        };
        let dst = self.inventory_entry(to);
        let new_id = dst.next_id();
        dst.insert(Item {
            id: new_id,
            template: item.template,
            category: item.category,
            purchase_price: item.purchase_price,
            rarity: item.rarity,
            acquired_at: now,
            link: None,
            parts: Vec::new(),
            specs: None,
        });
    }
}
