//! Snapshot persistence.
//!
//! The engine's mutable state serializes to a single JSON document. A
//! missing snapshot file is a normal cold start, not an error.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::engine::Inventory;
use crate::model::{OfferId, TradeOffer, UserId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snapshot io error: {0}")]
    Io(#[from] io::Error),

    #[error("snapshot encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Full mutable engine state. The catalog is static configuration and is
/// not part of the snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub inventories: BTreeMap<UserId, Inventory>,
    pub trades: BTreeMap<OfferId, TradeOffer>,
    pub next_offer_id: OfferId,
}

pub trait Store {
    /// Load the latest snapshot, or `None` when nothing was ever saved.
    fn load(&self) -> Result<Option<Snapshot>, StoreError>;

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError>;
}

/// Stores the snapshot as pretty-printed JSON at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Store for JsonStore {
    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&data)?))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let data = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
