//! Gadget template catalog and rarity-weighted drawing.
//!
//! The catalog is configuration data: a read-only table of item templates.
//! A built-in table ships with the crate; external tables can be loaded from
//! CSV with columns `name,category,price,rarity`.

use rand::Rng;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::model::{Category, Rarity};

/// An immutable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemTemplate {
    pub name: String,
    pub category: Category,
    pub base_price: u64,
    pub rarity: Rarity,
}

/// Draw weights per rarity tier, in percent. Must sum to 100.
const DRAW_WEIGHTS: [(Rarity, u32); 7] = [
    (Rarity::Trash, 30),
    (Rarity::Common, 25),
    (Rarity::Uncommon, 20),
    (Rarity::Rare, 15),
    (Rarity::Epic, 7),
    (Rarity::Legendary, 2),
    (Rarity::Mythic, 1),
];

/// Errors that can occur when loading a catalog table from CSV.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to open catalog file: {0}")]
    Open(#[source] csv::Error),

    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: unknown category '{value}'")]
    UnknownCategory { line: usize, value: String },

    #[error("line {line}: unknown rarity '{value}'")]
    UnknownRarity { line: usize, value: String },

    #[error("line {line}: templates cannot have category PC")]
    CompositeTemplate { line: usize },

    #[error("catalog table is empty")]
    Empty,
}

/// A read-only table of item templates.
#[derive(Debug, Clone)]
pub struct Catalog {
    templates: Vec<ItemTemplate>,
}

impl Catalog {
    /// Build a catalog from an explicit template list. The list must be
    /// non-empty; `draw` has no meaning over an empty table.
    pub fn new(templates: Vec<ItemTemplate>) -> Self {
        debug_assert!(!templates.is_empty(), "catalog must not be empty");
        Self { templates }
    }

    /// The built-in gadget table.
    pub fn builtin() -> Self {
        let templates = BUILTIN
            .iter()
            .map(|&(name, category, base_price, rarity)| ItemTemplate {
                name: name.to_string(),
                category,
                base_price,
                rarity,
            })
            .collect();
        Self::new(templates)
    }

    /// Load a catalog table from a CSV file with header
    /// `name,category,price,rarity`.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        #[derive(serde::Deserialize)]
        struct Row {
            name: String,
            category: String,
            price: u64,
            rarity: String,
        }

        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(CatalogError::Open)?;

        let mut templates = Vec::new();
        for (idx, result) in reader.into_deserialize::<Row>().enumerate() {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| CatalogError::Parse { line, source })?;
            let category = Category::from_name(&row.category).ok_or_else(|| {
                CatalogError::UnknownCategory {
                    line,
                    value: row.category.clone(),
                }
            })?;
            if category == Category::Pc {
                return Err(CatalogError::CompositeTemplate { line });
            }
            let rarity =
                Rarity::from_name(&row.rarity).ok_or_else(|| CatalogError::UnknownRarity {
                    line,
                    value: row.rarity.clone(),
                })?;
            templates.push(ItemTemplate {
                name: row.name,
                category,
                base_price: row.price,
                rarity,
            });
        }

        if templates.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self::new(templates))
    }

    pub fn templates(&self) -> &[ItemTemplate] {
        &self.templates
    }

    /// Look up a template by its exact name.
    pub fn get(&self, name: &str) -> Option<&ItemTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }

    /// Draw a random template: sample a rarity tier by the fixed weight
    /// table, then pick uniformly among the templates of that tier.
    ///
    /// If the sampled tier has no templates the draw falls back to a uniform
    /// pick over the whole catalog. That only happens when the catalog and
    /// the weight table disagree, so it is logged as a warning.
    pub fn draw(&self, rng: &mut impl Rng) -> &ItemTemplate {
        let total: u32 = DRAW_WEIGHTS.iter().map(|(_, w)| w).sum();
        let mut roll = rng.gen_range(0..total);
        let mut tier = Rarity::Trash;
        for (rarity, weight) in DRAW_WEIGHTS {
            if roll < weight {
                tier = rarity;
                break;
            }
            roll -= weight;
        }

        let bucket: Vec<&ItemTemplate> =
            self.templates.iter().filter(|t| t.rarity == tier).collect();
        if bucket.is_empty() {
            warn!(tier = %tier, "no catalog templates for drawn rarity tier, drawing uniformly");
            return &self.templates[rng.gen_range(0..self.templates.len())];
        }
        bucket[rng.gen_range(0..bucket.len())]
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// The built-in gadget table: (name, category, base price, rarity).
const BUILTIN: &[(&str, Category, u64, Rarity)] = &[
    // Phones
    ("iPhone 6", Category::Phone, 50, Rarity::Trash),
    ("Samsung Galaxy S5", Category::Phone, 40, Rarity::Trash),
    ("iPhone 7", Category::Phone, 60, Rarity::Trash),
    ("iPhone 11", Category::Phone, 300, Rarity::Trash),
    ("Samsung Galaxy A54", Category::Phone, 250, Rarity::Common),
    ("iPhone XR", Category::Phone, 280, Rarity::Trash),
    ("iPhone 12", Category::Phone, 450, Rarity::Trash),
    ("Google Pixel 6", Category::Phone, 400, Rarity::Uncommon),
    ("Samsung Galaxy S20", Category::Phone, 420, Rarity::Uncommon),
    ("iPhone 14", Category::Phone, 650, Rarity::Trash),
    ("Google Pixel 7", Category::Phone, 550, Rarity::Rare),
    ("Samsung Galaxy S22", Category::Phone, 600, Rarity::Rare),
    ("iPhone 15", Category::Phone, 850, Rarity::Trash),
    ("Samsung Galaxy S23", Category::Phone, 800, Rarity::Epic),
    ("Google Pixel 8", Category::Phone, 700, Rarity::Epic),
    ("iPhone 16 Pro Max", Category::Phone, 1200, Rarity::Trash),
    ("Samsung Galaxy S24 Ultra", Category::Phone, 1100, Rarity::Legendary),
    ("OnePlus 12", Category::Phone, 900, Rarity::Legendary),
    ("iPhone 17 Pro Max", Category::Phone, 1500, Rarity::Trash),
    ("Samsung Galaxy S25 Ultra", Category::Phone, 1400, Rarity::Mythic),
    // Tablets
    ("iPad Air 2", Category::Tablet, 100, Rarity::Trash),
    ("Samsung Galaxy Tab S2", Category::Tablet, 80, Rarity::Trash),
    ("iPad (9th gen)", Category::Tablet, 300, Rarity::Common),
    ("Samsung Galaxy Tab A8", Category::Tablet, 200, Rarity::Common),
    ("iPad Air (4th gen)", Category::Tablet, 500, Rarity::Uncommon),
    ("Samsung Galaxy Tab S7", Category::Tablet, 450, Rarity::Uncommon),
    ("iPad Air (5th gen)", Category::Tablet, 600, Rarity::Rare),
    ("Samsung Galaxy Tab S8", Category::Tablet, 550, Rarity::Rare),
    ("iPad Pro 11\" M2", Category::Tablet, 900, Rarity::Epic),
    ("Microsoft Surface Pro 9", Category::Tablet, 1000, Rarity::Epic),
    ("Samsung Galaxy Tab S9", Category::Tablet, 800, Rarity::Epic),
    ("iPad Pro 12.9\" M2", Category::Tablet, 1200, Rarity::Legendary),
    ("Samsung Galaxy Tab S9 Ultra", Category::Tablet, 1100, Rarity::Legendary),
    ("iPad Pro M4", Category::Tablet, 1400, Rarity::Mythic),
    ("Samsung Galaxy Tab S10 Ultra", Category::Tablet, 1300, Rarity::Mythic),
    // Laptops
    ("MacBook Air 2015", Category::Laptop, 200, Rarity::Trash),
    ("Dell Inspiron 3000", Category::Laptop, 250, Rarity::Trash),
    ("MacBook Air M1", Category::Laptop, 800, Rarity::Common),
    ("Dell Inspiron 15", Category::Laptop, 600, Rarity::Common),
    ("MacBook Pro M1", Category::Laptop, 1200, Rarity::Uncommon),
    ("Dell XPS 13 (2020)", Category::Laptop, 1000, Rarity::Uncommon),
    ("MacBook Pro M2", Category::Laptop, 1500, Rarity::Rare),
    ("Dell XPS 13 (2022)", Category::Laptop, 1300, Rarity::Rare),
    ("MacBook Pro M3", Category::Laptop, 1800, Rarity::Epic),
    ("Lenovo ThinkPad X1 Carbon", Category::Laptop, 1600, Rarity::Epic),
    ("MacBook Air M4", Category::Laptop, 1700, Rarity::Epic),
    ("MacBook Pro M3 Max", Category::Laptop, 2500, Rarity::Legendary),
    ("Razer Blade 18", Category::Laptop, 2800, Rarity::Legendary),
    ("MacBook Pro M5", Category::Laptop, 2400, Rarity::Legendary),
    ("MacBook Pro M5 Max", Category::Laptop, 3500, Rarity::Mythic),
    // Graphics cards
    ("GTX 750 Ti", Category::GraphicsCard, 50, Rarity::Trash),
    ("GTX 950", Category::GraphicsCard, 60, Rarity::Trash),
    ("GTX 1050", Category::GraphicsCard, 100, Rarity::Common),
    ("GTX 1060", Category::GraphicsCard, 150, Rarity::Common),
    ("GTX 1650", Category::GraphicsCard, 120, Rarity::Common),
    ("GTX 1660", Category::GraphicsCard, 200, Rarity::Uncommon),
    ("GTX 1660 Super", Category::GraphicsCard, 220, Rarity::Uncommon),
    ("RTX 2060", Category::GraphicsCard, 250, Rarity::Uncommon),
    ("RTX 3060", Category::GraphicsCard, 350, Rarity::Rare),
    ("RTX 3060 Ti", Category::GraphicsCard, 400, Rarity::Rare),
    ("RTX 3070", Category::GraphicsCard, 500, Rarity::Rare),
    ("RTX 4070", Category::GraphicsCard, 600, Rarity::Epic),
    ("RTX 4070 Ti", Category::GraphicsCard, 700, Rarity::Epic),
    ("RTX 4080", Category::GraphicsCard, 900, Rarity::Epic),
    ("RTX 4090", Category::GraphicsCard, 1500, Rarity::Legendary),
    ("AMD RX 7900 XTX", Category::GraphicsCard, 1400, Rarity::Legendary),
    ("RTX 5090", Category::GraphicsCard, 2000, Rarity::Mythic),
    // Processors
    ("Intel Core i5-4460", Category::Processor, 40, Rarity::Trash),
    ("AMD FX-8350", Category::Processor, 50, Rarity::Trash),
    ("AMD Ryzen 5 3600", Category::Processor, 150, Rarity::Common),
    ("Intel Core i5-10400", Category::Processor, 140, Rarity::Common),
    ("AMD Ryzen 5 5600X", Category::Processor, 200, Rarity::Uncommon),
    ("Intel Core i7-10700K", Category::Processor, 250, Rarity::Uncommon),
    ("AMD Ryzen 7 7700X", Category::Processor, 350, Rarity::Rare),
    ("Intel Core i7-13700K", Category::Processor, 380, Rarity::Rare),
    ("AMD Ryzen 9 7900X", Category::Processor, 500, Rarity::Epic),
    ("Intel Core i9-13900K", Category::Processor, 550, Rarity::Epic),
    ("AMD Ryzen 9 7950X", Category::Processor, 700, Rarity::Legendary),
    ("Intel Core i9-14900K", Category::Processor, 750, Rarity::Legendary),
    ("AMD Ryzen 9 9950X", Category::Processor, 900, Rarity::Mythic),
    ("Intel Core i9-15900K", Category::Processor, 950, Rarity::Mythic),
    // Motherboards
    ("ASUS H81M-K", Category::Motherboard, 40, Rarity::Trash),
    ("MSI B85M-E45", Category::Motherboard, 45, Rarity::Trash),
    ("ASRock A320M-HDV", Category::Motherboard, 50, Rarity::Trash),
    ("ASUS B450M-A", Category::Motherboard, 80, Rarity::Common),
    ("MSI B460M Pro-VDH", Category::Motherboard, 85, Rarity::Common),
    ("Gigabyte H510M H", Category::Motherboard, 75, Rarity::Common),
    ("Biostar B250MHC", Category::Motherboard, 70, Rarity::Common),
    ("ASUS B550M-A", Category::Motherboard, 120, Rarity::Uncommon),
    ("MSI B560M Pro-VDH", Category::Motherboard, 130, Rarity::Uncommon),
    ("ASRock X570 Phantom Gaming 4", Category::Motherboard, 150, Rarity::Uncommon),
    ("ASUS B650M-A", Category::Motherboard, 180, Rarity::Rare),
    ("MSI Z690-A Pro", Category::Motherboard, 200, Rarity::Rare),
    ("Gigabyte X670 Gaming X", Category::Motherboard, 220, Rarity::Rare),
    ("ASUS B650E-F", Category::Motherboard, 280, Rarity::Epic),
    ("MSI Z790-A Pro", Category::Motherboard, 300, Rarity::Epic),
    ("ASRock X670E Steel Legend", Category::Motherboard, 320, Rarity::Epic),
    ("ASUS X870E-E", Category::Motherboard, 400, Rarity::Legendary),
    ("MSI Z890-A Pro", Category::Motherboard, 420, Rarity::Legendary),
    ("ASUS X870E Extreme", Category::Motherboard, 600, Rarity::Mythic),
    ("MSI Z890 Godlike", Category::Motherboard, 650, Rarity::Mythic),
];
