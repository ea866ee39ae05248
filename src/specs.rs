//! PC spec generation from component rarities.
//!
//! Specs are a pure function of the highest rarity among the three parts:
//! each component maps that tier through a fixed five-bucket ladder, and the
//! spec price is the sum of per-component lookup tables keyed by the chosen
//! descriptive value. No randomness is involved.

use serde::{Deserialize, Serialize};

use crate::model::Rarity;

/// Generated specs attached to a composite PC item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PcSpecs {
    pub ram: String,
    pub storage: String,
    pub psu: String,
    pub case: String,
}

fn ram(rarity: Rarity) -> &'static str {
    match rarity {
        Rarity::Trash | Rarity::Common => "8GB DDR4",
        Rarity::Uncommon | Rarity::Rare => "16GB DDR4",
        Rarity::Epic | Rarity::Legendary => "32GB DDR5",
        Rarity::Mythic => "64GB DDR5",
    }
}

fn storage(rarity: Rarity) -> &'static str {
    match rarity {
        Rarity::Trash | Rarity::Common => "256GB SATA SSD",
        Rarity::Uncommon | Rarity::Rare => "512GB NVMe SSD",
        Rarity::Epic => "1TB NVMe SSD",
        Rarity::Legendary => "2TB NVMe SSD",
        Rarity::Mythic => "2TB+ NVMe SSD",
    }
}

fn psu(rarity: Rarity) -> &'static str {
    match rarity {
        Rarity::Trash | Rarity::Common => "500W 80+ Bronze",
        Rarity::Uncommon | Rarity::Rare => "750W 80+ Gold",
        Rarity::Epic => "850W 80+ Gold",
        Rarity::Legendary => "1000W 80+ Platinum",
        Rarity::Mythic => "1200W 80+ Titanium",
    }
}

fn case(rarity: Rarity) -> &'static str {
    match rarity {
        Rarity::Trash | Rarity::Common => "Budget ATX Case",
        Rarity::Uncommon | Rarity::Rare => "Mid-Tower ATX Case",
        Rarity::Epic => "Full-Tower ATX Case",
        Rarity::Legendary => "Premium Full-Tower Case",
        Rarity::Mythic => "Ultimate Premium Case",
    }
}

fn ram_price(ram: &str) -> u64 {
    match ram {
        "8GB DDR4" => 40,
        "16GB DDR4" => 80,
        "32GB DDR5" => 150,
        "64GB DDR5" => 300,
        _ => 0,
    }
}

fn storage_price(storage: &str) -> u64 {
    match storage {
        "256GB SATA SSD" => 30,
        "512GB NVMe SSD" => 60,
        "1TB NVMe SSD" => 100,
        "2TB NVMe SSD" | "2TB+ NVMe SSD" => 180,
        _ => 0,
    }
}

fn psu_price(psu: &str) -> u64 {
    match psu {
        "500W 80+ Bronze" => 50,
        "750W 80+ Gold" => 100,
        "850W 80+ Gold" => 130,
        "1000W 80+ Platinum" => 200,
        "1200W 80+ Titanium" => 300,
        _ => 0,
    }
}

fn case_price(case: &str) -> u64 {
    match case {
        "Budget ATX Case" => 40,
        "Mid-Tower ATX Case" => 80,
        "Full-Tower ATX Case" => 120,
        // The two top cases share a price point.
        "Premium Full-Tower Case" | "Ultimate Premium Case" => 200,
        _ => 0,
    }
}

/// Generate specs for a PC built from parts with the given rarities.
///
/// Returns the specs, the composite's rarity (the highest of the three
/// inputs), and the total spec price.
pub fn generate(gpu: Rarity, cpu: Rarity, mb: Rarity) -> (PcSpecs, Rarity, u64) {
    let highest = gpu.max(cpu).max(mb);

    let specs = PcSpecs {
        ram: ram(highest).to_string(),
        storage: storage(highest).to_string(),
        psu: psu(highest).to_string(),
        case: case(highest).to_string(),
    };

    let price = ram_price(&specs.ram)
        + storage_price(&specs.storage)
        + psu_price(&specs.psu)
        + case_price(&specs.case);

    (specs, highest, price)
}
