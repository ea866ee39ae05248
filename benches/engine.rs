use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use gadget_eng::{Catalog, Command, Engine, UserId};

/// Generates a grant / build / sell cycle per user (repeating):
/// 1. Grant a graphics card, a processor, and a motherboard
/// 2. Build a composite PC from them
/// 3. Sell the composite
///
/// Every command in the sequence succeeds, so the benchmark measures
/// applied-path throughput rather than rejection short-circuits.
pub struct BuildCycleGenerator {
    num_users: UserId,
    cycles_per_user: u32,
    current_user: UserId,
    current_cycle: u32,
    current_step: u32,
    /// First item id of the current cycle in the current user's inventory.
    next_item_id: u64,
}

impl BuildCycleGenerator {
    pub fn new(num_users: UserId, cycles_per_user: u32) -> Self {
        Self {
            num_users,
            cycles_per_user,
            current_user: 1,
            current_cycle: 0,
            current_step: 0,
            next_item_id: 1,
        }
    }
}

impl Iterator for BuildCycleGenerator {
    type Item = Command;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_user > self.num_users {
            return None;
        }

        let user = self.current_user;
        let base = self.next_item_id;
        let cmd = match self.current_step {
            0 => Command::Grant {
                user,
                template: "GTX 750 Ti".to_string(),
            },
            1 => Command::Grant {
                user,
                template: "Intel Core i5-4460".to_string(),
            },
            2 => Command::Grant {
                user,
                template: "ASUS H81M-K".to_string(),
            },
            3 => Command::Build {
                user,
                gpu: base,
                cpu: base + 1,
                mb: base + 2,
            },
            _ => Command::Sell {
                user,
                item: base + 3,
            },
        };

        self.current_step += 1;
        if self.current_step > 4 {
            self.current_step = 0;
            // Sold items free their ids but counters never rewind.
            self.next_item_id += 4;
            self.current_cycle += 1;
            if self.current_cycle >= self.cycles_per_user {
                self.current_cycle = 0;
                self.next_item_id = 1;
                self.current_user += 1;
            }
        }

        Some(cmd)
    }
}

/// Generates propose / accept pairs between alternating user pairs. Each
/// proposer is seeded with coins up front via grants and sells so every
/// acceptance goes through.
pub struct TradeCycleGenerator {
    pairs: UserId,
    trades_per_pair: u32,
    current_pair: UserId,
    current_trade: u32,
    current_step: u32,
    next_offer_id: u64,
}

impl TradeCycleGenerator {
    pub fn new(pairs: UserId, trades_per_pair: u32) -> Self {
        Self {
            pairs,
            trades_per_pair,
            current_pair: 0,
            current_trade: 0,
            current_step: 0,
            next_offer_id: 1,
        }
    }
}

impl Iterator for TradeCycleGenerator {
    type Item = Command;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_pair >= self.pairs {
            return None;
        }

        let from = self.current_pair * 2 + 1;
        let to = from + 1;
        let cmd = match self.current_step {
            // One sold iPhone 15 funds all of this pair's coin offers.
            0 => Command::Grant {
                user: from,
                template: "iPhone 15".to_string(),
            },
            1 => Command::Sell {
                user: from,
                item: self.current_trade as u64 + 1,
            },
            2 => Command::Propose {
                from,
                to,
                offered: vec![],
                requested: vec![],
                coins: 10,
            },
            _ => Command::Accept {
                offer: self.next_offer_id,
                user: to,
            },
        };

        self.current_step += 1;
        if self.current_step > 3 {
            self.current_step = 0;
            self.next_offer_id += 1;
            self.current_trade += 1;
            if self.current_trade >= self.trades_per_pair {
                self.current_trade = 0;
                self.current_pair += 1;
            }
        }

        Some(cmd)
    }
}

fn bench_draws(c: &mut Criterion) {
    let mut group = c.benchmark_group("draws");

    for count in [1_000u32, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let mut engine = Engine::seeded(Catalog::builtin(), 42);
                for _ in 0..count {
                    black_box(engine.draw(1));
                }
                engine
            });
        });
    }

    group.finish();
}

fn bench_build_cycles(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_cycles");

    for (users, cycles) in [(100, 100), (1_000, 10), (10, 1_000)] {
        let label = format!("{users}u_{cycles}cy");
        group.bench_with_input(
            BenchmarkId::from_parameter(&label),
            &(users, cycles),
            |b, &(users, cycles)| {
                b.iter(|| {
                    let mut engine = Engine::seeded(Catalog::builtin(), 42);
                    for cmd in BuildCycleGenerator::new(users, cycles) {
                        let _ = black_box(engine.apply(cmd));
                    }
                    engine
                });
            },
        );
    }

    group.finish();
}

fn bench_trade_cycles(c: &mut Criterion) {
    let mut group = c.benchmark_group("trade_cycles");

    group.bench_function("1000pairs_10trades", |b| {
        b.iter(|| {
            let mut engine = Engine::seeded(Catalog::builtin(), 42);
            for cmd in TradeCycleGenerator::new(1_000, 10) {
                let _ = black_box(engine.apply(cmd));
            }
            engine
        });
    });

    group.finish();
}

criterion_group!(benches, bench_draws, bench_build_cycles, bench_trade_cycles);
criterion_main!(benches);
