// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hint::black_box;
use yard_alloc_core::{
    class::{ContainerClass, ContainerSize, ContainerStatus},
    coord::SlotCoordinate,
};
use yard_alloc_engine::prelude::*;
use yard_alloc_model::prelude::*;

// ---------------- Tunables ----------------

const SEED: u64 = 0x5EED_CAFE;

// Yard geometry: 4 owners with 12 rows each, 8 shared rows
const OWNERS: u32 = 4;
const ROWS_PER_OWNER: u32 = 12;
const OVERFLOW_ROWS: u32 = 8;
const MAX_BAY: u32 = 20;
const MAX_TIER: u32 = 5;

// Gate traffic per pass
const ARRIVALS: usize = 4_000;

// Share of arrivals answered by one departure of an earlier container
const DEPARTURE_RATE: f64 = 0.35;

// ------------------------------------------

fn config() -> EngineConfig {
    let layout = YardLayout::uniform(OWNERS, ROWS_PER_OWNER, OVERFLOW_ROWS, &DEFAULT_CLASS_WEIGHTS)
        .expect("valid layout");
    EngineConfigBuilder::new()
        .dimensions(MAX_BAY, MAX_TIER)
        .layout(layout)
        .density_skip_rate(0.2)
        .auto_expand(None)
        .seed(SEED)
        .build()
        .expect("valid config")
}

fn random_class<R: Rng + ?Sized>(rng: &mut R) -> ContainerClass {
    let size = if rng.random_bool(0.55) {
        ContainerSize::Twenty
    } else {
        ContainerSize::Forty
    };
    let status = if rng.random_bool(0.65) {
        ContainerStatus::Laden
    } else {
        ContainerStatus::Empty
    };
    ContainerClass::new(size, status)
}

// Arrivals only: pure cursor traversal with a growing yard.
fn run_fill_pass(config: &EngineConfig) -> usize {
    let mut engine = YardEngine::new(config).expect("engine");
    let mut rng = ChaCha8Rng::seed_from_u64(SEED ^ 0xF111);
    let mut placed = 0usize;
    for i in 0..ARRIVALS {
        let owner = ScopeId::new(rng.random_range(1..=OWNERS));
        let class = random_class(&mut rng);
        if engine
            .allocate(class, owner, OccupantId::new(i as u64))
            .is_ok()
        {
            placed += 1;
        }
    }
    placed
}

// Mixed gate traffic: departures whose exit check passes free their slot.
fn run_churn_pass(config: &EngineConfig) -> usize {
    let mut engine = YardEngine::new(config).expect("engine");
    let mut rng = ChaCha8Rng::seed_from_u64(SEED ^ 0xC4A2);
    let mut standing: Vec<SlotCoordinate> = Vec::with_capacity(ARRIVALS);
    for i in 0..ARRIVALS {
        let owner = ScopeId::new(rng.random_range(1..=OWNERS));
        let class = random_class(&mut rng);
        if let Ok(outcome) = engine.allocate(class, owner, OccupantId::new(i as u64)) {
            standing.push(outcome.coord());
        }
        if !standing.is_empty() && rng.random_bool(DEPARTURE_RATE) {
            let idx = rng.random_range(0..standing.len());
            if !engine.is_exit_blocked(&standing[idx]) {
                let coord = standing.swap_remove(idx);
                black_box(engine.release(coord).ok());
            }
        }
    }
    standing.len()
}

// -------------- Criterion wiring --------------
fn bench_placement(c: &mut Criterion) {
    let config = config();

    c.bench_function("yard_fill_4k_arrivals", |b| {
        b.iter(|| black_box(run_fill_pass(&config)));
    });

    c.bench_function("yard_churn_4k_arrivals", |b| {
        b.iter_batched(
            || config.clone(),
            |cfg| black_box(run_churn_pass(&cfg)),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(placement, bench_placement);
criterion_main!(placement);
