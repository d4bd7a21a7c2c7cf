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

//! Synthetic gate traffic.
//!
//! Produces a deterministic, seeded stream of arrivals and departures that
//! looks like a terminal's gate log: ISO type codes drawn from a weighted
//! mix, a laden/empty split, a uniformly chosen owner and an exponential
//! dwell time per container.

mod config;
mod err;

pub use config::{WorkloadGenConfig, WorkloadGenConfigBuilder};
pub use err::WorkloadGenConfigBuildError;

use crate::id::{OccupantId, ScopeId};
use rand::{Rng, SeedableRng, distr::weighted::WeightedIndex, rngs::SmallRng};
use rand_distr::{Distribution, Exp};
use serde::{Deserialize, Serialize};
use std::{cmp::Reverse, collections::BinaryHeap};
use yard_alloc_core::class::ContainerStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum YardEvent {
    Arrive {
        entry: OccupantId,
        owner: ScopeId,
        iso_type: String,
        status: ContainerStatus,
    },
    Depart {
        entry: OccupantId,
    },
}

pub struct WorkloadGenerator {
    config: WorkloadGenConfig,
    rng: SmallRng,
    iso_distribution: WeightedIndex<u32>,
    dwell_distribution: Exp<f64>,
    departures: BinaryHeap<Reverse<(u64, OccupantId)>>,
    step: u64,
    next_id: u64,
}

impl TryFrom<WorkloadGenConfig> for WorkloadGenerator {
    type Error = WorkloadGenConfigBuildError;

    fn try_from(config: WorkloadGenConfig) -> Result<Self, Self::Error> {
        Self::new(config)
    }
}

impl WorkloadGenerator {
    pub fn new(config: WorkloadGenConfig) -> Result<Self, WorkloadGenConfigBuildError> {
        config.validate()?;
        let iso_distribution = WeightedIndex::new(config.iso_mix.iter().map(|(_, w)| *w))
            .map_err(|_| WorkloadGenConfigBuildError::ZeroIsoWeight)?;
        let dwell_distribution = Exp::new(1.0 / config.mean_dwell)
            .map_err(|_| WorkloadGenConfigBuildError::InvalidMeanDwell(config.mean_dwell))?;

        Ok(Self {
            rng: SmallRng::seed_from_u64(config.seed),
            iso_distribution,
            dwell_distribution,
            departures: BinaryHeap::new(),
            step: 0,
            next_id: 1,
            config,
        })
    }

    #[inline]
    pub fn config(&self) -> &WorkloadGenConfig {
        &self.config
    }

    #[inline]
    fn fresh_id(&mut self) -> OccupantId {
        let id = self.next_id;
        self.next_id += 1;
        OccupantId::new(id)
    }

    #[inline]
    fn arrivals_done(&self) -> bool {
        self.step >= self.config.arrivals as u64
    }

    fn arrival(&mut self) -> YardEvent {
        let entry = self.fresh_id();
        let owner = self.config.owners[self.rng.random_range(0..self.config.owners.len())];
        let iso_type = self.config.iso_mix[self.iso_distribution.sample(&mut self.rng)]
            .0
            .clone();
        let status = if self.rng.random_bool(self.config.laden_ratio) {
            ContainerStatus::Laden
        } else {
            ContainerStatus::Empty
        };

        let dwell = self.dwell_distribution.sample(&mut self.rng).ceil().max(1.0) as u64;
        self.departures
            .push(Reverse((self.step.saturating_add(dwell), entry)));

        YardEvent::Arrive {
            entry,
            owner,
            iso_type,
            status,
        }
    }

    /// Generates the whole stream at once.
    pub fn generate(&mut self) -> Vec<YardEvent> {
        self.by_ref().collect()
    }
}

impl Iterator for WorkloadGenerator {
    type Item = YardEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let flush = self.arrivals_done() && self.config.drain;
        if let Some(&Reverse((due, entry))) = self.departures.peek()
            && (due <= self.step || flush)
        {
            self.departures.pop();
            return Some(YardEvent::Depart { entry });
        }

        if self.arrivals_done() {
            return None;
        }
        let event = self.arrival();
        self.step += 1;
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn config(seed: u64, drain: bool) -> WorkloadGenConfig {
        WorkloadGenConfigBuilder::new()
            .owner_count(3)
            .arrivals(200)
            .mean_dwell(20.0)
            .drain(drain)
            .seed(seed)
            .build()
            .unwrap()
    }

    #[test]
    fn test_same_seed_same_stream() {
        let a = WorkloadGenerator::new(config(7, false)).unwrap().generate();
        let b = WorkloadGenerator::new(config(7, false)).unwrap().generate();
        assert_eq!(a, b);
        let c = WorkloadGenerator::new(config(8, false)).unwrap().generate();
        assert_ne!(a, c);
    }

    #[test]
    fn test_departures_follow_arrivals() {
        let events = WorkloadGenerator::new(config(1, true)).unwrap().generate();
        let mut present = HashSet::new();
        let mut arrivals = 0;
        for event in &events {
            match event {
                YardEvent::Arrive { entry, owner, .. } => {
                    assert!((1..=3).contains(&owner.value()));
                    assert!(present.insert(*entry), "entry {entry} arrived twice");
                    arrivals += 1;
                }
                YardEvent::Depart { entry } => {
                    assert!(present.remove(entry), "entry {entry} left before arriving");
                }
            }
        }
        assert_eq!(arrivals, 200);
        assert!(present.is_empty(), "drain must empty the yard");
    }

    #[test]
    fn test_iso_codes_come_from_mix() {
        let cfg = config(3, false);
        let codes: HashSet<&str> = cfg.iso_mix().iter().map(|(c, _)| c.as_str()).collect();
        for event in WorkloadGenerator::new(cfg.clone()).unwrap() {
            if let YardEvent::Arrive { iso_type, .. } = event {
                assert!(codes.contains(iso_type.as_str()));
            }
        }
    }

    #[test]
    fn test_owners_drawn_from_given_ids() {
        let ids = [ScopeId::new(7), ScopeId::new(12)];
        let cfg = WorkloadGenConfigBuilder::new()
            .owners(ids)
            .arrivals(100)
            .seed(5)
            .build()
            .unwrap();
        assert_eq!(cfg.owner_count(), 2);
        let mut seen = HashSet::new();
        for event in WorkloadGenerator::new(cfg).unwrap() {
            if let YardEvent::Arrive { owner, .. } = event {
                assert!(ids.contains(&owner), "{owner} was never configured");
                seen.insert(owner);
            }
        }
        assert_eq!(seen.len(), 2);
    }
}
