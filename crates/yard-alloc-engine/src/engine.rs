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

//! The yard aggregate.
//!
//! [`YardEngine`] owns every piece of mutable session state: the occupancy
//! set, the bay ledger, one cursor per `(owner, class)`, one overflow cursor
//! per class and the density gate. Placement lives in `placement.rs`, exits
//! in `exit.rs`.
//!
//! The engine is single-threaded and synchronous. Callers that share one
//! yard between threads put the whole engine behind one lock, since overflow
//! fallback touches state shared by every owner.

use crate::{
    bay::{BayLedger, BayState},
    cursor::SlotCursor,
    density::{DensityGate, RandomSkip},
    occupancy::{Occupant, OccupancySet},
    stats::EngineStats,
};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use tracing::debug;
use yard_alloc_core::{
    class::ContainerClass,
    coord::{BayKey, RowNumber, SlotCoordinate},
};
use yard_alloc_model::{
    bounds::{StackingPolicy, YardBounds},
    config::EngineConfig,
    err::EngineConfigError,
    id::{RowScope, ScopeId},
    plan::RowPlan,
};

#[derive(Debug, Clone)]
pub struct YardEngine<G = RandomSkip<ChaCha8Rng>> {
    pub(crate) bounds: YardBounds,
    pub(crate) policy: StackingPolicy,
    pub(crate) overflow_plan: RowPlan,
    pub(crate) cursors: HashMap<(ScopeId, ContainerClass), SlotCursor>,
    pub(crate) overflow_cursors: HashMap<ContainerClass, SlotCursor>,
    pub(crate) occupancy: OccupancySet,
    pub(crate) bays: BayLedger,
    pub(crate) gate: G,
    pub(crate) stats: EngineStats,
}

impl YardEngine<RandomSkip<ChaCha8Rng>> {
    /// Engine whose density gate is seeded from `config`.
    pub fn new(config: &EngineConfig) -> Result<Self, EngineConfigError> {
        let gate = RandomSkip::seeded(config.policy().density_skip_rate(), config.seed());
        Self::with_gate(config, gate)
    }
}

impl<G: DensityGate> YardEngine<G> {
    pub fn with_gate(config: &EngineConfig, gate: G) -> Result<Self, EngineConfigError> {
        config.validate()?;
        let layout = config.layout();

        let mut cursors = HashMap::with_capacity(layout.owner_count() * ContainerClass::ALL.len());
        for (owner, plan) in layout.owners() {
            for class in ContainerClass::ALL {
                let rows = plan.rows_for(class).to_vec();
                cursors.insert(
                    (owner, class),
                    SlotCursor::new(RowScope::Owner(owner), class, rows),
                );
            }
        }

        let overflow_cursors = ContainerClass::ALL
            .into_iter()
            .map(|class| {
                let rows = layout.overflow().rows_for(class).to_vec();
                (class, SlotCursor::new(RowScope::Overflow, class, rows))
            })
            .collect();

        debug!(
            owners = layout.owner_count(),
            overflow_rows = layout.overflow().row_count(),
            bounds = %config.bounds(),
            "yard engine ready"
        );

        Ok(Self {
            bounds: *config.bounds(),
            policy: *config.policy(),
            overflow_plan: layout.overflow().clone(),
            cursors,
            overflow_cursors,
            occupancy: OccupancySet::new(),
            bays: BayLedger::new(),
            gate,
            stats: EngineStats::default(),
        })
    }

    /// Current extent. `max_row` grows when the overflow pool expands.
    #[inline]
    pub fn bounds(&self) -> &YardBounds {
        &self.bounds
    }

    #[inline]
    pub fn policy(&self) -> &StackingPolicy {
        &self.policy
    }

    /// The overflow row plan including rows appended by expansion.
    #[inline]
    pub fn overflow_plan(&self) -> &RowPlan {
        &self.overflow_plan
    }

    #[inline]
    pub fn occupancy(&self) -> &OccupancySet {
        &self.occupancy
    }

    #[inline]
    pub fn bay_ledger(&self) -> &BayLedger {
        &self.bays
    }

    /// The occupant recorded at exactly `coord`. The `B` half of a bay
    /// holding a 40ft container reports `None`; see
    /// [`OccupancySet::covers`].
    #[inline]
    pub fn occupant_at(&self, coord: &SlotCoordinate) -> Option<&Occupant> {
        self.occupancy.get(coord)
    }

    #[inline]
    pub fn bay_state(&self, key: &BayKey) -> BayState {
        self.bays.state(key)
    }

    /// The class a row is planned for, in any owner plan or the overflow
    /// pool. `None` for rows outside every plan.
    pub fn planned_class(&self, row: RowNumber) -> Option<ContainerClass> {
        self.overflow_plan.class_of(row).or_else(|| {
            self.cursors
                .iter()
                .find(|(_, cursor)| cursor.rows().contains(&row))
                .map(|(&(_, class), _)| class)
        })
    }

    #[inline]
    pub fn is_known_owner(&self, owner: ScopeId) -> bool {
        self.cursors.contains_key(&(owner, ContainerClass::TWENTY_LADEN))
    }

    #[inline]
    pub fn cursor(&self, owner: ScopeId, class: ContainerClass) -> Option<&SlotCursor> {
        self.cursors.get(&(owner, class))
    }

    #[inline]
    pub fn overflow_cursor(&self, class: ContainerClass) -> Option<&SlotCursor> {
        self.overflow_cursors.get(&class)
    }

    #[inline]
    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    #[inline]
    pub fn gate(&self) -> &G {
        &self.gate
    }
}
