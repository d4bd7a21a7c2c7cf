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

//! Forward-only traversal of one scope's rows for one container class.
//!
//! A [`SlotCursor`] walks `(row, bay, tier)` with the bay moving fastest,
//! then the tier, then the row. It never moves backwards: exits free
//! occupancy but do not rewind any cursor, so freed capacity is reused only
//! while the cursor still sits on that bay.

use crate::{
    bay::{BayLedger, BayState},
    density::DensityGate,
    err::IterationBoundExceededError,
    occupancy::OccupancySet,
    stacking,
};
use std::{cmp::Ordering, fmt::Display};
use tracing::trace;
use yard_alloc_core::{
    class::{ContainerClass, ContainerSize},
    coord::{BayKey, BayNumber, RowNumber, SlotCoordinate, SubSlot, TierNumber},
};
use yard_alloc_model::{bounds::YardBounds, id::RowScope};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CursorStats {
    filled: u64,
    skipped: u64,
}

impl CursorStats {
    #[inline]
    pub fn filled(&self) -> u64 {
        self.filled
    }

    /// Ground positions left empty by the density gate.
    #[inline]
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

/// Where a cursor resumes scanning. Ordered in traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CursorPosition {
    row_index: usize,
    bay: BayNumber,
    tier: TierNumber,
}

impl CursorPosition {
    #[inline]
    pub fn row_index(&self) -> usize {
        self.row_index
    }

    #[inline]
    pub fn bay(&self) -> BayNumber {
        self.bay
    }

    #[inline]
    pub fn tier(&self) -> TierNumber {
        self.tier
    }
}

impl Ord for CursorPosition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.row_index
            .cmp(&other.row_index)
            .then(self.tier.cmp(&other.tier))
            .then(self.bay.cmp(&other.bay))
    }
}

impl PartialOrd for CursorPosition {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for CursorPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(row #{}, bay {}, tier {})",
            self.row_index,
            self.bay.value(),
            self.tier.value()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCursor {
    scope: RowScope,
    class: ContainerClass,
    rows: Vec<RowNumber>,
    row_index: usize,
    bay: BayNumber,
    tier: TierNumber,
    stats: CursorStats,
}

impl SlotCursor {
    pub fn new(scope: RowScope, class: ContainerClass, rows: Vec<RowNumber>) -> Self {
        Self {
            scope,
            class,
            rows,
            row_index: 0,
            bay: BayNumber::FIRST,
            tier: TierNumber::FIRST,
            stats: CursorStats::default(),
        }
    }

    #[inline]
    pub fn scope(&self) -> RowScope {
        self.scope
    }

    #[inline]
    pub fn class(&self) -> ContainerClass {
        self.class
    }

    #[inline]
    pub fn rows(&self) -> &[RowNumber] {
        &self.rows
    }

    #[inline]
    pub fn stats(&self) -> &CursorStats {
        &self.stats
    }

    #[inline]
    pub fn position(&self) -> CursorPosition {
        CursorPosition {
            row_index: self.row_index,
            bay: self.bay,
            tier: self.tier,
        }
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.row_index >= self.rows.len()
    }

    #[inline]
    pub fn current_row(&self) -> Option<RowNumber> {
        self.rows.get(self.row_index).copied()
    }

    /// Moves one position forward: next bay, wrapping into the next tier,
    /// wrapping into the next row with bay and tier reset.
    pub fn advance(&mut self, max_bay: BayNumber, max_tier: TierNumber) {
        if self.is_exhausted() {
            return;
        }
        if self.bay < max_bay {
            self.bay = self.bay.next();
        } else if self.tier < max_tier {
            self.bay = BayNumber::FIRST;
            self.tier = self.tier.next();
        } else {
            self.bay = BayNumber::FIRST;
            self.tier = TierNumber::FIRST;
            self.row_index += 1;
        }
    }

    /// Appends a row to the end of the traversal. An exhausted cursor
    /// resumes at the start of the new row.
    pub fn extend_rows(&mut self, row: RowNumber) {
        self.rows.push(row);
    }

    /// Takes back a row appended by [`Self::extend_rows`] once the cursor
    /// has run past it. Returns whether `row` was the last row.
    pub fn retract_row(&mut self, row: RowNumber) -> bool {
        if self.rows.last() != Some(&row) {
            return false;
        }
        self.rows.pop();
        if self.row_index >= self.rows.len() {
            self.row_index = self.rows.len();
            self.bay = BayNumber::FIRST;
            self.tier = TierNumber::FIRST;
        }
        true
    }

    /// Hard limit on positions examined by one [`Self::try_next_position`]
    /// call: every position of every row, plus the exhaustion check.
    #[inline]
    pub fn iteration_cap(&self, bounds: &YardBounds) -> usize {
        self.rows.len() * bounds.positions_per_row() + 1
    }

    /// Scans forward for the next legal position of this cursor's class.
    ///
    /// Returns `Ok(None)` once the cursor runs off its last row. The
    /// returned coordinate is not recorded anywhere; the caller commits it
    /// to the occupancy set before the next call.
    ///
    /// A 40ft hit always moves the cursor on. A 20ft hit moves it on only
    /// when the other half of the bay is already taken, so the next call
    /// can fill the remaining half of the same bay.
    pub fn try_next_position<G>(
        &mut self,
        occupancy: &OccupancySet,
        ledger: &BayLedger,
        bounds: &YardBounds,
        gate: &mut G,
    ) -> Result<Option<SlotCoordinate>, IterationBoundExceededError>
    where
        G: DensityGate + ?Sized,
    {
        let cap = self.iteration_cap(bounds);
        let (max_bay, max_tier) = (bounds.max_bay(), bounds.max_tier());

        for _ in 0..cap {
            let Some(row) = self.current_row() else {
                return Ok(None);
            };
            let key = BayKey::new(bounds.zone(), row, self.bay, self.tier);
            let anchor = key.slot(SubSlot::A);

            if self.tier.is_first()
                && ledger.state(&key) == BayState::Empty
                && gate.should_skip(&anchor)
            {
                self.stats.skipped += 1;
                trace!(scope = %self.scope, class = %self.class, bay = %key, "density skip");
                self.advance(max_bay, max_tier);
                continue;
            }

            if !stacking::within_bounds(&anchor, bounds) {
                self.advance(max_bay, max_tier);
                continue;
            }

            if !self.tier.is_first() && !stacking::bay_has_any_support(&anchor, occupancy) {
                trace!(scope = %self.scope, class = %self.class, bay = %key, "unsupported bay");
                self.advance(max_bay, max_tier);
                continue;
            }

            match self.class.size() {
                ContainerSize::Forty => {
                    if !stacking::can_place_40ft(&anchor, occupancy) {
                        trace!(scope = %self.scope, bay = %key, "40ft over single 20ft");
                        self.advance(max_bay, max_tier);
                        continue;
                    }
                    if !occupancy.footprint_free(&anchor, ContainerSize::Forty) {
                        self.advance(max_bay, max_tier);
                        continue;
                    }
                    self.stats.filled += 1;
                    self.advance(max_bay, max_tier);
                    return Ok(Some(anchor));
                }
                ContainerSize::Twenty => {
                    let free = SubSlot::BOTH.iter().map(|&sub| key.slot(sub)).find(|c| {
                        !occupancy.covers(c) && stacking::has_ground_or_support(c, occupancy)
                    });
                    let Some(coord) = free else {
                        self.advance(max_bay, max_tier);
                        continue;
                    };
                    self.stats.filled += 1;
                    if occupancy.covers(&coord.with_sub_slot(coord.sub_slot().other())) {
                        self.advance(max_bay, max_tier);
                    }
                    return Ok(Some(coord));
                }
            }
        }

        Err(IterationBoundExceededError::new(self.scope, self.class, cap))
    }
}
