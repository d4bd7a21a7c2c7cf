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

use crate::{density::DensityGate, engine::YardEngine, err::ReleaseError, occupancy::Occupant};
use tracing::{debug, instrument};
use yard_alloc_core::coord::{SlotCoordinate, SubSlot};
use yard_alloc_model::id::OccupantId;

impl<G: DensityGate> YardEngine<G> {
    /// Removes the container recorded at `coord` and returns its occupant.
    ///
    /// Succeeds whenever something is recorded there, even if containers
    /// stand on top of it. Callers check [`Self::is_exit_blocked`] first.
    /// No cursor is rewound; the freed footprint is reused only by a cursor
    /// that has not yet moved past its bay.
    #[instrument(level = "debug", skip_all, fields(coord = %coord))]
    pub fn release(&mut self, coord: SlotCoordinate) -> Result<OccupantId, ReleaseError> {
        let occupant = self
            .occupancy
            .remove(&coord)
            .ok_or(ReleaseError::NotFound(coord))?;
        let state = self.bays.refresh(&self.occupancy, &coord.bay_key());
        self.stats.released += 1;
        debug!(occupant = %occupant.id(), bay = %state, "released");
        Ok(occupant.id())
    }

    /// Containers stacked above the occupant at `coord`, lowest first.
    ///
    /// Every footprint the occupant uses is checked up to the top tier: a
    /// 40ft occupant is blocked by anything above either half. Empty when
    /// nothing is recorded at `coord`.
    pub fn blocking_occupants(&self, coord: &SlotCoordinate) -> Vec<(SlotCoordinate, Occupant)> {
        let Some(occupant) = self.occupancy.get(coord) else {
            return Vec::new();
        };
        let footprints = if occupant.size().is_forty() {
            SubSlot::BOTH.to_vec()
        } else {
            vec![coord.sub_slot()]
        };

        let mut blocking: Vec<(SlotCoordinate, Occupant)> = Vec::new();
        let mut above = coord.above();
        while above.tier() <= self.bounds.max_tier() {
            for &sub in &footprints {
                let Some(hit) = self.covering(&above.with_sub_slot(sub)) else {
                    continue;
                };
                if !blocking.iter().any(|(c, _)| *c == hit.0) {
                    blocking.push(hit);
                }
            }
            above = above.above();
        }
        blocking
    }

    #[inline]
    pub fn is_exit_blocked(&self, coord: &SlotCoordinate) -> bool {
        !self.blocking_occupants(coord).is_empty()
    }

    /// The recorded occupant whose footprint includes `coord`.
    fn covering(&self, coord: &SlotCoordinate) -> Option<(SlotCoordinate, Occupant)> {
        if let Some(o) = self.occupancy.get(coord) {
            return Some((*coord, *o));
        }
        let anchor = coord.with_sub_slot(SubSlot::A);
        match coord.sub_slot() {
            SubSlot::B => self
                .occupancy
                .get(&anchor)
                .filter(|o| o.size().is_forty())
                .map(|o| (anchor, *o)),
            SubSlot::A => None,
        }
    }
}
