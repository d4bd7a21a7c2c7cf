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

//! Ground truth of what stands where.
//!
//! A coordinate is present in the [`OccupancySet`] if and only if a container
//! currently occupies it, and removal is the only way it disappears. A 40ft
//! container is recorded under sub-slot `A` only; [`OccupancySet::covers`]
//! is the query that accounts for the `B` footprint it reserves.

use std::collections::BTreeMap;
use yard_alloc_core::{
    class::{ContainerClass, ContainerSize},
    coord::{BayKey, SlotCoordinate, SubSlot},
};
use yard_alloc_model::id::OccupantId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Occupant {
    id: OccupantId,
    class: ContainerClass,
}

impl Occupant {
    #[inline]
    pub fn new(id: OccupantId, class: ContainerClass) -> Self {
        Self { id, class }
    }

    #[inline]
    pub fn id(&self) -> OccupantId {
        self.id
    }

    #[inline]
    pub fn class(&self) -> ContainerClass {
        self.class
    }

    #[inline]
    pub fn size(&self) -> ContainerSize {
        self.class.size()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccupancySet {
    slots: BTreeMap<SlotCoordinate, Occupant>,
}

impl OccupancySet {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Literal membership: is an occupant recorded at exactly `coord`?
    #[inline]
    pub fn contains(&self, coord: &SlotCoordinate) -> bool {
        self.slots.contains_key(coord)
    }

    #[inline]
    pub fn get(&self, coord: &SlotCoordinate) -> Option<&Occupant> {
        self.slots.get(coord)
    }

    /// Records `occupant` at `coord` and returns whatever was recorded there
    /// before. Callers only insert into free footprints, so the result is
    /// `None` in correct operation.
    #[inline]
    pub fn insert(&mut self, coord: SlotCoordinate, occupant: Occupant) -> Option<Occupant> {
        self.slots.insert(coord, occupant)
    }

    #[inline]
    pub fn remove(&mut self, coord: &SlotCoordinate) -> Option<Occupant> {
        self.slots.remove(coord)
    }

    /// Physical occupancy of a footprint: `coord` is recorded itself, or it
    /// is the `B` half of a bay whose `A` holds a 40ft container.
    pub fn covers(&self, coord: &SlotCoordinate) -> bool {
        if self.contains(coord) {
            return true;
        }
        match coord.sub_slot() {
            SubSlot::A => false,
            SubSlot::B => self
                .get(&coord.with_sub_slot(SubSlot::A))
                .is_some_and(|o| o.size().is_forty()),
        }
    }

    /// Whether a container of `size` anchored at `coord` would only touch
    /// free footprints. A 40ft container needs both halves of its bay.
    pub fn footprint_free(&self, coord: &SlotCoordinate, size: ContainerSize) -> bool {
        match size {
            ContainerSize::Twenty => !self.covers(coord),
            ContainerSize::Forty => SubSlot::BOTH
                .iter()
                .all(|&sub| !self.covers(&coord.with_sub_slot(sub))),
        }
    }

    /// Occupants recorded at the `A` and `B` slot of one bay.
    #[inline]
    pub fn bay(&self, key: &BayKey) -> (Option<&Occupant>, Option<&Occupant>) {
        (self.get(&key.slot(SubSlot::A)), self.get(&key.slot(SubSlot::B)))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Occupied coordinates in `(row, bay, tier, sub_slot)` order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&SlotCoordinate, &Occupant)> + '_ {
        self.slots.iter()
    }

    /// Number of 20ft footprints in use; a 40ft container counts twice.
    pub fn footprints_used(&self) -> usize {
        self.slots
            .values()
            .map(|o| if o.size().is_forty() { 2 } else { 1 })
            .sum()
    }
}
