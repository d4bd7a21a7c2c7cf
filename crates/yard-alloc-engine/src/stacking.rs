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

//! Physical stacking laws.
//!
//! Pure predicates over an [`OccupancySet`]; nothing here mutates state.
//! A container may not float, and a 40ft container may not rest on a bay
//! whose lower tier carries a single 20ft container.

use crate::occupancy::OccupancySet;
use std::fmt::Display;
use yard_alloc_core::{
    class::ContainerSize,
    coord::{SlotCoordinate, SubSlot},
};
use yard_alloc_model::bounds::YardBounds;

/// Ground tier, or the same footprint one tier down is taken.
#[inline]
pub fn has_ground_or_support(coord: &SlotCoordinate, occupancy: &OccupancySet) -> bool {
    match coord.below() {
        None => true,
        Some(below) => occupancy.covers(&below),
    }
}

/// Ground tier, or both halves of the bay below are in the same state.
///
/// Exactly one occupied half is the forbidden case. Both-empty passes here
/// and is rejected by [`has_ground_or_support`] instead.
#[inline]
pub fn can_place_40ft(coord: &SlotCoordinate, occupancy: &OccupancySet) -> bool {
    match coord.below() {
        None => true,
        Some(below) => {
            occupancy.covers(&below.with_sub_slot(SubSlot::A))
                == occupancy.covers(&below.with_sub_slot(SubSlot::B))
        }
    }
}

#[inline]
pub fn within_bounds(coord: &SlotCoordinate, bounds: &YardBounds) -> bool {
    bounds.contains(coord)
}

/// Whether any footprint of the bay one tier below `coord` is taken.
#[inline]
pub fn bay_has_any_support(coord: &SlotCoordinate, occupancy: &OccupancySet) -> bool {
    match coord.below() {
        None => true,
        Some(below) => SubSlot::BOTH
            .iter()
            .any(|&sub| occupancy.covers(&below.with_sub_slot(sub))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackingViolation {
    OutOfBounds,
    Occupied,
    Floating,
    FortyOnSingleTwenty,
    FortyNotAnchoredAtA,
}

impl Display for StackingViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StackingViolation::OutOfBounds => write!(f, "slot lies outside the yard"),
            StackingViolation::Occupied => write!(f, "footprint is already occupied"),
            StackingViolation::Floating => write!(f, "nothing supports the slot from below"),
            StackingViolation::FortyOnSingleTwenty => {
                write!(f, "40ft container would rest on a single 20ft container")
            }
            StackingViolation::FortyNotAnchoredAtA => {
                write!(f, "40ft containers are recorded at sub-slot A")
            }
        }
    }
}

impl std::error::Error for StackingViolation {}

/// Full legality check for placing a container of `size` at `coord`.
pub fn check_placement(
    size: ContainerSize,
    coord: &SlotCoordinate,
    occupancy: &OccupancySet,
    bounds: &YardBounds,
) -> Result<(), StackingViolation> {
    if !within_bounds(coord, bounds) {
        return Err(StackingViolation::OutOfBounds);
    }
    if size.is_forty() && coord.sub_slot() != SubSlot::A {
        return Err(StackingViolation::FortyNotAnchoredAtA);
    }
    if !occupancy.footprint_free(coord, size) {
        return Err(StackingViolation::Occupied);
    }
    if !has_ground_or_support(coord, occupancy) {
        return Err(StackingViolation::Floating);
    }
    if size.is_forty() && !can_place_40ft(coord, occupancy) {
        return Err(StackingViolation::FortyOnSingleTwenty);
    }
    Ok(())
}
