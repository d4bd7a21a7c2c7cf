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

use crate::occupancy::OccupancySet;
use std::{collections::HashMap, fmt::Display};
use yard_alloc_core::coord::BayKey;

/// Derived fill state of one bay at one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BayState {
    #[default]
    Empty,
    /// Exactly one 20ft footprint is taken. Usually `A`; after an exit it
    /// may be `B` alone.
    SlotAUsed,
    /// Both footprints are taken, by two 20ft containers or by one 40ft.
    Full,
}

impl BayState {
    pub fn derive(occupancy: &OccupancySet, key: &BayKey) -> BayState {
        match occupancy.bay(key) {
            (Some(a), _) if a.size().is_forty() => BayState::Full,
            (Some(_), Some(_)) => BayState::Full,
            (None, None) => BayState::Empty,
            _ => BayState::SlotAUsed,
        }
    }
}

impl Display for BayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BayState::Empty => write!(f, "EMPTY"),
            BayState::SlotAUsed => write!(f, "SLOT_A_USED"),
            BayState::Full => write!(f, "FULL"),
        }
    }
}

/// Per-bay bookkeeping kept next to the [`OccupancySet`]. Only non-empty
/// bays are stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BayLedger {
    states: HashMap<BayKey, BayState>,
}

impl BayLedger {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self, key: &BayKey) -> BayState {
        self.states.get(key).copied().unwrap_or_default()
    }

    /// Recomputes `key` from the occupancy set and returns the new state.
    pub fn refresh(&mut self, occupancy: &OccupancySet, key: &BayKey) -> BayState {
        let state = BayState::derive(occupancy, key);
        match state {
            BayState::Empty => {
                self.states.remove(key);
            }
            _ => {
                self.states.insert(*key, state);
            }
        }
        state
    }

    #[inline]
    pub fn non_empty_bays(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn full_bays(&self) -> usize {
        self.states.values().filter(|s| **s == BayState::Full).count()
    }
}
