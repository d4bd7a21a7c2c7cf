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

use std::fmt::Display;
use yard_alloc_core::coord::SlotCoordinate;

/// Which row pool a placement came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlacementSource {
    Primary,
    Overflow,
    /// A row appended to the overflow pool for this very request.
    Expanded,
}

impl Display for PlacementSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlacementSource::Primary => write!(f, "primary"),
            PlacementSource::Overflow => write!(f, "overflow"),
            PlacementSource::Expanded => write!(f, "expanded"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlacementOutcome {
    coord: SlotCoordinate,
    source: PlacementSource,
}

impl PlacementOutcome {
    #[inline]
    pub fn new(coord: SlotCoordinate, source: PlacementSource) -> Self {
        Self { coord, source }
    }

    #[inline]
    pub fn coord(&self) -> SlotCoordinate {
        self.coord
    }

    #[inline]
    pub fn source(&self) -> PlacementSource {
        self.source
    }
}

impl Display for PlacementOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.coord, self.source)
    }
}

/// Session counters of a [`crate::engine::YardEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EngineStats {
    pub(crate) primary: u64,
    pub(crate) overflow: u64,
    pub(crate) expanded: u64,
    pub(crate) expansions: u32,
    pub(crate) exhausted: u64,
    pub(crate) released: u64,
    pub(crate) restored: u64,
}

impl EngineStats {
    #[inline]
    pub fn primary(&self) -> u64 {
        self.primary
    }

    #[inline]
    pub fn overflow(&self) -> u64 {
        self.overflow
    }

    #[inline]
    pub fn expanded(&self) -> u64 {
        self.expanded
    }

    /// Rows appended to the overflow pool so far.
    #[inline]
    pub fn expansions(&self) -> u32 {
        self.expansions
    }

    #[inline]
    pub fn exhausted(&self) -> u64 {
        self.exhausted
    }

    #[inline]
    pub fn released(&self) -> u64 {
        self.released
    }

    #[inline]
    pub fn restored(&self) -> u64 {
        self.restored
    }

    #[inline]
    pub fn placed(&self) -> u64 {
        self.primary + self.overflow + self.expanded
    }

    pub(crate) fn record(&mut self, source: PlacementSource) {
        match source {
            PlacementSource::Primary => self.primary += 1,
            PlacementSource::Overflow => self.overflow += 1,
            PlacementSource::Expanded => self.expanded += 1,
        }
    }
}

impl Display for EngineStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "placed {} (primary {}, overflow {}, expanded {}), expansions {}, exhausted {}, released {}, restored {}",
            self.placed(),
            self.primary,
            self.overflow,
            self.expanded,
            self.expansions,
            self.exhausted,
            self.released,
            self.restored
        )
    }
}
