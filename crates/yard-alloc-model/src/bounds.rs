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

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use yard_alloc_core::coord::{BayNumber, RowNumber, SlotCoordinate, TierNumber, Zone};

/// Physical extent of one yard zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YardBounds {
    zone: Zone,
    max_row: RowNumber,
    max_bay: BayNumber,
    max_tier: TierNumber,
}

impl YardBounds {
    #[inline]
    pub const fn new(
        zone: Zone,
        max_row: RowNumber,
        max_bay: BayNumber,
        max_tier: TierNumber,
    ) -> Self {
        Self {
            zone,
            max_row,
            max_bay,
            max_tier,
        }
    }

    #[inline]
    pub const fn zone(&self) -> Zone {
        self.zone
    }

    #[inline]
    pub const fn max_row(&self) -> RowNumber {
        self.max_row
    }

    #[inline]
    pub const fn max_bay(&self) -> BayNumber {
        self.max_bay
    }

    #[inline]
    pub const fn max_tier(&self) -> TierNumber {
        self.max_tier
    }

    #[inline]
    pub const fn with_max_row(self, max_row: RowNumber) -> Self {
        Self { max_row, ..self }
    }

    /// All components are 1-based; a zero extent makes the yard unusable.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.max_row.value() >= 1 && self.max_bay.value() >= 1 && self.max_tier.value() >= 1
    }

    #[inline]
    pub fn contains_row(&self, row: RowNumber) -> bool {
        row >= RowNumber::FIRST && row <= self.max_row
    }

    #[inline]
    pub fn contains(&self, coord: &SlotCoordinate) -> bool {
        coord.zone() == self.zone
            && self.contains_row(coord.row())
            && coord.bay() >= BayNumber::FIRST
            && coord.bay() <= self.max_bay
            && coord.tier() >= TierNumber::FIRST
            && coord.tier() <= self.max_tier
    }

    /// Bay positions per row, counting every tier once.
    #[inline]
    pub fn positions_per_row(&self) -> usize {
        self.max_bay.value() as usize * self.max_tier.value() as usize
    }

    /// 20ft footprints in the whole zone.
    #[inline]
    pub fn footprint_capacity(&self) -> usize {
        self.max_row.value() as usize * self.positions_per_row() * 2
    }
}

impl Display for YardBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "YardBounds(zone {}, rows {}, bays {}, tiers {})",
            self.zone,
            self.max_row.value(),
            self.max_bay.value(),
            self.max_tier.value()
        )
    }
}

/// What happens once both an owner's rows and the overflow rows are full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverflowMode {
    /// Surface the exhaustion to the caller.
    Strict,
    /// Append a fresh row past the yard's current last row to the overflow
    /// pool and retry once, at most `max_extra_rows` times per session.
    AutoExpand { max_extra_rows: Option<u32> },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StackingPolicy {
    density_skip_rate: f64,
    overflow_mode: OverflowMode,
}

impl Default for StackingPolicy {
    fn default() -> Self {
        Self {
            density_skip_rate: 0.2,
            overflow_mode: OverflowMode::AutoExpand {
                max_extra_rows: None,
            },
        }
    }
}

impl StackingPolicy {
    #[inline]
    pub const fn new(density_skip_rate: f64, overflow_mode: OverflowMode) -> Self {
        Self {
            density_skip_rate,
            overflow_mode,
        }
    }

    /// Probability of leaving an untouched ground position empty.
    #[inline]
    pub const fn density_skip_rate(&self) -> f64 {
        self.density_skip_rate
    }

    #[inline]
    pub const fn overflow_mode(&self) -> OverflowMode {
        self.overflow_mode
    }

    #[inline]
    pub fn has_valid_skip_rate(&self) -> bool {
        (0.0..=1.0).contains(&self.density_skip_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yard_alloc_core::coord::SubSlot;

    fn bounds() -> YardBounds {
        YardBounds::new(
            Zone::default(),
            RowNumber::new(4),
            BayNumber::new(10),
            TierNumber::new(3),
        )
    }

    #[test]
    fn test_contains_checks_every_axis() {
        let b = bounds();
        let inside = SlotCoordinate::new(
            Zone::default(),
            RowNumber::new(4),
            BayNumber::new(10),
            TierNumber::new(3),
            SubSlot::B,
        );
        assert!(b.contains(&inside));
        assert!(!b.contains(&inside.with_tier(TierNumber::new(4))));
        let other_zone = SlotCoordinate::new(
            Zone::new('C'),
            RowNumber::new(1),
            BayNumber::new(1),
            TierNumber::new(1),
            SubSlot::A,
        );
        assert!(!b.contains(&other_zone));
    }

    #[test]
    fn test_capacity() {
        assert_eq!(bounds().positions_per_row(), 30);
        assert_eq!(bounds().footprint_capacity(), 240);
    }

    #[test]
    fn test_skip_rate_range() {
        assert!(StackingPolicy::new(0.0, OverflowMode::Strict).has_valid_skip_rate());
        assert!(StackingPolicy::new(1.0, OverflowMode::Strict).has_valid_skip_rate());
        assert!(!StackingPolicy::new(1.5, OverflowMode::Strict).has_valid_skip_rate());
        assert!(!StackingPolicy::new(f64::NAN, OverflowMode::Strict).has_valid_skip_rate());
    }
}
