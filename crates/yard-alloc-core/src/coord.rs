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

//! Physical addressing inside a stacking yard.
//!
//! A slot is addressed by `(zone, row, bay, tier, sub_slot)`. Rows, bays and
//! tiers are 1-based; tier 1 is the ground. Every bay is 40ft wide and splits
//! into two independent 20ft footprints, [`SubSlot::A`] and [`SubSlot::B`].

use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    fmt::{Debug, Display},
    str::FromStr,
};

macro_rules! coordinate_index {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
        #[serde(try_from = "u32", into = "u32")]
        pub struct $name(u32);

        impl $name {
            pub const FIRST: Self = $name(1);

            #[inline]
            pub const fn new(v: u32) -> Self {
                debug_assert!(v >= 1, "coordinate components are 1-based");
                $name(v)
            }

            #[inline]
            pub const fn value(self) -> u32 {
                self.0
            }

            #[inline]
            pub const fn is_first(self) -> bool {
                self.0 == 1
            }

            #[inline]
            pub const fn next(self) -> Self {
                $name(self.0.saturating_add(1))
            }

            #[inline]
            pub const fn prev(self) -> Option<Self> {
                if self.0 > 1 { Some($name(self.0 - 1)) } else { None }
            }
        }

        impl Display for $name {
            #[inline]
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", $label, self.0)
            }
        }

        impl From<$name> for u32 {
            #[inline]
            fn from(v: $name) -> Self {
                v.0
            }
        }

        impl TryFrom<u32> for $name {
            type Error = CoordinateComponentError;

            #[inline]
            fn try_from(v: u32) -> Result<Self, Self::Error> {
                if v >= 1 {
                    Ok($name(v))
                } else {
                    Err(CoordinateComponentError::new($label, &v.to_string()))
                }
            }
        }

        impl FromStr for $name {
            type Err = CoordinateComponentError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().parse::<u32>() {
                    Ok(v) if v >= 1 => Ok($name(v)),
                    _ => Err(CoordinateComponentError::new($label, s)),
                }
            }
        }
    };
}

coordinate_index!(
    /// A yard row. Rows are the unit of class segregation.
    RowNumber,
    "Row"
);
coordinate_index!(
    /// A bay position along a row.
    BayNumber,
    "Bay"
);
coordinate_index!(
    /// A stacking level inside a bay, tier 1 being the ground.
    TierNumber,
    "Tier"
);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CoordinateComponentError {
    component: &'static str,
    input: String,
}

impl CoordinateComponentError {
    #[inline]
    pub fn new(component: &'static str, input: &str) -> Self {
        Self {
            component,
            input: input.to_owned(),
        }
    }

    #[inline]
    pub fn component(&self) -> &'static str {
        self.component
    }

    #[inline]
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl Display for CoordinateComponentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid {} component {:?}: expected a positive integer",
            self.component, self.input
        )
    }
}

impl std::error::Error for CoordinateComponentError {}

/// A yard block identifier, rendered as a single letter.
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Zone(char);

impl Zone {
    #[inline]
    pub const fn new(id: char) -> Self {
        Zone(id)
    }

    #[inline]
    pub const fn id(self) -> char {
        self.0
    }
}

impl Default for Zone {
    #[inline]
    fn default() -> Self {
        Zone('A')
    }
}

impl Display for Zone {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the two 20ft footprints of a bay.
///
/// A 40ft container is recorded at `A` and reserves `B` implicitly.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
pub enum SubSlot {
    A,
    B,
}

impl SubSlot {
    pub const BOTH: [SubSlot; 2] = [SubSlot::A, SubSlot::B];

    #[inline]
    pub const fn other(self) -> SubSlot {
        match self {
            SubSlot::A => SubSlot::B,
            SubSlot::B => SubSlot::A,
        }
    }
}

impl Display for SubSlot {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubSlot::A => write!(f, "A"),
            SubSlot::B => write!(f, "B"),
        }
    }
}

impl FromStr for SubSlot {
    type Err = CoordinateComponentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(SubSlot::A),
            "B" | "b" => Ok(SubSlot::B),
            other => Err(CoordinateComponentError::new("SubSlot", other)),
        }
    }
}

/// One bay at one tier: the unit whose two sub-slots are tracked together.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
pub struct BayKey {
    zone: Zone,
    row: RowNumber,
    bay: BayNumber,
    tier: TierNumber,
}

impl BayKey {
    #[inline]
    pub const fn new(zone: Zone, row: RowNumber, bay: BayNumber, tier: TierNumber) -> Self {
        Self {
            zone,
            row,
            bay,
            tier,
        }
    }

    #[inline]
    pub const fn zone(&self) -> Zone {
        self.zone
    }

    #[inline]
    pub const fn row(&self) -> RowNumber {
        self.row
    }

    #[inline]
    pub const fn bay(&self) -> BayNumber {
        self.bay
    }

    #[inline]
    pub const fn tier(&self) -> TierNumber {
        self.tier
    }

    #[inline]
    pub const fn slot(&self, sub_slot: SubSlot) -> SlotCoordinate {
        SlotCoordinate::new(self.zone, self.row, self.bay, self.tier, sub_slot)
    }

    #[inline]
    pub fn below(&self) -> Option<BayKey> {
        self.tier
            .prev()
            .map(|tier| BayKey::new(self.zone, self.row, self.bay, tier))
    }
}

impl Display for BayKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-R{:02}-B{:02}-T{}",
            self.zone,
            self.row.value(),
            self.bay.value(),
            self.tier.value()
        )
    }
}

/// The physical address of a single 20ft footprint.
///
/// Ordering is `(row, bay, tier, sub_slot)`, with the zone only breaking ties
/// so that `Ord` stays consistent with `Eq`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct SlotCoordinate {
    zone: Zone,
    row: RowNumber,
    bay: BayNumber,
    tier: TierNumber,
    sub_slot: SubSlot,
}

impl SlotCoordinate {
    #[inline]
    pub const fn new(
        zone: Zone,
        row: RowNumber,
        bay: BayNumber,
        tier: TierNumber,
        sub_slot: SubSlot,
    ) -> Self {
        Self {
            zone,
            row,
            bay,
            tier,
            sub_slot,
        }
    }

    #[inline]
    pub const fn zone(&self) -> Zone {
        self.zone
    }

    #[inline]
    pub const fn row(&self) -> RowNumber {
        self.row
    }

    #[inline]
    pub const fn bay(&self) -> BayNumber {
        self.bay
    }

    #[inline]
    pub const fn tier(&self) -> TierNumber {
        self.tier
    }

    #[inline]
    pub const fn sub_slot(&self) -> SubSlot {
        self.sub_slot
    }

    #[inline]
    pub const fn is_ground(&self) -> bool {
        self.tier.is_first()
    }

    #[inline]
    pub const fn bay_key(&self) -> BayKey {
        BayKey::new(self.zone, self.row, self.bay, self.tier)
    }

    #[inline]
    pub const fn with_sub_slot(self, sub_slot: SubSlot) -> Self {
        Self { sub_slot, ..self }
    }

    #[inline]
    pub const fn with_tier(self, tier: TierNumber) -> Self {
        Self { tier, ..self }
    }

    /// The same footprint one tier down, or `None` on the ground.
    #[inline]
    pub fn below(&self) -> Option<SlotCoordinate> {
        self.tier.prev().map(|tier| self.with_tier(tier))
    }

    #[inline]
    pub fn above(&self) -> SlotCoordinate {
        self.with_tier(self.tier.next())
    }
}

impl Ord for SlotCoordinate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.row
            .cmp(&other.row)
            .then(self.bay.cmp(&other.bay))
            .then(self.tier.cmp(&other.tier))
            .then(self.sub_slot.cmp(&other.sub_slot))
            .then(self.zone.cmp(&other.zone))
    }
}

impl PartialOrd for SlotCoordinate {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for SlotCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.bay_key(), self.sub_slot)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotCoordinateParseError {
    input: String,
    reason: String,
}

impl SlotCoordinateParseError {
    #[inline]
    pub fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_owned(),
            reason: reason.into(),
        }
    }

    #[inline]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[inline]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl Display for SlotCoordinateParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cannot parse slot coordinate {:?}: {}",
            self.input, self.reason
        )
    }
}

impl std::error::Error for SlotCoordinateParseError {}

impl FromStr for SlotCoordinate {
    type Err = SlotCoordinateParseError;

    /// Parses the display form, e.g. `A-R03-B07-T2-B`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('-').collect();
        let [zone, row, bay, tier, sub] = parts.as_slice() else {
            return Err(SlotCoordinateParseError::new(
                s,
                format!("expected 5 dash-separated parts, found {}", parts.len()),
            ));
        };

        let mut zone_chars = zone.chars();
        let zone = match (zone_chars.next(), zone_chars.next()) {
            (Some(c), None) if c.is_ascii_alphanumeric() => Zone::new(c),
            _ => return Err(SlotCoordinateParseError::new(s, "zone must be one character")),
        };

        fn prefixed<'a>(
            input: &str,
            part: &'a str,
            prefix: char,
        ) -> Result<&'a str, SlotCoordinateParseError> {
            part.strip_prefix(prefix).ok_or_else(|| {
                SlotCoordinateParseError::new(input, format!("expected {prefix}-prefix in {part:?}"))
            })
        }

        let wrap = |e: CoordinateComponentError| SlotCoordinateParseError::new(s, e.to_string());
        let row: RowNumber = prefixed(s, row, 'R')?.parse().map_err(wrap)?;
        let bay: BayNumber = prefixed(s, bay, 'B')?.parse().map_err(wrap)?;
        let tier: TierNumber = prefixed(s, tier, 'T')?.parse().map_err(wrap)?;
        let sub: SubSlot = sub.parse().map_err(wrap)?;

        Ok(SlotCoordinate::new(zone, row, bay, tier, sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(row: u32, bay: u32, tier: u32, sub: SubSlot) -> SlotCoordinate {
        SlotCoordinate::new(
            Zone::default(),
            RowNumber::new(row),
            BayNumber::new(bay),
            TierNumber::new(tier),
            sub,
        )
    }

    #[test]
    fn test_component_display() {
        assert_eq!(format!("{}", RowNumber::new(3)), "Row(3)");
        assert_eq!(format!("{}", TierNumber::new(1)), "Tier(1)");
    }

    #[test]
    fn test_component_prev_stops_at_first() {
        assert_eq!(TierNumber::new(2).prev(), Some(TierNumber::new(1)));
        assert_eq!(TierNumber::FIRST.prev(), None);
    }

    #[test]
    fn test_component_rejects_zero() {
        assert!("0".parse::<BayNumber>().is_err());
        assert!("x".parse::<BayNumber>().is_err());
        assert_eq!("7".parse::<BayNumber>(), Ok(BayNumber::new(7)));
    }

    #[test]
    fn test_component_deserialize_rejects_zero() {
        assert_eq!(serde_json::from_str::<RowNumber>("4").unwrap(), RowNumber::new(4));
        assert!(serde_json::from_str::<RowNumber>("0").is_err());
        assert!(serde_json::from_str::<TierNumber>("0").is_err());
        assert_eq!(serde_json::to_string(&BayNumber::new(9)).unwrap(), "9");
        assert_eq!(TierNumber::try_from(0).unwrap_err().component(), "Tier");
    }

    #[test]
    fn test_coordinate_ordering_is_row_bay_tier_slot() {
        let mut coords = vec![
            coord(2, 1, 1, SubSlot::A),
            coord(1, 2, 1, SubSlot::A),
            coord(1, 1, 2, SubSlot::A),
            coord(1, 1, 1, SubSlot::B),
            coord(1, 1, 1, SubSlot::A),
        ];
        coords.sort();
        assert_eq!(
            coords,
            vec![
                coord(1, 1, 1, SubSlot::A),
                coord(1, 1, 1, SubSlot::B),
                coord(1, 1, 2, SubSlot::A),
                coord(1, 2, 1, SubSlot::A),
                coord(2, 1, 1, SubSlot::A),
            ]
        );
    }

    #[test]
    fn test_zone_breaks_ties() {
        let a = coord(1, 1, 1, SubSlot::A);
        let b = SlotCoordinate::new(
            Zone::new('B'),
            RowNumber::new(1),
            BayNumber::new(1),
            TierNumber::new(1),
            SubSlot::A,
        );
        assert_ne!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Less);
    }

    #[test]
    fn test_below_and_above() {
        let c = coord(1, 4, 2, SubSlot::B);
        assert_eq!(c.below(), Some(coord(1, 4, 1, SubSlot::B)));
        assert_eq!(c.above(), coord(1, 4, 3, SubSlot::B));
        assert_eq!(coord(1, 4, 1, SubSlot::A).below(), None);
    }

    #[test]
    fn test_display_and_parse() {
        let c = coord(3, 7, 2, SubSlot::B);
        let shown = c.to_string();
        assert_eq!(shown, "A-R03-B07-T2-B");
        assert_eq!(shown.parse::<SlotCoordinate>(), Ok(c));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("A-R03-B07-T2".parse::<SlotCoordinate>().is_err());
        assert!("A-X03-B07-T2-A".parse::<SlotCoordinate>().is_err());
        assert!("A-R00-B07-T2-A".parse::<SlotCoordinate>().is_err());
        assert!("A-R03-B07-T2-C".parse::<SlotCoordinate>().is_err());
        assert!("AB-R03-B07-T2-A".parse::<SlotCoordinate>().is_err());
    }

    #[test]
    fn test_bay_key_slot_round_trip() {
        let c = coord(2, 5, 3, SubSlot::B);
        assert_eq!(c.bay_key().slot(SubSlot::B), c);
        assert_eq!(c.bay_key().below(), Some(coord(2, 5, 2, SubSlot::A).bay_key()));
    }
}
