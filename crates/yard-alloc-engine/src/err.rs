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

use crate::stacking::StackingViolation;
use std::fmt::Display;
use yard_alloc_core::{class::ContainerClass, coord::SlotCoordinate};
use yard_alloc_model::id::{RowScope, ScopeId};

/// Both the owner's rows and the overflow pool are used up, and the
/// overflow pool may not grow any further.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExhaustedError {
    owner: ScopeId,
    class: ContainerClass,
}

impl ExhaustedError {
    #[inline]
    pub fn new(owner: ScopeId, class: ContainerClass) -> Self {
        Self { owner, class }
    }

    #[inline]
    pub fn owner(&self) -> ScopeId {
        self.owner
    }

    #[inline]
    pub fn class(&self) -> ContainerClass {
        self.class
    }
}

impl Display for ExhaustedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "No space left for {} containers of {}",
            self.class, self.owner
        )
    }
}

impl std::error::Error for ExhaustedError {}

/// A cursor scanned more positions than its rows contain. This is a broken
/// internal invariant, not a capacity condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IterationBoundExceededError {
    scope: RowScope,
    class: ContainerClass,
    cap: usize,
}

impl IterationBoundExceededError {
    #[inline]
    pub fn new(scope: RowScope, class: ContainerClass, cap: usize) -> Self {
        Self { scope, class, cap }
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
    pub fn cap(&self) -> usize {
        self.cap
    }
}

impl Display for IterationBoundExceededError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cursor {} / {} exceeded its iteration cap of {}",
            self.scope, self.class, self.cap
        )
    }
}

impl std::error::Error for IterationBoundExceededError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlacementError {
    Exhausted(ExhaustedError),
    UnknownScope(ScopeId),
    IterationBoundExceeded(IterationBoundExceededError),
}

impl PlacementError {
    /// Stable code for reporting why a container could not be placed.
    pub fn reason(&self) -> &'static str {
        match self {
            PlacementError::Exhausted(_) => "no space",
            PlacementError::UnknownScope(_) => "unknown scope",
            PlacementError::IterationBoundExceeded(_) => "iteration bound exceeded",
        }
    }
}

impl Display for PlacementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlacementError::Exhausted(e) => write!(f, "{}", e),
            PlacementError::UnknownScope(id) => write!(f, "No rows are configured for {}", id),
            PlacementError::IterationBoundExceeded(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PlacementError {}

impl From<ExhaustedError> for PlacementError {
    fn from(err: ExhaustedError) -> Self {
        PlacementError::Exhausted(err)
    }
}

impl From<IterationBoundExceededError> for PlacementError {
    fn from(err: IterationBoundExceededError) -> Self {
        PlacementError::IterationBoundExceeded(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReleaseError {
    NotFound(SlotCoordinate),
}

impl ReleaseError {
    #[inline]
    pub fn reason(&self) -> &'static str {
        match self {
            ReleaseError::NotFound(_) => "not found",
        }
    }
}

impl Display for ReleaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReleaseError::NotFound(coord) => write!(f, "No container is recorded at {}", coord),
        }
    }
}

impl std::error::Error for ReleaseError {}

/// Rejection of a pre-existing container handed to the engine at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RestoreError {
    OutOfBounds(SlotCoordinate),
    Occupied(SlotCoordinate),
    /// The container would float or rest a 40ft box on a single 20ft one.
    Unstable(SlotCoordinate, StackingViolation),
    /// The row is planned for a different class.
    RowClassMismatch(RowClassMismatchError),
}

impl RestoreError {
    #[inline]
    pub fn reason(&self) -> &'static str {
        match self {
            RestoreError::OutOfBounds(_) => "out of bounds",
            RestoreError::Occupied(_) => "slot occupied",
            RestoreError::Unstable(..) => "unsupported",
            RestoreError::RowClassMismatch(_) => "row class mismatch",
        }
    }

    #[inline]
    pub fn coord(&self) -> SlotCoordinate {
        match self {
            RestoreError::OutOfBounds(c)
            | RestoreError::Occupied(c)
            | RestoreError::Unstable(c, _) => *c,
            RestoreError::RowClassMismatch(e) => e.coord(),
        }
    }
}

impl Display for RestoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RestoreError::OutOfBounds(c) => write!(f, "{} lies outside the yard", c),
            RestoreError::Occupied(c) => write!(f, "{} is already occupied", c),
            RestoreError::Unstable(c, violation) => {
                write!(f, "Cannot restore at {}: {}", c, violation)
            }
            RestoreError::RowClassMismatch(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RestoreError {}

impl From<RowClassMismatchError> for RestoreError {
    fn from(err: RowClassMismatchError) -> Self {
        RestoreError::RowClassMismatch(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowClassMismatchError {
    coord: SlotCoordinate,
    class: ContainerClass,
    planned: ContainerClass,
}

impl RowClassMismatchError {
    #[inline]
    pub fn new(coord: SlotCoordinate, class: ContainerClass, planned: ContainerClass) -> Self {
        Self {
            coord,
            class,
            planned,
        }
    }

    #[inline]
    pub fn coord(&self) -> SlotCoordinate {
        self.coord
    }

    #[inline]
    pub fn class(&self) -> ContainerClass {
        self.class
    }

    #[inline]
    pub fn planned(&self) -> ContainerClass {
        self.planned
    }
}

impl Display for RowClassMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} cannot hold {}: {} is planned for {}",
            self.coord,
            self.class,
            self.coord.row(),
            self.planned
        )
    }
}

impl std::error::Error for RowClassMismatchError {}

#[cfg(test)]
mod tests {
    use super::*;
    use yard_alloc_core::coord::{BayNumber, RowNumber, SubSlot, TierNumber, Zone};

    fn coord() -> SlotCoordinate {
        SlotCoordinate::new(
            Zone::default(),
            RowNumber::new(3),
            BayNumber::new(7),
            TierNumber::new(2),
            SubSlot::B,
        )
    }

    #[test]
    fn test_reason_codes_are_stable() {
        let exhausted: PlacementError =
            ExhaustedError::new(ScopeId::new(1), ContainerClass::TWENTY_LADEN).into();
        assert_eq!(exhausted.reason(), "no space");
        assert_eq!(PlacementError::UnknownScope(ScopeId::new(9)).reason(), "unknown scope");
        let overrun: PlacementError = IterationBoundExceededError::new(
            RowScope::Overflow,
            ContainerClass::FORTY_EMPTY,
            40,
        )
        .into();
        assert_eq!(overrun.reason(), "iteration bound exceeded");
        assert_eq!(ReleaseError::NotFound(coord()).reason(), "not found");
        assert_eq!(RestoreError::OutOfBounds(coord()).reason(), "out of bounds");
        assert_eq!(RestoreError::Occupied(coord()).reason(), "slot occupied");
        assert_eq!(
            RestoreError::Unstable(coord(), StackingViolation::Floating).reason(),
            "unsupported"
        );
        let mismatch: RestoreError = RowClassMismatchError::new(
            coord(),
            ContainerClass::FORTY_EMPTY,
            ContainerClass::TWENTY_LADEN,
        )
        .into();
        assert_eq!(mismatch.reason(), "row class mismatch");
        assert_eq!(mismatch.coord(), coord());
    }

    #[test]
    fn test_messages_name_the_coordinate() {
        assert_eq!(
            ReleaseError::NotFound(coord()).to_string(),
            "No container is recorded at A-R03-B07-T2-B"
        );
    }
}
