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

use crate::id::RowScope;
use std::fmt::Display;
use yard_alloc_core::{class::ContainerClass, coord::RowNumber};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlappingRowsError {
    row: RowNumber,
    first: ContainerClass,
    second: ContainerClass,
}

impl OverlappingRowsError {
    #[inline]
    pub fn new(row: RowNumber, first: ContainerClass, second: ContainerClass) -> Self {
        Self { row, first, second }
    }

    #[inline]
    pub fn row(&self) -> RowNumber {
        self.row
    }

    #[inline]
    pub fn first(&self) -> ContainerClass {
        self.first
    }

    #[inline]
    pub fn second(&self) -> ContainerClass {
        self.second
    }
}

impl Display for OverlappingRowsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} is assigned to both {} and {}",
            self.row, self.first, self.second
        )
    }
}

impl std::error::Error for OverlappingRowsError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowPlanError {
    OverlappingRows(OverlappingRowsError),
    DuplicateRow(ContainerClass, RowNumber),
    DuplicateClass(ContainerClass),
    ZeroTotalWeight,
}

impl Display for RowPlanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use RowPlanError::*;
        match self {
            OverlappingRows(e) => write!(f, "{e}"),
            DuplicateRow(class, row) => write!(f, "{row} listed twice for {class}"),
            DuplicateClass(class) => write!(f, "{class} weighted twice"),
            ZeroTotalWeight => write!(f, "class weights sum to zero"),
        }
    }
}

impl std::error::Error for RowPlanError {}

impl From<OverlappingRowsError> for RowPlanError {
    fn from(err: OverlappingRowsError) -> Self {
        RowPlanError::OverlappingRows(err)
    }
}

/// A row claimed by two `(scope, class)` pairs across the yard layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowConflictError {
    row: RowNumber,
    first: (RowScope, ContainerClass),
    second: (RowScope, ContainerClass),
}

impl RowConflictError {
    #[inline]
    pub fn new(
        row: RowNumber,
        first: (RowScope, ContainerClass),
        second: (RowScope, ContainerClass),
    ) -> Self {
        Self { row, first, second }
    }

    #[inline]
    pub fn row(&self) -> RowNumber {
        self.row
    }

    #[inline]
    pub fn first(&self) -> (RowScope, ContainerClass) {
        self.first
    }

    #[inline]
    pub fn second(&self) -> (RowScope, ContainerClass) {
        self.second
    }
}

impl Display for RowConflictError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} is claimed by {} for {} and by {} for {}",
            self.row, self.first.0, self.first.1, self.second.0, self.second.1
        )
    }
}

impl std::error::Error for RowConflictError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowOutOfBoundsError {
    row: RowNumber,
    max_row: RowNumber,
}

impl RowOutOfBoundsError {
    #[inline]
    pub fn new(row: RowNumber, max_row: RowNumber) -> Self {
        Self { row, max_row }
    }

    #[inline]
    pub fn row(&self) -> RowNumber {
        self.row
    }

    #[inline]
    pub fn max_row(&self) -> RowNumber {
        self.max_row
    }
}

impl Display for RowOutOfBoundsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} lies outside the yard (last row is {})",
            self.row, self.max_row
        )
    }
}

impl std::error::Error for RowOutOfBoundsError {}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineConfigError {
    MissingBounds,
    MissingLayout,
    InvalidBounds,
    InvalidSkipRate(f64),
    RowOutOfBounds(RowOutOfBoundsError),
    RowConflict(RowConflictError),
    Plan(RowPlanError),
}

impl Display for EngineConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use EngineConfigError::*;
        match self {
            MissingBounds => write!(f, "Missing yard bounds"),
            MissingLayout => write!(f, "Missing yard layout"),
            InvalidBounds => write!(f, "Yard bounds must be at least 1 in every dimension"),
            InvalidSkipRate(rate) => {
                write!(f, "Density skip rate {rate} is outside [0.0, 1.0]")
            }
            RowOutOfBounds(e) => write!(f, "{e}"),
            RowConflict(e) => write!(f, "{e}"),
            Plan(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for EngineConfigError {}

impl From<RowOutOfBoundsError> for EngineConfigError {
    fn from(err: RowOutOfBoundsError) -> Self {
        EngineConfigError::RowOutOfBounds(err)
    }
}

impl From<RowConflictError> for EngineConfigError {
    fn from(err: RowConflictError) -> Self {
        EngineConfigError::RowConflict(err)
    }
}

impl From<RowPlanError> for EngineConfigError {
    fn from(err: RowPlanError) -> Self {
        EngineConfigError::Plan(err)
    }
}
