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

//! # Yard Allocation Core (`yard-alloc-core`)
//!
//! Value types shared by every crate of the workspace: the physical slot
//! address ([`coord::SlotCoordinate`] and its components) and the container
//! classification ([`class::ContainerClass`]) that drives row segregation.
//!
//! All types are small `Copy` values with total orderings so they can key
//! ordered maps and give deterministic traversal.

pub mod class;
pub mod coord;

pub mod prelude {
    pub use crate::class::{ContainerClass, ContainerSize, ContainerStatus, UnrecognizedClassError};
    pub use crate::coord::{
        BayKey, BayNumber, CoordinateComponentError, RowNumber, SlotCoordinate,
        SlotCoordinateParseError, SubSlot, TierNumber, Zone,
    };
}
