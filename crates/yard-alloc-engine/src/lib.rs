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

//! # Yard Placement Engine (`yard-alloc-engine`)
//!
//! Assigns physical slots to arriving containers and frees them on exit.
//!
//! ## Overview
//!
//! Every owner has one [`cursor::SlotCursor`] per container class, walking
//! that class's rows forward bay by bay, tier by tier. When an owner's rows
//! are used up the shared overflow cursor of the class takes over, and when
//! that is used up too the overflow pool may grow by one row at a time.
//!
//! Physical truth lives in one [`occupancy::OccupancySet`]. Candidate
//! positions are checked against the stacking laws in [`stacking`]: nothing
//! floats, and a 40ft container never rests on a single 20ft container.
//! Row homogeneity needs no check at all because the row plans of distinct
//! classes never share a row.
//!
//! ## Usage
//!
//! ```ignore
//! let config = EngineConfig::default();
//! let mut engine = YardEngine::new(&config)?;
//! let placed = engine.allocate(ContainerClass::TWENTY_LADEN, ScopeId::new(1), OccupantId::new(1))?;
//! if !engine.is_exit_blocked(&placed.coord()) {
//!     engine.release(placed.coord())?;
//! }
//! ```

pub mod bay;
pub mod cursor;
pub mod density;
pub mod engine;
pub mod err;
mod exit;
pub mod occupancy;
mod placement;
pub mod stacking;
pub mod stats;

pub mod prelude {
    pub use crate::bay::{BayLedger, BayState};
    pub use crate::cursor::{CursorPosition, CursorStats, SlotCursor};
    pub use crate::density::{DensityGate, NoSkip, RandomSkip};
    pub use crate::engine::YardEngine;
    pub use crate::err::{
        ExhaustedError, IterationBoundExceededError, PlacementError, ReleaseError, RestoreError,
        RowClassMismatchError,
    };
    pub use crate::occupancy::{Occupant, OccupancySet};
    pub use crate::stacking::StackingViolation;
    pub use crate::stats::{EngineStats, PlacementOutcome, PlacementSource};
}
