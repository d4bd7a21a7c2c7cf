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

//! # Yard Allocation Model (`yard-alloc-model`)
//!
//! Configuration-time description of a container yard, built on the value
//! types of `yard-alloc-core`.
//!
//! ## Key Data Structures
//!
//! - **`OccupantId` / `ScopeId`**: opaque container-entry references and the
//!   owning scopes (companies) that hold dedicated rows.
//!
//! - **`YardBounds`**: the row/bay/tier extent of one yard zone.
//!
//! - **`StackingPolicy`**: the ground-tier density skip rate and whether the
//!   overflow pool may grow past the configured rows.
//!
//! - **`RowPlan`**: the class → rows mapping. Row sets of distinct classes are
//!   disjoint, which is what keeps every row homogeneous.
//!
//! - **`YardLayout`**: one `RowPlan` per owner plus the shared overflow plan.
//!
//! - **`EngineConfig`**: bounds, policy, layout and RNG seed, built through
//!   `EngineConfigBuilder` or deserialized and then validated.
//!
//! The `generator` module produces seeded synthetic gate traffic for
//! exercising an engine end to end.

pub mod bounds;
pub mod config;
pub mod err;
pub mod generator;
pub mod id;
pub mod plan;

pub mod prelude {
    pub use crate::bounds::{OverflowMode, StackingPolicy, YardBounds};
    pub use crate::config::{DEFAULT_CLASS_WEIGHTS, EngineConfig, EngineConfigBuilder};
    pub use crate::err::{
        EngineConfigError, OverlappingRowsError, RowConflictError, RowOutOfBoundsError,
        RowPlanError,
    };
    pub use crate::generator::{
        WorkloadGenConfig, WorkloadGenConfigBuildError, WorkloadGenConfigBuilder,
        WorkloadGenerator, YardEvent,
    };
    pub use crate::id::{OccupantId, RowScope, ScopeId};
    pub use crate::plan::{RowAssignment, RowPlan, YardLayout};
}
