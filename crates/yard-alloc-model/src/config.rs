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

use crate::{
    bounds::{OverflowMode, StackingPolicy, YardBounds},
    err::EngineConfigError,
    plan::{RowPlan, YardLayout},
    id::ScopeId,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use yard_alloc_core::{
    class::ContainerClass,
    coord::{BayNumber, RowNumber, TierNumber, Zone},
};

/// Default class weights: laden boxes are more common than empties, 20ft
/// slightly more than 40ft.
pub const DEFAULT_CLASS_WEIGHTS: [(ContainerClass, u32); 4] = [
    (ContainerClass::TWENTY_LADEN, 3),
    (ContainerClass::FORTY_LADEN, 3),
    (ContainerClass::TWENTY_EMPTY, 2),
    (ContainerClass::FORTY_EMPTY, 2),
];

/// Everything a placement engine needs at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub(crate) bounds: YardBounds,
    #[serde(default)]
    pub(crate) policy: StackingPolicy,
    pub(crate) layout: YardLayout,
    #[serde(default)]
    pub(crate) seed: u64,
}

impl Default for EngineConfig {
    /// Two owners with ten rows each and four overflow rows, in a yard of
    /// ten bays and four tiers.
    fn default() -> Self {
        let layout = YardLayout::uniform(2, 10, 4, &DEFAULT_CLASS_WEIGHTS)
            .unwrap_or_else(|_| YardLayout::default());
        Self {
            bounds: YardBounds::new(
                Zone::default(),
                RowNumber::new(24),
                BayNumber::new(10),
                TierNumber::new(4),
            ),
            policy: StackingPolicy::default(),
            layout,
            seed: 42,
        }
    }
}

impl EngineConfig {
    pub fn new(
        bounds: YardBounds,
        policy: StackingPolicy,
        layout: YardLayout,
        seed: u64,
    ) -> Result<Self, EngineConfigError> {
        let config = Self {
            bounds,
            policy,
            layout,
            seed,
        };
        config.validate()?;
        Ok(config)
    }

    /// Re-checks invariants the builder enforces; needed for configs that
    /// were deserialized rather than built.
    pub fn validate(&self) -> Result<(), EngineConfigError> {
        if !self.bounds.is_valid() {
            return Err(EngineConfigError::InvalidBounds);
        }
        if !self.policy.has_valid_skip_rate() {
            return Err(EngineConfigError::InvalidSkipRate(
                self.policy.density_skip_rate(),
            ));
        }
        self.layout.validate(&self.bounds)
    }

    #[inline]
    pub fn bounds(&self) -> &YardBounds {
        &self.bounds
    }

    #[inline]
    pub fn policy(&self) -> &StackingPolicy {
        &self.policy
    }

    #[inline]
    pub fn layout(&self) -> &YardLayout {
        &self.layout
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub fn with_seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }
}

impl Display for EngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "EngineConfig {{ {}, owners: {}, overflow rows: {}, skip rate: {}, overflow: {:?}, seed: {} }}",
            self.bounds,
            self.layout.owner_count(),
            self.layout.overflow().row_count(),
            self.policy.density_skip_rate(),
            self.policy.overflow_mode(),
            self.seed
        )
    }
}

/// Builder for [`EngineConfig`].
#[derive(Debug, Clone)]
pub struct EngineConfigBuilder {
    zone: Zone,
    max_row: Option<RowNumber>,
    max_bay: Option<BayNumber>,
    max_tier: Option<TierNumber>,
    layout: Option<YardLayout>,
    density_skip_rate: f64,
    overflow_mode: OverflowMode,
    seed: u64,
}

impl Default for EngineConfigBuilder {
    fn default() -> Self {
        let policy = StackingPolicy::default();
        Self {
            zone: Zone::default(),
            max_row: None,
            max_bay: None,
            max_tier: None,
            layout: None,
            density_skip_rate: policy.density_skip_rate(),
            overflow_mode: policy.overflow_mode(),
            seed: rand::rng().random(),
        }
    }
}

impl EngineConfigBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn zone(mut self, v: Zone) -> Self {
        self.zone = v;
        self
    }

    /// Sets the bay and tier extents. The row extent defaults to the last
    /// row the layout uses unless [`Self::max_row`] is given.
    #[inline]
    pub fn dimensions(mut self, max_bay: u32, max_tier: u32) -> Self {
        self.max_bay = Some(BayNumber::new(max_bay));
        self.max_tier = Some(TierNumber::new(max_tier));
        self
    }

    #[inline]
    pub fn max_row(mut self, v: u32) -> Self {
        self.max_row = Some(RowNumber::new(v));
        self
    }

    #[inline]
    pub fn layout(mut self, v: YardLayout) -> Self {
        self.layout = Some(v);
        self
    }

    #[inline]
    pub fn owner_rows(mut self, owner: ScopeId, plan: RowPlan) -> Self {
        self.layout = Some(self.layout.unwrap_or_default().with_owner(owner, plan));
        self
    }

    #[inline]
    pub fn overflow_rows(mut self, plan: RowPlan) -> Self {
        self.layout = Some(self.layout.unwrap_or_default().with_overflow(plan));
        self
    }

    #[inline]
    pub fn density_skip_rate(mut self, v: f64) -> Self {
        self.density_skip_rate = v;
        self
    }

    #[inline]
    pub fn strict(mut self) -> Self {
        self.overflow_mode = OverflowMode::Strict;
        self
    }

    #[inline]
    pub fn auto_expand(mut self, max_extra_rows: Option<u32>) -> Self {
        self.overflow_mode = OverflowMode::AutoExpand { max_extra_rows };
        self
    }

    pub fn random_seed(mut self) -> Self {
        self.seed = rand::rng().random();
        self
    }

    #[inline]
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    pub fn build(self) -> Result<EngineConfig, EngineConfigError> {
        use EngineConfigError::*;
        let layout = self.layout.ok_or(MissingLayout)?;
        let max_bay = self.max_bay.ok_or(MissingBounds)?;
        let max_tier = self.max_tier.ok_or(MissingBounds)?;
        let max_row = match self.max_row {
            Some(row) => row,
            None => layout.max_row().ok_or(MissingBounds)?,
        };

        EngineConfig::new(
            YardBounds::new(self.zone, max_row, max_bay, max_tier),
            StackingPolicy::new(self.density_skip_rate, self.overflow_mode),
            layout,
            self.seed,
        )
    }
}
