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

//! Deliberate gaps at ground level.
//!
//! Operators want a yard filled to a target density rather than packed
//! solid. The cursor asks a [`DensityGate`] before taking an untouched
//! ground position; the gate is injected so tests can replace chance with a
//! fixed answer.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use yard_alloc_core::coord::SlotCoordinate;

pub trait DensityGate {
    /// `true` to leave the ground position at `coord` empty.
    fn should_skip(&mut self, coord: &SlotCoordinate) -> bool;
}

impl<G: DensityGate + ?Sized> DensityGate for &mut G {
    #[inline]
    fn should_skip(&mut self, coord: &SlotCoordinate) -> bool {
        (**self).should_skip(coord)
    }
}

impl<G: DensityGate + ?Sized> DensityGate for Box<G> {
    #[inline]
    fn should_skip(&mut self, coord: &SlotCoordinate) -> bool {
        (**self).should_skip(coord)
    }
}

/// Packs the yard solid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoSkip;

impl DensityGate for NoSkip {
    #[inline]
    fn should_skip(&mut self, _coord: &SlotCoordinate) -> bool {
        false
    }
}

/// Skips each untouched ground position with a fixed probability.
#[derive(Debug, Clone)]
pub struct RandomSkip<R = ChaCha8Rng> {
    rng: R,
    rate: f64,
}

impl RandomSkip<ChaCha8Rng> {
    #[inline]
    pub fn seeded(rate: f64, seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed), rate)
    }
}

impl<R: Rng> RandomSkip<R> {
    /// `rate` is clamped into `[0, 1]`; NaN disables skipping.
    #[inline]
    pub fn new(rng: R, rate: f64) -> Self {
        let rate = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
        Self { rng, rate }
    }

    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl<R: Rng> DensityGate for RandomSkip<R> {
    #[inline]
    fn should_skip(&mut self, _coord: &SlotCoordinate) -> bool {
        self.rate > 0.0 && self.rng.random_bool(self.rate)
    }
}
