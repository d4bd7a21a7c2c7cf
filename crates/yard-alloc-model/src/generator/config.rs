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

use super::err::WorkloadGenConfigBuildError;
use crate::id::ScopeId;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Configuration for synthetic gate-in / gate-out streams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadGenConfig {
    /// Owners arrivals are spread over, uniformly.
    pub(crate) owners: Vec<ScopeId>,
    pub(crate) arrivals: usize,
    pub(crate) iso_mix: Vec<(String, u32)>,
    pub(crate) laden_ratio: f64,
    /// Mean dwell, measured in arrivals.
    pub(crate) mean_dwell: f64,
    /// Emit the remaining departures after the last arrival.
    pub(crate) drain: bool,
    pub(crate) seed: u64,
}

fn default_iso_mix() -> Vec<(String, u32)> {
    vec![
        ("22G1".to_owned(), 40),
        ("22R1".to_owned(), 5),
        ("42G1".to_owned(), 25),
        ("45G1".to_owned(), 20),
        ("45R1".to_owned(), 5),
        ("L5G1".to_owned(), 5),
    ]
}

impl Default for WorkloadGenConfig {
    fn default() -> Self {
        Self {
            owners: vec![ScopeId::new(1), ScopeId::new(2)],
            arrivals: 1_000,
            iso_mix: default_iso_mix(),
            laden_ratio: 0.65,
            mean_dwell: 250.0,
            drain: false,
            seed: 42,
        }
    }
}

impl WorkloadGenConfig {
    #[inline]
    pub fn owners(&self) -> &[ScopeId] {
        &self.owners
    }

    #[inline]
    pub fn owner_count(&self) -> usize {
        self.owners.len()
    }

    #[inline]
    pub fn arrivals(&self) -> usize {
        self.arrivals
    }

    #[inline]
    pub fn iso_mix(&self) -> &[(String, u32)] {
        &self.iso_mix
    }

    #[inline]
    pub fn laden_ratio(&self) -> f64 {
        self.laden_ratio
    }

    #[inline]
    pub fn mean_dwell(&self) -> f64 {
        self.mean_dwell
    }

    #[inline]
    pub fn drain(&self) -> bool {
        self.drain
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub fn with_seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }

    pub fn validate(&self) -> Result<(), WorkloadGenConfigBuildError> {
        use WorkloadGenConfigBuildError::*;
        if self.owners.is_empty() {
            return Err(NoOwners);
        }
        if self.iso_mix.is_empty() {
            return Err(EmptyIsoMix);
        }
        if self.iso_mix.iter().all(|(_, w)| *w == 0) {
            return Err(ZeroIsoWeight);
        }
        if !(0.0..=1.0).contains(&self.laden_ratio) {
            return Err(InvalidLadenRatio(self.laden_ratio));
        }
        if !(self.mean_dwell.is_finite() && self.mean_dwell > 0.0) {
            return Err(InvalidMeanDwell(self.mean_dwell));
        }
        Ok(())
    }
}

impl Display for WorkloadGenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "WorkloadGenConfig {{ owners: {}, arrivals: {}, iso types: {}, laden_ratio: {}, mean_dwell: {}, drain: {}, seed: {} }}",
            self.owners.len(),
            self.arrivals,
            self.iso_mix.len(),
            self.laden_ratio,
            self.mean_dwell,
            self.drain,
            self.seed
        )
    }
}

/// Builder for `WorkloadGenConfig`.
#[derive(Debug, Clone)]
pub struct WorkloadGenConfigBuilder {
    owners: Option<Vec<ScopeId>>,
    arrivals: Option<usize>,
    iso_mix: Vec<(String, u32)>,
    laden_ratio: f64,
    mean_dwell: f64,
    drain: bool,
    seed: u64,
}

impl Default for WorkloadGenConfigBuilder {
    fn default() -> Self {
        let defaults = WorkloadGenConfig::default();
        Self {
            owners: None,
            arrivals: None,
            iso_mix: defaults.iso_mix,
            laden_ratio: defaults.laden_ratio,
            mean_dwell: defaults.mean_dwell,
            drain: defaults.drain,
            seed: rand::rng().random(),
        }
    }
}

impl WorkloadGenConfigBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Owners with ids `1..=v`.
    #[inline]
    pub fn owner_count(mut self, v: u32) -> Self {
        self.owners = Some((1..=v).map(ScopeId::new).collect());
        self
    }

    pub fn owners<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = ScopeId>,
    {
        self.owners = Some(ids.into_iter().collect());
        self
    }

    #[inline]
    pub fn arrivals(mut self, v: usize) -> Self {
        self.arrivals = Some(v);
        self
    }

    pub fn iso_mix<I, S>(mut self, mix: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        self.iso_mix = mix.into_iter().map(|(code, w)| (code.into(), w)).collect();
        self
    }

    #[inline]
    pub fn laden_ratio(mut self, v: f64) -> Self {
        self.laden_ratio = v;
        self
    }

    #[inline]
    pub fn mean_dwell(mut self, v: f64) -> Self {
        self.mean_dwell = v;
        self
    }

    #[inline]
    pub fn drain(mut self, yes: bool) -> Self {
        self.drain = yes;
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

    pub fn build(self) -> Result<WorkloadGenConfig, WorkloadGenConfigBuildError> {
        use WorkloadGenConfigBuildError::*;
        let owners = self.owners.ok_or(MissingOwners)?;
        let arrivals = self.arrivals.ok_or(MissingArrivals)?;

        let config = WorkloadGenConfig {
            owners,
            arrivals,
            iso_mix: self.iso_mix,
            laden_ratio: self.laden_ratio,
            mean_dwell: self.mean_dwell,
            drain: self.drain,
            seed: self.seed,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_counts() {
        assert_eq!(
            WorkloadGenConfigBuilder::new().arrivals(1).build(),
            Err(WorkloadGenConfigBuildError::MissingOwners)
        );
        assert_eq!(
            WorkloadGenConfigBuilder::new().owner_count(1).build(),
            Err(WorkloadGenConfigBuildError::MissingArrivals)
        );
    }

    #[test]
    fn test_builder_validates_mix_and_ratios() {
        let base = WorkloadGenConfigBuilder::new().owner_count(1).arrivals(10);
        assert_eq!(
            base.clone().iso_mix(Vec::<(String, u32)>::new()).build(),
            Err(WorkloadGenConfigBuildError::EmptyIsoMix)
        );
        assert_eq!(
            base.clone().iso_mix([("22G1", 0)]).build(),
            Err(WorkloadGenConfigBuildError::ZeroIsoWeight)
        );
        assert_eq!(
            base.clone().laden_ratio(-0.1).build(),
            Err(WorkloadGenConfigBuildError::InvalidLadenRatio(-0.1))
        );
        assert_eq!(
            base.clone().owner_count(0).build(),
            Err(WorkloadGenConfigBuildError::NoOwners)
        );
        assert!(matches!(
            base.mean_dwell(0.0).build(),
            Err(WorkloadGenConfigBuildError::InvalidMeanDwell(_))
        ));
    }
}
