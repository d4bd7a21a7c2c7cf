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

use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum WorkloadGenConfigBuildError {
    MissingOwners,
    NoOwners,
    MissingArrivals,
    EmptyIsoMix,
    ZeroIsoWeight,
    InvalidLadenRatio(f64),
    InvalidMeanDwell(f64),
}

impl Display for WorkloadGenConfigBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use WorkloadGenConfigBuildError::*;
        match self {
            MissingOwners => write!(f, "Missing owners"),
            NoOwners => write!(f, "At least one owner is required"),
            MissingArrivals => write!(f, "Missing arrivals"),
            EmptyIsoMix => write!(f, "ISO type mix is empty"),
            ZeroIsoWeight => write!(f, "ISO type weights sum to zero"),
            InvalidLadenRatio(v) => write!(f, "Laden ratio {v} is outside [0.0, 1.0]"),
            InvalidMeanDwell(v) => write!(f, "Mean dwell {v} must be positive and finite"),
        }
    }
}

impl std::error::Error for WorkloadGenConfigBuildError {}
