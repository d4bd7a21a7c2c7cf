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

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Opaque reference to the container entry occupying a slot.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OccupantId(u64);

impl OccupantId {
    #[inline]
    pub const fn new(id: u64) -> Self {
        OccupantId(id)
    }

    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl Display for OccupantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OccupantId({})", self.0)
    }
}

impl From<u64> for OccupantId {
    fn from(value: u64) -> Self {
        OccupantId(value)
    }
}

/// An owning scope with dedicated rows, typically one company.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeId(u32);

impl ScopeId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        ScopeId(id)
    }

    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl Display for ScopeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ScopeId({})", self.0)
    }
}

impl From<u32> for ScopeId {
    fn from(value: u32) -> Self {
        ScopeId(value)
    }
}

/// Which row pool a cursor walks: an owner's dedicated rows or the shared
/// overflow rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RowScope {
    Owner(ScopeId),
    Overflow,
}

impl Display for RowScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowScope::Owner(id) => write!(f, "Owner({})", id.value()),
            RowScope::Overflow => write!(f, "Overflow"),
        }
    }
}

impl From<ScopeId> for RowScope {
    fn from(value: ScopeId) -> Self {
        RowScope::Owner(value)
    }
}
