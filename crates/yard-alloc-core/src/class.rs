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

/// Bay footprint of a container. 45ft boxes use the 40ft footprint.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
pub enum ContainerSize {
    Twenty,
    Forty,
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
pub enum ContainerStatus {
    Laden,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnrecognizedClassError {
    iso_type: String,
}

impl UnrecognizedClassError {
    #[inline]
    pub fn new(iso_type: &str) -> Self {
        Self {
            iso_type: iso_type.to_owned(),
        }
    }

    #[inline]
    pub fn iso_type(&self) -> &str {
        &self.iso_type
    }
}

impl Display for UnrecognizedClassError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ISO type code {:?} does not start with a known size code (2, 4 or L)",
            self.iso_type
        )
    }
}

impl std::error::Error for UnrecognizedClassError {}

impl ContainerSize {
    /// Decodes the size from the first character of an ISO 6346 size/type
    /// code such as `22G1`, `45R1` or `L5G1`.
    pub fn from_iso_type(iso_type: &str) -> Result<Self, UnrecognizedClassError> {
        match iso_type.trim_start().chars().next() {
            Some('2') => Ok(ContainerSize::Twenty),
            Some('4') | Some('L') => Ok(ContainerSize::Forty),
            _ => Err(UnrecognizedClassError::new(iso_type)),
        }
    }

    #[inline]
    pub const fn is_forty(self) -> bool {
        matches!(self, ContainerSize::Forty)
    }
}

impl Display for ContainerSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerSize::Twenty => write!(f, "20ft"),
            ContainerSize::Forty => write!(f, "40ft"),
        }
    }
}

impl Display for ContainerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerStatus::Laden => write!(f, "LADEN"),
            ContainerStatus::Empty => write!(f, "EMPTY"),
        }
    }
}

/// The segregation key of the yard: every row holds one class only.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
pub struct ContainerClass {
    size: ContainerSize,
    status: ContainerStatus,
}

impl ContainerClass {
    pub const TWENTY_LADEN: Self = Self::new(ContainerSize::Twenty, ContainerStatus::Laden);
    pub const TWENTY_EMPTY: Self = Self::new(ContainerSize::Twenty, ContainerStatus::Empty);
    pub const FORTY_LADEN: Self = Self::new(ContainerSize::Forty, ContainerStatus::Laden);
    pub const FORTY_EMPTY: Self = Self::new(ContainerSize::Forty, ContainerStatus::Empty);

    pub const ALL: [ContainerClass; 4] = [
        Self::TWENTY_LADEN,
        Self::TWENTY_EMPTY,
        Self::FORTY_LADEN,
        Self::FORTY_EMPTY,
    ];

    #[inline]
    pub const fn new(size: ContainerSize, status: ContainerStatus) -> Self {
        Self { size, status }
    }

    #[inline]
    pub fn from_iso_type(
        iso_type: &str,
        status: ContainerStatus,
    ) -> Result<Self, UnrecognizedClassError> {
        ContainerSize::from_iso_type(iso_type).map(|size| Self::new(size, status))
    }

    #[inline]
    pub const fn size(&self) -> ContainerSize {
        self.size
    }

    #[inline]
    pub const fn status(&self) -> ContainerStatus {
        self.status
    }
}

impl Display for ContainerClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.size, self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_size_codes() {
        assert_eq!(ContainerSize::from_iso_type("22G1"), Ok(ContainerSize::Twenty));
        assert_eq!(ContainerSize::from_iso_type("42G1"), Ok(ContainerSize::Forty));
        assert_eq!(ContainerSize::from_iso_type("45R1"), Ok(ContainerSize::Forty));
        assert_eq!(ContainerSize::from_iso_type("L5G1"), Ok(ContainerSize::Forty));
    }

    #[test]
    fn test_unknown_iso_size_is_an_error() {
        let err = ContainerSize::from_iso_type("M5G1").unwrap_err();
        assert_eq!(err.iso_type(), "M5G1");
        assert!(ContainerSize::from_iso_type("").is_err());
        assert!(ContainerSize::from_iso_type("l5G1").is_err());
    }

    #[test]
    fn test_class_from_iso_type() {
        let class = ContainerClass::from_iso_type("45G1", ContainerStatus::Empty).unwrap();
        assert_eq!(class, ContainerClass::FORTY_EMPTY);
        assert_eq!(class.to_string(), "40ft EMPTY");
    }

    #[test]
    fn test_all_classes_are_distinct() {
        let mut all = ContainerClass::ALL.to_vec();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 4);
    }
}
