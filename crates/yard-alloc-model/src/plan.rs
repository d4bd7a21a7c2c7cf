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

//! Row segregation.
//!
//! A [`RowPlan`] maps every container class to the ordered rows it may use.
//! Row sets of distinct classes are disjoint, so a row can only ever hold a
//! single class: the plan itself is the homogeneity guarantee and nothing
//! has to inspect row contents at placement time. A [`YardLayout`] combines
//! one plan per owner with the shared overflow plan.

use crate::{
    bounds::YardBounds,
    err::{
        EngineConfigError, OverlappingRowsError, RowConflictError, RowOutOfBoundsError,
        RowPlanError,
    },
    id::{RowScope, ScopeId},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, btree_map::Entry};
use yard_alloc_core::{class::ContainerClass, coord::RowNumber};

/// Serialized form of one class entry of a [`RowPlan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowAssignment {
    pub class: ContainerClass,
    pub rows: Vec<RowNumber>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<RowAssignment>", into = "Vec<RowAssignment>")]
pub struct RowPlan {
    rows: BTreeMap<ContainerClass, Vec<RowNumber>>,
}

impl RowPlan {
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_assignments<I>(assignments: I) -> Result<Self, RowPlanError>
    where
        I: IntoIterator<Item = (ContainerClass, Vec<RowNumber>)>,
    {
        let mut plan = Self::empty();
        for (class, rows) in assignments {
            if plan.rows.contains_key(&class) {
                return Err(RowPlanError::DuplicateClass(class));
            }
            plan.rows.insert(class, Vec::with_capacity(rows.len()));
            for row in rows {
                plan.push_row(class, row)?;
            }
        }
        plan.rows.retain(|_, rows| !rows.is_empty());
        Ok(plan)
    }

    /// Splits `rows` into contiguous blocks sized by `weights`, in the order
    /// the weights are given. Rounding uses the largest remainder; ties go
    /// to the class listed first.
    pub fn proportional(
        rows: &[RowNumber],
        weights: &[(ContainerClass, u32)],
    ) -> Result<Self, RowPlanError> {
        for (i, (class, _)) in weights.iter().enumerate() {
            if weights[..i].iter().any(|(c, _)| c == class) {
                return Err(RowPlanError::DuplicateClass(*class));
            }
        }

        let total: u64 = weights.iter().map(|&(_, w)| u64::from(w)).sum();
        if total == 0 {
            return Err(RowPlanError::ZeroTotalWeight);
        }

        let n = rows.len() as u64;
        let mut counts: Vec<u64> = weights
            .iter()
            .map(|&(_, w)| n * u64::from(w) / total)
            .collect();
        let remainders: Vec<u64> = weights
            .iter()
            .map(|&(_, w)| n * u64::from(w) % total)
            .collect();

        let mut leftover = n - counts.iter().sum::<u64>();
        let mut order: Vec<usize> = (0..weights.len()).collect();
        order.sort_by(|&a, &b| remainders[b].cmp(&remainders[a]).then(a.cmp(&b)));
        for i in order {
            if leftover == 0 {
                break;
            }
            counts[i] += 1;
            leftover -= 1;
        }

        let mut next = 0usize;
        let blocks = weights.iter().zip(counts).map(|(&(class, _), count)| {
            let end = next + count as usize;
            let block = rows[next..end].to_vec();
            next = end;
            (class, block)
        });
        Self::from_assignments(blocks.collect::<Vec<_>>())
    }

    /// Rows eligible for `class`, in traversal order. Empty when the class
    /// has no rows in this plan.
    #[inline]
    pub fn rows_for(&self, class: ContainerClass) -> &[RowNumber] {
        self.rows.get(&class).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn class_of(&self, row: RowNumber) -> Option<ContainerClass> {
        self.iter_rows()
            .find_map(|(r, class)| (r == row).then_some(class))
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (ContainerClass, &[RowNumber])> + '_ {
        self.rows
            .iter()
            .map(|(class, rows)| (*class, rows.as_slice()))
    }

    #[inline]
    pub fn iter_rows(&self) -> impl Iterator<Item = (RowNumber, ContainerClass)> + '_ {
        self.rows
            .iter()
            .flat_map(|(class, rows)| rows.iter().map(move |row| (*row, *class)))
    }

    #[inline]
    pub fn max_row(&self) -> Option<RowNumber> {
        self.rows.values().flatten().copied().max()
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.values().map(Vec::len).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Appends `row` to the end of `class`'s list.
    pub fn push_row(&mut self, class: ContainerClass, row: RowNumber) -> Result<(), RowPlanError> {
        if let Some(owner) = self.class_of(row) {
            return Err(if owner == class {
                RowPlanError::DuplicateRow(class, row)
            } else {
                OverlappingRowsError::new(row, owner, class).into()
            });
        }
        self.rows.entry(class).or_default().push(row);
        Ok(())
    }

    /// Undoes [`Self::push_row`]. Only the last row of `class` can be
    /// taken back; returns whether `row` was removed.
    pub fn pop_row(&mut self, class: ContainerClass, row: RowNumber) -> bool {
        let Entry::Occupied(mut entry) = self.rows.entry(class) else {
            return false;
        };
        if entry.get().last() != Some(&row) {
            return false;
        }
        entry.get_mut().pop();
        if entry.get().is_empty() {
            entry.remove();
        }
        true
    }
}

impl TryFrom<Vec<RowAssignment>> for RowPlan {
    type Error = RowPlanError;

    fn try_from(value: Vec<RowAssignment>) -> Result<Self, Self::Error> {
        Self::from_assignments(value.into_iter().map(|a| (a.class, a.rows)))
    }
}

impl From<RowPlan> for Vec<RowAssignment> {
    fn from(value: RowPlan) -> Self {
        value
            .rows
            .into_iter()
            .map(|(class, rows)| RowAssignment { class, rows })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct YardLayout {
    owners: BTreeMap<ScopeId, RowPlan>,
    overflow: RowPlan,
}

impl YardLayout {
    #[inline]
    pub fn new(owners: BTreeMap<ScopeId, RowPlan>, overflow: RowPlan) -> Self {
        Self { owners, overflow }
    }

    /// `owner_count` owners (ids `1..=owner_count`) each receive a contiguous
    /// block of `rows_per_owner` rows split by `weights`, followed by
    /// `overflow_rows` shared rows split the same way.
    pub fn uniform(
        owner_count: u32,
        rows_per_owner: u32,
        overflow_rows: u32,
        weights: &[(ContainerClass, u32)],
    ) -> Result<Self, RowPlanError> {
        let block = |first: u32, len: u32| -> Vec<RowNumber> {
            (first..first + len).map(RowNumber::new).collect()
        };

        let mut owners = BTreeMap::new();
        let mut next = 1;
        for id in 1..=owner_count {
            owners.insert(
                ScopeId::new(id),
                RowPlan::proportional(&block(next, rows_per_owner), weights)?,
            );
            next += rows_per_owner;
        }
        let overflow = RowPlan::proportional(&block(next, overflow_rows), weights)?;
        Ok(Self { owners, overflow })
    }

    pub fn with_owner(mut self, owner: ScopeId, plan: RowPlan) -> Self {
        self.owners.insert(owner, plan);
        self
    }

    pub fn with_overflow(mut self, plan: RowPlan) -> Self {
        self.overflow = plan;
        self
    }

    #[inline]
    pub fn owner(&self, owner: ScopeId) -> Option<&RowPlan> {
        self.owners.get(&owner)
    }

    #[inline]
    pub fn owners(&self) -> impl Iterator<Item = (ScopeId, &RowPlan)> + '_ {
        self.owners.iter().map(|(id, plan)| (*id, plan))
    }

    #[inline]
    pub fn owner_count(&self) -> usize {
        self.owners.len()
    }

    #[inline]
    pub fn overflow(&self) -> &RowPlan {
        &self.overflow
    }

    /// Every `(row, scope, class)` claim of the layout.
    pub fn claims(&self) -> impl Iterator<Item = (RowNumber, RowScope, ContainerClass)> + '_ {
        let owned = self.owners.iter().flat_map(|(id, plan)| {
            plan.iter_rows()
                .map(move |(row, class)| (row, RowScope::Owner(*id), class))
        });
        let shared = self
            .overflow
            .iter_rows()
            .map(|(row, class)| (row, RowScope::Overflow, class));
        owned.chain(shared)
    }

    #[inline]
    pub fn max_row(&self) -> Option<RowNumber> {
        self.claims().map(|(row, _, _)| row).max()
    }

    /// Every row must lie inside `bounds` and belong to exactly one
    /// `(scope, class)` pair.
    pub fn validate(&self, bounds: &YardBounds) -> Result<(), EngineConfigError> {
        let mut seen: BTreeMap<RowNumber, (RowScope, ContainerClass)> = BTreeMap::new();
        for (row, scope, class) in self.claims() {
            if !bounds.contains_row(row) {
                return Err(RowOutOfBoundsError::new(row, bounds.max_row()).into());
            }
            match seen.entry(row) {
                Entry::Vacant(v) => {
                    v.insert((scope, class));
                }
                Entry::Occupied(o) => {
                    return Err(RowConflictError::new(row, *o.get(), (scope, class)).into());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yard_alloc_core::coord::BayNumber;
    use yard_alloc_core::coord::{TierNumber, Zone};

    const WEIGHTS: [(ContainerClass, u32); 4] = [
        (ContainerClass::TWENTY_LADEN, 3),
        (ContainerClass::FORTY_LADEN, 3),
        (ContainerClass::TWENTY_EMPTY, 2),
        (ContainerClass::FORTY_EMPTY, 2),
    ];

    fn rows(range: std::ops::RangeInclusive<u32>) -> Vec<RowNumber> {
        range.map(RowNumber::new).collect()
    }

    #[test]
    fn test_proportional_exact_split() {
        let plan = RowPlan::proportional(&rows(1..=10), &WEIGHTS).unwrap();
        assert_eq!(plan.rows_for(ContainerClass::TWENTY_LADEN), rows(1..=3).as_slice());
        assert_eq!(plan.rows_for(ContainerClass::FORTY_LADEN), rows(4..=6).as_slice());
        assert_eq!(plan.rows_for(ContainerClass::TWENTY_EMPTY), rows(7..=8).as_slice());
        assert_eq!(plan.rows_for(ContainerClass::FORTY_EMPTY), rows(9..=10).as_slice());
        assert_eq!(plan.row_count(), 10);
    }

    #[test]
    fn test_proportional_largest_remainder() {
        // 7 rows at 3/3/2/2: floors 2/2/1/1, the leftover row goes to the
        // first class with the largest remainder (20ft empty).
        let plan = RowPlan::proportional(&rows(1..=7), &WEIGHTS).unwrap();
        assert_eq!(plan.rows_for(ContainerClass::TWENTY_LADEN).len(), 2);
        assert_eq!(plan.rows_for(ContainerClass::FORTY_LADEN).len(), 2);
        assert_eq!(plan.rows_for(ContainerClass::TWENTY_EMPTY).len(), 2);
        assert_eq!(plan.rows_for(ContainerClass::FORTY_EMPTY).len(), 1);
        assert_eq!(plan.row_count(), 7);
    }

    #[test]
    fn test_proportional_rejects_bad_weights() {
        assert_eq!(
            RowPlan::proportional(&rows(1..=4), &[(ContainerClass::TWENTY_LADEN, 0)]),
            Err(RowPlanError::ZeroTotalWeight)
        );
        assert_eq!(
            RowPlan::proportional(
                &rows(1..=4),
                &[
                    (ContainerClass::TWENTY_LADEN, 1),
                    (ContainerClass::TWENTY_LADEN, 1)
                ]
            ),
            Err(RowPlanError::DuplicateClass(ContainerClass::TWENTY_LADEN))
        );
    }

    #[test]
    fn test_from_assignments_rejects_overlap() {
        let err = RowPlan::from_assignments([
            (ContainerClass::TWENTY_LADEN, rows(1..=2)),
            (ContainerClass::FORTY_LADEN, rows(2..=3)),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            RowPlanError::OverlappingRows(OverlappingRowsError::new(
                RowNumber::new(2),
                ContainerClass::TWENTY_LADEN,
                ContainerClass::FORTY_LADEN
            ))
        );
    }

    #[test]
    fn test_push_row_rejects_duplicate() {
        let mut plan = RowPlan::from_assignments([(ContainerClass::FORTY_EMPTY, rows(1..=1))])
            .unwrap();
        assert_eq!(
            plan.push_row(ContainerClass::FORTY_EMPTY, RowNumber::new(1)),
            Err(RowPlanError::DuplicateRow(
                ContainerClass::FORTY_EMPTY,
                RowNumber::new(1)
            ))
        );
        plan.push_row(ContainerClass::FORTY_EMPTY, RowNumber::new(5))
            .unwrap();
        assert_eq!(plan.max_row(), Some(RowNumber::new(5)));
        assert_eq!(plan.class_of(RowNumber::new(5)), Some(ContainerClass::FORTY_EMPTY));
    }

    #[test]
    fn test_pop_row_only_takes_the_last_row() {
        let mut plan = RowPlan::empty();
        plan.push_row(ContainerClass::FORTY_LADEN, RowNumber::new(7)).unwrap();
        plan.push_row(ContainerClass::FORTY_LADEN, RowNumber::new(8)).unwrap();
        assert!(!plan.pop_row(ContainerClass::FORTY_LADEN, RowNumber::new(7)));
        assert!(!plan.pop_row(ContainerClass::TWENTY_LADEN, RowNumber::new(8)));
        assert!(plan.pop_row(ContainerClass::FORTY_LADEN, RowNumber::new(8)));
        assert!(plan.pop_row(ContainerClass::FORTY_LADEN, RowNumber::new(7)));
        assert!(plan.is_empty());
        assert_eq!(plan, RowPlan::empty());
    }

    #[test]
    fn test_uniform_layout_blocks() {
        let layout = YardLayout::uniform(2, 10, 4, &WEIGHTS).unwrap();
        assert_eq!(layout.owner_count(), 2);
        let second = layout.owner(ScopeId::new(2)).unwrap();
        assert_eq!(second.rows_for(ContainerClass::TWENTY_LADEN), rows(11..=13).as_slice());
        assert_eq!(layout.overflow().row_count(), 4);
        assert_eq!(layout.max_row(), Some(RowNumber::new(24)));

        let bounds = YardBounds::new(
            Zone::default(),
            RowNumber::new(24),
            BayNumber::new(10),
            TierNumber::new(4),
        );
        assert_eq!(layout.validate(&bounds), Ok(()));
        let tight = bounds.with_max_row(RowNumber::new(20));
        assert!(matches!(
            layout.validate(&tight),
            Err(EngineConfigError::RowOutOfBounds(_))
        ));
    }

    #[test]
    fn test_layout_detects_cross_scope_conflict() {
        let plan = RowPlan::from_assignments([(ContainerClass::TWENTY_LADEN, rows(1..=2))])
            .unwrap();
        let layout = YardLayout::default()
            .with_owner(ScopeId::new(1), plan.clone())
            .with_overflow(plan);
        let bounds = YardBounds::new(
            Zone::default(),
            RowNumber::new(2),
            BayNumber::new(1),
            TierNumber::new(1),
        );
        match layout.validate(&bounds) {
            Err(EngineConfigError::RowConflict(e)) => {
                assert_eq!(e.row(), RowNumber::new(1));
                assert_eq!(e.first().0, RowScope::Owner(ScopeId::new(1)));
                assert_eq!(e.second().0, RowScope::Overflow);
            }
            other => panic!("expected a row conflict, got {other:?}"),
        }
    }

    #[test]
    fn test_row_plan_serde_shape() {
        let plan = RowPlan::proportional(&rows(1..=4), &WEIGHTS).unwrap();
        let json = serde_json::to_string(&plan).unwrap();
        let back: RowPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(back, plan);

        let overlapping = r#"[
            {"class": {"size": "Twenty", "status": "Laden"}, "rows": [1, 2]},
            {"class": {"size": "Forty", "status": "Laden"}, "rows": [2]}
        ]"#;
        assert!(serde_json::from_str::<RowPlan>(overlapping).is_err());
    }
}
