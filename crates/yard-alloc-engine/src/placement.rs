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
    density::DensityGate,
    engine::YardEngine,
    err::{ExhaustedError, PlacementError, RestoreError, RowClassMismatchError},
    occupancy::Occupant,
    stacking::{self, StackingViolation},
    stats::{PlacementOutcome, PlacementSource},
};
use tracing::{debug, instrument};
use yard_alloc_core::{
    class::ContainerClass,
    coord::{RowNumber, SlotCoordinate, SubSlot},
};
use yard_alloc_model::{
    bounds::OverflowMode,
    id::{OccupantId, ScopeId},
};

impl<G: DensityGate> YardEngine<G> {
    /// Finds and records a slot for one arriving container.
    ///
    /// The owner's own cursor is tried first, then the shared overflow
    /// cursor for `class`. If both are exhausted and the policy allows it,
    /// one fresh row is appended to the overflow pool and the overflow
    /// cursor is tried once more.
    ///
    /// A failed call leaves the occupancy set and the yard extent untouched:
    /// an appended row that still cannot take the container is removed again.
    #[instrument(level = "debug", skip_all, fields(owner = %owner, class = %class, occupant = %occupant))]
    pub fn allocate(
        &mut self,
        class: ContainerClass,
        owner: ScopeId,
        occupant: OccupantId,
    ) -> Result<PlacementOutcome, PlacementError> {
        let cursor = self
            .cursors
            .get_mut(&(owner, class))
            .ok_or(PlacementError::UnknownScope(owner))?;
        if let Some(coord) =
            cursor.try_next_position(&self.occupancy, &self.bays, &self.bounds, &mut self.gate)?
        {
            return Ok(self.commit(coord, class, occupant, PlacementSource::Primary));
        }

        debug!("owner rows exhausted, falling back to overflow");
        if let Some(coord) = self.try_overflow(class)? {
            return Ok(self.commit(coord, class, occupant, PlacementSource::Overflow));
        }

        if let Some(row) = self.expand_overflow(class) {
            debug!(row = %row, "overflow pool expanded");
            if let Some(coord) = self.try_overflow(class)? {
                return Ok(self.commit(coord, class, occupant, PlacementSource::Expanded));
            }
            self.retract_overflow(class, row);
            debug!(row = %row, "expanded row stayed empty, retracted");
        }

        self.stats.exhausted += 1;
        Err(ExhaustedError::new(owner, class).into())
    }

    /// Records a container that already stands in the yard when the session
    /// starts.
    ///
    /// The container must obey the same stacking laws as an allocated one,
    /// and a planned row only takes its own class. Callers therefore load a
    /// yard in [`SlotCoordinate`] order, which puts lower tiers first. A 40ft
    /// container is anchored at sub-slot `A` whatever `coord` names; the
    /// anchored coordinate is returned. No cursor moves.
    pub fn restore(
        &mut self,
        coord: SlotCoordinate,
        occupant: OccupantId,
        class: ContainerClass,
    ) -> Result<SlotCoordinate, RestoreError> {
        let coord = if class.size().is_forty() {
            coord.with_sub_slot(SubSlot::A)
        } else {
            coord
        };
        if !stacking::within_bounds(&coord, &self.bounds) {
            return Err(RestoreError::OutOfBounds(coord));
        }
        if let Some(planned) = self.planned_class(coord.row())
            && planned != class
        {
            return Err(RowClassMismatchError::new(coord, class, planned).into());
        }
        match stacking::check_placement(class.size(), &coord, &self.occupancy, &self.bounds) {
            Ok(()) => {}
            Err(StackingViolation::OutOfBounds) => return Err(RestoreError::OutOfBounds(coord)),
            Err(StackingViolation::Occupied) => return Err(RestoreError::Occupied(coord)),
            Err(violation) => return Err(RestoreError::Unstable(coord, violation)),
        }
        self.occupancy.insert(coord, Occupant::new(occupant, class));
        self.bays.refresh(&self.occupancy, &coord.bay_key());
        self.stats.restored += 1;
        Ok(coord)
    }

    fn try_overflow(
        &mut self,
        class: ContainerClass,
    ) -> Result<Option<SlotCoordinate>, PlacementError> {
        let Some(cursor) = self.overflow_cursors.get_mut(&class) else {
            return Ok(None);
        };
        Ok(cursor.try_next_position(&self.occupancy, &self.bays, &self.bounds, &mut self.gate)?)
    }

    /// Appends the row after the yard's current last row to the overflow
    /// pool for `class`. `None` when the policy forbids it.
    fn expand_overflow(&mut self, class: ContainerClass) -> Option<RowNumber> {
        let OverflowMode::AutoExpand { max_extra_rows } = self.policy.overflow_mode() else {
            return None;
        };
        if max_extra_rows.is_some_and(|max| self.stats.expansions >= max) {
            return None;
        }

        let row = self.bounds.max_row().next();
        self.overflow_plan.push_row(class, row).ok()?;
        if let Some(cursor) = self.overflow_cursors.get_mut(&class) {
            cursor.extend_rows(row);
        }
        self.bounds = self.bounds.with_max_row(row);
        self.stats.expansions += 1;
        Some(row)
    }

    /// Reverts [`Self::expand_overflow`] for a row that received nothing.
    fn retract_overflow(&mut self, class: ContainerClass, row: RowNumber) {
        self.overflow_plan.pop_row(class, row);
        if let Some(cursor) = self.overflow_cursors.get_mut(&class) {
            cursor.retract_row(row);
        }
        if let Some(prev) = row.prev() {
            self.bounds = self.bounds.with_max_row(prev);
        }
        self.stats.expansions = self.stats.expansions.saturating_sub(1);
    }

    fn commit(
        &mut self,
        coord: SlotCoordinate,
        class: ContainerClass,
        occupant: OccupantId,
        source: PlacementSource,
    ) -> PlacementOutcome {
        self.occupancy.insert(coord, Occupant::new(occupant, class));
        let state = self.bays.refresh(&self.occupancy, &coord.bay_key());
        self.stats.record(source);
        debug!(coord = %coord, source = %source, bay = %state, "placed");
        PlacementOutcome::new(coord, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::density::NoSkip;
    use yard_alloc_core::coord::{BayNumber, TierNumber, Zone};
    use yard_alloc_model::{config::EngineConfigBuilder, plan::RowPlan};

    fn plan(class: ContainerClass, rows: &[u32]) -> RowPlan {
        RowPlan::from_assignments([(class, rows.iter().copied().map(RowNumber::new).collect())])
            .unwrap()
    }

    fn at(row: u32, bay: u32, tier: u32, sub: SubSlot) -> SlotCoordinate {
        SlotCoordinate::new(
            Zone::default(),
            RowNumber::new(row),
            BayNumber::new(bay),
            TierNumber::new(tier),
            sub,
        )
    }

    fn engine(builder: EngineConfigBuilder) -> YardEngine<NoSkip> {
        YardEngine::with_gate(&builder.density_skip_rate(0.0).seed(7).build().unwrap(), NoSkip)
            .unwrap()
    }

    #[test]
    fn test_unknown_owner() {
        let mut e = engine(
            EngineConfigBuilder::new()
                .dimensions(1, 1)
                .owner_rows(ScopeId::new(1), plan(ContainerClass::TWENTY_LADEN, &[1])),
        );
        let err = e
            .allocate(ContainerClass::TWENTY_LADEN, ScopeId::new(2), OccupantId::new(1))
            .unwrap_err();
        assert_eq!(err, PlacementError::UnknownScope(ScopeId::new(2)));
        assert_eq!(err.reason(), "unknown scope");
    }

    #[test]
    fn test_expansion_appends_row_past_yard() {
        let mut e = engine(
            EngineConfigBuilder::new()
                .dimensions(1, 1)
                .max_row(3)
                .owner_rows(ScopeId::new(1), plan(ContainerClass::FORTY_LADEN, &[1]))
                .auto_expand(Some(1)),
        );
        let first = e
            .allocate(ContainerClass::FORTY_LADEN, ScopeId::new(1), OccupantId::new(1))
            .unwrap();
        assert_eq!(first.coord(), at(1, 1, 1, SubSlot::A));
        assert_eq!(first.source(), PlacementSource::Primary);

        let second = e
            .allocate(ContainerClass::FORTY_LADEN, ScopeId::new(1), OccupantId::new(2))
            .unwrap();
        assert_eq!(second.coord(), at(4, 1, 1, SubSlot::A));
        assert_eq!(second.source(), PlacementSource::Expanded);
        assert_eq!(e.bounds().max_row(), RowNumber::new(4));
        assert_eq!(
            e.overflow_plan().rows_for(ContainerClass::FORTY_LADEN),
            &[RowNumber::new(4)]
        );

        let third = e.allocate(ContainerClass::FORTY_LADEN, ScopeId::new(1), OccupantId::new(3));
        assert!(matches!(third, Err(PlacementError::Exhausted(_))));
        assert_eq!(e.stats().expansions(), 1);
        assert_eq!(e.stats().exhausted(), 1);
    }

    #[test]
    fn test_strict_mode_never_expands() {
        let mut e = engine(
            EngineConfigBuilder::new()
                .dimensions(1, 1)
                .owner_rows(ScopeId::new(1), plan(ContainerClass::FORTY_EMPTY, &[1]))
                .strict(),
        );
        assert!(e
            .allocate(ContainerClass::FORTY_EMPTY, ScopeId::new(1), OccupantId::new(1))
            .is_ok());
        let err = e
            .allocate(ContainerClass::FORTY_EMPTY, ScopeId::new(1), OccupantId::new(2))
            .unwrap_err();
        assert_eq!(err.reason(), "no space");
        assert_eq!(e.bounds().max_row(), RowNumber::new(1));
        assert_eq!(e.occupancy().len(), 1);
    }

    #[test]
    fn test_restore_checks_bounds_and_footprint() {
        let mut e = engine(
            EngineConfigBuilder::new()
                .dimensions(2, 2)
                .owner_rows(ScopeId::new(1), plan(ContainerClass::FORTY_LADEN, &[1])),
        );
        assert_eq!(
            e.restore(at(1, 1, 1, SubSlot::B), OccupantId::new(1), ContainerClass::FORTY_LADEN),
            Ok(at(1, 1, 1, SubSlot::A))
        );
        let err = e
            .restore(at(1, 1, 1, SubSlot::A), OccupantId::new(2), ContainerClass::FORTY_LADEN)
            .unwrap_err();
        assert_eq!(err, RestoreError::Occupied(at(1, 1, 1, SubSlot::A)));
        assert_eq!(err.reason(), "slot occupied");
        assert_eq!(
            e.restore(at(1, 3, 1, SubSlot::A), OccupantId::new(3), ContainerClass::FORTY_LADEN),
            Err(RestoreError::OutOfBounds(at(1, 3, 1, SubSlot::A)))
        );
        assert_eq!(e.stats().restored(), 1);
        let cursor = e.cursor(ScopeId::new(1), ContainerClass::FORTY_LADEN).unwrap();
        assert_eq!(cursor.stats().filled(), 0);
    }

    #[test]
    fn test_restore_rejects_floating_container() {
        let mut e = engine(
            EngineConfigBuilder::new()
                .dimensions(1, 3)
                .owner_rows(ScopeId::new(1), plan(ContainerClass::TWENTY_LADEN, &[1])),
        );
        let err = e
            .restore(at(1, 1, 2, SubSlot::A), OccupantId::new(1), ContainerClass::TWENTY_LADEN)
            .unwrap_err();
        assert_eq!(
            err,
            RestoreError::Unstable(at(1, 1, 2, SubSlot::A), StackingViolation::Floating)
        );
        assert_eq!(err.reason(), "unsupported");
        assert!(e.occupancy().is_empty());

        for id in 1..=3 {
            e.allocate(ContainerClass::TWENTY_LADEN, ScopeId::new(1), OccupantId::new(id))
                .unwrap();
        }
        assert!(e.occupancy().contains(&at(1, 1, 2, SubSlot::A)));
        assert!(!e.occupancy().contains(&at(1, 1, 3, SubSlot::A)));
    }

    #[test]
    fn test_restore_rejects_forty_on_single_twenty() {
        // Row 2 is outside every plan, so both sizes may share it.
        let mut e = engine(
            EngineConfigBuilder::new()
                .dimensions(1, 2)
                .max_row(2)
                .owner_rows(ScopeId::new(1), plan(ContainerClass::TWENTY_LADEN, &[1])),
        );
        e.restore(at(2, 1, 1, SubSlot::A), OccupantId::new(1), ContainerClass::TWENTY_EMPTY)
            .unwrap();
        assert_eq!(
            e.restore(at(2, 1, 2, SubSlot::A), OccupantId::new(2), ContainerClass::FORTY_EMPTY),
            Err(RestoreError::Unstable(
                at(2, 1, 2, SubSlot::A),
                StackingViolation::FortyOnSingleTwenty
            ))
        );
        e.restore(at(2, 1, 1, SubSlot::B), OccupantId::new(3), ContainerClass::TWENTY_EMPTY)
            .unwrap();
        assert_eq!(
            e.restore(at(2, 1, 2, SubSlot::B), OccupantId::new(4), ContainerClass::FORTY_EMPTY),
            Ok(at(2, 1, 2, SubSlot::A))
        );
    }

    #[test]
    fn test_restore_rejects_class_of_another_row() {
        let owner = RowPlan::from_assignments([
            (ContainerClass::TWENTY_LADEN, vec![RowNumber::new(1)]),
            (ContainerClass::FORTY_LADEN, vec![RowNumber::new(2)]),
        ])
        .unwrap();
        let mut e = engine(
            EngineConfigBuilder::new()
                .dimensions(1, 1)
                .owner_rows(ScopeId::new(1), owner)
                .overflow_rows(plan(ContainerClass::TWENTY_EMPTY, &[3])),
        );
        let err = e
            .restore(at(1, 1, 1, SubSlot::A), OccupantId::new(1), ContainerClass::FORTY_EMPTY)
            .unwrap_err();
        assert_eq!(
            err,
            RestoreError::RowClassMismatch(RowClassMismatchError::new(
                at(1, 1, 1, SubSlot::A),
                ContainerClass::FORTY_EMPTY,
                ContainerClass::TWENTY_LADEN
            ))
        );
        assert_eq!(err.reason(), "row class mismatch");
        assert!(matches!(
            e.restore(at(3, 1, 1, SubSlot::A), OccupantId::new(2), ContainerClass::TWENTY_LADEN),
            Err(RestoreError::RowClassMismatch(_))
        ));
        assert!(e
            .restore(at(2, 1, 1, SubSlot::A), OccupantId::new(3), ContainerClass::FORTY_LADEN)
            .is_ok());
        assert_eq!(e.occupancy().len(), 1);
    }

    #[test]
    fn test_restore_in_coordinate_order_builds_stacks() {
        let mut e = engine(
            EngineConfigBuilder::new()
                .dimensions(1, 3)
                .owner_rows(ScopeId::new(1), plan(ContainerClass::TWENTY_LADEN, &[1])),
        );
        let mut standing = vec![
            at(1, 1, 3, SubSlot::A),
            at(1, 1, 2, SubSlot::B),
            at(1, 1, 1, SubSlot::B),
            at(1, 1, 2, SubSlot::A),
            at(1, 1, 1, SubSlot::A),
        ];
        standing.sort();
        for (id, coord) in standing.into_iter().enumerate() {
            e.restore(coord, OccupantId::new(id as u64), ContainerClass::TWENTY_LADEN)
                .unwrap();
        }
        assert_eq!(e.stats().restored(), 5);
    }

    #[test]
    fn test_allocation_skips_restored_bay() {
        let mut e = engine(
            EngineConfigBuilder::new()
                .dimensions(2, 1)
                .owner_rows(ScopeId::new(1), plan(ContainerClass::TWENTY_EMPTY, &[1])),
        );
        for (sub, id) in [(SubSlot::A, 1), (SubSlot::B, 2)] {
            e.restore(at(1, 1, 1, sub), OccupantId::new(id), ContainerClass::TWENTY_EMPTY)
                .unwrap();
        }
        let outcome = e
            .allocate(ContainerClass::TWENTY_EMPTY, ScopeId::new(1), OccupantId::new(3))
            .unwrap();
        assert_eq!(outcome.coord(), at(1, 2, 1, SubSlot::A));
    }

    #[test]
    fn test_expanded_row_that_stays_empty_is_retracted() {
        let config = EngineConfigBuilder::new()
            .dimensions(2, 1)
            .owner_rows(ScopeId::new(1), plan(ContainerClass::TWENTY_LADEN, &[1]))
            .auto_expand(None)
            .density_skip_rate(1.0)
            .seed(11)
            .build()
            .unwrap();
        let mut e = YardEngine::new(&config).unwrap();
        for id in 1..=5 {
            let err = e
                .allocate(ContainerClass::TWENTY_LADEN, ScopeId::new(1), OccupantId::new(id))
                .unwrap_err();
            assert_eq!(err.reason(), "no space");
        }
        assert_eq!(e.bounds().max_row(), RowNumber::new(1));
        assert_eq!(e.stats().expansions(), 0);
        assert_eq!(e.stats().exhausted(), 5);
        assert!(e.overflow_plan().is_empty());
        assert!(e.overflow_cursor(ContainerClass::TWENTY_LADEN).unwrap().rows().is_empty());
        assert!(e.occupancy().is_empty());
    }
}
