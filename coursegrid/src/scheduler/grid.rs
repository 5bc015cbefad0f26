/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! The per-quarter placement grid and its edit operations.
//!
//! A [`Grid`] maps each [`Slot`] to at most one section and keeps two side
//! buckets: sections that could not be placed, and case-by-case sections
//! that never enter the grid.  Every edit either fully applies and returns a
//! [`GridChange`], or returns an error and leaves the grid untouched.  No edit
//! ever drops a section.  A grid generated under an evening rule keeps that
//! rule as an [`EveningGuard`] and re-flags `safety_warning` after each edit.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FieldViolation, PlannerError};
use crate::model::{Quarter, SectionAssignment, SectionId, Slot};
use crate::rules::RoomOccupancy;

use super::error::UnassignedReason;
use super::safety::{flag_evening_sections, EveningGuard, EveningShortfall};

// ── Buckets and locations ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnassignedSection {
    pub section: SectionAssignment,
    pub reason: UnassignedReason,
}

/// Where a section currently lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Location {
    Slot(Slot),
    Unassigned,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Slot(slot) => write!(f, "slot {slot}"),
            Location::Unassigned => f.write_str("the unassigned bucket"),
        }
    }
}

// ── Change descriptors ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GridOperation {
    Move,
    Swap,
    Unassign,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionMove {
    pub section: SectionId,
    pub from: Location,
    pub to: Location,
}

/// What an edit did, for the caller to re-render or log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridChange {
    pub quarter: Quarter,
    pub operation: GridOperation,
    /// The requested move first, then any displaced section.
    pub moves: Vec<SectionMove>,
}

// ── Grid ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Placement {
    slot: Slot,
    section: SectionAssignment,
}

/// Serialised form.  YAML maps cannot use struct keys, so slots are written
/// as a sequence of placements.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GridDocument {
    quarter: Quarter,
    #[serde(default)]
    placements: Vec<Placement>,
    #[serde(default)]
    unassigned: Vec<UnassignedSection>,
    #[serde(default)]
    case_by_case: Vec<SectionAssignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    evening_guard: Option<EveningGuard>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "GridDocument", from = "GridDocument")]
pub struct Grid {
    quarter: Quarter,
    slots: BTreeMap<Slot, SectionAssignment>,
    unassigned: Vec<UnassignedSection>,
    case_by_case: Vec<SectionAssignment>,
    evening_guard: Option<EveningGuard>,
}

impl From<Grid> for GridDocument {
    fn from(g: Grid) -> Self {
        Self {
            quarter: g.quarter,
            placements: g
                .slots
                .into_iter()
                .map(|(slot, section)| Placement { slot, section })
                .collect(),
            unassigned: g.unassigned,
            case_by_case: g.case_by_case,
            evening_guard: g.evening_guard,
        }
    }
}

impl From<GridDocument> for Grid {
    /// A later placement for an already-filled slot goes to the unassigned
    /// bucket instead of overwriting.
    fn from(doc: GridDocument) -> Self {
        let mut grid = Grid::new(doc.quarter);
        for p in doc.placements {
            if let Err(section) = grid.place(p.slot, p.section) {
                grid.push_unassigned(section, UnassignedReason::RoomConflict { tried_rooms: 1 });
            }
        }
        grid.unassigned.extend(doc.unassigned);
        grid.case_by_case = doc.case_by_case;
        grid.evening_guard = doc.evening_guard;
        grid
    }
}

impl Grid {
    pub fn new(quarter: Quarter) -> Self {
        Self {
            quarter,
            slots: BTreeMap::new(),
            unassigned: Vec::new(),
            case_by_case: Vec::new(),
            evening_guard: None,
        }
    }

    pub fn quarter(&self) -> Quarter {
        self.quarter
    }

    pub fn get(&self, slot: &Slot) -> Option<&SectionAssignment> {
        self.slots.get(slot)
    }

    pub fn is_occupied(&self, slot: &Slot) -> bool {
        self.slots.contains_key(slot)
    }

    /// Placed sections in slot order.
    pub fn placements(&self) -> impl Iterator<Item = (&Slot, &SectionAssignment)> {
        self.slots.iter()
    }

    pub fn placed_count(&self) -> usize {
        self.slots.len()
    }

    pub fn unassigned(&self) -> &[UnassignedSection] {
        &self.unassigned
    }

    pub fn case_by_case(&self) -> &[SectionAssignment] {
        &self.case_by_case
    }

    /// Every section the grid holds, wherever it sits.
    pub fn all_sections(&self) -> impl Iterator<Item = &SectionAssignment> {
        self.slots
            .values()
            .chain(self.unassigned.iter().map(|u| &u.section))
            .chain(self.case_by_case.iter())
    }

    pub fn total_sections(&self) -> usize {
        self.slots.len() + self.unassigned.len() + self.case_by_case.len()
    }

    /// Where `id` currently lives, if on the grid or in the unassigned bucket.
    pub fn locate(&self, id: &SectionId) -> Option<Location> {
        if let Some((slot, _)) = self.slots.iter().find(|(_, s)| s.is(id)) {
            return Some(Location::Slot(slot.clone()));
        }
        self.unassigned
            .iter()
            .any(|u| u.section.is(id))
            .then_some(Location::Unassigned)
    }

    /// Puts `section` at `slot` if it is free; hands it back otherwise.
    pub(crate) fn place(
        &mut self,
        slot: Slot,
        section: SectionAssignment,
    ) -> Result<(), SectionAssignment> {
        if self.slots.contains_key(&slot) {
            return Err(section);
        }
        self.slots.insert(slot, section);
        Ok(())
    }

    pub(crate) fn push_unassigned(&mut self, section: SectionAssignment, reason: UnassignedReason) {
        self.unassigned.push(UnassignedSection { section, reason });
    }

    pub(crate) fn push_case_by_case(&mut self, section: SectionAssignment) {
        self.case_by_case.push(section);
    }

    pub(crate) fn slots_mut(&mut self) -> impl Iterator<Item = (&Slot, &mut SectionAssignment)> {
        self.slots.iter_mut()
    }

    pub fn evening_guard(&self) -> Option<&EveningGuard> {
        self.evening_guard.as_ref()
    }

    /// Replaces the evening rule and re-flags every section under it.
    pub fn set_evening_guard(&mut self, guard: Option<EveningGuard>) -> Vec<EveningShortfall> {
        self.evening_guard = guard;
        self.refresh_safety_flags()
    }

    /// Recomputes `safety_warning` from the current placements.  Without a
    /// guard every flag is cleared.  Off-grid sections are never flagged.
    pub fn refresh_safety_flags(&mut self) -> Vec<EveningShortfall> {
        for u in &mut self.unassigned {
            u.section.safety_warning = false;
        }
        match self.evening_guard.clone() {
            Some(guard) => flag_evening_sections(self, |t| guard.is_evening(t), guard.minimum),
            None => {
                for section in self.slots.values_mut() {
                    section.safety_warning = false;
                }
                Vec::new()
            }
        }
    }

    // ── Edits ─────────────────────────────────────────────────────────────────

    /// Move section `id` from `from` to slot `to`.
    ///
    /// If `to` is occupied, the occupant takes the mover's old place: its
    /// slot, or the mover's position in the unassigned bucket.
    pub fn move_section(
        &mut self,
        id: &SectionId,
        from: &Location,
        to: &Slot,
    ) -> Result<GridChange, PlannerError> {
        let mut violations = validate_id(id);
        if let Location::Slot(from_slot) = from {
            if from_slot == to {
                violations.push(FieldViolation::new("to", "must differ from the source slot"));
            }
        }
        validate_slot(&mut violations, "to", to);
        PlannerError::check("move_section", violations)?;

        let not_found = || PlannerError::SectionNotFound {
            section: id.to_string(),
            location: from.to_string(),
        };

        match from {
            Location::Slot(from_slot) => {
                if !self.slots.get(from_slot).is_some_and(|s| s.is(id)) {
                    return Err(not_found());
                }
                let mut moves = vec![SectionMove {
                    section: id.clone(),
                    from: from.clone(),
                    to: Location::Slot(to.clone()),
                }];
                let mover = self.slots.remove(from_slot).ok_or_else(not_found)?;
                if let Some(occupant) = self.slots.remove(to) {
                    moves.push(SectionMove {
                        section: occupant.id(),
                        from: Location::Slot(to.clone()),
                        to: from.clone(),
                    });
                    self.slots.insert(from_slot.clone(), occupant);
                }
                self.slots.insert(to.clone(), mover);
                Ok(self.change(GridOperation::Move, moves))
            }
            Location::Unassigned => {
                let index = self
                    .unassigned
                    .iter()
                    .position(|u| u.section.is(id))
                    .ok_or_else(not_found)?;
                let mut moves = vec![SectionMove {
                    section: id.clone(),
                    from: Location::Unassigned,
                    to: Location::Slot(to.clone()),
                }];
                let mover = match self.slots.remove(to) {
                    Some(occupant) => {
                        moves.push(SectionMove {
                            section: occupant.id(),
                            from: Location::Slot(to.clone()),
                            to: Location::Unassigned,
                        });
                        let parked = UnassignedSection {
                            section: occupant,
                            reason: UnassignedReason::Displaced { by: id.to_string() },
                        };
                        std::mem::replace(&mut self.unassigned[index], parked).section
                    }
                    None => self.unassigned.remove(index).section,
                };
                self.slots.insert(to.clone(), mover);
                Ok(self.change(GridOperation::Move, moves))
            }
        }
    }

    /// Exchange the sections in two occupied slots.
    pub fn swap(&mut self, a: &Slot, b: &Slot) -> Result<GridChange, PlannerError> {
        let mut violations = Vec::new();
        validate_slot(&mut violations, "a", a);
        validate_slot(&mut violations, "b", b);
        if a == b {
            violations.push(FieldViolation::new("b", "must differ from a"));
        }
        PlannerError::check("swap", violations)?;

        let first = self.slots.remove(a).ok_or_else(|| empty_slot(a))?;
        let second = match self.slots.remove(b) {
            Some(s) => s,
            None => {
                self.slots.insert(a.clone(), first);
                return Err(empty_slot(b));
            }
        };
        let moves = vec![
            SectionMove {
                section: first.id(),
                from: Location::Slot(a.clone()),
                to: Location::Slot(b.clone()),
            },
            SectionMove {
                section: second.id(),
                from: Location::Slot(b.clone()),
                to: Location::Slot(a.clone()),
            },
        ];
        self.slots.insert(b.clone(), first);
        self.slots.insert(a.clone(), second);
        Ok(self.change(GridOperation::Swap, moves))
    }

    /// Take the section in `slot` off the grid.
    pub fn unassign(&mut self, slot: &Slot) -> Result<GridChange, PlannerError> {
        let mut violations = Vec::new();
        validate_slot(&mut violations, "slot", slot);
        PlannerError::check("unassign", violations)?;

        let section = self.slots.remove(slot).ok_or_else(|| empty_slot(slot))?;
        let moves = vec![SectionMove {
            section: section.id(),
            from: Location::Slot(slot.clone()),
            to: Location::Unassigned,
        }];
        self.push_unassigned(section, UnassignedReason::Manual);
        Ok(self.change(GridOperation::Unassign, moves))
    }

    fn change(&mut self, operation: GridOperation, moves: Vec<SectionMove>) -> GridChange {
        let shortfalls = self.refresh_safety_flags();
        debug!(
            quarter = %self.quarter,
            ?operation,
            moves = moves.len(),
            evening_shortfalls = shortfalls.len(),
            "grid edited"
        );
        GridChange {
            quarter: self.quarter,
            operation,
            moves,
        }
    }
}

impl RoomOccupancy for Grid {
    fn occupied_slots_in(&self, room: &str) -> usize {
        self.slots.keys().filter(|s| s.room == room).count()
    }
}

fn empty_slot(slot: &Slot) -> PlannerError {
    PlannerError::SectionNotFound {
        section: "any section".into(),
        location: Location::Slot(slot.clone()).to_string(),
    }
}

fn validate_id(id: &SectionId) -> Vec<FieldViolation> {
    let mut v = Vec::new();
    if id.course_code.trim().is_empty() {
        v.push(FieldViolation::new("course_code", "must not be empty"));
    }
    if id.section.trim().is_empty() {
        v.push(FieldViolation::new("section", "must not be empty"));
    }
    v
}

fn validate_slot(violations: &mut Vec<FieldViolation>, field: &str, slot: &Slot) {
    if slot.room.trim().is_empty() {
        violations.push(FieldViolation::new(format!("{field}.room"), "must not be empty"));
    }
}

// ── Plan ──────────────────────────────────────────────────────────────────────

/// One grid per quarter, in academic order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub quarters: BTreeMap<Quarter, Grid>,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, grid: Grid) {
        self.quarters.insert(grid.quarter(), grid);
    }

    pub fn get(&self, quarter: Quarter) -> Option<&Grid> {
        self.quarters.get(&quarter)
    }

    pub fn get_mut(&mut self, quarter: Quarter) -> Option<&mut Grid> {
        self.quarters.get_mut(&quarter)
    }

    pub fn grids(&self) -> impl Iterator<Item = &Grid> {
        self.quarters.values()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DayPattern, TimeSlot};

    fn section(code: &str, n: &str) -> SectionAssignment {
        SectionAssignment {
            course_code: code.into(),
            section: n.into(),
            faculty_name: None,
            credits: 5,
            predicted_demand: 20,
            safety_warning: false,
        }
    }

    fn slot(day: DayPattern, time: TimeSlot, room: &str) -> Slot {
        Slot::new(day, time, room)
    }

    fn two_placed() -> (Grid, Slot, Slot) {
        let a = slot(DayPattern::MW, TimeSlot::Morning, "206");
        let b = slot(DayPattern::TR, TimeSlot::Afternoon, "212");
        let mut g = Grid::new(Quarter::Fall);
        g.place(a.clone(), section("DESN 100", "001")).unwrap();
        g.place(b.clone(), section("DESN 200", "001")).unwrap();
        (g, a, b)
    }

    #[test]
    fn place_refuses_occupied_slot() {
        let (mut g, a, _) = two_placed();
        let back = g.place(a, section("DESN 300", "001")).unwrap_err();
        assert_eq!(back.course_code, "DESN 300");
        assert_eq!(g.placed_count(), 2);
    }

    #[test]
    fn move_into_empty_slot() {
        let (mut g, a, _) = two_placed();
        let c = slot(DayPattern::MW, TimeSlot::Evening, "210");
        let id = SectionId::new("DESN 100", "001");
        let change = g.move_section(&id, &Location::Slot(a.clone()), &c).unwrap();
        assert_eq!(change.moves.len(), 1);
        assert!(!g.is_occupied(&a));
        assert!(g.get(&c).unwrap().is(&id));
    }

    #[test]
    fn move_into_occupied_slot_swaps_and_round_trips() {
        let (mut g, a, b) = two_placed();
        let before = g.clone();
        let id = SectionId::new("DESN 100", "001");

        let change = g.move_section(&id, &Location::Slot(a.clone()), &b).unwrap();
        assert_eq!(change.moves.len(), 2);
        assert_eq!(g.get(&a).unwrap().course_code, "DESN 200");
        assert_eq!(g.get(&b).unwrap().course_code, "DESN 100");

        g.move_section(&id, &Location::Slot(b), &a).unwrap();
        assert_eq!(g, before);
    }

    #[test]
    fn move_from_unassigned_displaces_occupant_into_bucket() {
        let (mut g, a, _) = two_placed();
        g.push_unassigned(section("DESN 300", "002"), UnassignedReason::RoomConflict { tried_rooms: 3 });
        let id = SectionId::new("DESN 300", "002");

        g.move_section(&id, &Location::Unassigned, &a).unwrap();
        assert!(g.get(&a).unwrap().is(&id));
        assert_eq!(g.unassigned().len(), 1);
        assert_eq!(g.unassigned()[0].section.course_code, "DESN 100");
        assert_eq!(
            g.unassigned()[0].reason,
            UnassignedReason::Displaced {
                by: "DESN 300-002".into()
            }
        );
        assert_eq!(g.total_sections(), 3);
    }

    #[test]
    fn failed_move_leaves_grid_untouched() {
        let (mut g, a, b) = two_placed();
        let before = g.clone();

        let wrong = SectionId::new("DESN 999", "001");
        let err = g.move_section(&wrong, &Location::Slot(a.clone()), &b).unwrap_err();
        assert!(matches!(err, PlannerError::SectionNotFound { .. }));

        let blank = SectionId::new("", "");
        let err = g.move_section(&blank, &Location::Slot(a.clone()), &a).unwrap_err();
        let PlannerError::InvalidInput { violations, .. } = err else {
            panic!("expected InvalidInput");
        };
        assert_eq!(violations.len(), 3);

        assert_eq!(g, before);
    }

    #[test]
    fn swap_exchanges_occupants() {
        let (mut g, a, b) = two_placed();
        let change = g.swap(&a, &b).unwrap();
        assert_eq!(change.operation, GridOperation::Swap);
        assert_eq!(g.get(&a).unwrap().course_code, "DESN 200");
        assert_eq!(g.get(&b).unwrap().course_code, "DESN 100");

        let empty = slot(DayPattern::TR, TimeSlot::Evening, "206");
        let before = g.clone();
        assert!(g.swap(&a, &empty).is_err());
        assert!(g.swap(&a, &a).is_err());
        assert_eq!(g, before);
    }

    #[test]
    fn unassign_moves_to_bucket() {
        let (mut g, a, _) = two_placed();
        g.unassign(&a).unwrap();
        assert!(!g.is_occupied(&a));
        assert_eq!(g.unassigned()[0].reason, UnassignedReason::Manual);
        assert!(g.unassign(&a).is_err());
        assert_eq!(g.total_sections(), 2);
    }

    #[test]
    fn occupancy_counts_slots_per_room() {
        let (g, _, _) = two_placed();
        assert_eq!(g.occupied_slots_in("206"), 1);
        assert_eq!(g.occupied_slots_in("CEB 102"), 0);
    }

    fn evening_rule() -> EveningGuard {
        EveningGuard {
            evening_slots: vec![TimeSlot::Evening],
            minimum: 2,
        }
    }

    #[test]
    fn moving_out_of_the_evening_clears_the_flag() {
        let night = slot(DayPattern::MW, TimeSlot::Evening, "206");
        let morning = slot(DayPattern::MW, TimeSlot::Morning, "206");
        let mut g = Grid::new(Quarter::Fall);
        g.place(night.clone(), section("DESN 100", "001")).unwrap();
        assert_eq!(g.set_evening_guard(Some(evening_rule())).len(), 1);
        assert!(g.get(&night).unwrap().safety_warning);

        let id = SectionId::new("DESN 100", "001");
        g.move_section(&id, &Location::Slot(night), &morning).unwrap();
        assert!(!g.get(&morning).unwrap().safety_warning);
    }

    #[test]
    fn edits_flag_a_newly_lone_evening_section() {
        let a = slot(DayPattern::TR, TimeSlot::Evening, "206");
        let b = slot(DayPattern::TR, TimeSlot::Evening, "212");
        let mut g = Grid::new(Quarter::Fall);
        g.place(a.clone(), section("DESN 100", "001")).unwrap();
        g.place(b.clone(), section("DESN 200", "001")).unwrap();
        assert!(g.set_evening_guard(Some(evening_rule())).is_empty());

        g.unassign(&b).unwrap();
        assert!(g.get(&a).unwrap().safety_warning);
        assert!(!g.unassigned()[0].section.safety_warning);

        let id = SectionId::new("DESN 200", "001");
        g.move_section(&id, &Location::Unassigned, &b).unwrap();
        assert!(!g.get(&a).unwrap().safety_warning);
        assert!(!g.get(&b).unwrap().safety_warning);
    }

    #[test]
    fn dropping_the_guard_clears_every_flag() {
        let night = slot(DayPattern::MW, TimeSlot::Evening, "206");
        let mut g = Grid::new(Quarter::Fall);
        g.place(night.clone(), section("DESN 100", "001")).unwrap();
        g.set_evening_guard(Some(evening_rule()));
        assert!(g.get(&night).unwrap().safety_warning);

        g.set_evening_guard(None);
        assert!(!g.get(&night).unwrap().safety_warning);
    }

    #[test]
    fn grid_round_trips_through_yaml() {
        let (mut g, _, _) = two_placed();
        g.push_case_by_case(section("DESN 499", "001"));
        g.set_evening_guard(Some(evening_rule()));
        let yaml = serde_yaml::to_string(&g).unwrap();
        assert!(yaml.contains("placements:"));
        let back: Grid = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, g);
    }
}
