/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Per-course eligibility: which rooms, time slots and day patterns a course
//! may use.
//!
//! Every query follows one precedence chain and the first source that has an
//! opinion wins:
//!
//! ```text
//! catalog override  ──►  rules document  ──►  default
//! ```
//!
//! Hard catalog constraints restrict to exactly the listed values.  Soft
//! catalog constraints only move the listed values to the front.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::model::{normalize_code, Course, CourseCatalog, DayPattern, TimeSlot};

use super::ConstraintStore;

// ── Room occupancy ────────────────────────────────────────────────────────────

/// How many grid slots are already taken in a given room.  Drives the
/// overflow-room heuristic.
pub trait RoomOccupancy {
    fn occupied_slots_in(&self, room: &str) -> usize;
}

/// An empty grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOccupancy;

impl RoomOccupancy for NoOccupancy {
    fn occupied_slots_in(&self, _room: &str) -> usize {
        0
    }
}

impl RoomOccupancy for BTreeMap<String, usize> {
    fn occupied_slots_in(&self, room: &str) -> usize {
        self.get(room).copied().unwrap_or(0)
    }
}

// ── Validation result ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    InvalidRoom,
    InvalidTime,
    /// The room's campus blocks this time slot.
    BlockedByCampus,
    CaseByCase,
}

/// One rule a proposed placement breaks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome of [`EligibilityResolver::validate_assignment`].  Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub violations: Vec<Violation>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn has(&self, kind: ViolationKind) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }

    fn push(&mut self, kind: ViolationKind, message: String) {
        self.violations.push(Violation { kind, message });
    }
}

// ── EligibilityResolver ───────────────────────────────────────────────────────

/// Combines the [`ConstraintStore`] with the course catalog.  Borrowed view;
/// cheap to construct per generation run.
#[derive(Debug, Clone, Copy)]
pub struct EligibilityResolver<'a> {
    store: &'a ConstraintStore,
    catalog: &'a CourseCatalog,
}

impl<'a> EligibilityResolver<'a> {
    pub fn new(store: &'a ConstraintStore, catalog: &'a CourseCatalog) -> Self {
        Self { store, catalog }
    }

    pub fn store(&self) -> &'a ConstraintStore {
        self.store
    }

    pub fn catalog(&self) -> &'a CourseCatalog {
        self.catalog
    }

    fn course(&self, code: &str) -> Option<&'a Course> {
        self.catalog.get(code)
    }

    /// Rooms `code` may use given the current occupancy, in preference order.
    pub fn valid_rooms(&self, code: &str, usage: &dyn RoomOccupancy) -> Vec<String> {
        self.resolve_rooms(code, |primary| self.primary_rooms_full(primary, usage))
    }

    /// Every room `code` could ever use, overflow included.
    fn reachable_rooms(&self, code: &str) -> Vec<String> {
        self.resolve_rooms(code, |_| true)
    }

    fn resolve_rooms(&self, code: &str, overflow_open: impl Fn(&[String]) -> bool) -> Vec<String> {
        if let Some(course) = self.course(code) {
            if !course.allowed_rooms.is_empty() {
                return self.apply_hardness(&course.allowed_rooms, course.room_constraint_hard);
            }
            if let Some(campus) = &course.allowed_campus {
                let rooms = self.store.rooms_for_campus(campus);
                return self.apply_hardness(&rooms, course.room_constraint_hard);
            }
        }

        let restricted = self
            .store
            .course_constraints_for(code)
            .find_map(|c| c.room_restriction.as_ref());
        if let Some(restriction) = restricted {
            let mut rooms = if restriction.allowed_rooms.is_empty() {
                restriction
                    .campus
                    .as_deref()
                    .map(|campus| self.store.rooms_for_campus(campus))
                    .unwrap_or_default()
            } else {
                restriction.allowed_rooms.clone()
            };
            if !restriction.overflow_rooms.is_empty() && overflow_open(&rooms) {
                for room in &restriction.overflow_rooms {
                    if !rooms.contains(room) {
                        rooms.push(room.clone());
                    }
                }
            }
            return rooms;
        }

        if let Some(room) = self.store.assigned_room_for(code) {
            return vec![room.to_string()];
        }

        self.store.available_rooms()
    }

    /// Hard: exactly `listed`.  Soft: `listed`, then every other available room.
    fn apply_hardness(&self, listed: &[String], hard: bool) -> Vec<String> {
        let mut rooms = listed.to_vec();
        if !hard {
            for room in self.store.available_rooms() {
                if !rooms.contains(&room) {
                    rooms.push(room);
                }
            }
        }
        rooms
    }

    /// Primary rooms count as full once every slot they offer is taken.
    /// This ignores per-slot occupancy on purpose; it is a capacity estimate.
    fn primary_rooms_full(&self, primary: &[String], usage: &dyn RoomOccupancy) -> bool {
        if primary.is_empty() {
            return true;
        }
        let capacity =
            self.store.time_slots().len() * self.store.day_patterns().len() * primary.len();
        let occupied: usize = primary.iter().map(|r| usage.occupied_slots_in(r)).sum();
        occupied >= capacity
    }

    /// Time slots `code` may use, in preference order.
    pub fn valid_time_slots(&self, code: &str) -> Vec<TimeSlot> {
        let all = self.store.time_slots();

        if let Some(course) = self.course(code) {
            if !course.preferred_times.is_empty() {
                return prefer(&course.preferred_times, &all, course.time_constraint_hard);
            }
        }

        let blocked = self
            .store
            .course_constraints_for(code)
            .find_map(|c| c.time_restriction.as_ref());
        match blocked {
            Some(r) => all
                .into_iter()
                .filter(|t| !r.blocked_slots.contains(t))
                .collect(),
            None => all,
        }
    }

    /// Day patterns `code` may use, preferred days first.
    pub fn valid_days(&self, code: &str) -> Vec<DayPattern> {
        match self.course(code) {
            Some(course) if !course.preferred_days.is_empty() => prefer(
                &course.preferred_days,
                self.store.day_patterns(),
                course.time_constraint_hard,
            ),
            _ => self.store.day_patterns().to_vec(),
        }
    }

    /// The catalog's preferred days for `code` (empty when none).
    pub fn preferred_days(&self, code: &str) -> &'a [DayPattern] {
        self.course(code)
            .map(|c| c.preferred_days.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_case_by_case(&self, code: &str) -> bool {
        self.course(code).map(|c| c.is_case_by_case).unwrap_or(false)
            || self.store.in_case_by_case_list(code)
    }

    /// Every case-by-case course from either source, normalised and sorted.
    pub fn case_by_case_courses(&self) -> Vec<String> {
        let from_catalog = self
            .catalog
            .courses
            .iter()
            .filter(|c| c.is_case_by_case)
            .map(|c| normalize_code(&c.code));
        let from_rules = self
            .store
            .rules()
            .case_by_case
            .courses
            .iter()
            .map(|c| normalize_code(c));
        from_catalog
            .chain(from_rules)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Check a proposed placement without touching any grid.  Overflow rooms
    /// count as valid here.
    pub fn validate_assignment(&self, code: &str, room: &str, time: TimeSlot) -> Validation {
        let mut result = Validation::default();

        if self.is_case_by_case(code) {
            result.push(
                ViolationKind::CaseByCase,
                format!("{code} is scheduled case by case and cannot occupy a grid slot"),
            );
        }

        let rooms = self.reachable_rooms(code);
        if !rooms.iter().any(|r| r == room) {
            result.push(
                ViolationKind::InvalidRoom,
                format!("{code} cannot be taught in room {room} (allowed: {})", rooms.join(", ")),
            );
        }

        if !self.valid_time_slots(code).contains(&time) {
            result.push(
                ViolationKind::InvalidTime,
                format!("{code} cannot be taught in the {time} slot"),
            );
        }

        if self.store.is_time_blocked_in_room(room, time) {
            result.push(
                ViolationKind::BlockedByCampus,
                format!(
                    "the {} campus does not offer the {time} slot (room {room})",
                    self.store.campus_id_for_room(room)
                ),
            );
        }

        result
    }

    /// A course is exclusive when, on an empty grid, it resolves to exactly
    /// one room.
    pub fn is_exclusive_room_course(&self, code: &str) -> bool {
        self.valid_rooms(code, &NoOccupancy).len() == 1
    }
}

/// Hard: exactly `listed`.  Soft: `listed` then the rest of `all` in order.
fn prefer<T: Copy + PartialEq>(listed: &[T], all: &[T], hard: bool) -> Vec<T> {
    let mut out = listed.to_vec();
    if !hard {
        out.extend(all.iter().copied().filter(|v| !listed.contains(v)));
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
