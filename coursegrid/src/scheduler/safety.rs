/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Evening-safety post-check.
//!
//! # Status: advisory
//!
//! Runs after placement.  A day pattern with some evening teaching but fewer
//! evening sections than the instructor minimum gets those sections flagged
//! with `safety_warning`.  Nothing is moved or rejected; the
//! [`ConflictAuditor`](crate::audit::ConflictAuditor) raises the matching
//! conflict record from the named instructors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{DayPattern, TimeSlot};

use super::grid::Grid;

/// The evening rule a grid was generated under, kept with the grid so edits
/// can re-flag without the rules document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EveningGuard {
    /// Time slots starting at or after the cutoff.
    pub evening_slots: Vec<TimeSlot>,
    pub minimum: u32,
}

impl EveningGuard {
    pub fn is_evening(&self, time: TimeSlot) -> bool {
        self.evening_slots.contains(&time)
    }
}

/// A day pattern whose evening is under-staffed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EveningShortfall {
    pub day: DayPattern,
    pub evening_sections: usize,
    pub minimum: u32,
}

/// Evening placements per day pattern, in day order.
pub fn evening_counts(grid: &Grid, is_evening: impl Fn(TimeSlot) -> bool) -> BTreeMap<DayPattern, usize> {
    let mut counts = BTreeMap::new();
    for (slot, _) in grid.placements() {
        if is_evening(slot.time) {
            *counts.entry(slot.day).or_insert(0) += 1;
        }
    }
    counts
}

/// Days with a non-zero evening count below `minimum`.
pub fn evening_shortfalls(
    grid: &Grid,
    is_evening: impl Fn(TimeSlot) -> bool,
    minimum: u32,
) -> Vec<EveningShortfall> {
    evening_counts(grid, is_evening)
        .into_iter()
        .filter(|&(_, n)| n > 0 && (n as u64) < u64::from(minimum))
        .map(|(day, n)| EveningShortfall {
            day,
            evening_sections: n,
            minimum,
        })
        .collect()
}

/// Sets `safety_warning` on every evening section of a short-staffed day and
/// clears it everywhere else.  Returns the shortfalls found.
pub fn flag_evening_sections(
    grid: &mut Grid,
    is_evening: impl Fn(TimeSlot) -> bool,
    minimum: u32,
) -> Vec<EveningShortfall> {
    let shortfalls = evening_shortfalls(grid, &is_evening, minimum);
    for (slot, section) in grid.slots_mut() {
        section.safety_warning =
            is_evening(slot.time) && shortfalls.iter().any(|s| s.day == slot.day);
    }
    shortfalls
}

// ── Tests ─────────────────────────────────────────────────────────────────────
