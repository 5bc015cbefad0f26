/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Greedy section placement onto the Day × Time × Room grid.
//!
//! [`SlotAssigner`] takes one quarter's recommendation list and produces a
//! fresh [`Grid`].  Placement is first-fit over explicitly ordered
//! sequences, so the same inputs always yield the same grid.
//!
//! # Order of work
//!
//! | Step | Rule |
//! |---|---|
//! | Course order | exclusive single-room courses, then priority, then level; ties keep input order |
//! | Skips | courses not offered in the quarter |
//! | Case-by-case | one bucket entry per section, never a slot |
//! | Day order | fewest placements so far; ties go to preferred days, then MW before TR |
//! | Time order | morning, afternoon, evening (only the course's valid slots) |
//! | Room order | resolved eligibility order, skipping campuses that block the time |
//! | No room | unassigned bucket with a reason; generation continues |
//!
//! After placement the evening-safety check in [`safety`] flags evening
//! sections on under-staffed days.  The grid keeps the rule, so later edits
//! re-flag on their own.
//!
//! # Example
//! ```rust,ignore
//! let resolver = EligibilityResolver::new(&store, &catalog);
//! let grid = SlotAssigner::new(resolver, AssignerSettings::default()).generate(&recs);
//! ```

pub mod error;
pub mod grid;
pub mod safety;

pub use error::UnassignedReason;
pub use grid::{Grid, GridChange, GridOperation, Location, Plan, SectionMove, UnassignedSection};

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::model::{ClockTime, DayPattern, Quarter, SectionAssignment, Slot, TimeSlot};
use crate::planner::{CourseRecommendation, QuarterRecommendations};
use crate::rules::{EligibilityResolver, DEFAULT_EVENING_CUTOFF, DEFAULT_MIN_EVENING_INSTRUCTORS};

pub use safety::EveningGuard;

/// Defaults used when the rules document does not mention the evening rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignerSettings {
    pub evening_cutoff: ClockTime,
    pub minimum_evening_instructors: u32,
}

impl Default for AssignerSettings {
    fn default() -> Self {
        Self {
            evening_cutoff: DEFAULT_EVENING_CUTOFF,
            minimum_evening_instructors: DEFAULT_MIN_EVENING_INSTRUCTORS,
        }
    }
}

/// Running per-day and per-time placement counters for one run.
#[derive(Debug, Default)]
struct Balance {
    days: BTreeMap<DayPattern, usize>,
    times: BTreeMap<TimeSlot, usize>,
}

impl Balance {
    fn day(&self, day: DayPattern) -> usize {
        self.days.get(&day).copied().unwrap_or(0)
    }

    fn record(&mut self, slot: &Slot) {
        *self.days.entry(slot.day).or_insert(0) += 1;
        *self.times.entry(slot.time).or_insert(0) += 1;
    }
}

/// Stateless placement engine; all per-run state lives inside
/// [`generate`](Self::generate).
#[derive(Debug, Clone, Copy)]
pub struct SlotAssigner<'a> {
    resolver: EligibilityResolver<'a>,
    settings: AssignerSettings,
}

impl<'a> SlotAssigner<'a> {
    pub fn new(resolver: EligibilityResolver<'a>, settings: AssignerSettings) -> Self {
        Self { resolver, settings }
    }

    /// Place every section in `recommendations` onto a fresh grid.
    pub fn generate(&self, recommendations: &QuarterRecommendations) -> Grid {
        let quarter = recommendations.quarter;
        let mut grid = Grid::new(quarter);
        let mut balance = Balance::default();

        let ordered = self.placement_order(&recommendations.courses);

        info!(
            quarter = %quarter,
            courses = ordered.len(),
            sections = ordered.iter().map(|c| c.sections.len()).sum::<usize>(),
            "=== SlotAssigner::generate() ==="
        );

        for course in ordered {
            if !self.is_offered(&course.course_code, quarter) {
                debug!(course = %course.course_code, quarter = %quarter, "not offered, skipped");
                continue;
            }

            if self.resolver.is_case_by_case(&course.course_code) {
                for section in &course.sections {
                    grid.push_case_by_case(section.clone());
                }
                debug!(
                    course = %course.course_code,
                    sections = course.sections.len(),
                    "case-by-case, kept off the grid"
                );
                continue;
            }

            for section in &course.sections {
                self.place_section(&mut grid, &mut balance, section.clone());
            }
        }

        self.run_evening_check(&mut grid);

        info!(
            quarter = %quarter,
            placed = grid.placed_count(),
            unassigned = grid.unassigned().len(),
            case_by_case = grid.case_by_case().len(),
            mw = balance.day(DayPattern::MW),
            tr = balance.day(DayPattern::TR),
            evening = balance.times.get(&TimeSlot::Evening).copied().unwrap_or(0),
            "=== Placement complete ==="
        );
        grid
    }

    /// Stable sort: exclusive-room courses first, then priority, then level.
    fn placement_order<'r>(&self, courses: &'r [CourseRecommendation]) -> Vec<&'r CourseRecommendation> {
        let mut keyed: Vec<(bool, &CourseRecommendation)> = courses
            .iter()
            .map(|c| (self.resolver.is_exclusive_room_course(&c.course_code), c))
            .collect();
        keyed.sort_by_key(|(exclusive, c)| (!*exclusive, c.priority, c.level));
        keyed.into_iter().map(|(_, c)| c).collect()
    }

    /// Courses missing from the catalog are taken at their word.
    fn is_offered(&self, code: &str, quarter: Quarter) -> bool {
        self.resolver
            .catalog()
            .get(code)
            .map(|c| c.is_offered_in(quarter))
            .unwrap_or(true)
    }

    /// Days the course may use, least-loaded first.
    fn day_order(&self, code: &str, balance: &Balance) -> Vec<DayPattern> {
        let preferred = self.resolver.preferred_days(code);
        let mut days = self.resolver.valid_days(code);
        days.sort_by_key(|d| (balance.day(*d), !preferred.contains(d), *d));
        days
    }

    /// Valid time slots in fixed placement order.
    fn time_order(&self, code: &str) -> Vec<TimeSlot> {
        let valid = self.resolver.valid_time_slots(code);
        TimeSlot::ALL
            .into_iter()
            .filter(|t| valid.contains(t))
            .collect()
    }

    fn place_section(&self, grid: &mut Grid, balance: &mut Balance, section: SectionAssignment) {
        let code = section.course_code.clone();
        let rooms = self.resolver.valid_rooms(&code, &*grid);
        let times = self.time_order(&code);
        let days = self.day_order(&code, balance);

        if rooms.is_empty() {
            warn!(course = %code, section = %section.section, "✗ no eligible room");
            grid.push_unassigned(section, UnassignedReason::NoEligibleRoom);
            return;
        }
        if times.is_empty() || days.is_empty() {
            warn!(course = %code, section = %section.section, "✗ no eligible time");
            grid.push_unassigned(section, UnassignedReason::NoEligibleTime);
            return;
        }

        let store = self.resolver.store();
        let free = days.iter().find_map(|&day| {
            times.iter().find_map(|&time| {
                rooms
                    .iter()
                    .filter(|room| !store.is_time_blocked_in_room(room, time))
                    .map(|room| Slot::new(day, time, room.as_str()))
                    .find(|slot| !grid.is_occupied(slot))
            })
        });

        match free {
            Some(slot) => {
                info!(
                    course = %code,
                    section = %section.section,
                    slot = %slot,
                    faculty = %section.faculty_label(),
                    "✓ placed"
                );
                balance.record(&slot);
                if let Err(section) = grid.place(slot, section) {
                    // found free just above
                    grid.push_unassigned(section, UnassignedReason::RoomConflict { tried_rooms: rooms.len() });
                }
            }
            None => {
                warn!(
                    course = %code,
                    section = %section.section,
                    rooms = rooms.len(),
                    "✗ no free slot, unassigned"
                );
                grid.push_unassigned(
                    section,
                    UnassignedReason::RoomConflict {
                        tried_rooms: rooms.len(),
                    },
                );
            }
        }
    }

    /// The evening rule in force for this run, or `None` when it is disabled.
    pub fn evening_guard(&self) -> Option<EveningGuard> {
        let store = self.resolver.store();
        let rule = store.evening_rule(
            self.settings.evening_cutoff,
            self.settings.minimum_evening_instructors,
        )?;
        Some(EveningGuard {
            evening_slots: TimeSlot::ALL
                .into_iter()
                .filter(|&t| store.is_evening(t, rule.after_time))
                .collect(),
            minimum: rule.minimum_count,
        })
    }

    fn run_evening_check(&self, grid: &mut Grid) {
        let guard = self.evening_guard();
        if guard.is_none() {
            debug!("evening rule disabled, safety check skipped");
        }
        let shortfalls = grid.set_evening_guard(guard);
        for s in &shortfalls {
            warn!(
                quarter = %grid.quarter(),
                day = %s.day,
                evening_sections = s.evening_sections,
                minimum = s.minimum,
                "Evening safety: fewer evening sections than the instructor minimum"
            );
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
