/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Faculty workload accounting.
//!
//! Workload credits are course credits scaled by a per-course multiplier
//! (applied-learning courses count for less than their credit value), plus
//! release-time credits.  The annual view is authoritative; a quarter view
//! compares one quarter against a third of the annual capacity.

pub mod release;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::PlannerError;
use crate::model::{same_course, CourseCatalog, Quarter};
use crate::roster::{FacultyRank, FacultyRoster};
use crate::scheduler::Plan;

use release::{total_annual_credits, validate_allocation, ReleaseAllocation};

/// Instructors missing from the roster are treated as lecturers.
pub const DEFAULT_RANK: FacultyRank = FacultyRank::Lecturer;

/// Capacity assumed for instructors missing from the roster.
pub const DEFAULT_ANNUAL_CAPACITY: f64 = DEFAULT_RANK.annual_capacity();

const OVERLOADED_ABOVE: f64 = 1.0;
const UNDERUTILIZED_BELOW: f64 = 0.6;

/// Built-in workload multipliers for applied-learning courses.
pub fn default_multiplier(code: &str) -> Option<f64> {
    [("DESN 499", 0.2), ("DESN 495", 0.1), ("DESN 491", 0.15)]
        .into_iter()
        .find(|(c, _)| same_course(c, code))
        .map(|(_, m)| m)
}

/// Which total an overload check compares against capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadView {
    Annual,
    Quarter(Quarter),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UtilizationStatus {
    Overloaded,
    Optimal,
    Underutilized,
}

impl UtilizationStatus {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio > OVERLOADED_ABOVE {
            UtilizationStatus::Overloaded
        } else if ratio < UNDERUTILIZED_BELOW {
            UtilizationStatus::Underutilized
        } else {
            UtilizationStatus::Optimal
        }
    }
}

impl fmt::Display for UtilizationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UtilizationStatus::Overloaded => "overloaded",
            UtilizationStatus::Optimal => "optimal",
            UtilizationStatus::Underutilized => "underutilized",
        })
    }
}

/// One recorded teaching assignment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadEntry {
    pub quarter: Quarter,
    pub course_code: Option<String>,
    pub credits: f64,
    pub multiplier: f64,
    pub workload: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacultyLoad {
    pub faculty_name: String,
    pub rank: Option<FacultyRank>,
    pub annual_capacity: f64,
    pub entries: Vec<LoadEntry>,
    pub release_time: Vec<ReleaseAllocation>,
}

impl FacultyLoad {
    fn new(name: &str, rank: Option<FacultyRank>, annual_capacity: f64) -> Self {
        Self {
            faculty_name: name.to_string(),
            rank,
            annual_capacity,
            entries: Vec::new(),
            release_time: Vec::new(),
        }
    }

    pub fn teaching_credits(&self) -> f64 {
        self.entries.iter().map(|e| e.workload).sum()
    }

    pub fn release_credits(&self) -> f64 {
        total_annual_credits(&self.release_time)
    }

    pub fn annual_total(&self) -> f64 {
        self.teaching_credits() + self.release_credits()
    }

    pub fn quarter_total(&self, quarter: Quarter) -> f64 {
        let teaching: f64 = self
            .entries
            .iter()
            .filter(|e| e.quarter == quarter)
            .map(|e| e.workload)
            .sum();
        let release: f64 = self.release_time.iter().map(|a| a.credits_in(quarter)).sum();
        teaching + release
    }

    pub fn quarter_capacity(&self) -> f64 {
        self.annual_capacity / 3.0
    }

    /// Total ÷ capacity for `view`; 0 when capacity is 0.
    pub fn utilization(&self, view: LoadView) -> f64 {
        let (total, capacity) = match view {
            LoadView::Annual => (self.annual_total(), self.annual_capacity),
            LoadView::Quarter(q) => (self.quarter_total(q), self.quarter_capacity()),
        };
        if capacity > 0.0 {
            total / capacity
        } else {
            0.0
        }
    }

    pub fn status(&self, view: LoadView) -> UtilizationStatus {
        UtilizationStatus::from_ratio(self.utilization(view))
    }

    pub fn is_overloaded(&self, view: LoadView) -> bool {
        self.status(view) == UtilizationStatus::Overloaded
    }
}

/// Annual snapshot of one instructor, for reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacultyLoadSummary {
    pub faculty_name: String,
    pub rank: Option<FacultyRank>,
    pub annual_capacity: f64,
    pub teaching_credits: f64,
    pub release_credits: f64,
    pub total_credits: f64,
    pub quarterly: BTreeMap<Quarter, f64>,
    pub utilization: f64,
    pub status: UtilizationStatus,
}

// ── FacultyLoadTracker ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacultyLoadTracker {
    loads: BTreeMap<String, FacultyLoad>,
}

impl FacultyLoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds one load per roster member with rank, capacity and release time.
    pub fn with_roster(roster: &FacultyRoster) -> Self {
        let mut tracker = Self::new();
        for member in &roster.faculty {
            let mut load = FacultyLoad::new(&member.name, Some(member.rank), member.annual_capacity());
            load.release_time = member.release_time.clone();
            tracker.loads.insert(member.name.clone(), load);
        }
        tracker
    }

    fn load_mut(&mut self, faculty: &str) -> &mut FacultyLoad {
        self.loads
            .entry(faculty.to_string())
            .or_insert_with(|| FacultyLoad::new(faculty, None, DEFAULT_ANNUAL_CAPACITY))
    }

    pub fn load(&self, faculty: &str) -> Option<&FacultyLoad> {
        self.loads.get(faculty)
    }

    /// Loads in name order.
    pub fn loads(&self) -> impl Iterator<Item = &FacultyLoad> {
        self.loads.values()
    }

    /// Adds `credits × multiplier` to `faculty`'s `quarter`; returns the
    /// workload added.
    pub fn accumulate(&mut self, faculty: &str, quarter: Quarter, credits: f64, multiplier: f64) -> f64 {
        self.push_entry(faculty, quarter, None, credits, multiplier)
    }

    fn push_entry(
        &mut self,
        faculty: &str,
        quarter: Quarter,
        course_code: Option<&str>,
        credits: f64,
        multiplier: f64,
    ) -> f64 {
        let workload = credits * multiplier;
        self.load_mut(faculty).entries.push(LoadEntry {
            quarter,
            course_code: course_code.map(str::to_string),
            credits,
            multiplier,
            workload,
        });
        workload
    }

    /// Catalog override, else the built-in table, else 1.0.
    pub fn multiplier_for(code: &str, catalog: &CourseCatalog) -> f64 {
        catalog
            .get(code)
            .and_then(|c| c.workload_multiplier)
            .or_else(|| default_multiplier(code))
            .unwrap_or(1.0)
    }

    pub fn record_section(
        &mut self,
        faculty: &str,
        quarter: Quarter,
        course_code: &str,
        credits: u32,
        catalog: &CourseCatalog,
    ) -> f64 {
        let multiplier = Self::multiplier_for(course_code, catalog);
        self.push_entry(faculty, quarter, Some(course_code), f64::from(credits), multiplier)
    }

    /// `false` for instructors the tracker has never seen.
    pub fn is_overloaded(&self, faculty: &str, view: LoadView) -> bool {
        self.loads
            .get(faculty)
            .is_some_and(|l| l.is_overloaded(view))
    }

    /// Validates and records a release-time allocation.  Nothing changes on
    /// error.
    pub fn add_release(&mut self, faculty: &str, allocation: ReleaseAllocation) -> Result<(), PlannerError> {
        let existing = self
            .loads
            .get(faculty)
            .map(|l| l.release_time.as_slice())
            .unwrap_or(&[]);
        validate_allocation(&allocation, existing)?;
        debug!(faculty, id = %allocation.id, credits = allocation.credits, "release time added");
        self.load_mut(faculty).release_time.push(allocation);
        Ok(())
    }

    pub fn remove_release(&mut self, faculty: &str, id: &str) -> Result<ReleaseAllocation, PlannerError> {
        let not_found = || PlannerError::AllocationNotFound {
            faculty: faculty.to_string(),
            id: id.to_string(),
        };
        let load = self.loads.get_mut(faculty).ok_or_else(not_found)?;
        let index = load
            .release_time
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(not_found)?;
        Ok(load.release_time.remove(index))
    }

    /// Workload from every section with a named instructor, wherever it sits
    /// in the plan.
    pub fn from_plan(plan: &Plan, roster: &FacultyRoster, catalog: &CourseCatalog) -> Self {
        let mut tracker = Self::with_roster(roster);
        for grid in plan.grids() {
            for section in grid.all_sections() {
                if let Some(name) = section.instructor() {
                    tracker.record_section(name, grid.quarter(), &section.course_code, section.credits, catalog);
                }
            }
        }

        for load in tracker.loads() {
            if load.is_overloaded(LoadView::Annual) {
                warn!(
                    faculty = %load.faculty_name,
                    total = load.annual_total(),
                    capacity = load.annual_capacity,
                    "Faculty overloaded"
                );
            }
        }
        info!(faculty = tracker.loads.len(), "Faculty loads computed");
        tracker
    }

    pub fn summaries(&self) -> Vec<FacultyLoadSummary> {
        self.loads
            .values()
            .map(|l| FacultyLoadSummary {
                faculty_name: l.faculty_name.clone(),
                rank: l.rank,
                annual_capacity: l.annual_capacity,
                teaching_credits: l.teaching_credits(),
                release_credits: l.release_credits(),
                total_credits: l.annual_total(),
                quarterly: Quarter::ALL
                    .into_iter()
                    .map(|q| (q, l.quarter_total(q)))
                    .filter(|(_, t)| *t > 0.0)
                    .collect(),
                utilization: l.utilization(LoadView::Annual),
                status: l.status(LoadView::Annual),
            })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
