/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! coursegrid – constraint-driven course scheduling for quarterly plans
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── model        – courses, slots, quarters, section assignments
//! ├── rules/       – ConstraintStore + EligibilityResolver
//! ├── demand/      – enrollment history, prerequisite graph, DemandEstimator
//! ├── roster       – faculty ranks, capacities, teaching history
//! ├── planner/     – per-quarter section recommendations
//! ├── scheduler/   – SlotAssigner, Grid, move/swap, evening safety flag
//! ├── audit/       – ConflictAuditor
//! ├── workload/    – FacultyLoadTracker + release time
//! ├── session      – PlanningSession (one build-and-edit cycle)
//! ├── config/      – settings + YAML document loading
//! └── error        – PlannerError
//! ```

pub mod audit;
pub mod config;
pub mod demand;
pub mod error;
pub mod model;
pub mod planner;
pub mod roster;
pub mod rules;
pub mod scheduler;
pub mod session;
pub mod workload;
