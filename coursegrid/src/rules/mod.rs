/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Scheduling rules document and the [`ConstraintStore`] that answers
//! questions about it.
//!
//! The expected YAML structure is:
//! ```yaml
//! campuses:
//!   - id: catalyst
//!     rooms: ["206", "209", "210", "212"]
//!   - id: cheney
//!     rooms: ["CEB 102", "CEB 104"]
//!     blocked_time_slots: [evening]
//! time_slots:
//!   morning:   { start: "10:00", end: "12:20" }
//! course_constraints:
//!   - id: room-212-studio
//!     courses: ["DESN 301", "DESN 359", "DESN 401"]
//!     room_restriction:
//!       allowed_rooms: ["212"]
//!       overflow_rooms: ["210"]
//!   - id: itgs-cheney
//!     pattern: "ITGS"
//!     time_restriction: { blocked_slots: [evening] }
//! faculty_constraints:
//!   - id: travel
//!     rule: no-back-to-back-different-campus
//!   - id: evening-pair
//!     rule: minimum-instructors-evening
//!     after_time: "16:00"
//!     minimum_count: 2
//! room_constraints:
//!   - id: lab-only
//!     type: exclude-from-grid
//!     room: "209"
//! case_by_case:
//!   courses: ["DESN 499", "DESN 495"]
//! ```
//!
//! Campuses are a list (not a map) so the room universe has a stable,
//! document-defined order.

pub mod eligibility;

pub use eligibility::{
    EligibilityResolver, NoOccupancy, RoomOccupancy, Validation, Violation, ViolationKind,
};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::model::{normalize_code, same_course, ClockTime, DayPattern, TimeSlot, TimeWindow};

// ── Campuses ──────────────────────────────────────────────────────────────────

/// A campus and the grid rooms it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campus {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rooms: Vec<String>,
    /// Time slots no section may use in this campus's rooms.
    #[serde(default)]
    pub blocked_time_slots: Vec<TimeSlot>,
}

impl Campus {
    fn new(id: &str, name: &str, rooms: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            rooms: rooms.iter().map(|r| r.to_string()).collect(),
            blocked_time_slots: Vec::new(),
        }
    }

    /// Campus layout used when no rules document (or no campus list) is
    /// available.
    pub fn fallback_campuses() -> Vec<Campus> {
        vec![
            Campus::new("catalyst", "Catalyst (Spokane)", &["206", "209", "210", "212"]),
            Campus::new("cheney", "Cheney", &["CEB 102", "CEB 104"]),
        ]
    }
}

// ── Course constraints ────────────────────────────────────────────────────────

/// How a course constraint selects the courses it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CourseMatcher {
    /// Exact course codes.
    List(Vec<String>),
    /// Code prefix, e.g. `"ITGS"`.
    Prefix(String),
    /// Neither list nor pattern given; matches nothing.
    Nothing,
}

impl CourseMatcher {
    pub fn matches(&self, code: &str) -> bool {
        match self {
            CourseMatcher::List(codes) => codes.iter().any(|c| same_course(c, code)),
            CourseMatcher::Prefix(prefix) => {
                normalize_code(code).starts_with(&normalize_code(prefix))
            }
            CourseMatcher::Nothing => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRestriction {
    #[serde(default)]
    pub allowed_rooms: Vec<String>,
    /// Appended to `allowed_rooms` only once those are heuristically full.
    #[serde(default)]
    pub overflow_rooms: Vec<String>,
    /// Used when `allowed_rooms` is empty.
    #[serde(default)]
    pub campus: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRestriction {
    #[serde(default)]
    pub blocked_slots: Vec<TimeSlot>,
}

/// Raw YAML shape of a course constraint; `courses` and `pattern` are folded
/// into a single [`CourseMatcher`].
#[derive(Debug, Serialize, Deserialize)]
struct CourseConstraintEntry {
    id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    courses: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pattern: Option<String>,
    #[serde(default = "enabled_by_default")]
    enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    room_restriction: Option<RoomRestriction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time_restriction: Option<TimeRestriction>,
}

fn enabled_by_default() -> bool {
    true
}

/// A per-course rule from the rules document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "CourseConstraintEntry", from = "CourseConstraintEntry")]
pub struct CourseConstraint {
    pub id: String,
    pub description: String,
    pub matcher: CourseMatcher,
    pub enabled: bool,
    pub room_restriction: Option<RoomRestriction>,
    pub time_restriction: Option<TimeRestriction>,
}

impl From<CourseConstraintEntry> for CourseConstraint {
    fn from(e: CourseConstraintEntry) -> Self {
        // An explicit list wins over a pattern when both are present.
        let matcher = match (e.courses, e.pattern) {
            (Some(list), _) => CourseMatcher::List(list),
            (None, Some(prefix)) => CourseMatcher::Prefix(prefix),
            (None, None) => CourseMatcher::Nothing,
        };
        Self {
            id: e.id,
            description: e.description,
            matcher,
            enabled: e.enabled,
            room_restriction: e.room_restriction,
            time_restriction: e.time_restriction,
        }
    }
}

impl From<CourseConstraint> for CourseConstraintEntry {
    fn from(c: CourseConstraint) -> Self {
        let (courses, pattern) = match c.matcher {
            CourseMatcher::List(list) => (Some(list), None),
            CourseMatcher::Prefix(prefix) => (None, Some(prefix)),
            CourseMatcher::Nothing => (None, None),
        };
        Self {
            id: c.id,
            description: c.description,
            courses,
            pattern,
            enabled: c.enabled,
            room_restriction: c.room_restriction,
            time_restriction: c.time_restriction,
        }
    }
}

impl CourseConstraint {
    pub fn applies_to(&self, code: &str) -> bool {
        self.enabled && self.matcher.matches(code)
    }
}

// ── Faculty constraints ───────────────────────────────────────────────────────

/// Which check a faculty rule drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FacultyRuleKind {
    NoBackToBackDifferentCampus,
    MinimumInstructorsEvening,
}

/// A faculty rule and its parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FacultyRule {
    /// An instructor may not teach consecutive slots on different campuses.
    NoBackToBackDifferentCampus,
    /// At least `minimum_count` distinct instructors on site at/after
    /// `after_time` on any day with evening teaching.
    MinimumInstructorsEvening {
        after_time: ClockTime,
        minimum_count: u32,
    },
    /// Unrecognised rule name.  Kept so the document round-trips, never
    /// evaluated.
    Other(String),
}

impl FacultyRule {
    pub fn kind(&self) -> Option<FacultyRuleKind> {
        match self {
            FacultyRule::NoBackToBackDifferentCampus => {
                Some(FacultyRuleKind::NoBackToBackDifferentCampus)
            }
            FacultyRule::MinimumInstructorsEvening { .. } => {
                Some(FacultyRuleKind::MinimumInstructorsEvening)
            }
            FacultyRule::Other(_) => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct FacultyConstraintEntry {
    id: String,
    rule: String,
    #[serde(default = "enabled_by_default")]
    enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    after_time: Option<ClockTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    minimum_count: Option<u32>,
}

/// Default evening cutoff when a rule omits `after_time`.
pub const DEFAULT_EVENING_CUTOFF: ClockTime = ClockTime::new(16, 0);

/// Default instructor minimum when a rule omits `minimum_count`.
pub const DEFAULT_MIN_EVENING_INSTRUCTORS: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "FacultyConstraintEntry", from = "FacultyConstraintEntry")]
pub struct FacultyConstraint {
    pub id: String,
    pub enabled: bool,
    pub rule: FacultyRule,
}

impl From<FacultyConstraintEntry> for FacultyConstraint {
    fn from(e: FacultyConstraintEntry) -> Self {
        let rule = match e.rule.as_str() {
            "no-back-to-back-different-campus" => FacultyRule::NoBackToBackDifferentCampus,
            "minimum-instructors-evening" => FacultyRule::MinimumInstructorsEvening {
                after_time: e.after_time.unwrap_or(DEFAULT_EVENING_CUTOFF),
                minimum_count: e.minimum_count.unwrap_or(DEFAULT_MIN_EVENING_INSTRUCTORS),
            },
            _ => FacultyRule::Other(e.rule),
        };
        Self {
            id: e.id,
            enabled: e.enabled,
            rule,
        }
    }
}

impl From<FacultyConstraint> for FacultyConstraintEntry {
    fn from(c: FacultyConstraint) -> Self {
        let (rule, after_time, minimum_count) = match c.rule {
            FacultyRule::NoBackToBackDifferentCampus => {
                ("no-back-to-back-different-campus".to_owned(), None, None)
            }
            FacultyRule::MinimumInstructorsEvening {
                after_time,
                minimum_count,
            } => (
                "minimum-instructors-evening".to_owned(),
                Some(after_time),
                Some(minimum_count),
            ),
            FacultyRule::Other(name) => (name, None, None),
        };
        Self {
            id: c.id,
            rule,
            enabled: c.enabled,
            after_time,
            minimum_count,
        }
    }
}

/// Lookup result for a faculty rule kind.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleState<'a> {
    /// First enabled constraint of this kind.
    Enabled(&'a FacultyConstraint),
    /// Present in the document, but every instance is disabled.
    Disabled,
    /// Not mentioned in the document at all.
    Absent,
}

/// Effective parameters of the evening-instructor rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EveningRule {
    pub after_time: ClockTime,
    pub minimum_count: u32,
}

// ── Room constraints ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoomConstraintKind {
    /// `room` is dedicated to `allowed_courses`.
    RoomAssignment,
    /// `room` is never offered by the grid.
    ExcludeFromGrid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConstraint {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RoomConstraintKind,
    pub room: String,
    #[serde(default)]
    pub allowed_courses: Vec<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl RoomConstraint {
    pub fn excluded_from_grid(&self) -> bool {
        self.enabled && self.kind == RoomConstraintKind::ExcludeFromGrid
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseByCaseList {
    #[serde(default)]
    pub courses: Vec<String>,
}

// ── SchedulingRules ───────────────────────────────────────────────────────────

/// The parsed scheduling rules document.  Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchedulingRules {
    #[serde(default)]
    pub campuses: Vec<Campus>,
    #[serde(default)]
    pub time_slots: BTreeMap<TimeSlot, TimeWindow>,
    #[serde(default)]
    pub course_constraints: Vec<CourseConstraint>,
    #[serde(default)]
    pub faculty_constraints: Vec<FacultyConstraint>,
    #[serde(default)]
    pub room_constraints: Vec<RoomConstraint>,
    #[serde(default)]
    pub case_by_case: CaseByCaseList,
}

// ── ConstraintStore ───────────────────────────────────────────────────────────

/// Read-only view over one [`SchedulingRules`] document.
///
/// Owned by the planning session; created once per session.  The only
/// mutation is [`set_constraint_enabled`](Self::set_constraint_enabled), which
/// callers use between generation runs.
#[derive(Debug, Clone)]
pub struct ConstraintStore {
    rules: SchedulingRules,
}

impl ConstraintStore {
    /// Wraps `rules`, substituting the fallback campus layout when the
    /// document defines no campuses.
    pub fn new(mut rules: SchedulingRules) -> Self {
        if rules.campuses.is_empty() {
            warn!("Rules document defines no campuses, using fallback room layout");
            rules.campuses = Campus::fallback_campuses();
        }
        info!(
            campuses = rules.campuses.len(),
            course_constraints = rules.course_constraints.len(),
            faculty_constraints = rules.faculty_constraints.len(),
            room_constraints = rules.room_constraints.len(),
            case_by_case = rules.case_by_case.courses.len(),
            "Constraint store initialised"
        );
        Self { rules }
    }

    pub fn rules(&self) -> &SchedulingRules {
        &self.rules
    }

    pub fn campuses(&self) -> &[Campus] {
        &self.rules.campuses
    }

    /// Every campus room in document order.
    pub fn all_rooms(&self) -> Vec<String> {
        self.rules
            .campuses
            .iter()
            .flat_map(|c| c.rooms.iter().cloned())
            .collect()
    }

    /// [`all_rooms`](Self::all_rooms) minus rooms excluded from the grid.
    pub fn available_rooms(&self) -> Vec<String> {
        let excluded: Vec<&str> = self
            .rules
            .room_constraints
            .iter()
            .filter(|rc| rc.excluded_from_grid())
            .map(|rc| rc.room.as_str())
            .collect();
        self.all_rooms()
            .into_iter()
            .filter(|room| !excluded.contains(&room.as_str()))
            .collect()
    }

    pub fn rooms_for_campus(&self, campus_id: &str) -> Vec<String> {
        self.rules
            .campuses
            .iter()
            .find(|c| c.id == campus_id)
            .map(|c| c.rooms.clone())
            .unwrap_or_default()
    }

    pub fn campus_for_room(&self, room: &str) -> Option<&Campus> {
        self.rules
            .campuses
            .iter()
            .find(|c| c.rooms.iter().any(|r| r == room))
    }

    /// Campus id for `room`; `"unknown"` for rooms outside every campus.
    pub fn campus_id_for_room(&self, room: &str) -> &str {
        self.campus_for_room(room)
            .map(|c| c.id.as_str())
            .unwrap_or("unknown")
    }

    /// `true` when `room`'s campus blocks `time`.
    pub fn is_time_blocked_in_room(&self, room: &str, time: TimeSlot) -> bool {
        self.campus_for_room(room)
            .map(|c| c.blocked_time_slots.contains(&time))
            .unwrap_or(false)
    }

    /// Time slots the document defines, in canonical order.  All three when
    /// the document is silent.
    pub fn time_slots(&self) -> Vec<TimeSlot> {
        if self.rules.time_slots.is_empty() {
            TimeSlot::ALL.to_vec()
        } else {
            // BTreeMap over TimeSlot iterates in canonical order
            self.rules.time_slots.keys().copied().collect()
        }
    }

    pub fn day_patterns(&self) -> &'static [DayPattern] {
        &DayPattern::ALL
    }

    pub fn time_window(&self, slot: TimeSlot) -> TimeWindow {
        self.rules
            .time_slots
            .get(&slot)
            .copied()
            .unwrap_or_else(|| slot.default_window())
    }

    /// A slot is an evening slot when it starts at or after `cutoff`.
    pub fn is_evening(&self, slot: TimeSlot, cutoff: ClockTime) -> bool {
        self.time_window(slot).start >= cutoff
    }

    /// Enabled course constraints that match `code`, in document order.
    pub fn course_constraints_for<'a>(
        &'a self,
        code: &'a str,
    ) -> impl Iterator<Item = &'a CourseConstraint> + 'a {
        self.rules
            .course_constraints
            .iter()
            .filter(move |c| c.applies_to(code))
    }

    /// Enabled `room-assignment` constraint naming `code`, if any.
    pub fn assigned_room_for(&self, code: &str) -> Option<&str> {
        self.rules
            .room_constraints
            .iter()
            .filter(|rc| rc.enabled && rc.kind == RoomConstraintKind::RoomAssignment)
            .find(|rc| rc.allowed_courses.iter().any(|c| same_course(c, code)))
            .map(|rc| rc.room.as_str())
    }

    pub fn in_case_by_case_list(&self, code: &str) -> bool {
        self.rules
            .case_by_case
            .courses
            .iter()
            .any(|c| same_course(c, code))
    }

    pub fn faculty_rule(&self, kind: FacultyRuleKind) -> RuleState<'_> {
        let mut seen = false;
        for fc in &self.rules.faculty_constraints {
            if fc.rule.kind() != Some(kind) {
                continue;
            }
            if fc.enabled {
                return RuleState::Enabled(fc);
            }
            seen = true;
        }
        if seen {
            RuleState::Disabled
        } else {
            RuleState::Absent
        }
    }

    /// Parameters of the evening-instructor rule: the enabled rule's own, the
    /// given defaults when the document never mentions it, `None` when it is
    /// disabled.
    pub fn evening_rule(&self, default_after: ClockTime, default_minimum: u32) -> Option<EveningRule> {
        match self.faculty_rule(FacultyRuleKind::MinimumInstructorsEvening) {
            RuleState::Enabled(FacultyConstraint {
                rule:
                    FacultyRule::MinimumInstructorsEvening {
                        after_time,
                        minimum_count,
                    },
                ..
            }) => Some(EveningRule {
                after_time: *after_time,
                minimum_count: *minimum_count,
            }),
            RuleState::Disabled => None,
            _ => Some(EveningRule {
                after_time: default_after,
                minimum_count: default_minimum,
            }),
        }
    }

    /// `false` only when the travel rule is present and disabled.
    pub fn travel_rule_active(&self) -> bool {
        self.faculty_rule(FacultyRuleKind::NoBackToBackDifferentCampus) != RuleState::Disabled
    }

    /// Toggle any course, faculty or room constraint by id.  Returns `false`
    /// when no constraint carries `id`.
    pub fn set_constraint_enabled(&mut self, id: &str, enabled: bool) -> bool {
        let rules = &mut self.rules;
        let course = rules.course_constraints.iter_mut().map(|c| (&c.id, &mut c.enabled));
        let faculty = rules.faculty_constraints.iter_mut().map(|c| (&c.id, &mut c.enabled));
        let room = rules.room_constraints.iter_mut().map(|c| (&c.id, &mut c.enabled));
        let slot = course
            .chain(faculty)
            .chain(room)
            .find(|(cid, _)| cid.as_str() == id)
            .map(|(_, flag)| flag);

        match slot {
            Some(flag) => {
                *flag = enabled;
                debug!(id, enabled, "constraint toggled");
                true
            }
            None => false,
        }
    }
}

impl Default for ConstraintStore {
    fn default() -> Self {
        Self::new(SchedulingRules::default())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
