/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Core planning data structures shared by every stage of the pipeline.
//!
//! ```text
//! CourseCatalog ──► recommendations ──► SlotAssigner ──► Grid ──► ConflictAuditor
//!      ↑ read-only input                   places SectionAssignment at Slot
//! ```
//!
//! Every enumerated concept (day pattern, time slot, quarter, priority) is a
//! typed enum rather than a display string, so there is exactly one way to say
//! "evening" anywhere in the crate.  The `ALL` constants are the canonical
//! iteration orders used by the greedy placement; never iterate a hash map
//! where order matters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Day patterns ──────────────────────────────────────────────────────────────

/// Weekly meeting pattern of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayPattern {
    /// Monday / Wednesday.
    MW,
    /// Tuesday / Thursday.
    TR,
}

impl DayPattern {
    /// Canonical order: MW before TR.
    pub const ALL: [DayPattern; 2] = [DayPattern::MW, DayPattern::TR];

    pub fn as_str(self) -> &'static str {
        match self {
            DayPattern::MW => "MW",
            DayPattern::TR => "TR",
        }
    }
}

impl fmt::Display for DayPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Clock time ────────────────────────────────────────────────────────────────

/// A wall-clock time of day with minute resolution (`"16:00"`).
///
/// Serialised as the `HH:MM` string so YAML documents stay human readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    minutes: u16,
}

/// Returned when a `HH:MM` string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid clock time '{0}' (expected HH:MM, 00:00–23:59)")]
pub struct ClockTimeError(pub String);

impl ClockTime {
    pub const fn new(hour: u16, minute: u16) -> Self {
        Self {
            minutes: hour * 60 + minute,
        }
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> u16 {
        self.minutes
    }

    pub fn parse(s: &str) -> Result<Self, ClockTimeError> {
        let err = || ClockTimeError(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(err)?;
        let hour: u16 = h.parse().map_err(|_| err())?;
        let minute: u16 = m.parse().map_err(|_| err())?;
        if hour > 23 || minute > 59 {
            return Err(err());
        }
        Ok(Self::new(hour, minute))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes / 60, self.minutes % 60)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ClockTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ClockTime::parse(&value)
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

/// Start and end of a teaching window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: ClockTime,
    pub end: ClockTime,
}

// ── Time slots ────────────────────────────────────────────────────────────────

/// One of the three fixed daily teaching windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
}

impl TimeSlot {
    /// Fixed placement priority: daytime before evening.
    pub const ALL: [TimeSlot; 3] = [TimeSlot::Morning, TimeSlot::Afternoon, TimeSlot::Evening];

    pub fn as_str(self) -> &'static str {
        match self {
            TimeSlot::Morning => "morning",
            TimeSlot::Afternoon => "afternoon",
            TimeSlot::Evening => "evening",
        }
    }

    /// Window used when the rules document does not define one.
    pub fn default_window(self) -> TimeWindow {
        match self {
            TimeSlot::Morning => TimeWindow {
                start: ClockTime::new(10, 0),
                end: ClockTime::new(12, 20),
            },
            TimeSlot::Afternoon => TimeWindow {
                start: ClockTime::new(13, 0),
                end: ClockTime::new(15, 20),
            },
            TimeSlot::Evening => TimeWindow {
                start: ClockTime::new(16, 0),
                end: ClockTime::new(18, 20),
            },
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Quarters ──────────────────────────────────────────────────────────────────

/// Academic quarter.  Declaration order is the order within one academic
/// year (Fall starts the year), which `Ord` relies on for sequencing checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quarter {
    Fall,
    Winter,
    Spring,
    Summer,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [
        Quarter::Fall,
        Quarter::Winter,
        Quarter::Spring,
        Quarter::Summer,
    ];

    /// The three regular teaching quarters.
    pub const ACADEMIC: [Quarter; 3] = [Quarter::Fall, Quarter::Winter, Quarter::Spring];

    pub fn as_str(self) -> &'static str {
        match self {
            Quarter::Fall => "Fall",
            Quarter::Winter => "Winter",
            Quarter::Spring => "Spring",
            Quarter::Summer => "Summer",
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by [`Quarter::from_str`] for an unrecognised name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown quarter '{0}' (valid: Fall, Winter, Spring, Summer)")]
pub struct QuarterParseError(pub String);

impl FromStr for Quarter {
    type Err = QuarterParseError;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Quarter::ALL
            .into_iter()
            .find(|q| q.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| QuarterParseError(s.to_string()))
    }
}

// ── Priority ──────────────────────────────────────────────────────────────────

/// Scheduling / conflict priority.  `Ord` sorts `High` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        })
    }
}

// ── Slot ──────────────────────────────────────────────────────────────────────

/// One cell of the Day × Time × Room grid.  Identity is the whole triple.
///
/// Field order matters: the derived `Ord` sorts by day, then time, then room,
/// which is the order grids are reported in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub day: DayPattern,
    pub time: TimeSlot,
    pub room: String,
}

impl Slot {
    pub fn new(day: DayPattern, time: TimeSlot, room: impl Into<String>) -> Self {
        Self {
            day,
            time,
            room: room.into(),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.day, self.time, self.room)
    }
}

// ── Sections ──────────────────────────────────────────────────────────────────

/// Identity of one section of one course (`DESN 301` / `002`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SectionId {
    pub course_code: String,
    pub section: String,
}

impl SectionId {
    pub fn new(course_code: impl Into<String>, section: impl Into<String>) -> Self {
        Self {
            course_code: course_code.into(),
            section: section.into(),
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.course_code, self.section)
    }
}

/// Formats a 1-based section number as the registrar does (`1` → `"001"`).
pub fn section_label(number: usize) -> String {
    format!("{number:03}")
}

/// A section as it sits in a grid cell or bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionAssignment {
    pub course_code: String,
    pub section: String,
    /// `None` means "TBD" – nobody assigned yet.
    #[serde(default)]
    pub faculty_name: Option<String>,
    pub credits: u32,
    pub predicted_demand: u32,
    /// Set by the evening-safety post-check.  Advisory only.
    #[serde(default)]
    pub safety_warning: bool,
}

impl SectionAssignment {
    pub fn id(&self) -> SectionId {
        SectionId::new(self.course_code.clone(), self.section.clone())
    }

    pub fn is(&self, id: &SectionId) -> bool {
        self.course_code == id.course_code && self.section == id.section
    }

    /// Faculty name for display; `"TBD"` when unassigned.
    pub fn faculty_label(&self) -> &str {
        self.instructor().unwrap_or("TBD")
    }

    /// The assigned instructor.  A blank name or a literal `"TBD"` counts as
    /// unassigned.
    pub fn instructor(&self) -> Option<&str> {
        self.faculty_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty() && !name.eq_ignore_ascii_case("TBD"))
    }
}

// ── Course catalog ────────────────────────────────────────────────────────────

fn default_credits() -> u32 {
    5
}

fn default_enrollment_cap() -> u32 {
    24
}

fn default_quarters() -> Vec<Quarter> {
    Quarter::ACADEMIC.to_vec()
}

/// One catalog entry with every per-course override made explicit.
///
/// Empty lists / `None` mean "no override": the eligibility resolver falls
/// through to the rules document and then to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub code: String,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_credits")]
    pub credits: u32,
    #[serde(default = "default_enrollment_cap")]
    pub default_enrollment_cap: u32,
    #[serde(default = "default_quarters")]
    pub quarters_offered: Vec<Quarter>,
    #[serde(default)]
    pub preferred_times: Vec<TimeSlot>,
    #[serde(default)]
    pub preferred_days: Vec<DayPattern>,
    #[serde(default)]
    pub allowed_rooms: Vec<String>,
    #[serde(default)]
    pub allowed_campus: Option<String>,
    #[serde(default)]
    pub room_constraint_hard: bool,
    #[serde(default)]
    pub time_constraint_hard: bool,
    #[serde(default)]
    pub is_case_by_case: bool,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    /// Must appear in every planned quarter it is offered in.
    #[serde(default)]
    pub required: bool,
    /// 100/200/300/400.  Derived from the course number when absent.
    #[serde(default)]
    pub level: Option<u32>,
    /// Overrides the workload multiplier table for this course.
    #[serde(default)]
    pub workload_multiplier: Option<f64>,
}

impl Course {
    /// Minimal entry with catalog defaults, mostly useful for tests and
    /// programmatic catalog construction.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            title: String::new(),
            credits: default_credits(),
            default_enrollment_cap: default_enrollment_cap(),
            quarters_offered: default_quarters(),
            preferred_times: Vec::new(),
            preferred_days: Vec::new(),
            allowed_rooms: Vec::new(),
            allowed_campus: None,
            room_constraint_hard: false,
            time_constraint_hard: false,
            is_case_by_case: false,
            prerequisites: Vec::new(),
            required: false,
            level: None,
            workload_multiplier: None,
        }
    }

    pub fn level(&self) -> u32 {
        self.level.unwrap_or_else(|| course_level_from_code(&self.code))
    }

    pub fn is_offered_in(&self, quarter: Quarter) -> bool {
        self.quarters_offered.contains(&quarter)
    }
}

/// `"DESN 301"` → 300.  Codes without a digit are level 0.
pub fn course_level_from_code(code: &str) -> u32 {
    code.chars()
        .find_map(|c| c.to_digit(10))
        .map(|d| d * 100)
        .unwrap_or(0)
}

/// Canonical form of a course code: upper case, single space between the
/// subject and the number (`"desn-216"` → `"DESN 216"`).
pub fn normalize_code(code: &str) -> String {
    code.split(|c: char| c.is_whitespace() || c == '-')
        .filter(|part| !part.is_empty())
        .map(|part| part.to_ascii_uppercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Same course regardless of spacing, hyphenation or case.
pub fn same_course(a: &str, b: &str) -> bool {
    normalize_code(a) == normalize_code(b)
}

/// The course catalog, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseCatalog {
    #[serde(default)]
    pub courses: Vec<Course>,
}

impl CourseCatalog {
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }

    pub fn get(&self, code: &str) -> Option<&Course> {
        self.courses.iter().find(|c| same_course(&c.code, code))
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
