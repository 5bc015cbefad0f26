/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::fmt;

use serde::Serialize;

use crate::model::{DayPattern, Priority, Quarter};

/// What a [`ConflictRecord`] is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictKind {
    FacultyTravel,
    EveningSafety,
    FacultyDoubleBooking,
    DayImbalance,
    AddSection,
    ReduceSection,
    RequiredMissing,
    RoomConstraint,
    TimeConstraint,
    TimeClustering,
    Unassigned,
    PrerequisiteMissing,
    FacultyOverload,
}

impl ConflictKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ConflictKind::FacultyTravel => "faculty-travel",
            ConflictKind::EveningSafety => "evening-safety",
            ConflictKind::FacultyDoubleBooking => "faculty-double-booking",
            ConflictKind::DayImbalance => "day-imbalance",
            ConflictKind::AddSection => "add-section",
            ConflictKind::ReduceSection => "reduce-section",
            ConflictKind::RequiredMissing => "required-missing",
            ConflictKind::RoomConstraint => "room-constraint",
            ConflictKind::TimeConstraint => "time-constraint",
            ConflictKind::TimeClustering => "time-clustering",
            ConflictKind::Unassigned => "unassigned",
            ConflictKind::PrerequisiteMissing => "prerequisite-missing",
            ConflictKind::FacultyOverload => "faculty-overload",
        }
    }
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finding of the audit.  `id` is stable across runs on the same plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConflictRecord {
    pub id: String,
    pub kind: ConflictKind,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<DayPattern>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quarter: Option<Quarter>,
}

impl ConflictRecord {
    pub fn new(
        id: impl Into<String>,
        kind: ConflictKind,
        priority: Priority,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            priority,
            title: title.into(),
            description: description.into(),
            course: None,
            faculty: None,
            day: None,
            quarter: None,
        }
    }

    pub fn with_course(mut self, code: impl Into<String>) -> Self {
        self.course = Some(code.into());
        self
    }

    pub fn with_faculty(mut self, name: impl Into<String>) -> Self {
        self.faculty = Some(name.into());
        self
    }

    pub fn with_day(mut self, day: DayPattern) -> Self {
        self.day = Some(day);
        self
    }

    pub fn with_quarter(mut self, quarter: Quarter) -> Self {
        self.quarter = Some(quarter);
        self
    }
}

impl fmt::Display for ConflictRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.priority, self.title, self.description)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AuditSummary {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuditReport {
    pub conflicts: Vec<ConflictRecord>,
    pub summary: AuditSummary,
}

impl AuditReport {
    pub fn new(conflicts: Vec<ConflictRecord>) -> Self {
        let count = |p: Priority| conflicts.iter().filter(|c| c.priority == p).count();
        let summary = AuditSummary {
            total: conflicts.len(),
            high: count(Priority::High),
            medium: count(Priority::Medium),
            low: count(Priority::Low),
        };
        Self { conflicts, summary }
    }

    pub fn of_kind(&self, kind: ConflictKind) -> impl Iterator<Item = &ConflictRecord> {
        self.conflicts.iter().filter(move |c| c.kind == kind)
    }

    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_by_priority() {
        let report = AuditReport::new(vec![
            ConflictRecord::new("a", ConflictKind::DayImbalance, Priority::Medium, "t", "d"),
            ConflictRecord::new("b", ConflictKind::EveningSafety, Priority::High, "t", "d"),
            ConflictRecord::new("c", ConflictKind::TimeClustering, Priority::Low, "t", "d"),
            ConflictRecord::new("d", ConflictKind::FacultyTravel, Priority::High, "t", "d"),
        ]);
        assert_eq!(
            report.summary,
            AuditSummary {
                total: 4,
                high: 2,
                medium: 1,
                low: 1
            }
        );
        assert_eq!(report.of_kind(ConflictKind::FacultyTravel).count(), 1);
    }

    #[test]
    fn optional_references_are_omitted_from_yaml() {
        let record = ConflictRecord::new("x", ConflictKind::Unassigned, Priority::Medium, "t", "d")
            .with_quarter(Quarter::Fall);
        let yaml = serde_yaml::to_string(&record).unwrap();
        assert!(yaml.contains("quarter: Fall"));
        assert!(yaml.contains("kind: unassigned"));
        assert!(!yaml.contains("faculty"));
    }
}
