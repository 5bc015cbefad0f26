/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Release-time allocations: non-teaching duties credited toward a faculty
//! member's workload.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{FieldViolation, PlannerError};
use crate::model::Quarter;

/// Upper bound on one faculty member's release credits per academic year.
pub const MAX_ANNUAL_RELEASE_CREDITS: f64 = 45.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseCategory {
    Sabbatical,
    Chair,
    Advising,
    Committee,
    Coordinator,
    Research,
    CourseRelease,
    IndependentStudy,
    AppliedLearning,
    Other,
}

impl ReleaseCategory {
    /// Typical maximum credits for one allocation of this category.
    pub fn max_credits(self) -> f64 {
        match self {
            ReleaseCategory::Sabbatical => 45.0,
            ReleaseCategory::Chair => 15.0,
            ReleaseCategory::Advising => 10.0,
            ReleaseCategory::Committee => 6.0,
            ReleaseCategory::Coordinator => 10.0,
            ReleaseCategory::Research => 15.0,
            ReleaseCategory::CourseRelease => 15.0,
            ReleaseCategory::IndependentStudy => 15.0,
            ReleaseCategory::AppliedLearning => 15.0,
            ReleaseCategory::Other => 10.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReleaseCategory::Sabbatical => "Sabbatical",
            ReleaseCategory::Chair => "Chair Duties",
            ReleaseCategory::Advising => "Advising",
            ReleaseCategory::Committee => "Committee Work",
            ReleaseCategory::Coordinator => "Coordinator",
            ReleaseCategory::Research => "Research/Grants",
            ReleaseCategory::CourseRelease => "Course Release",
            ReleaseCategory::IndependentStudy => "Independent Study (499)",
            ReleaseCategory::AppliedLearning => "Applied Learning (495)",
            ReleaseCategory::Other => "Other",
        }
    }
}

impl fmt::Display for ReleaseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `credits` are granted in every quarter listed in `quarters`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseAllocation {
    pub id: String,
    pub category: ReleaseCategory,
    pub credits: f64,
    #[serde(default = "academic_quarters")]
    pub quarters: Vec<Quarter>,
    #[serde(default)]
    pub description: String,
}

fn academic_quarters() -> Vec<Quarter> {
    Quarter::ACADEMIC.to_vec()
}

impl ReleaseAllocation {
    pub fn annual_credits(&self) -> f64 {
        self.credits * self.quarters.len() as f64
    }

    /// Credits in `quarter`: counted once if the quarter is listed.
    pub fn credits_in(&self, quarter: Quarter) -> f64 {
        if self.quarters.contains(&quarter) {
            self.credits
        } else {
            0.0
        }
    }
}

pub fn total_annual_credits(allocations: &[ReleaseAllocation]) -> f64 {
    allocations.iter().map(ReleaseAllocation::annual_credits).sum()
}

/// Checks `candidate` against the faculty member's `existing` allocations
/// (which must not include `candidate` itself).  Every failing field is
/// reported.  Going over the category's typical maximum is only logged.
pub fn validate_allocation(
    candidate: &ReleaseAllocation,
    existing: &[ReleaseAllocation],
) -> Result<(), PlannerError> {
    let mut violations = Vec::new();

    if candidate.id.trim().is_empty() {
        violations.push(FieldViolation::new("id", "must not be empty"));
    } else if existing.iter().any(|a| a.id == candidate.id) {
        violations.push(FieldViolation::new(
            "id",
            format!("'{}' is already allocated", candidate.id),
        ));
    }

    if !candidate.credits.is_finite() || candidate.credits <= 0.0 {
        violations.push(FieldViolation::new("credits", "must be a positive number"));
    }

    if candidate.quarters.is_empty() {
        violations.push(FieldViolation::new("quarters", "must list at least one quarter"));
    } else {
        let mut seen = Vec::with_capacity(candidate.quarters.len());
        for q in &candidate.quarters {
            if seen.contains(q) {
                violations.push(FieldViolation::new("quarters", format!("{q} listed twice")));
            }
            seen.push(*q);
        }
    }

    if violations.iter().all(|v| v.field != "credits") {
        let total = total_annual_credits(existing) + candidate.annual_credits();
        if total > MAX_ANNUAL_RELEASE_CREDITS {
            violations.push(FieldViolation::new(
                "credits",
                format!(
                    "annual release time would be {total} credits (maximum {MAX_ANNUAL_RELEASE_CREDITS})"
                ),
            ));
        }
        if candidate.credits > candidate.category.max_credits() {
            warn!(
                id = %candidate.id,
                category = %candidate.category,
                credits = candidate.credits,
                max = candidate.category.max_credits(),
                "Release credits exceed the typical maximum for this category"
            );
        }
    }

    PlannerError::check("release_time", violations)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn alloc(id: &str, category: ReleaseCategory, credits: f64, quarters: &[Quarter]) -> ReleaseAllocation {
        ReleaseAllocation {
            id: id.into(),
            category,
            credits,
            quarters: quarters.to_vec(),
            description: String::new(),
        }
    }

    #[test]
    fn annual_credits_multiply_by_quarters() {
        let a = alloc("chair", ReleaseCategory::Chair, 5.0, &Quarter::ACADEMIC);
        assert_eq!(a.annual_credits(), 15.0);
        assert_eq!(a.credits_in(Quarter::Winter), 5.0);
        assert_eq!(a.credits_in(Quarter::Summer), 0.0);
    }

    #[test]
    fn valid_allocation_passes() {
        let a = alloc("adv", ReleaseCategory::Advising, 2.0, &[Quarter::Fall]);
        assert!(validate_allocation(&a, &[]).is_ok());
    }

    #[test]
    fn every_bad_field_is_reported() {
        let a = alloc("", ReleaseCategory::Other, -1.0, &[]);
        let err = validate_allocation(&a, &[]).unwrap_err();
        let PlannerError::InvalidInput { violations, .. } = err else {
            panic!("expected InvalidInput");
        };
        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["id", "credits", "quarters"]);
    }

    #[test]
    fn annual_cap_counts_existing_allocations() {
        let existing = vec![alloc("sab", ReleaseCategory::Sabbatical, 10.0, &Quarter::ACADEMIC)];
        let extra = alloc("chair", ReleaseCategory::Chair, 10.0, &[Quarter::Fall, Quarter::Winter]);
        let err = validate_allocation(&extra, &existing).unwrap_err();
        assert!(err.to_string().contains("annual release time would be 50"));
    }

    #[test]
    fn duplicate_id_and_quarter_rejected() {
        let existing = vec![alloc("x", ReleaseCategory::Committee, 1.0, &[Quarter::Fall])];
        let dup = alloc("x", ReleaseCategory::Committee, 1.0, &[Quarter::Fall, Quarter::Fall]);
        let err = validate_allocation(&dup, &existing).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("already allocated"));
        assert!(msg.contains("Fall listed twice"));
    }

    #[test]
    fn category_parses_from_snake_case() {
        let a: ReleaseAllocation =
            serde_yaml::from_str("id: r1\ncategory: course_release\ncredits: 5\n").unwrap();
        assert_eq!(a.category, ReleaseCategory::CourseRelease);
        assert_eq!(a.quarters, Quarter::ACADEMIC.to_vec());
    }
}
