/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error types for the planning core.
//!
//! Expected planning outcomes are *not* errors here:
//!
//! * a proposed placement that breaks a rule is a
//!   [`Validation`](crate::rules::Validation) value;
//! * a section that finds no free slot lands in the grid's unassigned bucket
//!   with an [`UnassignedReason`](crate::scheduler::UnassignedReason).
//!
//! [`PlannerError`] is reserved for caller mistakes: malformed arguments to a
//! mutating operation.  Every variant guarantees that nothing was mutated.

use std::fmt;

use thiserror::Error;

// ── Field-level violations ────────────────────────────────────────────────────

/// One rejected argument field, with a human-readable explanation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

// ── PlannerError ──────────────────────────────────────────────────────────────

/// Errors returned by mutating operations (grid moves, release-time edits).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlannerError {
    /// One or more arguments were malformed.  `violations` lists every field
    /// that failed, not just the first.
    #[error("invalid input to {operation}: {}", join_violations(.violations))]
    InvalidInput {
        operation: &'static str,
        violations: Vec<FieldViolation>,
    },

    /// The section is not at the location the caller said it was.
    #[error("section '{section}' not found at {location}")]
    SectionNotFound { section: String, location: String },

    /// A release-time allocation id does not exist for this faculty member.
    #[error("release-time allocation '{id}' not found for '{faculty}'")]
    AllocationNotFound { faculty: String, id: String },
}

impl PlannerError {
    /// `Ok(())` when `violations` is empty, otherwise `InvalidInput`.
    pub fn check(
        operation: &'static str,
        violations: Vec<FieldViolation>,
    ) -> Result<(), PlannerError> {
        if violations.is_empty() {
            Ok(())
        } else {
            Err(PlannerError::InvalidInput {
                operation,
                violations,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_passes_with_no_violations() {
        assert!(PlannerError::check("move_section", vec![]).is_ok());
    }

    #[test]
    fn invalid_input_lists_every_field() {
        let err = PlannerError::check(
            "add_allocation",
            vec![
                FieldViolation::new("credits", "must be non-negative"),
                FieldViolation::new("quarters", "must not be empty"),
            ],
        )
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("credits: must be non-negative"));
        assert!(msg.contains("quarters: must not be empty"));
        assert!(msg.starts_with("invalid input to add_allocation"));
    }
}
