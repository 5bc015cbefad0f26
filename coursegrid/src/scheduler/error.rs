/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Why a section sits in the unassigned bucket.
//!
//! Running out of grid capacity is an expected outcome of generation, not an
//! `Err`: the section is parked with one of these reasons and generation
//! carries on.

use serde::{Deserialize, Serialize};

/// Detailed reason a section is not on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum UnassignedReason {
    /// Every eligible (day, time, room) was already taken.
    RoomConflict { tried_rooms: usize },

    /// The course resolves to no room at all.
    NoEligibleRoom,

    /// The course resolves to no time slot (or no day) at all.
    NoEligibleTime,

    /// Pushed out of its slot by a move from the unassigned bucket.
    Displaced { by: String },

    /// Removed from the grid by an explicit unassign.
    Manual,
}

impl std::fmt::Display for UnassignedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnassignedReason::RoomConflict { tried_rooms } => write!(
                f,
                "no free slot in any of {} eligible room(s)",
                tried_rooms
            ),

            UnassignedReason::NoEligibleRoom => write!(f, "no eligible room for this course"),

            UnassignedReason::NoEligibleTime => {
                write!(f, "no eligible time slot or day pattern for this course")
            }

            UnassignedReason::Displaced { by } => write!(f, "displaced by {}", by),

            UnassignedReason::Manual => write!(f, "unassigned by hand"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_detail() {
        assert_eq!(
            UnassignedReason::RoomConflict { tried_rooms: 2 }.to_string(),
            "no free slot in any of 2 eligible room(s)"
        );
        assert_eq!(
            UnassignedReason::Displaced {
                by: "DESN-216-001".into()
            }
            .to_string(),
            "displaced by DESN-216-001"
        );
    }

    #[test]
    fn serialises_with_kind_tag() {
        let yaml = serde_yaml::to_string(&UnassignedReason::NoEligibleRoom).unwrap();
        assert!(yaml.contains("kind: no-eligible-room"));
    }
}
