/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Faculty roster: ranks, teaching history and release time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::same_course;
use crate::workload::release::ReleaseAllocation;

/// Academic rank.  Determines annual workload capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FacultyRank {
    FullProfessor,
    AssociateProfessor,
    AssistantProfessor,
    SeniorLecturer,
    Lecturer,
    Adjunct,
}

impl FacultyRank {
    /// Annual workload capacity in credits.
    pub const fn annual_capacity(self) -> f64 {
        match self {
            FacultyRank::FullProfessor
            | FacultyRank::AssociateProfessor
            | FacultyRank::AssistantProfessor => 36.0,
            FacultyRank::SeniorLecturer | FacultyRank::Lecturer => 45.0,
            FacultyRank::Adjunct => 15.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FacultyRank::FullProfessor => "Full Professor",
            FacultyRank::AssociateProfessor => "Associate Professor",
            FacultyRank::AssistantProfessor => "Assistant Professor",
            FacultyRank::SeniorLecturer => "Senior Lecturer",
            FacultyRank::Lecturer => "Lecturer",
            FacultyRank::Adjunct => "Adjunct",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FacultyCategory {
    FullTime,
    Adjunct,
}

impl FacultyCategory {
    /// Credits one person may be auto-assigned within a single quarter.
    pub fn quarter_assignment_capacity(self) -> f64 {
        match self {
            FacultyCategory::FullTime => 15.0,
            FacultyCategory::Adjunct => 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacultyMember {
    pub name: String,
    pub rank: FacultyRank,
    /// Derived from `rank` when absent.
    #[serde(default)]
    pub category: Option<FacultyCategory>,
    /// Course code → number of times taught.
    #[serde(default)]
    pub courses_taught: BTreeMap<String, u32>,
    /// Overrides the rank's annual capacity.
    #[serde(default)]
    pub annual_capacity: Option<f64>,
    #[serde(default)]
    pub release_time: Vec<ReleaseAllocation>,
}

impl FacultyMember {
    pub fn new(name: impl Into<String>, rank: FacultyRank) -> Self {
        Self {
            name: name.into(),
            rank,
            category: None,
            courses_taught: BTreeMap::new(),
            annual_capacity: None,
            release_time: Vec::new(),
        }
    }

    pub fn category(&self) -> FacultyCategory {
        self.category.unwrap_or(match self.rank {
            FacultyRank::Adjunct => FacultyCategory::Adjunct,
            _ => FacultyCategory::FullTime,
        })
    }

    pub fn annual_capacity(&self) -> f64 {
        self.annual_capacity
            .unwrap_or_else(|| self.rank.annual_capacity())
    }

    pub fn times_taught(&self, code: &str) -> u32 {
        self.courses_taught
            .iter()
            .filter(|(c, _)| same_course(c, code))
            .map(|(_, n)| *n)
            .sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacultyRoster {
    #[serde(default)]
    pub faculty: Vec<FacultyMember>,
}

impl FacultyRoster {
    pub fn new(faculty: Vec<FacultyMember>) -> Self {
        Self { faculty }
    }

    pub fn get(&self, name: &str) -> Option<&FacultyMember> {
        self.faculty.iter().find(|f| f.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut FacultyMember> {
        self.faculty.iter_mut().find(|f| f.name == name)
    }

    /// Members who have taught `code`, most experienced first, then by name.
    pub fn candidates_for(&self, code: &str) -> Vec<&FacultyMember> {
        let mut out: Vec<&FacultyMember> = self
            .faculty
            .iter()
            .filter(|f| f.times_taught(code) > 0)
            .collect();
        out.sort_by(|a, b| {
            b.times_taught(code)
                .cmp(&a.times_taught(code))
                .then_with(|| a.name.cmp(&b.name))
        });
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacities_follow_rank() {
        assert_eq!(FacultyRank::FullProfessor.annual_capacity(), 36.0);
        assert_eq!(FacultyRank::Lecturer.annual_capacity(), 45.0);
        assert_eq!(FacultyRank::Adjunct.annual_capacity(), 15.0);

        let mut m = FacultyMember::new("Lee", FacultyRank::SeniorLecturer);
        assert_eq!(m.annual_capacity(), 45.0);
        m.annual_capacity = Some(30.0);
        assert_eq!(m.annual_capacity(), 30.0);
    }

    #[test]
    fn category_defaults_from_rank() {
        assert_eq!(
            FacultyMember::new("A", FacultyRank::Adjunct).category(),
            FacultyCategory::Adjunct
        );
        assert_eq!(
            FacultyMember::new("B", FacultyRank::Lecturer).category(),
            FacultyCategory::FullTime
        );
    }

    #[test]
    fn candidates_sorted_by_experience_then_name() {
        let mut a = FacultyMember::new("Avery", FacultyRank::Lecturer);
        a.courses_taught.insert("DESN 216".into(), 2);
        let mut b = FacultyMember::new("Blake", FacultyRank::Lecturer);
        b.courses_taught.insert("DESN-216".into(), 5);
        let mut c = FacultyMember::new("Casey", FacultyRank::Adjunct);
        c.courses_taught.insert("DESN 216".into(), 2);
        let d = FacultyMember::new("Drew", FacultyRank::Adjunct);

        let roster = FacultyRoster::new(vec![d, c, a, b]);
        let names: Vec<&str> = roster
            .candidates_for("DESN 216")
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["Blake", "Avery", "Casey"]);
    }

    #[test]
    fn roster_yaml_parses_kebab_case_rank() {
        let yaml = "faculty:\n  - name: Sam\n    rank: assistant-professor\n    courses_taught:\n      DESN 100: 3\n";
        let roster: FacultyRoster = serde_yaml::from_str(yaml).unwrap();
        let sam = roster.get("Sam").unwrap();
        assert_eq!(sam.rank, FacultyRank::AssistantProfessor);
        assert_eq!(sam.times_taught("DESN 100"), 3);
    }
}
