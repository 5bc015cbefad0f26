/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Enrollment history document.
//!
//! ```yaml
//! courses:
//!   DESN 216:
//!     quarterly:
//!       - { quarter: Fall, year: 2023, total: 40 }
//!       - { quarter: Fall, year: 2024, total: 44 }
//!     average: 42
//!     sections: 2
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{normalize_code, Quarter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterlyEnrollment {
    pub quarter: Quarter,
    pub year: u32,
    pub total: u32,
}

/// History of one course.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseEnrollment {
    #[serde(default)]
    pub quarterly: Vec<QuarterlyEnrollment>,
    /// Mean enrollment over every offering.  Computed from `quarterly` when
    /// absent.
    #[serde(default)]
    pub average: Option<f64>,
    /// Sections offered in the most recent comparable offering.
    #[serde(default)]
    pub sections: Option<u32>,
    #[serde(default)]
    pub is_new: bool,
}

impl CourseEnrollment {
    /// Totals for `quarter`, ordered by year.
    pub fn series(&self, quarter: Quarter) -> Vec<f64> {
        let mut points: Vec<&QuarterlyEnrollment> = self
            .quarterly
            .iter()
            .filter(|e| e.quarter == quarter)
            .collect();
        points.sort_by_key(|e| e.year);
        points.iter().map(|e| f64::from(e.total)).collect()
    }

    /// Most recent total for `quarter`.
    pub fn latest(&self, quarter: Quarter) -> Option<u32> {
        self.quarterly
            .iter()
            .filter(|e| e.quarter == quarter)
            .max_by_key(|e| e.year)
            .map(|e| e.total)
    }

    pub fn average(&self) -> Option<f64> {
        self.average.or_else(|| {
            if self.quarterly.is_empty() {
                None
            } else {
                let sum: f64 = self.quarterly.iter().map(|e| f64::from(e.total)).sum();
                Some(sum / self.quarterly.len() as f64)
            }
        })
    }

    /// Sections currently offered; at least one.
    pub fn current_sections(&self) -> u32 {
        self.sections.unwrap_or(1).max(1)
    }
}

/// Course code → history.  Keys are normalised on lookup, so `"DESN-216"`
/// and `"DESN 216"` name the same record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentHistory {
    #[serde(default)]
    pub courses: BTreeMap<String, CourseEnrollment>,
}

impl EnrollmentHistory {
    pub fn get(&self, code: &str) -> Option<&CourseEnrollment> {
        let wanted = normalize_code(code);
        self.courses.get(&wanted).or_else(|| {
            self.courses
                .iter()
                .find(|(k, _)| normalize_code(k) == wanted)
                .map(|(_, v)| v)
        })
    }

    pub fn insert(&mut self, code: &str, record: CourseEnrollment) {
        self.courses.insert(normalize_code(code), record);
    }

    /// Course codes in key order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.courses.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(quarter: Quarter, year: u32, total: u32) -> QuarterlyEnrollment {
        QuarterlyEnrollment { quarter, year, total }
    }

    #[test]
    fn series_is_year_ordered_and_filtered() {
        let rec = CourseEnrollment {
            quarterly: vec![
                entry(Quarter::Fall, 2024, 44),
                entry(Quarter::Winter, 2024, 10),
                entry(Quarter::Fall, 2023, 40),
            ],
            ..Default::default()
        };
        assert_eq!(rec.series(Quarter::Fall), vec![40.0, 44.0]);
        assert_eq!(rec.latest(Quarter::Fall), Some(44));
        assert_eq!(rec.latest(Quarter::Spring), None);
    }

    #[test]
    fn average_falls_back_to_computed_mean() {
        let mut rec = CourseEnrollment {
            quarterly: vec![entry(Quarter::Fall, 2023, 10), entry(Quarter::Fall, 2024, 20)],
            ..Default::default()
        };
        assert_eq!(rec.average(), Some(15.0));
        rec.average = Some(12.0);
        assert_eq!(rec.average(), Some(12.0));
        assert_eq!(CourseEnrollment::default().average(), None);
    }

    #[test]
    fn sections_default_to_one() {
        assert_eq!(CourseEnrollment::default().current_sections(), 1);
        let rec = CourseEnrollment {
            sections: Some(0),
            ..Default::default()
        };
        assert_eq!(rec.current_sections(), 1);
    }

    #[test]
    fn lookup_ignores_code_spelling() {
        let yaml = "courses:\n  DESN-216:\n    average: 30\n";
        let history: EnrollmentHistory = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(history.get("desn 216").and_then(|c| c.average), Some(30.0));
    }
}
