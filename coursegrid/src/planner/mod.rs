/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Per-quarter section recommendations: how many sections of each course to
//! offer, how urgent each course is, and who teaches each section.
//!
//! The recommendation list is the input to the
//! [`SlotAssigner`](crate::scheduler::SlotAssigner).

pub mod recommend;

pub use recommend::{build_recommendations, RecommendationSettings};

use serde::Serialize;

use crate::model::{section_label, Priority, Quarter, SectionAssignment};

/// Priority from utilisation of the assigned seats.
pub fn priority_for(demand: u32, cap: u32, sections: u32) -> Priority {
    let seats = f64::from(cap) * f64::from(sections);
    if seats <= 0.0 {
        return Priority::Low;
    }
    let utilization = f64::from(demand) / seats;
    if utilization > 0.9 {
        Priority::High
    } else if utilization > 0.7 {
        Priority::Medium
    } else {
        Priority::Low
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseRecommendation {
    pub course_code: String,
    pub title: String,
    pub credits: u32,
    pub enrollment_cap: u32,
    pub predicted_demand: u32,
    pub confidence: f64,
    pub sections_needed: u32,
    pub priority: Priority,
    pub level: u32,
    /// One entry per section, labelled `001`, `002`, …
    pub sections: Vec<SectionAssignment>,
}

impl CourseRecommendation {
    pub fn utilization(&self) -> f64 {
        let seats = f64::from(self.enrollment_cap) * f64::from(self.sections_needed);
        if seats > 0.0 {
            f64::from(self.predicted_demand) / seats
        } else {
            0.0
        }
    }

    /// Add or drop sections.  New sections are TBD; dropped sections come off
    /// the end.  Priority is recomputed.
    pub fn adjust_sections(&mut self, delta: i32) {
        let target = self.sections_needed.saturating_add_signed(delta);
        while (self.sections.len() as u32) < target {
            let label = section_label(self.sections.len() + 1);
            self.sections.push(SectionAssignment {
                course_code: self.course_code.clone(),
                section: label,
                faculty_name: None,
                credits: self.credits,
                predicted_demand: self.predicted_demand,
                safety_warning: false,
            });
        }
        self.sections.truncate(target as usize);
        self.sections_needed = target;
        self.priority = priority_for(self.predicted_demand, self.enrollment_cap, target);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecommendationSummary {
    pub total_sections: u32,
    pub total_credits: u32,
    pub high_priority_courses: usize,
    pub assigned_sections: usize,
    pub tbd_sections: usize,
}

/// Recommendations for one quarter, sorted by priority then course code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuarterRecommendations {
    pub quarter: Quarter,
    pub courses: Vec<CourseRecommendation>,
}

impl QuarterRecommendations {
    pub fn get_mut(&mut self, code: &str) -> Option<&mut CourseRecommendation> {
        self.courses
            .iter_mut()
            .find(|c| crate::model::same_course(&c.course_code, code))
    }

    pub fn summary(&self) -> RecommendationSummary {
        let mut s = RecommendationSummary::default();
        for c in &self.courses {
            s.total_sections += c.sections_needed;
            s.total_credits += c.credits * c.sections_needed;
            if c.priority == Priority::High {
                s.high_priority_courses += 1;
            }
            for section in &c.sections {
                if section.instructor().is_some() {
                    s.assigned_sections += 1;
                } else {
                    s.tbd_sections += 1;
                }
            }
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(demand: u32, cap: u32, sections: u32) -> CourseRecommendation {
        let mut r = CourseRecommendation {
            course_code: "DESN 216".into(),
            title: String::new(),
            credits: 5,
            enrollment_cap: cap,
            predicted_demand: demand,
            confidence: 0.5,
            sections_needed: 0,
            priority: Priority::Low,
            level: 200,
            sections: Vec::new(),
        };
        r.adjust_sections(sections as i32);
        r
    }

    #[test]
    fn priority_thresholds() {
        assert_eq!(priority_for(23, 24, 1), Priority::High);
        assert_eq!(priority_for(20, 24, 1), Priority::Medium);
        assert_eq!(priority_for(10, 24, 1), Priority::Low);
        assert_eq!(priority_for(0, 24, 0), Priority::Low);
    }

    #[test]
    fn adjust_sections_adds_tbd_and_trims() {
        let mut r = rec(40, 24, 2);
        assert_eq!(r.sections.len(), 2);
        assert_eq!(r.sections[1].section, "002");

        r.adjust_sections(1);
        assert_eq!(r.sections_needed, 3);
        assert_eq!(r.sections[2].faculty_label(), "TBD");
        assert_eq!(r.priority, Priority::Low);

        r.adjust_sections(-5);
        assert_eq!(r.sections_needed, 0);
        assert!(r.sections.is_empty());
    }

    #[test]
    fn adjust_sections_saturates() {
        let mut r = rec(40, 24, 2);
        r.adjust_sections(i32::MIN);
        assert_eq!(r.sections_needed, 0);
        assert!(r.sections.is_empty());
    }

    #[test]
    fn summary_counts_assigned_and_tbd() {
        let mut r = rec(46, 24, 2);
        r.sections[0].faculty_name = Some("Avery".into());
        let q = QuarterRecommendations {
            quarter: Quarter::Fall,
            courses: vec![r],
        };
        let s = q.summary();
        assert_eq!(s.total_sections, 2);
        assert_eq!(s.total_credits, 10);
        assert_eq!(s.high_priority_courses, 1);
        assert_eq!((s.assigned_sections, s.tbd_sections), (1, 1));
    }
}
