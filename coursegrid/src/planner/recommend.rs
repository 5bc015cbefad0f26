/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Builds [`QuarterRecommendations`] from the catalog, the demand estimator
//! and the faculty roster.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::demand::{sections_needed, DemandEstimator};
use crate::model::{section_label, CourseCatalog, Quarter, SectionAssignment};
use crate::roster::FacultyRoster;

use super::{priority_for, CourseRecommendation, QuarterRecommendations};

/// Knobs for [`build_recommendations`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationSettings {
    /// Demand assumed for courses with no enrollment history.
    pub fallback_demand: u32,
    pub fallback_confidence: f64,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            fallback_demand: 20,
            fallback_confidence: 0.3,
        }
    }
}

/// One recommendation per catalog course offered in `quarter`.
///
/// Faculty are auto-assigned from teaching history: the most experienced
/// candidates first, each taking sections while their credits for the
/// quarter stay within their category's per-quarter capacity.  Sections
/// nobody can take are left TBD.
pub fn build_recommendations(
    quarter: Quarter,
    catalog: &CourseCatalog,
    estimator: &DemandEstimator<'_>,
    roster: &FacultyRoster,
    settings: RecommendationSettings,
) -> QuarterRecommendations {
    // name → credits already auto-assigned this quarter
    let mut loads: BTreeMap<String, f64> = BTreeMap::new();
    let mut courses = Vec::new();

    for course in catalog.courses.iter().filter(|c| c.is_offered_in(quarter)) {
        let (demand, confidence) = match estimator.predict(&course.code, quarter) {
            Some(p) => (p.predicted_demand, p.confidence),
            None => (settings.fallback_demand, settings.fallback_confidence),
        };
        let cap = course.default_enrollment_cap;
        let needed = sections_needed(demand, cap);

        let mut sections = Vec::with_capacity(needed as usize);
        for candidate in roster.candidates_for(&course.code) {
            let capacity = candidate.category().quarter_assignment_capacity();
            let load = loads.entry(candidate.name.clone()).or_insert(0.0);
            while (sections.len() as u32) < needed && *load + f64::from(course.credits) <= capacity {
                *load += f64::from(course.credits);
                sections.push(Some(candidate.name.clone()));
            }
            if sections.len() as u32 >= needed {
                break;
            }
        }
        sections.resize(needed as usize, None);

        let sections: Vec<SectionAssignment> = sections
            .into_iter()
            .enumerate()
            .map(|(i, faculty_name)| SectionAssignment {
                course_code: course.code.clone(),
                section: section_label(i + 1),
                faculty_name,
                credits: course.credits,
                predicted_demand: demand,
                safety_warning: false,
            })
            .collect();

        let priority = priority_for(demand, cap, needed);
        debug!(
            course = %course.code,
            demand,
            sections = needed,
            priority = %priority,
            "recommendation built"
        );

        courses.push(CourseRecommendation {
            course_code: course.code.clone(),
            title: course.title.clone(),
            credits: course.credits,
            enrollment_cap: cap,
            predicted_demand: demand,
            confidence,
            sections_needed: needed,
            priority,
            level: course.level(),
            sections,
        });
    }

    courses.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| a.course_code.cmp(&b.course_code))
    });

    let result = QuarterRecommendations { quarter, courses };
    let summary = result.summary();
    info!(
        quarter = %quarter,
        courses = result.courses.len(),
        sections = summary.total_sections,
        tbd = summary.tbd_sections,
        "Recommendations built"
    );
    result
}

// ── Tests ─────────────────────────────────────────────────────────────────────
