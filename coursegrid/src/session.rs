/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! One build-and-edit cycle.
//!
//! A [`PlanningSession`] owns every input document and the settings, and
//! hands out short-lived borrowing views (resolver, estimator, assigner,
//! auditor) per call.  There is no other shared state.

use tracing::info;

use crate::audit::{AuditReport, ConflictAuditor};
use crate::config::{InputDocuments, PlannerSettings};
use crate::demand::graph::PrerequisiteGraph;
use crate::demand::history::EnrollmentHistory;
use crate::demand::{DemandEstimator, DemandPrediction};
use crate::model::{CourseCatalog, Quarter};
use crate::planner::{build_recommendations, QuarterRecommendations};
use crate::roster::FacultyRoster;
use crate::rules::{ConstraintStore, EligibilityResolver};
use crate::scheduler::safety::EveningShortfall;
use crate::scheduler::{Grid, Plan, SlotAssigner};
use crate::workload::FacultyLoadTracker;

#[derive(Debug, Clone)]
pub struct PlanningSession {
    store: ConstraintStore,
    catalog: CourseCatalog,
    history: EnrollmentHistory,
    graph: PrerequisiteGraph,
    roster: FacultyRoster,
    settings: PlannerSettings,
}

impl PlanningSession {
    pub fn new(docs: InputDocuments, settings: PlannerSettings) -> Self {
        Self {
            store: ConstraintStore::new(docs.rules),
            catalog: docs.catalog,
            history: docs.history,
            graph: docs.graph,
            roster: docs.roster,
            settings,
        }
    }

    pub fn store(&self) -> &ConstraintStore {
        &self.store
    }

    pub fn catalog(&self) -> &CourseCatalog {
        &self.catalog
    }

    pub fn roster(&self) -> &FacultyRoster {
        &self.roster
    }

    pub fn settings(&self) -> &PlannerSettings {
        &self.settings
    }

    pub fn resolver(&self) -> EligibilityResolver<'_> {
        EligibilityResolver::new(&self.store, &self.catalog)
    }

    pub fn estimator(&self) -> DemandEstimator<'_> {
        DemandEstimator::new(
            &self.history,
            &self.graph,
            &self.catalog,
            self.settings.default_enrollment_cap,
        )
    }

    pub fn predictions(&self, quarter: Quarter) -> Vec<DemandPrediction> {
        self.estimator().predict_quarter(quarter)
    }

    pub fn recommendations(&self, quarter: Quarter) -> QuarterRecommendations {
        build_recommendations(
            quarter,
            &self.catalog,
            &self.estimator(),
            &self.roster,
            self.settings.recommendation(),
        )
    }

    fn assigner(&self) -> SlotAssigner<'_> {
        SlotAssigner::new(self.resolver(), self.settings.assigner())
    }

    pub fn generate_quarter(&self, quarter: Quarter) -> Grid {
        let recommendations = self.recommendations(quarter);
        self.assigner().generate(&recommendations)
    }

    /// Re-flags `grid` under the evening rule currently in force, e.g. after
    /// [`set_constraint_enabled`](Self::set_constraint_enabled).
    pub fn reflag(&self, grid: &mut Grid) -> Vec<EveningShortfall> {
        grid.set_evening_guard(self.assigner().evening_guard())
    }

    /// A fresh grid per quarter, in the order given.  Repeated quarters are
    /// generated once.
    pub fn generate_plan(&self, quarters: &[Quarter]) -> Plan {
        let mut plan = Plan::new();
        for &quarter in quarters {
            if plan.get(quarter).is_none() {
                plan.insert(self.generate_quarter(quarter));
            }
        }
        info!(
            quarters = plan.quarters.len(),
            sections = plan.grids().map(Grid::total_sections).sum::<usize>(),
            "Plan generated"
        );
        plan
    }

    pub fn faculty_loads(&self, plan: &Plan) -> FacultyLoadTracker {
        FacultyLoadTracker::from_plan(plan, &self.roster, &self.catalog)
    }

    pub fn audit(&self, plan: &Plan) -> AuditReport {
        let estimator = self.estimator();
        let loads = self.faculty_loads(plan);
        ConflictAuditor::new(self.resolver(), &estimator, self.settings.audit()).audit(plan, &loads)
    }

    /// Toggles a rules-document constraint by id.  Takes effect on the next
    /// generation or audit.
    pub fn set_constraint_enabled(&mut self, id: &str, enabled: bool) -> bool {
        self.store.set_constraint_enabled(id, enabled)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::ConflictKind;
    use crate::demand::history::{CourseEnrollment, QuarterlyEnrollment};
    use crate::model::{Course, DayPattern, Priority, SectionAssignment, Slot, TimeSlot};
    use crate::roster::{FacultyMember, FacultyRank};
    use crate::rules::{NoOccupancy, SchedulingRules};
    use crate::scheduler::Location;

    fn fall_history(totals: &[u32]) -> CourseEnrollment {
        CourseEnrollment {
            quarterly: totals
                .iter()
                .enumerate()
                .map(|(i, &total)| QuarterlyEnrollment {
                    quarter: Quarter::Fall,
                    year: 2021 + i as u32,
                    total,
                })
                .collect(),
            ..CourseEnrollment::default()
        }
    }

    fn session(rules: &str, courses: Vec<Course>, faculty: Vec<FacultyMember>) -> PlanningSession {
        let rules: SchedulingRules = serde_yaml::from_str(rules).unwrap();
        let docs = InputDocuments {
            rules,
            catalog: CourseCatalog::new(courses),
            roster: FacultyRoster::new(faculty),
            ..InputDocuments::default()
        };
        PlanningSession::new(docs, PlannerSettings::default())
    }

    #[test]
    fn hard_room_restriction_resolves_exactly() {
        let mut studio = Course::new("DESN 301");
        studio.allowed_rooms = vec!["212".into()];
        studio.room_constraint_hard = true;
        let s = session("{}", vec![studio], vec![]);
        assert_eq!(s.resolver().valid_rooms("DESN 301", &NoOccupancy), vec!["212"]);
    }

    #[test]
    fn growing_fall_series_projects_the_slope() {
        let mut s = session("{}", vec![Course::new("DESN 216")], vec![]);
        s.history.insert("DESN 216", fall_history(&[40, 44, 48]));
        let p = s.estimator().predict("DESN 216", Quarter::Fall).unwrap();
        assert_eq!(p.predicted_demand, 52);
        let h = p.analysis.historical.unwrap();
        assert!((h.confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn cross_campus_travel_is_reported_once() {
        let s = session("{}", vec![], vec![FacultyMember::new("Avery", FacultyRank::Lecturer)]);
        let mut g = Grid::new(Quarter::Fall);
        let named = |code: &str| SectionAssignment {
            course_code: code.into(),
            section: "001".into(),
            faculty_name: Some("Avery".into()),
            credits: 5,
            predicted_demand: 20,
            safety_warning: false,
        };
        g.place(Slot::new(DayPattern::MW, TimeSlot::Morning, "206"), named("DESN 100"))
            .unwrap();
        g.place(Slot::new(DayPattern::MW, TimeSlot::Afternoon, "CEB 102"), named("DESN 200"))
            .unwrap();
        let mut plan = Plan::new();
        plan.insert(g);

        let report = s.audit(&plan);
        let travel: Vec<_> = report.of_kind(ConflictKind::FacultyTravel).collect();
        assert_eq!(travel.len(), 1);
        assert_eq!(travel[0].priority, Priority::High);
    }

    #[test]
    fn lone_evening_section_trips_flag_and_audit() {
        // one room, five sections alternating days: the fifth is the only
        // one pushed into an evening (MW)
        let rules = "campuses:\n  - id: main\n    rooms: [\"206\"]\n";
        let mut course = Course::new("DESN 100");
        course.quarters_offered = vec![Quarter::Fall];
        let mut s = session(rules, vec![course], vec![FacultyMember::new("Blake", FacultyRank::Lecturer)]);
        let mut record = fall_history(&[100, 100, 100]);
        record.sections = Some(5);
        s.history.insert("DESN 100", record);

        let mut recs = s.recommendations(Quarter::Fall);
        let course = recs.get_mut("DESN 100").unwrap();
        course.sections.truncate(5);
        for sec in &mut course.sections {
            sec.faculty_name = Some("Blake".into());
        }
        let mut grid = s.assigner().generate(&recs);

        let evening: Vec<_> = grid
            .placements()
            .filter(|(slot, _)| slot.time == TimeSlot::Evening)
            .collect();
        assert_eq!(evening.len(), 1);
        assert_eq!(evening[0].0.day, DayPattern::MW);
        assert!(evening[0].1.safety_warning);

        let mut plan = Plan::new();
        plan.insert(grid.clone());
        let report = s.audit(&plan);
        let safety: Vec<_> = report.of_kind(ConflictKind::EveningSafety).collect();
        assert_eq!(safety.len(), 1);
        assert_eq!(safety[0].day, Some(DayPattern::MW));
        assert_eq!(safety[0].quarter, Some(Quarter::Fall));

        // swapping the evening section into the morning moves the flag with
        // the evening slot
        let night = evening[0].0.clone();
        let id = evening[0].1.id();
        let morning = Slot::new(DayPattern::MW, TimeSlot::Morning, "206");
        grid.move_section(&id, &Location::Slot(night.clone()), &morning)
            .unwrap();
        assert!(!grid.get(&morning).unwrap().safety_warning);
        assert!(grid.get(&night).unwrap().safety_warning);
    }

    #[test]
    fn reflag_follows_a_toggled_evening_rule() {
        let rules = "campuses:\n  - id: main\n    rooms: [\"206\"]\nfaculty_constraints:\n  - id: evening\n    rule: minimum-instructors-evening\n";
        let mut s = session(rules, vec![Course::new("DESN 100")], vec![]);
        let mut g = Grid::new(Quarter::Fall);
        let night = Slot::new(DayPattern::MW, TimeSlot::Evening, "206");
        g.place(night.clone(), SectionAssignment {
            course_code: "DESN 100".into(),
            section: "001".into(),
            faculty_name: None,
            credits: 5,
            predicted_demand: 20,
            safety_warning: false,
        })
        .unwrap();

        assert_eq!(s.reflag(&mut g).len(), 1);
        assert!(g.get(&night).unwrap().safety_warning);

        s.set_constraint_enabled("evening", false);
        assert!(s.reflag(&mut g).is_empty());
        assert!(!g.get(&night).unwrap().safety_warning);
    }

    #[test]
    fn disabling_the_evening_rule_silences_both_checks() {
        let rules = "campuses:\n  - id: main\n    rooms: [\"206\"]\nfaculty_constraints:\n  - id: evening\n    rule: minimum-instructors-evening\n";
        let mut s = session(rules, vec![Course::new("DESN 100")], vec![]);
        assert!(s.set_constraint_enabled("evening", false));
        assert!(!s.set_constraint_enabled("nope", false));

        let mut g = Grid::new(Quarter::Fall);
        let lone = SectionAssignment {
            course_code: "DESN 100".into(),
            section: "001".into(),
            faculty_name: Some("Casey".into()),
            credits: 5,
            predicted_demand: 20,
            safety_warning: false,
        };
        g.place(Slot::new(DayPattern::MW, TimeSlot::Evening, "206"), lone).unwrap();
        let mut plan = Plan::new();
        plan.insert(g);
        assert_eq!(s.audit(&plan).of_kind(ConflictKind::EveningSafety).count(), 0);
    }

    #[test]
    fn generation_is_deterministic_and_never_drops_sections() {
        let mut courses = Vec::new();
        for code in ["DESN 100", "DESN 216", "DESN 301", "DESN 499"] {
            courses.push(Course::new(code));
        }
        courses[2].allowed_rooms = vec!["212".into()];
        courses[2].room_constraint_hard = true;
        courses[3].is_case_by_case = true;
        let s = session("{}", courses, vec![FacultyMember::new("Avery", FacultyRank::Lecturer)]);

        let a = s.generate_plan(&[Quarter::Fall, Quarter::Winter, Quarter::Fall]);
        let b = s.generate_plan(&[Quarter::Fall, Quarter::Winter]);
        assert_eq!(a, b);
        assert_eq!(a.quarters.len(), 2);

        for grid in a.grids() {
            let requested: u32 = s
                .recommendations(grid.quarter())
                .courses
                .iter()
                .map(|c| c.sections_needed)
                .sum();
            assert_eq!(grid.total_sections(), requested as usize);
            assert!(grid.placements().all(|(_, sec)| sec.course_code != "DESN 499"));
            assert!(grid.case_by_case().iter().all(|sec| sec.course_code == "DESN 499"));
        }
    }

    #[test]
    fn edits_round_trip_through_the_session_plan() {
        let s = session("{}", vec![Course::new("DESN 100")], vec![]);
        let mut plan = s.generate_plan(&[Quarter::Fall]);
        let grid = plan.get_mut(Quarter::Fall).unwrap();
        let before = grid.clone();

        let (from, id) = grid
            .placements()
            .next()
            .map(|(slot, sec)| (slot.clone(), sec.id()))
            .unwrap();
        let empty = Slot::new(DayPattern::TR, TimeSlot::Evening, "CEB 104");
        assert!(!grid.is_occupied(&empty));

        grid.move_section(&id, &Location::Slot(from.clone()), &empty).unwrap();
        grid.move_section(&id, &Location::Slot(empty.clone()), &from).unwrap();
        assert_eq!(*grid, before);
    }
}
