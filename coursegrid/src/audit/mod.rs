/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Plan-level conflict audit.
//!
//! # Status: advisory
//!
//! The audit never changes a plan.  It is recomputed from scratch after each
//! batch of edits and returns a flat [`AuditReport`].  Checks run per quarter
//! in plan order:
//!
//! | Check | Priority |
//! |---|---|
//! | Faculty travel between campuses on consecutive slots | high |
//! | Evening slots with too few distinct instructors | high |
//! | Faculty double-booked at one (day, time) | high |
//! | MW/TR section count imbalance | medium |
//! | Section count vs. predicted demand | high (add) / low (reduce) |
//! | Required course not scheduled | high |
//! | Placed section outside its eligible rooms or times | medium |
//! | Morning clustering | low |
//! | Unassigned sections | medium |
//!
//! followed by two plan-wide checks: prerequisite sequencing (high) and
//! annual faculty overload (high).

pub mod conflict;

pub use conflict::{AuditReport, AuditSummary, ConflictKind, ConflictRecord};

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, warn};

use crate::demand::{recommend, DemandEstimator, Recommendation};
use crate::model::{
    normalize_code, same_course, ClockTime, DayPattern, Priority, Quarter, SectionAssignment, Slot,
    TimeSlot,
};
use crate::rules::{EligibilityResolver, ViolationKind, DEFAULT_EVENING_CUTOFF, DEFAULT_MIN_EVENING_INSTRUCTORS};
use crate::scheduler::{Grid, Plan};
use crate::workload::{FacultyLoadTracker, LoadView};

/// Thresholds for the audit.  The evening values apply only when the rules
/// document does not configure the evening rule itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AuditSettings {
    pub evening_cutoff: ClockTime,
    pub minimum_evening_instructors: u32,
    /// Largest tolerated |MW − TR| section difference.
    pub day_imbalance_threshold: usize,
    /// Share of placements in the morning above which clustering is reported.
    pub morning_cluster_ratio: f64,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            evening_cutoff: DEFAULT_EVENING_CUTOFF,
            minimum_evening_instructors: DEFAULT_MIN_EVENING_INSTRUCTORS,
            day_imbalance_threshold: 3,
            morning_cluster_ratio: 0.6,
        }
    }
}

/// A placed section taught by a named instructor.
struct Taught<'g> {
    slot: &'g Slot,
    section: &'g SectionAssignment,
    faculty: &'g str,
}

fn taught(grid: &Grid) -> impl Iterator<Item = Taught<'_>> {
    grid.placements().filter_map(|(slot, section)| {
        section.instructor().map(|faculty| Taught {
            slot,
            section,
            faculty,
        })
    })
}

/// Distinct course codes on the grid or in the case-by-case bucket.
fn scheduled_codes(grid: &Grid) -> BTreeSet<&str> {
    grid.placements()
        .map(|(_, s)| s.course_code.as_str())
        .chain(grid.case_by_case().iter().map(|s| s.course_code.as_str()))
        .collect()
}

pub struct ConflictAuditor<'a> {
    resolver: EligibilityResolver<'a>,
    estimator: &'a DemandEstimator<'a>,
    settings: AuditSettings,
}

impl<'a> ConflictAuditor<'a> {
    pub fn new(
        resolver: EligibilityResolver<'a>,
        estimator: &'a DemandEstimator<'a>,
        settings: AuditSettings,
    ) -> Self {
        Self {
            resolver,
            estimator,
            settings,
        }
    }

    pub fn audit(&self, plan: &Plan, loads: &FacultyLoadTracker) -> AuditReport {
        info!(quarters = plan.quarters.len(), "=== Conflict audit ===");

        let mut conflicts = Vec::new();
        for grid in plan.grids() {
            let before = conflicts.len();
            self.check_travel(grid, &mut conflicts);
            self.check_evening_safety(grid, &mut conflicts);
            Self::check_double_booking(grid, &mut conflicts);
            self.check_day_balance(grid, &mut conflicts);
            self.check_enrollment(grid, &mut conflicts);
            self.check_required(grid, &mut conflicts);
            self.check_eligibility(grid, &mut conflicts);
            self.check_time_clustering(grid, &mut conflicts);
            Self::check_unassigned(grid, &mut conflicts);
            debug!(quarter = %grid.quarter(), found = conflicts.len() - before, "quarter audited");
        }
        self.check_prerequisites(plan, &mut conflicts);
        Self::check_overload(loads, &mut conflicts);

        for c in conflicts.iter().filter(|c| c.priority == Priority::High) {
            warn!(id = %c.id, kind = %c.kind, "{}", c.title);
        }
        let report = AuditReport::new(conflicts);
        info!(
            total = report.summary.total,
            high = report.summary.high,
            medium = report.summary.medium,
            low = report.summary.low,
            "Audit complete"
        );
        report
    }

    fn check_travel(&self, grid: &Grid, out: &mut Vec<ConflictRecord>) {
        let store = self.resolver.store();
        if !store.travel_rule_active() {
            return;
        }
        let quarter = grid.quarter();

        let mut days: BTreeMap<(&str, DayPattern), Vec<Taught<'_>>> = BTreeMap::new();
        for t in taught(grid) {
            days.entry((t.faculty, t.slot.day)).or_default().push(t);
        }

        for ((faculty, day), mut list) in days {
            list.sort_by_key(|t| t.slot.time);
            for (i, pair) in list.windows(2).enumerate() {
                let (a, b) = (&pair[0], &pair[1]);
                let from = store.campus_id_for_room(&a.slot.room);
                let to = store.campus_id_for_room(&b.slot.room);
                if from == to {
                    continue;
                }
                out.push(
                    ConflictRecord::new(
                        format!("travel-{faculty}-{quarter}-{day}-{i}"),
                        ConflictKind::FacultyTravel,
                        Priority::High,
                        format!("Campus travel conflict: {faculty}"),
                        format!(
                            "{faculty} has {} in {} ({from}) then {} in {} ({to}) on {day}",
                            a.section.course_code, a.slot.room, b.section.course_code, b.slot.room
                        ),
                    )
                    .with_course(a.section.course_code.as_str())
                    .with_faculty(faculty)
                    .with_day(day)
                    .with_quarter(quarter),
                );
            }
        }
    }

    fn check_evening_safety(&self, grid: &Grid, out: &mut Vec<ConflictRecord>) {
        let store = self.resolver.store();
        let Some(rule) = store.evening_rule(
            self.settings.evening_cutoff,
            self.settings.minimum_evening_instructors,
        ) else {
            return;
        };
        let quarter = grid.quarter();

        let mut evening: BTreeMap<DayPattern, BTreeSet<&str>> = BTreeMap::new();
        for t in taught(grid) {
            if store.is_evening(t.slot.time, rule.after_time) {
                evening.entry(t.slot.day).or_default().insert(t.faculty);
            }
        }

        for (day, faculty) in evening {
            let n = faculty.len();
            if n == 0 || n as u64 >= u64::from(rule.minimum_count) {
                continue;
            }
            let names: Vec<&str> = faculty.into_iter().collect();
            out.push(
                ConflictRecord::new(
                    format!("evening-safety-{quarter}-{day}"),
                    ConflictKind::EveningSafety,
                    Priority::High,
                    format!("Evening safety: only {n} instructor on {day}"),
                    format!(
                        "{quarter} {day} evening has {}; need {}+ instructors on site",
                        names.join(", "),
                        rule.minimum_count
                    ),
                )
                .with_day(day)
                .with_quarter(quarter),
            );
        }
    }

    fn check_double_booking(grid: &Grid, out: &mut Vec<ConflictRecord>) {
        let quarter = grid.quarter();
        let mut by_time: BTreeMap<(DayPattern, TimeSlot, &str), Vec<&str>> = BTreeMap::new();
        for t in taught(grid) {
            by_time
                .entry((t.slot.day, t.slot.time, t.faculty))
                .or_default()
                .push(&t.section.course_code);
        }

        for ((day, time, faculty), courses) in by_time {
            if courses.len() < 2 {
                continue;
            }
            out.push(
                ConflictRecord::new(
                    format!("faculty-conflict-{quarter}-{faculty}-{day}-{time}"),
                    ConflictKind::FacultyDoubleBooking,
                    Priority::High,
                    format!("Faculty double-booking: {faculty}"),
                    format!(
                        "{faculty} is assigned to {} at the same time ({day} {time})",
                        courses.join(" and ")
                    ),
                )
                .with_faculty(faculty)
                .with_day(day)
                .with_quarter(quarter),
            );
        }
    }

    fn check_day_balance(&self, grid: &Grid, out: &mut Vec<ConflictRecord>) {
        let count = |d: DayPattern| grid.placements().filter(|(s, _)| s.day == d).count();
        let (mw, tr) = (count(DayPattern::MW), count(DayPattern::TR));
        let diff = mw.abs_diff(tr);
        if diff <= self.settings.day_imbalance_threshold {
            return;
        }
        let quarter = grid.quarter();
        out.push(
            ConflictRecord::new(
                format!("balance-{quarter}"),
                ConflictKind::DayImbalance,
                Priority::Medium,
                format!("MW/TR imbalance in {quarter}"),
                format!("MW has {mw} sections, TR has {tr} (difference: {diff})"),
            )
            .with_quarter(quarter),
        );
    }

    /// Re-derives the add/reduce recommendation against the sections actually
    /// placed this quarter.
    fn check_enrollment(&self, grid: &Grid, out: &mut Vec<ConflictRecord>) {
        let quarter = grid.quarter();
        let mut placed: BTreeMap<&str, u32> = BTreeMap::new();
        for (_, s) in grid.placements() {
            *placed.entry(s.course_code.as_str()).or_insert(0) += 1;
        }

        for (code, sections) in placed {
            let Some(prediction) = self.estimator.predict(code, quarter) else {
                continue;
            };
            let cap = prediction.section_capacity;
            let (rec, suggested, utilization) = recommend(prediction.predicted_demand, cap, sections);
            let capacity = cap * sections;
            let pct = (utilization * 100.0).round();
            let record = match rec {
                Recommendation::Increase => ConflictRecord::new(
                    format!("enroll-{code}-{quarter}-add"),
                    ConflictKind::AddSection,
                    Priority::High,
                    format!("Add section to {code}"),
                    format!(
                        "Predicted demand {} against capacity {capacity} ({pct}% utilization); suggest {suggested} sections",
                        prediction.predicted_demand
                    ),
                ),
                Recommendation::Reduce => ConflictRecord::new(
                    format!("enroll-{code}-{quarter}-reduce"),
                    ConflictKind::ReduceSection,
                    Priority::Low,
                    format!("Consider reducing {code} sections"),
                    format!("Only {pct}% utilization with {sections} sections; suggest {suggested}"),
                ),
                Recommendation::Optimal | Recommendation::Adequate => continue,
            };
            out.push(record.with_course(code).with_quarter(quarter));
        }
    }

    fn check_required(&self, grid: &Grid, out: &mut Vec<ConflictRecord>) {
        let quarter = grid.quarter();
        let scheduled = scheduled_codes(grid);
        for course in &self.resolver.catalog().courses {
            if !course.required || !course.is_offered_in(quarter) {
                continue;
            }
            if scheduled.iter().any(|c| same_course(c, &course.code)) {
                continue;
            }
            let title = if course.title.is_empty() {
                course.code.as_str()
            } else {
                course.title.as_str()
            };
            out.push(
                ConflictRecord::new(
                    format!("missing-{}-{quarter}", course.code),
                    ConflictKind::RequiredMissing,
                    Priority::High,
                    format!("Required: {} not scheduled in {quarter}", course.code),
                    format!("{title} is a required course and should be offered in {quarter}"),
                )
                .with_course(course.code.as_str())
                .with_quarter(quarter),
            );
        }
    }

    fn check_eligibility(&self, grid: &Grid, out: &mut Vec<ConflictRecord>) {
        let quarter = grid.quarter();
        for (slot, section) in grid.placements() {
            let validation =
                self.resolver
                    .validate_assignment(&section.course_code, &slot.room, slot.time);
            for v in &validation.violations {
                let (prefix, kind) = match v.kind {
                    ViolationKind::InvalidRoom => ("room", ConflictKind::RoomConstraint),
                    ViolationKind::CaseByCase => ("case-by-case", ConflictKind::RoomConstraint),
                    ViolationKind::InvalidTime => ("time", ConflictKind::TimeConstraint),
                    ViolationKind::BlockedByCampus => ("campus-time", ConflictKind::TimeConstraint),
                };
                out.push(
                    ConflictRecord::new(
                        format!("{prefix}-{quarter}-{}", section.id()),
                        kind,
                        Priority::Medium,
                        format!("Constraint violation: {} at {slot}", section.id()),
                        v.message.clone(),
                    )
                    .with_course(section.course_code.as_str())
                    .with_day(slot.day)
                    .with_quarter(quarter),
                );
            }
        }
    }

    fn check_time_clustering(&self, grid: &Grid, out: &mut Vec<ConflictRecord>) {
        let total = grid.placed_count();
        if total == 0 {
            return;
        }
        let count = |t: TimeSlot| grid.placements().filter(|(s, _)| s.time == t).count();
        let (morning, afternoon, evening) = (
            count(TimeSlot::Morning),
            count(TimeSlot::Afternoon),
            count(TimeSlot::Evening),
        );
        let ratio = morning as f64 / total as f64;
        if ratio <= self.settings.morning_cluster_ratio {
            return;
        }
        let quarter = grid.quarter();
        out.push(
            ConflictRecord::new(
                format!("time-clustering-{quarter}-morning"),
                ConflictKind::TimeClustering,
                Priority::Low,
                format!("Time slot imbalance in {quarter}"),
                format!(
                    "{}% of sections in the morning (morning {morning}, afternoon {afternoon}, evening {evening})",
                    (ratio * 100.0).round()
                ),
            )
            .with_quarter(quarter),
        );
    }

    fn check_unassigned(grid: &Grid, out: &mut Vec<ConflictRecord>) {
        let quarter = grid.quarter();
        for u in grid.unassigned() {
            let id = u.section.id();
            out.push(
                ConflictRecord::new(
                    format!("unassigned-{quarter}-{id}"),
                    ConflictKind::Unassigned,
                    Priority::Medium,
                    format!("Unassigned: {id}"),
                    u.reason.to_string(),
                )
                .with_course(u.section.course_code.as_str())
                .with_quarter(quarter),
            );
        }
    }

    /// A scheduled course is flagged once, at its first quarter, when none of
    /// its prerequisites appears anywhere in the plan.
    fn check_prerequisites(&self, plan: &Plan, out: &mut Vec<ConflictRecord>) {
        let by_quarter: Vec<(Quarter, BTreeSet<&str>)> = plan
            .grids()
            .map(|g| (g.quarter(), scheduled_codes(g)))
            .collect();
        let anywhere: BTreeSet<String> = by_quarter
            .iter()
            .flat_map(|(_, codes)| codes.iter().map(|c| normalize_code(c)))
            .collect();

        let mut seen = BTreeSet::new();
        for (quarter, codes) in &by_quarter {
            for &code in codes {
                if !seen.insert(normalize_code(code)) {
                    continue;
                }
                let prerequisites = self.estimator.prerequisites(code);
                if prerequisites.is_empty()
                    || prerequisites
                        .iter()
                        .any(|p| anywhere.contains(&normalize_code(p)))
                {
                    continue;
                }
                out.push(
                    ConflictRecord::new(
                        format!("prereq-for-{code}"),
                        ConflictKind::PrerequisiteMissing,
                        Priority::High,
                        format!("Prerequisite missing for {code}"),
                        format!(
                            "{code} requires {}, none of which is offered in this plan",
                            prerequisites.join(" or ")
                        ),
                    )
                    .with_course(code)
                    .with_quarter(*quarter),
                );
            }
        }
    }

    fn check_overload(loads: &FacultyLoadTracker, out: &mut Vec<ConflictRecord>) {
        for load in loads.loads() {
            if !load.is_overloaded(LoadView::Annual) {
                continue;
            }
            let name = &load.faculty_name;
            out.push(
                ConflictRecord::new(
                    format!("overload-{name}"),
                    ConflictKind::FacultyOverload,
                    Priority::High,
                    format!("Faculty overload: {name}"),
                    format!(
                        "{name} carries {:.1} workload credits (capacity {:.1})",
                        load.annual_total(),
                        load.annual_capacity
                    ),
                )
                .with_faculty(name.as_str()),
            );
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demand::graph::PrerequisiteGraph;
    use crate::demand::history::EnrollmentHistory;
    use crate::model::{Course, CourseCatalog};
    use crate::rules::{ConstraintStore, SchedulingRules};

    struct Fixture {
        store: ConstraintStore,
        catalog: CourseCatalog,
        history: EnrollmentHistory,
        graph: PrerequisiteGraph,
    }

    impl Fixture {
        fn new(rules_yaml: &str, courses: Vec<Course>) -> Self {
            let rules: SchedulingRules = serde_yaml::from_str(rules_yaml).unwrap();
            Self {
                store: ConstraintStore::new(rules),
                catalog: CourseCatalog::new(courses),
                history: EnrollmentHistory::default(),
                graph: PrerequisiteGraph::default(),
            }
        }

        fn audit(&self, plan: &Plan) -> AuditReport {
            let estimator = DemandEstimator::new(&self.history, &self.graph, &self.catalog, 24);
            let auditor = ConflictAuditor::new(
                EligibilityResolver::new(&self.store, &self.catalog),
                &estimator,
                AuditSettings::default(),
            );
            auditor.audit(plan, &FacultyLoadTracker::new())
        }
    }

    fn section(code: &str, faculty: Option<&str>) -> SectionAssignment {
        SectionAssignment {
            course_code: code.into(),
            section: "001".into(),
            faculty_name: faculty.map(str::to_string),
            credits: 5,
            predicted_demand: 20,
            safety_warning: false,
        }
    }

    fn plan_of(grids: Vec<Grid>) -> Plan {
        let mut plan = Plan::new();
        for g in grids {
            plan.insert(g);
        }
        plan
    }

    #[test]
    fn cross_campus_back_to_back_is_one_travel_record() {
        let f = Fixture::new("{}", vec![]);
        let mut g = Grid::new(Quarter::Fall);
        g.place(Slot::new(DayPattern::MW, TimeSlot::Morning, "206"), section("DESN 100", Some("Avery")))
            .unwrap();
        g.place(
            Slot::new(DayPattern::MW, TimeSlot::Afternoon, "CEB 102"),
            section("DESN 200", Some("Avery")),
        )
        .unwrap();

        let report = f.audit(&plan_of(vec![g]));
        let travel: Vec<_> = report.of_kind(ConflictKind::FacultyTravel).collect();
        assert_eq!(travel.len(), 1);
        assert_eq!(travel[0].priority, Priority::High);
        assert!(travel[0].description.contains("206"));
        assert!(travel[0].description.contains("CEB 102"));
    }

    #[test]
    fn disabled_travel_rule_is_skipped() {
        let f = Fixture::new(
            "faculty_constraints:\n  - id: travel\n    rule: no-back-to-back-different-campus\n    enabled: false\n",
            vec![],
        );
        let mut g = Grid::new(Quarter::Fall);
        g.place(Slot::new(DayPattern::MW, TimeSlot::Morning, "206"), section("DESN 100", Some("Avery")))
            .unwrap();
        g.place(
            Slot::new(DayPattern::MW, TimeSlot::Afternoon, "CEB 102"),
            section("DESN 200", Some("Avery")),
        )
        .unwrap();
        let report = f.audit(&plan_of(vec![g]));
        assert_eq!(report.of_kind(ConflictKind::FacultyTravel).count(), 0);
    }

    #[test]
    fn lone_evening_instructor_is_flagged() {
        let f = Fixture::new("{}", vec![]);
        let mut g = Grid::new(Quarter::Winter);
        g.place(Slot::new(DayPattern::MW, TimeSlot::Evening, "206"), section("DESN 100", Some("Blake")))
            .unwrap();
        // TBD sections do not count as instructors
        g.place(Slot::new(DayPattern::TR, TimeSlot::Evening, "206"), section("DESN 200", None))
            .unwrap();

        let report = f.audit(&plan_of(vec![g]));
        let evening: Vec<_> = report.of_kind(ConflictKind::EveningSafety).collect();
        assert_eq!(evening.len(), 1);
        assert_eq!(evening[0].day, Some(DayPattern::MW));
        assert_eq!(evening[0].quarter, Some(Quarter::Winter));
    }

    #[test]
    fn literal_tbd_is_not_an_instructor() {
        let f = Fixture::new("{}", vec![]);
        let mut g = Grid::new(Quarter::Fall);
        g.place(Slot::new(DayPattern::MW, TimeSlot::Evening, "206"), section("DESN 100", Some("Blake")))
            .unwrap();
        g.place(Slot::new(DayPattern::MW, TimeSlot::Evening, "210"), section("DESN 200", Some("TBD")))
            .unwrap();
        g.place(Slot::new(DayPattern::TR, TimeSlot::Morning, "206"), section("DESN 300", Some("TBD")))
            .unwrap();
        g.place(
            Slot::new(DayPattern::TR, TimeSlot::Morning, "CEB 102"),
            section("DESN 400", Some("TBD")),
        )
        .unwrap();

        let report = f.audit(&plan_of(vec![g]));
        assert_eq!(report.of_kind(ConflictKind::EveningSafety).count(), 1);
        assert_eq!(report.of_kind(ConflictKind::FacultyTravel).count(), 0);
        assert_eq!(report.of_kind(ConflictKind::FacultyDoubleBooking).count(), 0);
    }

    #[test]
    fn double_booking_spans_rooms() {
        let f = Fixture::new("{}", vec![]);
        let mut g = Grid::new(Quarter::Fall);
        g.place(Slot::new(DayPattern::TR, TimeSlot::Morning, "206"), section("DESN 100", Some("Casey")))
            .unwrap();
        g.place(Slot::new(DayPattern::TR, TimeSlot::Morning, "209"), section("DESN 200", Some("Casey")))
            .unwrap();
        let report = f.audit(&plan_of(vec![g]));
        assert_eq!(report.of_kind(ConflictKind::FacultyDoubleBooking).count(), 1);
    }

    #[test]
    fn day_imbalance_and_clustering() {
        let f = Fixture::new("{}", vec![]);
        let mut g = Grid::new(Quarter::Fall);
        for (i, room) in ["206", "209", "210", "212"].iter().enumerate() {
            let mut s = section("DESN 100", None);
            s.section = format!("00{}", i + 1);
            g.place(Slot::new(DayPattern::MW, TimeSlot::Morning, *room), s).unwrap();
        }
        let report = f.audit(&plan_of(vec![g]));
        assert_eq!(report.of_kind(ConflictKind::DayImbalance).count(), 1);
        assert_eq!(report.of_kind(ConflictKind::TimeClustering).count(), 1);
    }

    #[test]
    fn required_and_prerequisite_checks() {
        let mut required = Course::new("DESN 100");
        required.required = true;
        required.quarters_offered = vec![Quarter::Fall];
        let mut advanced = Course::new("DESN 300");
        advanced.prerequisites = vec!["DESN 200".into()];
        let f = Fixture::new("{}", vec![required, advanced]);

        let mut g = Grid::new(Quarter::Fall);
        g.place(Slot::new(DayPattern::MW, TimeSlot::Morning, "206"), section("DESN 300", None))
            .unwrap();
        let report = f.audit(&plan_of(vec![g, Grid::new(Quarter::Winter)]));

        let missing: Vec<_> = report.of_kind(ConflictKind::RequiredMissing).collect();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].quarter, Some(Quarter::Fall));
        let prereq: Vec<_> = report.of_kind(ConflictKind::PrerequisiteMissing).collect();
        assert_eq!(prereq.len(), 1);
        assert_eq!(prereq[0].course.as_deref(), Some("DESN 300"));
    }

    #[test]
    fn prerequisite_in_any_quarter_satisfies() {
        let mut advanced = Course::new("DESN 300");
        advanced.prerequisites = vec!["DESN 200".into()];
        let f = Fixture::new("{}", vec![advanced]);

        let mut fall = Grid::new(Quarter::Fall);
        fall.place(Slot::new(DayPattern::MW, TimeSlot::Morning, "206"), section("DESN 300", None))
            .unwrap();
        let mut spring = Grid::new(Quarter::Spring);
        spring
            .place(Slot::new(DayPattern::MW, TimeSlot::Morning, "206"), section("DESN 200", None))
            .unwrap();
        let report = f.audit(&plan_of(vec![fall, spring]));
        assert_eq!(report.of_kind(ConflictKind::PrerequisiteMissing).count(), 0);
    }

    #[test]
    fn hard_room_violation_is_medium() {
        let mut studio = Course::new("DESN 301");
        studio.allowed_rooms = vec!["212".into()];
        studio.room_constraint_hard = true;
        let f = Fixture::new("{}", vec![studio]);

        let mut g = Grid::new(Quarter::Fall);
        g.place(Slot::new(DayPattern::MW, TimeSlot::Morning, "206"), section("DESN 301", None))
            .unwrap();
        let report = f.audit(&plan_of(vec![g]));
        let room: Vec<_> = report.of_kind(ConflictKind::RoomConstraint).collect();
        assert_eq!(room.len(), 1);
        assert_eq!(room[0].priority, Priority::Medium);
    }

    #[test]
    fn clean_plan_reports_nothing() {
        let f = Fixture::new("{}", vec![]);
        let mut g = Grid::new(Quarter::Fall);
        g.place(Slot::new(DayPattern::MW, TimeSlot::Morning, "206"), section("DESN 100", Some("Avery")))
            .unwrap();
        g.place(Slot::new(DayPattern::TR, TimeSlot::Afternoon, "206"), section("DESN 200", Some("Avery")))
            .unwrap();
        let report = f.audit(&plan_of(vec![g]));
        assert!(report.is_clean(), "{:?}", report.conflicts);
    }
}
