/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Enrollment demand estimation.
//!
//! A prediction blends up to two signals and then scales the blend:
//!
//! ```text
//! historical (w 0.40) ─┐
//!                      ├─► weighted mean ─► × seasonal ratio ─► × track weight
//! prerequisite (w 0.35)┘
//! ```
//!
//! The section count and the increase/reduce recommendation follow from the
//! predicted demand and the current per-section capacity.

pub mod graph;
pub mod history;
pub mod regression;

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::model::{normalize_code, CourseCatalog, Quarter};

use graph::{Pipeline, PrerequisiteGraph};
use history::{CourseEnrollment, EnrollmentHistory};

const HISTORICAL_WEIGHT: f64 = 0.40;
const PREREQUISITE_WEIGHT: f64 = 0.35;
const PREREQUISITE_CONFIDENCE: f64 = 0.7;

const INCREASE_AT: f64 = 1.10;
const REDUCE_BELOW: f64 = 0.60;
const OPTIMAL_RANGE: (f64, f64) = (0.85, 1.05);

// ── Prediction types ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn from_score(confidence: f64) -> Self {
        if confidence >= 0.8 {
            ConfidenceLevel::High
        } else if confidence >= 0.6 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

/// Declaration order is urgency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Increase,
    Reduce,
    Optimal,
    Adequate,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Recommendation::Increase => "increase",
            Recommendation::Reduce => "reduce",
            Recommendation::Optimal => "optimal",
            Recommendation::Adequate => "adequate",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HistoricalMethod {
    Average,
    SinglePoint,
    Regression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Growing,
    Declining,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalSignal {
    pub value: f64,
    pub confidence: f64,
    pub method: HistoricalMethod,
    pub trend: Trend,
    pub data_points: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrerequisiteSignal {
    pub value: f64,
    pub confidence: f64,
    pub pipeline: Pipeline,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandAnalysis {
    pub historical: Option<HistoricalSignal>,
    pub prerequisite: Option<PrerequisiteSignal>,
    pub seasonal_multiplier: f64,
    pub track_multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandPrediction {
    pub course_code: String,
    pub quarter: Quarter,
    pub predicted_demand: u32,
    pub confidence: f64,
    pub confidence_level: ConfidenceLevel,
    pub recommendation: Recommendation,
    pub suggested_sections: u32,
    pub current_sections: u32,
    pub section_capacity: u32,
    pub utilization: f64,
    pub analysis: DemandAnalysis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuarterDemandSummary {
    pub quarter: Quarter,
    pub total_courses: usize,
    pub total_predicted_demand: u64,
    pub total_current_capacity: u64,
    pub overall_utilization: f64,
    pub needing_more_sections: usize,
    pub can_reduce: usize,
    pub at_optimal: usize,
    pub mean_confidence: f64,
}

// ── Pure helpers ──────────────────────────────────────────────────────────────

/// `ceil(demand / cap)`.  Zero demand needs zero sections; a zero cap is
/// treated as one seat.
pub fn sections_needed(demand: u32, cap: u32) -> u32 {
    demand.div_ceil(cap.max(1))
}

/// Recommendation and suggested section count for `demand` against
/// `current_sections` sections of `cap` seats.
pub fn recommend(demand: u32, cap: u32, current_sections: u32) -> (Recommendation, u32, f64) {
    let total = f64::from(cap.max(1)) * f64::from(current_sections.max(1));
    let utilization = f64::from(demand) / total;
    let needed = sections_needed(demand, cap);

    // tolerance keeps 22/20 on the increase side of 1.10
    if utilization >= INCREASE_AT - 1e-9 {
        (Recommendation::Increase, needed, utilization)
    } else if utilization < REDUCE_BELOW && current_sections > 1 {
        (Recommendation::Reduce, needed.max(1), utilization)
    } else if (OPTIMAL_RANGE.0..=OPTIMAL_RANGE.1).contains(&utilization) {
        (Recommendation::Optimal, current_sections, utilization)
    } else {
        (Recommendation::Adequate, current_sections, utilization)
    }
}

/// Weighted confidence over the terms present; 0.5 when none are.
pub fn combined_confidence(
    historical: Option<f64>,
    prerequisite: Option<f64>,
    record: &CourseEnrollment,
) -> f64 {
    let mut score = 0.0;
    let mut weight = 0.0;
    if let Some(c) = historical.filter(|c| *c > 0.0) {
        score += 0.5 * c;
        weight += 0.5;
    }
    if let Some(c) = prerequisite.filter(|c| *c > 0.0) {
        score += 0.3 * c;
        weight += 0.3;
    }
    if record.sections.unwrap_or(0) >= 3 {
        score += 0.1;
        weight += 0.1;
    }
    if !record.is_new {
        score += 0.1;
        weight += 0.1;
    }
    if weight > 0.0 {
        (score / weight).clamp(0.0, 1.0)
    } else {
        0.5
    }
}

// ── DemandEstimator ───────────────────────────────────────────────────────────

/// Borrowed view over the history, graph and catalog.
#[derive(Debug, Clone, Copy)]
pub struct DemandEstimator<'a> {
    history: &'a EnrollmentHistory,
    graph: &'a PrerequisiteGraph,
    catalog: &'a CourseCatalog,
    default_cap: u32,
}

impl<'a> DemandEstimator<'a> {
    pub fn new(
        history: &'a EnrollmentHistory,
        graph: &'a PrerequisiteGraph,
        catalog: &'a CourseCatalog,
        default_cap: u32,
    ) -> Self {
        Self {
            history,
            graph,
            catalog,
            default_cap,
        }
    }

    /// Per-section capacity: catalog value, else the configured default.
    pub fn section_capacity(&self, code: &str) -> u32 {
        self.catalog
            .get(code)
            .map(|c| c.default_enrollment_cap)
            .unwrap_or(self.default_cap)
    }

    /// Graph prerequisites, else the catalog's.
    pub fn prerequisites(&self, code: &str) -> Vec<String> {
        let from_graph = self.graph.prerequisites(code);
        if !from_graph.is_empty() {
            return from_graph.to_vec();
        }
        self.catalog
            .get(code)
            .map(|c| c.prerequisites.clone())
            .unwrap_or_default()
    }

    fn historical_signal(record: &CourseEnrollment, quarter: Quarter) -> Option<HistoricalSignal> {
        let series = record.series(quarter);
        match series.len() {
            0 => record.average().map(|avg| HistoricalSignal {
                value: avg,
                confidence: 0.3,
                method: HistoricalMethod::Average,
                trend: Trend::Stable,
                data_points: 0,
            }),
            1 => Some(HistoricalSignal {
                value: series[0],
                confidence: 0.5,
                method: HistoricalMethod::SinglePoint,
                trend: Trend::Stable,
                data_points: 1,
            }),
            n => {
                let fit = regression::fit_indexed(&series)?;
                let trend = if fit.slope > 0.0 {
                    Trend::Growing
                } else if fit.slope < 0.0 {
                    Trend::Declining
                } else {
                    Trend::Stable
                };
                Some(HistoricalSignal {
                    value: fit.at(n as f64).round(),
                    confidence: (0.5 + 0.1 * n as f64).min(0.9),
                    method: HistoricalMethod::Regression,
                    trend,
                    data_points: n,
                })
            }
        }
    }

    fn seasonal_multiplier(record: &CourseEnrollment, quarter: Quarter) -> f64 {
        let series = record.series(quarter);
        if series.is_empty() {
            return 1.0;
        }
        let quarter_avg = series.iter().sum::<f64>() / series.len() as f64;
        match record.average() {
            Some(overall) if overall > 0.0 => quarter_avg / overall,
            _ => 1.0,
        }
    }

    /// `None` when the history has no record of `code`.
    pub fn predict(&self, code: &str, quarter: Quarter) -> Option<DemandPrediction> {
        let record = self.history.get(code)?;

        let historical = Self::historical_signal(record, quarter);
        let prerequisites = self.prerequisites(code);
        let prerequisite = self
            .graph
            .pipeline(code, &prerequisites, quarter, self.history)
            .map(|pipeline| PrerequisiteSignal {
                value: f64::from(pipeline.total),
                confidence: PREREQUISITE_CONFIDENCE,
                pipeline,
            });
        let seasonal = Self::seasonal_multiplier(record, quarter);
        let track = self.graph.track_multiplier(code);

        let mut weighted = 0.0;
        let mut weight = 0.0;
        if let Some(h) = &historical {
            weighted += h.value * HISTORICAL_WEIGHT;
            weight += HISTORICAL_WEIGHT;
        }
        if let Some(p) = &prerequisite {
            weighted += p.value * PREREQUISITE_WEIGHT;
            weight += PREREQUISITE_WEIGHT;
        }

        let cap = self.section_capacity(code);
        let raw = if weight > 0.0 {
            (weighted / weight) * seasonal * track
        } else {
            record.average().unwrap_or(f64::from(cap))
        };
        let demand = raw.round().max(0.0) as u32;

        let confidence = combined_confidence(
            historical.as_ref().map(|h| h.confidence),
            prerequisite.as_ref().map(|p| p.confidence),
            record,
        );
        let current_sections = record.current_sections();
        let (recommendation, suggested_sections, utilization) =
            recommend(demand, cap, current_sections);

        debug!(
            course = %code,
            quarter = %quarter,
            demand,
            confidence,
            recommendation = %recommendation,
            "demand predicted"
        );

        Some(DemandPrediction {
            course_code: normalize_code(code),
            quarter,
            predicted_demand: demand,
            confidence,
            confidence_level: ConfidenceLevel::from_score(confidence),
            recommendation,
            suggested_sections,
            current_sections,
            section_capacity: cap,
            utilization,
            analysis: DemandAnalysis {
                historical,
                prerequisite,
                seasonal_multiplier: seasonal,
                track_multiplier: track,
            },
        })
    }

    /// Every course in the history, most urgent first, then by demand
    /// descending, then by code.
    pub fn predict_quarter(&self, quarter: Quarter) -> Vec<DemandPrediction> {
        let mut predictions: Vec<DemandPrediction> = self
            .history
            .codes()
            .filter_map(|code| self.predict(code, quarter))
            .collect();
        predictions.sort_by(|a, b| {
            a.recommendation
                .cmp(&b.recommendation)
                .then_with(|| b.predicted_demand.cmp(&a.predicted_demand))
                .then_with(|| a.course_code.cmp(&b.course_code))
        });
        predictions
    }

    pub fn quarter_summary(&self, quarter: Quarter) -> QuarterDemandSummary {
        let predictions = self.predict_quarter(quarter);
        let total_demand: u64 = predictions.iter().map(|p| u64::from(p.predicted_demand)).sum();
        let total_capacity: u64 = predictions
            .iter()
            .map(|p| u64::from(p.section_capacity) * u64::from(p.current_sections))
            .sum();
        let count = |r: Recommendation| predictions.iter().filter(|p| p.recommendation == r).count();
        let mean_confidence = if predictions.is_empty() {
            0.0
        } else {
            predictions.iter().map(|p| p.confidence).sum::<f64>() / predictions.len() as f64
        };

        QuarterDemandSummary {
            quarter,
            total_courses: predictions.len(),
            total_predicted_demand: total_demand,
            total_current_capacity: total_capacity,
            overall_utilization: if total_capacity > 0 {
                total_demand as f64 / total_capacity as f64
            } else {
                0.0
            },
            needing_more_sections: count(Recommendation::Increase),
            can_reduce: count(Recommendation::Reduce),
            at_optimal: count(Recommendation::Optimal),
            mean_confidence,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Course;
    use history::QuarterlyEnrollment;

    fn fall(year: u32, total: u32) -> QuarterlyEnrollment {
        QuarterlyEnrollment {
            quarter: Quarter::Fall,
            year,
            total,
        }
    }

    #[test]
    fn sections_needed_rounds_up() {
        assert_eq!(sections_needed(0, 24), 0);
        assert_eq!(sections_needed(24, 24), 1);
        assert_eq!(sections_needed(25, 24), 2);
        assert_eq!(sections_needed(22, 20), 2);
    }

    #[test]
    fn increase_at_exactly_one_ten() {
        let (rec, suggested, util) = recommend(22, 20, 1);
        assert_eq!(rec, Recommendation::Increase);
        assert_eq!(suggested, 2);
        assert!((util - 1.10).abs() < 1e-9);
    }

    #[test]
    fn recommendation_bands() {
        // 10 / 48 ≈ 0.21 with two sections → reduce to one
        assert_eq!(recommend(10, 24, 2), (Recommendation::Reduce, 1, 10.0 / 48.0));
        // low utilization but a single section stays adequate
        assert_eq!(recommend(10, 24, 1).0, Recommendation::Adequate);
        assert_eq!(recommend(22, 24, 1).0, Recommendation::Optimal);
        assert_eq!(recommend(18, 24, 1).0, Recommendation::Adequate);
    }

    #[test]
    fn regression_continues_slope() {
        let mut history = EnrollmentHistory::default();
        history.insert(
            "DESN 216",
            CourseEnrollment {
                quarterly: vec![fall(2022, 40), fall(2023, 44), fall(2024, 48)],
                ..Default::default()
            },
        );
        let graph = PrerequisiteGraph::default();
        let catalog = CourseCatalog::default();
        let est = DemandEstimator::new(&history, &graph, &catalog, 24);

        let p = est.predict("DESN 216", Quarter::Fall).unwrap();
        let h = p.analysis.historical.as_ref().unwrap();
        assert_eq!(h.method, HistoricalMethod::Regression);
        assert_eq!(h.trend, Trend::Growing);
        assert!((h.confidence - 0.8).abs() < 1e-9);
        // only Fall data, so the seasonal ratio is 1.0
        assert_eq!(p.analysis.seasonal_multiplier, 1.0);
        assert_eq!(p.predicted_demand, 52);
    }

    #[test]
    fn unknown_course_has_no_prediction() {
        let history = EnrollmentHistory::default();
        let graph = PrerequisiteGraph::default();
        let catalog = CourseCatalog::default();
        let est = DemandEstimator::new(&history, &graph, &catalog, 24);
        assert!(est.predict("DESN 999", Quarter::Fall).is_none());
    }

    #[test]
    fn prerequisite_signal_blends_with_history() {
        let mut history = EnrollmentHistory::default();
        history.insert(
            "DESN 216",
            CourseEnrollment {
                quarterly: vec![fall(2024, 40)],
                ..Default::default()
            },
        );
        history.insert(
            "DESN 368",
            CourseEnrollment {
                quarterly: vec![fall(2024, 20)],
                ..Default::default()
            },
        );
        let graph = PrerequisiteGraph::default();
        let mut course = Course::new("DESN 368");
        course.prerequisites = vec!["DESN 216".into()];
        let catalog = CourseCatalog::new(vec![course]);
        let est = DemandEstimator::new(&history, &graph, &catalog, 24);

        let p = est.predict("DESN 368", Quarter::Fall).unwrap();
        // (20·0.40 + 20·0.35) / 0.75 = 20
        assert_eq!(p.analysis.prerequisite.as_ref().unwrap().value, 20.0);
        assert_eq!(p.predicted_demand, 20);
        // (0.5·0.5 + 0.3·0.7 + 0.1) / 0.9
        assert!((p.confidence - 0.56 / 0.9).abs() < 1e-9);
        assert_eq!(p.confidence_level, ConfidenceLevel::Medium);
    }

    #[test]
    fn confidence_weights_only_present_terms() {
        let new_course = CourseEnrollment {
            is_new: true,
            ..Default::default()
        };
        assert_eq!(combined_confidence(None, None, &new_course), 0.5);
        let established = CourseEnrollment {
            sections: Some(3),
            ..Default::default()
        };
        // (0.5·0.3 + 0.1 + 0.1) / 0.7
        assert!((combined_confidence(Some(0.3), None, &established) - 0.35 / 0.7).abs() < 1e-9);
    }

    #[test]
    fn quarter_predictions_sorted_by_urgency() {
        let mut history = EnrollmentHistory::default();
        history.insert(
            "DESN 100",
            CourseEnrollment {
                quarterly: vec![fall(2024, 60)],
                ..Default::default()
            },
        );
        history.insert(
            "DESN 200",
            CourseEnrollment {
                quarterly: vec![fall(2024, 22)],
                ..Default::default()
            },
        );
        history.insert(
            "DESN 300",
            CourseEnrollment {
                quarterly: vec![fall(2024, 5)],
                sections: Some(2),
                ..Default::default()
            },
        );
        let graph = PrerequisiteGraph::default();
        let catalog = CourseCatalog::default();
        let est = DemandEstimator::new(&history, &graph, &catalog, 24);

        let codes: Vec<String> = est
            .predict_quarter(Quarter::Fall)
            .into_iter()
            .map(|p| p.course_code)
            .collect();
        assert_eq!(codes, vec!["DESN 100", "DESN 300", "DESN 200"]);

        let summary = est.quarter_summary(Quarter::Fall);
        assert_eq!(summary.total_courses, 3);
        assert_eq!(summary.total_predicted_demand, 87);
        assert_eq!(summary.total_current_capacity, 24 + 24 + 48);
        assert_eq!(summary.needing_more_sections, 1);
        assert_eq!(summary.can_reduce, 1);
        assert_eq!(summary.at_optimal, 1);
    }
}
