/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Prerequisite graph: edges, flow rates and curriculum tracks.
//!
//! ```yaml
//! courses:
//!   DESN 368:
//!     prerequisites: ["DESN 216"]
//!     tracks: [web-development]
//! flow_rates:
//!   - { from: "DESN 216", to: "DESN 368", rate: 0.6 }
//! track_weights:
//!   web-development: 1.15
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{normalize_code, same_course, Quarter};

use super::history::EnrollmentHistory;

/// Share of a prerequisite's students assumed to continue when no flow rate
/// is recorded.
pub const DEFAULT_FLOW_RATE: f64 = 0.5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphCourse {
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub tracks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowRate {
    pub from: String,
    pub to: String,
    pub rate: f64,
}

fn default_track_weights() -> BTreeMap<String, f64> {
    [
        ("web-development", 1.15),
        ("ux-interaction", 1.10),
        ("animation", 1.05),
        ("game-design", 1.0),
        ("typography", 0.95),
        ("photography", 0.90),
        ("foundations", 1.0),
        ("professional", 1.0),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrerequisiteGraph {
    #[serde(default)]
    pub courses: BTreeMap<String, GraphCourse>,
    #[serde(default)]
    pub flow_rates: Vec<FlowRate>,
    #[serde(default = "default_track_weights")]
    pub track_weights: BTreeMap<String, f64>,
}

impl Default for PrerequisiteGraph {
    fn default() -> Self {
        Self {
            courses: BTreeMap::new(),
            flow_rates: Vec::new(),
            track_weights: default_track_weights(),
        }
    }
}

/// One prerequisite's contribution to a course's expected enrollment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineSource {
    pub course: String,
    pub enrollment: f64,
    pub flow_rate: f64,
    pub expected: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pipeline {
    pub total: u32,
    pub sources: Vec<PipelineSource>,
}

impl PrerequisiteGraph {
    fn course(&self, code: &str) -> Option<&GraphCourse> {
        let wanted = normalize_code(code);
        self.courses.get(&wanted).or_else(|| {
            self.courses
                .iter()
                .find(|(k, _)| normalize_code(k) == wanted)
                .map(|(_, v)| v)
        })
    }

    pub fn prerequisites(&self, code: &str) -> &[String] {
        self.course(code)
            .map(|c| c.prerequisites.as_slice())
            .unwrap_or(&[])
    }

    pub fn tracks_for(&self, code: &str) -> &[String] {
        self.course(code).map(|c| c.tracks.as_slice()).unwrap_or(&[])
    }

    pub fn flow_rate(&self, from: &str, to: &str) -> f64 {
        self.flow_rates
            .iter()
            .find(|f| same_course(&f.from, from) && same_course(&f.to, to))
            .map(|f| f.rate)
            .unwrap_or(DEFAULT_FLOW_RATE)
    }

    /// Mean weight of the course's tracks; 1.0 for untracked courses.
    pub fn track_multiplier(&self, code: &str) -> f64 {
        let tracks = self.tracks_for(code);
        if tracks.is_empty() {
            return 1.0;
        }
        let sum: f64 = tracks
            .iter()
            .map(|t| self.track_weights.get(t).copied().unwrap_or(1.0))
            .sum();
        sum / tracks.len() as f64
    }

    /// Students expected to arrive from `prerequisites`.  Each source is the
    /// prerequisite's latest enrollment in `quarter`, else its average, else 0.
    ///
    /// `None` when there are no prerequisites.
    pub fn pipeline(
        &self,
        code: &str,
        prerequisites: &[String],
        quarter: Quarter,
        history: &EnrollmentHistory,
    ) -> Option<Pipeline> {
        if prerequisites.is_empty() {
            return None;
        }

        let sources: Vec<PipelineSource> = prerequisites
            .iter()
            .map(|pre| {
                let record = history.get(pre);
                let enrollment = record
                    .and_then(|r| r.latest(quarter).map(f64::from).or_else(|| r.average()))
                    .unwrap_or(0.0);
                let flow_rate = self.flow_rate(pre, code);
                PipelineSource {
                    course: pre.clone(),
                    enrollment,
                    flow_rate,
                    expected: (enrollment * flow_rate).round().max(0.0) as u32,
                }
            })
            .collect();

        Some(Pipeline {
            total: sources.iter().map(|s| s.expected).sum(),
            sources,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demand::history::{CourseEnrollment, QuarterlyEnrollment};

    fn graph() -> PrerequisiteGraph {
        let yaml = r#"
courses:
  DESN 368:
    prerequisites: ["DESN 216"]
    tracks: [web-development, typography]
  DESN 468:
    prerequisites: ["DESN 368", "DESN 100"]
  DESN 100:
    prerequisites: ["DESN 468"]
flow_rates:
  - { from: "DESN 216", to: "DESN 368", rate: 0.6 }
"#;
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn default_track_weights_present_when_omitted() {
        let g = graph();
        assert_eq!(g.track_weights.get("web-development"), Some(&1.15));
        assert!((g.track_multiplier("DESN 368") - 1.05).abs() < 1e-9);
        assert_eq!(g.track_multiplier("DESN 468"), 1.0);
    }

    #[test]
    fn flow_rate_defaults_to_half() {
        let g = graph();
        assert_eq!(g.flow_rate("DESN-216", "DESN 368"), 0.6);
        assert_eq!(g.flow_rate("DESN 368", "DESN 468"), DEFAULT_FLOW_RATE);
    }

    #[test]
    fn pipeline_prefers_same_quarter_then_average() {
        let g = graph();
        let mut history = EnrollmentHistory::default();
        history.insert(
            "DESN 368",
            CourseEnrollment {
                quarterly: vec![QuarterlyEnrollment {
                    quarter: Quarter::Fall,
                    year: 2024,
                    total: 30,
                }],
                ..Default::default()
            },
        );
        history.insert(
            "DESN 100",
            CourseEnrollment {
                average: Some(41.0),
                ..Default::default()
            },
        );

        let pre = g.prerequisites("DESN 468").to_vec();
        let p = g.pipeline("DESN 468", &pre, Quarter::Fall, &history).unwrap();
        assert_eq!(p.sources[0].expected, 15);
        // 41 × 0.5 = 20.5 → 21
        assert_eq!(p.sources[1].expected, 21);
        assert_eq!(p.total, 36);

        assert!(g.pipeline("DESN 216", &[], Quarter::Fall, &history).is_none());
    }
}
