/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Session configuration and input document loading.
//!
//! The expected YAML structure is:
//! ```yaml
//! documents:
//!   rules: scheduling-rules.yaml
//!   catalog: course-catalog.yaml
//!   enrollment: enrollment-history.yaml
//!   roster: faculty.yaml
//!   prerequisites: prerequisite-graph.yaml
//! settings:
//!   evening_cutoff: "16:00"
//!   minimum_evening_instructors: 2
//!   day_imbalance_threshold: 3
//!   default_enrollment_cap: 24
//! ```
//!
//! Every document path is optional.  Relative paths are resolved against the
//! directory holding the configuration file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::audit::AuditSettings;
use crate::demand::graph::PrerequisiteGraph;
use crate::demand::history::EnrollmentHistory;
use crate::model::{ClockTime, CourseCatalog};
use crate::planner::RecommendationSettings;
use crate::roster::FacultyRoster;
use crate::rules::{SchedulingRules, DEFAULT_EVENING_CUTOFF, DEFAULT_MIN_EVENING_INSTRUCTORS};
use crate::scheduler::AssignerSettings;

// ── PlannerSettings ───────────────────────────────────────────────────────────

fn default_evening_cutoff() -> ClockTime {
    DEFAULT_EVENING_CUTOFF
}

fn default_min_evening() -> u32 {
    DEFAULT_MIN_EVENING_INSTRUCTORS
}

fn default_imbalance() -> usize {
    3
}

fn default_cap() -> u32 {
    24
}

fn default_fallback_demand() -> u32 {
    20
}

fn default_fallback_confidence() -> f64 {
    0.3
}

fn default_cluster_ratio() -> f64 {
    0.6
}

/// Tunable thresholds shared by every stage of a planning run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlannerSettings {
    /// Evening cutoff used when the rules document has no evening rule.
    #[serde(default = "default_evening_cutoff")]
    pub evening_cutoff: ClockTime,
    #[serde(default = "default_min_evening")]
    pub minimum_evening_instructors: u32,
    #[serde(default = "default_imbalance")]
    pub day_imbalance_threshold: usize,
    /// Per-section capacity for courses missing from the catalog.
    #[serde(default = "default_cap")]
    pub default_enrollment_cap: u32,
    /// Demand assumed for catalog courses with no enrollment history.
    #[serde(default = "default_fallback_demand")]
    pub fallback_demand: u32,
    #[serde(default = "default_fallback_confidence")]
    pub fallback_confidence: f64,
    #[serde(default = "default_cluster_ratio")]
    pub morning_cluster_ratio: f64,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            evening_cutoff: default_evening_cutoff(),
            minimum_evening_instructors: default_min_evening(),
            day_imbalance_threshold: default_imbalance(),
            default_enrollment_cap: default_cap(),
            fallback_demand: default_fallback_demand(),
            fallback_confidence: default_fallback_confidence(),
            morning_cluster_ratio: default_cluster_ratio(),
        }
    }
}

impl PlannerSettings {
    pub fn assigner(&self) -> AssignerSettings {
        AssignerSettings {
            evening_cutoff: self.evening_cutoff,
            minimum_evening_instructors: self.minimum_evening_instructors,
        }
    }

    pub fn recommendation(&self) -> RecommendationSettings {
        RecommendationSettings {
            fallback_demand: self.fallback_demand,
            fallback_confidence: self.fallback_confidence,
        }
    }

    pub fn audit(&self) -> AuditSettings {
        AuditSettings {
            evening_cutoff: self.evening_cutoff,
            minimum_evening_instructors: self.minimum_evening_instructors,
            day_imbalance_threshold: self.day_imbalance_threshold,
            morning_cluster_ratio: self.morning_cluster_ratio,
        }
    }
}

// ── SessionConfig ─────────────────────────────────────────────────────────────

/// Where each input document lives.  `None` means "not available".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentPaths {
    #[serde(default)]
    pub rules: Option<PathBuf>,
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    #[serde(default)]
    pub enrollment: Option<PathBuf>,
    #[serde(default)]
    pub roster: Option<PathBuf>,
    #[serde(default)]
    pub prerequisites: Option<PathBuf>,
}

impl DocumentPaths {
    fn resolve_against(&mut self, base: &Path) {
        for path in [
            &mut self.rules,
            &mut self.catalog,
            &mut self.enrollment,
            &mut self.roster,
            &mut self.prerequisites,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub documents: DocumentPaths,
    #[serde(default)]
    pub settings: PlannerSettings,
}

impl SessionConfig {
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid YAML.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading session configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;
        let mut config: SessionConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML file: {}", path.display()))?;

        if let Some(base) = path.parent() {
            config.documents.resolve_against(base);
        }
        debug!(documents = ?config.documents, settings = ?config.settings, "session configuration");
        Ok(config)
    }
}

// ── InputDocuments ────────────────────────────────────────────────────────────

/// Every parsed input of one planning session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputDocuments {
    pub rules: SchedulingRules,
    pub catalog: CourseCatalog,
    pub history: EnrollmentHistory,
    pub roster: FacultyRoster,
    pub graph: PrerequisiteGraph,
}

/// Parses one document, or returns its default when `path` is `None`.
fn load_document<T: DeserializeOwned + Default>(label: &str, path: Option<&Path>) -> Result<T> {
    let Some(path) = path else {
        warn!("No {label} document configured, using defaults");
        return Ok(T::default());
    };
    debug!("Loading {label} document from: {}", path.display());
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot open {label} document: {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse {label} document: {}", path.display()))
}

impl InputDocuments {
    /// # Errors
    /// Returns the first document that is configured but cannot be read or
    /// parsed.  Unconfigured documents are not errors.
    pub fn load(paths: &DocumentPaths) -> Result<Self> {
        let docs = Self {
            rules: load_document("rules", paths.rules.as_deref())?,
            catalog: load_document("catalog", paths.catalog.as_deref())?,
            history: load_document("enrollment", paths.enrollment.as_deref())?,
            roster: load_document("roster", paths.roster.as_deref())?,
            graph: load_document("prerequisites", paths.prerequisites.as_deref())?,
        };
        info!(
            courses = docs.catalog.len(),
            enrollment_records = docs.history.courses.len(),
            faculty = docs.roster.faculty.len(),
            graph_courses = docs.graph.courses.len(),
            "Input documents loaded"
        );
        Ok(docs)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
