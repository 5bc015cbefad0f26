/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{error, info, warn};

use coursegrid::audit::AuditReport;
use coursegrid::config::{InputDocuments, SessionConfig};
use coursegrid::model::Quarter;
use coursegrid::scheduler::Plan;
use coursegrid::session::PlanningSession;
use coursegrid::workload::FacultyLoadSummary;

// ── CLI argument definition ───────────────────────────────────────────────────

/// Quarterly course schedule generator.
///
/// Example:
///   coursegrid --config session.yaml -q Fall -q Winter -o plan.yaml
#[derive(Debug, Parser)]
#[command(
    name = "coursegrid",
    about = "Generate and audit a multi-quarter course schedule",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML session configuration file.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Quarter to plan.  Repeat for several; defaults to Fall, Winter, Spring.
    #[arg(short = 'q', long = "quarter")]
    quarters: Vec<Quarter>,

    /// Write the plan here instead of stdout.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,
}

/// Everything the driver exports.
#[derive(Debug, Serialize)]
struct PlanOutput {
    plan: Plan,
    audit: AuditReport,
    faculty_loads: Vec<FacultyLoadSummary>,
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => SessionConfig::load_from_file(path)?,
        None => {
            warn!("No session configuration provided, using defaults");
            SessionConfig::default()
        }
    };
    let docs = InputDocuments::load(&config.documents)?;
    let session = PlanningSession::new(docs, config.settings);

    let quarters = if cli.quarters.is_empty() {
        Quarter::ACADEMIC.to_vec()
    } else {
        cli.quarters.clone()
    };

    let plan = session.generate_plan(&quarters);
    let audit = session.audit(&plan);
    let faculty_loads = session.faculty_loads(&plan).summaries();

    for grid in plan.grids() {
        info!(
            quarter = %grid.quarter(),
            placed = grid.placed_count(),
            unassigned = grid.unassigned().len(),
            case_by_case = grid.case_by_case().len(),
            "Quarter summary"
        );
    }

    let output = PlanOutput {
        plan,
        audit,
        faculty_loads,
    };
    let yaml = serde_yaml::to_string(&output).context("Failed to serialise plan")?;

    match &cli.output {
        Some(path) => {
            std::fs::write(path, yaml)
                .with_context(|| format!("Cannot write plan to: {}", path.display()))?;
            info!("Plan written to: {}", path.display());
        }
        None => print!("{yaml}"),
    }
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    // Logs go to stderr so stdout stays clean YAML.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!(
        config   = ?cli.config,
        quarters = ?cli.quarters,
        output   = ?cli.output,
        "coursegrid starting"
    );

    if let Err(e) = run(&cli) {
        error!("Planning failed: {:#}", e);
        process::exit(1);
    }
}
