//! Sequential scenario runner.
//!
//! Each scenario is sent, printed and judged before the next one starts.
//! The printout goes to the caller's writer; a [`SuiteReport`] records the
//! verdicts for machine consumption.

use super::{Outcome, Scenario, Suite, Verdict};
use crate::config::ProbeConfig;
use crate::executor::{execute_request, format_timing_breakdown, ExecutionConfig};
use crate::formatter::format_outcome;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::{self, Write};
use std::time::Instant;

/// Printed between scenarios.
pub const SEPARATOR: &str = "---------------------------------------";

/// Result of one scenario.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioReport {
    pub name: String,
    pub description: String,
    pub status_code: Option<u16>,
    #[serde(flatten)]
    pub verdict: Verdict,
    pub duration_ms: u128,
}

/// Result of a whole suite run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteReport {
    pub suite: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub scenarios: Vec<ScenarioReport>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.scenarios.iter().filter(|s| s.verdict.is_pass()).count()
    }

    pub fn failed(&self) -> usize {
        self.scenarios.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    /// e.g. `post: 2 passed, 1 failed`
    pub fn summary(&self) -> String {
        format!(
            "{}: {} passed, {} failed",
            self.suite,
            self.passed(),
            self.failed()
        )
    }
}

/// Sends one scenario's request and judges the outcome.
pub fn run_scenario(scenario: &Scenario, config: &ExecutionConfig) -> (Outcome, ScenarioReport) {
    let started = Instant::now();
    let outcome = Outcome::from(execute_request(&scenario.request, config));
    let verdict = scenario.expectation.evaluate(&outcome);

    if let Outcome::Response(response) = &outcome {
        log::debug!("{}: {}", scenario.name, format_timing_breakdown(&response.timing));
    }

    match &verdict {
        Verdict::Pass => log::info!("{}: {}", scenario.name, verdict),
        Verdict::Fail(_) => log::warn!("{}: {}", scenario.name, verdict),
    }

    let report = ScenarioReport {
        name: scenario.name.clone(),
        description: scenario.description.clone(),
        status_code: outcome.status_code(),
        verdict,
        duration_ms: started.elapsed().as_millis(),
    };
    (outcome, report)
}

/// Runs scenarios in order, writing the printout for each to `out`.
pub fn run_scenarios<W: Write>(
    title: &str,
    scenarios: &[Scenario],
    config: &ExecutionConfig,
    out: &mut W,
) -> io::Result<SuiteReport> {
    let started_at = Utc::now();
    let mut reports = Vec::with_capacity(scenarios.len());

    for scenario in scenarios {
        writeln!(out, "{}", SEPARATOR)?;
        writeln!(out, "{}", scenario.description)?;

        let (outcome, report) = run_scenario(scenario, config);
        write!(out, "{}", format_outcome(&outcome))?;
        writeln!(out, "Verdict: {}", report.verdict)?;
        out.flush()?;

        reports.push(report);
    }
    writeln!(out, "{}", SEPARATOR)?;

    Ok(SuiteReport {
        suite: title.to_string(),
        started_at,
        finished_at: Utc::now(),
        scenarios: reports,
    })
}

/// Prints the suite banner and runs its scenarios against `config`.
pub fn run_suite<W: Write>(
    suite: Suite,
    config: &ProbeConfig,
    out: &mut W,
) -> io::Result<SuiteReport> {
    writeln!(out, "{}", suite.title())?;
    writeln!(out, "{}", suite.subtitle())?;

    log::debug!("Running suite {} against {}", suite, config.base_url);
    let scenarios = suite.scenarios(config);
    let report = run_scenarios(suite.as_str(), &scenarios, &ExecutionConfig::from(config), out)?;
    writeln!(out, "{}", report.summary())?;

    Ok(report)
}
