//! Run verdict: classification, console summary and the JSON report

use crate::error::ScenarioError;
use crate::session::Session;
use isubench_core::{Category, Failure, ScoreSummary};
use isubench_logging::contestant;
use serde::Serialize;
use std::path::Path;
use tracing::info;

pub const REASON_PASSED: &str = "passed";
pub const REASON_FAILED: &str = "failed";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub passed: bool,
    pub score: ScoreSummary,
    pub language: String,
    pub reason: String,
}

/// Judge the run from everything the session collected
///
/// In prepare-only mode any recorded failure fails the run. Otherwise a
/// failed prepare or any non-scenario failure is fatal, which zeroes the
/// total but keeps the breakdown.
pub fn judge(session: &Session, prepared: bool) -> Verdict {
    let failures = session.errors.all();
    let scenario_errors = failures
        .iter()
        .filter(|f| f.category() == Category::Scenario)
        .count() as u64;
    let mut score = session
        .score
        .summarize(scenario_errors, session.config.load.error_deduction);

    let passed = if session.config.target.prepare_only {
        prepared && failures.is_empty()
    } else {
        prepared && !failures.iter().any(Failure::is_fatal)
    };
    if !passed {
        score.total = 0;
    }

    Verdict {
        passed,
        score,
        language: session.language(),
        reason: if passed { REASON_PASSED } else { REASON_FAILED }.to_string(),
    }
}

/// Summary order: fatal categories first
const CATEGORIES: [Category; 5] = [
    Category::Internal,
    Category::Unexpected,
    Category::Initialize,
    Category::Validation,
    Category::Scenario,
];

fn category_label(category: Category) -> &'static str {
    match category {
        Category::Internal => "[INTERNAL]",
        Category::Unexpected => "[UNEXPECTED]",
        Category::Initialize => "[INITIALIZATION_ERR]",
        Category::Validation => "[VALIDATION_ERR]",
        Category::Scenario => "[SCENARIO_ERR]",
    }
}

/// Console summary: a count per recorded category, fatal failures in full,
/// scenario failures up to the display cap, then the verdict
pub fn summary_lines(session: &Session, verdict: &Verdict) -> Vec<String> {
    let grouped = session.errors.by_category();
    let mut lines = Vec::new();

    for category in CATEGORIES {
        if let Some(failures) = grouped.get(&category) {
            lines.push(format!("{} {}", category_label(category), failures.len()));
        }
    }

    for category in CATEGORIES.into_iter().filter(Category::is_fatal) {
        let label = category_label(category);
        for failure in grouped.get(&category).into_iter().flatten() {
            lines.push(format!("{} {}", label, failure.describe()));
        }
    }

    let scenario = grouped.get(&Category::Scenario).cloned().unwrap_or_default();
    let cap = session.config.load.error_display_cap;
    for (i, failure) in scenario.iter().take(cap).enumerate() {
        lines.push(format!("ERROR[{}] {}", i, failure.describe()));
    }
    if scenario.len() > cap {
        lines.push(format!(
            "... and {} more errors ({} in total)",
            scenario.len() - cap,
            scenario.len()
        ));
    }

    lines.push(format!("[PASSED] {}", verdict.passed));
    lines.push(format!(
        "[SCORE] {} (addition: {}, deduction: {})",
        verdict.score.total, verdict.score.addition, verdict.score.deduction
    ));
    lines
}

pub fn print_summary(session: &Session, verdict: &Verdict) {
    for line in summary_lines(session, verdict) {
        contestant!("{}", line);
    }
}
