//! Handler for `strata check`.

use serde_json::json;

use crate::adapter::inbound::cli::operator::operator;
use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::port::{PreflightReport, RuleLevel, RuleStatus};

fn print_report(report: &PreflightReport) {
    output::section("Preflight");
    for outcome in &report.outcomes {
        let mark = match outcome.status {
            RuleStatus::Passed => output::status_mark(true),
            RuleStatus::Skipped => output::muted("-"),
            RuleStatus::Failed => output::status_mark(false),
        };
        let suffix = match (outcome.status, outcome.level) {
            (RuleStatus::Failed, RuleLevel::Warning) => " (warning)",
            _ => "",
        };
        output::field(
            outcome.name,
            format!("{mark} {}{suffix}", outcome.detail),
        );
        if let Some(hint) = &outcome.hint {
            output::hint(hint);
        }
    }
}

/// Execute `check`.
pub fn execute(config_toml: &str, skip: &[String]) -> Result<()> {
    let report = operator().check_host(config_toml, skip)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "check",
            "passed": report.blocking_failures().is_empty(),
            "rules": report.outcomes,
        }));
    } else {
        print_report(&report);
    }

    let report = report.into_result()?;
    if !output::is_json() {
        output::success(&format!("{} rule(s) checked", report.outcomes.len()));
    }
    Ok(())
}
