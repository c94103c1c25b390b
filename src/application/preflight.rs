//! Host preflight checks, run once before orchestration.

use tracing::{info, warn};

use crate::port::{PreflightReport, RuleOutcome, RuleRegistry, RuleStatus};

/// Run every registered rule not named in `skip`.
#[must_use]
pub fn run_preflight(registry: &RuleRegistry, skip: &[String]) -> PreflightReport {
    let outcomes = registry
        .rules()
        .iter()
        .map(|rule| {
            let name = rule.name();
            if skip.iter().any(|s| s.eq_ignore_ascii_case(name)) {
                info!(rule = name, "Preflight rule skipped");
                return RuleOutcome {
                    name,
                    level: rule.level(),
                    status: RuleStatus::Skipped,
                    detail: "skipped".into(),
                    hint: None,
                };
            }

            match rule.verify() {
                Ok(()) => {
                    let detail = rule.message();
                    info!(rule = name, "{detail}");
                    RuleOutcome {
                        name,
                        level: rule.level(),
                        status: RuleStatus::Passed,
                        detail,
                        hint: None,
                    }
                }
                Err(violation) => {
                    warn!(rule = name, level = %rule.level(), reason = %violation, "Preflight rule failed");
                    RuleOutcome {
                        name,
                        level: rule.level(),
                        status: RuleStatus::Failed,
                        detail: violation.to_string(),
                        hint: rule.hint(),
                    }
                }
            }
        })
        .collect();

    PreflightReport { outcomes }
}
