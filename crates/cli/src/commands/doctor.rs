use advisor_core::config::{AppConfig, LoadOptions};
use advisor_core::domain::advice::CategoryFilter;
use advisor_core::session::AdvisorySession;
use serde::Serialize;

use crate::commands::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

/// Exits 0 only when every check passes. The first failing check picks the
/// error class: 2 for config, 3 for data files, 5 for everything downstream.
pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let failure = report
        .checks
        .iter()
        .find(|check| check.status == CheckStatus::Fail)
        .map(|check| match check.name {
            "config_validation" => ("config_validation", 2),
            "data_files" => ("data_load", 3),
            _ => ("readiness_check_failed", 5),
        });

    if !json_output {
        let exit_code = failure.map_or(0, |(_, exit_code)| exit_code);
        return CommandResult { exit_code, output: render_human(&report) };
    }

    match failure {
        None => CommandResult::success_with_data("doctor", report.summary.clone(), &report),
        Some((error_class, exit_code)) => CommandResult::failure_with_data(
            "doctor",
            error_class,
            report.summary.clone(),
            exit_code,
            &report,
        ),
    }
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });

            match AdvisorySession::from_config(&config) {
                Ok(mut session) => {
                    checks.push(DoctorCheck {
                        name: "data_files",
                        status: CheckStatus::Pass,
                        details: describe_data_sources(&config),
                    });
                    checks.push(check_catalog_readiness(&session));
                    checks.push(check_advice_generation(&mut session));
                }
                Err(error) => {
                    checks.push(DoctorCheck {
                        name: "data_files",
                        status: CheckStatus::Fail,
                        details: error.to_string(),
                    });
                    checks.push(skipped("catalog_readiness", "data files did not load"));
                    checks.push(skipped("advice_generation", "data files did not load"));
                }
            }
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(skipped("data_files", "configuration did not load"));
            checks.push(skipped("catalog_readiness", "configuration did not load"));
            checks.push(skipped("advice_generation", "configuration did not load"));
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn skipped(name: &'static str, reason: &str) -> DoctorCheck {
    DoctorCheck {
        name,
        status: CheckStatus::Skipped,
        details: format!("skipped because {reason}"),
    }
}

fn describe_data_sources(config: &AppConfig) -> String {
    let profiles = config
        .data
        .profiles_path
        .as_ref()
        .map_or_else(|| "seed personas".to_string(), |path| path.display().to_string());
    let catalog = config
        .data
        .catalog_path
        .as_ref()
        .map_or_else(|| "seed catalog".to_string(), |path| path.display().to_string());
    format!("profiles from {profiles}, catalog from {catalog}")
}

fn check_catalog_readiness(session: &AdvisorySession) -> DoctorCheck {
    if session.catalog().is_empty() || session.profiles().is_empty() {
        return DoctorCheck {
            name: "catalog_readiness",
            status: CheckStatus::Fail,
            details: format!(
                "{} profiles and {} products loaded; both must be non-empty",
                session.profiles().len(),
                session.catalog().len()
            ),
        };
    }

    DoctorCheck {
        name: "catalog_readiness",
        status: CheckStatus::Pass,
        details: format!(
            "{} profiles and {} products loaded",
            session.profiles().len(),
            session.catalog().len()
        ),
    }
}

/// Generates every enabled advice type for the first profile and verifies the ledger chain.
fn check_advice_generation(session: &mut AdvisorySession) -> DoctorCheck {
    let Some(profile_id) = session.profiles().first().map(|profile| profile.id) else {
        return skipped("advice_generation", "no profiles are loaded");
    };

    let enabled = session.settings().enabled_advice_types.clone();
    for advice_type in enabled {
        if let Err(error) = session.generate_advice(profile_id, advice_type, CategoryFilter::All) {
            return DoctorCheck {
                name: "advice_generation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            };
        }
    }

    let verification = session.ledger().verify_chain();
    if !verification.valid {
        return DoctorCheck {
            name: "advice_generation",
            status: CheckStatus::Fail,
            details: verification.failure_reason.unwrap_or_else(|| "ledger chain invalid".into()),
        };
    }

    DoctorCheck {
        name: "advice_generation",
        status: CheckStatus::Pass,
        details: format!(
            "{} advice records generated for profile {profile_id}; ledger chain verified",
            verification.verified_entries
        ),
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}
