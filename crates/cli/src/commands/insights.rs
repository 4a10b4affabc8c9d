use advisor_core::insights::InsightsReport;

use crate::commands::{bootstrap_failure, open_session, CommandResult};

pub fn run() -> CommandResult {
    let session = match open_session() {
        Ok(session) => session,
        Err(error) => return bootstrap_failure("insights", error),
    };

    let report = InsightsReport::from_profiles(session.profiles());
    CommandResult::success_with_data(
        "insights",
        format!("insights computed over {} profiles", report.profile_count),
        &report,
    )
}
