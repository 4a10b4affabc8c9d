use crate::commands::{bootstrap_failure, open_session, CommandResult};

pub fn run() -> CommandResult {
    let session = match open_session() {
        Ok(session) => session,
        Err(error) => return bootstrap_failure("profiles", error),
    };

    let profiles = session.profiles();
    CommandResult::success_with_data(
        "profiles",
        format!("{} consumer profiles loaded", profiles.len()),
        &profiles,
    )
}
