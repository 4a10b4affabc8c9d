use std::path::Path;

use advisor_core::domain::advice::{AdviceRecord, AdviceType, CategoryFilter};
use advisor_core::domain::profile::{ConsumerProfile, ProfileId};
use advisor_core::errors::ApplicationError;
use advisor_core::seed;
use advisor_core::session::AdvisorySession;
use advisor_core::store::SaveOutcome;
use serde::Serialize;
use uuid::Uuid;

use crate::commands::{bootstrap_failure, open_session, CommandResult};

#[derive(Debug, Serialize)]
struct AdviceOutput {
    latest: AdviceRecord,
    generated: usize,
    previous: Vec<PreviousAdvice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    saved: Option<SaveOutcome>,
}

#[derive(Debug, Serialize)]
struct PreviousAdvice {
    record_id: Uuid,
    advice_type: AdviceType,
    date: String,
    preview: String,
}

enum AdviceSubject {
    Stored(ProfileId),
    Unsaved(ConsumerProfile),
}

impl AdviceSubject {
    fn profile_id(&self) -> ProfileId {
        match self {
            Self::Stored(profile_id) => *profile_id,
            Self::Unsaved(profile) => profile.id,
        }
    }
}

/// Generates each requested advice type in order within a single session.
pub fn run(
    profile_id: ProfileId,
    advice_types: &[AdviceType],
    category: CategoryFilter,
) -> CommandResult {
    let mut session = match open_session() {
        Ok(session) => session,
        Err(error) => return bootstrap_failure("advise", error),
    };

    let subject = AdviceSubject::Stored(profile_id);
    if let Err(error) = generate_all(&mut session, &subject, advice_types, category) {
        return CommandResult::from_application_error("advise", &error);
    }

    render(&session, profile_id, advice_types.len(), None)
}

/// Advises a persona read from a JSON file laid over a new profile draft.
/// With `save` the persona is stored after its advice is generated.
pub fn run_with_profile_file(
    path: &Path,
    save: bool,
    advice_types: &[AdviceType],
    category: CategoryFilter,
) -> CommandResult {
    let mut session = match open_session() {
        Ok(session) => session,
        Err(error) => return bootstrap_failure("advise", error),
    };

    let profile = match load_unsaved_profile(&session, path) {
        Ok(profile) => profile,
        Err(error) => return CommandResult::from_application_error("advise", &error),
    };
    let profile_id = profile.id;

    let subject = AdviceSubject::Unsaved(profile);
    if let Err(error) = generate_all(&mut session, &subject, advice_types, category) {
        return CommandResult::from_application_error("advise", &error);
    }

    let saved = match (save, subject) {
        (true, AdviceSubject::Unsaved(profile)) => match session.save_profile(profile) {
            Ok(outcome) => {
                tracing::info!(
                    event_name = "advisor.profile.saved",
                    profile_id = %profile_id,
                    outcome = ?outcome,
                    "profile saved"
                );
                Some(outcome)
            }
            Err(error) => {
                return CommandResult::from_application_error(
                    "advise",
                    &ApplicationError::from(error),
                );
            }
        },
        _ => None,
    };

    render(&session, profile_id, advice_types.len(), saved)
}

fn load_unsaved_profile(
    session: &AdvisorySession,
    path: &Path,
) -> Result<ConsumerProfile, ApplicationError> {
    let draft = session.new_profile_draft()?;
    Ok(seed::load_profile_draft(path, draft)?)
}

fn generate_all(
    session: &mut AdvisorySession,
    subject: &AdviceSubject,
    advice_types: &[AdviceType],
    category: CategoryFilter,
) -> Result<(), ApplicationError> {
    let profile_id = subject.profile_id();

    for advice_type in advice_types {
        let generated = match subject {
            AdviceSubject::Stored(profile_id) => {
                session.generate_advice(*profile_id, *advice_type, category)
            }
            AdviceSubject::Unsaved(profile) => {
                session.generate_advice_for(profile, *advice_type, category)
            }
        };

        match generated {
            Ok(record) => {
                tracing::info!(
                    event_name = "advisor.advice.generated",
                    record_id = %record.record_id,
                    profile_id = %profile_id,
                    advice_type = %advice_type,
                    category = %category,
                    "advice generated"
                );
            }
            Err(error) => {
                tracing::warn!(
                    event_name = "advisor.advice.rejected",
                    profile_id = %profile_id,
                    advice_type = %advice_type,
                    error_class = error.error_class(),
                    "advice request rejected"
                );
                return Err(error.into());
            }
        }
    }

    Ok(())
}

fn render(
    session: &AdvisorySession,
    profile_id: ProfileId,
    generated: usize,
    saved: Option<SaveOutcome>,
) -> CommandResult {
    let Some(latest) = session.ledger().latest().cloned() else {
        return CommandResult::failure("advise", "invalid_input", "no advice type requested", 1);
    };

    let settings = session.settings();
    let previous = session
        .ledger_recent(settings.history_limit)
        .into_iter()
        .map(|record| PreviousAdvice {
            record_id: record.record_id,
            advice_type: record.advice_type,
            date: record.date_label(),
            preview: record.preview(settings.preview_chars),
        })
        .collect::<Vec<_>>();

    let message = format!("{} generated for profile {}", latest.advice_type, profile_id);
    CommandResult::success_with_data(
        "advise",
        message,
        &AdviceOutput { latest, generated, previous, saved },
    )
}
