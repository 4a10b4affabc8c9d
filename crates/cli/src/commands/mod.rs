pub mod advise;
pub mod config;
pub mod doctor;
pub mod insights;
pub mod products;
pub mod profiles;

use advisor_core::config::{AppConfig, ConfigError, LoadOptions};
use advisor_core::errors::{ApplicationError, DataError};
use advisor_core::session::AdvisorySession;
use anyhow::Context;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success_with_data(
        command: &str,
        message: impl Into<String>,
        data: &impl Serialize,
    ) -> Self {
        Self::with_data(command, None, message.into(), 0, data)
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Failure that still carries a report, such as a doctor run with failing checks.
    pub fn failure_with_data(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
        data: &impl Serialize,
    ) -> Self {
        Self::with_data(command, Some(error_class), message.into(), exit_code, data)
    }

    fn with_data(
        command: &str,
        error_class: Option<&str>,
        message: String,
        exit_code: u8,
        data: &impl Serialize,
    ) -> Self {
        let data = match serde_json::to_value(data) {
            Ok(data) => data,
            Err(error) => {
                return Self::failure(command, "serialization", error.to_string(), 1);
            }
        };
        let status = if error_class.is_some() { "error" } else { "ok" };
        let payload = CommandOutcome {
            command: command.to_string(),
            status: status.to_string(),
            error_class: error_class.map(str::to_string),
            message,
            data: Some(data),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn from_application_error(command: &str, error: &ApplicationError) -> Self {
        Self::failure(command, error.error_class(), error.to_string(), error.exit_code())
    }
}

pub(crate) fn open_session() -> anyhow::Result<AdvisorySession> {
    let config = AppConfig::load(LoadOptions::default()).context("configuration issue")?;
    let session = AdvisorySession::from_config(&config).context("data files could not be loaded")?;

    tracing::debug!(
        event_name = "advisor.session.loaded",
        profiles = session.profiles().len(),
        products = session.catalog().len(),
        "advisory session loaded"
    );

    Ok(session)
}

/// Maps a session bootstrap failure onto the error class and exit code table.
pub(crate) fn bootstrap_failure(command: &str, error: anyhow::Error) -> CommandResult {
    let message = format!("{error:#}");
    let classified = if error.is::<ConfigError>() {
        ApplicationError::Configuration(message.clone())
    } else {
        match error.downcast::<DataError>() {
            Ok(data_error) => ApplicationError::Data(data_error),
            Err(_) => return CommandResult::failure(command, "internal", message, 1),
        }
    };

    CommandResult::failure(command, classified.error_class(), message, classified.exit_code())
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
