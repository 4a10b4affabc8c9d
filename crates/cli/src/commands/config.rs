use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use advisor_core::config::{AppConfig, LoadOptions};
use advisor_core::errors::ApplicationError;
use secrecy::ExposeSecret;
use serde::Serialize;
use toml::Value;

use crate::commands::CommandResult;

struct FieldView<'a> {
    key_path: &'a str,
    env_keys: &'a [&'a str],
    value: String,
}

#[derive(Debug, Serialize)]
struct ConfigField {
    key: &'static str,
    value: String,
    source: String,
}

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::from_application_error(
                "config",
                &ApplicationError::Configuration(error.to_string()),
            );
        }
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let fields = effective_fields(&config)
        .into_iter()
        .map(|field| ConfigField {
            source: field_source(
                field.key_path,
                field.env_keys,
                config_file_doc.as_ref(),
                config_file_path.as_deref(),
            ),
            key: field.key_path,
            value: field.value,
        })
        .collect::<Vec<_>>();

    CommandResult::success_with_data(
        "config",
        "effective config (source precedence: env > file > default)",
        &fields,
    )
}

fn effective_fields(config: &AppConfig) -> Vec<FieldView<'static>> {
    let advice_types = config
        .advisor
        .enabled_advice_types
        .iter()
        .map(|kind| kind.label())
        .collect::<Vec<_>>()
        .join(", ");

    vec![
        FieldView {
            key_path: "advisor.enabled_advice_types",
            env_keys: &["ADVISOR_ENABLED_ADVICE_TYPES"],
            value: advice_types,
        },
        FieldView {
            key_path: "advisor.history_limit",
            env_keys: &["ADVISOR_HISTORY_LIMIT"],
            value: config.advisor.history_limit.to_string(),
        },
        FieldView {
            key_path: "advisor.preview_chars",
            env_keys: &["ADVISOR_PREVIEW_CHARS"],
            value: config.advisor.preview_chars.to_string(),
        },
        FieldView {
            key_path: "profiles.max_profiles",
            env_keys: &["ADVISOR_MAX_PROFILES"],
            value: config.profiles.max_profiles.to_string(),
        },
        FieldView {
            key_path: "data.profiles_path",
            env_keys: &["ADVISOR_PROFILES_PATH"],
            value: render_path(config.data.profiles_path.as_deref(), "<seed personas>"),
        },
        FieldView {
            key_path: "data.catalog_path",
            env_keys: &["ADVISOR_CATALOG_PATH"],
            value: render_path(config.data.catalog_path.as_deref(), "<seed catalog>"),
        },
        FieldView {
            key_path: "integrations.api_key",
            env_keys: &["ADVISOR_API_KEY"],
            value: config
                .integrations
                .api_key
                .as_ref()
                .map_or_else(|| "<unset>".to_string(), |key| redact_key(key.expose_secret())),
        },
        FieldView {
            key_path: "logging.level",
            env_keys: &["ADVISOR_LOGGING_LEVEL", "ADVISOR_LOG_LEVEL"],
            value: config.logging.level.clone(),
        },
        FieldView {
            key_path: "logging.format",
            env_keys: &["ADVISOR_LOGGING_FORMAT", "ADVISOR_LOG_FORMAT"],
            value: format!("{:?}", config.logging.format),
        },
    ]
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("advisor.toml"), PathBuf::from("config/advisor.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys
        .iter()
        .find(|key| env::var(key).is_ok_and(|value| !value.trim().is_empty()))
    {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_path(path: Option<&Path>, fallback: &str) -> String {
    path.map_or_else(|| fallback.to_string(), |path| path.display().to_string())
}

fn redact_key(key: &str) -> String {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Some((prefix, _)) = trimmed.split_once('-') {
        return format!("{prefix}-***");
    }

    "<redacted>".to_string()
}
