use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::advisory::composer;
use crate::domain::advice::AdviceType;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub advisor: AdvisorConfig,
    pub profiles: ProfilesConfig,
    pub data: DataConfig,
    pub integrations: IntegrationsConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdvisorConfig {
    pub enabled_advice_types: Vec<AdviceType>,
    pub history_limit: usize,
    pub preview_chars: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfilesConfig {
    pub max_profiles: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataConfig {
    pub profiles_path: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
}

#[derive(Clone, Debug, Default)]
pub struct IntegrationsConfig {
    pub api_key: Option<SecretString>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub enabled_advice_types: Option<Vec<AdviceType>>,
    pub history_limit: Option<usize>,
    pub preview_chars: Option<usize>,
    pub max_profiles: Option<usize>,
    pub profiles_path: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            advisor: AdvisorConfig {
                enabled_advice_types: vec![
                    AdviceType::ProductRecommendations,
                    AdviceType::MarketingMessaging,
                    AdviceType::PricingStrategy,
                ],
                history_limit: 3,
                preview_chars: 150,
            },
            profiles: ProfilesConfig { max_profiles: crate::store::DEFAULT_MAX_PROFILES },
            data: DataConfig::default(),
            integrations: IntegrationsConfig::default(),
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("advisor.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(advisor) = patch.advisor {
            if let Some(enabled_advice_types) = advisor.enabled_advice_types {
                self.advisor.enabled_advice_types = enabled_advice_types;
            }
            if let Some(history_limit) = advisor.history_limit {
                self.advisor.history_limit = history_limit;
            }
            if let Some(preview_chars) = advisor.preview_chars {
                self.advisor.preview_chars = preview_chars;
            }
        }

        if let Some(profiles) = patch.profiles {
            if let Some(max_profiles) = profiles.max_profiles {
                self.profiles.max_profiles = max_profiles;
            }
        }

        if let Some(data) = patch.data {
            if let Some(profiles_path) = data.profiles_path {
                self.data.profiles_path = Some(profiles_path);
            }
            if let Some(catalog_path) = data.catalog_path {
                self.data.catalog_path = Some(catalog_path);
            }
        }

        if let Some(integrations) = patch.integrations {
            if let Some(api_key) = integrations.api_key {
                self.integrations.api_key = Some(api_key.into());
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("ADVISOR_ENABLED_ADVICE_TYPES") {
            self.advisor.enabled_advice_types =
                parse_advice_types("ADVISOR_ENABLED_ADVICE_TYPES", &value)?;
        }
        if let Some(value) = read_env("ADVISOR_HISTORY_LIMIT") {
            self.advisor.history_limit = parse_usize("ADVISOR_HISTORY_LIMIT", &value)?;
        }
        if let Some(value) = read_env("ADVISOR_PREVIEW_CHARS") {
            self.advisor.preview_chars = parse_usize("ADVISOR_PREVIEW_CHARS", &value)?;
        }
        if let Some(value) = read_env("ADVISOR_MAX_PROFILES") {
            self.profiles.max_profiles = parse_usize("ADVISOR_MAX_PROFILES", &value)?;
        }

        if let Some(value) = read_env("ADVISOR_PROFILES_PATH") {
            self.data.profiles_path = Some(PathBuf::from(value));
        }
        if let Some(value) = read_env("ADVISOR_CATALOG_PATH") {
            self.data.catalog_path = Some(PathBuf::from(value));
        }

        if let Some(value) = read_env("ADVISOR_API_KEY") {
            self.integrations.api_key = Some(value.into());
        }

        let log_level =
            read_env("ADVISOR_LOGGING_LEVEL").or_else(|| read_env("ADVISOR_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("ADVISOR_LOGGING_FORMAT").or_else(|| read_env("ADVISOR_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(enabled_advice_types) = overrides.enabled_advice_types {
            self.advisor.enabled_advice_types = enabled_advice_types;
        }
        if let Some(history_limit) = overrides.history_limit {
            self.advisor.history_limit = history_limit;
        }
        if let Some(preview_chars) = overrides.preview_chars {
            self.advisor.preview_chars = preview_chars;
        }
        if let Some(max_profiles) = overrides.max_profiles {
            self.profiles.max_profiles = max_profiles;
        }
        if let Some(profiles_path) = overrides.profiles_path {
            self.data.profiles_path = Some(profiles_path);
        }
        if let Some(catalog_path) = overrides.catalog_path {
            self.data.catalog_path = Some(catalog_path);
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_advisor(&self.advisor)?;
        validate_profiles(&self.profiles)?;
        validate_integrations(&self.integrations)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("advisor.toml"), PathBuf::from("config/advisor.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_advisor(advisor: &AdvisorConfig) -> Result<(), ConfigError> {
    if advisor.enabled_advice_types.is_empty() {
        return Err(ConfigError::Validation(
            "advisor.enabled_advice_types must list at least one advice type".to_string(),
        ));
    }

    // Enabling a type without a rule table would only ever produce failures.
    if let Some(unsupported) =
        advisor.enabled_advice_types.iter().find(|kind| !composer::has_rule_table(**kind))
    {
        return Err(ConfigError::Validation(format!(
            "advisor.enabled_advice_types contains `{unsupported}`, which has no rule table"
        )));
    }

    if advisor.history_limit == 0 || advisor.history_limit > 50 {
        return Err(ConfigError::Validation(
            "advisor.history_limit must be in range 1..=50".to_string(),
        ));
    }

    if advisor.preview_chars < 20 || advisor.preview_chars > 2000 {
        return Err(ConfigError::Validation(
            "advisor.preview_chars must be in range 20..=2000".to_string(),
        ));
    }

    Ok(())
}

fn validate_profiles(profiles: &ProfilesConfig) -> Result<(), ConfigError> {
    if profiles.max_profiles < 5 || profiles.max_profiles > 100 {
        return Err(ConfigError::Validation(
            "profiles.max_profiles must be in range 5..=100".to_string(),
        ));
    }

    Ok(())
}

fn validate_integrations(integrations: &IntegrationsConfig) -> Result<(), ConfigError> {
    let blank =
        integrations.api_key.as_ref().map(|key| key.expose_secret().trim().is_empty());
    if blank == Some(true) {
        return Err(ConfigError::Validation(
            "integrations.api_key must not be blank when set".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_advice_types(key: &str, value: &str) -> Result<Vec<AdviceType>, ConfigError> {
    value
        .split(',')
        .filter(|item| !item.trim().is_empty())
        .map(|item| {
            item.parse::<AdviceType>().map_err(|_| ConfigError::InvalidEnvOverride {
                key: key.to_string(),
                value: value.to_string(),
            })
        })
        .collect()
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    advisor: Option<AdvisorPatch>,
    profiles: Option<ProfilesPatch>,
    data: Option<DataPatch>,
    integrations: Option<IntegrationsPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct AdvisorPatch {
    enabled_advice_types: Option<Vec<AdviceType>>,
    history_limit: Option<usize>,
    preview_chars: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct ProfilesPatch {
    max_profiles: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct DataPatch {
    profiles_path: Option<PathBuf>,
    catalog_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct IntegrationsPatch {
    api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
