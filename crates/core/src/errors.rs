use std::path::PathBuf;

use thiserror::Error;

use crate::domain::advice::AdviceType;
use crate::domain::profile::ProfileId;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} `{value}`")]
pub struct VocabularyError {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AdvisoryError {
    #[error("no rule table is defined for advice type `{0}`")]
    UnknownAdviceType(AdviceType),
    #[error("advice type `{0}` is not enabled")]
    AdviceTypeDisabled(AdviceType),
    #[error("consumer profile {0} was not found")]
    ProfileNotFound(ProfileId),
    #[error("profile store is full ({limit} profiles)")]
    ProfileLimitReached { limit: usize },
    #[error("no profile id is left after {0}")]
    ProfileIdsExhausted(ProfileId),
}

impl AdvisoryError {
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::UnknownAdviceType(_) => "unknown_advice_type",
            Self::AdviceTypeDisabled(_) => "advice_type_disabled",
            Self::ProfileNotFound(_) => "profile_not_found",
            Self::ProfileLimitReached { .. } => "profile_limit_reached",
            Self::ProfileIdsExhausted(_) => "profile_ids_exhausted",
        }
    }
}

#[derive(Debug, Error)]
pub enum DataError {
    #[error("could not read data file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse data file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: serde_json::Error },
    #[error("duplicate profile id {0} in data file")]
    DuplicateProfile(ProfileId),
    #[error("profile id must be a positive integer")]
    ZeroProfileId,
    #[error("profile {id} has age {age}, expected 18..=100")]
    InvalidAge { id: ProfileId, age: u8 },
    #[error("product `{name}` has a negative price")]
    NegativePrice { name: String },
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Advisory(#[from] AdvisoryError),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl ApplicationError {
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Advisory(error) => error.error_class(),
            Self::Data(_) => "data_load",
            Self::Configuration(_) => "config_validation",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration(_) => 2,
            Self::Data(_) => 3,
            Self::Advisory(AdvisoryError::ProfileNotFound(_)) => 4,
            Self::Advisory(_) => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::advice::AdviceType;
    use crate::domain::profile::ProfileId;
    use crate::errors::{AdvisoryError, ApplicationError, DataError};

    #[test]
    fn advisory_errors_carry_stable_error_classes() {
        let unknown = AdvisoryError::UnknownAdviceType(AdviceType::FeaturePrioritization);
        assert_eq!(unknown.error_class(), "unknown_advice_type");
        assert_eq!(
            unknown.to_string(),
            "no rule table is defined for advice type `Feature Prioritization`"
        );

        let missing = AdvisoryError::ProfileNotFound(ProfileId(42));
        assert_eq!(missing.to_string(), "consumer profile 42 was not found");

        let exhausted = AdvisoryError::ProfileIdsExhausted(ProfileId(u32::MAX));
        assert_eq!(exhausted.error_class(), "profile_ids_exhausted");
        assert_eq!(exhausted.to_string(), "no profile id is left after 4294967295");
    }

    #[test]
    fn application_error_maps_to_exit_codes() {
        let missing = ApplicationError::from(AdvisoryError::ProfileNotFound(ProfileId(9)));
        assert_eq!(missing.exit_code(), 4);
        assert_eq!(missing.error_class(), "profile_not_found");

        let data = ApplicationError::from(DataError::NegativePrice { name: "Widget".into() });
        assert_eq!(data.exit_code(), 3);
        assert_eq!(data.error_class(), "data_load");

        let config = ApplicationError::Configuration("bad level".to_string());
        assert_eq!(config.exit_code(), 2);
        assert_eq!(config.error_class(), "config_validation");
    }
}
