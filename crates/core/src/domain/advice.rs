use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::domain::profile::{Interest, ProfileId};
use crate::errors::VocabularyError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdviceType {
    #[serde(rename = "Product Recommendations")]
    ProductRecommendations,
    #[serde(rename = "Marketing Messaging")]
    MarketingMessaging,
    #[serde(rename = "Pricing Strategy")]
    PricingStrategy,
    #[serde(rename = "Customer Experience")]
    CustomerExperience,
    #[serde(rename = "Feature Prioritization")]
    FeaturePrioritization,
}

impl AdviceType {
    pub const ALL: [AdviceType; 5] = [
        Self::ProductRecommendations,
        Self::MarketingMessaging,
        Self::PricingStrategy,
        Self::CustomerExperience,
        Self::FeaturePrioritization,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::ProductRecommendations => "Product Recommendations",
            Self::MarketingMessaging => "Marketing Messaging",
            Self::PricingStrategy => "Pricing Strategy",
            Self::CustomerExperience => "Customer Experience",
            Self::FeaturePrioritization => "Feature Prioritization",
        }
    }
}

impl fmt::Display for AdviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AdviceType {
    type Err = VocabularyError;

    /// Accepts display labels as well as kebab-case and snake_case spellings.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_key(value);
        Self::ALL.into_iter().find(|kind| normalize_key(kind.label()) == wanted).ok_or_else(|| {
            VocabularyError { kind: "advice type", value: value.trim().to_string() }
        })
    }
}

/// Category selector offered next to the advice type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Interest),
}

impl CategoryFilter {
    pub const ALL_LABEL: &'static str = "All Categories";

    pub fn matches(self, category: Interest) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == category,
        }
    }

    pub fn selected(self) -> Option<Interest> {
        match self {
            Self::All => None,
            Self::Only(selected) => Some(selected),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => Self::ALL_LABEL,
            Self::Only(selected) => selected.label(),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CategoryFilter {
    type Err = VocabularyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case(Self::ALL_LABEL) || trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        trimmed.parse::<Interest>().map(Self::Only).map_err(|_| VocabularyError {
            kind: "category",
            value: trimmed.to_string(),
        })
    }
}

impl Serialize for CategoryFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for CategoryFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceRecord {
    pub record_id: Uuid,
    pub advice_type: AdviceType,
    pub profile_id: ProfileId,
    pub category: CategoryFilter,
    pub generated_at: DateTime<Utc>,
    pub content: String,
}

impl AdviceRecord {
    pub fn new(
        advice_type: AdviceType,
        profile_id: ProfileId,
        category: CategoryFilter,
        content: impl Into<String>,
    ) -> Self {
        Self {
            record_id: Uuid::new_v4(),
            advice_type,
            profile_id,
            category,
            generated_at: Utc::now(),
            content: content.into(),
        }
    }

    pub fn date_label(&self) -> String {
        self.generated_at.format("%Y-%m-%d").to_string()
    }

    /// Display prefix of at most `max_chars` characters, suffixed with `...`
    /// when the content was cut.
    pub fn preview(&self, max_chars: usize) -> String {
        match self.content.char_indices().nth(max_chars) {
            Some((byte_index, _)) => format!("{}...", &self.content[..byte_index]),
            None => self.content.clone(),
        }
    }
}

fn normalize_key(input: &str) -> String {
    input.trim().to_ascii_lowercase().replace(['-', '_'], " ")
}
