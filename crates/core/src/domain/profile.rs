use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::VocabularyError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(pub u32);

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    Urban,
    Suburban,
    Rural,
}

impl Location {
    pub fn label(self) -> &'static str {
        match self {
            Self::Urban => "Urban",
            Self::Suburban => "Suburban",
            Self::Rural => "Rural",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Position of a persona in the purchase funnel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuyingStage {
    Awareness,
    Consideration,
    Decision,
}

impl BuyingStage {
    pub const FUNNEL: [BuyingStage; 3] = [Self::Awareness, Self::Consideration, Self::Decision];

    pub fn label(self) -> &'static str {
        match self {
            Self::Awareness => "Awareness",
            Self::Consideration => "Consideration",
            Self::Decision => "Decision",
        }
    }
}

impl fmt::Display for BuyingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = VocabularyError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let wanted = value.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|term| term.label().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| VocabularyError { kind: $kind, value: wanted.to_string() })
            }
        }
    };
}

vocabulary! {
    /// Interest vocabulary. Product categories are drawn from the same terms.
    Interest, "interest" {
        Fitness => "Fitness",
        Technology => "Technology",
        Cooking => "Cooking",
        Travel => "Travel",
        FamilyActivities => "Family activities",
        Gaming => "Gaming",
        Reading => "Reading",
        Music => "Music",
        SustainableProducts => "Sustainable products",
        HealthAndWellness => "Health & wellness",
        HomeImprovement => "Home improvement",
    }
}

vocabulary! {
    PainPoint, "pain point" {
        LackOfTime => "Lack of time",
        LimitedFreeTime => "Limited free time",
        PriceSensitivity => "Price sensitivity",
        FeatureComplexity => "Feature complexity",
        TechnicalSupport => "Technical support",
        ProductReliability => "Product reliability",
        FamilyBudgetConstraints => "Family budget constraints",
        ValueForMoney => "Value for money",
        WantsEcoFriendlyOptions => "Wants eco-friendly options",
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerProfile {
    pub id: ProfileId,
    pub name: String,
    pub age: u8,
    pub occupation: String,
    pub income: String,
    pub location: Location,
    pub interests: Vec<Interest>,
    pub pain_points: Vec<PainPoint>,
    pub spending_habits: String,
    pub avatar: String,
    pub buying_stage: BuyingStage,
}

impl ConsumerProfile {
    pub fn has_interest(&self, interest: Interest) -> bool {
        self.interests.contains(&interest)
    }

    pub fn has_pain_point(&self, pain_point: PainPoint) -> bool {
        self.pain_points.contains(&pain_point)
    }

    /// Blank record handed to the profile editor for a new persona.
    pub fn draft(id: ProfileId) -> Self {
        Self {
            id,
            name: String::new(),
            age: 30,
            occupation: String::new(),
            income: String::new(),
            location: Location::Urban,
            interests: Vec::new(),
            pain_points: Vec::new(),
            spending_habits: String::new(),
            avatar: "👤".to_string(),
            buying_stage: BuyingStage::Awareness,
        }
    }
}
