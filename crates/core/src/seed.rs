//! Demo personas and product catalog, plus JSON loaders that replace them.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use rust_decimal::Decimal;

use crate::advisory::catalog::Catalog;
use crate::domain::product::Product;
use crate::domain::profile::{
    BuyingStage, ConsumerProfile, Interest, Location, PainPoint, ProfileId,
};
use crate::errors::DataError;

pub fn profiles() -> Vec<ConsumerProfile> {
    vec![
        ConsumerProfile {
            id: ProfileId(1),
            name: "Emily Chen".to_string(),
            age: 28,
            occupation: "Marketing Manager".to_string(),
            income: "$75,000".to_string(),
            location: Location::Urban,
            interests: vec![Interest::Fitness, Interest::SustainableProducts, Interest::Travel],
            pain_points: vec![
                PainPoint::LackOfTime,
                PainPoint::PriceSensitivity,
                PainPoint::WantsEcoFriendlyOptions,
            ],
            spending_habits: "Prefers quality over quantity, researches before purchasing"
                .to_string(),
            avatar: "👩‍💼".to_string(),
            buying_stage: BuyingStage::Consideration,
        },
        ConsumerProfile {
            id: ProfileId(2),
            name: "James Wilson".to_string(),
            age: 42,
            occupation: "IT Professional".to_string(),
            income: "$95,000".to_string(),
            location: Location::Suburban,
            interests: vec![Interest::Technology, Interest::HomeImprovement, Interest::Gaming],
            pain_points: vec![
                PainPoint::FeatureComplexity,
                PainPoint::TechnicalSupport,
                PainPoint::ValueForMoney,
            ],
            spending_habits: "Early adopter, willing to pay premium for latest tech".to_string(),
            avatar: "👨‍💻".to_string(),
            buying_stage: BuyingStage::Awareness,
        },
        ConsumerProfile {
            id: ProfileId(3),
            name: "Maria Rodriguez".to_string(),
            age: 35,
            occupation: "Healthcare Worker".to_string(),
            income: "$62,000".to_string(),
            location: Location::Urban,
            interests: vec![
                Interest::Cooking,
                Interest::FamilyActivities,
                Interest::HealthAndWellness,
            ],
            pain_points: vec![
                PainPoint::LimitedFreeTime,
                PainPoint::ProductReliability,
                PainPoint::FamilyBudgetConstraints,
            ],
            spending_habits: "Practical buyer, looks for deals and family-oriented products"
                .to_string(),
            avatar: "👩‍⚕️".to_string(),
            buying_stage: BuyingStage::Decision,
        },
    ]
}

pub fn catalog() -> Catalog {
    Catalog::new(vec![
        Product::new("Premium Fitness Tracker", Interest::Fitness, Decimal::new(12_999, 2), true),
        Product::new("Smart Home Hub", Interest::Technology, Decimal::new(19_999, 2), false),
        Product::new(
            "Organic Meal Kit Subscription",
            Interest::Cooking,
            Decimal::new(1_299, 2),
            true,
        ),
        Product::new("Professional Laptop", Interest::Technology, Decimal::new(129_999, 2), false),
        Product::new(
            "Eco-Friendly Water Bottle",
            Interest::SustainableProducts,
            Decimal::new(2_499, 2),
            true,
        ),
        Product::new(
            "Family Board Game Set",
            Interest::FamilyActivities,
            Decimal::new(3_499, 2),
            true,
        ),
    ])
}

pub fn load_profiles(path: &Path) -> Result<Vec<ConsumerProfile>, DataError> {
    let profiles: Vec<ConsumerProfile> = read_json(path)?;

    let mut seen = HashSet::new();
    for profile in &profiles {
        if !seen.insert(profile.id) {
            return Err(DataError::DuplicateProfile(profile.id));
        }
        validate_profile(profile)?;
    }

    Ok(profiles)
}

/// Reads one persona as a JSON object laid over `draft`. Missing fields keep the
/// draft's values and the draft id always wins.
pub fn load_profile_draft(
    path: &Path,
    draft: ConsumerProfile,
) -> Result<ConsumerProfile, DataError> {
    let overrides: serde_json::Map<String, serde_json::Value> = read_json(path)?;
    let parse_error =
        |source: serde_json::Error| DataError::ParseFile { path: path.to_path_buf(), source };

    let mut merged = match serde_json::to_value(&draft).map_err(parse_error)? {
        serde_json::Value::Object(fields) => fields,
        _ => serde_json::Map::new(),
    };
    merged.extend(overrides);
    merged.insert("id".to_string(), serde_json::Value::from(draft.id.0));

    let profile: ConsumerProfile =
        serde_json::from_value(serde_json::Value::Object(merged)).map_err(parse_error)?;
    validate_profile(&profile)?;
    Ok(profile)
}

pub fn validate_profile(profile: &ConsumerProfile) -> Result<(), DataError> {
    if profile.id.0 == 0 {
        return Err(DataError::ZeroProfileId);
    }
    if !(18..=100).contains(&profile.age) {
        return Err(DataError::InvalidAge { id: profile.id, age: profile.age });
    }
    Ok(())
}

pub fn load_catalog(path: &Path) -> Result<Catalog, DataError> {
    let products: Vec<Product> = read_json(path)?;

    if let Some(product) = products.iter().find(|product| product.price.is_sign_negative()) {
        return Err(DataError::NegativePrice { name: product.name.clone() });
    }

    Ok(Catalog::new(products))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, DataError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| DataError::ReadFile { path: path.to_path_buf(), source })?;
    serde_json::from_str(&raw)
        .map_err(|source| DataError::ParseFile { path: path.to_path_buf(), source })
}
