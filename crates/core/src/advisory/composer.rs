use crate::domain::advice::{AdviceType, CategoryFilter};
use crate::domain::product::Product;
use crate::domain::profile::{BuyingStage, ConsumerProfile, PainPoint};
use crate::errors::AdvisoryError;

/// Number of ranked products surfaced in a recommendation.
pub const RECOMMENDATION_LIMIT: usize = 3;

/// Substituted wherever an empty interest or pain-point list would be indexed.
pub const NEUTRAL_PLACEHOLDER: &str = "your needs";

#[derive(Clone, Copy, Debug)]
pub struct ComposeInput<'a> {
    pub profile: &'a ConsumerProfile,
    pub ranked_products: &'a [Product],
    pub category: CategoryFilter,
}

type ComposeFn = fn(&ComposeInput<'_>) -> String;

fn rule_table(advice_type: AdviceType) -> Option<ComposeFn> {
    match advice_type {
        AdviceType::ProductRecommendations => Some(compose_product_recommendations),
        AdviceType::MarketingMessaging => Some(compose_marketing_messaging),
        AdviceType::PricingStrategy => Some(compose_pricing_strategy),
        AdviceType::CustomerExperience | AdviceType::FeaturePrioritization => None,
    }
}

pub fn has_rule_table(advice_type: AdviceType) -> bool {
    rule_table(advice_type).is_some()
}

pub fn supported_advice_types() -> Vec<AdviceType> {
    AdviceType::ALL.into_iter().filter(|kind| has_rule_table(*kind)).collect()
}

pub fn compose(
    advice_type: AdviceType,
    profile: &ConsumerProfile,
    ranked_products: &[Product],
    category: CategoryFilter,
) -> Result<String, AdvisoryError> {
    let composer = rule_table(advice_type).ok_or(AdvisoryError::UnknownAdviceType(advice_type))?;
    Ok(composer(&ComposeInput { profile, ranked_products, category }))
}

fn compose_product_recommendations(input: &ComposeInput<'_>) -> String {
    let profile = input.profile;
    let mut content = format!(
        "Based on {}'s profile, I recommend focusing on these products:\n\n",
        profile.name
    );

    let top = &input.ranked_products[..input.ranked_products.len().min(RECOMMENDATION_LIMIT)];
    if top.is_empty() {
        content.push_str(&format!(
            "No specific products match the criteria. Consider expanding your product catalog \
             to include items related to {}.",
            join_interests(profile, usize::MAX)
        ));
        return content;
    }

    for product in top {
        let eco_label = if product.eco_friendly { " (Eco-friendly)" } else { "" };
        content.push_str(&format!("- {}{eco_label}: ${}\n", product.name, product.price));
    }

    content.push_str(&format!(
        "\nRationale: These products align with {}'s interests in {}. ",
        profile.name,
        join_interests(profile, 2)
    ));

    if profile.has_pain_point(PainPoint::PriceSensitivity) {
        content.push_str("I've prioritized more affordable options due to price sensitivity. ");
    }

    if profile.has_pain_point(PainPoint::WantsEcoFriendlyOptions)
        && top.iter().any(|product| product.eco_friendly)
    {
        content.push_str("I've included eco-friendly options as requested. ");
    }

    let emphasis = match profile.buying_stage {
        BuyingStage::Awareness => "how these products solve specific problems they face.",
        BuyingStage::Consideration => "comparative benefits and unique features.",
        BuyingStage::Decision => "social proof, guarantees, and easy purchasing process.",
    };
    content.push_str(&format!(
        "\n\nFor this {} stage consumer, emphasize {emphasis}",
        profile.buying_stage.label().to_ascii_lowercase()
    ));

    content
}

fn compose_marketing_messaging(input: &ComposeInput<'_>) -> String {
    let profile = input.profile;
    let occupation = &profile.occupation;
    let first_interest = profile.interests.first().map_or(NEUTRAL_PLACEHOLDER, |i| i.label());
    let focus = input.category.selected().map_or(first_interest, |category| category.label());

    let mut content = format!("Recommended messaging approach for {}:\n\n", profile.name);

    let (angle, headlines) = match profile.buying_stage {
        BuyingStage::Awareness => (
            "Focus on problem identification and education. Use messaging that helps this \
             consumer recognize the challenges they face.",
            [
                format!("How {occupation}s Save Time While Maximizing Results"),
                format!("The Hidden Challenges of {first_interest} That Nobody Talks About"),
                format!("Discover What's Possible: Reimagining Your Approach to {focus}"),
            ],
        ),
        BuyingStage::Consideration => {
            let offering = input.category.selected().map_or("Products", |category| category.label());
            let top_pain_point =
                profile.pain_points.first().map_or(NEUTRAL_PLACEHOLDER, |p| p.label());
            (
                "Focus on solution comparison and value demonstration. Help this consumer \
                 evaluate options and see your unique value.",
                [
                    format!("Why Busy {occupation}s Choose Our {offering}"),
                    format!("5 Ways Our Approach Stands Apart in {focus}"),
                    format!("How We Address the Top 3 {top_pain_point} Challenges"),
                ],
            )
        }
        BuyingStage::Decision => (
            "Focus on risk reduction and purchase facilitation. Make the final decision easy \
             and low-risk.",
            [
                format!("Join Thousands Who've Transformed Their {focus} Experience"),
                "Our 30-Day Satisfaction Guarantee Means Zero Risk".to_string(),
                format!("Special Offer for {} {occupation}s: Start Today", profile.location),
            ],
        ),
    };

    content.push_str(angle);
    content.push_str("\n\nSuggested headlines:\n");
    for headline in &headlines {
        content.push_str(&format!("- \"{headline}\"\n"));
    }

    content.push_str("\nRecommended channels:\n");
    let channels: [&str; 3] = match profile.age {
        0..=29 => ["Social media (Instagram, TikTok)", "Mobile-first content", "Influencer partnerships"],
        30..=44 => ["LinkedIn", "Email newsletters", "Podcast sponsorships"],
        _ => ["Email campaigns", "Industry publications", "Facebook"],
    };
    for channel in channels {
        content.push_str(&format!("- {channel}\n"));
    }

    content
}

fn compose_pricing_strategy(input: &ComposeInput<'_>) -> String {
    let profile = input.profile;
    let mut content = format!("Pricing strategy recommendations for {}:\n\n", profile.name);

    let (framing, strategies, closing) = if profile.has_pain_point(PainPoint::PriceSensitivity) {
        (
            "This consumer shows price sensitivity. Consider these strategies:",
            [
                "Value-tier offerings with essential features only",
                "Installment payment options",
                "Entry-level products with upgrade paths",
                "Loyalty programs that reward repeat purchases",
                "Bundle discounts for complementary products",
            ],
            "Avoid premium pricing or luxury positioning as this may create immediate barriers.",
        )
    } else {
        (
            "This consumer prioritizes value over lowest price. Consider these strategies:",
            [
                "Good-better-best tiering with clear value steps",
                "Premium options with additional services included",
                "Subscription models with exclusive benefits",
                "Value-based pricing highlighting ROI",
                "Early adopter or VIP pricing tiers",
            ],
            "Emphasize the quality/price relationship rather than focusing on discount messaging.",
        )
    };

    content.push_str(framing);
    content.push_str("\n\n");
    for (index, strategy) in strategies.iter().enumerate() {
        content.push_str(&format!("{}. {strategy}\n", index + 1));
    }
    content.push('\n');
    content.push_str(closing);

    content
}

fn join_interests(profile: &ConsumerProfile, limit: usize) -> String {
    if profile.interests.is_empty() {
        return NEUTRAL_PLACEHOLDER.to_string();
    }
    profile.interests.iter().take(limit).map(|interest| interest.label()).collect::<Vec<_>>().join(", ")
}
