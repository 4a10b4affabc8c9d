pub mod catalog;
pub mod composer;
pub mod eligibility;
pub mod ranking;

use crate::domain::advice::{AdviceType, CategoryFilter};
use crate::domain::product::Product;
use crate::domain::profile::ConsumerProfile;
use crate::errors::AdvisoryError;

use self::{
    catalog::Catalog,
    eligibility::{EligibilityFilter, InterestEligibilityFilter},
    ranking::{PriceSensitivityRanking, RankingPolicy},
};

#[derive(Clone, Copy, Debug)]
pub struct AdvisoryInput<'a> {
    pub profile: &'a ConsumerProfile,
    pub catalog: &'a Catalog,
    pub advice_type: AdviceType,
    pub category: CategoryFilter,
}

pub trait AdvisoryRuntime: Send + Sync {
    fn filter_and_rank(
        &self,
        profile: &ConsumerProfile,
        catalog: &Catalog,
        category: CategoryFilter,
    ) -> Vec<Product>;

    fn generate(&self, input: AdvisoryInput<'_>) -> Result<String, AdvisoryError>;
}

pub struct DeterministicAdvisoryRuntime<F, R> {
    eligibility_filter: F,
    ranking_policy: R,
}

impl<F, R> DeterministicAdvisoryRuntime<F, R> {
    pub fn new(eligibility_filter: F, ranking_policy: R) -> Self {
        Self { eligibility_filter, ranking_policy }
    }
}

impl Default for DeterministicAdvisoryRuntime<InterestEligibilityFilter, PriceSensitivityRanking> {
    fn default() -> Self {
        Self::new(InterestEligibilityFilter, PriceSensitivityRanking)
    }
}

impl<F, R> AdvisoryRuntime for DeterministicAdvisoryRuntime<F, R>
where
    F: EligibilityFilter,
    R: RankingPolicy,
{
    fn filter_and_rank(
        &self,
        profile: &ConsumerProfile,
        catalog: &Catalog,
        category: CategoryFilter,
    ) -> Vec<Product> {
        let eligible = self.eligibility_filter.filter(catalog.products(), profile, category);
        self.ranking_policy.rank(profile, eligible)
    }

    fn generate(&self, input: AdvisoryInput<'_>) -> Result<String, AdvisoryError> {
        // Unsupported types fail before any filtering work.
        if !composer::has_rule_table(input.advice_type) {
            return Err(AdvisoryError::UnknownAdviceType(input.advice_type));
        }

        let ranked = self.filter_and_rank(input.profile, input.catalog, input.category);
        composer::compose(input.advice_type, input.profile, &ranked, input.category)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::{
        advisory::{
            catalog::Catalog,
            eligibility::EligibilityFilter,
            ranking::{PriceSensitivityRanking, RankingPolicy},
            AdvisoryInput, AdvisoryRuntime, DeterministicAdvisoryRuntime,
        },
        domain::{
            advice::{AdviceType, CategoryFilter},
            product::Product,
            profile::{ConsumerProfile, Interest, PainPoint, ProfileId},
        },
        errors::AdvisoryError,
        seed,
    };

    fn tech_bargain_hunter() -> ConsumerProfile {
        ConsumerProfile {
            name: "Sam".to_string(),
            interests: vec![Interest::Technology],
            pain_points: vec![PainPoint::PriceSensitivity],
            ..ConsumerProfile::draft(ProfileId(11))
        }
    }

    #[test]
    fn price_sensitive_technology_persona_gets_smart_home_hub_first() {
        let runtime = DeterministicAdvisoryRuntime::default();
        let catalog = seed::catalog();

        let ranked = runtime.filter_and_rank(&tech_bargain_hunter(), &catalog, CategoryFilter::All);

        let names = ranked.iter().map(|product| product.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["Smart Home Hub", "Professional Laptop"]);
        assert_eq!(ranked[0].price, Decimal::new(19_999, 2));

        let content = runtime
            .generate(AdvisoryInput {
                profile: &tech_bargain_hunter(),
                catalog: &catalog,
                advice_type: AdviceType::ProductRecommendations,
                category: CategoryFilter::All,
            })
            .expect("generate");
        let first_pick = content.lines().find(|line| line.starts_with("- ")).unwrap_or_default();
        assert_eq!(first_pick, "- Smart Home Hub: $199.99");
    }

    #[test]
    fn feature_prioritization_is_rejected() {
        let runtime = DeterministicAdvisoryRuntime::default();
        let catalog = seed::catalog();

        let result = runtime.generate(AdvisoryInput {
            profile: &tech_bargain_hunter(),
            catalog: &catalog,
            advice_type: AdviceType::FeaturePrioritization,
            category: CategoryFilter::All,
        });

        assert_eq!(result, Err(AdvisoryError::UnknownAdviceType(AdviceType::FeaturePrioritization)));
    }

    #[test]
    fn runtime_supports_explicit_engine_interfaces() {
        #[derive(Default)]
        struct EverythingFilter;

        impl EligibilityFilter for EverythingFilter {
            fn filter(
                &self,
                products: &[Product],
                _profile: &ConsumerProfile,
                _category: CategoryFilter,
            ) -> Vec<Product> {
                products.to_vec()
            }
        }

        #[derive(Default)]
        struct ReverseRanking;

        impl RankingPolicy for ReverseRanking {
            fn rank(&self, _profile: &ConsumerProfile, mut products: Vec<Product>) -> Vec<Product> {
                products.reverse();
                products
            }
        }

        let catalog = Catalog::new(vec![
            Product::new("A", Interest::Music, Decimal::new(100, 2), false),
            Product::new("B", Interest::Music, Decimal::new(50, 2), false),
        ]);
        let runtime = DeterministicAdvisoryRuntime::new(EverythingFilter, ReverseRanking);
        let ranked = runtime.filter_and_rank(&tech_bargain_hunter(), &catalog, CategoryFilter::All);
        assert_eq!(ranked[0].name, "B");

        let sorted = DeterministicAdvisoryRuntime::new(EverythingFilter, PriceSensitivityRanking)
            .filter_and_rank(&tech_bargain_hunter(), &catalog, CategoryFilter::All);
        assert_eq!(sorted[0].name, "B");
    }

    #[test]
    fn non_price_sensitive_ranking_preserves_filter_order() {
        let runtime = DeterministicAdvisoryRuntime::default();
        let catalog = seed::catalog();

        for profile in seed::profiles() {
            if profile.has_pain_point(PainPoint::PriceSensitivity) {
                continue;
            }
            let ranked = runtime.filter_and_rank(&profile, &catalog, CategoryFilter::All);
            let filtered = crate::advisory::eligibility::filter_products(
                catalog.products(),
                &profile,
                CategoryFilter::All,
            );
            assert_eq!(ranked, filtered);
        }
    }
}
