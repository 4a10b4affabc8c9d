use crate::domain::advice::CategoryFilter;
use crate::domain::product::Product;
use crate::domain::profile::{ConsumerProfile, Interest};

pub trait EligibilityFilter: Send + Sync {
    fn filter(
        &self,
        products: &[Product],
        profile: &ConsumerProfile,
        category: CategoryFilter,
    ) -> Vec<Product>;
}

/// Keeps products in the selected category that the persona is interested
/// in, plus eco-friendly products for personas interested in sustainability.
#[derive(Clone, Copy, Debug, Default)]
pub struct InterestEligibilityFilter;

impl EligibilityFilter for InterestEligibilityFilter {
    fn filter(
        &self,
        products: &[Product],
        profile: &ConsumerProfile,
        category: CategoryFilter,
    ) -> Vec<Product> {
        filter_products(products, profile, category)
    }
}

pub fn is_eligible(product: &Product, profile: &ConsumerProfile, category: CategoryFilter) -> bool {
    category.matches(product.category)
        && (profile.has_interest(product.category)
            || (product.eco_friendly && profile.has_interest(Interest::SustainableProducts)))
}

pub fn filter_products(
    products: &[Product],
    profile: &ConsumerProfile,
    category: CategoryFilter,
) -> Vec<Product> {
    products.iter().filter(|product| is_eligible(product, profile, category)).cloned().collect()
}
