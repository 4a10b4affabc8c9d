use crate::domain::product::Product;
use crate::domain::profile::{ConsumerProfile, PainPoint};

pub trait RankingPolicy: Send + Sync {
    /// Reorders eligible products. Implementations never drop items.
    fn rank(&self, profile: &ConsumerProfile, products: Vec<Product>) -> Vec<Product>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PriceSensitivityRanking;

impl RankingPolicy for PriceSensitivityRanking {
    fn rank(&self, profile: &ConsumerProfile, products: Vec<Product>) -> Vec<Product> {
        rank_products(profile, products)
    }
}

pub fn rank_products(profile: &ConsumerProfile, mut products: Vec<Product>) -> Vec<Product> {
    if profile.has_pain_point(PainPoint::PriceSensitivity) {
        // `sort_by` is stable, ties keep catalog order.
        products.sort_by(|left, right| left.price.cmp(&right.price));
    }
    products
}
