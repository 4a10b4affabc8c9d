use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::profile::Interest;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub category: Interest,
    pub price: Decimal,
    pub eco_friendly: bool,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        category: Interest,
        price: Decimal,
        eco_friendly: bool,
    ) -> Self {
        Self { name: name.into(), category, price, eco_friendly }
    }
}
