use advisor_core::domain::advice::CategoryFilter;
use advisor_core::domain::product::Product;
use advisor_core::domain::profile::ProfileId;
use advisor_core::errors::ApplicationError;
use serde::Serialize;

use crate::commands::{bootstrap_failure, open_session, CommandResult};

#[derive(Debug, Serialize)]
struct ProductPreview {
    profile_id: ProfileId,
    category: CategoryFilter,
    products: Vec<Product>,
}

pub fn run(profile_id: ProfileId, category: CategoryFilter) -> CommandResult {
    let session = match open_session() {
        Ok(session) => session,
        Err(error) => return bootstrap_failure("products", error),
    };

    match session.filter_and_rank_products(profile_id, category) {
        Ok(products) => {
            let message = if products.is_empty() {
                format!("no products match profile {profile_id} in {category}")
            } else {
                format!("{} products ranked for profile {profile_id}", products.len())
            };
            CommandResult::success_with_data(
                "products",
                message,
                &ProductPreview { profile_id, category, products },
            )
        }
        Err(error) => {
            CommandResult::from_application_error("products", &ApplicationError::from(error))
        }
    }
}
