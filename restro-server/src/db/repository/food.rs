//! Food Repository

use std::sync::Arc;

use shared::models::{Food, FoodCreate};
use shared::util::{now_millis, snowflake_id};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::{QueryContext, Store};
use crate::money;

#[derive(Clone)]
pub struct FoodRepository {
    base: BaseRepository,
}

impl FoodRepository {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            base: BaseRepository::new(store),
        }
    }

    pub async fn find_by_id(&self, ctx: &QueryContext, id: i64) -> RepoResult<Option<Food>> {
        let store = self.base.store();
        Ok(ctx.run(store.find_food(ctx, id)).await?)
    }

    /// Create a food; name must be non-empty and price within bounds
    pub async fn create(&self, ctx: &QueryContext, data: FoodCreate) -> RepoResult<Food> {
        let name = data.name.trim();
        if name.is_empty() {
            return Err(RepoError::Validation("name must not be empty".to_string()));
        }
        money::validate_price(data.price, "price").map_err(RepoError::FoodPrice)?;

        let now = now_millis();
        let food = Food {
            id: snowflake_id(),
            name: name.to_string(),
            price: data.price,
            food_image: data.food_image.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        let store = self.base.store();
        ctx.run(store.insert_food(food.clone())).await?;
        tracing::info!(food_id = food.id, name = %food.name, "Food created");
        Ok(food)
    }
}
