//! Food Model

use serde::{Deserialize, Serialize};

/// Menu food entity (菜品)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Food {
    pub id: i64,
    pub name: String,
    /// Price in currency unit
    pub price: f64,
    pub food_image: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create food payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodCreate {
    pub name: String,
    pub price: f64,
    pub food_image: Option<String>,
}
