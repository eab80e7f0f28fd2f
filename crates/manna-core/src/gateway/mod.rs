//! ============================================================================
//! Gateway Module - AI kitchen backend
//! ============================================================================
//! Two request/response calls, no retry and no client-side timeout:
//! - POST /api/recipes  ingredients + vibe  -> JSON array of recipes
//! - POST /api/shop     days/goal/diet/vibe -> JSON array of grocery items
//!
//! Anything other than a JSON array is an `InvalidResponse`; transport
//! failures and non-2xx replies are reported separately so callers can log
//! the difference even though users see one "Connection Error".
//! ============================================================================

mod http;

pub use http::{HttpGateway, RECIPES_PATH, SHOP_PATH};

use async_trait::async_trait;

use crate::types::{GroceryItem, KitchenError, Recipe, RecipeRequest, ShoppingRequest};

/// Backend that turns pantry contents and preferences into recipes and lists
#[async_trait]
pub trait KitchenBackend: Send + Sync {
    async fn generate_recipes(&self, request: &RecipeRequest) -> Result<Vec<Recipe>, KitchenError>;

    async fn generate_shopping_list(
        &self,
        request: &ShoppingRequest,
    ) -> Result<Vec<GroceryItem>, KitchenError>;
}
