//! ============================================================================
//! HTTP Gateway - reqwest client for the AI kitchen backend
//! ============================================================================

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::KitchenBackend;
use crate::config::KitchenConfig;
use crate::types::{GroceryItem, KitchenError, Recipe, RecipeRequest, ShoppingRequest};

pub const RECIPES_PATH: &str = "/api/recipes";
pub const SHOP_PATH: &str = "/api/shop";

/// Backend client with per-deployment extra headers baked in
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Create a gateway from configuration. Fails on header names or values
    /// that are not valid HTTP.
    pub fn new(config: &KitchenConfig) -> Result<Self, KitchenError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.extra_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| KitchenError::Config(format!("header name '{}': {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| KitchenError::Config(format!("header value '{}': {}", value, e)))?;
            headers.insert(name, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| KitchenError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_for_array<B, T>(&self, path: &str, body: &B) -> Result<Vec<T>, KitchenError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        info!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| KitchenError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("{} returned {}", path, status);
            return Err(KitchenError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| KitchenError::InvalidResponse(format!("body is not JSON: {}", e)))?;

        parse_array(payload)
    }
}

/// Accept only a JSON array whose elements match `T`
fn parse_array<T: DeserializeOwned>(payload: serde_json::Value) -> Result<Vec<T>, KitchenError> {
    if !payload.is_array() {
        return Err(KitchenError::InvalidResponse(format!(
            "expected a JSON array, got {}",
            json_kind(&payload)
        )));
    }

    let items: Vec<T> = serde_json::from_value(payload)
        .map_err(|e| KitchenError::InvalidResponse(e.to_string()))?;
    debug!("Parsed {} items", items.len());
    Ok(items)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[async_trait]
impl KitchenBackend for HttpGateway {
    async fn generate_recipes(&self, request: &RecipeRequest) -> Result<Vec<Recipe>, KitchenError> {
        info!(
            "Generating recipes for {} ingredients ({})",
            request.ingredients.len(),
            request.vibe.label()
        );
        self.post_for_array(RECIPES_PATH, request).await
    }

    async fn generate_shopping_list(
        &self,
        request: &ShoppingRequest,
    ) -> Result<Vec<GroceryItem>, KitchenError> {
        info!(
            "Generating {}-day shopping list (goal: {}, diet: {})",
            request.days, request.goal, request.diet
        );
        self.post_for_array(SHOP_PATH, request).await
    }
}
