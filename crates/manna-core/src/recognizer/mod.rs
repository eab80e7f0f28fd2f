//! ============================================================================
//! Recognizer Module - Food detection from camera frames
//! ============================================================================
//! `IngredientRecognizer` is the seam for a real perception backend. The
//! only implementation today is `ScanSimulator`, which waits a fixed delay
//! and returns a canned set of fridge items. Real recognizers are expected
//! to fail with `ScanFailed` or `NoFoodDetected`.
//! ============================================================================

mod simulator;

pub use simulator::ScanSimulator;

use async_trait::async_trait;

use crate::types::{CapturedImage, InventoryItem, KitchenError};

#[async_trait]
pub trait IngredientRecognizer: Send + Sync {
    /// Identify food in `image` and return it as fresh inventory items
    async fn recognize(&self, image: &CapturedImage) -> Result<Vec<InventoryItem>, KitchenError>;
}
