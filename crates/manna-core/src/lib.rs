//! ============================================================================
//! MANNA-CORE: Smart Kitchen Brain
//! ============================================================================
//! This crate handles all non-visual logic of the Manna kitchen app:
//! - Onboarding wizard and dashboard navigation as one reducer
//! - In-memory pantry inventory and generated shopping list
//! - Recipe / shopping-list requests against the AI backend via reqwest
//! - Ingredient recognition seam with a timed scan simulator
//! ============================================================================

pub mod config;
pub mod gateway;
pub mod pantry;
pub mod recognizer;
pub mod session;
pub mod types;
pub mod view;
pub mod wizard;

// Re-export main types for convenience
pub use config::KitchenConfig;
pub use gateway::{HttpGateway, KitchenBackend};
pub use pantry::{food_icon, GroceryList, Inventory};
pub use recognizer::{IngredientRecognizer, ScanSimulator};
pub use session::KitchenSession;
pub use types::*;
pub use view::{render, ScreenView};
pub use wizard::{Action, CameraPermission, Effect, KitchenState, ScannerState, Step};
