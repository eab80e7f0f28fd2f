//! ============================================================================
//! Core Types for Manna
//! ============================================================================
//! Pantry, shopping-list and recipe records, onboarding answers, user notices
//! and the wire bodies exchanged with the AI kitchen backend.
//! ============================================================================

use serde::{Deserialize, Deserializer, Serialize};

use crate::wizard::Step;

// ============================================================================
// Onboarding Choices
// ============================================================================

/// Cooking style sent with every backend request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum CookingVibe {
    #[default]
    Speed,
    Therapy,
    Pro,
}

impl CookingVibe {
    pub const ALL: [CookingVibe; 3] = [CookingVibe::Speed, CookingVibe::Therapy, CookingVibe::Pro];

    pub fn label(&self) -> &'static str {
        match self {
            CookingVibe::Speed => "Speed",
            CookingVibe::Therapy => "Therapy",
            CookingVibe::Pro => "Pro",
        }
    }
}

/// Nutrition goal picked on the goal step
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Goal {
    #[serde(rename = "Weight Loss")]
    WeightLoss,
    Energy,
    Muscle,
    #[serde(rename = "Gut Health")]
    GutHealth,
}

impl Goal {
    pub const ALL: [Goal; 4] = [Goal::WeightLoss, Goal::Energy, Goal::Muscle, Goal::GutHealth];

    pub fn label(&self) -> &'static str {
        match self {
            Goal::WeightLoss => "Weight Loss",
            Goal::Energy => "Energy",
            Goal::Muscle => "Muscle",
            Goal::GutHealth => "Gut Health",
        }
    }
}

/// Dietary type picked on the diet step
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Diet {
    Classic,
    Vegan,
    Vegetarian,
    #[serde(rename = "Gluten Free")]
    GlutenFree,
}

impl Diet {
    pub const ALL: [Diet; 4] = [Diet::Classic, Diet::Vegan, Diet::Vegetarian, Diet::GlutenFree];

    pub fn label(&self) -> &'static str {
        match self {
            Diet::Classic => "Classic",
            Diet::Vegan => "Vegan",
            Diet::Vegetarian => "Vegetarian",
            Diet::GlutenFree => "Gluten Free",
        }
    }
}

/// Answer to "Kitchen Status?"
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum KitchenStatus {
    Stocked,
    Empty,
}

/// Dashboard tab selector
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DashboardTab {
    #[default]
    Inventory,
    Grocery,
}

/// Onboarding answers. Never reset: revisiting the kitchen step from the
/// dashboard keeps everything collected so far.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preferences {
    pub name: String,
    pub goal: Option<Goal>,
    pub diet: Option<Diet>,
    pub vibe: CookingVibe,
    pub meal_count: u32,
    pub shopping_days: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            name: String::new(),
            goal: None,
            diet: None,
            vibe: CookingVibe::Speed,
            meal_count: 3,
            shopping_days: 3,
        }
    }
}

impl Preferences {
    /// Goal label used in requests and the dashboard header
    pub fn goal_label(&self) -> &'static str {
        self.goal.map(|g| g.label()).unwrap_or("Health")
    }

    pub fn diet_label(&self) -> &'static str {
        self.diet.map(|d| d.label()).unwrap_or("Everything")
    }

    pub fn display_name(&self) -> &str {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            "Chef"
        } else {
            trimmed
        }
    }

    pub fn increment_days(&mut self) {
        self.shopping_days = self.shopping_days.saturating_add(1);
    }

    /// Never drops below one day
    pub fn decrement_days(&mut self) {
        self.shopping_days = self.shopping_days.saturating_sub(1).max(1);
    }
}

// ============================================================================
// Pantry / Shopping / Recipe Records
// ============================================================================

/// A food item the user owns
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    /// Freshness estimate; no timer decrements it
    pub days_left: u32,
    pub icon: String,
}

/// One line of a generated shopping list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroceryItem {
    pub name: String,
    pub amount: String,
    #[serde(default)]
    pub nutrition: String,
    #[serde(default)]
    pub substitute: String,
    #[serde(default)]
    pub why: String,
    /// UI-only; every freshly loaded list starts collapsed
    #[serde(skip)]
    pub is_expanded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ingredient {
    pub name: String,
    pub amount: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Macros {
    #[serde(rename = "p")]
    pub protein: f64,
    #[serde(rename = "c")]
    pub carbs: f64,
    #[serde(rename = "f")]
    pub fat: f64,
}

/// AI-generated recipe card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "number_as_u32")]
    pub calories: u32,
    #[serde(default)]
    pub macros: Macros,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub tip: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub image: String,
}

/// The backend asks the model for a "unique number" id, which arrives as
/// either a JSON string or a bare number.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

/// Model output writes calories as `420`, `420.0` or `"420"`. Fractions
/// round; negatives clamp to zero.
fn number_as_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let number = match &value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(n) if n.is_finite() => Ok(n.round().clamp(0.0, u32::MAX as f64) as u32),
        _ => Err(serde::de::Error::custom(format!(
            "expected a calorie number, got {}",
            value
        ))),
    }
}

/// Daily energy tracker shown on the dashboard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DailyFuel {
    pub calories: u32,
    pub protein: u32,
    pub goal_calories: u32,
    pub goal_protein: u32,
}

impl Default for DailyFuel {
    fn default() -> Self {
        Self {
            calories: 1200,
            protein: 85,
            goal_calories: 2200,
            goal_protein: 140,
        }
    }
}

impl DailyFuel {
    /// Fill percentage of a progress bar, clamped to 100
    pub fn progress_pct(current: u32, max: u32) -> f64 {
        if max == 0 {
            return 100.0;
        }
        (current as f64 / max as f64 * 100.0).min(100.0)
    }

    pub fn energy_pct(&self) -> f64 {
        Self::progress_pct(self.calories, self.goal_calories)
    }
}

// ============================================================================
// User Notices
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    /// Lightweight hint (validation, mode change, scan result)
    Info,
    /// Modal alert for failed actions
    Alert,
}

/// Message surfaced to the user by the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn alert(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Alert,
            title: title.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Backend Wire Bodies
// ============================================================================

/// Body of `POST /api/recipes`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeRequest {
    pub ingredients: Vec<String>,
    pub vibe: CookingVibe,
}

/// Body of `POST /api/shop`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShoppingRequest {
    pub days: u32,
    pub goal: String,
    pub diet: String,
    pub vibe: CookingVibe,
}

/// Raw camera frame handed to the ingredient recognizer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedImage {
    pub bytes: Vec<u8>,
}

impl CapturedImage {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Error types for the kitchen core
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, thiserror::Error)]
pub enum KitchenError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid AI Response: {0}")]
    InvalidResponse(String),

    #[error("Scan failed: {0}")]
    ScanFailed(String),

    #[error("No food detected in the image")]
    NoFoodDetected,

    #[error("Camera permission denied")]
    CameraDenied,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Action '{action}' is not available on step {step:?}")]
    UnexpectedAction { step: Step, action: String },
}

impl KitchenError {
    /// Transport failures and non-2xx replies; the request never produced a payload
    pub fn is_connectivity(&self) -> bool {
        matches!(self, KitchenError::Transport(_) | KitchenError::Status { .. })
    }
}
