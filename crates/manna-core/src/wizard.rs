//! ============================================================================
//! Wizard - Navigation state machine and application state
//! ============================================================================
//! Every mutation of the session goes through `KitchenState::dispatch`:
//! - User taps map to `Action`s that are only valid on certain steps
//! - Async completions (scan, recipes, shopping list) are accepted anywhere
//!   and may force navigation to the dashboard
//! - Side effects (backend calls, scans, notices, relayout hints) are
//!   returned as `Effect`s for the session driver to execute
//!
//! ```text
//! Welcome → AskName → AskGoal → AskDiet → AskVibe → AskKitchen
//!                                                    │ stocked   │ empty
//!                                                    ▼           ▼
//!                                             KitchenChoice  ShoppingConfig
//!                                        scan ↓   ↓ manual        ↓ plan ok
//!                                             Dashboard ◄─────────┘
//! ```
//! ============================================================================

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::pantry::{GroceryList, Inventory};
use crate::types::*;

/// Screen currently shown. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    Welcome,
    AskName,
    AskGoal,
    AskDiet,
    AskVibe,
    /// "Kitchen Status?" (stocked or empty)
    AskKitchen,
    /// Stocked fridge: scan or manual log
    KitchenChoice,
    /// Empty fridge: shopping-days configurator
    ShoppingConfig,
    Dashboard,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CameraPermission {
    #[default]
    Unknown,
    Granted,
    Denied,
}

/// Scan modal state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ScannerState {
    pub visible: bool,
    pub analyzing: bool,
    pub permission: CameraPermission,
}

/// Everything the user can trigger, plus async completions
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Start,
    SetName(String),
    SubmitName,
    ChooseGoal(Goal),
    ChooseDiet(Diet),
    ChooseVibe(CookingVibe),
    ChooseKitchen(KitchenStatus),
    Back,

    // Scan modal
    OpenScanner,
    CameraPermission(bool),
    CaptureScan(CapturedImage),
    CloseScanner,
    ScanCompleted(Result<Vec<InventoryItem>, KitchenError>),

    ManualLog,

    // Shopping configurator
    IncrementDays,
    DecrementDays,
    GeneratePlan,
    ShoppingListLoaded(Result<Vec<GroceryItem>, KitchenError>),

    // Dashboard
    OpenSettings,
    SelectTab(DashboardTab),
    AddInventoryItem(String),
    ToggleGroceryItem(usize),
    GenerateRecipes,
    RecipesLoaded(Result<Vec<Recipe>, KitchenError>),
    SelectRecipe(usize),
    CloseRecipe,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Start => "start",
            Action::SetName(_) => "set_name",
            Action::SubmitName => "submit_name",
            Action::ChooseGoal(_) => "choose_goal",
            Action::ChooseDiet(_) => "choose_diet",
            Action::ChooseVibe(_) => "choose_vibe",
            Action::ChooseKitchen(_) => "choose_kitchen",
            Action::Back => "back",
            Action::OpenScanner => "open_scanner",
            Action::CameraPermission(_) => "camera_permission",
            Action::CaptureScan(_) => "capture_scan",
            Action::CloseScanner => "close_scanner",
            Action::ScanCompleted(_) => "scan_completed",
            Action::ManualLog => "manual_log",
            Action::IncrementDays => "increment_days",
            Action::DecrementDays => "decrement_days",
            Action::GeneratePlan => "generate_plan",
            Action::ShoppingListLoaded(_) => "shopping_list_loaded",
            Action::OpenSettings => "open_settings",
            Action::SelectTab(_) => "select_tab",
            Action::AddInventoryItem(_) => "add_inventory_item",
            Action::ToggleGroceryItem(_) => "toggle_grocery_item",
            Action::GenerateRecipes => "generate_recipes",
            Action::RecipesLoaded(_) => "recipes_loaded",
            Action::SelectRecipe(_) => "select_recipe",
            Action::CloseRecipe => "close_recipe",
        }
    }
}

/// Work requested by the reducer
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Animate the re-layout of appearing/disappearing cards
    Relayout,
    Notify(Notice),
    FetchRecipes(RecipeRequest),
    FetchShoppingList(ShoppingRequest),
    RunScan(CapturedImage),
}

/// Owned application state for one session
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct KitchenState {
    pub step: Step,
    pub active_tab: DashboardTab,
    pub preferences: Preferences,
    pub inventory: Inventory,
    pub grocery: GroceryList,
    pub recipes: Vec<Recipe>,
    pub selected_recipe: Option<Recipe>,
    pub scanner: ScannerState,
    /// A backend request is in flight
    pub loading: bool,
    pub daily_fuel: DailyFuel,
}

impl KitchenState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one action. Rejected actions leave the state untouched.
    pub fn dispatch(&mut self, action: Action) -> Result<Vec<Effect>, KitchenError> {
        debug!("Dispatch {} on {:?}", action.name(), self.step);

        match (self.step, action) {
            // ----------------------------------------------------------------
            // Onboarding questionnaire
            // ----------------------------------------------------------------
            (Step::Welcome, Action::Start) => Ok(self.go_to(Step::AskName)),

            (Step::AskName, Action::SetName(name)) => {
                self.preferences.name = name;
                Ok(vec![])
            }

            (Step::AskName, Action::SubmitName) => Ok(self.go_to(Step::AskGoal)),

            (Step::AskGoal, Action::ChooseGoal(goal)) => {
                self.preferences.goal = Some(goal);
                Ok(self.go_to(Step::AskDiet))
            }

            (Step::AskDiet, Action::ChooseDiet(diet)) => {
                self.preferences.diet = Some(diet);
                Ok(self.go_to(Step::AskVibe))
            }

            (Step::AskVibe, Action::ChooseVibe(vibe)) => {
                self.preferences.vibe = vibe;
                Ok(self.go_to(Step::AskKitchen))
            }

            (Step::AskKitchen, Action::ChooseKitchen(KitchenStatus::Stocked)) => {
                Ok(self.go_to(Step::KitchenChoice))
            }

            (Step::AskKitchen, Action::ChooseKitchen(KitchenStatus::Empty)) => {
                Ok(self.go_to(Step::ShoppingConfig))
            }

            (Step::KitchenChoice, Action::Back) => Ok(self.go_to(Step::AskKitchen)),

            (Step::KitchenChoice, Action::ManualLog) => {
                self.inventory.clear();
                self.active_tab = DashboardTab::Inventory;
                let mut effects = self.go_to(Step::Dashboard);
                effects.push(Effect::Notify(Notice::info(
                    "Manual Mode",
                    "Use the '+' button to add your ingredients.",
                )));
                Ok(effects)
            }

            // ----------------------------------------------------------------
            // Scan modal
            // ----------------------------------------------------------------
            (Step::KitchenChoice | Step::Dashboard, Action::OpenScanner) => {
                self.scanner.visible = true;
                Ok(vec![])
            }

            (_, Action::CameraPermission(granted)) if self.scanner.visible => {
                self.scanner.permission = if granted {
                    CameraPermission::Granted
                } else {
                    CameraPermission::Denied
                };
                info!("Camera permission: {:?}", self.scanner.permission);
                Ok(vec![])
            }

            (_, Action::CaptureScan(image)) if self.scanner.visible => {
                if self.scanner.permission != CameraPermission::Granted {
                    return Err(KitchenError::CameraDenied);
                }
                if self.scanner.analyzing {
                    return Ok(vec![]);
                }
                self.scanner.analyzing = true;
                Ok(vec![Effect::RunScan(image)])
            }

            (_, Action::CloseScanner) if self.scanner.visible => {
                self.scanner.visible = false;
                self.scanner.analyzing = false;
                Ok(vec![])
            }

            // Forces the dashboard regardless of where the user is now
            (_, Action::ScanCompleted(Ok(items))) => {
                let names = items
                    .iter()
                    .map(|i| i.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                info!("Scan complete: {}", names);

                self.scanner.visible = false;
                self.scanner.analyzing = false;
                self.inventory.extend(items);
                self.active_tab = DashboardTab::Inventory;

                let mut effects = self.go_to(Step::Dashboard);
                effects.push(Effect::Notify(Notice::info(
                    "Scan Complete",
                    format!("Identified: {}.", names),
                )));
                Ok(effects)
            }

            (_, Action::ScanCompleted(Err(e))) => {
                warn!("Scan failed: {}", e);
                self.scanner.analyzing = false;
                Ok(vec![Effect::Notify(Notice::alert("Scan Failed", e.to_string()))])
            }

            // ----------------------------------------------------------------
            // Shopping configurator
            // ----------------------------------------------------------------
            (Step::ShoppingConfig, Action::IncrementDays) => {
                self.preferences.increment_days();
                Ok(vec![])
            }

            (Step::ShoppingConfig, Action::DecrementDays) => {
                self.preferences.decrement_days();
                Ok(vec![])
            }

            (Step::ShoppingConfig, Action::GeneratePlan) => {
                self.loading = true;
                Ok(vec![Effect::FetchShoppingList(self.shopping_request())])
            }

            (_, Action::ShoppingListLoaded(Ok(items))) => {
                self.loading = false;
                self.grocery.replace(items);
                self.active_tab = DashboardTab::Grocery;
                let mut effects = self.go_to(Step::Dashboard);
                if effects.is_empty() {
                    effects.push(Effect::Relayout);
                }
                Ok(effects)
            }

            (_, Action::ShoppingListLoaded(Err(e))) => {
                self.loading = false;
                warn!("Shopping list failed: {}", e);
                Ok(vec![Effect::Notify(Notice::alert(
                    "Connection Error",
                    "Check your tunnel URL.",
                ))])
            }

            // ----------------------------------------------------------------
            // Dashboard
            // ----------------------------------------------------------------
            (Step::Dashboard, Action::OpenSettings) => Ok(self.go_to(Step::AskKitchen)),

            (Step::Dashboard, Action::SelectTab(tab)) => {
                self.active_tab = tab;
                Ok(vec![Effect::Relayout])
            }

            (Step::Dashboard, Action::AddInventoryItem(name)) => {
                self.inventory.add(&name);
                Ok(vec![])
            }

            (Step::Dashboard, Action::ToggleGroceryItem(index)) => {
                match self.grocery.toggle(index) {
                    Some(_) => Ok(vec![Effect::Relayout]),
                    None => {
                        debug!("Toggle ignored, no grocery item at {}", index);
                        Ok(vec![])
                    }
                }
            }

            (Step::Dashboard, Action::GenerateRecipes) => {
                if self.inventory.is_empty() {
                    return Ok(vec![Effect::Notify(Notice::info(
                        "Empty Kitchen",
                        "Add items first!",
                    ))]);
                }
                self.loading = true;
                Ok(vec![Effect::FetchRecipes(RecipeRequest {
                    ingredients: self.inventory.names(),
                    vibe: self.preferences.vibe,
                })])
            }

            (_, Action::RecipesLoaded(Ok(recipes))) => {
                self.loading = false;
                info!("Loaded {} recipes", recipes.len());
                self.recipes = recipes;
                Ok(vec![Effect::Relayout])
            }

            (_, Action::RecipesLoaded(Err(e))) => {
                self.loading = false;
                warn!("Recipe generation failed: {}", e);
                Ok(vec![Effect::Notify(Notice::alert(
                    "Connection Error",
                    "Is the backend running?",
                ))])
            }

            (Step::Dashboard, Action::SelectRecipe(index)) => {
                self.selected_recipe = self.recipes.get(index).cloned();
                Ok(vec![])
            }

            (_, Action::CloseRecipe) => {
                self.selected_recipe = None;
                Ok(vec![])
            }

            (step, other) => Err(KitchenError::UnexpectedAction {
                step,
                action: other.name().to_string(),
            }),
        }
    }

    /// Body for the shopping-list request from the current preferences
    pub fn shopping_request(&self) -> ShoppingRequest {
        ShoppingRequest {
            days: self.preferences.shopping_days,
            goal: self.preferences.goal_label().to_string(),
            diet: self.preferences.diet_label().to_string(),
            vibe: self.preferences.vibe,
        }
    }

    fn go_to(&mut self, step: Step) -> Vec<Effect> {
        if self.step == step {
            return vec![];
        }
        info!("Step {:?} -> {:?}", self.step, step);
        self.step = step;
        vec![Effect::Relayout]
    }
}
