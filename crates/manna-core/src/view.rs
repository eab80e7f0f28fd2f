//! ============================================================================
//! Screen Views - What the presentation layer should draw
//! ============================================================================
//! Pure projection of `KitchenState`: no business data is owned here. Modal
//! overlays (scanner, recipe detail) take precedence over the current step.
//! ============================================================================

use serde::Serialize;

use crate::types::*;
use crate::wizard::{CameraPermission, KitchenState, Step};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ScreenView {
    pub title: String,
    pub lines: Vec<String>,
    /// Tappable options, in display order
    pub choices: Vec<String>,
}

impl ScreenView {
    fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
            choices: Vec::new(),
        }
    }

    fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices.extend(choices.into_iter().map(Into::into));
        self
    }
}

/// Project the state onto the screen that should be visible now
pub fn render(state: &KitchenState) -> ScreenView {
    if state.scanner.visible {
        return scanner_view(state);
    }
    if let Some(recipe) = &state.selected_recipe {
        return recipe_detail(recipe);
    }

    match state.step {
        Step::Welcome => ScreenView::new("manna.ai")
            .line("Smart Kitchen. Zero Waste.")
            .choices(["START"]),
        Step::AskName => ScreenView::new("What's your name?")
            .line(format!("Name: {}", state.preferences.name))
            .choices(["NEXT"]),
        Step::AskGoal => {
            ScreenView::new("What is your Goal?").choices(Goal::ALL.iter().map(|g| g.label()))
        }
        Step::AskDiet => {
            ScreenView::new("Dietary Type?").choices(Diet::ALL.iter().map(|d| d.label()))
        }
        Step::AskVibe => {
            ScreenView::new("Cooking Vibe?").choices(CookingVibe::ALL.iter().map(|v| v.label()))
        }
        Step::AskKitchen => {
            ScreenView::new("Kitchen Status?").choices(["🥦 Stocked Fridge", "🏚 Empty Fridge"])
        }
        Step::KitchenChoice => ScreenView::new("How to add items?")
            .line("Scan your ingredients with AI or log them manually.")
            .choices(["← Back", "📸 Smart Scan", "📝 Manual Log"]),
        Step::ShoppingConfig => ScreenView::new("Shopping for how many days?")
            .line(state.preferences.shopping_days.to_string())
            .choices([
                "-",
                "+",
                if state.loading { "Generating..." } else { "GENERATE PLAN" },
            ]),
        Step::Dashboard => dashboard(state),
    }
}

fn scanner_view(state: &KitchenState) -> ScreenView {
    match state.scanner.permission {
        CameraPermission::Granted => {
            let status = if state.scanner.analyzing {
                "ANALYZING..."
            } else {
                "SCAN FRIDGE CONTENTS"
            };
            ScreenView::new(status).choices(["Shutter", "✕"])
        }
        CameraPermission::Unknown | CameraPermission::Denied => {
            ScreenView::new("Camera permission needed").choices(["✕"])
        }
    }
}

fn recipe_detail(recipe: &Recipe) -> ScreenView {
    let mut view = ScreenView::new(recipe.title.clone()).line(recipe.description.clone());
    if !recipe.tip.is_empty() {
        view = view.line(format!("Tip: {}", recipe.tip));
    }

    view = view.line("INGREDIENTS");
    for ingredient in &recipe.ingredients {
        view = view.line(format!("{} - {}", ingredient.name, ingredient.amount));
    }

    view = view.line("INSTRUCTIONS");
    for (i, step) in recipe.instructions.iter().enumerate() {
        view = view.line(format!("{}. {}", i + 1, step));
    }

    view.choices(["I COOKED THIS", "✕"])
}

fn dashboard(state: &KitchenState) -> ScreenView {
    let prefs = &state.preferences;
    let fuel = &state.daily_fuel;

    let mut view = ScreenView::new(format!("Hello, {}", prefs.display_name()))
        .line(format!("Mode: {} • Goal: {}", prefs.vibe.label(), prefs.goal_label()))
        .line(format!(
            "DAILY FUEL {} / {} kcal ({:.0}%)",
            fuel.calories,
            fuel.goal_calories,
            fuel.energy_pct()
        ));

    match state.active_tab {
        DashboardTab::Inventory => {
            if state.inventory.is_empty() {
                view = view.line("Your kitchen is empty.");
            }
            for item in state.inventory.items() {
                view = view.line(format!(
                    "{} {}  {} {} • {}d left",
                    item.icon, item.name, item.quantity, item.unit, item.days_left
                ));
            }

            view = view.line("AI CHEF RECOMMENDATIONS");
            for (i, recipe) in state.recipes.iter().enumerate() {
                view = view.line(format!(
                    "[{}] {} ({}) {} kcal • {}",
                    i, recipe.title, recipe.time, recipe.calories, recipe.difficulty
                ));
            }

            let generate = if state.loading { "Generating..." } else { "✨ GENERATE RECIPES" };
            view = view.choices(["Shopping List", "+ Add item", generate]);
            if state.inventory.is_empty() {
                view = view.choices(["📸 Scan Fridge"]);
            }
        }
        DashboardTab::Grocery => {
            view = view.line(format!("SMART LIST ({})", state.grocery.len()));
            if state.grocery.is_empty() {
                view = view.line("No plan generated yet.");
            }
            for (i, item) in state.grocery.items().iter().enumerate() {
                view = view.line(format!("[{}] {}  {}", i, item.name, item.amount));
                if item.is_expanded {
                    view = view
                        .line(format!("    💡 Why: {}", item.why))
                        .line(format!("    ⚡️ {} | 🔄 Swap: {}", item.nutrition, item.substitute));
                } else {
                    view = view.line("    Tap for details");
                }
            }
            view = view.choices(["Inventory"]);
        }
    }

    view.choices(["⚙️"])
}
