// ============================================================================
// manna: terminal front end for the Manna smart kitchen
// ============================================================================
// Usage:
//   manna session                                   Interactive onboarding + dashboard
//   manna recipes --ingredient Eggs --vibe Speed    One-shot recipe request
//   manna shop --days 3 --goal Muscle --diet Vegan  One-shot shopping list request
// ============================================================================

mod repl;

use anyhow::Result;
use clap::{Parser, Subcommand};
use manna_core::{
    Diet, Goal, HttpGateway, KitchenBackend, KitchenConfig, RecipeRequest, ShoppingRequest,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Manna smart kitchen client
#[derive(Parser)]
#[command(name = "manna", version, about = "Plan meals and shopping lists with the Manna AI backend")]
struct Cli {
    /// Backend base URL (default: MANNA_BACKEND_URL or the hosted backend)
    #[arg(long, global = true)]
    backend_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk through onboarding and use the dashboard interactively
    Session,

    /// Generate recipes from a list of ingredients
    Recipes {
        /// Ingredient name (repeat for more)
        #[arg(long = "ingredient", required = true)]
        ingredients: Vec<String>,

        /// Cooking vibe: Speed, Therapy or Pro
        #[arg(long, default_value = "Speed")]
        vibe: String,
    },

    /// Generate a shopping list
    Shop {
        /// Number of days to shop for (minimum 1)
        #[arg(long, default_value = "3")]
        days: u32,

        /// Goal: Weight Loss, Energy, Muscle, Gut Health
        #[arg(long)]
        goal: Option<String>,

        /// Diet: Classic, Vegan, Vegetarian, Gluten Free
        #[arg(long)]
        diet: Option<String>,

        /// Cooking vibe: Speed, Therapy or Pro
        #[arg(long, default_value = "Speed")]
        vibe: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("manna_cli=info,manna_core=info")),
        )
        .init();

    // Load environment variables from .env file
    if let Err(e) = dotenvy::dotenv() {
        debug!("No .env file loaded: {}", e);
    }

    let cli = Cli::parse();

    let mut config = KitchenConfig::from_env()?;
    if let Some(url) = cli.backend_url {
        config = config.with_backend_url(url);
    }
    info!("Backend: {}", config.backend_url);

    match cli.command {
        Commands::Session => repl::run(config).await,
        Commands::Recipes { ingredients, vibe } => cmd_recipes(&config, ingredients, &vibe).await,
        Commands::Shop {
            days,
            goal,
            diet,
            vibe,
        } => cmd_shop(&config, days, goal, diet, &vibe).await,
    }
}

async fn cmd_recipes(config: &KitchenConfig, ingredients: Vec<String>, vibe: &str) -> Result<()> {
    let ingredients: Vec<String> = ingredients
        .into_iter()
        .filter(|i| !i.trim().is_empty())
        .collect();
    if ingredients.is_empty() {
        anyhow::bail!("Add items first: at least one non-empty --ingredient is required");
    }

    let request = RecipeRequest {
        ingredients,
        vibe: repl::parse_vibe(vibe)?,
    };

    let gateway = HttpGateway::new(config)?;
    let recipes = gateway.generate_recipes(&request).await?;

    println!("{}", serde_json::to_string_pretty(&recipes)?);
    Ok(())
}

async fn cmd_shop(
    config: &KitchenConfig,
    days: u32,
    goal: Option<String>,
    diet: Option<String>,
    vibe: &str,
) -> Result<()> {
    let goal: Option<Goal> = goal.as_deref().map(repl::parse_goal).transpose()?;
    let diet: Option<Diet> = diet.as_deref().map(repl::parse_diet).transpose()?;

    let request = ShoppingRequest {
        days: days.max(1),
        goal: goal.map(|g| g.label()).unwrap_or("Health").to_string(),
        diet: diet.map(|d| d.label()).unwrap_or("Everything").to_string(),
        vibe: repl::parse_vibe(vibe)?,
    };

    let gateway = HttpGateway::new(config)?;
    let items = gateway.generate_shopping_list(&request).await?;

    println!("{}", serde_json::to_string_pretty(&items)?);
    Ok(())
}
