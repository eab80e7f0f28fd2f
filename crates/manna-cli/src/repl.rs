//! Line-oriented driver for an interactive kitchen session.

use anyhow::{bail, Context, Result};
use manna_core::{
    render, Action, CapturedImage, CookingVibe, DashboardTab, Diet, Goal, HttpGateway,
    KitchenBackend, KitchenConfig, KitchenSession, KitchenState, KitchenStatus,
    IngredientRecognizer, NoticeKind, ScanSimulator,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::warn;

const HELP: &str = "\
Commands:
  start                 Leave the welcome screen
  name <text>           Set your name and continue
  goal <choice>         Weight Loss | Energy | Muscle | Gut Health (or 1-4)
  diet <choice>         Classic | Vegan | Vegetarian | Gluten Free (or 1-4)
  vibe <choice>         Speed | Therapy | Pro (or 1-3)
  stocked | empty       Kitchen status
  back                  Return from the kitchen choice screen
  scan [path]           Open the camera, grant access and capture a frame
  deny-camera           Open the camera and refuse access
  manual                Start with an empty inventory
  more | less           Adjust shopping days
  plan                  Generate a shopping plan
  settings              Re-plan from the kitchen status screen
  tab <inventory|grocery>
  add <item>            Add an inventory item
  toggle <n>            Expand or collapse grocery item n
  recipes               Generate recipes from the inventory
  open <n>              Show recipe n
  close                 Close the scanner or recipe detail
  state                 Dump the full state as JSON
  help                  Show this help
  quit                  Exit";

/// One parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Dispatch(Vec<Action>),
    /// Capture a frame, optionally read from a file
    Scan(Option<String>),
    State,
    Help,
    Quit,
}

/// Run the interactive session against the configured backend
pub async fn run(config: KitchenConfig) -> Result<()> {
    let gateway = HttpGateway::new(&config)?;
    let simulator = ScanSimulator::from_config(&config);
    let mut session = KitchenSession::new(gateway, simulator);

    println!("Type 'help' for commands.");
    print_screen(session.state());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt().await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim();
                if line.is_empty() {
                    prompt().await?;
                    continue;
                }

                match parse_command(line, session.state()) {
                    Ok(Command::Quit) => break,
                    Ok(Command::Help) => println!("{}", HELP),
                    Ok(Command::State) => {
                        println!("{}", serde_json::to_string_pretty(session.state())?)
                    }
                    Ok(Command::Scan(path)) => match load_image(path.as_deref()).await {
                        Ok(image) => apply(
                            &mut session,
                            vec![
                                Action::OpenScanner,
                                Action::CameraPermission(true),
                                Action::CaptureScan(image),
                            ],
                        ),
                        Err(e) => println!("! {:#}", e),
                    },
                    Ok(Command::Dispatch(actions)) => apply(&mut session, actions),
                    Err(e) => println!("! {}", e),
                }
                prompt().await?;
            }
            completion = session.next_completion() => {
                println!();
                apply(&mut session, vec![completion]);
                prompt().await?;
            }
        }
    }

    // Input closed: let pending requests land so their results are shown
    if session.in_flight() > 0 {
        println!("Waiting for {} pending request(s)...", session.in_flight());
        while session.in_flight() > 0 {
            let completion = session.next_completion().await;
            apply(&mut session, vec![completion]);
        }
    }

    Ok(())
}

/// Frame for `scan`: the file's bytes, or an empty frame without a path
async fn load_image(path: Option<&str>) -> Result<CapturedImage> {
    match path {
        Some(path) => {
            let bytes = tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read image {}", path))?;
            Ok(CapturedImage::new(bytes))
        }
        None => Ok(CapturedImage::default()),
    }
}

fn apply<B, R>(session: &mut KitchenSession<B, R>, actions: Vec<Action>)
where
    B: KitchenBackend + 'static,
    R: IngredientRecognizer + 'static,
{
    for action in actions {
        if let Err(e) = session.dispatch(action) {
            warn!("Action rejected: {}", e);
            println!("! {}", e);
            break;
        }
    }

    for notice in session.take_notices() {
        let marker = match notice.kind {
            NoticeKind::Info => "i",
            NoticeKind::Alert => "!",
        };
        println!("[{}] {}: {}", marker, notice.title, notice.message);
    }

    print_screen(session.state());
}

async fn prompt() -> Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"> ").await?;
    stdout.flush().await?;
    Ok(())
}

fn print_screen(state: &KitchenState) {
    let view = render(state);
    println!();
    println!("== {} ==", view.title);
    for line in &view.lines {
        println!("{}", line);
    }
    if !view.choices.is_empty() {
        println!("[{}]", view.choices.join("] ["));
    }
}

/// Map one input line to the actions it stands for
pub fn parse_command(line: &str, state: &KitchenState) -> Result<Command> {
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let actions = match word.to_lowercase().as_str() {
        "quit" | "exit" => return Ok(Command::Quit),
        "help" | "?" => return Ok(Command::Help),
        "state" => return Ok(Command::State),
        "scan" => {
            return Ok(Command::Scan(if rest.is_empty() {
                None
            } else {
                Some(rest.to_string())
            }))
        }
        "start" => vec![Action::Start],
        "name" => vec![Action::SetName(rest.to_string()), Action::SubmitName],
        "goal" => vec![Action::ChooseGoal(parse_goal(rest)?)],
        "diet" => vec![Action::ChooseDiet(parse_diet(rest)?)],
        "vibe" => vec![Action::ChooseVibe(parse_vibe(rest)?)],
        "stocked" => vec![Action::ChooseKitchen(KitchenStatus::Stocked)],
        "empty" => vec![Action::ChooseKitchen(KitchenStatus::Empty)],
        "back" => vec![Action::Back],
        "deny-camera" => vec![Action::OpenScanner, Action::CameraPermission(false)],
        "manual" => vec![Action::ManualLog],
        "more" | "+" => vec![Action::IncrementDays],
        "less" | "-" => vec![Action::DecrementDays],
        "plan" => vec![Action::GeneratePlan],
        "settings" => vec![Action::OpenSettings],
        "tab" => vec![Action::SelectTab(parse_tab(rest)?)],
        "add" => {
            if rest.is_empty() {
                bail!("Usage: add <item>");
            }
            vec![Action::AddInventoryItem(rest.to_string())]
        }
        "toggle" => vec![Action::ToggleGroceryItem(parse_index(rest)?)],
        "recipes" => vec![Action::GenerateRecipes],
        "open" => vec![Action::SelectRecipe(parse_index(rest)?)],
        "close" | "cooked" => {
            if state.scanner.visible {
                vec![Action::CloseScanner]
            } else {
                vec![Action::CloseRecipe]
            }
        }
        other => bail!("Unknown command: {}. Type 'help' for commands.", other),
    };

    Ok(Command::Dispatch(actions))
}

pub fn parse_goal(s: &str) -> Result<Goal> {
    parse_choice(s, &Goal::ALL, |g| g.label()).context("Goal must be Weight Loss, Energy, Muscle or Gut Health")
}

pub fn parse_diet(s: &str) -> Result<Diet> {
    parse_choice(s, &Diet::ALL, |d| d.label()).context("Diet must be Classic, Vegan, Vegetarian or Gluten Free")
}

pub fn parse_vibe(s: &str) -> Result<CookingVibe> {
    parse_choice(s, &CookingVibe::ALL, |v| v.label()).context("Vibe must be Speed, Therapy or Pro")
}

fn parse_tab(s: &str) -> Result<DashboardTab> {
    match s.to_lowercase().as_str() {
        "inventory" | "i" => Ok(DashboardTab::Inventory),
        "grocery" | "g" | "shopping" => Ok(DashboardTab::Grocery),
        _ => bail!("Tab must be inventory or grocery"),
    }
}

fn parse_index(s: &str) -> Result<usize> {
    s.parse()
        .with_context(|| format!("Expected an item number, got '{}'", s))
}

/// Accept a 1-based position or the label, ignoring case and spaces
fn parse_choice<T: Copy>(s: &str, options: &[T], label: fn(&T) -> &'static str) -> Result<T> {
    if let Ok(n) = s.parse::<usize>() {
        if n >= 1 && n <= options.len() {
            return Ok(options[n - 1]);
        }
        bail!("Choice {} out of range 1-{}", n, options.len());
    }

    let wanted = normalize(s);
    options
        .iter()
        .find(|o| normalize(label(o)) == wanted)
        .copied()
        .with_context(|| format!("Unknown choice '{}'", s))
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
