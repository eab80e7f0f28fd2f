//! ============================================================================
//! Kitchen Session - Drives the wizard reducer against real collaborators
//! ============================================================================
//! Single owner of `KitchenState`. User actions are applied immediately;
//! backend calls and scans run on spawned tasks and report back through a
//! channel, so the caller keeps handling input while they are in flight.
//!
//! Pattern: dispatch -> tokio::spawn effect -> completion Action on channel
//!          -> `next_completion` -> dispatch
//!
//! Nothing cancels a spawned task: a completion that arrives after the user
//! moved on still goes through the reducer and may force the dashboard.
//! ============================================================================

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::gateway::KitchenBackend;
use crate::recognizer::IngredientRecognizer;
use crate::types::{KitchenError, Notice};
use crate::wizard::{Action, Effect, KitchenState};

pub struct KitchenSession<B, R> {
    state: KitchenState,
    backend: Arc<B>,
    recognizer: Arc<R>,
    completions_tx: mpsc::UnboundedSender<Action>,
    completions_rx: mpsc::UnboundedReceiver<Action>,
    in_flight: usize,
    notices: Vec<Notice>,
    relayouts: usize,
}

impl<B, R> KitchenSession<B, R>
where
    B: KitchenBackend + 'static,
    R: IngredientRecognizer + 'static,
{
    pub fn new(backend: B, recognizer: R) -> Self {
        Self::with_state(KitchenState::new(), backend, recognizer)
    }

    pub fn with_state(state: KitchenState, backend: B, recognizer: R) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            state,
            backend: Arc::new(backend),
            recognizer: Arc::new(recognizer),
            completions_tx,
            completions_rx,
            in_flight: 0,
            notices: Vec::new(),
            relayouts: 0,
        }
    }

    pub fn state(&self) -> &KitchenState {
        &self.state
    }

    /// Drain notices produced since the last call
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Relayout hints emitted so far
    pub fn relayouts(&self) -> usize {
        self.relayouts
    }

    /// Backend calls and scans spawned but not yet applied
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Apply an action and start the work it asks for. Must run inside a
    /// Tokio runtime. Only this action can be rejected; completions
    /// delivered later are always accepted.
    pub fn dispatch(&mut self, action: Action) -> Result<(), KitchenError> {
        for effect in self.state.dispatch(action)? {
            self.run_effect(effect);
        }
        Ok(())
    }

    /// Wait for the next finished backend call or scan. Pending forever
    /// while nothing is in flight, so it can sit in a `select!` next to
    /// user input. Cancel safe.
    pub async fn next_completion(&mut self) -> Action {
        match self.completions_rx.recv().await {
            Some(action) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                action
            }
            // The session holds a sender, so the channel never closes
            None => std::future::pending().await,
        }
    }

    /// Apply completions until no work is in flight
    pub async fn settle(&mut self) {
        while self.in_flight > 0 {
            let action = self.next_completion().await;
            if let Err(e) = self.dispatch(action) {
                debug!("Completion rejected: {}", e);
            }
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Relayout => self.relayouts += 1,
            Effect::Notify(notice) => {
                info!("Notice [{}]: {}", notice.title, notice.message);
                self.notices.push(notice);
            }
            Effect::FetchRecipes(request) => {
                let backend = Arc::clone(&self.backend);
                self.spawn("recipes", async move {
                    Action::RecipesLoaded(backend.generate_recipes(&request).await)
                });
            }
            Effect::FetchShoppingList(request) => {
                let backend = Arc::clone(&self.backend);
                self.spawn("shopping list", async move {
                    Action::ShoppingListLoaded(backend.generate_shopping_list(&request).await)
                });
            }
            Effect::RunScan(image) => {
                let recognizer = Arc::clone(&self.recognizer);
                self.spawn("scan", async move {
                    Action::ScanCompleted(recognizer.recognize(&image).await)
                });
            }
        }
    }

    fn spawn<F>(&mut self, what: &'static str, work: F)
    where
        F: std::future::Future<Output = Action> + Send + 'static,
    {
        debug!("Spawning {}", what);
        self.in_flight += 1;
        let tx = self.completions_tx.clone();
        tokio::spawn(async move {
            // Receiver lives as long as the session
            if tx.send(work.await).is_err() {
                debug!("Session dropped before {} finished", what);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::ScanSimulator;
    use crate::types::*;
    use crate::wizard::Step;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Scripted backend recording every request
    #[derive(Default)]
    struct FakeBackend {
        recipes: Option<Vec<Recipe>>,
        groceries: Option<Vec<GroceryItem>>,
        recipe_calls: Mutex<Vec<RecipeRequest>>,
        shop_calls: Mutex<Vec<ShoppingRequest>>,
    }

    #[async_trait]
    impl KitchenBackend for FakeBackend {
        async fn generate_recipes(&self, request: &RecipeRequest) -> Result<Vec<Recipe>, KitchenError> {
            self.recipe_calls.lock().unwrap().push(request.clone());
            self.recipes
                .clone()
                .ok_or_else(|| KitchenError::InvalidResponse("expected a JSON array, got an object".into()))
        }

        async fn generate_shopping_list(
            &self,
            request: &ShoppingRequest,
        ) -> Result<Vec<GroceryItem>, KitchenError> {
            self.shop_calls.lock().unwrap().push(request.clone());
            self.groceries
                .clone()
                .ok_or_else(|| KitchenError::Transport("connection refused".into()))
        }
    }

    /// Recognizer that always fails the way a real perception backend can
    struct FailingRecognizer(KitchenError);

    #[async_trait]
    impl IngredientRecognizer for FailingRecognizer {
        async fn recognize(&self, _image: &CapturedImage) -> Result<Vec<InventoryItem>, KitchenError> {
            Err(self.0.clone())
        }
    }

    fn simulator() -> ScanSimulator {
        ScanSimulator::new(Duration::from_secs(2))
    }

    fn recipe(title: &str) -> Recipe {
        serde_json::from_value(serde_json::json!({
            "id": title, "type": "Dinner", "title": title, "calories": 600,
            "macros": { "p": 30, "c": 50, "f": 20 }, "instructions": ["Cook it"]
        }))
        .unwrap()
    }

    fn grocery(name: &str) -> GroceryItem {
        serde_json::from_value(serde_json::json!({
            "name": name, "amount": "1 kg", "nutrition": "Protein",
            "substitute": "Tempeh", "why": "Builds muscle"
        }))
        .unwrap()
    }

    fn onboard<B, R>(session: &mut KitchenSession<B, R>)
    where
        B: KitchenBackend + 'static,
        R: IngredientRecognizer + 'static,
    {
        session.dispatch(Action::Start).unwrap();
        session.dispatch(Action::SetName("Sam".into())).unwrap();
        session.dispatch(Action::SubmitName).unwrap();
        session.dispatch(Action::ChooseGoal(Goal::Muscle)).unwrap();
        session.dispatch(Action::ChooseDiet(Diet::Vegetarian)).unwrap();
        session.dispatch(Action::ChooseVibe(CookingVibe::Therapy)).unwrap();
    }

    fn open_camera<B, R>(session: &mut KitchenSession<B, R>)
    where
        B: KitchenBackend + 'static,
        R: IngredientRecognizer + 'static,
    {
        session.dispatch(Action::OpenScanner).unwrap();
        session.dispatch(Action::CameraPermission(true)).unwrap();
        session
            .dispatch(Action::CaptureScan(CapturedImage::new(vec![0xFF, 0xD8])))
            .unwrap();
    }

    #[tokio::test]
    async fn test_empty_fridge_plan_flow() {
        let backend = FakeBackend {
            groceries: Some(vec![grocery("Tofu"), grocery("Lentils")]),
            ..Default::default()
        };
        let mut session = KitchenSession::new(backend, simulator());
        onboard(&mut session);

        session.dispatch(Action::ChooseKitchen(KitchenStatus::Empty)).unwrap();
        session.dispatch(Action::DecrementDays).unwrap();
        session.dispatch(Action::GeneratePlan).unwrap();

        assert!(session.state().loading);
        assert_eq!(session.state().step, Step::ShoppingConfig);
        assert_eq!(session.in_flight(), 1);

        session.settle().await;

        let state = session.state();
        assert_eq!(state.step, Step::Dashboard);
        assert_eq!(state.active_tab, DashboardTab::Grocery);
        assert_eq!(state.grocery.len(), 2);
        assert!(!state.loading);
        assert_eq!(session.in_flight(), 0);

        let calls = session.backend.shop_calls.lock().unwrap();
        assert_eq!(
            calls.as_slice(),
            &[ShoppingRequest {
                days: 2,
                goal: "Muscle".into(),
                diet: "Vegetarian".into(),
                vibe: CookingVibe::Therapy,
            }]
        );
    }

    #[tokio::test]
    async fn test_plan_failure_alerts_and_stays() {
        let mut session = KitchenSession::new(FakeBackend::default(), simulator());
        onboard(&mut session);
        session.dispatch(Action::ChooseKitchen(KitchenStatus::Empty)).unwrap();
        session.take_notices();

        session.dispatch(Action::GeneratePlan).unwrap();
        session.settle().await;

        assert_eq!(session.state().step, Step::ShoppingConfig);
        assert!(!session.state().loading);
        assert_eq!(
            session.take_notices(),
            vec![Notice::alert("Connection Error", "Check your tunnel URL.")]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stocked_fridge_scan_flow() {
        let mut session = KitchenSession::new(FakeBackend::default(), simulator());
        onboard(&mut session);

        session.dispatch(Action::ChooseKitchen(KitchenStatus::Stocked)).unwrap();
        open_camera(&mut session);
        assert!(session.state().scanner.analyzing);
        assert_eq!(session.state().step, Step::KitchenChoice);

        session.settle().await;

        let state = session.state();
        assert_eq!(state.step, Step::Dashboard);
        assert_eq!(state.active_tab, DashboardTab::Inventory);
        assert_eq!(state.inventory.names(), vec!["Avocados", "Sourdough", "Eggs"]);
        assert!(!state.scanner.visible);

        let notices = session.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].title, "Scan Complete");
    }

    #[tokio::test(start_paused = true)]
    async fn test_input_handled_while_scan_in_flight() {
        let mut session = KitchenSession::new(FakeBackend::default(), simulator());
        onboard(&mut session);
        session.dispatch(Action::ChooseKitchen(KitchenStatus::Stocked)).unwrap();
        open_camera(&mut session);

        // User closes the modal and backs out before the scan resolves
        session.dispatch(Action::CloseScanner).unwrap();
        session.dispatch(Action::Back).unwrap();
        assert_eq!(session.state().step, Step::AskKitchen);
        assert_eq!(session.in_flight(), 1);

        let completion = session.next_completion().await;
        assert!(matches!(completion, Action::ScanCompleted(Ok(_))));
        session.dispatch(completion).unwrap();

        let state = session.state();
        assert_eq!(state.step, Step::Dashboard);
        assert_eq!(state.active_tab, DashboardTab::Inventory);
        assert_eq!(state.inventory.len(), 3);
    }

    #[tokio::test]
    async fn test_recognizer_failures_alert_and_keep_modal() {
        for error in [
            KitchenError::ScanFailed("lens covered".into()),
            KitchenError::NoFoodDetected,
        ] {
            let expected = Notice::alert("Scan Failed", error.to_string());
            let mut session = KitchenSession::new(FakeBackend::default(), FailingRecognizer(error));
            onboard(&mut session);
            session.dispatch(Action::ChooseKitchen(KitchenStatus::Stocked)).unwrap();
            open_camera(&mut session);

            session.settle().await;

            let state = session.state();
            assert_eq!(state.step, Step::KitchenChoice);
            assert!(state.scanner.visible);
            assert!(!state.scanner.analyzing);
            assert!(state.inventory.is_empty());
            assert_eq!(session.take_notices(), vec![expected]);
        }
    }

    #[tokio::test]
    async fn test_recipes_without_inventory_never_calls_backend() {
        let backend = FakeBackend {
            recipes: Some(vec![recipe("Stew")]),
            ..Default::default()
        };
        let mut session = KitchenSession::new(backend, simulator());
        onboard(&mut session);
        session.dispatch(Action::ChooseKitchen(KitchenStatus::Stocked)).unwrap();
        session.dispatch(Action::ManualLog).unwrap();

        session.dispatch(Action::GenerateRecipes).unwrap();
        session.settle().await;

        assert_eq!(session.in_flight(), 0);
        assert!(session.backend.recipe_calls.lock().unwrap().is_empty());
        assert!(session.state().recipes.is_empty());
        let titles: Vec<_> = session.take_notices().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["Manual Mode", "Empty Kitchen"]);
    }

    #[tokio::test]
    async fn test_manual_log_then_recipes() {
        let backend = FakeBackend {
            recipes: Some(vec![recipe("Stew"), recipe("Curry")]),
            ..Default::default()
        };
        let mut session = KitchenSession::new(backend, simulator());
        onboard(&mut session);
        session.dispatch(Action::ChooseKitchen(KitchenStatus::Stocked)).unwrap();
        session.dispatch(Action::ManualLog).unwrap();
        session.dispatch(Action::AddInventoryItem("Chickpeas".into())).unwrap();

        session.dispatch(Action::GenerateRecipes).unwrap();
        assert!(session.state().loading);
        session.settle().await;

        let titles: Vec<_> = session.state().recipes.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Stew", "Curry"]);
        assert!(!session.state().loading);
        assert_eq!(
            session.backend.recipe_calls.lock().unwrap()[0].ingredients,
            vec!["Chickpeas".to_string()]
        );
    }

    #[tokio::test]
    async fn test_invalid_recipe_payload_keeps_list() {
        let mut state = KitchenState::new();
        state.step = Step::Dashboard;
        state.recipes = vec![recipe("Old")];
        state.inventory.add("Rice");
        let mut session = KitchenSession::with_state(state, FakeBackend::default(), simulator());

        session.dispatch(Action::GenerateRecipes).unwrap();
        session.settle().await;

        assert_eq!(session.state().recipes, vec![recipe("Old")]);
        assert_eq!(
            session.take_notices(),
            vec![Notice::alert("Connection Error", "Is the backend running?")]
        );
    }

    #[tokio::test]
    async fn test_rejected_action_surfaces_error() {
        let mut session = KitchenSession::new(FakeBackend::default(), simulator());
        let err = session.dispatch(Action::GeneratePlan).unwrap_err();
        assert!(matches!(err, KitchenError::UnexpectedAction { step: Step::Welcome, .. }));
        assert_eq!(session.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_relayout_counted_per_step_change() {
        let mut session = KitchenSession::new(FakeBackend::default(), simulator());
        onboard(&mut session);
        // Welcome → AskName → AskGoal → AskDiet → AskVibe → AskKitchen
        assert_eq!(session.relayouts(), 5);
    }
}
