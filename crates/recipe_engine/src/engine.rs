use std::sync::{mpsc, Arc};
use std::thread;

use engine_logging::{engine_debug, engine_error, engine_info, ErrorReporter};
use recipe_core::Generation;
use tokio::sync::mpsc as command_channel;
use tokio_util::sync::CancellationToken;

use crate::{
    ApiError, ApiProbe, ApiSettings, EngineEvent, PollHandle, PollSettings, ReadinessPoller,
    RecipeApi, ReqwestRecipeApi, FETCH_CONTEXT,
};

const SEARCH_CONTEXT: &str = "food search";

/// Receives engine events on the runtime thread.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

enum EngineCommand {
    StartHealthPoll,
    FetchRecipes {
        generation: Generation,
        ingredients: Vec<String>,
    },
    CancelFetch {
        generation: Generation,
    },
    SearchFoods {
        query: String,
    },
}

/// Runs API work on a single-threaded runtime owned by a background thread.
///
/// Dropping the handle stops the runtime and cancels outstanding work.
pub struct EngineHandle {
    cmd_tx: command_channel::UnboundedSender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(
        settings: ApiSettings,
        reporter: Arc<dyn ErrorReporter>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, ApiError> {
        let poll = settings.poll_settings();
        let api = Arc::new(ReqwestRecipeApi::new(settings)?);
        Ok(Self::with_api(api, poll, reporter, sink))
    }

    pub fn with_api(
        api: Arc<dyn RecipeApi>,
        poll: PollSettings,
        reporter: Arc<dyn ErrorReporter>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = command_channel::unbounded_channel();
        let worker = Worker {
            api,
            poll,
            reporter,
            sink,
            health_poll: None,
            fetch: None,
        };

        thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    engine_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            runtime.block_on(worker.run(cmd_rx));
        });

        Self { cmd_tx }
    }

    pub fn start_health_poll(&self) {
        self.send(EngineCommand::StartHealthPoll);
    }

    pub fn fetch_recipes(&self, generation: Generation, ingredients: Vec<String>) {
        self.send(EngineCommand::FetchRecipes {
            generation,
            ingredients,
        });
    }

    pub fn cancel_fetch(&self, generation: Generation) {
        self.send(EngineCommand::CancelFetch { generation });
    }

    pub fn search_foods(&self, query: impl Into<String>) {
        self.send(EngineCommand::SearchFoods {
            query: query.into(),
        });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            engine_error!("Engine runtime is gone; command dropped");
        }
    }
}

struct Worker {
    api: Arc<dyn RecipeApi>,
    poll: PollSettings,
    reporter: Arc<dyn ErrorReporter>,
    sink: Arc<dyn EventSink>,
    health_poll: Option<PollHandle>,
    fetch: Option<(Generation, CancellationToken)>,
}

impl Worker {
    async fn run(mut self, mut cmd_rx: command_channel::UnboundedReceiver<EngineCommand>) {
        while let Some(command) = cmd_rx.recv().await {
            self.handle(command);
        }
        engine_debug!("Engine command channel closed; shutting down");
        if let Some((_, token)) = self.fetch.take() {
            token.cancel();
        }
        // Dropping the poll handle cancels the poll.
        self.health_poll = None;
    }

    fn handle(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::StartHealthPoll => self.start_health_poll(),
            EngineCommand::FetchRecipes {
                generation,
                ingredients,
            } => self.fetch_recipes(generation, ingredients),
            EngineCommand::CancelFetch { generation } => {
                if matches!(&self.fetch, Some((current, _)) if *current == generation) {
                    if let Some((_, token)) = self.fetch.take() {
                        engine_info!("Cancelling recipe fetch {}", generation);
                        token.cancel();
                    }
                }
            }
            EngineCommand::SearchFoods { query } => self.search_foods(query),
        }
    }

    fn start_health_poll(&mut self) {
        if self.health_poll.is_some() {
            engine_debug!("Health poll already running");
            return;
        }
        let probe = Arc::new(ApiProbe::new(self.api.clone()));
        let handle = ReadinessPoller::start(probe, self.poll, self.reporter.clone());
        let mut state_rx = handle.subscribe();
        let sink = self.sink.clone();
        tokio::spawn(async move {
            loop {
                let state = state_rx.borrow_and_update().clone();
                let terminal = state.is_terminal();
                sink.emit(EngineEvent::Readiness(state));
                if terminal || state_rx.changed().await.is_err() {
                    break;
                }
            }
        });
        self.health_poll = Some(handle);
    }

    fn fetch_recipes(&mut self, generation: Generation, ingredients: Vec<String>) {
        let token = CancellationToken::new();
        if let Some((previous, old)) = self.fetch.replace((generation, token.clone())) {
            engine_debug!("Fetch {} superseded by {}", previous, generation);
            old.cancel();
        }

        let api = self.api.clone();
        let sink = self.sink.clone();
        let reporter = self.reporter.clone();
        tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    engine_debug!("Fetch {} cancelled", generation);
                    return;
                }
                result = api.generate_recipes(&ingredients) => result,
            };
            match &result {
                Ok(recipes) => engine_info!(
                    "Fetch {} returned {} recipe(s)",
                    generation,
                    recipes.len()
                ),
                Err(err) => reporter.report(FETCH_CONTEXT, &err.to_string()),
            }
            sink.emit(EngineEvent::RecipesFetched { generation, result });
        });
    }

    fn search_foods(&self, query: String) {
        let api = self.api.clone();
        let sink = self.sink.clone();
        let reporter = self.reporter.clone();
        tokio::spawn(async move {
            let result = api.search_foods(&query).await;
            if let Err(err) = &result {
                reporter.report(SEARCH_CONTEXT, &err.to_string());
            }
            sink.emit(EngineEvent::FoodsFound { query, result });
        });
    }
}
