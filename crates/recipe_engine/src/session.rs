use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use engine_logging::{engine_debug, ErrorReporter};
use recipe_core::{Completion, IngredientSession, Recipe, SubmitError};
use thiserror::Error;
use tokio::sync::watch;

use crate::ApiError;

/// Reporter context for failed recipe fetches.
pub const FETCH_CONTEXT: &str = "recipe fetch";

/// What a re-render needs from the session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    pub ingredients: Vec<String>,
    pub recipes: Vec<Recipe>,
    pub is_loading: bool,
}

impl SessionSnapshot {
    fn of(session: &IngredientSession) -> Self {
        Self {
            ingredients: session.ingredients().to_vec(),
            recipes: session.recipes().to_vec(),
            is_loading: session.is_loading(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Rejected(#[from] SubmitError),
    #[error("recipe fetch failed: {0}")]
    Fetch(#[from] ApiError),
    #[error("session was reset while recipes were being fetched")]
    Superseded,
}

/// Ingredient session shared between a front-end and async submissions.
///
/// Every change is published to [`SessionStore::subscribe`] receivers.
pub struct SessionStore {
    session: Mutex<IngredientSession>,
    changes: watch::Sender<SessionSnapshot>,
    reporter: Arc<dyn ErrorReporter>,
}

impl SessionStore {
    pub fn new(reporter: Arc<dyn ErrorReporter>) -> Self {
        let (changes, _) = watch::channel(SessionSnapshot::default());
        Self {
            session: Mutex::new(IngredientSession::new()),
            changes,
            reporter,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.changes.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.changes.borrow().clone()
    }

    pub fn add(&self, text: &str) -> bool {
        self.mutate(|session| session.add(text))
    }

    pub fn remove_at(&self, index: usize) -> Option<String> {
        self.mutate(|session| session.remove_at(index))
    }

    pub fn clear(&self) {
        self.mutate(IngredientSession::clear);
    }

    pub fn reset(&self) {
        self.mutate(IngredientSession::reset);
    }

    /// Hands the current ingredients to `fetch` and stores what it returns.
    ///
    /// Fails before calling `fetch` when there is nothing to submit or a
    /// submission is already running. Fetch errors are reported and returned.
    pub async fn submit<F, Fut>(&self, fetch: F) -> Result<Vec<Recipe>, SessionError>
    where
        F: FnOnce(Vec<String>) -> Fut,
        Fut: Future<Output = Result<Vec<Recipe>, ApiError>>,
    {
        let ticket = self.mutate(IngredientSession::begin_submit)?;
        engine_debug!(
            "submitting {} ingredient(s), generation {}",
            ticket.ingredients.len(),
            ticket.generation
        );

        let result = fetch(ticket.ingredients).await;
        if let Err(err) = &result {
            self.reporter.report(FETCH_CONTEXT, &err.to_string());
        }

        let completion =
            self.mutate(|session| session.complete_submit(ticket.generation, result.clone()));
        match completion {
            Completion::Stale => Err(SessionError::Superseded),
            Completion::Applied | Completion::Failed => result.map_err(SessionError::from),
        }
    }

    fn mutate<T>(&self, f: impl FnOnce(&mut IngredientSession) -> T) -> T {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        let out = f(&mut session);
        let next = SessionSnapshot::of(&session);
        self.changes.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
        out
    }
}
