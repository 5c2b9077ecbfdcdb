use crate::view_model::{messages, AppViewModel, RecipeView, MIN_INGREDIENTS_FOR_SUBMIT};
use crate::{
    Completion, Food, Generation, IngredientSession, ReadinessState, Recipe, SubmitError,
    SubmitTicket,
};

/// Shortest trimmed query sent to the food search.
pub const MIN_SEARCH_CHARS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    readiness: ReadinessState,
    poll_started: bool,
    session: IngredientSession,
    input: String,
    notice: Option<String>,
    pending_search: Option<String>,
    suggestions: Vec<Food>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn readiness(&self) -> &ReadinessState {
        &self.readiness
    }

    pub fn session(&self) -> &IngredientSession {
        &self.session
    }

    pub fn view(&self) -> AppViewModel {
        let ingredient_count = self.session.ingredients().len();
        let is_loading = self.session.is_loading();
        let status_lines = match &self.readiness {
            ReadinessState::Loading => vec![messages::API_STARTUP.to_string()],
            ReadinessState::Failed { .. } => vec![
                messages::API_FAILED.to_string(),
                messages::API_FAILED_SUBTITLE.to_string(),
            ],
            ReadinessState::Ready if is_loading => vec![messages::THINKING.to_string()],
            ReadinessState::Ready => Vec::new(),
        };
        let placeholder = if ingredient_count >= MIN_INGREDIENTS_FOR_SUBMIT {
            messages::INPUT_PLACEHOLDER_MORE
        } else {
            messages::INPUT_PLACEHOLDER
        };

        AppViewModel {
            readiness: self.readiness.clone(),
            status_lines,
            input: self.input.clone(),
            placeholder: placeholder.to_string(),
            ingredients: self.session.ingredients().to_vec(),
            show_submit: self.readiness.is_ready()
                && !is_loading
                && ingredient_count >= MIN_INGREDIENTS_FOR_SUBMIT,
            is_loading,
            recipes: self
                .session
                .recipes()
                .iter()
                .enumerate()
                .map(|(i, recipe)| RecipeView::new(i + 1, recipe))
                .collect(),
            notice: self.notice.clone(),
            suggestions: self.suggestions.iter().map(|food| food.name.clone()).collect(),
            dirty: self.dirty,
        }
    }

    /// Returns whether a re-render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn begin_polling(&mut self) -> bool {
        if self.poll_started {
            return false;
        }
        self.poll_started = true;
        true
    }

    pub(crate) fn set_readiness(&mut self, readiness: ReadinessState) {
        // Terminal states are final; late reports from a stale poll are dropped.
        if self.readiness.is_terminal() || self.readiness == readiness {
            return;
        }
        self.readiness = readiness;
        self.mark_dirty();
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input != text {
            self.input = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn commit_input(&mut self) {
        let input = std::mem::take(&mut self.input);
        if input.is_empty() {
            return;
        }
        if self.session.add(&input) {
            self.notice = None;
            self.suggestions.clear();
        }
        self.mark_dirty();
    }

    pub(crate) fn remove_ingredient(&mut self, index: usize) {
        if self.session.remove_at(index).is_some() {
            self.mark_dirty();
        }
    }

    pub(crate) fn clear_ingredients(&mut self) {
        if !self.session.ingredients().is_empty() {
            self.session.clear();
            self.mark_dirty();
        }
    }

    pub(crate) fn begin_submit(&mut self) -> Result<SubmitTicket, SubmitError> {
        let result = self.session.begin_submit();
        match &result {
            Ok(_) => self.notice = None,
            Err(SubmitError::EmptyIngredients) => {
                self.notice = Some(messages::EMPTY_SUBMISSION.to_string());
            }
            Err(SubmitError::AlreadyLoading) => return result,
        }
        self.mark_dirty();
        result
    }

    pub(crate) fn complete_submit(
        &mut self,
        generation: Generation,
        result: Result<Vec<Recipe>, String>,
    ) -> Completion {
        let completion = self.session.complete_submit(generation, result);
        match completion {
            Completion::Applied => self.mark_dirty(),
            Completion::Failed => {
                self.notice = Some(messages::GENERIC_FAILURE.to_string());
                self.mark_dirty();
            }
            Completion::Stale => {}
        }
        completion
    }

    /// Returns the generation that was in flight, if any.
    pub(crate) fn reset_session(&mut self) -> Option<Generation> {
        let in_flight = self.session.in_flight();
        self.session.reset();
        self.input.clear();
        self.notice = None;
        self.suggestions.clear();
        self.pending_search = None;
        self.mark_dirty();
        in_flight
    }

    pub(crate) fn set_pending_search(&mut self, query: &str) {
        self.pending_search = Some(query.to_string());
    }

    pub(crate) fn apply_search_results(&mut self, query: &str, foods: Vec<Food>) {
        if self.pending_search.as_deref() != Some(query) {
            return;
        }
        self.pending_search = None;
        self.suggestions = foods;
        self.mark_dirty();
    }
}
