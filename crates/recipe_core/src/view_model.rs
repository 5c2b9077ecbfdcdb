use crate::{ReadinessState, Recipe};

/// The submit action is offered once this many ingredients are listed.
pub const MIN_INGREDIENTS_FOR_SUBMIT: usize = 3;

/// User-facing strings.
pub mod messages {
    pub const API_STARTUP: &str = "Waking up the robots...";
    pub const THINKING: &str = "Robots are thinking real hard...";
    pub const API_FAILED: &str = "The robots could not be roused :(";
    pub const API_FAILED_SUBTITLE: &str = "Please try again later.";
    pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";
    pub const EMPTY_SUBMISSION: &str = "Add at least one ingredient first.";
    pub const RECIPES_TITLE: &str = "How about some:";
    pub const INPUT_PLACEHOLDER: &str = "What do you got on hand?";
    pub const INPUT_PLACEHOLDER_MORE: &str = "Anything else?";
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub readiness: ReadinessState,
    pub status_lines: Vec<String>,
    pub input: String,
    pub placeholder: String,
    pub ingredients: Vec<String>,
    pub show_submit: bool,
    pub is_loading: bool,
    pub recipes: Vec<RecipeView>,
    pub notice: Option<String>,
    pub suggestions: Vec<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeView {
    /// 1-based position in the rendered list.
    pub number: usize,
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
}

impl RecipeView {
    pub fn new(number: usize, recipe: &Recipe) -> Self {
        Self {
            number,
            title: recipe.name.clone(),
            ingredients: recipe.ingredients.clone(),
            instructions: recipe.instructions.clone(),
        }
    }
}
