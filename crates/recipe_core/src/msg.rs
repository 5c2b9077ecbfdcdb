use crate::{Food, Generation, ReadinessState, Recipe};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Front-end finished setting up; kicks off the health poll.
    Started,
    /// Health poll reported a new readiness state.
    ReadinessChanged(ReadinessState),
    /// User edited the ingredient input line.
    InputChanged(String),
    /// User confirmed the current input as an ingredient.
    IngredientSubmitted,
    /// User removed the ingredient at `index` (0-based, as rendered).
    IngredientRemoved { index: usize },
    /// User cleared the ingredient list.
    IngredientsCleared,
    /// User asked for recipes.
    SubmitClicked,
    /// User clicked "Try Again": clear ingredients and recipes.
    ResetClicked,
    /// Engine returned recipes for a submission.
    RecipesLoaded {
        generation: Generation,
        recipes: Vec<Recipe>,
    },
    /// Engine failed to fetch recipes for a submission.
    RecipesFailed {
        generation: Generation,
        message: String,
    },
    /// User asked for ingredient suggestions.
    SearchRequested(String),
    /// Engine returned suggestions for `query`.
    SearchResults { query: String, foods: Vec<Food> },
    /// Render tick.
    Tick,
    NoOp,
}
