use crate::{AppState, Effect, Msg, SubmitError, MIN_SEARCH_CHARS};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => {
            if state.begin_polling() {
                vec![Effect::StartHealthPoll]
            } else {
                Vec::new()
            }
        }
        Msg::ReadinessChanged(readiness) => {
            state.set_readiness(readiness);
            Vec::new()
        }
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        // Ingredient edits and submissions wait for the API to come up.
        Msg::IngredientSubmitted
        | Msg::IngredientRemoved { .. }
        | Msg::IngredientsCleared
        | Msg::SubmitClicked
        | Msg::SearchRequested(_)
            if !state.readiness().is_ready() =>
        {
            Vec::new()
        }
        Msg::IngredientSubmitted => {
            state.commit_input();
            Vec::new()
        }
        Msg::IngredientRemoved { index } => {
            state.remove_ingredient(index);
            Vec::new()
        }
        Msg::IngredientsCleared => {
            state.clear_ingredients();
            Vec::new()
        }
        Msg::SubmitClicked => match state.begin_submit() {
            Ok(ticket) => vec![Effect::FetchRecipes {
                generation: ticket.generation,
                ingredients: ticket.ingredients,
            }],
            Err(SubmitError::EmptyIngredients | SubmitError::AlreadyLoading) => Vec::new(),
        },
        Msg::ResetClicked => match state.reset_session() {
            Some(generation) => vec![Effect::CancelFetch { generation }],
            None => Vec::new(),
        },
        Msg::RecipesLoaded {
            generation,
            recipes,
        } => {
            state.complete_submit(generation, Ok(recipes));
            Vec::new()
        }
        Msg::RecipesFailed {
            generation,
            message,
        } => {
            state.complete_submit(generation, Err(message));
            Vec::new()
        }
        Msg::SearchRequested(raw) => {
            let query = raw.trim();
            if query.chars().count() < MIN_SEARCH_CHARS {
                return (state, Vec::new());
            }
            state.set_pending_search(query);
            vec![Effect::SearchFoods {
                query: query.to_string(),
            }]
        }
        Msg::SearchResults { query, foods } => {
            state.apply_search_results(&query, foods);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
