//! Recipe core: pure session state, readiness tracking and the UI state machine.
mod effect;
mod ingredients;
mod msg;
mod readiness;
mod recipe;
mod session;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use ingredients::{IngredientList, MAX_INGREDIENT_CHARS};
pub use msg::Msg;
pub use readiness::{ReadinessState, TIMEOUT_REASON};
pub use recipe::{Food, Recipe};
pub use session::{Completion, Generation, IngredientSession, SubmitError, SubmitTicket};
pub use state::{AppState, MIN_SEARCH_CHARS};
pub use update::update;
pub use view_model::{messages, AppViewModel, RecipeView, MIN_INGREDIENTS_FOR_SUBMIT};
