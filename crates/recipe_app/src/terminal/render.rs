use std::fmt::Write;

use recipe_core::{messages, AppViewModel, ReadinessState, RecipeView};

/// Ticks between progress dots while waiting on the API.
const TICKS_PER_DOT: u32 = 4;

/// Turns view models into terminal text.
#[derive(Debug, Default)]
pub struct Screen {
    ticks: u32,
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draw(&mut self, view: &AppViewModel) -> String {
        self.ticks = 0;
        render(view)
    }

    /// A progress dot every few ticks while something is pending.
    pub fn tick(&mut self, view: &AppViewModel) -> Option<&'static str> {
        let waiting = view.is_loading || view.readiness == ReadinessState::Loading;
        if !waiting {
            self.ticks = 0;
            return None;
        }
        self.ticks += 1;
        (self.ticks % TICKS_PER_DOT == 0).then_some(".")
    }
}

pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();
    for line in &view.status_lines {
        let _ = writeln!(out, "{line}");
    }
    if !view.readiness.is_ready() {
        return out;
    }

    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "! {notice}");
    }

    if view.ingredients.is_empty() {
        let _ = writeln!(out, "Ingredients: (none yet)");
    } else {
        let listed: Vec<String> = view
            .ingredients
            .iter()
            .enumerate()
            .map(|(i, name)| format!("{}) {}", i + 1, name))
            .collect();
        let _ = writeln!(out, "Ingredients: {}", listed.join("  "));
    }

    if !view.suggestions.is_empty() {
        let _ = writeln!(out, "Suggestions: {}", view.suggestions.join(", "));
    }

    if !view.is_loading && !view.recipes.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", messages::RECIPES_TITLE);
        for recipe in &view.recipes {
            out.push_str(&render_recipe(recipe));
        }
        let _ = writeln!(out, "(:reset to try again)");
    }

    if !view.is_loading {
        let hint = if view.show_submit { "  (:go to send it)" } else { "" };
        let _ = writeln!(out, "{}{}", view.placeholder, hint);
    }
    out
}

pub fn render_recipe(recipe: &RecipeView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}. {}", recipe.number, recipe.title);
    for ingredient in &recipe.ingredients {
        let _ = writeln!(out, "   - {ingredient}");
    }
    let _ = writeln!(out, "   {}", recipe.instructions);
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use recipe_core::{update, AppState, Msg, Recipe};

    use super::*;

    fn ready_with(ingredients: &[&str]) -> AppState {
        let (mut state, _) = update(
            AppState::new(),
            Msg::ReadinessChanged(ReadinessState::Ready),
        );
        for name in ingredients {
            let (next, _) = update(state, Msg::InputChanged(name.to_string()));
            let (next, _) = update(next, Msg::IngredientSubmitted);
            state = next;
        }
        state
    }

    #[test]
    fn loading_shows_only_status() {
        let view = AppState::new().view();
        assert_eq!(render(&view), format!("{}\n", messages::API_STARTUP));
    }

    #[test]
    fn ready_lists_ingredients_and_submit_hint() {
        let view = ready_with(&["egg", "milk", "flour"]).view();
        assert_eq!(
            render(&view),
            "Ingredients: 1) egg  2) milk  3) flour\nAnything else?  (:go to send it)\n"
        );
    }

    #[test]
    fn recipes_are_numbered() {
        let state = ready_with(&["egg"]);
        let (state, _) = update(state, Msg::SubmitClicked);
        let (state, _) = update(
            state,
            Msg::RecipesLoaded {
                generation: 1,
                recipes: vec![Recipe {
                    name: "Omelette".to_string(),
                    ingredients: vec!["egg".to_string()],
                    instructions: "Mix and cook.".to_string(),
                }],
            },
        );
        let text = render(&state.view());
        assert!(text.contains("How about some:\n1. Omelette\n   - egg\n   Mix and cook.\n"));
    }

    #[test]
    fn dots_only_while_waiting() {
        let mut screen = Screen::new();
        let waiting = AppState::new().view();
        let dots: Vec<_> = (0..8).filter_map(|_| screen.tick(&waiting)).collect();
        assert_eq!(dots.len(), 2);

        let idle = ready_with(&[]).view();
        assert_eq!(screen.tick(&idle), None);
    }
}
