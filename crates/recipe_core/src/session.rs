use thiserror::Error;

use crate::{IngredientList, Recipe};

/// Identifies one submission; completions carrying an older value are stale.
pub type Generation = u64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("no ingredients provided")]
    EmptyIngredients,
    #[error("a recipe request is already in flight")]
    AlreadyLoading,
}

/// Issued by [`IngredientSession::begin_submit`]; hand it to the fetch and
/// return its generation with the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTicket {
    pub generation: Generation,
    pub ingredients: Vec<String>,
}

/// What [`IngredientSession::complete_submit`] did with a fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Recipes replaced with the fetched list.
    Applied,
    /// Fetch failed; loading cleared, recipes untouched.
    Failed,
    /// The submission was reset or superseded; nothing changed.
    Stale,
}

/// Ingredient list plus the recipes of the current submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IngredientSession {
    ingredients: IngredientList,
    recipes: Vec<Recipe>,
    generation: Generation,
    in_flight: Option<Generation>,
}

impl IngredientSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, text: &str) -> bool {
        self.ingredients.add(text)
    }

    pub fn remove_at(&mut self, index: usize) -> Option<String> {
        self.ingredients.remove_at(index)
    }

    pub fn clear(&mut self) {
        self.ingredients.clear();
    }

    pub fn ingredients(&self) -> &IngredientList {
        &self.ingredients
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<Generation> {
        self.in_flight
    }

    /// Marks a submission as started and clears the previous recipes.
    pub fn begin_submit(&mut self) -> Result<SubmitTicket, SubmitError> {
        if self.ingredients.is_empty() {
            return Err(SubmitError::EmptyIngredients);
        }
        if self.is_loading() {
            return Err(SubmitError::AlreadyLoading);
        }
        self.generation += 1;
        self.in_flight = Some(self.generation);
        self.recipes.clear();
        Ok(SubmitTicket {
            generation: self.generation,
            ingredients: self.ingredients.to_vec(),
        })
    }

    pub fn complete_submit<E>(
        &mut self,
        generation: Generation,
        result: Result<Vec<Recipe>, E>,
    ) -> Completion {
        if self.in_flight != Some(generation) {
            return Completion::Stale;
        }
        self.in_flight = None;
        match result {
            Ok(recipes) => {
                self.recipes = recipes;
                Completion::Applied
            }
            Err(_) => Completion::Failed,
        }
    }

    /// Clears everything, including an in-flight submission.
    pub fn reset(&mut self) {
        self.ingredients.clear();
        self.recipes.clear();
        self.in_flight = None;
        self.generation += 1;
    }
}
