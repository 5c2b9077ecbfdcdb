/// Longest accepted ingredient, in characters after trimming.
pub const MAX_INGREDIENT_CHARS: usize = 100;

/// Ordered, de-duplicated list of ingredient names in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IngredientList {
    items: Vec<String>,
}

impl IngredientList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the trimmed `text` unless it is empty, too long or already present.
    ///
    /// Returns whether the list changed. Rejections are silent; the caller
    /// decides whether to surface them.
    pub fn add(&mut self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.chars().count() > MAX_INGREDIENT_CHARS {
            return false;
        }
        if self.contains(trimmed) {
            return false;
        }
        self.items.push(trimmed.to_owned());
        true
    }

    pub fn remove_at(&mut self, index: usize) -> Option<String> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|item| item == name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.items.clone()
    }
}
