#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub name: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
}

/// Ingredient suggestion returned by the food search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Food {
    pub id: i64,
    pub name: String,
}
