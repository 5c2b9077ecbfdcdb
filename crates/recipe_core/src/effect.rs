use crate::Generation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartHealthPoll,
    FetchRecipes {
        generation: Generation,
        ingredients: Vec<String>,
    },
    CancelFetch { generation: Generation },
    SearchFoods { query: String },
}
