use std::sync::Arc;

use engine_logging::engine_debug;
use recipe_core::{Food, Recipe, MIN_SEARCH_CHARS};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::poller::HealthProbe;
use crate::{ApiError, ApiErrorKind, ApiSettings};

const HEALTH_PATH: &str = "/health";
const FOODS_PATH: &str = "/api/v1/foods";

/// Client surface of the recipe-generation API.
#[async_trait::async_trait]
pub trait RecipeApi: Send + Sync {
    /// `Ok(true)` only when the health endpoint answers 200.
    async fn check_health(&self) -> Result<bool, ApiError>;

    async fn generate_recipes(&self, ingredients: &[String]) -> Result<Vec<Recipe>, ApiError>;

    async fn search_foods(&self, query: &str) -> Result<Vec<Food>, ApiError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    ingredients: &'a [String],
    max_recipes: u32,
    cuisine_style: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    recipes: Vec<RecipeBody>,
}

#[derive(Debug, Deserialize)]
struct RecipeBody {
    recipe_name: String,
    ingredients: Vec<String>,
    instructions: String,
}

impl From<RecipeBody> for Recipe {
    fn from(body: RecipeBody) -> Self {
        Recipe {
            name: body.recipe_name,
            ingredients: body.ingredients,
            instructions: body.instructions,
        }
    }
}

#[derive(Debug, Deserialize)]
struct FoodBody {
    id: i64,
    name: String,
}

#[derive(Debug, Clone)]
pub struct ReqwestRecipeApi {
    client: reqwest::Client,
    settings: ApiSettings,
}

impl ReqwestRecipeApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(ApiErrorKind::Network, err.to_string()))?;
        Ok(Self { client, settings })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let raw = format!("{}{}", self.settings.base_url, path);
        Url::parse(&raw).map_err(|err| ApiError::new(ApiErrorKind::InvalidUrl, err.to_string()))
    }
}

#[async_trait::async_trait]
impl RecipeApi for ReqwestRecipeApi {
    async fn check_health(&self) -> Result<bool, ApiError> {
        let url = self.endpoint(HEALTH_PATH)?;
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        engine_debug!("health check answered {}", status);
        Ok(status == StatusCode::OK)
    }

    async fn generate_recipes(&self, ingredients: &[String]) -> Result<Vec<Recipe>, ApiError> {
        let url = self.endpoint(self.settings.routes.generate_path())?;
        let body = GenerateRequest {
            ingredients,
            max_recipes: self.settings.max_recipes,
            cuisine_style: &self.settings.cuisine_style,
        };

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                ApiErrorKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let parsed: GenerateResponse = response.json().await.map_err(map_reqwest_error)?;
        Ok(parsed.recipes.into_iter().map(Recipe::from).collect())
    }

    async fn search_foods(&self, query: &str) -> Result<Vec<Food>, ApiError> {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_CHARS {
            return Err(ApiError::new(
                ApiErrorKind::QueryTooShort {
                    min_chars: MIN_SEARCH_CHARS,
                },
                "search query too short",
            ));
        }
        let mut url = self.endpoint(FOODS_PATH)?;
        url.query_pairs_mut().append_pair("q", query);

        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                ApiErrorKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let foods: Vec<FoodBody> = response.json().await.map_err(map_reqwest_error)?;
        Ok(foods
            .into_iter()
            .map(|food| Food {
                id: food.id,
                name: food.name,
            })
            .collect())
    }
}

/// Adapts a [`RecipeApi`] health check into a poller probe.
pub struct ApiProbe {
    api: Arc<dyn RecipeApi>,
}

impl ApiProbe {
    pub fn new(api: Arc<dyn RecipeApi>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl HealthProbe for ApiProbe {
    async fn probe(&self) -> Result<bool, ApiError> {
        self.api.check_health().await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(ApiErrorKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(ApiErrorKind::Decode, err.to_string());
    }
    ApiError::new(ApiErrorKind::Network, err.to_string())
}
