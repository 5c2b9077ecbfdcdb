use std::time::Duration;

use pretty_assertions::assert_eq;
use recipe_core::{Food, Recipe};
use recipe_engine::{ApiErrorKind, ApiSettings, RecipeApi, RecipeRoutes, ReqwestRecipeApi};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> ReqwestRecipeApi {
    let settings = ApiSettings::default()
        .with_base_url(&server.uri())
        .expect("mock server uri");
    ReqwestRecipeApi::new(settings).expect("client")
}

#[tokio::test]
async fn health_is_ready_only_on_200() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "healthy"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let api = api_for(&server);
    assert_eq!(api.check_health().await, Ok(true));
    assert_eq!(api.check_health().await, Ok(false));
}

#[tokio::test]
async fn health_network_error_is_an_error() {
    let settings = ApiSettings {
        connect_timeout: Duration::from_millis(200),
        request_timeout: Duration::from_millis(500),
        ..ApiSettings::default()
    }
    .with_base_url("http://127.0.0.1:9")
    .unwrap();
    let api = ReqwestRecipeApi::new(settings).unwrap();

    let err = api.check_health().await.unwrap_err();
    assert!(matches!(
        err.kind,
        ApiErrorKind::Network | ApiErrorKind::Timeout
    ));
}

#[tokio::test]
async fn generate_posts_defaults_and_maps_recipe_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/recipes/generate"))
        .and(body_json(json!({
            "ingredients": ["egg", "milk"],
            "max_recipes": 3,
            "cuisine_style": "any"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "recipes": [{
                "recipe_name": "Omelette",
                "ingredients": ["egg", "milk"],
                "instructions": "Mix and cook."
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server);
    let recipes = api
        .generate_recipes(&["egg".to_string(), "milk".to_string()])
        .await
        .expect("recipes");

    assert_eq!(
        recipes,
        vec![Recipe {
            name: "Omelette".to_string(),
            ingredients: vec!["egg".to_string(), "milk".to_string()],
            instructions: "Mix and cook.".to_string(),
        }]
    );
}

#[tokio::test]
async fn legacy_routes_and_custom_style() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/recipes/generate"))
        .and(body_json(json!({
            "ingredients": ["rice"],
            "max_recipes": 1,
            "cuisine_style": "thai"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "recipes": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = ApiSettings {
        routes: RecipeRoutes::Legacy,
        max_recipes: 1,
        cuisine_style: "thai".to_string(),
        ..ApiSettings::default()
    }
    .with_base_url(&server.uri())
    .unwrap();
    let api = ReqwestRecipeApi::new(settings).unwrap();

    let recipes = api.generate_recipes(&["rice".to_string()]).await.unwrap();
    assert!(recipes.is_empty());
}

#[tokio::test]
async fn generate_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/recipes/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "detail": "Failed to generate recipes"
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let err = api
        .generate_recipes(&["egg".to_string()])
        .await
        .unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::HttpStatus(500));
}

#[tokio::test]
async fn generate_rejects_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/recipes/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "dishes": [] })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let err = api
        .generate_recipes(&["egg".to_string()])
        .await
        .unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Decode);
}

#[tokio::test]
async fn generate_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/recipes/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({ "recipes": [] })),
        )
        .mount(&server)
        .await;

    let settings = ApiSettings {
        request_timeout: Duration::from_millis(50),
        ..ApiSettings::default()
    }
    .with_base_url(&server.uri())
    .unwrap();
    let api = ReqwestRecipeApi::new(settings).unwrap();

    let err = api
        .generate_recipes(&["egg".to_string()])
        .await
        .unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Timeout);
}

#[tokio::test]
async fn search_sends_query_and_parses_foods() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/foods"))
        .and(query_param("q", "tom ato"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "tomato" },
            { "id": 2, "name": "cherry tomato" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server);
    let foods = api.search_foods(" tom ato ").await.unwrap();
    assert_eq!(
        foods,
        vec![
            Food {
                id: 1,
                name: "tomato".to_string()
            },
            Food {
                id: 2,
                name: "cherry tomato".to_string()
            },
        ]
    );
}

#[tokio::test]
async fn short_search_never_hits_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/foods"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let api = api_for(&server);
    let err = api.search_foods("to").await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::QueryTooShort { min_chars: 3 });
}
