use std::sync::Arc;

use cookflow::{AppConfig, Cookflow, CookflowError, GoogleProvider};
use serde_json::json;

const MODEL_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent?key=test_key";

fn client_for(server_url: String) -> Cookflow {
    let provider = GoogleProvider::with_base_url(
        "test_key".to_string(),
        server_url,
        "gemini-1.5-flash".to_string(),
    );

    let mut config = AppConfig::default();
    // Keep retries fast in tests
    config.retry.backoff_ms = 10;

    Cookflow::with_provider(Arc::new(provider), config)
}

/// Wrap model output in the Gemini response envelope.
fn gemini_reply(text: &str) -> String {
    json!({
        "candidates": [{
            "content": {
                "parts": [{"text": text}]
            }
        }]
    })
    .to_string()
}

fn raw_recipe_text() -> &'static str {
    "Weeknight Tomato Soup\n\
     Serves 4. Prep 15 minutes, cook 30 minutes.\n\
     You need 6 ripe tomatoes, 1 cup vegetable stock and 1 yellow onion.\n\
     Chop everything, sweat the onion, add tomatoes and stock, simmer, then blend."
}

fn full_recipe_json() -> String {
    json!({
        "title": "Weeknight Tomato Soup",
        "servings": 4,
        "prep_time_minutes": 15,
        "cook_time_minutes": 30,
        "difficulty": "easy",
        "cuisine": "Italian",
        "tags": ["soup", "vegetarian"],
        "ingredients": [
            {"quantity": "6", "item": "ripe tomatoes"},
            {"quantity": "1 cup", "item": "vegetable stock"},
            {"quantity": "1", "item": "yellow onion"}
        ],
        "steps": [
            "Roughly chop the tomatoes and the onion.",
            "Sweat the onion until translucent, then add the tomatoes.",
            "Pour in the stock and simmer for twenty-five minutes.",
            "Blend until smooth and season to taste."
        ]
    })
    .to_string()
}

#[tokio::test]
async fn test_end_to_end_extraction_scores_high_with_clean_warnings() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", MODEL_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(gemini_reply(&format!("```json\n{}\n```", full_recipe_json())))
        .create_async()
        .await;

    let client = client_for(server.url());
    let extraction = client.extract_recipe(raw_recipe_text()).await.unwrap();

    assert_eq!(extraction.recipe.title, "Weeknight Tomato Soup");
    assert_eq!(extraction.recipe.ingredients.len(), 3);
    assert_eq!(extraction.recipe.steps.len(), 4);
    assert!(extraction.metadata.quality_score >= 0.7);
    assert!(extraction.metadata.warnings.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unparseable_reply_exhausts_attempts_with_cause() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", MODEL_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(gemini_reply("Sorry, I would rather chat about the weather."))
        .expect(2)
        .create_async()
        .await;

    let client = client_for(server.url());
    let result = client.extract_recipe(raw_recipe_text()).await;

    match result {
        Err(CookflowError::Exhausted { attempts, last }) => {
            assert_eq!(attempts, 2);
            assert!(last.contains("Failed to parse model response as JSON"));
        }
        other => panic!("expected Exhausted, got {other:?}"),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_errors_are_retried_then_exhausted() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", MODEL_PATH)
        .with_status(500)
        .with_body("internal error")
        .expect(2)
        .create_async()
        .await;

    let client = client_for(server.url());
    let result = client.extract_recipe(raw_recipe_text()).await;

    assert!(matches!(result, Err(CookflowError::Exhausted { .. })));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_schema_violating_reply_consumes_attempts() {
    // Structurally wrong recipe: no ingredients, no steps
    let invalid = json!({"title": "Empty", "servings": 2}).to_string();

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", MODEL_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(gemini_reply(&invalid))
        .expect(2)
        .create_async()
        .await;

    let client = client_for(server.url());
    let result = client.extract_recipe(raw_recipe_text()).await;

    match result {
        Err(CookflowError::Exhausted { last, .. }) => {
            assert!(last.contains("Invalid recipe structure"));
            assert!(last.contains("Ingredients must be an array"));
        }
        other => panic!("expected Exhausted, got {other:?}"),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_short_and_url_inputs_never_reach_the_server() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", MODEL_PATH)
        .with_status(200)
        .with_body(gemini_reply("{}"))
        .expect(0)
        .create_async()
        .await;

    let client = client_for(server.url());

    let short = client.extract_recipe("way too short").await;
    assert!(matches!(short, Err(CookflowError::InvalidInput(_))));

    let url = client
        .extract_recipe("https://example.com/recipes/tomato-soup-the-best-one-ever")
        .await;
    match url {
        Err(CookflowError::InvalidInput(msg)) => assert!(msg.contains("URL")),
        other => panic!("expected InvalidInput, got {other:?}"),
    }

    mock.assert_async().await;
}
