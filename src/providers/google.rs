use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};

use crate::config::GeminiConfig;
use crate::error::CookflowError;
use crate::providers::GenerativeProvider;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub struct GoogleProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl GoogleProvider {
    /// Create a new Google Gemini provider from configuration
    pub fn new(config: &GeminiConfig) -> Result<Self, CookflowError> {
        let api_key = config.api_key.clone().ok_or(CookflowError::MissingApiKey)?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(GoogleProvider {
            client: Client::new(),
            api_key,
            base_url,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        GoogleProvider {
            client: Client::new(),
            api_key,
            base_url,
            model,
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

#[async_trait]
impl GenerativeProvider for GoogleProvider {
    fn provider_name(&self) -> &str {
        "google"
    }

    async fn generate(&self, prompt: &str) -> Result<String, CookflowError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&json!({
                "contents": [{
                    "parts": [{
                        "text": prompt
                    }]
                }],
                "generationConfig": {
                    "temperature": self.temperature,
                    "maxOutputTokens": self.max_tokens
                }
            }))
            .send()
            .await?;

        let response_body: Value = response.json().await?;
        debug!("{:?}", response_body);

        let text = response_body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or(CookflowError::MissingCompletion)?
            .to_string();

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

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

    #[tokio::test]
    async fn test_generate_extracts_candidate_text() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock(
                "POST",
                "/v1beta/models/gemini-1.5-flash:generateContent?key=fake_key",
            )
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(gemini_reply("{\"title\": \"Soup\"}"))
            .create_async()
            .await;

        let provider = GoogleProvider::with_base_url(
            "fake_key".to_string(),
            server.url(),
            "gemini-1.5-flash".to_string(),
        );

        let reply = provider.generate("extract this").await.unwrap();
        assert_eq!(reply, "{\"title\": \"Soup\"}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_without_candidates_fails() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock(
                "POST",
                "/v1beta/models/gemini-1.5-flash:generateContent?key=fake_key",
            )
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#)
            .create_async()
            .await;

        let provider = GoogleProvider::with_base_url(
            "fake_key".to_string(),
            server.url(),
            "gemini-1.5-flash".to_string(),
        );

        let result = provider.generate("extract this").await;
        assert!(matches!(result, Err(CookflowError::MissingCompletion)));
    }

    #[test]
    fn test_new_requires_api_key() {
        let config = GeminiConfig::default();
        let result = GoogleProvider::new(&config);
        assert!(matches!(result, Err(CookflowError::MissingApiKey)));
    }

    #[test]
    fn test_provider_name() {
        let config = GeminiConfig {
            api_key: Some("fake_key".to_string()),
            ..GeminiConfig::default()
        };
        let provider = GoogleProvider::new(&config).unwrap();
        assert_eq!(provider.provider_name(), "google");
    }
}
