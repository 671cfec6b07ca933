//! Turns pasted recipe text into validated, structured recipes.
//!
//! The heavy lifting is delegated to an external generative model; the
//! crate's job is the discipline around that unreliable call: input
//! normalization, a timeout-raced bounded retry, tolerant JSON parsing
//! of the reply, two-tier schema validation and a heuristic
//! completeness score. A grocery pipeline categorizes the ingredients
//! of several recipes into shopping sections, and an affiliate
//! pipeline builds purchase links for grocery items.
//!
//! ```no_run
//! use cookflow::Cookflow;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), cookflow::CookflowError> {
//! let client = Cookflow::from_env()?;
//! let extraction = client.extract_recipe("...pasted recipe text...").await?;
//! println!(
//!     "{} (quality {:.2})",
//!     extraction.recipe.title, extraction.metadata.quality_score
//! );
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod pipelines;
pub mod preprocess;
pub mod providers;
pub mod response;
pub mod score;
pub mod validate;

use std::sync::Arc;

use log::warn;

pub use crate::config::AppConfig;
pub use crate::error::CookflowError;
pub use crate::model::{
    Extraction, ExtractionMetadata, GroceryCategory, GroceryItem, GroceryList,
    GroceryListOptions, Ingredient, LinkedItem, NetworkInfo, PurchasableItem, Recipe, Servings,
    ValidationResult,
};
pub use crate::pipelines::affiliate::Network;
pub use crate::providers::{GenerativeProvider, GoogleProvider, RetryPolicy};

/// Minimum raw text length after trimming.
const MIN_RAW_TEXT_LEN: usize = 50;

/// Client for the extraction, categorization and affiliate pipelines.
///
/// Explicitly constructed and cheap to clone. The generative provider
/// is injected, so tests can swap in deterministic doubles.
#[derive(Clone)]
pub struct Cookflow {
    provider: Option<Arc<dyn GenerativeProvider>>,
    config: AppConfig,
}

impl Cookflow {
    /// Create a client from configuration.
    ///
    /// A missing API key is not an error here: extraction and
    /// categorization fail with [`CookflowError::MissingApiKey`] at
    /// call time, while product-name optimization silently falls back
    /// to deterministic cleaning.
    pub fn new(config: AppConfig) -> Self {
        let provider = match GoogleProvider::new(&config.gemini) {
            Ok(provider) => Some(Arc::new(provider) as Arc<dyn GenerativeProvider>),
            Err(e) => {
                warn!("Generative provider unavailable: {e}");
                None
            }
        };

        Self { provider, config }
    }

    /// Create a client from `config.toml` and the environment.
    pub fn from_env() -> Result<Self, CookflowError> {
        Ok(Self::new(AppConfig::load()?))
    }

    /// Create a client with an injected provider.
    pub fn with_provider(provider: Arc<dyn GenerativeProvider>, config: AppConfig) -> Self {
        Self {
            provider: Some(provider),
            config,
        }
    }

    fn provider(&self) -> Result<&dyn GenerativeProvider, CookflowError> {
        self.provider.as_deref().ok_or(CookflowError::MissingApiKey)
    }

    /// Extract a structured recipe from raw pasted text.
    ///
    /// The text must be at least 50 characters after trimming and must
    /// not be a bare URL; both checks happen before any remote call.
    pub async fn extract_recipe(&self, raw_text: &str) -> Result<Extraction, CookflowError> {
        let trimmed = raw_text.trim();

        if trimmed.len() < MIN_RAW_TEXT_LEN {
            return Err(CookflowError::InvalidInput(
                "raw_text must be at least 50 characters".to_string(),
            ));
        }
        if is_bare_url(trimmed) {
            return Err(CookflowError::InvalidInput(
                "raw_text appears to be a URL - paste the recipe text instead".to_string(),
            ));
        }

        let provider = self.provider()?;
        let policy = RetryPolicy::from_config(&self.config.retry);
        pipelines::extract::process(provider, &policy, raw_text).await
    }

    /// Group the ingredients of the given recipes into grocery store
    /// sections.
    pub async fn generate_grocery_list(
        &self,
        recipes: &[Recipe],
        options: &GroceryListOptions,
    ) -> Result<GroceryList, CookflowError> {
        if recipes.is_empty() {
            return Err(CookflowError::InvalidInput(
                "At least one recipe is required".to_string(),
            ));
        }
        for recipe in recipes {
            if recipe.title.trim().is_empty() || recipe.ingredients.is_empty() {
                return Err(CookflowError::InvalidInput(
                    "Each recipe must have title and ingredients".to_string(),
                ));
            }
        }

        let provider = self.provider()?;
        let policy = RetryPolicy::from_config(&self.config.retry);
        pipelines::grocery::process(provider, &policy, recipes, options).await
    }

    /// Build purchase links for a batch of grocery items.
    ///
    /// Works without a configured provider; product names then use the
    /// deterministic cleaning fallback.
    pub async fn generate_affiliate_links(
        &self,
        items: &[PurchasableItem],
        network: Network,
    ) -> Result<Vec<LinkedItem>, CookflowError> {
        if items.is_empty() {
            return Err(CookflowError::InvalidInput(
                "At least one grocery item is required".to_string(),
            ));
        }

        let policy = RetryPolicy::lookup_from_config(&self.config.retry);
        pipelines::affiliate::generate_links(
            self.provider.clone(),
            &policy,
            &self.config.affiliate,
            items,
            network,
        )
        .await
    }

    /// The supported affiliate networks and their configuration state.
    pub fn available_networks(&self) -> Vec<NetworkInfo> {
        pipelines::affiliate::available_networks(&self.config.affiliate)
    }
}

/// One-shot convenience: build a client from the environment and
/// extract a single recipe.
pub async fn extract_recipe(raw_text: &str) -> Result<Extraction, CookflowError> {
    Cookflow::from_env()?.extract_recipe(raw_text).await
}

fn is_bare_url(text: &str) -> bool {
    let prefix: String = text.chars().take(8).collect::<String>().to_lowercase();
    prefix.starts_with("http://") || prefix.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingProvider {
        calls: AtomicU32,
    }

    #[async_trait]
    impl GenerativeProvider for CountingProvider {
        fn provider_name(&self) -> &str {
            "stub"
        }

        async fn generate(&self, _prompt: &str) -> Result<String, CookflowError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(CookflowError::MissingCompletion)
        }
    }

    fn client_with_counter() -> (Cookflow, Arc<CountingProvider>) {
        let provider = Arc::new(CountingProvider {
            calls: AtomicU32::new(0),
        });
        let client = Cookflow::with_provider(provider.clone(), AppConfig::default());
        (client, provider)
    }

    #[tokio::test]
    async fn test_short_input_rejected_before_any_remote_call() {
        let (client, provider) = client_with_counter();

        let result = client.extract_recipe("too short").await;
        assert!(matches!(result, Err(CookflowError::InvalidInput(_))));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_url_input_rejected_with_url_message() {
        let (client, provider) = client_with_counter();

        let url = format!("HTTPS://example.com/{}", "recipe/".repeat(10));
        let result = client.extract_recipe(&url).await;
        match result {
            Err(CookflowError::InvalidInput(msg)) => assert!(msg.contains("URL")),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_grocery_list_requires_recipes() {
        let (client, _provider) = client_with_counter();

        let result = client
            .generate_grocery_list(&[], &GroceryListOptions::default())
            .await;
        assert!(matches!(result, Err(CookflowError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_grocery_list_requires_title_and_ingredients() {
        let (client, _provider) = client_with_counter();

        let recipe = Recipe {
            title: "Salad".to_string(),
            servings: Servings::Count(2.0),
            prep_time_minutes: None,
            cook_time_minutes: None,
            difficulty: None,
            cuisine: None,
            tags: Vec::new(),
            ingredients: Vec::new(),
            steps: vec!["Toss everything together well.".to_string()],
            notes: None,
        };

        let result = client
            .generate_grocery_list(&[recipe], &GroceryListOptions::default())
            .await;
        assert!(matches!(result, Err(CookflowError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_affiliate_links_require_items() {
        let (client, _provider) = client_with_counter();

        let result = client.generate_affiliate_links(&[], Network::Amazon).await;
        assert!(matches!(result, Err(CookflowError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_missing_credential_is_terminal_for_extraction() {
        let client = Cookflow::new(AppConfig::default());

        let text = "A perfectly reasonable recipe text that is long enough to pass the check.";
        let result = client.extract_recipe(text).await;
        assert!(matches!(result, Err(CookflowError::MissingApiKey)));
    }

    #[test]
    fn test_is_bare_url_variants() {
        assert!(is_bare_url("http://example.com"));
        assert!(is_bare_url("Https://example.com/soup"));
        assert!(!is_bare_url("see http://example.com for the recipe"));
        assert!(!is_bare_url("httpserver setup instructions"));
    }
}
