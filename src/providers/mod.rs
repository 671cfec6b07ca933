mod bounded;
mod google;
mod prompt;

pub use bounded::{run_bounded, RetryPolicy};
pub use google::GoogleProvider;
pub use prompt::{CATEGORIZATION_PROMPT, EXTRACTION_PROMPT, PRODUCT_MAPPING_PROMPT};

use async_trait::async_trait;

use crate::error::CookflowError;

/// Capability seam for the external text-generation service.
///
/// The service is treated as an untrusted, slow, fallible black box:
/// one prompt in, free text out. Everything downstream (bounded retry,
/// response parsing, validation) is written against this trait so it
/// can be exercised with deterministic stubs.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Get the provider name (e.g., "google")
    fn provider_name(&self) -> &str;

    /// Send one prompt and return the raw text reply
    async fn generate(&self, prompt: &str) -> Result<String, CookflowError>;
}
