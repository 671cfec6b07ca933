use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during extraction and grocery operations
#[derive(Error, Debug)]
pub enum CookflowError {
    /// Caller-supplied input was rejected before any remote call
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The generative service credential is not configured
    #[error("GEMINI_API_KEY is not configured")]
    MissingApiKey,

    /// Network-level failure talking to the generative service
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A single attempt exceeded its wall-clock budget
    #[error("Request timeout after {} seconds", .0.as_secs())]
    Timeout(Duration),

    /// The service replied without any generated text (e.g. a safety block)
    #[error("Failed to extract content from Gemini response")]
    MissingCompletion,

    /// The model reply did not contain parseable JSON
    #[error("Failed to parse model response as JSON: {0}")]
    Parse(String),

    /// The parsed reply failed schema validation
    #[error("Invalid recipe structure: {0}")]
    InvalidRecipe(String),

    /// The reply parsed but lacked the expected top-level shape
    #[error("Invalid grocery list structure: missing categories array")]
    MissingStructure,

    /// The retry budget ran out; carries the last underlying failure
    #[error("Remote call failed after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: String },

    /// Affiliate search URL could not be built
    #[error("Failed to build affiliate URL: {0}")]
    Url(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
