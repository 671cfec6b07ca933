use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    /// Generative service (Gemini) configuration
    #[serde(default)]
    pub gemini: GeminiConfig,
    /// Retry and timeout budget for remote calls
    #[serde(default)]
    pub retry: RetryConfig,
    /// Affiliate network credentials
    #[serde(default)]
    pub affiliate: AffiliateConfig,
}

/// Configuration for the Gemini generative service
#[derive(Debug, Deserialize, Clone)]
pub struct GeminiConfig {
    /// API key for authentication (can also be set via GEMINI_API_KEY)
    pub api_key: Option<String>,
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL for the API endpoint (for proxy or test endpoints)
    pub base_url: Option<String>,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Retry budget and per-attempt timeouts for remote calls
#[derive(Debug, Deserialize, Clone)]
pub struct RetryConfig {
    /// Total attempt budget per logical call
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Constant delay between attempts in milliseconds
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
    /// Per-attempt timeout for extraction and categorization in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Per-attempt timeout for short product-name lookups in seconds
    #[serde(default = "default_lookup_timeout_secs")]
    pub lookup_timeout_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
            timeout_secs: default_timeout_secs(),
            lookup_timeout_secs: default_lookup_timeout_secs(),
        }
    }
}

/// Affiliate network identifiers
///
/// Either can be absent; links are then built without a referral tag.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AffiliateConfig {
    /// Amazon Associates tag (can also be set via AMAZON_AFFILIATE_ID)
    pub amazon_tag: Option<String>,
    /// Instacart referral id (can also be set via INSTACART_AFFILIATE_ID)
    pub instacart_ref: Option<String>,
}

// Default value functions
fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_max_attempts() -> u32 {
    2
}

fn default_backoff_ms() -> u64 {
    1000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_lookup_timeout_secs() -> u64 {
    5
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with COOKFLOW__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: COOKFLOW__GEMINI__API_KEY
    ///
    /// The bare deployment variables GEMINI_API_KEY, AMAZON_AFFILIATE_ID and
    /// INSTACART_AFFILIATE_ID are honored as fallbacks when the prefixed
    /// forms are absent.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Optional config file (can be missing)
            .add_source(File::with_name("config").required(false))
            // Use double underscore for nested: COOKFLOW__GEMINI__API_KEY
            .add_source(
                Environment::with_prefix("COOKFLOW")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: AppConfig = settings.try_deserialize()?;

        if config.gemini.api_key.is_none() {
            config.gemini.api_key = std::env::var("GEMINI_API_KEY").ok();
        }
        if config.affiliate.amazon_tag.is_none() {
            config.affiliate.amazon_tag = std::env::var("AMAZON_AFFILIATE_ID").ok();
        }
        if config.affiliate.instacart_ref.is_none() {
            config.affiliate.instacart_ref = std::env::var("INSTACART_AFFILIATE_ID").ok();
        }

        Ok(config)
    }
}
