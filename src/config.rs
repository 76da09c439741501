//! Service configuration
//!
//! The only runtime configuration is the pair of provider API keys read from
//! the process environment. Everything else is a fixed constant.

use crate::error::ConfigError;

/// Environment variable holding the text generation API key
pub const GROQ_API_KEY_ENV: &str = "GROQ_API_KEY";

/// Environment variable holding the email provider API key
pub const RESEND_API_KEY_ENV: &str = "RESEND_API_KEY";

/// Chat completions endpoint
pub const GENERATION_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Model used for every audit
pub const GENERATION_MODEL: &str = "llama-3.3-70b-versatile";

/// Sampling temperature
pub const GENERATION_TEMPERATURE: f32 = 0.7;

/// Upper bound on generated tokens
pub const GENERATION_MAX_TOKENS: u32 = 2500;

/// Transactional email endpoint
pub const EMAIL_ENDPOINT: &str = "https://api.resend.com/emails";

/// Sender identity on every audit email
pub const EMAIL_FROM: &str = "Cyrnel Origin <audits@cyrnelorigin.online>";

/// Tag name carrying the sanitised order id
pub const EMAIL_TAG_NAME: &str = "audit";

/// Provider credentials
#[derive(Clone)]
pub struct AppConfig {
    /// Text generation bearer token
    pub groq_api_key: String,
    /// Email provider bearer token
    pub resend_api_key: String,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::MissingEnv(name))
        };

        Ok(Self {
            groq_api_key: require(GROQ_API_KEY_ENV)?,
            resend_api_key: require(RESEND_API_KEY_ENV)?,
        })
    }
}

// Keys stay out of logs.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("groq_api_key", &"<redacted>")
            .field("resend_api_key", &"<redacted>")
            .finish()
    }
}
