//! Client configuration.
//!
//! A [`ClientConfig`] is built once (usually from the environment) and handed
//! to [`crate::ReasoningClient::new`]; nothing reads the environment after that.

use std::{fmt, str::FromStr, time::Duration};

use bon::Builder;
use reason_ox_common::RetryPolicy;
use url::Url;

use crate::ReasonOxError;

pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini-2024-07-18";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 8000;

pub const ENDPOINT_VAR: &str = "LLM_API_ENDPOINT";
pub const API_KEY_VAR: &str = "LLM_API_KEY";
pub const SITE_URL_VAR: &str = "LLM_SITE_URL";
pub const SITE_NAME_VAR: &str = "LLM_SITE_NAME";
pub const MODEL_VAR: &str = "LLM_MODEL";
pub const TEMPERATURE_VAR: &str = "LLM_TEMPERATURE";
pub const MAX_TOKENS_VAR: &str = "LLM_MAX_TOKENS";
pub const RETRY_ATTEMPTS_VAR: &str = "LLM_RETRY_ATTEMPTS";
pub const RETRY_DELAY_MS_VAR: &str = "LLM_RETRY_DELAY_MS";

/// Model, temperature and token budget used for one completion
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct GenerationOptions {
    #[builder(default = DEFAULT_MODEL.to_string(), into)]
    pub model: String,
    /// Sampling temperature (0.0 to 2.0)
    #[builder(default = DEFAULT_TEMPERATURE)]
    pub temperature: f32,
    #[builder(default = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

fn default_endpoint() -> Url {
    Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL")
}

/// Immutable settings for [`crate::ReasoningClient`]
#[derive(Clone, Builder)]
pub struct ClientConfig {
    #[builder(into)]
    api_key: String,

    #[builder(default = default_endpoint())]
    endpoint: Url,

    /// Sent as `HTTP-Referer` for service attribution
    #[builder(into)]
    site_url: Option<String>,

    /// Sent as `X-Title` for service attribution
    #[builder(into)]
    site_name: Option<String>,

    #[builder(default)]
    defaults: GenerationOptions,

    #[builder(default)]
    retry: RetryPolicy,
}

impl ClientConfig {
    /// Load settings from the process environment.
    ///
    /// # Errors
    ///
    /// [`ReasonOxError::MissingApiKey`] when `LLM_API_KEY` is unset or blank,
    /// [`ReasonOxError::InvalidEndpoint`] when `LLM_API_ENDPOINT` is not a URL.
    pub fn from_env() -> Result<Self, ReasonOxError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load settings through `lookup`, which maps a variable name to its value.
    ///
    /// Blank values count as unset. Numeric settings that do not parse or are
    /// out of range fall back to their defaults with a warning.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ReasonOxError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let Some(api_key) = var(API_KEY_VAR) else {
            tracing::error!("required secret `{API_KEY_VAR}` missing");
            return Err(ReasonOxError::MissingApiKey);
        };

        let endpoint = match var(ENDPOINT_VAR) {
            Some(raw) => Url::parse(&raw).map_err(|source| ReasonOxError::InvalidEndpoint {
                url: raw.clone(),
                source,
            })?,
            None => default_endpoint(),
        };

        let defaults = GenerationOptions {
            model: var(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: parse_or_warn(var(TEMPERATURE_VAR), TEMPERATURE_VAR, DEFAULT_TEMPERATURE, |t| {
                (0.0..=2.0).contains(t)
            }),
            max_tokens: parse_or_warn(var(MAX_TOKENS_VAR), MAX_TOKENS_VAR, DEFAULT_MAX_TOKENS, |n| *n > 0),
        };

        let fallback = RetryPolicy::default();
        let max_attempts = parse_or_warn(
            var(RETRY_ATTEMPTS_VAR),
            RETRY_ATTEMPTS_VAR,
            fallback.max_attempts(),
            |n| *n > 0,
        );
        let delay_ms = parse_or_warn(
            var(RETRY_DELAY_MS_VAR),
            RETRY_DELAY_MS_VAR,
            u64::try_from(fallback.initial_delay().as_millis()).unwrap_or(u64::MAX),
            |ms| *ms > 0,
        );

        Ok(Self::builder()
            .api_key(api_key)
            .endpoint(endpoint)
            .maybe_site_url(var(SITE_URL_VAR))
            .maybe_site_name(var(SITE_NAME_VAR))
            .defaults(defaults)
            .retry(RetryPolicy::new(max_attempts, Duration::from_millis(delay_ms)))
            .build())
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn site_url(&self) -> Option<&str> {
        self.site_url.as_deref()
    }

    pub fn site_name(&self) -> Option<&str> {
        self.site_name.as_deref()
    }

    pub fn defaults(&self) -> &GenerationOptions {
        &self.defaults
    }

    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint.as_str())
            .field("site_url", &self.site_url)
            .field("site_name", &self.site_name)
            .field("defaults", &self.defaults)
            .field("retry", &self.retry)
            .finish()
    }
}

fn parse_or_warn<T>(value: Option<String>, name: &str, default: T, valid: impl Fn(&T) -> bool) -> T
where
    T: FromStr,
{
    match value {
        None => default,
        Some(raw) => match raw.parse::<T>() {
            Ok(parsed) if valid(&parsed) => parsed,
            _ => {
                tracing::warn!("ENV `{name}` invalid value `{raw}`, using default");
                default
            }
        },
    }
}
