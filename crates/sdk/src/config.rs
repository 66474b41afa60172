//! Client configuration
//!
//! A `LuisConfig` is an immutable value. Clients derive their base URL,
//! default headers and default query parameters from it once, at
//! construction; changing a setting means building a new client.

use crate::error::{LuisError, Result};
use std::time::Duration;

pub const DEFAULT_REGION: &str = "westus";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Path segment of the prediction API (`/luis/v2.0/apps/{appId}`)
pub const PREDICTION_API_VERSION: &str = "2.0";
/// Path segment of the authoring API (`/luis/api/v2.0/...`)
pub const AUTHORING_API_VERSION: &str = "2.0";

pub const ENV_SUBSCRIPTION_KEY: &str = "LUIS_SUBSCRIPTION_KEY";
pub const ENV_REGION: &str = "LUIS_REGION";
pub const ENV_APP_ID: &str = "LUIS_APP_ID";
pub const ENV_ENDPOINT: &str = "LUIS_ENDPOINT";

/// Optional query flags sent with every recognition call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecognizerOptions {
    pub staging: bool,
    pub verbose: bool,
    pub timezone_offset: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct LuisConfig {
    pub subscription_key: String,
    pub region: String,
    pub app_id: Option<String>,
    /// Replaces `https://{region}.api.cognitive.microsoft.com` (mock servers, proxies)
    pub endpoint: Option<String>,
    pub request_timeout: Duration,
    pub recognizer: RecognizerOptions,
}

impl LuisConfig {
    pub fn new(subscription_key: impl Into<String>) -> Self {
        Self {
            subscription_key: subscription_key.into(),
            region: DEFAULT_REGION.to_string(),
            app_id: None,
            endpoint: None,
            request_timeout: DEFAULT_TIMEOUT,
            recognizer: RecognizerOptions::default(),
        }
    }

    /// Load configuration from `LUIS_*` environment variables
    ///
    /// # Environment Variables
    ///
    /// - `LUIS_SUBSCRIPTION_KEY`: subscription key (required)
    /// - `LUIS_REGION`: Azure region (default: westus)
    /// - `LUIS_APP_ID`: application id for recognition
    /// - `LUIS_ENDPOINT`: origin override
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`LuisConfig::from_env`] with an injectable variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = lookup(ENV_SUBSCRIPTION_KEY)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| LuisError::Config(format!("{} is not set", ENV_SUBSCRIPTION_KEY)))?;

        let mut config = Self::new(key);
        if let Some(region) = lookup(ENV_REGION).filter(|r| !r.is_empty()) {
            config.region = region;
        }
        config.app_id = lookup(ENV_APP_ID).filter(|a| !a.is_empty());
        config.endpoint = lookup(ENV_ENDPOINT).filter(|e| !e.is_empty());

        Ok(config)
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_subscription_key(mut self, key: impl Into<String>) -> Self {
        self.subscription_key = key.into();
        self
    }

    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_recognizer_options(mut self, options: RecognizerOptions) -> Self {
        self.recognizer = options;
        self
    }

    /// Scheme and host every request goes to
    pub fn origin(&self) -> Result<String> {
        match &self.endpoint {
            Some(endpoint) => Ok(endpoint.trim_end_matches('/').to_string()),
            None => {
                let region = validate_region(&self.region)?;
                Ok(format!("https://{}.api.cognitive.microsoft.com", region))
            }
        }
    }

    /// `{origin}/luis/api/v2.0`
    pub fn authoring_base_url(&self) -> Result<String> {
        self.validate_key()?;
        Ok(format!(
            "{}/luis/api/v{}",
            self.origin()?,
            AUTHORING_API_VERSION
        ))
    }

    /// `{origin}/luis/v2.0/apps/{appId}`
    pub fn prediction_url(&self) -> Result<String> {
        self.validate_key()?;
        let app_id = self
            .app_id
            .as_deref()
            .ok_or_else(|| LuisError::Config("application id is not set".to_string()))?;
        Ok(format!(
            "{}/luis/v{}/apps/{}",
            self.origin()?,
            PREDICTION_API_VERSION,
            path_segment("application id", app_id)?
        ))
    }

    fn validate_key(&self) -> Result<()> {
        if self.subscription_key.trim().is_empty() {
            return Err(LuisError::Config("subscription key is empty".to_string()));
        }
        Ok(())
    }
}

fn validate_region(region: &str) -> Result<&str> {
    if region.is_empty() {
        return Err(LuisError::Config("region is empty".to_string()));
    }
    if !region
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(LuisError::Config(format!("invalid region: {}", region)));
    }
    Ok(region)
}

/// Reject identifiers that would change the shape of the URL they are
/// interpolated into.
pub(crate) fn path_segment<'a>(what: &str, value: &'a str) -> Result<&'a str> {
    if value.is_empty() {
        return Err(LuisError::Config(format!("{} is empty", what)));
    }
    if value.contains(['/', '?', '#', '%']) || value.chars().any(char::is_whitespace) {
        return Err(LuisError::Config(format!("invalid {}: {}", what, value)));
    }
    Ok(value)
}
