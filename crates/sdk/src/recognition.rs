//! Recognition Client
//!
//! Sends one utterance to the prediction endpoint and returns the
//! predicted intents and entities.

use crate::config::{LuisConfig, RecognizerOptions};
use crate::error::{LuisError, Result};
use crate::request::{Request, RequestOptions};
use crate::types::RecognitionResult;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method};
use tracing::{debug, warn};

/// Client for `GET /luis/v2.0/apps/{appId}`
///
/// # Example
///
/// ```no_run
/// use luis_sdk::{LuisConfig, RecognitionClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = LuisConfig::new("subscription-key").with_app_id("app-id");
/// let client = RecognitionClient::new(config)?;
/// let result = client.recognize("book a flight to paris").await?;
/// println!("{} ({})", result.top_scoring_intent.intent, result.top_scoring_intent.score);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RecognitionClient {
    config: LuisConfig,
    http: Client,
    request: Request,
}

impl RecognitionClient {
    pub fn new(config: LuisConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Self::with_http_client(config, http)
    }

    /// Build on an existing `reqwest::Client` (shared connection pool)
    pub fn with_http_client(config: LuisConfig, http: Client) -> Result<Self> {
        let request = Request::new(
            http.clone(),
            config.prediction_url()?,
            HeaderMap::new(),
            default_query(&config),
        );
        Ok(Self {
            config,
            http,
            request,
        })
    }

    pub fn config(&self) -> &LuisConfig {
        &self.config
    }

    /// New client for another region; `self` keeps its settings
    pub fn with_region(&self, region: impl Into<String>) -> Result<Self> {
        self.reconfigure(self.config.clone().with_region(region))
    }

    pub fn with_subscription_key(&self, key: impl Into<String>) -> Result<Self> {
        self.reconfigure(self.config.clone().with_subscription_key(key))
    }

    pub fn with_app_id(&self, app_id: impl Into<String>) -> Result<Self> {
        self.reconfigure(self.config.clone().with_app_id(app_id))
    }

    pub fn with_options(&self, options: RecognizerOptions) -> Result<Self> {
        self.reconfigure(self.config.clone().with_recognizer_options(options))
    }

    fn reconfigure(&self, config: LuisConfig) -> Result<Self> {
        Self::with_http_client(config, self.http.clone())
    }

    /// Recognize intents and entities in one utterance
    pub async fn recognize(&self, text: &str) -> Result<RecognitionResult> {
        let options = RequestOptions::new().query("q", Some(text));
        let response = self.request.execute(Method::GET, "", options).await?;

        if response.status_code != 200 {
            warn!(
                status = response.status_code,
                app_id = ?self.config.app_id,
                "Recognition failed"
            );
            return Err(LuisError::Recognition {
                status_code: response.status_code,
                status_message: response.status_message,
            });
        }

        let result: RecognitionResult = serde_json::from_value(response.body)?;
        debug!(
            intent = %result.top_scoring_intent.intent,
            score = result.top_scoring_intent.score,
            entities = result.entities.len(),
            "Utterance recognized"
        );
        Ok(result)
    }
}

fn default_query(config: &LuisConfig) -> Vec<(String, String)> {
    let options = &config.recognizer;
    let mut query = vec![(
        "subscription-key".to_string(),
        config.subscription_key.clone(),
    )];
    if options.staging {
        query.push(("staging".to_string(), "true".to_string()));
    }
    if options.verbose {
        query.push(("verbose".to_string(), "true".to_string()));
    }
    if let Some(offset) = options.timezone_offset {
        query.push(("timezoneOffset".to_string(), offset.to_string()));
    }
    query
}
