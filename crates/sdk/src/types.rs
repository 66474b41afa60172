//! SDK Request/Response Types
//!
//! Mirrors the JSON shapes of the LUIS prediction and authoring APIs.
//! Payloads the client never inspects stay `serde_json::Value`.

use crate::error::{LuisError, Result};
use crate::request::{HeaderValue, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Predicted intent with its confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub intent: String,
    pub score: f64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Recognized entity span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub entity: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub start_index: usize,
    pub end_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Value>,
    /// `role`, `children` and anything else the service adds
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Result of one recognition call.
///
/// Fields without a typed slot (`compositeEntities`, `sentimentAnalysis`,
/// ...) are kept in `extra`, so serializing gives back the service body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionResult {
    pub query: String,
    pub top_scoring_intent: Intent,
    #[serde(default)]
    pub intents: Vec<Intent>,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Uniform result of every authoring call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagementResponse {
    pub body: Value,
    pub headers: HashMap<String, HeaderValue>,
    pub status_code: u16,
}

impl From<Response> for ManagementResponse {
    fn from(response: Response) -> Self {
        Self {
            body: response.body,
            headers: response.headers,
            status_code: response.status_code,
        }
    }
}

impl ManagementResponse {
    /// Body of `listUserApps` as typed summaries
    pub fn apps(&self) -> Result<Vec<AppSummary>> {
        Ok(Vec::<AppSummary>::deserialize(&self.body)?)
    }

    /// Body of `trainingStatus` as per-model entries
    pub fn model_statuses(&self) -> Result<Vec<ModelTrainingStatus>> {
        Ok(Vec::<ModelTrainingStatus>::deserialize(&self.body)?)
    }

    /// Body as a bare string (ids returned by import/create calls)
    pub fn body_str(&self) -> Result<&str> {
        self.body
            .as_str()
            .ok_or_else(|| LuisError::UnexpectedResponse(format!("expected a string body, got {}", self.body)))
    }
}

/// One entry of `listUserApps`; other fields are kept in `extra`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSummary {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrainingStatus {
    Success,
    UpToDate,
    InProgress,
    Fail,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingDetails {
    pub status: TrainingStatus,
    #[serde(default)]
    pub status_id: Option<i64>,
    #[serde(default)]
    pub example_count: Option<i64>,
    #[serde(default)]
    pub failure_reason: Option<String>,
    #[serde(default)]
    pub training_date_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelTrainingStatus {
    pub model_id: String,
    pub details: TrainingDetails,
}

/// Pagination for list calls, forwarded as-is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub skip: Option<i64>,
    pub take: Option<i64>,
}

impl ListOptions {
    pub fn new(skip: Option<i64>, take: Option<i64>) -> Self {
        Self { skip, take }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportAppOptions {
    pub app_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportVersionOptions {
    pub version_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishAppOptions {
    pub version_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_staging: Option<bool>,
    /// Defaults to the client's region
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl PublishAppOptions {
    pub fn new(version_id: impl Into<String>) -> Self {
        Self {
            version_id: version_id.into(),
            is_staging: None,
            region: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppOptions {
    pub name: String,
    pub culture: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_scenario: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_version_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AppSettings {
    pub public: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionKeyRequest {
    pub subscription_name: String,
    pub subscription_key: String,
}
