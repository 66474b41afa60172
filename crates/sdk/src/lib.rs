//! LUIS SDK - Rust Client Library
//!
//! Thin async clients for the LUIS natural-language-understanding service:
//!
//! - [`RecognitionClient`] sends an utterance to the prediction endpoint
//!   and returns intents and entities.
//! - [`ManagementClient`] creates, imports, trains and publishes
//!   applications through the authoring API, and adds
//!   [`ManagementClient::wait_for_training`] and
//!   [`ManagementClient::try_import_app`] on top.
//!
//! # Example
//!
//! ```no_run
//! use luis_sdk::{LuisConfig, ManagementClient, RecognitionClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = LuisConfig::from_env()?;
//!
//!     // Make sure the app exists and is trained
//!     let management = ManagementClient::new(config.clone())?;
//!     let app = serde_json::json!({"name": "TravelAgent", "versionId": "0.1"});
//!     let app_id = management.try_import_app(&app).await?;
//!     management.train_app(&app_id, "0.1").await?;
//!     management.wait_for_training(&app_id, "0.1").await?;
//!
//!     // Recognize an utterance
//!     let recognizer = RecognitionClient::new(config.with_app_id(app_id))?;
//!     let result = recognizer.recognize("book a flight to paris").await?;
//!     println!("Intent: {}", result.top_scoring_intent.intent);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
mod error;
pub mod management;
#[cfg(feature = "mock")]
pub mod mock;
mod recognition;
pub mod request;
mod types;

pub use config::{LuisConfig, RecognizerOptions};
pub use error::{LuisError, Result};
pub use management::{
    cancel_channel, CancelHandle, CancelToken, ManagementClient, PollState, WaitOptions,
};
pub use recognition::RecognitionClient;
pub use request::{HeaderValue, RequestOptions, Response};
pub use types::{
    AppSettings, AppSummary, CreateAppOptions, Entity, ImportAppOptions, ImportVersionOptions,
    Intent, ListOptions, ManagementResponse, ModelTrainingStatus, PublishAppOptions,
    RecognitionResult, SubscriptionKeyRequest, TrainingDetails, TrainingStatus,
};
