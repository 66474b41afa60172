//! Management Client
//!
//! Application lifecycle over the LUIS authoring API
//! (`/luis/api/v2.0`). Each primitive maps to exactly one HTTP call and
//! returns a [`ManagementResponse`]. The derived operations
//! (`wait_for_training`, `try_import_app`) live in their own modules.

mod cancel;
mod import;
mod training;

pub use cancel::{cancel_channel, CancelHandle, CancelToken};
pub use import::is_app_exists_error;
pub use training::{classify, PollState, WaitOptions, DEFAULT_POLL_INTERVAL};

use crate::config::{path_segment, LuisConfig};
use crate::error::{LuisError, Result};
use crate::request::{Request, RequestOptions};
use crate::types::{
    AppSettings, CreateAppOptions, ImportAppOptions, ImportVersionOptions, ListOptions,
    ManagementResponse, PublishAppOptions, SubscriptionKeyRequest,
};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde_json::Value;

pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// LUIS authoring client
///
/// # Example
///
/// ```no_run
/// use luis_sdk::{LuisConfig, ManagementClient, ListOptions};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ManagementClient::new(LuisConfig::new("authoring-key"))?;
/// let apps = client.list_user_apps(ListOptions::default()).await?;
/// for app in apps.apps()? {
///     println!("{} {}", app.id, app.name);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ManagementClient {
    config: LuisConfig,
    http: Client,
    request: Request,
}

impl ManagementClient {
    pub fn new(config: LuisConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Self::with_http_client(config, http)
    }

    pub fn with_http_client(config: LuisConfig, http: Client) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.subscription_key).map_err(|_| {
            LuisError::Config("subscription key is not a valid header value".to_string())
        })?;
        headers.insert(SUBSCRIPTION_KEY_HEADER, key);

        let request = Request::new(http.clone(), config.authoring_base_url()?, headers, vec![]);
        Ok(Self {
            config,
            http,
            request,
        })
    }

    pub fn config(&self) -> &LuisConfig {
        &self.config
    }

    /// New client bound to another region; `self` is unchanged
    pub fn with_region(&self, region: impl Into<String>) -> Result<Self> {
        Self::with_http_client(self.config.clone().with_region(region), self.http.clone())
    }

    pub fn with_subscription_key(&self, key: impl Into<String>) -> Result<Self> {
        Self::with_http_client(
            self.config.clone().with_subscription_key(key),
            self.http.clone(),
        )
    }

    // ---- apps ----

    pub async fn list_user_apps(&self, options: ListOptions) -> Result<ManagementResponse> {
        self.get("apps", paged(options)).await
    }

    pub async fn import_app(
        &self,
        application: &Value,
        options: ImportAppOptions,
    ) -> Result<ManagementResponse> {
        let opts = RequestOptions::new()
            .json(application.clone())
            .query("appName", options.app_name);
        self.post("apps/import", opts).await
    }

    pub async fn add_app(&self, options: &CreateAppOptions) -> Result<ManagementResponse> {
        self.post("apps", RequestOptions::new().body(options)?).await
    }

    pub async fn get_app(&self, app_id: &str) -> Result<ManagementResponse> {
        let path = app_path(app_id, "")?;
        self.get(&path, RequestOptions::new()).await
    }

    pub async fn delete_app(&self, app_id: &str) -> Result<ManagementResponse> {
        let path = app_path(app_id, "")?;
        Ok(self.request.delete(&path, RequestOptions::new()).await?.into())
    }

    pub async fn list_app_endpoints(&self, app_id: &str) -> Result<ManagementResponse> {
        let path = app_path(app_id, "endpoints")?;
        self.get(&path, RequestOptions::new()).await
    }

    pub async fn update_settings(
        &self,
        app_id: &str,
        settings: AppSettings,
    ) -> Result<ManagementResponse> {
        let path = app_path(app_id, "settings")?;
        Ok(self
            .request
            .put(&path, RequestOptions::new().body(&settings)?)
            .await?
            .into())
    }

    /// Publish a version; `region` defaults to the client's region
    pub async fn publish_app(
        &self,
        app_id: &str,
        mut options: PublishAppOptions,
    ) -> Result<ManagementResponse> {
        let path = app_path(app_id, "publish")?;
        if options.region.is_none() {
            options.region = Some(self.config.region.clone());
        }
        self.post(&path, RequestOptions::new().body(&options)?).await
    }

    // ---- versions ----

    pub async fn import_version(
        &self,
        app_id: &str,
        application: &Value,
        options: ImportVersionOptions,
    ) -> Result<ManagementResponse> {
        let path = app_path(app_id, "versions/import")?;
        let opts = RequestOptions::new()
            .json(application.clone())
            .query("versionId", options.version_id);
        self.post(&path, opts).await
    }

    pub async fn list_versions(
        &self,
        app_id: &str,
        options: ListOptions,
    ) -> Result<ManagementResponse> {
        let path = app_path(app_id, "versions")?;
        self.get(&path, paged(options)).await
    }

    pub async fn delete_version(
        &self,
        app_id: &str,
        version_id: &str,
    ) -> Result<ManagementResponse> {
        let path = version_path(app_id, version_id, "")?;
        Ok(self.request.delete(&path, RequestOptions::new()).await?.into())
    }

    pub async fn list_intents(
        &self,
        app_id: &str,
        version_id: &str,
        options: ListOptions,
    ) -> Result<ManagementResponse> {
        self.list_version_resource(app_id, version_id, "intents", options)
            .await
    }

    pub async fn list_entities(
        &self,
        app_id: &str,
        version_id: &str,
        options: ListOptions,
    ) -> Result<ManagementResponse> {
        self.list_version_resource(app_id, version_id, "entities", options)
            .await
    }

    pub async fn list_closed_lists(
        &self,
        app_id: &str,
        version_id: &str,
        options: ListOptions,
    ) -> Result<ManagementResponse> {
        self.list_version_resource(app_id, version_id, "closedlists", options)
            .await
    }

    pub async fn list_composite_entities(
        &self,
        app_id: &str,
        version_id: &str,
        options: ListOptions,
    ) -> Result<ManagementResponse> {
        self.list_version_resource(app_id, version_id, "compositeentities", options)
            .await
    }

    pub async fn list_hierarchical_entities(
        &self,
        app_id: &str,
        version_id: &str,
        options: ListOptions,
    ) -> Result<ManagementResponse> {
        self.list_version_resource(app_id, version_id, "hierarchicalentities", options)
            .await
    }

    pub async fn list_prebuilt_entities(
        &self,
        app_id: &str,
        version_id: &str,
        options: ListOptions,
    ) -> Result<ManagementResponse> {
        self.list_version_resource(app_id, version_id, "prebuilts", options)
            .await
    }

    pub async fn list_models(
        &self,
        app_id: &str,
        version_id: &str,
        options: ListOptions,
    ) -> Result<ManagementResponse> {
        self.list_version_resource(app_id, version_id, "models", options)
            .await
    }

    // ---- training ----

    pub async fn train_app(&self, app_id: &str, version_id: &str) -> Result<ManagementResponse> {
        let path = version_path(app_id, version_id, "train")?;
        self.post(&path, RequestOptions::new()).await
    }

    pub async fn training_status(
        &self,
        app_id: &str,
        version_id: &str,
    ) -> Result<ManagementResponse> {
        let path = version_path(app_id, version_id, "train")?;
        self.get(&path, RequestOptions::new()).await
    }

    // ---- subscription keys ----

    pub async fn list_subscription_keys(&self) -> Result<ManagementResponse> {
        self.get("subscriptions", RequestOptions::new()).await
    }

    pub async fn add_subscription_key(
        &self,
        key: &SubscriptionKeyRequest,
    ) -> Result<ManagementResponse> {
        self.post("subscriptions", RequestOptions::new().body(key)?)
            .await
    }

    /// Assign a subscription key to an app version's endpoint
    pub async fn assign_app_key(
        &self,
        app_id: &str,
        version_id: &str,
        subscription_key: &str,
    ) -> Result<ManagementResponse> {
        let path = version_path(app_id, version_id, "assignedkey")?;
        let opts = RequestOptions::new().json(Value::String(subscription_key.to_string()));
        Ok(self.request.put(&path, opts).await?.into())
    }

    async fn list_version_resource(
        &self,
        app_id: &str,
        version_id: &str,
        resource: &str,
        options: ListOptions,
    ) -> Result<ManagementResponse> {
        let path = version_path(app_id, version_id, resource)?;
        self.get(&path, paged(options)).await
    }

    async fn get(&self, path: &str, options: RequestOptions) -> Result<ManagementResponse> {
        Ok(self.request.get(path, options).await?.into())
    }

    async fn post(&self, path: &str, options: RequestOptions) -> Result<ManagementResponse> {
        Ok(self.request.post(path, options).await?.into())
    }
}

fn paged(options: ListOptions) -> RequestOptions {
    RequestOptions::new()
        .query("skip", options.skip)
        .query("take", options.take)
}

fn app_path(app_id: &str, rest: &str) -> Result<String> {
    let app_id = path_segment("application id", app_id)?;
    Ok(if rest.is_empty() {
        format!("apps/{}", app_id)
    } else {
        format!("apps/{}/{}", app_id, rest)
    })
}

fn version_path(app_id: &str, version_id: &str, rest: &str) -> Result<String> {
    let version_id = path_segment("version id", version_id)?;
    app_path(app_id, &format!("versions/{}/{}", version_id, rest))
}
