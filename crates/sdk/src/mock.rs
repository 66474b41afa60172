//! Mock LUIS service for tests
//!
//! Starts a local HTTP server and registers canned responses for the
//! prediction and authoring endpoints. Point a client at it with
//! [`MockLuisService::config`].

use crate::config::{LuisConfig, AUTHORING_API_VERSION, PREDICTION_API_VERSION};
use serde_json::Value;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub struct MockLuisService {
    server: MockServer,
    app_id: String,
}

impl MockLuisService {
    pub async fn start(app_id: impl Into<String>) -> Self {
        Self {
            server: MockServer::start().await,
            app_id: app_id.into(),
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Client configuration bound to this server and app id
    pub fn config(&self, subscription_key: &str) -> LuisConfig {
        LuisConfig::new(subscription_key)
            .with_app_id(self.app_id.clone())
            .with_endpoint(self.uri())
    }

    /// Answer a recognition call whose `q` parameter equals `query`
    pub async fn recognize(
        &self,
        status_code: u16,
        query: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> &Self {
        let route = format!("/luis/v{}/apps/{}", PREDICTION_API_VERSION, self.app_id);
        Mock::given(method("GET"))
            .and(path(route))
            .and(query_param("q", query))
            .respond_with(template(status_code, body, headers))
            .mount(&self.server)
            .await;
        self
    }

    pub async fn import_app(&self, status_code: u16, body: Value) -> &Self {
        self.authoring("POST", "apps/import", status_code, body)
            .await
    }

    pub async fn list_user_apps(&self, body: Value) -> &Self {
        self.authoring("GET", "apps", 200, body).await
    }

    pub async fn train_app(&self, app_id: &str, version_id: &str) -> &Self {
        let route = format!("apps/{}/versions/{}/train", app_id, version_id);
        self.authoring(
            "POST",
            &route,
            202,
            serde_json::json!({"statusId": 9, "status": "Queued"}),
        )
        .await
    }

    /// Answer successive `trainingStatus` polls with `bodies` in order;
    /// the last body repeats.
    pub async fn training_status(&self, app_id: &str, version_id: &str, bodies: Vec<Value>) -> &Self {
        let route = self.authoring_path(&format!("apps/{}/versions/{}/train", app_id, version_id));
        let last = bodies.len().saturating_sub(1);
        for (i, body) in bodies.into_iter().enumerate() {
            let mock = Mock::given(method("GET"))
                .and(path(route.clone()))
                .respond_with(template(200, Some(body), &[]));
            let mock = if i < last { mock.up_to_n_times(1) } else { mock };
            mock.mount(&self.server).await;
        }
        self
    }

    /// Register any authoring route (path relative to `/luis/api/v2.0/`)
    pub async fn authoring(&self, http_method: &str, route: &str, status_code: u16, body: Value) -> &Self {
        Mock::given(method(http_method))
            .and(path(self.authoring_path(route)))
            .respond_with(template(status_code, Some(body), &[]))
            .mount(&self.server)
            .await;
        self
    }

    /// Requests received so far
    pub async fn received_requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// Number of requests received on one authoring route
    pub async fn authoring_hits(&self, http_method: &str, route: &str) -> usize {
        let full = self.authoring_path(route);
        self.received_requests()
            .await
            .iter()
            .filter(|r| r.method.as_str() == http_method && r.url.path() == full)
            .count()
    }

    fn authoring_path(&self, route: &str) -> String {
        format!("/luis/api/v{}/{}", AUTHORING_API_VERSION, route)
    }
}

fn template(status_code: u16, body: Option<Value>, headers: &[(&str, &str)]) -> ResponseTemplate {
    let mut template = ResponseTemplate::new(status_code);
    if let Some(body) = body {
        template = template.set_body_json(body);
    }
    for (name, value) in headers {
        template = template.insert_header(*name, *value);
    }
    template
}
