//! Shared HTTP request wrapper
//!
//! Every authoring call goes through [`Request`], which applies the base
//! URL, default headers and default query parameters captured at
//! construction, and turns non-2xx responses into [`LuisError::Request`].
//!
//! Failed calls are not retried.

use crate::error::{LuisError, Result};
pub use reqwest::header::HeaderMap;
use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

/// A header value as seen by callers: one value, or all values of a
/// repeated header in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderValue {
    Single(String),
    Multiple(Vec<String>),
}

impl HeaderValue {
    /// First value of the header
    pub fn first(&self) -> Option<&str> {
        match self {
            HeaderValue::Single(v) => Some(v),
            HeaderValue::Multiple(v) => v.first().map(String::as_str),
        }
    }
}

/// Parsed HTTP response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,
    pub headers: HashMap<String, HeaderValue>,
    pub body: Value,
    /// Reason phrase from the status line, or the canonical one when the
    /// server sent the standard phrase
    #[serde(skip)]
    pub status_message: String,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Header lookup by lower-case name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(HeaderValue::first)
    }
}

/// Per-call options: an optional JSON body and extra query parameters
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub body: Option<Value>,
    pub query: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Add a query parameter; `None` values are not sent.
    pub fn query<V: ToString>(mut self, name: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.query.push((name.to_string(), value.to_string()));
        }
        self
    }
}

/// HTTP wrapper bound to one base URL
#[derive(Debug, Clone)]
pub struct Request {
    http: Client,
    base_url: String,
    headers: HeaderMap,
    default_query: Vec<(String, String)>,
}

impl Request {
    pub fn new(
        http: Client,
        base_url: impl Into<String>,
        headers: HeaderMap,
        default_query: Vec<(String, String)>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            headers,
            default_query,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get(&self, path: &str, options: RequestOptions) -> Result<Response> {
        self.request(Method::GET, path, options).await
    }

    pub async fn post(&self, path: &str, options: RequestOptions) -> Result<Response> {
        self.request(Method::POST, path, options).await
    }

    pub async fn put(&self, path: &str, options: RequestOptions) -> Result<Response> {
        self.request(Method::PUT, path, options).await
    }

    pub async fn delete(&self, path: &str, options: RequestOptions) -> Result<Response> {
        self.request(Method::DELETE, path, options).await
    }

    /// Issue the call and classify the status code
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response> {
        let response = self.execute(method.clone(), path, options).await?;
        if response.is_success() {
            return Ok(response);
        }

        let message = error_message(
            response.status_code,
            response.header("content-type"),
            &response.body,
        );
        warn!(
            method = %method,
            path = %path,
            status = response.status_code,
            error = %message,
            "Request failed"
        );
        // TODO: retry 429/503 with backoff once callers can opt in
        Err(LuisError::Request {
            status_code: response.status_code,
            message,
            response: Box::new(response),
        })
    }

    /// Issue the call without looking at the status code
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response> {
        let url = self.url(path);
        let mut builder = self
            .http
            .request(method.clone(), &url)
            .headers(self.headers.clone())
            .query(&self.default_query)
            .query(&options.query);
        if let Some(body) = &options.body {
            builder = builder.json(body);
        }

        let raw = builder.send().await?;
        let status = raw.status();
        let status_message = reason_phrase(&raw);
        let headers = collect_headers(raw.headers());
        let text = raw.text().await?;

        debug!(method = %method, path = %path, status = status.as_u16(), "Request completed");

        Ok(Response {
            status_code: status.as_u16(),
            status_message,
            headers,
            body: parse_body(&text),
        })
    }

    fn url(&self, path: &str) -> String {
        if path.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }
}

/// Derive the message of a failed authoring call.
///
/// JSON bodies: `message`, then `error.message`, then the whole body.
/// Anything else: `Request returned HTTP {status}`.
pub fn error_message(status_code: u16, content_type: Option<&str>, body: &Value) -> String {
    let is_json = content_type
        .map(|ct| ct.starts_with("application/json"))
        .unwrap_or(false);
    if !is_json {
        return format!("Request returned HTTP {}", status_code);
    }

    if let Some(message) = truthy_message(body.get("message")) {
        return message;
    }
    if let Some(message) = truthy_message(body.get("error").and_then(|e| e.get("message"))) {
        return message;
    }
    body.to_string()
}

/// Message text of a truthy value. Empty strings, zero, `false` and
/// `null` count as absent.
fn truthy_message(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("true".to_string()),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// hyper only records the phrase when it differs from the canonical one
fn reason_phrase(response: &reqwest::Response) -> String {
    if let Some(reason) = response.extensions().get::<hyper::ext::ReasonPhrase>() {
        return String::from_utf8_lossy(reason.as_bytes()).into_owned();
    }
    response
        .status()
        .canonical_reason()
        .unwrap_or("Unknown")
        .to_string()
}

/// JSON when it parses, the raw text otherwise, `null` when empty
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn collect_headers(headers: &HeaderMap) -> HashMap<String, HeaderValue> {
    let mut out = HashMap::new();
    for name in headers.keys() {
        let mut values: Vec<String> = headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect();
        let value = match values.len() {
            0 => continue,
            1 => HeaderValue::Single(values.remove(0)),
            _ => HeaderValue::Multiple(values),
        };
        out.insert(name.as_str().to_string(), value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const JSON: Option<&str> = Some("application/json; charset=utf-8");

    #[test]
    fn test_message_field_wins() {
        let body = json!({"message": "Bad app", "error": {"message": "ignored"}});
        assert_eq!(error_message(400, JSON, &body), "Bad app");
    }

    #[test]
    fn test_nested_error_message() {
        let body = json!({"error": {"code": "BadArgument", "message": "MyApp already exists."}});
        assert_eq!(error_message(400, JSON, &body), "MyApp already exists.");
    }

    #[test]
    fn test_serialized_body_fallback() {
        let body = json!({"statusCode": 401});
        assert_eq!(error_message(401, JSON, &body), r#"{"statusCode":401}"#);
    }

    #[test]
    fn test_empty_message_falls_through() {
        let body = json!({"message": "", "error": {"message": "inner"}});
        assert_eq!(error_message(500, JSON, &body), "inner");
    }

    #[test]
    fn test_non_string_message() {
        assert_eq!(error_message(400, JSON, &json!({"message": 42})), "42");
        assert_eq!(error_message(400, JSON, &json!({"message": true})), "true");
        assert_eq!(
            error_message(400, JSON, &json!({"message": {"code": 7}})),
            r#"{"code":7}"#
        );
    }

    #[test]
    fn test_falsy_message_falls_through() {
        assert_eq!(error_message(400, JSON, &json!({"message": 0})), r#"{"message":0}"#);
        let body = json!({"error": {"message": false}});
        assert_eq!(error_message(400, JSON, &body), r#"{"error":{"message":false}}"#);
        let body = json!({"message": null, "error": {"message": "inner"}});
        assert_eq!(error_message(400, JSON, &body), "inner");
    }

    #[test]
    fn test_non_json_content_type() {
        let body = Value::String("<html>oops</html>".to_string());
        assert_eq!(
            error_message(502, Some("text/html"), &body),
            "Request returned HTTP 502"
        );
        assert_eq!(error_message(503, None, &Value::Null), "Request returned HTTP 503");
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(""), Value::Null);
        assert_eq!(parse_body("\"abc-123\""), json!("abc-123"));
        assert_eq!(parse_body("[1,2]"), json!([1, 2]));
        assert_eq!(parse_body("plain"), json!("plain"));
    }

    #[test]
    fn test_url_join() {
        let request = Request::new(
            Client::new(),
            "https://westus.api.cognitive.microsoft.com/luis/api/v2.0/",
            HeaderMap::new(),
            vec![],
        );
        assert_eq!(
            request.url("apps"),
            "https://westus.api.cognitive.microsoft.com/luis/api/v2.0/apps"
        );
        assert_eq!(
            request.url(""),
            "https://westus.api.cognitive.microsoft.com/luis/api/v2.0"
        );
    }

    #[test]
    fn test_query_skips_none() {
        let options = RequestOptions::new()
            .query("skip", Some(5))
            .query::<i64>("take", None);
        assert_eq!(options.query, vec![("skip".to_string(), "5".to_string())]);
    }

    #[test]
    fn test_header_lookup() {
        let mut headers = HashMap::new();
        headers.insert(
            "content-type".to_string(),
            HeaderValue::Single("application/json".to_string()),
        );
        headers.insert(
            "set-cookie".to_string(),
            HeaderValue::Multiple(vec!["a=1".to_string(), "b=2".to_string()]),
        );
        let response = Response {
            status_code: 200,
            headers,
            body: Value::Null,
            status_message: "OK".to_string(),
        };
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.header("set-cookie"), Some("a=1"));
    }
}
