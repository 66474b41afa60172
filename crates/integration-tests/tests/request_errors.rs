// Error messages derived by the request wrapper

use luis_integration_tests::KEY;
use luis_sdk::request::{HeaderMap, Request, RequestOptions};
use luis_sdk::{LuisConfig, LuisError, ManagementClient};
use serde_json::json;
use tokio_test::assert_ok;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn failing_server(template: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/luis/api/v2.0/apps"))
        .respond_with(template)
        .mount(&server)
        .await;
    server
}

async fn list_apps_error(server: &MockServer) -> LuisError {
    let client = ManagementClient::new(LuisConfig::new(KEY).with_endpoint(server.uri())).unwrap();
    client
        .list_user_apps(Default::default())
        .await
        .unwrap_err()
}

#[tokio::test]
async fn test_json_message_field() {
    let server = failing_server(
        ResponseTemplate::new(401).set_body_json(json!({"statusCode": 401, "message": "Access denied due to invalid subscription key."})),
    )
    .await;

    let err = list_apps_error(&server).await;
    assert_eq!(err.to_string(), "Access denied due to invalid subscription key.");
    assert_eq!(err.status_code(), Some(401));
}

#[tokio::test]
async fn test_json_nested_error_message() {
    let server = failing_server(
        ResponseTemplate::new(400)
            .set_body_json(json!({"error": {"code": "BadArgument", "message": "Invalid skip"}})),
    )
    .await;

    let err = list_apps_error(&server).await;
    assert_eq!(err.to_string(), "Invalid skip");
}

#[tokio::test]
async fn test_json_without_message_is_serialized() {
    let body = json!({"code": 500});
    let server = failing_server(ResponseTemplate::new(500).set_body_json(body.clone())).await;

    let err = list_apps_error(&server).await;
    assert_eq!(err.to_string(), serde_json::to_string(&body).unwrap());
}

#[tokio::test]
async fn test_non_json_body() {
    let server = failing_server(
        ResponseTemplate::new(502)
            .set_body_string("<html>Bad Gateway</html>")
            .insert_header("content-type", "text/html"),
    )
    .await;

    let err = list_apps_error(&server).await;
    assert_eq!(err.to_string(), "Request returned HTTP 502");

    match err {
        LuisError::Request { response, .. } => {
            assert_eq!(response.body, json!("<html>Bad Gateway</html>"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_wrapper_applies_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/base/items/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": "Success"})))
        .mount(&server)
        .await;

    let mut headers = HeaderMap::new();
    headers.insert("x-test", "yes".parse().unwrap());
    let request = Request::new(
        Default::default(),
        format!("{}/base/", server.uri()),
        headers,
        vec![("token".to_string(), "abc".to_string())],
    );

    let response = assert_ok!(
        request
            .delete("items/7", RequestOptions::new().query("force", Some(true)))
            .await
    );
    assert_eq!(response.status_code, 200);
    assert_eq!(response.body["code"], "Success");

    let received = &server.received_requests().await.unwrap()[0];
    assert_eq!(received.headers.get("x-test").unwrap(), "yes");
    assert_eq!(received.url.query(), Some("token=abc&force=true"));
}
