// Shared fixtures for the end-to-end tests

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const APP_ID: &str = "11111111-2222-3333-4444-555555555555";
pub const VERSION_ID: &str = "0.1";
pub const KEY: &str = "test-subscription-key";

/// Prediction body for "book a flight"
pub fn book_flight_result() -> Value {
    json!({
        "query": "book a flight",
        "topScoringIntent": {"intent": "BookFlight", "score": 0.9},
        "intents": [
            {"intent": "BookFlight", "score": 0.9},
            {"intent": "None", "score": 0.05}
        ],
        "entities": []
    })
}

/// `trainingStatus` body with one entry per given status
pub fn training_body(statuses: &[&str]) -> Value {
    let models: Vec<Value> = statuses
        .iter()
        .enumerate()
        .map(|(i, status)| {
            json!({
                "modelId": format!("model-{}", i),
                "details": {"statusId": i, "status": status, "exampleCount": 10}
            })
        })
        .collect();
    Value::Array(models)
}

/// Minimal exported app definition
pub fn app_definition(name: &str) -> Value {
    json!({
        "luis_schema_version": "2.1.0",
        "versionId": VERSION_ID,
        "name": name,
        "desc": "",
        "culture": "en-us",
        "intents": [{"name": "None"}],
        "entities": [],
        "utterances": []
    })
}

/// Service-style error body for a failed call
pub fn service_error(message: &str) -> Value {
    json!({"error": {"code": "BadArgument", "message": message}})
}

/// Server answering every request with `HTTP/1.1 {status_line}` and an
/// empty JSON body. Returns its origin.
///
/// wiremock always writes the canonical reason phrase, so custom phrases
/// need a raw socket.
pub async fn status_line_server(status_line: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut received = Vec::new();
                let mut buf = [0u8; 1024];
                while !received.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => received.extend_from_slice(&buf[..n]),
                    }
                }
                let response = format!(
                    "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: 2\r\nconnection: close\r\n\r\n{{}}",
                    status_line
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}", addr)
}
