// Training poll loop against scripted status sequences

use luis_integration_tests::{training_body, APP_ID, KEY, VERSION_ID};
use luis_sdk::mock::MockLuisService;
use luis_sdk::{cancel_channel, LuisError, ManagementClient, WaitOptions};
use std::time::{Duration, Instant};
use tokio_test::{assert_err, assert_ok};

const TRAIN_ROUTE: &str = "apps/11111111-2222-3333-4444-555555555555/versions/0.1/train";
const FAST: Duration = Duration::from_millis(20);

fn fast() -> WaitOptions {
    WaitOptions::default().with_interval(FAST)
}

async fn setup(sequence: &[&[&str]]) -> (MockLuisService, ManagementClient) {
    let mock = MockLuisService::start(APP_ID).await;
    let bodies = sequence.iter().map(|s| training_body(s)).collect();
    mock.training_status(APP_ID, VERSION_ID, bodies).await;
    let client = ManagementClient::new(mock.config(KEY)).unwrap();
    (mock, client)
}

#[tokio::test]
async fn test_polls_until_success() {
    let (mock, client) = setup(&[
        &["Success", "InProgress"],
        &["InProgress", "InProgress"],
        &["Success", "Success"],
    ])
    .await;

    let started = Instant::now();
    assert_ok!(client.wait_for_training_with(APP_ID, VERSION_ID, fast()).await);

    assert_eq!(mock.authoring_hits("GET", TRAIN_ROUTE).await, 3);
    // two delays between three polls
    assert!(started.elapsed() >= FAST * 2);
}

#[tokio::test]
async fn test_up_to_date_counts_as_done() {
    let (mock, client) = setup(&[&["UpToDate", "Success"]]).await;

    assert_ok!(client.wait_for_training_with(APP_ID, VERSION_ID, fast()).await);
    assert_eq!(mock.authoring_hits("GET", TRAIN_ROUTE).await, 1);
}

#[tokio::test]
async fn test_fail_stops_with_raw_body() {
    let (mock, client) = setup(&[&["InProgress"], &["Success", "Fail"]]).await;

    let err = assert_err!(client.wait_for_training_with(APP_ID, VERSION_ID, fast()).await);

    assert_eq!(mock.authoring_hits("GET", TRAIN_ROUTE).await, 2);
    match err {
        LuisError::TrainingFailed { body } => {
            assert_eq!(body, training_body(&["Success", "Fail"]));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_fail_wins_over_in_progress() {
    let (mock, client) = setup(&[&["InProgress", "Fail"]]).await;

    let err = assert_err!(client.wait_for_training_with(APP_ID, VERSION_ID, fast()).await);
    assert!(matches!(err, LuisError::TrainingFailed { .. }));
    assert_eq!(mock.authoring_hits("GET", TRAIN_ROUTE).await, 1);
}

#[tokio::test]
async fn test_max_attempts_bound() {
    let (mock, client) = setup(&[&["InProgress"]]).await;

    let err = assert_err!(
        client
            .wait_for_training_with(APP_ID, VERSION_ID, fast().with_max_attempts(3))
            .await
    );
    assert!(matches!(err, LuisError::PollLimitExceeded { attempts: 3 }));
    assert_eq!(mock.authoring_hits("GET", TRAIN_ROUTE).await, 3);
}

#[tokio::test]
async fn test_max_duration_bound() {
    let (_mock, client) = setup(&[&["InProgress"]]).await;

    let options = fast().with_max_duration(Duration::from_millis(100));
    let err = assert_err!(client.wait_for_training_with(APP_ID, VERSION_ID, options).await);
    assert!(matches!(err, LuisError::PollLimitExceeded { .. }));
}

#[tokio::test]
async fn test_huge_interval_with_deadline() {
    let (mock, client) = setup(&[&["InProgress"]]).await;

    let options = WaitOptions::default()
        .with_interval(Duration::MAX)
        .with_max_duration(Duration::from_secs(60));
    let err = assert_err!(client.wait_for_training_with(APP_ID, VERSION_ID, options).await);
    assert!(matches!(err, LuisError::PollLimitExceeded { attempts: 1 }));
    assert_eq!(mock.authoring_hits("GET", TRAIN_ROUTE).await, 1);
}

#[tokio::test]
async fn test_cancel_between_polls() {
    let (mock, client) = setup(&[&["InProgress"]]).await;
    let (handle, token) = cancel_channel();

    let options = WaitOptions::default()
        .with_interval(Duration::from_secs(60))
        .with_cancel(token);
    let wait = tokio::spawn(async move {
        client.wait_for_training_with(APP_ID, VERSION_ID, options).await
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    handle.cancel();

    let result = tokio::time::timeout(Duration::from_secs(5), wait)
        .await
        .expect("cancelled wait should return promptly")
        .unwrap();
    assert!(matches!(result, Err(LuisError::Cancelled)));
    assert_eq!(mock.authoring_hits("GET", TRAIN_ROUTE).await, 1);
}

#[tokio::test]
async fn test_already_cancelled_sends_nothing() {
    let (mock, client) = setup(&[&["InProgress"]]).await;
    let (handle, token) = cancel_channel();
    handle.cancel();

    let err = assert_err!(
        client
            .wait_for_training_with(APP_ID, VERSION_ID, fast().with_cancel(token))
            .await
    );
    assert!(matches!(err, LuisError::Cancelled));
    assert_eq!(mock.authoring_hits("GET", TRAIN_ROUTE).await, 0);
}

#[tokio::test]
async fn test_train_and_wait() {
    let (mock, client) = setup(&[&["InProgress"], &["Success"]]).await;
    mock.train_app(APP_ID, VERSION_ID).await;

    assert_ok!(client.train_and_wait(APP_ID, VERSION_ID, fast()).await);
    assert_eq!(mock.authoring_hits("POST", TRAIN_ROUTE).await, 1);
    assert_eq!(mock.authoring_hits("GET", TRAIN_ROUTE).await, 2);
}

#[tokio::test]
async fn test_status_error_propagates() {
    let mock = MockLuisService::start(APP_ID).await;
    mock.authoring(
        "GET",
        TRAIN_ROUTE,
        404,
        luis_integration_tests::service_error("Cannot find the application"),
    )
    .await;
    let client = ManagementClient::new(mock.config(KEY)).unwrap();

    let err = assert_err!(client.wait_for_training(APP_ID, VERSION_ID).await);
    assert_eq!(err.to_string(), "Cannot find the application");
}
