use datacheck::routes::{ConnectionReport, ConnectionStatus};

use crate::helpers::{spawn_app, spawn_app_without_database};

async fn report(response: http::Response<hyper::Body>) -> ConnectionReport {
    let body = hyper::body::to_bytes(response).await.unwrap();
    serde_json::from_slice(&body).expect("body is not a connection report")
}

#[tokio::test]
async fn a_reachable_database_is_reported_as_success() {
    let app = spawn_app().await;

    let response = app.get("/test-db-connection").await;

    assert_eq!(200, response.status());
    let report = report(response).await;
    assert_eq!(ConnectionStatus::Success, report.status);
    assert_eq!("Database connection successful", report.message);
}

#[tokio::test]
async fn an_unreachable_database_is_reported_as_error_without_failing() {
    let app = spawn_app_without_database().await;

    let response = app.get("/test-db-connection").await;

    assert_eq!(200, response.status());
    let report = report(response).await;
    assert_eq!(ConnectionStatus::Error, report.status);
    assert!(!report.message.is_empty());
}
