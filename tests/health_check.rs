//! Integration tests for the gym_shop server

mod common;

use common::spawn_app;

#[tokio::test]
async fn health_check_works() {
    let app = spawn_app();

    let response = app
        .client
        .get(&format!("{}/health_check", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = spawn_app();

    let response = app.get("/does-not-exist").await;

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn malformed_json_returns_400_envelope() {
    let app = spawn_app();

    let response = app
        .client
        .post(app.url("/user/register"))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}
