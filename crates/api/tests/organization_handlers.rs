//! `GET /api/brevo/check-organization` and `POST /api/brevo/setup-organization`

mod support;

use axum::http::{Method, StatusCode};
use serde_json::json;
use support::app;
use verdant_core::testing::Operation;
use verdant_domain::ProviderError;

#[tokio::test]
async fn check_groups_lists_by_folder() {
    let app = app();
    let folder = app.provider.seed_folder("Lead Magnets");
    app.provider.seed_list("Quiz Completers", Some(folder));
    app.provider.seed_list("Orphans", None);
    app.provider.seed_contact("a@example.com", "Quiz Completers");

    let (status, body) = app.get("/api/brevo/check-organization").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let data = &body["data"];
    assert_eq!(data["summary"], json!({"totalFolders": 1, "totalLists": 2, "listsWithoutFolder": 1}));
    assert_eq!(data["organized"]["Lead Magnets"][0]["name"], "Quiz Completers");
    assert_eq!(data["organized"]["Lead Magnets"][0]["contacts"], 1);
    assert_eq!(data["organized"]["No folder assigned"][0]["name"], "Orphans");
}

#[tokio::test]
async fn check_rejects_post() {
    let app = app();

    let (status, body) = app.post("/api/brevo/check-organization", json!({})).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["message"], "This endpoint only accepts GET requests");
}

#[tokio::test]
async fn check_reports_provider_failure() {
    let app = app();
    app.provider.fail_on(Operation::GetFolders, ProviderError::transport("connection refused"));

    let (status, body) = app.get("/api/brevo/check-organization").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Failed to check organization");
    assert!(body["message"].as_str().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn setup_creates_taxonomy_then_reuses_it() {
    let app = app();

    let (status, first) = app.post("/api/brevo/setup-organization", json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["message"], "Brevo organization setup completed");
    assert_eq!(first["data"]["foldersCreated"], 5);
    assert_eq!(first["data"]["listsCreated"], 13);
    assert_eq!(app.provider.folders().len(), 5);
    assert_eq!(app.provider.lists().len(), 13);

    let (status, second) = app.post("/api/brevo/setup-organization", json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["data"]["foldersCreated"], 0);
    assert_eq!(second["data"]["foldersReused"], 5);
    assert_eq!(second["data"]["listsExisting"], 13);
    assert_eq!(app.provider.lists().len(), 13);
}

#[tokio::test]
async fn setup_lists_per_item_failures_without_failing() {
    let app = app();
    app.provider.fail_on(Operation::CreateList, ProviderError::api(500, r#"{"message":"down"}"#));

    let (status, body) = app.post("/api/brevo/setup-organization", json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["listsCreated"], 0);
    assert_eq!(body["data"]["failures"].as_array().unwrap().len(), 13);
}

#[tokio::test]
async fn setup_rejects_get() {
    let app = app();

    let (status, _) = app.send(Method::GET, "/api/brevo/setup-organization", None).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
