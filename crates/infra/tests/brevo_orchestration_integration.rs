//! Orchestration over the real HTTP adapter against a mock Brevo server.

use std::sync::Arc;

use serde_json::json;
use verdant_core::{LeadCaptureOutcome, LeadCaptureRequest, LeadCaptureService, MarketingService};
use verdant_domain::{Attributes, ProviderConfig, RateLimitsConfig};
use verdant_infra::BrevoClient;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> Arc<BrevoClient> {
    let provider = ProviderConfig {
        api_key: "integration-key".into(),
        base_url: server.uri(),
        timeout_secs: 5,
        max_attempts: 2,
        retry_backoff_ms: 1,
    };
    Arc::new(BrevoClient::new(&provider, &RateLimitsConfig::default()).expect("client"))
}

async fn empty_account(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/contacts/lists"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 0})))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/contacts/folders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 0})))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/contacts/folders"))
        .and(body_partial_json(json!({"name": "Email Lists"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/contacts/lists"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 12})))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn add_contact_on_empty_account_creates_folder_list_and_contact() {
    let server = MockServer::start().await;
    empty_account(&server).await;
    Mock::given(method("POST"))
        .and(path("/contacts"))
        .and(header("api-key", "integration-key"))
        .and(body_partial_json(json!({
            "email": "a@example.com",
            "listIds": [12],
            "updateEnabled": true,
            "attributes": {"FIRSTNAME": "A", "SOURCE": "marketing-automation", "ADDED_BY": "verdant"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 99})))
        .expect(1)
        .mount(&server)
        .await;

    let service = MarketingService::new(client(&server));
    let mut attributes = Attributes::new();
    attributes.insert("FIRSTNAME".into(), json!("A"));

    let outcome = service.add_contact_to_list("a@example.com", "Test List", attributes).await;

    assert!(outcome.success, "{}", outcome.message);
    let data = outcome.data.expect("data");
    assert_eq!(data.list_id, 12);
    assert_eq!(data.list_name, "Test List");
    assert_eq!(data.contact_id, Some(99));
}

#[tokio::test]
async fn welcome_email_failure_still_captures_lead() {
    let server = MockServer::start().await;
    empty_account(&server).await;
    Mock::given(method("POST"))
        .and(path("/contacts"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/smtp/email"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "invalid_parameter",
            "message": "sender is not valid"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = LeadCaptureService::new(MarketingService::new(client(&server)));

    let outcome = service.capture(&LeadCaptureRequest::new("lead@example.com")).await.expect("captured");

    match outcome {
        LeadCaptureOutcome::Captured(lead) => {
            assert_eq!(lead.list.id, 12);
            assert_eq!(lead.contact_id, None);
            assert!(!lead.email.is_sent());
        }
        other => panic!("expected capture, got {other:?}"),
    }
}
