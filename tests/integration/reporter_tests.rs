//! Outcome reporting integration tests
//!
//! Drive the full endpoint with mock notification and audit servers and
//! verify the outbound protocol: payload fields, signing over the exact
//! wire bytes, truncation and the best-effort failure contract.

use crate::common::fixtures::{
    TEST_SECRET, reservation_deleted_payload, signed_config, start_payload, test_config,
};
use crate::common::hosts::RecordingHost;
use actix_web::{test, web};
use metalhook::Config;
use metalhook::server::{AppState, HttpServer};
use metalhook::utils::auth::signature;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn state_with(config: Config, host: Arc<RecordingHost>) -> web::Data<AppState> {
    let state = AppState::with_host(config, host).unwrap();
    web::Data::new(state)
}

fn reporting_config(config: &mut Config, server: &MockServer) {
    config.reporting.notification_endpoint = Some(format!("{}/notifications", server.uri()));
    config.reporting.webhook_log_endpoint = Some(format!("{}/webhook-logs", server.uri()));
}

async fn mount_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/notifications"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/webhook-logs"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

/// Received request bodies for one path
async fn bodies_for(server: &MockServer, wanted: &str) -> Vec<serde_json::Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|request| request.url.path() == wanted)
        .map(|request| serde_json::from_slice(&request.body).unwrap())
        .collect()
}

// ==================== Delivery Tests ====================

#[actix_web::test]
async fn test_provision_outcome_reports_to_both_channels() {
    let server = MockServer::start().await;
    mount_ok(&server).await;

    let mut config = test_config();
    reporting_config(&mut config, &server);

    let host = Arc::new(RecordingHost::accepting());
    let app = test::init_service(HttpServer::create_app(state_with(config, host))).await;

    let request = test::TestRequest::post()
        .uri("/webhook")
        .set_json(start_payload())
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 200);

    let notifications = bodies_for(&server, "/notifications").await;
    assert_eq!(notifications.len(), 1);
    let notification = &notifications[0];
    assert_eq!(notification["webhookId"], 42);
    assert_eq!(notification["userId"], "user-1");
    assert_eq!(notification["type"], "SUCCESS");
    assert_eq!(notification["eventType"], "PROVISIONING_COMPLETED");
    assert_eq!(notification["eventId"], "e1");
    assert_eq!(notification["resourceId"], "bm-17");
    assert!(
        notification["message"]
            .as_str()
            .unwrap()
            .contains("'prognose'")
    );
    assert_eq!(notification["metadata"]["resourceType"], "BareMetalHost");
    assert_eq!(notification["metadata"]["resourceName"], "bm-17");

    let audits = bodies_for(&server, "/webhook-logs").await;
    assert_eq!(audits.len(), 1);
    let audit = &audits[0];
    assert_eq!(audit["webhookId"], 42);
    assert_eq!(audit["eventType"], "EVENT_START");
    assert_eq!(audit["success"], true);
    assert_eq!(audit["statusCode"], 200);
    assert_eq!(audit["response"], "Provisioning initiated for server 'bm-17'");
    assert_eq!(audit["retryCount"], 0);
    assert_eq!(audit["metadata"]["resourceName"], "bm-17");
    assert_eq!(audit["metadata"]["eventId"], "e1");
}

#[actix_web::test]
async fn test_failed_provision_reports_failure_outcome() {
    let server = MockServer::start().await;
    mount_ok(&server).await;

    let mut config = test_config();
    reporting_config(&mut config, &server);

    let host = Arc::new(RecordingHost::rejecting());
    let app = test::init_service(HttpServer::create_app(state_with(config, host))).await;

    let request = test::TestRequest::post()
        .uri("/webhook")
        .set_json(start_payload())
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 500);

    let notifications = bodies_for(&server, "/notifications").await;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["type"], "ERROR");
    assert_eq!(notifications[0]["eventType"], "PROVISIONING_FAILED");
    assert!(
        notifications[0]["message"]
            .as_str()
            .unwrap()
            .contains("provisioning failed")
    );

    let audits = bodies_for(&server, "/webhook-logs").await;
    assert_eq!(audits.len(), 1);
    assert_eq!(audits[0]["success"], false);
    assert_eq!(audits[0]["statusCode"], 500);
}

#[actix_web::test]
async fn test_deprovision_audit_uses_end_event_type() {
    let server = MockServer::start().await;
    mount_ok(&server).await;

    let mut config = test_config();
    reporting_config(&mut config, &server);

    let host = Arc::new(RecordingHost::accepting());
    let app = test::init_service(HttpServer::create_app(state_with(config, host))).await;

    let request = test::TestRequest::post()
        .uri("/webhook")
        .set_json(reservation_deleted_payload("2024-01-01T10:00:00Z"))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 200);

    let audits = bodies_for(&server, "/webhook-logs").await;
    assert_eq!(audits.len(), 1);
    assert_eq!(audits[0]["eventType"], "EVENT_END");
    assert_eq!(audits[0]["metadata"]["eventId"], "99");

    let notifications = bodies_for(&server, "/notifications").await;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["eventType"], "DEPROVISIONING_COMPLETED");
    assert_eq!(notifications[0]["userId"], "kc-1");
}

// ==================== Signing Tests ====================

#[actix_web::test]
async fn test_outbound_requests_are_signed_over_wire_bytes() {
    let server = MockServer::start().await;
    mount_ok(&server).await;

    let mut config = signed_config();
    reporting_config(&mut config, &server);

    let host = Arc::new(RecordingHost::accepting());
    let app = test::init_service(HttpServer::create_app(state_with(config, host))).await;

    let body = serde_json::to_vec(&start_payload()).unwrap();
    let inbound_signature = signature::sign(TEST_SECRET, &body).unwrap();

    let request = test::TestRequest::post()
        .uri("/webhook")
        .insert_header(("X-Webhook-Signature", inbound_signature))
        .insert_header(("Content-Type", "application/json"))
        .set_payload(body)
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 200);

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 2);

    for outbound in &received {
        let header = outbound
            .headers
            .get("X-Webhook-Signature")
            .expect("outbound request must be signed")
            .to_str()
            .unwrap();
        // The signature must verify against the exact bytes on the wire
        let expected = signature::sign(TEST_SECRET, &outbound.body).unwrap();
        assert_eq!(header, expected);
    }
}

#[actix_web::test]
async fn test_outbound_requests_unsigned_without_secret() {
    let server = MockServer::start().await;
    mount_ok(&server).await;

    let mut config = test_config();
    reporting_config(&mut config, &server);

    let host = Arc::new(RecordingHost::accepting());
    let app = test::init_service(HttpServer::create_app(state_with(config, host))).await;

    let request = test::TestRequest::post()
        .uri("/webhook")
        .set_json(start_payload())
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 200);

    for outbound in server.received_requests().await.unwrap() {
        assert!(outbound.headers.get("X-Webhook-Signature").is_none());
    }
}

// ==================== Truncation Tests ====================

#[actix_web::test]
async fn test_audit_payload_snapshot_is_truncated() {
    let server = MockServer::start().await;
    mount_ok(&server).await;

    let mut config = test_config();
    reporting_config(&mut config, &server);

    let host = Arc::new(RecordingHost::accepting());
    let app = test::init_service(HttpServer::create_app(state_with(config, host))).await;

    // An oversized SSH key pushes the serialized payload snapshot far
    // past the audit field limit
    let mut payload = start_payload();
    payload["sshPublicKey"] = serde_json::json!(format!("ssh-rsa {}", "A".repeat(8000)));

    let request = test::TestRequest::post()
        .uri("/webhook")
        .set_json(payload)
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 200);

    let audits = bodies_for(&server, "/webhook-logs").await;
    assert_eq!(audits.len(), 1);
    let snapshot = audits[0]["payload"].as_str().unwrap();
    assert_eq!(snapshot.chars().count(), 4000);
    assert!(snapshot.ends_with("..."));
}

// ==================== Failure Tolerance Tests ====================

#[actix_web::test]
async fn test_delivery_failure_never_fails_the_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/notifications"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/webhook-logs"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut config = test_config();
    reporting_config(&mut config, &server);

    let host = Arc::new(RecordingHost::accepting());
    let app = test::init_service(HttpServer::create_app(state_with(config, host))).await;

    let request = test::TestRequest::post()
        .uri("/webhook")
        .set_json(start_payload())
        .to_request();
    let response = test::call_service(&app, request).await;

    // The action was accepted; reporting failures are absorbed
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["message"], "Successfully provisioned server 'bm-17'");
}

#[actix_web::test]
async fn test_unreachable_endpoints_never_fail_the_request() {
    let mut config = test_config();
    config.reporting.notification_endpoint = Some("http://127.0.0.1:1/notifications".to_string());
    config.reporting.webhook_log_endpoint = Some("http://127.0.0.1:1/webhook-logs".to_string());
    config.reporting.notification_timeout_secs = 1;
    config.reporting.webhook_log_timeout_secs = 1;

    let host = Arc::new(RecordingHost::accepting());
    let app = test::init_service(HttpServer::create_app(state_with(config, host))).await;

    let request = test::TestRequest::post()
        .uri("/webhook")
        .set_json(start_payload())
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status().as_u16(), 200);
}
