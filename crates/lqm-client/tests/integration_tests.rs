//! Integration tests for lqm-client.
//!
//! Uses wiremock to stand in for the controller.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use lqm_client::{ControllerClient, Error};
use lqm_core::{ElementId, ExtensionId, ExtensionPayload, ExtensionRecord, SiteId, Thresholds};
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

async fn mount_profile(server: &MockServer, tenant: &str) {
    Mock::given(method("GET"))
        .and(path("/v2.1/api/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tenant_id": tenant,
            "email": "ops@example.com"
        })))
        .mount(server)
        .await;
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v2.0/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "api_endpoint": "https://api.example.com"
        })))
        .mount(server)
        .await;
}

/// A client already logged in to tenant `t1`.
async fn logged_in(server: &MockServer) -> ControllerClient {
    mount_login(server).await;
    mount_profile(server, "t1").await;
    let mut client = ControllerClient::new(server.uri()).unwrap();
    client.login("ops@example.com", "secret").await.unwrap();
    client
}

// =============================================================================
// SESSION TESTS
// =============================================================================

#[tokio::test]
async fn test_login_sets_tenant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2.0/api/login"))
        .and(body_json(json!({"email": "ops@example.com", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    mount_profile(&server, "t1").await;

    let mut client = ControllerClient::new(server.uri()).unwrap();
    assert!(!client.is_authenticated());

    let profile = client.login("ops@example.com", "secret").await.unwrap();
    assert_eq!(profile.tenant_id.as_deref(), Some("t1"));
    assert_eq!(client.tenant_id(), Some("t1"));
}

#[tokio::test]
async fn test_login_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2.0/api/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid credentials"))
        .mount(&server)
        .await;

    let mut client = ControllerClient::new(server.uri()).unwrap();
    let result = client.login("ops@example.com", "wrong").await;

    match result.unwrap_err() {
        Error::Api { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid credentials");
        }
        other => panic!("Expected Api error, got: {:?}", other),
    }
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_login_token_from_response_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2.0/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"x_auth_token": "tok-9"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2.1/api/profile"))
        .and(header("x-auth-token", "tok-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tenant_id": "t9"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = ControllerClient::new(server.uri()).unwrap();
    client.login("sso@example.com", "x").await.unwrap();
    assert_eq!(client.tenant_id(), Some("t9"));
}

#[tokio::test]
async fn test_use_token_sends_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2.1/api/profile"))
        .and(header("x-auth-token", "abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tenant_id": "t2"})))
        .mount(&server)
        .await;

    let mut client = ControllerClient::new(server.uri()).unwrap();
    client.use_token("abc123").await.unwrap();
    assert_eq!(client.tenant_id(), Some("t2"));
}

#[tokio::test]
async fn test_use_token_without_tenant_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2.1/api/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"email": "x"})))
        .mount(&server)
        .await;

    let mut client = ControllerClient::new(server.uri()).unwrap();
    let result = client.use_token("abc123").await;

    assert!(matches!(result, Err(Error::Auth(_))));
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_logout_clears_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2.0/api/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = logged_in(&server).await;
    client.logout().await.unwrap();
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_tenant_call_before_login() {
    let client = ControllerClient::new("http://127.0.0.1:1").unwrap();
    let result = client.sites().await;
    assert!(matches!(result, Err(Error::NotAuthenticated)));
}

#[tokio::test]
async fn test_connection_refused() {
    let mut client = ControllerClient::new("http://127.0.0.1:1").unwrap();
    let result = client.login("a", "b").await;

    match result.unwrap_err() {
        Error::Http(_) => {} // Expected
        other => panic!("Expected Http error, got: {:?}", other),
    }
}

// =============================================================================
// REFERENCE LIST TESTS
// =============================================================================

#[tokio::test]
async fn test_sites() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4.7/api/tenants/t1/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "items": [
                {"id": "1", "name": "Unassigned", "element_cluster_role": "NONE"},
                {"id": "s-a", "name": "Branch-A", "element_cluster_role": "SPOKE"}
            ]
        })))
        .mount(&server)
        .await;

    let client = logged_in(&server).await;
    let sites = client.sites().await.unwrap();

    assert_eq!(sites.len(), 2);
    assert_eq!(sites[1].id, SiteId::from("s-a"));
    assert_eq!(sites[1].name, "Branch-A");
}

#[tokio::test]
async fn test_elements_with_unclaimed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2.3/api/tenants/t1/elements"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": "e-a", "name": "branch-a-ion", "site_id": "s-a"},
                {"id": "e-new", "name": null, "site_id": "1"}
            ]
        })))
        .mount(&server)
        .await;

    let client = logged_in(&server).await;
    let elements = client.elements().await.unwrap();

    assert_eq!(elements.len(), 2);
    assert_eq!(elements[0].name.as_deref(), Some("branch-a-ion"));
    assert!(elements[1].name.is_none());
}

#[tokio::test]
async fn test_appdefs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2.5/api/tenants/t1/appdefs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "a-zoom", "display_name": "zoom", "category": "collab"}]
        })))
        .mount(&server)
        .await;

    let client = logged_in(&server).await;
    let apps = client.appdefs().await.unwrap();

    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0].display_name, "zoom");
}

#[tokio::test]
async fn test_missing_items_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2.5/api/tenants/t1/appdefs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 0})))
        .mount(&server)
        .await;

    let client = logged_in(&server).await;
    assert!(client.appdefs().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_null_or_missing_items_for_sites_and_extensions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4.7/api/tenants/t1/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": null})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2.0/api/tenants/t1/sites/s-a/elements/e-a/extensions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = logged_in(&server).await;
    assert!(client.sites().await.unwrap().is_empty());
    let extensions = client
        .element_extensions(&SiteId::from("s-a"), &ElementId::from("e-a"))
        .await
        .unwrap();
    assert!(extensions.is_empty());
}

#[tokio::test]
async fn test_vpn_links_query_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3.3/api/tenants/t1/topology"))
        .and(body_json(json!({"type": "basenet", "site_id": "s-a", "links_only": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "nodes": [],
            "links": [
                {
                    "type": "vpn",
                    "path_id": "p-1",
                    "source_node_id": "e-a",
                    "source_site_name": "Branch-A",
                    "source_wan_network": "ISP",
                    "target_wan_network": "MPLS",
                    "target_site_name": "DC"
                },
                {"type": "internet-stub", "path_id": "p-9"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in(&server).await;
    let links = client.vpn_links(&SiteId::from("s-a")).await.unwrap();

    assert_eq!(links.len(), 2);
    assert!(links[0].is_vpn());
    assert!(!links[1].is_vpn());
}

#[tokio::test]
async fn test_list_failure_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4.7/api/tenants/t1/sites"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = logged_in(&server).await;
    let result = client.sites().await;
    assert!(matches!(result, Err(Error::Api { status: 500, .. })));
}

#[tokio::test]
async fn test_non_json_body_is_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4.7/api/tenants/t1/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let client = logged_in(&server).await;
    assert!(matches!(client.sites().await, Err(Error::Json(_))));
}

// =============================================================================
// EXTENSION TESTS
// =============================================================================

#[tokio::test]
async fn test_create_extension_posts_payload() {
    let server = MockServer::start().await;
    let payload = ExtensionPayload::all_apps(&Thresholds::new(150, 30, 1));

    Mock::given(method("POST"))
        .and(path("/v2.0/api/tenants/t1/sites/s-a/elements/e-a/extensions"))
        .and(body_json(json!({
            "name": "lqm_all",
            "namespace": "thresholds/lqm/app/all",
            "entity_id": null,
            "disabled": false,
            "conf": {
                "latency": 150,
                "latency_en": true,
                "jitter": 30,
                "jitter_en": true,
                "packet_loss": 1,
                "packet_loss_en": true
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "x-1",
            "name": "lqm_all",
            "namespace": "thresholds/lqm/app/all",
            "entity_id": null,
            "_etag": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in(&server).await;
    let created = client
        .create_element_extension(&SiteId::from("s-a"), &ElementId::from("e-a"), &payload)
        .await
        .unwrap();

    assert_eq!(created.id, ExtensionId::from("x-1"));
    assert_eq!(created.etag, Some(1));
}

#[tokio::test]
async fn test_update_extension_puts_id_and_etag() {
    let server = MockServer::start().await;
    let payload = ExtensionPayload::app("zoom", "a-zoom", &Thresholds::new(100, 0, 0));
    let existing = ExtensionRecord {
        id: ExtensionId::from("x-7"),
        name: Some("zoom_lqm".to_string()),
        namespace: "thresholds/lqm/app".to_string(),
        entity_id: Some("a-zoom".to_string()),
        etag: Some(3),
    };

    Mock::given(method("PUT"))
        .and(path("/v2.0/api/tenants/t1/sites/s-a/elements/e-a/extensions/x-7"))
        .and(body_partial_json(json!({
            "id": "x-7",
            "_etag": 3,
            "name": "zoom_lqm",
            "entity_id": "a-zoom",
            "conf": {"latency": 100, "latency_en": true, "jitter_en": false}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "x-7",
            "name": "zoom_lqm",
            "namespace": "thresholds/lqm/app",
            "entity_id": "a-zoom",
            "_etag": 4
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in(&server).await;
    let updated = client
        .update_element_extension(
            &SiteId::from("s-a"),
            &ElementId::from("e-a"),
            &existing,
            &payload,
        )
        .await
        .unwrap();

    assert_eq!(updated.etag, Some(4));
}

#[tokio::test]
async fn test_list_extensions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2.0/api/tenants/t1/sites/s-a/elements/e-a/extensions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": "x-1",
                "name": "p-1_lqm",
                "namespace": "thresholds/lqm/media",
                "entity_id": "p-1",
                "conf": {"max_latency": 200},
                "_etag": 2
            }]
        })))
        .mount(&server)
        .await;

    let client = logged_in(&server).await;
    let extensions = client
        .element_extensions(&SiteId::from("s-a"), &ElementId::from("e-a"))
        .await
        .unwrap();

    assert_eq!(extensions.len(), 1);
    assert_eq!(extensions[0].entity_id.as_deref(), Some("p-1"));
}

#[tokio::test]
async fn test_create_rejected_keeps_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2.0/api/tenants/t1/sites/s-a/elements/e-a/extensions"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"_error": [{"code": "EXTENSION_CONFIG_INVALID"}]})),
        )
        .mount(&server)
        .await;

    let client = logged_in(&server).await;
    let payload = ExtensionPayload::media("p-1", &Thresholds::new(1, 1, 1));
    let result = client
        .create_element_extension(&SiteId::from("s-a"), &ElementId::from("e-a"), &payload)
        .await;

    match result.unwrap_err() {
        Error::Api { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("EXTENSION_CONFIG_INVALID"));
        }
        other => panic!("Expected Api error, got: {:?}", other),
    }
}

// =============================================================================
// ERROR TYPE TESTS
// =============================================================================

#[test]
fn test_error_display_api() {
    let err = Error::Api {
        status: 404,
        body: "not found".to_string(),
    };
    assert_eq!(format!("{}", err), "API error 404: not found");
}

#[test]
fn test_error_display_auth() {
    let err = Error::Auth("profile has no tenant_id".to_string());
    assert_eq!(format!("{}", err), "Authentication failed: profile has no tenant_id");
}
