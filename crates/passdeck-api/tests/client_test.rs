#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use passdeck_api::types::{FieldPayload, JsonMap, PassQuery, PassUpdateRequest, TemplatePayload};
use passdeck_api::{ApiClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let client = ApiClient::with_client(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

async fn setup_authed() -> (MockServer, ApiClient) {
    let (server, client) = setup().await;
    client.set_token(SecretString::from("tok-123".to_string()));
    (server, client)
}

fn template_json(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "pass_type": "storeCard",
        "background_color": "#1E40AF",
        "foreground_color": "#FFFFFF",
        "label_color": "#E5E7EB",
        "header_fields": [],
        "primary_fields": [{ "key": "points", "label": "Points", "value": "0", "type": "number" }],
        "secondary_fields": [],
        "auxiliary_fields": [],
        "back_fields": [],
        "is_active": true,
        "is_archived": false,
        "created_at": "2024-03-01T10:15:00.123456"
    })
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_sends_form_and_returns_tokens() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("username=owner%40example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "refresh_token": "refresh-1",
            "token_type": "bearer"
        })))
        .mount(&server)
        .await;

    let secret = SecretString::from("hunter22".to_string());
    let tokens = client.login("owner@example.com", &secret).await.unwrap();

    assert_eq!(tokens.access_token.expose_secret(), "access-1");
    assert_eq!(
        tokens.refresh_token.as_ref().map(|t| t.expose_secret()),
        Some("refresh-1")
    );
    assert!(!client.has_token(), "login must not install the token");
}

#[tokio::test]
async fn test_login_failure_is_authentication_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "detail": "Incorrect email or password" })),
        )
        .mount(&server)
        .await;

    let secret = SecretString::from("wrong".to_string());
    let result = client.login("owner@example.com", &secret).await;

    match result {
        Err(Error::Authentication { message }) => {
            assert_eq!(message, "Incorrect email or password");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_unauthorized_with_token_is_session_expired() {
    let (server, client) = setup_authed().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "detail": "expired" })))
        .mount(&server)
        .await;

    let result = client.current_user().await;
    assert!(
        matches!(result, Err(Error::SessionExpired)),
        "expected SessionExpired, got: {result:?}"
    );
}

#[tokio::test]
async fn test_current_user_sends_bearer() {
    let (server, client) = setup_authed().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/me"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u-1",
            "email": "owner@example.com",
            "full_name": "Owner",
            "is_active": true
        })))
        .mount(&server)
        .await;

    let user = client.current_user().await.unwrap();
    assert_eq!(user.id, "u-1");
    assert_eq!(user.email.as_deref(), Some("owner@example.com"));
}

// ── Template tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_list_templates() {
    let (server, client) = setup_authed().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/templates/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([template_json("t-1", "Loyalty")])),
        )
        .mount(&server)
        .await;

    let templates = client.list_templates().await.unwrap();
    assert_eq!(templates.len(), 1);
    let t = &templates[0];
    assert_eq!(t.name.as_deref(), Some("Loyalty"));
    assert_eq!(t.primary_fields.as_ref().map(Vec::len), Some(1));
    assert!(t.created_at.is_some(), "naive timestamp should parse");
}

#[tokio::test]
async fn test_get_template_not_found() {
    let (server, client) = setup_authed().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/templates/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "detail": "Template not found" })),
        )
        .mount(&server)
        .await;

    let err = client.get_template("missing").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.detail(), Some("Template not found"));
}

#[tokio::test]
async fn test_create_template_posts_all_groups() {
    let (server, client) = setup_authed().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/templates/"))
        .and(body_json(json!({
            "name": "Coffee Club",
            "pass_type": "storeCard",
            "header_fields": [],
            "primary_fields": [{ "key": "stamps", "label": "Stamps", "value": "0" }],
            "secondary_fields": [],
            "auxiliary_fields": [],
            "back_fields": []
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(template_json("t-9", "Coffee Club")),
        )
        .mount(&server)
        .await;

    let body = TemplatePayload {
        name: Some("Coffee Club".into()),
        pass_type: Some("storeCard".into()),
        primary_fields: vec![FieldPayload {
            key: "stamps".into(),
            label: "Stamps".into(),
            value: "0".into(),
            field_type: None,
            text_alignment: None,
            extra: JsonMap::new(),
        }],
        ..TemplatePayload::default()
    };

    let created = client.create_template(&body).await.unwrap();
    assert_eq!(created.id, "t-9");
}

#[tokio::test]
async fn test_validation_error_detail_is_flattened() {
    let (server, client) = setup_authed().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/templates/"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [
                { "loc": ["body", "name"], "msg": "field required", "type": "value_error.missing" }
            ]
        })))
        .mount(&server)
        .await;

    let err = client
        .create_template(&TemplatePayload::default())
        .await
        .unwrap_err();

    match err {
        Error::Api { status, detail, .. } => {
            assert_eq!(status, 422);
            assert_eq!(detail.as_deref(), Some("name: field required"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_template() {
    let (server, client) = setup_authed().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/templates/t-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_template("t-1").await.unwrap();
}

// ── Pass tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_passes_forwards_filters() {
    let (server, client) = setup_authed().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/passes/"))
        .and(query_param("template_id", "t-1"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "p-1",
            "serial_number": "a1b2c3d4e5f6",
            "template_id": "t-1",
            "customer_id": "c-1",
            "pass_data": { "points": "120" },
            "is_voided": false,
            "is_redeemed": false
        }])))
        .mount(&server)
        .await;

    let query = PassQuery {
        template_id: Some("t-1".into()),
        limit: Some(50),
        ..PassQuery::default()
    };
    let passes = client.list_passes(&query).await.unwrap();
    assert_eq!(passes.len(), 1);
    assert_eq!(
        passes[0].pass_data.as_ref().and_then(|d| d.get("points")),
        Some(&json!("120"))
    );
}

#[tokio::test]
async fn test_void_pass_sends_only_flag() {
    let (server, client) = setup_authed().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/passes/p-1"))
        .and(body_json(json!({ "is_voided": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "p-1",
            "is_voided": true
        })))
        .mount(&server)
        .await;

    let update = PassUpdateRequest {
        is_voided: Some(true),
        ..PassUpdateRequest::default()
    };
    let pass = client.update_pass("p-1", &update).await.unwrap();
    assert_eq!(pass.is_voided, Some(true));
}

#[tokio::test]
async fn test_download_pass_keeps_filename() {
    let (server, client) = setup_authed().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/passes/p-1/download"))
        .and(query_param("pass_type", "apple"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-disposition", "attachment; filename=\"pass.pkpass\"")
                .set_body_raw(b"PK\x03\x04".to_vec(), "application/vnd.apple.pkpass"),
        )
        .mount(&server)
        .await;

    let file = client.download_pass("p-1", "apple").await.unwrap();
    assert_eq!(file.filename.as_deref(), Some("pass.pkpass"));
    assert_eq!(file.content_type.as_deref(), Some("application/vnd.apple.pkpass"));
    assert_eq!(file.bytes, b"PK\x03\x04");
}

#[tokio::test]
async fn test_redeem_already_redeemed() {
    let (server, client) = setup_authed().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/passes/p-1/redeem"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "detail": "Pass already redeemed" })),
        )
        .mount(&server)
        .await;

    let err = client.redeem_pass("p-1").await.unwrap_err();
    assert_eq!(err.detail(), Some("Pass already redeemed"));
    assert!(!err.is_not_found());
}

// ── Customer tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_search_customers() {
    let (server, client) = setup_authed().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/customers/"))
        .and(query_param("search", "ada"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "c-1",
            "email": "ada@example.com",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "tags": ["vip"]
        }])))
        .mount(&server)
        .await;

    let customers = client.list_customers(Some("ada")).await.unwrap();
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0].tags.as_deref(), Some(&["vip".to_string()][..]));
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup_authed().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/campaigns/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.list_campaigns().await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}
