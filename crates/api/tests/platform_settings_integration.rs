//! Integration tests for platform settings and platform context endpoints.

mod common;

use axum::http::StatusCode;
use common::{test_config, TestApp};
use domain::models::OwnerKey;
use domain::services::{SettingsStore, UpdatePolicy};
use serde_json::json;
use shared::jwt::Privileges;

#[tokio::test]
async fn test_general_starts_empty_then_round_trips() {
    let app = TestApp::new();
    let token = app.staff_token();

    let (status, body) = app
        .get("/api/v1/admin/settings/general", Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));

    let update = json!({"default_currency": "KES", "default_language": "sw"});
    let (status, body) = app
        .put("/api/v1/admin/settings/general", Some(&token), update.clone())
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, update);

    let (status, body) = app
        .get("/api/v1/admin/settings/general", Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["default_currency"], "KES");
    assert_eq!(body["default_language"], "sw");
}

#[tokio::test]
async fn test_first_read_creates_single_record() {
    let app = TestApp::new();
    let token = app.staff_token();

    app.get("/api/v1/admin/settings/security", Some(&token)).await;
    app.get("/api/v1/admin/settings/notifications", Some(&token))
        .await;

    assert_eq!(app.store.record_count().await, 1);
}

#[tokio::test]
async fn test_get_all_settings() {
    let app = TestApp::new();
    let token = app.staff_token();

    app.put(
        "/api/v1/admin/settings/security",
        Some(&token),
        json!({"two_factor_enabled": true, "password_min_length": 8}),
    )
    .await;

    let (status, body) = app.get("/api/v1/admin/settings", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["security"]["password_min_length"], 8);
    assert_eq!(body["general"], json!({}));
    assert_eq!(body["notifications"], json!({}));
    assert_eq!(body["integrations"], json!({}));
    assert!(body["updated_at"].is_string());
}

#[tokio::test]
async fn test_updating_security_leaves_notifications() {
    let app = TestApp::new();
    let token = app.staff_token();

    let notifications = json!({
        "email_sender_name": "Evolve",
        "email_sender_address": "noreply@evolve.example.com",
        "enable_system_emails": true
    });
    app.put(
        "/api/v1/admin/settings/notifications",
        Some(&token),
        notifications.clone(),
    )
    .await;
    app.put(
        "/api/v1/admin/settings/security",
        Some(&token),
        json!({"two_factor_enabled": false}),
    )
    .await;

    let (_, body) = app
        .get("/api/v1/admin/settings/notifications", Some(&token))
        .await;
    assert_eq!(body, notifications);
}

#[tokio::test]
async fn test_invalid_currency_is_rejected_and_not_stored() {
    let app = TestApp::new();
    let token = app.staff_token();

    app.put(
        "/api/v1/admin/settings/general",
        Some(&token),
        json!({"default_currency": "USD"}),
    )
    .await;

    let (status, body) = app
        .put(
            "/api/v1/admin/settings/general",
            Some(&token),
            json!({"default_currency": "KESH"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"][0]["field"], "default_currency");

    let (_, body) = app
        .get("/api/v1/admin/settings/general", Some(&token))
        .await;
    assert_eq!(body["default_currency"], "USD");
}

#[tokio::test]
async fn test_non_object_body_is_rejected() {
    let app = TestApp::new();
    let token = app.staff_token();

    let (status, body) = app
        .put(
            "/api/v1/admin/settings/integrations",
            Some(&token),
            json!(["api_enabled"]),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let app = TestApp::new();
    let token = app.staff_token();

    let (status, body) = app
        .put_raw("/api/v1/admin/settings/general", Some(&token), "{not json")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_non_staff_update_is_forbidden() {
    let app = TestApp::new();
    let token = app.token(Privileges::none());

    let (status, body) = app
        .put(
            "/api/v1/admin/settings/security",
            Some(&token),
            json!({"two_factor_enabled": true}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");
    assert_eq!(app.store.record_count().await, 0);
}

#[tokio::test]
async fn test_superuser_may_update() {
    let app = TestApp::new();
    let token = app.token(Privileges {
        is_staff: false,
        is_superuser: true,
    });

    let (status, _) = app
        .put(
            "/api/v1/admin/settings/integrations",
            Some(&token),
            json!({"api_enabled": true}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unauthenticated_requests_are_rejected() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/v1/admin/settings/security", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _) = app
        .put(
            "/api/v1/admin/settings/security",
            Some("not-a-token"),
            json!({"two_factor_enabled": true}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_section_is_not_found() {
    let app = TestApp::new();
    let token = app.staff_token();

    let (status, body) = app
        .get("/api/v1/admin/settings/billing", Some(&token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, _) = app
        .get("/api/v1/admin/settings/preferences", Some(&token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_store_outage_maps_to_service_unavailable() {
    let mut config = test_config();
    config.settings.cache_ttl_secs = 0;
    let app = TestApp::with_config(config);
    let token = app.staff_token();
    app.store.set_available(false);

    let (status, body) = app
        .get("/api/v1/admin/settings/general", Some(&token))
        .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "persistence_error");
}

#[tokio::test]
async fn test_strict_validation_rejects_unknown_keys() {
    let mut config = test_config();
    config.settings.strict_validation = true;
    let app = TestApp::with_config(config);
    let token = app.staff_token();

    let (status, body) = app
        .put(
            "/api/v1/admin/settings/general",
            Some(&token),
            json!({"timezone": "UTC", "brand_color": "#000"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "brand_color");
}

#[tokio::test]
async fn test_shallow_merge_policy_keeps_prior_keys() {
    let mut config = test_config();
    config.settings.update_policy = UpdatePolicy::ShallowMerge;
    let app = TestApp::with_config(config);
    let token = app.staff_token();

    app.put(
        "/api/v1/admin/settings/general",
        Some(&token),
        json!({"platform_name": "Evolve", "timezone": "UTC"}),
    )
    .await;
    let (status, body) = app
        .put(
            "/api/v1/admin/settings/general",
            Some(&token),
            json!({"timezone": "Africa/Nairobi"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"platform_name": "Evolve", "timezone": "Africa/Nairobi"})
    );
}

#[tokio::test]
async fn test_platform_context_defaults_and_overrides() {
    let app = TestApp::new();
    let user_token = app.token(Privileges::none());

    let (status, body) = app.get("/api/v1/platform/context", Some(&user_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["default_currency"], "USD");
    assert_eq!(body["currency_symbol"], "$");
    assert_eq!(body["platform_name"], "Evolve Platform");

    app.put(
        "/api/v1/admin/settings/general",
        Some(&app.staff_token()),
        json!({"default_currency": "EUR", "timezone": "Europe/Berlin"}),
    )
    .await;

    let (_, body) = app.get("/api/v1/platform/context", Some(&user_token)).await;
    assert_eq!(body["default_currency"], "EUR");
    assert_eq!(body["currency_symbol"], "€");
    assert_eq!(body["timezone"], "Europe/Berlin");
}

#[tokio::test]
async fn test_platform_context_requires_authentication() {
    let app = TestApp::new();
    let (status, _) = app.get("/api/v1/platform/context", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_updates_are_written_to_the_platform_record() {
    let app = TestApp::new();
    let token = app.staff_token();

    app.put(
        "/api/v1/admin/settings/integrations",
        Some(&token),
        json!({"webhook_url": "https://hooks.example.com/evolve"}),
    )
    .await;

    let record = app.store.get_or_create(OwnerKey::platform()).await.unwrap();
    assert_eq!(
        record.section(domain::models::SettingsSection::Integrations)["webhook_url"],
        "https://hooks.example.com/evolve"
    );
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = app.get("/api/health/live", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "alive");

    app.store.set_available(false);
    let (status, _) = app.get("/api/health/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
