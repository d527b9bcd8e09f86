//! End-to-end auth flow tests against the real app with in-memory stores.

use std::sync::Arc;

use actix_web::{http::StatusCode, test, web};
use serde_json::{json, Value};

use kg_api::app::create_app;
use kg_api::routes::AppState;
use kg_core::services::account::{AccountService, AccountServiceConfig};
use kg_core::services::auth::{AuthService, AuthServiceConfig};
use kg_core::services::token::{TokenCodec, TokenCodecConfig};
use kg_core::repositories::{MockTokenRepository, MockUserRepository};
use kg_core::services::storage::MemoryFileStorage;

type TestState = AppState<MockUserRepository, MockTokenRepository, MemoryFileStorage>;

// low bcrypt cost keeps the tests fast
const TEST_BCRYPT_COST: u32 = 4;

fn test_state() -> web::Data<TestState> {
    let users = Arc::new(MockUserRepository::new());
    let tokens = Arc::new(MockTokenRepository::new());
    let storage = Arc::new(MemoryFileStorage::new());
    let codec = Arc::new(TokenCodec::new(TokenCodecConfig::new(
        "test-access-secret",
        "test-refresh-secret",
    )));

    let auth_service = Arc::new(AuthService::new(
        users.clone(),
        tokens,
        codec.clone(),
        AuthServiceConfig {
            bcrypt_cost: TEST_BCRYPT_COST,
            ..Default::default()
        },
    ));
    let account_service = Arc::new(AccountService::new(
        users,
        storage,
        AccountServiceConfig {
            bcrypt_cost: TEST_BCRYPT_COST,
            ..Default::default()
        },
    ));

    web::Data::new(AppState {
        auth_service,
        account_service,
        codec,
    })
}

/// Register the test user and log in, yielding the login response body
macro_rules! register_and_login {
    ($app:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({"name": "Ada", "email": "a@x.com", "password": "p1"}))
            .to_request();
        let resp = test::call_service($app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({"email": "a@x.com", "password": "p1"}))
            .to_request();
        let resp = test::call_service($app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        body
    }};
}

#[actix_web::test]
async fn test_login_refresh_and_reuse_detection() {
    let app = test::init_service(create_app(test_state())).await;

    let login: Value = register_and_login!(&app);
    assert_eq!(login["user"]["email"], "a@x.com");
    let old_refresh = login["refresh_token"].as_str().unwrap().to_string();

    // exchange the refresh token once
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .set_json(json!({"refresh_token": old_refresh}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let refreshed: Value = test::read_body_json(resp).await;
    let new_access = refreshed["access_token"].as_str().unwrap().to_string();
    assert_ne!(refreshed["refresh_token"], login["refresh_token"]);

    // the new access token works as a bearer credential
    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(("Authorization", format!("Bearer {}", new_access)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let me: Value = test::read_body_json(resp).await;
    assert_eq!(me["email"], "a@x.com");
    assert!(me["profile_picture_url"].is_null());

    // presenting the consumed refresh token again is flagged as reuse
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .set_json(json!({"refresh_token": old_refresh}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "TOKEN_REUSE_DETECTED");

    // the theft response revoked the successor too
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .set_json(json!({"refresh_token": refreshed["refresh_token"].as_str().unwrap()}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "TOKEN_REUSE_DETECTED");
}

#[actix_web::test]
async fn test_logout_succeeds_once_then_not_found() {
    let app = test::init_service(create_app(test_state())).await;

    let login = register_and_login!(&app);
    let refresh_token = login["refresh_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .set_json(json!({"refresh_token": refresh_token}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .set_json(json!({"refresh_token": refresh_token}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_invalid_credentials_are_indistinguishable() {
    let app = test::init_service(create_app(test_state())).await;
    let _ = register_and_login!(&app);

    let mut bodies = Vec::new();
    for payload in [
        json!({"email": "nobody@x.com", "password": "p1"}),
        json!({"email": "a@x.com", "password": "wrong"}),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        bodies.push((body["error"].clone(), body["message"].clone()));
    }

    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[0].0, "INVALID_CREDENTIALS");
}

#[actix_web::test]
async fn test_bearer_failures_are_distinguished() {
    let app = test::init_service(create_app(test_state())).await;

    // missing header
    let req = test::TestRequest::get().uri("/api/v1/auth/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "MISSING_TOKEN");

    // garbage token
    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(("Authorization", "Bearer garbage"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "INVALID_TOKEN");

    // well-formed but expired token, minted by a codec pinned in the past
    let clock = Arc::new(kg_core::domain::clock::FixedClock::new(
        chrono::Utc::now() - chrono::Duration::days(1),
    ));
    let expired_codec = TokenCodec::with_clock(
        TokenCodecConfig::new("test-access-secret", "test-refresh-secret"),
        clock,
    );
    let expired = expired_codec
        .issue_access(&kg_core::domain::entities::user::UserProfile {
            id: uuid::Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "a@x.com".to_string(),
        })
        .unwrap();

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(("Authorization", format!("Bearer {}", expired)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "TOKEN_EXPIRED");
}

#[actix_web::test]
async fn test_profile_picture_upload_flow() {
    let app = test::init_service(create_app(test_state())).await;

    let login = register_and_login!(&app);
    let access = login["access_token"].as_str().unwrap().to_string();
    let user_id = login["user"]["id"].as_str().unwrap().to_string();

    // disallowed content type is rejected
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/users/{}/profile-picture", user_id))
        .insert_header(("Authorization", format!("Bearer {}", access)))
        .insert_header(("Content-Type", "application/x-sh"))
        .set_payload(vec![1u8, 2, 3])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // jpeg upload succeeds
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/users/{}/profile-picture", user_id))
        .insert_header(("Authorization", format!("Bearer {}", access)))
        .insert_header(("Content-Type", "image/jpeg"))
        .set_payload(vec![0xFFu8, 0xD8, 0xFF])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // the account view now resolves a signed URL
    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(("Authorization", format!("Bearer {}", access)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let me: Value = test::read_body_json(resp).await;
    assert!(me["profile_picture_url"]
        .as_str()
        .unwrap()
        .contains("profile-pictures/"));

    // another user's picture cannot be replaced
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/users/{}/profile-picture", uuid::Uuid::new_v4()))
        .insert_header(("Authorization", format!("Bearer {}", access)))
        .insert_header(("Content-Type", "image/png"))
        .set_payload(vec![0x89u8, 0x50])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_user_listing_and_lookup() {
    let app = test::init_service(create_app(test_state())).await;
    let login = register_and_login!(&app);
    let user_id = login["user"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get().uri("/api/v1/users").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let users: Value = test::read_body_json(resp).await;
    assert_eq!(users.as_array().unwrap().len(), 1);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/users/{}", user_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/users/{}", uuid::Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // duplicate registration conflicts
    let req = test::TestRequest::post()
        .uri("/api/v1/users")
        .set_json(json!({"name": "Eve", "email": "a@x.com", "password": "p2"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}
