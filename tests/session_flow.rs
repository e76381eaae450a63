//! End-to-end session lifecycle scenarios against a mock backend.

mod common;

use authkit::store::TokenStore;
use common::{build_harness, profile_body, tokens, tokens_body};
use mockito::Server;

/// Round trip: login, then the fetched profile identity matches what the
/// server asserts for those credentials.
#[tokio::test]
async fn test_login_round_trip() {
    let mut server = Server::new_async().await;
    let login = server
        .mock("POST", "/api/auth/login")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(tokens_body("A1", "R1", 3600))
        .create_async()
        .await;
    let me = server
        .mock("GET", "/api/auth/me")
        .match_header("authorization", "Bearer A1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(profile_body(7, "Ada Lovelace"))
        .create_async()
        .await;

    let harness = build_harness(&server.url());
    harness.session.initialize().await;
    assert!(!harness.session.snapshot().is_authenticated());

    let user = harness
        .session
        .login("a@b.com", "x")
        .await
        .expect("login should succeed");
    login.assert_async().await;
    me.assert_async().await;

    assert_eq!(user.id, 7);
    let state = harness.session.snapshot();
    assert!(state.is_authenticated());
    assert!(!state.loading);
    assert_eq!(harness.store.access_token().await.as_deref(), Some("A1"));
    assert!(!harness.store.is_expired().await);
    // The profile snapshot lands in the store for cold starts.
    assert_eq!(harness.auth.cached_user().await.map(|u| u.id), Some(7));
}

/// A rejected login leaves the session anonymous and surfaces the server
/// message to the caller.
#[tokio::test]
async fn test_failed_login_stays_anonymous() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/auth/login")
        .with_status(401)
        .with_body(r#"{"detail":"Invalid credentials"}"#)
        .create_async()
        .await;

    let harness = build_harness(&server.url());
    harness.session.initialize().await;

    let err = harness
        .session
        .login("a@b.com", "wrong")
        .await
        .expect_err("login should fail");
    assert_eq!(err.to_string(), "Invalid credentials");

    let state = harness.session.snapshot();
    assert!(!state.is_authenticated());
    assert!(!state.loading);
    assert!(harness.store.access_token().await.is_none());
}

/// No stored token: startup settles into anonymous without any network
/// traffic.
#[tokio::test]
async fn test_startup_without_token_is_anonymous() {
    let server = Server::new_async().await;
    let harness = build_harness(&server.url());

    assert!(harness.session.snapshot().loading);
    harness.session.initialize().await;

    let state = harness.session.snapshot();
    assert!(!state.loading);
    assert!(!state.is_authenticated());
}

/// A stored, unexpired token restores the session directly from `/auth/me`.
#[tokio::test]
async fn test_startup_with_valid_token_restores_session() {
    let mut server = Server::new_async().await;
    let me = server
        .mock("GET", "/api/auth/me")
        .match_header("authorization", "Bearer A1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(profile_body(7, "Ada Lovelace"))
        .create_async()
        .await;

    let harness = build_harness(&server.url());
    harness.store.save(&tokens("A1", "R1", Some(3600))).await;

    harness.session.initialize().await;
    me.assert_async().await;

    let state = harness.session.snapshot();
    assert!(state.is_authenticated());
    assert_eq!(state.user.map(|u| u.full_name), Some("Ada Lovelace".to_string()));
}

/// A stored-but-expired token is refreshed silently during startup, and
/// the profile fetch runs with the new bearer token.
#[tokio::test]
async fn test_startup_with_expired_token_refreshes() {
    let mut server = Server::new_async().await;
    let refresh = server
        .mock("POST", "/api/auth/refresh-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(tokens_body("A2", "R2", 3600))
        .create_async()
        .await;
    let me = server
        .mock("GET", "/api/auth/me")
        .match_header("authorization", "Bearer A2")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(profile_body(7, "Ada Lovelace"))
        .create_async()
        .await;

    let harness = build_harness(&server.url());
    harness.store.save(&tokens("A1", "R1", Some(-10))).await;

    harness.session.initialize().await;
    refresh.assert_async().await;
    me.assert_async().await;

    assert!(harness.session.snapshot().is_authenticated());
    assert_eq!(harness.store.access_token().await.as_deref(), Some("A2"));
}

/// Startup with a refresh token the server rejects: no error surfaces,
/// the session quietly ends anonymous with the store cleared.
#[tokio::test]
async fn test_startup_with_invalid_refresh_goes_anonymous() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/auth/refresh-token")
        .with_status(401)
        .with_body(r#"{"detail":"invalid refresh token"}"#)
        .create_async()
        .await;

    let harness = build_harness(&server.url());
    harness.store.save(&tokens("A1", "R-bad", Some(-10))).await;

    harness.session.initialize().await;

    let state = harness.session.snapshot();
    assert!(!state.is_authenticated());
    assert!(!state.loading);
    assert!(harness.store.access_token().await.is_none());
    assert!(harness.store.refresh_token().await.is_none());
}

/// A stored token the server rejects on `/auth/me` also degrades to
/// anonymous with the store cleared.
#[tokio::test]
async fn test_startup_with_rejected_token_goes_anonymous() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/auth/me")
        .with_status(401)
        .create_async()
        .await;

    let harness = build_harness(&server.url());
    harness.store.save(&tokens("A-revoked", "R1", Some(3600))).await;

    harness.session.initialize().await;

    assert!(!harness.session.snapshot().is_authenticated());
    assert!(harness.store.access_token().await.is_none());
}

/// Logout twice produces the same end state as once and never fails.
#[tokio::test]
async fn test_double_logout_is_idempotent() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/auth/login")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(tokens_body("A1", "R1", 3600))
        .create_async()
        .await;
    server
        .mock("GET", "/api/auth/me")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(profile_body(7, "Ada Lovelace"))
        .create_async()
        .await;

    let harness = build_harness(&server.url());
    harness.session.initialize().await;
    harness
        .session
        .login("a@b.com", "x")
        .await
        .expect("login should succeed");

    harness.session.logout().await;
    let first = harness.session.snapshot();
    assert!(!first.is_authenticated());
    assert!(harness.store.access_token().await.is_none());

    harness.session.logout().await;
    let second = harness.session.snapshot();
    assert!(!second.is_authenticated());
    assert!(!second.loading);
    assert!(harness.store.access_token().await.is_none());
}

/// The health probe reports backend status through the same authenticated
/// client and works anonymously.
#[tokio::test]
async fn test_health_probe() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/health")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"ok","uptime":42.0}"#)
        .create_async()
        .await;

    let harness = build_harness(&server.url());
    let health = harness.client.health().await.expect("probe should succeed");
    assert_eq!(health.status, "ok");
    assert_eq!(health.uptime, Some(42.0));
    assert_eq!(health.error, None);
}

/// `refresh_user` updates the profile in place on success and keeps the
/// previous state on failure.
#[tokio::test]
async fn test_refresh_user_keeps_state_on_failure() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/auth/login")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(tokens_body("A1", "R1", 3600))
        .create_async()
        .await;
    let me_first = server
        .mock("GET", "/api/auth/me")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(profile_body(7, "Ada Lovelace"))
        .expect(1)
        .create_async()
        .await;

    let harness = build_harness(&server.url());
    harness.session.initialize().await;
    harness
        .session
        .login("a@b.com", "x")
        .await
        .expect("login should succeed");
    me_first.assert_async().await;

    // Renamed profile on the next fetch.
    let me_renamed = server
        .mock("GET", "/api/auth/me")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(profile_body(7, "Ada King"))
        .expect(1)
        .create_async()
        .await;
    harness
        .session
        .refresh_user()
        .await
        .expect("refresh_user should succeed");
    me_renamed.assert_async().await;
    assert_eq!(
        harness.session.snapshot().user.map(|u| u.full_name),
        Some("Ada King".to_string())
    );

    // A failing re-fetch propagates the error but keeps the stale profile.
    server
        .mock("GET", "/api/auth/me")
        .with_status(500)
        .create_async()
        .await;
    let err = harness
        .session
        .refresh_user()
        .await
        .expect_err("refresh_user should fail");
    assert_eq!(err.to_string(), "Failed to fetch user data");
    let state = harness.session.snapshot();
    assert!(state.is_authenticated());
    assert_eq!(state.user.map(|u| u.full_name), Some("Ada King".to_string()));
}
