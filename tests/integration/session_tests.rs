use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use linkup_client::api_client::ApiError;
use linkup_client::models::UserPatch;
use linkup_client::session_manager::{AuthError, SessionState, OFFLINE_GUEST_ID};

use super::test_utils::{manager_for, profile_store_in, user_json};

#[tokio::test]
async fn login_without_bridge_signs_in_with_empty_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/auth"))
        .and(body_json(serde_json::json!({"initData": ""})))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("g1", "Guest")))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let manager = manager_for(&server.uri(), &dir, None, &[]);
    assert_eq!(manager.initialize(), SessionState::Unauthenticated);

    let user = manager.login().await.expect("login should succeed");
    assert_eq!(user.id, "g1");
    assert!(manager.state().is_authenticated());
}

#[tokio::test]
async fn login_then_update_keeps_the_backend_identity() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/auth"))
        .and(body_json(serde_json::json!({"initData": "abc123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("u1", "Ann")))
        .expect(1)
        .mount(&server)
        .await;

    let mut updated = user_json("u1", "Ann");
    updated["bio"] = "hi".into();
    Mock::given(method("PUT"))
        .and(path("/users/u1"))
        .and(body_json(serde_json::json!({"bio": "hi"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(updated))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let manager = manager_for(&server.uri(), &dir, Some("abc123"), &[]);
    manager.initialize();

    let user = manager.login().await.expect("login should succeed");
    assert_eq!(user.id, "u1");
    assert_eq!(user.name, "Ann");

    let patch = UserPatch {
        bio: Some("hi".to_string()),
        ..Default::default()
    };
    let user = manager.update_user(&patch).await.expect("update should succeed");
    assert_eq!(user.id, "u1");
    assert_eq!(user.bio.as_deref(), Some("hi"));

    // the merged record is what later runs will restore
    let stored = profile_store_in(&dir).load().expect("profile should be cached");
    assert_eq!(stored.bio.as_deref(), Some("hi"));
}

#[tokio::test]
async fn backend_failure_falls_back_to_the_offline_guest() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/auth"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let manager = manager_for(&server.uri(), &dir, Some("abc123"), &[]);
    manager.initialize();

    let user = manager.login().await.expect("fallback should still sign in");
    assert_eq!(user.id, OFFLINE_GUEST_ID);
    assert!(manager.state().is_authenticated());

    // the guest identity is persisted like any other session
    let stored = profile_store_in(&dir).load().expect("guest should be cached");
    assert_eq!(stored.id, OFFLINE_GUEST_ID);
}

#[tokio::test]
async fn strict_policy_surfaces_the_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/auth"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let manager = manager_for(
        &server.uri(),
        &dir,
        Some("abc123"),
        &[("LINKUP_GUEST_FALLBACK", "off")],
    );
    manager.initialize();

    let err = manager.login().await.expect_err("strict mode should fail");
    assert!(matches!(
        err,
        AuthError::Api(ApiError::Status { status: 500, .. })
    ));
    assert_eq!(manager.state(), SessionState::Unauthenticated);
    assert!(profile_store_in(&dir).load().is_none());
}

#[tokio::test]
async fn corrupt_cache_is_ignored_on_startup() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("profile.json"), "{definitely not json").unwrap();

    let server = MockServer::start().await;
    let manager = manager_for(&server.uri(), &dir, None, &[]);
    assert_eq!(manager.initialize(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn concurrent_logins_share_one_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("u1", "Ann")))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let manager = manager_for(&server.uri(), &dir, Some("abc123"), &[]);
    manager.initialize();

    let (first, second) = tokio::join!(manager.login(), manager.login());
    assert_eq!(first.expect("first login").id, "u1");
    assert_eq!(second.expect("second login").id, "u1");
    // the expect(1) above verifies only one request went out
}

#[tokio::test]
async fn restored_session_skips_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("u9", "Ghost")))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let stored: linkup_client::models::UserRecord =
        serde_json::from_value(user_json("u1", "Ann")).unwrap();
    profile_store_in(&dir).save(&stored).unwrap();

    let manager = manager_for(&server.uri(), &dir, Some("abc123"), &[]);
    manager.initialize();

    let user = manager.login().await.expect("restored login");
    assert_eq!(user.id, "u1");
}

#[tokio::test]
async fn missing_init_data_fails_locally_when_required() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("u1", "Ann")))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let manager = manager_for(
        &server.uri(),
        &dir,
        None,
        &[("LINKUP_REQUIRE_INIT_DATA", "1")],
    );
    manager.initialize();

    let err = manager.login().await.expect_err("login must refuse");
    assert!(matches!(err, AuthError::MissingInitData));
    assert_eq!(manager.state(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn update_without_session_never_touches_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path_regex("^/users/.*$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("u1", "Ann")))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let manager = manager_for(&server.uri(), &dir, Some("abc123"), &[]);
    manager.initialize();

    let patch = UserPatch {
        bio: Some("hi".to_string()),
        ..Default::default()
    };
    let err = manager.update_user(&patch).await.expect_err("no session");
    assert!(matches!(err, AuthError::NoSession));
}

#[tokio::test]
async fn offline_guest_edits_merge_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/auth"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path_regex("^/users/.*$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("u1", "Ann")))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let manager = manager_for(&server.uri(), &dir, Some("abc123"), &[]);
    manager.initialize();

    let guest = manager.login().await.expect("fallback login");
    assert_eq!(guest.id, OFFLINE_GUEST_ID);

    let patch = UserPatch {
        bio: Some("written while offline".to_string()),
        ..Default::default()
    };
    let updated = manager.update_user(&patch).await.expect("local merge");
    assert_eq!(updated.id, OFFLINE_GUEST_ID);
    assert_eq!(updated.bio.as_deref(), Some("written while offline"));

    let stored = profile_store_in(&dir).load().expect("cached guest");
    assert_eq!(stored.bio.as_deref(), Some("written while offline"));
}

#[tokio::test]
async fn force_reauth_replaces_the_cached_identity() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("u2", "Fresh")))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let stale: linkup_client::models::UserRecord =
        serde_json::from_value(user_json("u1", "Stale")).unwrap();
    profile_store_in(&dir).save(&stale).unwrap();

    let manager = manager_for(&server.uri(), &dir, Some("abc123"), &[]);
    assert!(manager.initialize().is_authenticated());

    let user = manager.force_reauth().await.expect("reauth");
    assert_eq!(user.id, "u2");
    assert_eq!(profile_store_in(&dir).load().expect("cached").id, "u2");
}

#[tokio::test]
async fn logout_then_login_signs_in_again() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("u1", "Ann")))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let stored: linkup_client::models::UserRecord =
        serde_json::from_value(user_json("u1", "Ann")).unwrap();
    profile_store_in(&dir).save(&stored).unwrap();

    let manager = manager_for(&server.uri(), &dir, Some("abc123"), &[]);
    manager.initialize();
    manager.logout();
    assert_eq!(manager.state(), SessionState::Unauthenticated);
    assert!(profile_store_in(&dir).load().is_none());

    let user = manager.login().await.expect("second login");
    assert_eq!(user.id, "u1");
}
