mod helpers;

use std::sync::Arc;

use helpers::*;
use hostel_console::models::{Role, UserPatch};
use hostel_console::services::SessionService;
use hostel_console::token_store::{MemoryTokenStore, TokenStore};

fn session_over(base: &str, store: Arc<MemoryTokenStore>, local_admin: bool) -> SessionService {
    SessionService::new(Arc::new(gateway(base, store, local_admin)))
}

#[tokio::test]
async fn test_fresh_session_is_loading_until_initialized() {
    let base = unreachable_base_url().await;
    let session = session_over(&base, Arc::new(MemoryTokenStore::new()), false);

    assert!(session.is_loading().await);
    session.initialize().await;
    assert!(!session.is_loading().await);
    assert!(!session.is_authenticated().await);
}

#[tokio::test]
async fn test_initialize_restores_user_from_token() {
    let body = serde_json::json!({
        "success": true,
        "data": { "user": user_json("hostel_admin", Some(4)) },
    })
    .to_string();
    let (base, _server) = one_shot_server(200, "OK", &body).await;

    let store = Arc::new(MemoryTokenStore::with_token("tok-live"));
    let session = session_over(&base, store, false);

    session.initialize().await;
    let user = session.current_user().await.unwrap();
    assert_eq!(user.role, Role::HostelAdmin);
    assert!(session.is_authenticated().await);
    assert!(!session.is_loading().await);
}

#[tokio::test]
async fn test_initialize_swallows_network_failure() {
    let base = unreachable_base_url().await;
    let store = Arc::new(MemoryTokenStore::with_token("tok-keep"));
    let session = session_over(&base, store.clone(), false);

    // Must not panic or propagate; resolves to unauthenticated
    session.initialize().await;
    assert!(!session.is_authenticated().await);
    assert!(!session.is_loading().await);
    // And the token survives transient failures
    assert_eq!(store.load_token().as_deref(), Some("tok-keep"));
}

#[tokio::test]
async fn test_login_success_authenticates_session() {
    let body = serde_json::json!({
        "success": true,
        "token": "tok-s",
        "user": user_json("custodian", Some(2)),
    })
    .to_string();
    let (base, _server) = one_shot_server(200, "OK", &body).await;

    let session = session_over(&base, Arc::new(MemoryTokenStore::new()), false);
    let user = session.login("operator", "secret", None).await.unwrap();

    assert_eq!(user.role, Role::Custodian);
    assert!(session.is_authenticated().await);
    assert!(!session.is_loading().await);
}

#[tokio::test]
async fn test_login_failure_propagates_and_leaves_session_unauthenticated() {
    let body = r#"{"success": false, "message": "Invalid credentials"}"#;
    let (base, _server) = one_shot_server(200, "OK", body).await;

    let session = session_over(&base, Arc::new(MemoryTokenStore::new()), false);
    let err = session.login("operator", "wrong", None).await.unwrap_err();

    assert!(err.to_string().contains("Invalid credentials"));
    assert!(!session.is_authenticated().await);
    assert!(!session.is_loading().await);
}

#[tokio::test]
async fn test_update_user_merges_into_current_user() {
    let base = unreachable_base_url().await;
    let store = Arc::new(MemoryTokenStore::new());
    let session = session_over(&base, store, true);

    session.login("matthew", "1100211Matt.", None).await.unwrap();
    session
        .update_user(UserPatch {
            name: Some("Renamed".to_string()),
            ..Default::default()
        })
        .await;

    let user = session.current_user().await.unwrap();
    assert_eq!(user.name, "Renamed");
    assert_eq!(user.role, Role::SuperAdmin);
}

#[tokio::test]
async fn test_update_user_is_noop_when_unauthenticated() {
    let base = unreachable_base_url().await;
    let session = session_over(&base, Arc::new(MemoryTokenStore::new()), false);
    session.initialize().await;

    session
        .update_user(UserPatch {
            name: Some("Ghost".to_string()),
            ..Default::default()
        })
        .await;

    assert!(session.current_user().await.is_none());
}

#[tokio::test]
async fn test_logout_resets_to_app_start_state() {
    let base = unreachable_base_url().await;
    let store = Arc::new(MemoryTokenStore::new());
    let session = session_over(&base, store.clone(), true);

    session.login("matthew", "1100211Matt.", None).await.unwrap();
    assert!(session.is_authenticated().await);

    session.logout().await;

    assert!(!session.is_authenticated().await);
    assert_eq!(store.load_token(), None);
    // Pristine state: a fresh resolution is pending again
    assert!(session.is_loading().await);
}
