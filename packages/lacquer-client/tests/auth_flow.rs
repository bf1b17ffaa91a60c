//! End-to-end auth flow against a local stub backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use lacquer_client::storage::{TOKEN_KEY, USERNAME_KEY, USER_ID_KEY};
use lacquer_client::{
    ApiConfig, LacquerClient, MemoryStorage, ProfileUpdate, Redirect, SessionStorage,
    StaticCaptcha,
};

async fn spawn_backend(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client_over(
    base_url: &str,
    storage: Arc<MemoryStorage>,
    captcha_token: &str,
) -> (LacquerClient, Arc<Mutex<Vec<Redirect>>>) {
    let client = LacquerClient::new(
        ApiConfig::default()
            .with_base_url(base_url)
            .with_timeout(Duration::from_secs(5)),
        storage,
        Arc::new(StaticCaptcha::new(captcha_token)),
    )
    .unwrap();

    let redirects: Arc<Mutex<Vec<Redirect>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = redirects.clone();
    let client = client.with_redirect_hook(Arc::new(move |target| {
        sink.lock().unwrap().push(target);
    }));
    (client, redirects)
}

fn login_router() -> Router {
    Router::new().route(
        "/auth/login",
        post(|Json(body): Json<Value>| async move {
            if body["email"] == "demo@example.com"
                && body["password"] == "password123"
                && body["recaptchaToken"] == "valid"
            {
                (
                    StatusCode::OK,
                    Json(json!({
                        "success": true,
                        "message": "Login successful",
                        "data": {"token": "tok123", "userId": "u1", "username": "DemoUser"}
                    })),
                )
            } else {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"success": false, "message": "Invalid email or password"})),
                )
            }
        }),
    )
}

#[tokio::test]
async fn successful_login_persists_the_triple() {
    let base = spawn_backend(login_router()).await;
    let storage = Arc::new(MemoryStorage::new());
    let (client, redirects) = client_over(&base, storage.clone(), "valid");
    client.bootstrap();

    assert!(client.login("demo@example.com", "password123").await);

    let state = client.state();
    assert!(state.is_authenticated());
    assert_eq!(state.token.as_deref(), Some("tok123"));
    assert_eq!(state.user_id.as_deref(), Some("u1"));
    assert_eq!(state.username.as_deref(), Some("DemoUser"));
    assert_eq!(state.error, None);
    assert!(!state.is_loading);

    assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("tok123"));
    assert_eq!(storage.get(USER_ID_KEY).unwrap().as_deref(), Some("u1"));
    assert_eq!(
        storage.get(USERNAME_KEY).unwrap().as_deref(),
        Some("DemoUser")
    );
    assert!(redirects.lock().unwrap().is_empty());
}

#[tokio::test]
async fn failed_login_leaves_storage_untouched() {
    let base = spawn_backend(login_router()).await;
    let storage = Arc::new(MemoryStorage::new());
    let (client, redirects) = client_over(&base, storage.clone(), "valid");
    client.bootstrap();

    assert!(!client.login("demo@example.com", "wrong-password").await);

    let state = client.state();
    assert!(!state.is_authenticated());
    assert!(state
        .error
        .as_deref()
        .unwrap()
        .contains("Invalid email or password"));
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    // A credential rejection is not a forced invalidation.
    assert!(redirects.lock().unwrap().is_empty());
}

#[tokio::test]
async fn login_then_restart_reproduces_the_session() {
    let base = spawn_backend(login_router()).await;
    let storage = Arc::new(MemoryStorage::new());
    let (client, _) = client_over(&base, storage.clone(), "valid");
    client.bootstrap();
    assert!(client.login("demo@example.com", "password123").await);

    // Fresh client over the same storage, as after a process restart.
    let (restarted, _) = client_over(&base, storage, "valid");
    restarted.bootstrap();
    let state = restarted.state();
    assert!(state.is_authenticated());
    assert_eq!(state.token.as_deref(), Some("tok123"));
    assert_eq!(state.username.as_deref(), Some("DemoUser"));
}

#[tokio::test]
async fn missing_captcha_token_is_rejected_before_the_network_call() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let app = Router::new().route(
        "/auth/login",
        post(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Json(json!({"success": true, "message": "should never happen"}))
            }
        }),
    );
    let base = spawn_backend(app).await;
    let (client, _) = client_over(&base, Arc::new(MemoryStorage::new()), "");
    client.bootstrap();

    assert!(!client.login("demo@example.com", "password123").await);
    let state = client.state();
    assert!(state
        .error
        .as_deref()
        .unwrap()
        .contains("bot-verification token"));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn receiving_401_clears_storage_and_redirects() {
    let app = Router::new().route(
        "/tag",
        get(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"success": false, "message": "Unauthorized"})),
            )
        }),
    );
    let base = spawn_backend(app).await;
    let storage = Arc::new(MemoryStorage::new());
    storage.set(TOKEN_KEY, "stale-token").unwrap();
    storage.set(USER_ID_KEY, "u1").unwrap();
    storage.set(USERNAME_KEY, "DemoUser").unwrap();

    let (client, redirects) = client_over(&base, storage.clone(), "valid");
    client.bootstrap();
    assert!(client.state().is_authenticated());

    let err = client.list_tags().await.unwrap_err();
    assert!(matches!(err, lacquer_client::ApiError::Unauthorized));

    assert!(!client.state().is_authenticated());
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(storage.get(USER_ID_KEY).unwrap(), None);
    assert_eq!(storage.get(USERNAME_KEY).unwrap(), None);
    assert_eq!(
        *redirects.lock().unwrap(),
        vec![Redirect::LoginSessionExpired]
    );
}

#[tokio::test]
async fn call_without_stored_token_is_still_attempted() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let app = Router::new().route(
        "/tag",
        get(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"success": false, "message": "Unauthorized"})),
                )
            }
        }),
    );
    let base = spawn_backend(app).await;
    let (client, redirects) = client_over(&base, Arc::new(MemoryStorage::new()), "valid");
    client.bootstrap();

    let err = client.list_tags().await.unwrap_err();
    assert!(matches!(err, lacquer_client::ApiError::Unauthorized));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(
        *redirects.lock().unwrap(),
        vec![Redirect::LoginSessionExpired]
    );
}

#[tokio::test]
async fn logout_is_idempotent_and_redirects_to_login() {
    let base = spawn_backend(login_router()).await;
    let storage = Arc::new(MemoryStorage::new());
    let (client, redirects) = client_over(&base, storage.clone(), "valid");
    client.bootstrap();
    assert!(client.login("demo@example.com", "password123").await);

    client.logout();
    client.logout();

    assert!(!client.state().is_authenticated());
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(storage.get(USER_ID_KEY).unwrap(), None);
    assert_eq!(storage.get(USERNAME_KEY).unwrap(), None);
    assert_eq!(
        *redirects.lock().unwrap(),
        vec![Redirect::Login, Redirect::Login]
    );
}

fn profile_router() -> Router {
    Router::new().route(
        "/auth/profile",
        get(|headers: axum::http::HeaderMap| async move {
            if headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(|v| v.starts_with("Bearer "))
                != Some(true)
            {
                return (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"success": false, "message": "Unauthorized"})),
                );
            }
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "message": "Profile retrieved successfully",
                    "data": {
                        "_id": "u1",
                        "username": "DemoUser",
                        "email": "demo@example.com",
                        "about": "Learning Vietnamese",
                        "authProvider": "local",
                        "googleId": null,
                        "avatar": "",
                        "badges": [],
                        "friendships": [],
                        "createdAt": "2025-05-16T09:33:18.263Z",
                        "updatedAt": "2025-05-16T09:33:18.263Z"
                    }
                })),
            )
        })
        .put(|Json(body): Json<Value>| async move {
            let username = body
                .get("username")
                .and_then(|v| v.as_str())
                .unwrap_or("DemoUser")
                .to_string();
            let about = body
                .get("about")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "message": "Profile updated successfully",
                    "data": {
                        "_id": "u1",
                        "username": username,
                        "email": "demo@example.com",
                        "about": about,
                        "authProvider": "local",
                        "googleId": null,
                        "avatar": "",
                        "createdAt": "2025-05-16T09:33:18.263Z",
                        "updatedAt": "2025-05-16T09:33:18.263Z"
                    }
                })),
            )
        }),
    )
}

#[tokio::test]
async fn get_profile_decodes_the_full_profile() {
    let base = spawn_backend(profile_router()).await;
    let storage = Arc::new(MemoryStorage::new());
    storage.set(TOKEN_KEY, "tok123").unwrap();
    storage.set(USER_ID_KEY, "u1").unwrap();
    storage.set(USERNAME_KEY, "DemoUser").unwrap();

    let (client, redirects) = client_over(&base, storage, "valid");
    client.bootstrap();

    let profile = client.get_profile().await.unwrap();
    assert_eq!(profile.id, "u1");
    assert_eq!(profile.username, "DemoUser");
    assert_eq!(profile.email, "demo@example.com");
    assert_eq!(profile.about, "Learning Vietnamese");
    assert_eq!(profile.auth_provider, lacquer_client::AuthProvider::Local);
    assert_eq!(profile.google_id, None);
    assert!(profile.badges.is_empty());
    assert!(redirects.lock().unwrap().is_empty());
}

#[tokio::test]
async fn username_update_syncs_session_and_storage() {
    let base = spawn_backend(profile_router()).await;
    let storage = Arc::new(MemoryStorage::new());
    storage.set(TOKEN_KEY, "tok123").unwrap();
    storage.set(USER_ID_KEY, "u1").unwrap();
    storage.set(USERNAME_KEY, "DemoUser").unwrap();

    let (client, _) = client_over(&base, storage.clone(), "valid");
    client.bootstrap();

    let profile = client
        .update_profile(ProfileUpdate {
            username: Some("NewName".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(profile.username, "NewName");
    assert_eq!(client.state().username.as_deref(), Some("NewName"));
    assert_eq!(
        storage.get(USERNAME_KEY).unwrap().as_deref(),
        Some("NewName")
    );
}

#[tokio::test]
async fn about_only_update_leaves_username_alone() {
    let base = spawn_backend(profile_router()).await;
    let storage = Arc::new(MemoryStorage::new());
    storage.set(TOKEN_KEY, "tok123").unwrap();
    storage.set(USER_ID_KEY, "u1").unwrap();
    storage.set(USERNAME_KEY, "DemoUser").unwrap();

    let (client, _) = client_over(&base, storage.clone(), "valid");
    client.bootstrap();

    let profile = client
        .update_profile(ProfileUpdate {
            about: Some("Learning Vietnamese".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(profile.about, "Learning Vietnamese");
    assert_eq!(client.state().username.as_deref(), Some("DemoUser"));
    assert_eq!(
        storage.get(USERNAME_KEY).unwrap().as_deref(),
        Some("DemoUser")
    );
}

#[tokio::test]
async fn profile_ops_return_none_when_unauthenticated() {
    let base = spawn_backend(profile_router()).await;
    let (client, _) = client_over(&base, Arc::new(MemoryStorage::new()), "valid");
    client.bootstrap();

    assert!(client.get_profile().await.is_none());
    assert!(client
        .update_profile(ProfileUpdate {
            about: Some("x".into()),
            ..Default::default()
        })
        .await
        .is_none());
}

#[tokio::test]
async fn signup_reports_the_server_message_without_authenticating() {
    let app = Router::new().route(
        "/auth/register",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["recaptchaToken"], "valid");
            Json(json!({
                "success": true,
                "message": "Account created. Please verify your email."
            }))
        }),
    );
    let base = spawn_backend(app).await;
    let storage = Arc::new(MemoryStorage::new());
    let (client, _) = client_over(&base, storage.clone(), "valid");
    client.bootstrap();

    let outcome = client
        .signup("DemoUser", "demo@example.com", "password123")
        .await;
    assert!(outcome.success);
    assert_eq!(outcome.message, "Account created. Please verify your email.");
    assert!(!client.state().is_authenticated());
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn resend_verification_surfaces_failures() {
    let app = Router::new().route(
        "/auth/resend",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"success": false, "message": "Email already verified"})),
            )
        }),
    );
    let base = spawn_backend(app).await;
    let (client, _) = client_over(&base, Arc::new(MemoryStorage::new()), "valid");
    client.bootstrap();

    let outcome = client.resend_verification("demo@example.com").await;
    assert!(!outcome.success);
    assert!(outcome.message.contains("Email already verified"));
    assert_eq!(client.state().error, Some(outcome.message));
}
