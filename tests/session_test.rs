//! Integration tests for login, logout, and stored-session verification.

use std::sync::Arc;

use complexapp_client::api::ApiClient;
use complexapp_client::auth;
use complexapp_client::config::Config;
use complexapp_client::session::{AVATAR_KEY, TOKEN_KEY, USERNAME_KEY};
use complexapp_client::storage::{FileStorage, KeyValueStore};
use complexapp_client::store::AppStore;
use complexapp_client::App;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn file_storage(temp_dir: &TempDir) -> Arc<FileStorage> {
    Arc::new(FileStorage::new(temp_dir.path().join("session.json")))
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({ "username": "alice", "password": "hunter2hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-alice",
            "username": "alice",
            "avatar": "https://gravatar.com/avatar/alice?s=128"
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_persists_and_restores_session() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let api = ApiClient::new(&server.uri()).unwrap();
    let store = AppStore::restore(file_storage(&temp_dir)).unwrap();
    assert!(!store.state().logged_in);

    assert!(auth::login(&api, &store, "alice", "hunter2hunter2").await.unwrap());
    let state = store.state();
    assert!(state.logged_in);
    assert_eq!(state.user.token, "tok-alice");
    assert_eq!(
        state.flash_messages,
        vec!["You have successfully logged in.".to_string()]
    );

    // A fresh store over the same file picks the session back up
    let storage = file_storage(&temp_dir);
    assert_eq!(storage.get_item(TOKEN_KEY).unwrap().as_deref(), Some("tok-alice"));
    let restored = AppStore::restore(storage).unwrap();
    assert!(restored.state().logged_in);
    assert_eq!(restored.state().user.username, "alice");
    assert!(restored.state().flash_messages.is_empty());
}

#[tokio::test]
async fn test_logout_clears_all_keys() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let api = ApiClient::new(&server.uri()).unwrap();
    let storage = file_storage(&temp_dir);
    let store = AppStore::restore(storage.clone()).unwrap();
    auth::login(&api, &store, "alice", "hunter2hunter2").await.unwrap();

    auth::logout(&store);
    assert!(!store.state().logged_in);
    for key in [TOKEN_KEY, USERNAME_KEY, AVATAR_KEY] {
        assert_eq!(storage.get_item(key).unwrap(), None, "{key} should be cleared");
    }
}

#[tokio::test]
async fn test_rejected_login_flashes_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(false))
        .expect(1)
        .mount(&server)
        .await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let api = ApiClient::new(&server.uri()).unwrap();
    let store = AppStore::restore(file_storage(&temp_dir)).unwrap();

    assert!(!auth::login(&api, &store, "alice", "wrong").await.unwrap());
    let state = store.state();
    assert!(!state.logged_in);
    assert_eq!(
        state.flash_messages,
        vec!["Invalid username / password.".to_string()]
    );
}

#[tokio::test]
async fn test_expired_token_logs_out() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/checkToken"))
        .and(body_json(json!({ "token": "tok-alice" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(false))
        .expect(1)
        .mount(&server)
        .await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let api = ApiClient::new(&server.uri()).unwrap();
    let storage = file_storage(&temp_dir);
    let store = AppStore::restore(storage.clone()).unwrap();
    auth::login(&api, &store, "alice", "hunter2hunter2").await.unwrap();

    assert!(!auth::verify_session(&api, &store).await.unwrap());
    let state = store.state();
    assert!(!state.logged_in);
    assert!(state
        .flash_messages
        .contains(&"Your session has expired. Please log in again.".to_string()));
    assert_eq!(storage.get_item(TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_valid_token_keeps_session_and_shows_feed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/checkToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(true))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/getHomeFeed"))
        .and(body_json(json!({ "token": "tok-alice" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let storage = file_storage(&temp_dir);
    storage.set_item(TOKEN_KEY, "tok-alice").unwrap();
    storage.set_item(USERNAME_KEY, "alice").unwrap();
    storage.set_item(AVATAR_KEY, "https://gravatar.com/avatar/alice?s=128").unwrap();

    let config = Config {
        api_base_url: server.uri(),
        storage_path: temp_dir.path().join("session.json"),
        ..Config::for_testing()
    };
    let app = App::new(config).unwrap();
    assert!(auth::verify_session(app.api(), app.store()).await.unwrap());

    let html = app.render_path("/").await.into_string();
    assert!(html.contains("<title>Your Feed | ComplexApp</title>"));
    assert!(html.contains("your feed is empty."));
    assert!(html.contains(r#"href="/profile/alice""#));
}
