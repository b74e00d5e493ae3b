//! Header sign-in, sign-out, and startup token verification.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::store::{AppAction, AppStore};

/// Sign in from the header form.
///
/// Returns whether the credentials were accepted. A rejection is reported to
/// the user as a flash message, not as an error.
///
/// # Errors
///
/// Returns a validation error for a blank field, or the request error.
pub async fn login(
    api: &ApiClient,
    store: &AppStore,
    username: &str,
    password: &str,
) -> Result<bool, ClientError> {
    if username.trim().is_empty() {
        return Err(ClientError::validation("username", "Username is required."));
    }
    if password.is_empty() {
        return Err(ClientError::validation("password", "Password is required."));
    }

    let cancel = CancellationToken::new();
    match api.login(username, password, &cancel).await? {
        Some(user) => {
            info!(username = %user.username, "Logged in");
            store.dispatch(AppAction::Login(user));
            store.flash("You have successfully logged in.");
            Ok(true)
        }
        None => {
            info!(username = %username, "Login rejected");
            store.flash("Invalid username / password.");
            Ok(false)
        }
    }
}

/// Sign out and clear the persisted session.
pub fn logout(store: &AppStore) {
    store.dispatch(AppAction::Logout);
    store.flash("You have successfully logged out.");
}

/// Ask the server whether the restored token is still valid.
///
/// An expired token logs the user out. Returns whether a session is active
/// afterwards.
///
/// # Errors
///
/// Returns the request error; the session is left untouched in that case.
pub async fn verify_session(api: &ApiClient, store: &AppStore) -> Result<bool, ClientError> {
    let state = store.state();
    if !state.logged_in {
        return Ok(false);
    }

    let cancel = CancellationToken::new();
    if api.check_token(&state.user.token, &cancel).await? {
        return Ok(true);
    }

    warn!(username = %state.user.username, "Stored token rejected");
    store.dispatch(AppAction::Logout);
    store.flash("Your session has expired. Please log in again.");
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::storage::MemoryStorage;
    use crate::store::AppState;

    #[tokio::test]
    async fn test_login_rejects_blank_fields_without_request() {
        let api = ApiClient::new("http://127.0.0.1:9").unwrap();
        let store = AppStore::new(AppState::default(), Arc::new(MemoryStorage::new()));

        let err = login(&api, &store, "  ", "secret").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation { ref field, .. } if field == "username"));
        let err = login(&api, &store, "alice", "").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation { ref field, .. } if field == "password"));
        assert!(store.state().flash_messages.is_empty());
    }

    #[tokio::test]
    async fn test_verify_session_skips_when_logged_out() {
        let api = ApiClient::new("http://127.0.0.1:9").unwrap();
        let store = AppStore::new(AppState::default(), Arc::new(MemoryStorage::new()));
        assert!(!verify_session(&api, &store).await.unwrap());
    }

    #[test]
    fn test_logout_flashes() {
        let store = AppStore::new(AppState::default(), Arc::new(MemoryStorage::new()));
        logout(&store);
        assert_eq!(
            store.state().flash_messages,
            vec!["You have successfully logged out.".to_string()]
        );
    }
}
