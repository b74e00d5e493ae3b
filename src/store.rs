//! Global application state shared by every page.
//!
//! `AppStore` is passed explicitly to page controllers. All mutations go
//! through [`AppStore::dispatch`], which applies the pure [`reduce`] function
//! and then synchronizes the persisted session whenever `logged_in` flips.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error};

use crate::session::{Session, User};
use crate::storage::{KeyValueStore, StorageError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub logged_in: bool,
    pub user: User,
    pub flash_messages: Vec<String>,
    pub is_search_open: bool,
    pub is_chat_open: bool,
    pub unread_chat_count: u32,
}

impl AppState {
    #[must_use]
    pub fn from_session(session: Session) -> Self {
        Self {
            logged_in: session.logged_in,
            user: session.user,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn session(&self) -> Session {
        Session {
            logged_in: self.logged_in,
            user: self.user.clone(),
        }
    }

    /// Whether `username` is the logged-in viewer.
    #[must_use]
    pub fn is_viewer(&self, username: &str) -> bool {
        self.logged_in && self.user.username == username
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Login(User),
    Logout,
    FlashMessage(String),
    SearchOpened,
    SearchClosed,
    ChatToggled,
    ChatClosed,
    UnreadChatCountIncremented,
    UnreadChatCountReset,
}

/// Apply one action to the global state.
#[must_use]
pub fn reduce(mut state: AppState, action: AppAction) -> AppState {
    match action {
        AppAction::Login(user) => {
            state.logged_in = true;
            state.user = user;
        }
        // The user record stays; storage is cleared by the session sync
        AppAction::Logout => state.logged_in = false,
        AppAction::FlashMessage(message) => state.flash_messages.push(message),
        AppAction::SearchOpened => state.is_search_open = true,
        AppAction::SearchClosed => state.is_search_open = false,
        AppAction::ChatToggled => state.is_chat_open = !state.is_chat_open,
        AppAction::ChatClosed => state.is_chat_open = false,
        AppAction::UnreadChatCountIncremented => {
            state.unread_chat_count = state.unread_chat_count.saturating_add(1);
        }
        AppAction::UnreadChatCountReset => state.unread_chat_count = 0,
    }
    state
}

struct StoreInner {
    state: watch::Sender<AppState>,
    storage: Arc<dyn KeyValueStore>,
}

/// Cloneable handle to the global state.
#[derive(Clone)]
pub struct AppStore {
    inner: Arc<StoreInner>,
}

impl std::fmt::Debug for AppStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppStore")
            .field("state", &*self.inner.state.borrow())
            .finish_non_exhaustive()
    }
}

impl AppStore {
    /// Create a store with the given initial state.
    ///
    /// The session sync runs once immediately so storage matches `initial`.
    #[must_use]
    pub fn new(initial: AppState, storage: Arc<dyn KeyValueStore>) -> Self {
        let session = initial.session();
        let (state, _) = watch::channel(initial);
        let store = Self {
            inner: Arc::new(StoreInner { state, storage }),
        };
        store.sync_session(&session);
        store
    }

    /// Create a store from whatever session is persisted in `storage`.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn restore(storage: Arc<dyn KeyValueStore>) -> Result<Self, StorageError> {
        let session = Session::restore(storage.as_ref())?;
        debug!(logged_in = session.logged_in, "Session restored");
        Ok(Self::new(AppState::from_session(session), storage))
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> AppState {
        self.inner.state.borrow().clone()
    }

    /// Receive every subsequent state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.inner.state.subscribe()
    }

    /// The single mutation entry point for global state.
    pub fn dispatch(&self, action: AppAction) {
        debug!(action = ?action, "Global action");
        let mut changed_session = None;
        self.inner.state.send_modify(|state| {
            let was_logged_in = state.logged_in;
            let next = reduce(std::mem::take(state), action);
            if next.logged_in != was_logged_in {
                changed_session = Some(next.session());
            }
            *state = next;
        });

        if let Some(session) = changed_session {
            self.sync_session(&session);
        }
    }

    /// Convenience for `dispatch(AppAction::FlashMessage(..))`.
    pub fn flash(&self, message: impl Into<String>) {
        self.dispatch(AppAction::FlashMessage(message.into()));
    }

    fn sync_session(&self, session: &Session) {
        if let Err(e) = session.persist(self.inner.storage.as_ref()) {
            error!(logged_in = session.logged_in, "Failed to sync session storage: {e}");
        }
    }
}
