//! Persisted login session.
//!
//! The session lives in three storage keys that are written and cleared
//! together. A stored token is what makes a restored session count as logged in.

use serde::{Deserialize, Serialize};

use crate::storage::{KeyValueStore, StorageError};

pub const TOKEN_KEY: &str = "token";
pub const USERNAME_KEY: &str = "username";
pub const AVATAR_KEY: &str = "avatar";

/// The authenticated user as returned by `/login` and `/register`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub token: String,
    pub username: String,
    pub avatar: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub logged_in: bool,
    pub user: User,
}

impl Session {
    /// Rebuild the session from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn restore(storage: &dyn KeyValueStore) -> Result<Self, StorageError> {
        let token = storage.get_item(TOKEN_KEY)?;
        let username = storage.get_item(USERNAME_KEY)?.unwrap_or_default();
        let avatar = storage.get_item(AVATAR_KEY)?.unwrap_or_default();

        Ok(Self {
            logged_in: token.as_deref().is_some_and(|t| !t.is_empty()),
            user: User {
                token: token.unwrap_or_default(),
                username,
                avatar,
            },
        })
    }

    /// Write all three keys when logged in, remove all three otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn persist(&self, storage: &dyn KeyValueStore) -> Result<(), StorageError> {
        if self.logged_in {
            storage.set_item(TOKEN_KEY, &self.user.token)?;
            storage.set_item(USERNAME_KEY, &self.user.username)?;
            storage.set_item(AVATAR_KEY, &self.user.avatar)?;
        } else {
            storage.remove_item(TOKEN_KEY)?;
            storage.remove_item(USERNAME_KEY)?;
            storage.remove_item(AVATAR_KEY)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn sample_user() -> User {
        User {
            token: "t".to_string(),
            username: "u".to_string(),
            avatar: "a".to_string(),
        }
    }

    #[test]
    fn test_restore_empty_storage() {
        let storage = MemoryStorage::new();
        let session = Session::restore(&storage).unwrap();
        assert!(!session.logged_in);
        assert_eq!(session.user, User::default());
    }

    #[test]
    fn test_persist_then_restore() {
        let storage = MemoryStorage::new();
        let session = Session {
            logged_in: true,
            user: sample_user(),
        };
        session.persist(&storage).unwrap();

        assert_eq!(Session::restore(&storage).unwrap(), session);
    }

    #[test]
    fn test_persist_logged_out_clears_all_keys() {
        let storage = MemoryStorage::new();
        Session {
            logged_in: true,
            user: sample_user(),
        }
        .persist(&storage)
        .unwrap();

        Session::default().persist(&storage).unwrap();
        assert!(storage.is_empty());
    }
}
