//! Users who can log in.
//!
//! There are no passwords: knowing a username is enough to log in as that user.
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sigil::config::UserConfig;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("user \"{username}\" (id {id}) already exists")]
    UserExists { id: i64, username: String },
}

/// A user, as returned to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
}

impl User {
    pub fn new(id: i64, username: impl ToString) -> Self {
        Self {
            id,
            username: username.to_string(),
        }
    }
}

impl From<&UserConfig> for User {
    fn from(user: &UserConfig) -> Self {
        Self::new(user.id, &user.username)
    }
}

/// User lookup used by the controllers.
pub trait UserStore: Send + Sync {
    /// Find a user by exact username.
    fn find_by_username(&self, username: &str) -> Option<User>;

    /// Find a user by ID.
    fn find(&self, id: i64) -> Option<User>;
}

/// In-memory user store.
#[derive(Default, Debug)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default, Debug)]
struct Inner {
    by_id: HashMap<i64, User>,
    by_username: HashMap<String, i64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the store from the users in the config file.
    pub fn from_config(users: &[UserConfig]) -> Result<Self, Error> {
        let store = Self::new();

        for user in users {
            store.insert(user.into())?;
        }

        Ok(store)
    }

    /// Add a user. IDs and usernames must be unique.
    pub fn insert(&self, user: User) -> Result<(), Error> {
        let mut inner = self.inner.write();

        if inner.by_id.contains_key(&user.id) || inner.by_username.contains_key(&user.username) {
            return Err(Error::UserExists {
                id: user.id,
                username: user.username,
            });
        }

        inner.by_username.insert(user.username.clone(), user.id);
        inner.by_id.insert(user.id, user);

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.inner.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl UserStore for MemoryStore {
    fn find_by_username(&self, username: &str) -> Option<User> {
        let inner = self.inner.read();
        inner
            .by_username
            .get(username)
            .and_then(|id| inner.by_id.get(id))
            .cloned()
    }

    fn find(&self, id: i64) -> Option<User> {
        self.inner.read().by_id.get(&id).cloned()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_find() {
        let store = MemoryStore::from_config(&[
            UserConfig {
                id: 1,
                username: "ada".into(),
            },
            UserConfig {
                id: 2,
                username: "grace".into(),
            },
        ])
        .unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.find_by_username("ada"), Some(User::new(1, "ada")));
        assert_eq!(store.find(2), Some(User::new(2, "grace")));
        assert_eq!(store.find_by_username("Ada"), None);
        assert_eq!(store.find(3), None);
    }

    #[test]
    fn test_duplicates() {
        let store = MemoryStore::new();
        store.insert(User::new(1, "ada")).unwrap();

        assert_eq!(
            store.insert(User::new(1, "grace")),
            Err(Error::UserExists {
                id: 1,
                username: "grace".into()
            })
        );
        assert!(store.insert(User::new(2, "ada")).is_err());
        assert_eq!(store.find_by_username("grace"), None);
        assert_eq!(store.len(), 1);
    }
}
