use crate::core::error::FixtureError;
use crate::models::user::User;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

/// Registry of users keyed by login.
///
/// Append-only: a login, once stored, is never replaced.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Store a user, failing with `DuplicateUser` if the login is taken
    async fn put(&self, user: User) -> Result<(), FixtureError>;

    async fn get(&self, login: &str) -> Result<Option<User>, FixtureError>;
}

#[async_trait]
impl<T: UserStore + ?Sized> UserStore for Arc<T> {
    async fn put(&self, user: User) -> Result<(), FixtureError> {
        (**self).put(user).await
    }

    async fn get(&self, login: &str) -> Result<Option<User>, FixtureError> {
        (**self).get(login).await
    }
}

/// In-memory user registry, safe for concurrent inserts
pub struct InMemoryUserStore {
    users: DashMap<String, Arc<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
        }
    }

    /// Insert a user unless its login is already present
    pub fn insert(&self, user: User) -> Result<Arc<User>, FixtureError> {
        match self.users.entry(user.login.clone()) {
            Entry::Occupied(entry) => Err(FixtureError::DuplicateUser(entry.key().clone())),
            Entry::Vacant(entry) => {
                let user = Arc::new(user);
                entry.insert(Arc::clone(&user));
                Ok(user)
            }
        }
    }

    pub fn get_user(&self, login: &str) -> Option<Arc<User>> {
        self.users.get(login).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, login: &str) -> bool {
        self.users.contains_key(login)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn put(&self, user: User) -> Result<(), FixtureError> {
        self.insert(user).map(|_| ())
    }

    async fn get(&self, login: &str) -> Result<Option<User>, FixtureError> {
        Ok(self.get_user(login).map(|user| (*user).clone()))
    }
}
