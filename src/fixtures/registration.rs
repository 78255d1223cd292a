use crate::core::error::FixtureError;
use crate::fixtures::generator::{CredentialSource, RandomCredentials};
use crate::models::user::{User, UserStatus};
use crate::stores::user_store::UserStore;
use tracing::{debug, info};

/// Produces user fixtures and, when asked, registers them in a store.
///
/// `build_*` never touches the store, so the same construction serves
/// scenarios that need an unregistered user.
pub struct UserFactory<S, C = RandomCredentials> {
    store: S,
    credentials: C,
}

impl<S: UserStore> UserFactory<S, RandomCredentials> {
    pub fn new(store: S) -> Self {
        Self::with_credentials(store, RandomCredentials)
    }
}

impl<S: UserStore, C: CredentialSource> UserFactory<S, C> {
    pub fn with_credentials(store: S, credentials: C) -> Self {
        Self { store, credentials }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn generate_login(&self) -> String {
        self.credentials.login()
    }

    pub fn generate_password(&self) -> String {
        self.credentials.password()
    }

    pub fn build_user(&self, status: UserStatus) -> User {
        User::new(self.generate_login(), self.generate_password(), status)
    }

    /// Like `build_user`, for a status given as text (`"active"` / `"blocked"`)
    pub fn build_user_with_status(&self, status: &str) -> Result<User, FixtureError> {
        Ok(self.build_user(status.parse()?))
    }

    /// Store an already built user and hand it back
    pub async fn register(&self, user: User) -> Result<User, FixtureError> {
        self.store.put(user.clone()).await?;

        info!(login = %user.login, status = %user.status, "Registered user fixture");

        Ok(user)
    }

    pub async fn register_user(&self, status: UserStatus) -> Result<User, FixtureError> {
        let user = self.build_user(status);
        debug!(login = %user.login, status = %status, "Built user fixture");
        self.register(user).await
    }

    pub async fn register_user_with_status(&self, status: &str) -> Result<User, FixtureError> {
        self.register_user(status.parse()?).await
    }
}
