use crate::core::error::FixtureError;
use crate::models::auth::{ErrorResponse, RegistrationRequest};
use crate::models::user::User;
use crate::stores::user_store::UserStore;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

/// Error code the app answers with for a status it does not know
const INVALID_STATUS_CODE: &str = "INVALID_STATUS";

/// `UserStore` backed by the login app's test-mode REST API
pub struct HttpUserStore {
    client: reqwest::Client,
    users_url: String,
}

impl HttpUserStore {
    pub fn new(base_url: &str) -> Result<Self, FixtureError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| FixtureError::Store(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            users_url: format!("{}/api/system/users", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl UserStore for HttpUserStore {
    async fn put(&self, user: User) -> Result<(), FixtureError> {
        let body = RegistrationRequest {
            login: user.login.clone(),
            password: user.password,
            status: user.status.to_string(),
        };

        let response = self
            .client
            .post(&self.users_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| FixtureError::Store(format!("Failed to send registration request: {}", e)))?;

        match response.status() {
            status if status.is_success() => {
                debug!(login = %user.login, "User registered through test-mode API");
                Ok(())
            }
            StatusCode::CONFLICT => Err(FixtureError::DuplicateUser(user.login)),
            status => {
                let error = response.json::<ErrorResponse>().await.ok();
                match error {
                    Some(error) if error.code == INVALID_STATUS_CODE => {
                        Err(FixtureError::InvalidStatus(body.status))
                    }
                    Some(error) => Err(FixtureError::Store(format!(
                        "Registration rejected with status {} ({}): {}",
                        status, error.code, error.error
                    ))),
                    None => Err(FixtureError::Store(format!(
                        "Registration returned error status: {}",
                        status
                    ))),
                }
            }
        }
    }

    async fn get(&self, login: &str) -> Result<Option<User>, FixtureError> {
        let response = self
            .client
            .get(&self.users_url)
            .query(&[("login", login)])
            .send()
            .await
            .map_err(|e| FixtureError::Store(format!("Failed to send lookup request: {}", e)))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let user = response
                    .json::<User>()
                    .await
                    .map_err(|e| FixtureError::Store(format!("Failed to parse user JSON: {}", e)))?;
                Ok(Some(user))
            }
            status => Err(FixtureError::Store(format!(
                "Lookup returned error status: {}",
                status
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::core::startup::spawn_app;
    use crate::core::state::AppState;
    use crate::models::user::UserStatus;
    use crate::stores::user_store::InMemoryUserStore;
    use std::sync::Arc;

    fn test_config() -> Config {
        Config::from_toml("[server]\nport = 9999\n").unwrap()
    }

    #[test]
    fn test_store_creation_normalizes_url() {
        let store = HttpUserStore::new("http://localhost:9999/").unwrap();
        assert_eq!(store.users_url, "http://localhost:9999/api/system/users");
    }

    #[tokio::test]
    async fn test_put_then_get_against_app() {
        let users = Arc::new(InMemoryUserStore::new());
        let app = spawn_app(AppState::with_store(test_config(), Arc::clone(&users)), "127.0.0.1:0")
            .await
            .unwrap();
        let store = HttpUserStore::new(&app.base_url()).unwrap();

        store.put(User::new("vasya", "qwerty", UserStatus::Blocked)).await.unwrap();

        let fetched = store.get("vasya").await.unwrap().expect("user should exist");
        assert_eq!(fetched, User::new("vasya", "qwerty", UserStatus::Blocked));
        assert!(users.contains("vasya"));
        assert!(store.get("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_put_maps_to_duplicate_user() {
        let app = spawn_app(AppState::new(test_config()), "127.0.0.1:0").await.unwrap();
        let store = HttpUserStore::new(&app.base_url()).unwrap();

        store.put(User::new("vasya", "one", UserStatus::Active)).await.unwrap();
        let err = store
            .put(User::new("vasya", "two", UserStatus::Active))
            .await
            .unwrap_err();

        assert!(matches!(err, FixtureError::DuplicateUser(ref login) if login == "vasya"));
    }

    #[tokio::test]
    async fn test_empty_login_is_store_error_not_invalid_status() {
        let app = spawn_app(AppState::new(test_config()), "127.0.0.1:0").await.unwrap();
        let store = HttpUserStore::new(&app.base_url()).unwrap();

        let err = store
            .put(User::new("", "pw", UserStatus::Active))
            .await
            .unwrap_err();

        match err {
            FixtureError::Store(message) => {
                assert!(message.contains("INVALID_PARAMETER"));
                assert!(message.contains("login must not be empty"));
            }
            other => panic!("expected store error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_app_reports_unknown_status_with_expected_code() {
        let app = spawn_app(AppState::new(test_config()), "127.0.0.1:0").await.unwrap();

        // Bypass the typed status to reach the app's own validation
        let response = reqwest::Client::new()
            .post(format!("{}/api/system/users", app.base_url()))
            .json(&RegistrationRequest {
                login: "vasya".to_string(),
                password: "qwerty".to_string(),
                status: "frozen".to_string(),
            })
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ErrorResponse = response.json().await.unwrap();
        assert_eq!(error.code, INVALID_STATUS_CODE);
    }

    #[tokio::test]
    async fn test_unreachable_app_is_store_error() {
        // Bind and drop to get a port nothing listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let store = HttpUserStore::new(&format!("http://{}", addr)).unwrap();
        let err = store.get("vasya").await.unwrap_err();
        assert!(matches!(err, FixtureError::Store(_)));
    }
}
