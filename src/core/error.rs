// Centralized error handling for fixtures, UI sessions and the login app

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::time::Duration;
use thiserror::Error;

use crate::models::auth::ErrorResponse;

/// Errors raised while generating or registering user fixtures
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Invalid user status '{0}'. Must be one of: active, blocked")]
    InvalidStatus(String),

    #[error("User with login '{0}' is already registered")]
    DuplicateUser(String),

    #[error("User store request failed: {0}")]
    Store(String),
}

/// Errors raised by a UI surface while interacting with the page
#[derive(Error, Debug)]
pub enum UiError {
    #[error("No element matches locator: {0}")]
    ElementNotFound(String),

    #[error("Request to application failed: {0}")]
    Request(String),
}

/// Scenario assertion failures
#[derive(Error, Debug)]
pub enum AssertionError {
    #[error("Timed out after {elapsed:?} waiting for {condition}")]
    Timeout { condition: String, elapsed: Duration },

    #[error(transparent)]
    Ui(#[from] UiError),
}

/// Login failures returned by `/api/auth`
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Неверно указан логин или пароль")]
    InvalidCredentials,

    #[error("Пользователь заблокирован")]
    UserBlocked,
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "AUTH_INVALID",
            AuthError::UserBlocked => "USER_BLOCKED",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::UserBlocked => StatusCode::FORBIDDEN,
        };

        (
            status,
            Json(ErrorResponse {
                success: false,
                code: self.code().to_string(),
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Errors returned by the test-mode `/api/system/users` endpoints
#[derive(Error, Debug)]
pub enum SystemError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Fixture(#[from] FixtureError),
}

impl IntoResponse for SystemError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            SystemError::InvalidParameter(_) => (StatusCode::BAD_REQUEST, "INVALID_PARAMETER"),
            SystemError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            SystemError::Fixture(FixtureError::InvalidStatus(_)) => (StatusCode::BAD_REQUEST, "INVALID_STATUS"),
            SystemError::Fixture(FixtureError::DuplicateUser(_)) => (StatusCode::CONFLICT, "DUPLICATE_USER"),
            SystemError::Fixture(FixtureError::Store(_)) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        };

        (
            status,
            Json(ErrorResponse {
                success: false,
                code: code.to_string(),
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
