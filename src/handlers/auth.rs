use crate::core::error::AuthError;
use crate::core::state::AppState;
use crate::models::auth::{AuthRequest, AuthSuccess};
use crate::utils::auth::verify_password;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Log a user in
///
/// POST /api/auth  {"login": "...", "password": "..."}
pub async fn auth_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AuthRequest>,
) -> Result<Response, AuthError> {
    let delay_ms = state.config.app.response_delay_ms;
    if delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    let Some(user) = state.users.get_user(&request.login) else {
        warn!(login = %request.login, "Login attempt for unknown user");
        return Err(AuthError::InvalidCredentials);
    };

    if !verify_password(&request.password, &user.password) {
        warn!(login = %request.login, "Login attempt with wrong password");
        return Err(AuthError::InvalidCredentials);
    }

    // Blocked status is only reported once the credentials match
    if user.is_blocked() {
        warn!(login = %request.login, "Login attempt for blocked user");
        return Err(AuthError::UserBlocked);
    }

    info!(login = %request.login, "User logged in");

    Ok((
        StatusCode::OK,
        Json(AuthSuccess {
            login: user.login.clone(),
            redirect: "/dashboard".to_string(),
        }),
    )
        .into_response())
}
