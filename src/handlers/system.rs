use crate::core::error::SystemError;
use crate::core::state::AppState;
use crate::models::auth::{LoginQuery, RegistrationRequest, SuccessResponse};
use crate::models::user::{User, UserStatus};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{info, warn};

/// Register a user (test mode only)
///
/// POST /api/system/users  {"login": "...", "password": "...", "status": "active|blocked"}
pub async fn register_user_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegistrationRequest>,
) -> Result<Response, SystemError> {
    if request.login.is_empty() {
        return Err(SystemError::InvalidParameter("login must not be empty".to_string()));
    }

    if request.password.is_empty() {
        return Err(SystemError::InvalidParameter("password must not be empty".to_string()));
    }

    let status: UserStatus = request.status.parse().inspect_err(|_| {
        warn!(login = %request.login, status = %request.status, "Rejected registration with unknown status");
    })?;

    let user = User::new(request.login, request.password, status);
    let login = user.login.clone();

    state.users.insert(user).inspect_err(|_| {
        warn!(login = %login, "Rejected duplicate registration");
    })?;

    info!(login = %login, status = %status, registered = state.users.len(), "User registered");

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse {
            success: true,
            message: "User registered successfully".to_string(),
        }),
    )
        .into_response())
}

/// Look a registered user up
///
/// GET /api/system/users?login=<login>
pub async fn get_user_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LoginQuery>,
) -> Result<Json<User>, SystemError> {
    state
        .users
        .get_user(&params.login)
        .map(|user| Json((*user).clone()))
        .ok_or_else(|| SystemError::NotFound(format!("User '{}' not found", params.login)))
}
