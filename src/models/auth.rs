use serde::{Deserialize, Serialize};

/// Body of `POST /api/auth`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthRequest {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSuccess {
    pub login: String,
    pub redirect: String,
}

/// Body of `POST /api/system/users`.
///
/// `status` stays a string here so unknown values surface as `InvalidStatus`
/// instead of a generic deserialization rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub login: String,
    pub password: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub login: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub code: String,
    pub error: String,
}
