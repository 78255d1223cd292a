use crate::models::auth::ErrorResponse;
use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Json, Response},
};
use tracing::debug;

pub async fn fallback_handler(uri: Uri) -> Response {
    debug!(path = %uri.path(), "No route matched");

    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            success: false,
            code: "NOT_FOUND".to_string(),
            error: format!("No such page: {}", uri.path()),
        }),
    )
        .into_response()
}
