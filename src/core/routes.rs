// HTTP routes configuration

use crate::core::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Pages
        .route("/", get(crate::handlers::pages::login_page))
        .route("/dashboard", get(crate::handlers::pages::dashboard_page))
        .route("/health", get(crate::handlers::health::health_handler))

        // Login API
        .route("/api/auth", post(crate::handlers::auth::auth_handler))

        // Test-mode user registration
        .route(
            "/api/system/users",
            post(crate::handlers::system::register_user_handler)
                .get(crate::handlers::system::get_user_handler),
        )

        // 404 fallback for all unmatched routes
        .fallback(crate::handlers::fallback::fallback_handler)

        .with_state(state)
}
