pub mod user;
pub mod auth;
