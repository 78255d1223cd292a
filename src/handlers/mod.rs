pub mod auth;
pub mod system;
pub mod pages;
pub mod health;
pub mod fallback;
