pub mod core;
pub mod models;
pub mod stores;
pub mod api;
pub mod handlers;
pub mod fixtures;
pub mod ui;
pub mod assertions;
pub mod scenario;
pub mod utils;
