pub mod config;
pub mod error;
pub mod state;
pub mod routes;
pub mod tracing_init;
pub mod startup;
