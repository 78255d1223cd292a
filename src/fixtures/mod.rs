pub mod generator;
pub mod registration;
