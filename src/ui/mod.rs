pub mod surface;
pub mod session;
