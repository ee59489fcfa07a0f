pub mod attendance;
pub mod auth;
pub mod core;
pub mod stats;
pub mod students;
