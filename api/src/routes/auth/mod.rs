//! Authentication routes.

pub mod login;
pub mod logout;
pub mod me;
pub mod refresh;

pub use super::AppState;
