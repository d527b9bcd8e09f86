//! Account management: registration, profiles, profile pictures.

pub mod service;

pub use service::{AccountService, AccountServiceConfig, AccountView};
