//! # Keygate Core
//!
//! Core business logic and domain layer for the Keygate backend.
//!
//! This crate contains:
//! - **Domain**: entities (users, refresh tokens, claims) and value objects
//! - **Errors**: the closed error taxonomy shared by all layers
//! - **Repositories**: persistence traits plus in-memory mock implementations
//! - **Services**: token codec, rotation engine, retention sweeper, and
//!   account management
//!
//! The crate is persistence-agnostic: concrete database and object-storage
//! implementations live in `kg_infra`.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;
