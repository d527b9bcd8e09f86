//! HTTP API layer for the Keygate backend.
//!
//! Exposes the actix-web application factory plus the DTOs, middleware,
//! and route handlers it is built from. The binary in `main.rs` wires the
//! real infrastructure; integration tests drive the same app against the
//! in-memory mocks.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
