//! Service layer: token codec, rotation engine, sweeper, accounts, storage.

pub mod account;
pub mod auth;
pub mod storage;
pub mod token;
