//! User credential handling.
//!
//! # Responsibility
//! - Hash plain-text passwords before they reach any store.
//! - Verify login attempts against stored one-way hashes.
//!
//! # Invariants
//! - Plain-text passwords are never persisted or logged.

pub mod password;
