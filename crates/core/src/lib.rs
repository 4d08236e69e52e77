//! Cafe API Core - Shared types library.
//!
//! This crate provides the types used across the cafe API components:
//! - `server` - HTTP service and SQLite-backed repository
//! - `integration-tests` - Black-box HTTP tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. The optional `sqlite` feature adds `sqlx` encoding for
//! IDs so they can be bound directly in queries.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs and the `Cafe` record with its JSON contract

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
