//! Patisserie Core - Shared domain types.
//!
//! This crate provides the types shared across Patisserie components:
//! - `storefront` - The session-local storefront library
//! - `integration-tests` - End-to-end tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no filesystem access,
//! no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Catalog items, cart, orders, and price arithmetic

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
