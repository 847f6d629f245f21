//! Patisserie Storefront library.
//!
//! A session-local product-list-with-cart core: an immutable catalog loaded
//! once per session, an in-memory cart engine owning all quantity rules,
//! best-effort durable cart persistence across restarts, and a
//! Shopping → Confirmed → Shopping order flow.
//!
//! # Architecture
//!
//! - [`catalog`] - Read-only item list fetched from a JSON feed
//! - [`cart`] - In-memory cart engine (quantities, totals)
//! - [`store`] - Versioned file-backed cart persistence
//! - [`session`] - The controller tying everything together
//! - [`view`] - Declarative view models derived from session state
//!
//! The cart engine's in-memory state is the source of truth for the current
//! session; persistence is an asynchronous, last-write-wins, best-effort
//! mirror of it. Persistence failures are logged and never surfaced.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod session;
pub mod store;
pub mod view;

pub use cart::CartEngine;
pub use catalog::Catalog;
pub use config::StorefrontConfig;
pub use error::{AppError, Result};
pub use session::{ShopSession, ViewState};
pub use store::CartStore;
