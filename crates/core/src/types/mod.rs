//! Core types for Patisserie.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod item;
pub mod order;
pub mod price;

pub use cart::{Cart, CartLine};
pub use item::{Item, ItemImages};
pub use order::{Order, OrderLine};
pub use price::{CurrencyCode, Price};
