//! Confirmed order snapshot types.
//!
//! An [`Order`] is the ephemeral snapshot taken at checkout confirmation:
//! the cart lines joined against the catalog, plus the computed total. It is
//! never persisted; it lives only for the confirmation view and is dropped
//! when a new shopping session starts.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::item::Item;
use super::price::Price;

/// A single line of a confirmed order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLine {
    /// The item as it existed in the catalog at confirmation time.
    pub item: Item,
    /// Purchased quantity, always >= 1.
    pub quantity: u32,
    /// Unit price times quantity.
    pub line_total: Price,
}

/// A finalized snapshot of the cart presented at checkout confirmation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    /// Opaque order identifier, generated at confirmation.
    pub id: Uuid,
    /// When the order was confirmed.
    pub placed_at: DateTime<Utc>,
    /// Lines joined against the catalog; stale cart references are absent.
    pub lines: Vec<OrderLine>,
    /// Sum of all line totals.
    pub total: Price,
    /// Sum of all line quantities.
    pub item_count: u32,
}

impl Order {
    /// Assemble an order from already-joined lines.
    #[must_use]
    pub fn place(lines: Vec<OrderLine>) -> Self {
        let total = lines
            .iter()
            .fold(Price::zero(), |acc, line| acc.plus(line.line_total));
        let item_count = lines.iter().map(|line| line.quantity).sum();

        Self {
            id: Uuid::new_v4(),
            placed_at: Utc::now(),
            lines,
            total,
            item_count,
        }
    }
}
