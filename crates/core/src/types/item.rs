//! Catalog item types.
//!
//! Items are immutable once loaded from the catalog feed. The item name is
//! the unique identifier; carts reference items by name only, never by
//! embedded copy, so price changes in the catalog are reflected at total
//! time.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A purchasable catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique item identifier within the catalog.
    pub name: String,
    /// Display category (e.g., "Tiramisu", "Brownie").
    pub category: String,
    /// Unit price in the catalog currency. Never negative.
    pub price: Decimal,
    /// Responsive image URLs by viewport.
    pub image: ItemImages,
}

/// Image URLs for an item, one per viewport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ItemImages {
    pub thumbnail: String,
    pub mobile: String,
    pub tablet: String,
    pub desktop: String,
}
