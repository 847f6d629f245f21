//! Cart mapping and line types.
//!
//! A [`Cart`] maps item names to quantities. The invariant maintained here
//! is that no entry ever has quantity zero: [`Cart::set`] removes the line
//! instead of storing zero, so "decrement to nothing" and "remove" converge
//! on the same state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single cart line: an item reference plus a positive quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Name of the referenced catalog item.
    pub item_name: String,
    /// Purchased quantity, always >= 1.
    pub quantity: u32,
}

/// Mapping from item name to quantity for the active session.
///
/// Keys are unique and insertion order is irrelevant. Keys may be stale
/// relative to the catalog (an item removed from the feed while still in a
/// persisted cart); consumers skip stale keys rather than erroring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart(BTreeMap<String, u32>);

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Quantity for an item, if present.
    #[must_use]
    pub fn quantity(&self, item_name: &str) -> Option<u32> {
        self.0.get(item_name).copied()
    }

    /// Set the quantity for an item.
    ///
    /// A quantity of zero removes the line entirely; zero is never stored.
    pub fn set(&mut self, item_name: &str, quantity: u32) {
        if quantity == 0 {
            self.0.remove(item_name);
        } else if let Some(existing) = self.0.get_mut(item_name) {
            *existing = quantity;
        } else {
            self.0.insert(item_name.to_owned(), quantity);
        }
    }

    /// Remove a line unconditionally, regardless of quantity.
    pub fn remove(&mut self, item_name: &str) {
        self.0.remove(item_name);
    }

    /// Empty the cart entirely.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Sum of all quantities across lines (the header badge count).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.0.values().sum()
    }

    /// Iterate over `(item_name, quantity)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(name, qty)| (name.as_str(), *qty))
    }

    /// Snapshot the cart as owned lines.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.0
            .iter()
            .map(|(name, qty)| CartLine {
                item_name: name.clone(),
                quantity: *qty,
            })
            .collect()
    }

    /// Drop lines that violate the quantity invariant.
    ///
    /// Deserialization accepts whatever the state file contains; a
    /// hand-edited file can carry zero quantities. Call this after loading
    /// from untrusted storage.
    pub fn sanitize(&mut self) {
        self.0.retain(|_, qty| *qty > 0);
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = (&'a String, &'a u32);
    type IntoIter = std::collections::btree_map::Iter<'a, String, u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, u32)> for Cart {
    fn from_iter<T: IntoIterator<Item = (String, u32)>>(iter: T) -> Self {
        let mut cart = Self::new();
        for (name, qty) in iter {
            cart.set(&name, qty);
        }
        cart
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_zero_removes_line() {
        let mut cart = Cart::new();
        cart.set("Classic Tiramisu", 2);
        cart.set("Classic Tiramisu", 0);
        assert!(cart.is_empty());
        assert_eq!(cart.quantity("Classic Tiramisu"), None);
    }

    #[test]
    fn test_item_count_sums_quantities() {
        let mut cart = Cart::new();
        cart.set("Classic Tiramisu", 2);
        cart.set("Salted Caramel Brownie", 1);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_serde_is_a_transparent_map() {
        let mut cart = Cart::new();
        cart.set("Pistachio Baklava", 4);
        let json = serde_json::to_string(&cart).expect("serialize");
        assert_eq!(json, r#"{"Pistachio Baklava":4}"#);

        let back: Cart = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, cart);
    }

    #[test]
    fn test_sanitize_drops_zero_quantities() {
        // A hand-edited state file can smuggle zeros past `set`.
        let mut cart: Cart =
            serde_json::from_str(r#"{"Lemon Meringue Pie":0,"Red Velvet Cake":1}"#)
                .expect("deserialize");
        assert_eq!(cart.len(), 2);
        cart.sanitize();
        assert_eq!(cart.lines(), vec![CartLine {
            item_name: "Red Velvet Cake".to_owned(),
            quantity: 1,
        }]);
    }

    #[test]
    fn test_from_iterator_skips_zeros() {
        let cart: Cart = [("Waffle with Berries".to_owned(), 0)].into_iter().collect();
        assert!(cart.is_empty());
    }
}
