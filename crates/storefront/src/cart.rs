//! In-memory cart engine.
//!
//! Owns every mutation rule for the session cart: add, increment, decrement
//! (removing the line at zero), remove, clear, plus total and item-count
//! computation against the current catalog. All mutations are synchronous;
//! the engine's state is the source of truth for the session and is updated
//! before any persistence is attempted.
//!
//! The engine does not validate names against the catalog - the session
//! layer does, so the engine stays a pure quantity machine.

use patisserie_core::{Cart, CartLine, Price};
use rust_decimal::Decimal;

use crate::catalog::Catalog;

/// The session cart plus its mutation rules.
#[derive(Debug, Default)]
pub struct CartEngine {
    cart: Cart,
}

impl CartEngine {
    /// Start with an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { cart: Cart::new() }
    }

    /// Restore from a persisted cart, enforcing the quantity invariant.
    #[must_use]
    pub fn restore(mut cart: Cart) -> Self {
        cart.sanitize();
        Self { cart }
    }

    /// Add one of an item: insert with quantity 1, or increment.
    pub fn add(&mut self, item_name: &str) {
        let next = self.cart.quantity(item_name).unwrap_or(0) + 1;
        self.cart.set(item_name, next);
    }

    /// Increment an existing line by one. No-op if the item is not in the
    /// cart.
    pub fn increment(&mut self, item_name: &str) {
        if let Some(qty) = self.cart.quantity(item_name) {
            self.cart.set(item_name, qty + 1);
        }
    }

    /// Decrement a line by one, removing it entirely at zero.
    pub fn decrement(&mut self, item_name: &str) {
        if let Some(qty) = self.cart.quantity(item_name) {
            self.cart.set(item_name, qty.saturating_sub(1));
        }
    }

    /// Remove a line unconditionally, regardless of quantity.
    pub fn remove(&mut self, item_name: &str) {
        self.cart.remove(item_name);
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.cart.clear();
    }

    /// Sum of quantity times current catalog price over all lines.
    ///
    /// Lines whose name no longer resolves in the catalog are skipped; a
    /// stale persisted cart must never break total computation.
    #[must_use]
    pub fn total(&self, catalog: &Catalog) -> Price {
        let amount = self
            .cart
            .iter()
            .filter_map(|(name, qty)| {
                catalog
                    .find(name)
                    .map(|item| item.price * Decimal::from(qty))
            })
            .sum();
        Price::usd(amount)
    }

    /// Sum of all quantities across lines, stale or not.
    ///
    /// The rendered header badge counts only catalog-resolvable lines; the
    /// view layer derives that from its joined lines rather than from here.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.cart.item_count()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Quantity of one item, if carted.
    #[must_use]
    pub fn quantity(&self, item_name: &str) -> Option<u32> {
        self.cart.quantity(item_name)
    }

    /// Owned lines, for views and order assembly.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.cart.lines()
    }

    /// Full-state snapshot for persistence. Writes built from this are
    /// idempotent overwrites, safe to land out of order.
    #[must_use]
    pub fn snapshot(&self) -> Cart {
        self.cart.clone()
    }
}

#[cfg(test)]
mod tests {
    use patisserie_core::{Item, ItemImages};
    use rust_decimal_macros::dec;

    use super::*;

    fn catalog() -> Catalog {
        let item = |name: &str, price| Item {
            name: name.to_owned(),
            category: "Dessert".to_owned(),
            price,
            image: ItemImages::default(),
        };
        Catalog::from_items(vec![
            item("Classic Tiramisu", dec!(5.00)),
            item("Salted Caramel Brownie", dec!(3.00)),
        ])
    }

    #[test]
    fn test_add_then_decrement_to_empty() {
        let mut engine = CartEngine::new();

        engine.add("Classic Tiramisu");
        assert_eq!(engine.quantity("Classic Tiramisu"), Some(1));
        assert_eq!(engine.item_count(), 1);

        engine.add("Classic Tiramisu");
        assert_eq!(engine.quantity("Classic Tiramisu"), Some(2));
        assert_eq!(engine.item_count(), 2);

        engine.decrement("Classic Tiramisu");
        assert_eq!(engine.quantity("Classic Tiramisu"), Some(1));

        engine.decrement("Classic Tiramisu");
        assert_eq!(engine.quantity("Classic Tiramisu"), None);
        assert!(engine.is_empty());
        assert_eq!(engine.item_count(), 0);
    }

    #[test]
    fn test_no_line_ever_has_zero_quantity() {
        let mut engine = CartEngine::new();
        engine.add("Classic Tiramisu");
        engine.add("Salted Caramel Brownie");

        // Hammer the mutators in an order that tries to drive lines to zero.
        engine.decrement("Classic Tiramisu");
        engine.decrement("Classic Tiramisu");
        engine.decrement("Classic Tiramisu");
        engine.increment("Salted Caramel Brownie");
        engine.remove("Salted Caramel Brownie");
        engine.add("Salted Caramel Brownie");

        for line in engine.lines() {
            assert!(line.quantity >= 1, "stored zero quantity: {line:?}");
        }
    }

    #[test]
    fn test_increment_absent_item_is_a_noop() {
        let mut engine = CartEngine::new();
        engine.increment("Classic Tiramisu");
        assert!(engine.is_empty());

        engine.decrement("Classic Tiramisu");
        assert!(engine.is_empty());
    }

    #[test]
    fn test_total_for_known_items() {
        let mut engine = CartEngine::new();
        engine.add("Classic Tiramisu");
        engine.add("Classic Tiramisu");
        engine.add("Salted Caramel Brownie");

        assert_eq!(engine.total(&catalog()), Price::usd(dec!(13.00)));
    }

    #[test]
    fn test_total_skips_stale_names() {
        let mut cart = Cart::new();
        cart.set("Classic Tiramisu", 2);
        cart.set("Discontinued Eclair", 5);
        let engine = CartEngine::restore(cart);

        // The stale line neither errors nor counts toward the total.
        assert_eq!(engine.total(&catalog()), Price::usd(dec!(10.00)));
    }

    #[test]
    fn test_total_of_empty_cart_is_zero() {
        let engine = CartEngine::new();
        assert_eq!(engine.total(&catalog()), Price::zero());
    }

    #[test]
    fn test_remove_regardless_of_quantity() {
        let mut engine = CartEngine::new();
        engine.add("Classic Tiramisu");
        engine.increment("Classic Tiramisu");
        engine.increment("Classic Tiramisu");

        engine.remove("Classic Tiramisu");
        assert!(engine.is_empty());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut engine = CartEngine::new();
        engine.add("Classic Tiramisu");

        engine.clear();
        assert!(engine.is_empty());
        engine.clear();
        assert!(engine.is_empty());
    }

    #[test]
    fn test_restore_drops_invalid_lines() {
        let cart: Cart = serde_json::from_str(r#"{"Classic Tiramisu":0,"Pistachio Baklava":2}"#)
            .expect("parse");
        let engine = CartEngine::restore(cart);

        assert_eq!(engine.quantity("Classic Tiramisu"), None);
        assert_eq!(engine.quantity("Pistachio Baklava"), Some(2));
    }
}
