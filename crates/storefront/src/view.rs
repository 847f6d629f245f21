//! Declarative view models.
//!
//! [`render`] is a pure function from immutable session state to a
//! structured view tree; it re-runs on every state change and carries no
//! markup, no element ids, and no state of its own. A presentation layer
//! walks the tree and wires its controls to the session's `on_*` intent
//! callbacks by reference.
//!
//! Cart lines referencing names no longer in the catalog are skipped here,
//! the same way total computation skips them.

use patisserie_core::{Item, Order, Price};
use rust_decimal::Decimal;

use crate::cart::CartEngine;
use crate::catalog::Catalog;
use crate::session::ViewState;

/// The whole visible surface, one variant per screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorefrontView {
    Shopping(ShoppingView),
    Confirmed(OrderConfirmationView),
}

/// The shopping screen: product grid plus cart panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingView {
    pub products: Vec<ProductCardView>,
    pub cart: CartView,
    /// Banner text when the catalog failed to load; retry is manual.
    pub catalog_error: Option<String>,
}

/// One card in the product grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCardView {
    pub name: String,
    pub category: String,
    pub price: String,
    pub thumbnail: String,
    /// Quantity already carted, so the card can swap its add button for
    /// quantity controls. Zero means not carted.
    pub in_cart_quantity: u32,
}

/// The cart panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub subtotal: String,
    /// Sum of all quantities (the header badge).
    pub item_count: u32,
    /// False exactly when the cart is empty; confirming an empty cart is
    /// prevented here, not by a backend error.
    pub checkout_enabled: bool,
}

impl CartView {
    /// The empty cart panel.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: Price::zero().display(),
            item_count: 0,
            checkout_enabled: false,
        }
    }
}

/// One line in the cart panel or the confirmation list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
    pub thumbnail: String,
}

/// The order confirmation screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmationView {
    pub order_id: String,
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub item_count: u32,
}

/// Derive the full view tree for the current state.
#[must_use]
pub fn render(
    catalog: &Catalog,
    engine: &CartEngine,
    state: &ViewState,
    catalog_error: Option<&str>,
) -> StorefrontView {
    match state {
        ViewState::Shopping => StorefrontView::Shopping(ShoppingView {
            products: catalog
                .items()
                .iter()
                .map(|item| product_card(item, engine))
                .collect(),
            cart: cart_view(catalog, engine),
            catalog_error: catalog_error.map(str::to_owned),
        }),
        ViewState::Confirmed(order) => StorefrontView::Confirmed(confirmation_view(order)),
    }
}

fn product_card(item: &Item, engine: &CartEngine) -> ProductCardView {
    ProductCardView {
        name: item.name.clone(),
        category: item.category.clone(),
        price: Price::usd(item.price).display(),
        thumbnail: item.image.thumbnail.clone(),
        in_cart_quantity: engine.quantity(&item.name).unwrap_or(0),
    }
}

fn cart_view(catalog: &Catalog, engine: &CartEngine) -> CartView {
    if engine.is_empty() {
        return CartView::empty();
    }

    let items: Vec<CartLineView> = engine
        .lines()
        .into_iter()
        .filter_map(|line| {
            catalog.find(&line.item_name).map(|item| CartLineView {
                name: item.name.clone(),
                quantity: line.quantity,
                unit_price: Price::usd(item.price).display(),
                line_total: Price::usd(item.price * Decimal::from(line.quantity)).display(),
                thumbnail: item.image.thumbnail.clone(),
            })
        })
        .collect();

    // The badge counts what is visible; stale lines are skipped there too,
    // consistent with the subtotal.
    let item_count = items.iter().map(|line| line.quantity).sum();

    // A cart holding only stale lines renders empty and must not offer
    // checkout; gate on the joined lines, not the raw cart.
    let checkout_enabled = !items.is_empty();

    CartView {
        items,
        subtotal: engine.total(catalog).display(),
        item_count,
        checkout_enabled,
    }
}

fn confirmation_view(order: &Order) -> OrderConfirmationView {
    OrderConfirmationView {
        order_id: order.id.to_string(),
        lines: order
            .lines
            .iter()
            .map(|line| CartLineView {
                name: line.item.name.clone(),
                quantity: line.quantity,
                unit_price: Price::usd(line.item.price).display(),
                line_total: line.line_total.display(),
                thumbnail: line.item.image.thumbnail.clone(),
            })
            .collect(),
        total: order.total.display(),
        item_count: order.item_count,
    }
}
