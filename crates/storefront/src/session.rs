//! The shopping session: controller and order flow.
//!
//! [`ShopSession`] is the single owner of application state - catalog, cart
//! engine, persistence handle, and the Shopping/Confirmed view state. There
//! is exactly one logical thread of control: every mutation happens inside a
//! discrete user-intent call, updates memory synchronously, then spawns a
//! fire-and-forget full-snapshot save onto the ambient Tokio runtime. The in-memory cart is always the
//! source of truth for what is displayed; persistence is a best-effort
//! mirror.
//!
//! The `on_*` methods are the callback surface consumed by a presentation
//! layer: `on_add`, `on_increment`, `on_decrement`, `on_remove`,
//! `on_confirm`, `on_start_new_order`.

use std::sync::Arc;

use patisserie_core::{Order, OrderLine, Price};
use rust_decimal::Decimal;
use tracing::{error, info, instrument, warn};

use crate::cart::CartEngine;
use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::error::{AppError, Result};
use crate::store::CartStore;
use crate::view::{self, StorefrontView};

/// Which screen the session is showing.
///
/// The flow is cyclic and re-entrant: Shopping → Confirmed → Shopping, with
/// no terminal state.
#[derive(Debug)]
pub enum ViewState {
    /// Catalog and cart are visible and mutable.
    Shopping,
    /// An order was just confirmed; its snapshot is on display.
    Confirmed(Order),
}

/// A single-user shopping session over one catalog and one cart.
#[derive(Debug)]
pub struct ShopSession {
    config: StorefrontConfig,
    catalog: Catalog,
    engine: CartEngine,
    store: Arc<CartStore>,
    view_state: ViewState,
    /// Display form of the last catalog fetch failure, for the error banner.
    catalog_error: Option<String>,
}

impl ShopSession {
    /// Start a session: restore the persisted cart, then fetch the catalog.
    ///
    /// Neither step can prevent the session from starting. A bad state file
    /// restores as an empty cart (logged inside [`CartStore::load`]); a
    /// failed catalog fetch leaves an empty catalog and a recorded error,
    /// recoverable via [`Self::reload_catalog`].
    #[instrument(skip(config), fields(catalog = %config.catalog_url))]
    pub async fn start(config: StorefrontConfig) -> Self {
        let store = Arc::new(CartStore::new(config.state_path.clone()));
        let engine = CartEngine::restore(store.load().await);

        let (catalog, catalog_error) = match Catalog::fetch(&config.catalog_url).await {
            Ok(catalog) => (catalog, None),
            Err(err) => {
                error!(error = %err, "catalog load failed, starting with empty catalog");
                (Catalog::empty(), Some(err.to_string()))
            }
        };

        Self {
            config,
            catalog,
            engine,
            store,
            view_state: ViewState::Shopping,
            catalog_error,
        }
    }

    /// Re-fetch the catalog from the configured feed.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the previous catalog (possibly empty) stays
    /// in place on failure.
    pub async fn reload_catalog(&mut self) -> Result<()> {
        match Catalog::fetch(&self.config.catalog_url).await {
            Ok(catalog) => {
                self.catalog = catalog;
                self.catalog_error = None;
                Ok(())
            }
            Err(err) => {
                self.catalog_error = Some(err.to_string());
                Err(AppError::Catalog(err))
            }
        }
    }

    // =========================================================================
    // User-intent callbacks
    // =========================================================================

    /// Add one of an item to the cart.
    ///
    /// Names are validated against the catalog: an unknown name is logged
    /// and ignored rather than carted blind.
    pub fn on_add(&mut self, item_name: &str) {
        if self.catalog.find(item_name).is_none() {
            warn!(item = item_name, "ignoring add for unknown catalog item");
            return;
        }
        self.engine.add(item_name);
        self.persist();
    }

    /// Increment a carted line by one.
    pub fn on_increment(&mut self, item_name: &str) {
        self.engine.increment(item_name);
        self.persist();
    }

    /// Decrement a carted line by one, removing it at zero.
    pub fn on_decrement(&mut self, item_name: &str) {
        self.engine.decrement(item_name);
        self.persist();
    }

    /// Remove a line regardless of quantity.
    pub fn on_remove(&mut self, item_name: &str) {
        self.engine.remove(item_name);
        self.persist();
    }

    /// Empty the cart.
    pub fn on_clear(&mut self) {
        self.engine.clear();
        self.persist();
    }

    /// Confirm the order: snapshot the cart and total, switch to the
    /// confirmation screen, and start the next shopping session empty.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::EmptyCart`] if the order would have no lines -
    /// either nothing is carted or every carted name is stale. The view
    /// layer disables checkout for both cases; this is the backstop.
    pub fn on_confirm(&mut self) -> Result<Order> {
        let order = self.build_order();
        if order.lines.is_empty() {
            return Err(AppError::EmptyCart);
        }

        info!(order_id = %order.id, total = %order.total.display(), "order confirmed");

        self.engine.clear();
        self.persist();
        self.view_state = ViewState::Confirmed(order.clone());
        Ok(order)
    }

    /// Leave the confirmation screen and start shopping again.
    ///
    /// The cart was already cleared at confirmation; clearing again here is
    /// idempotent and guarantees the persisted state is empty even if the
    /// post-confirm write never landed.
    pub fn on_start_new_order(&mut self) {
        self.view_state = ViewState::Shopping;
        self.engine.clear();
        self.persist();
    }

    // =========================================================================
    // Derived state
    // =========================================================================

    /// Render the current state as a declarative view model.
    #[must_use]
    pub fn render(&self) -> StorefrontView {
        view::render(
            &self.catalog,
            &self.engine,
            &self.view_state,
            self.catalog_error.as_deref(),
        )
    }

    /// The session catalog.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The cart engine.
    #[must_use]
    pub const fn cart(&self) -> &CartEngine {
        &self.engine
    }

    /// The current view state.
    #[must_use]
    pub const fn view_state(&self) -> &ViewState {
        &self.view_state
    }

    /// Display form of the last catalog fetch failure, if any.
    #[must_use]
    pub fn catalog_error(&self) -> Option<&str> {
        self.catalog_error.as_deref()
    }

    /// Await a write of the current cart snapshot.
    ///
    /// Mutators persist fire-and-forget; call this when the session is
    /// shutting down and the write must land before exit.
    ///
    /// # Errors
    ///
    /// Returns the storage error, for shutdown diagnostics only.
    pub async fn flush(&self) -> Result<()> {
        self.store.save(&self.engine.snapshot()).await?;
        Ok(())
    }

    /// Spawn a fire-and-forget save of the full current cart.
    ///
    /// Each write carries the complete snapshot taken now, so in-flight
    /// writes landing out of order cannot corrupt state: whichever full
    /// snapshot lands last wins. Failures are logged, never surfaced, and
    /// never roll back memory.
    ///
    /// Requires an ambient Tokio runtime to actually write; without one the
    /// write is skipped with a warning, honoring the best-effort contract
    /// (worst case, the cart lives only for this session).
    fn persist(&self) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("no async runtime available, skipping cart persistence");
            return;
        };

        let store = Arc::clone(&self.store);
        let snapshot = self.engine.snapshot();
        handle.spawn(async move {
            if let Err(err) = store.save(&snapshot).await {
                warn!(error = %err, "cart persistence failed");
            }
        });
    }

    /// Join cart lines against the catalog into an order snapshot.
    ///
    /// Stale lines (names no longer in the catalog) are skipped, matching
    /// total computation.
    fn build_order(&self) -> Order {
        let lines = self
            .engine
            .lines()
            .into_iter()
            .filter_map(|line| {
                self.catalog.find(&line.item_name).map(|item| OrderLine {
                    item: item.clone(),
                    quantity: line.quantity,
                    line_total: Price::usd(item.price * Decimal::from(line.quantity)),
                })
            })
            .collect();
        Order::place(lines)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use patisserie_core::{Item, ItemImages};
    use rust_decimal_macros::dec;

    use super::*;

    fn feed_json() -> String {
        let item = |name: &str, price: &str| {
            format!(
                r#"{{"image":{{"thumbnail":"t.jpg","mobile":"m.jpg","tablet":"ta.jpg","desktop":"d.jpg"}},"name":"{name}","category":"Dessert","price":{price}}}"#
            )
        };
        format!(
            "[{},{}]",
            item("Classic Tiramisu", "5.00"),
            item("Salted Caramel Brownie", "3.00")
        )
    }

    async fn session_in(dir: &tempfile::TempDir) -> ShopSession {
        let feed = dir.path().join("data.json");
        tokio::fs::write(&feed, feed_json()).await.expect("feed");
        let config = StorefrontConfig {
            catalog_url: feed.to_string_lossy().into_owned(),
            state_path: dir.path().join("state/cart.json"),
        };
        ShopSession::start(config).await
    }

    #[tokio::test]
    async fn test_add_is_validated_against_catalog() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = session_in(&dir).await;

        session.on_add("Classic Tiramisu");
        session.on_add("Imaginary Pudding");

        assert_eq!(session.cart().quantity("Classic Tiramisu"), Some(1));
        assert_eq!(session.cart().quantity("Imaginary Pudding"), None);
        assert_eq!(session.cart().item_count(), 1);
    }

    #[tokio::test]
    async fn test_confirm_snapshots_then_clears() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = session_in(&dir).await;

        session.on_add("Classic Tiramisu");
        session.on_increment("Classic Tiramisu");
        session.on_add("Salted Caramel Brownie");

        let order = session.on_confirm().expect("confirm non-empty cart");
        assert_eq!(order.total, Price::usd(dec!(13.00)));
        assert_eq!(order.item_count, 3);
        assert_eq!(order.lines.len(), 2);

        // The next shopping session starts empty.
        assert!(session.cart().is_empty());
        assert!(matches!(session.view_state(), ViewState::Confirmed(o) if o.id == order.id));
    }

    #[tokio::test]
    async fn test_confirm_empty_cart_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = session_in(&dir).await;

        assert!(matches!(session.on_confirm(), Err(AppError::EmptyCart)));
        assert!(matches!(session.view_state(), ViewState::Shopping));
    }

    #[tokio::test]
    async fn test_confirm_all_stale_cart_is_rejected() {
        // Every carted name left the catalog between sessions; the cart is
        // effectively empty and must not confirm into a zero-line order.
        let dir = tempfile::tempdir().expect("tempdir");
        let store = CartStore::new(dir.path().join("state/cart.json"));
        let mut cart = patisserie_core::Cart::new();
        cart.set("Discontinued Eclair", 2);
        store.save(&cart).await.expect("seed state");

        let mut session = session_in(&dir).await;
        assert_eq!(session.cart().quantity("Discontinued Eclair"), Some(2));

        assert!(matches!(session.on_confirm(), Err(AppError::EmptyCart)));
        assert!(matches!(session.view_state(), ViewState::Shopping));
        // Nothing was cleared by the rejected confirm.
        assert_eq!(session.cart().quantity("Discontinued Eclair"), Some(2));
    }

    #[tokio::test]
    async fn test_start_new_order_returns_to_shopping() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = session_in(&dir).await;

        session.on_add("Classic Tiramisu");
        session.on_confirm().expect("confirm");
        session.on_start_new_order();

        assert!(matches!(session.view_state(), ViewState::Shopping));
        assert!(session.cart().is_empty());

        // Re-entrant: a second order can go through the same flow.
        session.on_add("Salted Caramel Brownie");
        let order = session.on_confirm().expect("second confirm");
        assert_eq!(order.total, Price::usd(dec!(3.00)));
    }

    #[tokio::test]
    async fn test_catalog_failure_still_starts_session() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = StorefrontConfig {
            catalog_url: dir
                .path()
                .join("missing.json")
                .to_string_lossy()
                .into_owned(),
            state_path: dir.path().join("cart.json"),
        };

        let session = ShopSession::start(config).await;
        assert!(session.catalog().is_empty());
        assert!(session.catalog_error().is_some());
    }

    #[tokio::test]
    async fn test_reload_catalog_recovers() {
        let dir = tempfile::tempdir().expect("tempdir");
        let feed = dir.path().join("data.json");
        let config = StorefrontConfig {
            catalog_url: feed.to_string_lossy().into_owned(),
            state_path: dir.path().join("cart.json"),
        };

        // Feed is missing at startup.
        let mut session = ShopSession::start(config).await;
        assert!(session.catalog().is_empty());
        assert!(session.reload_catalog().await.is_err());

        // Feed appears; manual retry succeeds.
        tokio::fs::write(&feed, feed_json()).await.expect("feed");
        session.reload_catalog().await.expect("reload");
        assert_eq!(session.catalog().len(), 2);
        assert!(session.catalog_error().is_none());
    }

    #[tokio::test]
    async fn test_flush_persists_current_cart() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = session_in(&dir).await;

        session.on_add("Classic Tiramisu");
        session.on_add("Classic Tiramisu");
        session.flush().await.expect("flush");

        let store = CartStore::new(dir.path().join("state/cart.json"));
        assert_eq!(store.load().await.quantity("Classic Tiramisu"), Some(2));
    }

    #[tokio::test]
    async fn test_stale_persisted_line_survives_until_total() {
        // A cart persisted with an item that later left the catalog.
        let dir = tempfile::tempdir().expect("tempdir");
        let store = CartStore::new(dir.path().join("state/cart.json"));
        let mut cart = patisserie_core::Cart::new();
        cart.set("Discontinued Eclair", 3);
        cart.set("Classic Tiramisu", 1);
        store.save(&cart).await.expect("seed state");

        let session = session_in(&dir).await;
        assert_eq!(session.cart().quantity("Discontinued Eclair"), Some(3));
        // The stale line does not count toward the total and does not error.
        assert_eq!(
            session.cart().total(session.catalog()),
            Price::usd(dec!(5.00))
        );
    }

    #[test]
    fn test_build_order_skips_stale_lines() {
        let catalog = Catalog::from_items(vec![Item {
            name: "Classic Tiramisu".to_owned(),
            category: "Tiramisu".to_owned(),
            price: dec!(5.50),
            image: ItemImages::default(),
        }]);
        let mut cart = patisserie_core::Cart::new();
        cart.set("Classic Tiramisu", 2);
        cart.set("Discontinued Eclair", 1);

        let session = ShopSession {
            config: StorefrontConfig {
                catalog_url: String::new(),
                state_path: PathBuf::new(),
            },
            catalog,
            engine: CartEngine::restore(cart),
            store: Arc::new(CartStore::new(PathBuf::new())),
            view_state: ViewState::Shopping,
            catalog_error: None,
        };

        let order = session.build_order();
        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.total, Price::usd(dec!(11.00)));
        assert_eq!(order.item_count, 2);
    }

    #[test]
    fn test_mutation_without_runtime_skips_persistence() {
        // No #[tokio::test]: mutators must stay usable (memory-only, write
        // skipped with a warning) when no runtime is around.
        let catalog = Catalog::from_items(vec![Item {
            name: "Classic Tiramisu".to_owned(),
            category: "Tiramisu".to_owned(),
            price: dec!(5.50),
            image: ItemImages::default(),
        }]);

        let mut session = ShopSession {
            config: StorefrontConfig {
                catalog_url: String::new(),
                state_path: PathBuf::new(),
            },
            catalog,
            engine: CartEngine::new(),
            store: Arc::new(CartStore::new(PathBuf::new())),
            view_state: ViewState::Shopping,
            catalog_error: None,
        };

        session.on_add("Classic Tiramisu");
        session.on_increment("Classic Tiramisu");
        assert_eq!(session.cart().quantity("Classic Tiramisu"), Some(2));
    }
}
