//! Integration tests for Patisserie.
//!
//! End-to-end coverage of the storefront library: cart persistence across
//! session restarts and the full Shopping → Confirmed → Shopping order
//! flow. The tests run against real temp-directory state files; no network
//! access is required because catalog feeds are local files.
//!
//! # Test Categories
//!
//! - `cart_persistence` - state file round-trips, corruption fallback
//! - `order_flow` - checkout confirmation scenarios, end to end

use std::path::PathBuf;

use patisserie_storefront::StorefrontConfig;
use serde_json::json;

/// A scratch shop: a temp dir holding a catalog feed and a state file.
pub struct TestShop {
    dir: tempfile::TempDir,
}

impl TestShop {
    /// Create a shop with the stock dessert feed.
    ///
    /// # Panics
    ///
    /// Panics if the temp directory or feed cannot be created; tests have
    /// no recovery path for that.
    #[must_use]
    pub fn new() -> Self {
        init_tracing();
        let dir = tempfile::tempdir().expect("create temp dir");
        let shop = Self { dir };
        shop.write_feed(&stock_feed());
        shop
    }

    /// Overwrite the catalog feed.
    ///
    /// # Panics
    ///
    /// Panics if the feed file cannot be written.
    pub fn write_feed(&self, feed: &serde_json::Value) {
        std::fs::write(
            self.feed_path(),
            serde_json::to_vec_pretty(feed).expect("serialize feed"),
        )
        .expect("write feed");
    }

    /// Config pointing a session at this shop's feed and state file.
    #[must_use]
    pub fn config(&self) -> StorefrontConfig {
        StorefrontConfig {
            catalog_url: self.feed_path().to_string_lossy().into_owned(),
            state_path: self.state_path(),
        }
    }

    /// Path of the catalog feed.
    #[must_use]
    pub fn feed_path(&self) -> PathBuf {
        self.dir.path().join("data.json")
    }

    /// Path of the persisted cart state file.
    #[must_use]
    pub fn state_path(&self) -> PathBuf {
        self.dir.path().join("state").join("cart.json")
    }
}

impl Default for TestShop {
    fn default() -> Self {
        Self::new()
    }
}

/// Install a test tracing subscriber, once per process.
///
/// Honors `RUST_LOG`; defaults to `warn` so persistence failures surface
/// in test output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// The stock dessert feed, shaped like the production catalog.
#[must_use]
pub fn stock_feed() -> serde_json::Value {
    let entry = |name: &str, category: &str, price: f64| {
        json!({
            "image": {
                "thumbnail": format!("./assets/images/{category}-thumbnail.jpg"),
                "mobile": format!("./assets/images/{category}-mobile.jpg"),
                "tablet": format!("./assets/images/{category}-tablet.jpg"),
                "desktop": format!("./assets/images/{category}-desktop.jpg"),
            },
            "name": name,
            "category": category,
            "price": price,
        })
    };

    json!([
        entry("Waffle with Berries", "Waffle", 6.5),
        entry("Vanilla Bean Creme Brulee", "Creme Brulee", 7.0),
        entry("Macaron Mix of Five", "Macaron", 8.0),
        entry("Classic Tiramisu", "Tiramisu", 5.5),
        entry("Pistachio Baklava", "Baklava", 4.0),
        entry("Lemon Meringue Pie", "Pie", 5.0),
        entry("Red Velvet Cake", "Cake", 4.5),
        entry("Salted Caramel Brownie", "Brownie", 4.5),
        entry("Vanilla Panna Cotta", "Panna Cotta", 6.5),
    ])
}
