//! Read-only product catalog loaded once per session.
//!
//! The catalog is fetched from a JSON feed - a local file in development,
//! an `http(s)` URL in deployment - and is immutable for the life of the
//! session. Cart lines reference catalog items by name; a name that no
//! longer resolves (the feed changed between sessions) is a normal outcome,
//! not an error.

use std::collections::HashMap;
use std::path::PathBuf;

use patisserie_core::Item;
use thiserror::Error;
use tracing::{info, instrument};

/// Errors fetching or parsing the catalog feed.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP fetch of the feed failed.
    #[error("failed to fetch catalog feed: {0}")]
    Http(#[from] reqwest::Error),

    /// Filesystem read of the feed failed.
    #[error("failed to read catalog feed: {0}")]
    Io(#[from] std::io::Error),

    /// The feed was fetched but is not a valid item list.
    #[error("failed to parse catalog feed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The immutable item list for the current session.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// An empty catalog, used when the feed could not be loaded.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a catalog from already-loaded items, preserving feed order.
    ///
    /// Duplicate names keep the first occurrence; later duplicates are
    /// dropped so that name remains a unique identifier.
    #[must_use]
    pub fn from_items(items: Vec<Item>) -> Self {
        let mut deduped: Vec<Item> = Vec::with_capacity(items.len());
        let mut index = HashMap::with_capacity(items.len());

        for item in items {
            if index.contains_key(&item.name) {
                continue;
            }
            index.insert(item.name.clone(), deduped.len());
            deduped.push(item);
        }

        Self {
            items: deduped,
            index,
        }
    }

    /// Fetch the catalog once from the configured feed source.
    ///
    /// `source` may be a filesystem path, a `file://` URL, or an `http(s)`
    /// URL.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the feed cannot be fetched or parsed. The
    /// caller decides whether to retry or present an empty catalog; this
    /// failure must never take the session down.
    #[instrument]
    pub async fn fetch(source: &str) -> Result<Self, CatalogError> {
        let bytes = match FeedSource::detect(source) {
            FeedSource::Http => {
                let response = reqwest::get(source).await?.error_for_status()?;
                response.bytes().await?.to_vec()
            }
            FeedSource::Path(path) => tokio::fs::read(path).await?,
        };

        let items: Vec<Item> = serde_json::from_slice(&bytes)?;
        let catalog = Self::from_items(items);
        info!(items = catalog.len(), source, "catalog loaded");
        Ok(catalog)
    }

    /// Look up an item by its unique name.
    ///
    /// `None` is an expected outcome for stale cart references and must be
    /// handled without erroring.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Item> {
        self.index.get(name).and_then(|idx| self.items.get(*idx))
    }

    /// All items in feed order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Where a feed source string points.
enum FeedSource {
    Http,
    Path(PathBuf),
}

impl FeedSource {
    fn detect(source: &str) -> Self {
        if let Ok(parsed) = url::Url::parse(source) {
            match parsed.scheme() {
                "http" | "https" => return Self::Http,
                "file" => {
                    if let Ok(path) = parsed.to_file_path() {
                        return Self::Path(path);
                    }
                }
                _ => {}
            }
        }
        Self::Path(PathBuf::from(source))
    }
}
