//! Versioned file-backed cart persistence.
//!
//! # State file
//!
//! A single JSON document with a schema version and two partitions:
//!
//! ```json
//! { "version": 1, "cart": { "Classic Tiramisu": 2 }, "settings": {} }
//! ```
//!
//! - `cart` - the full cart mapping, overwritten on every save
//! - `settings` - reserved for future use; preserved across cart saves
//!
//! # Contract
//!
//! Persistence is best-effort and never on the critical path: [`CartStore::load`]
//! cannot fail (missing, corrupt, or version-mismatched state falls back to
//! an empty cart with a log line), and save failures are returned for the
//! caller to log, never to roll back in-memory state. Every operation opens
//! its own scoped file handle and releases it regardless of outcome; writes
//! go through a temp file and an atomic rename so a crash mid-write leaves
//! the previous state intact.
//!
//! Saves always carry the complete cart snapshot, so concurrent in-flight
//! writes are idempotent overwrites: whichever lands last wins, and
//! out-of-order completion cannot corrupt state. Writers within a process
//! are additionally serialized by a mutex, so concurrent saves never
//! interleave their temp-file writes and every landed state is one
//! complete snapshot.

use std::path::{Path, PathBuf};

use patisserie_core::Cart;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Current on-disk schema version.
///
/// Bump when the state file shape changes; older files then fall back to an
/// empty cart instead of misparsing.
const SCHEMA_VERSION: u32 = 1;

/// Errors from cart persistence operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem read/write failed.
    #[error("state file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// State (de)serialization failed.
    #[error("state serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The state file was written by an incompatible schema.
    #[error("unsupported state schema version: {found}")]
    SchemaVersion { found: u32 },
}

/// The full on-disk document.
#[derive(Debug, Serialize, Deserialize, Default)]
struct StateFile {
    version: u32,
    cart: Cart,
    #[serde(default)]
    settings: serde_json::Map<String, serde_json::Value>,
}

/// Durable key-value store for the cart, scoped to one state file.
#[derive(Debug)]
pub struct CartStore {
    path: PathBuf,
    /// Serializes writers so concurrent saves never interleave the
    /// temp-file write and rename. Ordering between saves is not promised;
    /// each is a complete snapshot, so any order yields a valid state.
    write_lock: tokio::sync::Mutex<()>,
}

impl CartStore {
    /// Create a store backed by the given state file path.
    ///
    /// Nothing is touched on disk until the first operation.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// The backing state file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist the full cart snapshot, overwriting any previous cart.
    ///
    /// The `settings` partition of an existing readable state file is
    /// preserved; an unreadable file is replaced wholesale.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on I/O or serialization failure. Callers log
    /// and move on; in-memory state is never rolled back.
    #[instrument(skip(self, cart), fields(path = %self.path.display()))]
    pub async fn save(&self, cart: &Cart) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let settings = match self.read_state().await {
            Ok(Some(state)) => state.settings,
            Ok(None) => serde_json::Map::new(),
            Err(err) => {
                debug!(error = %err, "previous state unreadable, starting fresh");
                serde_json::Map::new()
            }
        };

        let state = StateFile {
            version: SCHEMA_VERSION,
            cart: cart.clone(),
            settings,
        };
        let bytes = serde_json::to_vec_pretty(&state)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Temp file + rename keeps the previous state intact if this write
        // is interrupted.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!(lines = cart.len(), "cart persisted");
        Ok(())
    }

    /// Load the persisted cart, falling back to empty on any failure.
    ///
    /// Missing files are a normal first run. Corrupt or version-mismatched
    /// files are logged at `warn` and treated as empty; startup must never
    /// block on a bad state file.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn load(&self) -> Cart {
        match self.read_state().await {
            Ok(Some(state)) => {
                let mut cart = state.cart;
                cart.sanitize();
                debug!(lines = cart.len(), "cart restored");
                cart
            }
            Ok(None) => {
                debug!("no prior cart state");
                Cart::new()
            }
            Err(err) => {
                warn!(error = %err, "failed to restore cart, starting empty");
                Cart::new()
            }
        }
    }

    /// Persist an empty cart.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on I/O or serialization failure.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.save(&Cart::new()).await
    }

    /// Read and validate the state file.
    ///
    /// `Ok(None)` means no file exists yet. Each call opens and fully
    /// releases its own file handle.
    async fn read_state(&self) -> Result<Option<StateFile>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let state: StateFile = serde_json::from_slice(&bytes)?;
        if state.version != SCHEMA_VERSION {
            return Err(StoreError::SchemaVersion {
                found: state.version,
            });
        }
        Ok(Some(state))
    }
}
