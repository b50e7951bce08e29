//! Persisted presentation store.
//!
//! The store owns the single shared [`PresentationConfig`]. It loads once
//! from durable storage (migrating older shapes), then writes the whole model
//! back after every update. Readers get immutable [`Arc`] snapshots, so they
//! never observe a half-applied update.
//!
//! Storage failures never escape: a corrupt stored value falls back to the
//! defaults and a rejected write is logged while the in-memory model stays
//! authoritative for the session.

use crate::defaults::default_config;
use crate::error::{Error, Result};
use crate::migrate::{self, MigrationReport};
use crate::settings::DEFAULT_CONFIG_KEY;
use crate::types::PresentationConfig;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// String key-value storage (browser `localStorage`, a file, memory...).
pub trait Storage {
    /// Read the value under `key`, if any.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`.
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`.
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

/// In-memory storage, used for session-scoped state and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage holding one entry.
    pub fn with_item(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut storage = Self::new();
        storage.items.insert(key.into(), value.into());
        storage
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.items.remove(key);
        Ok(())
    }
}

/// Handle returned by [`PresentationStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&Arc<PresentationConfig>)>;

/// Owner of the presentation configuration and its persistence.
pub struct PresentationStore<S: Storage> {
    storage: S,
    key: String,
    config: Arc<PresentationConfig>,
    loaded: bool,
    last_report: Option<MigrationReport>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<S: Storage> PresentationStore<S> {
    /// Create a store over `storage` using the default key. Nothing is read
    /// until [`PresentationStore::load`] is called.
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_CONFIG_KEY)
    }

    /// Create a store reading and writing under `key`.
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            config: Arc::new(default_config()),
            loaded: false,
            last_report: None,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Create a store and load it immediately.
    pub fn open(storage: S, key: impl Into<String>) -> Self {
        let mut store = Self::with_key(storage, key);
        store.load();
        store
    }

    /// Load from storage, migrating older shapes.
    ///
    /// Always succeeds: missing data yields the defaults and unreadable data
    /// is logged and replaced by the defaults. Nothing is written back here.
    pub fn load(&mut self) -> Arc<PresentationConfig> {
        let config = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => match migrate::migrate_str(&raw) {
                Ok((config, report)) => {
                    if !report.is_clean() {
                        log::info!("Migrated stored presentation: {:?}", report);
                    }
                    self.last_report = Some(report);
                    config
                }
                Err(e) => {
                    log::error!("Failed to load stored presentation, using defaults: {}", e);
                    default_config()
                }
            },
            Ok(None) => {
                log::debug!("No stored presentation under '{}', using defaults", self.key);
                default_config()
            }
            Err(e) => {
                log::error!("Failed to read presentation storage, using defaults: {}", e);
                default_config()
            }
        };

        self.config = Arc::new(config);
        self.loaded = true;
        self.notify();
        Arc::clone(&self.config)
    }

    /// Whether the initial load has completed.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Current snapshot.
    pub fn config(&self) -> Arc<PresentationConfig> {
        Arc::clone(&self.config)
    }

    /// Migration report of the last load, if stored data was found.
    pub fn last_migration(&self) -> Option<&MigrationReport> {
        self.last_report.as_ref()
    }

    /// Replace the model with `transform(current)` and persist it.
    pub fn update<F>(&mut self, transform: F) -> Result<Arc<PresentationConfig>>
    where
        F: FnOnce(&PresentationConfig) -> PresentationConfig,
    {
        self.try_update(|current| Ok(transform(current)))
    }

    /// Like [`PresentationStore::update`], but the transform may reject the
    /// change, in which case the model and storage are left untouched.
    pub fn try_update<F>(&mut self, transform: F) -> Result<Arc<PresentationConfig>>
    where
        F: FnOnce(&PresentationConfig) -> Result<PresentationConfig>,
    {
        if !self.loaded {
            log::warn!("Update ignored: presentation has not finished loading");
            return Err(Error::NotLoaded);
        }

        let next = transform(&self.config)?;
        self.config = Arc::new(next);
        self.persist();
        self.notify();
        Ok(Arc::clone(&self.config))
    }

    /// Register a listener called with each new snapshot.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Arc<PresentationConfig>) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Borrow the underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Serialized form written to storage. Blob references are replaced,
    /// since they would be dangling after a reload.
    pub fn persisted_json(&self) -> Result<String> {
        let mut durable = PresentationConfig::clone(&self.config);
        migrate::sanitize_images(&mut durable);
        Ok(serde_json::to_string(&durable)?)
    }

    fn persist(&mut self) {
        let json = match self.persisted_json() {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to serialize presentation: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.set_item(&self.key, &json) {
            log::error!("Failed to save presentation: {}", e);
        }
    }

    fn notify(&mut self) {
        let snapshot = Arc::clone(&self.config);
        for (_, listener) in self.listeners.iter_mut() {
            listener(&snapshot);
        }
    }
}

impl<S: Storage + fmt::Debug> fmt::Debug for PresentationStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentationStore")
            .field("storage", &self.storage)
            .field("key", &self.key)
            .field("loaded", &self.loaded)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
