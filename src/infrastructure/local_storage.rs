//! Key-value storage for the persisted cart
//!
//! Mirrors browser local storage: string keys to string values. The cart is
//! stored as a JSON array under [`CART_KEY`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::warn;

use crate::domain::{
    cart::{CartEntry, parse_cart},
    constants::storage::CART_KEY,
};

pub trait CartStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Reads the cart leniently: missing, unreadable or malformed data is an
    /// empty cart.
    fn read_cart(&self) -> Vec<CartEntry> {
        let raw = match self.get_item(CART_KEY) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to read cart from storage: {:#}", e);
                return Vec::new();
            }
        };

        parse_cart(raw.as_deref()).unwrap_or_else(|e| {
            warn!("Stored cart is not valid JSON, treating as empty: {}", e);
            Vec::new()
        })
    }

    fn write_cart(&self, entries: &[CartEntry]) -> Result<()> {
        let raw = serde_json::to_string(entries).context("Failed to serialize cart")?;
        self.set_item(CART_KEY, &raw)
    }
}

/// Process-local storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage
            .items
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        storage
    }
}

impl CartStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self
            .items
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self
            .items
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage backed by a single JSON object file (`{"cart": "[...]"}`)
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles within the process
    lock: Mutex<()>,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read storage file {:?}", self.path))?;
        if raw.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&raw)
            .with_context(|| format!("Storage file {:?} is not a JSON object of strings", self.path))
    }
}

impl CartStorage for JsonFileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut items = self.load().unwrap_or_else(|e| {
            warn!("Discarding unreadable storage file: {:#}", e);
            HashMap::new()
        });
        items.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create storage directory {:?}", parent))?;
            }
        }
        let raw = serde_json::to_string_pretty(&items)?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write storage file {:?}", self.path))
    }
}
