//! Cart counter store and cart mutations
//!
//! The counter is the session-wide total quantity of the persisted cart.
//! It is computed when the store is created and again whenever a mutation
//! goes through [`CartService`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::debug;

use crate::domain::{
    cart::{CartEntry, total_quantity},
    product::Product,
};
use crate::infrastructure::local_storage::CartStorage;

pub struct CartCounterStore {
    storage: Arc<dyn CartStorage>,
    sender: watch::Sender<u64>,
}

impl CartCounterStore {
    pub fn new(storage: Arc<dyn CartStorage>) -> Self {
        let total = total_quantity(&storage.read_cart());
        let (sender, _) = watch::channel(total);
        Self { storage, sender }
    }

    pub fn get(&self) -> u64 {
        *self.sender.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.sender.subscribe()
    }

    pub fn subscribe_stream(&self) -> WatchStream<u64> {
        WatchStream::new(self.subscribe())
    }

    /// Re-reads the persisted cart and publishes the new total. Subscribers
    /// are only notified when the total changed.
    pub fn recompute(&self) -> u64 {
        let total = total_quantity(&self.storage.read_cart());
        let changed = self.sender.send_if_modified(|current| {
            if *current == total {
                false
            } else {
                *current = total;
                true
            }
        });
        if changed {
            debug!("Cart count is now {}", total);
        }
        total
    }
}

/// Cart mutations. Each one persists the cart and then refreshes the counter.
///
/// Mutations through one service are serialized, so concurrent callers never
/// lose each other's read-modify-write. Writers that bypass the service only
/// become visible after [`CartCounterStore::recompute`].
pub struct CartService {
    storage: Arc<dyn CartStorage>,
    counter: Arc<CartCounterStore>,
    writer: Mutex<()>,
}

impl CartService {
    pub fn new(storage: Arc<dyn CartStorage>, counter: Arc<CartCounterStore>) -> Self {
        Self {
            storage,
            counter,
            writer: Mutex::new(()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn entries(&self) -> Vec<CartEntry> {
        self.storage.read_cart()
    }

    /// Adds `quantity` of `product`, merging with an existing line for the same id.
    pub fn add(&self, product: &Product, quantity: u32) -> Result<u64> {
        let _guard = self.lock();
        let mut entries = self.storage.read_cart();
        match entries.iter_mut().find(|entry| entry.id == Some(product.id)) {
            Some(entry) => entry.quantity = entry.quantity.saturating_add(quantity),
            None => entries.push(CartEntry::from_product(product, quantity)),
        }
        self.persist(&entries)
    }

    pub fn remove(&self, product_id: i64) -> Result<u64> {
        let _guard = self.lock();
        self.remove_locked(product_id)
    }

    fn remove_locked(&self, product_id: i64) -> Result<u64> {
        let mut entries = self.storage.read_cart();
        entries.retain(|entry| entry.id != Some(product_id));
        self.persist(&entries)
    }

    /// Sets the quantity of an existing line; 0 removes it.
    pub fn update_quantity(&self, product_id: i64, quantity: u32) -> Result<u64> {
        let _guard = self.lock();
        if quantity == 0 {
            return self.remove_locked(product_id);
        }

        let mut entries = self.storage.read_cart();
        for entry in entries.iter_mut().filter(|entry| entry.id == Some(product_id)) {
            entry.quantity = quantity;
        }
        self.persist(&entries)
    }

    pub fn clear(&self) -> Result<u64> {
        let _guard = self.lock();
        self.persist(&[])
    }

    fn persist(&self, entries: &[CartEntry]) -> Result<u64> {
        self.storage.write_cart(entries)?;
        Ok(self.counter.recompute())
    }
}
