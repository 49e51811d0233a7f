//! Product fetcher with last-requested-wins semantics
//!
//! Every request gets a monotonically increasing sequence number and its own
//! cancellation token. Starting a new request cancels the one in flight, and
//! completions carry their sequence number so the listing can drop anything
//! that is no longer the latest.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::application::product_source::{FetchError, ProductSource};
use crate::domain::product::{Product, normalize_category};

/// Handle for one issued request
#[derive(Debug, Clone)]
pub struct FetchTicket {
    pub seq: u64,
    pub category: Option<String>,
    token: CancellationToken,
}

impl FetchTicket {
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Result of a finished request, tagged with the sequence it was issued under
#[derive(Debug)]
pub struct FetchCompletion {
    pub seq: u64,
    pub category: Option<String>,
    pub outcome: Result<Vec<Product>, FetchError>,
}

pub struct ProductFetcher {
    source: Arc<dyn ProductSource>,
    sequence: AtomicU64,
    in_flight: Mutex<Option<CancellationToken>>,
}

impl ProductFetcher {
    pub fn new(source: Arc<dyn ProductSource>) -> Self {
        Self {
            source,
            sequence: AtomicU64::new(0),
            in_flight: Mutex::new(None),
        }
    }

    /// Issues a new request, cancelling whichever one was in flight.
    pub fn begin(&self, category: Option<&str>) -> FetchTicket {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();

        let previous = self
            .in_flight
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .replace(token.clone());
        if let Some(previous) = previous {
            previous.cancel();
        }

        FetchTicket {
            seq,
            category: normalize_category(category),
            token,
        }
    }

    /// Runs the request for `ticket`. A ticket cancelled before or during the
    /// request completes with [`FetchError::Cancelled`].
    pub async fn fetch(&self, ticket: FetchTicket) -> FetchCompletion {
        let FetchTicket { seq, category, token } = ticket;

        let outcome = if token.is_cancelled() {
            Err(FetchError::Cancelled)
        } else {
            tokio::select! {
                biased;
                () = token.cancelled() => Err(FetchError::Cancelled),
                result = self.source.list_products(category.as_deref()) => result,
            }
        };

        match &outcome {
            Ok(products) => info!(
                "Fetched {} products (category: {}, seq: {})",
                products.len(),
                category.as_deref().unwrap_or("all"),
                seq
            ),
            Err(FetchError::Cancelled) => debug!("Fetch {} was superseded", seq),
            Err(_) => {}
        }

        FetchCompletion { seq, category, outcome }
    }

    /// Sequence number of the most recently issued request (0 before any).
    pub fn latest(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.latest()
    }
}
