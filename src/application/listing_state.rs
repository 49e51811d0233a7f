//! Product listing state
//!
//! Owns the fetched collection together with the user's facet, sort and
//! pagination choices, and keeps the derived display list current. All
//! updates go through `&mut self`; fetch completions that are no longer the
//! latest request are dropped.

use std::sync::Arc;

use tracing::{debug, error};

use crate::application::product_fetcher::{FetchCompletion, FetchTicket, ProductFetcher};
use crate::application::product_source::FetchError;
use crate::domain::{
    filter::{FacetSelection, filter_products},
    listing::{FetchResult, FilterResult, ListingWindow, SortResult},
    merge::display_list,
    pagination::Pagination,
    product::{Product, normalize_category},
    sort::{SortKey, sort_products},
};

pub struct ListingState {
    fetcher: Arc<ProductFetcher>,
    // Outer None: nothing requested yet
    requested_category: Option<Option<String>>,
    fetch: FetchResult,
    facets: FacetSelection,
    sort_key: SortKey,
    filter: FilterResult,
    sort: SortResult,
    display: Vec<Product>,
    pagination: Pagination,
    last_error: Option<String>,
}

impl ListingState {
    pub fn new(fetcher: Arc<ProductFetcher>) -> Self {
        Self {
            fetcher,
            requested_category: None,
            fetch: FetchResult::default(),
            facets: FacetSelection::default(),
            sort_key: SortKey::None,
            filter: FilterResult::inactive(),
            sort: SortResult::inactive(),
            display: Vec::new(),
            pagination: Pagination::default(),
            last_error: None,
        }
    }

    /// Selects the category to list. Returns a ticket only when a request is
    /// actually needed: the first call, or a call with a different category.
    pub fn set_category(&mut self, category: Option<&str>) -> Option<FetchTicket> {
        let category = normalize_category(category);
        if self.requested_category.as_ref() == Some(&category) {
            return None;
        }

        let ticket = self.fetcher.begin(category.as_deref());
        self.requested_category = Some(category);
        Some(ticket)
    }

    /// Re-requests the current category.
    pub fn request_refresh(&mut self) -> FetchTicket {
        let category = self.requested_category.clone().flatten();
        let ticket = self.fetcher.begin(category.as_deref());
        self.requested_category = Some(category);
        ticket
    }

    /// Applies a finished request. Returns `true` when the fetched collection
    /// was replaced.
    pub fn apply_fetch(&mut self, completion: FetchCompletion) -> bool {
        if !self.fetcher.is_current(completion.seq) {
            debug!(
                "Ignoring stale fetch {} (latest is {})",
                completion.seq,
                self.fetcher.latest()
            );
            return false;
        }

        match completion.outcome {
            Ok(products) => {
                self.fetch = FetchResult::loaded(products);
                self.last_error = None;
                self.recompute();
                true
            }
            Err(FetchError::Cancelled) => {
                debug!("Fetch {} was cancelled", completion.seq);
                false
            }
            Err(e) => {
                error!("Error fetching products: {}", e);
                self.last_error = Some(e.to_string());
                false
            }
        }
    }

    /// Selects `category` and, when that needs a request, waits for it and
    /// applies the result.
    pub async fn load_category(&mut self, category: Option<&str>) -> bool {
        let Some(ticket) = self.set_category(category) else {
            return false;
        };
        let fetcher = Arc::clone(&self.fetcher);
        let completion = fetcher.fetch(ticket).await;
        self.apply_fetch(completion)
    }

    pub fn set_facets(&mut self, facets: FacetSelection) {
        self.facets = facets;
        self.filter = filter_products(&self.fetch.products, &self.facets);
        self.merge();
    }

    pub fn set_sort_key(&mut self, sort_key: SortKey) {
        self.sort_key = sort_key;
        self.sort = sort_products(&self.fetch.products, self.sort_key);
        self.merge();
    }

    /// Shows one more page. No-op when everything is already shown.
    pub fn load_more(&mut self) -> bool {
        self.pagination.load_more(self.display.len())
    }

    pub fn display_list(&self) -> &[Product] {
        &self.display
    }

    pub fn window(&self) -> &[Product] {
        self.pagination.window(&self.display)
    }

    pub fn has_more(&self) -> bool {
        self.pagination.has_more(self.display.len())
    }

    pub fn shown_count(&self) -> usize {
        self.window().len()
    }

    /// Size of the fetched collection, independent of filtering.
    pub fn total_count(&self) -> usize {
        self.fetch.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window().is_empty()
    }

    pub fn is_loaded(&self) -> bool {
        self.fetch.is_loaded
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.requested_category.as_ref().and_then(Option::as_deref)
    }

    pub fn facets(&self) -> &FacetSelection {
        &self.facets
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn page_count(&self) -> usize {
        self.pagination.page_count()
    }

    pub fn snapshot(&self) -> ListingWindow {
        ListingWindow {
            products: self.window().to_vec(),
            shown: u32::try_from(self.shown_count()).unwrap_or(u32::MAX),
            total: u32::try_from(self.total_count()).unwrap_or(u32::MAX),
            has_more: self.has_more(),
            is_loaded: self.is_loaded(),
        }
    }

    fn recompute(&mut self) {
        self.filter = filter_products(&self.fetch.products, &self.facets);
        self.sort = sort_products(&self.fetch.products, self.sort_key);
        self.merge();
    }

    fn merge(&mut self) {
        self.display = display_list(&self.fetch, &self.filter, &self.sort);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::product_source::ProductSource;
    use async_trait::async_trait;

    fn product(id: i64, category: &str, price: f64) -> Product {
        Product {
            id,
            uri: format!("p{id}"),
            category: category.to_string(),
            title: format!("Product {id}"),
            description: String::new(),
            image: String::new(),
            price,
            discounted_price: None,
            rating: 3.0,
        }
    }

    struct CatalogSource(Vec<Product>);

    #[async_trait]
    impl ProductSource for CatalogSource {
        async fn list_products(&self, category: Option<&str>) -> Result<Vec<Product>, FetchError> {
            Ok(self
                .0
                .iter()
                .filter(|p| category.is_none_or(|c| p.in_category(c)))
                .cloned()
                .collect())
        }
    }

    #[derive(Default)]
    struct CountingSource {
        calls: std::sync::atomic::AtomicUsize,
    }

    #[async_trait]
    impl ProductSource for CountingSource {
        async fn list_products(&self, _category: Option<&str>) -> Result<Vec<Product>, FetchError> {
            self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(vec![product(1, "shoes", 10.0)])
        }
    }

    fn state(products: Vec<Product>) -> ListingState {
        ListingState::new(Arc::new(ProductFetcher::new(Arc::new(CatalogSource(products)))))
    }

    #[test]
    fn test_same_category_is_requested_once() {
        let mut listing = state(Vec::new());
        assert!(listing.set_category(Some("shoes")).is_some());
        assert!(listing.set_category(Some("shoes")).is_none());
        assert!(listing.set_category(None).is_some());
        assert!(listing.set_category(Some("")).is_none());
    }

    #[tokio::test]
    async fn test_reselecting_category_does_not_refetch() {
        let source = Arc::new(CountingSource::default());
        let mut listing = ListingState::new(Arc::new(ProductFetcher::new(source.clone())));
        let calls = || source.calls.load(std::sync::atomic::Ordering::SeqCst);

        assert!(listing.load_category(Some("shoes")).await);
        assert!(!listing.load_category(Some("shoes")).await);
        assert_eq!(calls(), 1);

        assert!(listing.load_category(Some("bags")).await);
        assert_eq!(calls(), 2);
    }

    #[tokio::test]
    async fn test_load_category_populates_listing() {
        let mut listing = state(vec![product(1, "a", 5.0), product(2, "b", 3.0), product(3, "a", 1.0)]);
        assert!(!listing.is_loaded());

        assert!(listing.load_category(Some("a")).await);
        assert!(listing.is_loaded());
        assert_eq!(listing.total_count(), 2);
        assert_eq!(listing.category(), Some("a"));

        listing.set_sort_key(SortKey::PriceAsc);
        let ids: Vec<i64> = listing.window().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_stale_completion_is_ignored() {
        let mut listing = state(Vec::new());
        let first = listing.set_category(Some("a")).unwrap();
        let second = listing.set_category(Some("b")).unwrap();

        let stale = FetchCompletion {
            seq: first.seq,
            category: first.category,
            outcome: Ok(vec![product(1, "a", 1.0)]),
        };
        assert!(!listing.apply_fetch(stale));
        assert!(!listing.is_loaded());

        let fresh = FetchCompletion {
            seq: second.seq,
            category: second.category,
            outcome: Ok(vec![product(2, "b", 1.0)]),
        };
        assert!(listing.apply_fetch(fresh));
        assert_eq!(listing.display_list()[0].id, 2);
    }

    #[test]
    fn test_failed_fetch_keeps_previous_collection() {
        let mut listing = state(Vec::new());
        let ticket = listing.set_category(None).unwrap();
        listing.apply_fetch(FetchCompletion {
            seq: ticket.seq,
            category: None,
            outcome: Ok(vec![product(1, "a", 1.0)]),
        });

        let retry = listing.request_refresh();
        let applied = listing.apply_fetch(FetchCompletion {
            seq: retry.seq,
            category: None,
            outcome: Err(FetchError::Status {
                status: 500,
                url: "http://localhost/api/products".to_string(),
            }),
        });
        assert!(!applied);
        assert_eq!(listing.total_count(), 1);
        assert!(listing.last_error().is_some());
    }

    #[test]
    fn test_snapshot_counts() {
        let mut listing = state(Vec::new());
        let ticket = listing.set_category(None).unwrap();
        listing.apply_fetch(FetchCompletion {
            seq: ticket.seq,
            category: None,
            outcome: Ok((1..=20).map(|id| product(id, "a", 1.0)).collect()),
        });

        let window = listing.snapshot();
        assert_eq!(window.shown, 12);
        assert_eq!(window.total, 20);
        assert!(window.has_more);

        assert!(listing.load_more());
        assert!(!listing.has_more());
        assert!(!listing.load_more());
        assert_eq!(listing.snapshot().shown, 20);
    }
}
