//! Application layer module
//!
//! Orchestrates the domain pipeline: fetching products, holding the listing
//! state and keeping the cart counter current.

pub mod cart_counter;
pub mod listing_state;
pub mod product_fetcher;
pub mod product_source;

pub use cart_counter::{CartCounterStore, CartService};
pub use listing_state::ListingState;
pub use product_fetcher::{FetchCompletion, FetchTicket, ProductFetcher};
pub use product_source::{FetchError, ProductSource, RepositorySource};
