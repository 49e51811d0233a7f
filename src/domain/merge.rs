//! Merge stage
//!
//! Single pure reducer deciding which slice the grid displays:
//!
//! | sorting | filtering | display list                                   |
//! |---------|-----------|------------------------------------------------|
//! | yes     | no        | sorted products                                |
//! | no      | yes       | filtered products                              |
//! | yes     | yes       | sorted products whose id is in the filter set  |
//! | no      | no        | fetched products, fetch order                  |

use std::collections::HashSet;

use crate::domain::listing::{FetchResult, FilterResult, SortResult};
use crate::domain::product::Product;

pub fn display_list(fetch: &FetchResult, filter: &FilterResult, sort: &SortResult) -> Vec<Product> {
    match (sort.is_sorting, filter.is_filtering) {
        (true, false) => sort.products.clone(),
        (false, true) => filter.products.clone(),
        (true, true) => intersect_in_sort_order(&sort.products, &filter.products),
        (false, false) => fetch.products.clone(),
    }
}

/// Keeps the sort order; the filter slice only acts as a membership set keyed by id.
fn intersect_in_sort_order(sorted: &[Product], filtered: &[Product]) -> Vec<Product> {
    let members: HashSet<i64> = filtered.iter().map(|p| p.id).collect();
    sorted
        .iter()
        .filter(|product| members.contains(&product.id))
        .cloned()
        .collect()
}
