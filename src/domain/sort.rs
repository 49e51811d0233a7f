//! Sort stage
//!
//! Reorders the full fetched collection with a stable comparator, so products
//! with equal keys keep their fetch order.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::domain::listing::SortResult;
use crate::domain::product::Product;

/// Sort key chosen in the grid's sort control. `None` is the default sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SortKey {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "price-asc")]
    PriceAsc,
    #[serde(rename = "price-desc")]
    PriceDesc,
    #[serde(rename = "rating-desc")]
    RatingDesc,
    #[serde(rename = "rating-asc")]
    RatingAsc,
    #[serde(rename = "title-asc")]
    TitleAsc,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown sort key: {0}")]
pub struct UnknownSortKey(pub String);

impl SortKey {
    pub const ALL: [Self; 6] = [
        Self::None,
        Self::PriceAsc,
        Self::PriceDesc,
        Self::RatingDesc,
        Self::RatingAsc,
        Self::TitleAsc,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::RatingDesc => "rating-desc",
            Self::RatingAsc => "rating-asc",
            Self::TitleAsc => "title-asc",
        }
    }

    pub fn is_active(self) -> bool {
        self != Self::None
    }

    /// Comparator for this key. `None` treats every pair as equal.
    pub fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::None => Ordering::Equal,
            Self::PriceAsc => a.effective_price().total_cmp(&b.effective_price()),
            Self::PriceDesc => b.effective_price().total_cmp(&a.effective_price()),
            Self::RatingDesc => b.rating.total_cmp(&a.rating),
            Self::RatingAsc => a.rating.total_cmp(&b.rating),
            Self::TitleAsc => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Self::None);
        }
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownSortKey(trimmed.to_string()))
    }
}

/// Computes the sort slice for the fetched products.
pub fn sort_products(products: &[Product], key: SortKey) -> SortResult {
    if !key.is_active() {
        return SortResult::inactive();
    }

    let mut sorted = products.to_vec();
    // slice::sort_by is stable
    sorted.sort_by(|a, b| key.compare(a, b));

    SortResult {
        products: sorted,
        is_sorting: true,
    }
}
