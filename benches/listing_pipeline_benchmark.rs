//! Listing pipeline benchmark
//!
//! Measures the filter, sort and merge stages on catalogs of increasing size,
//! with both stages active (the id-intersection path).

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use shopcart_lib::domain::{
    FacetSelection, FetchResult, Pagination, Product, SortKey, display_list, filter_products,
    sort_products,
};

fn catalog(size: usize) -> Vec<Product> {
    let categories = ["shoes", "bags", "hats", "socks"];
    (0..size)
        .map(|i| {
            let id = i64::try_from(i).unwrap_or(i64::MAX);
            let price = ((i * 7919) % 500) as f64 + 0.99;
            Product {
                id,
                uri: format!("product-{i}"),
                category: categories[i % categories.len()].to_string(),
                title: format!("Product {i}"),
                description: String::new(),
                image: String::new(),
                price,
                discounted_price: (i % 3 == 0).then_some(price * 0.8),
                rating: (i % 50) as f64 / 10.0,
            }
        })
        .collect()
}

fn pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("listing_pipeline");
    let facets = FacetSelection::default()
        .with_categories(["shoes", "bags"])
        .with_min_rating(2.0);

    for size in [100, 1_000, 10_000] {
        let fetch = FetchResult::loaded(catalog(size));

        group.bench_with_input(BenchmarkId::new("filter_sort_merge", size), &fetch, |b, fetch| {
            b.iter(|| {
                let filter = filter_products(&fetch.products, black_box(&facets));
                let sort = sort_products(&fetch.products, black_box(SortKey::PriceDesc));
                let display = display_list(fetch, &filter, &sort);
                black_box(Pagination::default().window(&display).len())
            });
        });

        group.bench_with_input(BenchmarkId::new("sort_only", size), &fetch, |b, fetch| {
            b.iter(|| black_box(sort_products(&fetch.products, SortKey::TitleAsc)));
        });
    }

    group.finish();
}

criterion_group!(benches, pipeline);
criterion_main!(benches);
