//! Cart counter store: lenient parsing, subscriptions and mutation-driven recompute
use std::sync::Arc;
use std::time::Duration;

use rstest::rstest;
use tokio_stream::StreamExt;

use shopcart_lib::application::{CartCounterStore, CartService};
use shopcart_lib::domain::{Product, constants::storage::CART_KEY};
use shopcart_lib::infrastructure::{CartStorage, JsonFileStorage, MemoryStorage};

fn product(id: i64) -> Product {
    Product {
        id,
        uri: format!("p-{id}"),
        category: "bags".to_string(),
        title: format!("Bag {id}"),
        description: String::new(),
        image: String::new(),
        price: 25.0,
        discounted_price: Some(20.0),
        rating: 4.0,
    }
}

#[rstest]
#[case::two_entries(Some(r#"[{"quantity":2},{"quantity":3}]"#), 5)]
#[case::empty_array(Some("[]"), 0)]
#[case::absent(None, 0)]
#[case::non_numeric(Some(r#"[{"quantity":"x"}]"#), 0)]
#[case::numeric_string(Some(r#"[{"quantity":"4"}]"#), 4)]
#[case::missing_quantity(Some(r#"[{"id":1},{"quantity":1}]"#), 1)]
#[case::negative(Some(r#"[{"quantity":-3},{"quantity":2}]"#), 2)]
#[case::malformed_json(Some("[{"), 0)]
#[case::not_an_array(Some(r#"{"quantity":9}"#), 0)]
fn counts_persisted_cart(#[case] stored: Option<&str>, #[case] expected: u64) {
    let storage = match stored {
        Some(raw) => MemoryStorage::with_item(CART_KEY, raw),
        None => MemoryStorage::new(),
    };
    let counter = CartCounterStore::new(Arc::new(storage));
    assert_eq!(counter.get(), expected);
}

#[tokio::test]
async fn subscribers_see_mutations() {
    let storage: Arc<dyn CartStorage> = Arc::new(MemoryStorage::new());
    let counter = Arc::new(CartCounterStore::new(Arc::clone(&storage)));
    let service = CartService::new(storage, Arc::clone(&counter));

    let mut receiver = counter.subscribe();
    assert_eq!(*receiver.borrow_and_update(), 0);

    service.add(&product(1), 3).unwrap();
    tokio::time::timeout(Duration::from_secs(1), receiver.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(*receiver.borrow_and_update(), 3);
}

#[tokio::test]
async fn stream_yields_current_then_updates() {
    let storage: Arc<dyn CartStorage> = Arc::new(MemoryStorage::new());
    let counter = Arc::new(CartCounterStore::new(Arc::clone(&storage)));
    let service = CartService::new(storage, Arc::clone(&counter));

    let mut stream = counter.subscribe_stream();
    assert_eq!(stream.next().await, Some(0));

    service.add(&product(1), 2).unwrap();
    let next = tokio::time::timeout(Duration::from_secs(1), stream.next()).await.unwrap();
    assert_eq!(next, Some(2));
}

#[test]
fn unchanged_total_does_not_notify() {
    let storage: Arc<dyn CartStorage> = Arc::new(MemoryStorage::with_item(CART_KEY, r#"[{"quantity":1}]"#));
    let counter = CartCounterStore::new(storage);
    let mut receiver = counter.subscribe();
    receiver.borrow_and_update();

    assert_eq!(counter.recompute(), 1);
    assert!(!receiver.has_changed().unwrap());
}

#[test]
fn file_backed_cart_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("local_storage.json");

    {
        let storage: Arc<dyn CartStorage> = Arc::new(JsonFileStorage::new(&path));
        let counter = Arc::new(CartCounterStore::new(Arc::clone(&storage)));
        let service = CartService::new(storage, counter);
        service.add(&product(1), 2).unwrap();
        service.add(&product(2), 5).unwrap();
        service.update_quantity(2, 1).unwrap();
    }

    let storage: Arc<dyn CartStorage> = Arc::new(JsonFileStorage::new(&path));
    let counter = CartCounterStore::new(Arc::clone(&storage));
    assert_eq!(counter.get(), 3);

    let entries = storage.read_cart();
    assert_eq!(entries[0].price, Some(20.0));
}

#[test]
fn clearing_the_cart_resets_counter() {
    let storage: Arc<dyn CartStorage> = Arc::new(MemoryStorage::with_item(CART_KEY, r#"[{"quantity":6}]"#));
    let counter = Arc::new(CartCounterStore::new(Arc::clone(&storage)));
    let service = CartService::new(storage, Arc::clone(&counter));

    assert_eq!(counter.get(), 6);
    assert_eq!(service.clear().unwrap(), 0);
    assert_eq!(counter.get(), 0);
}

#[test]
fn mistyped_snapshot_can_still_be_removed() {
    let storage: Arc<dyn CartStorage> = Arc::new(MemoryStorage::with_item(
        CART_KEY,
        r#"[{"id":5,"title":42,"quantity":2}]"#,
    ));
    let counter = Arc::new(CartCounterStore::new(Arc::clone(&storage)));
    let service = CartService::new(storage, Arc::clone(&counter));

    assert_eq!(counter.get(), 2);
    assert_eq!(service.remove(5).unwrap(), 0);
    assert!(service.entries().is_empty());
}

#[test]
fn rewriting_keeps_fields_written_elsewhere() {
    let storage: Arc<dyn CartStorage> = Arc::new(MemoryStorage::with_item(
        CART_KEY,
        r#"[{"id":5,"uri":"p-5","quantity":1,"discounted_price":8.5,"category":"bags","rating":4.5}]"#,
    ));
    let counter = Arc::new(CartCounterStore::new(Arc::clone(&storage)));
    let service = CartService::new(Arc::clone(&storage), counter);

    assert_eq!(service.update_quantity(5, 3).unwrap(), 3);

    let raw = storage.get_item(CART_KEY).unwrap().unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored[0]["quantity"], 3);
    assert_eq!(stored[0]["discounted_price"], 8.5);
    assert_eq!(stored[0]["category"], "bags");
    assert_eq!(stored[0]["rating"], 4.5);
}
