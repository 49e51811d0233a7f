// Generates TypeScript bindings for the storefront types
use shopcart_lib::domain::{CartEntry, FacetSelection, ListingWindow, Product, SortKey};
use ts_rs::TS;

fn main() {
    println!("Product TS: {}", Product::name());
    println!("CartEntry TS: {}", CartEntry::name());
    println!("SortKey TS: {}", SortKey::name());
    println!("FacetSelection TS: {}", FacetSelection::name());
    println!("ListingWindow TS: {}", ListingWindow::name());

    let mut failed = false;
    for (name, result) in [
        ("Product", Product::export()),
        ("CartEntry", CartEntry::export()),
        ("SortKey", SortKey::export()),
        ("FacetSelection", FacetSelection::export()),
        ("ListingWindow", ListingWindow::export()),
    ] {
        if let Err(e) = result {
            eprintln!("{name} export error: {e}");
            failed = true;
        }
    }

    if failed {
        std::process::exit(1);
    }
    println!("TypeScript bindings generated");
}
