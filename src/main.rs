#![allow(missing_docs)]

#[tokio::main]
async fn main() {
    if let Err(e) = shopcart_lib::run().await {
        eprintln!("shopcart failed: {e:#}");
        std::process::exit(1);
    }
}
