//! Integration tests for Fastrac.
//!
//! # Running Tests
//!
//! ```bash
//! # Offline tests (cart persistence, checkout flow)
//! cargo test -p fastrac-integration-tests
//!
//! # Live catalog API tests (network)
//! FASTRAC_API_URL=https://dummyjson.com \
//!   cargo test -p fastrac-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - add/update/remove/checkout against in-memory storage
//! - `persistence` - rehydration across store instances on a data file
//! - `catalog_live` - `#[ignore]`d tests against the real catalog API

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use fastrac_core::ProductId;
use fastrac_storefront::catalog::types::{Dimensions, Product, ProductMeta};
use fastrac_storefront::config::StorefrontConfig;
use rust_decimal::Decimal;
use url::Url;

/// Base URL for the catalog API (configurable via environment).
#[must_use]
pub fn catalog_base_url() -> Url {
    let raw = std::env::var("FASTRAC_API_URL")
        .unwrap_or_else(|_| "https://dummyjson.com".to_string());
    Url::parse(&raw).expect("FASTRAC_API_URL must be a valid URL")
}

/// A storefront configuration pointed at the test catalog.
#[must_use]
pub fn test_config(data_dir: PathBuf) -> StorefrontConfig {
    StorefrontConfig {
        api_base_url: catalog_base_url(),
        whatsapp_number: "6281234567890".to_string(),
        app_name: "Fastrac".to_string(),
        exchange_rate: Decimal::from(15000),
        data_dir,
    }
}

/// A minimal catalog product for driving the stores offline.
#[must_use]
pub fn fixture_product(id: i64, price: &str, discount_percentage: &str, stock: u32) -> Product {
    Product {
        id: ProductId::new(id),
        title: format!("Product {id}"),
        description: String::new(),
        category: "mens-shirts".to_string(),
        price: price.parse().unwrap(),
        discount_percentage: discount_percentage.parse().unwrap(),
        rating: 4.0,
        stock,
        tags: Vec::new(),
        brand: None,
        sku: format!("SKU-{id}"),
        weight: 1.0,
        dimensions: Dimensions::default(),
        warranty_information: None,
        shipping_information: None,
        availability_status: None,
        reviews: Vec::new(),
        return_policy: None,
        minimum_order_quantity: 1,
        meta: ProductMeta::default(),
        images: Vec::new(),
        thumbnail: None,
    }
}
