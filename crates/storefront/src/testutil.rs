//! Shared fixtures for unit tests.

#![allow(clippy::unwrap_used)]

use fastrac_core::ProductId;

use crate::catalog::types::{Dimensions, Product, ProductMeta};

/// A minimal catalog product for exercising the stores.
pub fn product(id: i64, price: &str, discount_percentage: &str, stock: u32) -> Product {
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
