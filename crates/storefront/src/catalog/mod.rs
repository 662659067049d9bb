//! Catalog and auth API client.
//!
//! # Architecture
//!
//! - Plain JSON-over-HTTP via `reqwest`; the remote API is the source of
//!   truth, there is no local product sync
//! - In-memory caching via `moka` for list/detail reads (5 minute TTL);
//!   search and auth calls are never cached
//! - The bearer token is read from durable storage per request and evicted
//!   there when the API signals the session is no longer valid
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fastrac_storefront::catalog::CatalogClient;
//! use fastrac_storefront::storage::MemoryStorage;
//!
//! let client = CatalogClient::new(&config, Arc::new(MemoryStorage::new()));
//!
//! // Browse one shelf
//! let shirts = client.products_by_category("mens-shirts").await?;
//!
//! // Or everything the store carries
//! let all = client.all_catalog_products().await?;
//! ```

mod client;
mod filter;
pub mod types;

pub use client::CatalogClient;
pub use filter::{ProductFilter, SortKey, page};
pub use types::*;

use thiserror::Error;

/// The three categories this storefront carries. Search results and the
/// combined catalog view are restricted to these.
pub const SUPPORTED_CATEGORIES: [&str; 3] = ["mens-shirts", "mens-shoes", "mens-watches"];

/// Products shown per page in catalog views.
pub const PRODUCTS_PER_PAGE: usize = 12;

/// Errors that can occur when talking to the catalog/auth API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The cached credentials were rejected; they have been evicted.
    #[error("session is no longer authorized")]
    Unauthorized,

    /// No token is cached for an endpoint that requires one.
    #[error("not logged in")]
    NotLoggedIn,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::NotFound("product 123".to_string());
        assert_eq!(err.to_string(), "Not found: product 123");
    }

    #[test]
    fn test_api_error_display() {
        let err = CatalogError::Api {
            status: 400,
            message: "Invalid credentials".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 400 - Invalid credentials");
    }
}
