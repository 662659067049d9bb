//! Domain types for the catalog and auth APIs.
//!
//! Field names follow the remote API's camelCase JSON; everything price-like
//! deserializes into `Decimal` so downstream math never touches floats.

use fastrac_core::{ProductId, UserId, discounted_unit_price};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Product Types
// =============================================================================

/// Physical dimensions of a product, in centimeters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

/// A customer review attached to a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Star rating, 1-5.
    pub rating: f64,
    pub comment: String,
    /// ISO 8601 timestamp.
    pub date: String,
    pub reviewer_name: String,
    pub reviewer_email: String,
}

/// Bookkeeping metadata the catalog attaches to every product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductMeta {
    /// ISO 8601 creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
    /// ISO 8601 update timestamp.
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub qr_code: Option<String>,
}

/// A product in the catalog.
///
/// Externally sourced and read-only to this system: the storefront never
/// mutates a product, it only quotes prices and checks stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    /// Category slug (e.g. `mens-shirts`).
    pub category: String,
    /// Catalog list price in USD.
    pub price: Decimal,
    /// Percentage (0-100) subtracted from `price` at display time.
    #[serde(default)]
    pub discount_percentage: Decimal,
    /// Average review rating.
    #[serde(default)]
    pub rating: f64,
    /// Units available. The storefront displays this and bounds cart
    /// quantities with it; it does not reserve inventory.
    pub stock: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub brand: Option<String>,
    pub sku: String,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub dimensions: Dimensions,
    #[serde(default)]
    pub warranty_information: Option<String>,
    #[serde(default)]
    pub shipping_information: Option<String>,
    #[serde(default)]
    pub availability_status: Option<String>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub return_policy: Option<String>,
    #[serde(default = "default_minimum_order_quantity")]
    pub minimum_order_quantity: u32,
    #[serde(default)]
    pub meta: ProductMeta,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

const fn default_minimum_order_quantity() -> u32 {
    1
}

impl Product {
    /// Unit price after the catalog discount, in USD.
    ///
    /// Every surface that shows or sums a price goes through this method,
    /// so the cart view and the generated order message can never disagree.
    #[must_use]
    pub fn discounted_price(&self) -> Decimal {
        discounted_unit_price(self.price, self.discount_percentage)
    }

    /// Whether add-to-cart / buy-now actions are available.
    ///
    /// Out-of-stock products are never purchasable, independent of any
    /// variant selection.
    #[must_use]
    pub const fn is_purchasable(&self) -> bool {
        self.stock > 0
    }
}

/// Paginated list envelope returned by every product list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
}

// =============================================================================
// Auth Types
// =============================================================================

/// Credentials posted to the login endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

/// The authenticated user profile, as returned by login and `auth/me`.
///
/// `token` is present on the login response and absent on profile reads;
/// it is stripped before the profile is cached so the token only ever
/// lives under its own storage key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub gender: Option<String>,
    /// Avatar URL.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl AuthUser {
    /// Full display name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_catalog_product() {
        let json = r#"{
            "id": 83,
            "title": "Blue & Black Check Shirt",
            "description": "Comfortable and stylish casual wear.",
            "category": "mens-shirts",
            "price": 29.99,
            "discountPercentage": 1.41,
            "rating": 4.19,
            "stock": 44,
            "tags": ["clothing", "men's shirts"],
            "brand": "Fashion Trends",
            "sku": "6RJDTVCU",
            "weight": 6,
            "dimensions": {"width": 17.25, "height": 27.31, "depth": 20.88},
            "warrantyInformation": "No warranty",
            "shippingInformation": "Ships in 1 month",
            "availabilityStatus": "In Stock",
            "reviews": [
                {
                    "rating": 5,
                    "comment": "Highly impressed!",
                    "date": "2025-04-30T09:41:02.053Z",
                    "reviewerName": "Mateo Bennett",
                    "reviewerEmail": "mateo.bennett@x.dummyjson.com"
                }
            ],
            "returnPolicy": "7 days return policy",
            "minimumOrderQuantity": 4,
            "meta": {
                "createdAt": "2025-04-30T09:41:02.053Z",
                "updatedAt": "2025-04-30T09:41:02.053Z",
                "barcode": "939581806914",
                "qrCode": "https://cdn.dummyjson.com/public/qr-code.png"
            },
            "images": ["https://cdn.dummyjson.com/product-images/1.webp"],
            "thumbnail": "https://cdn.dummyjson.com/product-images/thumb.webp"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(83));
        assert_eq!(product.category, "mens-shirts");
        assert_eq!(product.price, "29.99".parse().unwrap());
        assert_eq!(product.stock, 44);
        assert_eq!(product.minimum_order_quantity, 4);
        assert_eq!(product.reviews.len(), 1);
        assert_eq!(product.meta.barcode.as_deref(), Some("939581806914"));
    }

    #[test]
    fn test_deserialize_sparse_product() {
        // Older catalog entries omit most optional fields
        let json = r#"{
            "id": 1,
            "title": "Watch",
            "description": "A watch",
            "category": "mens-watches",
            "price": 120,
            "stock": 0,
            "sku": "W-1"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.discount_percentage, Decimal::ZERO);
        assert_eq!(product.minimum_order_quantity, 1);
        assert!(product.brand.is_none());
        assert!(!product.is_purchasable());
    }

    #[test]
    fn test_discounted_price_uses_catalog_discount() {
        let json = r#"{
            "id": 2,
            "title": "Shirt",
            "description": "",
            "category": "mens-shirts",
            "price": 100,
            "discountPercentage": 10,
            "stock": 5,
            "sku": "S-2"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.discounted_price(), Decimal::from(90));
    }

    #[test]
    fn test_auth_user_token_not_reserialized_when_absent() {
        let json = r#"{
            "id": 1,
            "username": "emilys",
            "email": "emily.johnson@x.dummyjson.com",
            "firstName": "Emily",
            "lastName": "Johnson",
            "gender": "female",
            "image": "https://dummyjson.com/icon/emilys/128"
        }"#;

        let user: AuthUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.full_name(), "Emily Johnson");
        assert!(user.token.is_none());

        let out = serde_json::to_string(&user).unwrap();
        assert!(!out.contains("token"));
    }
}
