//! Catalog/auth API client implementation.
//!
//! Uses `reqwest` for HTTP with `moka` caching for catalog reads
//! (5-minute TTL). The bearer token is not owned here: it is read from
//! durable storage on every request and evicted from storage when the API
//! answers with an authorization failure, so a stale session heals itself
//! on the next call.

use std::sync::Arc;
use std::time::Duration;

use fastrac_core::ProductId;
use moka::future::Cache;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::StorefrontConfig;
use crate::storage::{AUTH_TOKEN_KEY, KeyValueStorage, USER_KEY};

use super::types::{AuthUser, LoginCredentials, Product, ProductsResponse};
use super::{CatalogError, SUPPORTED_CATEGORIES};

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Product(Box<Product>),
    Products(Vec<Product>),
}

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the remote catalog and auth API.
///
/// Provides typed access to product lists, product detail, search, and
/// login. List and detail reads are cached for 5 minutes; search and auth
/// calls always hit the network.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    storage: Arc<dyn KeyValueStorage>,
    cache: Cache<String, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog API client.
    ///
    /// `storage` is the same durable store the auth session uses; the
    /// client reads the token from it and clears it on authorization
    /// failures.
    #[must_use]
    pub fn new(config: &StorefrontConfig, storage: Arc<dyn KeyValueStorage>) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_base_url.clone(),
                storage,
                cache,
            }),
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.inner.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Execute a request, handling auth attachment and error mapping.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, CatalogError> {
        // Attach the cached token when present; most endpoints tolerate
        // an absent header.
        let request = match self.inner.storage.get(AUTH_TOKEN_KEY) {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();

        // An authorization failure from any endpoint means the cached
        // session is dead; evict it so the user is treated as logged out.
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            warn!(status = %status, "API rejected cached credentials, clearing session");
            self.inner.storage.remove(AUTH_TOKEN_KEY);
            self.inner.storage.remove(USER_KEY);
            return Err(CatalogError::Unauthorized);
        }

        // Read the body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(&body);
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(CatalogError::NotFound(message));
            }
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message,
            });
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "Failed to parse catalog API response"
                );
                Err(CatalogError::Parse(e))
            }
        }
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get all products in one category.
    ///
    /// The pagination envelope is flattened to the product list; the
    /// storefront's categories are small enough to fetch in one page.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(category = %category))]
    pub async fn products_by_category(&self, category: &str) -> Result<Vec<Product>, CatalogError> {
        let cache_key = format!("category:{category}");

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for category");
            return Ok(products);
        }

        let url = self.endpoint(&["products", "category", category]);
        let envelope: ProductsResponse = self.execute(self.inner.client.get(url)).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(envelope.products.clone()))
            .await;

        Ok(envelope.products)
    }

    /// Get every product the storefront carries, across its supported
    /// categories, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns an error if any category fetch fails.
    #[instrument(skip(self))]
    pub async fn all_catalog_products(&self) -> Result<Vec<Product>, CatalogError> {
        let [a, b, c] = SUPPORTED_CATEGORIES;
        let (mut shirts, shoes, watches) = tokio::try_join!(
            self.products_by_category(a),
            self.products_by_category(b),
            self.products_by_category(c),
        )?;

        shirts.extend(shoes);
        shirts.extend(watches);
        Ok(shirts)
    }

    /// Get a product by its id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product does not exist, or
    /// another error if the API request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn product_by_id(&self, id: ProductId) -> Result<Product, CatalogError> {
        let cache_key = format!("product:{id}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = self.endpoint(&["products", &id.to_string()]);
        let product: Product = self.execute(self.inner.client.get(url)).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Search products by free text.
    ///
    /// The API searches its whole catalog; results are filtered down to
    /// the categories this storefront carries. Never cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(query = %query))]
    pub async fn search(&self, query: &str) -> Result<Vec<Product>, CatalogError> {
        let mut url = self.endpoint(&["products", "search"]);
        url.query_pairs_mut().append_pair("q", query);

        let envelope: ProductsResponse = self.execute(self.inner.client.get(url)).await?;

        Ok(envelope
            .products
            .into_iter()
            .filter(|p| SUPPORTED_CATEGORIES.contains(&p.category.as_str()))
            .collect())
    }

    // =========================================================================
    // Auth Methods (not cached - session state)
    // =========================================================================

    /// Log in with username and password.
    ///
    /// On success the token and the (token-stripped) profile are persisted
    /// under their storage keys for reuse across sessions.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Api` with the server's user-displayable
    /// message on bad credentials, or another error if the request fails.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthUser, CatalogError> {
        let url = self.endpoint(&["auth", "login"]);
        let user: AuthUser = self
            .execute(self.inner.client.post(url).json(credentials))
            .await?;

        if let Some(token) = &user.token {
            self.inner.storage.set(AUTH_TOKEN_KEY, token);
        }
        let profile = AuthUser {
            token: None,
            ..user.clone()
        };
        if let Ok(json) = serde_json::to_string(&profile) {
            self.inner.storage.set(USER_KEY, &json);
        }

        Ok(user)
    }

    /// Get the profile of the currently logged-in user.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotLoggedIn` if no token is cached, or
    /// `CatalogError::Unauthorized` if the cached token was rejected (the
    /// session is evicted as a side effect).
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<AuthUser, CatalogError> {
        if self.inner.storage.get(AUTH_TOKEN_KEY).is_none() {
            return Err(CatalogError::NotLoggedIn);
        }

        let url = self.endpoint(&["auth", "me"]);
        self.execute(self.inner.client.get(url)).await
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate a cached product.
    pub async fn invalidate_product(&self, id: ProductId) {
        self.inner.cache.invalidate(&format!("product:{id}")).await;
    }

    /// Invalidate a cached category listing.
    pub async fn invalidate_category(&self, category: &str) {
        self.inner
            .cache
            .invalidate(&format!("category:{category}"))
            .await;
    }

    /// Invalidate all cached data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

/// Pull the user-displayable `message` field out of an API error body,
/// falling back to the (truncated) raw body.
fn error_message(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: String,
    }

    serde_json::from_str::<ErrorBody>(body).map_or_else(
        |_| body.chars().take(200).collect(),
        |parsed| parsed.message,
    )
}
