//! CLI commands.

pub mod auth;
pub mod cart;
pub mod products;

use std::sync::Arc;

use thiserror::Error;

use fastrac_storefront::catalog::{CatalogClient, CatalogError};
use fastrac_storefront::config::{ConfigError, StorefrontConfig};
use fastrac_storefront::pricing::CurrencyFormatter;
use fastrac_storefront::storage::{JsonFileStorage, KeyValueStorage, StorageError};

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The persistent data file could not be opened.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A catalog/auth API call failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Login failed.
    #[error(transparent)]
    Auth(#[from] fastrac_storefront::auth::AuthError),
}

/// Everything a command needs: config, storage, API client, formatter.
pub struct Context {
    pub config: StorefrontConfig,
    pub storage: Arc<dyn KeyValueStorage>,
    pub client: CatalogClient,
    pub formatter: CurrencyFormatter,
}

impl Context {
    /// Load configuration and open the persistent stores.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or the data
    /// directory cannot be opened.
    pub fn load() -> Result<Self, CommandError> {
        let config = StorefrontConfig::from_env()?;
        let storage: Arc<dyn KeyValueStorage> =
            Arc::new(JsonFileStorage::open(&config.data_dir)?);
        let client = CatalogClient::new(&config, Arc::clone(&storage));
        let formatter = CurrencyFormatter::from_config(&config);

        Ok(Self {
            config,
            storage,
            client,
            formatter,
        })
    }
}
