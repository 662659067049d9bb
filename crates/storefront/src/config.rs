//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FASTRAC_API_URL` - Base URL of the catalog/auth API
//! - `FASTRAC_WHATSAPP_NUMBER` - Phone number orders are sent to
//!   (international format, digits with an optional leading `+`)
//!
//! ## Optional
//! - `FASTRAC_APP_NAME` - Store name used in order messages (default: Fastrac)
//! - `FASTRAC_EXCHANGE_RATE` - USD to IDR display rate (default: 15000)
//! - `FASTRAC_DATA_DIR` - Directory for persisted state (default: .fastrac)

use std::path::PathBuf;

use rust_decimal::Decimal;
use thiserror::Error;
use url::Url;

/// Default display conversion rate from catalog USD to IDR.
const DEFAULT_EXCHANGE_RATE: &str = "15000";

/// Default data directory for persisted cart/auth state.
const DEFAULT_DATA_DIR: &str = ".fastrac";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL of the catalog/auth API
    pub api_base_url: Url,
    /// WhatsApp number orders are handed off to (digits only, no `+`)
    pub whatsapp_number: String,
    /// Store name shown in generated order messages
    pub app_name: String,
    /// Fixed USD-to-IDR rate applied wherever a price is displayed
    pub exchange_rate: Decimal,
    /// Directory holding the persisted cart and auth session
    pub data_dir: PathBuf,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing, the API URL
    /// does not parse, the WhatsApp number is not phone-number-like, or the
    /// exchange rate is not a positive decimal.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = parse_base_url(&get_required_env("FASTRAC_API_URL")?)?;
        let whatsapp_number = parse_whatsapp_number(&get_required_env("FASTRAC_WHATSAPP_NUMBER")?)?;
        let app_name = get_env_or_default("FASTRAC_APP_NAME", "Fastrac");
        let exchange_rate =
            parse_exchange_rate(&get_env_or_default("FASTRAC_EXCHANGE_RATE", DEFAULT_EXCHANGE_RATE))?;
        let data_dir = PathBuf::from(get_env_or_default("FASTRAC_DATA_DIR", DEFAULT_DATA_DIR));

        Ok(Self {
            api_base_url,
            whatsapp_number,
            app_name,
            exchange_rate,
            data_dir,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar("FASTRAC_API_URL".to_string(), e.to_string()))
}

/// Normalize a WhatsApp number to the digits-only form `wa.me` expects.
fn parse_whatsapp_number(value: &str) -> Result<String, ConfigError> {
    let digits = value.strip_prefix('+').unwrap_or(value);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::InvalidEnvVar(
            "FASTRAC_WHATSAPP_NUMBER".to_string(),
            "expected digits with an optional leading '+'".to_string(),
        ));
    }
    Ok(digits.to_owned())
}

fn parse_exchange_rate(value: &str) -> Result<Decimal, ConfigError> {
    let rate: Decimal = value.parse().map_err(|_| {
        ConfigError::InvalidEnvVar(
            "FASTRAC_EXCHANGE_RATE".to_string(),
            format!("not a decimal number: {value}"),
        )
    })?;
    if rate <= Decimal::ZERO {
        return Err(ConfigError::InvalidEnvVar(
            "FASTRAC_EXCHANGE_RATE".to_string(),
            "must be positive".to_string(),
        ));
    }
    Ok(rate)
}
