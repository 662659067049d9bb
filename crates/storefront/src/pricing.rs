//! Price display formatting.
//!
//! The catalog quotes USD; the storefront displays rupiah at a fixed
//! conversion rate with zero fraction digits and id-ID digit grouping
//! (`Rp 1.350.000`). One [`CurrencyFormatter`] instance, built from
//! configuration, is shared by every surface that shows a price - cart,
//! product detail, and the generated order message all format through it,
//! so they can never disagree.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::StorefrontConfig;

/// Formats catalog (USD) amounts for display in rupiah.
#[derive(Debug, Clone)]
pub struct CurrencyFormatter {
    exchange_rate: Decimal,
}

impl CurrencyFormatter {
    /// Create a formatter with the given USD-to-IDR rate.
    #[must_use]
    pub const fn new(exchange_rate: Decimal) -> Self {
        Self { exchange_rate }
    }

    /// Create a formatter from the loaded configuration.
    #[must_use]
    pub const fn from_config(config: &StorefrontConfig) -> Self {
        Self::new(config.exchange_rate)
    }

    /// Convert a USD amount to whole rupiah.
    #[must_use]
    pub fn convert(&self, usd: Decimal) -> Decimal {
        (usd * self.exchange_rate)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Format a USD amount as a rupiah display string, e.g. `Rp 1.350.000`.
    #[must_use]
    pub fn format(&self, usd: Decimal) -> String {
        let rupiah = self.convert(usd);
        format!("Rp {}", group_digits(&rupiah.to_string()))
    }
}

/// Format a plain count with id-ID digit grouping, e.g. `1.234`.
#[must_use]
pub fn format_number(value: u64) -> String {
    group_digits(&value.to_string())
}

/// Insert a dot between every group of three digits, right to left.
fn group_digits(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && i % 3 == offset % 3 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    format!("{sign}{grouped}")
}
