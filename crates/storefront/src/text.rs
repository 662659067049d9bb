//! Small display helpers shared across catalog and cart views.

use std::time::Duration;

use chrono::{DateTime, Datelike};
use tokio::task::JoinHandle;

use fastrac_core::Email;

/// Stock drops below this count are highlighted as running low.
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// Coarse stock buckets for badge coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockLevel {
    OutOfStock,
    Low,
    InStock,
}

/// Bucket a stock count for display.
#[must_use]
pub const fn stock_level(stock: u32) -> StockLevel {
    match stock {
        0 => StockLevel::OutOfStock,
        s if s < LOW_STOCK_THRESHOLD => StockLevel::Low,
        _ => StockLevel::InStock,
    }
}

/// Truncate text to at most `max_chars` characters, appending an ellipsis
/// when anything was cut.
#[must_use]
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

/// First letters of the first two words, uppercased (avatar fallback).
#[must_use]
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Structural email validation for form input.
#[must_use]
pub fn is_valid_email(input: &str) -> bool {
    Email::parse(input).is_ok()
}

/// Indonesian month names, indexed by month number - 1.
const MONTHS_ID: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Format an ISO 8601 timestamp as an id-ID long date, e.g.
/// `30 April 2025`. Returns `None` when the input does not parse.
#[must_use]
pub fn format_date(value: &str) -> Option<String> {
    let parsed = DateTime::parse_from_rfc3339(value).ok()?;
    let month = MONTHS_ID.get(usize::try_from(parsed.month0()).ok()?)?;
    Some(format!("{} {} {}", parsed.day(), month, parsed.year()))
}

/// Trailing-edge debouncer for bursty input (e.g. search keystrokes).
///
/// Each call supersedes the previous one; the action runs only after the
/// delay elapses without another call. Requires a tokio runtime.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    /// Create a debouncer with the given quiet period.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Schedule `action`, cancelling any previously scheduled one.
    pub fn call(&mut self, action: impl FnOnce() + Send + 'static) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        }));
    }

    /// Cancel any scheduled action.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
