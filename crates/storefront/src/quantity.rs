//! Stock-bounded quantity validation for the product detail flow.
//!
//! Validation is split into a permissive live-typing phase and a strict
//! finalization phase: [`review_input`] runs on every keystroke and never
//! fights the user mid-edit, while [`finalize_input`] runs on focus loss or
//! submit and always yields an integer in `1..=stock`. Corrections are
//! reported as advisory notices, never as errors - there is no failure
//! path here.
//!
//! When `stock == 0` the question is moot: purchase actions are disabled
//! via [`Product::is_purchasable`](crate::catalog::types::Product::is_purchasable)
//! before a quantity field is ever shown.

use std::fmt;

/// Advisory notice attached to a corrected quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityNotice {
    /// The requested quantity exceeded the available stock.
    StockLimit {
        /// The stock the value was clamped to.
        stock: u32,
    },
    /// The requested quantity was below the minimum of 1.
    BelowMinimum,
    /// The input was numeric but not a whole number.
    NotWholeNumber,
}

impl fmt::Display for QuantityNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StockLimit { stock } => {
                write!(f, "Stock limit reached: only {stock} units available")
            }
            Self::BelowMinimum => write!(f, "Quantity must be at least 1"),
            Self::NotWholeNumber => write!(f, "Quantity must be a whole number"),
        }
    }
}

/// Outcome of reviewing an in-progress keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveInput {
    /// Empty field: let the user keep typing, finalization will coerce.
    Empty,
    /// Not a number (yet): ignore the keystroke, keep the prior value.
    Invalid,
    /// In range: accept as typed.
    Accepted(u32),
    /// Over stock: clamp immediately and tell the user why.
    Clamped {
        quantity: u32,
        notice: QuantityNotice,
    },
}

/// A finalized quantity plus the correction applied to reach it, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Finalized {
    /// Always in `1..=max(stock, 1)`.
    pub quantity: u32,
    pub notice: Option<QuantityNotice>,
}

/// Review free-form input while the user is still typing.
///
/// Mid-edit the only correction worth interrupting for is exceeding the
/// stock; everything else passes through until finalization.
#[must_use]
pub fn review_input(raw: &str, stock: u32) -> LiveInput {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return LiveInput::Empty;
    }

    let Ok(value) = trimmed.parse::<u32>() else {
        return LiveInput::Invalid;
    };

    if value > stock {
        return LiveInput::Clamped {
            quantity: stock,
            notice: QuantityNotice::StockLimit { stock },
        };
    }

    LiveInput::Accepted(value)
}

/// Finalize free-form input on focus loss or submit.
///
/// Applies the correction rules in order: empty or non-numeric input
/// coerces to 1; fractional input rounds down with a whole-number notice;
/// the result is then clamped into `1..=stock`.
#[must_use]
pub fn finalize_input(raw: &str, stock: u32) -> Finalized {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Finalized {
            quantity: clamp_to_stock(1, stock),
            notice: None,
        };
    }

    let (value, mut notice) = match trimmed.parse::<f64>() {
        Err(_) => (1.0, None),
        Ok(v) if !v.is_finite() => (1.0, None),
        Ok(v) if v.fract() != 0.0 => (v.floor(), Some(QuantityNotice::NotWholeNumber)),
        Ok(v) => (v, None),
    };

    let value = if value < 1.0 {
        notice = notice.or(Some(QuantityNotice::BelowMinimum));
        1
    } else if value > f64::from(u32::MAX) {
        u32::MAX
    } else {
        // Fraction already stripped above
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            value as u32
        }
    };

    if value > stock && stock > 0 {
        return Finalized {
            quantity: stock,
            notice: Some(QuantityNotice::StockLimit { stock }),
        };
    }

    Finalized {
        quantity: clamp_to_stock(value, stock),
        notice,
    }
}

/// Step a quantity up by one, holding at the stock ceiling.
///
/// Hitting the ceiling is a no-op that surfaces the same stock-limit
/// notice as typed input.
#[must_use]
pub fn increment(quantity: u32, stock: u32) -> (u32, Option<QuantityNotice>) {
    if quantity >= stock {
        return (quantity, Some(QuantityNotice::StockLimit { stock }));
    }
    (quantity + 1, None)
}

/// Step a quantity down by one, holding at 1.
#[must_use]
pub const fn decrement(quantity: u32) -> u32 {
    if quantity > 1 { quantity - 1 } else { 1 }
}

const fn clamp_to_stock(value: u32, stock: u32) -> u32 {
    if stock == 0 {
        // Purchase actions are disabled at stock 0; the value is display-only
        return 1;
    }
    if value > stock { stock } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finalize_in_range_passes_unflagged() {
        let result = finalize_input("3", 10);
        assert_eq!(result.quantity, 3);
        assert_eq!(result.notice, None);
    }

    #[test]
    fn test_finalize_over_stock_clamps_with_notice() {
        let result = finalize_input("15", 10);
        assert_eq!(result.quantity, 10);
        assert_eq!(result.notice, Some(QuantityNotice::StockLimit { stock: 10 }));
    }

    #[test]
    fn test_finalize_zero_coerces_to_one() {
        let result = finalize_input("0", 10);
        assert_eq!(result.quantity, 1);
        assert_eq!(result.notice, Some(QuantityNotice::BelowMinimum));
    }

    #[test]
    fn test_finalize_garbage_coerces_to_one() {
        let result = finalize_input("abc", 10);
        assert_eq!(result.quantity, 1);
        assert_eq!(result.notice, None);
    }

    #[test]
    fn test_finalize_empty_coerces_to_one() {
        let result = finalize_input("", 10);
        assert_eq!(result.quantity, 1);
        assert_eq!(result.notice, None);
    }

    #[test]
    fn test_finalize_fractional_rounds_down_with_notice() {
        let result = finalize_input("2.5", 10);
        assert_eq!(result.quantity, 2);
        assert_eq!(result.notice, Some(QuantityNotice::NotWholeNumber));
    }

    #[test]
    fn test_finalize_negative_coerces_to_one() {
        let result = finalize_input("-4", 10);
        assert_eq!(result.quantity, 1);
        assert_eq!(result.notice, Some(QuantityNotice::BelowMinimum));
    }

    #[test]
    fn test_live_empty_passes_through() {
        assert_eq!(review_input("", 10), LiveInput::Empty);
        assert_eq!(review_input("  ", 10), LiveInput::Empty);
    }

    #[test]
    fn test_live_partial_garbage_is_ignored() {
        assert_eq!(review_input("1e", 10), LiveInput::Invalid);
        assert_eq!(review_input("-", 10), LiveInput::Invalid);
    }

    #[test]
    fn test_live_in_range_accepted_as_typed() {
        assert_eq!(review_input("7", 10), LiveInput::Accepted(7));
        // 0 is tolerated mid-edit; finalization will coerce it
        assert_eq!(review_input("0", 10), LiveInput::Accepted(0));
    }

    #[test]
    fn test_live_over_stock_clamps_immediately() {
        assert_eq!(
            review_input("15", 10),
            LiveInput::Clamped {
                quantity: 10,
                notice: QuantityNotice::StockLimit { stock: 10 },
            }
        );
    }

    #[test]
    fn test_increment_steps_and_holds_at_stock() {
        assert_eq!(increment(3, 10), (4, None));
        assert_eq!(
            increment(10, 10),
            (10, Some(QuantityNotice::StockLimit { stock: 10 }))
        );
    }

    #[test]
    fn test_decrement_steps_and_holds_at_one() {
        assert_eq!(decrement(5), 4);
        assert_eq!(decrement(1), 1);
    }

    #[test]
    fn test_notice_messages() {
        assert_eq!(
            QuantityNotice::StockLimit { stock: 10 }.to_string(),
            "Stock limit reached: only 10 units available"
        );
        assert_eq!(
            QuantityNotice::NotWholeNumber.to_string(),
            "Quantity must be a whole number"
        );
        assert_eq!(
            QuantityNotice::BelowMinimum.to_string(),
            "Quantity must be at least 1"
        );
    }
}
