//! Money math on [`rust_decimal::Decimal`].
//!
//! The catalog API quotes prices in USD as JSON numbers; all arithmetic on
//! them goes through `Decimal` so cart totals and order summaries agree to
//! the cent no matter how they were accumulated.

use rust_decimal::Decimal;

/// The unit price of a product after its catalog discount is applied.
///
/// `price × (1 − discount_percentage / 100)`, where `discount_percentage`
/// is the 0-100 percentage the catalog attaches to each product. This is
/// the one formula used by every price surface (cart totals, product
/// detail, order summaries); never reimplement it at a call site.
///
/// A discount outside the 0-100 range is clamped rather than trusted, so a
/// malformed catalog entry can never produce a negative price.
#[must_use]
pub fn discounted_unit_price(price: Decimal, discount_percentage: Decimal) -> Decimal {
    let percent = discount_percentage
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    price - price * percent / Decimal::ONE_HUNDRED
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_ten_percent_off() {
        assert_eq!(
            discounted_unit_price(dec("100"), dec("10")),
            dec("90")
        );
    }

    #[test]
    fn test_no_discount() {
        assert_eq!(discounted_unit_price(dec("50"), Decimal::ZERO), dec("50"));
    }

    #[test]
    fn test_fractional_discount() {
        // 19.99 with 12.5% off
        assert_eq!(
            discounted_unit_price(dec("19.99"), dec("12.5")),
            dec("17.491250")
        );
    }

    #[test]
    fn test_full_discount() {
        assert_eq!(
            discounted_unit_price(dec("80"), Decimal::ONE_HUNDRED),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_out_of_range_discount_is_clamped() {
        assert_eq!(
            discounted_unit_price(dec("80"), dec("150")),
            Decimal::ZERO
        );
        assert_eq!(discounted_unit_price(dec("80"), dec("-5")), dec("80"));
    }
}
