//! Checkout via WhatsApp deep link.
//!
//! Checkout hands the order off to a human: the cart (or a single
//! "buy now" product) is serialized into a readable order message and a
//! `wa.me` deep link with the message percent-encoded as the `text` query
//! value. Building the draft is pure; actually opening the link is the
//! presentation layer's side effect.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::cart::CartState;
use crate::catalog::types::Product;
use crate::pricing::CurrencyFormatter;

/// Errors that can occur when drafting an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to order. Surfaced as a notice, not a failure:
    /// the checkout action is simply refused.
    #[error("cart is empty")]
    EmptyCart,
}

/// One line of a drafted order.
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub title: String,
    pub sku: String,
    /// Variant display label, when one was chosen.
    pub variant: Option<String>,
    pub quantity: u32,
    /// Discounted unit price in USD - the same figure the cart displays.
    pub unit_price: Decimal,
}

impl OrderLine {
    /// This line's subtotal, in USD.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// An order ready to be rendered into a message and a deep link.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub lines: Vec<OrderLine>,
    pub total_items: u32,
    pub grand_total: Decimal,
}

impl OrderDraft {
    /// Draft an order from the full cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] when the cart has no lines.
    pub fn from_cart(cart: &CartState) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let lines = cart
            .lines
            .iter()
            .map(|line| OrderLine {
                title: line.product.title.clone(),
                sku: line.product.sku.clone(),
                variant: line.selected_variant.clone(),
                quantity: line.quantity,
                unit_price: line.product.discounted_price(),
            })
            .collect();

        Ok(Self::assemble(lines))
    }

    /// Draft a single-product order, bypassing the cart ("buy now").
    ///
    /// Does not touch any cart state.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] when `quantity` is 0.
    pub fn buy_now(
        product: &Product,
        quantity: u32,
        variant: Option<String>,
    ) -> Result<Self, CheckoutError> {
        if quantity == 0 {
            return Err(CheckoutError::EmptyCart);
        }

        Ok(Self::assemble(vec![OrderLine {
            title: product.title.clone(),
            sku: product.sku.clone(),
            variant,
            quantity,
            unit_price: product.discounted_price(),
        }]))
    }

    fn assemble(lines: Vec<OrderLine>) -> Self {
        let total_items = lines.iter().map(|line| line.quantity).sum();
        let grand_total = lines.iter().map(OrderLine::line_total).sum();
        Self {
            lines,
            total_items,
            grand_total,
        }
    }

    /// Render the multi-line order message sent over WhatsApp.
    #[must_use]
    pub fn message(&self, formatter: &CurrencyFormatter, app_name: &str) -> String {
        let details = self
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let variant = line
                    .variant
                    .as_deref()
                    .map_or_else(String::new, |v| format!(" ({v})"));
                format!(
                    "{no}. {title}{variant}\n   SKU: {sku}\n   Qty: {qty}x @ {unit}\n   Subtotal: {subtotal}",
                    no = i + 1,
                    title = line.title,
                    sku = line.sku,
                    qty = line.quantity,
                    unit = formatter.format(line.unit_price),
                    subtotal = formatter.format(line.line_total()),
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            "*NEW ORDER - {app_name}*\n\n{details}\n\n---\n*Total Items:* {total_items}\n*Grand Total:* {grand_total}\n\nMohon proses pesanan ini. Terima kasih! \u{1f64f}",
            total_items = self.total_items,
            grand_total = formatter.format(self.grand_total),
        )
    }

    /// Build the `wa.me` deep link carrying the order message.
    #[must_use]
    pub fn whatsapp_link(
        &self,
        whatsapp_number: &str,
        formatter: &CurrencyFormatter,
        app_name: &str,
    ) -> String {
        let message = self.message(formatter, app_name);
        format!(
            "https://wa.me/{whatsapp_number}?text={}",
            urlencoding::encode(&message)
        )
    }
}
